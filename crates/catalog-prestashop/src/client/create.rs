//! Multi-step product creation: product record, images, initial stock.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use catalog_core::CoreProduct;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Url};

use super::PrestashopClient;
use crate::error::PrestashopError;
use crate::mapper::{from_external, to_create_payload};
use crate::stock::{parse_stock_link, set_quantity, StockLink, INITIAL_STOCK_QUANTITY};

const XML_CONTENT_TYPE: &str = "application/xml";

/// Upload file name of the `index`-th (1-based) image of a product.
#[must_use]
pub fn image_file_name(product_id: i64, index: usize) -> String {
    format!("product_{product_id}_{index}.jpg")
}

impl PrestashopClient {
    /// Creates a product, uploads its images and sets its stock to
    /// [`INITIAL_STOCK_QUANTITY`].
    ///
    /// Steps run in order and the first failure aborts the rest. Nothing is
    /// rolled back: a failed image upload or stock update leaves the product
    /// (and any images already uploaded) in the shop.
    ///
    /// The webservice assigns the id: an id already set on `product` is not
    /// sent. Returns the record parsed from the creation response; the image
    /// and stock steps do not change it.
    ///
    /// # Errors
    ///
    /// - [`PrestashopError::InvalidArgument`] if an image is not valid
    ///   base64. Images are decoded before any request is sent.
    /// - [`PrestashopError::Transport`] if any call returns a non-2xx status.
    /// - [`PrestashopError::NotFound`] if the product has no stock record.
    /// - [`PrestashopError::MalformedResponse`] if the created product has no
    ///   id or the stock documents lack their expected structure.
    pub async fn create(&self, product: &CoreProduct) -> Result<CoreProduct, PrestashopError> {
        let images = decode_images(&product.images_base64)?;
        if product.is_persisted() {
            tracing::debug!(
                ignored_id = ?product.id,
                "record already carries an id; creating a new product"
            );
        }

        let created = self.create_record(product).await?;
        let product_id = created.id.ok_or_else(|| {
            PrestashopError::malformed("create product", "response carries no product id")
        })?;
        tracing::info!(product_id, images = product.image_count(), "product created");

        for (offset, image) in images.into_iter().enumerate() {
            let index = offset + 1;
            self.upload_image(product_id, index, image)
                .await
                .inspect_err(|e| {
                    tracing::warn!(product_id, index, error = %e, "image upload failed; product left in place");
                })?;
        }

        self.initialise_stock(product_id).await.inspect_err(|e| {
            tracing::warn!(product_id, error = %e, "stock initialisation failed; product left in place");
        })?;

        Ok(created)
    }

    /// Finds the `stock_available` record of `product_id`.
    ///
    /// Relative hrefs are resolved against the shop root.
    ///
    /// # Errors
    ///
    /// - [`PrestashopError::Transport`] on a non-2xx status.
    /// - [`PrestashopError::NotFound`] if the product has no stock record.
    /// - [`PrestashopError::MalformedResponse`] if the entry lacks its link or id.
    pub async fn find_stock_link(&self, product_id: i64) -> Result<(Url, String), PrestashopError> {
        let mut url = self.endpoint("api/stock_availables")?;
        url.query_pairs_mut()
            .append_pair("filter[id_product]", &product_id.to_string());

        let response = self.execute(self.request(Method::GET, &url), &url).await?;
        let body = response.text().await?;
        let StockLink { href, id } = parse_stock_link(&body, product_id)?;

        let href = self.base_url.join(&href).map_err(|e| {
            PrestashopError::malformed(
                format!("stock lookup for product {product_id}"),
                format!("unusable href '{href}': {e}"),
            )
        })?;
        Ok((href, id))
    }

    async fn create_record(&self, product: &CoreProduct) -> Result<CoreProduct, PrestashopError> {
        let url = self.endpoint("api/products")?;
        let payload = to_create_payload(product)?;

        let request = self
            .request(Method::POST, &url)
            .header(reqwest::header::CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(payload);
        let response = self.execute(request, &url).await?;
        let body = response.text().await?;
        from_external(&body)
    }

    async fn upload_image(
        &self,
        product_id: i64,
        index: usize,
        bytes: Vec<u8>,
    ) -> Result<(), PrestashopError> {
        let url = self.endpoint(&format!("api/images/products/{product_id}"))?;
        let part = Part::bytes(bytes)
            .file_name(image_file_name(product_id, index))
            .mime_str("image/jpeg")?;
        let form = Form::new().part("image", part);

        self.execute(self.request(Method::POST, &url).multipart(form), &url)
            .await?;
        tracing::debug!(product_id, index, "image uploaded");
        Ok(())
    }

    /// Read-modify-write of the product's stock record.
    async fn initialise_stock(&self, product_id: i64) -> Result<(), PrestashopError> {
        let (href, stock_id) = self.find_stock_link(product_id).await?;

        let response = self
            .execute(self.request(Method::GET, &href), &href)
            .await
            .map_err(|e| e.not_found_as(format!("stock_available {stock_id}")))?;
        let document = response.text().await?;
        let patched = set_quantity(&document, INITIAL_STOCK_QUANTITY)?;

        let request = self
            .request(Method::PUT, &href)
            .header(reqwest::header::CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(patched);
        self.execute(request, &href).await?;

        tracing::debug!(
            product_id,
            stock_id = %stock_id,
            quantity = INITIAL_STOCK_QUANTITY,
            "stock initialised"
        );
        Ok(())
    }
}

fn decode_images(images: &[String]) -> Result<Vec<Vec<u8>>, PrestashopError> {
    images
        .iter()
        .enumerate()
        .map(|(offset, encoded)| {
            STANDARD.decode(encoded.trim()).map_err(|e| {
                PrestashopError::InvalidArgument(format!(
                    "image {} is not valid base64: {e}",
                    offset + 1
                ))
            })
        })
        .collect()
}
