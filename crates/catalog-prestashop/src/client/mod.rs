//! HTTP client for the PrestaShop webservice.
//!
//! Wraps `reqwest` with Basic authentication (webservice key as username,
//! empty password), typed status handling and the XML/JSON mapping of
//! [`crate::mapper`] and [`crate::json`]. Calls are issued one at a time and
//! never retried.

mod create;

use std::time::Duration;

use async_trait::async_trait;
use catalog_core::{CoreProduct, ProductAdapter};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde_json::{json, Value};

use crate::config::PrestashopConfig;
use crate::error::PrestashopError;
use crate::json::{collection, id_as_i64, id_as_string, product_from_json, take_entity};

pub use create::image_file_name;

/// Client for one PrestaShop shop's webservice.
///
/// Holds only immutable configuration and a reusable connection pool, so a
/// shared instance can be used from several tasks. Use
/// [`PrestashopClient::new`] with a [`PrestashopConfig`] pointing at the shop
/// root (or at a mock server in tests).
pub struct PrestashopClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl PrestashopClient {
    /// Creates a client for the shop described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PrestashopError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PrestashopError::InvalidArgument`] if the
    /// base URL does not parse.
    pub fn new(config: &PrestashopConfig) -> Result<Self, PrestashopError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.as_str())
            .build()?;

        // Exactly one trailing slash, so `join("api/...")` appends below the
        // shop root instead of replacing its last path segment.
        let normalised = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| {
            PrestashopError::InvalidArgument(format!("invalid base URL '{}': {e}", config.base_url))
        })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url,
        })
    }

    /// Fetches a product by id from `GET /api/products/{id}`.
    ///
    /// # Errors
    ///
    /// - [`PrestashopError::NotFound`] if the shop answers 404.
    /// - [`PrestashopError::Transport`] on any other non-2xx status.
    /// - [`PrestashopError::MalformedResponse`] if the body has no `product`.
    /// - [`PrestashopError::Json`] if the body is not valid JSON.
    pub async fn get(&self, id: i64) -> Result<CoreProduct, PrestashopError> {
        let url = self.endpoint(&format!("api/products/{id}"))?;
        let context = format!("product {id}");

        let response = self
            .execute(self.json_request(Method::GET, &url), &url)
            .await
            .map_err(|e| e.not_found_as(context.as_str()))?;
        let body = read_json(response, &context).await?;

        product_from_json(take_entity(body, "product", &context)?, &context)
    }

    /// Replaces a product through `PUT /api/products/{id}` and returns the
    /// record the shop stored.
    ///
    /// The record is sent as a flat JSON object under a `product` key.
    ///
    /// # Errors
    ///
    /// - [`PrestashopError::InvalidArgument`] if `product.id` is `None`.
    /// - [`PrestashopError::Transport`] on a non-2xx status.
    /// - [`PrestashopError::MalformedResponse`] / [`PrestashopError::Json`]
    ///   if the response cannot be decoded.
    pub async fn update(&self, product: &CoreProduct) -> Result<CoreProduct, PrestashopError> {
        let id = product.id.ok_or_else(|| {
            PrestashopError::InvalidArgument("cannot update a product without an id".to_owned())
        })?;
        let url = self.endpoint(&format!("api/products/{id}"))?;
        let context = format!("update product {id}");

        let request = self
            .json_request(Method::PUT, &url)
            .json(&json!({ "product": product }));
        let response = self.execute(request, &url).await?;
        let body = read_json(response, &context).await?;
        let updated = product_from_json(take_entity(body, "product", &context)?, &context)?;

        tracing::info!(product_id = id, "product updated");
        Ok(updated)
    }

    /// Returns the id of the tag named exactly `name`, creating the tag when
    /// the shop has none.
    ///
    /// Lookup and creation are two separate calls, so concurrent callers may
    /// both create the same tag.
    ///
    /// # Errors
    ///
    /// - [`PrestashopError::InvalidArgument`] if `name` is blank.
    /// - [`PrestashopError::Transport`] on a non-2xx status.
    /// - [`PrestashopError::MalformedResponse`] if the created tag has no id.
    pub async fn find_or_create_tag(&self, name: &str) -> Result<i64, PrestashopError> {
        if name.trim().is_empty() {
            return Err(PrestashopError::InvalidArgument(
                "tag name must not be blank".to_owned(),
            ));
        }

        let mut url = self.endpoint("api/tags")?;
        url.query_pairs_mut()
            .append_pair("filter[name]", &format!("[{name}]"))
            .append_pair("display", "full");

        let context = format!("tag lookup '{name}'");
        let response = self
            .execute(self.json_request(Method::GET, &url), &url)
            .await?;
        let body = read_json(response, &context).await?;

        let existing = collection(&body, "tags")
            .iter()
            .filter(|tag| match tag.get("name").and_then(Value::as_str) {
                Some(tag_name) => tag_name == name,
                None => true,
            })
            .find_map(|tag| tag.get("id").and_then(id_as_i64));
        if let Some(id) = existing {
            tracing::debug!(tag = name, tag_id = id, "tag already exists");
            return Ok(id);
        }

        let url = self.endpoint("api/tags")?;
        let context = format!("create tag '{name}'");
        let request = self
            .json_request(Method::POST, &url)
            .json(&json!({ "tag": { "name": name } }));
        let response = self.execute(request, &url).await?;
        let body = read_json(response, &context).await?;
        let tag = take_entity(body, "tag", &context)?;
        let id = tag
            .get("id")
            .and_then(id_as_i64)
            .ok_or_else(|| PrestashopError::malformed(&context, "created tag has no id"))?;

        tracing::info!(tag = name, tag_id = id, "tag created");
        Ok(id)
    }

    /// Lists the product ids of one page of `GET /api/products`.
    ///
    /// `page` is 1-based and translated to `offset = (page - 1) * page_size`.
    /// Ids keep the order the shop returned them in.
    ///
    /// # Errors
    ///
    /// - [`PrestashopError::InvalidArgument`] if `page` or `page_size` is 0.
    /// - [`PrestashopError::Transport`] on a non-2xx status.
    /// - [`PrestashopError::MalformedResponse`] if an entry has no id.
    pub async fn search_ids(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<String>, PrestashopError> {
        let offset = page_offset(page, page_size)?;

        let mut url = self.endpoint("api/products")?;
        url.query_pairs_mut()
            .append_pair("limit", &page_size.to_string())
            .append_pair("offset", &offset.to_string());

        let context = format!("product search (page {page})");
        let response = self
            .execute(self.json_request(Method::GET, &url), &url)
            .await?;
        let body = read_json(response, &context).await?;

        collection(&body, "products")
            .iter()
            .map(|p| {
                p.get("id")
                    .and_then(id_as_string)
                    .ok_or_else(|| PrestashopError::malformed(&context, "product entry has no id"))
            })
            .collect()
    }

    /// Resolves `path` (relative, no leading slash) against the shop root.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, PrestashopError> {
        self.base_url
            .join(path)
            .map_err(|e| PrestashopError::InvalidArgument(format!("invalid endpoint '{path}': {e}")))
    }

    /// Starts an authenticated request.
    pub(crate) fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        self.client
            .request(method, url.clone())
            .basic_auth(&self.api_key, None::<&str>)
    }

    /// Starts an authenticated request whose response should be JSON.
    fn json_request(&self, method: Method, url: &Url) -> RequestBuilder {
        self.request(method, url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header("Output-Format", "JSON")
    }

    /// Sends `request` and maps any non-2xx status to
    /// [`PrestashopError::Transport`].
    pub(crate) async fn execute(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<Response, PrestashopError> {
        tracing::debug!(url = %url, "sending webservice request");
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::debug!(url = %url, status = status.as_u16(), "webservice returned error status");
            return Err(PrestashopError::Transport {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl ProductAdapter for PrestashopClient {
    type Error = PrestashopError;

    async fn get_product(&self, id: i64) -> Result<CoreProduct, Self::Error> {
        self.get(id).await
    }

    async fn create_product(&self, product: &CoreProduct) -> Result<CoreProduct, Self::Error> {
        self.create(product).await
    }

    async fn update_product(&self, product: &CoreProduct) -> Result<CoreProduct, Self::Error> {
        self.update(product).await
    }

    async fn find_or_create_tag(&self, name: &str) -> Result<i64, Self::Error> {
        PrestashopClient::find_or_create_tag(self, name).await
    }

    async fn search_ids(&self, page: u32, page_size: u32) -> Result<Vec<String>, Self::Error> {
        PrestashopClient::search_ids(self, page, page_size).await
    }
}

/// Zero-based offset of a 1-based `page`.
fn page_offset(page: u32, page_size: u32) -> Result<u64, PrestashopError> {
    if page == 0 {
        return Err(PrestashopError::InvalidArgument(
            "page numbers start at 1".to_owned(),
        ));
    }
    if page_size == 0 {
        return Err(PrestashopError::InvalidArgument(
            "page size must be greater than zero".to_owned(),
        ));
    }
    Ok(u64::from(page - 1) * u64::from(page_size))
}

async fn read_json(response: Response, context: &str) -> Result<Value, PrestashopError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| PrestashopError::Json {
        context: context.to_owned(),
        source: e,
    })
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
