//! Field-by-field mapping between [`CoreProduct`] and the PrestaShop XML
//! product document.
//!
//! The document structure lives in [`crate::document`]; this module owns the
//! per-field default rules. Text is carried over exactly as written: only a
//! blank value counts as absent.

use catalog_core::CoreProduct;

use crate::document::{
    read_product, Associations, CategoryList, CategoryRef, LocalizedText, ProductDocument,
    ProductNode, TextField, DEFAULT_LANGUAGE_ID,
};
use crate::error::PrestashopError;

/// Name written for records that have none; PrestaShop rejects nameless products.
pub const PLACEHOLDER_NAME: &str = "Unnamed product";

const DEFAULT_TAX_RULES_GROUP: i64 = 1;

/// Serializes `product` into a `<prestashop><product>` XML document.
///
/// Missing prices become `0.0`, a missing tax group becomes `1`, and missing
/// text fields become empty elements. The product is always written as
/// active. The `<associations>` block is only emitted when the record has
/// categories. `<id>` is written when the record has one; creation requests
/// use [`to_create_payload`] instead.
///
/// # Errors
///
/// Returns [`PrestashopError::XmlSerialize`] if the document cannot be written.
pub fn to_external(product: &CoreProduct) -> Result<String, PrestashopError> {
    render(product_node(product))
}

/// Like [`to_external`], but never writes `<id>`: the webservice assigns ids
/// on creation.
///
/// # Errors
///
/// Returns [`PrestashopError::XmlSerialize`] if the document cannot be written.
pub(crate) fn to_create_payload(product: &CoreProduct) -> Result<String, PrestashopError> {
    let mut node = product_node(product);
    node.id = None;
    render(node)
}

fn render(node: ProductNode) -> Result<String, PrestashopError> {
    let document = ProductDocument {
        product: Some(node),
    };
    quick_xml::se::to_string(&document).map_err(|e| PrestashopError::XmlSerialize(e.to_string()))
}

fn product_node(product: &CoreProduct) -> ProductNode {
    let associations = if product.categories.is_empty() {
        None
    } else {
        Some(Associations {
            categories: Some(CategoryList {
                items: product
                    .categories
                    .iter()
                    .map(|id| CategoryRef {
                        id: Some(id.clone()),
                    })
                    .collect(),
            }),
        })
    };

    ProductNode {
        id: product.id.map(|id| id.to_string()),
        name: Some(LocalizedText::single(
            product.name.as_deref().unwrap_or(PLACEHOLDER_NAME),
        )),
        price: Some(format_decimal(product.price.unwrap_or(0.0))),
        wholesale_price: Some(format_decimal(product.cost_price.unwrap_or(0.0))),
        id_tax_rules_group: Some(
            product
                .tax_id
                .unwrap_or(DEFAULT_TAX_RULES_GROUP)
                .to_string(),
        ),
        reference: Some(product.sku.clone().unwrap_or_default()),
        ean13: Some(product.barcode.clone().unwrap_or_default()),
        description: Some(TextField::plain(
            product.description.as_deref().unwrap_or_default(),
        )),
        description_short: Some(TextField::plain(
            product.short_description.as_deref().unwrap_or_default(),
        )),
        active: Some("1".to_owned()),
        associations,
    }
}

/// Parses a PrestaShop product document into a [`CoreProduct`].
///
/// Prices and the tax group default to `0` when missing or empty. Text
/// fields that are missing or blank come back as `None`; anything else is
/// kept verbatim, surrounding whitespace included. Localized fields resolve
/// to language `1`. Category entries without an `<id>` are skipped. Tags and
/// images are never populated: the document has no tag names and images live
/// behind a separate endpoint.
///
/// # Errors
///
/// - [`PrestashopError::Xml`] if `xml` is not a well-formed document.
/// - [`PrestashopError::MalformedResponse`] if there is no `<product>` element
///   or a numeric field holds something that is not a number.
pub fn from_external(xml: &str) -> Result<CoreProduct, PrestashopError> {
    let node = read_product(xml)?
        .ok_or_else(|| PrestashopError::malformed("product document", "missing <product> element"))?;
    product_from_node(node)
}

fn product_from_node(node: ProductNode) -> Result<CoreProduct, PrestashopError> {
    let id = match non_blank(node.id) {
        Some(raw) => Some(parse_integer("id", &raw)?),
        None => None,
    };

    let name = node
        .name
        .as_ref()
        .and_then(|n| n.get(DEFAULT_LANGUAGE_ID))
        .filter(|s| !s.trim().is_empty())
        .map(str::to_owned);

    let price = parse_decimal_or_zero("price", node.price)?;
    let cost_price = parse_decimal_or_zero("wholesale_price", node.wholesale_price)?;
    let tax_id = match non_blank(node.id_tax_rules_group) {
        Some(raw) => parse_integer("id_tax_rules_group", &raw)?,
        None => 0,
    };

    let categories = node
        .associations
        .and_then(|a| a.categories)
        .map(|list| {
            list.items
                .into_iter()
                .filter_map(|c| non_blank(c.id))
                .collect()
        })
        .unwrap_or_default();

    Ok(CoreProduct {
        id,
        name,
        price: Some(price),
        cost_price: Some(cost_price),
        tax_id: Some(tax_id),
        sku: non_blank(node.reference),
        barcode: non_blank(node.ean13),
        description: resolve_text(node.description.as_ref()),
        short_description: resolve_text(node.description_short.as_ref()),
        categories,
        tags: Vec::new(),
        images_base64: Vec::new(),
    })
}

/// Formats a price the way the webservice echoes it back: integral values
/// keep one decimal (`12.0`), everything else uses the shortest exact form.
pub(crate) fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Treats a blank string as absent; anything else passes through untouched.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn resolve_text(field: Option<&TextField>) -> Option<String> {
    field
        .and_then(|f| f.resolve(DEFAULT_LANGUAGE_ID))
        .filter(|s| !s.trim().is_empty())
        .map(str::to_owned)
}

fn parse_decimal_or_zero(field: &str, raw: Option<String>) -> Result<f64, PrestashopError> {
    match non_blank(raw) {
        Some(raw) => raw.trim().parse::<f64>().map_err(|e| {
            PrestashopError::malformed(
                format!("product field <{field}>"),
                format!("'{raw}' is not a number: {e}"),
            )
        }),
        None => Ok(0.0),
    }
}

fn parse_integer(field: &str, raw: &str) -> Result<i64, PrestashopError> {
    raw.trim().parse::<i64>().map_err(|e| {
        PrestashopError::malformed(
            format!("product field <{field}>"),
            format!("'{raw}' is not an integer: {e}"),
        )
    })
}

#[cfg(test)]
#[path = "mapper_test.rs"]
mod tests;
