use serde::{Deserialize, Serialize};

/// A platform-neutral product record, as owned by the upstream catalog.
///
/// Platform adapters translate this record to and from their own wire
/// formats. Every field is optional on the wire so partially populated
/// records (e.g. an update touching only the price) deserialize cleanly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreProduct {
    /// Identifier assigned by the external platform on creation. Callers
    /// never choose it; it is `None` until the product has been persisted.
    pub id: Option<i64>,
    pub name: Option<String>,
    /// Sale price, tax excluded.
    pub price: Option<f64>,
    /// Cost (wholesale) price.
    pub cost_price: Option<f64>,
    /// Tax category identifier on the external platform.
    pub tax_id: Option<i64>,
    /// Internal SKU / reference code.
    pub sku: Option<String>,
    pub barcode: Option<String>,
    /// Long description, usually HTML.
    pub description: Option<String>,
    pub short_description: Option<String>,
    /// Category identifiers. An empty list means "no categories assigned".
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    /// Product images as base64 payloads (JPEG), in display order.
    pub images_base64: Vec<String>,
}

impl CoreProduct {
    /// Returns `true` once the external platform has assigned an identifier.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Number of image payloads attached to the record.
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.images_base64.len()
    }
}

#[cfg(test)]
#[path = "products_test.rs"]
mod tests;
