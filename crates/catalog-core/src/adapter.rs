//! The capability interface every platform adapter implements.
//!
//! Callers program against [`ProductAdapter`] so that new platforms can be
//! added without touching caller code.

use async_trait::async_trait;

use crate::products::CoreProduct;

/// Product catalog operations backed by an external e-commerce platform.
///
/// Implementations hold no state between calls beyond their configuration.
/// Multi-step operations are not transactional: an error surfaces as soon as
/// one step fails, leaving earlier side effects in place.
#[async_trait]
pub trait ProductAdapter: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches a single product by its platform identifier.
    async fn get_product(&self, id: i64) -> Result<CoreProduct, Self::Error>;

    /// Creates a product together with its images and initial stock, and
    /// returns the record as persisted by the platform.
    async fn create_product(&self, product: &CoreProduct) -> Result<CoreProduct, Self::Error>;

    /// Replaces an existing product. The record must carry an identifier.
    async fn update_product(&self, product: &CoreProduct) -> Result<CoreProduct, Self::Error>;

    /// Returns the id of the tag named `name`, creating it when missing.
    async fn find_or_create_tag(&self, name: &str) -> Result<i64, Self::Error>;

    /// Lists product identifiers for a 1-based `page` of `page_size` entries.
    async fn search_ids(&self, page: u32, page_size: u32) -> Result<Vec<String>, Self::Error>;
}
