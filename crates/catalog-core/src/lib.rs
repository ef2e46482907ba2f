pub mod adapter;
pub mod products;

pub use adapter::ProductAdapter;
pub use products::CoreProduct;
