pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod json;
pub mod mapper;
pub mod stock;

pub use client::PrestashopClient;
pub use config::{load_config, load_config_from_env, PrestashopConfig};
pub use error::{ConfigError, PrestashopError};
pub use mapper::{from_external, to_external};
