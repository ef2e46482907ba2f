use thiserror::Error;

/// Errors returned by the PrestaShop webservice adapter.
#[derive(Debug, Error)]
pub enum PrestashopError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The webservice answered with a non-success status.
    #[error("unexpected HTTP status {status} from {url}")]
    Transport { status: u16, url: String },

    /// A resource the operation requires does not exist.
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// The response parsed, but lacks structure the operation depends on.
    #[error("malformed response for {context}: {reason}")]
    MalformedResponse { context: String, reason: String },

    /// The caller supplied input the operation cannot work with.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML serialization error: {0}")]
    XmlSerialize(String),

    #[error("JSON deserialization error for {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PrestashopError {
    pub(crate) fn malformed(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Turns a 404 [`PrestashopError::Transport`] into
    /// [`PrestashopError::NotFound`] for `resource`; other errors pass through.
    #[must_use]
    pub(crate) fn not_found_as(self, resource: impl Into<String>) -> Self {
        match self {
            Self::Transport { status: 404, .. } => Self::NotFound {
                resource: resource.into(),
            },
            other => other,
        }
    }
}

/// Errors raised while loading [`crate::PrestashopConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
