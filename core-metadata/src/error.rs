use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    /// The upstream service answered with a failure status or an error body.
    #[error("{message}")]
    Upstream { message: String, status: Option<u16> },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Failed to parse response: {0}")]
    JsonParse(String),

    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::error::BridgeError),
}

impl MetadataError {
    pub fn upstream(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Upstream {
            message: message.into(),
            status,
        }
    }

    /// HTTP status reported by the upstream, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => *status,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MetadataError>;
