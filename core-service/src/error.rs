use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("YouTube API key is not configured")]
    MissingApiKey,

    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: String },

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Library error: {0}")]
    Library(#[from] core_library::LibraryError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] core_metadata::MetadataError),
}

impl CoreError {
    /// Whether the failure came from an upstream service rather than from
    /// the caller's input.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Metadata(
                core_metadata::MetadataError::Upstream { .. }
                    | core_metadata::MetadataError::Http(_)
                    | core_metadata::MetadataError::Bridge(_)
                    | core_metadata::MetadataError::JsonParse(_)
            )
        )
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
