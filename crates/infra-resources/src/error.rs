/// Failures of embedded resource lookup and extraction.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("bundle '{bundle}' doesn't contain an embedded resource at path '{path}'")]
    NotFound { bundle: String, path: String },

    #[error("embedded resource '{name}' is not valid UTF-8")]
    Utf8 {
        name: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    TempFile(#[from] anyhow::Error),
}

impl ResourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResourceError::NotFound { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ResourceError::InvalidArgument(_))
    }
}

pub type Result<T> = std::result::Result<T, ResourceError>;
