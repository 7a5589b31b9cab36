//! Error taxonomy for the hypermedia client.

/// Errors that can occur while fetching, decoding, or walking resources.
#[derive(thiserror::Error, Debug)]
pub enum HypermediaError {
    #[error("Fetch failed for {uri}: {reason}")]
    Fetch { uri: String, reason: String },

    #[error("Property '{name}' not found on {uri}")]
    MissingProperty { uri: String, name: String },

    #[error("Resource not cached: {0}")]
    MissingResource(String),

    #[error("Form '{name}' not found on {uri}")]
    MissingForm { uri: String, name: String },

    #[error("Form '{form}' has no parameter '{name}'")]
    UnknownParameter { form: String, name: String },

    #[error("Invalid URI {uri}: {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Client root is already set")]
    RootAlreadySet,

    #[error("Client has no root resource")]
    NoRoot,

    #[error("Owning client has been dropped")]
    ClientDropped,
}

impl HypermediaError {
    /// Build a [`HypermediaError::Fetch`] from anything displayable.
    pub fn fetch(uri: &str, reason: impl std::fmt::Display) -> Self {
        Self::Fetch {
            uri: uri.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience result type.
pub type HypermediaResult<T> = Result<T, HypermediaError>;
