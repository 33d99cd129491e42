use std::io;

/// Errors crossing the plugin boundary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A caller-supplied value was malformed (bad id, empty payload).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A required collaborator is not available yet.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// A remote call failed; the context names the operation.
    #[error("{context}: {source}")]
    External {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn external(context: impl Into<String>, source: io::Error) -> Self {
        Self::External {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
