use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("agent id is not set")]
    MissingId,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("operation not supported by this service revision: {0}")]
    Unsupported(&'static str),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode response (HTTP {status}): {source}")]
    Decode {
        status: u16,
        source: serde_json::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Caller-side mistakes, raised before any request is sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::MissingId | Error::InvalidArgument(_) | Error::Unsupported(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
