use thiserror::Error;

/// Failure to persist an exchange rate
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}

/// Failure to obtain the list of tradable pairs
#[derive(Error, Debug)]
pub enum PairSourceError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}
