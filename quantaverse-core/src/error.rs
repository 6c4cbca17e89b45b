use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuantaError {
    #[error("PQC service error: {0}")]
    PqcError(String),

    #[error("Invalid key material: {0}")]
    KeyError(String),

    #[error("Invalid signature: {0}")]
    SignatureError(String),

    #[error("Challenge error: {0}")]
    ChallengeError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, QuantaError>;
