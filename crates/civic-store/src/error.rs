use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("complaint not found: {0}")]
    ComplaintNotFound(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("user with this email already exists")]
    EmailTaken,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("corrupt value under key '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("{0} lock poisoned")]
    Poisoned(&'static str),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
