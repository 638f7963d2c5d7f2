use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DN error: {0}")]
    Dn(#[from] dn::Error),

    #[error("{0}")]
    KeyInfo(#[from] keyinfo::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The chosen key must not be used
    #[error("{0}")]
    Refused(&'static str),

    /// The chosen key needs a confirmation that was not given
    #[error("{0} (pass --yes to accept)")]
    Unconfirmed(&'static str),
}

pub(crate) type Result<T> = std::result::Result<T, Error>;
