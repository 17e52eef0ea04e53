#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("document is unavailable")]
    DocumentUnavailable,
    #[error("history write failed: {0}")]
    History(String),
    #[error("failed to write {tag} tag: {message}")]
    Tag { tag: String, message: String },
    #[error("storage is unavailable")]
    StorageUnavailable,
    #[error("storage access failed for {key}: {message}")]
    Storage { key: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("canonical origin must use http:// or https:// and include a host")]
    InvalidCanonicalOrigin,
    #[error("app name must not be empty")]
    EmptyAppName,
}
