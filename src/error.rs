use std::path::PathBuf;

/// All errors that can occur while building the site.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("No locales configured in site.json")]
    NoLocales,

    #[error("Invalid content in {}: {message}", path.display())]
    Content { path: PathBuf, message: String },

    #[error("{0}")]
    Custom(String),
}

pub type Result<T> = std::result::Result<T, SiteError>;

/// Failures of the persistent key-value store backing the progress model.
///
/// The tracker logs and absorbs these; they never reach the learner.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("storage quota exceeded")]
    QuotaExceeded,
}

/// Rejection of a display name after sanitization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("name must be at least {min} valid characters")]
    TooShort { min: usize },
}
