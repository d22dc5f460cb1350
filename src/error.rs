// src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("malformed markup: {reason} in <<{context}>>")]
    MalformedMarkup { reason: String, context: String },
    #[error("sign-in page did not provide an authenticity token: {0}")]
    AuthTokenMissing(String),
    #[error("failed to fetch page '{url}' (HTTP {status})")]
    PageFetch { url: String, status: u16 },
    #[error("asset not yet available (signature mismatch): {0}")]
    AssetNotYetAvailable(String),
    #[error("unhandled escape sequence in filename <{0}>")]
    UnhandledEscapeSequence(String),
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("network middleware error: {0}")]
    NetworkMiddleware(#[from] reqwest_middleware::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to persist temporary file: {0}")]
    TempFilePersist(#[from] tempfile::PersistError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("interrupted by user")]
    UserInterrupt,
    #[error("{0}")] // printed as-is, no prefix
    UserInputError(String),
    #[error("unexpected error: {0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Whether this error, raised while handling a step page or an asset,
    /// must abort the whole run.
    ///
    /// Non-fatal errors only cost the current unit of work. Course and week
    /// page failures never reach this check: they are propagated directly.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            AppError::PageFetch { .. }
                | AppError::AssetNotYetAvailable(_)
                | AppError::Network(_)
                | AppError::NetworkMiddleware(_)
        )
    }

    pub(crate) fn malformed(reason: impl Into<String>, content: &str, pos: usize) -> Self {
        AppError::MalformedMarkup {
            reason: reason.into(),
            context: excerpt(content, pos.saturating_sub(10), 40),
        }
    }
}

/// A short, char-boundary safe slice of `content` for error messages.
pub(crate) fn excerpt(content: &str, from: usize, len: usize) -> String {
    let mut start = from.min(content.len());
    while !content.is_char_boundary(start) {
        start -= 1;
    }
    content[start..].chars().take(len).collect()
}

pub type AppResult<T> = Result<T, AppError>;
