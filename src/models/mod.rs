// src/models/mod.rs

use crate::error::AppError;
use crate::scanner::MediaKind;
use crate::symbols;
use colored::{ColoredString, Colorize};
use std::path::PathBuf;

/// What the user asked for on the command line.
#[derive(Debug, Clone)]
pub struct CourseRequest {
    pub email: String,
    pub password: String,
    pub course: String,
    pub run: u32,
    /// 1-based; `None` means every week.
    pub week: Option<u32>,
}

/// Where an accepted URL ends up on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub url: String,
    pub path: PathBuf,
    pub kind: MediaKind,
    /// Subtitle tracks only: the SubRip file written next to the video.
    pub caption_path: Option<PathBuf>,
}

impl DownloadTarget {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.url.clone())
    }

    /// The file whose presence means there is nothing left to do.
    pub fn final_path(&self) -> &PathBuf {
        self.caption_path.as_ref().unwrap_or(&self.path)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DownloadStatus {
    Success,
    Skipped,
    NotYetAvailable,
    HttpError,
    NetworkError,
    ConnectionError,
    TimeoutError,
    IoError,
    UnexpectedError,
}

impl DownloadStatus {
    pub fn get_display_info(
        &self,
    ) -> (
        &'static ColoredString,
        fn(ColoredString) -> ColoredString,
        &'static str,
    ) {
        match self {
            DownloadStatus::Success => (&symbols::OK, |s| s.green(), "downloaded"),
            DownloadStatus::Skipped => (&symbols::INFO, |s| s.cyan(), "already present, skipped"),
            DownloadStatus::NotYetAvailable => {
                (&symbols::WARN, |s| s.yellow(), "not available yet (signature mismatch)")
            }
            DownloadStatus::HttpError => (&symbols::ERROR, |s| s.red(), "server returned an error"),
            DownloadStatus::NetworkError => (&symbols::ERROR, |s| s.red(), "network request failed"),
            DownloadStatus::ConnectionError => (&symbols::ERROR, |s| s.red(), "could not connect"),
            DownloadStatus::TimeoutError => (&symbols::WARN, |s| s.yellow(), "timed out"),
            DownloadStatus::IoError => (&symbols::ERROR, |s| s.red(), "local file error"),
            DownloadStatus::UnexpectedError => (&symbols::ERROR, |s| s.red(), "unexpected error"),
        }
    }
}

impl From<&AppError> for DownloadStatus {
    fn from(error: &AppError) -> Self {
        match error {
            AppError::AssetNotYetAvailable(_) => DownloadStatus::NotYetAvailable,
            AppError::Network(err)
            | AppError::NetworkMiddleware(reqwest_middleware::Error::Reqwest(err)) => {
                if err.is_timeout() {
                    DownloadStatus::TimeoutError
                } else if err.is_connect() {
                    DownloadStatus::ConnectionError
                } else if err.is_status() {
                    DownloadStatus::HttpError
                } else {
                    DownloadStatus::NetworkError
                }
            }
            AppError::NetworkMiddleware(_) => DownloadStatus::NetworkError,
            AppError::Io(_) | AppError::TempFilePersist(_) => DownloadStatus::IoError,
            _ => DownloadStatus::UnexpectedError,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub filename: String,
    pub status: DownloadStatus,
    pub message: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DownloadAction {
    Skip,
    DownloadNew,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_error() {
        assert_eq!(
            DownloadStatus::from(&AppError::AssetNotYetAvailable("x".into())),
            DownloadStatus::NotYetAvailable
        );
        assert_eq!(
            DownloadStatus::from(&AppError::Io(std::io::Error::other("disk full"))),
            DownloadStatus::IoError
        );
        assert_eq!(
            DownloadStatus::from(&AppError::UserInputError("x".into())),
            DownloadStatus::UnexpectedError
        );
    }

    #[test]
    fn test_final_path_prefers_caption() {
        let mut target = DownloadTarget {
            url: "https://x/en.vtt".into(),
            path: PathBuf::from("out/01_en.vtt"),
            kind: MediaKind::SubtitleTrack,
            caption_path: None,
        };
        assert_eq!(target.final_path(), &PathBuf::from("out/01_en.vtt"));
        target.caption_path = Some(PathBuf::from("out/01_c_1.srt"));
        assert_eq!(target.final_path(), &PathBuf::from("out/01_c_1.srt"));
        assert_eq!(target.file_name(), "01_en.vtt");
    }
}
