// src/downloader/task_processor.rs

use crate::{
    DownloadJobContext, caption, constants, error::*, models::*, ui, utils,
};
use futures::StreamExt;
use indicatif::HumanBytes;
use log::{debug, error, info, warn};
use rand::Rng;
use std::{fs, io::Write, path::Path, time::Duration};
use tempfile::NamedTempFile;

/// Downloads one planned target: skip check, courtesy delay, streamed
/// transfer into a temporary file, and subtitle conversion.
pub struct TaskProcessor {
    context: DownloadJobContext,
}

impl TaskProcessor {
    pub fn new(context: DownloadJobContext) -> Self {
        Self { context }
    }

    /// Failures that only cost this file come back as a `DownloadResult`;
    /// fatal ones (and interruption) are returned as errors.
    pub async fn process(&self, target: &DownloadTarget) -> AppResult<DownloadResult> {
        let filename = target.file_name();
        let attempt: AppResult<(DownloadStatus, Option<String>)> = async {
            if let Some(parent) = target.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let (action, reason) =
                Self::prepare_download_action(target, self.context.config.overwrite_existing);
            if action == DownloadAction::Skip {
                return Ok((DownloadStatus::Skipped, Some(reason)));
            }
            debug!("downloading '{}': {}", filename, reason);

            self.courtesy_delay().await?;
            self.fetch_to_file(target, &filename).await?;

            if let Some(caption_path) = &target.caption_path {
                let cues = caption::convert_file(&target.path, caption_path)?;
                fs::remove_file(&target.path)?;
                info!("'{}' -> '{}' ({} cues)", filename, caption_path.display(), cues);
            }
            Ok((DownloadStatus::Success, None))
        }
        .await;

        match attempt {
            Ok((status, message)) => Ok(DownloadResult {
                filename,
                status,
                message,
            }),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                error!("download of '{}' from {} failed: {}", filename, target.url, e);
                Ok(DownloadResult {
                    filename,
                    status: DownloadStatus::from(&e),
                    message: Some(e.to_string()),
                })
            }
        }
    }

    /// A target is done when its final file (the caption, for subtitle
    /// tracks) exists and is not empty.
    pub(super) fn prepare_download_action(
        target: &DownloadTarget,
        overwrite_existing: bool,
    ) -> (DownloadAction, String) {
        let final_path = target.final_path();
        if !final_path.exists() {
            return (DownloadAction::DownloadNew, "file does not exist".to_string());
        }
        if overwrite_existing {
            info!("forced re-download of {:?}", final_path);
            return (DownloadAction::DownloadNew, "forced re-download".to_string());
        }
        if !utils::is_nonempty_file(final_path) {
            return (DownloadAction::DownloadNew, "existing file is empty".to_string());
        }
        let size = final_path.metadata().map(|m| m.len()).unwrap_or(0);
        (
            DownloadAction::Skip,
            format!("file already exists ({})", HumanBytes(size)),
        )
    }

    /// Random pause between `min_delay` and `max_delay`; cut short by Ctrl+C.
    async fn courtesy_delay(&self) -> AppResult<()> {
        let config = &self.context.config;
        if config.max_delay.is_zero() {
            return Ok(());
        }
        let millis = rand::rng()
            .random_range(config.min_delay.as_millis() as u64..=config.max_delay.as_millis() as u64);
        debug!("waiting {} ms before the next download", millis);

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(millis)) => Ok(()),
            _ = self.context.cancellation.cancelled() => Err(AppError::UserInterrupt),
        }
    }

    async fn fetch_to_file(&self, target: &DownloadTarget, filename: &str) -> AppResult<()> {
        let res = self.context.http_client.get_asset(&target.url).await?;

        if !res.status().is_success() {
            let status_error = res.error_for_status_ref().err();
            let body = res.text().await.unwrap_or_default();
            if body.contains(constants::SIGNATURE_MISMATCH_MARKER) {
                return Err(AppError::AssetNotYetAvailable(target.url.clone()));
            }
            return match status_error {
                Some(e) => Err(AppError::Network(e)),
                None => Err(AppError::Other(anyhow::anyhow!("unexpected response for {}", target.url))),
            };
        }

        let dir = target.path.parent().unwrap_or(Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        let mut watch = MarkerWatch::new(constants::SIGNATURE_MISMATCH_MARKER.as_bytes());
        let pbar = ui::new_download_bar(res.content_length(), filename);

        let mut stream = res.bytes_stream();
        while let Some(chunk) = stream.next().await {
            if self.context.cancellation.is_cancelled() {
                pbar.abandon();
                return Err(AppError::UserInterrupt);
            }
            let chunk = chunk?;
            watch.feed(&chunk);
            tmp.write_all(&chunk)?;
            pbar.inc(chunk.len() as u64);
        }
        pbar.finish_and_clear();

        if watch.found() {
            warn!("'{}' answered with a signature mismatch, discarding it", target.url);
            return Err(AppError::AssetNotYetAvailable(target.url.clone()));
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&target.path)?;
        debug!("saved {:?}", target.path);
        Ok(())
    }
}

/// Looks for a byte marker across a sequence of chunks, including matches
/// split between two chunks.
struct MarkerWatch<'m> {
    marker: &'m [u8],
    tail: Vec<u8>,
    found: bool,
}

impl<'m> MarkerWatch<'m> {
    fn new(marker: &'m [u8]) -> Self {
        Self {
            marker,
            tail: Vec::new(),
            found: false,
        }
    }

    fn feed(&mut self, chunk: &[u8]) {
        if self.found || self.marker.is_empty() {
            return;
        }
        let keep = self.marker.len() - 1;

        let mut seam = self.tail.clone();
        seam.extend_from_slice(&chunk[..chunk.len().min(keep)]);
        if contains(&seam, self.marker) || contains(chunk, self.marker) {
            self.found = true;
            return;
        }

        if chunk.len() >= keep {
            self.tail = chunk[chunk.len() - keep..].to_vec();
        } else {
            self.tail.extend_from_slice(chunk);
            let excess = self.tail.len().saturating_sub(keep);
            self.tail.drain(..excess);
        }
    }

    fn found(&self) -> bool {
        self.found
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::MediaKind;
    use std::path::PathBuf;

    #[test]
    fn test_marker_split_across_chunks() {
        let mut watch = MarkerWatch::new(b"signature");
        watch.feed(b"<Error>The request sig");
        assert!(!watch.found());
        watch.feed(b"na");
        assert!(!watch.found());
        watch.feed(b"ture we calculated</Error>");
        assert!(watch.found());
    }

    #[test]
    fn test_marker_absent() {
        let mut watch = MarkerWatch::new(b"signature");
        for chunk in [&b"plain "[..], b"video ", b"bytes sig", b"nal"] {
            watch.feed(chunk);
        }
        assert!(!watch.found());
    }

    #[test]
    fn test_prepare_download_action() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("01_c_1.mp4");
        let target = DownloadTarget {
            url: "https://v/1/download".into(),
            path: video.clone(),
            kind: MediaKind::Video,
            caption_path: None,
        };

        let (action, _) = TaskProcessor::prepare_download_action(&target, false);
        assert_eq!(action, DownloadAction::DownloadNew);

        fs::write(&video, "").unwrap();
        let (action, reason) = TaskProcessor::prepare_download_action(&target, false);
        assert_eq!(action, DownloadAction::DownloadNew);
        assert!(reason.contains("empty"));

        fs::write(&video, "data").unwrap();
        assert_eq!(
            TaskProcessor::prepare_download_action(&target, false).0,
            DownloadAction::Skip
        );
        assert_eq!(
            TaskProcessor::prepare_download_action(&target, true).0,
            DownloadAction::DownloadNew
        );
    }

    #[test]
    fn test_subtitle_is_done_when_caption_exists() {
        let dir = tempfile::tempdir().unwrap();
        let srt = dir.path().join("01_c_1.srt");
        fs::write(&srt, "1\n").unwrap();
        let target = DownloadTarget {
            url: "https://s/en.vtt".into(),
            path: dir.path().join("01_en.vtt"),
            kind: MediaKind::SubtitleTrack,
            caption_path: Some(PathBuf::from(&srt)),
        };
        assert_eq!(
            TaskProcessor::prepare_download_action(&target, false).0,
            DownloadAction::Skip
        );
    }
}
