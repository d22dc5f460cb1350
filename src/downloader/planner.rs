// src/downloader/planner.rs

use crate::{
    constants::files,
    error::AppResult,
    models::DownloadTarget,
    scanner::{AcceptedUrl, MediaKind},
    utils,
};
use std::path::{Path, PathBuf};

/// Per-week naming state.
///
/// The file counter runs across every step of a week, so files keep the
/// order in which they appear in the course. A subtitle track does not take
/// a number of its own; it is written as a caption of the most recent video.
#[derive(Debug)]
pub struct ScanContext {
    course: String,
    week_dir: PathBuf,
    file_counter: u32,
    last_video: Option<PathBuf>,
}

impl ScanContext {
    pub fn new(output_root: &Path, course: &str, week_number: u32) -> Self {
        Self {
            course: course.to_string(),
            week_dir: output_root.join(course).join(format!("Week_{:02}", week_number)),
            file_counter: 0,
            last_video: None,
        }
    }

    pub fn week_dir(&self) -> &Path {
        &self.week_dir
    }

    pub fn file_counter(&self) -> u32 {
        self.file_counter
    }

    pub fn plan(&mut self, accepted: &AcceptedUrl) -> AppResult<DownloadTarget> {
        let url = &accepted.url;
        let name = match &accepted.kind {
            MediaKind::Video => utils::video_file_name(&self.course, url)?,
            _ => utils::asset_file_name(url)?,
        };
        if accepted.kind.takes_file_number() {
            self.file_counter += 1;
        }
        let path = self.week_dir.join(format!("{:02}_{}", self.file_counter, name));

        let caption_path = match &accepted.kind {
            MediaKind::Video => {
                self.last_video = Some(path.clone());
                None
            }
            MediaKind::SubtitleTrack => Some(
                self.last_video
                    .as_deref()
                    .unwrap_or(&path)
                    .with_extension(files::CAPTION_EXT),
            ),
            MediaKind::Document(_) => None,
        };

        Ok(DownloadTarget {
            url: url.clone(),
            path,
            kind: accepted.kind.clone(),
            caption_path,
        })
    }
}
