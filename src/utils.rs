// src/utils.rs

use crate::{constants::files, constants::markers, error::*};
use anyhow::anyhow;
use std::path::Path;

/// Last path segment of `url`, without query string or fragment.
pub fn url_basename(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

/// Local name for a linked document or a subtitle track.
///
/// `%20` becomes `_`; any other percent escape is refused rather than
/// guessed at.
pub fn asset_file_name(url: &str) -> AppResult<String> {
    let base = url_basename(url);
    if base.is_empty() {
        return Err(AppError::Other(anyhow!("no file name in url '{}'", url)));
    }
    let name = base.replace("%20", "_");
    if name.contains('%') {
        return Err(AppError::UnhandledEscapeSequence(base.to_string()));
    }
    Ok(name)
}

/// Local name for a video: `<course>_<id>.mp4`, where `id` is the path
/// segment just before `/download`.
pub fn video_file_name(course: &str, url: &str) -> AppResult<String> {
    let marker = format!("/{}", markers::VIDEO_DOWNLOAD_SUFFIX);
    let head = match url.rfind(&marker) {
        Some(pos) => &url[..pos],
        None => url,
    };
    let id = url_basename(head);
    if id.is_empty() {
        return Err(AppError::Other(anyhow!("no video id in url '{}'", url)));
    }
    Ok(format!("{}_{}.{}", course, id, files::VIDEO_EXT))
}

pub fn is_nonempty_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file() && m.len() > 0).unwrap_or(false)
}

pub fn truncate_text(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut end_pos = 0;
    for (i, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > max_width.saturating_sub(3) {
            end_pos = i;
            break;
        }
    }
    if end_pos == 0 { text.to_string() } else { format!("{}...", &text[..end_pos]) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_file_name() {
        assert_eq!(
            asset_file_name("https://cdn.example.com/docs/Week%201%20notes.pdf").unwrap(),
            "Week_1_notes.pdf"
        );
        assert_eq!(asset_file_name("https://x/en.vtt?sig=abc").unwrap(), "en.vtt");

        let err = asset_file_name("https://x/a%2Cb.pdf").unwrap_err();
        assert!(matches!(err, AppError::UnhandledEscapeSequence(ref n) if n == "a%2Cb.pdf"));
        assert!(asset_file_name("https://x/dir/").is_err());
    }

    #[test]
    fn test_video_file_name() {
        assert_eq!(
            video_file_name("intro-to-x", "https://v.example.com/2088550/download/hd").unwrap(),
            "intro-to-x_2088550.mp4"
        );
        assert_eq!(
            video_file_name("c", "https://v.example.com/2088550/download").unwrap(),
            "c_2088550.mp4"
        );
    }

    #[test]
    fn test_is_nonempty_file() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty");
        let full = dir.path().join("full");
        std::fs::write(&empty, "").unwrap();
        std::fs::write(&full, "x").unwrap();
        assert!(!is_nonempty_file(&empty));
        assert!(is_nonempty_file(&full));
        assert!(!is_nonempty_file(&dir.path().join("missing")));
        assert!(!is_nonempty_file(dir.path()));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdefghijkl", 10), "abcdefg...");
    }
}
