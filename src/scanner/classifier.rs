// src/scanner/classifier.rs

use super::{MediaKind, Page, locator::TagHit};
use crate::constants::markers;
use log::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Accepted { url: String, is_hd: bool },
    Rejected(&'static str),
}

/// Turns a protocol-relative URL (`//host/path`) into an absolute https one.
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{}", url)
    } else {
        url.to_string()
    }
}

/// Decides whether `url`, read at `tag`, is a `kind` asset.
pub fn classify(url: &str, kind: &MediaKind, page: &Page<'_>, tag: &TagHit) -> Classification {
    if url.is_empty() {
        return Classification::Rejected("empty value");
    }
    match kind {
        MediaKind::Document(ext) => match document_url(url, ext) {
            Some(url) => Classification::Accepted { url, is_hd: false },
            None => Classification::Rejected("extension does not match"),
        },
        MediaKind::Video => {
            let is_hd = has_hd_variant(page, tag.marker_pos);
            match video_download_url(url, is_hd) {
                Some(url) => Classification::Accepted { url, is_hd },
                None => Classification::Rejected("video url too short"),
            }
        }
        MediaKind::SubtitleTrack => Classification::Accepted {
            url: url.to_string(),
            is_hd: false,
        },
    }
}

/// Accepts `*.ext`, or `*.ext` followed by a 15 character signing token
/// which is then dropped.
pub fn document_url(url: &str, ext: &str) -> Option<String> {
    let suffix = format!(".{}", ext.to_ascii_lowercase());
    if url.to_ascii_lowercase().ends_with(&suffix) {
        return Some(url.to_string());
    }
    let cut = char_offset_from_end(url, markers::SIGNED_SUFFIX_LEN)?;
    let head = &url[..cut];
    head.to_ascii_lowercase()
        .ends_with(&suffix)
        .then(|| head.to_string())
}

/// Whether `data-hd-src=` occurs in the bytes just before the `<source>` tag.
pub fn has_hd_variant(page: &Page<'_>, source_pos: usize) -> bool {
    let from = source_pos.saturating_sub(markers::HD_LOOKBEHIND);
    let needle = markers::VIDEO_HD_SRC.as_bytes();
    page.lower().as_bytes()[from..source_pos]
        .windows(needle.len())
        .any(|w| w == needle)
}

/// `…/<id>/video` becomes `…/<id>/download`, plus `/hd` for the HD variant.
pub fn video_download_url(url: &str, is_hd: bool) -> Option<String> {
    if !url.ends_with(markers::VIDEO_URL_SUFFIX) {
        debug!("video url '{}' does not end in '{}'", url, markers::VIDEO_URL_SUFFIX);
    }
    let cut = char_offset_from_end(url, markers::VIDEO_URL_SUFFIX.len())?;
    let mut rewritten = format!("{}{}", &url[..cut], markers::VIDEO_DOWNLOAD_SUFFIX);
    if is_hd {
        rewritten.push_str(markers::VIDEO_HD_SUFFIX);
    }
    Some(rewritten)
}

/// Byte offset where the last `n` characters of `s` begin.
fn char_offset_from_end(s: &str, n: usize) -> Option<usize> {
    if n == 0 {
        return Some(s.len());
    }
    s.char_indices().rev().nth(n - 1).map(|(i, _)| i)
}
