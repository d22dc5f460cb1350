// src/scanner/locator.rs

use super::{MediaKind, Page};
use crate::constants::markers;
use log::debug;

/// Where a candidate tag was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagHit {
    /// Start of the marker that carries the URL attribute
    /// (`<source src=` for videos).
    pub marker_pos: usize,
    /// First byte after the marker, where the quoted value should open.
    pub value_pos: usize,
}

impl TagHit {
    fn after(marker_pos: usize, marker: &str) -> Self {
        Self {
            marker_pos,
            value_pos: marker_pos + marker.len(),
        }
    }
}

/// Finds the next candidate tag for `kind` at or after `cursor`.
///
/// `None` ends the scan. For subtitle tracks this includes meeting a track
/// whose language is not English: that track and everything after it are
/// left alone.
pub fn locate(page: &Page<'_>, cursor: usize, kind: &MediaKind) -> Option<TagHit> {
    match kind {
        MediaKind::Document(_) => page
            .find(markers::ANCHOR_HREF, cursor)
            .map(|pos| TagHit::after(pos, markers::ANCHOR_HREF)),
        MediaKind::Video => {
            let video_pos = page.find(markers::VIDEO_TAG, cursor)?;
            let source_pos = page.find(markers::VIDEO_SOURCE, video_pos + markers::VIDEO_TAG.len());
            if source_pos.is_none() {
                debug!("<video> at {} has no <source src=>, scan complete", video_pos);
            }
            source_pos.map(|pos| TagHit::after(pos, markers::VIDEO_SOURCE))
        }
        MediaKind::SubtitleTrack => {
            let track_pos = page.find(markers::TRACK_DIV, cursor)?;
            match track_language(page, track_pos) {
                Some(lang) if !lang.eq_ignore_ascii_case("en") => {
                    debug!(
                        "track at {} has language '{}', ignoring it and all later tracks",
                        track_pos, lang
                    );
                    None
                }
                _ => Some(TagHit::after(track_pos, markers::TRACK_DIV)),
            }
        }
    }
}

/// First two characters of the `data-srclang` value belonging to the track
/// that starts at `track_pos`, if it declares one.
fn track_language<'p>(page: &'p Page<'_>, track_pos: usize) -> Option<&'p str> {
    let after_marker = track_pos + markers::TRACK_DIV.len();
    let next_track = page.find(markers::TRACK_DIV, after_marker).unwrap_or(usize::MAX);
    let attr_pos = page
        .find(markers::TRACK_SRCLANG, track_pos)
        .filter(|&pos| pos < next_track)?;

    let mut value_pos = attr_pos + markers::TRACK_SRCLANG.len();
    if matches!(page.lower().as_bytes().get(value_pos), Some(b'"' | b'\'')) {
        value_pos += 1;
    }
    // a value shorter than two characters can't be English
    Some(page.lower().get(value_pos..value_pos + 2).unwrap_or(""))
}
