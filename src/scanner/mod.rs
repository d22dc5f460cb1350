// src/scanner/mod.rs

//! Marker-based extraction of media URLs from raw step-page markup.
//!
//! The site's markup is scanned as plain text: a marker locates a tag, the
//! quoted attribute after it is read, and the value is classified for the
//! requested media kind. No DOM is built.

pub mod classifier;
pub mod locator;
pub mod quoted;

use crate::{constants::markers, error::*};
use classifier::Classification;
use log::{debug, trace, warn};
use std::{borrow::Cow, collections::HashSet, fmt, ops::Range, str::FromStr};

/// What a scan is looking for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// A linked file with the given (lowercase) extension, e.g. `pdf`.
    Document(String),
    Video,
    SubtitleTrack,
}

impl MediaKind {
    /// The short name used on the command line and in reports.
    pub fn label(&self) -> &str {
        match self {
            MediaKind::Document(ext) => ext,
            MediaKind::Video => "mp4",
            MediaKind::SubtitleTrack => "vtt",
        }
    }

    /// Text that must occur somewhere in the page for a scan to be worth running.
    fn hint(&self) -> &str {
        match self {
            MediaKind::Document(ext) => ext,
            MediaKind::Video => markers::VIDEO_MIME,
            MediaKind::SubtitleTrack => markers::TRACK_HINT,
        }
    }

    /// Whether an accepted URL of this kind takes a slot in the file numbering.
    pub fn takes_file_number(&self) -> bool {
        !matches!(self, MediaKind::SubtitleTrack)
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ext = s.trim().trim_start_matches('.').to_ascii_lowercase();
        if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(format!("invalid media type '{}'", s));
        }
        Ok(match ext.as_str() {
            "mp4" => MediaKind::Video,
            "vtt" => MediaKind::SubtitleTrack,
            _ => MediaKind::Document(ext),
        })
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A raw attribute value and where it sat in the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub raw: String,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedUrl {
    pub url: String,
    pub kind: MediaKind,
    /// Only ever set for videos.
    pub is_hd: bool,
    /// Span of the quoted value in the normalized page.
    pub span: Range<usize>,
}

/// How a scan reacts to markup that breaks the expected conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanPolicy {
    /// Malformed markup aborts with `MalformedMarkup`.
    #[default]
    Strict,
    /// Malformed candidates are logged and skipped.
    BestEffort,
}

/// A step page prepared for scanning.
///
/// `raw` has every `\"` replaced by `"`; this is the only rewrite the
/// content ever goes through. `lower` is its ASCII-lowercase twin, so byte
/// offsets are interchangeable between the two.
pub struct Page<'a> {
    raw: Cow<'a, str>,
    lower: String,
}

impl<'a> Page<'a> {
    pub fn new(content: &'a str) -> Self {
        let raw = if content.contains("\\\"") {
            Cow::Owned(content.replace("\\\"", "\""))
        } else {
            Cow::Borrowed(content)
        };
        let lower = raw.to_ascii_lowercase();
        Self { raw, lower }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn lower(&self) -> &str {
        &self.lower
    }

    /// Case-insensitive search for an already lowercase `needle` from `from`.
    pub(crate) fn find(&self, needle: &str, from: usize) -> Option<usize> {
        self.lower.get(from..)?.find(needle).map(|i| from + i)
    }
}

/// Scans one page for any number of media kinds.
pub struct Scanner<'a> {
    page: Page<'a>,
    policy: ScanPolicy,
}

impl<'a> Scanner<'a> {
    pub fn new(content: &'a str, policy: ScanPolicy) -> Self {
        Self {
            page: Page::new(content),
            policy,
        }
    }

    /// Returns the accepted URLs for `kind` in page order, without duplicates.
    pub fn scan(&self, kind: &MediaKind) -> AppResult<Vec<AcceptedUrl>> {
        let mut accepted = Vec::new();
        if !self.page.lower().contains(kind.hint()) {
            trace!("page never mentions '{}', skipping {} scan", kind.hint(), kind);
            return Ok(accepted);
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut cursor = 0;

        while let Some(tag) = locator::locate(&self.page, cursor, kind) {
            let candidate = match self.read_candidate(tag.value_pos) {
                Ok(candidate) => candidate,
                Err(e) if self.policy == ScanPolicy::BestEffort => {
                    warn!("skipping malformed {} candidate: {}", kind, e);
                    if quoted::has_quote_at(self.page.raw(), tag.value_pos) {
                        // unterminated: nothing after this point can be closed
                        break;
                    }
                    cursor = tag.value_pos;
                    continue;
                }
                Err(e) => return Err(e),
            };
            cursor = candidate.span.end;

            let url = classifier::normalize_url(&candidate.raw);
            match classifier::classify(&url, kind, &self.page, &tag) {
                Classification::Accepted { url, is_hd } => {
                    if seen.insert(url.clone()) {
                        debug!("accepted {} url: {}", kind, url);
                        accepted.push(AcceptedUrl {
                            url,
                            kind: kind.clone(),
                            is_hd,
                            span: candidate.span,
                        });
                    } else {
                        trace!("duplicate {} url ignored: {}", kind, url);
                    }
                }
                Classification::Rejected(reason) => {
                    trace!("rejected {} candidate '{}': {}", kind, url, reason);
                }
            }
        }
        Ok(accepted)
    }

    fn read_candidate(&self, value_pos: usize) -> AppResult<Candidate> {
        let (raw, end) = quoted::extract_quoted(self.page.raw(), value_pos)?;
        Ok(Candidate {
            raw,
            span: value_pos..end,
        })
    }
}

/// Convenience wrapper for a single kind.
pub fn scan(content: &str, kind: &MediaKind, policy: ScanPolicy) -> AppResult<Vec<AcceptedUrl>> {
    Scanner::new(content, policy).scan(kind)
}
