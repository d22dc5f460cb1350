// src/caption.rs

//! WebVTT subtitle tracks to SubRip captions.

use crate::error::AppResult;
use log::debug;
use regex::Regex;
use std::{fs, path::Path, sync::LazyLock};

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2}:\d{2}:\d{2})\.(\d{3}\s+)-->(\s+\d{2}:\d{2}:\d{2})\.(\d{3}\s*)").unwrap()
});

/// Rewrites the lines of a WebVTT track as SubRip.
///
/// Timestamp lines get `,` before the milliseconds and a cue number on the
/// line before them. Text lines of a cue pass through unchanged and a blank
/// line closes the cue. Anything outside a cue (the `WEBVTT` header, notes)
/// is dropped.
pub fn convert<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    convert_counting(lines).0
}

fn convert_counting<I, S>(lines: I) -> (Vec<String>, usize)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = Vec::new();
    let mut cue_number = 0;
    let mut in_cue = false;

    for line in lines {
        let line = line.as_ref();
        let timestamps = TIMESTAMP_RE.captures(line);
        if timestamps.is_none() && !in_cue {
            continue;
        }
        if !in_cue {
            cue_number += 1;
            out.push(cue_number.to_string());
            in_cue = true;
        }
        match timestamps {
            Some(c) => out.push(format!("{},{}-->{},{}", &c[1], &c[2], &c[3], c[4].trim())),
            None => {
                if line.trim().is_empty() {
                    in_cue = false;
                }
                out.push(line.to_string());
            }
        }
    }
    (out, cue_number)
}

/// Converts the track at `vtt_path` into `srt_path`; returns the number of cues.
pub fn convert_file(vtt_path: &Path, srt_path: &Path) -> AppResult<usize> {
    let source = fs::read_to_string(vtt_path)?;
    let (converted, cues) = convert_counting(source.lines());

    // a cue-less track leaves an empty file, which the next run fetches again
    let mut body = converted.join("\n");
    if cues > 0 {
        body.push('\n');
    }
    fs::write(srt_path, body)?;
    debug!(
        "converted '{}' into '{}' ({} cues)",
        vtt_path.display(),
        srt_path.display(),
        cues
    );
    Ok(cues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_cue_gets_number_one() {
        let out = convert(["00:01:02.345 --> 00:01:05.678"]);
        assert_eq!(out, vec!["1", "00:01:02,345 --> 00:01:05,678"]);
    }

    #[test]
    fn test_full_track() {
        let vtt = "WEBVTT\n\nNOTE produced by the player\n\n00:00:01.000 --> 00:00:04.500 align:start\nWelcome to the course.\n\n00:00:05.000  -->  00:00:07.250\nIn this week\nwe look at data.\n\n";
        let out = convert(vtt.lines());
        assert_eq!(
            out,
            vec![
                "1",
                "00:00:01,000 --> 00:00:04,500",
                "Welcome to the course.",
                "",
                "2",
                "00:00:05,000  -->  00:00:07,250",
                "In this week",
                "we look at data.",
                "",
            ]
        );
    }

    #[test]
    fn test_converted_lines_are_not_recognised_again() {
        // SubRip punctuation does not match the WebVTT pattern, so a
        // converted file run through again loses its cues
        let out = convert(["1", "00:00:01,000 --> 00:00:02,000", "text", ""]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_cue_without_trailing_blank_line() {
        let out = convert(["00:00:01.000 --> 00:00:02.000", "last words"]);
        assert_eq!(out, vec!["1", "00:00:01,000 --> 00:00:02,000", "last words"]);
    }

    #[test]
    fn test_convert_file_counts_cues() {
        let dir = tempfile::tempdir().unwrap();
        let vtt = dir.path().join("track.vtt");
        let srt = dir.path().join("video.srt");
        fs::write(
            &vtt,
            "WEBVTT\r\n\r\n00:00:01.000 --> 00:00:02.000\r\nOne\r\n\r\n00:00:03.000 --> 00:00:04.000\r\nTwo\r\n",
        )
        .unwrap();

        assert_eq!(convert_file(&vtt, &srt).unwrap(), 2);
        let written = fs::read_to_string(&srt).unwrap();
        assert_eq!(
            written,
            "1\n00:00:01,000 --> 00:00:02,000\nOne\n\n2\n00:00:03,000 --> 00:00:04,000\nTwo\n"
        );
    }

    #[test]
    fn test_track_without_cues_leaves_empty_caption() {
        let dir = tempfile::tempdir().unwrap();
        let vtt = dir.path().join("track.vtt");
        let srt = dir.path().join("video.srt");
        fs::write(&vtt, "WEBVTT\n\nNOTE nothing said yet\n").unwrap();

        assert_eq!(convert_file(&vtt, &srt).unwrap(), 0);
        assert_eq!(fs::metadata(&srt).unwrap().len(), 0);
        assert!(!crate::utils::is_nonempty_file(&srt));
    }
}
