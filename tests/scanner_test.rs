// tests/scanner_test.rs

use futurelearn_dl::downloader::ScanContext;
use futurelearn_dl::error::AppError;
use futurelearn_dl::scanner::{MediaKind, ScanPolicy, Scanner, scan};
use std::path::{Path, PathBuf};

const STEP_PAGE: &str = include_str!("fixtures/step_page.html");

fn urls(kind: &MediaKind) -> Vec<String> {
    scan(STEP_PAGE, kind, ScanPolicy::Strict)
        .unwrap()
        .into_iter()
        .map(|a| a.url)
        .collect()
}

#[test]
fn test_documents_from_step_page() {
    assert_eq!(
        urls(&MediaKind::Document("pdf".into())),
        vec![
            "https://ugc.futurelearn.com/uploads/files/ab/cd/Week%201%20reading.pdf",
            "https://ugc.futurelearn.com/uploads/files/ef/01/slides.PDF",
        ]
    );
    assert!(urls(&MediaKind::Document("docx".into())).is_empty());
}

#[test]
fn test_hd_video_from_escaped_player_payload() {
    let found = scan(STEP_PAGE, &MediaKind::Video, ScanPolicy::Strict).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].url, "https://view.vzaar.com/2088550/download/hd");
    assert!(found[0].is_hd);
}

#[test]
fn test_only_leading_english_tracks_are_taken() {
    // the French track ends the scan, so the en-GB track after it is never seen
    assert_eq!(
        urls(&MediaKind::SubtitleTrack),
        vec!["https://ugc.futurelearn.com/uploads/captions/2088550_en.vtt"]
    );
}

#[test]
fn test_unquoted_attribute_policies() {
    let page = format!("{}\n<a href=/broken.pdf>broken</a>", STEP_PAGE);
    let pdf = MediaKind::Document("pdf".into());

    let err = scan(&page, &pdf, ScanPolicy::Strict).unwrap_err();
    assert!(matches!(err, AppError::MalformedMarkup { .. }));

    let found = scan(&page, &pdf, ScanPolicy::BestEffort).unwrap();
    assert_eq!(found.len(), 2);
}

#[test]
fn test_planned_paths_for_a_step() {
    let scanner = Scanner::new(STEP_PAGE, ScanPolicy::Strict);
    let mut ctx = ScanContext::new(Path::new("out"), "intro-to-data", 1);

    let mut planned = Vec::new();
    for kind in [
        MediaKind::Document("pdf".into()),
        MediaKind::Video,
        MediaKind::SubtitleTrack,
    ] {
        for accepted in scanner.scan(&kind).unwrap() {
            planned.push(ctx.plan(&accepted).unwrap());
        }
    }

    let week = PathBuf::from("out/intro-to-data/Week_01");
    let paths: Vec<PathBuf> = planned.iter().map(|t| t.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            week.join("01_Week_1_reading.pdf"),
            week.join("02_slides.PDF"),
            week.join("03_intro-to-data_2088550.mp4"),
            week.join("03_2088550_en.vtt"),
        ]
    );
    assert_eq!(
        planned[3].caption_path,
        Some(week.join("03_intro-to-data_2088550.srt"))
    );
}
