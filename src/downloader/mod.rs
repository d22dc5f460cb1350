// src/downloader/mod.rs

mod job;
mod planner;
mod task_processor;

pub use job::CourseDownloader;
pub use planner::ScanContext;

use crate::{models::DownloadStatus, symbols, ui};
use colored::*;
use log::{info, warn};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct DownloadStats {
    pub total: usize,
    pub success: usize,
    pub skipped: usize,
    pub unavailable: usize,
    pub failed: usize,
    /// Step pages that could not be fetched.
    pub pages_failed: usize,
    /// Targets listed by a dry run.
    pub planned: usize,
}

/// Run-wide tally of what happened to every target.
#[derive(Clone)]
pub struct DownloadManager {
    stats: Arc<Mutex<DownloadStats>>,
    failed_downloads: Arc<Mutex<Vec<(String, String)>>>,
    skipped_downloads: Arc<Mutex<Vec<(String, String)>>>,
}

impl Default for DownloadManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadManager {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(Mutex::new(DownloadStats::default())),
            failed_downloads: Arc::new(Mutex::new(Vec::new())),
            skipped_downloads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn record_success(&self) {
        let mut stats = self.stats.lock().unwrap();
        stats.total += 1;
        stats.success += 1;
    }

    pub fn record_skip(&self, filename: &str, reason: &str) {
        info!("skipped '{}': {}", filename, reason);
        {
            let mut stats = self.stats.lock().unwrap();
            stats.total += 1;
            stats.skipped += 1;
        }
        self.skipped_downloads
            .lock()
            .unwrap()
            .push((filename.to_string(), reason.to_string()));
    }

    /// The asset store refused the signed URL; a later run may succeed.
    pub fn record_unavailable(&self, filename: &str) {
        warn!("'{}' is not available yet", filename);
        {
            let mut stats = self.stats.lock().unwrap();
            stats.total += 1;
            stats.unavailable += 1;
        }
        let (_, _, msg) = DownloadStatus::NotYetAvailable.get_display_info();
        self.skipped_downloads
            .lock()
            .unwrap()
            .push((filename.to_string(), msg.to_string()));
    }

    pub fn record_failure(&self, filename: &str, status: DownloadStatus) {
        log::error!("download of '{}' failed with status {:?}", filename, status);
        {
            let mut stats = self.stats.lock().unwrap();
            stats.total += 1;
            stats.failed += 1;
        }
        let (_, _, msg) = status.get_display_info();
        self.failed_downloads
            .lock()
            .unwrap()
            .push((filename.to_string(), msg.to_string()));
    }

    pub fn record_page_failure(&self, url: &str, reason: &str) {
        warn!("step page {} skipped: {}", url, reason);
        self.stats.lock().unwrap().pages_failed += 1;
        self.failed_downloads
            .lock()
            .unwrap()
            .push((url.to_string(), format!("step page: {}", reason)));
    }

    pub fn record_planned(&self) {
        self.stats.lock().unwrap().planned += 1;
    }

    pub fn get_stats(&self) -> DownloadStats {
        self.stats.lock().unwrap().clone()
    }

    pub fn did_all_succeed(&self) -> bool {
        let stats = self.stats.lock().unwrap();
        stats.failed == 0 && stats.pages_failed == 0
    }

    pub fn print_report(&self) {
        let stats = self.get_stats();
        let skipped = self.skipped_downloads.lock().unwrap();
        let failed = self.failed_downloads.lock().unwrap();
        info!("download report: {:?}", stats);

        if !skipped.is_empty() || !failed.is_empty() {
            ui::print_sub_header("Details");
            if !skipped.is_empty() {
                println!(
                    "\n{} Skipped ({}):",
                    *symbols::INFO,
                    stats.skipped + stats.unavailable
                );
                print_grouped_report(&skipped, |s| s.cyan());
            }
            if !failed.is_empty() {
                println!(
                    "\n{} Failed ({}):",
                    *symbols::ERROR,
                    stats.failed + stats.pages_failed
                );
                print_grouped_report(&failed, |s| s.red());
            }
        }

        ui::print_sub_header("Summary");
        if stats.planned > 0 {
            println!("{} {} file(s) would be downloaded.", *symbols::INFO, stats.planned);
        } else if stats.total > 0 && stats.success + stats.skipped == stats.total && stats.pages_failed == 0 {
            println!(
                "{} All {} file(s) done ({} already present).",
                *symbols::OK,
                stats.total,
                stats.skipped
            );
        } else if stats.total == 0 && stats.pages_failed == 0 {
            println!("{} Nothing to download.", *symbols::INFO);
        } else {
            let summary = format!(
                "{} | {} | {} | {}",
                format!("Downloaded: {}", stats.success).green(),
                format!("Failed: {}", stats.failed + stats.pages_failed).red(),
                format!("Not yet available: {}", stats.unavailable).yellow(),
                format!("Skipped: {}", stats.skipped).cyan()
            );
            println!("{}", summary);
        }
    }
}

fn print_grouped_report(items: &[(String, String)], color_fn: fn(ColoredString) -> ColoredString) {
    let mut grouped: HashMap<&String, Vec<&String>> = HashMap::new();
    for (filename, reason) in items {
        grouped.entry(reason).or_default().push(filename);
    }
    let mut sorted_reasons: Vec<_> = grouped.keys().collect();
    sorted_reasons.sort();
    for reason in sorted_reasons {
        println!("  - {}", color_fn(format!("Reason: {}", reason).into()));
        let mut filenames = grouped[reason].clone();
        filenames.sort();
        for filename in filenames {
            println!("    - {}", filename);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_accumulate() {
        let manager = DownloadManager::new();
        manager.record_success();
        manager.record_skip("01_a.pdf", "file already exists");
        manager.record_unavailable("02_c_1.mp4");
        manager.record_failure("03_b.pdf", DownloadStatus::HttpError);

        let stats = manager.get_stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.success, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.unavailable, 1);
        assert_eq!(stats.failed, 1);
        assert!(!manager.did_all_succeed());
    }

    #[test]
    fn test_unavailable_is_not_a_failure() {
        let manager = DownloadManager::new();
        manager.record_success();
        manager.record_unavailable("02_c_1.mp4");
        assert!(manager.did_all_succeed());

        manager.record_page_failure("https://x/steps/9", "HTTP 404");
        assert!(!manager.did_all_succeed());
    }
}
