// src/downloader/job.rs

use super::{ScanContext, task_processor::TaskProcessor};
use crate::{
    DownloadJobContext, constants,
    error::*,
    models::{CourseRequest, DownloadResult, DownloadStatus, DownloadTarget},
    scanner::{AcceptedUrl, MediaKind, ScanPolicy, Scanner},
    scratch::ScratchDir,
    site::{CourseUrls, auth, course},
    symbols, ui, utils,
};
use itertools::Itertools;
use log::{debug, info, warn};
use std::fs;

/// Picks the weeks to process; `week` is 1-based.
pub fn select_weeks(week_ids: &[String], week: Option<u32>) -> AppResult<Vec<(u32, String)>> {
    match week {
        None => Ok(week_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (i as u32 + 1, id.clone()))
            .collect()),
        Some(n) => {
            let id = (n as usize)
                .checked_sub(1)
                .and_then(|i| week_ids.get(i))
                .ok_or_else(|| {
                    AppError::UserInputError(format!(
                        "No such week as {} (the course has {})",
                        n,
                        week_ids.len()
                    ))
                })?;
            Ok(vec![(n, id.clone())])
        }
    }
}

/// Walks a course run: sign in, weeks, steps, then every media URL on
/// every step page.
pub struct CourseDownloader {
    context: DownloadJobContext,
}

impl CourseDownloader {
    pub fn new(context: DownloadJobContext) -> Self {
        Self { context }
    }

    /// Returns whether every file and step page went through.
    pub async fn run(&self, request: &CourseRequest) -> AppResult<bool> {
        let config = &self.context.config;
        let client = &self.context.http_client;
        let scratch = ScratchDir::create(&config.scratch_root, config.keep_debug_pages)?;
        debug!("page dumps go to {:?}", scratch.path());

        auth::login(client, &config.base_url, &request.email, &request.password, &scratch).await?;

        let urls = CourseUrls::new(&config.base_url, &request.course, request.run);
        let week_ids = course::fetch_week_ids(client, &urls, &scratch).await?;
        let weeks = select_weeks(&week_ids, request.week)?;

        fs::create_dir_all(&config.output_root)?;
        let absolute_path = dunce::canonicalize(&config.output_root)?;
        info!("saving under \"{}\"", absolute_path.display());
        println!(
            "\n{} Files will be saved under \"{}\"",
            *symbols::INFO,
            absolute_path.display()
        );

        for (week_number, week_id) in weeks {
            self.check_cancelled()?;
            ui::print_header(&format!(
                "{} run {}, week {}",
                request.course, request.run, week_number
            ));

            let step_ids = course::fetch_step_ids(client, &urls, &week_id, &scratch).await?;
            let mut scan_context = ScanContext::new(&config.output_root, &request.course, week_number);
            debug!("week {} -> {:?}", week_number, scan_context.week_dir());

            for step_id in &step_ids {
                self.check_cancelled()?;
                self.process_step(&urls, step_id, &mut scan_context, &scratch).await?;
                if config.pause {
                    ui::pause(&format!("Step {} done.", step_id))?;
                }
            }
        }

        self.context.manager.print_report();
        Ok(self.context.manager.did_all_succeed())
    }

    async fn process_step(
        &self,
        urls: &CourseUrls,
        step_id: &str,
        scan_context: &mut ScanContext,
        scratch: &ScratchDir,
    ) -> AppResult<()> {
        let config = &self.context.config;
        let step_url = urls.step(step_id);
        ui::print_sub_header(&format!("Step {}", step_id));

        let content = match self.context.http_client.get_page(&step_url).await {
            Ok((status, content)) if status.is_success() => content,
            Ok((status, _)) => {
                println!("{} Step page {} answered HTTP {}, skipping it.", *symbols::WARN, step_url, status);
                self.context
                    .manager
                    .record_page_failure(&step_url, &format!("HTTP {}", status.as_u16()));
                return Ok(());
            }
            Err(e) if !e.is_fatal() => {
                println!("{} Could not fetch step page {}: {}", *symbols::WARN, step_url, e);
                self.context.manager.record_page_failure(&step_url, &e.to_string());
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        scratch.save(
            &format!("course.{}.s{}.response.content", urls.course, step_id),
            &content,
        )?;

        let found = Self::scan_step(&content, config.scan_policy, &config.media_kinds)?;
        if config.verbose {
            for (kind, group) in &found.iter().chunk_by(|a| a.kind.label().to_string()) {
                let urls: Vec<&str> = group.map(|a| a.url.as_str()).collect();
                ui::print_found_urls(&kind, &urls);
            }
        }
        if found.is_empty() {
            println!("{} Nothing to download on this step.", *symbols::INFO);
            return Ok(());
        }

        let processor = TaskProcessor::new(self.context.clone());
        for accepted in &found {
            self.check_cancelled()?;
            let target = scan_context.plan(accepted)?;
            if !config.download {
                self.print_planned(&target);
                continue;
            }
            let result = processor.process(&target).await?;
            self.record(&target, &result);
        }
        Ok(())
    }

    /// Every requested kind in order, scanned over the same page.
    fn scan_step(
        content: &str,
        policy: ScanPolicy,
        kinds: &[MediaKind],
    ) -> AppResult<Vec<AcceptedUrl>> {
        let scanner = Scanner::new(content, policy);
        let mut found = Vec::new();
        for kind in kinds {
            found.extend(scanner.scan(kind)?);
        }
        Ok(found)
    }

    fn print_planned(&self, target: &DownloadTarget) {
        self.context.manager.record_planned();
        let dest = target.final_path();
        println!(
            "  {} {} -> {}",
            *symbols::PLANNED,
            utils::truncate_text(&target.url, constants::URL_TRUNCATE_LENGTH),
            dest.display()
        );
    }

    fn record(&self, target: &DownloadTarget, result: &DownloadResult) {
        let manager = &self.context.manager;
        let (symbol, color, text) = result.status.get_display_info();
        match result.status {
            DownloadStatus::Success => manager.record_success(),
            DownloadStatus::Skipped => manager.record_skip(
                &result.filename,
                result.message.as_deref().unwrap_or("file already exists"),
            ),
            DownloadStatus::NotYetAvailable => manager.record_unavailable(&result.filename),
            status => manager.record_failure(&result.filename, status),
        }
        let name = target.final_path().file_name().map_or_else(
            || result.filename.clone(),
            |n| n.to_string_lossy().into_owned(),
        );
        match (&result.status, &result.message) {
            (DownloadStatus::Success | DownloadStatus::Skipped, _) | (_, None) => {
                println!("  {} {} ({})", symbol, name, color(text.into()))
            }
            (_, Some(message)) => {
                println!("  {} {} ({}: {})", symbol, name, color(text.into()), message);
                warn!("{}: {}", name, message);
            }
        }
    }

    fn check_cancelled(&self) -> AppResult<()> {
        if self.context.cancellation.is_cancelled() {
            return Err(AppError::UserInterrupt);
        }
        Ok(())
    }
}
