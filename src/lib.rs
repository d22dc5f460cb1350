// src/lib.rs

pub mod caption;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod downloader;
pub mod error;
pub mod models;
pub mod scanner;
pub mod scratch;
pub mod site;
pub mod symbols;
pub mod ui;
pub mod utils;

use crate::{
    cli::Cli,
    client::RobustClient,
    config::AppConfig,
    downloader::{CourseDownloader, DownloadManager},
    error::{AppError, AppResult},
    models::CourseRequest,
};
use colored::*;
use log::{debug, info};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Everything a download job needs, shared by cheap clones.
#[derive(Clone)]
pub struct DownloadJobContext {
    pub manager: DownloadManager,
    pub config: Arc<AppConfig>,
    pub http_client: Arc<RobustClient>,
    pub cancellation: CancellationToken,
}

impl DownloadJobContext {
    pub fn new(config: Arc<AppConfig>, cancellation: CancellationToken) -> AppResult<Self> {
        let http_client = Arc::new(RobustClient::new(config.clone())?);
        Ok(Self {
            manager: DownloadManager::new(),
            config,
            http_client,
            cancellation,
        })
    }
}

/// Entry point used by `main.rs`. Returns whether every file went through.
pub async fn run_from_cli(args: Arc<Cli>, cancellation: CancellationToken) -> AppResult<bool> {
    // the password is part of `args`, so only the harmless fields are logged
    debug!(
        "course={} run={} week={:?} types={:?} output={:?}",
        args.course, args.run, args.week, args.types, args.output
    );

    let config = Arc::new(AppConfig::new(&args)?);
    debug!("effective config: {:?}", config);

    let password = if args.password == "-" {
        ui::prompt_hidden(&format!("Password for {}", args.email))
            .map_err(|_| AppError::UserInterrupt)?
    } else {
        args.password.clone()
    };
    if password.is_empty() {
        return Err(AppError::UserInputError("The password must not be empty".to_string()));
    }

    let request = CourseRequest {
        email: args.email.clone(),
        password,
        course: args.course.clone(),
        run: args.run,
        week: args.week,
    };

    if !config.download {
        ui::box_message(
            "Dry run",
            &["Step pages are scanned, nothing is downloaded."],
            |s| s.cyan(),
        );
    }

    let context = DownloadJobContext::new(config, cancellation)?;
    let all_ok = CourseDownloader::new(context).run(&request).await?;
    info!("course {} run {} finished, all ok: {}", request.course, request.run, all_ok);
    Ok(all_ok)
}
