// src/config.rs

pub mod file;

use self::file::load_external_config;
use crate::{
    cli::Cli,
    constants,
    error::{AppError, AppResult},
    scanner::{MediaKind, ScanPolicy},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};
use url::Url;

fn default_base_url() -> String {
    constants::DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub connect_timeout_secs: Option<u64>,
    /// Longest silence allowed while reading a response.
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub user_agent: Option<String>,
}

/// Contents of `~/.futurelearn-dl/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExternalConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
    pub media_kinds: Vec<MediaKind>,
    pub output_root: PathBuf,
    pub scratch_root: PathBuf,
    pub overwrite_existing: bool,
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub download: bool,
    pub scan_policy: ScanPolicy,
    pub pause: bool,
    pub verbose: bool,
    pub keep_debug_pages: bool,
}

impl AppConfig {
    pub fn new(args: &Cli) -> AppResult<Self> {
        let external_config = load_external_config()?;
        Self::from_parts(args, external_config)
    }

    pub fn from_parts(args: &Cli, external_config: ExternalConfig) -> AppResult<Self> {
        if args.min_delay > args.max_delay {
            return Err(AppError::UserInputError(format!(
                "--min-delay ({}) must not exceed --max-delay ({})",
                args.min_delay, args.max_delay
            )));
        }
        let network = external_config.network;
        let base_url = external_config.site.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)?;

        Ok(Self {
            base_url,
            user_agent: network
                .user_agent
                .unwrap_or_else(|| constants::USER_AGENT.to_string()),
            connect_timeout: Duration::from_secs(network.connect_timeout_secs.unwrap_or(10)),
            timeout: Duration::from_secs(network.timeout_secs.unwrap_or(60)),
            max_retries: network.max_retries.unwrap_or(0),
            media_kinds: args.types.clone(),
            output_root: args.output.clone(),
            scratch_root: args.temp_dir.clone().unwrap_or_else(std::env::temp_dir),
            overwrite_existing: args.force_redownload,
            min_delay: Duration::from_secs(args.min_delay),
            max_delay: Duration::from_secs(args.max_delay),
            download: !args.dry_run,
            scan_policy: if args.best_effort {
                ScanPolicy::BestEffort
            } else {
                ScanPolicy::Strict
            },
            pause: args.pause,
            verbose: args.verbose,
            keep_debug_pages: args.debug,
        })
    }
}

#[cfg(feature = "testing")]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_BASE_URL.to_string(),
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            max_retries: 0,
            media_kinds: vec![
                MediaKind::Document("pdf".to_string()),
                MediaKind::Video,
                MediaKind::SubtitleTrack,
            ],
            output_root: PathBuf::from(constants::DEFAULT_OUTPUT_DIR),
            scratch_root: std::env::temp_dir(),
            overwrite_existing: false,
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            download: true,
            scan_policy: ScanPolicy::Strict,
            pause: false,
            verbose: false,
            keep_debug_pages: false,
        }
    }
}
