// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const URL_TRUNCATE_LENGTH: usize = 70;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const SCRATCH_DIR_NAME: &str = "FUTURELEARN_DL";
pub const DEFAULT_OUTPUT_DIR: &str = ".";
pub const DEFAULT_BASE_URL: &str = "https://www.futurelearn.com";
pub const DEFAULT_MEDIA_TYPES: &str = "pdf,mp4,vtt";
pub const DEFAULT_MIN_DELAY_SECS: u64 = 10;
pub const DEFAULT_MAX_DELAY_SECS: u64 = 25;
pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/29.0.1547.62 Safari/537.36";

/// Tokens shorter than this mean the sign-in page changed shape.
pub const MIN_AUTH_TOKEN_LEN: usize = 88;

/// Body text returned by the asset store when a signed URL is not valid (yet).
pub const SIGNATURE_MISMATCH_MARKER: &str = "The request signature we calculated";

pub mod site {
    pub const SIGN_IN_PATH: &str = "/sign-in";
    pub const AUTH_TOKEN_MARKER: &str = "authenticity_token";
    pub const AUTH_VALUE_MARKER: &str = "value=";
}

pub mod markers {
    pub const ANCHOR_HREF: &str = "<a href=";
    pub const VIDEO_TAG: &str = "<video";
    pub const VIDEO_SOURCE: &str = "<source src=";
    pub const VIDEO_HD_SRC: &str = "data-hd-src=";
    pub const VIDEO_MIME: &str = "video/mp4";
    pub const TRACK_DIV: &str = "<div class=\"track\" data-src=";
    pub const TRACK_SRCLANG: &str = "data-srclang=";
    pub const TRACK_HINT: &str = "vtt";

    /// How far before `<source src=` the HD attribute may appear.
    pub const HD_LOOKBEHIND: usize = 150;
    /// Length of the trailing token some signed document URLs carry.
    pub const SIGNED_SUFFIX_LEN: usize = 15;
    pub const VIDEO_URL_SUFFIX: &str = "video";
    pub const VIDEO_DOWNLOAD_SUFFIX: &str = "download";
    pub const VIDEO_HD_SUFFIX: &str = "/hd";
}

pub mod files {
    pub const VIDEO_EXT: &str = "mp4";
    pub const CAPTION_EXT: &str = "srt";
}
