// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use futurelearn_dl::{
    cli::{Cli, LogLevel},
    constants,
    error::AppError,
    run_from_cli, symbols,
};
use log::{error, info, warn};
use std::{env, sync::Arc};
use tokio_util::sync::CancellationToken;

fn init_logger(level: LogLevel) {
    if level == LogLevel::Off {
        return;
    }

    let filter = match level {
        LogLevel::Off => log::LevelFilter::Off,
        LogLevel::Error => log::LevelFilter::Error,
        LogLevel::Warn => log::LevelFilter::Warn,
        LogLevel::Info => log::LevelFilter::Info,
        LogLevel::Debug => log::LevelFilter::Debug,
        LogLevel::Trace => log::LevelFilter::Trace,
    };

    let app_name = clap::crate_name!();

    let log_file_path = match dirs::home_dir() {
        Some(home) => home
            .join(constants::CONFIG_DIR_NAME)
            .join(constants::LOG_FILE_NAME),
        None => {
            eprintln!("warning: no home directory, logging into the temp directory");
            env::temp_dir().join(app_name).join(constants::LOG_FILE_NAME)
        }
    };

    if let Some(dir) = log_file_path.parent() {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("warning: could not create log directory {:?}: {}", dir, e);
        }
    }

    let file_appender = match fern::log_file(&log_file_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!(
                "warning: could not open log file {:?}: {}, trying the fallback",
                log_file_path, e
            );
            let fallback_path = env::temp_dir().join(format!(
                "{}-{}",
                app_name,
                constants::LOG_FALLBACK_FILE_NAME
            ));
            match fern::log_file(&fallback_path) {
                Ok(fb_file) => fb_file,
                Err(e_fb) => {
                    eprintln!(
                        "error: could not open fallback log file {:?}: {}, logging is off",
                        fallback_path, e_fb
                    );
                    return;
                }
            }
        }
    };

    let result = fern::Dispatch::new()
        .level(filter)
        // http stack stays at info at most
        .level_for("reqwest", filter.min(log::LevelFilter::Info))
        .level_for("hyper_util", filter.min(log::LevelFilter::Info))
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] [{:<5}] [{}:{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.line().unwrap_or(0),
                message
            ))
        })
        .chain(file_appender)
        .apply();

    if let Err(e) = result {
        eprintln!("warning: logger initialisation failed: {}", e);
    }
}

#[tokio::main]
async fn main() {
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }

    let after_help = format!(
        "Examples:\n  # Every week of run 2, password typed in without echo\n  {bin} me@example.com - intro-to-data 2\n\n  # Week 3 only, PDFs and videos, no waiting between files\n  {bin} me@example.com - intro-to-data 2 3 -t pdf,mp4 --min-delay 0 --max-delay 0\n\n  # See what would be downloaded\n  {bin} me@example.com - intro-to-data 2 --dry-run --verbose",
        bin = clap::crate_name!()
    );
    let cmd = Cli::command().after_help(after_help);
    let matches = cmd.get_matches();
    let args = match Cli::from_arg_matches(&matches) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };
    init_logger(args.log_level);

    let cancellation = CancellationToken::new();
    let handler_token = cancellation.clone();
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("cannot listen for Ctrl+C: {}", e);
                return;
            }
            if handler_token.is_cancelled() {
                println!("\nSecond interrupt, exiting now.");
                warn!("second Ctrl+C, forced exit");
                std::process::exit(130);
            }
            println!(
                "\n{} Stopping... Press {} again to exit immediately.",
                *symbols::WARN,
                *symbols::CTRL_C
            );
            warn!("Ctrl+C received, cancelling");
            handler_token.cancel();
        }
    });

    match run_from_cli(args, cancellation).await {
        Ok(_) => info!("finished normally"),
        Err(AppError::UserInterrupt) => {
            warn!("interrupted by user");
            eprintln!("\n{} {}", *symbols::WARN, "Interrupted.".yellow());
            std::process::exit(130);
        }
        Err(e) => {
            error!("run failed: {}", e);
            eprintln!("\n{} {}", *symbols::ERROR, e.to_string().red());
            std::process::exit(1);
        }
    }
}
