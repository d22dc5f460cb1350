// src/ui.rs

use crate::{constants, symbols, utils};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

pub fn print_header(title: &str) {
    println!("\n{}", "═".repeat(constants::UI_WIDTH));
    println!(" {}", title.cyan().bold());
    println!("{}", "═".repeat(constants::UI_WIDTH));
}

pub fn print_sub_header(title: &str) {
    println!("\n--- {} ---", title.bold());
}

pub fn box_message(title: &str, content: &[&str], color_func: fn(ColoredString) -> ColoredString) {
    println!("\n┌{}┐", "─".repeat(constants::UI_WIDTH - 2));
    println!("  {}", color_func(title.bold()));
    println!("├{}┤", "─".repeat(constants::UI_WIDTH - 2));
    for line in content {
        println!("  {}", line);
    }
    println!("└{}┘", "─".repeat(constants::UI_WIDTH - 2));
}

pub fn prompt_hidden(message: &str) -> io::Result<String> {
    print!("\n>>> {}: ", message);
    io::stdout().flush()?;
    rpassword::read_password()
}

/// Blocks until the user presses return.
pub fn pause(message: &str) -> io::Result<()> {
    print!("{} {} (press return, {} to stop) ", *symbols::INFO, message, *symbols::CTRL_C);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(())
}

/// Lists the URLs found on a step page, grouped under their media type.
pub fn print_found_urls(kind: &str, urls: &[&str]) {
    println!("  {} {} ({}):", *symbols::INFO, kind.bold(), urls.len());
    for url in urls {
        println!("    - {}", utils::truncate_text(url, constants::URL_TRUNCATE_LENGTH));
    }
}

/// Byte progress for a single download; falls back to a spinner when the
/// server sends no length.
pub fn new_download_bar(total: Option<u64>, name: &str) -> ProgressBar {
    let pbar = match total {
        Some(len) => {
            let pbar = ProgressBar::new(len);
            pbar.set_style(
                ProgressStyle::with_template(
                    "  {msg:40!} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
            );
            pbar
        }
        None => {
            let pbar = ProgressBar::new_spinner();
            pbar.set_style(
                ProgressStyle::with_template("  {spinner:.green} {msg:40!} {bytes} ({bytes_per_sec})")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pbar.enable_steady_tick(Duration::from_millis(120));
            pbar
        }
    };
    pbar.set_message(name.to_string());
    pbar
}
