use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use exiframe::metadata::{self, MetadataValue, Properties, keys};
use exiframe::{config, pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "exiframe",
    version,
    about = "Read camera and lens EXIF metadata and print framed photo captions"
)]
struct Cli {
    /// Image files or directories to process
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initialize a default config.json and exit
    #[arg(long)]
    init: bool,

    /// Show the 35mm-equivalent focal length
    #[arg(long = "35mm")]
    focal_length_35mm: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Display the decoded metadata tree and exit
    #[arg(long = "show-exif")]
    show_exif: bool,

    /// List the known metadata keys and exit
    #[arg(long)]
    keys: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = config::Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => config::Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    // Handle --keys
    if cli.keys {
        print_keys();
        return Ok(());
    }

    if cli.paths.is_empty() {
        anyhow::bail!("No input files or directories specified. Use --help for usage.");
    }

    let images = pipeline::collect_images(&cli.paths);
    if images.is_empty() {
        anyhow::bail!("No supported image files found in the specified paths.");
    }

    // Handle --show-exif
    if cli.show_exif {
        let failed = show_all_exif(&images, print_full_exif);
        if failed > 0 {
            log::warn!("{failed} of {} file(s) could not be read", images.len());
        }
        return Ok(());
    }

    // Load config, CLI flags win
    let mut config = config::Config::load(cli.config.as_deref())?;
    if cli.focal_length_35mm {
        config.display.show_focal_length_in_35mm_film = true;
    }
    if cli.json {
        config.output.json = true;
    }

    log::info!("Found {} image(s) to process", images.len());

    let mut results = Vec::new();
    let total = images.len();

    for (i, image_path) in images.iter().enumerate() {
        log::info!(
            "[{}/{}] Processing: {}",
            i + 1,
            total,
            image_path.display()
        );

        let result = pipeline::process_image(image_path, &config).await;

        if let Some(ref err) = result.error {
            log::error!("  Error: {err}");
        } else if !config.output.json {
            println!();
            println!("{BOLD}{}{RESET}", image_path.display());
            for line in result.caption.lines() {
                println!("  {line}");
            }
        }

        results.push(result);
    }

    // JSON output
    if config.output.json {
        let json_results: Vec<serde_json::Value> = results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "path": r.path.display().to_string(),
                    "exif": r.exif,
                    "caption": r.caption,
                    "lines": r.caption.lines(),
                    "error": r.error,
                })
            })
            .collect();

        println!("{}", serde_json::to_string_pretty(&json_results)?);
    }

    // Summary
    let success = results.iter().filter(|r| r.exif.is_some()).count();
    let undecoded = results
        .iter()
        .filter(|r| r.error.is_none() && r.exif.is_none())
        .count();
    let failed = results.iter().filter(|r| r.error.is_some()).count();
    log::info!(
        "Done: {success} decoded, {undecoded} without metadata, {failed} failed out of {total} images"
    );

    Ok(())
}

// ANSI color codes
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Max width for the value column before wrapping.
const VAL_WIDTH: usize = 46;
/// Indent for continuation lines (tag column width + " : " = 25 chars + 2 leading spaces).
const INDENT: &str = "                           ";

/// Print the key registry as a table.
fn print_keys() {
    println!("{BOLD}{:<32} {:<12}{RESET}", "Key", "Type");
    println!("{DIM}{}{RESET}", "─".repeat(46));
    for descriptor in keys::all() {
        println!("{:<32} {:<12}", descriptor.path(), descriptor.kind.to_string());
    }
}

/// Run `print` over every image, logging and skipping files that fail.
/// Returns how many failed.
fn show_all_exif(images: &[PathBuf], print: impl Fn(&Path) -> Result<()>) -> usize {
    let mut failed = 0;
    for image_path in images {
        if let Err(e) = print(image_path) {
            log::error!("{}: {e:#}", image_path.display());
            failed += 1;
        }
    }
    failed
}

/// Print the decoded properties tree for a file, one section per dictionary.
fn print_full_exif(path: &Path) -> Result<()> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    println!();
    println!("{BOLD}File:{RESET} {}", path.display());
    println!("{DIM}{}{RESET}", "═".repeat(72));

    let properties = match metadata::decode(&bytes) {
        Ok(properties) => properties,
        Err(e) => {
            println!("  {DIM}({e}){RESET}");
            println!();
            return Ok(());
        }
    };

    // --- Image Properties ---
    let top_level: Vec<(&str, &MetadataValue)> = [
        keys::top_level::PIXEL_WIDTH,
        keys::top_level::PIXEL_HEIGHT,
        keys::top_level::ORIENTATION,
        keys::top_level::DPI_WIDTH,
        keys::top_level::DPI_HEIGHT,
    ]
    .into_iter()
    .filter_map(|key| properties.get(key).map(|value| (key, value)))
    .collect();
    if !top_level.is_empty() {
        println!("  {BOLD}Image Properties{RESET}");
        println!("  {DIM}{}{RESET}", "─".repeat(70));
        for (tag, val) in &top_level {
            print_row(tag, &val.to_string());
        }
        println!();
    }

    // --- Dictionaries ---
    let mut has_any = false;
    for dictionary in keys::dictionary::ALL {
        let Some(group) = properties
            .get(dictionary.name)
            .and_then(MetadataValue::as_dictionary)
        else {
            continue;
        };
        if group.is_empty() {
            continue;
        }
        has_any = true;
        print_group(dictionary.name, group);
    }

    if !has_any {
        println!("  {DIM}(no EXIF metadata found){RESET}");
        println!();
    }

    Ok(())
}

fn print_group(title: &str, group: &Properties) {
    println!("  {BOLD}{title}{RESET}");
    println!("  {DIM}{}{RESET}", "─".repeat(70));
    for (tag, val) in group {
        print_row(tag, &val.to_string());
    }
    println!();
}

/// Print a single row in the EXIF display table.
fn print_row(tag: &str, val: &str) {
    let tag_col = format!("{:<22}", tag);
    let lines = wrap_text(val, VAL_WIDTH);
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            println!("  {tag_col} : {line}");
        } else {
            println!("  {INDENT}{line}");
        }
    }
}

/// Wrap text at word boundaries to fit within max_width.
fn wrap_text(s: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in s.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.len() + 1 + word.len() <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(current_line);
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(s.to_string());
    }

    lines
}
