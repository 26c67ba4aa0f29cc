use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use snapmark::capture::CaptureContext;
use snapmark::config::Config;
use snapmark::export::{ClipboardExporter, Exporter, PngFileExporter};
use snapmark::session::OverlaySession;

#[derive(Parser)]
#[command(name = "snapmark")]
#[command(about = "Multi-monitor capture with arrow, rectangle and text annotations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List capture backends and the desktop geometry (default)
    Backends,
    /// Capture the whole desktop to a PNG file
    Capture {
        /// Output path; defaults to a timestamped file in the configured folder
        path: Option<PathBuf>,
    },
    /// Print the configuration file path and its contents
    Config,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::load();
    let mut context = CaptureContext::system(&config);

    match cli.command.unwrap_or(Commands::Backends) {
        Commands::Backends => {
            println!("{}", context.backend_report());
            println!("Desktop geometry: {:?}", context.virtual_geometry());
        }
        Commands::Capture { path } => {
            let session = OverlaySession::start(&mut context, &config)
                .context("Failed to capture the desktop")?;
            let capture = session.capture();
            let exporter = match path {
                Some(path) => PngFileExporter::new(path),
                None => PngFileExporter::for_location(config.save_location)?,
            };
            let dest = exporter.export(capture.rgba())?;
            println!("{}x{} desktop saved to {dest}", capture.width(), capture.height());

            if config.copy_to_clipboard_on_save
                && let Err(err) = ClipboardExporter::default().export(capture.rgba())
            {
                log::warn!("Failed to copy capture to clipboard: {err}");
            }
        }
        Commands::Config => {
            let Some(path) = Config::path() else {
                bail!("No configuration directory available");
            };
            if !path.exists() {
                config.save();
            }
            println!("{}", path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
