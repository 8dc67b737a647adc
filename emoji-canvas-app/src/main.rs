//! # Emoji Canvas App
//!
//! Headless demo host for the emoji canvas document controller. Owns the
//! controller for its whole lifetime (there is no global document), applies
//! a scripted set of intents, resolves the background, and prints the
//! resulting snapshot.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

use emoji_canvas_core::Background;
use emoji_canvas_document::{DocumentController, FetchStatus};
use emoji_canvas_loader::HttpFetcher;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "emoji-canvas", version, about)]
struct Args {
    /// Background to set: an http(s) URL or a local image file path.
    #[arg(long, env = "EMOJI_CANVAS_BACKGROUND")]
    background: Option<String>,

    /// Seed the document with the sample emojis.
    #[arg(long)]
    sample: bool,
}

/// Initialize structured tracing.
///
/// Set `RUST_LOG` to control log levels. Set `RUST_LOG_FORMAT=json` for
/// JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,emoji_canvas_document=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Interpret the `--background` argument as a background value.
fn parse_background(arg: &str) -> anyhow::Result<Background> {
    if arg.starts_with("http://") || arg.starts_with("https://") {
        return Ok(Background::Url(Url::parse(arg)?));
    }
    let path = PathBuf::from(arg);
    let bytes = std::fs::read(&path)?;
    tracing::info!("Read {} background bytes from {}", bytes.len(), path.display());
    Ok(Background::ImageData(bytes))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let fetcher = Arc::new(HttpFetcher::new());
    let mut controller = DocumentController::new(fetcher);

    if args.sample {
        controller.add_emoji("🐹", -200, 200, 80.0);
        controller.add_emoji("🦄", 50, 100, 40.0);
    }

    if let Some(arg) = &args.background {
        controller.set_background(parse_background(arg)?);
        if controller.fetch_status() == FetchStatus::Fetching {
            tracing::info!("Waiting for background fetch");
            controller.run_until_idle().await;
        }
    }

    let snapshot = controller.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot.emojis)?);
    match &snapshot.background_image {
        Some(image) => {
            tracing::info!(
                "Background {} resolved to {}x{} image",
                snapshot.background,
                image.width,
                image.height
            );
        }
        None => tracing::info!("Background {} has no image", snapshot.background),
    }

    Ok(())
}
