//! # Carousel Simulator
//!
//! Runs a hosted testimonial carousel against a scripted input session and
//! prints every transition.
//!
//! ```bash
//! carousel-sim --cards deck.json --script session.json --json
//! ```

use std::path::PathBuf;
use std::time::Duration;

use carousel_core::{Card, Transition, ViewportClass};
use carousel_host::{
    demo_deck, load_deck, CarouselHost, HostConfig, Script, TransitionRecord,
};
use clap::Parser;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for carousel-sim.
#[derive(Debug, Parser)]
#[command(name = "carousel-sim")]
#[command(about = "Drive a testimonial carousel through a scripted session")]
#[command(version)]
struct Args {
    /// Host configuration file (JSON)
    #[arg(long, env = "CAROUSEL_CONFIG")]
    config: Option<PathBuf>,

    /// Deck of cards (JSON array); a built-in deck is used when absent
    #[arg(long, env = "CAROUSEL_CARDS")]
    cards: Option<PathBuf>,

    /// Viewport class, overriding the configuration file
    #[arg(long, env = "CAROUSEL_VIEWPORT")]
    viewport: Option<ViewportClass>,

    /// Total session length in milliseconds
    #[arg(long, env = "CAROUSEL_DURATION_MS", default_value = "15000")]
    duration_ms: u64,

    /// Input script (JSON); a built-in demo script is used when absent
    #[arg(long, env = "CAROUSEL_SCRIPT")]
    script: Option<PathBuf>,

    /// Print transitions as JSON lines instead of log output
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,carousel_host=debug,carousel_core=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    // Use JSON format in production (RUST_LOG_FORMAT=json)
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

fn report(record: &TransitionRecord, cards: &[Card], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(record)?);
        return Ok(());
    }
    match record.transition {
        Transition::Accepted { from, to, source } => tracing::info!(
            at_ms = record.at_ms,
            ?source,
            "{} -> {} (focus: {})",
            cards[from].name,
            cards[to].name,
            cards[record.focused_index].name
        ),
        Transition::Dropped { source, reason } => {
            tracing::info!(at_ms = record.at_ms, ?source, ?reason, "Navigation dropped");
        }
        Transition::Ignored => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => HostConfig::load(path)?,
        None => HostConfig::default(),
    }
    .with_env_overrides();
    if let Some(viewport) = args.viewport {
        config.viewport = viewport;
    }
    config.carousel.validate()?;

    let cards = match &args.cards {
        Some(path) => load_deck(path)?,
        None => demo_deck(),
    };
    let script = match &args.script {
        Some(path) => Script::load(path)?,
        None => Script::demo(),
    };

    tracing::info!(
        cards = cards.len(),
        viewport = ?config.viewport,
        steps = script.steps().len(),
        duration_ms = args.duration_ms,
        "Starting carousel simulation"
    );

    let host = CarouselHost::spawn(cards.clone(), &config)?;
    let mut log = host.transitions();
    let origin = Instant::now();
    let end = origin + Duration::from_millis(args.duration_ms);

    let printer = {
        let json = args.json;
        tokio::spawn(async move {
            loop {
                match log.recv().await {
                    Ok(record) => report(&record, &cards, json)?,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Transition log lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            anyhow::Ok(())
        })
    };

    for step in script.steps() {
        let at = origin + Duration::from_millis(step.at_ms);
        if at > end {
            break;
        }
        tokio::time::sleep_until(at).await;
        let outcome = host.send(step.input.clone()).await?;
        tracing::debug!(at_ms = step.at_ms, input = ?step.input, ?outcome, "Script step");
    }
    tokio::time::sleep_until(end).await;

    let snapshot = host.snapshot();
    host.shutdown().await?;
    printer.await??;

    tracing::info!(
        active_index = snapshot.state.active_index,
        focused_index = snapshot.focused_index,
        "Simulation finished"
    );
    Ok(())
}
