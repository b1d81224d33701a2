//! indexguard replay CLI
//!
//! Replays a recorded stream of cluster-metadata events through a
//! reconciliation loop backed by the in-memory alias transport, then
//! optionally routes a batch of documents against the resulting snapshot.
//!
//! # Usage
//!
//! ```bash
//! # Replay events (one JSON cluster-changed event per line)
//! cargo run --bin indexguard-replay -- --events events.jsonl
//!
//! # With a config file and documents to route
//! cargo run --bin indexguard-replay -- --config indexguard.yaml \
//!     --events events.jsonl --documents docs.jsonl
//! ```

use anyhow::Context;
use clap::Parser;
use indexguard_reconciler::{
    IndexGuardConfig, IngestDocument, InMemoryAliasClient, ProcessorFactory, ReconcileOutcome,
    ReconciliationLoop,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "indexguard-replay")]
#[command(about = "Replay cluster-metadata events through the write-alias reconciler", long_about = None)]
struct Cli {
    /// Configuration file (YAML v1); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON-lines file of cluster-metadata events
    #[arg(short, long)]
    events: PathBuf,

    /// JSON-lines file of documents to route after the replay
    #[arg(short, long)]
    documents: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct ReplaySummary {
    events: usize,
    ignored: usize,
    follower: usize,
    satisfied: usize,
    submitted: usize,
    failed_submissions: usize,
}

fn read_lines(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => IndexGuardConfig::from_yaml(path)
            .with_context(|| format!("invalid config {}", path.display()))?,
        None => IndexGuardConfig::default(),
    };

    let client = InMemoryAliasClient::new_in_memory();
    let reconciler =
        ReconciliationLoop::from_config(&config, Arc::new(client.clone()), Handle::current())?;

    let mut summary = ReplaySummary::default();
    let mut tickets = Vec::new();

    for (line_no, line) in read_lines(&cli.events)?.iter().enumerate() {
        let outcome = reconciler
            .handle_json_event(line)
            .with_context(|| format!("{}:{}: invalid event", cli.events.display(), line_no + 1))?;
        summary.events += 1;

        match outcome {
            ReconcileOutcome::Ignored => summary.ignored += 1,
            ReconcileOutcome::Follower => summary.follower += 1,
            ReconcileOutcome::Satisfied => summary.satisfied += 1,
            ReconcileOutcome::Submitted(ticket) => {
                summary.submitted += 1;
                tickets.push(ticket);
            }
        }
    }

    for outcome in futures::future::join_all(tickets.into_iter().map(|t| t.outcome())).await {
        if !outcome?.is_acknowledged() {
            summary.failed_submissions += 1;
        }
    }

    eprintln!(
        "Replayed {} events: {} ignored, {} as follower, {} satisfied, {} submitted ({} failed), final version {}",
        summary.events,
        summary.ignored,
        summary.follower,
        summary.satisfied,
        summary.submitted,
        summary.failed_submissions,
        reconciler.store().version()
    );

    for request in client.requests() {
        println!("{}", serde_json::to_string(&request)?);
    }

    if let Some(path) = &cli.documents {
        let processor = ProcessorFactory::new(&config, reconciler.store()).create("replay");

        for (line_no, line) in read_lines(path)?.iter().enumerate() {
            let value: serde_json::Value = serde_json::from_str(line)
                .with_context(|| format!("{}:{}: invalid document", path.display(), line_no + 1))?;
            let mut document = IngestDocument::from_value(value)?;

            match processor.execute(&mut document) {
                Ok(()) => println!("{}", serde_json::to_string(&document.into_value())?),
                Err(e) => warn!("{}:{}: document rejected: {}", path.display(), line_no + 1, e),
            }
        }
    }

    Ok(())
}
