mod bus;
mod config;
mod consumer;
mod ingest;
mod models;
mod processor;
mod queue;
mod types;

use std::io::{BufWriter, Write, stderr, stdout};
use std::process::exit;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

use crate::bus::{EventBusClient, InMemoryBroker};
use crate::config::Config;
use crate::consumer::{OutcomeConsumer, OutcomeHandler};
use crate::ingest::IngestEndpoint;
use crate::models::OutcomeEvent;
use crate::processor::{SimulatedSettlement, TransactionProcessor};
use crate::queue::InMemoryQueue;

/// Tallies outcome events so the run can report what the pipeline settled on.
struct PipelineReport {
    processed: AtomicUsize,
    failed: AtomicUsize
}

impl PipelineReport {
    fn new() -> Self {
        Self {
            processed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0)
        }
    }
}

#[async_trait]
impl OutcomeHandler for PipelineReport {
    async fn on_processed(&self, event: &OutcomeEvent) -> Result<()> {
        self.processed.fetch_add(1, Ordering::Relaxed);
        info!("Outcome received: {} processed by {}", event.transaction_id, event.processor_id);

        Ok(())
    }

    async fn on_failed(&self, event: &OutcomeEvent) -> Result<()> {
        self.failed.fetch_add(1, Ordering::Relaxed);
        warn!("Outcome received: {} failed", event.transaction_id);

        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    //NOTE: If I was making a much more sophisticated CLI application, I would have used the clap crate
    //      to handle the CLI parsing and execution.
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: async-transaction-pipeline [input].jsonl [log_level:optional] > [output]");
        eprintln!("Each input line is one transaction submission body (empty lines are skipped)");
        eprintln!("Available log levels: error, warn, info, debug, trace (default: error)");
        exit(1);
    }

    let path = &args[1];
    let log_level = args.get(2)
        .map(|s| parse_log_level(s)).unwrap_or_else(|| LevelFilter::ERROR);

    setup_logging(log_level);

    let config = Config::from_env();
    info!(
        "Starting pipeline [{}] against brokers {:?}, queue {}, region {}",
        config.client_id, config.broker_addresses, config.queue_url, config.region
    );

    let broker = Arc::new(InMemoryBroker::new());
    let queue = Arc::new(InMemoryQueue::new());
    let bus = Arc::new(EventBusClient::new(broker.clone(), config.client_id.clone()));

    bus.connect().await?;

    let report = Arc::new(PipelineReport::new());
    let subscription = OutcomeConsumer::new(bus.clone(), config.consumer_group_id.clone(), report.clone())
        .run().await?;

    let endpoint = IngestEndpoint::new(queue.clone());
    let processor = TransactionProcessor::new(queue, bus.clone(), Arc::new(SimulatedSettlement::new()));

    let timer = Instant::now();
    let submissions = submit_input(&endpoint, path).await?;
    processor.run_until_drained().await?;
    let duration = timer.elapsed();

    info!("Drained {submissions} submission(s) in: {duration:?}");

    bus.disconnect().await;
    broker.shutdown();
    subscription.await?;

    println!(
        "outcomes: processed={} failed={}",
        report.processed.load(Ordering::Relaxed),
        report.failed.load(Ordering::Relaxed)
    );

    Ok(())
}

/// Feeds each input line through the ingestion endpoint and writes one
/// `status body` response line per submission.
async fn submit_input<Q: queue::WorkQueue>(endpoint: &IngestEndpoint<Q>, path: &str) -> Result<usize> {
    let input = std::fs::read_to_string(path)?;
    let mut output = BufWriter::new(stdout().lock());
    let mut submissions = 0;

    for line in input.lines() {
        let body = line.trim();

        if body.is_empty() {
            continue;
        }

        let response = endpoint.handle(Some(body)).await;
        writeln!(output, "{} {}", response.status_code, response.body)?;
        submissions += 1;
    }

    output.flush()?;

    Ok(submissions)
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: Because we are doing stdout redirection, we will need to utilize stderr to display logging
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}
