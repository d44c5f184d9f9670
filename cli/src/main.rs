pub mod cli;
pub mod source;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use collector::StreamCollector;
use common::init_logger;
use feed::{Instrument, PriceSource};
use indexer::{Handler, Indexer};
use stream::{ChanStream, Stream};

use cli::Cli;
use source::RandomSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger("indexer-cli");

    let cli = Cli::parse();
    anyhow::ensure!(cli.tick_every_ms > 0, "--tick-every-ms must be non-zero");

    let source = RandomSource::new(Duration::from_millis(cli.tick_every_ms));

    let mut streams: Vec<Arc<dyn Stream>> = Vec::with_capacity(cli.instruments.len());
    for id in &cli.instruments {
        let (samples, errors) = source.subscribe(Instrument::new(id.clone()));
        streams.push(Arc::new(ChanStream::new(samples, errors)));
    }

    let collector = Arc::new(StreamCollector::new(streams));
    let handler = build_handler(cli.json);

    let indexer = Indexer::new(collector, handler, Duration::from_millis(cli.interval_ms))
        .context("failed to build indexer")?;

    let cancel = CancellationToken::new();
    indexer.clone().start(cancel.clone());

    if cli.run_for_secs == 0 {
        tokio::signal::ctrl_c().await?;
        tracing::info!("shutdown signal received");
    } else {
        tokio::time::sleep(Duration::from_secs(cli.run_for_secs)).await;
    }

    indexer.stop(CancellationToken::new()).await?;

    if let Some(err) = indexer.last_error().await {
        return Err(err).context("indexer terminated abnormally");
    }

    Ok(())
}

fn build_handler(json: bool) -> Handler {
    if json {
        Box::new(|price| match serde_json::to_string(&price) {
            Ok(line) => println!("{line}"),
            Err(err) => tracing::warn!(error = %err, "failed to encode indexed price"),
        })
    } else {
        Box::new(|price| {
            println!(
                "instrument = {}\ntimestamp = {}\nindex = {}\n",
                price.instrument,
                price.observed_at.timestamp(),
                price.value
            );
        })
    }
}
