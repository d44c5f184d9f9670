use clap::Parser;

#[derive(Debug, Parser)]
#[clap(name = "indexer", version)]
pub struct Cli {
    /// Instruments to index (comma-separated ids)
    #[clap(long, value_delimiter = ',', default_value = "BTC_USD")]
    pub instruments: Vec<String>,

    /// Indexing interval in milliseconds
    #[clap(long, default_value = "1000")]
    pub interval_ms: u64,

    /// Emission period of the simulated price source in milliseconds
    #[clap(long, default_value = "1")]
    pub tick_every_ms: u64,

    /// How long to run before stopping, in seconds; 0 runs until Ctrl-C
    #[clap(long, default_value = "10")]
    pub run_for_secs: u64,

    /// Emit indexed prices as JSON lines instead of plain text
    #[clap(long)]
    pub json: bool,
}
