//! Tick-driven price indexing engine.
//!
//! The `Indexer` owns the whole aggregation lifecycle:
//!   • a fixed-interval clock driving periodic collection
//!   • a per-instrument running-average table
//!   • a caller-supplied handler receiving every updated index
//!
//! Responsibilities:
//!   • Start/Stop lifecycle, race-safe and idempotent
//!   • one `index` run per tick: collect → fold → report
//!   • fatal-on-first-error termination, last error retained

pub mod average;
pub mod engine;
pub mod types;

pub use average::RunningAverage;
pub use engine::Indexer;
pub use types::{Handler, IndexerError};
