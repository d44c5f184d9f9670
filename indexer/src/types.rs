//! Shared types of the indexer subsystem.

use std::num::ParseFloatError;

use thiserror::Error;

use collector::CollectError;
use feed::PriceSample;

/// Sink for updated index values.
///
/// Called synchronously, once per known instrument per tick, while the
/// indexer holds its state lock; it is expected to return quickly and must
/// not panic.
pub type Handler = Box<dyn Fn(PriceSample) + Send + Sync>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IndexerError {
    /// Rejected at construction; a zero indexing interval cannot tick.
    #[error("indexing interval must be non-zero")]
    InvalidInterval,

    /// A collected sample carried text that does not parse as a decimal.
    #[error("invalid price text {value:?}")]
    Parse {
        value: String,
        source: ParseFloatError,
    },

    /// Collection failed; carries the first failing stream's error.
    #[error(transparent)]
    Collect(#[from] CollectError),

    /// The lifecycle context was cancelled, or a `stop` call was cancelled
    /// before its signal was accepted.
    #[error("indexer cancelled")]
    Cancelled,
}
