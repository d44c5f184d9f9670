//! Pull-based, cancellable access to one asynchronous price feed.
//!
//! A `Stream` turns an arbitrary producer into a single operation:
//! `get` suspends until the next sample, the next producer failure, or
//! cancellation — whichever comes first — and returns exactly one outcome.

pub mod chan_stream;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use feed::{PriceSample, SourceError};

pub use chan_stream::ChanStream;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StreamError {
    /// Failure delivered by the producer on its error channel.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The producer dropped its side of the subscription.
    #[error("price source closed")]
    SourceClosed,

    /// The caller's cancellation token fired before an outcome arrived.
    #[error("stream get cancelled")]
    Cancelled,
}

/// Pull interface over one price feed.
///
/// A single `get` call never retries: one call, one outcome. The caller
/// decides whether to call again.
#[async_trait]
pub trait Stream: Send + Sync {
    async fn get(&self, cancel: &CancellationToken) -> Result<PriceSample, StreamError>;
}
