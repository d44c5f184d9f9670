//! Synchronized fan-out over a set of price streams.
//!
//! One `collect` call asks every registered stream for its next value
//! concurrently and either returns a value for all of them, in registration
//! order, or the first failure — never a partial result.

pub mod stream_collector;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use feed::PriceSample;
use stream::StreamError;

pub use stream_collector::StreamCollector;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CollectError {
    /// First failing stream's error; the remaining fan-out was cancelled.
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// A fan-out task died without producing an outcome.
    #[error("collection task failed: {0}")]
    Join(String),
}

/// Gathers one sample from every registered stream.
#[async_trait]
pub trait Collector: Send + Sync {
    async fn collect(&self, cancel: CancellationToken) -> Result<Vec<PriceSample>, CollectError>;
}
