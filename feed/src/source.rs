use thiserror::Error;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::types::{Instrument, PriceSample};

/// Failure reported by a market-data producer on its error channel.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("price source failure: {0}")]
pub struct SourceError(pub String);

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Subscription interface a market-data producer implements.
///
/// A subscription yields two unbounded channels: one for samples, one for
/// producer-side failures. The pipeline only ever waits on these receivers;
/// it never calls back into the producer.
pub trait PriceSource {
    fn subscribe(
        &self,
        instrument: Instrument,
    ) -> (
        UnboundedReceiver<PriceSample>,
        UnboundedReceiver<SourceError>,
    );
}
