use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

use feed::{PriceSample, SourceError};

use crate::{Stream, StreamError};

/// Channel-backed `Stream` over one subscription of a `PriceSource`.
///
/// Owns the two receivers for its whole lifetime. The receivers sit behind
/// async mutexes so `get` can take `&self`; concurrent `get` calls on the
/// same stream are serialized, each still consuming exactly one outcome.
pub struct ChanStream {
    samples: Mutex<UnboundedReceiver<PriceSample>>,
    errors: Mutex<UnboundedReceiver<SourceError>>,
}

impl ChanStream {
    pub fn new(
        samples: UnboundedReceiver<PriceSample>,
        errors: UnboundedReceiver<SourceError>,
    ) -> Self {
        Self {
            samples: Mutex::new(samples),
            errors: Mutex::new(errors),
        }
    }
}

#[async_trait]
impl Stream for ChanStream {
    /// Suspends until a sample arrives, the producer reports a failure, or
    /// `cancel` fires. When several outcomes are ready at once any one of
    /// them may win the race.
    ///
    /// A closed channel means the producer dropped its sender; that is a
    /// terminal `SourceClosed` error, not a silent hang.
    async fn get(&self, cancel: &CancellationToken) -> Result<PriceSample, StreamError> {
        let mut samples = self.samples.lock().await;
        let mut errors = self.errors.lock().await;

        tokio::select! {
            sample = samples.recv() => match sample {
                Some(sample) => Ok(sample),
                None => Err(StreamError::SourceClosed),
            },
            err = errors.recv() => match err {
                Some(err) => Err(StreamError::Source(err)),
                None => Err(StreamError::SourceClosed),
            },
            _ = cancel.cancelled() => Err(StreamError::Cancelled),
        }
    }
}
