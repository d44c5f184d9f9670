use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use feed::PriceSample;
use stream::Stream;

use crate::{CollectError, Collector};

/// `Collector` over an ordered, immutable list of streams.
///
/// Holds no other state, so `collect` may be called repeatedly and from
/// concurrent tasks; every call builds its own fan-out group.
pub struct StreamCollector {
    streams: Vec<Arc<dyn Stream>>,
}

impl StreamCollector {
    pub fn new(streams: Vec<Arc<dyn Stream>>) -> Self {
        Self { streams }
    }
}

#[async_trait]
impl Collector for StreamCollector {
    /// Issues one concurrent `get` per stream, all under a child token of
    /// `cancel`, and joins results in completion order.
    ///
    /// First error wins: the child token is cancelled so every sibling still
    /// blocked in its `get` unblocks, the drained partial results are
    /// discarded, and the triggering error is returned. On success the
    /// output slot `i` holds stream `i`'s sample regardless of completion
    /// order.
    async fn collect(&self, cancel: CancellationToken) -> Result<Vec<PriceSample>, CollectError> {
        let cancel = cancel.child_token();
        let mut tasks = JoinSet::new();

        for (slot, stream) in self.streams.iter().enumerate() {
            let stream = Arc::clone(stream);
            let cancel = cancel.clone();
            tasks.spawn(async move { (slot, stream.get(&cancel).await) });
        }

        let mut slots: Vec<Option<PriceSample>> = Vec::new();
        slots.resize_with(self.streams.len(), || None);

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, Ok(sample))) => slots[slot] = Some(sample),
                Ok((_, Err(err))) => {
                    cancel.cancel();
                    while tasks.join_next().await.is_some() {}
                    return Err(CollectError::Stream(err));
                }
                Err(join_err) => {
                    cancel.cancel();
                    while tasks.join_next().await.is_some() {}
                    return Err(CollectError::Join(join_err.to_string()));
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }
}
