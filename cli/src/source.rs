use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::{self, MissedTickBehavior};

use feed::{Instrument, PriceSample, PriceSource, SourceError};

const MIN_PRICE: f64 = 1.0;
const MAX_PRICE: f64 = 1000.0;

/// Demo producer: emits a uniformly random decimal price for the
/// subscribed instrument on a fixed period. It never reports an error,
/// but the error channel stays open for the subscription's lifetime.
pub struct RandomSource {
    emit_every: Duration,
}

impl RandomSource {
    pub fn new(emit_every: Duration) -> Self {
        Self { emit_every }
    }
}

impl PriceSource for RandomSource {
    fn subscribe(
        &self,
        instrument: Instrument,
    ) -> (
        UnboundedReceiver<PriceSample>,
        UnboundedReceiver<SourceError>,
    ) {
        let (sample_tx, sample_rx) = mpsc::unbounded_channel();
        let (err_tx, err_rx) = mpsc::unbounded_channel();

        let emit_every = self.emit_every;
        tokio::spawn(async move {
            // Keeps the error channel open while the generator lives.
            let _err_tx = err_tx;

            let mut ticker = time::interval(emit_every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                let value = rand::rng().random_range(MIN_PRICE..MAX_PRICE);
                let sample = PriceSample {
                    instrument: instrument.clone(),
                    observed_at: Utc::now(),
                    value: value.to_string(),
                };

                // Subscriber gone: stop generating.
                if sample_tx.send(sample).is_err() {
                    break;
                }
            }
        });

        (sample_rx, err_rx)
    }
}
