use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, mpsc};
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use collector::Collector;
use feed::{Instrument, PriceSample};

use crate::average::RunningAverage;
use crate::types::{Handler, IndexerError};

/// Everything guarded by the indexer's single exclusive lock.
///
/// The lock is held for the full duration of one `index` run — collection,
/// folding and handler dispatch — which is what serializes overlapping
/// ticks.
struct IndexerState {
    averages: HashMap<Instrument, RunningAverage>,
    last_error: Option<IndexerError>,
}

/// Streaming price indexer.
///
/// On every tick of a fixed-interval clock it collects one sample from
/// every registered stream, folds the samples into a per-instrument
/// running-average table and reports the updated index of **every** known
/// instrument — also the ones that produced no sample this round — to the
/// handler.
///
/// Lifecycle: `Idle → Running → Idle`. Any runtime failure (collection,
/// parsing, cancellation) terminates the run and is retained for
/// `last_error`; calling `start` again re-enters `Running` with the
/// averages table intact.
pub struct Indexer<C> {
    collector: Arc<C>,
    handle: Handler,
    interval: Duration,

    state: Mutex<IndexerState>,
    started: AtomicBool,

    // Single-slot stop signal. The sender side lives in `stop`; the
    // receiver is parked here between runs and held by the loop while one
    // is active.
    stop_tx: mpsc::Sender<()>,
    stop_rx: Mutex<mpsc::Receiver<()>>,
}

impl<C> Indexer<C>
where
    C: Collector + 'static,
{
    /// Builds an idle indexer with an empty averages table.
    ///
    /// `handle` is called for each indexed price. `interval` is the tick
    /// period and must be non-zero.
    pub fn new(
        collector: Arc<C>,
        handle: Handler,
        interval: Duration,
    ) -> Result<Arc<Self>, IndexerError> {
        if interval.is_zero() {
            return Err(IndexerError::InvalidInterval);
        }

        let (stop_tx, stop_rx) = mpsc::channel(1);

        Ok(Arc::new(Self {
            collector,
            handle,
            interval,
            state: Mutex::new(IndexerState {
                averages: HashMap::new(),
                last_error: None,
            }),
            started: AtomicBool::new(false),
            stop_tx,
            stop_rx: Mutex::new(stop_rx),
        }))
    }

    /// Spawns the ticking loop. No-op when already running; of any number
    /// of concurrent `start` calls exactly one wins the flag transition and
    /// spawns a loop. Returns without waiting for the first tick.
    pub fn start(self: Arc<Self>, cancel: CancellationToken) {
        if self
            .started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        tokio::spawn(async move { self.run(cancel).await });
    }

    /// Delivers the single-slot stop signal to the running loop.
    ///
    /// Returns `Ok` immediately when the indexer is not running. While the
    /// slot is occupied by a pending stop request, another `stop` call
    /// waits for it to be consumed. If `cancel` fires first — checked
    /// before the send so an already-cancelled token fails deterministically
    /// — the call returns `Cancelled` and the loop keeps running; the
    /// caller has to retry.
    pub async fn stop(&self, cancel: CancellationToken) -> Result<(), IndexerError> {
        if !self.started.load(Ordering::Acquire) {
            return Ok(());
        }

        tokio::select! {
            biased;

            _ = cancel.cancelled() => Err(IndexerError::Cancelled),
            _ = self.stop_tx.send(()) => Ok(()),
        }
    }

    /// Last terminating error of the most recent run. `None` after a clean
    /// stop, or when no run has terminated abnormally yet.
    pub async fn last_error(&self) -> Option<IndexerError> {
        self.state.lock().await.last_error.clone()
    }

    pub fn is_running(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Snapshot of the per-instrument running averages.
    pub async fn averages(&self) -> HashMap<Instrument, RunningAverage> {
        self.state.lock().await.averages.clone()
    }

    /// The ticking loop. Runs as its own task until stopped, cancelled or
    /// failed; clears the running flag on every exit path.
    async fn run(self: Arc<Self>, cancel: CancellationToken) {
        let mut ticker = time::interval_at(time::Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // Per-run error channel for spawned index tasks. The loop stops
        // reading after the first error; later errors find the slot taken
        // or the receiver gone and are discarded, never overwriting the
        // recorded one.
        let (err_tx, mut err_rx) = mpsc::channel::<IndexerError>(1);

        let mut stop_rx = self.stop_rx.lock().await;

        info!(interval_ms = self.interval.as_millis() as u64, "indexer started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let indexer = Arc::clone(&self);
                    let err_tx = err_tx.clone();
                    let cancel = cancel.clone();
                    let at = Utc::now();

                    debug!(at = %at, "tick, dispatching index run");

                    // Fire-and-forget: a slow run must not hold up the
                    // ticker; overlapping runs serialize on the state lock.
                    tokio::spawn(async move {
                        if let Err(err) = indexer.index(at, &cancel).await {
                            let _ = err_tx.try_send(err);
                        }
                    });
                }
                _ = stop_rx.recv() => {
                    info!("indexer stopped");
                    break;
                }
                _ = cancel.cancelled() => {
                    let mut state = self.state.lock().await;
                    if state.last_error.is_none() {
                        state.last_error = Some(IndexerError::Cancelled);
                    }
                    error!("indexer context cancelled");
                    break;
                }
                Some(err) = err_rx.recv() => {
                    error!(error = %err, "index run failed, terminating");
                    self.state.lock().await.last_error = Some(err);
                    break;
                }
            }
        }

        self.started.store(false, Ordering::Release);
    }

    /// One aggregation step: collect one sample per stream, fold all of
    /// them, then report every known instrument at the tick timestamp.
    async fn index(&self, at: DateTime<Utc>, cancel: &CancellationToken) -> Result<(), IndexerError> {
        let mut state = self.state.lock().await;

        let samples = self.collector.collect(cancel.child_token()).await?;

        for sample in samples {
            let value: f64 = sample.value.parse().map_err(|source| IndexerError::Parse {
                value: sample.value.clone(),
                source,
            })?;

            state
                .averages
                .entry(sample.instrument)
                .or_default()
                .add(value);
        }

        for (instrument, average) in &state.averages {
            (self.handle)(PriceSample {
                instrument: instrument.clone(),
                observed_at: at,
                value: average.average().to_string(),
            });
        }

        Ok(())
    }
}
