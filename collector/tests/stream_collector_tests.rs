use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use collector::{CollectError, Collector, StreamCollector};
use feed::{PriceSample, SourceError};
use stream::{Stream, StreamError};

use mock_stream::{MockBehavior, MockStream};

fn sample(value: &str) -> PriceSample {
    PriceSample {
        instrument: "BTC_USD".into(),
        observed_at: Utc::now(),
        value: value.into(),
    }
}

#[tokio::test]
async fn collect_preserves_registration_order() {
    // Completion order is deliberately scrambled with delays.
    let streams: Vec<Arc<dyn Stream>> = vec![
        MockStream::new(MockBehavior::YieldAfter(
            Duration::from_millis(50),
            sample("0.1"),
        )),
        MockStream::new(MockBehavior::Yield(sample("0.2"))),
        MockStream::new(MockBehavior::YieldAfter(
            Duration::from_millis(10),
            sample("0.3"),
        )),
    ];

    let collector = StreamCollector::new(streams);
    let samples = collector.collect(CancellationToken::new()).await.unwrap();

    let values: Vec<&str> = samples.iter().map(|s| s.value.as_str()).collect();
    assert_eq!(values, ["0.1", "0.2", "0.3"]);
}

#[tokio::test]
async fn first_error_wins_and_unblocks_siblings() {
    let failure = StreamError::Source(SourceError::new("stream error"));

    let streams: Vec<Arc<dyn Stream>> = vec![
        MockStream::new(MockBehavior::Hang),
        MockStream::new(MockBehavior::Fail(failure.clone())),
        MockStream::new(MockBehavior::Yield(sample("0.3"))),
    ];

    let collector = StreamCollector::new(streams);

    // The hanging sibling must be cancelled, so the whole call resolves
    // promptly with the triggering error and no partial results.
    let result = tokio::time::timeout(
        Duration::from_secs(1),
        collector.collect(CancellationToken::new()),
    )
    .await
    .expect("collect did not resolve after the failure");

    assert_eq!(result.unwrap_err(), CollectError::Stream(failure));
}

#[tokio::test]
async fn caller_cancellation_aborts_the_fan_out() {
    let streams: Vec<Arc<dyn Stream>> = vec![
        MockStream::new(MockBehavior::Hang),
        MockStream::new(MockBehavior::Hang),
    ];

    let collector = StreamCollector::new(streams);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = collector.collect(cancel).await.unwrap_err();
    assert_eq!(err, CollectError::Stream(StreamError::Cancelled));
}

#[tokio::test]
async fn collect_without_streams_yields_empty_result() {
    let collector = StreamCollector::new(Vec::new());
    let samples = collector.collect(CancellationToken::new()).await.unwrap();
    assert!(samples.is_empty());
}

#[tokio::test]
async fn collect_may_be_called_repeatedly() {
    let streams: Vec<Arc<dyn Stream>> = vec![
        MockStream::new(MockBehavior::Yield(sample("1.5"))),
        MockStream::new(MockBehavior::Yield(sample("2.5"))),
    ];

    let collector = StreamCollector::new(streams);

    for _ in 0..2 {
        let samples = collector.collect(CancellationToken::new()).await.unwrap();
        assert_eq!(samples.len(), 2);
    }
}
