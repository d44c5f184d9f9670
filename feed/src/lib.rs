//! Shared data model for the price indexing pipeline.
//!
//! Everything downstream (streams, the collector, the indexer) speaks in
//! terms of the types defined here:
//!   • `Instrument` — opaque identifier of a tradable instrument
//!   • `PriceSample` — one observed price point
//!   • `PriceSource` — the subscription interface a market-data producer
//!     implements to feed the pipeline

pub mod source;
pub mod types;

pub use source::{PriceSource, SourceError};
pub use types::{Instrument, PriceSample};
