use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier of a tradable instrument (e.g. a currency-pair ticker).
///
/// The pipeline never looks inside the id; it is only compared, hashed and
/// printed.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Instrument(String);

impl Instrument {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Instrument {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// One observed price point for an instrument.
///
/// `value` is a decimal kept as text (e.g. "0", "10", "12.2", "13.2345122")
/// until the moment of aggregation; the indexer parses it to `f64` and
/// formats results back with the shortest round-trip representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub instrument: Instrument,
    pub observed_at: DateTime<Utc>,
    pub value: String,
}
