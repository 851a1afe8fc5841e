//! Identifier types for engine entities
//!
//! Order identifiers are caller-supplied opaque strings and trade
//! identifiers are issued by the engine, so the only dedicated newtype
//! here is the trading pair.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trading pair identifier
///
/// An opaque non-empty string (e.g. "BTC-USD"). The engine never parses
/// or validates it; two distinct strings address two distinct books even
/// if they describe the same instrument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairId(String);

impl PairId {
    /// Create a new PairId from a string
    pub fn new(pair: impl Into<String>) -> Self {
        Self(pair.into())
    }

    /// Get the pair string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PairId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
