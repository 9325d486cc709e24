//! # Region/Realm/Timestamp Tuples
//!
//! The `compute-all-live-auctions` command carries its targets as a JSON
//! array of `{region, realm, timestamp}` objects in the request body.
//! Decoding is purely structural; identifiers are not checked against any
//! registry here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while decoding a tuple-bearing request body.
#[derive(Debug, Error)]
pub enum TupleError {
    /// The request body is not valid UTF-8.
    #[error("request body is not valid UTF-8: {0}")]
    BodyUtf8(#[from] std::str::Utf8Error),

    /// The body is present but does not conform to the tuple encoding.
    #[error("failed to decode region-realm-timestamp tuples: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A single target for live-auction computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRealmTimestampTuple {
    /// Logical region name (e.g. "us").
    pub region: String,
    /// Realm slug within the region.
    pub realm: String,
    /// Unix seconds of the targeted snapshot.
    pub timestamp: i64,
}

/// Decodes a raw request body into an ordered sequence of tuples.
///
/// An empty (or whitespace-only) body is a valid empty sequence, so the
/// command stays callable with no targets. Duplicates are permitted and
/// input order is preserved.
pub fn decode_tuples(raw: &[u8]) -> Result<Vec<RegionRealmTimestampTuple>, TupleError> {
    let body = std::str::from_utf8(raw)?;
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    Ok(serde_json::from_str(body)?)
}

/// Encodes tuples back into the wire representation accepted by the
/// downstream compute action.
pub fn encode_tuples(tuples: &[RegionRealmTimestampTuple]) -> Result<String, TupleError> {
    Ok(serde_json::to_string(tuples)?)
}
