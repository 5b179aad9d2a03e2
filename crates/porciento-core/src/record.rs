//! Calculation records: one per unique `(x, y)` pair ever requested.
//!
//! A record is created on the first request for its key and mutated on every
//! later request. Records are never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Compute "x% of y" with plain floating-point semantics; no rounding.
pub fn percent_of(x: i64, y: i64) -> f64 { (x as f64 / 100.0) * y as f64 }

// ─── Key ─────────────────────────────────────────────────────────────────────

/// The composite `(x, y)` key. `x` is the percentage, `y` the base.
///
/// Neither component is range-checked: negative values and percentages above
/// 100 are accepted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalcKey {
  pub x: i64,
  pub y: i64,
}

impl CalcKey {
  pub fn new(x: i64, y: i64) -> Self { Self { x, y } }

  pub fn result(&self) -> f64 { percent_of(self.x, self.y) }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// The persisted state for one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
  pub key:             CalcKey,
  /// Number of requests seen for this key. Never decreases.
  pub count:           u32,
  /// Chosen when the record is created; reused verbatim afterwards.
  pub explanation:     String,
  /// Fully-qualified landing page URL; set once, at promotion.
  pub url:             Option<String>,
  pub last_calculated: DateTime<Utc>,
}

impl CalculationRecord {
  pub fn result(&self) -> f64 { self.key.result() }
}

// ─── Write input ─────────────────────────────────────────────────────────────

/// Input to [`CalculationStore::record_request`](crate::store::CalculationStore::record_request).
///
/// `explanation` is only stored when the request creates the record, and
/// `canonical_url` only when the request is the promotion edge. Both are
/// otherwise discarded.
#[derive(Debug, Clone)]
pub struct NewCalculation {
  pub key:           CalcKey,
  pub explanation:   String,
  pub canonical_url: String,
}

/// What a single request did to its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
  /// First request for the key; the record was inserted with `count = 1`.
  Created,
  /// Count incremented; no change in promotion state.
  Counted,
  /// Count crossed the threshold on this request and `url` was written.
  Promoted,
}

/// A record as it stands after a request, plus what that request changed.
#[derive(Debug, Clone)]
pub struct Recorded {
  pub record:     CalculationRecord,
  pub transition: Transition,
}
