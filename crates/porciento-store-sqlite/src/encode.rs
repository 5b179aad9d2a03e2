//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings.

use chrono::{DateTime, Utc};
use porciento_core::record::{CalcKey, CalculationRecord};

use crate::{Error, Result};

pub const RECORD_COLUMNS: &str = "x, y, count, explanation, url, last_calculated";

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// A `calculations` row exactly as read, before timestamp parsing.
pub struct RawRecord {
  pub x:               i64,
  pub y:               i64,
  pub count:           u32,
  pub explanation:     String,
  pub url:             Option<String>,
  pub last_calculated: String,
}

impl RawRecord {
  /// Map a row selected with [`RECORD_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      x:               row.get(0)?,
      y:               row.get(1)?,
      count:           row.get(2)?,
      explanation:     row.get(3)?,
      url:             row.get(4)?,
      last_calculated: row.get(5)?,
    })
  }

  pub fn into_record(self) -> Result<CalculationRecord> {
    Ok(CalculationRecord {
      key:             CalcKey::new(self.x, self.y),
      count:           self.count,
      explanation:     self.explanation,
      url:             self.url,
      last_calculated: decode_dt(&self.last_calculated)?,
    })
  }
}
