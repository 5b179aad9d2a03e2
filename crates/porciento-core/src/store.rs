//! The `CalculationStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `porciento-store-sqlite`).
//! The web layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::record::{CalcKey, CalculationRecord, NewCalculation, Recorded};

/// Abstraction over a calculation store backend.
///
/// Implementations must make [`record_request`](Self::record_request) atomic
/// per key: concurrent requests for the same `(x, y)` never create a second
/// record and never lose an increment.
pub trait CalculationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Count one request for `input.key`.
  ///
  /// Creates the record with `count = 1` and `input.explanation` if it does
  /// not exist. Otherwise increments `count`, refreshes `last_calculated`,
  /// and, when the increment is the promotion edge, stores
  /// `input.canonical_url`. An already-stored url is never replaced.
  fn record_request(
    &self,
    input: NewCalculation,
  ) -> impl Future<Output = Result<Recorded, Self::Error>> + Send + '_;

  /// Retrieve the record for `key`. Returns `None` if it was never requested.
  fn get(
    &self,
    key: CalcKey,
  ) -> impl Future<Output = Result<Option<CalculationRecord>, Self::Error>> + Send + '_;

  /// Distinct, non-empty urls of promoted records, sorted.
  fn promoted_urls(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// Recompute the derived sitemap projection from the records and return it.
  ///
  /// The projection is replaced wholesale; the returned list is sorted and
  /// deduplicated.
  fn refresh_sitemap_urls(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;
}
