//! Test doubles shared by the unit tests in this crate.

use porciento_core::{
  record::{CalcKey, CalculationRecord, NewCalculation, Recorded},
  store::CalculationStore,
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("database is unavailable")]
pub struct Unavailable;

/// A store whose every operation fails, as if the database had gone away.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrokenStore;

impl CalculationStore for BrokenStore {
  type Error = Unavailable;

  async fn record_request(&self, _input: NewCalculation) -> Result<Recorded, Unavailable> {
    Err(Unavailable)
  }

  async fn get(&self, _key: CalcKey) -> Result<Option<CalculationRecord>, Unavailable> {
    Err(Unavailable)
  }

  async fn promoted_urls(&self) -> Result<Vec<String>, Unavailable> { Err(Unavailable) }

  async fn refresh_sitemap_urls(&self) -> Result<Vec<String>, Unavailable> {
    Err(Unavailable)
  }
}
