//! Presentation variants for landing pages.

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

/// Which chart a landing page draws its result with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
  Pie,
  Doughnut,
}

impl ChartKind {
  pub const ALL: [ChartKind; 2] = [ChartKind::Pie, ChartKind::Doughnut];

  /// Pick a variant uniformly at random.
  pub fn choose<R: Rng + ?Sized>(rng: &mut R) -> Self {
    *Self::ALL.choose(rng).unwrap_or(&ChartKind::Pie)
  }
}
