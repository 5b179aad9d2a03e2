//! Neighbouring examples shown on landing pages.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::record::percent_of;

/// How many neighbours [`neighbours`] produces.
pub const EXAMPLE_COUNT: usize = 3;

/// Half-width of the window around `y` that neighbours are drawn from.
const SPREAD: i64 = 100;

/// One `(x, y, result)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Example {
  pub x:      i64,
  pub y:      i64,
  pub result: f64,
}

/// Draw [`EXAMPLE_COUNT`] examples with the same `x` and a base near `y`.
///
/// Each base is drawn from `[max(1, y - 100), y + 100)`. For `y <= -99` that
/// window is empty and the bounds are swapped, matching the inclusive range
/// `[y + 100, 1]`.
pub fn neighbours<R: Rng + ?Sized>(x: i64, y: i64, rng: &mut R) -> Vec<Example> {
  (0..EXAMPLE_COUNT)
    .map(|_| {
      let y = neighbour_base(y, rng);
      Example { x, y, result: percent_of(x, y) }
    })
    .collect()
}

fn neighbour_base<R: Rng + ?Sized>(y: i64, rng: &mut R) -> i64 {
  let low = y.saturating_sub(SPREAD).max(1);
  let high = y.saturating_add(SPREAD);
  if low < high {
    rng.gen_range(low..high)
  } else {
    rng.gen_range(high..=low)
  }
}
