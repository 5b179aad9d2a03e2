//! Explanation selector.
//!
//! Explanations are plain-text templates kept in `assets/explanations.txt`,
//! one per block, blocks separated by a line holding only `%%`. The
//! placeholders `{x}`, `{y}` and `{x_decimal}` are substituted on render.

use std::sync::LazyLock;

use rand::{Rng, seq::SliceRandom};

use crate::{Error, Result};

const RAW: &str = include_str!("../assets/explanations.txt");

static TEMPLATES: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
  RAW
    .split("\n%%\n")
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .collect()
});

/// Number of available templates.
pub fn template_count() -> usize { TEMPLATES.len() }

/// Render template `index` for `(x, y)`.
pub fn render(index: usize, x: i64, y: i64) -> Result<String> {
  TEMPLATES
    .get(index)
    .map(|t| fill(t, x, y))
    .ok_or(Error::UnknownTemplate(index))
}

/// Render a uniformly chosen template for `(x, y)`.
pub fn select<R: Rng + ?Sized>(x: i64, y: i64, rng: &mut R) -> String {
  TEMPLATES
    .choose(rng)
    .map(|t| fill(t, x, y))
    .unwrap_or_default()
}

fn fill(template: &str, x: i64, y: i64) -> String {
  let decimal = x as f64 / 100.0;
  template
    .replace("{x_decimal}", &decimal.to_string())
    .replace("{x}", &x.to_string())
    .replace("{y}", &y.to_string())
}
