//! Promotion rules: the threshold, the edge check, and canonical URLs.
//!
//! A pair is promoted exactly once, on the request whose post-increment count
//! first reaches [`PROMOTION_THRESHOLD`]. Because counts never decrease the
//! edge cannot fire twice for the same key.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::{CalcKey, Transition};

/// Request count at which a pair earns a permanent landing page.
pub const PROMOTION_THRESHOLD: u32 = 10;

/// The fixed infix between `x` and `y` in landing page paths.
pub const SLUG_INFIX: &str = "-por-ciento-sobre-";

/// `true` only for the below → at-or-above transition.
pub fn crosses_threshold(before: u32, after: u32) -> bool {
  before < PROMOTION_THRESHOLD && after >= PROMOTION_THRESHOLD
}

/// Advance an existing record's count by one request.
///
/// Returns the new count and whether the request was the promotion edge.
pub fn advance(count: u32) -> (u32, Transition) {
  let next = count.saturating_add(1);
  let transition = if crosses_threshold(count, next) {
    Transition::Promoted
  } else {
    Transition::Counted
  };
  (next, transition)
}

// ─── Paths and URLs ──────────────────────────────────────────────────────────

/// Scheme and host of the incoming request, used to build absolute URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
  pub scheme: String,
  pub host:   String,
}

impl Origin {
  pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
    Self { scheme: scheme.into(), host: host.into() }
  }

  pub fn url_for(&self, path: &str) -> String { format!("{self}{path}") }
}

impl fmt::Display for Origin {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}://{}", self.scheme, self.host)
  }
}

/// The slug for a key, e.g. `25-por-ciento-sobre-80`.
pub fn slug(key: CalcKey) -> String { format!("{}{SLUG_INFIX}{}", key.x, key.y) }

/// The root-relative landing page path, e.g. `/25-por-ciento-sobre-80`.
pub fn canonical_path(key: CalcKey) -> String { format!("/{}", slug(key)) }

/// The fully-qualified landing page URL stored on promotion.
pub fn canonical_url(origin: &Origin, key: CalcKey) -> String {
  origin.url_for(&canonical_path(key))
}

/// Parse a landing page slug back into its key.
///
/// Only the canonical spelling is accepted: both halves must be complete
/// integers written exactly as [`slug`] writes them, so `+5` or `05` yield
/// `None`.
pub fn parse_slug(s: &str) -> Option<CalcKey> {
  let (x, y) = s.split_once(SLUG_INFIX)?;
  let key = CalcKey::new(x.parse().ok()?, y.parse().ok()?);
  (slug(key) == s).then_some(key)
}
