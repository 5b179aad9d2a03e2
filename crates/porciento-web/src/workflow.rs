//! Request pipelines: counting a calculation (with promotion) and assembling
//! a landing page.

use porciento_core::{
  examples::{Example, neighbours},
  explain,
  presentation::ChartKind,
  promotion::{Origin, canonical_path, canonical_url},
  record::{CalcKey, NewCalculation, Transition},
  store::CalculationStore,
};
use serde::Serialize;

use crate::{card::ImageRenderer, error::Error, sitemap::Sitemap};

// ─── Calculate ───────────────────────────────────────────────────────────────

/// The body of an inline (not yet promoted) result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineResult {
  pub x:           i64,
  pub y:           i64,
  pub result:      f64,
  pub explanation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
  /// Render the result in place.
  Inline(InlineResult),
  /// The pair has a landing page; send the client there.
  Redirect {
    /// Root-relative path for the `Location` header.
    path: String,
    /// The stored, fully-qualified url.
    url:  String,
  },
}

/// Count one request for `key` and decide how to answer it.
///
/// On the promotion edge the sitemap is rebuilt before returning. A failed
/// rebuild is logged and otherwise ignored.
pub async fn record_calculation<S>(
  store:   &S,
  sitemap: &Sitemap,
  key:     CalcKey,
  origin:  &Origin,
) -> Result<Outcome, Error>
where
  S: CalculationStore,
{
  let explanation = explain::select(key.x, key.y, &mut rand::thread_rng());
  let input = NewCalculation {
    key,
    explanation,
    canonical_url: canonical_url(origin, key),
  };

  let recorded = store.record_request(input).await.map_err(Error::store)?;

  if recorded.transition == Transition::Promoted {
    tracing::info!(
      x = key.x,
      y = key.y,
      url = recorded.record.url.as_deref().unwrap_or_default(),
      "calculation promoted to landing page"
    );
    if let Err(e) = sitemap.rebuild(store).await {
      tracing::warn!(error = %e, "sitemap rebuild failed; keeping previous file");
    }
  }

  let record = recorded.record;
  Ok(match record.url {
    Some(url) => Outcome::Redirect { path: canonical_path(key), url },
    None => Outcome::Inline(InlineResult {
      x:           key.x,
      y:           key.y,
      result:      record.key.result(),
      explanation: record.explanation,
    }),
  })
}

// ─── Landing ─────────────────────────────────────────────────────────────────

/// Everything a landing page displays.
#[derive(Debug, Clone, Serialize)]
pub struct LandingPage {
  pub x:             i64,
  pub y:             i64,
  pub result:        f64,
  pub explanation:   String,
  pub examples:      Vec<Example>,
  pub chart:         ChartKind,
  /// The url this page was requested at.
  pub full_url:      String,
  /// The promoted url, if the pair has been promoted yet.
  pub canonical_url: Option<String>,
  /// Public path of the illustrative card; `None` if rendering failed.
  pub image:         Option<String>,
  pub count:         u32,
}

/// Assemble the landing page for `key`, or `None` if it was never requested.
///
/// A record is enough; the pair does not have to be promoted.
pub async fn lookup_landing<S>(
  store:    &S,
  images:   &ImageRenderer,
  key:      CalcKey,
  full_url: String,
) -> Result<Option<LandingPage>, Error>
where
  S: CalculationStore,
{
  let Some(record) = store.get(key).await.map_err(Error::store)? else {
    return Ok(None);
  };

  let (examples, chart) = {
    let mut rng = rand::thread_rng();
    (neighbours(key.x, key.y, &mut rng), ChartKind::choose(&mut rng))
  };

  let image = match images.render(key).await {
    Ok(path) => Some(path),
    Err(e) => {
      tracing::warn!(x = key.x, y = key.y, error = %e, "image rendering failed");
      None
    }
  };

  Ok(Some(LandingPage {
    x: key.x,
    y: key.y,
    result: record.result(),
    explanation: record.explanation,
    examples,
    chart,
    full_url,
    canonical_url: record.url,
    image,
    count: record.count,
  }))
}
