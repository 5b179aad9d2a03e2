//! `GET /{x}-por-ciento-sobre-{y}`: the landing page for a pair.

use axum::{
  Json,
  extract::{OriginalUri, Path, State},
  http::HeaderMap,
};
use porciento_core::{promotion::parse_slug, store::CalculationStore};

use crate::{
  AppState,
  error::Error,
  handlers::request_origin,
  workflow::{LandingPage, lookup_landing},
};

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Path(slug): Path<String>,
  OriginalUri(uri): OriginalUri,
  headers: HeaderMap,
) -> Result<Json<LandingPage>, Error>
where
  S: CalculationStore + Clone + Send + Sync + 'static,
{
  let key = parse_slug(&slug).ok_or(Error::NotFound)?;
  let full_url = request_origin(&headers, &state.config).url_for(uri.path());

  lookup_landing(state.store.as_ref(), &state.images, key, full_url)
    .await?
    .map(Json)
    .ok_or(Error::NotFound)
}
