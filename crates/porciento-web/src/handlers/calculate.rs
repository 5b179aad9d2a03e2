//! `POST /calculate`: count a request and answer inline or redirect.

use axum::{
  Json,
  body::Bytes,
  extract::State,
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use porciento_core::{record::CalcKey, store::CalculationStore};
use serde::Deserialize;

use crate::{
  AppState,
  error::Error,
  handlers::request_origin,
  workflow::{Outcome, record_calculation},
};

/// Raw form fields; decoded and validated by hand so that every malformed
/// body is a 400, whatever its `Content-Type`.
#[derive(Debug, Deserialize)]
pub struct CalculateForm {
  pub x: Option<String>,
  pub y: Option<String>,
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<Response, Error>
where
  S: CalculationStore + Clone + Send + Sync + 'static,
{
  let (x, y) = parse_form(&body)?;
  let origin = request_origin(&headers, &state.config);

  let outcome =
    record_calculation(state.store.as_ref(), &state.sitemap, CalcKey::new(x, y), &origin)
      .await?;

  Ok(match outcome {
    Outcome::Inline(result) => Json(result).into_response(),
    Outcome::Redirect { path, .. } => {
      (StatusCode::FOUND, [(header::LOCATION, path)]).into_response()
    }
  })
}

fn parse_form(body: &[u8]) -> Result<(i64, i64), Error> {
  let form: CalculateForm = serde_urlencoded::from_bytes(body)
    .map_err(|e| Error::InvalidInput(format!("Parámetros inválidos: {e}")))?;
  Ok((parse_field("x", form.x.as_deref())?, parse_field("y", form.y.as_deref())?))
}

fn parse_field(name: &str, value: Option<&str>) -> Result<i64, Error> {
  value
    .map(str::trim)
    .and_then(|v| v.parse().ok())
    .ok_or_else(|| {
      Error::InvalidInput(format!("Parámetros inválidos: `{name}` debe ser un número entero"))
    })
}
