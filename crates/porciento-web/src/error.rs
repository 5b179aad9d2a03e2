//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A form field was missing or not an integer. Nothing was written.
  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("not found")]
  NotFound,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Store(Box::new(e))
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      Error::InvalidInput(m) => (StatusCode::BAD_REQUEST, m.clone()),
      Error::NotFound => (
        StatusCode::NOT_FOUND,
        "No se encontraron datos para esta solicitud.".to_string(),
      ),
      Error::Store(e) => {
        tracing::error!(error = %e, "storage failure while handling request");
        (StatusCode::INTERNAL_SERVER_ERROR, "Error en el servidor".to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
