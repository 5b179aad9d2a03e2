pub mod calculate;
pub mod index;
pub mod landing;

use axum::http::{HeaderMap, header};
use porciento_core::promotion::Origin;

use crate::settings::ServerConfig;

/// Scheme and host the client used to reach us.
///
/// The scheme honours `X-Forwarded-Proto` from a fronting proxy; the host
/// falls back to the configured bind address when `Host` is absent.
pub(crate) fn request_origin(headers: &HeaderMap, config: &ServerConfig) -> Origin {
  let scheme = headers
    .get("x-forwarded-proto")
    .and_then(|v| v.to_str().ok())
    .and_then(|s| s.split(',').next())
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .unwrap_or("http");

  let host = headers
    .get(header::HOST)
    .and_then(|v| v.to_str().ok())
    .map(str::to_owned)
    .unwrap_or_else(|| config.address());

  Origin::new(scheme, host)
}
