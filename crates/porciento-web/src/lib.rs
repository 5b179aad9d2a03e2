//! HTTP layer for the porciento calculator.
//!
//! Exposes an axum [`Router`] backed by any [`CalculationStore`]: the
//! calculator form, the calculate endpoint with its promotion workflow, the
//! landing pages, and the static sitemap and image files.

mod atomic;

pub mod card;
pub mod error;
pub mod handlers;
pub mod settings;
pub mod sitemap;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use error::Error;
pub use settings::ServerConfig;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use porciento_core::store::CalculationStore;
use tower_http::{
  services::{ServeDir, ServeFile},
  trace::TraceLayer,
};

use card::ImageRenderer;
use handlers::{calculate, index, landing};
use sitemap::Sitemap;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: CalculationStore> {
  pub store:   Arc<S>,
  pub sitemap: Arc<Sitemap>,
  pub images:  Arc<ImageRenderer>,
  pub config:  Arc<ServerConfig>,
}

impl<S: CalculationStore> AppState<S> {
  /// Wire `store` to the sitemap and image locations named by `config`.
  pub fn new(store: S, config: ServerConfig) -> Self {
    Self {
      store:   Arc::new(store),
      sitemap: Arc::new(Sitemap::new(config.sitemap_path())),
      images:  Arc::new(ImageRenderer::new(config.images_dir())),
      config:  Arc::new(config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application [`Router`].
pub fn router<S>(state: AppState<S>) -> Router
where
  S: CalculationStore + Clone + Send + Sync + 'static,
{
  let sitemap_file = ServeFile::new(state.sitemap.path());
  let image_dir = ServeDir::new(state.images.dir());

  Router::new()
    .route("/",                   get(index::handler))
    .route("/calculate",          post(calculate::handler::<S>))
    .route_service("/sitemap.xml", sitemap_file)
    .nest_service(card::PUBLIC_PREFIX, image_dir)
    .route("/{slug}",             get(landing::handler::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use porciento_core::{promotion::PROMOTION_THRESHOLD, record::CalcKey};
  use porciento_store_sqlite::SqliteStore;
  use serde_json::Value;
  use tempfile::TempDir;
  use tower::ServiceExt as _;

  async fn make_state() -> (AppState<SqliteStore>, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::open_in_memory().await.unwrap();
    let config = ServerConfig {
      host:       "127.0.0.1".to_string(),
      port:       3000,
      store_path: ":memory:".into(),
      public_dir: dir.path().join("public"),
    };
    (AppState::new(store, config), dir)
  }

  async fn oneshot_raw(
    state:   AppState<SqliteStore>,
    method:  &str,
    uri:     &str,
    headers: Vec<(header::HeaderName, &str)>,
    body:    &str,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn post_calculate(state: &AppState<SqliteStore>, body: &str) -> Response {
    oneshot_raw(
      state.clone(),
      "POST",
      "/calculate",
      vec![
        (header::CONTENT_TYPE, "application/x-www-form-urlencoded"),
        (header::HOST, "porciento.test"),
      ],
      body,
    )
    .await
  }

  async fn fetch(state: &AppState<SqliteStore>, uri: &str) -> Response {
    oneshot_raw(state.clone(), "GET", uri, vec![(header::HOST, "porciento.test")], "").await
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  // ── Index ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn index_serves_the_form() {
    let (state, _dir) = make_state().await;
    let resp = fetch(&state, "/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let html = std::str::from_utf8(&bytes).unwrap();
    assert!(html.contains("action=\"/calculate\""), "{html}");
  }

  // ── Calculate ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn first_calculation_renders_inline() {
    let (state, _dir) = make_state().await;
    let resp = post_calculate(&state, "x=50&y=200").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["x"], 50);
    assert_eq!(body["y"], 200);
    assert_eq!(body["result"], 100.0);
    assert!(body["explanation"].as_str().unwrap().contains("50%"));
  }

  #[tokio::test]
  async fn non_integer_input_is_400_and_writes_nothing() {
    let (state, _dir) = make_state().await;
    let resp = post_calculate(&state, "x=abc&y=10").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].as_str().unwrap().contains("`x`"));

    let resp = post_calculate(&state, "x=5&y=1.5").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert!(state.store.get(CalcKey::new(5, 1)).await.unwrap().is_none());
    assert!(state.store.promoted_urls().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn missing_field_is_400() {
    let (state, _dir) = make_state().await;
    let resp = post_calculate(&state, "x=5").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn duplicated_field_is_400() {
    let (state, _dir) = make_state().await;
    let resp = post_calculate(&state, "x=1&x=2&y=3").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn content_type_does_not_change_the_status() {
    let (state, _dir) = make_state().await;

    let resp = oneshot_raw(state.clone(), "POST", "/calculate", vec![], "x=3&y=9").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/calculate",
      vec![(header::CONTENT_TYPE, "application/json")],
      r#"{"x": 3, "y": 9}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn explanation_is_stable_across_requests() {
    let (state, _dir) = make_state().await;
    let first = json_body(post_calculate(&state, "x=33&y=120").await).await;
    let second = json_body(post_calculate(&state, "x=33&y=120").await).await;
    assert_eq!(first["explanation"], second["explanation"]);
  }

  #[tokio::test]
  async fn tenth_calculation_redirects_and_publishes_sitemap() {
    let (state, _dir) = make_state().await;

    for _ in 1..PROMOTION_THRESHOLD {
      let resp = post_calculate(&state, "x=25&y=80").await;
      assert_eq!(resp.status(), StatusCode::OK);
    }

    for _ in 0..2 {
      let resp = post_calculate(&state, "x=25&y=80").await;
      assert_eq!(resp.status(), StatusCode::FOUND);
      let location = resp.headers().get(header::LOCATION).unwrap().to_str().unwrap();
      assert_eq!(location, "/25-por-ciento-sobre-80");
    }

    let resp = fetch(&state, "/sitemap.xml").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let xml = std::str::from_utf8(&bytes).unwrap();
    assert!(
      xml.contains("<loc>http://porciento.test/25-por-ciento-sobre-80</loc>"),
      "{xml}"
    );
  }

  #[tokio::test]
  async fn forwarded_proto_shapes_the_stored_url() {
    let (state, _dir) = make_state().await;
    for _ in 0..PROMOTION_THRESHOLD {
      oneshot_raw(
        state.clone(),
        "POST",
        "/calculate",
        vec![
          (header::CONTENT_TYPE, "application/x-www-form-urlencoded"),
          (header::HOST, "porciento.test"),
          (header::HeaderName::from_static("x-forwarded-proto"), "https"),
        ],
        "x=1&y=2",
      )
      .await;
    }
    let record = state.store.get(CalcKey::new(1, 2)).await.unwrap().unwrap();
    assert_eq!(record.url.as_deref(), Some("https://porciento.test/1-por-ciento-sobre-2"));
  }

  // ── Landing ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn landing_for_unknown_pair_is_404() {
    let (state, _dir) = make_state().await;
    let resp = fetch(&state, "/12-por-ciento-sobre-34").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn landing_with_malformed_slug_is_404() {
    let (state, _dir) = make_state().await;
    for uri in ["/favicon.ico", "/x-por-ciento-sobre-5", "/5-por-ciento-sobre-"] {
      let resp = fetch(&state, uri).await;
      assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
  }

  #[tokio::test]
  async fn landing_only_answers_the_canonical_spelling() {
    let (state, _dir) = make_state().await;
    post_calculate(&state, "x=5&y=10").await;

    assert_eq!(fetch(&state, "/5-por-ciento-sobre-10").await.status(), StatusCode::OK);
    for uri in ["/05-por-ciento-sobre-10", "/+5-por-ciento-sobre-10", "/5-por-ciento-sobre-010"] {
      assert_eq!(fetch(&state, uri).await.status(), StatusCode::NOT_FOUND, "{uri}");
    }
  }

  #[tokio::test]
  async fn landing_is_served_for_unpromoted_pair() {
    let (state, _dir) = make_state().await;
    post_calculate(&state, "x=10&y=90").await;

    let resp = fetch(&state, "/10-por-ciento-sobre-90").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = json_body(resp).await;
    assert_eq!(page["result"], 9.0);
    assert_eq!(page["count"], 1);
    assert!(page["canonical_url"].is_null());
    assert_eq!(page["full_url"], "http://porciento.test/10-por-ciento-sobre-90");
  }

  #[tokio::test]
  async fn promoted_landing_page_has_display_data_and_image() {
    let (state, _dir) = make_state().await;
    for _ in 0..PROMOTION_THRESHOLD {
      post_calculate(&state, "x=20&y=150").await;
    }

    let page = json_body(fetch(&state, "/20-por-ciento-sobre-150").await).await;
    assert_eq!(page["canonical_url"], "http://porciento.test/20-por-ciento-sobre-150");
    assert_eq!(page["examples"].as_array().unwrap().len(), 3);
    let chart = page["chart"].as_str().unwrap();
    assert!(chart == "pie" || chart == "doughnut", "{chart}");

    let image = page["image"].as_str().unwrap().to_string();
    assert_eq!(image, "/images/result_20_150.png");
    let resp = fetch(&state, &image).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  // ── Storage failure ─────────────────────────────────────────────────────────

  async fn broken_state() -> (AppState<crate::testing::BrokenStore>, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = ServerConfig {
      host:       "127.0.0.1".to_string(),
      port:       3000,
      store_path: ":memory:".into(),
      public_dir: dir.path().join("public"),
    };
    (AppState::new(crate::testing::BrokenStore, config), dir)
  }

  #[tokio::test]
  async fn storage_failure_on_calculate_is_500() {
    let (state, _dir) = broken_state().await;
    let req = Request::builder()
      .method("POST")
      .uri("/calculate")
      .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
      .body(Body::from("x=10&y=20"))
      .unwrap();

    let resp = router(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.headers().get(header::LOCATION).is_none());
    assert_eq!(json_body(resp).await["error"], "Error en el servidor");
  }

  #[tokio::test]
  async fn storage_failure_on_landing_is_500() {
    let (state, _dir) = broken_state().await;
    let req = Request::builder()
      .uri("/10-por-ciento-sobre-20")
      .body(Body::empty())
      .unwrap();

    let resp = router(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(resp).await["error"], "Error en el servidor");
  }
}
