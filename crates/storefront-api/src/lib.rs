//! JSON REST API for the storefront.
//!
//! Exposes an axum [`Router`] backed by any
//! [`storefront_core::store::StorefrontStore`]. TLS and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", storefront_api::api_router(state))
//! ```

pub mod contacts;
pub mod error;
pub mod events;
pub mod extract;
pub mod reviews;
pub mod stats;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use serde::Serialize;
use storefront_core::store::StorefrontStore;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use extract::{ApiJson, ApiQuery};

/// Default number of rows returned by `GET /stats`.
pub const DEFAULT_TOP_N: usize = 10;

/// Upper bound on `?top=` so one request cannot rank the whole catalogue.
pub const MAX_TOP_N: usize = 100;

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct ApiState<S> {
  pub store:       Arc<S>,
  /// Used by `GET /stats` when the request has no `?top=`.
  pub stats_top_n: usize,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store, stats_top_n: DEFAULT_TOP_N }
  }
}

/// Body returned by every create endpoint.
#[derive(Debug, Serialize)]
pub struct Created {
  pub ok: bool,
  pub id: i64,
}

impl Created {
  pub fn new(id: i64) -> Self { Self { ok: true, id } }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: StorefrontStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Ingest
    .route("/track", post(events::track::<S>))
    .route("/identify", post(contacts::identify::<S>))
    .route("/reviews", get(reviews::list::<S>).post(reviews::create::<S>))
    // Analytics
    .route("/stats", get(stats::handler::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Treat blank strings from the browser the same as a missing field.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chrono::TimeZone as _;
  use serde_json::{Value, json};
  use storefront_core::event::TRACKED_KINDS;
  use storefront_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  async fn make_state() -> ApiState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    ApiState::new(Arc::new(store))
  }

  async fn send<S>(
    state:  ApiState<S>,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value)
  where
    S: StorefrontStore + Clone + Send + Sync + 'static,
    S::Error: std::error::Error + Send + Sync + 'static,
  {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp   = api_router(state).oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes  = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json   = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
  }

  async fn track(state: &ApiState<SqliteStore>, user: &str, event: &str, item: &str) {
    let (status, _) = send(
      state.clone(),
      "POST",
      "/track",
      Some(json!({ "userId": user, "event": event, "itemId": item })),
    ).await;
    assert_eq!(status, StatusCode::CREATED);
  }

  // ── Track ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn track_returns_ok_and_id() {
    let state = make_state().await;
    let (status, body) = send(
      state,
      "POST",
      "/track",
      Some(json!({ "userId": "u1", "event": "add_to_cart", "itemId": "X", "price": 4.5 })),
    ).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ok"], json!(true));
    assert!(body["id"].as_i64().unwrap() > 0);
  }

  #[tokio::test]
  async fn track_without_event_is_400() {
    let state = make_state().await;
    let (status, body) =
      send(state, "POST", "/track", Some(json!({ "itemId": "X" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "event_required" }));
  }

  #[tokio::test]
  async fn track_accepts_loose_timestamp_and_price() {
    let state = make_state().await;
    let (status, _) = send(
      state.clone(),
      "POST",
      "/track",
      Some(json!({
        "userId": "u1", "event": "checkout", "itemId": "X",
        "timestamp": "2024-05-01", "price": "4.5",
      })),
    ).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
      state.clone(),
      "POST",
      "/track",
      Some(json!({
        "userId": "u1", "event": "checkout", "itemId": "Y",
        "timestamp": 1714521600000_i64,
      })),
    ).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
      state.clone(),
      "POST",
      "/track",
      Some(json!({ "event": "checkout", "itemId": "Z", "timestamp": "sometime" })),
    ).await;
    assert_eq!(status, StatusCode::CREATED);

    let events = state.store.fetch_events(&TRACKED_KINDS).await.unwrap();
    assert_eq!(events.len(), 3);
    let midnight = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    assert_eq!(events[0].ts, midnight);
    assert_eq!(events[0].price, 4.5);
    assert_eq!(events[1].ts, midnight);
    assert_ne!(events[2].ts, midnight);
  }

  #[tokio::test]
  async fn mistyped_body_is_400_with_json_error() {
    let state = make_state().await;
    let (status, body) =
      send(state.clone(), "POST", "/reviews", Some(json!({ "rating": "five" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "invalid_json" }));

    let (status, body) =
      send(state, "POST", "/identify", Some(json!(["not", "an", "object"]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "invalid_json" }));
  }

  #[tokio::test]
  async fn unparsable_body_is_400_with_json_error() {
    let state = make_state().await;
    let req = Request::builder()
      .method("POST")
      .uri("/track")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{not json"))
      .unwrap();
    let resp = api_router(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "error": "invalid_json" }));
  }

  // ── Stats ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn stats_on_empty_store() {
    let state = make_state().await;
    let (status, body) = send(state, "GET", "/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "topItems": [], "pairs": [] }));
  }

  #[tokio::test]
  async fn stats_reflect_tracked_events() {
    let state = make_state().await;
    track(&state, "u1", "add_to_cart", "X").await;
    track(&state, "u1", "add_to_cart", "Y").await;
    track(&state, "u2", "checkout", "X").await;
    track(&state, "u2", "checkout", "Y").await;
    track(&state, "u3", "add_to_cart", "X").await;
    track(&state, "u3", "page_view", "Z").await;

    let (status, body) = send(state.clone(), "GET", "/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
      body,
      json!({
        "topItems": [{ "itemId": "X", "count": 3 }, { "itemId": "Y", "count": 2 }],
        "pairs":    [{ "a": "X", "b": "Y", "count": 2 }],
      })
    );

    let (_, body) = send(state, "GET", "/stats?top=1", None).await;
    assert_eq!(body["topItems"].as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn stats_top_zero_is_clamped_to_one() {
    let state = make_state().await;
    track(&state, "u1", "add_to_cart", "X").await;
    track(&state, "u1", "add_to_cart", "Y").await;

    let (_, body) = send(state, "GET", "/stats?top=0", None).await;
    assert_eq!(body["topItems"].as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn stats_with_bad_top_is_400_with_json_error() {
    let state = make_state().await;
    let (status, body) = send(state, "GET", "/stats?top=many", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "invalid_query" }));
  }

  // ── Identify ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn identify_requires_email() {
    let state = make_state().await;
    let (status, body) =
      send(state, "POST", "/identify", Some(json!({ "name": "Ada" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "email_required" }));
  }

  #[tokio::test]
  async fn identify_records_contact() {
    let state = make_state().await;
    let (status, body) = send(
      state,
      "POST",
      "/identify",
      Some(json!({ "userId": "u1", "name": "Ada", "email": "ada@example.com" })),
    ).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ok"], json!(true));
  }

  // ── Reviews ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn reviews_roundtrip_with_defaults() {
    let state = make_state().await;
    let (status, _) = send(state.clone(), "POST", "/reviews", Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
      state.clone(),
      "POST",
      "/reviews",
      Some(json!({ "name": "Bo", "rating": 4, "comment": "nice", "favoriteItem": "teapot" })),
    ).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(state, "GET", "/reviews", None).await;
    assert_eq!(status, StatusCode::OK);
    let reviews = body.as_array().unwrap();
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0]["name"], json!("Guest"));
    assert_eq!(reviews[0]["rating"], json!(5));
    assert_eq!(reviews[0]["favoriteItem"], Value::Null);
    assert_eq!(reviews[1]["name"], json!("Bo"));
    assert_eq!(reviews[1]["favoriteItem"], json!("teapot"));
  }

  #[tokio::test]
  async fn review_with_bad_rating_is_400() {
    let state = make_state().await;
    let (status, body) =
      send(state, "POST", "/reviews", Some(json!({ "rating": 9 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "rating_out_of_range" }));
  }

  // ── Store failures ──────────────────────────────────────────────────────────

  /// A store whose backing database is unreachable.
  #[derive(Clone)]
  struct DownStore;

  fn down() -> std::io::Error { std::io::Error::other("database unreachable") }

  impl StorefrontStore for DownStore {
    type Error = std::io::Error;
    async fn record_event(&self, _: storefront_core::event::NewEvent) -> Result<storefront_core::event::Event, Self::Error> { Err(down()) }
    async fn fetch_events(&self, _: &[storefront_core::event::EventKind]) -> Result<Vec<storefront_core::event::Event>, Self::Error> { Err(down()) }
    async fn record_contact(&self, _: storefront_core::record::NewContact) -> Result<storefront_core::record::Contact, Self::Error> { Err(down()) }
    async fn record_review(&self, _: storefront_core::record::NewReview) -> Result<storefront_core::record::Review, Self::Error> { Err(down()) }
    async fn list_reviews(&self, _: usize) -> Result<Vec<storefront_core::record::Review>, Self::Error> { Err(down()) }
  }

  #[tokio::test]
  async fn store_failure_is_500_without_partial_stats() {
    let state = ApiState::new(Arc::new(DownStore));
    let (status, body) = send(state, "GET", "/stats", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "db_error" }));
  }

  #[tokio::test]
  async fn store_failure_on_ingest_is_500() {
    let state = ApiState::new(Arc::new(DownStore));
    let (status, body) = send(
      state,
      "POST",
      "/track",
      Some(json!({ "event": "checkout", "itemId": "X" })),
    ).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "db_error" }));
  }
}
