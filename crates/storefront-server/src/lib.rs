//! Storefront server wiring: configuration and the top-level router.
//!
//! The binary in `main.rs` only parses arguments, initialises tracing and
//! calls into this crate.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use serde::Deserialize;
use storefront_api::{ApiState, DEFAULT_TOP_N, api_router};
use storefront_core::store::StorefrontStore;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `STOREFRONT_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:        String,
  #[serde(default = "default_port")]
  pub port:        u16,
  /// SQLite database file; a leading `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path:  PathBuf,
  /// Rows returned by `GET /api/stats` when the request has no `?top=`.
  #[serde(default = "default_top_n")]
  pub stats_top_n: usize,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 3000 }
fn default_store_path() -> PathBuf { PathBuf::from("data.db") }
fn default_top_n() -> usize { DEFAULT_TOP_N }

impl ServerConfig {
  /// Layer the optional TOML file under the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("STOREFRONT"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: the JSON API nested under `/api`.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: StorefrontStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let state = ApiState { store, stats_top_n: config.stats_top_n };
  Router::new().nest("/api", api_router(state))
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use storefront_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  #[test]
  fn missing_config_file_yields_defaults() {
    let cfg = ServerConfig::load(Path::new("does-not-exist.toml")).unwrap();
    assert_eq!(cfg.port, 3000);
    assert_eq!(cfg.stats_top_n, DEFAULT_TOP_N);
    assert_eq!(cfg.store_path, PathBuf::from("data.db"));
  }

  #[test]
  fn tilde_expands_only_as_prefix() {
    let plain = Path::new("data/~/x.db");
    assert_eq!(expand_tilde(plain), plain.to_path_buf());
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expand_tilde(Path::new("~/x.db")), PathBuf::from(home).join("x.db"));
    }
  }

  #[tokio::test]
  async fn api_is_nested_under_prefix() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let cfg   = ServerConfig::load(Path::new("does-not-exist.toml")).unwrap();
    let app   = app(Arc::new(store), &cfg);

    let req  = Request::builder().uri("/api/stats").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, serde_json::json!({ "topItems": [], "pairs": [] }));

    let req  = Request::builder().uri("/stats").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
