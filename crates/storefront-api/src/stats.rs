//! Handler for `GET /stats`.

use axum::{
  Json,
  extract::State,
};
use serde::Deserialize;
use storefront_core::{analytics::Stats, store::StorefrontStore};

use crate::{ApiError, ApiQuery, ApiState, MAX_TOP_N};

#[derive(Debug, Deserialize, Default)]
pub struct StatsParams {
  /// How many items and pairs to return.
  pub top: Option<usize>,
}

/// `GET /stats[?top=N]`: top items and co-occurring pairs.
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  ApiQuery(params): ApiQuery<StatsParams>,
) -> Result<Json<Stats>, ApiError>
where
  S: StorefrontStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let top_n = params.top.unwrap_or(state.stats_top_n).clamp(1, MAX_TOP_N);
  let stats = state.store.get_stats(top_n).await.map_err(ApiError::store)?;
  Ok(Json(stats))
}
