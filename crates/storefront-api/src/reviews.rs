//! Handlers for `/reviews` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/reviews` | Oldest first, at most [`LIST_LIMIT`] |
//! | `POST` | `/reviews` | Body: [`ReviewBody`]; every field optional |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use storefront_core::{
  record::{NewReview, Review},
  store::StorefrontStore,
};

use crate::{ApiError, ApiJson, ApiState, Created, non_blank};

pub const LIST_LIMIT: usize = 100;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /reviews`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Review>>, ApiError>
where
  S: StorefrontStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let reviews = state
    .store
    .list_reviews(LIST_LIMIT)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(reviews))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewBody {
  pub name:          Option<String>,
  pub email:         Option<String>,
  /// 1–5; defaults to 5.
  pub rating:        Option<i64>,
  pub comment:       Option<String>,
  pub favorite_item: Option<String>,
}

impl TryFrom<ReviewBody> for NewReview {
  type Error = storefront_core::Error;

  fn try_from(b: ReviewBody) -> Result<Self, Self::Error> {
    let defaults = NewReview::default();
    Ok(NewReview {
      name:          non_blank(b.name).unwrap_or(defaults.name),
      email:         b.email.unwrap_or(defaults.email),
      rating:        b.rating.map(NewReview::parse_rating).transpose()?.unwrap_or(defaults.rating),
      comment:       b.comment.unwrap_or(defaults.comment),
      favorite_item: non_blank(b.favorite_item),
    })
  }
}

/// `POST /reviews`: returns 201 + `{"ok":true,"id":<id>}`.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  ApiJson(body): ApiJson<ReviewBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: StorefrontStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let review = state
    .store
    .record_review(NewReview::try_from(body)?)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(Created::new(review.id))))
}
