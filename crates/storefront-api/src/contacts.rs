//! Handler for `POST /identify`.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use storefront_core::{record::NewContact, store::StorefrontStore};

use crate::{ApiError, ApiJson, ApiState, Created, non_blank};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyBody {
  pub user_id: Option<String>,
  pub name:    Option<String>,
  pub email:   Option<String>,
  pub phone:   Option<String>,
}

/// `POST /identify`; 400 `email_required` when the email is missing.
pub async fn identify<S>(
  State(state): State<ApiState<S>>,
  ApiJson(body): ApiJson<IdentifyBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: StorefrontStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut input = NewContact::new(body.email.as_deref().unwrap_or_default())?;
  input.user_id = non_blank(body.user_id);
  input.name    = body.name.unwrap_or_default();
  input.phone   = body.phone.unwrap_or_default();

  let contact = state.store.record_contact(input).await.map_err(ApiError::store)?;
  tracing::debug!(id = contact.id, "recorded contact");
  Ok((StatusCode::CREATED, Json(Created::new(contact.id))))
}
