//! Handler for `POST /track`.
//!
//! The browser posts one event per interaction. Blank `userId`/`itemId`
//! become `NULL`; such events are stored but may be skipped by the analytics.
//! `price` and `timestamp` are read leniently: a value the server cannot
//! interpret falls back to its default instead of dropping the event.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;
use storefront_core::{
  event::{EventKind, NewEvent},
  store::StorefrontStore,
};

use crate::{ApiError, ApiJson, ApiState, Created, non_blank};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackBody {
  pub user_id:   Option<String>,
  /// Event name, e.g. `add_to_cart`. Required.
  pub event:     Option<String>,
  pub item_id:   Option<String>,
  /// A number or a numeric string.
  #[serde(default)]
  pub price:     Value,
  pub note:      Option<String>,
  /// Client clock: RFC 3339, a bare `YYYY-MM-DD`, or epoch milliseconds.
  /// Anything else is replaced by the ingest time.
  #[serde(default)]
  pub timestamp: Value,
}

/// Price sent by the client, or `0` when absent or unreadable.
fn parse_price(raw: &Value) -> f64 {
  match raw {
    Value::Number(n) => n.as_f64().unwrap_or_default(),
    Value::String(s) => s.trim().parse().unwrap_or_default(),
    _ => 0.0,
  }
}

/// Client timestamp, if it is in one of the shapes browsers commonly send.
fn parse_timestamp(raw: &Value) -> Option<DateTime<Utc>> {
  match raw {
    Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
    Value::String(s) => {
      let s = s.trim();
      DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
          NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
        })
    }
    _ => None,
  }
}

impl TryFrom<TrackBody> for NewEvent {
  type Error = storefront_core::Error;

  fn try_from(b: TrackBody) -> Result<Self, Self::Error> {
    let kind = EventKind::parse(b.event.as_deref().unwrap_or_default())?;
    Ok(NewEvent {
      user_id: non_blank(b.user_id),
      item_id: non_blank(b.item_id),
      price:   parse_price(&b.price),
      note:    b.note.unwrap_or_default(),
      ts:      parse_timestamp(&b.timestamp),
      ..NewEvent::new(kind)
    })
  }
}

/// `POST /track`: returns 201 + `{"ok":true,"id":<id>}`.
pub async fn track<S>(
  State(state): State<ApiState<S>>,
  ApiJson(body): ApiJson<TrackBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: StorefrontStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let input = NewEvent::try_from(body)?;
  let event = state.store.record_event(input).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(Created::new(event.id))))
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use serde_json::json;

  use super::*;

  #[test]
  fn price_accepts_numbers_and_numeric_strings() {
    assert_eq!(parse_price(&json!(4.5)), 4.5);
    assert_eq!(parse_price(&json!(" 4.5 ")), 4.5);
    assert_eq!(parse_price(&json!("free")), 0.0);
    assert_eq!(parse_price(&Value::Null), 0.0);
  }

  #[test]
  fn timestamp_shapes() {
    let noon = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let midnight = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();

    assert_eq!(parse_timestamp(&json!("2024-05-01T12:00:00Z")), Some(noon));
    assert_eq!(parse_timestamp(&json!("2024-05-01")), Some(midnight));
    assert_eq!(parse_timestamp(&json!(noon.timestamp_millis())), Some(noon));
    assert_eq!(parse_timestamp(&json!("last tuesday")), None);
    assert_eq!(parse_timestamp(&Value::Null), None);
  }
}
