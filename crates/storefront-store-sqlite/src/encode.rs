//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Event kinds are stored by name.

use chrono::{DateTime, Utc};
use storefront_core::{
  event::{Event, EventKind},
  record::Review,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Rating ──────────────────────────────────────────────────────────────────

pub fn decode_rating(raw: i64) -> Result<u8> {
  u8::try_from(raw).map_err(|_| Error::InvalidColumn {
    column: "rating",
    value:  raw.to_string(),
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `events` row.
pub struct RawEvent {
  pub id:      i64,
  pub user_id: Option<String>,
  pub event:   String,
  pub item_id: Option<String>,
  pub price:   f64,
  pub note:    String,
  pub ts:      String,
}

impl RawEvent {
  pub const COLUMNS: &'static str =
    "id, user_id, event, item_id, price, note, ts";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:      row.get(0)?,
      user_id: row.get(1)?,
      event:   row.get(2)?,
      item_id: row.get(3)?,
      price:   row.get(4)?,
      note:    row.get(5)?,
      ts:      row.get(6)?,
    })
  }

  pub fn into_event(self) -> Result<Event> {
    Ok(Event {
      id:      self.id,
      user_id: self.user_id,
      kind:    EventKind::from(self.event),
      item_id: self.item_id,
      price:   self.price,
      note:    self.note,
      ts:      decode_dt(&self.ts)?,
    })
  }
}

/// Raw values read directly from a `reviews` row.
pub struct RawReview {
  pub id:            i64,
  pub name:          String,
  pub email:         String,
  pub rating:        i64,
  pub comment:       String,
  pub favorite_item: Option<String>,
  pub ts:            String,
}

impl RawReview {
  pub const COLUMNS: &'static str =
    "id, name, email, rating, comment, favorite_item, ts";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      name:          row.get(1)?,
      email:         row.get(2)?,
      rating:        row.get(3)?,
      comment:       row.get(4)?,
      favorite_item: row.get(5)?,
      ts:            row.get(6)?,
    })
  }

  pub fn into_review(self) -> Result<Review> {
    Ok(Review {
      id:            self.id,
      name:          self.name,
      email:         self.email,
      rating:        decode_rating(self.rating)?,
      comment:       self.comment,
      favorite_item: self.favorite_item,
      ts:            decode_dt(&self.ts)?,
    })
  }
}
