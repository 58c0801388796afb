//! [`SqliteStore`]: the SQLite implementation of [`StorefrontStore`].

use std::path::Path;

use chrono::Utc;
use storefront_core::{
  event::{Event, EventKind, NewEvent},
  record::{Contact, NewContact, NewReview, Review},
  store::StorefrontStore,
};

use crate::{
  encode::{encode_dt, RawEvent, RawReview},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A storefront store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── StorefrontStore impl ────────────────────────────────────────────────────

impl StorefrontStore for SqliteStore {
  type Error = Error;

  // ── Events ────────────────────────────────────────────────────────────────

  async fn record_event(&self, input: NewEvent) -> Result<Event> {
    let ts        = input.ts.unwrap_or_else(Utc::now);
    let ts_str    = encode_dt(ts);
    let kind_str  = input.kind.as_str().to_owned();
    let user_id   = input.user_id.clone();
    let item_id   = input.item_id.clone();
    let note      = input.note.clone();
    let price     = input.price;

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO events (user_id, event, item_id, price, note, ts)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![user_id, kind_str, item_id, price, note, ts_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(id, kind = %input.kind, "recorded event");

    Ok(Event {
      id,
      user_id: input.user_id,
      kind:    input.kind,
      item_id: input.item_id,
      price:   input.price,
      note:    input.note,
      ts,
    })
  }

  async fn fetch_events(&self, kinds: &[EventKind]) -> Result<Vec<Event>> {
    if kinds.is_empty() {
      return Ok(Vec::new());
    }

    let names: Vec<String> = kinds.iter().map(|k| k.as_str().to_owned()).collect();
    let placeholders = (1..=names.len())
      .map(|i| format!("?{i}"))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!(
      "SELECT {cols} FROM events
       WHERE event IN ({placeholders}) AND item_id IS NOT NULL
       ORDER BY id",
      cols = RawEvent::COLUMNS,
    );

    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        // One read transaction: every caller sees a single consistent
        // snapshot even while writers append.
        let tx = conn.transaction()?;
        let rows = {
          let mut stmt = tx.prepare(&sql)?;
          stmt
            .query_map(rusqlite::params_from_iter(names.iter()), RawEvent::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        tx.commit()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }

  // ── Contacts and reviews ──────────────────────────────────────────────────

  async fn record_contact(&self, input: NewContact) -> Result<Contact> {
    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);
    let row        = input.clone();

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contacts (user_id, name, email, phone, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![row.user_id, row.name, row.email, row.phone, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Contact {
      id,
      user_id: input.user_id,
      name:    input.name,
      email:   input.email,
      phone:   input.phone,
      created_at,
    })
  }

  async fn record_review(&self, input: NewReview) -> Result<Review> {
    let ts     = Utc::now();
    let ts_str = encode_dt(ts);
    let row    = input.clone();

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO reviews (name, email, rating, comment, favorite_item, ts)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            row.name,
            row.email,
            row.rating,
            row.comment,
            row.favorite_item,
            ts_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Review {
      id,
      name:          input.name,
      email:         input.email,
      rating:        input.rating,
      comment:       input.comment,
      favorite_item: input.favorite_item,
      ts,
    })
  }

  async fn list_reviews(&self, limit: usize) -> Result<Vec<Review>> {
    let limit_val = i64::try_from(limit).unwrap_or(i64::MAX);
    let sql = format!(
      "SELECT {cols} FROM reviews ORDER BY id ASC LIMIT ?1",
      cols = RawReview::COLUMNS,
    );

    let raws: Vec<RawReview> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], RawReview::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReview::into_review).collect()
  }
}
