//! The `StorefrontStore` trait.
//!
//! Implemented by storage backends (e.g. `storefront-store-sqlite`). The HTTP
//! layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  analytics::{self, Stats},
  event::{Event, EventKind, NewEvent, TRACKED_KINDS},
  record::{Contact, NewContact, NewReview, Review},
};

/// Abstraction over a storefront store backend.
///
/// Every table is append-only: records are created on ingest and never
/// updated or deleted.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait StorefrontStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Events ────────────────────────────────────────────────────────────

  /// Append an event. The store assigns the id, and the timestamp when the
  /// caller did not supply one.
  fn record_event(
    &self,
    input: NewEvent,
  ) -> impl Future<Output = Result<Event, Self::Error>> + Send + '_;

  /// Every event whose kind is in `kinds` and which carries an item id, in
  /// insertion order.
  ///
  /// Implementations must read from a single consistent snapshot so that
  /// concurrent writers cannot make the result internally inconsistent.
  fn fetch_events<'a>(
    &'a self,
    kinds: &'a [EventKind],
  ) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + 'a;

  // ── Contacts and reviews ──────────────────────────────────────────────

  fn record_contact(
    &self,
    input: NewContact,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  fn record_review(
    &self,
    input: NewReview,
  ) -> impl Future<Output = Result<Review, Self::Error>> + Send + '_;

  /// The oldest `limit` reviews, ascending by id.
  fn list_reviews(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Review>, Self::Error>> + Send + '_;

  // ── Analytics ─────────────────────────────────────────────────────────

  /// Top items and co-occurring pairs, computed from one fetch of the
  /// tracked events. A store failure yields no partial result.
  fn get_stats(
    &self,
    top_n: usize,
  ) -> impl Future<Output = Result<Stats, Self::Error>> + Send + '_ {
    async move {
      let events = self.fetch_events(&TRACKED_KINDS).await?;
      Ok(analytics::stats(&events, top_n))
    }
  }
}
