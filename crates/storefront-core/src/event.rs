//! Interaction events, the raw input to the analytics computation.
//!
//! Events are append-only. Nothing derived from them is ever persisted; stats
//! are recomputed from the log on every request.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Kind ────────────────────────────────────────────────────────────────────

/// What the user did. Unknown names from the browser are kept verbatim in
/// [`EventKind::Other`] so the log stays lossless.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
  AddToCart,
  Checkout,
  Other(String),
}

/// Event kinds that feed the analytics.
pub const TRACKED_KINDS: [EventKind; 2] =
  [EventKind::AddToCart, EventKind::Checkout];

impl EventKind {
  /// Parse a kind supplied by a client; an empty name is rejected.
  pub fn parse(raw: &str) -> Result<Self> {
    let raw = raw.trim();
    if raw.is_empty() {
      return Err(Error::MissingEventKind);
    }
    Ok(Self::from(raw.to_owned()))
  }

  /// The name stored in the `event` column and sent over the wire.
  pub fn as_str(&self) -> &str {
    match self {
      Self::AddToCart => "add_to_cart",
      Self::Checkout => "checkout",
      Self::Other(name) => name,
    }
  }

  pub fn is_tracked(&self) -> bool { TRACKED_KINDS.contains(self) }
}

impl From<String> for EventKind {
  fn from(s: String) -> Self {
    match s.as_str() {
      "add_to_cart" => Self::AddToCart,
      "checkout" => Self::Checkout,
      _ => Self::Other(s),
    }
  }
}

impl From<EventKind> for String {
  fn from(k: EventKind) -> Self {
    match k {
      EventKind::Other(name) => name,
      known => known.as_str().to_owned(),
    }
  }
}

impl fmt::Display for EventKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Event ───────────────────────────────────────────────────────────────────

/// A recorded user interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
  pub id:      i64,
  /// Browser-generated visitor id; `None` for anonymous sessions.
  pub user_id: Option<String>,
  #[serde(rename = "event")]
  pub kind:    EventKind,
  pub item_id: Option<String>,
  pub price:   f64,
  pub note:    String,
  /// Client-supplied timestamp, or the ingest time when absent.
  pub ts:      DateTime<Utc>,
}

impl Event {
  /// Bare event with default metadata for feeding the analytics directly.
  #[cfg(test)]
  pub fn new(
    user_id: Option<&str>,
    kind: EventKind,
    item_id: Option<&str>,
  ) -> Self {
    Self {
      id: 0,
      user_id: user_id.map(str::to_owned),
      kind,
      item_id: item_id.map(str::to_owned),
      price: 0.0,
      note: String::new(),
      ts: DateTime::<Utc>::default(),
    }
  }
}

// ─── NewEvent ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::StorefrontStore::record_event`].
#[derive(Debug, Clone)]
pub struct NewEvent {
  pub user_id: Option<String>,
  pub kind:    EventKind,
  pub item_id: Option<String>,
  pub price:   f64,
  pub note:    String,
  /// When `None` the store stamps the event with the current time.
  pub ts:      Option<DateTime<Utc>>,
}

impl NewEvent {
  /// Convenience constructor with all optional fields set to their defaults.
  pub fn new(kind: EventKind) -> Self {
    Self {
      user_id: None,
      kind,
      item_id: None,
      price: 0.0,
      note: String::new(),
      ts: None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn known_kinds_roundtrip_through_strings() {
    for kind in TRACKED_KINDS {
      assert_eq!(EventKind::from(String::from(kind.clone())), kind);
    }
  }

  #[test]
  fn unknown_kind_is_kept_verbatim() {
    let kind = EventKind::parse("page_view").unwrap();
    assert_eq!(kind, EventKind::Other("page_view".into()));
    assert!(!kind.is_tracked());
    assert_eq!(serde_json::to_string(&kind).unwrap(), "\"page_view\"");
  }

  #[test]
  fn blank_kind_is_rejected() {
    assert!(matches!(EventKind::parse("  "), Err(Error::MissingEventKind)));
  }
}
