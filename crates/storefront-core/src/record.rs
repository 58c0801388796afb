//! Contacts and reviews: the non-analytics records the storefront keeps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Contacts ────────────────────────────────────────────────────────────────

/// Someone who left their details, e.g. via the newsletter form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
  pub id:         i64,
  pub user_id:    Option<String>,
  pub name:       String,
  pub email:      String,
  pub phone:      String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::StorefrontStore::record_contact`].
#[derive(Debug, Clone)]
pub struct NewContact {
  pub user_id: Option<String>,
  pub name:    String,
  pub email:   String,
  pub phone:   String,
}

impl NewContact {
  /// A contact with only an email. Blank emails are rejected.
  pub fn new(email: &str) -> Result<Self> {
    let email = email.trim();
    if email.is_empty() {
      return Err(Error::MissingEmail);
    }
    Ok(Self {
      user_id: None,
      name:    String::new(),
      email:   email.to_owned(),
      phone:   String::new(),
    })
  }
}

// ─── Reviews ─────────────────────────────────────────────────────────────────

pub const DEFAULT_REVIEWER: &str = "Guest";
pub const DEFAULT_RATING: u8 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
  pub id:            i64,
  pub name:          String,
  pub email:         String,
  pub rating:        u8,
  pub comment:       String,
  pub favorite_item: Option<String>,
  pub ts:            DateTime<Utc>,
}

/// Input to [`crate::store::StorefrontStore::record_review`].
#[derive(Debug, Clone)]
pub struct NewReview {
  pub name:          String,
  pub email:         String,
  pub rating:        u8,
  pub comment:       String,
  pub favorite_item: Option<String>,
}

impl Default for NewReview {
  fn default() -> Self {
    Self {
      name:          DEFAULT_REVIEWER.to_owned(),
      email:         String::new(),
      rating:        DEFAULT_RATING,
      comment:       String::new(),
      favorite_item: None,
    }
  }
}

impl NewReview {
  /// Validate a client-supplied star rating.
  pub fn parse_rating(raw: i64) -> Result<u8> {
    match u8::try_from(raw) {
      Ok(r @ 1..=5) => Ok(r),
      _ => Err(Error::RatingOutOfRange(raw)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn contact_requires_email() {
    assert!(matches!(NewContact::new(""), Err(Error::MissingEmail)));
    assert!(matches!(NewContact::new("   "), Err(Error::MissingEmail)));
    assert_eq!(NewContact::new(" a@b.c ").unwrap().email, "a@b.c");
  }

  #[test]
  fn rating_bounds() {
    assert_eq!(NewReview::parse_rating(1).unwrap(), 1);
    assert_eq!(NewReview::parse_rating(5).unwrap(), 5);
    assert!(matches!(NewReview::parse_rating(0), Err(Error::RatingOutOfRange(0))));
    assert!(matches!(NewReview::parse_rating(6), Err(Error::RatingOutOfRange(6))));
    assert!(NewReview::parse_rating(-3).is_err());
  }
}
