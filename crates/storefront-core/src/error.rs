//! Error types for `storefront-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("event kind is required")]
  MissingEventKind,

  #[error("contact email is required")]
  MissingEmail,

  #[error("rating {0} is outside 1..=5")]
  RatingOutOfRange(i64),
}

impl Error {
  /// Short machine-readable code sent back to HTTP clients.
  pub fn code(&self) -> &'static str {
    match self {
      Self::MissingEventKind => "event_required",
      Self::MissingEmail => "email_required",
      Self::RatingOutOfRange(_) => "rating_out_of_range",
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
