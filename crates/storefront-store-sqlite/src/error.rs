//! Error type for `storefront-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored value could not be mapped back onto its domain type.
  #[error("invalid value in column {column}: {value}")]
  InvalidColumn { column: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
