//! Error types for `handset-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// The key-value backend could not be read or written.
  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// A persisted value exists but does not decode into the expected shape.
  #[error("stored value under {key:?} is corrupt: {source}")]
  Corrupt {
    key:    &'static str,
    #[source]
    source: serde_json::Error,
  },

  #[error("cannot check out an empty cart")]
  EmptyCart,

  /// A quantity or line total would exceed what the cart can represent.
  #[error("cart quantity or total overflows")]
  Overflow,

  #[error("invalid quantity: {0}")]
  InvalidQuantity(i64),

  #[error("unknown variant: {0:?}")]
  UnknownVariant(String),

  #[error("cart item not found: {0}")]
  ItemNotFound(Uuid),

  #[error("serialization error: {0}")]
  Json(#[from] serde_json::Error),
}

impl Error {
  pub(crate) fn storage<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Storage(Box::new(err))
  }

  /// `true` for failures of the durable backend itself (unavailable or
  /// corrupt), as opposed to rejected input.
  pub fn is_storage(&self) -> bool {
    matches!(self, Self::Storage(_) | Self::Corrupt { .. })
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
