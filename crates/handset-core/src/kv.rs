//! The `KeyValueStore` trait and an in-memory implementation.
//!
//! All durable state (cart, order log, session token) is kept as JSON strings
//! under a handful of fixed keys. Backends (e.g. `handset-store-sqlite`)
//! implement the trait; the cart, ledger and session code only ever talk to
//! this abstraction.

use std::{collections::BTreeMap, sync::Mutex};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{Error, Result};

/// Keys of the shared key-space.
pub mod keys {
  pub const CART: &str = "cart";
  pub const ORDERS: &str = "orders";
  pub const SESSION_ID: &str = "sessionId";
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// String-keyed, string-valued durable storage.
///
/// Every call is a bounded synchronous read or write. Implementations are
/// shared between components through an `Arc`, so methods take `&self`.
pub trait KeyValueStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the value under `key`, or `None` if the key is absent.
  fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

  /// Store `value` under `key`, replacing any previous value.
  fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

  /// Delete `key`. Deleting an absent key is not an error.
  fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

// ─── JSON helpers ────────────────────────────────────────────────────────────

/// Read and decode the JSON value under `key`.
pub(crate) fn read_json<S, T>(store: &S, key: &'static str) -> Result<Option<T>>
where
  S: KeyValueStore + ?Sized,
  T: DeserializeOwned,
{
  let Some(raw) = store.get(key).map_err(Error::storage)? else {
    return Ok(None);
  };
  serde_json::from_str(&raw)
    .map(Some)
    .map_err(|source| Error::Corrupt { key, source })
}

/// Encode `value` as JSON and store it under `key`.
pub(crate) fn write_json<S, T>(store: &S, key: &str, value: &T) -> Result<()>
where
  S: KeyValueStore + ?Sized,
  T: Serialize + ?Sized,
{
  let raw = serde_json::to_string(value)?;
  store.set(key, &raw).map_err(Error::storage)
}

// ─── In-memory store ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MemoryError {
  #[error("memory store lock poisoned")]
  Poisoned,
}

/// A process-local store. Nothing survives the process; useful for tests and
/// throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
  entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Number of keys currently held.
  pub fn len(&self) -> usize {
    self.entries.lock().map(|e| e.len()).unwrap_or_default()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl KeyValueStore for MemoryStore {
  type Error = MemoryError;

  fn get(&self, key: &str) -> Result<Option<String>, MemoryError> {
    let entries = self.entries.lock().map_err(|_| MemoryError::Poisoned)?;
    Ok(entries.get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<(), MemoryError> {
    let mut entries = self.entries.lock().map_err(|_| MemoryError::Poisoned)?;
    entries.insert(key.to_owned(), value.to_owned());
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<(), MemoryError> {
    let mut entries = self.entries.lock().map_err(|_| MemoryError::Poisoned)?;
    entries.remove(key);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn memory_store_set_get_remove() {
    let s = MemoryStore::new();
    assert!(s.get("cart").unwrap().is_none());

    s.set("cart", "[]").unwrap();
    assert_eq!(s.get("cart").unwrap().as_deref(), Some("[]"));

    s.set("cart", "[1]").unwrap();
    assert_eq!(s.get("cart").unwrap().as_deref(), Some("[1]"));
    assert_eq!(s.len(), 1);

    s.remove("cart").unwrap();
    assert!(s.get("cart").unwrap().is_none());
    // Removing again is fine.
    s.remove("cart").unwrap();
    assert!(s.is_empty());
  }

  #[test]
  fn read_json_reports_corrupt_key() {
    let s = MemoryStore::new();
    s.set(keys::CART, "{not json").unwrap();

    let err = read_json::<_, Vec<u32>>(&s, keys::CART).unwrap_err();
    assert!(matches!(err, Error::Corrupt { key: "cart", .. }));
    assert!(err.is_storage());
  }
}
