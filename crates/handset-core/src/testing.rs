//! Test doubles shared by the unit tests in this crate.

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::kv::{KeyValueStore, MemoryStore};

#[derive(Debug, Error)]
#[error("storage unavailable")]
pub struct Unavailable;

/// A [`MemoryStore`] whose reads and writes can be switched off to simulate
/// a full quota or a browser with storage disabled.
#[derive(Debug, Default)]
pub struct FailingStore {
  pub inner:        MemoryStore,
  pub fail_reads:   AtomicBool,
  pub fail_writes:  AtomicBool,
  /// Fail only `remove`, leaving `set` working.
  pub fail_removes: AtomicBool,
}

impl FailingStore {
  pub fn set_fail_reads(&self, on: bool) { self.fail_reads.store(on, Ordering::SeqCst); }

  pub fn set_fail_writes(&self, on: bool) { self.fail_writes.store(on, Ordering::SeqCst); }

  pub fn set_fail_removes(&self, on: bool) { self.fail_removes.store(on, Ordering::SeqCst); }
}

impl KeyValueStore for FailingStore {
  type Error = Unavailable;

  fn get(&self, key: &str) -> Result<Option<String>, Unavailable> {
    if self.fail_reads.load(Ordering::SeqCst) {
      return Err(Unavailable);
    }
    self.inner.get(key).map_err(|_| Unavailable)
  }

  fn set(&self, key: &str, value: &str) -> Result<(), Unavailable> {
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(Unavailable);
    }
    self.inner.set(key, value).map_err(|_| Unavailable)
  }

  fn remove(&self, key: &str) -> Result<(), Unavailable> {
    if self.fail_writes.load(Ordering::SeqCst) || self.fail_removes.load(Ordering::SeqCst) {
      return Err(Unavailable);
    }
    self.inner.remove(key).map_err(|_| Unavailable)
  }
}
