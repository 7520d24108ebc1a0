//! Per-installation session token.

use chrono::Utc;
use tracing::info;

use crate::{
  Error, Result,
  kv::{KeyValueStore, keys},
  token,
};

/// Return the stored session token, creating and persisting one on first
/// use. Idempotent: later calls return the same token. An empty stored value
/// counts as absent.
pub fn ensure_session_id<S>(store: &S) -> Result<String>
where
  S: KeyValueStore + ?Sized,
{
  let existing = store.get(keys::SESSION_ID).map_err(Error::storage)?;
  if let Some(id) = existing.filter(|id| !id.is_empty()) {
    return Ok(id);
  }

  let id = token::session_token(Utc::now());
  store.set(keys::SESSION_ID, &id).map_err(Error::storage)?;
  info!(session_id = %id, "new session");
  Ok(id)
}
