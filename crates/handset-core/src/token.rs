//! Human-facing identifiers: order numbers and session tokens.
//!
//! Both combine a millisecond timestamp with an OS-random suffix. Collisions
//! are not prevented, only made improbable.

use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore as _};

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `ORD-<unix millis>-<9 base36 chars>`.
pub(crate) fn order_number(at: DateTime<Utc>) -> String {
  let suffix: String = (0..9)
    .map(|_| char::from(BASE36[(OsRng.next_u32() % 36) as usize]))
    .collect();
  format!("ORD-{}-{suffix}", at.timestamp_millis())
}

/// `session_<unix millis>_<16 hex digits>`.
pub(crate) fn session_token(at: DateTime<Utc>) -> String {
  format!("session_{}_{:016x}", at.timestamp_millis(), OsRng.next_u64())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn order_number_shape() {
    let at = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_123).unwrap();
    let n = order_number(at);
    let suffix = n.strip_prefix("ORD-1700000000123-").unwrap();
    assert_eq!(suffix.len(), 9);
    assert!(suffix.bytes().all(|b| BASE36.contains(&b)));
  }

  #[test]
  fn session_token_shape() {
    let at = DateTime::<Utc>::from_timestamp_millis(42).unwrap();
    let t = session_token(at);
    let hex = t.strip_prefix("session_42_").unwrap();
    assert_eq!(hex.len(), 16);
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
  }
}
