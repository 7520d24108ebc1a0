//! SQLite backend for the handset key-value store.
//!
//! A single `kv` table holds the cart, the order log and the session token.
//! Calls are synchronous and run on the caller's thread.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
