//! Core types and state for the handset storefront cart.
//!
//! The cart, the order ledger and the session token all live in a single
//! string key-value space reached through [`kv::KeyValueStore`]. This crate
//! is free of database and CLI dependencies; backends and front-ends depend
//! on it.

mod busy;
mod token;

pub mod cart;
pub mod catalog;
pub mod customer;
pub mod error;
pub mod kv;
pub mod order;
pub mod session;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
