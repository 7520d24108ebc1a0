//! The read-only product table: colour and storage variants and their
//! prices.
//!
//! Prices are whole rupees. Nothing here has side effects; the cart only ever
//! sees the display strings and unit price a lookup produced.

use crate::{Error, Result, cart::NewLineItem};

/// Price of the base (256GB) configuration.
pub const BASE_PRICE: u64 = 45_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorOption {
  pub id:   &'static str,
  pub name: &'static str,
  /// CSS hex swatch.
  pub hex:  &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageOption {
  pub id:             &'static str,
  pub label:          &'static str,
  /// Added to [`BASE_PRICE`].
  pub price_increase: u64,
}

const COLORS: &[ColorOption] = &[
  ColorOption { id: "midnight", name: "Midnight Black", hex: "#1a1a2e" },
  ColorOption { id: "ocean",    name: "Ocean Blue",     hex: "#0066cc" },
  ColorOption { id: "aurora",   name: "Aurora Purple",  hex: "#9333ea" },
  ColorOption { id: "forest",   name: "Forest Green",   hex: "#059669" },
  ColorOption { id: "sunset",   name: "Sunset Gold",    hex: "#f97316" },
];

const STORAGES: &[StorageOption] = &[
  StorageOption { id: "256gb", label: "256GB", price_increase: 0 },
  StorageOption { id: "512gb", label: "512GB", price_increase: 5_000 },
  StorageOption { id: "1tb",   label: "1TB",   price_increase: 15_000 },
];

pub fn colors() -> &'static [ColorOption] { COLORS }

pub fn storages() -> &'static [StorageOption] { STORAGES }

pub fn color_name(color_id: &str) -> Option<&'static str> {
  COLORS.iter().find(|c| c.id == color_id).map(|c| c.name)
}

pub fn storage_label(storage_id: &str) -> Option<&'static str> {
  STORAGES.iter().find(|s| s.id == storage_id).map(|s| s.label)
}

/// Unit price for a storage selection. Unknown ids price at [`BASE_PRICE`].
pub fn price_for_storage(storage_id: &str) -> u64 {
  BASE_PRICE
    + STORAGES
      .iter()
      .find(|s| s.id == storage_id)
      .map_or(0, |s| s.price_increase)
}

// ─── Variant ─────────────────────────────────────────────────────────────────

/// A fully resolved colour/storage selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
  pub color:   &'static str,
  pub storage: &'static str,
  pub price:   u64,
}

impl Variant {
  /// The cart input for `quantity` units of this variant.
  pub fn line(&self, quantity: u32) -> NewLineItem {
    NewLineItem {
      color: self.color.to_owned(),
      storage: self.storage.to_owned(),
      quantity,
      price: self.price,
    }
  }
}

/// Resolve catalog ids into display strings and a unit price.
pub fn resolve(color_id: &str, storage_id: &str) -> Result<Variant> {
  let color = color_name(color_id)
    .ok_or_else(|| Error::UnknownVariant(format!("color {color_id}")))?;
  let storage = storage_label(storage_id)
    .ok_or_else(|| Error::UnknownVariant(format!("storage {storage_id}")))?;
  Ok(Variant {
    color,
    storage,
    price: price_for_storage(storage_id),
  })
}

// ─── Formatting ──────────────────────────────────────────────────────────────

/// Render a rupee amount with Indian digit grouping, e.g. `₹1,35,000`.
pub fn format_inr(amount: u64) -> String {
  let digits = amount.to_string();
  if digits.len() <= 3 {
    return format!("₹{digits}");
  }

  let (head, tail) = digits.split_at(digits.len() - 3);
  let mut groups = Vec::new();
  let mut rest = head;
  while rest.len() > 2 {
    let (front, pair) = rest.split_at(rest.len() - 2);
    groups.push(pair);
    rest = front;
  }
  groups.push(rest);
  groups.reverse();

  format!("₹{},{tail}", groups.join(","))
}
