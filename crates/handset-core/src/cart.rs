//! Line items and the [`CartStore`] that owns them.
//!
//! The cart is an ordered list of line items, at most one per
//! (colour, storage) pair. Every mutation is persisted under
//! [`keys::CART`] before it becomes visible in memory, so a failed write
//! leaves the last-known-good cart in place.

use std::{cell::Cell, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  busy::BusyGuard,
  kv::{self, KeyValueStore, keys},
};

// ─── LineItem ────────────────────────────────────────────────────────────────

/// One cart row. `color` and `storage` are display strings resolved from the
/// catalog when the item was added; `price` is the unit price at that moment
/// and is never re-derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
  pub id:       Uuid,
  pub color:    String,
  pub storage:  String,
  pub quantity: u32,
  pub price:    u64,
}

impl LineItem {
  /// `price * quantity`. Exact for every line a [`CartStore`] accepted.
  pub fn line_total(&self) -> u64 {
    self.checked_line_total().unwrap_or(u64::MAX)
  }

  fn checked_line_total(&self) -> Option<u64> {
    self.price.checked_mul(u64::from(self.quantity))
  }

  fn is_variant(&self, color: &str, storage: &str) -> bool {
    self.color == color && self.storage == storage
  }
}

/// Input to [`CartStore::add_item`]. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
  pub color:    String,
  pub storage:  String,
  pub quantity: u32,
  pub price:    u64,
}

/// `Σ price * quantity`, or `None` if any step overflows `u64`.
fn checked_total(items: &[LineItem]) -> Option<u64> {
  items
    .iter()
    .try_fold(0u64, |acc, l| acc.checked_add(l.checked_line_total()?))
}

// ─── CartStore ───────────────────────────────────────────────────────────────

/// The authoritative in-memory cart, kept in sync with a [`KeyValueStore`].
///
/// Construct one per process and hand it to whatever needs it. Operations are
/// atomic per call: the new cart is written first, then swapped in.
pub struct CartStore<S> {
  store: Arc<S>,
  items: Vec<LineItem>,
  busy:  Cell<bool>,
}

impl<S: KeyValueStore> CartStore<S> {
  /// An empty cart over `store`. Call [`load`](Self::load) to pick up a
  /// persisted cart.
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      items: Vec::new(),
      busy: Cell::new(false),
    }
  }

  /// Replace the in-memory cart with the persisted one.
  ///
  /// An absent key yields an empty cart. Unreadable or corrupt data also
  /// yields an empty cart, and the failure is returned so the caller can
  /// decide whether to mention it.
  pub fn load(&mut self) -> Result<()> {
    let _busy = BusyGuard::enter(&self.busy);
    match kv::read_json::<_, Vec<LineItem>>(&*self.store, keys::CART) {
      Ok(items) => {
        let items = items.unwrap_or_default();
        if checked_total(&items).is_none() {
          warn!("stored cart total overflows; starting empty");
          self.items.clear();
          return Err(Error::Overflow);
        }
        self.items = items;
        debug!(lines = self.items.len(), "cart loaded");
        Ok(())
      }
      Err(e) => {
        warn!(error = %e, "could not load cart; starting empty");
        self.items.clear();
        Err(e)
      }
    }
  }

  /// Add `item`, merging into the existing line for the same
  /// (colour, storage) pair if there is one. Returns the id of the line.
  ///
  /// A merge sums the quantities and keeps the existing line's price. A
  /// quantity or total that would overflow is rejected with
  /// [`Error::Overflow`] and the cart is left as it was.
  pub fn add_item(&mut self, item: NewLineItem) -> Result<Uuid> {
    if item.quantity == 0 {
      return Err(Error::InvalidQuantity(0));
    }
    let _busy = BusyGuard::enter(&self.busy);

    let mut next = self.items.clone();
    let id = match next
      .iter_mut()
      .find(|line| line.is_variant(&item.color, &item.storage))
    {
      Some(line) => {
        if line.price != item.price {
          debug!(
            id = %line.id,
            kept = line.price,
            ignored = item.price,
            "merge kept the first unit price"
          );
        }
        line.quantity = line
          .quantity
          .checked_add(item.quantity)
          .ok_or(Error::Overflow)?;
        line.id
      }
      None => {
        let line = LineItem {
          id:       Uuid::new_v4(),
          color:    item.color,
          storage:  item.storage,
          quantity: item.quantity,
          price:    item.price,
        };
        let id = line.id;
        next.push(line);
        id
      }
    };
    checked_total(&next).ok_or(Error::Overflow)?;

    self.persist(&next)?;
    self.items = next;
    debug!(%id, "item added to cart");
    Ok(id)
  }

  /// Remove the line with `id`. A missing id is a no-op.
  pub fn remove_item(&mut self, id: Uuid) -> Result<()> {
    let _busy = BusyGuard::enter(&self.busy);

    let next: Vec<LineItem> =
      self.items.iter().filter(|l| l.id != id).cloned().collect();

    self.persist(&next)?;
    self.items = next;
    debug!(%id, "item removed from cart");
    Ok(())
  }

  /// Set the quantity of the line with `id`.
  ///
  /// A quantity of zero or less removes the line. A missing id is a no-op.
  pub fn update_quantity(&mut self, id: Uuid, quantity: i64) -> Result<()> {
    if quantity <= 0 {
      return self.remove_item(id);
    }
    let quantity =
      u32::try_from(quantity).map_err(|_| Error::InvalidQuantity(quantity))?;
    let _busy = BusyGuard::enter(&self.busy);

    let mut next = self.items.clone();
    if let Some(line) = next.iter_mut().find(|l| l.id == id) {
      line.quantity = quantity;
    }
    checked_total(&next).ok_or(Error::Overflow)?;

    self.persist(&next)?;
    self.items = next;
    debug!(%id, quantity, "cart quantity updated");
    Ok(())
  }

  /// Empty the cart and delete its persisted key.
  pub fn clear(&mut self) -> Result<()> {
    let _busy = BusyGuard::enter(&self.busy);
    self.store.remove(keys::CART).map_err(Error::storage)?;
    self.items.clear();
    debug!("cart cleared");
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Current lines, in the order they were first added.
  pub fn items(&self) -> &[LineItem] { &self.items }

  /// Look up a single line.
  pub fn item(&self, id: Uuid) -> Result<&LineItem> {
    self
      .items
      .iter()
      .find(|l| l.id == id)
      .ok_or(Error::ItemNotFound(id))
  }

  /// `Σ price * quantity` over all lines.
  pub fn total(&self) -> u64 { checked_total(&self.items).unwrap_or(u64::MAX) }

  /// Total number of units across all lines.
  pub fn unit_count(&self) -> u64 {
    self.items.iter().map(|l| u64::from(l.quantity)).sum()
  }

  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  /// Whether an operation is in progress.
  pub fn is_busy(&self) -> bool { self.busy.get() }

  fn persist(&self, items: &[LineItem]) -> Result<()> {
    kv::write_json(&*self.store, keys::CART, items).inspect_err(|e| {
      warn!(error = %e, "could not persist cart; keeping previous state");
    })
  }
}
