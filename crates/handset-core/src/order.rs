//! Orders and the append-only [`OrderLedger`].
//!
//! An order is a snapshot: the cart's lines are copied in at checkout and the
//! order is never touched again. Status advancement past `pending` belongs to
//! whatever fulfils the order, not to this crate.

use std::{cell::Cell, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  busy::BusyGuard,
  cart::{CartStore, LineItem},
  customer::{CustomerInfo, ShippingAddress},
  kv::{self, KeyValueStore, keys},
  token,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OrderStatus {
  Pending,
}

/// A placed order. Only [`OrderLedger::checkout`] creates these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
  pub id:               Uuid,
  /// Human-facing reference, `ORD-<millis>-<suffix>`.
  pub order_number:     String,
  pub customer_name:    String,
  pub customer_email:   String,
  pub customer_phone:   String,
  pub shipping_address: ShippingAddress,
  pub items:            Vec<LineItem>,
  /// `Σ price * quantity` over `items`, fixed at checkout.
  pub total_amount:     u64,
  pub status:           OrderStatus,
  pub created_at:       DateTime<Utc>,
}

// ─── Ledger ──────────────────────────────────────────────────────────────────

/// The durable history of placed orders, stored under [`keys::ORDERS`].
pub struct OrderLedger<S> {
  store: Arc<S>,
  busy:  Cell<bool>,
}

impl<S: KeyValueStore> OrderLedger<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      busy: Cell::new(false),
    }
  }

  /// Every order placed so far, oldest first.
  pub fn orders(&self) -> Result<Vec<Order>> {
    Ok(kv::read_json(&*self.store, keys::ORDERS)?.unwrap_or_default())
  }

  /// Turn the current cart into an order, append it to the log, and clear
  /// the cart.
  ///
  /// Fails with [`Error::EmptyCart`] when there is nothing to buy. Any error
  /// reading or writing the log is returned and the cart is left untouched.
  /// Once the order is written it is returned even if clearing the cart
  /// fails afterwards.
  pub fn checkout(
    &self,
    cart: &mut CartStore<S>,
    customer: CustomerInfo,
  ) -> Result<Order> {
    let _busy = BusyGuard::enter(&self.busy);

    if cart.is_empty() {
      return Err(Error::EmptyCart);
    }

    let items = cart.items().to_vec();
    let total_amount = cart.total();
    let created_at = Utc::now();
    let (customer_name, customer_email, customer_phone, shipping_address) =
      customer.into_parts();

    let order = Order {
      id: Uuid::new_v4(),
      order_number: token::order_number(created_at),
      customer_name,
      customer_email,
      customer_phone,
      shipping_address,
      items,
      total_amount,
      status: OrderStatus::Pending,
      created_at,
    };

    let mut log = self.orders()?;
    log.push(order.clone());
    kv::write_json(&*self.store, keys::ORDERS, &log)?;

    info!(
      order_number = %order.order_number,
      total = order.total_amount,
      lines = order.items.len(),
      "order placed"
    );

    if let Err(e) = cart.clear() {
      warn!(
        error = %e,
        order_number = %order.order_number,
        "order placed but the cart could not be cleared"
      );
    }

    Ok(order)
  }

  /// Whether a checkout is in progress.
  pub fn is_busy(&self) -> bool { self.busy.get() }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;
  use crate::{
    cart::NewLineItem, customer::CustomerForm, kv::MemoryStore,
    testing::FailingStore,
  };

  fn customer() -> CustomerInfo {
    CustomerForm {
      name:    "Asha Rao".into(),
      email:   "asha@example.in".into(),
      phone:   "9876543210".into(),
      address: "12 MG Road".into(),
      city:    "Bengaluru".into(),
      state:   "Karnataka".into(),
      pincode: "560001".into(),
    }
    .validate()
    .unwrap()
  }

  fn line(color: &str, storage: &str, quantity: u32, price: u64) -> NewLineItem {
    NewLineItem {
      color: color.into(),
      storage: storage.into(),
      quantity,
      price,
    }
  }

  fn setup<S: KeyValueStore>(store: Arc<S>) -> (CartStore<S>, OrderLedger<S>) {
    (CartStore::new(store.clone()), OrderLedger::new(store))
  }

  #[test]
  fn checkout_snapshots_and_clears_cart() {
    let store = Arc::new(MemoryStore::new());
    let (mut cart, ledger) = setup(store.clone());
    cart.add_item(line("Midnight Black", "256GB", 3, 45000)).unwrap();
    cart.add_item(line("Ocean Blue", "1TB", 1, 60000)).unwrap();
    let before = cart.items().to_vec();

    let order = ledger.checkout(&mut cart, customer()).unwrap();

    assert!(cart.is_empty());
    assert!(store.get(keys::CART).unwrap().is_none());
    assert_eq!(order.items, before);
    assert_eq!(order.total_amount, 195000);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.customer_name, "Asha Rao");
    assert_eq!(order.customer_phone, "9876543210");
    assert_eq!(order.shipping_address.pincode, "560001");
    assert!(order.order_number.starts_with("ORD-"));
    assert!(!ledger.is_busy());
  }

  #[test]
  fn later_cart_changes_do_not_touch_placed_order() {
    let (mut cart, ledger) = setup(Arc::new(MemoryStore::new()));
    cart.add_item(line("Midnight Black", "256GB", 1, 45000)).unwrap();
    let order = ledger.checkout(&mut cart, customer()).unwrap();

    cart.add_item(line("Midnight Black", "256GB", 5, 45000)).unwrap();

    let stored = ledger.orders().unwrap();
    assert_eq!(stored, [order.clone()]);
    assert_eq!(stored[0].items[0].quantity, 1);
    assert_eq!(stored[0].total_amount, 45000);
  }

  #[test]
  fn ledger_is_append_only_in_checkout_order() {
    let (mut cart, ledger) = setup(Arc::new(MemoryStore::new()));
    let mut placed = Vec::new();
    for qty in 1..=5 {
      cart.add_item(line("Forest Green", "512GB", qty, 50000)).unwrap();
      placed.push(ledger.checkout(&mut cart, customer()).unwrap());
    }

    let log = ledger.orders().unwrap();
    assert_eq!(log.len(), 5);
    assert_eq!(log, placed);

    let numbers: HashSet<_> = log.iter().map(|o| o.order_number.as_str()).collect();
    assert_eq!(numbers.len(), 5);

    let totals: Vec<_> = log.iter().map(|o| o.total_amount).collect();
    assert_eq!(totals, [50000, 100000, 150000, 200000, 250000]);
  }

  #[test]
  fn empty_cart_checkout_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let (mut cart, ledger) = setup(store.clone());
    let id = cart.add_item(line("Midnight Black", "256GB", 1, 45000)).unwrap();
    cart.add_item(line("Midnight Black", "256GB", 2, 45000)).unwrap();
    assert_eq!(cart.total(), 135000);
    cart.update_quantity(id, 0).unwrap();
    assert_eq!(cart.total(), 0);

    let err = ledger.checkout(&mut cart, customer()).unwrap_err();
    assert!(matches!(err, Error::EmptyCart));
    assert!(ledger.orders().unwrap().is_empty());
    assert!(store.get(keys::ORDERS).unwrap().is_none());
    assert!(!ledger.is_busy());
  }

  #[test]
  fn failed_log_write_keeps_cart() {
    let store = Arc::new(FailingStore::default());
    let (mut cart, ledger) = setup(store.clone());
    cart.add_item(line("Sunset Gold", "256GB", 2, 45000)).unwrap();

    store.set_fail_writes(true);
    let err = ledger.checkout(&mut cart, customer()).unwrap_err();
    assert!(err.is_storage());
    assert_eq!(cart.items().len(), 1);
    assert!(!ledger.is_busy());

    store.set_fail_writes(false);
    assert!(ledger.orders().unwrap().is_empty());
    ledger.checkout(&mut cart, customer()).unwrap();
    assert_eq!(ledger.orders().unwrap().len(), 1);
  }

  #[test]
  fn order_stands_when_cart_clear_fails() {
    let store = Arc::new(FailingStore::default());
    let (mut cart, ledger) = setup(store.clone());
    cart.add_item(line("Aurora Purple", "1TB", 1, 60000)).unwrap();

    store.set_fail_removes(true);
    let order = ledger.checkout(&mut cart, customer()).unwrap();

    assert_eq!(ledger.orders().unwrap(), [order.clone()]);
    assert_eq!(order.total_amount, 60000);
    assert_eq!(cart.items(), order.items.as_slice());
    assert!(store.get(keys::CART).unwrap().is_some());
    assert!(!ledger.is_busy());
    assert!(!cart.is_busy());
  }

  #[test]
  fn corrupt_log_fails_checkout() {
    let store = Arc::new(MemoryStore::new());
    store.set(keys::ORDERS, "not json").unwrap();
    let (mut cart, ledger) = setup(store.clone());
    cart.add_item(line("Sunset Gold", "256GB", 1, 45000)).unwrap();

    let err = ledger.checkout(&mut cart, customer()).unwrap_err();
    assert!(matches!(err, Error::Corrupt { key: "orders", .. }));
    assert!(!cart.is_empty());
    assert_eq!(store.get(keys::ORDERS).unwrap().as_deref(), Some("not json"));
  }

  #[test]
  fn order_wire_shape() {
    let (mut cart, ledger) = setup(Arc::new(MemoryStore::new()));
    cart.add_item(line("Ocean Blue", "512GB", 1, 50000)).unwrap();
    let order = ledger.checkout(&mut cart, customer()).unwrap();

    let v = serde_json::to_value(&order).unwrap();
    assert_eq!(v["status"], "pending");
    assert_eq!(v["total_amount"], 50000);
    assert_eq!(v["shipping_address"]["city"], "Bengaluru");
    assert_eq!(v["items"][0]["storage"], "512GB");
    assert!(v["created_at"].as_str().is_some());
  }
}
