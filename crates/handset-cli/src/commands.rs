//! Subcommand implementations.
//!
//! Each invocation behaves like a page load: the session token is ensured,
//! the persisted cart is loaded, then one command runs against the single
//! [`Shop`] built in `main`.

use std::{io::Write, sync::Arc};

use anyhow::{Context as _, bail};
use clap::{Args, Subcommand};
use handset_core::{
  cart::CartStore,
  catalog::{self, format_inr},
  customer::CustomerForm,
  kv::KeyValueStore,
  order::OrderLedger,
  session::ensure_session_id,
};
use tracing::warn;
use uuid::Uuid;

#[derive(Subcommand, Debug)]
pub enum Command {
  /// List colour and storage variants with prices.
  Catalog,
  /// Add a variant to the cart.
  Add {
    /// Colour id, e.g. `midnight`.
    #[arg(long)]
    color:    String,
    /// Storage id, e.g. `512gb`.
    #[arg(long)]
    storage:  String,
    #[arg(long, default_value_t = 1)]
    quantity: u32,
  },
  /// Show the cart and its total.
  Cart,
  /// Set the quantity of a cart line; zero or less removes it.
  Update {
    id:       Uuid,
    #[arg(allow_negative_numbers = true)]
    quantity: i64,
  },
  /// Remove a cart line.
  Remove { id: Uuid },
  /// Empty the cart.
  Clear,
  /// Place an order for the current cart.
  Checkout(CheckoutArgs),
  /// List placed orders.
  Orders,
  /// Print this installation's session token.
  Session,
}

#[derive(Args, Debug)]
pub struct CheckoutArgs {
  #[arg(long)]
  name:    String,
  #[arg(long)]
  email:   String,
  #[arg(long)]
  phone:   String,
  #[arg(long)]
  address: String,
  #[arg(long)]
  city:    String,
  #[arg(long)]
  state:   String,
  #[arg(long)]
  pincode: String,
}

impl From<CheckoutArgs> for CustomerForm {
  fn from(a: CheckoutArgs) -> Self {
    Self {
      name:    a.name,
      email:   a.email,
      phone:   a.phone,
      address: a.address,
      city:    a.city,
      state:   a.state,
      pincode: a.pincode,
    }
  }
}

// ─── Shop ────────────────────────────────────────────────────────────────────

/// The per-process cart, ledger and session, all over one store.
pub struct Shop<S> {
  pub session: Option<String>,
  pub cart:    CartStore<S>,
  pub ledger:  OrderLedger<S>,
}

impl<S: KeyValueStore> Shop<S> {
  /// Ensure the session token and load the persisted cart. Storage trouble
  /// is logged and the shop starts with whatever could be recovered.
  pub fn start(store: Arc<S>) -> Self {
    let session = ensure_session_id(&*store)
      .inspect_err(|e| warn!(error = %e, "session token unavailable"))
      .ok();

    let mut cart = CartStore::new(store.clone());
    if let Err(e) = cart.load() {
      warn!(error = %e, "continuing with an empty cart");
    }

    Self {
      session,
      cart,
      ledger: OrderLedger::new(store),
    }
  }

  pub fn run(&mut self, command: Command, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
      Command::Catalog => print_catalog(out),
      Command::Add {
        color,
        storage,
        quantity,
      } => {
        let variant = catalog::resolve(&color, &storage)?;
        let outcome = self.cart.add_item(variant.line(quantity));
        degrade(outcome.map(|_| ()))?;
        print_cart(&self.cart, out)
      }
      Command::Cart => print_cart(&self.cart, out),
      Command::Update { id, quantity } => {
        degrade(self.cart.update_quantity(id, quantity))?;
        print_cart(&self.cart, out)
      }
      Command::Remove { id } => {
        degrade(self.cart.remove_item(id))?;
        print_cart(&self.cart, out)
      }
      Command::Clear => {
        degrade(self.cart.clear())?;
        print_cart(&self.cart, out)
      }
      Command::Checkout(args) => self.checkout(args, out),
      Command::Orders => self.print_orders(out),
      Command::Session => match &self.session {
        Some(id) => Ok(writeln!(out, "{id}")?),
        None => bail!("session token unavailable"),
      },
    }
  }

  fn checkout(&mut self, args: CheckoutArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let info = match CustomerForm::from(args).validate() {
      Ok(info) => info,
      Err(errors) => {
        for (field, message) in errors.iter() {
          writeln!(out, "{field}: {message}")?;
        }
        bail!("order not placed: {errors}");
      }
    };

    let order = self
      .ledger
      .checkout(&mut self.cart, info)
      .context("order not placed")?;

    writeln!(out, "Order placed: {}", order.order_number)?;
    writeln!(out, "Total: {}", format_inr(order.total_amount))?;
    Ok(())
  }

  fn print_orders(&self, out: &mut impl Write) -> anyhow::Result<()> {
    let orders = self.ledger.orders().context("could not read orders")?;
    if orders.is_empty() {
      writeln!(out, "No orders yet.")?;
    }
    for o in orders {
      writeln!(
        out,
        "{}  {}  {}  {:?}  {}",
        o.order_number,
        o.created_at.to_rfc3339(),
        o.customer_name,
        o.status,
        format_inr(o.total_amount),
      )?;
    }
    Ok(())
  }
}

/// Storage failures while browsing the cart are reported and otherwise
/// ignored; anything else is the caller's mistake and is returned.
fn degrade(outcome: handset_core::Result<()>) -> anyhow::Result<()> {
  match outcome {
    Err(e) if e.is_storage() => {
      warn!(error = %e, "cart change not saved");
      Ok(())
    }
    other => Ok(other?),
  }
}

fn print_catalog(out: &mut impl Write) -> anyhow::Result<()> {
  writeln!(out, "Colours:")?;
  for c in catalog::colors() {
    writeln!(out, "  {:<10} {}", c.id, c.name)?;
  }
  writeln!(out, "Storage:")?;
  for s in catalog::storages() {
    writeln!(
      out,
      "  {:<10} {:<6} {}",
      s.id,
      s.label,
      format_inr(catalog::price_for_storage(s.id)),
    )?;
  }
  Ok(())
}

fn print_cart<S: KeyValueStore>(cart: &CartStore<S>, out: &mut impl Write) -> anyhow::Result<()> {
  if cart.is_empty() {
    writeln!(out, "Your cart is empty.")?;
    return Ok(());
  }
  for l in cart.items() {
    writeln!(
      out,
      "{}  {} {}  x{}  {}",
      l.id,
      l.color,
      l.storage,
      l.quantity,
      format_inr(l.line_total()),
    )?;
  }
  writeln!(out, "Total ({} items): {}", cart.unit_count(), format_inr(cart.total()))?;
  Ok(())
}
