//! `handset` — terminal front-end for the handset storefront cart.
//!
//! # Usage
//!
//! ```
//! handset catalog
//! handset add --color midnight --storage 512gb --quantity 2
//! handset cart
//! handset checkout --name "Asha Rao" --email asha@example.in \
//!   --phone 9876543210 --address "12 MG Road" --city Bengaluru \
//!   --state Karnataka --pincode 560001
//! ```

mod commands;
mod settings;

use std::{io, path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use commands::{Command, Shop};
use handset_core::kv::MemoryStore;
use handset_store_sqlite::SqliteStore;
use settings::ShopConfig;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Handset storefront cart")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "handset.toml")]
  config: PathBuf,

  /// Keep everything in memory; nothing is written to disk.
  #[arg(long)]
  ephemeral: bool,

  #[command(subcommand)]
  command: Command,
}

fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let mut stdout = io::stdout().lock();

  if cli.ephemeral {
    let mut shop = Shop::start(Arc::new(MemoryStore::new()));
    return shop.run(cli.command, &mut stdout);
  }

  let cfg = ShopConfig::load(&cli.config)?;
  if let Some(parent) = cfg.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let store = SqliteStore::open(&cfg.store_path)
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;

  let mut shop = Shop::start(Arc::new(store));
  shop.run(cli.command, &mut stdout)
}
