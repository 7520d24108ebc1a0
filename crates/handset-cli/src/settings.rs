//! Configuration for the `handset` binary.
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `HANDSET_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

const DEFAULT_STORE_PATH: &str = "~/.local/share/handset/handset.db";

#[derive(Debug, Clone, Deserialize)]
pub struct ShopConfig {
  /// SQLite file holding the cart, orders and session token.
  pub store_path: PathBuf,
}

impl ShopConfig {
  /// Read `file` (if it exists) and the environment on top of the defaults.
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("HANDSET"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise ShopConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_uses_default_path() {
    let cfg = ShopConfig::load(Path::new("/nonexistent/handset.toml")).unwrap();
    assert!(cfg.store_path.ends_with(".local/share/handset/handset.db"));
  }

  #[test]
  fn absolute_paths_are_untouched() {
    assert_eq!(expand_tilde(Path::new("/var/lib/h.db")), PathBuf::from("/var/lib/h.db"));
  }
}
