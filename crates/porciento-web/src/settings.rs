//! Server configuration.
//!
//! Layered with the `config` crate: built-in defaults, then the optional TOML
//! file, then `PORCIENTO_*` environment variables, then a bare `PORT`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 3000;

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// SQLite database file.
  pub store_path: PathBuf,
  /// Directory served for `/sitemap.xml` and `/images/*`.
  pub public_dir: PathBuf,
}

impl ServerConfig {
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", i64::from(DEFAULT_PORT))?
      .set_default("store_path", "calculations.db")?
      .set_default("public_dir", "public")?
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("PORCIENTO"))
      .set_override_option("port", std::env::var("PORT").ok())?
      .build()?
      .try_deserialize()
  }

  pub fn sitemap_path(&self) -> PathBuf { self.public_dir.join("sitemap.xml") }

  pub fn images_dir(&self) -> PathBuf { self.public_dir.join("images") }

  /// `host:port` to bind, and to fall back on when a request has no `Host`.
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}
