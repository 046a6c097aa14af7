//! Process configuration: an optional TOML file overlaid with `TRAILHEAD_*`
//! environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use serde::Deserialize;
use trailhead_nps::{DEFAULT_BASE_URL, NpsConfig};

use crate::syncer::SyncOptions;

fn default_store_path() -> PathBuf { PathBuf::from("trailhead.db") }
fn default_base_url() -> String { DEFAULT_BASE_URL.to_owned() }
fn default_page_size() -> u32 { 100 }
fn default_request_interval_ms() -> u64 { 500 }
fn default_max_retries() -> u32 { 2 }
fn default_retry_backoff_ms() -> u64 { 2_000 }
fn default_timeout_secs() -> u64 { 30 }

/// Runtime configuration, deserialised from `trailhead.toml` and the
/// environment (`TRAILHEAD_API_KEY`, `TRAILHEAD_STORE_PATH`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
  pub api_key:             String,
  #[serde(default = "default_store_path")]
  pub store_path:          PathBuf,
  #[serde(default = "default_base_url")]
  pub base_url:            String,
  #[serde(default = "default_page_size")]
  pub page_size:           u32,
  #[serde(default = "default_request_interval_ms")]
  pub request_interval_ms: u64,
  #[serde(default = "default_max_retries")]
  pub max_retries:         u32,
  #[serde(default = "default_retry_backoff_ms")]
  pub retry_backoff_ms:    u64,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs:        u64,
}

impl SyncConfig {
  /// Read `path` if it exists, then apply environment overrides.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("TRAILHEAD"))
      .build()?
      .try_deserialize()
  }

  /// The store path with a leading `~` expanded.
  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }

  pub fn nps_config(&self) -> NpsConfig {
    NpsConfig {
      base_url:         self.base_url.clone(),
      api_key:          self.api_key.clone(),
      page_size:        self.page_size,
      request_interval: Duration::from_millis(self.request_interval_ms),
      timeout:          Duration::from_secs(self.timeout_secs),
    }
  }

  pub fn sync_options(&self) -> SyncOptions {
    SyncOptions {
      max_retries:   self.max_retries,
      retry_backoff: Duration::from_millis(self.retry_backoff_ms),
    }
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
