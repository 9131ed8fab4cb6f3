use std::fs;
use std::path::{
  Path,
  PathBuf
};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use tracing::{
  debug,
  info,
  warn
};

use crate::controller::DEFAULT_DEBOUNCE;

pub const CONFIG_ENV_VAR: &str =
  "MEALBOOK_CONFIG";
const CONFIG_FILE_NAME: &str =
  "mealbook.toml";
const MAX_DEBOUNCE_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
  pub debounce:     Duration,
  pub catalog:      Option<PathBuf>,
  pub loaded_files: Vec<PathBuf>
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
  debounce_ms: Option<u64>,
  catalog:     Option<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    Self {
      debounce:     DEFAULT_DEBOUNCE,
      catalog:      None,
      loaded_files: vec![]
    }
  }
}

impl Config {
  #[tracing::instrument(skip(
    override_path
  ))]
  pub fn load(
    override_path: Option<&Path>
  ) -> anyhow::Result<Self> {
    Self::load_from(resolve_config_path(
      override_path
    ))
  }

  fn load_from(
    path: Option<PathBuf>
  ) -> anyhow::Result<Self> {
    let Some(path) = path else {
      info!(
        "no mealbook.toml found; using \
         defaults"
      );
      return Ok(Self::default());
    };

    info!(config = %path.display(), "loading config");
    let raw = fs::read_to_string(&path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    let mut cfg =
      Self::from_toml_str(&raw)
        .with_context(|| {
          format!(
            "invalid config {}",
            path.display()
          )
        })?;

    if let Some(catalog) =
      cfg.catalog.take()
    {
      let base = path
        .parent()
        .unwrap_or_else(|| Path::new("."));
      cfg.catalog = Some(
        if catalog.is_absolute() {
          catalog
        } else {
          base.join(catalog)
        }
      );
    }
    cfg.loaded_files.push(path);
    Ok(cfg)
  }

  pub fn from_toml_str(
    raw: &str
  ) -> anyhow::Result<Self> {
    let parsed: RawConfig =
      toml::from_str(raw).context(
        "failed to parse mealbook config"
      )?;

    let mut cfg = Self::default();
    if let Some(ms) = parsed.debounce_ms
    {
      if ms > MAX_DEBOUNCE_MS {
        warn!(
          requested = ms,
          max = MAX_DEBOUNCE_MS,
          "debounce_ms too large; \
           clamping"
        );
      }
      cfg.debounce = Duration::from_millis(
        ms.min(MAX_DEBOUNCE_MS)
      );
    }
    cfg.catalog = parsed.catalog;

    debug!(
      debounce_ms = cfg.debounce.as_millis() as u64,
      catalog = ?cfg.catalog,
      "parsed config"
    );
    Ok(cfg)
  }
}

fn resolve_config_path(
  override_path: Option<&Path>
) -> Option<PathBuf> {
  if let Some(path) = override_path {
    return Some(path.to_path_buf());
  }

  if let Ok(from_env) =
    std::env::var(CONFIG_ENV_VAR)
  {
    if from_env == "/dev/null" {
      return None;
    }
    return Some(PathBuf::from(from_env));
  }

  let candidate = dirs::config_dir()?
    .join("mealbook")
    .join(CONFIG_FILE_NAME);
  candidate.exists().then_some(candidate)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_config_uses_defaults() {
    let cfg = Config::from_toml_str("")
      .expect("parse");
    assert_eq!(
      cfg.debounce,
      Duration::from_millis(300)
    );
    assert_eq!(cfg.catalog, None);
  }

  #[test]
  fn debounce_is_clamped() {
    let cfg = Config::from_toml_str(
      "debounce_ms = 60000"
    )
    .expect("parse");
    assert_eq!(
      cfg.debounce,
      Duration::from_millis(5_000)
    );

    let cfg = Config::from_toml_str(
      "debounce_ms = 120"
    )
    .expect("parse");
    assert_eq!(
      cfg.debounce,
      Duration::from_millis(120)
    );
  }

  #[test]
  fn missing_config_falls_back_to_defaults()
   {
    let cfg =
      Config::load_from(None).expect("load");
    assert_eq!(cfg, Config::default());
    assert!(cfg.loaded_files.is_empty());
  }

  #[test]
  fn unreadable_config_path_is_an_error() {
    let err = Config::load_from(Some(
      PathBuf::from(
        "/nonexistent/mealbook.toml"
      )
    ))
    .expect_err("missing file");
    assert!(
      format!("{err:#}")
        .contains("failed to read")
    );
  }

  #[test]
  fn unknown_keys_are_rejected() {
    let err = Config::from_toml_str(
      "debounce = 10"
    )
    .expect_err("unknown key");
    assert!(
      format!("{err:#}")
        .contains("failed to parse")
    );
  }
}
