//! misslog configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::WhyMissed;
use crate::stats::DEFAULT_WEAK_TAG_LIMIT;

/// Name of the config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "misslog.toml";

/// Environment variable overriding `data_dir`.
pub const DATA_DIR_ENV: &str = "MISSLOG_DATA_DIR";

/// Top-level misslog configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MisslogConfig {
    /// Directory holding the persisted entries slot.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// How many tags `weak-tags` shows by default.
    #[serde(default = "default_weak_tag_limit")]
    pub weak_tag_limit: usize,
    /// Reason used by `add` when none is given.
    #[serde(default)]
    pub default_why_missed: WhyMissed,
}

fn default_data_dir() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("misslog"),
        Err(_) => PathBuf::from(".misslog"),
    }
}

fn default_weak_tag_limit() -> usize {
    DEFAULT_WEAK_TAG_LIMIT
}

impl Default for MisslogConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            weak_tag_limit: default_weak_tag_limit(),
            default_why_missed: WhyMissed::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

/// Load config from an explicit path, or search the well-known paths:
/// 1. `misslog.toml` in the current directory
/// 2. `~/.config/misslog/config.toml`
///
/// `MISSLOG_DATA_DIR` overrides `data_dir` from any file.
pub fn load_config_from(path: Option<&Path>) -> Result<MisslogConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            Some(local)
        } else {
            global_config_path().filter(|p| p.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => MisslogConfig::default(),
    };

    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            config.data_dir = PathBuf::from(dir);
        }
    }

    Ok(config)
}

/// Parse a TOML config document, expanding `${VAR}` in `data_dir`.
pub fn parse_config(content: &str) -> Result<MisslogConfig> {
    let mut config: MisslogConfig = toml::from_str(content)?;
    let raw = config.data_dir.to_string_lossy().into_owned();
    config.data_dir = PathBuf::from(resolve_env_vars(&raw));
    Ok(config)
}

fn global_config_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|h| {
        PathBuf::from(h)
            .join(".config")
            .join("misslog")
            .join("config.toml")
    })
}

/// Sample config written by `misslog init`.
pub const SAMPLE_CONFIG: &str = r#"# misslog configuration

# Where the miss log is stored (one JSON file).
data_dir = "${HOME}/.local/share/misslog"

# How many tags `misslog weak-tags` shows.
weak_tag_limit = 10

# Reason recorded by `misslog add` when --why is not given.
default_why_missed = "knowledge gap"
"#;
