//! Matcher configuration
//!
//! Read from `~/.config/keytrap/config.yaml`:
//!
//! ```yaml
//! sequence_timeout_ms: 800
//! mod_key: ctrl          # platform | meta | ctrl
//! shortcuts:
//!   save: mod+s
//!   go_to_inbox: ["g i", "ctrl+shift+i"]
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parser::Aliases;
use crate::types::Modifiers;

/// Errors from parsing configuration text
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("sequence_timeout_ms must be greater than zero")]
    InvalidTimeout,
}

/// What the `mod` modifier alias stands for
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModKey {
    /// Meta on macOS, Ctrl elsewhere
    #[default]
    Platform,
    Meta,
    Ctrl,
}

impl ModKey {
    pub fn modifiers(self) -> Modifiers {
        match self {
            ModKey::Platform => Modifiers::cmd(),
            ModKey::Meta => Modifiers::META,
            ModKey::Ctrl => Modifiers::CTRL,
        }
    }
}

/// One shortcut string or a list of them
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShortcutList {
    One(String),
    Many(Vec<String>),
}

impl ShortcutList {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            ShortcutList::One(s) => vec![s.clone()],
            ShortcutList::Many(list) => list.clone(),
        }
    }
}

/// Settings for a [`Resolver`](crate::Resolver)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Time allowed between two steps of a sequence
    #[serde(default = "default_sequence_timeout_ms")]
    pub sequence_timeout_ms: u64,
    #[serde(default)]
    pub mod_key: ModKey,
    /// Named shortcut lists, bound with [`Resolver::bind_action`](crate::Resolver::bind_action)
    #[serde(default)]
    pub shortcuts: BTreeMap<String, ShortcutList>,
}

fn default_sequence_timeout_ms() -> u64 {
    1000
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            sequence_timeout_ms: default_sequence_timeout_ms(),
            mod_key: ModKey::default(),
            shortcuts: BTreeMap::new(),
        }
    }
}

impl MatcherConfig {
    /// Parse configuration from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: MatcherConfig = serde_yaml::from_str(yaml)?;
        if config.sequence_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    /// Load the user config, or return defaults if missing or invalid
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_file(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{:#}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn sequence_timeout(&self) -> Duration {
        Duration::from_millis(self.sequence_timeout_ms)
    }

    pub fn aliases(&self) -> Aliases {
        Aliases::with_mod_key(self.mod_key.modifiers())
    }

    /// Shortcut strings configured for an action name
    pub fn shortcuts_for(&self, action: &str) -> Option<Vec<String>> {
        self.shortcuts.get(action).map(ShortcutList::to_vec)
    }
}
