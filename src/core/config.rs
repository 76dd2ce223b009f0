//! Extension configuration.
//!
//! The host reserves a block of trigger and target-mode identifiers for its
//! own use; everything this crate registers must sit above that block. The
//! config also names the handful of host status effects the core has to know
//! about and maps the built-in triggers and target modes to the identifiers
//! the content pack assigned them.
//!
//! ```
//! use combat_extend::core::ExtensionConfig;
//!
//! let config = ExtensionConfig::from_json(r#"{
//!     "reserved_trigger_max": 40,
//!     "triggers": { "vengeance": 41, "on_buffed": 42 }
//! }"#).unwrap();
//!
//! assert!(config.is_reserved_trigger(40));
//! assert!(!config.is_reserved_trigger(41));
//! assert_eq!(config.triggers["on_buffed"], 42);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::StatusId;
use crate::targeting::BUILTIN_MODE_NAMES;
use crate::triggers::BUILTIN_TRIGGER_NAMES;

/// Default last host-reserved trigger id.
pub const DEFAULT_RESERVED_TRIGGER_MAX: u32 = 64;

/// Default last host-reserved target-mode id.
pub const DEFAULT_RESERVED_TARGET_MODE_MAX: u16 = 32;

/// Errors raised while loading an [`ExtensionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid extension config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown built-in {kind} `{name}`")]
    UnknownBuiltin { kind: &'static str, name: String },

    #[error("built-in {kind} `{name}` maps to host-reserved id {id}")]
    ReservedBuiltin {
        kind: &'static str,
        name: String,
        id: u32,
    },
}

/// Startup configuration for the extension core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    /// Trigger ids at or below this value belong to the host.
    pub reserved_trigger_max: u32,

    /// Target-mode ids at or below this value belong to the host.
    pub reserved_target_mode_max: u16,

    /// Status that hides a character from targeting unless the request opts in.
    pub untouchable_status: Option<StatusId>,

    /// Status watched by the `on_growth_gained` / `on_growth_lost` triggers.
    pub growth_status: Option<StatusId>,

    /// Built-in trigger name to custom trigger id.
    pub triggers: BTreeMap<String, u32>,

    /// Built-in target-mode name to custom target-mode id.
    pub target_modes: BTreeMap<String, u16>,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            reserved_trigger_max: DEFAULT_RESERVED_TRIGGER_MAX,
            reserved_target_mode_max: DEFAULT_RESERVED_TARGET_MODE_MAX,
            untouchable_status: None,
            growth_status: None,
            triggers: BTreeMap::new(),
            target_modes: BTreeMap::new(),
        }
    }
}

impl ExtensionConfig {
    /// Create a config with the default reserved ranges and no built-ins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON config.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every built-in name is known and sits outside the reserved ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, &id) in &self.triggers {
            if !BUILTIN_TRIGGER_NAMES.contains(&name.as_str()) {
                return Err(ConfigError::UnknownBuiltin {
                    kind: "trigger",
                    name: name.clone(),
                });
            }
            if self.is_reserved_trigger(id) {
                return Err(ConfigError::ReservedBuiltin {
                    kind: "trigger",
                    name: name.clone(),
                    id,
                });
            }
        }
        for (name, &id) in &self.target_modes {
            if !BUILTIN_MODE_NAMES.contains(&name.as_str()) {
                return Err(ConfigError::UnknownBuiltin {
                    kind: "target mode",
                    name: name.clone(),
                });
            }
            if self.is_reserved_target_mode(id) {
                return Err(ConfigError::ReservedBuiltin {
                    kind: "target mode",
                    name: name.clone(),
                    id: u32::from(id),
                });
            }
        }
        Ok(())
    }

    /// Set the reserved trigger ceiling (builder pattern).
    #[must_use]
    pub fn with_reserved_trigger_max(mut self, max: u32) -> Self {
        self.reserved_trigger_max = max;
        self
    }

    /// Set the reserved target-mode ceiling (builder pattern).
    #[must_use]
    pub fn with_reserved_target_mode_max(mut self, max: u16) -> Self {
        self.reserved_target_mode_max = max;
        self
    }

    /// Set the untouchable status (builder pattern).
    #[must_use]
    pub fn with_untouchable_status(mut self, status: StatusId) -> Self {
        self.untouchable_status = Some(status);
        self
    }

    /// Set the growth status (builder pattern).
    #[must_use]
    pub fn with_growth_status(mut self, status: StatusId) -> Self {
        self.growth_status = Some(status);
        self
    }

    /// Map a built-in trigger name to an id (builder pattern).
    #[must_use]
    pub fn with_trigger(mut self, name: impl Into<String>, id: u32) -> Self {
        self.triggers.insert(name.into(), id);
        self
    }

    /// Map a built-in target-mode name to an id (builder pattern).
    #[must_use]
    pub fn with_target_mode(mut self, name: impl Into<String>, id: u16) -> Self {
        self.target_modes.insert(name.into(), id);
        self
    }

    #[must_use]
    pub fn is_reserved_trigger(&self, raw: u32) -> bool {
        raw <= self.reserved_trigger_max
    }

    #[must_use]
    pub fn is_reserved_target_mode(&self, raw: u16) -> bool {
        raw <= self.reserved_target_mode_max
    }
}
