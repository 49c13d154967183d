//! Display collection configuration.
//!
//! # Invariants
//! - Name prefixes are non-blank after trim.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default prefix for generated group names (`Group 1`, `Group 2`, ...).
pub const DEFAULT_GROUP_NAME_PREFIX: &str = "Group ";
/// Default prefix for generated item names (`Item1`, `Item2`, ...).
pub const DEFAULT_ITEM_NAME_PREFIX: &str = "Item";

/// Tunables of one `DisplayCollection`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    pub group_name_prefix: String,
    pub item_name_prefix: String,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            group_name_prefix: DEFAULT_GROUP_NAME_PREFIX.to_string(),
            item_name_prefix: DEFAULT_ITEM_NAME_PREFIX.to_string(),
        }
    }
}

impl CollectionConfig {
    /// Validates declaration-level invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.group_name_prefix.trim().is_empty() {
            return Err(ConfigError::BlankPrefix("group_name_prefix"));
        }
        if self.item_name_prefix.trim().is_empty() {
            return Err(ConfigError::BlankPrefix("item_name_prefix"));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Named prefix field is empty or whitespace.
    BlankPrefix(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankPrefix(field) => write!(f, "`{field}` must not be blank"),
        }
    }
}

impl Error for ConfigError {}
