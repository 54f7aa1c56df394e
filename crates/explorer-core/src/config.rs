//! Explorer-wide settings: the chain's native asset, the confidential
//! address prefix and the default debug label.
//!
//! Defaults match a Liquid-style sidechain pegged to BTC. Every value can
//! be overridden from the environment with [`ExplorerConfig::from_env`].

use std::env;

use serde::{Deserialize, Serialize};

use crate::stream::DEFAULT_DEBUG_LABEL;

pub const DEFAULT_NATIVE_ASSET_ID: &str =
    "6f0279e9ed041c3d710a9f57d0c02928416460c4b722ae3457a11eec381c526d";
pub const DEFAULT_NATIVE_ASSET_LABEL: &str = "BTC";
pub const DEFAULT_BLIND_PREFIX: u8 = 0x0c;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var} value `{value}`: expected a byte in decimal or 0x-prefixed hex")]
    InvalidByte { var: &'static str, value: String },

    #[error("invalid {var} value: not valid unicode")]
    NotUnicode { var: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Hex asset id treated as the chain's native asset.
    pub native_asset_id: String,
    /// Label shown for outputs of the native asset.
    pub native_asset_label: String,
    /// Leading byte that marks a confidential (blinded) base58 address.
    pub blind_prefix: u8,
    /// Label the debug sink tags its reports with.
    pub debug_label: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            native_asset_id: DEFAULT_NATIVE_ASSET_ID.into(),
            native_asset_label: DEFAULT_NATIVE_ASSET_LABEL.into(),
            blind_prefix: DEFAULT_BLIND_PREFIX,
            debug_label: DEFAULT_DEBUG_LABEL.into(),
        }
    }
}

impl ExplorerConfig {
    /// Build a config from `NATIVE_ASSET_ID`, `NATIVE_ASSET_LABEL`,
    /// `BLIND_PREFIX` and `DEBUG_LABEL`. Unset or empty variables keep
    /// their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| match env::var(var) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { var }),
        })
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Result<Option<String>, ConfigError>,
    {
        let read = |var: &'static str| -> Result<Option<String>, ConfigError> {
            Ok(lookup(var)?.filter(|value| !value.trim().is_empty()))
        };

        let mut config = Self::default();
        if let Some(id) = read("NATIVE_ASSET_ID")? {
            config.native_asset_id = id;
        }
        if let Some(label) = read("NATIVE_ASSET_LABEL")? {
            config.native_asset_label = label;
        }
        if let Some(prefix) = read("BLIND_PREFIX")? {
            config.blind_prefix = parse_byte("BLIND_PREFIX", &prefix)?;
        }
        if let Some(label) = read("DEBUG_LABEL")? {
            config.debug_label = label;
        }
        Ok(config)
    }
}

/// Parse a byte written either in decimal (`12`) or hex (`0x0c`).
fn parse_byte(var: &'static str, raw: &str) -> Result<u8, ConfigError> {
    let trimmed = raw.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => trimmed.parse::<u8>(),
    };
    parsed.map_err(|_| ConfigError::InvalidByte {
        var,
        value: raw.to_string(),
    })
}
