//! Runtime configuration file parsing.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::runner::ds::heap::HeapConfig;
use crate::runner::ds::value::NativeKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Which native kinds the built-in registry bridges at boot.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub types: Vec<NativeKind>,
}

impl BridgeConfig {
    pub fn enabled(&self, kind: NativeKind) -> bool {
        self.types.contains(&kind)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            types: NativeKind::ALL.to_vec(),
        }
    }
}

/// What `remove_method` does with copies a module already donated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemovalPolicy {
    /// Donated copies are independent snapshots and stay in place.
    KeepDonated,
    /// Donated copies are removed from every includer, and the latest
    /// remaining included provider of the name is donated in their place.
    RetractDonated,
}

impl Default for RemovalPolicy {
    fn default() -> Self {
        RemovalPolicy::KeepDonated
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MethodsConfig {
    pub removal: RemovalPolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "warn".to_string(),
        }
    }
}

/// Complete runtime configuration.
///
/// Expected format:
/// ```toml
/// [heap]
/// max_instances = 100000
///
/// [bridge]
/// types = ["list", "text", "number", "callable", "error", "time", "boolean", "nil"]
///
/// [methods]
/// removal = "keep-donated"
///
/// [log]
/// level = "info"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub heap: HeapConfig,
    pub bridge: BridgeConfig,
    pub methods: MethodsConfig,
    pub log: LogConfig,
}

impl RuntimeConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_removal(mut self, removal: RemovalPolicy) -> Self {
        self.methods.removal = removal;
        self
    }

    pub fn with_bridged(mut self, types: Vec<NativeKind>) -> Self {
        self.bridge.types = types;
        self
    }

    pub fn with_heap(mut self, heap: HeapConfig) -> Self {
        self.heap = heap;
        self
    }
}
