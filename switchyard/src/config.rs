//! Dispatcher configuration.
//!
//! An explicit struct handed to registry construction, resolved once at
//! startup and never re-read. Loadable from TOML:
//!
//! ```toml
//! [backends.fallback]
//! backend = "directory"
//! options = { path = "/var/lib/app/files" }
//!
//! [backends."jpg|png"]
//! backend = "s3"
//! options = { bucket = "media" }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use switchyard_common::{DispatchError, FALLBACK_ALIAS, RESERVED_ALIASES};

/// One configured backend: the factory kind that constructs it and the
/// options blob handed to that factory, opaque to this layer.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendEntry {
    pub backend: String,
    #[serde(default = "empty_options")]
    pub options: serde_json::Value,
}

fn empty_options() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

#[derive(Debug, Clone, Deserialize)]
pub struct DispatcherConfig {
    pub backends: BTreeMap<String, BackendEntry>,
}

impl DispatcherConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: DispatcherConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for alias in self.backends.keys() {
            if RESERVED_ALIASES.contains(&alias.as_str()) {
                return Err(DispatchError::ReservedAlias(alias.clone()).into());
            }
        }
        if !self.backends.contains_key(FALLBACK_ALIAS) {
            return Err(DispatchError::MissingFallback.into());
        }
        Ok(())
    }
}
