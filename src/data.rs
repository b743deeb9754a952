// Static data loaded once at startup: role registry, hero catalog, fallback.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::Config;
use crate::registry::RoleRegistry;

/// A static data file could not be used. Never fatal: callers degrade.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only data shared by every request.
#[derive(Debug, Clone, Default)]
pub struct StaticData {
    pub registry: RoleRegistry,
    /// Hero catalog, served verbatim.
    pub catalog: Option<Value>,
    /// Pre-baked `/api/analyze` response used when the oracle is down.
    pub fallback: Option<Value>,
}

impl StaticData {
    /// Load everything the config points at. Missing or broken files are
    /// logged and replaced by an empty registry or `None`.
    pub fn load(config: &Config) -> Self {
        let registry = match RoleRegistry::load(&config.hero_roles_path) {
            Ok(registry) => {
                tracing::info!(
                    "Loaded role registry with {} heroes from {}",
                    registry.len(),
                    config.hero_roles_path.display()
                );
                registry
            }
            Err(e) => {
                tracing::warn!("Role registry unavailable, using an empty one: {e}");
                RoleRegistry::new()
            }
        };

        let catalog = load_optional(&config.heroes_path, "hero catalog");
        let fallback = load_optional(&config.fallback_path, "fallback dataset");

        Self {
            registry,
            catalog,
            fallback,
        }
    }
}

/// Parse a JSON file.
pub fn read_json(path: &Path) -> Result<Value, DataError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DataError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn load_optional(path: &Path, what: &str) -> Option<Value> {
    match read_json(path) {
        Ok(value) if is_blank(&value) => {
            tracing::warn!("{what} at {} is empty, ignoring it", path.display());
            None
        }
        Ok(value) => {
            tracing::info!("Loaded {what} from {}", path.display());
            Some(value)
        }
        Err(e) => {
            tracing::warn!("{what} unavailable: {e}");
            None
        }
    }
}

/// `null`, `{}`, `[]` and `""` carry no data.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
