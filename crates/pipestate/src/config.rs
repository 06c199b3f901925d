//! Persisted visibility configuration
//!
//! The panel shares one pair of flags across every table. Individual slot
//! categories may override them, e.g. to always list empty render targets:
//!
//! ```yaml
//! show_disabled: false
//! show_empty: false
//! overrides:
//!   RenderTarget: { show_empty: true }
//! ```

use crate::filter::VisibilityFlags;
use pipestate_model::SlotCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Errors that can occur while loading or saving a visibility configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Shared visibility flags plus optional per-category overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    pub show_disabled: bool,
    pub show_empty: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<SlotCategory, VisibilityFlags>,
}

impl VisibilityConfig {
    /// Flags shared by every category without an override
    pub fn shared(&self) -> VisibilityFlags {
        VisibilityFlags::new(self.show_disabled, self.show_empty)
    }

    /// Updates the shared flags
    pub fn set_shared(&mut self, flags: VisibilityFlags) {
        self.show_disabled = flags.show_disabled;
        self.show_empty = flags.show_empty;
    }

    /// Returns the flags that apply to `category`
    pub fn flags_for(&self, category: SlotCategory) -> VisibilityFlags {
        self.overrides.get(&category).copied().unwrap_or_else(|| self.shared())
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_norway::to_string(self)?)
    }

    /// Loads a configuration file
    ///
    /// # Returns
    /// * `Ok(VisibilityConfig)` - The stored configuration, or the defaults if the file does not exist
    /// * `Err(ConfigError)` - If the file cannot be read or parsed
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No visibility config, using defaults");
            return Ok(Self::default());
        }
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }

    /// Writes the configuration to `path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_from_yaml() {
        let yaml = r#"
show_disabled: true
overrides:
  RenderTarget: { show_empty: true }
  Uav: { show_disabled: false, show_empty: false }
"#;
        let config = VisibilityConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.shared(), VisibilityFlags::new(true, false));
        assert_eq!(config.flags_for(SlotCategory::Resource), VisibilityFlags::new(true, false));
        assert_eq!(config.flags_for(SlotCategory::RenderTarget), VisibilityFlags::new(false, true));
        assert_eq!(config.flags_for(SlotCategory::Uav), VisibilityFlags::default());
    }

    #[test]
    fn test_yaml_round_trip() {
        let mut config = VisibilityConfig::default();
        config.set_shared(VisibilityFlags::new(false, true));
        config.overrides.insert(SlotCategory::VertexAttribute, VisibilityFlags::ALL);

        let yaml = config.to_yaml().unwrap();
        assert_eq!(VisibilityConfig::from_yaml(&yaml).unwrap(), config);

        let empty = VisibilityConfig::default().to_yaml().unwrap();
        assert!(!empty.contains("overrides"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("pipestate-visibility-does-not-exist.yaml");
        assert_eq!(VisibilityConfig::from_file(&path).unwrap(), VisibilityConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("pipestate-visibility-{}.yaml", std::process::id()));
        let config = VisibilityConfig {
            show_disabled: true,
            show_empty: true,
            overrides: BTreeMap::new(),
        };
        config.save(&path).unwrap();
        assert_eq!(VisibilityConfig::from_file(&path).unwrap(), config);
        std::fs::remove_file(&path).unwrap();
    }
}
