//! Localization table loaded from TOML

use super::Localizer;
use crate::config::ConfigError;
use std::collections::BTreeMap;
use std::path::Path;

/// Flat key → text table. Nested TOML tables become dotted keys.
#[derive(Debug, Clone, Default)]
pub struct TomlLocalizer {
    strings: BTreeMap<String, String>,
}

impl TomlLocalizer {
    /// Bundled English strings
    pub fn english() -> Self {
        let toml = include_str!("../../config/lang/en.toml");
        Self::parse(toml).unwrap_or_else(|error| {
            tracing::error!(%error, "bundled language file failed to load");
            TomlLocalizer::default()
        })
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = crate::config::parse_toml(content)?;
        let mut strings = BTreeMap::new();
        flatten("", &toml::Value::Table(table), &mut strings);
        Ok(TomlLocalizer { strings })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

fn flatten(prefix: &str, value: &toml::Value, out: &mut BTreeMap<String, String>) {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&path, child, out);
            }
        }
        toml::Value::String(text) => {
            out.insert(prefix.to_string(), text.clone());
        }
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}

impl Localizer for TomlLocalizer {
    fn localize(&self, key: &str) -> String {
        self.strings.get(key).cloned().unwrap_or_else(|| key.to_string())
    }
}
