//! Desired label state and label file loading

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ConfigError, ValidationError};
use crate::model::{LabelDefinition, LabelName};

/// Label file as written by the user, before validation
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawLabelConfig {
    #[serde(default)]
    pub labels: Vec<RawLabel>,
    #[serde(default)]
    pub delete: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawLabel {
    pub name: String,
    #[serde(deserialize_with = "color_string")]
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "alias")]
    pub aliases: Vec<String>,
}

/// Colors are kept exactly as written. Asking for a string makes YAML hand
/// over plain scalars such as `000000`, `123e45` or `0x12ab` verbatim, so
/// they are validated as hex rather than read as numbers.
fn color_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct ColorVisitor;

    impl Visitor<'_> for ColorVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a quoted hex color such as \"d73a4a\"")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_str(ColorVisitor)
}

/// Supported label file syntaxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFileFormat {
    Yaml,
    Json,
    Toml,
}

impl LabelFileFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yml" | "yaml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// The validated desired state.
///
/// Invariants: label names are unique (case-insensitive), no alias names
/// another label, and no `delete` entry is also a label or alias.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelConfig {
    labels: Vec<LabelDefinition>,
    delete: Vec<LabelName>,
}

impl LabelConfig {
    pub fn new(
        mut labels: Vec<LabelDefinition>,
        delete: Vec<LabelName>,
    ) -> Result<Self, ValidationError> {
        let mut names = HashSet::new();
        for def in &labels {
            if !names.insert(def.name.clone()) {
                return Err(ValidationError::DuplicateLabel(def.name.to_string()));
            }
        }

        let mut aliases = HashSet::new();
        for def in &mut labels {
            let own_name = def.name.clone();
            def.aliases.retain(|alias| *alias != own_name);

            for alias in &def.aliases {
                if names.contains(alias) {
                    return Err(ValidationError::AliasConflict {
                        label: def.name.to_string(),
                        alias: alias.to_string(),
                    });
                }
                aliases.insert(alias.clone());
            }
        }

        let mut seen = HashSet::new();
        let mut unique_delete = Vec::with_capacity(delete.len());
        for name in delete {
            if names.contains(&name) || aliases.contains(&name) {
                return Err(ValidationError::AmbiguousDelete(name.to_string()));
            }
            if seen.insert(name.clone()) {
                unique_delete.push(name);
            }
        }

        Ok(Self {
            labels,
            delete: unique_delete,
        })
    }

    /// Validate a raw label file
    pub fn parse(raw: RawLabelConfig) -> Result<Self, ValidationError> {
        let labels = raw
            .labels
            .iter()
            .map(|l| {
                LabelDefinition::new(&l.name, &l.color, l.description.as_deref())?
                    .with_aliases(&l.aliases)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let delete = raw
            .delete
            .iter()
            .map(|name| LabelName::parse(name))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(labels, delete)
    }

    pub fn parse_str(text: &str, format: LabelFileFormat) -> Result<Self, ConfigError> {
        let raw: RawLabelConfig = match format {
            LabelFileFormat::Yaml => {
                // An empty YAML document is an empty config
                if text.trim().is_empty() {
                    RawLabelConfig::default()
                } else {
                    serde_yaml::from_str(text).map_err(|e| ConfigError::Schema(e.to_string()))?
                }
            }
            LabelFileFormat::Json => {
                serde_json::from_str(text).map_err(|e| ConfigError::Schema(e.to_string()))?
            }
            LabelFileFormat::Toml => {
                toml::from_str(text).map_err(|e| ConfigError::Schema(e.to_string()))?
            }
        };

        Ok(Self::parse(raw)?)
    }

    /// Load a label file, picking the syntax from its extension
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let format = LabelFileFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse_str(&text, format)
    }

    pub fn labels(&self) -> &[LabelDefinition] {
        &self.labels
    }

    /// Remote-only labels to remove, in declaration order
    pub fn delete(&self) -> &[LabelName] {
        &self.delete
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.delete.is_empty()
    }
}
