use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ValidationError;

/// Longest label name the remote stores accept
pub const MAX_NAME_LENGTH: usize = 50;

/// A validated label name.
///
/// Whitespace around the name is trimmed and the spelling is preserved, but
/// equality and hashing ignore case: `Bug` and `bug` are the same label.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LabelName(String);

impl LabelName {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidName {
                name: raw.to_string(),
                reason: "name is empty".to_string(),
            });
        }

        let length = trimmed.chars().count();
        if length > MAX_NAME_LENGTH {
            return Err(ValidationError::InvalidName {
                name: raw.to_string(),
                reason: format!(
                    "name is {} characters long, the limit is {}",
                    length, MAX_NAME_LENGTH
                ),
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-folded form used for identity lookups
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }

    /// Case-insensitive comparison against a raw name
    pub fn matches(&self, other: &str) -> bool {
        self.key() == other.trim().to_lowercase()
    }
}

impl PartialEq for LabelName {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for LabelName {}

impl Hash for LabelName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl TryFrom<String> for LabelName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LabelName> for String {
    fn from(name: LabelName) -> Self {
        name.0
    }
}

impl AsRef<str> for LabelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LabelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A label color: six lowercase hex digits, stored WITHOUT the `#` prefix
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LabelColor(String);

impl LabelColor {
    /// Accepts `d73a4a`, `#D73A4A` and surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidColor {
                color: raw.to_string(),
            });
        }

        Ok(Self(hex.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The color with a leading `#`, as some stores expect it
    pub fn with_hash(&self) -> String {
        format!("#{}", self.0)
    }
}

impl TryFrom<String> for LabelColor {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LabelColor> for String {
    fn from(color: LabelColor) -> Self {
        color.0
    }
}

impl fmt::Display for LabelColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A non-empty label description.
///
/// Empty descriptions are modelled as `Option::None`, never as an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelDescription(String);

impl LabelDescription {
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn from_optional(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|d| Self::new(d))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LabelDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the desired label set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelDefinition {
    pub name: LabelName,
    pub color: LabelColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<LabelDescription>,
    /// Prior names this label may exist under remotely. Only used to detect
    /// renames, never written back.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<LabelName>,
}

impl LabelDefinition {
    pub fn new(
        name: &str,
        color: &str,
        description: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: LabelName::parse(name)?,
            color: LabelColor::parse(color)?,
            description: LabelDescription::from_optional(description),
            aliases: Vec::new(),
        })
    }

    /// Attach aliases, keeping declaration order and dropping repeats.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for raw in aliases {
            let alias = LabelName::parse(raw.as_ref())?;
            if !self.aliases.contains(&alias) {
                self.aliases.push(alias);
            }
        }
        Ok(self)
    }

    /// Whether the remote label already carries this definition's color and description
    pub fn matches(&self, remote: &RemoteLabel) -> bool {
        remote.color.as_ref() == Some(&self.color) && self.description == remote.description
    }
}

/// Shorthand for [`LabelDefinition::new`]
pub fn label(
    name: &str,
    color: &str,
    description: Option<&str>,
) -> Result<LabelDefinition, ValidationError> {
    LabelDefinition::new(name, color, description)
}

/// A label as reported by the label store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteLabel {
    pub name: LabelName,
    /// `None` when the store reports a color that is not six hex digits
    pub color: Option<LabelColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<LabelDescription>,
}

impl RemoteLabel {
    pub fn new(
        name: &str,
        color: &str,
        description: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: LabelName::parse(name)?,
            color: Some(LabelColor::parse(color)?),
            description: LabelDescription::from_optional(description),
        })
    }

    /// Build a label from store data. Only the name must validate: a label
    /// with a color like GitLab's "red" is kept so it can still be updated,
    /// renamed or deleted.
    pub fn from_store(
        name: &str,
        color: &str,
        description: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let name = LabelName::parse(name)?;
        let color = match LabelColor::parse(color) {
            Ok(color) => Some(color),
            Err(e) => {
                warn!(label = %name, error = %e, "remote label has an unusable color");
                None
            }
        };

        Ok(Self {
            name,
            color,
            description: LabelDescription::from_optional(description),
        })
    }

    /// Color for display, `?` when unknown
    pub fn color_display(&self) -> String {
        self.color
            .as_ref()
            .map(LabelColor::with_hash)
            .unwrap_or_else(|| "?".to_string())
    }
}

/// Fields sent to the store when updating (and possibly renaming) a label.
///
/// Carries the full desired state; a `None` description clears the remote one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelUpdate {
    pub new_name: Option<LabelName>,
    pub color: LabelColor,
    pub description: Option<LabelDescription>,
}

impl LabelUpdate {
    pub fn from_definition(current: &RemoteLabel, desired: &LabelDefinition) -> Self {
        // Case-only spelling changes still count as a rename
        let new_name = if current.name.as_str() != desired.name.as_str() {
            Some(desired.name.clone())
        } else {
            None
        };

        Self {
            new_name,
            color: desired.color.clone(),
            description: desired.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn name_is_trimmed_and_keeps_case() {
        let name = LabelName::parse("  Good First Issue ").unwrap();
        assert_eq!(name.as_str(), "Good First Issue");
    }

    #[test]
    fn name_equality_ignores_case() {
        let a = LabelName::parse("Bug").unwrap();
        let b = LabelName::parse("bug").unwrap();
        assert_eq!(a, b);

        let set: HashSet<LabelName> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = LabelName::parse("   ").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidName { .. }));
    }

    #[test]
    fn name_length_is_counted_in_characters() {
        let fifty = "é".repeat(MAX_NAME_LENGTH);
        assert!(LabelName::parse(&fifty).is_ok());

        let too_long = "x".repeat(MAX_NAME_LENGTH + 1);
        let err = LabelName::parse(&too_long).unwrap_err();
        assert!(err.to_string().contains("limit is 50"));
    }

    #[test]
    fn color_accepts_hash_prefix_and_normalizes_case() {
        let color = LabelColor::parse("#D73A4A").unwrap();
        assert_eq!(color.as_str(), "d73a4a");
        assert_eq!(color.with_hash(), "#d73a4a");
        assert_eq!(color, LabelColor::parse("d73a4a").unwrap());
    }

    #[test]
    fn bad_colors_are_rejected() {
        for raw in ["", "#", "fff", "d73a4", "d73a4a0", "zzzzzz", "##d73a4a"] {
            let err = LabelColor::parse(raw).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidColor { .. }),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn empty_description_is_absent() {
        assert_eq!(LabelDescription::new(""), None);
        assert_eq!(LabelDescription::from_optional(None), None);
        assert_eq!(
            LabelDescription::from_optional(Some("Docs")).unwrap().as_str(),
            "Docs"
        );
    }

    #[test]
    fn aliases_are_deduplicated_in_order() {
        let def = label("feature", "0075ca", None)
            .unwrap()
            .with_aliases(["enhancement", "Feature Request", "ENHANCEMENT"])
            .unwrap();
        let aliases: Vec<&str> = def.aliases.iter().map(LabelName::as_str).collect();
        assert_eq!(aliases, vec!["enhancement", "Feature Request"]);
    }

    #[test]
    fn definition_matches_on_color_and_description() {
        let def = label("bug", "d73a4a", Some("Broken")).unwrap();
        let same = RemoteLabel::new("Bug", "#D73A4A", Some("Broken")).unwrap();
        let other_desc = RemoteLabel::new("bug", "d73a4a", None).unwrap();
        let other_color = RemoteLabel::new("bug", "000000", Some("Broken")).unwrap();

        assert!(def.matches(&same));
        assert!(!def.matches(&other_desc));
        assert!(!def.matches(&other_color));
    }

    #[test]
    fn store_labels_keep_identity_with_unusable_color() {
        let remote = RemoteLabel::from_store("bug", "red", Some("Broken")).unwrap();
        assert_eq!(remote.name.as_str(), "bug");
        assert!(remote.color.is_none());
        assert_eq!(remote.color_display(), "?");
        assert!(!label("bug", "d73a4a", Some("Broken")).unwrap().matches(&remote));

        assert!(RemoteLabel::from_store("", "d73a4a", None).is_err());
        assert!(RemoteLabel::new("bug", "red", None).is_err());
    }

    #[test]
    fn update_only_renames_when_spelling_differs() {
        let def = label("bug", "d73a4a", None).unwrap();
        let same = RemoteLabel::new("bug", "000000", None).unwrap();
        let recased = RemoteLabel::new("BUG", "000000", None).unwrap();

        assert_eq!(LabelUpdate::from_definition(&same, &def).new_name, None);
        assert_eq!(
            LabelUpdate::from_definition(&recased, &def)
                .new_name
                .unwrap()
                .as_str(),
            "bug"
        );
    }

    #[test]
    fn names_deserialize_through_validation() {
        let ok: LabelName = serde_json::from_str("\" wontfix \"").unwrap();
        assert_eq!(ok.as_str(), "wontfix");
        assert!(serde_json::from_str::<LabelName>("\"\"").is_err());
    }
}
