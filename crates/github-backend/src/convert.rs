//! Conversion between GitHub label payloads and label-core types

use label_core::{LabelDefinition, LabelUpdate, RemoteLabel, ValidationError};
use tracing::warn;

use crate::models::*;

impl TryFrom<GitHubLabel> for RemoteLabel {
    type Error = ValidationError;

    fn try_from(l: GitHubLabel) -> Result<Self, Self::Error> {
        RemoteLabel::from_store(&l.name, &l.color, l.description.as_deref())
    }
}

/// Convert listed labels, skipping any whose name the label model rejects.
/// Labels with an unusable color are kept with an unknown color.
pub fn remote_labels(labels: Vec<GitHubLabel>) -> Vec<RemoteLabel> {
    labels
        .into_iter()
        .filter_map(|l| {
            let name = l.name.clone();
            match RemoteLabel::try_from(l) {
                Ok(label) => Some(label),
                Err(e) => {
                    warn!(label = %name, error = %e, "ignoring GitHub label");
                    None
                }
            }
        })
        .collect()
}

pub fn create_label_from_core(label: &LabelDefinition) -> CreateGitHubLabel {
    CreateGitHubLabel {
        name: label.name.to_string(),
        color: label.color.to_string(),
        description: label.description.as_ref().map(|d| d.to_string()),
    }
}

/// GitHub keeps the old description when the field is omitted, so an absent
/// description is sent as an empty string.
pub fn update_label_from_core(update: &LabelUpdate) -> UpdateGitHubLabel {
    UpdateGitHubLabel {
        new_name: update.new_name.as_ref().map(|n| n.to_string()),
        color: Some(update.color.to_string()),
        description: Some(
            update
                .description
                .as_ref()
                .map(|d| d.to_string())
                .unwrap_or_default(),
        ),
    }
}
