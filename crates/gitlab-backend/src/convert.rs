//! Conversion between GitLab label payloads and label-core types

use label_core::{LabelDefinition, LabelUpdate, RemoteLabel, ValidationError};
use tracing::warn;

use crate::models::*;

impl TryFrom<GitLabLabel> for RemoteLabel {
    type Error = ValidationError;

    fn try_from(l: GitLabLabel) -> Result<Self, Self::Error> {
        // LabelColor strips the leading '#'
        RemoteLabel::from_store(&l.name, &l.color, l.description.as_deref())
    }
}

/// Convert listed labels, skipping any whose name the label model rejects.
/// Labels with an unusable color are kept with an unknown color.
pub fn remote_labels(labels: Vec<GitLabLabel>) -> Vec<RemoteLabel> {
    labels
        .into_iter()
        .filter_map(|l| {
            let name = l.name.clone();
            match RemoteLabel::try_from(l) {
                Ok(label) => Some(label),
                Err(e) => {
                    warn!(label = %name, error = %e, "ignoring GitLab label");
                    None
                }
            }
        })
        .collect()
}

pub fn create_label_from_core(label: &LabelDefinition) -> CreateGitLabLabel {
    CreateGitLabLabel {
        name: label.name.to_string(),
        color: label.color.with_hash(),
        description: label.description.as_ref().map(|d| d.to_string()),
    }
}

pub fn update_label_from_core(update: &LabelUpdate) -> UpdateGitLabLabel {
    UpdateGitLabLabel {
        new_name: update.new_name.as_ref().map(|n| n.to_string()),
        color: Some(update.color.with_hash()),
        description: Some(
            update
                .description
                .as_ref()
                .map(|d| d.to_string())
                .unwrap_or_default(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use label_core::{label, reconcile, LabelConfig, OperationKind};

    #[test]
    fn colors_round_trip_through_hash_prefix() {
        let remote = RemoteLabel::try_from(GitLabLabel {
            id: 1,
            name: "bug".to_string(),
            color: "#FC2929".to_string(),
            description: None,
        })
        .unwrap();
        assert_eq!(remote.color.unwrap().as_str(), "fc2929");

        let create = create_label_from_core(&label("bug", "fc2929", None).unwrap());
        assert_eq!(create.color, "#fc2929");
    }

    #[test]
    fn named_colors_keep_the_label_for_an_update() {
        let remote = remote_labels(vec![GitLabLabel {
            id: 1,
            name: "bug".to_string(),
            color: "red".to_string(),
            description: None,
        }]);
        assert_eq!(remote.len(), 1);
        assert_eq!(remote[0].name.as_str(), "bug");
        assert!(remote[0].color.is_none());

        let config = LabelConfig::new(vec![label("bug", "d73a4a", None).unwrap()], vec![]).unwrap();
        let plan = reconcile(&config, &remote);
        assert_eq!(plan.operations.len(), 1);
        assert_eq!(plan.operations[0].kind(), OperationKind::Update);
    }
}
