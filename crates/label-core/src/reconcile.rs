//! Diffing the desired label set against the remote one

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::LabelConfig;
use crate::model::{LabelDefinition, LabelName, RemoteLabel};

/// One step needed to bring the remote labels in line with the config
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SyncOperation {
    Create {
        desired: LabelDefinition,
    },
    /// Rename an existing remote label found through an alias, updating its
    /// color and description in the same call.
    Rename {
        from: RemoteLabel,
        to: LabelDefinition,
    },
    Update {
        current: RemoteLabel,
        desired: LabelDefinition,
    },
    Delete {
        remote: RemoteLabel,
    },
    /// Remote label already matches
    Skip {
        remote: RemoteLabel,
        desired: LabelDefinition,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Create,
    Rename,
    Update,
    Delete,
    Skip,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Create => "create",
            OperationKind::Rename => "rename",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
            OperationKind::Skip => "skip",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SyncOperation {
    pub fn kind(&self) -> OperationKind {
        match self {
            SyncOperation::Create { .. } => OperationKind::Create,
            SyncOperation::Rename { .. } => OperationKind::Rename,
            SyncOperation::Update { .. } => OperationKind::Update,
            SyncOperation::Delete { .. } => OperationKind::Delete,
            SyncOperation::Skip { .. } => OperationKind::Skip,
        }
    }

    /// Name the label carries once the operation is applied
    pub fn label_name(&self) -> &LabelName {
        match self {
            SyncOperation::Create { desired }
            | SyncOperation::Update { desired, .. }
            | SyncOperation::Skip { desired, .. } => &desired.name,
            SyncOperation::Rename { to, .. } => &to.name,
            SyncOperation::Delete { remote } => &remote.name,
        }
    }

    /// The remote label this operation acts on, if any
    pub fn remote(&self) -> Option<&RemoteLabel> {
        match self {
            SyncOperation::Create { .. } => None,
            SyncOperation::Rename { from, .. } => Some(from),
            SyncOperation::Update { current, .. } => Some(current),
            SyncOperation::Delete { remote } | SyncOperation::Skip { remote, .. } => Some(remote),
        }
    }

    pub fn is_mutating(&self) -> bool {
        !matches!(self, SyncOperation::Skip { .. })
    }

    pub fn describe(&self) -> String {
        match self {
            SyncOperation::Create { desired } => format!("create label \"{}\"", desired.name),
            SyncOperation::Rename { from, to } => {
                format!("rename label \"{}\" to \"{}\"", from.name, to.name)
            }
            SyncOperation::Update { current, .. } => format!("update label \"{}\"", current.name),
            SyncOperation::Delete { remote } => format!("delete label \"{}\"", remote.name),
            SyncOperation::Skip { remote, .. } => format!("skip label \"{}\"", remote.name),
        }
    }
}

/// Two definitions aliased the same remote label; the later one is created
/// from scratch instead of being renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbiguousAliasWarning {
    pub label: LabelName,
    pub alias: LabelName,
    pub claimed_by: LabelName,
}

impl fmt::Display for AmbiguousAliasWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "alias \"{}\" of label \"{}\" was already claimed by \"{}\"; \"{}\" will be created instead",
            self.alias, self.label, self.claimed_by, self.label
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Create/rename/update/skip in config order, then deletes in config order
    pub operations: Vec<SyncOperation>,
    pub warnings: Vec<AmbiguousAliasWarning>,
}

impl Reconciliation {
    pub fn count(&self, kind: OperationKind) -> usize {
        self.operations.iter().filter(|op| op.kind() == kind).count()
    }

    pub fn has_changes(&self) -> bool {
        self.operations.iter().any(SyncOperation::is_mutating)
    }
}

/// Compute the operations that turn `remote` into `desired`.
///
/// Remote labels that are neither configured nor listed under `delete` are
/// left alone. Each remote label is the target of at most one operation.
pub fn reconcile(desired: &LabelConfig, remote: &[RemoteLabel]) -> Reconciliation {
    let mut by_name: HashMap<String, usize> = HashMap::with_capacity(remote.len());
    for (index, label) in remote.iter().enumerate() {
        by_name.entry(label.name.key()).or_insert(index);
    }

    // Remote index -> name of the definition that claimed it. Direct name
    // matches are claimed up front so an alias can never take them.
    let mut claimed: HashMap<usize, LabelName> = HashMap::new();
    let direct: Vec<Option<usize>> = desired
        .labels()
        .iter()
        .map(|def| {
            let index = by_name.get(&def.name.key()).copied();
            if let Some(index) = index {
                claimed.entry(index).or_insert_with(|| def.name.clone());
            }
            index
        })
        .collect();

    let mut result = Reconciliation::default();

    for (def, direct_index) in desired.labels().iter().zip(direct) {
        if let Some(index) = direct_index {
            let current = &remote[index];
            let op = if def.matches(current) {
                SyncOperation::Skip {
                    remote: current.clone(),
                    desired: def.clone(),
                }
            } else {
                SyncOperation::Update {
                    current: current.clone(),
                    desired: def.clone(),
                }
            };
            result.operations.push(op);
            continue;
        }

        let mut contested = None;
        let mut renamed_from = None;
        for alias in &def.aliases {
            let Some(&index) = by_name.get(&alias.key()) else {
                continue;
            };
            match claimed.get(&index) {
                Some(owner) => {
                    if contested.is_none() {
                        contested = Some((alias.clone(), owner.clone()));
                    }
                }
                None => {
                    renamed_from = Some(index);
                    break;
                }
            }
        }

        match renamed_from {
            Some(index) => {
                claimed.insert(index, def.name.clone());
                result.operations.push(SyncOperation::Rename {
                    from: remote[index].clone(),
                    to: def.clone(),
                });
            }
            None => {
                if let Some((alias, claimed_by)) = contested {
                    let warning = AmbiguousAliasWarning {
                        label: def.name.clone(),
                        alias,
                        claimed_by,
                    };
                    warn!("{}", warning);
                    result.warnings.push(warning);
                }
                result.operations.push(SyncOperation::Create {
                    desired: def.clone(),
                });
            }
        }
    }

    for name in desired.delete() {
        let Some(&index) = by_name.get(&name.key()) else {
            debug!(label = %name, "label listed for deletion does not exist remotely");
            continue;
        };
        if claimed.contains_key(&index) {
            continue;
        }
        claimed.insert(index, name.clone());
        result.operations.push(SyncOperation::Delete {
            remote: remote[index].clone(),
        });
    }

    debug!(
        create = result.count(OperationKind::Create),
        rename = result.count(OperationKind::Rename),
        update = result.count(OperationKind::Update),
        delete = result.count(OperationKind::Delete),
        skip = result.count(OperationKind::Skip),
        "reconciliation computed"
    );

    result
}
