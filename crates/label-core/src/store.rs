use crate::error::Result;
use crate::model::{LabelDefinition, LabelName, LabelUpdate, RemoteLabel};

/// CRUD access to the labels of one repository
///
/// Implemented by each backend (GitHub, GitLab, the fixture-backed mock).
/// Calls are blocking and carry the backend's own timeout; nothing here retries.
pub trait LabelStore: Send + Sync {
    /// List every label in the repository
    fn list_labels(&self) -> Result<Vec<RemoteLabel>>;

    /// Look up a single label by name (case-insensitive).
    ///
    /// Returns `Ok(None)` when the label does not exist. The default
    /// implementation scans [`LabelStore::list_labels`].
    fn get_label(&self, name: &LabelName) -> Result<Option<RemoteLabel>> {
        Ok(self
            .list_labels()?
            .into_iter()
            .find(|label| label.name == *name))
    }

    /// Create a new label
    fn create_label(&self, label: &LabelDefinition) -> Result<RemoteLabel>;

    /// Update a label in place, renaming it when `update.new_name` is set.
    ///
    /// The label keeps its identity, so issues stay attached across a rename.
    fn update_label(&self, current_name: &LabelName, update: &LabelUpdate) -> Result<RemoteLabel>;

    /// Delete a label by name
    fn delete_label(&self, name: &LabelName) -> Result<()>;
}
