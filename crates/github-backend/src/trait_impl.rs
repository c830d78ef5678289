use label_core::{
    fetch_all_pages, LabelDefinition, LabelName, LabelStore, LabelUpdate, RemoteLabel, Result,
    StoreError,
};

use crate::client::GitHubClient;
use crate::convert::{create_label_from_core, remote_labels, update_label_from_core};

/// GitHub caps `per_page` at 100
const PAGE_SIZE: usize = 100;

impl LabelStore for GitHubClient {
    fn list_labels(&self) -> Result<Vec<RemoteLabel>> {
        let labels = fetch_all_pages(
            |page, per_page| {
                self.list_labels_page(page, per_page)
                    .map_err(StoreError::from)
            },
            PAGE_SIZE,
        )?;
        Ok(remote_labels(labels))
    }

    fn get_label(&self, name: &LabelName) -> Result<Option<RemoteLabel>> {
        let Some(label) = GitHubClient::get_label(self, name.as_str())? else {
            return Ok(None);
        };
        RemoteLabel::try_from(label)
            .map(Some)
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    fn create_label(&self, label: &LabelDefinition) -> Result<RemoteLabel> {
        let created = GitHubClient::create_label(self, &create_label_from_core(label))?;
        RemoteLabel::try_from(created).map_err(|e| StoreError::Parse(e.to_string()))
    }

    fn update_label(&self, current_name: &LabelName, update: &LabelUpdate) -> Result<RemoteLabel> {
        let updated = GitHubClient::update_label(
            self,
            current_name.as_str(),
            &update_label_from_core(update),
        )?;
        RemoteLabel::try_from(updated).map_err(|e| StoreError::Parse(e.to_string()))
    }

    fn delete_label(&self, name: &LabelName) -> Result<()> {
        GitHubClient::delete_label(self, name.as_str()).map_err(StoreError::from)
    }
}
