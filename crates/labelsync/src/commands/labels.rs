use crate::cli::OutputFormat;
use crate::output::output_list;
use anyhow::{Context, Result};
use label_core::LabelStore;

pub fn handle_list(store: &dyn LabelStore, format: OutputFormat) -> Result<()> {
    let mut labels = store.list_labels().context("Failed to list labels")?;
    labels.sort_by_key(|l| l.name.key());

    output_list(&labels, format);
    Ok(())
}
