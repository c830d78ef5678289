use crate::cli::OutputFormat;
use crate::commands::load_label_file;
use crate::output::{output_plan, output_sync};
use anyhow::{Context, Result};
use label_core::{execute, reconcile, ExecuteOptions, LabelStore, Reconciliation};
use std::path::Path;
use tracing::info;

/// Reconcile the label file against the remote without changing anything
pub fn handle_plan(store: &dyn LabelStore, file: &Path, format: OutputFormat) -> Result<()> {
    let plan = build_plan(store, file)?;

    output_plan(&plan, format);
    Ok(())
}

/// Apply the label file. Returns whether every operation succeeded.
pub fn handle_sync(
    store: &dyn LabelStore,
    file: &Path,
    options: ExecuteOptions,
    format: OutputFormat,
) -> Result<bool> {
    let plan = build_plan(store, file)?;
    let warnings: Vec<String> = plan.warnings.iter().map(ToString::to_string).collect();

    info!(
        operations = plan.operations.len(),
        dry_run = options.dry_run,
        concurrency = options.concurrency,
        "applying label plan"
    );
    let result = execute(plan.operations, store, options);

    output_sync(&result, &warnings, format);
    Ok(result.success())
}

fn build_plan(store: &dyn LabelStore, file: &Path) -> Result<Reconciliation> {
    let config = load_label_file(file)?;
    let remote = store
        .list_labels()
        .context("Failed to list remote labels")?;

    Ok(reconcile(&config, &remote))
}
