//! Applying a reconciliation through a label store

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{OperationFailed, StoreError};
use crate::model::{LabelUpdate, RemoteLabel};
use crate::reconcile::{OperationKind, SyncOperation};
use crate::store::LabelStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Classify and report operations without issuing mutating calls
    pub dry_run: bool,
    /// Maximum number of remote calls in flight; 1 runs sequentially
    pub concurrency: usize,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            concurrency: 1,
        }
    }
}

/// What happened to a single operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The store call succeeded. Deletes carry no label.
    Applied(Option<RemoteLabel>),
    /// Dry run: the call was not issued
    Planned,
    /// Nothing to do for a skip
    Unchanged,
    Failed(StoreError),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

#[derive(Debug, Clone)]
pub struct OperationRecord {
    pub operation: SyncOperation,
    pub outcome: Outcome,
}

impl OperationRecord {
    pub fn failure(&self) -> Option<OperationFailed> {
        match &self.outcome {
            Outcome::Failed(cause) => Some(OperationFailed {
                operation: self.operation.clone(),
                cause: cause.clone(),
            }),
            _ => None,
        }
    }
}

/// Per-category counts. Failed operations are counted only as `failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub created: usize,
    pub updated: usize,
    pub renamed: usize,
    pub deleted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub success: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SyncResult {
    /// One record per operation, in plan order
    pub records: Vec<OperationRecord>,
    pub dry_run: bool,
}

impl SyncResult {
    pub fn summary(&self) -> SyncSummary {
        let mut summary = SyncSummary {
            created: 0,
            updated: 0,
            renamed: 0,
            deleted: 0,
            skipped: 0,
            failed: 0,
            success: true,
        };

        for record in &self.records {
            if record.outcome.is_failure() {
                summary.failed += 1;
                continue;
            }
            match record.operation.kind() {
                OperationKind::Create => summary.created += 1,
                OperationKind::Update => summary.updated += 1,
                OperationKind::Rename => summary.renamed += 1,
                OperationKind::Delete => summary.deleted += 1,
                OperationKind::Skip => summary.skipped += 1,
            }
        }

        summary.success = summary.failed == 0;
        summary
    }

    pub fn success(&self) -> bool {
        !self.records.iter().any(|r| r.outcome.is_failure())
    }

    pub fn failures(&self) -> Vec<OperationFailed> {
        self.records
            .iter()
            .filter_map(OperationRecord::failure)
            .collect()
    }
}

/// Apply `operations` in order, isolating failures.
///
/// A failed call is recorded against its operation and the run continues.
/// With `concurrency > 1` calls are spread over a bounded worker pool but
/// the records still come back in plan order.
pub fn execute(
    operations: Vec<SyncOperation>,
    store: &dyn LabelStore,
    options: ExecuteOptions,
) -> SyncResult {
    let outcomes = if options.concurrency <= 1 || operations.len() <= 1 {
        operations
            .iter()
            .map(|op| apply(store, op, options.dry_run))
            .collect()
    } else {
        apply_concurrently(&operations, store, options)
    };

    let records = operations
        .into_iter()
        .zip(outcomes)
        .map(|(operation, outcome)| OperationRecord { operation, outcome })
        .collect();

    SyncResult {
        records,
        dry_run: options.dry_run,
    }
}

fn apply_concurrently(
    operations: &[SyncOperation],
    store: &dyn LabelStore,
    options: ExecuteOptions,
) -> Vec<Outcome> {
    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(options.concurrency)
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            warn!(error = %e, "could not start worker pool, running sequentially");
            return operations
                .iter()
                .map(|op| apply(store, op, options.dry_run))
                .collect();
        }
    };

    // Indexed collect keeps plan order
    pool.install(|| {
        operations
            .par_iter()
            .map(|op| apply(store, op, options.dry_run))
            .collect()
    })
}

fn apply(store: &dyn LabelStore, operation: &SyncOperation, dry_run: bool) -> Outcome {
    if !operation.is_mutating() {
        debug!("{}", operation.describe());
        return Outcome::Unchanged;
    }
    if dry_run {
        info!(dry_run = true, "would {}", operation.describe());
        return Outcome::Planned;
    }

    let result = match operation {
        SyncOperation::Create { desired } => store.create_label(desired).map(Some),
        SyncOperation::Rename { from, to } => store
            .update_label(&from.name, &LabelUpdate::from_definition(from, to))
            .map(Some),
        SyncOperation::Update { current, desired } => store
            .update_label(&current.name, &LabelUpdate::from_definition(current, desired))
            .map(Some),
        SyncOperation::Delete { remote } => store.delete_label(&remote.name).map(|()| None),
        SyncOperation::Skip { .. } => Ok(None),
    };

    match result {
        Ok(label) => {
            info!("{}", operation.describe());
            Outcome::Applied(label)
        }
        Err(cause) => {
            warn!(error = %cause, "failed to {}", operation.describe());
            Outcome::Failed(cause)
        }
    }
}
