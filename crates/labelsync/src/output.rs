use crate::cli::OutputFormat;
use colored::Colorize;
use label_core::{
    LabelConfig, OperationFailed, OperationKind, OperationRecord, Outcome, Reconciliation,
    RemoteLabel, SyncOperation, SyncResult, SyncSummary,
};
use serde::Serialize;

pub fn output_list<T: Serialize + Displayable>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(&items) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            for item in items {
                println!("{}", item.display());
            }
        }
    }
}

#[derive(Serialize)]
pub struct JsonError {
    pub error: bool,
    pub code: String,
    pub message: String,
}

pub fn output_error(err: &anyhow::Error, format: OutputFormat) {
    let message = match format {
        OutputFormat::Json => {
            let json_err = JsonError {
                error: true,
                code: error_code(err).to_string(),
                message: format!("{:#}", err),
            };
            serde_json::to_string_pretty(&json_err).unwrap_or_else(|_| {
                format!(r#"{{"error": true, "message": "{}"}}"#, err)
            })
        }
        OutputFormat::Text => {
            let mut text = format!("{}: {:#}", "Error".red().bold(), err);
            if wants_help(err) {
                text.push_str("\n\nRun 'labelsync --help' for usage.");
            }
            text
        }
    };
    eprintln!("{}", message);
}

fn error_code(err: &anyhow::Error) -> &'static str {
    if err.downcast_ref::<label_core::ConfigError>().is_some() {
        "config"
    } else if err.downcast_ref::<label_core::StoreError>().is_some() {
        "store"
    } else {
        "error"
    }
}

fn wants_help(err: &anyhow::Error) -> bool {
    err.downcast_ref::<label_core::ConfigError>()
        .is_some_and(|e| e.show_help())
}

pub trait Displayable {
    fn display(&self) -> String;
}

impl Displayable for RemoteLabel {
    fn display(&self) -> String {
        let mut output = format!(
            "{} {}",
            self.name.as_str().white().bold(),
            self.color_display().dimmed()
        );
        if let Some(desc) = &self.description {
            output.push_str(&format!("  {}", desc.as_str()));
        }
        output
    }
}

impl Displayable for SyncOperation {
    fn display(&self) -> String {
        let kind = self.kind();
        let marker = match kind {
            OperationKind::Create => "+".green(),
            OperationKind::Update => "~".yellow(),
            OperationKind::Rename => ">".cyan(),
            OperationKind::Delete => "-".red(),
            OperationKind::Skip => "=".dimmed(),
        };

        let target = match self {
            SyncOperation::Rename { from, to } => {
                format!("{} -> {}", from.name, to.name.as_str().bold())
            }
            SyncOperation::Skip { remote, .. } => remote.name.as_str().dimmed().to_string(),
            other => other.label_name().as_str().bold().to_string(),
        };

        let mut output = format!("{} {:<6} {}", marker, kind.as_str(), target);
        if let Some(changes) = field_changes(self) {
            output.push_str(&format!("  {}", changes.dimmed()));
        }
        output
    }
}

/// Color and description differences for updates and renames
fn field_changes(operation: &SyncOperation) -> Option<String> {
    let (current, desired) = match operation {
        SyncOperation::Update { current, desired } => (current, desired),
        SyncOperation::Rename { from, to } => (from, to),
        _ => return None,
    };

    let mut changes = Vec::new();
    if current.color.as_ref() != Some(&desired.color) {
        changes.push(format!(
            "color {} -> {}",
            current.color_display(),
            desired.color.with_hash()
        ));
    }
    if current.description != desired.description {
        changes.push("description".to_string());
    }
    if changes.is_empty() {
        None
    } else {
        Some(format!("({})", changes.join(", ")))
    }
}

impl Displayable for OperationRecord {
    fn display(&self) -> String {
        let line = self.operation.display();
        match &self.outcome {
            Outcome::Failed(cause) => format!("{}  {}", line, format!("failed: {}", cause).red()),
            Outcome::Planned => format!("{}  {}", line, "(dry run)".dimmed()),
            Outcome::Applied(_) | Outcome::Unchanged => line,
        }
    }
}

impl Displayable for SyncSummary {
    fn display(&self) -> String {
        let failed = format!("{} failed", self.failed);
        let failed = if self.failed > 0 {
            failed.red().bold().to_string()
        } else {
            failed
        };
        format!(
            "{}: {} created, {} updated, {} renamed, {} deleted, {} skipped, {}",
            "Summary".bold(),
            self.created,
            self.updated,
            self.renamed,
            self.deleted,
            self.skipped,
            failed
        )
    }
}

#[derive(Serialize)]
struct OperationReport<'a> {
    action: OperationKind,
    label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<&'a str>,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> OperationReport<'a> {
    fn new(operation: &'a SyncOperation, outcome: Option<&Outcome>) -> Self {
        let from = match operation {
            SyncOperation::Rename { from, .. } => Some(from.name.as_str()),
            _ => None,
        };
        let (status, error) = match outcome {
            None | Some(Outcome::Planned) => ("planned", None),
            Some(Outcome::Applied(_)) => ("applied", None),
            Some(Outcome::Unchanged) => ("unchanged", None),
            Some(Outcome::Failed(cause)) => ("failed", Some(cause.to_string())),
        };
        Self {
            action: operation.kind(),
            label: operation.label_name().as_str(),
            from,
            status,
            error,
        }
    }
}

#[derive(Serialize)]
struct FailureReport {
    operation: SyncOperation,
    message: String,
}

impl From<OperationFailed> for FailureReport {
    fn from(failed: OperationFailed) -> Self {
        Self {
            message: failed.to_string(),
            operation: failed.operation,
        }
    }
}

#[derive(Serialize)]
struct SyncReport<'a> {
    dry_run: bool,
    operations: Vec<OperationReport<'a>>,
    failures: Vec<FailureReport>,
    warnings: Vec<String>,
    summary: SyncSummary,
}

/// Print every operation with its outcome, then the summary
pub fn output_sync(result: &SyncResult, warnings: &[String], format: OutputFormat) {
    let summary = result.summary();
    match format {
        OutputFormat::Json => {
            let report = SyncReport {
                dry_run: result.dry_run,
                operations: result
                    .records
                    .iter()
                    .map(|r| OperationReport::new(&r.operation, Some(&r.outcome)))
                    .collect(),
                failures: result.failures().into_iter().map(FailureReport::from).collect(),
                warnings: warnings.to_vec(),
                summary,
            };
            if let Ok(json) = serde_json::to_string_pretty(&report) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            // Warnings already reach stderr through the log
            for record in &result.records {
                println!("{}", record.display());
            }
            if !result.records.is_empty() {
                println!();
            }
            println!("{}", summary.display());
            if result.dry_run {
                println!("{}", "Dry run: no changes were made.".dimmed());
            }
        }
    }
}

#[derive(Serialize)]
struct PlanReport<'a> {
    operations: Vec<OperationReport<'a>>,
    warnings: Vec<String>,
    has_changes: bool,
}

pub fn output_plan(plan: &Reconciliation, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let report = PlanReport {
                operations: plan
                    .operations
                    .iter()
                    .map(|op| OperationReport::new(op, None))
                    .collect(),
                warnings: plan.warnings.iter().map(|w| w.to_string()).collect(),
                has_changes: plan.has_changes(),
            };
            if let Ok(json) = serde_json::to_string_pretty(&report) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            for operation in &plan.operations {
                println!("{}", operation.display());
            }
            if plan.has_changes() {
                println!(
                    "\n{}: {} to create, {} to update, {} to rename, {} to delete",
                    "Plan".bold(),
                    plan.count(OperationKind::Create),
                    plan.count(OperationKind::Update),
                    plan.count(OperationKind::Rename),
                    plan.count(OperationKind::Delete)
                );
            } else {
                println!("{}", "Labels are up to date.".green());
            }
        }
    }
}

#[derive(Serialize)]
struct ValidationReport {
    valid: bool,
    labels: usize,
    delete: usize,
    aliases: usize,
}

pub fn output_validation(path: &std::path::Path, config: &LabelConfig, format: OutputFormat) {
    let aliases = config.labels().iter().map(|l| l.aliases.len()).sum();
    match format {
        OutputFormat::Json => {
            let report = ValidationReport {
                valid: true,
                labels: config.labels().len(),
                delete: config.delete().len(),
                aliases,
            };
            if let Ok(json) = serde_json::to_string_pretty(&report) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            println!(
                "{} {}: {} labels, {} aliases, {} to delete",
                "Valid".green().bold(),
                path.display(),
                config.labels().len(),
                aliases,
                config.delete().len()
            );
        }
    }
}
