pub mod config;
pub mod error;
pub mod execute;
pub mod model;
pub mod pagination;
pub mod reconcile;
pub mod store;

pub use config::{LabelConfig, LabelFileFormat, RawLabel, RawLabelConfig};
pub use error::{ConfigError, OperationFailed, Result, StoreError, ValidationError};
pub use execute::{execute, ExecuteOptions, OperationRecord, Outcome, SyncResult, SyncSummary};
pub use model::*;
pub use pagination::{fetch_all_pages, get_max_pages};
pub use reconcile::{reconcile, AmbiguousAliasWarning, OperationKind, Reconciliation, SyncOperation};
pub use store::LabelStore;
