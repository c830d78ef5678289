pub mod labels;
pub mod sync;
pub mod validate;

use anyhow::{Context, Result};
use label_core::LabelConfig;
use std::path::Path;

/// Load and validate a label file
pub fn load_label_file(path: &Path) -> Result<LabelConfig> {
    LabelConfig::load(path).with_context(|| format!("Invalid label file {}", path.display()))
}
