use crate::cli::OutputFormat;
use crate::commands::load_label_file;
use crate::output::output_validation;
use anyhow::Result;
use std::path::Path;

pub fn handle_validate(file: &Path, format: OutputFormat) -> Result<()> {
    let config = load_label_file(file)?;

    output_validation(file, &config, format);
    Ok(())
}
