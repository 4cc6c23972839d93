//! Transform command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use filekin_core::{apply_transformations, TransformationStep};
use tracing::debug;

/// Apply the steps stored in `steps_file` to `path` and print the result.
pub fn execute(path: &str, steps_file: &Path) -> Result<()> {
    let contents = fs::read_to_string(steps_file)
        .with_context(|| format!("Failed to read {}", steps_file.display()))?;
    let steps: Vec<TransformationStep> = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid transformation steps in {}", steps_file.display()))?;

    let compiled = steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            step.compile()
                .with_context(|| format!("Transformation step {} is invalid", i + 1))
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(steps = compiled.len(), "Compiled transformation steps");

    println!("{}", apply_transformations(path, &compiled));
    Ok(())
}
