//! Create command implementation.
//!
//! Lists files derivable from a source path through creation patterns and,
//! with `--apply`, writes them.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::workspace::Workspace;

/// Print (and optionally create) the files derivable from `path`.
pub fn execute(root: &Path, config: Option<&Path>, path: &Path, apply: bool) -> Result<()> {
    let workspace = Workspace::load(root, config)?;
    let path = workspace.resolve(path);
    let creations = workspace.manager.get_all_file_creations_from(&path);

    if creations.is_empty() {
        println!("{}: nothing to create", workspace.display(&path));
        return Ok(());
    }

    for record in &creations {
        let target = workspace.display(&record.full_path);
        if !apply {
            println!("{} {} ({}): {}", record.icon, record.name, record.type_name, target);
            continue;
        }

        let target_path = Path::new(&record.full_path);
        if target_path.exists() {
            println!("Skipped {} (already exists)", target);
            continue;
        }
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(
            target_path,
            record.initial_content_snippet.as_deref().unwrap_or_default(),
        )
        .with_context(|| format!("Failed to write {}", target_path.display()))?;

        info!(path = %target_path.display(), pattern = %record.name, "Created file");
        println!("Created {}", target);
    }

    Ok(())
}
