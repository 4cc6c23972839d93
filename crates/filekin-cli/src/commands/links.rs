//! Links command implementation.

use std::path::Path;

use anyhow::Result;

use crate::workspace::Workspace;

/// Print the files linked to `path`.
pub fn execute(root: &Path, config: Option<&Path>, path: &Path) -> Result<()> {
    let workspace = Workspace::load(root, config)?;
    let manager = &workspace.manager;
    let path = workspace.resolve(path);

    let Some(metadata) = manager.classify(&path) else {
        println!("{}: no file type matches", workspace.display(&path));
        return Ok(());
    };

    println!(
        "{} ({}, key \"{}\")",
        workspace.display(&path),
        metadata.file_type,
        metadata.identity_key
    );

    let linked = manager.get_linked_files(&path);
    if linked.is_empty() {
        println!("  no linked files");
    }
    for record in &linked {
        println!(
            "  {} {}: {}",
            record.icon,
            record.type_name,
            workspace.display(&record.full_path)
        );
    }

    Ok(())
}
