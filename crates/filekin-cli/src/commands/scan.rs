//! Scan command implementation.
//!
//! Walks a workspace and prints every file that has links.

use std::path::Path;

use anyhow::Result;
use filekin_core::{DecorationSummary, MetricsSnapshot, RelatedFileRecord};
use serde::Serialize;
use tracing::info;

use crate::workspace::Workspace;

/// JSON output of `fk scan --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanReport {
    root: String,
    files: usize,
    relevant: usize,
    linked: Vec<LinkedEntry>,
    metrics: MetricsSnapshot,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LinkedEntry {
    path: String,
    file_type: String,
    decoration: Option<DecorationSummary>,
    links: Vec<RelatedFileRecord>,
}

/// Execute the scan command on a workspace root.
pub fn execute(root: &Path, config: Option<&Path>, json: bool, verbose: bool) -> Result<()> {
    let workspace = Workspace::load(root, config)?;
    let manager = &workspace.manager;
    info!(root = %workspace.root.display(), "Scanning workspace");

    let linked: Vec<LinkedEntry> = manager
        .get_all_paths_with_outgoing_links()
        .into_iter()
        .filter_map(|path| {
            let metadata = manager.classify(&path)?;
            Some(LinkedEntry {
                file_type: metadata.file_type.clone(),
                decoration: manager.get_decoration_summary(&path),
                links: manager.get_linked_files(&path),
                path,
            })
        })
        .collect();

    if json {
        let report = ScanReport {
            root: workspace.root.display().to_string(),
            files: workspace.file_count,
            relevant: manager.known_path_count(),
            linked,
            metrics: manager.metrics().snapshot(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Workspace: {}", workspace.root.display());
    println!(
        "Files: {} ({} matched a file type, {} with links)",
        workspace.file_count,
        manager.known_path_count(),
        linked.len()
    );

    for entry in &linked {
        let marker = entry
            .decoration
            .as_ref()
            .map(|d| d.marker_text.as_str())
            .unwrap_or_default();
        println!("\n{} [{}]", workspace.display(&entry.path), marker);
        for link in &entry.links {
            println!("  -> {}: {}", link.type_name, workspace.display(&link.full_path));
        }
    }

    if verbose {
        let metrics = manager.metrics().snapshot();
        println!(
            "\nClassification cache: {} hits, {} misses ({:.0}% hit ratio)",
            metrics.classify_cache_hits,
            metrics.classify_cache_misses,
            metrics.cache_hit_ratio() * 100.0
        );
    }

    Ok(())
}
