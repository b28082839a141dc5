//! Knowledge-base loading from the fragment directory
//!
//! Fragments are `*.json` files found recursively under the root directory
//! (e.g. `database/01_Graos/01_Soja/biologia.json`). They are merged in
//! sorted path order; broken fragments are skipped and reported.

use shared::aliases::FieldAliases;
use shared::catalog::{Catalog, FragmentError, KnowledgeBaseMerger, MergeReport};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Build the catalog from every fragment under `root`.
///
/// A missing root yields an empty catalog; a root that is not a directory is
/// an error.
pub fn load_catalog(root: &Path, aliases: &FieldAliases) -> AppResult<(Catalog, MergeReport)> {
    let mut merger = KnowledgeBaseMerger::new();

    if !root.exists() {
        tracing::warn!(root = %root.display(), "Knowledge base directory not found");
        return Ok(merger.finish(aliases));
    }
    if !root.is_dir() {
        return Err(AppError::KnowledgeBase(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let fragments = discover_fragments(root)?;
    tracing::info!(root = %root.display(), count = fragments.len(), "Loading knowledge base");

    for path in &fragments {
        let source = path
            .strip_prefix(root)
            .unwrap_or(path)
            .display()
            .to_string();

        let result = match fs::read_to_string(path) {
            Ok(text) => merger.ingest(&source, &text),
            Err(e) => {
                let error = FragmentError::Unreadable(e.to_string());
                merger.skip(&source, error.clone());
                Err(error)
            }
        };

        match result {
            Ok(()) => tracing::debug!(fragment = %source, "Fragment merged"),
            Err(e) => tracing::warn!(fragment = %source, error = %e, "Fragment skipped"),
        }
    }

    let (catalog, report) = merger.finish(aliases);
    for rejected in &report.rejected_crops {
        tracing::warn!(crop = %rejected.name, reason = %rejected.reason, "Crop left out of catalog");
    }
    tracing::info!(
        crops = catalog.len(),
        merged = report.merged_count(),
        skipped = report.skipped_count(),
        aliases_version = catalog.aliases_version(),
        "Knowledge base loaded"
    );

    Ok((catalog, report))
}

/// Every `*.json` file under `root`, sorted by path
pub fn discover_fragments(root: &Path) -> AppResult<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir).map_err(|e| {
            AppError::KnowledgeBase(format!("cannot read {}: {}", dir.display(), e))
        })?;

        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if path.is_dir() {
                pending.push(path);
            } else if is_fragment(&path) {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}

fn is_fragment(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
