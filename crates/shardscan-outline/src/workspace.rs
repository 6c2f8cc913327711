use crate::cache::scan_cached;
use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::Serialize;
use shardscan_core::constants;
use shardscan_core::types::SymbolRecord;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The outline of one discovered source file.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutline {
    pub path: PathBuf,
    pub relative_path: String,
    pub symbols: Vec<SymbolRecord>,
}

/// Directories no Crystal project wants outlined: VCS metadata, fetched
/// shards, and build output.
const BUILTIN_IGNORE_DIRS: &[&str] = &[".git", "lib", ".shards", "bin", ".crystal"];

/// Walk `root` and outline every source file, respecting ignore rules.
///
/// Files larger than `max_file_size` are skipped with a warning. Results are
/// sorted by relative path regardless of walk order.
pub fn scan_workspace(root: &Path, max_file_size: u64, extensions: &[String]) -> Vec<FileOutline> {
    let mut walker = WalkBuilder::new(root);
    walker
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(false);

    // Add .shardscanignore
    let ignore_file = root.join(constants::IGNORE_FILE);
    if ignore_file.exists() {
        walker.add_custom_ignore_filename(constants::IGNORE_FILE);
    }

    let mut candidates = Vec::new();

    for entry in walker.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Walk error: {}", e);
                continue;
            }
        };

        let path = entry.path();

        if path.is_dir() {
            continue;
        }

        let path_str = path.to_string_lossy();
        if should_ignore_builtin(&path_str) {
            debug!(?path, "Skipped by built-in ignore");
            continue;
        }

        if !has_source_extension(path, extensions) {
            continue;
        }

        if let Ok(metadata) = std::fs::metadata(path)
            && metadata.len() > max_file_size
        {
            warn!(?path, size = metadata.len(), "Skipped: file too large");
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        candidates.push((path.to_path_buf(), relative));
    }

    let mut outlines: Vec<FileOutline> = candidates
        .into_par_iter()
        .filter_map(|(path, relative_path)| {
            let source = match std::fs::read_to_string(&path) {
                Ok(s) => s,
                Err(e) => {
                    warn!(?path, "Skipped: unreadable file: {}", e);
                    return None;
                }
            };
            Some(FileOutline {
                symbols: scan_cached(&source),
                path,
                relative_path,
            })
        })
        .collect();

    outlines.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    outlines
}

fn should_ignore_builtin(path: &str) -> bool {
    let normalized_path = path.replace('\\', "/");
    BUILTIN_IGNORE_DIRS
        .iter()
        .any(|dir| normalized_path.contains(&format!("/{dir}/")))
}

fn has_source_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    if extensions.is_empty() {
        return constants::SOURCE_EXTENSIONS.contains(&ext);
    }
    extensions.iter().any(|e| e == ext)
}
