use anyhow::{Context, Result, bail};
use serde::Serialize;
use shardscan_core::config::Config;
use shardscan_core::types::{SymbolKind, SymbolRecord, compute_symbol_id};
use shardscan_outline::workspace::{FileOutline, scan_workspace};
use std::path::Path;
use tracing::debug;

/// One flattened result row across the workspace.
#[derive(Debug, Clone, Serialize)]
struct SymbolRow {
    symbol_id: String,
    path: String,
    #[serde(flatten)]
    record: SymbolRecord,
}

pub fn run(
    root: &Path,
    name: Option<&str>,
    kind: Option<&str>,
    limit: Option<usize>,
    format: Option<&str>,
    config_file: Option<&Path>,
) -> Result<()> {
    let root = std::fs::canonicalize(root).context("Failed to resolve project path")?;

    let config = Config::load_with_file(Some(&root), config_file)?;
    let format = match format.unwrap_or(&config.output.format) {
        f if f.eq_ignore_ascii_case("json") => "json",
        f if f.eq_ignore_ascii_case("text") => "text",
        other => bail!("unknown format '{}' (expected 'text' or 'json')", other),
    };

    let kind_filter = match kind {
        Some(raw) => Some(SymbolKind::parse_kind(raw).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown symbol kind '{}' (expected module, class, struct, enum, def, property, constant, or variable)",
                raw
            )
        })?),
        None => None,
    };

    let outlines = scan_workspace(&root, config.scan.max_file_size, &config.scan.extensions);
    debug!(files = outlines.len(), "workspace scan complete");
    let limit = limit.unwrap_or(config.scan.default_limit);
    let rows = collect_rows(&outlines, name, kind_filter, limit);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        _ => {
            if rows.is_empty() {
                println!("No symbols found.");
                return Ok(());
            }
            println!("Results: {}", rows.len());
            println!();
            println!("{:<50} {:<10} {:<24} {:<16}", "PATH", "KIND", "NAME", "PARENT");
            println!("{}", "-".repeat(100));
            for row in &rows {
                println!(
                    "{:<50} {:<10} {:<24} {:<16}",
                    format!("{}:{}", row.path, row.record.span.start_line + 1),
                    row.record.kind.as_str(),
                    row.record.name,
                    row.record.parent.as_deref().unwrap_or("-"),
                );
            }
        }
    }

    Ok(())
}

/// Flatten outlines into rows, applying name/kind filters and the limit.
/// Outlines are already path-sorted and symbols are in source order, so the
/// output order is deterministic.
fn collect_rows(
    outlines: &[FileOutline],
    name: Option<&str>,
    kind: Option<SymbolKind>,
    limit: usize,
) -> Vec<SymbolRow> {
    let name_lower = name.map(str::to_ascii_lowercase);
    let mut rows = Vec::new();

    'outer: for outline in outlines {
        for record in &outline.symbols {
            if let Some(k) = kind
                && record.kind != k
            {
                continue;
            }
            if let Some(needle) = &name_lower
                && !record.name.to_ascii_lowercase().contains(needle.as_str())
            {
                continue;
            }
            rows.push(SymbolRow {
                symbol_id: compute_symbol_id(
                    &outline.relative_path,
                    &record.kind,
                    record.span.start_line,
                    &record.name,
                ),
                path: outline.relative_path.clone(),
                record: record.clone(),
            });
            if rows.len() >= limit {
                break 'outer;
            }
        }
    }

    rows
}
