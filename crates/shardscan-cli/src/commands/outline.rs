use anyhow::{Context, Result, bail};
use serde::Serialize;
use shardscan_core::config::Config;
use shardscan_core::error::WalkError;
use shardscan_core::types::{SymbolRecord, compute_symbol_id};
use shardscan_outline::scan_cached;
use std::path::Path;
use tracing::debug;

/// A symbol record plus its stable id, as emitted by `--format json`.
#[derive(Serialize)]
struct JsonSymbol {
    symbol_id: String,
    #[serde(flatten)]
    record: SymbolRecord,
}

pub fn run(file: &Path, format: Option<&str>, config_file: Option<&Path>) -> Result<()> {
    let file = std::fs::canonicalize(file).context("Failed to resolve source file path")?;
    let root = file.parent();

    let config = Config::load_with_file(root, config_file)?;
    let format = resolve_format(format, &config)?;

    let extension = file.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !config.scan.extensions.iter().any(|e| e == extension) {
        return Err(WalkError::NotSourceFile {
            path: file.display().to_string(),
        }
        .into());
    }

    let metadata = std::fs::metadata(&file).map_err(WalkError::Io)?;
    if metadata.len() > config.scan.max_file_size {
        return Err(WalkError::FileTooLarge {
            path: file.display().to_string(),
            size: metadata.len(),
        }
        .into());
    }

    let source = std::fs::read_to_string(&file).map_err(WalkError::Io)?;
    let symbols = scan_cached(&source);
    debug!(path = %file.display(), symbols = symbols.len(), "outlined file");

    let path_str = file.to_string_lossy();
    match format.as_str() {
        "json" => {
            let payload: Vec<JsonSymbol> = symbols
                .into_iter()
                .map(|record| JsonSymbol {
                    symbol_id: compute_symbol_id(
                        &path_str,
                        &record.kind,
                        record.span.start_line,
                        &record.name,
                    ),
                    record,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        _ => {
            if symbols.is_empty() {
                println!("No symbols found in {}.", path_str);
                return Ok(());
            }
            print!("{}", render_tree(&symbols));
        }
    }

    Ok(())
}

fn resolve_format(flag: Option<&str>, config: &Config) -> Result<String> {
    let raw = flag.unwrap_or(&config.output.format);
    match raw.trim().to_ascii_lowercase().as_str() {
        "text" => Ok("text".into()),
        "json" => Ok("json".into()),
        other => bail!("unknown format '{}' (expected 'text' or 'json')", other),
    }
}

/// Render an outline as an indented tree.
///
/// Records arrive in source order, so nesting depth is the number of earlier
/// records whose span encloses this one. Lines are shown 1-based.
fn render_tree(symbols: &[SymbolRecord]) -> String {
    let mut out = String::new();
    for (i, record) in symbols.iter().enumerate() {
        let depth = symbols[..i]
            .iter()
            .filter(|outer| outer.span != record.span && outer.span.contains(&record.span))
            .count();
        let first = record.span.start_line + 1;
        let last = record.span.end_line;
        let lines = if last > first {
            format!("{first}-{last}")
        } else {
            format!("{first}")
        };
        out.push_str(&format!(
            "{}{} ({}) {}\n",
            "  ".repeat(depth),
            record.name,
            record.kind,
            lines
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardscan_outline::scan;

    #[test]
    fn tree_indents_by_enclosing_span() {
        let source = "\
module App
  class Server
    def start
    end
  end
end
";
        let rendered = render_tree(&scan(source));
        assert_eq!(
            rendered,
            "App (module) 1-5\n  Server (class) 2-4\n    start (function) 3\n"
        );
    }

    #[test]
    fn single_line_symbols_show_one_line_number() {
        let source = "MAX = 10\n";
        let rendered = render_tree(&scan(source));
        assert_eq!(rendered, "MAX (constant) 1\n");
    }

    #[test]
    fn same_span_siblings_share_a_depth() {
        let source = "class User\n  property name, email\nend\n";
        let rendered = render_tree(&scan(source));
        assert_eq!(
            rendered,
            "User (class) 1-2\n  name (property) 2\n  email (property) 2\n"
        );
    }

    #[test]
    fn format_flag_overrides_config() {
        let config = Config::default();
        assert_eq!(resolve_format(None, &config).unwrap(), "text");
        assert_eq!(resolve_format(Some("JSON"), &config).unwrap(), "json");
        assert!(resolve_format(Some("yaml"), &config).is_err());
    }
}
