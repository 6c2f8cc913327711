//! Integration tests for shardscan.
//!
//! Exercises the full pipeline at the library level: config loading,
//! workspace walking, and the outline scanner, over the Crystal fixture
//! project in testdata/ and over synthetic temp projects.

use std::path::{Path, PathBuf};
use tempfile::tempdir;

use shardscan_core::config::Config;
use shardscan_core::constants;
use shardscan_core::types::{SymbolKind, compute_symbol_id};
use shardscan_outline::workspace::{FileOutline, scan_workspace};
use shardscan_outline::{scan, scan_cached};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Return the absolute path to the Crystal fixture project.
fn fixture_repo_path() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .join("../../testdata/fixtures/crystal-sample")
        .canonicalize()
        .expect("fixture repo must exist at testdata/fixtures/crystal-sample")
}

fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&full, content).expect("write file");
    }
}

fn scan_default(root: &Path) -> Vec<FileOutline> {
    scan_workspace(root, constants::MAX_FILE_SIZE, &[])
}

// ---------------------------------------------------------------------------
// Fixture outline
// ---------------------------------------------------------------------------

#[test]
fn test_outline_of_fixture_server() {
    let source = std::fs::read_to_string(fixture_repo_path().join("src/server.cr"))
        .expect("read server.cr");
    let symbols = scan(&source);

    let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Sample",
            "Server",
            "DEFAULT_PORT",
            "host",
            "port",
            "backlog",
            "listener",
            "start",
            "handle"
        ]
    );

    let server = &symbols[1];
    assert_eq!(server.kind, SymbolKind::Class);
    assert_eq!(server.parent.as_deref(), Some("Sample"));

    let start = symbols.iter().find(|s| s.name == "start").expect("start");
    assert_eq!(start.kind, SymbolKind::Function);
    assert_eq!(start.parent.as_deref(), Some("Server"));
    assert_eq!(start.span.start_line, 11);
    assert_eq!(start.span.end_line, 16);

    // ivar assignment inside `start` must not produce a second `listener`
    let listeners = symbols.iter().filter(|s| s.name == "listener").count();
    assert_eq!(listeners, 1);
}

#[test]
fn test_outline_of_fixture_user_model() {
    let source = std::fs::read_to_string(fixture_repo_path().join("src/models/user.cr"))
        .expect("read user.cr");
    let symbols = scan(&source);

    let find = |name: &str| {
        symbols
            .iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("missing symbol {name:?}"))
    };

    assert_eq!(find("User").kind, SymbolKind::Class);
    assert_eq!(find("Credentials").kind, SymbolKind::Struct);
    assert_eq!(find("Credentials").parent.as_deref(), Some("Sample"));
    assert_eq!(find("Role").kind, SymbolKind::Enum);
    assert_eq!(find("Admin").kind, SymbolKind::Constant);
    assert_eq!(find("Admin").parent.as_deref(), Some("Role"));
    assert_eq!(find("UserId").kind, SymbolKind::Constant);
    assert_eq!(find("created_at").kind, SymbolKind::Property);

    // one-line record opens no block
    let creds = find("Credentials");
    assert_eq!(creds.span.end_line, creds.span.start_line + 1);
}

#[test]
fn test_outline_of_fixture_cli_script() {
    let source =
        std::fs::read_to_string(fixture_repo_path().join("src/cli.cr")).expect("read cli.cr");
    let symbols = scan(&source);

    let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["VERSION", "banner", "main"]);

    // top-level local variable survives; the one inside `main` does not
    let banner = &symbols[1];
    assert_eq!(banner.kind, SymbolKind::Variable);
    assert_eq!(banner.parent, None);
}

// ---------------------------------------------------------------------------
// Workspace scan
// ---------------------------------------------------------------------------

#[test]
fn test_workspace_scan_of_fixture() {
    let outlines = scan_default(&fixture_repo_path());

    let paths: Vec<&str> = outlines.iter().map(|o| o.relative_path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["src/cli.cr", "src/models/user.cr", "src/server.cr"]
    );
    assert!(outlines.iter().all(|o| !o.symbols.is_empty()));
}

#[test]
fn test_workspace_scan_respects_shardscanignore() {
    let dir = tempdir().expect("create tempdir");
    write_files(
        dir.path(),
        &[
            ("src/app.cr", "class App\nend\n"),
            ("spec/app_spec.cr", "describe App do\nend\n"),
            (".shardscanignore", "spec/\n"),
        ],
    );

    let outlines = scan_default(dir.path());
    assert_eq!(outlines.len(), 1);
    assert!(outlines[0].relative_path.contains("app.cr"));
}

#[test]
fn test_workspace_scan_skips_oversized_files() {
    let dir = tempdir().expect("create tempdir");
    let big = format!("class Big\nend\n{}", "# pad\n".repeat(400_000));
    write_files(
        dir.path(),
        &[("small.cr", "class Small\nend\n"), ("big.cr", &big)],
    );

    let outlines = scan_workspace(dir.path(), 1_048_576, &[]);
    assert_eq!(outlines.len(), 1);
    assert!(outlines[0].relative_path.contains("small.cr"));
}

// ---------------------------------------------------------------------------
// Config + scan interplay
// ---------------------------------------------------------------------------

#[test]
fn test_project_config_drives_workspace_scan() {
    let dir = tempdir().expect("create tempdir");
    write_files(
        dir.path(),
        &[
            (
                ".shardscan/config.toml",
                "[scan]\nextensions = [\"cr\", \"ecr\"]\n",
            ),
            ("src/app.cr", "class App\nend\n"),
            ("src/view.ecr", "class View\nend\n"),
            ("src/notes.txt", "class NotCode\nend\n"),
        ],
    );

    let config = Config::load(Some(dir.path())).expect("load config");
    assert_eq!(config.scan.extensions, vec!["cr", "ecr"]);

    let outlines = scan_workspace(dir.path(), config.scan.max_file_size, &config.scan.extensions);
    let paths: Vec<&str> = outlines.iter().map(|o| o.relative_path.as_str()).collect();
    assert_eq!(paths, vec!["src/app.cr", "src/view.ecr"]);
}

// ---------------------------------------------------------------------------
// Caching and ids
// ---------------------------------------------------------------------------

#[test]
fn test_cached_scan_is_consistent_with_direct_scan() {
    let source = std::fs::read_to_string(fixture_repo_path().join("src/server.cr"))
        .expect("read server.cr");
    assert_eq!(scan_cached(&source), scan(&source));
    assert_eq!(scan_cached(&source), scan(&source));
}

#[test]
fn test_symbol_ids_are_stable_across_runs() {
    let outlines = scan_default(&fixture_repo_path());
    let server = outlines
        .iter()
        .find(|o| o.relative_path == "src/server.cr")
        .expect("server outline");
    let start = server
        .symbols
        .iter()
        .find(|s| s.name == "start")
        .expect("start symbol");

    let id_a = compute_symbol_id(
        &server.relative_path,
        &start.kind,
        start.span.start_line,
        &start.name,
    );
    let id_b = compute_symbol_id(
        &server.relative_path,
        &start.kind,
        start.span.start_line,
        &start.name,
    );
    assert_eq!(id_a, id_b);
    assert_eq!(id_a.len(), 64);
}
