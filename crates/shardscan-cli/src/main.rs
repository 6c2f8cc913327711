mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "shardscan",
    version,
    about = "Heuristic symbol outlines for Crystal source code",
    long_about = "Shardscan scans Crystal source files line by line and produces a symbol\n\
        outline: modules, classes, structs, enums, methods, properties, constants\n\
        and top-level variables, with nesting derived from block structure.\n\n\
        Quick start:\n  \
        shardscan outline src/server.cr\n  \
        shardscan symbols --name handler\n  \
        shardscan symbols --kind class --format json"
)]
struct Cli {
    /// Enable verbose logging (set log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (default: .shardscan/config.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the symbol outline of one source file
    ///
    /// Scans the file in a single pass and prints the outline as an indented
    /// tree, or as JSON records with stable symbol ids.
    ///
    /// Examples:
    ///   shardscan outline src/server.cr
    ///   shardscan outline src/server.cr --format json
    Outline {
        /// Source file to outline
        file: String,

        /// Output format: "text" (default from config) or "json"
        #[arg(long)]
        format: Option<String>,
    },
    /// List symbols across a whole project tree
    ///
    /// Walks the directory (respecting .gitignore and .shardscanignore),
    /// outlines every source file in parallel, and prints matching symbols.
    ///
    /// Examples:
    ///   shardscan symbols
    ///   shardscan symbols --path ./app --name connect
    ///   shardscan symbols --kind class --limit 20
    Symbols {
        /// Path to the project root (default: current directory)
        #[arg(short, long)]
        path: Option<String>,

        /// Only symbols whose name contains this string (case-insensitive)
        #[arg(long)]
        name: Option<String>,

        /// Filter by symbol kind (module, class, struct, enum, def, property, constant, variable)
        #[arg(long)]
        kind: Option<String>,

        /// Maximum number of results to return (default from config)
        #[arg(long)]
        limit: Option<usize>,

        /// Output format: "text" (default from config) or "json"
        #[arg(long)]
        format: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config_file = cli.config.as_deref().map(std::path::Path::new);

    match cli.command {
        Commands::Outline { file, format } => {
            commands::outline::run(std::path::Path::new(&file), format.as_deref(), config_file)?;
        }
        Commands::Symbols {
            path,
            name,
            kind,
            limit,
            format,
        } => {
            let path = resolve_path(path)?;
            commands::symbols::run(
                &path,
                name.as_deref(),
                kind.as_deref(),
                limit,
                format.as_deref(),
                config_file,
            )?;
        }
    }

    Ok(())
}

fn resolve_path(path: Option<String>) -> anyhow::Result<std::path::PathBuf> {
    match path {
        Some(p) => Ok(std::path::PathBuf::from(p)),
        None => Ok(std::env::current_dir()?),
    }
}
