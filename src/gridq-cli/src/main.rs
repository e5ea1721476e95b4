mod cli;

use std::fs;
use std::io;
use std::path::Path;
use std::process;

use clap::CommandFactory;
use clap_complete::generate;

use gridq_grammar::{serialize_rows, FilterParser};
use gridq_shared::{ColumnCatalog, ColumnMeta, Result};

use crate::cli::{parse_args, Cli, Commands};

fn main() {
    // Enhanced version info with build metadata
    if std::env::args().any(|arg| arg == "--version" || arg == "-V") {
        print_version();
        return;
    }

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn print_version() {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = option_env!("GIT_HASH").unwrap_or("unknown");
    let build_date = option_env!("BUILD_DATE").unwrap_or("unknown");
    let rustc_version = option_env!("RUSTC_VERSION").unwrap_or("unknown");

    println!("gridq {}", version);
    println!("Commit: {}", git_hash);
    println!("Built: {}", build_date);
    println!("Rustc: {}", rustc_version);
}

fn run() -> Result<()> {
    let args = parse_args();
    setup_logging(args.verbose);

    let catalog = load_catalog(args.columns.as_deref(), args.ignore_case)?;

    match args.command {
        Commands::Check { expr } => {
            let rows = FilterParser::new(&catalog).parse(&expr)?;
            println!("ok: {} row(s)", rows.len());
            Ok(())
        }
        Commands::Fmt { expr } => {
            let rows = FilterParser::new(&catalog).parse(&expr)?;
            println!("{}", serialize_rows(&rows));
            Ok(())
        }
        Commands::Ast { expr, pretty } => {
            let rows = FilterParser::new(&catalog).parse(&expr)?;
            print_json(&rows, pretty)
        }
        Commands::Url { query, pretty } => {
            let data = gridq_url::extract(&query, &catalog)?;
            print_json(&data, pretty)
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

fn setup_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new().filter_level(log_level).init();
}

/// Load a column catalog from a JSON file of column metadata.
///
/// Without a file the catalog is empty: field tokens pass through
/// unresolved and values stay text.
fn load_catalog(path: Option<&Path>, ignore_case: bool) -> Result<ColumnCatalog> {
    let Some(path) = path else {
        return Ok(ColumnCatalog::new(ignore_case));
    };

    let content = fs::read_to_string(path).map_err(|e| {
        anyhow::anyhow!(format!(
            "Failed to read columns file {}: {}",
            path.display(),
            e
        ))
    })?;
    let metas: Vec<ColumnMeta> = serde_json::from_str(&content).map_err(|e| {
        anyhow::anyhow!(format!(
            "Invalid columns file {}: {}",
            path.display(),
            e
        ))
    })?;

    log::info!("loaded {} column(s) from {}", metas.len(), path.display());
    Ok(ColumnCatalog::from_metas(metas, ignore_case))
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_load_catalog_without_file() {
        let catalog = load_catalog(None, true).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.case_insensitive());
    }

    #[test]
    fn test_load_catalog_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"field":"age","dataType":"number"}},{{"field":"owner","filterField":"ownerId"}}]"#
        )
        .unwrap();

        let catalog = load_catalog(Some(file.path()), false).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.by_filter_field("ownerId").is_some());
    }

    #[test]
    fn test_load_catalog_missing_file() {
        let result = load_catalog(Some(Path::new("/nonexistent/columns.json")), false);
        assert!(result.is_err());
    }
}
