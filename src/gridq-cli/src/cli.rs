//! Command-line interface for gridq
//!
//! This module provides the command-line argument parsing and CLI
//! structure for gridq. It uses clap to define the interface; the actual
//! command handling lives in `main.rs`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gridq - grid filter grammar and URL state tooling
///
/// gridq parses, formats, and inspects the compact filter grammar that
/// data grids carry in their URLs, and extracts full grid state (sorting,
/// filters, column selection, pagination) from query strings.
#[derive(Parser, Debug)]
#[command(name = "gridq")]
#[command(author, version, about)]
#[command(after_help = "EXAMPLES:\n  \
    # Validate a filter expression\n  \
    gridq check 'and([age].[gt].[18],[name].[contains].[bob])'\n\n  \
    # Canonicalize an expression (drops empty groups)\n  \
    gridq fmt 'or([status].[in].[(open,closed)]),and()'\n\n  \
    # Show the parsed tree as JSON, with column typing\n  \
    gridq ast '[created].[gte].[2024-01-01]' --columns columns.json --pretty\n\n  \
    # Extract grid state from a query string\n  \
    gridq url 'order=(age.desc)&filters=[age].[gte].[21]&select=*' --pretty\n\n\
For more information, visit: https://github.com/durableprogramming/gridq")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Column definitions file (JSON array of column metadata)
    #[arg(long, value_name = "FILE", global = true)]
    pub columns: Option<PathBuf>,

    /// Match field names case-insensitively
    #[arg(long, global = true)]
    pub ignore_case: bool,

    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a filter expression
    #[command(after_help = "EXAMPLES:\n  \
        gridq check '[age].[gt].[18]'\n  \
        gridq check 'and([a].[is_empty],[b].[eq].[x])' --columns columns.json")]
    Check {
        /// The filter expression
        expr: String,
    },

    /// Parse and re-serialize a filter expression in canonical form
    #[command(after_help = "EXAMPLES:\n  \
        gridq fmt 'and( [age].[gt].[18] )'\n  \
        gridq fmt 'or([x].[eq].[1]),and()'")]
    Fmt {
        /// The filter expression
        expr: String,
    },

    /// Print the parsed filter tree as JSON
    Ast {
        /// The filter expression
        expr: String,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Extract grid state from a query string
    Url {
        /// The query string (a leading '?' is tolerated)
        query: String,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Parse command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Parse command-line arguments from a vector (for testing)
#[allow(dead_code)]
pub fn parse_args_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
