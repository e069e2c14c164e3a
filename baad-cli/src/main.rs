//! baad - Blue Archive asset downloader CLI.

mod commands;
mod error;
mod progress;

use std::path::PathBuf;
use std::process::ExitCode;

use baad::config::Config;
use clap::{Args, Parser, Subcommand};
use console::style;

use commands::common::CategoryFlags;
use commands::{download, extract, search};
use error::CliError;

#[derive(Parser)]
#[command(name = "baad", version = baad::VERSION, about = "Blue Archive asset downloader")]
struct Cli {
    /// Force re-resolving the catalog url even when the version is unchanged
    #[arg(short, long, global = true)]
    update: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Default)]
struct CategoryArgs {
    /// Select the assetbundles
    #[arg(long)]
    assets: bool,

    /// Select the tablebundles
    #[arg(long)]
    tables: bool,

    /// Select the mediaresources
    #[arg(long)]
    media: bool,

    /// Select all game files
    #[arg(short, long)]
    all: bool,
}

impl From<CategoryArgs> for CategoryFlags {
    fn from(args: CategoryArgs) -> Self {
        CategoryFlags {
            assets: args.assets,
            tables: args.tables,
            media: args.media,
            all: args.all,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Download game files
    Download {
        /// Output directory for the downloaded files (default: ./output)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Concurrent download limit; 0 removes the bound (default: 5)
        #[arg(long)]
        limit: Option<usize>,

        /// Force change the catalog url
        #[arg(long)]
        catalog: Option<String>,

        /// Specific client version to download (default: latest)
        #[arg(long)]
        version: Option<String>,

        /// Filter entries by name
        #[arg(long)]
        filter: Option<String>,

        #[command(flatten)]
        categories: CategoryArgs,
    },

    /// Search the catalog interactively and download one file
    Search {
        /// Output directory for the downloaded files (default: ./output)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Force change the catalog url
        #[arg(long)]
        catalog: Option<String>,

        /// Specific client version to search (default: latest)
        #[arg(long)]
        version: Option<String>,
    },

    /// Extract downloaded game files
    Extract {
        /// Path of the files that will be extracted
        #[arg(long)]
        path: Option<PathBuf>,

        /// Use the studio backend for assetbundles
        #[arg(long)]
        studio: bool,

        #[command(flatten)]
        categories: CategoryArgs,
    },
}

fn main() -> ExitCode {
    baad::logging::init("warn");
    let cli = Cli::parse();
    let config = Config::load();

    match run(cli, &config) {
        Ok(failures) if failures > 0 => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", style("error").red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Dispatch to the subcommand; returns the number of fatal per-file
/// failures so `main` can derive the exit code.
fn run(cli: Cli, config: &Config) -> Result<usize, CliError> {
    match cli.command {
        Command::Download {
            output,
            limit,
            catalog,
            version,
            filter,
            categories,
        } => {
            let report = download::run(
                download::DownloadArgs {
                    output,
                    limit,
                    catalog,
                    version,
                    filter,
                    categories: categories.into(),
                    update: cli.update,
                },
                config,
            )?;
            Ok(report.failed)
        }
        Command::Search {
            output,
            catalog,
            version,
        } => {
            let report = search::run(
                search::SearchArgs {
                    output,
                    catalog,
                    version,
                    update: cli.update,
                },
                config,
            )?;
            Ok(report.failed)
        }
        Command::Extract {
            path,
            studio,
            categories,
        } => extract::run(
            extract::ExtractArgs {
                path,
                studio,
                categories: categories.into(),
            },
            config,
        ),
    }
}
