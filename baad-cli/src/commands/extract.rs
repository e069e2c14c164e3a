//! Extract command - route downloaded files to decoder backends.

use std::path::PathBuf;

use baad::catalog::Category;
use baad::config::Config;
use baad::extract::BackendChoice;
use console::style;
use tracing::debug;
use walkdir::WalkDir;

use super::common::{self, CategoryFlags};
use crate::error::CliError;

/// Arguments for the extract command.
pub struct ExtractArgs {
    /// Root holding the downloaded category directories.
    pub path: Option<PathBuf>,
    pub studio: bool,
    pub categories: CategoryFlags,
}

/// Run the extract command, returning the number of files that failed
/// to decode.
pub fn run(args: ExtractArgs, config: &Config) -> Result<usize, CliError> {
    let single = args.categories.to_single()?;
    let categories: Vec<Category> = match single {
        Some(category) => vec![category],
        None => Category::ALL.to_vec(),
    };

    if args.studio && single.is_some_and(|c| c != Category::BundleAsset) {
        return Err(CliError::Usage(
            "'--studio' only applies to assetbundle extraction".to_string(),
        ));
    }

    let root = args.path.unwrap_or_else(|| config.output_root.clone());
    if !root.is_dir() {
        return Err(CliError::Usage(format!(
            "'{}' is not a directory; download files first or pass --path",
            root.display()
        )));
    }

    let dispatcher = common::build_dispatcher(config);
    let mut extracted = 0usize;
    let mut failed = 0usize;

    for category in categories {
        let category_dir = root.join(category.dir_name());
        if !category_dir.is_dir() {
            debug!(dir = %category_dir.display(), "no files for category, skipping");
            continue;
        }

        let choice = if args.studio && category == Category::BundleAsset {
            BackendChoice::Studio
        } else {
            BackendChoice::Primary
        };

        for entry in WalkDir::new(&category_dir)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            match dispatcher.extract(category, entry.path(), choice) {
                Ok(outcome) => {
                    extracted += 1;
                    debug!(
                        source = %entry.path().display(),
                        out = %outcome.out_dir.display(),
                        "extracted"
                    );
                }
                Err(e) => {
                    failed += 1;
                    eprintln!("{} {}", style("failed").red(), e);
                }
            }
        }
    }

    println!(
        "{} {extracted} extracted, {failed} failed",
        style("done").green()
    );
    Ok(failed)
}
