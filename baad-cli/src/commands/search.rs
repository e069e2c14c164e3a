//! Search command - interactive lookup and single-item transfer.

use std::path::PathBuf;
use std::sync::Arc;

use baad::catalog::CatalogEntry;
use baad::config::Config;
use baad::engine::{channel, CancelToken, EngineConfig, HttpFetcher, TransferEngine};
use baad::local::{FileStatus, LocalStateStore};
use baad::plan::{TransferPlan, TransferTask};
use baad::TransferReport;
use console::style;
use dialoguer::{theme::ColorfulTheme, FuzzySelect};

use super::common;
use crate::error::CliError;
use crate::progress;

/// Arguments for the search command.
pub struct SearchArgs {
    pub output: Option<PathBuf>,
    pub catalog: Option<String>,
    pub version: Option<String>,
    pub update: bool,
}

pub fn run(args: SearchArgs, config: &Config) -> Result<TransferReport, CliError> {
    let mut resolver = common::build_resolver(config, args.catalog, args.version);
    let (root, index) = common::fetch_index(&mut resolver, args.update)?;

    if index.is_empty() {
        println!("catalog is empty, nothing to search");
        return Ok(TransferReport::default());
    }

    let labels: Vec<String> = index.entries().iter().map(entry_label).collect();
    let picked = FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt("search game files")
        .items(&labels)
        .default(0)
        .interact()?;
    let entry = &index.entries()[picked];

    let output_root = args
        .output
        .unwrap_or_else(|| config.output_root.clone());
    let store = LocalStateStore::new(&output_root, config.verify_policy);

    if store.status(entry) == FileStatus::Verified {
        println!(
            "{} {} already present and verified",
            style("ok").green(),
            entry.name
        );
        return Ok(TransferReport::default());
    }

    let plan = TransferPlan::single(TransferTask {
        dest: store.dest_path(entry),
        entry: entry.clone(),
    });

    let engine = TransferEngine::new(
        Arc::new(HttpFetcher::new()),
        EngineConfig {
            concurrency: 1,
            max_attempts: config.max_attempts,
            verify: config.verify_policy,
            ..EngineConfig::default()
        },
    );

    let (events, rx) = channel();
    let renderer = progress::spawn(rx, 1);
    let report = engine.run(plan, &root, events, &CancelToken::new());
    let _ = renderer.join();

    if report.has_failures() {
        eprintln!("{} could not download {}", style("failed").red(), entry.name);
    } else {
        println!(
            "{} downloaded {} to {}",
            style("ok").green(),
            entry.name,
            store.dest_path(entry).display()
        );
    }
    Ok(report)
}

fn entry_label(entry: &CatalogEntry) -> String {
    let category = entry.category.to_string();
    let size = common::format_size(entry.size);
    if size.is_empty() {
        format!("{category:<15} {}", entry.name)
    } else {
        format!("{category:<15} {} ({size})", entry.name)
    }
}
