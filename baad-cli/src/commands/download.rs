//! Download command - batch transfer of catalog entries.

use std::path::PathBuf;
use std::sync::Arc;

use baad::config::Config;
use baad::engine::{channel, CancelToken, EngineConfig, HttpFetcher, TransferEngine};
use baad::local::LocalStateStore;
use baad::plan::TransferPlanner;
use baad::TransferReport;
use console::style;
use tracing::warn;

use super::common::{self, CategoryFlags};
use crate::error::CliError;
use crate::progress;

/// Arguments for the download command.
pub struct DownloadArgs {
    pub output: Option<PathBuf>,
    pub limit: Option<usize>,
    pub catalog: Option<String>,
    pub version: Option<String>,
    pub filter: Option<String>,
    pub categories: CategoryFlags,
    pub update: bool,
}

/// Run the download command, returning the report for exit-code
/// decisions.
pub fn run(args: DownloadArgs, config: &Config) -> Result<TransferReport, CliError> {
    let categories = args.categories.to_set()?;
    let filter = common::build_filter(categories, args.filter.as_deref());
    let output_root = args
        .output
        .unwrap_or_else(|| config.output_root.clone());

    let mut resolver = common::build_resolver(config, args.catalog, args.version);
    let (root, index) = common::fetch_index(&mut resolver, args.update)?;

    let store = LocalStateStore::new(&output_root, config.verify_policy);
    let plan = TransferPlanner::new().plan(&index, &store, &filter);

    if plan.is_empty() {
        println!("{} nothing to download, all files verified", style("ok").green());
        return Ok(TransferReport::default());
    }

    println!(
        "Downloading {} files ({}) to {}",
        plan.len(),
        common::format_size(plan.total_bytes()),
        output_root.display()
    );

    // --limit 0 lifts the bound entirely: one worker per task.
    let concurrency = match args.limit {
        Some(0) => plan.len(),
        Some(n) => n,
        None => config.concurrency,
    };

    let engine = TransferEngine::new(
        Arc::new(HttpFetcher::new()),
        EngineConfig {
            concurrency,
            max_attempts: config.max_attempts,
            verify: config.verify_policy,
            ..EngineConfig::default()
        },
    );

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        warn!(error = %e, "cannot install ctrl-c handler");
    }

    let (events, rx) = channel();
    let renderer = progress::spawn(rx, plan.len() as u64);
    let report = engine.run(plan, &root, events, &cancel);
    let _ = renderer.join();

    print_summary(&report, cancel.is_cancelled());
    Ok(report)
}

fn print_summary(report: &TransferReport, cancelled: bool) {
    if cancelled {
        println!("{} download cancelled", style("!").yellow());
    }
    println!(
        "{} completed, {} failed, {} skipped, {} transferred",
        report.completed,
        report.failed,
        report.skipped,
        common::format_size(report.bytes_transferred)
    );
    for failure in &report.failures {
        eprintln!(
            "{} {} {}: {}",
            style("failed").red(),
            failure.category,
            failure.name,
            failure.reason
        );
    }
}
