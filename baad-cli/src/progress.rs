//! Progress rendering for transfer runs.
//!
//! The engine emits interleaved events on an mpsc channel; a dedicated
//! thread turns them into an indicatif multi-progress display with one
//! overall bar plus a short-lived bar per in-flight task. The renderer
//! exits when the engine drops its sender.

use std::collections::HashMap;
use std::sync::mpsc::Receiver;
use std::thread;

use baad::engine::{TaskId, TransferEvent};
use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

fn overall_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix:>10} [{bar:40.cyan/blue}] {pos}/{len}")
        .expect("valid progress template")
        .progress_chars("=> ")
}

fn task_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix:>10} {bytes:>10}/{total_bytes:<10} {wide_msg}")
        .expect("valid progress template")
}

/// Spawn the rendering thread for `total` planned tasks.
pub fn spawn(rx: Receiver<TransferEvent>, total: u64) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let multi = MultiProgress::new();
        let overall = multi.add(ProgressBar::new(total));
        overall.set_style(overall_style());
        overall.set_prefix("overall");

        let mut bars: HashMap<TaskId, ProgressBar> = HashMap::new();

        for event in rx {
            match event {
                TransferEvent::TaskStarted {
                    task,
                    name,
                    size,
                    attempt,
                } => {
                    let bar = multi.insert_before(&overall, ProgressBar::new(size));
                    bar.set_style(task_style());
                    bar.set_prefix(if attempt > 1 {
                        format!("retry {attempt}")
                    } else {
                        "fetch".to_string()
                    });
                    bar.set_message(name);
                    bars.insert(task, bar);
                }
                TransferEvent::TaskProgress { task, bytes } => {
                    if let Some(bar) = bars.get(&task) {
                        bar.set_position(bytes);
                    }
                }
                TransferEvent::TaskRetrying {
                    task,
                    attempt,
                    reason,
                } => {
                    if let Some(bar) = bars.remove(&task) {
                        bar.finish_and_clear();
                    }
                    overall.println(format!(
                        "{} attempt {attempt} failed: {reason}",
                        style("retrying").yellow()
                    ));
                }
                TransferEvent::TaskCompleted { task, .. } => {
                    if let Some(bar) = bars.remove(&task) {
                        bar.finish_and_clear();
                    }
                    overall.inc(1);
                }
                TransferEvent::TaskFailed { task, reason } => {
                    if let Some(bar) = bars.remove(&task) {
                        bar.finish_and_clear();
                    }
                    overall.println(format!("{} {reason}", style("failed").red()));
                    overall.inc(1);
                }
            }
        }

        overall.finish_and_clear();
    })
}
