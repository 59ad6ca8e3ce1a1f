//! Progress reporting. The engine emits done/total in completion order; the
//! console layer consumes via a sink so rendering stays out of the engine.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// One progress update: how many trials are done and the total count.
#[derive(Debug, Clone, Copy)]
pub struct ProgressEvent {
    pub done: usize,
    pub total: usize,
}

/// Sink for progress events, called each time a trial completes.
/// Implementations may throttle.
pub type ProgressSink = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Minimum interval between progress lines to avoid log spam.
const PROGRESS_MIN_INTERVAL_MS: u64 = 200;

/// For large runs, emit at most every this many trials.
pub(crate) fn progress_step(total: usize) -> usize {
    if total <= 10 {
        1
    } else {
        std::cmp::max(1, total / 10)
    }
}

pub fn format_progress_line(done: usize, total: usize) -> String {
    format!("trial {}/{} done...", done, total)
}

/// A sink that throttles updates and prints to stderr. Returns `None` when a
/// single trial makes progress lines pointless. Always emits the final event.
pub fn default_progress_sink(total: usize) -> Option<ProgressSink> {
    if total <= 1 {
        return None;
    }
    let step = progress_step(total);
    let last_emit: Arc<Mutex<Option<Instant>>> = Arc::new(Mutex::new(None));
    Some(Arc::new(move |ev: ProgressEvent| {
        if ev.total == 0 {
            return;
        }
        let now = Instant::now();
        let should_emit = {
            let mut g = last_emit.lock().expect("progress throttle lock");
            let emit_final = ev.done == ev.total;
            let emit_step = ev.done % step == 0 || ev.done == 1;
            let interval_ok = g
                .map(|t| {
                    now.saturating_duration_since(t)
                        >= Duration::from_millis(PROGRESS_MIN_INTERVAL_MS)
                })
                .unwrap_or(true);
            let ok = emit_final || (emit_step && interval_ok);
            if ok {
                *g = Some(now);
            }
            ok
        };
        if should_emit {
            eprintln!("{}", format_progress_line(ev.done, ev.total));
        }
    }))
}
