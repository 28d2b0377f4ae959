use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use indicatif::{ProgressBar, ProgressStyle};
use crate::utils::errors::{DemandError, DemandResult};

const PROGRESS_TEMPLATE: &str = "{msg} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({eta})";

/// Coarse progress and cancellation hook for a run. Clones share the same
/// flag and bar, so a handle can be given to another thread.
#[derive(Clone)]
pub struct RunControl {
    cancelled: Arc<AtomicBool>,
    progress: ProgressBar,
}

impl RunControl {
    pub fn new(show_progress: bool) -> Self {
        let progress = if show_progress {
            let bar = ProgressBar::new(0);
            if let Ok(style) = ProgressStyle::with_template(PROGRESS_TEMPLATE) {
                bar.set_style(style.progress_chars("=> "));
            }
            bar
        } else {
            ProgressBar::hidden()
        };

        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            progress,
        }
    }

    pub fn silent() -> Self {
        Self::new(false)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Shared flag, for wiring into signal handlers or watchdogs.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> DemandResult<()> {
        if self.is_cancelled() {
            Err(DemandError::Cancelled)
        } else {
            Ok(())
        }
    }

    pub fn start(&self, total: u64, label: &str) {
        self.progress.set_length(total);
        self.progress.set_position(0);
        self.progress.set_message(label.to_string());
    }

    pub fn tick(&self) {
        self.progress.inc(1);
    }

    pub fn finish(&self, message: &str) {
        self.progress.finish_with_message(message.to_string());
    }

    pub fn abandon(&self) {
        self.progress.abandon();
    }
}

impl Default for RunControl {
    fn default() -> Self {
        Self::silent()
    }
}
