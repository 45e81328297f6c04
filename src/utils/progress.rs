use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Step counter for the conversion stages (`[1/4] Surface CD144...`).
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    total: u64,
}

impl ProgressReporter {
    pub fn new(total: u64, message: &str, silent: bool) -> Self {
        if silent {
            return Self {
                progress_bar: None,
                total,
            };
        }

        let pb = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            progress_bar: Some(pb),
            total,
        }
    }

    /// Announce stage `step` (1-based)
    pub fn start_stage(&self, step: u64, name: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_position(step.saturating_sub(1));
            pb.set_message(format!("[{}/{}] {}", step, self.total, name));
        }
    }

    pub fn finish_stage(&self, summary: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(1);
            pb.println(format!("[OK] {}", summary));
        }
    }

    pub fn finish_with_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_with_message(message.to_string());
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(ref pb) = self.progress_bar {
            if !pb.is_finished() {
                pb.abandon();
            }
        }
    }
}
