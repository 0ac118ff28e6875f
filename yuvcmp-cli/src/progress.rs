// ============================================================================
// yuvcmp-cli/src/progress.rs
// ============================================================================
//
// PROGRESS REPORTING: indicatif progress bars driven by core events
//
// One bar is shown per stage (compare, best-match search, hashing of each
// stream) and cleared when the stage completes, so the bar never mixes with
// the report on stdout. Bars are drawn on stderr only when it is a terminal.

// ---- External crate imports ----
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use yuvcmp_core::events::{Event, EventHandler};

// ---- Standard library imports ----
use std::sync::Mutex;
use std::time::Duration;

/// Event handler that renders stage progress as a terminal progress bar.
pub struct ProgressBarHandler {
    bar: Mutex<Option<ProgressBar>>,
    draw_target: fn() -> ProgressDrawTarget,
}

impl ProgressBarHandler {
    /// Creates a handler drawing to stderr.
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
            draw_target: ProgressDrawTarget::stderr,
        }
    }

    /// Creates a handler whose bars are never drawn.
    pub fn hidden() -> Self {
        Self {
            bar: Mutex::new(None),
            draw_target: ProgressDrawTarget::hidden,
        }
    }

    /// Whether progress bars should be shown at all.
    pub fn should_display() -> bool {
        console::Term::stderr().is_term()
    }

    fn create_bar(&self, total: u64, message: &str) -> ProgressBar {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ ");

        let pb = ProgressBar::with_draw_target(Some(total), (self.draw_target)());
        pb.set_style(style);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    #[cfg(test)]
    fn position(&self) -> Option<u64> {
        self.bar
            .lock()
            .ok()
            .and_then(|bar| bar.as_ref().map(ProgressBar::position))
    }
}

impl Default for ProgressBarHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for ProgressBarHandler {
    fn handle(&self, event: &Event) {
        let Ok(mut slot) = self.bar.lock() else {
            return;
        };

        match event {
            Event::StageStarted { total, message, .. } => {
                if let Some(previous) = slot.take() {
                    previous.finish_and_clear();
                }
                *slot = Some(self.create_bar(*total, message));
            }
            Event::StageProgress { current, .. } => {
                if let Some(bar) = slot.as_ref() {
                    bar.set_position(*current);
                }
            }
            Event::StageComplete { .. } => {
                if let Some(bar) = slot.take() {
                    bar.finish_and_clear();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yuvcmp_core::events::Stage;

    #[test]
    fn test_bar_follows_stage_events() {
        let handler = ProgressBarHandler::hidden();
        assert_eq!(handler.position(), None);

        handler.handle(&Event::StageStarted {
            stage: Stage::Hashing,
            total: 10,
            message: "Hashing a.yuv".to_string(),
        });
        assert_eq!(handler.position(), Some(0));

        handler.handle(&Event::StageProgress {
            stage: Stage::Hashing,
            current: 4,
            total: 10,
        });
        assert_eq!(handler.position(), Some(4));

        handler.handle(&Event::StageComplete {
            stage: Stage::Hashing,
        });
        assert_eq!(handler.position(), None);
    }
}
