//! Event handling and user feedback

use addonhub_events::{AppEvent, DownloadEvent, TeamEvent};
use console::Style;

use crate::logging::log_event_with_tracing;

/// Renders operation events as status lines on stderr
///
/// Standard output is reserved for results and, with `--target -`, for the
/// addon bytes themselves.
pub struct EventHandler {
    colors: bool,
    debug: bool,
    quiet: bool,
}

impl EventHandler {
    /// Create new event handler; `quiet` keeps only rollback notices
    pub fn new(colors: bool, debug: bool, quiet: bool) -> Self {
        Self {
            colors,
            debug,
            quiet,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: AppEvent) {
        log_event_with_tracing(&event);

        if let Some(line) = self.render(&event) {
            eprintln!("{line}");
        }
    }

    /// Status line for an event, if it has one at the current verbosity
    fn render(&self, event: &AppEvent) -> Option<String> {
        match event {
            AppEvent::Download(DownloadEvent::RolledBack { path, reason }) => Some(self.style(
                &Style::new().yellow(),
                &format!("Removed {}: {reason}", path.display()),
            )),
            _ if self.quiet => None,

            AppEvent::Download(DownloadEvent::Completed {
                bytes_written,
                path: Some(path),
                ..
            }) => Some(format!("Wrote {bytes_written} bytes to {}", path.display())),

            AppEvent::Team(TeamEvent::Resolved { team, source }) if self.debug => {
                Some(self.style(&Style::new().dim(), &format!("Using team {team} ({source})")))
            }
            AppEvent::Download(DownloadEvent::Started { url, .. }) if self.debug => {
                Some(self.style(&Style::new().dim(), &format!("Downloading {url}")))
            }
            _ => None,
        }
    }

    fn style(&self, style: &Style, text: &str) -> String {
        if self.colors {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }
}
