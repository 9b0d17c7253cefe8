//! Output rendering and formatting

use addonhub_ops::{AddonDownloadReport, OperationResult, TeamSwitchReport};
use console::Style;
use std::io::{self, Write};

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Write results to stderr because stdout carries addon bytes
    to_stderr: bool,
    colors: bool,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, to_stderr: bool, colors: bool) -> Self {
        Self {
            json_output,
            to_stderr,
            colors,
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        let text = if self.json_output {
            result.to_json().map_err(io::Error::other)?
        } else {
            self.render_text(result)
        };

        if self.to_stderr {
            writeln!(io::stderr().lock(), "{text}")
        } else {
            writeln!(io::stdout().lock(), "{text}")
        }
    }

    fn render_text(&self, result: &OperationResult) -> String {
        match result {
            OperationResult::AddonDownload(report) => self.render_download(report),
            OperationResult::TeamSwitched(report) => self.render_switch(report),
        }
    }

    fn render_download(&self, report: &AddonDownloadReport) -> String {
        format!(
            "{}\n  team:   {}\n  sha256: {}",
            self.success(&format!("Verified {}", report.reference)),
            report.team,
            report.digest
        )
    }

    fn render_switch(&self, report: &TeamSwitchReport) -> String {
        match &report.previous {
            Some(previous) if previous != &report.team => self.success(&format!(
                "Switched to team {} (was {previous})",
                report.team
            )),
            _ => self.success(&format!("Switched to team {}", report.team)),
        }
    }

    fn success(&self, message: &str) -> String {
        if self.colors {
            Style::new().green().apply_to(message).to_string()
        } else {
            message.to_string()
        }
    }
}
