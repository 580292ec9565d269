//! Colored terminal output for change log runs.

use console::{Style, Term};
use fx_changelog::RunReport;

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
}

impl Output {
    /// Create a new output formatter writing to stderr.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
        }
    }

    /// Announce that the log page body was emptied.
    pub(crate) fn cleared(&self, page_id: &str) {
        self.line(&cleared_line(page_id));
    }

    /// Print skipped pages, the summary and the elapsed time.
    pub(crate) fn report(&self, report: &RunReport) {
        for skipped in &report.skipped {
            self.styled(
                &self.yellow,
                &format!(
                    "Skipped page \"{}\" ({}): {}",
                    skipped.page.title, skipped.page.id, skipped.error
                ),
            );
        }
        let style = if report.skipped.is_empty() {
            &self.green
        } else {
            &self.yellow
        };
        self.styled(style, &summary_line(report));
        self.line(&elapsed_line(report));
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        self.styled(&self.red, msg);
    }

    fn line(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    fn styled(&self, style: &Style, msg: &str) {
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }
}

fn cleared_line(page_id: &str) -> String {
    format!("Content of page ID {page_id} has been cleared.")
}

fn summary_line(report: &RunReport) -> String {
    let mut line = format!(
        "Logged {} versions of {} pages",
        report.rows_written, report.logged
    );
    if !report.skipped.is_empty() {
        line.push_str(&format!(", {} skipped", report.skipped.len()));
    }
    line.push('.');
    line
}

fn elapsed_line(report: &RunReport) -> String {
    format!("done in {:.5} seconds", report.elapsed.as_secs_f64())
}
