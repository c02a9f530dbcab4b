use crate::grid::CardFailure;
use crate::update::{FileReport, FileStatus};
use similar::{ChangeTag, TextDiff};
use std::io::Write;
use std::time::Duration;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Human-readable run summary on stderr. Stdout is left to `scan`.
pub struct Output {
    stderr: StandardStream,
}

impl Output {
    pub fn new(color: bool) -> Self {
        let color_choice = if color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self {
            stderr: StandardStream::stderr(color_choice),
        }
    }

    fn set_color(&mut self, color: Color) {
        let _ = self.stderr.set_color(ColorSpec::new().set_fg(Some(color)));
    }

    fn set_bold(&mut self) {
        let _ = self.stderr.set_color(ColorSpec::new().set_bold(true));
    }

    fn set_dim(&mut self) {
        let _ = self.stderr.set_color(ColorSpec::new().set_dimmed(true));
    }

    fn reset(&mut self) {
        let _ = self.stderr.reset();
    }

    pub fn print_report(&mut self, report: &FileReport) {
        let (symbol, color) = match &report.status {
            FileStatus::Updated => ("✓", Color::Green),
            FileStatus::Pending => ("↺", Color::Cyan),
            FileStatus::Unchanged => ("·", Color::White),
            FileStatus::Untouched(_) | FileStatus::Skipped(_) => ("⊘", Color::Yellow),
            FileStatus::Failed(_) => ("✗", Color::Red),
        };
        self.set_color(color);
        let _ = write!(self.stderr, "{}", symbol);
        self.reset();
        let _ = write!(self.stderr, " {}", report.path.display());

        match &report.status {
            FileStatus::Untouched(reason) | FileStatus::Skipped(reason) => {
                self.set_color(Color::Yellow);
                let _ = writeln!(self.stderr, " ({})", reason);
                self.reset();
            }
            FileStatus::Failed(message) => {
                let _ = writeln!(self.stderr);
                let _ = writeln!(self.stderr, "  Error: {}", message);
            }
            _ => {
                let _ = writeln!(self.stderr);
            }
        }

        if let Some((before, after)) = &report.diff {
            let _ = writeln!(self.stderr);
            self.print_diff(before, after);
            let _ = writeln!(self.stderr);
        }
    }

    pub fn print_card_failures(&mut self, failures: &[CardFailure]) {
        if failures.is_empty() {
            return;
        }
        let _ = writeln!(self.stderr);
        self.set_color(Color::Red);
        self.set_bold();
        let _ = writeln!(self.stderr, "Cards left out:");
        self.reset();
        for failure in failures {
            self.set_color(Color::Red);
            let _ = write!(self.stderr, "✗");
            self.reset();
            let _ = writeln!(self.stderr, " {}: {}", failure.title, failure.error);
        }
    }

    pub fn print_summary(&mut self, reports: &[FileReport], elapsed: Duration, check: bool) {
        let count = |f: fn(&FileStatus) -> bool| reports.iter().filter(|r| f(&r.status)).count();
        let updated = count(|s| matches!(s, FileStatus::Updated | FileStatus::Pending));
        let unchanged = count(|s| matches!(s, FileStatus::Unchanged | FileStatus::Untouched(_)));
        let skipped = count(|s| matches!(s, FileStatus::Skipped(_)));
        let failed = count(|s| matches!(s, FileStatus::Failed(_)));

        let _ = writeln!(self.stderr);
        self.set_bold();
        let _ = write!(self.stderr, "Summary:");
        self.reset();
        let verb = if check { "would change" } else { "updated" };
        let _ = write!(
            self.stderr,
            " {} {}, {} unchanged, {} skipped, {} failed",
            updated, verb, unchanged, skipped, failed
        );
        self.set_dim();
        let _ = writeln!(self.stderr, " in {:.2}s", elapsed.as_secs_f64());
        self.reset();
    }

    pub fn print_diff(&mut self, before: &str, after: &str) {
        let diff = TextDiff::from_lines(before, after);

        for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
            if idx > 0 {
                let _ = writeln!(self.stderr, "...");
            }

            for op in group {
                for change in diff.iter_changes(op) {
                    let (sign, color) = match change.tag() {
                        ChangeTag::Delete => ("-", Color::Red),
                        ChangeTag::Insert => ("+", Color::Green),
                        ChangeTag::Equal => (" ", Color::White),
                    };

                    self.set_color(color);
                    let _ = write!(self.stderr, "{}{}", sign, change.value());
                    self.reset();
                    if change.missing_newline() {
                        let _ = writeln!(self.stderr);
                    }
                }
            }
        }
    }
}
