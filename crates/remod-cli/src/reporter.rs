//! Rendering of warnings and failures for the error stream.

use colored::Colorize;
use remod::Warning;

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    /// A `<file>:` header (only when the input has a name) followed by one
    /// `<line>:  warning  <message>  (<transform>)` line per warning. Empty
    /// when there is nothing to report.
    pub fn render_warnings(&self, file: Option<&str>, warnings: &[Warning]) -> String {
        if warnings.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        if let Some(file) = file {
            out.push_str(&self.format_file(file));
            out.push_str(":\n");
        }
        for warning in warnings {
            out.push_str(&self.format_warning(warning));
            out.push('\n');
        }
        out
    }

    /// One line for a file that could not be processed.
    pub fn render_failure(&self, file: Option<&str>, error: &anyhow::Error) -> String {
        let label = if self.color {
            "error".red().bold().to_string()
        } else {
            "error".to_string()
        };
        match file {
            Some(file) => format!("{}: {label}: {error:#}\n", self.format_file(file)),
            None => format!("{label}: {error:#}\n"),
        }
    }

    fn format_file(&self, file: &str) -> String {
        if self.color {
            file.bold().to_string()
        } else {
            file.to_string()
        }
    }

    pub fn format_warning(&self, warning: &Warning) -> String {
        if !self.color {
            return warning.to_string();
        }
        format!(
            "{}:  {}  {}  {}",
            warning.line,
            "warning".yellow(),
            warning.message,
            format!("({})", warning.transform).dimmed()
        )
    }
}
