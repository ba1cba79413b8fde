//! Output buffer with line-indentation awareness.

use remod_common::comments::line_indent;

#[derive(Debug)]
pub struct SourceWriter {
    output: String,
    newline: &'static str,
}

impl Default for SourceWriter {
    fn default() -> Self {
        SourceWriter {
            output: String::new(),
            newline: "\n",
        }
    }
}

impl SourceWriter {
    pub fn new() -> Self {
        SourceWriter::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        SourceWriter {
            output: String::with_capacity(capacity),
            ..SourceWriter::default()
        }
    }

    /// Line terminator for the lines this writer starts itself.
    pub fn set_newline(&mut self, newline: &'static str) {
        self.newline = newline;
    }

    pub fn newline(&self) -> &'static str {
        self.newline
    }

    pub fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    pub fn write_char(&mut self, ch: char) {
        self.output.push(ch);
    }

    pub fn write_newline(&mut self) {
        self.output.push_str(self.newline);
    }

    /// Newline followed by `indent`.
    pub fn write_line(&mut self, indent: &str) {
        self.output.push_str(self.newline);
        self.output.push_str(indent);
    }

    /// Indentation of the line currently being written.
    pub fn current_line_indent(&self) -> &str {
        let line_start = memchr::memrchr(b'\n', self.output.as_bytes()).map_or(0, |i| i + 1);
        line_indent(&self.output[line_start..])
    }

    /// Write text copied from the source, shifting its continuation lines
    /// by the difference between `base_indent` (the indentation of the
    /// source line it started on) and the indentation of the current
    /// output line.
    pub fn write_copied(&mut self, text: &str, base_indent: &str) {
        if memchr::memchr(b'\n', text.as_bytes()).is_none() {
            self.write(text);
            return;
        }
        let target = self.current_line_indent().to_string();
        if target == base_indent {
            self.write(text);
            return;
        }
        let shift = IndentShift::between(base_indent, &target);
        let mut lines = text.split('\n').peekable();
        if let Some(first) = lines.next() {
            self.write(first);
        }
        while let Some(line) = lines.next() {
            self.output.push('\n');
            let is_last = lines.peek().is_none();
            // Blank lines stay empty; a trailing run of blanks is the
            // indentation of whatever follows, so it shifts too.
            if line.trim().is_empty() && !is_last {
                self.output.push_str(line);
                continue;
            }
            shift.apply(line, &mut self.output);
        }
    }

    pub fn as_str(&self) -> &str {
        &self.output
    }

    pub fn into_string(self) -> String {
        self.output
    }
}

/// How copied lines move from their source indentation to the output's.
enum IndentShift<'a> {
    /// Output is deeper: prefix every line.
    Indent(&'a str),
    /// Output is shallower: drop this prefix where present.
    Dedent(&'a str),
    /// Unrelated indentation (tabs against spaces): swap the base prefix.
    Replace { base: &'a str, target: &'a str },
}

impl<'a> IndentShift<'a> {
    fn between(base: &'a str, target: &'a str) -> Self {
        if let Some(extra) = target.strip_suffix(base) {
            IndentShift::Indent(extra)
        } else if let Some(extra) = base.strip_suffix(target) {
            IndentShift::Dedent(extra)
        } else {
            IndentShift::Replace { base, target }
        }
    }

    fn apply(&self, line: &str, out: &mut String) {
        match self {
            IndentShift::Indent(extra) => {
                out.push_str(extra);
                out.push_str(line);
            }
            IndentShift::Dedent(extra) => out.push_str(line.strip_prefix(extra).unwrap_or(line)),
            IndentShift::Replace { base, target } => match line.strip_prefix(base) {
                Some(rest) => {
                    out.push_str(target);
                    out.push_str(rest);
                }
                None => out.push_str(line),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_line_indent_reads_last_line() {
        let mut writer = SourceWriter::new();
        writer.write("a {\n    b");
        assert_eq!(writer.current_line_indent(), "    ");
    }

    #[test]
    fn byte_order_mark_is_not_line_indent() {
        let mut writer = SourceWriter::new();
        writer.write("\u{FEFF}class C {");
        assert_eq!(writer.current_line_indent(), "");
    }

    #[test]
    fn write_line_uses_configured_newline() {
        let mut writer = SourceWriter::new();
        writer.set_newline("\r\n");
        writer.write("a {");
        writer.write_line("  ");
        writer.write("b;");
        writer.write_newline();
        assert_eq!(writer.as_str(), "a {\r\n  b;\r\n");
        assert_eq!(writer.current_line_indent(), "");
    }

    #[test]
    fn copied_text_is_reindented_to_output_line() {
        let mut writer = SourceWriter::new();
        writer.write("  bar() ");
        writer.write_copied("{\n  return 1;\n}", "");
        assert_eq!(writer.as_str(), "  bar() {\n    return 1;\n  }");
    }

    #[test]
    fn copied_gap_shifts_closing_brace() {
        let mut writer = SourceWriter::new();
        writer.write("  m() {\n    a();");
        writer.write_copied("\n}", "  ");
        assert_eq!(writer.as_str(), "  m() {\n    a();\n  }");
    }

    #[test]
    fn copied_text_keeps_blank_lines_and_shallower_lines() {
        let mut writer = SourceWriter::new();
        writer.write("x = ");
        writer.write_copied("f(\n\n      a,\n  b)", "    ");
        assert_eq!(writer.as_str(), "x = f(\n\n  a,\n  b)");
    }
}
