//! Warning records.
//!
//! A warning means a transform declined to rewrite a site. It is never an
//! error: the site is left exactly as it was in the source.

use serde::Serialize;
use std::fmt;

/// One skipped rewrite, reported against a source line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// Identifier of the transform that declined the rewrite (e.g. `let`).
    pub transform: &'static str,
    /// Byte offset of the site.
    pub pos: u32,
    /// 1-based line of the site.
    pub line: u32,
    pub message: String,
}

impl Warning {
    #[must_use]
    pub fn new(transform: &'static str, pos: u32, line: u32, message: impl Into<String>) -> Self {
        Warning {
            transform,
            pos,
            line,
            message: message.into(),
        }
    }
}

/// Renders as `<line>:  warning  <message>  (<transform>)`.
impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:  warning  {}  ({})",
            self.line, self.message, self.transform
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let warning = Warning::new("let", 12, 1, "Unable to transform var");
        assert_eq!(
            warning.to_string(),
            "1:  warning  Unable to transform var  (let)"
        );
    }

    #[test]
    fn test_warning_serializes_fields() {
        let warning = Warning::new("arrow", 3, 2, "Can not use arguments in arrow function");
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["transform"], "arrow");
        assert_eq!(json["line"], 2);
    }
}
