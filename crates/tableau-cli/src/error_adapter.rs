//! Error adapter for converting TableauError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use tableau::TableauError;

/// Wraps a [`TableauError`] with a stable code and, where the fix is known,
/// a hint.
pub struct ErrorAdapter<'a>(pub &'a TableauError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            TableauError::Io(_) => "tableau::io",
            TableauError::Configuration(_) => "tableau::configuration",
            TableauError::Asset { .. } => "tableau::asset",
            TableauError::Timeline(_) => "tableau::timeline",
            TableauError::Export(_) => "tableau::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            TableauError::Configuration(_) => {
                "check the configuration file and the command-line overrides; `tableau --list` shows the scenes"
            }
            TableauError::Asset { .. } => {
                "fix the SVG file, or set `assets.strict = false` to draw the built-in shape instead"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_per_variant() {
        let err = TableauError::Timeline("no figure `x`".to_string());
        let adapter = ErrorAdapter(&err);
        assert_eq!(adapter.code().unwrap().to_string(), "tableau::timeline");
        assert!(adapter.help().is_none());
        assert_eq!(adapter.to_string(), "Timeline error: no figure `x`");
    }

    #[test]
    fn test_asset_error_has_help() {
        let err = TableauError::Asset {
            name: "rbc".to_string(),
            reason: "not svg".to_string(),
        };
        let adapter = ErrorAdapter(&err);
        assert_eq!(adapter.code().unwrap().to_string(), "tableau::asset");
        assert!(adapter.help().unwrap().to_string().contains("assets.strict"));
    }
}
