//! User-facing diagnostic messages.
//!
//! Fatal errors and skipped workflows are both reported through [`Diagnostic`],
//! so the terminal output names the offending file and what to do about it.

use std::fmt;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Common suggestion messages.
pub mod suggestions {
    /// Suggestion when the target directory has no project.json.
    pub const NO_PROJECT: &str =
        "Pass the directory containing project.json as the first argument";

    /// Suggestion when a workflow file could not be analyzed.
    pub const BROKEN_WORKFLOW: &str = "Open and re-save the workflow in Studio to repair it";

    /// Suggestion when skipped workflows should stop the run instead.
    pub const FAIL_FAST: &str =
        "Set `fail_fast = true` under [analysis] to abort on the first broken workflow";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Downgrade to a warning, e.g. for a workflow that was skipped.
    pub fn as_warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = if color {
            match self.severity {
                Severity::Error => "\x1b[1;31merror\x1b[0m".to_string(),
                Severity::Warning => "\x1b[1;33mwarning\x1b[0m".to_string(),
                }
        } else {
            self.severity.to_string()
        };

        let _ = writeln!(output, "{}: {}", severity_str, self.message);

        if let Some(ref path) = self.location {
            let _ = writeln!(output, "  --> {}", path.display());
        }

        for ctx in &self.context {
            let _ = writeln!(output, "  = {}", ctx);
        }

        if !self.suggestions.is_empty() {
            let help_prefix = if color { "\x1b[1;32mhelp\x1b[0m" } else { "help" };
            for suggestion in &self.suggestions {
                let _ = writeln!(output, "  {}: {}", help_prefix, suggestion);
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
