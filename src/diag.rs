//! Diagnostic output for the parser and CLI.
//!
//! All diagnostics go to stderr; stdout is reserved for the rendered
//! document. Colour is enabled when stderr is a terminal and neither
//! `--no-color` nor `NO_COLOR` is set.

use crate::model::SourceLocation;
use std::fmt;
use std::io::{self, IsTerminal, Write};

/// ANSI escape codes.
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Diagnostic verbosity tiers. Each tier includes the ones above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Error,
    Info,
    Debug,
}

impl Verbosity {
    /// Resolve the tier from `-v` flag occurrences, falling back to the
    /// `BASHDOC_LOG` environment variable when no flag was given.
    pub fn resolve(verbose_flags: u8) -> Self {
        match verbose_flags {
            0 => match std::env::var("BASHDOC_LOG").as_deref() {
                Ok("debug") => Verbosity::Debug,
                Ok("info") => Verbosity::Info,
                _ => Verbosity::Error,
            },
            1 => Verbosity::Info,
            _ => Verbosity::Debug,
        }
    }
}

/// Severity of a parse diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Blocks final output; collected and reported together at end of run.
    Fatal,
    /// Logged immediately; never affects control flow or output.
    Advisory,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "error"),
            Severity::Advisory => write!(f, "warning"),
        }
    }
}

/// A single parse diagnostic with its source context.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: SourceLocation,
}

impl Diagnostic {
    pub fn fatal(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            severity: Severity::Fatal,
            message: message.into(),
            location,
        }
    }

    pub fn advisory(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            severity: Severity::Advisory,
            message: message.into(),
            location,
        }
    }
}

/// Terminal-aware stderr reporter.
pub struct Reporter {
    verbosity: Verbosity,
    color: bool,
}

impl Reporter {
    pub fn new(verbosity: Verbosity, no_color: bool) -> Self {
        let color =
            !no_color && std::env::var_os("NO_COLOR").is_none() && io::stderr().is_terminal();
        Self { verbosity, color }
    }

    /// Print a diagnostic: a severity-tagged summary line followed by an
    /// indented two-line context block (line number, originating file).
    /// Diagnostics print at every verbosity tier.
    pub fn report(&self, diag: &Diagnostic) {
        let tag = match diag.severity {
            Severity::Fatal => self.paint(RED, &diag.severity.to_string()),
            Severity::Advisory => self.paint(YELLOW, &diag.severity.to_string()),
        };
        let mut err = io::stderr().lock();
        let _ = writeln!(err, "{}: {}", tag, diag.message);
        let _ = writeln!(err, "    line: {}", diag.location.line);
        let _ = writeln!(err, "    file: {}", diag.location.file);
    }

    /// Informational progress line, shown at `-v` and above.
    pub fn info(&self, message: &str) {
        if self.verbosity >= Verbosity::Info {
            let _ = writeln!(io::stderr(), "{}: {}", self.paint(CYAN, "info"), message);
        }
    }

    /// Parser state-transition trace, shown at `-vv` only.
    pub fn debug(&self, message: &str) {
        if self.verbosity >= Verbosity::Debug {
            let _ = writeln!(io::stderr(), "{}: {}", self.dim("debug"), message);
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{BOLD}{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            format!("{DIM}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}
