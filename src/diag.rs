//! Compile-time diagnostic reporting
//!
//! All phases of the pipeline report problems through a single [`Diagnostics`]
//! sink. Messages are rendered immediately, in call order, as one line each:
//!
//! ```text
//! <line>:<column> ***ERROR*** <message>
//! <line>:<column> ***WARNING*** <message>
//! ```
//!
//! An error marks the compilation as failed ([`Diagnostics::errors_occurred`])
//! but does not abort it; the phases decide themselves whether they can
//! recover. The sink keeps every emitted line so that callers (and tests) can
//! inspect the exact output afterwards.

/// Diagnostic sink shared by the scanner, parser, and name resolver.
pub struct Diagnostics {
    lines: Vec<String>,
    errors: bool,
    echo: bool,
}

impl Diagnostics {
    /// Create a sink that echoes every message to stderr as it is emitted.
    pub fn new() -> Self {
        Diagnostics {
            lines: Vec::new(),
            errors: false,
            echo: true,
        }
    }

    /// Create a sink that only records messages. Used by tests.
    pub fn quiet() -> Self {
        Diagnostics {
            lines: Vec::new(),
            errors: false,
            echo: false,
        }
    }

    /// Report a non-fatal problem at the given source position.
    pub fn warn(&mut self, line: usize, column: usize, msg: &str) {
        self.emit(format!("{}:{} ***WARNING*** {}", line, column, msg));
    }

    /// Report an error at the given source position and mark the
    /// compilation as failed.
    pub fn fatal(&mut self, line: usize, column: usize, msg: &str) {
        self.emit(format!("{}:{} ***ERROR*** {}", line, column, msg));
        self.errors = true;
    }

    /// Whether any error has been reported so far.
    pub fn errors_occurred(&self) -> bool {
        self.errors
    }

    /// Every line emitted so far, in call order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn emit(&mut self, line: String) {
        if self.echo {
            eprintln!("{}", line);
        }
        self.lines.push(line);
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}
