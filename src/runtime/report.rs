//! Aggregated execution report.

use std::fmt;

/// Ordered, human-readable record of every executed step's message.
///
/// Messages are appended verbatim in execution order. A sub-pipeline's
/// report (the background branch) is folded in with one level of
/// indentation so the nesting stays readable in the final text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExecutionReport {
    buffer: String,
}

impl ExecutionReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message fragment as-is.
    pub fn append(&mut self, message: &str) {
        self.buffer.push_str(message);
    }

    /// Append a message, ensuring it ends with a newline.
    pub fn append_line(&mut self, message: &str) {
        self.buffer.push_str(message);
        if !message.ends_with('\n') {
            self.buffer.push('\n');
        }
    }

    /// Fold a nested sub-report under a prefix, indenting its lines.
    pub fn append_nested(&mut self, prefix: &str, nested: &str) {
        let folded = nested.replace('\n', "\n   |");
        self.buffer.push_str(prefix);
        self.buffer.push_str(&folded);
        self.buffer.push('\n');
    }

    /// The aggregated report text.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Check whether anything has been reported.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Consume the report, returning the text.
    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buffer)
    }
}
