//! Output of one remote command.

use std::time::Duration;

use serde_json::Value;

/// Output from a single remote command invocation.
#[derive(Debug, Clone)]
pub struct RawOutput {
    /// The command that was executed.
    pub command: String,

    /// The command output as text.
    pub text: String,

    /// Structured decoding of `text`, when it was requested and a decoder exists.
    pub structured: Option<Value>,

    /// Time taken to execute the command.
    pub elapsed: Duration,
}

impl RawOutput {
    /// Create a text-only output.
    pub fn new(command: impl Into<String>, text: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            command: command.into(),
            text: text.into(),
            structured: None,
            elapsed,
        }
    }

    /// Attach a structured decoding.
    pub fn with_structured(mut self, structured: Value) -> Self {
        self.structured = Some(structured);
        self
    }

    /// Look up a nested key path in the structured decoding.
    ///
    /// Returns `None` when there is no structured value, a key is missing,
    /// or the value at the path is JSON `null`.
    pub fn structured_path(&self, path: &[&str]) -> Option<&Value> {
        let mut current = self.structured.as_ref()?;
        for key in path {
            current = current.get(key)?;
        }
        (!current.is_null()).then_some(current)
    }
}

impl std::fmt::Display for RawOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
