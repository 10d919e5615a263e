//! Warning types for non-fatal errors during JSONL processing.
//!
//! When reading JSONL files it is often desirable to continue even when
//! individual lines are damaged. The [`Warning`] type represents these
//! non-fatal errors; [`read_jsonl_resilient`](crate::read_jsonl_resilient)
//! collects them while loading everything that does parse.

/// A non-fatal warning that occurred during JSONL processing.
///
/// Warnings represent issues that don't prevent continued processing
/// but should be reported to the caller. Each variant includes the
/// line number where the issue occurred for debugging purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A line contained malformed JSON that could not be parsed.
    ///
    /// The line is skipped and processing continues with the next line.
    MalformedJson {
        /// The 1-based line number where the error occurred.
        line_number: usize,
        /// A description of the JSON parsing error.
        error: String,
    },

    /// A line was skipped for a reason other than malformed JSON,
    /// such as being blank in the middle of the file.
    SkippedLine {
        /// The 1-based line number that was skipped.
        line_number: usize,
        /// The reason the line was skipped.
        reason: String,
    },
}

impl Warning {
    /// Returns the line number associated with this warning.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedJson { line_number, .. } | Self::SkippedLine { line_number, .. } => {
                *line_number
            }
        }
    }

    /// Returns a human-readable description of the warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis_jsonl::Warning;
    ///
    /// let warning = Warning::MalformedJson {
    ///     line_number: 5,
    ///     error: "unexpected end of input".to_string(),
    /// };
    /// let desc = warning.description();
    /// assert!(desc.contains("line 5"));
    /// assert!(desc.contains("unexpected end of input"));
    /// ```
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::MalformedJson { line_number, error } => {
                format!("line {}: malformed JSON: {}", line_number, error)
            }
            Self::SkippedLine {
                line_number,
                reason,
            } => {
                format!("line {}: skipped: {}", line_number, reason)
            }
        }
    }

    /// Returns a short machine-friendly kind for this warning.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedJson { .. } => "malformed_json",
            Self::SkippedLine { .. } => "skipped_line",
        }
    }
}
