//! Error handling for bdcut
//!
//! The error surface is small and built around two types:
//! - [`BdcutError`] - strongly-typed failure cases for the generator
//! - [`ErrorContext`] - wrapper adding a user-friendly suggestion and details
//!
//! Library code propagates [`BdcutError`] (or `anyhow::Error` at the CLI
//! boundary) with `?`; `main` converts whatever bubbles up through
//! [`user_friendly_error`] into a colored, actionable message.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bdcut::core::{BdcutError, ErrorContext};
//!
//! let error = BdcutError::FormatNotFound {
//!     path: "formatos/postgres.json".to_string(),
//! };
//! let context = ErrorContext::new(error)
//!     .with_suggestion("Check the path passed as the first argument");
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for bdcut operations.
///
/// Each variant represents a specific failure mode of the generator. I/O and
/// parse errors carry the offending path so messages stay actionable.
#[derive(Error, Debug)]
pub enum BdcutError {
    /// The format file named on the command line does not exist.
    #[error("format file not found: {path}")]
    FormatNotFound {
        /// Path as given on the command line
        path: String,
    },

    /// The format file exists but is not valid JSON for the format schema.
    #[error("failed to parse format file {path}: {reason}")]
    FormatParse {
        /// Path of the format file
        path: String,
        /// Underlying serde_json message
        reason: String,
    },

    /// The `escape` table keys could not be compiled into a matching rule.
    ///
    /// The keys are joined with `|` and compiled as one regular expression;
    /// a key containing invalid pattern syntax fails here, before any
    /// rendering happens.
    #[error("invalid escape table: {reason}")]
    EscapeTable {
        /// Regex compile error text
        reason: String,
    },

    /// Reading the CSV input or writing the output artifact failed.
    #[error("{operation} failed for {path}")]
    Io {
        /// What was being done ("read CSV input", "write output")
        operation: String,
        /// The file involved
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Generic error wrapper for failures without a dedicated variant.
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// Error context wrapper providing user-friendly error messages
///
/// Wraps a [`BdcutError`] with an optional actionable suggestion (shown in
/// green) and optional details (shown in yellow).
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying bdcut error
    pub error: BdcutError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`BdcutError`].
    #[must_use]
    pub const fn new(error: BdcutError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors.
    ///
    /// Error message in red, details in yellow, suggestion in green. This is
    /// the primary way bdcut presents errors to users in the CLI.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into a user-friendly [`ErrorContext`] with suggestions.
///
/// Known [`BdcutError`] variants get targeted suggestions; everything else is
/// wrapped generically with the full error chain preserved in the details.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    match error.downcast::<BdcutError>() {
        Ok(bdcut_error) => create_error_context(bdcut_error),
        Err(other) => {
            let chain = other
                .chain()
                .skip(1)
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(": ");
            let mut context = ErrorContext::new(BdcutError::Other {
                message: other.to_string(),
            });
            if !chain.is_empty() {
                context.details = Some(chain);
            }
            context
        }
    }
}

fn create_error_context(error: BdcutError) -> ErrorContext {
    match &error {
        BdcutError::FormatNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the format path passed as the first argument")
            .with_details("bdcut expects a JSON format file, e.g. formatos/postgres.json"),
        BdcutError::FormatParse {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the JSON syntax of the format file")
            .with_details(
                "Recognized fields include separator, variables, escape, pre, post, \
                 pre-regiones, pre-provincias, pre-comunas, regiones, provincias, comunas",
            ),
        BdcutError::EscapeTable {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Escape table keys are compiled as a regular expression; \
             escape special characters like ( ) [ ] in the keys",
        ),
        BdcutError::Io {
            source, ..
        } => {
            let details = source.to_string();
            ErrorContext::new(error)
                .with_suggestion("Check that the path exists and is readable/writable")
                .with_details(details)
        }
        BdcutError::Other {
            ..
        } => ErrorContext::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_not_found_has_suggestion() {
        let err = BdcutError::FormatNotFound {
            path: "missing.json".to_string(),
        };
        let ctx = user_friendly_error(anyhow::Error::new(err));
        assert!(ctx.suggestion.is_some());
        assert!(ctx.error.to_string().contains("missing.json"));
    }

    #[test]
    fn escape_table_error_mentions_regex() {
        let err = BdcutError::EscapeTable {
            reason: "unclosed group".to_string(),
        };
        let ctx = create_error_context(err);
        assert!(ctx.suggestion.unwrap().contains("regular expression"));
    }

    #[test]
    fn io_error_details_carry_source_message() {
        let err = BdcutError::Io {
            operation: "read CSV input".to_string(),
            path: "input.csv".to_string(),
            source: std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "permission denied",
            ),
        };
        let ctx = create_error_context(err);
        assert!(ctx.details.unwrap().contains("permission denied"));
    }

    #[test]
    fn context_display_includes_details() {
        let ctx = ErrorContext::new(BdcutError::FormatNotFound {
            path: "f.json".to_string(),
        })
        .with_details("looked in the working directory");
        let rendered = format!("{ctx}");
        assert!(rendered.contains("f.json"));
        assert!(rendered.contains("Details: looked in the working directory"));
    }
}
