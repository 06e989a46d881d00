//! Diagnostics for the tagfmt template engine.
//!
//! Provides [`Diagnostic`], [`Severity`], and [`Span`] types used to report
//! errors, warnings, and informational messages from the parser, the
//! resolver, and registry validation. Diagnostic codes are defined in the
//! [`codes`] module.

#![warn(missing_docs)]

/// Diagnostic ID constants.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Hard error: the template cannot be resolved.
    Error,
    /// Warning: the template may produce unexpected results.
    Warn,
    /// Informational note.
    Info,
}

/// Character span in the source template.
///
/// Offsets count Unicode scalar values, not bytes, matching the positions
/// reported in parser messages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    /// Offset of the first character (0-based).
    pub start: usize,
    /// Offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Create a span covering `[start, end)`.
    ///
    /// Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Create a zero-width span at the given position.
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }
}

/// A diagnostic message produced by the parser, resolver, or validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"TPL1101"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// Optional span in the source template that this diagnostic relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Machine-readable context for tooling. Keys and values are free-form strings.
    ///
    /// Uses `BTreeMap` for deterministic key ordering in serialized output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Error, message, span)
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Warn, message, span)
    }

    /// Shorthand for an `Info` diagnostic.
    pub fn info(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Info, message, span)
    }

    /// Attach machine-readable context metadata (builder pattern).
    ///
    /// Keys are short descriptors like `"tag"`, `"filter"`, `"character"`.
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Whether this diagnostic has `Error` severity.
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    /// Returns the human-readable explanation for this diagnostic's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    match id {
        codes::EMPTY_TAG => Some(
            "A placeholder opened with '{' has no tag name before its terminator. Write '{{' to emit a literal brace.",
        ),
        codes::EMPTY_FILTER => Some(
            "A ':' filter separator is not followed by a filter name or alternative name.",
        ),
        codes::EMPTY_ARGUMENT => Some(
            "A '+' or ',' argument separator is not followed by argument text. Arguments cannot be empty.",
        ),
        codes::EMPTY_NAME => Some(
            "An operator or indicator prefix (such as '@', '#x', '!' or '=') is not followed by a name or value.",
        ),
        codes::ILLEGAL_CHARACTER => Some(
            "The character is not part of the alphabet allowed at this position, or is a delimiter where none is expected. A lone '}' outside a placeholder must be written as '}}'.",
        ),
        codes::ILLEGAL_CHARACTER_AT_END => Some(
            "The template ends with a single '{'. Write '{{' for a literal brace or close the placeholder.",
        ),
        codes::END_OF_STRING => Some(
            "The template ends while a placeholder is still open; a closing '}' is missing.",
        ),
        codes::UNKNOWN_TAG => Some(
            "The template references a tag that is not registered with the engine.",
        ),
        codes::UNKNOWN_PARAMETER_TAG => Some(
            "The template references a parameter tag ('!name') that is not registered with the engine.",
        ),
        codes::UNKNOWN_FILTER => Some(
            "The template applies a filter whose name or alternative name is not registered with the engine.",
        ),
        codes::INVALID_FILTER_ARGUMENTS => Some(
            "The filter's argument check rejected the arguments supplied after '+' (wrong count or format).",
        ),
        codes::INTERNAL_ENGINE => Some(
            "The resolver ran out of tokens while assembling a placeholder. This is an engine bug, not a template error.",
        ),
        _ => None,
    }
}
