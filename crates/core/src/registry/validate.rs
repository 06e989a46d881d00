use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::debug;

use super::Registry;
use crate::grammar::diag::{Diagnostic, Span, codes};
use crate::grammar::parser::parse;
use crate::grammar::tables::{ResolutionMethod, TokenKind};
use crate::grammar::token::TokenDefinition;
use crate::resolve::TokenStack;
use crate::resolve::record::{ResolutionLog, recording_table};

/// Shorthand for building a `BTreeMap<String, String>` context from key-value pairs.
macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        BTreeMap::from([$(($k.into(), $v.into())),+])
    };
}

/// Result of validating a template against a registry.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    /// `true` if no errors were found.
    pub ok: bool,
    /// All diagnostics, ordered by position.
    pub issues: Vec<Diagnostic>,
}

impl ValidationResult {
    fn from_issues(mut issues: Vec<Diagnostic>) -> Self {
        issues.sort_by_key(|d| d.span.map_or(usize::MAX, |s| s.start));
        let ok = !issues.iter().any(Diagnostic::is_error);
        Self { ok, issues }
    }
}

impl<T> Registry<T> {
    /// Parse `input` and check every tag, parameter tag, and filter it uses.
    pub fn validate(&self, input: &str) -> ValidationResult {
        match parse(input) {
            Ok(tokens) => self.validate_tokens(&tokens),
            Err(e) => ValidationResult::from_issues(vec![e.to_diagnostic()]),
        }
    }

    /// Check a parsed token sequence.
    ///
    /// Drains a copy of the tokens through a recording dispatch table, then
    /// compares the recorded names against the registry.
    pub fn validate_tokens(&self, tokens: &[TokenDefinition]) -> ValidationResult {
        let log = RefCell::new(ResolutionLog::default());
        let drained = {
            let mut table = recording_table(&log);
            TokenStack::from(tokens.to_vec()).resolve(&mut table)
        };
        if let Err(e) = drained {
            return ValidationResult::from_issues(vec![e.to_diagnostic()]);
        }
        let log = log.into_inner();

        let mut issues = Vec::new();
        for name in unique(&log.tags) {
            if !self.has_tag(name) {
                issues.push(
                    Diagnostic::error(
                        codes::UNKNOWN_TAG,
                        format!("unknown tag '{name}'"),
                        first_span(tokens, ResolutionMethod::Tag, name),
                    )
                    .with_context(ctx!("tag" => name)),
                );
            }
        }
        for name in unique(&log.parameter_tags) {
            if !self.has_parameter_tag(name) {
                issues.push(
                    Diagnostic::error(
                        codes::UNKNOWN_PARAMETER_TAG,
                        format!("unknown parameter tag '{name}'"),
                        first_span(tokens, ResolutionMethod::ParameterTag, name),
                    )
                    .with_context(ctx!("parameter_tag" => name)),
                );
            }
        }

        let mut unknown_filters = HashSet::new();
        let mut checked = HashSet::new();
        for used in &log.filters {
            let Some(filter) = self.filter(&used.name) else {
                if unknown_filters.insert(used.name.as_str()) {
                    issues.push(
                        Diagnostic::error(
                            codes::UNKNOWN_FILTER,
                            format!("unknown filter '{}'", used.name),
                            first_span(tokens, ResolutionMethod::Filter, &used.name),
                        )
                        .with_context(ctx!("filter" => used.name.as_str())),
                    );
                }
                continue;
            };
            if !filter.accepts(&used.arguments)
                && checked.insert((filter.name(), used.arguments.as_slice()))
            {
                issues.push(
                    Diagnostic::error(
                        codes::INVALID_FILTER_ARGUMENTS,
                        format!(
                            "invalid arguments for filter '{}': [{}]",
                            used.name,
                            used.arguments.join(", ")
                        ),
                        None,
                    )
                    .with_context(ctx!(
                        "filter" => filter.name(),
                        "arguments" => used.arguments.join(","),
                    )),
                );
            }
        }

        if !issues.is_empty() {
            debug!(issues = issues.len(), "template failed validation");
        }
        ValidationResult::from_issues(issues)
    }
}

/// Distinct names in first-seen order.
fn unique(names: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(String::as_str)
        .filter(|n| seen.insert(*n))
        .collect()
}

/// Span of the first token in document order that names `name` and resolves
/// with `method`.
fn first_span(tokens: &[TokenDefinition], method: ResolutionMethod, name: &str) -> Option<Span> {
    tokens
        .iter()
        .filter(|t| t.kind != TokenKind::PlainText)
        .find(|t| t.data == name && t.resolution() == Some(method))
        .map(|t| t.span)
}
