//! Token stack evaluation.
//!
//! Tokens are pushed in document order, so the last token of the template sits
//! on top. Draining therefore runs backwards through the document: each
//! resolved fragment is prepended to the output, and a filter's arguments are
//! popped before the filter itself. When a filter is popped, the value it
//! applies to is whatever is next on the stack, resolved first, which is how
//! `{tag:f1:f2}` composes as `f2(f1(tag))`.

/// Dispatch table and keys.
pub mod dispatch;
/// Name-recording dispatch table used for validation.
pub mod record;

use std::collections::VecDeque;

use tracing::trace;

use crate::grammar::diag::{Diagnostic, codes};
use crate::grammar::tables::TokenKind;
use crate::grammar::token::TokenDefinition;
use dispatch::{DispatchKey, DispatchTable};

/// Resolver invariant violations. Never produced for a token sequence that came
/// from a successful parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The stack ran out before a placeholder resolved to a tag or filter.
    #[error("Internal engine error: token stack exhausted while resolving a placeholder")]
    StackExhausted,
    /// Literal text appeared where a tag, filter, or argument was expected.
    #[error("Internal engine error: plain text found inside a placeholder")]
    UnexpectedPlainText,
}

impl EngineError {
    /// Convert to an error diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(codes::INTERNAL_ENGINE, self.to_string(), None)
    }
}

/// LIFO buffer of parsed tokens awaiting resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStack {
    tokens: Vec<TokenDefinition>,
}

impl TokenStack {
    /// An empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push one token on top.
    pub fn push(&mut self, token: TokenDefinition) {
        self.tokens.push(token);
    }

    /// The token on top of the stack.
    pub fn peek(&self) -> Option<&TokenDefinition> {
        self.tokens.last()
    }

    /// Number of tokens on the stack.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Drain the stack into the final text.
    ///
    /// Consumes the stack; clone it (or rebuild it from the token sequence)
    /// to resolve the same template again.
    pub fn resolve(mut self, dispatch: &mut DispatchTable<'_>) -> Result<String, EngineError> {
        let mut fragments = VecDeque::new();
        while let Some(top) = self.tokens.last() {
            if top.is_plain_text() {
                if let Some(token) = self.tokens.pop() {
                    trace!(data = %token.data, "plain text");
                    fragments.push_front(token.data);
                }
            } else {
                let value = self.resolve_tag_or_filter(dispatch)?;
                fragments.push_front(value);
            }
        }
        Ok(fragments.into_iter().collect())
    }

    /// Pop tokens until one placeholder value is resolved.
    ///
    /// Arguments popped along the way belong to the filter that ends the
    /// current frame, and arrive in reverse document order, hence
    /// `push_front`. A filter chain never branches, so each popped filter is
    /// parked until the tag underneath it resolves, then the parked filters
    /// apply innermost first. Chain length is bounded by the heap, not the
    /// call stack.
    fn resolve_tag_or_filter(
        &mut self,
        dispatch: &mut DispatchTable<'_>,
    ) -> Result<String, EngineError> {
        let mut pending: Vec<PendingFilter> = Vec::new();
        let mut arguments = VecDeque::new();
        while let Some(token) = self.tokens.pop() {
            let key = DispatchKey::from(&token);
            trace!(kind = ?token.kind, data = %token.data, "pop");
            match token.kind {
                TokenKind::Tag => {
                    let mut value = dispatch.call(key, &[token.data]);
                    while let Some(filter) = pending.pop() {
                        let mut call = Vec::with_capacity(filter.arguments.len() + 2);
                        call.push(filter.name);
                        call.push(value);
                        call.extend(filter.arguments);
                        value = dispatch.call(filter.key, &call);
                    }
                    return Ok(value);
                }
                TokenKind::Argument => {
                    arguments.push_front(dispatch.call(key, &[token.data]));
                }
                TokenKind::Filter => pending.push(PendingFilter {
                    key,
                    name: token.data,
                    arguments: std::mem::take(&mut arguments),
                }),
                TokenKind::PlainText => return Err(EngineError::UnexpectedPlainText),
            }
        }
        Err(EngineError::StackExhausted)
    }
}

/// A popped filter waiting for the value it applies to.
struct PendingFilter {
    key: DispatchKey,
    name: String,
    arguments: VecDeque<String>,
}

impl From<Vec<TokenDefinition>> for TokenStack {
    /// Push every token in document order.
    fn from(tokens: Vec<TokenDefinition>) -> Self {
        Self { tokens }
    }
}

impl FromIterator<TokenDefinition> for TokenStack {
    fn from_iter<I: IntoIterator<Item = TokenDefinition>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}
