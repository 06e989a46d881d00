use tracing::debug;

use super::Registry;
use crate::grammar::diag::Diagnostic;
use crate::grammar::parser::{ParseError, parse};
use crate::grammar::token::TokenDefinition;
use crate::resolve::{EngineError, TokenStack};

/// Why a template could not be compiled or resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// The text is not a well-formed template.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The resolver hit an internal invariant violation.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// The template references names the registry does not know, or passes
    /// arguments a filter rejects.
    #[error("template failed validation with {} issue(s)", .0.len())]
    Invalid(Vec<Diagnostic>),
}

impl TemplateError {
    /// The error as diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            TemplateError::Parse(e) => vec![e.to_diagnostic()],
            TemplateError::Engine(e) => vec![e.to_diagnostic()],
            TemplateError::Invalid(issues) => issues.clone(),
        }
    }
}

/// A parsed and validated template bound to the registry that checked it.
///
/// Resolving never reparses; each call drains a fresh stack built from the
/// stored tokens.
#[derive(Debug)]
pub struct Template<'r, T> {
    registry: &'r Registry<T>,
    tokens: Vec<TokenDefinition>,
}

impl<T> Template<'_, T> {
    /// The parsed tokens in document order.
    pub fn tokens(&self) -> &[TokenDefinition] {
        &self.tokens
    }

    /// Produce the text for one carrier value.
    pub fn resolve(&self, value: &T) -> Result<String, TemplateError> {
        let mut table = self.registry.resolution_table(value);
        let stack = TokenStack::from(self.tokens.clone());
        Ok(stack.resolve(&mut table)?)
    }
}

impl<T> Registry<T> {
    /// Parse and validate `input`.
    pub fn compile(&self, input: &str) -> Result<Template<'_, T>, TemplateError> {
        let tokens = parse(input)?;
        let result = self.validate_tokens(&tokens);
        if !result.ok {
            return Err(TemplateError::Invalid(result.issues));
        }
        debug!(tokens = tokens.len(), "compiled template");
        Ok(Template {
            registry: self,
            tokens,
        })
    }
}
