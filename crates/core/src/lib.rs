//! tagfmt core library.
//!
//! Parses `{tag:filter+arg}` placeholder templates into flat token
//! sequences, resolves them through a stack-based evaluator, and checks them
//! against a registry of tags and filters. The main entry points are
//! [`parse`] for tokenizing, [`Registry::validate`] for static checking, and
//! [`Registry::compile`] / [`Template::resolve`] for producing text.

#![warn(missing_docs)]

/// Parse-and-stack entry point.
pub mod engine;
/// Placeholder grammar: cursor, operator table, tokens, and parser.
pub mod grammar;
/// Tag and filter registry with validation and compiled templates.
pub mod registry;
/// Token stack and dispatch tables.
pub mod resolve;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Parser
pub use grammar::parser::{ParseError, ParseResult, parse};

// Tokens
pub use grammar::tables::{ResolutionMethod, TokenKind};
pub use grammar::token::TokenDefinition;

// Resolver
pub use engine::run;
pub use resolve::dispatch::{Callable, DispatchKey, DispatchTable};
pub use resolve::{EngineError, TokenStack};

// Registry
pub use registry::{
    Filter, Registry, RegistryBuilder, RegistryError, Template, TemplateError, ValidationResult,
};

// Diagnostics (re-exported from the diagnostics crate)
pub use grammar::diag::{Diagnostic, Severity, Span, codes};
