//! Shared test helpers for `tagfmt_core` integration tests.

#![allow(unreachable_pub)]

use std::cell::RefCell;
use std::rc::Rc;

use tagfmt_core::{DispatchKey, DispatchTable, TokenDefinition, TokenKind, parse, run};

// ─── Parse helpers ──────────────────────────────────────────────────────────

/// Parse and panic with the message on failure.
#[allow(dead_code)]
pub fn tokens(input: &str) -> Vec<TokenDefinition> {
    parse(input).unwrap_or_else(|e| panic!("failed to parse {input:?}: {e}"))
}

/// The parse failure message, panicking if the input parses.
#[allow(dead_code)]
pub fn parse_error(input: &str) -> String {
    match parse(input) {
        Ok(toks) => panic!("expected {input:?} to fail, got {toks:?}"),
        Err(e) => e.to_string(),
    }
}

/// `(kind, data)` pairs for compact assertions.
#[allow(dead_code)]
pub fn shapes(input: &str) -> Vec<(TokenKind, String)> {
    tokens(input)
        .into_iter()
        .map(|t| (t.kind, t.data))
        .collect()
}

// ─── Resolution helpers ─────────────────────────────────────────────────────

/// Parse `input` and resolve it against `table`.
#[allow(dead_code)]
pub fn resolve_with(input: &str, table: &mut DispatchTable<'_>) -> String {
    run(input)
        .unwrap_or_else(|e| panic!("failed to parse {input:?}: {e}"))
        .resolve(table)
        .unwrap_or_else(|e| panic!("failed to resolve {input:?}: {e}"))
}

/// Keys for the default-prefixed tag, filter, and argument entries.
#[allow(dead_code)]
pub fn tag_key() -> DispatchKey {
    DispatchKey::new(TokenKind::Tag, None, None)
}

#[allow(dead_code)]
pub fn filter_key() -> DispatchKey {
    DispatchKey::new(TokenKind::Filter, None, None)
}

#[allow(dead_code)]
pub fn argument_key() -> DispatchKey {
    DispatchKey::new(TokenKind::Argument, None, None)
}

/// A table that appends every call's argument vector to a shared log and
/// returns a recognizable value for each kind.
#[allow(dead_code)]
pub fn tracing_table<'a>(calls: Rc<RefCell<Vec<Vec<String>>>>) -> DispatchTable<'a> {
    let (t, f, a) = (Rc::clone(&calls), Rc::clone(&calls), calls);
    DispatchTable::new()
        .with(tag_key(), move |args| {
            t.borrow_mut().push(args.to_vec());
            args[0].to_uppercase()
        })
        .with(filter_key(), move |args| {
            f.borrow_mut().push(args.to_vec());
            format!("{}({})", args[0], args[1])
        })
        .with(argument_key(), move |args| {
            a.borrow_mut().push(args.to_vec());
            args[0].clone()
        })
}
