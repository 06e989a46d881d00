/// Single-pass character reader with one character of lookahead.
pub mod cursor;
/// Re-exports from the diagnostics crate.
pub mod diag;
/// Placeholder parser: template text to token sequence.
pub mod parser;
/// The static operator/indicator table that drives parsing and dispatch.
pub mod tables;
/// Parsed token records.
pub mod token;
