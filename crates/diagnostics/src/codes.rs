//! Diagnostic ID constants.
//!
//! Use these instead of string literals to get compile-time typo detection
//! and IDE autocomplete. `1xxx` codes come from the parser, `2xxx` from
//! registry validation, `9xxx` from engine invariants.

/// A tag placeholder has no name (`{}`).
pub const EMPTY_TAG: &str = "TPL1001";

/// A filter has no name (`{tag:}`).
pub const EMPTY_FILTER: &str = "TPL1002";

/// A filter argument has no text (`{tag:f+}`).
pub const EMPTY_ARGUMENT: &str = "TPL1003";

/// An operator or indicator prefix is not followed by a name (`{@}`).
pub const EMPTY_NAME: &str = "TPL1004";

/// A character is not allowed at its position.
pub const ILLEGAL_CHARACTER: &str = "TPL1101";

/// A `{` is the last character of the input.
pub const ILLEGAL_CHARACTER_AT_END: &str = "TPL1102";

/// The input ends while a placeholder is still open.
pub const END_OF_STRING: &str = "TPL1103";

/// A tag name is not registered.
pub const UNKNOWN_TAG: &str = "TPL2001";

/// A parameter tag name is not registered.
pub const UNKNOWN_PARAMETER_TAG: &str = "TPL2002";

/// A filter name or alternative name is not registered.
pub const UNKNOWN_FILTER: &str = "TPL2003";

/// A filter rejected the arguments it was given.
pub const INVALID_FILTER_ARGUMENTS: &str = "TPL2004";

/// The resolver ran out of tokens mid-placeholder.
pub const INTERNAL_ENGINE: &str = "TPL9001";
