//! Built-in filters for tagfmt templates.
//!
//! | name        | alias | arguments        |
//! |-------------|-------|------------------|
//! | `uppercase` | `^`   | none             |
//! | `lowercase` | `~`   | none             |
//! | `length`    | `#`   | none             |
//! | `zero-pad`  | `%`   | width            |
//! | `if`        | `?`   | then \[, else\]  |
//! | `replace`   | `/`   | from, to         |
//! | `repeat`    | `*`   | count            |
//! | `coalesce`  | `??`  | fallback         |
//!
//! Numeric arguments are checked when a template is validated, and may not
//! exceed [`MAX_OUTPUT_LEN`]. A tag-reference argument is only known at
//! resolution time; if it does not hold a usable number then, or the result
//! would grow past [`MAX_OUTPUT_LEN`] bytes, the filter returns its input
//! unchanged.

#![warn(missing_docs)]

use tagfmt_core::registry::filter::is_deferred;
use tagfmt_core::{Filter, RegistryBuilder};

// ─── Public API ─────────────────────────────────────────────────────────────

/// Largest output, in bytes, that `zero-pad` and `repeat` will produce. Also
/// the largest width or count they accept.
pub const MAX_OUTPUT_LEN: usize = 1 << 20;

/// Every built-in filter, in table order.
pub fn builtins() -> Vec<Filter> {
    vec![
        uppercase(),
        lowercase(),
        length(),
        zero_pad(),
        if_filter(),
        replace(),
        repeat(),
        coalesce(),
    ]
}

/// Add every built-in filter to `builder`.
pub fn register_builtins<T>(builder: RegistryBuilder<T>) -> RegistryBuilder<T> {
    builder.filters(builtins())
}

/// `{v:uppercase}` / `{v:^}`
pub fn uppercase() -> Filter {
    Filter::new("uppercase", |input, _| input.to_uppercase())
        .with_alias("^")
        .with_argument_check(<[String]>::is_empty)
}

/// `{v:lowercase}` / `{v:~}`
pub fn lowercase() -> Filter {
    Filter::new("lowercase", |input, _| input.to_lowercase())
        .with_alias("~")
        .with_argument_check(<[String]>::is_empty)
}

/// `{v:length}` / `{v:#}`: number of characters.
pub fn length() -> Filter {
    Filter::new("length", |input, _| input.chars().count().to_string())
        .with_alias("#")
        .with_argument_check(<[String]>::is_empty)
}

/// `{v:zero-pad+5}` / `{v:%+5}`: left-pad with `0` to at least `width`
/// characters.
pub fn zero_pad() -> Filter {
    Filter::new("zero-pad", |input, args| {
        let Some(width) = count(args) else {
            return input.to_string();
        };
        let len = input.chars().count();
        if len >= width || input.len() + (width - len) > MAX_OUTPUT_LEN {
            return input.to_string();
        }
        let mut out = "0".repeat(width - len);
        out.push_str(input);
        out
    })
    .with_alias("%")
    .with_argument_check(single_count)
}

/// `{v:if+yes,no}` / `{v:?+yes}`: `then` for non-empty input, otherwise
/// `else` (or nothing).
pub fn if_filter() -> Filter {
    Filter::new("if", |input, args| {
        let branch = if input.is_empty() { args.get(1) } else { args.first() };
        branch.cloned().unwrap_or_default()
    })
    .with_alias("?")
    .with_argument_check(|args| matches!(args.len(), 1 | 2))
}

/// `{v:replace+from,to}` / `{v:/+from,to}`: replace every occurrence.
pub fn replace() -> Filter {
    Filter::new("replace", |input, args| match args {
        [from, to] if !from.is_empty() => input.replace(from.as_str(), to),
        _ => input.to_string(),
    })
    .with_alias("/")
    .with_argument_check(|args| args.len() == 2)
}

/// `{v:repeat+3}` / `{v:*+3}`
pub fn repeat() -> Filter {
    Filter::new("repeat", |input, args| {
        let fits = |n: usize| {
            input
                .len()
                .checked_mul(n)
                .is_some_and(|total| total <= MAX_OUTPUT_LEN)
        };
        match count(args) {
            Some(n) if fits(n) => input.repeat(n),
            _ => input.to_string(),
        }
    })
    .with_alias("*")
    .with_argument_check(single_count)
}

/// `{v:coalesce+fallback}` / `{v:??+fallback}`: `fallback` when the input is
/// empty.
pub fn coalesce() -> Filter {
    Filter::new("coalesce", |input, args| {
        if input.is_empty() {
            args.first().cloned().unwrap_or_default()
        } else {
            input.to_string()
        }
    })
    .with_alias("??")
    .with_argument_check(|args| args.len() == 1)
}

// ─── Argument helpers ───────────────────────────────────────────────────────

/// The single numeric argument, if it parses and is within
/// [`MAX_OUTPUT_LEN`].
fn count(args: &[String]) -> Option<usize> {
    match args {
        [n] => n.trim().parse().ok().filter(|&n| n <= MAX_OUTPUT_LEN),
        _ => None,
    }
}

fn single_count(args: &[String]) -> bool {
    match args {
        [n] => is_deferred(n) || count(args).is_some(),
        _ => false,
    }
}
