use tracing::debug;

use crate::grammar::parser::{ParseResult, parse};
use crate::resolve::TokenStack;

/// Parse `input` and stack its tokens for resolution.
///
/// Empty and all-whitespace input succeeds with a single plain-text token.
/// On failure the first parse error is returned unchanged.
pub fn run(input: &str) -> ParseResult<TokenStack> {
    match parse(input) {
        Ok(tokens) => {
            debug!(tokens = tokens.len(), "parsed template");
            Ok(TokenStack::from(tokens))
        }
        Err(e) => {
            debug!(error = %e, "template failed to parse");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::dispatch::DispatchTable;

    #[test]
    fn whitespace_input_is_one_plain_token() {
        let stack = run("   ").unwrap();
        assert_eq!(stack.len(), 1);
        assert!(stack.peek().unwrap().is_plain_text());
        assert_eq!(stack.resolve(&mut DispatchTable::new()).unwrap(), "   ");
    }

    #[test]
    fn failure_surfaces_parser_message() {
        assert_eq!(run("lorem{}").unwrap_err().to_string(), "Empty tag");
    }
}
