use std::collections::BTreeMap;
use std::fmt;

use super::{
    cursor::Cursor,
    diag::{Diagnostic, Span, codes},
    tables::{
        self, ARGUMENT_LIST, ARGUMENT_SEPARATOR, END_TOKEN, FILTER_SEPARATOR, Indicator,
        Operator, RESERVED, START_TOKEN, TokenKind,
    },
    token::TokenDefinition,
};

/// Shorthand for building a `BTreeMap<String, String>` context from key-value pairs.
macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        BTreeMap::from([$(($k.into(), $v.into())),+])
    };
}

/// Result of every parsing function.
pub type ParseResult<T> = Result<T, ParseError>;

/// Which token body was empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyKind {
    /// `{}` or `{:f}`.
    Tag,
    /// `{t:}` or `{t::f}`.
    Filter,
    /// `{t:f+}` or `{t:f+a,}`.
    Argument,
    /// A prefix with nothing after it: `{@}`, `{!}`, `{#x}`, `{t:f+=}`.
    Name,
}

impl fmt::Display for EmptyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyKind::Tag => write!(f, "tag"),
            EmptyKind::Filter => write!(f, "filter"),
            EmptyKind::Argument => write!(f, "argument"),
            EmptyKind::Name => write!(f, "name"),
        }
    }
}

/// The first error found in a template.
///
/// `Display` yields the exact message text; positions are 0-based character
/// offsets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A token body had no characters before its terminator.
    #[error("Empty {kind}")]
    Empty {
        /// Which body was empty.
        kind: EmptyKind,
        /// Where the body was expected to start.
        position: usize,
    },
    /// A character outside the active alphabet, or an unexpected delimiter.
    #[error("Illegal '{character}' at position {position}")]
    IllegalCharacter {
        /// The offending character.
        character: char,
        /// Its position.
        position: usize,
    },
    /// A `{` with nothing after it, so it can be neither an escape nor a token.
    #[error("Illegal '{character}' at the end of the string")]
    IllegalCharacterAtStringEnd {
        /// The offending character.
        character: char,
        /// Its position (the last character of the input).
        position: usize,
    },
    /// Input ended while a placeholder was open.
    #[error("End of string reached while inside a token")]
    EndOfString {
        /// Length of the input in characters.
        position: usize,
    },
}

impl ParseError {
    /// The diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::Empty { kind, .. } => match kind {
                EmptyKind::Tag => codes::EMPTY_TAG,
                EmptyKind::Filter => codes::EMPTY_FILTER,
                EmptyKind::Argument => codes::EMPTY_ARGUMENT,
                EmptyKind::Name => codes::EMPTY_NAME,
            },
            ParseError::IllegalCharacter { .. } => codes::ILLEGAL_CHARACTER,
            ParseError::IllegalCharacterAtStringEnd { .. } => codes::ILLEGAL_CHARACTER_AT_END,
            ParseError::EndOfString { .. } => codes::END_OF_STRING,
        }
    }

    /// Where in the input the error was detected.
    pub fn span(&self) -> Span {
        match *self {
            ParseError::Empty { position, .. } | ParseError::EndOfString { position } => {
                Span::empty(position)
            }
            ParseError::IllegalCharacter { position, .. }
            | ParseError::IllegalCharacterAtStringEnd { position, .. } => {
                Span::new(position, position + 1)
            }
        }
    }

    /// Convert to an error diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string(), Some(self.span()));
        match self {
            ParseError::IllegalCharacter { character, .. }
            | ParseError::IllegalCharacterAtStringEnd { character, .. } => {
                diag.with_context(ctx!("character" => character.to_string()))
            }
            ParseError::Empty { kind, .. } => diag.with_context(ctx!("expected" => kind.to_string())),
            ParseError::EndOfString { .. } => {
                diag.with_context(ctx!("expected" => END_TOKEN.to_string()))
            }
        }
    }
}

// ─── Public API ─────────────────────────────────────────────────────────────

/// Parse template text into an ordered token sequence.
///
/// Empty or all-whitespace input is returned as a single plain-text token
/// without tokenizing.
pub fn parse(input: &str) -> ParseResult<Vec<TokenDefinition>> {
    if input.trim().is_empty() {
        let len = input.chars().count();
        return Ok(vec![TokenDefinition::plain_text(input, Span::new(0, len))]);
    }
    Parser::new(input).parse()
}

// ─── Parser Implementation ─────────────────────────────────────────────────

/// Characters that end each token kind's body.
const TAG_TERMINATORS: &[char] = &[FILTER_SEPARATOR, END_TOKEN];
const FILTER_TERMINATORS: &[char] = &[FILTER_SEPARATOR, ARGUMENT_LIST, ARGUMENT_SEPARATOR, END_TOKEN];
const ARGUMENT_TERMINATORS: &[char] =
    &[ARGUMENT_SEPARATOR, FILTER_SEPARATOR, ARGUMENT_LIST, END_TOKEN];

struct Parser<'a> {
    cursor: Cursor<'a>,
    tokens: Vec<TokenDefinition>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            cursor: Cursor::new(input),
            tokens: Vec::new(),
        }
    }

    fn illegal(&self, character: char) -> ParseError {
        ParseError::IllegalCharacter {
            character,
            position: self.cursor.position(),
        }
    }

    // ── String := (PlainText | "{" Token "}")* ──────────────────────────

    fn parse(mut self) -> ParseResult<Vec<TokenDefinition>> {
        while !self.cursor.at_end() {
            self.parse_plain_text()?;
            if self.cursor.eat(START_TOKEN) {
                self.parse_token()?;
            }
        }
        Ok(self.tokens)
    }

    /// Collect literal text up to the next unescaped `{` or end of input.
    fn parse_plain_text(&mut self) -> ParseResult<()> {
        let start = self.cursor.position();
        let mut text = String::new();

        while let Some(c) = self.cursor.current() {
            match c {
                START_TOKEN => match self.cursor.peek() {
                    Some(START_TOKEN) => {
                        text.push(START_TOKEN);
                        self.cursor.advance();
                        self.cursor.advance();
                    }
                    None => {
                        return Err(ParseError::IllegalCharacterAtStringEnd {
                            character: START_TOKEN,
                            position: self.cursor.position(),
                        });
                    }
                    Some(_) => break,
                },
                END_TOKEN => {
                    if self.cursor.peek() != Some(END_TOKEN) {
                        return Err(self.illegal(END_TOKEN));
                    }
                    text.push(END_TOKEN);
                    self.cursor.advance();
                    self.cursor.advance();
                }
                _ => {
                    text.push(c);
                    self.cursor.advance();
                }
            }
        }

        if !text.is_empty() {
            let span = Span::new(start, self.cursor.position());
            self.tokens.push(TokenDefinition::plain_text(text, span));
        }
        Ok(())
    }

    // ── Token := Tag (":" FilterGroup)* "}" ─────────────────────────────

    /// Parse one placeholder; the opening `{` is already consumed.
    fn parse_token(&mut self) -> ParseResult<()> {
        self.parse_body(TokenKind::Tag, TAG_TERMINATORS)?;
        loop {
            match self.cursor.current() {
                Some(END_TOKEN) => {
                    self.cursor.advance();
                    return Ok(());
                }
                Some(FILTER_SEPARATOR) => {
                    self.cursor.advance();
                    self.parse_filter_group()?;
                }
                Some(c) => return Err(self.illegal(c)),
                None => {
                    return Err(ParseError::EndOfString {
                        position: self.cursor.position(),
                    });
                }
            }
        }
    }

    // ── FilterGroup := Filter (("+" | ",") Argument)* ───────────────────

    fn parse_filter_group(&mut self) -> ParseResult<()> {
        self.parse_body(TokenKind::Filter, FILTER_TERMINATORS)?;
        while matches!(
            self.cursor.current(),
            Some(ARGUMENT_LIST | ARGUMENT_SEPARATOR)
        ) {
            self.cursor.advance();
            self.parse_body(TokenKind::Argument, ARGUMENT_TERMINATORS)?;
        }
        Ok(())
    }

    // ── Tag / Filter / Argument bodies ──────────────────────────────────

    /// Resolve the operator and indicator prefixes for `kind`, then scan the
    /// body until one of `terminators`. The terminator is left unconsumed.
    fn parse_body(&mut self, kind: TokenKind, terminators: &[char]) -> ParseResult<()> {
        let start = self.cursor.position();
        let operator: &'static Operator = tables::group(kind).match_operator(&mut self.cursor);
        let indicator: &'static Indicator = operator.match_indicator(&mut self.cursor);
        let prefixed = self.cursor.position() > start;
        let body_start = self.cursor.position();

        let mut data = String::new();
        loop {
            match self.cursor.current() {
                None => {
                    return Err(ParseError::EndOfString {
                        position: self.cursor.position(),
                    });
                }
                Some(c) if terminators.contains(&c) => break,
                Some(c) if RESERVED.contains(&c) || !indicator.parsing.accepts(c) => {
                    return Err(self.illegal(c));
                }
                Some(c) => {
                    data.push(c);
                    self.cursor.advance();
                }
            }
        }

        if data.is_empty() {
            let empty = if prefixed {
                EmptyKind::Name
            } else {
                match kind {
                    TokenKind::Filter => EmptyKind::Filter,
                    TokenKind::Argument => EmptyKind::Argument,
                    _ => EmptyKind::Tag,
                }
            };
            return Err(ParseError::Empty {
                kind: empty,
                position: body_start,
            });
        }

        self.tokens.push(TokenDefinition {
            data,
            kind,
            operator: operator.symbol,
            indicator: indicator.symbol,
            span: Span::new(start, self.cursor.position()),
        });
        Ok(())
    }
}
