use std::str::Chars;

/// Single-pass reader over template text with one character of lookahead.
///
/// `position` is the 0-based index of the current character counted in
/// Unicode scalar values; once the input is exhausted it equals the
/// character count of the input.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    chars: Chars<'a>,
    current: Option<char>,
    lookahead: Option<char>,
    position: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor positioned on the first character of `input`.
    pub fn new(input: &'a str) -> Self {
        let mut chars = input.chars();
        let current = chars.next();
        let lookahead = chars.next();
        Self {
            chars,
            current,
            lookahead,
            position: 0,
        }
    }

    /// The character under the cursor, or `None` at end of input.
    pub fn current(&self) -> Option<char> {
        self.current
    }

    /// The character after the current one, without consuming anything.
    pub fn peek(&self) -> Option<char> {
        self.lookahead
    }

    /// Position of the current character.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether the input is exhausted.
    pub fn at_end(&self) -> bool {
        self.current.is_none()
    }

    /// Move to the next character. A no-op at end of input.
    pub fn advance(&mut self) {
        if self.current.is_some() {
            self.position += 1;
            self.current = self.lookahead;
            self.lookahead = self.chars.next();
        }
    }

    /// Consume the current character if it equals `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.current == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }
}
