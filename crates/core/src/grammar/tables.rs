//! The fixed operator/indicator table.
//!
//! Every token kind owns one [`OperatorGroup`]: a default operator (no prefix
//! symbol) plus zero or more prefixed operators. Every operator in turn owns a
//! default indicator plus zero or more prefixed indicators, so a lookup
//! always lands somewhere.
//!
//! | kind     | operator | indicator | parsing       | resolution     |
//! |----------|----------|-----------|---------------|----------------|
//! | Tag      | none     | none      | Name          | Tag            |
//! | Tag      | none     | `!`       | Name          | ParameterTag   |
//! | Tag      | `@`      | none      | Full          | Name           |
//! | Tag      | `#`      | none      | Decimal       | Name           |
//! | Tag      | `#`      | `b o d x` | Bin/Oct/Dec/Hex | Name         |
//! | Filter   | none     | none      | NameOrSymbol  | Filter         |
//! | Argument | none     | none      | Full          | Name           |
//! | Argument | `=`      | none      | Name          | Tag            |
//! | Argument | `=`      | `!`       | Name          | ParameterTag   |
//! | PlainText| none     | none      | Full          | Name           |

use super::cursor::Cursor;
use serde::{Deserialize, Serialize};

/// Start of a placeholder.
pub const START_TOKEN: char = '{';
/// End of a placeholder.
pub const END_TOKEN: char = '}';
/// Separates a tag (or previous filter) from the next filter.
pub const FILTER_SEPARATOR: char = ':';
/// Separates consecutive filter arguments.
pub const ARGUMENT_SEPARATOR: char = ',';
/// Introduces a filter's argument list.
pub const ARGUMENT_LIST: char = '+';

/// Characters that are never part of a token body.
pub const RESERVED: [char; 5] = [
    START_TOKEN,
    END_TOKEN,
    FILTER_SEPARATOR,
    ARGUMENT_SEPARATOR,
    ARGUMENT_LIST,
];

/// Punctuation accepted in filter names, enabling short alternative names.
pub const NAME_SYMBOLS: [char; 16] = [
    '!', '%', '&', '*', '.', '/', '<', '=', '>', '@', '^', '|', '~', '?', '$', '#',
];

/// Classification of a parsed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// A placeholder head: `{tag}`, `{!param}`, `{@literal}`, `{#x2F}`.
    Tag,
    /// A filter applied to the preceding value: `:filter`.
    Filter,
    /// A filter argument: `+literal`, `,=tag`.
    Argument,
    /// Literal text between placeholders, with escapes collapsed.
    PlainText,
}

/// Which characters are legal inside a token body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsingMethod {
    /// Unicode letters, `-` and `_`.
    Name,
    /// [`ParsingMethod::Name`] characters or [`NAME_SYMBOLS`].
    NameOrSymbol,
    /// Any character that is not reserved.
    Full,
    /// `0` and `1`.
    Binary,
    /// `0` to `7`.
    Octal,
    /// `0` to `9`.
    Decimal,
    /// `0` to `9`, `a` to `f`, `A` to `F`.
    Hexadecimal,
}

impl ParsingMethod {
    /// Whether `c` may appear in a body parsed with this method.
    ///
    /// Reserved delimiters are handled by the parser before this check.
    pub fn accepts(self, c: char) -> bool {
        match self {
            ParsingMethod::Name => is_name_char(c),
            ParsingMethod::NameOrSymbol => is_name_char(c) || NAME_SYMBOLS.contains(&c),
            ParsingMethod::Full => true,
            ParsingMethod::Binary => matches!(c, '0' | '1'),
            ParsingMethod::Octal => matches!(c, '0'..='7'),
            ParsingMethod::Decimal => c.is_ascii_digit(),
            ParsingMethod::Hexadecimal => c.is_ascii_hexdigit(),
        }
    }

    /// Whether `text` is a non-empty body that this method accepts in full.
    pub fn accepts_all(self, text: &str) -> bool {
        !text.is_empty() && text.chars().all(|c| !RESERVED.contains(&c) && self.accepts(c))
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphabetic() || c == '-' || c == '_'
}

/// How a token's data is interpreted when it is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionMethod {
    /// Look up a value-producing tag and apply it to the carrier value.
    Tag,
    /// Look up a zero-argument tag.
    ParameterTag,
    /// Look up a filter and apply it to the inner value and arguments.
    Filter,
    /// Use the data verbatim.
    Name,
}

/// A secondary prefix that refines an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    /// The prefix symbol, `None` for the default indicator.
    pub symbol: Option<char>,
    /// Body alphabet.
    pub parsing: ParsingMethod,
    /// Resolution behavior.
    pub resolution: ResolutionMethod,
}

/// A prefix selecting a parsing/resolution variant of a token kind.
#[derive(Debug)]
pub struct Operator {
    /// The prefix symbol, `None` for the kind's default operator.
    pub symbol: Option<char>,
    /// The kind this operator belongs to.
    pub kind: TokenKind,
    /// Indicator used when no prefixed indicator matches.
    pub default_indicator: Indicator,
    /// Indicators selected by a prefix symbol.
    pub indicators: &'static [Indicator],
}

impl Operator {
    /// Match an indicator at the cursor, consuming its symbol when one matches.
    pub fn match_indicator(&'static self, cursor: &mut Cursor<'_>) -> &'static Indicator {
        if let Some(c) = cursor.current()
            && let Some(ind) = self.indicators.iter().find(|i| i.symbol == Some(c))
        {
            cursor.advance();
            return ind;
        }
        &self.default_indicator
    }

    /// Look up an indicator by symbol.
    pub fn indicator(&'static self, symbol: Option<char>) -> Option<&'static Indicator> {
        match symbol {
            None => Some(&self.default_indicator),
            Some(s) => self.indicators.iter().find(|i| i.symbol == Some(s)),
        }
    }

    /// The default indicator followed by every prefixed indicator.
    pub fn all_indicators(&'static self) -> impl Iterator<Item = &'static Indicator> {
        std::iter::once(&self.default_indicator).chain(self.indicators.iter())
    }
}

/// All operators of one token kind.
#[derive(Debug)]
pub struct OperatorGroup {
    /// The kind this group describes.
    pub kind: TokenKind,
    /// Operator used when no prefixed operator matches.
    pub default: Operator,
    /// Operators selected by a prefix symbol.
    pub prefixed: &'static [Operator],
}

impl OperatorGroup {
    /// Match an operator at the cursor, consuming its symbol when one matches.
    pub fn match_operator(&'static self, cursor: &mut Cursor<'_>) -> &'static Operator {
        if let Some(c) = cursor.current()
            && let Some(op) = self.prefixed.iter().find(|o| o.symbol == Some(c))
        {
            cursor.advance();
            return op;
        }
        &self.default
    }

    /// Look up an operator by symbol.
    pub fn operator(&'static self, symbol: Option<char>) -> Option<&'static Operator> {
        match symbol {
            None => Some(&self.default),
            Some(s) => self.prefixed.iter().find(|o| o.symbol == Some(s)),
        }
    }

    /// The default operator followed by every prefixed operator.
    pub fn all_operators(&'static self) -> impl Iterator<Item = &'static Operator> {
        std::iter::once(&self.default).chain(self.prefixed.iter())
    }
}

const fn indicator(
    symbol: Option<char>,
    parsing: ParsingMethod,
    resolution: ResolutionMethod,
) -> Indicator {
    Indicator {
        symbol,
        parsing,
        resolution,
    }
}

static TAG: OperatorGroup = OperatorGroup {
    kind: TokenKind::Tag,
    default: Operator {
        symbol: None,
        kind: TokenKind::Tag,
        default_indicator: indicator(None, ParsingMethod::Name, ResolutionMethod::Tag),
        indicators: &[indicator(
            Some('!'),
            ParsingMethod::Name,
            ResolutionMethod::ParameterTag,
        )],
    },
    prefixed: &[
        Operator {
            symbol: Some('@'),
            kind: TokenKind::Tag,
            default_indicator: indicator(None, ParsingMethod::Full, ResolutionMethod::Name),
            indicators: &[],
        },
        Operator {
            symbol: Some('#'),
            kind: TokenKind::Tag,
            default_indicator: indicator(None, ParsingMethod::Decimal, ResolutionMethod::Name),
            indicators: &[
                indicator(Some('b'), ParsingMethod::Binary, ResolutionMethod::Name),
                indicator(Some('o'), ParsingMethod::Octal, ResolutionMethod::Name),
                indicator(Some('d'), ParsingMethod::Decimal, ResolutionMethod::Name),
                indicator(Some('x'), ParsingMethod::Hexadecimal, ResolutionMethod::Name),
            ],
        },
    ],
};

static FILTER: OperatorGroup = OperatorGroup {
    kind: TokenKind::Filter,
    default: Operator {
        symbol: None,
        kind: TokenKind::Filter,
        default_indicator: indicator(
            None,
            ParsingMethod::NameOrSymbol,
            ResolutionMethod::Filter,
        ),
        indicators: &[],
    },
    prefixed: &[],
};

static ARGUMENT: OperatorGroup = OperatorGroup {
    kind: TokenKind::Argument,
    default: Operator {
        symbol: None,
        kind: TokenKind::Argument,
        default_indicator: indicator(None, ParsingMethod::Full, ResolutionMethod::Name),
        indicators: &[],
    },
    prefixed: &[Operator {
        symbol: Some('='),
        kind: TokenKind::Argument,
        default_indicator: indicator(None, ParsingMethod::Name, ResolutionMethod::Tag),
        indicators: &[indicator(
            Some('!'),
            ParsingMethod::Name,
            ResolutionMethod::ParameterTag,
        )],
    }],
};

static PLAIN_TEXT: OperatorGroup = OperatorGroup {
    kind: TokenKind::PlainText,
    default: Operator {
        symbol: None,
        kind: TokenKind::PlainText,
        default_indicator: indicator(None, ParsingMethod::Full, ResolutionMethod::Name),
        indicators: &[],
    },
    prefixed: &[],
};

/// Kinds that carry placeholder syntax, in table order.
pub const PLACEHOLDER_KINDS: [TokenKind; 3] =
    [TokenKind::Tag, TokenKind::Filter, TokenKind::Argument];

/// The operator group for a token kind.
pub fn group(kind: TokenKind) -> &'static OperatorGroup {
    match kind {
        TokenKind::Tag => &TAG,
        TokenKind::Filter => &FILTER,
        TokenKind::Argument => &ARGUMENT,
        TokenKind::PlainText => &PLAIN_TEXT,
    }
}

/// Find the indicator for a (kind, operator, indicator) triple.
pub fn lookup(
    kind: TokenKind,
    operator: Option<char>,
    indicator: Option<char>,
) -> Option<&'static Indicator> {
    group(kind).operator(operator)?.indicator(indicator)
}
