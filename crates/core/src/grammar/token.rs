use serde::{Deserialize, Serialize};
use tagfmt_diagnostics::Span;

use super::tables::{self, ResolutionMethod, TokenKind};

/// One parsed token, produced once by the parser and consumed once by the
/// resolver.
///
/// `(kind, operator, indicator)` is the dispatch key under which the token is
/// resolved; `data` is the token body with every prefix symbol stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDefinition {
    /// Token body (tag name, filter name, argument text, or literal text).
    pub data: String,
    /// Token classification.
    pub kind: TokenKind,
    /// Operator prefix symbol, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<char>,
    /// Indicator prefix symbol, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicator: Option<char>,
    /// Source span, including any prefix symbols.
    pub span: Span,
}

impl TokenDefinition {
    /// A literal text segment.
    pub fn plain_text(data: impl Into<String>, span: Span) -> Self {
        Self {
            data: data.into(),
            kind: TokenKind::PlainText,
            operator: None,
            indicator: None,
            span,
        }
    }

    /// Whether this token is literal text.
    pub fn is_plain_text(&self) -> bool {
        self.kind == TokenKind::PlainText
    }

    /// How the operator/indicator table says this token resolves.
    ///
    /// `None` only for hand-built tokens whose prefixes are not in the table.
    pub fn resolution(&self) -> Option<ResolutionMethod> {
        tables::lookup(self.kind, self.operator, self.indicator).map(|i| i.resolution)
    }
}
