use std::fmt;

/// Lexical category of a token in an arithmetic rule expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Numeric literal, e.g. `42` or `0.20`.
    Number,
    /// Named parameter reference, e.g. `basePrice`.
    Variable,
    /// Binary operator: `+`, `-`, `*`, `/`, or `^`.
    Operator,
    /// Function name directly followed by an opening parenthesis.
    Function,
    LeftParen,
    RightParen,
    /// Argument separator inside a function call.
    Comma,
}

/// A single token produced by the expression tokenizer.
///
/// Tokens exist only in transit between the parser stages; they are produced
/// by tokenization, reordered into postfix, and consumed by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionToken {
    text: String,
    kind: TokenKind,
}

impl ExpressionToken {
    pub(crate) fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        ExpressionToken {
            text: text.into(),
            kind,
        }
    }

    /// The exact source text of the token.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }
}

impl fmt::Display for ExpressionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
