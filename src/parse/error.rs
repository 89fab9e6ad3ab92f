use thiserror::Error;

/// Errors produced while turning expression text into a postfix token
/// sequence.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("expression is empty")]
    Empty,

    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("closing parenthesis without a matching opening parenthesis")]
    MismatchedParen,

    #[error("comma outside of a function argument list")]
    MisplacedComma,

    #[error("unclosed opening parenthesis")]
    UnclosedParen,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message() {
        assert_eq!(ParseError::Empty.to_string(), "expression is empty");
    }

    #[test]
    fn unexpected_char_message() {
        let err = ParseError::UnexpectedChar { ch: '$', offset: 3 };
        assert_eq!(err.to_string(), "unexpected character '$' at offset 3");
    }

    #[test]
    fn mismatched_paren_message() {
        assert_eq!(
            ParseError::MismatchedParen.to_string(),
            "closing parenthesis without a matching opening parenthesis"
        );
    }

    #[test]
    fn misplaced_comma_message() {
        assert_eq!(
            ParseError::MisplacedComma.to_string(),
            "comma outside of a function argument list"
        );
    }

    #[test]
    fn unclosed_paren_message() {
        assert_eq!(
            ParseError::UnclosedParen.to_string(),
            "unclosed opening parenthesis"
        );
    }
}
