//! The token shape produced by the scanner.

/// What kind of lexeme a [`Token`] represents.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TokenType {
    /// The initial value of `Tokenizer::current()` before the first call
    /// to `next()`. Never produced again afterward.
    Start,
    /// Returned once the input is exhausted. `text` is empty.
    End,
    Identifier,
    Integer,
    Float,
    String,
    /// A single byte (or, for `/`, a single confirmed non-comment slash)
    /// that doesn't fit any other category: operators, punctuation,
    /// delimiters, and high-bit bytes.
    Symbol,
    /// Only produced when whitespace reporting is enabled; see
    /// [`crate::options::Options`].
    Whitespace,
    /// Only produced when newline reporting is enabled.
    Newline,
}

/// A single lexeme with its exact source span.
///
/// `line`/`column` locate the token's first byte (zero-based).
/// `end_column` is the zero-based column immediately past the token's
/// last byte — on the *same line* the column counter was on when the
/// token ended, which for a token containing embedded newlines (only
/// possible for multi-line strings) is a column on the token's last
/// line, not an offset into its first line. Diagnostics are the only
/// consumer that should rely on `end_column`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenType,
    pub line: u32,
    pub column: u32,
    pub end_column: u32,
    /// Exact source substring, including delimiters and escape sequences
    /// verbatim (i.e. `"a\nb"` keeps the two-character escape `\n`, not a
    /// literal newline byte).
    pub text: String,
}

impl Token {
    /// The `Start` sentinel token `Tokenizer` begins with.
    pub(crate) fn start() -> Self {
        Self {
            kind: TokenType::Start,
            line: 0,
            column: 0,
            end_column: 0,
            text: String::new(),
        }
    }

    /// The `End` sentinel token returned once input is exhausted, pinned
    /// at the position `next()` stopped at.
    pub(crate) fn end(line: u32, column: u32) -> Self {
        Self {
            kind: TokenType::End,
            line,
            column,
            end_column: column,
            text: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_token_is_empty_at_origin() {
        let t = Token::start();
        assert_eq!(t.kind, TokenType::Start);
        assert_eq!((t.line, t.column, t.end_column), (0, 0, 0));
        assert!(t.text.is_empty());
    }

    #[test]
    fn end_token_carries_final_position() {
        let t = Token::end(4, 9);
        assert_eq!(t.kind, TokenType::End);
        assert_eq!((t.line, t.column, t.end_column), (4, 9, 9));
        assert!(t.text.is_empty());
    }
}
