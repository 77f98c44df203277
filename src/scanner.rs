//! The token state machine: `Tokenizer` and its `next()` loop.

use crate::classify::{
    is_alphanumeric, is_digit, is_hex_digit, is_letter, is_octal_digit, is_simple_escape_letter,
    is_unprintable_control, is_whitespace, is_whitespace_no_newline,
};
use crate::diagnostic::DiagnosticSink;
use crate::options::{CommentStyle, Options};
use crate::reader::Reader;
use crate::source::ByteSource;
use crate::token::{Token, TokenType};

/// Produces a sequence of [`Token`]s from a [`ByteSource`], reporting
/// malformed input to a [`DiagnosticSink`] as it goes.
///
/// Construct with [`Tokenizer::new`] (or [`Tokenizer::with_options`] for
/// non-default behavior), then call [`Tokenizer::next`] in a loop until
/// it returns `false`. [`Tokenizer::current`] holds kind `Start` before
/// the first call and kind `End` once the input is exhausted.
pub struct Tokenizer<'a> {
    reader: Reader<'a>,
    diagnostics: &'a mut dyn DiagnosticSink,
    current: Token,
    previous: Token,
    options: Options,
}

/// What [`Tokenizer::try_consume_comment_start`] found at the current
/// position.
enum CommentStart {
    /// Not a comment opener under the active [`CommentStyle`].
    None,
    Line,
    Block,
    /// A lone `/` in C++ mode that isn't followed by `/` or `*` — not a
    /// comment at all, but a pre-built `Symbol` token the scanner should
    /// return immediately.
    Slash,
}

impl<'a> Tokenizer<'a> {
    /// Construct a tokenizer with default [`Options`].
    #[must_use]
    pub fn new(source: &'a mut dyn ByteSource, diagnostics: &'a mut dyn DiagnosticSink) -> Self {
        Self::with_options(source, diagnostics, Options::default())
    }

    /// Construct a tokenizer with caller-supplied [`Options`].
    #[must_use]
    pub fn with_options(
        source: &'a mut dyn ByteSource,
        diagnostics: &'a mut dyn DiagnosticSink,
        options: Options,
    ) -> Self {
        Self {
            reader: Reader::new(source),
            diagnostics,
            current: Token::start(),
            previous: Token::start(),
            options,
        }
    }

    #[must_use]
    pub fn current(&self) -> &Token {
        &self.current
    }

    #[must_use]
    pub fn previous(&self) -> &Token {
        &self.previous
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Returns any unread suffix of the final buffer to the byte source.
    /// Consumes the tokenizer — there is nothing meaningful to do with
    /// it afterward.
    pub fn finish(self) {
        self.reader.finish();
    }

    /// Advances to the next token. Returns `true` and updates
    /// [`Tokenizer::current`]/[`Tokenizer::previous`], or returns `false`
    /// once the input is exhausted (leaving `current` at kind `End`).
    pub fn next(&mut self) -> bool {
        self.previous = std::mem::replace(&mut self.current, Token::start());
        loop {
            let ws_line = self.reader.line();
            let ws_column = self.reader.column();
            self.reader.start_record();
            if let Some(kind) = self.try_consume_whitespace_or_newline() {
                let text = self.reader.stop_record();
                self.current = self.finish_token(kind, ws_line, ws_column, text);
                return true;
            }
            self.reader.stop_record();

            let mark_line = self.reader.line();
            let mark_column = self.reader.column();
            self.reader.start_record();
            match self.try_consume_comment_start() {
                CommentStart::Line => {
                    self.reader.stop_record();
                    self.consume_line_comment();
                    continue;
                }
                CommentStart::Block => {
                    self.reader.stop_record();
                    self.consume_block_comment(mark_line, mark_column);
                    continue;
                }
                CommentStart::Slash => {
                    let text = self.reader.stop_record();
                    self.current = self.finish_token(TokenType::Symbol, mark_line, mark_column, text);
                    return true;
                }
                CommentStart::None => {
                    self.reader.stop_record();
                }
            }

            if self.reader.is_eof() {
                break;
            }

            if self.is_invalid_control_byte() {
                self.skip_invalid_control_run(mark_line, mark_column);
                continue;
            }

            let line = self.reader.line();
            let column = self.reader.column();
            self.reader.start_record();
            let kind = self.consume_real_token(line, column);
            let text = self.reader.stop_record();
            self.current = self.finish_token(kind, line, column, text);
            return true;
        }
        self.current = Token::end(self.reader.line(), self.reader.column());
        false
    }

    fn finish_token(&self, kind: TokenType, line: u32, column: u32, text: Vec<u8>) -> Token {
        Token {
            kind,
            line,
            column,
            end_column: self.reader.column(),
            text: Self::bytes_to_text(text),
        }
    }

    /// Converts a token's exact recorded bytes into `Token::text`.
    ///
    /// Every token this scanner produces is valid UTF-8 by construction
    /// (the grammar is ASCII outside of passthrough UTF-8 continuation
    /// bytes) except one: a lone high-bit byte tokenized as a `Symbol`
    /// (see `consume_real_token`'s `b >= 0x80` branch), which isn't valid
    /// UTF-8 on its own. That single byte is the only input
    /// `String::from_utf8` ever rejects here, so it's the only one that
    /// falls back to a lossy conversion.
    fn bytes_to_text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
    }

    /// Implements §4.4: which whitespace bytes become a reportable token,
    /// if any, under the current `report_whitespace`/`report_newlines`
    /// combination. Always consumes whatever whitespace is present,
    /// reportable or not.
    fn try_consume_whitespace_or_newline(&mut self) -> Option<TokenType> {
        if self.options.report_newlines {
            if self.reader.current_char() == b'\n' {
                self.reader.advance();
                return Some(TokenType::Newline);
            }
            if is_whitespace_no_newline(self.reader.current_char()) {
                while is_whitespace_no_newline(self.reader.current_char()) {
                    self.reader.advance();
                }
                return Some(TokenType::Whitespace);
            }
            return None;
        }
        if self.options.report_whitespace {
            if is_whitespace(self.reader.current_char()) {
                while is_whitespace(self.reader.current_char()) {
                    self.reader.advance();
                }
                return Some(TokenType::Whitespace);
            }
            return None;
        }
        while is_whitespace(self.reader.current_char()) {
            self.reader.advance();
        }
        None
    }

    fn try_consume_comment_start(&mut self) -> CommentStart {
        match self.options.comment_style {
            CommentStyle::Shell => {
                if self.reader.current_char() != b'#' {
                    return CommentStart::None;
                }
                self.reader.advance();
                CommentStart::Line
            }
            CommentStyle::Cpp => {
                if self.reader.current_char() != b'/' {
                    return CommentStart::None;
                }
                self.reader.advance();
                match self.reader.current_char() {
                    b'/' => {
                        self.reader.advance();
                        CommentStart::Line
                    }
                    b'*' => {
                        self.reader.advance();
                        CommentStart::Block
                    }
                    _ => CommentStart::Slash,
                }
            }
        }
    }

    fn consume_line_comment(&mut self) {
        while !self.reader.is_eof() && self.reader.current_char() != b'\n' {
            self.reader.advance();
        }
        if !self.reader.is_eof() && self.reader.current_char() == b'\n' {
            self.reader.advance();
        }
    }

    /// `start_line`/`start_column` locate the comment's opening `/`, for
    /// the unterminated-comment follow-up diagnostic.
    fn consume_block_comment(&mut self, start_line: u32, start_column: u32) {
        loop {
            if self.reader.is_eof() {
                self.diagnostics.add_error(
                    self.reader.line(),
                    self.reader.column(),
                    "End-of-file inside block comment.".to_string(),
                );
                self.diagnostics
                    .add_error(start_line, start_column, "  Comment started here.".to_string());
                return;
            }
            match self.reader.current_char() {
                b'*' => {
                    self.reader.advance();
                    if !self.reader.is_eof() && self.reader.current_char() == b'/' {
                        self.reader.advance();
                        return;
                    }
                }
                b'/' => {
                    self.reader.advance();
                    // Don't consume the '*' here: a following '/' must
                    // still close the outer comment on the next pass.
                    if !self.reader.is_eof() && self.reader.current_char() == b'*' {
                        self.diagnostics.add_error(
                            self.reader.line(),
                            self.reader.column(),
                            "\"/*\" inside block comment. Block comments cannot be nested.".to_string(),
                        );
                    }
                }
                _ => self.reader.advance(),
            }
        }
    }

    fn is_invalid_control_byte(&self) -> bool {
        let b = self.reader.current_char();
        is_unprintable_control(b) || (b == 0 && !self.reader.is_eof())
    }

    fn skip_invalid_control_run(&mut self, line: u32, column: u32) {
        self.diagnostics
            .add_error(line, column, "Invalid control characters encountered in text.".to_string());
        while !self.reader.is_eof() && self.is_invalid_control_byte() {
            self.reader.advance();
        }
    }

    /// Implements §4.3 step 6: dispatch on the current byte to produce a
    /// real (non-whitespace, non-comment) token.
    fn consume_real_token(&mut self, start_line: u32, start_column: u32) -> TokenType {
        let b = self.reader.current_char();
        if is_letter(b) {
            self.reader.advance();
            while is_alphanumeric(self.reader.current_char()) {
                self.reader.advance();
            }
            return TokenType::Identifier;
        }
        if b == b'0' {
            self.reader.advance();
            return self.consume_number(true, false);
        }
        if b == b'.' {
            self.reader.advance();
            if is_digit(self.reader.current_char()) {
                if self.previous.kind == TokenType::Identifier
                    && self.previous.line == start_line
                    && self.previous.end_column == start_column
                {
                    self.diagnostics.add_error(
                        start_line,
                        start_column,
                        "Need space between identifier and decimal point.".to_string(),
                    );
                }
                return self.consume_number(false, true);
            }
            return TokenType::Symbol;
        }
        if is_digit(b) {
            self.reader.advance();
            return self.consume_number(false, false);
        }
        if b == b'"' || b == b'\'' {
            self.reader.advance();
            self.consume_string(b);
            return TokenType::String;
        }
        if b >= 0x80 {
            self.diagnostics
                .add_warning(start_line, start_column, format!("Interpreting non ascii codepoint {b}."));
            self.reader.advance();
            return TokenType::Symbol;
        }
        self.reader.advance();
        TokenType::Symbol
    }

    /// §4.6: loop handling the body of a string literal, delimited by
    /// `delimiter` (the quote byte already consumed by the caller).
    fn consume_string(&mut self, delimiter: u8) {
        loop {
            let b = self.reader.current_char();
            if b == 0 {
                self.diagnostics
                    .add_error(self.reader.line(), self.reader.column(), "Unexpected end of string.".to_string());
                return;
            }
            if b == b'\n' {
                if self.options.allow_multiline_strings {
                    self.reader.advance();
                    continue;
                }
                self.diagnostics.add_error(
                    self.reader.line(),
                    self.reader.column(),
                    "String literals cannot cross line boundaries.".to_string(),
                );
                return;
            }
            if b == b'\\' {
                self.reader.advance();
                self.consume_string_escape();
                continue;
            }
            self.reader.advance();
            if b == delimiter {
                return;
            }
        }
    }

    /// Dispatches on the byte right after a `\` already consumed by
    /// [`Tokenizer::consume_string`]. Diagnostics point at that byte's
    /// position, captured before any further bytes are consumed.
    fn consume_string_escape(&mut self) {
        let line = self.reader.line();
        let column = self.reader.column();
        let b = self.reader.current_char();
        if b == 0 {
            // Backslash immediately before end-of-string/EOF; the
            // terminating-NUL check on the next loop iteration reports it.
            return;
        }
        if is_simple_escape_letter(b) {
            self.reader.advance();
            return;
        }
        if is_octal_digit(b) {
            // Exactly one octal digit is mandatory here; up to two more
            // are absorbed by consume_string's ordinary byte-consuming
            // branch on later iterations, with no escape semantics of
            // their own at the scanner level.
            self.reader.advance();
            return;
        }
        match b {
            b'x' => {
                self.reader.advance();
                if is_hex_digit(self.reader.current_char()) {
                    self.reader.advance();
                } else {
                    self.diagnostics
                        .add_error(line, column, "\"\\x\" must be followed by hex digits.".to_string());
                }
            }
            b'u' => {
                self.reader.advance();
                if !self.consume_fixed_hex_digits(4) {
                    self.diagnostics
                        .add_error(line, column, "\"\\u\" must be followed by 4 hex digits.".to_string());
                }
            }
            b'U' => {
                self.reader.advance();
                self.consume_big_unicode_escape(line, column);
            }
            _ => {
                self.reader.advance();
                self.diagnostics
                    .add_error(line, column, "Invalid escape sequence in string literal.".to_string());
            }
        }
    }

    /// Consumes up to `count` hex digits; returns `true` iff all `count`
    /// were present and valid.
    fn consume_fixed_hex_digits(&mut self, count: u32) -> bool {
        for _ in 0..count {
            if !is_hex_digit(self.reader.current_char()) {
                return false;
            }
            self.reader.advance();
        }
        true
    }

    /// `\U` requires 8 hex digits in the range `000000xx..0010xxxx`: the
    /// first two digits must be `0`, the third `0` or `1`, the remaining
    /// five any hex digit.
    fn consume_big_unicode_escape(&mut self, line: u32, column: u32) {
        for i in 0..8 {
            let b = self.reader.current_char();
            let valid = match i {
                0 | 1 => b == b'0',
                2 => matches!(b, b'0' | b'1'),
                _ => is_hex_digit(b),
            };
            if !valid {
                self.diagnostics.add_error(
                    line,
                    column,
                    "\"\\U\" must be followed by 8 hex digits in the range 000000xx..0010xxxx.".to_string(),
                );
                return;
            }
            self.reader.advance();
        }
    }

    /// §4.7: classifies `Integer` vs `Float` and consumes the number's
    /// remaining bytes. `started_with_zero`/`started_with_dot` describe
    /// the one or two bytes the caller already consumed before the
    /// dispatch that led here.
    fn consume_number(&mut self, started_with_zero: bool, started_with_dot: bool) -> TokenType {
        if started_with_zero && matches!(self.reader.current_char(), b'x' | b'X') {
            self.reader.advance();
            let mut any = false;
            while is_hex_digit(self.reader.current_char()) {
                self.reader.advance();
                any = true;
            }
            if !any {
                self.diagnostics.add_error(
                    self.reader.line(),
                    self.reader.column(),
                    "\"0x\" must be followed by hex digits.".to_string(),
                );
            }
            return self.finish_number_postchecks(false);
        }
        if started_with_zero && is_digit(self.reader.current_char()) {
            while is_octal_digit(self.reader.current_char()) {
                self.reader.advance();
            }
            if is_digit(self.reader.current_char()) {
                self.diagnostics.add_error(
                    self.reader.line(),
                    self.reader.column(),
                    "Numbers starting with leading zero must be in octal.".to_string(),
                );
                while is_digit(self.reader.current_char()) {
                    self.reader.advance();
                }
            }
            return self.finish_number_postchecks(false);
        }

        let mut is_float = started_with_dot;
        if started_with_dot {
            while is_digit(self.reader.current_char()) {
                self.reader.advance();
            }
        } else {
            while is_digit(self.reader.current_char()) {
                self.reader.advance();
            }
            if self.reader.current_char() == b'.' {
                is_float = true;
                self.reader.advance();
                while is_digit(self.reader.current_char()) {
                    self.reader.advance();
                }
            }
        }
        if matches!(self.reader.current_char(), b'e' | b'E') {
            is_float = true;
            self.reader.advance();
            if matches!(self.reader.current_char(), b'-' | b'+') {
                self.reader.advance();
            }
            let mut any = false;
            while is_digit(self.reader.current_char()) {
                self.reader.advance();
                any = true;
            }
            if !any {
                self.diagnostics.add_error(
                    self.reader.line(),
                    self.reader.column(),
                    "\"e\" must be followed by exponent.".to_string(),
                );
            }
        }
        if self.options.allow_f_after_float && matches!(self.reader.current_char(), b'f' | b'F') {
            self.reader.advance();
            is_float = true;
        }
        self.finish_number_postchecks(is_float)
    }

    fn finish_number_postchecks(&mut self, is_float: bool) -> TokenType {
        if self.options.require_space_after_number && is_letter(self.reader.current_char()) {
            self.diagnostics.add_error(
                self.reader.line(),
                self.reader.column(),
                "Need space between number and identifier.".to_string(),
            );
        } else if self.reader.current_char() == b'.' {
            let message = if is_float {
                "Already saw decimal point or exponent; can't have another one."
            } else {
                "Hex and octal numbers must be integers."
            };
            self.diagnostics
                .add_error(self.reader.line(), self.reader.column(), message.to_string());
        }
        if is_float {
            TokenType::Float
        } else {
            TokenType::Integer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticLog;
    use crate::source::SliceSource;
    use pretty_assertions::assert_eq;

    fn tokens(input: &[u8], options: Options) -> (Vec<Token>, DiagnosticLog) {
        let mut source = SliceSource::new(input);
        let mut diagnostics = DiagnosticLog::new();
        let mut out = Vec::new();
        {
            let mut tokenizer = Tokenizer::with_options(&mut source, &mut diagnostics, options);
            while tokenizer.next() {
                out.push(tokenizer.current().clone());
            }
            tokenizer.finish();
        }
        (out, diagnostics)
    }

    #[test]
    fn scenario_mixed_tokens_and_trailing_identifier() {
        let input = b"foo 123 0x1F 07 0.5 1e10 \"a\\nb\" // tail\nBAR";
        let (toks, diags) = tokens(input, Options::default());
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenType::Identifier,
                TokenType::Integer,
                TokenType::Integer,
                TokenType::Integer,
                TokenType::Float,
                TokenType::Float,
                TokenType::String,
                TokenType::Identifier,
            ]
        );
        assert_eq!(toks[0].text, "foo");
        assert_eq!(toks[6].text, "\"a\\nb\"");
        assert_eq!(toks[7].line, 1);
        assert!(diags.is_empty());
    }

    #[test]
    fn leading_zero_decimal_digits_reports_octal_error() {
        let (toks, diags) = tokens(b"099", Options::default());
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokenType::Integer);
        assert_eq!(toks[0].text, "099");
        assert_eq!(diags.len(), 1);
        assert!(diags.diagnostics()[0].message.contains("must be in octal"));
    }

    #[test]
    fn nested_block_comment_reports_error_without_terminating_early() {
        let (toks, diags) = tokens(b"/* a /* b */", Options::default());
        assert!(toks.is_empty());
        assert_eq!(diags.len(), 1);
        assert!(diags.diagnostics()[0].message.contains("cannot be nested"));
    }

    #[test]
    fn identifier_adjacent_dot_reports_error_then_float() {
        let (toks, diags) = tokens(b"abc.123", Options::default());
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenType::Identifier, TokenType::Float]);
        assert_eq!(toks[1].text, ".123");
        assert_eq!(diags.len(), 1);
        assert!(diags.diagnostics()[0].message.contains("Need space"));
        assert_eq!(diags.diagnostics()[0].column, 3);
    }

    #[test]
    fn shell_comment_style_uses_hash() {
        let mut options = Options::default();
        options.comment_style = CommentStyle::Shell;
        let (toks, diags) = tokens(b"a # comment\nb", options);
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenType::Identifier, TokenType::Identifier]);
        assert!(diags.is_empty());
    }

    #[test]
    fn bare_slash_is_returned_as_symbol_in_cpp_mode() {
        let (toks, _diags) = tokens(b"/ x", Options::default());
        assert_eq!(toks[0].kind, TokenType::Symbol);
        assert_eq!(toks[0].text, "/");
    }

    #[test]
    fn whitespace_and_newline_reporting_combinations() {
        let mut options = Options::default();
        options.set_report_newlines(true);
        let (toks, _) = tokens(b"a \tb\nc", options);
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenType::Identifier,
                TokenType::Whitespace,
                TokenType::Identifier,
                TokenType::Newline,
                TokenType::Identifier,
            ]
        );
    }

    #[test]
    fn whitespace_only_reporting_folds_newlines_in() {
        let mut options = Options::default();
        options.set_report_whitespace(true);
        let (toks, _) = tokens(b"a \n\tb", options);
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenType::Identifier, TokenType::Whitespace, TokenType::Identifier]);
    }

    #[test]
    fn high_bit_byte_is_symbol_with_warning() {
        let (toks, diags) = tokens(&[0xC0], Options::default());
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokenType::Symbol);
        assert_eq!(diags.warnings().count(), 1);
        assert_eq!(diags.errors().count(), 0);
    }

    #[test]
    fn unterminated_string_reports_error() {
        let (toks, diags) = tokens(b"\"abc", Options::default());
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokenType::String);
        assert_eq!(diags.len(), 1);
        assert!(diags.diagnostics()[0].message.contains("Unexpected end of string"));
    }

    #[test]
    fn multiline_string_requires_opt_in() {
        // The unterminated string leaves an unconsumed closing quote
        // behind, which itself cascades into a second, unrelated
        // diagnostic once scanning reaches it — only the first is this
        // test's concern.
        let (_, diags) = tokens(b"\"a\nb\"", Options::default());
        assert!(diags.diagnostics()[0].message.contains("cannot cross line"));

        let mut options = Options::default();
        options.allow_multiline_strings = true;
        let (toks, diags) = tokens(b"\"a\nb\"", options);
        assert!(diags.is_empty());
        assert_eq!(toks[0].kind, TokenType::String);
        assert_eq!(toks[0].text, "\"a\nb\"");
    }

    #[test]
    fn hex_integer_requires_digits() {
        let (toks, diags) = tokens(b"0x", Options::default());
        assert_eq!(toks[0].kind, TokenType::Integer);
        assert_eq!(diags.len(), 1);
        assert!(diags.diagnostics()[0].message.contains("hex digits"));
    }

    #[test]
    fn number_immediately_followed_by_letter_reports_error() {
        let (_, diags) = tokens(b"123abc", Options::default());
        assert_eq!(diags.len(), 1);
        assert!(diags.diagnostics()[0].message.contains("Need space between number"));
    }

    #[test]
    fn f_suffix_requires_opt_in() {
        let (toks, diags) = tokens(b"1f", Options::default());
        // Without the option: "1" then an identifier-adjacency error, then "f".
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[0].kind, TokenType::Integer);
        assert_eq!(toks[1].kind, TokenType::Identifier);
        assert_eq!(diags.len(), 1);

        let mut options = Options::default();
        options.allow_f_after_float = true;
        let (toks, diags) = tokens(b"1f", options);
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokenType::Float);
        assert!(diags.is_empty());
    }
}
