//! Tokenizer configuration: the five behavioral flags plus comment style.

/// Which comment syntax the scanner recognizes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Default)]
pub enum CommentStyle {
    /// `//` line comments and `/* */` block comments.
    #[default]
    Cpp,
    /// `#` line comments only; no block comments.
    Shell,
}

/// The five configuration flags from the data model, plus comment style.
///
/// All fields are public and settable at any point — via
/// `Tokenizer::options_mut()` mid-stream, or up front via
/// `Tokenizer::with_options`. There is no builder type: five `bool`s and
/// an enum don't need one.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Options {
    /// Allow a trailing `f`/`F` suffix to force `Float` classification on
    /// an otherwise-integer-looking number (`1f` → `Float`).
    pub allow_f_after_float: bool,
    /// Select `//`/`/* */` vs `#` comments.
    pub comment_style: CommentStyle,
    /// Error when a letter immediately follows a numeric token with no
    /// intervening whitespace (`123abc`).
    pub require_space_after_number: bool,
    /// Permit a literal newline inside a string literal instead of
    /// treating it as an unterminated-string error.
    pub allow_multiline_strings: bool,
    /// Emit `Whitespace` tokens instead of silently skipping runs of
    /// whitespace. Disabling this also disables `report_newlines`.
    pub report_whitespace: bool,
    /// Emit `Newline` tokens distinct from `Whitespace`. Enabling this
    /// also enables `report_whitespace`.
    pub report_newlines: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            allow_f_after_float: false,
            comment_style: CommentStyle::Cpp,
            require_space_after_number: true,
            allow_multiline_strings: false,
            report_whitespace: false,
            report_newlines: false,
        }
    }
}

impl Options {
    /// Construct the default configuration (same as [`Options::default`],
    /// provided for call-site symmetry with `Options::new().with_...()`
    /// chains).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable/disable `report_whitespace`, applying the coupling rule:
    /// turning whitespace reporting off also turns newline reporting off.
    pub fn set_report_whitespace(&mut self, enabled: bool) {
        self.report_whitespace = enabled;
        if !enabled {
            self.report_newlines = false;
        }
    }

    /// Enable/disable `report_newlines`, applying the coupling rule:
    /// turning newline reporting on also turns whitespace reporting on.
    pub fn set_report_newlines(&mut self, enabled: bool) {
        self.report_newlines = enabled;
        if enabled {
            self.report_whitespace = true;
        }
    }
}
