//! Streaming tokenizer core for a C-family schema/IDL text format.
//!
//! This crate is the lexical layer underneath a protocol-schema-style text
//! format: `name = value` records, nested `{ }` bodies, `//`/`/* */` or `#`
//! comments, C-ish string/number literals. It consumes a byte stream
//! delivered in chunks (see [`ByteSource`]) and produces a sequence of
//! tagged [`Token`]s with precise line/column spans, reporting malformed
//! input to a caller-supplied [`DiagnosticSink`] rather than failing.
//!
//! # Architecture
//!
//! ```text
//! ByteSource (external) → Reader → Tokenizer::next() → Token
//! ```
//!
//! - [`source`]: the pull-based chunked byte source contract.
//! - `reader` (private): buffers one chunk at a time, tracks line/column,
//!   supports recording consumed bytes into a token's text across buffer
//!   refills.
//! - [`classify`]: pure byte predicates and the digit-value table.
//! - [`token`] / [`options`]: the public token shape and the five
//!   behavioral flags.
//! - [`scanner`]: the `Tokenizer` state machine.
//! - [`literal`]: post-tokenization parsers (`parse_integer`, `parse_float`,
//!   `append_unescaped`, `is_identifier`) operating on already-classified
//!   token text.
//! - [`diagnostic`]: the `DiagnosticSink` contract plus a small concrete
//!   `Diagnostic` value type and a `Vec`-backed sink for tests.
//!
//! # Usage
//!
//! ```
//! use idl_lexer::{Tokenizer, TokenType, diagnostic::DiagnosticLog, source::SliceSource};
//!
//! let mut source = SliceSource::new(b"name = 42");
//! let mut diagnostics = DiagnosticLog::new();
//! let mut tokenizer = Tokenizer::new(&mut source, &mut diagnostics);
//!
//! let mut kinds = Vec::new();
//! while tokenizer.next() {
//!     kinds.push(tokenizer.current().kind);
//! }
//! assert_eq!(
//!     kinds,
//!     vec![TokenType::Identifier, TokenType::Symbol, TokenType::Integer]
//! );
//! assert!(diagnostics.is_empty());
//! ```
//!
//! # Stability
//!
//! - [`TokenType`]: stable, closed set (this format's grammar does not grow
//!   a separate "raw" vs. "cooked" token kind split the way a full compiler
//!   front end might).
//! - [`Token`] fields: stable.
//! - [`ByteSource`] / [`DiagnosticSink`]: stable trait contracts; implement
//!   them to plug in your own chunked reader or diagnostic renderer.

pub mod classify;
pub mod diagnostic;
pub mod literal;
pub mod options;
mod reader;
pub mod scanner;
pub mod source;
pub mod token;

pub use diagnostic::DiagnosticSink;
pub use literal::{append_unescaped, is_identifier, parse_float, parse_integer};
pub use options::{CommentStyle, Options};
pub use scanner::Tokenizer;
pub use source::ByteSource;
pub use token::{Token, TokenType};
