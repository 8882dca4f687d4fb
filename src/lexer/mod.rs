//! Lexical analysis module for C-like source text.
//!
//! This module turns raw source text into a sequence of classified tokens
//! (keywords, type names, literals, punctuation, comments) for a downstream
//! parser. It is deliberately not a single-pass automaton: classification is
//! a fixed-order sequence of stages over one shared claim set, where each
//! stage claims the text it recognizes so later stages cannot reclassify the
//! same characters. Stage precedence is how ambiguity is resolved, e.g. a
//! reserved word wins over a generic word and a float literal wins over its
//! digit runs.
//!
//! The default order is [`Pipeline::standard`]. Recognizers that are not part
//! of the default order (identifiers, bitwise and logical operators,
//! multi-line comments, character literals) are available as optional stages
//! through the `with_*` builder methods on [`Pipeline`].

pub mod patterns;
mod pipeline;
mod token;

pub use patterns::{symbol_table, RawMatch};
pub use pipeline::{Analysis, ClaimSet, Pipeline, Residue, Stage};
pub use token::{BitwiseOp, Keyword, Punct, Span, Token, TokenCategory, TypeName};

use crate::error::ClexResult;

/// Tokenize source text with the standard pipeline.
///
/// Text that no stage recognizes is silently dropped, which keeps this
/// entry point total. Use [`try_tokenize`] or [`Pipeline::analyze`] when
/// leftovers should be reported.
pub fn tokenize(source: &str) -> Vec<Token> {
    Pipeline::standard().analyze(source).tokens
}

/// Tokenize source text, reporting the first unclassified chunk as a
/// recoverable error instead of dropping it.
pub fn try_tokenize(source: &str) -> ClexResult<Vec<Token>> {
    Pipeline::standard().analyze(source).into_result()
}

/// Render a token sequence for inspection, one `<TAG, lexeme>` line per token.
pub fn format_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
