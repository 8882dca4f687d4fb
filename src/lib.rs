//! Lexical analyzer library for a C-like language.
//!
//! This library provides a multi-pass, precedence-ordered tokenizer: a fixed
//! sequence of classification stages applied to one source text, where each
//! stage claims the text it recognizes before the next stage runs.

pub mod error;
pub mod lexer;

// Re-export commonly used types
pub use error::{ClexError, ClexResult, DiagnosticError, ErrorCollector, LexerError};
pub use lexer::{
    format_tokens, tokenize, try_tokenize, Analysis, Keyword, Pipeline, Punct, Residue, Span,
    Stage, Token, TokenCategory, TypeName,
};
