//! 統一的なエラーハンドリングモジュール
//!
//! このモジュールは、字句解析器全体で使用される統一的なエラー型と
//! エラー報告システムを提供します。解析器自体はプロセスを終了させず、
//! 呼び出し側が結果型で処理を決められるようにしています。

use crate::lexer::Span;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use thiserror::Error;

/// 字句解析器の統一エラー型
#[derive(Error, Debug, Clone)]
pub enum ClexError {
    /// レキサーエラー
    #[error("字句解析エラー")]
    Lexer(#[from] LexerError),

    /// ファイルI/Oエラー
    #[error("ファイル操作エラー: {0}")]
    Io(String),

    /// その他のエラー
    #[error("{0}")]
    Other(String),
}

/// レキサーエラーの詳細
#[derive(Error, Debug, Clone)]
pub enum LexerError {
    #[error("認識できないトークン: '{token}'")]
    UnrecognizedToken { token: String, span: Span },

    #[error("未終了の文字列リテラル")]
    UnterminatedString { span: Span },
}

/// エラー情報とソースコードの位置情報を含むエラー
#[derive(Debug, Clone)]
pub struct DiagnosticError {
    pub error: ClexError,
    pub file_id: usize,
}

impl DiagnosticError {
    pub fn new(error: ClexError, file_id: usize) -> Self {
        Self { error, file_id }
    }

    /// codespan-reportingのDiagnosticに変換
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let (message, labels) = match &self.error {
            ClexError::Lexer(e) => match e {
                LexerError::UnrecognizedToken { token, span } => (
                    format!("認識できないトークン: '{}'", token),
                    vec![Label::primary(self.file_id, span.clone())
                        .with_message("どの分類ステージにも一致しません")],
                ),
                LexerError::UnterminatedString { span } => (
                    "未終了の文字列リテラル".to_string(),
                    vec![Label::primary(self.file_id, span.clone())
                        .with_message("文字列が閉じられていません")],
                ),
            },
            ClexError::Io(message) => (format!("ファイル操作エラー: {}", message), vec![]),
            ClexError::Other(message) => (message.clone(), vec![]),
        };

        Diagnostic::error().with_message(message).with_labels(labels)
    }
}

/// 複数のエラーを蓄積するためのコレクター
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<DiagnosticError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// エラーを追加
    pub fn add_error(&mut self, error: ClexError, file_id: usize) {
        self.errors.push(DiagnosticError::new(error, file_id));
    }

    /// エラーがあるかどうか
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// エラーの数
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// すべてのエラーを取得
    pub fn errors(&self) -> &[DiagnosticError] {
        &self.errors
    }
}

/// Result型のエイリアス
pub type ClexResult<T> = Result<T, ClexError>;

impl From<std::io::Error> for ClexError {
    fn from(e: std::io::Error) -> Self {
        ClexError::Io(e.to_string())
    }
}
