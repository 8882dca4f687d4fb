//! パターンテーブル — カテゴリごとの認識ルール
//!
//! 各認識関数は元のソーステキストと未請求の区間（gap）の列を受け取り、
//! 区間内で見つかった重複しないマッチを左から右の順で返す純粋関数。
//! 単語境界や数値の隣接判定は、請求済みかどうかに関わらず元のテキストの
//! 隣接文字に対して行う。削除方式の走査で生じる偽の隣接をここで避けている。

use indexmap::IndexMap;
use std::sync::OnceLock;

use super::token::{BitwiseOp, Keyword, Punct, Span, TokenCategory, TypeName};

/// 認識された1件のマッチ
#[derive(Debug, Clone, PartialEq)]
pub struct RawMatch {
    pub category: TokenCategory,
    pub span: Span,
}

impl RawMatch {
    fn new(category: TokenCategory, span: Span) -> Self {
        Self { category, span }
    }
}

/// 単語構成文字（ASCII 英数字とアンダースコア、および非 ASCII バイト）
fn is_word_byte(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric() || b >= 0x80
}

fn is_word_or_dot(b: u8) -> bool {
    b == b'.' || is_word_byte(b)
}

/// マッチ開始位置の直前が数値の一部でないこと
fn clean_before(bytes: &[u8], start: usize) -> bool {
    start == 0 || !is_word_or_dot(bytes[start - 1])
}

/// マッチ終了位置の直後が数値の一部でないこと
fn clean_after(bytes: &[u8], end: usize) -> bool {
    end >= bytes.len() || !is_word_or_dot(bytes[end])
}

/// `//` から行末まで。行末の改行はマッチに含めない。
pub fn single_comments(source: &str, gaps: &[Span]) -> Vec<RawMatch> {
    let bytes = source.as_bytes();
    let mut out = Vec::new();
    for gap in gaps {
        let mut i = gap.start;
        while i + 1 < gap.end {
            if bytes[i] == b'/' && bytes[i + 1] == b'/' {
                let start = i;
                while i < gap.end && bytes[i] != b'\n' && bytes[i] != b'\r' {
                    i += 1;
                }
                out.push(RawMatch::new(TokenCategory::SingleComment, start..i));
            } else {
                i += 1;
            }
        }
    }
    out
}

/// `/*` から最も近い `*/` まで。閉じられていないものはマッチしない。
pub fn multi_comments(source: &str, gaps: &[Span]) -> Vec<RawMatch> {
    let bytes = source.as_bytes();
    let mut out = Vec::new();
    for gap in gaps {
        let mut i = gap.start;
        while i + 1 < gap.end {
            if bytes[i] == b'/' && bytes[i + 1] == b'*' {
                match find_seq(bytes, i + 2, gap.end, b"*/") {
                    Some(close) => {
                        out.push(RawMatch::new(TokenCategory::MultiComment, i..close + 2));
                        i = close + 2;
                    }
                    // この区間に閉じ記号がなければ、後続の `/*` にもない
                    None => break,
                }
            } else {
                i += 1;
            }
        }
    }
    out
}

fn find_seq(bytes: &[u8], from: usize, end: usize, needle: &[u8]) -> Option<usize> {
    let mut i = from;
    while i + needle.len() <= end {
        if &bytes[i..i + needle.len()] == needle {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// 文字列リテラル：行内の最初の `"` から同じ行の最後の `"` まで（貪欲）
pub fn string_literals(source: &str, gaps: &[Span]) -> Vec<RawMatch> {
    let bytes = source.as_bytes();
    let mut out = Vec::new();
    for gap in gaps {
        let mut i = gap.start;
        while i < gap.end {
            let mut line_end = i;
            while line_end < gap.end && bytes[line_end] != b'\n' && bytes[line_end] != b'\r' {
                line_end += 1;
            }
            let mut first = None;
            let mut last = None;
            for j in i..line_end {
                if bytes[j] == b'"' {
                    if first.is_none() {
                        first = Some(j);
                    } else {
                        last = Some(j);
                    }
                }
            }
            if let (Some(open), Some(close)) = (first, last) {
                out.push(RawMatch::new(TokenCategory::StringLiteral, open..close + 1));
            }
            i = line_end + 1;
        }
    }
    out
}

/// 予約語：語彙との完全一致（両側が単語境界）
pub fn reserved_words(source: &str, gaps: &[Span]) -> Vec<RawMatch> {
    word_vocab(source, gaps, |word| {
        Keyword::lookup(word).map(TokenCategory::Keyword)
    })
}

/// 組み込み型名：予約語と同じ仕組み
pub fn type_names(source: &str, gaps: &[Span]) -> Vec<RawMatch> {
    word_vocab(source, gaps, |word| {
        TypeName::lookup(word).map(TokenCategory::TypeName)
    })
}

fn word_vocab(
    source: &str,
    gaps: &[Span],
    classify: impl Fn(&str) -> Option<TokenCategory>,
) -> Vec<RawMatch> {
    let bytes = source.as_bytes();
    let mut out = Vec::new();
    for gap in gaps {
        let mut i = gap.start;
        while i < gap.end {
            if is_word_byte(bytes[i]) {
                let start = i;
                while i < gap.end && is_word_byte(bytes[i]) {
                    i += 1;
                }
                let whole_word = (start == 0 || !is_word_byte(bytes[start - 1]))
                    && (i >= bytes.len() || !is_word_byte(bytes[i]));
                if whole_word {
                    if let Some(category) = classify(&source[start..i]) {
                        out.push(RawMatch::new(category, start..i));
                    }
                }
            } else {
                i += 1;
            }
        }
    }
    out
}

/// 浮動小数点リテラル：任意の符号、1桁以上、`.`、1桁以上。境界条件はない。
pub fn float_literals(source: &str, gaps: &[Span]) -> Vec<RawMatch> {
    let bytes = source.as_bytes();
    let mut out = Vec::new();
    for gap in gaps {
        let mut i = gap.start;
        while i < gap.end {
            let mut j = i;
            if bytes[j] == b'+' || bytes[j] == b'-' {
                j += 1;
            }
            let int_start = j;
            while j < gap.end && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j > int_start && j < gap.end && bytes[j] == b'.' {
                let frac_start = j + 1;
                let mut k = frac_start;
                while k < gap.end && bytes[k].is_ascii_digit() {
                    k += 1;
                }
                if k > frac_start {
                    out.push(RawMatch::new(TokenCategory::FloatLiteral, i..k));
                    i = k;
                    continue;
                }
            }
            i += 1;
        }
    }
    out
}

/// 固定記号テーブル。挿入順がそのまま照合順で、複数文字の記号が先に並ぶ。
pub fn symbol_table() -> &'static IndexMap<&'static str, Punct> {
    static TABLE: OnceLock<IndexMap<&'static str, Punct>> = OnceLock::new();
    TABLE.get_or_init(|| {
        IndexMap::from([
            ("!=", Punct::NotEqual),
            ("==", Punct::Equal),
            (">=", Punct::GreatEq),
            ("<=", Punct::LessEq),
            ("<", Punct::LessThan),
            (">", Punct::GreaterThan),
            ("%", Punct::Mod),
            ("#", Punct::Preprocessor),
            ("!", Punct::Not),
            (".", Punct::Dot),
            (";", Punct::Semicolon),
            (",", Punct::Comma),
            ("(", Punct::OpenParen),
            (")", Punct::CloseParen),
            ("[", Punct::OpenBracket),
            ("]", Punct::CloseBracket),
            ("{", Punct::OpenBrace),
            ("}", Punct::CloseBrace),
        ])
    })
}

/// 句読点・比較演算子：テーブル順で最初に一致した記号を請求する
pub fn punctuation(source: &str, gaps: &[Span]) -> Vec<RawMatch> {
    let bytes = source.as_bytes();
    let table = symbol_table();
    let mut out = Vec::new();
    for gap in gaps {
        let mut i = gap.start;
        while i < gap.end {
            let mut matched = false;
            for (symbol, punct) in table {
                let len = symbol.len();
                if i + len <= gap.end && &bytes[i..i + len] == symbol.as_bytes() {
                    out.push(RawMatch::new(TokenCategory::Punct(*punct), i..i + len));
                    i += len;
                    matched = true;
                    break;
                }
            }
            if !matched {
                i += 1;
            }
        }
    }
    out
}

/// 整数リテラル：符号付きの数字列、または `e` を1つ挟んだ数字列。
/// 両隣が単語構成文字でも `.` でもないこと（識別子や小数の一部を拾わない）。
pub fn integral_literals(source: &str, gaps: &[Span]) -> Vec<RawMatch> {
    let bytes = source.as_bytes();
    let mut out = Vec::new();
    for gap in gaps {
        let mut i = gap.start;
        while i < gap.end {
            let b = bytes[i];
            let signed_start = (b == b'+' || b == b'-')
                && i + 1 < gap.end
                && bytes[i + 1].is_ascii_digit();
            if !b.is_ascii_digit() && !signed_start {
                i += 1;
                continue;
            }
            if !clean_before(bytes, i) {
                i = skip_word_run(bytes, gap.end, i);
                continue;
            }
            let start = i;
            let mut j = if signed_start { i + 1 } else { i };
            while j < gap.end && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j < gap.end && bytes[j] == b'e' && j + 1 < gap.end && bytes[j + 1].is_ascii_digit() {
                j += 1;
                while j < gap.end && bytes[j].is_ascii_digit() {
                    j += 1;
                }
            }
            if clean_after(bytes, j) {
                out.push(RawMatch::new(TokenCategory::IntegralLiteral, start..j));
                i = j;
            } else {
                i = skip_word_run(bytes, gap.end, j);
            }
        }
    }
    out
}

fn skip_word_run(bytes: &[u8], end: usize, from: usize) -> usize {
    let mut i = from;
    while i < end && is_word_or_dot(bytes[i]) {
        i += 1;
    }
    if i == from {
        from + 1
    } else {
        i
    }
}

/// 残っている裸の `=` をすべて代入演算子として請求する
pub fn assign_operator(source: &str, gaps: &[Span]) -> Vec<RawMatch> {
    let bytes = source.as_bytes();
    let mut out = Vec::new();
    for gap in gaps {
        for i in gap.clone() {
            if bytes[i] == b'=' {
                out.push(RawMatch::new(TokenCategory::AssignOperator, i..i + 1));
            }
        }
    }
    out
}

/// 識別子（任意ステージ）：英字またはアンダースコアで始まる単語
pub fn identifiers(source: &str, gaps: &[Span]) -> Vec<RawMatch> {
    let bytes = source.as_bytes();
    let mut out = Vec::new();
    for gap in gaps {
        let mut i = gap.start;
        while i < gap.end {
            if bytes[i].is_ascii_alphabetic() || bytes[i] == b'_' {
                let start = i;
                while i < gap.end && is_word_byte(bytes[i]) {
                    i += 1;
                }
                out.push(RawMatch::new(TokenCategory::Identifier, start..i));
            } else {
                i += 1;
            }
        }
    }
    out
}

/// ビット演算子・論理演算子（任意ステージ）。長い記号から照合する。
pub fn bitwise_operators(source: &str, gaps: &[Span]) -> Vec<RawMatch> {
    const OPS: [(&str, BitwiseOp); 8] = [
        ("<<", BitwiseOp::LeftShift),
        (">>", BitwiseOp::RightShift),
        ("&&", BitwiseOp::LogicalAnd),
        ("||", BitwiseOp::LogicalOr),
        ("&", BitwiseOp::And),
        ("|", BitwiseOp::Or),
        ("^", BitwiseOp::Xor),
        ("~", BitwiseOp::Not),
    ];
    let bytes = source.as_bytes();
    let mut out = Vec::new();
    for gap in gaps {
        let mut i = gap.start;
        while i < gap.end {
            let mut matched = false;
            for (symbol, op) in OPS {
                let len = symbol.len();
                if i + len <= gap.end && &bytes[i..i + len] == symbol.as_bytes() {
                    out.push(RawMatch::new(TokenCategory::Bitwise(op), i..i + len));
                    i += len;
                    matched = true;
                    break;
                }
            }
            if !matched {
                i += 1;
            }
        }
    }
    out
}

/// 文字リテラル（任意ステージ）：両隣が単語構成文字でない単独の英字
pub fn char_literals(source: &str, gaps: &[Span]) -> Vec<RawMatch> {
    let bytes = source.as_bytes();
    let mut out = Vec::new();
    for gap in gaps {
        for i in gap.clone() {
            if bytes[i].is_ascii_alphabetic()
                && (i == 0 || !is_word_byte(bytes[i - 1]))
                && (i + 1 >= bytes.len() || !is_word_byte(bytes[i + 1]))
            {
                out.push(RawMatch::new(TokenCategory::CharLiteral, i..i + 1));
            }
        }
    }
    out
}
