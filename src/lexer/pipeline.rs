//! 分類パイプライン
//!
//! 固定順のステージ列を1つのソーステキストに適用する。各ステージは
//! 未請求の区間だけを走査し、マッチした範囲を請求集合（ClaimSet）に
//! 登録する。先に走ったステージが請求したテキストを後のステージが
//! 再分類することはない。カテゴリ間の曖昧さはこのステージ順で解決される。

use log::debug;

use super::patterns::{self, RawMatch};
use super::token::{Span, Token};
use crate::error::{ClexResult, LexerError};

type Recognizer = fn(&str, &[Span]) -> Vec<RawMatch>;

/// 請求済みバイト範囲の集合。範囲は互いに素で、開始位置順に並ぶ。
#[derive(Debug, Clone, Default)]
pub struct ClaimSet {
    claims: Vec<Span>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 範囲を請求する。既存の請求と重なる範囲はパイプラインの不変条件違反。
    pub fn claim(&mut self, span: Span) {
        let idx = self.claims.partition_point(|c| c.start < span.start);
        debug_assert!(
            idx == 0 || self.claims[idx - 1].end <= span.start,
            "overlapping claim: {:?}",
            span
        );
        debug_assert!(
            idx == self.claims.len() || span.end <= self.claims[idx].start,
            "overlapping claim: {:?}",
            span
        );
        self.claims.insert(idx, span);
    }

    /// 未請求の区間を開始位置順で返す
    pub fn gaps(&self, len: usize) -> Vec<Span> {
        let mut gaps = Vec::with_capacity(self.claims.len() + 1);
        let mut pos = 0;
        for claim in &self.claims {
            if claim.start > pos {
                gaps.push(pos..claim.start);
            }
            pos = claim.end;
        }
        if pos < len {
            gaps.push(pos..len);
        }
        gaps
    }
}

/// 1つの分類ステージ：カテゴリの認識関数と表示名の対
#[derive(Debug, Clone)]
pub struct Stage {
    name: &'static str,
    recognize: Recognizer,
}

impl Stage {
    pub fn new(name: &'static str, recognize: Recognizer) -> Self {
        Self { name, recognize }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn single_comments() -> Self {
        Stage::new("single-comments", patterns::single_comments)
    }

    pub fn string_literals() -> Self {
        Stage::new("string-literals", patterns::string_literals)
    }

    pub fn reserved_words() -> Self {
        Stage::new("reserved-words", patterns::reserved_words)
    }

    pub fn type_names() -> Self {
        Stage::new("type-names", patterns::type_names)
    }

    pub fn float_literals() -> Self {
        Stage::new("float-literals", patterns::float_literals)
    }

    pub fn punctuation() -> Self {
        Stage::new("punctuation", patterns::punctuation)
    }

    pub fn integral_literals() -> Self {
        Stage::new("integral-literals", patterns::integral_literals)
    }

    pub fn assignment() -> Self {
        Stage::new("assignment", patterns::assign_operator)
    }

    // 既定のパイプラインに含まれない拡張ステージ

    pub fn multi_comments() -> Self {
        Stage::new("multi-comments", patterns::multi_comments)
    }

    pub fn identifiers() -> Self {
        Stage::new("identifiers", patterns::identifiers)
    }

    pub fn bitwise_operators() -> Self {
        Stage::new("bitwise-operators", patterns::bitwise_operators)
    }

    pub fn char_literals() -> Self {
        Stage::new("char-literals", patterns::char_literals)
    }
}

/// どのステージにも請求されなかった空白以外のテキスト
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub text: String,
    pub span: Span,
}

impl Residue {
    pub fn to_error(&self) -> LexerError {
        if self.text.starts_with('"') {
            LexerError::UnterminatedString {
                span: self.span.clone(),
            }
        } else {
            LexerError::UnrecognizedToken {
                token: self.text.clone(),
                span: self.span.clone(),
            }
        }
    }
}

/// 1回の解析結果：トークン列と未分類の残余
#[derive(Debug, Clone)]
pub struct Analysis {
    pub tokens: Vec<Token>,
    pub residue: Vec<Residue>,
}

impl Analysis {
    /// 残余なしで解析できたか
    pub fn is_clean(&self) -> bool {
        self.residue.is_empty()
    }

    /// すべての残余を回復可能なエラーとして返す
    pub fn errors(&self) -> Vec<LexerError> {
        self.residue.iter().map(Residue::to_error).collect()
    }

    /// 最初の残余をエラーとして報告する厳格モード
    pub fn into_result(self) -> ClexResult<Vec<Token>> {
        match self.residue.first() {
            Some(residue) => Err(residue.to_error().into()),
            None => Ok(self.tokens),
        }
    }
}

/// ステージ列を順に駆動するパイプラインコントローラ
#[derive(Debug, Clone)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl Pipeline {
    /// 既定のステージ順。文字列リテラルはコメントの直後に置き、
    /// 内部の数字や記号が先に刻まれてしまわないようにしている。
    pub fn standard() -> Self {
        Self {
            stages: vec![
                Stage::single_comments(),
                Stage::string_literals(),
                Stage::reserved_words(),
                Stage::type_names(),
                Stage::float_literals(),
                Stage::punctuation(),
                Stage::integral_literals(),
                Stage::assignment(),
            ],
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn push_stage(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    /// 指定した名前のステージの直前に挿入する。見つからなければ末尾に追加。
    pub fn insert_before(&mut self, name: &str, stage: Stage) {
        match self.stages.iter().position(|s| s.name == name) {
            Some(idx) => self.stages.insert(idx, stage),
            None => self.stages.push(stage),
        }
    }

    /// 指定した名前のステージの直後に挿入する。見つからなければ末尾に追加。
    pub fn insert_after(&mut self, name: &str, stage: Stage) {
        match self.stages.iter().position(|s| s.name == name) {
            Some(idx) => self.stages.insert(idx + 1, stage),
            None => self.stages.push(stage),
        }
    }

    /// 識別子ステージを末尾に追加する
    pub fn with_identifiers(mut self) -> Self {
        self.push_stage(Stage::identifiers());
        self
    }

    /// ビット演算子ステージを句読点ステージの前に挿入する。
    /// 後ろに置くと `>>` が `>` 2つに割られてしまう。
    pub fn with_bitwise_operators(mut self) -> Self {
        self.insert_before("punctuation", Stage::bitwise_operators());
        self
    }

    /// 複数行コメントステージを単一行コメントの直後に挿入する
    pub fn with_multi_comments(mut self) -> Self {
        self.insert_after("single-comments", Stage::multi_comments());
        self
    }

    /// 文字リテラルステージを末尾に追加する
    pub fn with_char_literals(mut self) -> Self {
        self.push_stage(Stage::char_literals());
        self
    }

    /// ソーステキストを解析してトークン列と残余を返す。
    /// 可変状態はすべてこの呼び出しの中で生成されるので、並行呼び出しは独立。
    pub fn analyze(&self, source: &str) -> Analysis {
        let mut claims = ClaimSet::new();
        let mut tokens = Vec::new();
        for stage in &self.stages {
            let gaps = claims.gaps(source.len());
            let matches = (stage.recognize)(source, &gaps);
            debug!("stage {}: {} match(es)", stage.name, matches.len());
            for m in matches {
                tokens.push(Token::new(
                    m.category,
                    &source[m.span.clone()],
                    m.span.clone(),
                ));
                claims.claim(m.span);
            }
        }
        let residue = collect_residue(source, &claims.gaps(source.len()));
        if !residue.is_empty() {
            debug!("{} unclassified chunk(s) left over", residue.len());
        }
        Analysis { tokens, residue }
    }
}

fn collect_residue(source: &str, gaps: &[Span]) -> Vec<Residue> {
    let bytes = source.as_bytes();
    let mut residue = Vec::new();
    for gap in gaps {
        let mut i = gap.start;
        while i < gap.end {
            if bytes[i].is_ascii_whitespace() {
                i += 1;
                continue;
            }
            let start = i;
            while i < gap.end && !bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            residue.push(Residue {
                text: source[start..i].to_string(),
                span: start..i,
            });
        }
    }
    residue
}
