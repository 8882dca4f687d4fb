//! レキサーテスト
//!
//! 多段パイプライン字句解析器の包括的なテストスイート。
//! ステージ優先順位、カテゴリ規則、残余の報告、任意ステージを網羅する。

#[cfg(test)]
mod tests {
    use clex::lexer::{tokenize, try_tokenize, Pipeline, Token, TokenCategory};
    use clex::{ClexError, LexerError};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    /// トークンを `<TAG, lexeme>` 形式の文字列に変換するヘルパー関数
    fn rendered(source: &str) -> Vec<String> {
        tokenize(source).iter().map(Token::to_string).collect()
    }

    fn categories(tokens: &[Token]) -> Vec<TokenCategory> {
        tokens.iter().map(|t| t.category).collect()
    }

    #[test]
    fn test_all_reserved_words() {
        let source = "while volatile void union typedef switch struct static sizeof \
                      return register if goto extern enum else do default continue \
                      const case break false true new auto";
        let expected: Vec<String> = source
            .split_whitespace()
            .map(|w| format!("<{}, {}>", w.to_uppercase(), w))
            .collect();
        assert_eq!(rendered(source), expected);
    }

    #[test]
    fn test_all_type_names() {
        let source = "int float bool short double signed unsigned char long";
        let expected: Vec<String> = source
            .split_whitespace()
            .map(|w| format!("<{}, {}>", w.to_uppercase(), w))
            .collect();
        assert_eq!(rendered(source), expected);
    }

    #[test]
    fn test_keywords_are_not_claimed_inside_longer_words() {
        // 単語全体が語彙と一致したときだけ請求される
        let tokens = tokenize("dowhile intx myint");
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_stage_precedence_example() {
        // 予約語ステージは句読点ステージより先に走るので、出力でも先に来る
        assert_eq!(
            rendered("if(x>=5);"),
            vec![
                "<IF, if>",
                "<RIGHT_ROUND_B, (>",
                "<GREAT_EQ, >=>",
                "<LEFT_ROUND_B, )>",
                "<SEMICOLON, ;>",
                "<INTEGRAL_LITERAL, 5>",
            ]
        );
    }

    #[test]
    fn test_comment_claims_keyword_like_text() {
        assert_eq!(
            rendered("int x; // set x\n"),
            vec!["<SINGLE_COMMENT, // set x>", "<INT, int>", "<SEMICOLON, ;>"]
        );
    }

    #[test]
    fn test_comment_inside_line_hides_operators() {
        let tokens = tokenize("y; // while (x >= 5)\n");
        let tags: Vec<String> = tokens.iter().map(|t| t.category.to_string()).collect();
        assert_eq!(tags, vec!["SINGLE_COMMENT", "SEMICOLON"]);
    }

    #[test]
    fn test_float_vs_integral_disambiguation() {
        assert_eq!(
            rendered("3.14 42"),
            vec!["<FLOAT_LITERAL, 3.14>", "<INTEGRAL_LITERAL, 42>"]
        );
    }

    #[test]
    fn test_float_digits_never_reclaimed() {
        // 小数の数字列が整数ステージに拾われないこと
        let tokens = tokenize("1.5 2.25");
        assert_eq!(
            categories(&tokens),
            vec![TokenCategory::FloatLiteral, TokenCategory::FloatLiteral]
        );
    }

    #[test]
    fn test_comparison_never_split_into_assign() {
        let tokens = tokenize("a >= b");
        assert_eq!(rendered("a >= b"), vec!["<GREAT_EQ, >=>"]);
        assert!(!tokens
            .iter()
            .any(|t| t.category == TokenCategory::AssignOperator));
    }

    #[test]
    fn test_assignment_after_comparison_stage() {
        assert_eq!(
            rendered("x = y == z"),
            vec!["<EQUAL, ==>", "<ASSIGN_OPERATOR, =>"]
        );
    }

    #[test_case("!=", "NOT_EQUAL")]
    #[test_case("==", "EQUAL")]
    #[test_case(">=", "GREAT_EQ")]
    #[test_case("<=", "LESS_EQ")]
    #[test_case("<", "LESSTHAN")]
    #[test_case(">", "GREATERTHAN")]
    #[test_case("%", "MOD")]
    #[test_case("#", "PREPROCESSOR")]
    #[test_case("!", "NOT")]
    #[test_case(".", "DOT")]
    #[test_case(";", "SEMICOLON")]
    #[test_case(",", "COMMA")]
    #[test_case("(", "RIGHT_ROUND_B")]
    #[test_case(")", "LEFT_ROUND_B")]
    #[test_case("[", "RIGHT_SQUARE_B")]
    #[test_case("]", "LEFT_SQUARE_B")]
    #[test_case("{", "RIGHT_CURLY_B")]
    #[test_case("}", "LEFT_CURLY_B")]
    fn test_punctuation_tags(symbol: &str, tag: &str) {
        let tokens = tokenize(symbol);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].category.to_string(), tag);
        assert_eq!(tokens[0].lexeme, symbol);
    }

    #[test]
    fn test_duplicate_literals_each_get_a_token() {
        let tokens = tokenize("7 7");
        assert_eq!(
            categories(&tokens),
            vec![
                TokenCategory::IntegralLiteral,
                TokenCategory::IntegralLiteral
            ]
        );
        assert_eq!(tokens[0].lexeme, tokens[1].lexeme);
        assert_ne!(tokens[0].span, tokens[1].span);
    }

    #[test]
    fn test_runs_are_independent() {
        let source = "int x = 1; // twice\n";
        assert_eq!(tokenize(source), tokenize(source));
    }

    #[test]
    fn test_character_conservation() {
        // トークンと残余の範囲は重ならず、残りはすべて空白
        let source = "int x = 3.14; // note\n\"s\" @@";
        let analysis = Pipeline::standard().analyze(source);
        let mut spans: Vec<(std::ops::Range<usize>, String)> = analysis
            .tokens
            .iter()
            .map(|t| (t.span.clone(), t.lexeme.clone()))
            .chain(
                analysis
                    .residue
                    .iter()
                    .map(|r| (r.span.clone(), r.text.clone())),
            )
            .collect();
        spans.sort_by_key(|(span, _)| span.start);

        let mut pos = 0;
        for (span, text) in &spans {
            assert!(span.start >= pos, "overlapping spans at {:?}", span);
            assert_eq!(&source[span.clone()], text);
            assert!(source[pos..span.start]
                .chars()
                .all(|c| c.is_ascii_whitespace()));
            pos = span.end;
        }
        assert!(source[pos..].chars().all(|c| c.is_ascii_whitespace()));
    }

    #[test]
    fn test_string_literal_is_greedy_within_a_line() {
        assert_eq!(
            rendered("\"a\" x \"b\""),
            vec!["<STRING_LITERAL, \"a\" x \"b\">"]
        );
    }

    #[test]
    fn test_string_contents_are_not_shredded() {
        // 文字列ステージは数値・記号ステージより先に走る
        let tokens = tokenize("\"x; 42 >= y\"");
        assert_eq!(categories(&tokens), vec![TokenCategory::StringLiteral]);
    }

    #[test]
    fn test_unterminated_string_is_a_recoverable_error() {
        match try_tokenize("\"oops") {
            Err(ClexError::Lexer(LexerError::UnterminatedString { .. })) => {}
            other => panic!("expected UnterminatedString, got {:?}", other),
        }
    }

    #[test]
    fn test_unrecognized_text_is_a_recoverable_error() {
        match try_tokenize("int @@ x;") {
            Err(ClexError::Lexer(LexerError::UnrecognizedToken { token, span })) => {
                assert_eq!(token, "@@");
                assert_eq!(span, (4..6));
            }
            other => panic!("expected UnrecognizedToken, got {:?}", other),
        }
    }

    #[test]
    fn test_silent_drop_keeps_tokenize_total() {
        // 既定の入口は残余を黙って捨てる
        let tokens = tokenize("int @@ x;");
        let tags: Vec<String> = tokens.iter().map(|t| t.category.to_string()).collect();
        assert_eq!(tags, vec!["INT", "SEMICOLON"]);
    }

    #[test]
    fn test_exponent_marker_integral() {
        assert_eq!(rendered("10e5"), vec!["<INTEGRAL_LITERAL, 10e5>"]);
    }

    #[test]
    fn test_digits_inside_words_are_not_literals() {
        let tokens = tokenize("x12 12x");
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(try_tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_only_input() {
        assert!(tokenize("   \t  \n  \r\n  ").is_empty());
    }

    #[test]
    fn test_identifier_stage_is_opt_in() {
        // 既定では識別子はトークンにならない
        let standard = Pipeline::standard().analyze("int count = 0;");
        assert!(standard
            .residue
            .iter()
            .any(|r| r.text == "count"));

        let with_idents = Pipeline::standard()
            .with_identifiers()
            .analyze("int count = 0;");
        assert!(with_idents.is_clean());
        assert_eq!(
            categories(&with_idents.tokens),
            vec![
                TokenCategory::TypeName(clex::TypeName::Int),
                TokenCategory::Punct(clex::Punct::Semicolon),
                TokenCategory::IntegralLiteral,
                TokenCategory::AssignOperator,
                TokenCategory::Identifier,
            ]
        );
    }

    #[test]
    fn test_bitwise_stage_runs_before_punctuation() {
        let analysis = Pipeline::standard()
            .with_bitwise_operators()
            .analyze("a << 2 & b");
        let tags: Vec<String> = analysis
            .tokens
            .iter()
            .map(|t| t.category.to_string())
            .collect();
        assert_eq!(tags, vec!["LEFT_SHIFT", "BITWISE_AND", "INTEGRAL_LITERAL"]);
    }

    #[test]
    fn test_shift_splits_without_bitwise_stage() {
        let tags: Vec<String> = tokenize("<<")
            .iter()
            .map(|t| t.category.to_string())
            .collect();
        assert_eq!(tags, vec!["LESSTHAN", "LESSTHAN"]);
    }

    #[test]
    fn test_multi_comment_stage_opt_in() {
        let analysis = Pipeline::standard()
            .with_multi_comments()
            .analyze("int x; /* while 3.5 */");
        let tags: Vec<String> = analysis
            .tokens
            .iter()
            .map(|t| t.category.to_string())
            .collect();
        assert_eq!(tags, vec!["MULTI_COMMENT", "INT", "SEMICOLON"]);
    }

    #[test]
    fn test_char_literal_stage_opt_in() {
        let analysis = Pipeline::standard().with_char_literals().analyze("a = b");
        let tags: Vec<String> = analysis
            .tokens
            .iter()
            .map(|t| t.category.to_string())
            .collect();
        assert_eq!(tags, vec!["ASSIGN_OPERATOR", "CHAR_LITERAL", "CHAR_LITERAL"]);
    }

    #[test]
    fn test_json_token_dump() {
        let tokens = tokenize("int 42;");
        let value = serde_json::to_value(&tokens).unwrap();
        assert_eq!(value[0]["category"], "INT");
        assert_eq!(value[1]["category"], "SEMICOLON");
        assert_eq!(value[2]["category"], "INTEGRAL_LITERAL");
        assert_eq!(value[2]["lexeme"], "42");
    }

    #[test]
    fn test_mixed_source() {
        let source = "\
// parity check\n\
int main() {\n\
    unsigned n = 10;\n\
    if (n >= 2) {\n\
        return n % 2;\n\
    }\n\
    return 0;\n\
}\n";
        let analysis = Pipeline::standard().analyze(source);
        let tags: Vec<String> = analysis
            .tokens
            .iter()
            .map(|t| t.category.to_string())
            .collect();
        assert_eq!(
            tags,
            vec![
                "SINGLE_COMMENT",
                "IF",
                "RETURN",
                "RETURN",
                "INT",
                "UNSIGNED",
                "RIGHT_ROUND_B",
                "LEFT_ROUND_B",
                "RIGHT_CURLY_B",
                "SEMICOLON",
                "RIGHT_ROUND_B",
                "GREAT_EQ",
                "LEFT_ROUND_B",
                "RIGHT_CURLY_B",
                "MOD",
                "SEMICOLON",
                "LEFT_CURLY_B",
                "SEMICOLON",
                "LEFT_CURLY_B",
                "INTEGRAL_LITERAL",
                "INTEGRAL_LITERAL",
                "INTEGRAL_LITERAL",
                "INTEGRAL_LITERAL",
                "ASSIGN_OPERATOR",
            ]
        );
        let lexemes: Vec<&str> = analysis
            .tokens
            .iter()
            .filter(|t| t.category == TokenCategory::IntegralLiteral)
            .map(|t| t.lexeme.as_str())
            .collect();
        assert_eq!(lexemes, vec!["10", "2", "2", "0"]);
        // `main` と `n` は残余として残る
        let residue: Vec<&str> = analysis.residue.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(residue, vec!["main", "n", "n", "n"]);
    }
}
