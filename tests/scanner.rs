#[cfg(test)]
mod scanner_tests {
    use kaleidoscope as ks;

    use ks::scanner::*;
    use ks::token::*;

    fn scan(source: &str) -> Vec<Token> {
        Scanner::new(source.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .expect("in-memory input cannot fail")
    }

    fn assert_token_sequence(source: &str, expected: &[TokenType]) {
        let tokens: Vec<TokenType> = scan(source).into_iter().map(|t| t.token_type).collect();

        assert_eq!(tokens, expected, "token kinds for {:?}", source);
    }

    fn ident(name: &str) -> TokenType {
        TokenType::IDENTIFIER(name.to_string())
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "(),+*<-;",
            &[
                TokenType::CHAR('('),
                TokenType::CHAR(')'),
                TokenType::CHAR(','),
                TokenType::CHAR('+'),
                TokenType::CHAR('*'),
                TokenType::CHAR('<'),
                TokenType::CHAR('-'),
                TokenType::CHAR(';'),
                TokenType::EOF,
            ],
        );
    }

    #[test]
    fn test_keywords_only_match_whole_words() {
        assert_token_sequence(
            "def extern define externs x1 Def",
            &[
                TokenType::DEF,
                TokenType::EXTERN,
                ident("define"),
                ident("externs"),
                ident("x1"),
                ident("Def"),
                TokenType::EOF,
            ],
        );
    }

    #[test]
    fn test_identifier_run_is_one_token() {
        let tokens = scan("foo123bar");

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].token_type, ident("foo123bar"));
        assert_eq!(tokens[0].lexeme, "foo123bar");
    }

    #[test]
    fn test_numbers_keep_their_value() {
        for text in ["0", "7", "42", "3.14", "0.5", "100.25", "123456789.000001"] {
            let tokens = scan(text);
            let expected: f64 = text.parse().unwrap();

            assert_eq!(tokens.len(), 2, "{:?}", text);
            assert_eq!(tokens[0].token_type, TokenType::NUMBER(expected), "{:?}", text);
            assert_eq!(tokens[0].lexeme, text);
        }
    }

    #[test]
    fn test_second_dot_ends_the_number() {
        assert_token_sequence(
            "1.2.3",
            &[
                TokenType::NUMBER(1.2),
                TokenType::CHAR('.'),
                TokenType::NUMBER(3.0),
                TokenType::EOF,
            ],
        );
    }

    #[test]
    fn test_trailing_dot_is_part_of_number() {
        let tokens = scan("1.");

        assert_eq!(tokens[0].token_type, TokenType::NUMBER(1.0));
        assert_eq!(tokens[0].lexeme, "1.");
        assert!(tokens[1].is_eof());
    }

    #[test]
    fn test_leading_dot_is_a_char() {
        assert_token_sequence(
            ".5",
            &[TokenType::CHAR('.'), TokenType::NUMBER(5.0), TokenType::EOF],
        );
    }

    #[test]
    fn test_digits_then_letters_split() {
        assert_token_sequence(
            "12abc",
            &[TokenType::NUMBER(12.0), ident("abc"), TokenType::EOF],
        );
    }

    #[test]
    fn test_no_scientific_notation() {
        assert_token_sequence(
            "5e7",
            &[TokenType::NUMBER(5.0), ident("e7"), TokenType::EOF],
        );
    }

    #[test]
    fn test_comments_run_to_end_of_line() {
        let tokens = scan("# a comment with def and (\nx # trailing\n# last line");

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].token_type, ident("x"));
        assert_eq!(tokens[0].line, 2);
        assert!(tokens[1].is_eof());
    }

    #[test]
    fn test_many_comment_lines() {
        let source: String = "# nothing here\n".repeat(10_000) + "y";
        let tokens = scan(&source);

        assert_eq!(tokens[0].token_type, ident("y"));
        assert_eq!(tokens[0].line, 10_001);
    }

    #[test]
    fn test_line_numbers() {
        let lines: Vec<usize> = scan("a\nb\n\n  c").iter().map(|t| t.line).collect();

        assert_eq!(lines, vec![1, 2, 4, 4]);
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut scanner = Scanner::new("x".as_bytes());

        assert_eq!(scanner.next_token().unwrap().token_type, ident("x"));

        for _ in 0..3 {
            assert!(scanner.next_token().unwrap().is_eof());
        }
    }

    #[test]
    fn test_iterator_yields_one_eof() {
        let scanner = Scanner::new("  ".as_bytes());
        let tokens: Vec<_> = scanner.collect();

        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].as_ref().unwrap().is_eof());
    }

    #[test]
    fn test_unknown_characters_become_char_tokens() {
        assert_token_sequence(
            "$ é @",
            &[
                TokenType::CHAR('$'),
                TokenType::CHAR('é'),
                TokenType::CHAR('@'),
                TokenType::EOF,
            ],
        );
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let bytes: &[u8] = &[b'a', b' ', 0xFF, b' ', b'b'];
        let kinds: Vec<TokenType> = Scanner::new(bytes)
            .map(|t| t.unwrap().token_type)
            .collect();

        assert_eq!(
            kinds,
            vec![
                ident("a"),
                TokenType::CHAR(char::REPLACEMENT_CHARACTER),
                ident("b"),
                TokenType::EOF,
            ]
        );
    }

    #[test]
    fn test_truncated_utf8_keeps_following_bytes() {
        // 0xC3 announces a two-byte sequence, but '(' is not a continuation
        // byte and must still come through as its own token.
        let bytes: &[u8] = &[0xC3, b'(', b'x'];
        let kinds: Vec<TokenType> = Scanner::new(bytes)
            .map(|t| t.unwrap().token_type)
            .collect();

        assert_eq!(
            kinds,
            vec![
                TokenType::CHAR(char::REPLACEMENT_CHARACTER),
                TokenType::CHAR('('),
                ident("x"),
                TokenType::EOF,
            ]
        );
    }

    #[test]
    fn test_truncated_utf8_before_another_multibyte_char() {
        // A three-byte lead cut short by the start of 'é'.
        let bytes: &[u8] = &[0xE2, 0x82, 0xC3, 0xA9, b'1'];
        let kinds: Vec<TokenType> = Scanner::new(bytes)
            .map(|t| t.unwrap().token_type)
            .collect();

        assert_eq!(
            kinds,
            vec![
                TokenType::CHAR(char::REPLACEMENT_CHARACTER),
                TokenType::CHAR('é'),
                TokenType::NUMBER(1.0),
                TokenType::EOF,
            ]
        );
    }

    #[test]
    fn test_truncated_utf8_at_end_of_input() {
        let bytes: &[u8] = &[b'a', 0xF0, 0x9F];
        let kinds: Vec<TokenType> = Scanner::new(bytes)
            .map(|t| t.unwrap().token_type)
            .collect();

        assert_eq!(
            kinds,
            vec![
                ident("a"),
                TokenType::CHAR(char::REPLACEMENT_CHARACTER),
                TokenType::EOF,
            ]
        );
    }

    #[test]
    fn test_token_display() {
        let tokens = scan("foo 3 2.5 +");

        assert_eq!(tokens[0].to_string(), "IDENTIFIER foo foo");
        assert_eq!(tokens[1].to_string(), "NUMBER 3 3.0");
        assert_eq!(tokens[2].to_string(), "NUMBER 2.5 2.5");
        assert_eq!(tokens[3].to_string(), "CHAR + null");
        assert_eq!(tokens[4].to_string(), "EOF  null");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0.0");
        assert_eq!(format_number(-0.0), "-0.0");
        assert_eq!(format_number(12.0), "12.0");
        assert_eq!(format_number(-4.0), "-4.0");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(1e20), "100000000000000000000.0");
        assert_eq!(format_number(f64::INFINITY), "inf");
    }
}
