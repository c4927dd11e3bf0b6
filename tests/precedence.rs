#[cfg(test)]
mod precedence_tests {
    use kaleidoscope as ks;

    use ks::error::KaleidoscopeError;
    use ks::precedence::{Precedence, PrecedenceTable};
    use ks::scanner::Scanner;

    #[test]
    fn test_standard_operators() {
        let table = PrecedenceTable::standard();

        assert_eq!(table.get('<'), Some(Precedence::new(10)));
        assert_eq!(table.get('+'), Some(Precedence::new(20)));
        assert_eq!(table.get('-'), Some(Precedence::new(20)));
        assert_eq!(table.get('*'), Some(Precedence::new(40)));
        assert_eq!(table.get('/'), None);
        assert_eq!(table.len(), 4);
        assert_eq!(table, PrecedenceTable::default());
    }

    #[test]
    fn test_lookup_by_token() {
        let table = PrecedenceTable::standard();
        let tokens: Vec<_> = Scanner::new("+ x 1 (".as_bytes())
            .map(|t| t.unwrap())
            .collect();

        assert_eq!(table.of(&tokens[0]), Some(Precedence::new(20)));
        assert_eq!(table.of(&tokens[1]), None);
        assert_eq!(table.of(&tokens[2]), None);
        assert_eq!(table.of(&tokens[3]), None);
        assert_eq!(table.of(&tokens[4]), None);
    }

    #[test]
    fn test_insert_replaces() {
        let mut table = PrecedenceTable::standard();

        let previous = table.insert('<', Precedence::new(5)).unwrap();

        assert_eq!(previous, Some(Precedence::new(10)));
        assert_eq!(table.get('<'), Some(Precedence::new(5)));
    }

    #[test]
    fn test_reserved_characters_are_rejected() {
        for op in ['(', ')', ',', ';', '#', 'a', '7', ' '] {
            let err = PrecedenceTable::empty()
                .insert(op, Precedence::new(1))
                .unwrap_err();

            assert!(matches!(err, KaleidoscopeError::Config(_)), "{:?}", op);
            assert!(!err.is_syntax());
        }
    }

    #[test]
    fn test_extend_from_json() {
        let mut table = PrecedenceTable::standard();

        table
            .extend_from_json(r#"{ "/": 40, "<": 5, "|": 0, "^": 255 }"#)
            .unwrap();

        assert_eq!(table.get('/'), Some(Precedence::new(40)));
        assert_eq!(table.get('<'), Some(Precedence::new(5)));
        assert_eq!(table.get('|'), Some(Precedence::LOWEST));
        assert_eq!(table.get('^'), Some(Precedence::HIGHEST));
        assert_eq!(table.get('+'), Some(Precedence::new(20)));
    }

    #[test]
    fn test_json_operator_must_be_one_character() {
        let err = PrecedenceTable::standard()
            .extend_from_json(r#"{ "==": 10 }"#)
            .unwrap_err();

        assert!(matches!(err, KaleidoscopeError::Config(_)));
    }

    #[test]
    fn test_bad_json_entry_leaves_table_untouched() {
        let texts = [
            r#"{ "/": 40, "==": 10 }"#,
            r#"{ "%": 30, "(": 5 }"#,
            r#"{ "<": 5, "x": 1 }"#,
        ];

        for text in texts {
            let mut table = PrecedenceTable::standard();
            let err = table.extend_from_json(text).unwrap_err();

            assert!(matches!(err, KaleidoscopeError::Config(_)), "{}", text);
            assert_eq!(table, PrecedenceTable::standard(), "{}", text);
        }
    }

    #[test]
    fn test_json_precedence_is_bounded() {
        for text in [r#"{ "/": 256 }"#, r#"{ "/": -1 }"#, r#"{ "/": "high" }"#, "[1]"] {
            let err = PrecedenceTable::standard()
                .extend_from_json(text)
                .unwrap_err();

            assert!(matches!(err, KaleidoscopeError::Json(_)), "{}", text);
        }
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "kaleidoscope-precedence-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "%": 40 }"#).unwrap();

        let table = PrecedenceTable::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(table.get('%'), Some(Precedence::new(40)));
        assert_eq!(table.get('*'), Some(Precedence::new(40)));
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("kaleidoscope-no-such-file.json");
        let err = PrecedenceTable::load(&path).unwrap_err();

        assert!(matches!(err, KaleidoscopeError::Io(_)));
    }
}
