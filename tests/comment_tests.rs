use tern::lexer::{Token, strip_comments};
use tern::parser::{ParseState, parse};

fn has_ident(tokens: &[Token], name: &str) -> bool {
    tokens
        .iter()
        .any(|t| matches!(t, Token::Ident(i) if i.value == name))
}

#[test]
fn block_comment_ignored() {
    let source = r#"
        (* This is a comment *)
        let main = 42
    "#;

    let source = strip_comments(source);
    let tokens = Token::lex(&source).unwrap();

    assert!(!has_ident(&tokens, "This"), "Comment tokens should be stripped");
    assert!(!has_ident(&tokens, "comment"));
    assert!(has_ident(&tokens, "main"));
}

#[test]
fn multi_line_comment_ignored() {
    let source = r#"
        (* This is a
           multi-line comment *)
        let main = 42
    "#;

    let source = strip_comments(source);
    let tokens = Token::lex(&source).unwrap();
    assert!(!has_ident(&tokens, "multi"));
    assert_eq!(tokens.len(), 4);
}

#[test]
fn inline_comments() {
    let source = r#"
        fun fact n -> (* base case *) if n = 0 then 1
            else n * fact (n - 1) (* recursive case *)
    "#;

    let source = strip_comments(source);
    let tokens = Token::lex(&source).unwrap();

    assert!(has_ident(&tokens, "fact"), "Should have fact token");
    assert!(!has_ident(&tokens, "base"), "Should not have comment tokens");
    assert!(!has_ident(&tokens, "recursive"));
}

#[test]
fn nested_comments() {
    let source = r#"
        (* Outer (* inner *) comment *)
        let main = 1
    "#;

    let source = strip_comments(source);
    let tokens = Token::lex(&source).unwrap();

    assert!(!has_ident(&tokens, "Outer"));
    assert!(!has_ident(&tokens, "inner"));
    assert!(!has_ident(&tokens, "comment"));
}

#[test]
fn comment_markers_inside_strings_are_kept() {
    let source = r#"let s = "(* not a comment *)""#;
    let stripped = strip_comments(source);
    let tokens = Token::lex(&stripped).unwrap();

    assert_eq!(tokens.len(), 4);
    assert!(matches!(&tokens[3], Token::StringLiteral(s) if s.value.contains("not a comment")));
}

#[test]
fn comments_preserve_line_numbers() {
    let source = "(* comment *)\nlet main = in";
    let stripped = strip_comments(source);

    assert!(stripped.contains('\n'));
    assert_eq!(stripped.len(), source.len());

    let tokens = Token::lex(&stripped).unwrap();
    let mut state = ParseState::new(tokens);
    let (_program, errors) = parse(&mut state);

    assert!(!errors.is_empty());
}

#[test]
fn unterminated_comment_swallows_rest() {
    let stripped = strip_comments("let a = 1 (* no end\nlet b = 2");
    let tokens = Token::lex(&stripped).unwrap();
    assert_eq!(tokens.len(), 4);
}

#[test]
fn quote_in_char_literal_does_not_open_a_string() {
    let source = r#"let q = '"' (* don't *) ;; let z = 1"#;
    let tokens = Token::lex(&strip_comments(source)).unwrap();

    assert_eq!(tokens.len(), 9);
    assert!(matches!(&tokens[3], Token::CharLiteral(c) if c.value == r#"'"'"#));
    assert!(!has_ident(&tokens, "don"));
    assert!(has_ident(&tokens, "z"));
}
