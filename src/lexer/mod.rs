use lachs::Span;

#[lachs::token]
pub enum Token {
    #[terminal("let")]
    Let,
    #[terminal("in")]
    In,
    #[terminal("fun")]
    Fun,
    #[terminal("if")]
    If,
    #[terminal("then")]
    Then,
    #[terminal("else")]
    Else,
    // `Match` is taken by the generated lexer's regex import
    #[terminal("match")]
    KwMatch,
    #[terminal("with")]
    With,
    #[terminal("true")]
    True,
    #[terminal("false")]
    False,
    #[terminal("not")]
    Not,
    #[literal("[a-zA-Z][a-zA-Z0-9_']*|_[a-zA-Z0-9_']+")]
    Ident,
    #[literal("'[a-z][a-zA-Z0-9_]*")]
    TypeVarName,
    #[literal(r"[0-9]+\.[0-9]+")]
    Float,
    #[literal("[0-9]+")]
    Integer,
    #[literal(r#""([^"\\]|\\.)*""#)]
    StringLiteral,
    #[literal(r"'([^'\\]|\\.)'")]
    CharLiteral,
    #[terminal("=")]
    Equals,
    #[terminal("<>")]
    NotEquals,
    #[terminal("<")]
    LessThan,
    #[terminal(">")]
    GreaterThan,
    #[terminal("<=")]
    LessEquals,
    #[terminal(">=")]
    GreaterEquals,
    #[terminal("+")]
    Plus,
    #[terminal("-")]
    Minus,
    #[terminal("*")]
    Star,
    #[terminal("/")]
    Slash,
    #[terminal("%")]
    Percent,
    #[terminal("+.")]
    PlusDot,
    #[terminal("-.")]
    MinusDot,
    #[terminal("*.")]
    StarDot,
    #[terminal("/.")]
    SlashDot,
    #[terminal("^")]
    Caret,
    #[terminal("&&")]
    LogicalAnd,
    #[terminal("||")]
    LogicalOr,
    #[terminal("->")]
    Arrow,
    #[terminal("|")]
    Pipe,
    #[terminal(",")]
    Comma,
    #[terminal("(")]
    LParen,
    #[terminal(")")]
    RParen,
    #[terminal(":")]
    Colon,
    #[terminal("_")]
    Underscore,
    #[terminal(";;")]
    DoubleSemicolon,
}

impl Token {
    pub fn pos(&self) -> Span {
        match self {
            Token::Let(inner) => inner.position.clone(),
            Token::In(inner) => inner.position.clone(),
            Token::Fun(inner) => inner.position.clone(),
            Token::If(inner) => inner.position.clone(),
            Token::Then(inner) => inner.position.clone(),
            Token::Else(inner) => inner.position.clone(),
            Token::KwMatch(inner) => inner.position.clone(),
            Token::With(inner) => inner.position.clone(),
            Token::True(inner) => inner.position.clone(),
            Token::False(inner) => inner.position.clone(),
            Token::Not(inner) => inner.position.clone(),
            Token::Ident(inner) => inner.position.clone(),
            Token::TypeVarName(inner) => inner.position.clone(),
            Token::Float(inner) => inner.position.clone(),
            Token::Integer(inner) => inner.position.clone(),
            Token::StringLiteral(inner) => inner.position.clone(),
            Token::CharLiteral(inner) => inner.position.clone(),
            Token::Equals(inner) => inner.position.clone(),
            Token::NotEquals(inner) => inner.position.clone(),
            Token::LessThan(inner) => inner.position.clone(),
            Token::GreaterThan(inner) => inner.position.clone(),
            Token::LessEquals(inner) => inner.position.clone(),
            Token::GreaterEquals(inner) => inner.position.clone(),
            Token::Plus(inner) => inner.position.clone(),
            Token::Minus(inner) => inner.position.clone(),
            Token::Star(inner) => inner.position.clone(),
            Token::Slash(inner) => inner.position.clone(),
            Token::Percent(inner) => inner.position.clone(),
            Token::PlusDot(inner) => inner.position.clone(),
            Token::MinusDot(inner) => inner.position.clone(),
            Token::StarDot(inner) => inner.position.clone(),
            Token::SlashDot(inner) => inner.position.clone(),
            Token::Caret(inner) => inner.position.clone(),
            Token::LogicalAnd(inner) => inner.position.clone(),
            Token::LogicalOr(inner) => inner.position.clone(),
            Token::Arrow(inner) => inner.position.clone(),
            Token::Pipe(inner) => inner.position.clone(),
            Token::Comma(inner) => inner.position.clone(),
            Token::LParen(inner) => inner.position.clone(),
            Token::RParen(inner) => inner.position.clone(),
            Token::Colon(inner) => inner.position.clone(),
            Token::Underscore(inner) => inner.position.clone(),
            Token::DoubleSemicolon(inner) => inner.position.clone(),
        }
    }

    /// Returns a human-readable description of the token
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(inner) => format!("identifier '{}'", inner.value),
            Token::TypeVarName(inner) => format!("type variable {}", inner.value),
            Token::Float(inner) => format!("float '{}'", inner.value),
            Token::Integer(inner) => format!("integer '{}'", inner.value),
            Token::StringLiteral(inner) => format!("string {}", inner.value),
            Token::CharLiteral(inner) => format!("char {}", inner.value),
            other => format!("'{}'", other.symbol()),
        }
    }

    /// Source text of fixed tokens. Literal tokens return an empty string.
    fn symbol(&self) -> &'static str {
        match self {
            Token::Let(_) => "let",
            Token::In(_) => "in",
            Token::Fun(_) => "fun",
            Token::If(_) => "if",
            Token::Then(_) => "then",
            Token::Else(_) => "else",
            Token::KwMatch(_) => "match",
            Token::With(_) => "with",
            Token::True(_) => "true",
            Token::False(_) => "false",
            Token::Not(_) => "not",
            Token::Equals(_) => "=",
            Token::NotEquals(_) => "<>",
            Token::LessThan(_) => "<",
            Token::GreaterThan(_) => ">",
            Token::LessEquals(_) => "<=",
            Token::GreaterEquals(_) => ">=",
            Token::Plus(_) => "+",
            Token::Minus(_) => "-",
            Token::Star(_) => "*",
            Token::Slash(_) => "/",
            Token::Percent(_) => "%",
            Token::PlusDot(_) => "+.",
            Token::MinusDot(_) => "-.",
            Token::StarDot(_) => "*.",
            Token::SlashDot(_) => "/.",
            Token::Caret(_) => "^",
            Token::LogicalAnd(_) => "&&",
            Token::LogicalOr(_) => "||",
            Token::Arrow(_) => "->",
            Token::Pipe(_) => "|",
            Token::Comma(_) => ",",
            Token::LParen(_) => "(",
            Token::RParen(_) => ")",
            Token::Colon(_) => ":",
            Token::Underscore(_) => "_",
            Token::DoubleSemicolon(_) => ";;",
            Token::Ident(_)
            | Token::TypeVarName(_)
            | Token::Float(_)
            | Token::Integer(_)
            | Token::StringLiteral(_)
            | Token::CharLiteral(_) => "",
        }
    }
}

/// Blank out `(* ... *)` comments, which may nest.
///
/// Every removed character is replaced by a space (newlines are kept), so
/// spans computed on the result still point into the original source.
/// Comment markers inside string and char literals are left alone.
pub fn strip_comments(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut depth = 0usize;
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if depth == 0 && in_string {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = next {
                    out.push(escaped);
                    i += 1;
                }
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        if c == '(' && next == Some('*') {
            depth += 1;
            out.push_str("  ");
            i += 2;
            continue;
        }

        if depth > 0 {
            if c == '*' && next == Some(')') {
                depth -= 1;
                out.push_str("  ");
                i += 2;
            } else {
                out.push(if c == '\n' { '\n' } else { ' ' });
                i += 1;
            }
            continue;
        }

        if c == '\'' {
            if let Some(len) = char_literal_len(&chars[i..]) {
                out.extend(&chars[i..i + len]);
                i += len;
                continue;
            }
        }

        if c == '"' {
            in_string = true;
        }
        out.push(c);
        i += 1;
    }

    out
}

/// Length of the char literal (`'x'` or `'\x'`) at the start of `chars`.
fn char_literal_len(chars: &[char]) -> Option<usize> {
    match chars {
        ['\'', '\\', _, '\'', ..] => Some(4),
        ['\'', c, '\'', ..] if *c != '\\' && *c != '\'' => Some(3),
        _ => None,
    }
}
