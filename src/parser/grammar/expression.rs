//! Expression parsers
//!
//! Prefix forms (`let`, `fun`, `if`, `match`) extend as far to the right as
//! possible. Binary operators are handled by a precedence-climbing loop over
//! [`BinaryOp::precedence`]; prefix operators bind tighter than any binary
//! operator and looser than application.
//!
//! ```text
//! expression  := let | fun | if | match | binary
//! binary      := unary (binop binary)*
//! unary       := ("-" | "-." | "not") unary | application
//! application := atom atom*
//! atom        := ident | constant | "(" ")" | "(" expression ("," expression)* ")"
//! ```

use lachs::Span;

use crate::ast::{
    App, Binary, BinaryOp, Const, Expression, Fun, Ident, If, Let, Literal, Match, MatchArm,
    Pattern, Tuple, TypeHint, Unary, UnaryOp,
};
use crate::lexer::Token;
use crate::parser::combinators::{
    BoxedParser, expect_arrow, expect_colon, expect_comma, expect_else, expect_equals, expect_fun, expect_if,
    expect_in, expect_let, expect_lparen, expect_match, expect_pipe, expect_rparen, expect_then,
    expect_with, lazy, many1, optional, separated1,
};
use crate::parser::state::{ParseState, Parser};
use crate::types::Type;

use super::hint::{hint, hint_tuple};
use super::literal::{constant, ident};
use super::pattern::{param, pattern};

/// An expression in nested position.
pub fn expression() -> BoxedParser<Expression> {
    expr(false)
}

/// An expression in declaration position: program start, after `;;`, or
/// after `in`. Only here may `fun` name a (recursive) function and may
/// `let` omit its body.
pub fn declaration() -> BoxedParser<Expression> {
    expr(true)
}

fn expr(declaration: bool) -> BoxedParser<Expression> {
    BoxedParser::new(move |state: &mut ParseState| match state.peek() {
        Some(Token::Let(_)) => let_expr(declaration).parse(state),
        Some(Token::Fun(_)) => fun_expr(declaration).parse(state),
        Some(Token::If(_)) => if_expr().parse(state),
        Some(Token::KwMatch(_)) => match_expr().parse(state),
        _ => binary_expr(1).parse(state),
    })
}

/// let := "let" ident (":" hint)? "=" expression ("in" declaration)?
///
/// The `in` part is mandatory outside declaration position.
fn let_expr(declaration: bool) -> BoxedParser<Expression> {
    BoxedParser::new(move |state: &mut ParseState| {
        let start = expect_let().parse(state)?.pos();
        let name = ident().label("binding name").parse(state)?;
        let hint = optional(expect_colon() * hint()).parse(state)?;
        expect_equals().parse(state)?;
        let value = expression().parse(state)?;

        let body = if declaration && !matches!(state.peek(), Some(Token::In(_))) {
            None
        } else {
            expect_in().parse(state)?;
            Some(Box::new(expr(true).parse(state)?))
        };

        let end = match &body {
            Some(body) => body.position().clone(),
            None => value.position().clone(),
        };
        Ok(Expression::Let(Let {
            name,
            hint,
            value: Box::new(value),
            body,
            position: start.merge(&end),
            ty: Type::None,
        }))
    })
}

/// fun := "fun" param+ (":" hint_tuple)? "->" expression ("in" declaration)?
fn fun_expr(declaration: bool) -> BoxedParser<Expression> {
    BoxedParser::new(move |state: &mut ParseState| {
        let start = expect_fun().parse(state)?.pos();
        let mut params = many1(param()).label("parameter").parse(state)?;
        let ret = optional(expect_colon() * hint_tuple()).parse(state)?;
        expect_arrow().parse(state)?;
        let body = expression().parse(state)?;

        let name = if declaration { split_name(&mut params) } else { None };

        let rest = if name.is_some() && matches!(state.peek(), Some(Token::In(_))) {
            state.advance();
            Some(Box::new(expr(true).parse(state)?))
        } else {
            None
        };

        let (params, hints): (Vec<Pattern>, Vec<Option<TypeHint>>) = params.into_iter().unzip();
        let end = match &rest {
            Some(rest) => rest.position().clone(),
            None => body.position().clone(),
        };
        Ok(Expression::Fun(Fun {
            name,
            params,
            hint: TypeHint::for_function(hints, ret),
            body: Box::new(body),
            rest,
            position: start.merge(&end),
            ty: Type::None,
        }))
    })
}

/// `fun f x ... ->` names `f` when there are at least two parameters and
/// the first is an unannotated identifier.
fn split_name(params: &mut Vec<(Pattern, Option<TypeHint>)>) -> Option<Ident> {
    if params.len() < 2 || !matches!(params[0], (Pattern::Ident(_), None)) {
        return None;
    }
    match params.remove(0) {
        (Pattern::Ident(name), _) => Some(name),
        _ => None,
    }
}

/// if := "if" expression "then" expression ("else" expression)?
fn if_expr() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = expect_if().parse(state)?.pos();
        let condition = expression().parse(state)?;
        expect_then().parse(state)?;
        let then_branch = expression().parse(state)?;

        let else_branch = match state.peek() {
            Some(Token::Else(_)) => Some(Box::new((expect_else() * expression()).parse(state)?)),
            _ => None,
        };

        let end = match &else_branch {
            Some(branch) => branch.position().clone(),
            None => then_branch.position().clone(),
        };
        Ok(Expression::If(If {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch,
            position: start.merge(&end),
            ty: Type::None,
        }))
    })
}

/// match_arm := pattern "->" expression
fn match_arm() -> BoxedParser<MatchArm> {
    (pattern() + (expect_arrow() * lazy(expression))).map(|(pattern, body)| {
        let position = pattern.position().merge(body.position());
        MatchArm {
            pattern,
            body,
            position,
        }
    })
}

/// match := "match" expression "with" "|"? match_arm ("|" match_arm)*
fn match_expr() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = expect_match().parse(state)?.pos();
        let scrutinee = expression().parse(state)?;
        expect_with().parse(state)?;
        optional(expect_pipe()).parse(state)?;
        let arms = separated1(match_arm(), expect_pipe()).parse(state)?;

        let end = arms
            .last()
            .map(|arm| arm.position.clone())
            .unwrap_or_else(|| start.clone());
        Ok(Expression::Match(Match {
            scrutinee: Box::new(scrutinee),
            arms,
            position: start.merge(&end),
            ty: Type::None,
        }))
    })
}

fn binary_op(token: &Token) -> Option<BinaryOp> {
    let op = match token {
        Token::Plus(_) => BinaryOp::Add,
        Token::Minus(_) => BinaryOp::Sub,
        Token::Star(_) => BinaryOp::Mul,
        Token::Slash(_) => BinaryOp::Div,
        Token::Percent(_) => BinaryOp::Rem,
        Token::PlusDot(_) => BinaryOp::FAdd,
        Token::MinusDot(_) => BinaryOp::FSub,
        Token::StarDot(_) => BinaryOp::FMul,
        Token::SlashDot(_) => BinaryOp::FDiv,
        Token::Caret(_) => BinaryOp::Concat,
        Token::Equals(_) => BinaryOp::Eq,
        Token::NotEquals(_) => BinaryOp::NotEq,
        Token::LessThan(_) => BinaryOp::Lt,
        Token::GreaterThan(_) => BinaryOp::Gt,
        Token::LessEquals(_) => BinaryOp::LtEq,
        Token::GreaterEquals(_) => BinaryOp::GtEq,
        Token::LogicalAnd(_) => BinaryOp::And,
        Token::LogicalOr(_) => BinaryOp::Or,
        _ => return None,
    };
    Some(op)
}

fn starts_prefix_form(token: Option<&Token>) -> bool {
    matches!(
        token,
        Some(Token::Let(_) | Token::Fun(_) | Token::If(_) | Token::KwMatch(_))
    )
}

/// Operators with precedence below `min_precedence` end this level.
fn binary_expr(min_precedence: u8) -> BoxedParser<Expression> {
    BoxedParser::new(move |state: &mut ParseState| {
        let mut left = unary_expr().parse(state)?;

        while let Some(op) = state.peek().and_then(binary_op) {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            state.advance();

            let next = if op.is_right_assoc() {
                precedence
            } else {
                precedence + 1
            };
            // `a + if c then x else y` takes the whole prefix form as operand
            let right = if starts_prefix_form(state.peek()) {
                expression().parse(state)?
            } else {
                binary_expr(next).parse(state)?
            };

            let position = left.position().merge(right.position());
            left = Expression::Binary(Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                position,
                ty: Type::None,
            });
        }

        Ok(left)
    })
}

fn unary_expr() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        let op = match state.peek() {
            Some(Token::Minus(_)) => UnaryOp::Neg,
            Some(Token::MinusDot(_)) => UnaryOp::FNeg,
            Some(Token::Not(_)) => UnaryOp::Not,
            _ => return application().parse(state),
        };
        let start = state.advance().map(|tok| tok.pos()).unwrap_or_default();
        let operand = unary_expr().parse(state)?;
        let position = start.merge(operand.position());
        Ok(Expression::Unary(Unary {
            op,
            operand: Box::new(operand),
            position,
            ty: Type::None,
        }))
    })
}

fn starts_atom(token: Option<&Token>) -> bool {
    matches!(
        token,
        Some(
            Token::Ident(_)
                | Token::Integer(_)
                | Token::Float(_)
                | Token::StringLiteral(_)
                | Token::CharLiteral(_)
                | Token::True(_)
                | Token::False(_)
                | Token::LParen(_)
        )
    )
}

/// Juxtaposed atoms form one curried application.
fn application() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        let func = atom().parse(state)?;
        let mut args = Vec::new();
        while starts_atom(state.peek()) {
            args.push(atom().parse(state)?);
        }

        if args.is_empty() {
            return Ok(func);
        }
        let position = match args.last() {
            Some(last) => func.position().merge(last.position()),
            None => func.position().clone(),
        };
        Ok(Expression::App(App {
            func: Box::new(func),
            args,
            position,
            ty: Type::None,
        }))
    })
}

fn const_expr((value, position): (Literal, Span)) -> Expression {
    Expression::Const(Const {
        value,
        position,
        ty: Type::None,
    })
}

fn atom() -> BoxedParser<Expression> {
    let ident_expr = ident() >> Expression::Ident;
    let literal_expr = constant() >> const_expr;
    (ident_expr | parenthesized() | literal_expr).label("expression")
}

/// "(" ")" is unit, "(" e ")" is grouping, anything with commas is a tuple.
fn parenthesized() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = expect_lparen().parse(state)?.pos();
        if matches!(state.peek(), Some(Token::RParen(_))) {
            let end = expect_rparen().parse(state)?.pos();
            return Ok(const_expr((Literal::Unit, start.merge(&end))));
        }

        let mut items = separated1(lazy(expression), expect_comma()).parse(state)?;
        let end = expect_rparen().parse(state)?.pos();

        if items.len() == 1 {
            return Ok(items.remove(0));
        }
        Ok(Expression::Tuple(Tuple {
            items,
            position: start.merge(&end),
            ty: Type::None,
        }))
    })
}
