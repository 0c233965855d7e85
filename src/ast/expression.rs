use lachs::Span;

use super::hint::TypeHint;
use super::pattern::Pattern;
use crate::types::{Primitive, Type};

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Const(Const),
    Ident(Ident),
    Tuple(Tuple),
    Unary(Unary),
    Binary(Binary),
    App(App),
    If(If),
    Match(Match),
    Let(Let),
    Fun(Fun),
}

impl Expression {
    pub fn position(&self) -> &Span {
        match self {
            Expression::Const(node) => &node.position,
            Expression::Ident(node) => &node.position,
            Expression::Tuple(node) => &node.position,
            Expression::Unary(node) => &node.position,
            Expression::Binary(node) => &node.position,
            Expression::App(node) => &node.position,
            Expression::If(node) => &node.position,
            Expression::Match(node) => &node.position,
            Expression::Let(node) => &node.position,
            Expression::Fun(node) => &node.position,
        }
    }

    pub fn ty(&self) -> &Type {
        match self {
            Expression::Const(node) => &node.ty,
            Expression::Ident(node) => &node.ty,
            Expression::Tuple(node) => &node.ty,
            Expression::Unary(node) => &node.ty,
            Expression::Binary(node) => &node.ty,
            Expression::App(node) => &node.ty,
            Expression::If(node) => &node.ty,
            Expression::Match(node) => &node.ty,
            Expression::Let(node) => &node.ty,
            Expression::Fun(node) => &node.ty,
        }
    }

    pub fn ty_mut(&mut self) -> &mut Type {
        match self {
            Expression::Const(node) => &mut node.ty,
            Expression::Ident(node) => &mut node.ty,
            Expression::Tuple(node) => &mut node.ty,
            Expression::Unary(node) => &mut node.ty,
            Expression::Binary(node) => &mut node.ty,
            Expression::App(node) => &mut node.ty,
            Expression::If(node) => &mut node.ty,
            Expression::Match(node) => &mut node.ty,
            Expression::Let(node) => &mut node.ty,
            Expression::Fun(node) => &mut node.ty,
        }
    }

    /// Article-prefixed node kind, for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Expression::Const(_) => "a constant",
            Expression::Ident(_) => "an identifier",
            Expression::Tuple(_) => "a tuple",
            Expression::Unary(_) => "a unary operation",
            Expression::Binary(_) => "a binary operation",
            Expression::App(_) => "an application",
            Expression::If(_) => "an if expression",
            Expression::Match(_) => "a match expression",
            Expression::Let(_) => "a let binding",
            Expression::Fun(_) => "a function",
        }
    }

    /// The name a top-level declaration introduces, if any.
    pub fn declared_name(&self) -> Option<&Ident> {
        match self {
            Expression::Let(node) if node.body.is_none() => Some(&node.name),
            Expression::Fun(node) if node.rest.is_none() => node.name.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Unit,
    Int(i64),
    Float(f64),
    Str(String),
    Char(char),
    Bool(bool),
}

impl Literal {
    pub fn primitive(&self) -> Primitive {
        match self {
            Literal::Unit => Primitive::Unit,
            Literal::Int(_) => Primitive::Int,
            Literal::Float(_) => Primitive::Float,
            Literal::Str(_) => Primitive::Str,
            Literal::Char(_) => Primitive::Char,
            Literal::Bool(_) => Primitive::Bool,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Const {
    pub value: Literal,
    pub position: Span,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub value: String,
    pub position: Span,
    pub ty: Type,
}

impl Ident {
    pub fn new(value: impl Into<String>, position: Span) -> Self {
        Ident {
            value: value.into(),
            position,
            ty: Type::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    pub items: Vec<Expression>,
    pub position: Span,
    pub ty: Type,
}

/// Prefix operators. Each one is looked up in the root context under its
/// builtin name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    FNeg,
    Not,
}

impl UnaryOp {
    pub fn builtin_name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "~-",
            UnaryOp::FNeg => "~-.",
            UnaryOp::Not => "not",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::FNeg => "-.",
            UnaryOp::Not => "not",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub op: UnaryOp,
    pub operand: Box<Expression>,
    pub position: Span,
    pub ty: Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    FAdd,
    FSub,
    FMul,
    FDiv,
    Concat,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
}

impl BinaryOp {
    /// Builtin name, which is also the source symbol.
    pub fn builtin_name(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::FAdd => "+.",
            BinaryOp::FSub => "-.",
            BinaryOp::FMul => "*.",
            BinaryOp::FDiv => "/.",
            BinaryOp::Concat => "^",
            BinaryOp::Eq => "=",
            BinaryOp::NotEq => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    /// Source spelling. Binary operators are registered under it too.
    pub fn symbol(self) -> &'static str {
        self.builtin_name()
    }

    /// Binding power; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq
            | BinaryOp::NotEq
            | BinaryOp::Lt
            | BinaryOp::Gt
            | BinaryOp::LtEq
            | BinaryOp::GtEq => 3,
            BinaryOp::Concat => 4,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::FAdd | BinaryOp::FSub => 5,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem | BinaryOp::FMul | BinaryOp::FDiv => 6,
        }
    }

    pub fn is_right_assoc(self) -> bool {
        matches!(self, BinaryOp::Or | BinaryOp::And | BinaryOp::Concat)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub op: BinaryOp,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub position: Span,
    pub ty: Type,
}

/// Curried application `func a1 ... an`, n >= 1.
#[derive(Debug, Clone, PartialEq)]
pub struct App {
    pub func: Box<Expression>,
    pub args: Vec<Expression>,
    pub position: Span,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub condition: Box<Expression>,
    pub then_branch: Box<Expression>,
    pub else_branch: Option<Box<Expression>>,
    pub position: Span,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    pub pattern: Pattern,
    pub body: Expression,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub scrutinee: Box<Expression>,
    pub arms: Vec<MatchArm>,
    pub position: Span,
    pub ty: Type,
}

/// `let name [: hint] = value [in body]`
#[derive(Debug, Clone, PartialEq)]
pub struct Let {
    pub name: Ident,
    pub hint: Option<TypeHint>,
    pub value: Box<Expression>,
    pub body: Option<Box<Expression>>,
    pub position: Span,
    pub ty: Type,
}

/// `fun [name] params [: ret] -> body [in rest]`
///
/// `hint` is the hint for the whole curried function type, assembled by the
/// parser from parameter and return annotations. The node's type is the type
/// of `rest` when present and the function type otherwise; the function type
/// itself is recorded on `name` for named functions.
#[derive(Debug, Clone, PartialEq)]
pub struct Fun {
    pub name: Option<Ident>,
    pub params: Vec<Pattern>,
    pub hint: Option<TypeHint>,
    pub body: Box<Expression>,
    pub rest: Option<Box<Expression>>,
    pub position: Span,
    pub ty: Type,
}
