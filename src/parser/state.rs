use lachs::Span;
use thiserror::Error;

use crate::diagnostics::{Category, Diagnostic};
use crate::lexer::Token;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}{}", details(.expected, .found))]
pub struct ParseError {
    pub message: String,
    pub expected: Vec<String>,
    pub found: Option<String>,
    pub position: Option<Span>,
}

fn details(expected: &[String], found: &Option<String>) -> String {
    match (expected.is_empty(), found) {
        (true, None) => String::new(),
        (true, Some(found)) => format!(": found {found}"),
        (false, None) => format!(": expected {}", expected.join(" or ")),
        (false, Some(found)) => format!(": expected {}, found {found}", expected.join(" or ")),
    }
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            expected: Vec::new(),
            found: None,
            position: None,
        }
    }

    pub fn expected(mut self, what: impl Into<String>) -> Self {
        self.expected.push(what.into());
        self
    }

    pub fn found(mut self, what: impl Into<String>) -> Self {
        self.found = Some(what.into());
        self
    }

    pub fn at(mut self, position: Span) -> Self {
        self.position = Some(position);
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(
            Category::Syntax,
            self.to_string(),
            self.position.clone().unwrap_or_default(),
        )
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

pub struct ParseState {
    tokens: Vec<Token>,
    index: usize,
    /// Error recorded at the largest token index seen so far.
    furthest: Option<(usize, ParseError)>,
    errors: Vec<ParseError>,
}

impl ParseState {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            index: 0,
            furthest: None,
            errors: Vec::new(),
        }
    }

    pub fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    pub fn has_next(&self) -> bool {
        self.index < self.tokens.len()
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn restore(&mut self, position: usize) {
        self.index = position;
    }

    /// Span of the previously consumed token.
    pub fn last_span(&self) -> Span {
        self.index
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(Token::pos)
            .unwrap_or_default()
    }

    /// Remember `err` if it happened at least as far into the input as any
    /// error seen before. Alternatives that fail early do not hide the error
    /// of the alternative that got furthest.
    pub fn record_error(&mut self, err: ParseError) {
        let replace = match &self.furthest {
            Some((index, _)) => self.index >= *index,
            None => true,
        };
        if replace {
            self.furthest = Some((self.index, err));
        }
    }

    pub fn get_furthest_error(&self) -> Option<&ParseError> {
        self.furthest.as_ref().map(|(_, err)| err)
    }

    /// Token index at which the furthest error was recorded.
    pub fn furthest_error_index(&self) -> Option<usize> {
        self.furthest.as_ref().map(|(index, _)| *index)
    }

    pub fn clear_furthest_error(&mut self) {
        self.furthest = None;
    }

    /// Move the furthest error into the reported list and start over.
    pub fn commit_furthest_error(&mut self) {
        if let Some((_, err)) = self.furthest.take() {
            self.errors.push(err);
        }
    }

    pub fn collect_error(&mut self, err: ParseError) {
        self.errors.push(err);
    }

    /// An error describing the current token.
    pub fn error_here(&self, msg: impl Into<String>) -> ParseError {
        match self.peek() {
            Some(tok) => ParseError::new(msg).found(tok.describe()).at(tok.pos()),
            None => ParseError::new(msg).found("end of input").at(self.last_span()),
        }
    }

    pub fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }
}

pub trait Parser<T>: Sized {
    fn parse(&self, state: &mut ParseState) -> ParseResult<T>;
}

impl<T, F: Fn(&mut ParseState) -> ParseResult<T>> Parser<T> for F {
    fn parse(&self, state: &mut ParseState) -> ParseResult<T> {
        self(state)
    }
}
