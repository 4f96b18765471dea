use tracing::debug;

use crate::error::{ErrorBundle, ErrorInfo, Recovered, Stage};
use crate::lexer::token::{Token, TokenKind, TokenType};
use crate::statement::Statement;
use crate::statement::value::{ColorLiteral, Value};

/// Parser entry point.
pub struct Parser {
    tokens: Vec<Token>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens }
    }

    /// Parse the token stream into top-level statements.
    ///
    /// A malformed statement is recorded, the tokens through the next `;` are
    /// discarded, and parsing resumes. On failure the statements parsed around
    /// the bad ones are returned with the bundle.
    pub fn parse(self) -> Result<Vec<Statement>, Recovered<Vec<Statement>>> {
        let mut state = ParseState::new(self.tokens);
        let mut statements = Vec::new();

        while !state.at_end() {
            match state.declaration() {
                Ok(statement) => statements.push(statement),
                Err(error) => {
                    state.errors.add(error);
                    state.synchronize();
                }
            }
        }

        debug!(
            statements = statements.len(),
            errors = state.errors.len(),
            "parsing finished"
        );
        state.errors.into_result(statements)
    }
}

// ---------------------------------------------------------------------------
// Parse state
// ---------------------------------------------------------------------------

struct ParseState {
    tokens: Vec<Token>,
    pos: usize,
    /// Returned by `peek` once the stream is exhausted.
    eof: Token,
    errors: ErrorBundle,
}

impl ParseState {
    fn new(tokens: Vec<Token>) -> Self {
        let eof = match tokens.last() {
            Some(last) => Token::new(TokenType::Eof, last.line, '\0', last.span.end..last.span.end),
            None => Token::new(TokenType::Eof, 1, '\0', 0..0),
        };
        ParseState {
            tokens,
            pos: 0,
            eof,
            errors: ErrorBundle::new(),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.at_end() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.at_end() && self.peek().kind() == kind
    }

    fn eat_if(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn try_eat(&mut self, kind: TokenKind) -> Result<Token, ErrorInfo> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        Err(self.expected(kind))
    }

    fn expect_identifier(&mut self) -> Result<String, ErrorInfo> {
        let TokenType::Identifier(name) = &self.peek().ty else {
            return Err(self.expected(TokenKind::Identifier));
        };
        let name = name.clone();
        self.advance();
        Ok(name)
    }

    fn expected(&self, kind: TokenKind) -> ErrorInfo {
        let actual = self.peek();
        token_error(
            actual,
            format!("Expected {}, but was {}", kind, actual.kind()),
        )
    }

    /// Discard tokens up to and including the next semicolon.
    fn synchronize(&mut self) {
        while !self.at_end() {
            if self.advance().kind() == TokenKind::Semicolon {
                return;
            }
        }
    }

    // ------------------------------------------------------------------
    // Grammar
    // ------------------------------------------------------------------

    fn declaration(&mut self) -> Result<Statement, ErrorInfo> {
        if let TokenType::Text(text) = &self.peek().ty {
            let text = text.clone();
            let token = self.advance();
            return Ok(Statement::Text { token, text });
        }

        self.scoped()
    }

    /// `slide`, `block` and `macro` declarations.
    fn scoped(&mut self) -> Result<Statement, ErrorInfo> {
        match self.peek().kind() {
            TokenKind::Slide | TokenKind::Block | TokenKind::Macro => {}
            _ => return self.call(),
        }

        let token = self.advance();
        let name = self.expect_identifier()?;

        let mut parent = None;
        if token.kind() == TokenKind::Macro {
            // TODO: macro parameters, once the compiler can bind them
            self.try_eat(TokenKind::LeftParen)?;
            self.try_eat(TokenKind::RightParen)?;
        } else if self.eat_if(TokenKind::Colon) {
            parent = Some(self.expect_identifier()?);
        }

        let body = self.body(&token, &name)?;

        Ok(match token.kind() {
            TokenKind::Slide => Statement::Slide {
                token,
                name,
                parent,
                body,
            },
            TokenKind::Block => Statement::Block {
                token,
                name,
                parent,
                body,
            },
            _ => Statement::Macro { token, name, body },
        })
    }

    /// `{ statement* }`, recovering from bad statements inside.
    fn body(&mut self, opener: &Token, name: &str) -> Result<Vec<Statement>, ErrorInfo> {
        self.try_eat(TokenKind::LeftBrace)?;

        let mut body = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.at_end() {
            match self.declaration() {
                Ok(statement) => body.push(statement),
                Err(error) => {
                    self.errors.add(error);
                    self.synchronize();
                }
            }
        }

        if self.at_end() {
            return Err(token_error(
                opener,
                format!("Expected RightBrace to close '{}', but was EOF", name),
            ));
        }
        self.advance();

        Ok(body)
    }

    /// `$name();`
    fn call(&mut self) -> Result<Statement, ErrorInfo> {
        if !self.check(TokenKind::DollarSign) {
            return self.assignment();
        }

        let token = self.advance();
        let name = self.expect_identifier()?;
        self.try_eat(TokenKind::LeftParen)?;
        self.try_eat(TokenKind::RightParen)?;
        self.try_eat(TokenKind::Semicolon)?;

        Ok(Statement::MacroCall { token, name })
    }

    /// Variable declarations, reassignments and attribute assignments.
    fn assignment(&mut self) -> Result<Statement, ErrorInfo> {
        let token = self.peek().clone();

        let target = match token.kind() {
            TokenKind::Let | TokenKind::Mut => {
                self.advance();
                Target::Declaration
            }
            TokenKind::SelfKw => {
                self.advance();
                self.try_eat(TokenKind::Dot)?;
                Target::Attribute
            }
            TokenKind::Identifier => Target::Variable,
            other => {
                return Err(token_error(&token, format!("Unexpected token {}", other)));
            }
        };

        let name = self.expect_identifier()?;
        self.try_eat(TokenKind::EqualSign)?;
        let value = self.value()?;
        self.try_eat(TokenKind::Semicolon)?;

        Ok(match target {
            Target::Declaration => Statement::VariableDeclaration {
                mutable: token.kind() == TokenKind::Mut,
                token,
                name,
                value,
            },
            Target::Attribute => Statement::AttributeAssignment { token, name, value },
            Target::Variable => Statement::VariableAssignment { token, name, value },
        })
    }

    fn value(&mut self) -> Result<Value, ErrorInfo> {
        if self.eat_if(TokenKind::LeftParen) {
            return self.color_literal();
        }

        let value = match &self.peek().ty {
            TokenType::String(s) => Value::String(s.clone()),
            TokenType::Integer(n) => Value::Integer(*n),
            TokenType::Identifier(name) => Value::Reference(name.clone()),
            _ => return Err(token_error(self.peek(), "Expected value")),
        };
        self.advance();

        Ok(value)
    }

    /// `(r, g, b[, a][,])`. The opening parenthesis has already been consumed.
    fn color_literal(&mut self) -> Result<Value, ErrorInfo> {
        let r = self.color_component()?;
        self.color_punctuation(TokenKind::Comma)?;
        let g = self.color_component()?;
        self.color_punctuation(TokenKind::Comma)?;
        let b = self.color_component()?;

        let mut a = 255;
        if self.eat_if(TokenKind::Comma) {
            if let TokenType::Integer(alpha) = self.peek().ty {
                a = alpha;
                self.advance();
                self.eat_if(TokenKind::Comma);
            }
        }
        self.color_punctuation(TokenKind::RightParen)?;

        Ok(Value::Color(ColorLiteral { r, g, b, a }))
    }

    fn color_component(&mut self) -> Result<u8, ErrorInfo> {
        match self.peek().ty {
            TokenType::Integer(n) => {
                self.advance();
                Ok(n)
            }
            _ => Err(self.malformed_color(TokenKind::Integer)),
        }
    }

    fn color_punctuation(&mut self, kind: TokenKind) -> Result<(), ErrorInfo> {
        if self.eat_if(kind) {
            Ok(())
        } else {
            Err(self.malformed_color(kind))
        }
    }

    fn malformed_color(&self, expected: TokenKind) -> ErrorInfo {
        let actual = self.peek();
        token_error(
            actual,
            format!(
                "Malformed color literal: expected {}, but was {}",
                expected,
                actual.kind()
            ),
        )
    }
}

/// What the left-hand side of an `=` statement names.
enum Target {
    Declaration,
    Attribute,
    Variable,
}

fn token_error(token: &Token, message: impl Into<String>) -> ErrorInfo {
    let error = ErrorInfo::new(token.line, message)
        .in_stage(Stage::Parsing)
        .with_span(token.span.clone());
    if token.kind() == TokenKind::Eof {
        error
    } else {
        error.at(token.lexeme)
    }
}
