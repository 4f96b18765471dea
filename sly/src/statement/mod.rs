pub mod value;

use crate::lexer::token::Token;
use crate::statement::value::Value;

/// A single parsed statement.
///
/// `token` is the token that introduced the statement, kept for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `slide name [: parent] { ... }`
    Slide {
        token: Token,
        name: String,
        parent: Option<String>,
        body: Vec<Statement>,
    },
    /// `block name [: parent] { ... }`
    Block {
        token: Token,
        name: String,
        parent: Option<String>,
        body: Vec<Statement>,
    },
    /// `macro name() { ... }`
    Macro {
        token: Token,
        name: String,
        body: Vec<Statement>,
    },
    /// `$name();`
    MacroCall { token: Token, name: String },
    /// `let name = value;` or `mut name = value;`
    VariableDeclaration {
        token: Token,
        name: String,
        mutable: bool,
        value: Value,
    },
    /// `name = value;`
    VariableAssignment {
        token: Token,
        name: String,
        value: Value,
    },
    /// `self.name = value;`
    AttributeAssignment {
        token: Token,
        name: String,
        value: Value,
    },
    /// `---text---`
    Text { token: Token, text: String },
}

impl Statement {
    pub fn token(&self) -> &Token {
        match self {
            Statement::Slide { token, .. } => token,
            Statement::Block { token, .. } => token,
            Statement::Macro { token, .. } => token,
            Statement::MacroCall { token, .. } => token,
            Statement::VariableDeclaration { token, .. } => token,
            Statement::VariableAssignment { token, .. } => token,
            Statement::AttributeAssignment { token, .. } => token,
            Statement::Text { token, .. } => token,
        }
    }

    pub fn line(&self) -> usize {
        self.token().line
    }
}
