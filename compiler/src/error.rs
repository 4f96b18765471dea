use sly::{ErrorInfo, Stage, Token};
use thiserror::Error;

/// A compilation problem with a single statement.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("A slide may only be defined at the top level")]
    SlideOutsideFile,
    #[error("A block may only be defined within a slide")]
    BlockOutsideSlide,
    #[error("Text may only be defined within a block")]
    TextOutsideBlock,
    #[error("Cannot inherit from an undefined slide '{0}'")]
    UndefinedParentSlide(String),
    #[error("Cannot inherit from an undefined block '{0}'")]
    UndefinedParentBlock(String),

    #[error("variable '{0}' already declared in this scope")]
    VariableRedeclared(String),
    #[error("cannot assign to undeclared variable '{0}'")]
    UndeclaredAssignment(String),
    #[error("cannot assign to immutable binding '{name}' (declared on line {line})")]
    ImmutableAssignment { name: String, line: usize },
    #[error("variable '{0}' must be initialized before dereference")]
    UninitializedReference(String),

    #[error("macro '{0}' already declared in this scope")]
    MacroRedeclared(String),
    #[error("macro '{0}' must be defined before use")]
    UndefinedMacro(String),
    #[error("macro expansion exceeded maximum depth of {0}")]
    MacroDepthExceeded(usize),

    #[error("Unrecognized attribute '{0}'")]
    UnknownAttribute(String),
    #[error("{attribute} attribute is only available for {allowed}")]
    MisplacedAttribute {
        attribute: &'static str,
        allowed: &'static str,
    },
    #[error("{attribute} attribute must be either a color tuple or a color name, but was {got}")]
    ExpectedColor {
        attribute: &'static str,
        got: &'static str,
    },
    #[error("Unsupported color '{0}'")]
    UnknownColor(String),
    #[error("justify attribute must be either 'left', 'right', or 'center'")]
    InvalidJustification,
    #[error("font attribute must be a string, but was {0}")]
    ExpectedFontName(&'static str),
    #[error("fontSize attribute must be an integer, but was {0}")]
    ExpectedFontSize(&'static str),
}

impl CompileError {
    /// Attach the statement's token to produce a reportable diagnostic.
    pub fn at(&self, token: &Token) -> ErrorInfo {
        ErrorInfo::new(token.line, self.to_string())
            .at(token.lexeme)
            .in_stage(Stage::Compilation)
            .with_span(token.span.clone())
    }
}
