pub mod error;
pub mod lexer;
pub mod parser;
pub mod show;
pub mod statement;

pub use error::{ErrorBundle, ErrorInfo, Recovered, SlyError, Stage};
pub use lexer::Lexer;
pub use lexer::token::{Token, TokenKind, TokenType};
pub use parser::Parser;
pub use show::{Block, Color, Justification, Renderer, Show, Slide, Style};
pub use statement::Statement;
