use std::fmt;
use std::ops::Range;

/// A token's type together with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    // Single character
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Semicolon,
    Colon,
    Dot,
    AtSign,
    DollarSign,
    EqualSign,
    Comma,

    // Keywords
    Let,
    Mut,
    Macro,
    Slide,
    Block,
    SelfKw,

    // Literals
    Identifier(String),
    Text(String),
    String(String),
    Integer(u8),

    Eof,
}

/// Payload-free mirror of [`TokenType`], for matching and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Semicolon,
    Colon,
    Dot,
    AtSign,
    DollarSign,
    EqualSign,
    Comma,
    Let,
    Mut,
    Macro,
    Slide,
    Block,
    SelfKw,
    Identifier,
    Text,
    String,
    Integer,
    Eof,
}

impl TokenType {
    pub fn kind(&self) -> TokenKind {
        match self {
            TokenType::LeftParen => TokenKind::LeftParen,
            TokenType::RightParen => TokenKind::RightParen,
            TokenType::LeftBrace => TokenKind::LeftBrace,
            TokenType::RightBrace => TokenKind::RightBrace,
            TokenType::Semicolon => TokenKind::Semicolon,
            TokenType::Colon => TokenKind::Colon,
            TokenType::Dot => TokenKind::Dot,
            TokenType::AtSign => TokenKind::AtSign,
            TokenType::DollarSign => TokenKind::DollarSign,
            TokenType::EqualSign => TokenKind::EqualSign,
            TokenType::Comma => TokenKind::Comma,
            TokenType::Let => TokenKind::Let,
            TokenType::Mut => TokenKind::Mut,
            TokenType::Macro => TokenKind::Macro,
            TokenType::Slide => TokenKind::Slide,
            TokenType::Block => TokenKind::Block,
            TokenType::SelfKw => TokenKind::SelfKw,
            TokenType::Identifier(_) => TokenKind::Identifier,
            TokenType::Text(_) => TokenKind::Text,
            TokenType::String(_) => TokenKind::String,
            TokenType::Integer(_) => TokenKind::Integer,
            TokenType::Eof => TokenKind::Eof,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::LeftParen => "LeftParen",
            TokenKind::RightParen => "RightParen",
            TokenKind::LeftBrace => "LeftBrace",
            TokenKind::RightBrace => "RightBrace",
            TokenKind::Semicolon => "Semicolon",
            TokenKind::Colon => "Colon",
            TokenKind::Dot => "Dot",
            TokenKind::AtSign => "AtSign",
            TokenKind::DollarSign => "DollarSign",
            TokenKind::EqualSign => "EqualSign",
            TokenKind::Comma => "Comma",
            TokenKind::Let => "Let",
            TokenKind::Mut => "Mut",
            TokenKind::Macro => "Macro",
            TokenKind::Slide => "Slide",
            TokenKind::Block => "Block",
            TokenKind::SelfKw => "Self",
            TokenKind::Identifier => "Identifier",
            TokenKind::Text => "Text",
            TokenKind::String => "String",
            TokenKind::Integer => "Integer",
            TokenKind::Eof => "EOF",
        };
        write!(f, "{}", name)
    }
}

/// An immutable lexeme produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub ty: TokenType,
    /// 1-based line the token starts on.
    pub line: usize,
    /// The character that started the token.
    pub lexeme: char,
    /// Byte span in source.
    pub span: Range<usize>,
}

impl Token {
    pub fn new(ty: TokenType, line: usize, lexeme: char, span: Range<usize>) -> Self {
        Token {
            ty,
            line,
            lexeme,
            span,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.ty.kind()
    }

    /// The identifier name, if this is an identifier token.
    pub fn identifier(&self) -> Option<&str> {
        match &self.ty {
            TokenType::Identifier(name) => Some(name),
            _ => None,
        }
    }
}
