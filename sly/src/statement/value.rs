use crate::show::Color;

/// A color literal `(r, g, b[, a])`. Alpha defaults to 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorLiteral {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// A value as written in source.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(u8),
    Color(ColorLiteral),
    /// A bare identifier, resolved against the scope chain at compile time.
    Reference(String),
}

impl From<ColorLiteral> for Color {
    fn from(literal: ColorLiteral) -> Self {
        Color::rgba(literal.r, literal.g, literal.b, literal.a)
    }
}
