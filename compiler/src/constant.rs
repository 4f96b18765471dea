use std::fmt;

use sly::Color;

/// A fully resolved compile-time value.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Integer(u8),
    String(String),
    Color(Color),
}

impl Constant {
    pub fn type_name(&self) -> &'static str {
        match self {
            Constant::Integer(_) => "Integer",
            Constant::String(_) => "String",
            Constant::Color(_) => "Color",
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Integer(n) => write!(f, "{}", n),
            Constant::String(s) => write!(f, "\"{}\"", s),
            Constant::Color(c) => write!(f, "{}", c),
        }
    }
}
