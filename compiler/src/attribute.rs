use sly::{Color, Justification};

use crate::constant::Constant;
use crate::environment::{ScopeKind, Target};
use crate::error::CompileError;

/// An attribute settable with `self.<name> = value;`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    BackgroundColor,
    Justify,
    Font,
    FontColor,
    FontSize,
}

impl Attribute {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "backgroundColor" => Some(Attribute::BackgroundColor),
            "justify" => Some(Attribute::Justify),
            "font" => Some(Attribute::Font),
            "fontColor" => Some(Attribute::FontColor),
            "fontSize" => Some(Attribute::FontSize),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Attribute::BackgroundColor => "backgroundColor",
            Attribute::Justify => "justify",
            Attribute::Font => "font",
            Attribute::FontColor => "fontColor",
            Attribute::FontSize => "fontSize",
        }
    }

    /// The only kind of scope the attribute may be set in.
    pub fn scope(self) -> ScopeKind {
        match self {
            Attribute::BackgroundColor => ScopeKind::Slide,
            _ => ScopeKind::Block,
        }
    }

    fn misplaced(self) -> CompileError {
        CompileError::MisplacedAttribute {
            attribute: self.name(),
            allowed: match self.scope() {
                ScopeKind::Slide => "slides",
                _ => "blocks",
            },
        }
    }

    /// Coerce `value` to the attribute's type and store it on `target`.
    ///
    /// Fails without touching `target` when the attribute does not belong to
    /// its kind of scope.
    pub fn apply(self, target: &mut Target, value: Constant) -> Result<(), CompileError> {
        match (self, target) {
            (Attribute::BackgroundColor, Target::Slide(slide)) => {
                slide.background = self.color(value)?;
            }
            (Attribute::FontColor, Target::Block(block)) => {
                block.style.color = self.color(value)?;
            }
            (Attribute::Justify, Target::Block(block)) => {
                block.style.justification = match value {
                    Constant::String(name) => Justification::from_name(&name)
                        .ok_or(CompileError::InvalidJustification)?,
                    _ => return Err(CompileError::InvalidJustification),
                };
            }
            (Attribute::Font, Target::Block(block)) => {
                block.style.font = match value {
                    Constant::String(font) => font,
                    other => return Err(CompileError::ExpectedFontName(other.type_name())),
                };
            }
            (Attribute::FontSize, Target::Block(block)) => {
                block.style.size = match value {
                    Constant::Integer(size) => size,
                    other => return Err(CompileError::ExpectedFontSize(other.type_name())),
                };
            }
            // Slide attributes outside a slide, block attributes outside a block
            (attribute, _) => return Err(attribute.misplaced()),
        }

        Ok(())
    }

    fn color(self, value: Constant) -> Result<Color, CompileError> {
        match value {
            Constant::Color(color) => Ok(color),
            Constant::String(name) => {
                Color::named(&name).ok_or(CompileError::UnknownColor(name))
            }
            other => Err(CompileError::ExpectedColor {
                attribute: self.name(),
                got: other.type_name(),
            }),
        }
    }
}
