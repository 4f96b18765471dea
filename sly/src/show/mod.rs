use std::fmt;

use serde::{Deserialize, Serialize};

/// The font every block starts with.
pub const DEFAULT_FONT: &str = "Times New Roman";

/// The point size every block starts with.
pub const DEFAULT_FONT_SIZE: u8 = 12;

/// A compiled presentation: an ordered sequence of slides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub slides: Vec<Slide>,
}

impl Show {
    pub fn new() -> Self {
        Show::default()
    }
}

/// One presentation page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub background: Color,
    pub blocks: Vec<Block>,
}

impl Default for Slide {
    fn default() -> Self {
        Slide {
            background: Color::WHITE,
            blocks: Vec::new(),
        }
    }
}

/// A styled unit of text within a slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub text: String,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub font: String,
    pub size: u8,
    pub color: Color,
    pub justification: Justification,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            font: DEFAULT_FONT.to_string(),
            size: DEFAULT_FONT_SIZE,
            color: Color::BLACK,
            justification: Justification::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justification {
    #[default]
    Left,
    Right,
    Center,
}

impl Justification {
    /// Parse one of `left`, `right` or `center`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Justification::Left),
            "right" => Some(Justification::Right),
            "center" => Some(Justification::Center),
            _ => None,
        }
    }
}

impl fmt::Display for Justification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Justification::Left => write!(f, "left"),
            Justification::Right => write!(f, "right"),
            Justification::Center => write!(f, "center"),
        }
    }
}

/// An 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::rgba(r, g, b, 255)
    }

    /// Look up one of the recognized color names.
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "white" => Some(Color::WHITE),
            "black" => Some(Color::BLACK),
            "red" => Some(Color::RED),
            "green" => Some(Color::GREEN),
            "blue" => Some(Color::BLUE),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Something that turns a finished show into a displayable artifact.
pub trait Renderer {
    type Output;
    type Error;

    fn render(&self, show: &Show) -> Result<Self::Output, Self::Error>;
}
