use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const DARK_GRAY: Color = Color::rgb(85, 85, 85);
    pub const LINK_BLUE: Color = Color::rgb(0, 122, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Text pattern recognizers whose matches get their own styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DetectorKind {
    Address,
    Date,
    PhoneNumber,
    Url,
    TransitInformation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleAttributes {
    pub foreground: Option<Color>,
    pub underline: bool,
    pub bold: bool,
}

/// Styling inputs produced by the display policy for one configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedStyle {
    pub text_color: Color,
    pub enabled_detectors: BTreeSet<DetectorKind>,
    pub detector_attributes: BTreeMap<DetectorKind, StyleAttributes>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl Insets {
    pub const fn uniform(value: f32) -> Self {
        Self {
            top: value,
            left: value,
            bottom: value,
            right: value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub point_size: f32,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "system".to_string(),
            point_size: 17.0,
        }
    }
}

/// Layout values pushed by the list layout, independently of configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutAttributes {
    pub text_insets: Insets,
    pub text_font: Font,
}
