use std::collections::{BTreeMap, BTreeSet};

use crate::{Color, DetectorKind, FetchToken, Font, ImageHandle, Insets, StyleAttributes};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineBreak {
    #[default]
    TruncatingTail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentMode {
    #[default]
    ScaleAspectFill,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelView {
    pub text: Option<String>,
    pub enabled_detectors: BTreeSet<DetectorKind>,
    /// Per-detector attributes with the text color already folded in.
    pub detector_attributes: BTreeMap<DetectorKind, StyleAttributes>,
    pub text_color: Option<Color>,
    pub insets: Insets,
    pub font: Font,
    pub number_of_lines: u32,
    pub line_break: LineBreak,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageView {
    pub image: Option<ImageHandle>,
    pub content_mode: ContentMode,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellViewModel {
    pub label: LabelView,
    pub image_view: ImageView,
    pub indicator_animating: bool,
    pub fetching: bool,
    pub active_fetch: Option<FetchToken>,
    pub dirty: bool,
}
