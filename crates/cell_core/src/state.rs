use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::view_model::{CellViewModel, ContentMode, ImageView, LabelView, LineBreak};
use crate::{Color, DetectorKind, Font, ImageHandle, Insets, LayoutAttributes, StyleAttributes};

/// Identifies one remote image request issued by a cell configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchToken(u64);

impl FetchToken {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FetchToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fetch#{}", self.0)
    }
}

/// What the cell currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellContentState {
    pub text: Option<String>,
    pub image: Option<ImageHandle>,
    pub is_fetching_remote_image: bool,
    pub active_fetch: Option<FetchToken>,
}

/// Inputs handed to the text-rendering collaborator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelState {
    pub enabled_detectors: BTreeSet<DetectorKind>,
    pub detector_attributes: BTreeMap<DetectorKind, StyleAttributes>,
    pub text_color: Option<Color>,
    pub insets: Insets,
    pub font: Font,
}

impl LabelState {
    /// Attributes a detector match is drawn with. The label text color, once
    /// set, overrides any detector foreground on the same run.
    pub fn resolved_attributes(&self, detector: DetectorKind) -> Option<StyleAttributes> {
        if !self.enabled_detectors.contains(&detector) {
            return None;
        }
        let mut attributes = self
            .detector_attributes
            .get(&detector)
            .copied()
            .unwrap_or_default();
        if let Some(color) = self.text_color {
            attributes.foreground = Some(color);
        }
        Some(attributes)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellState {
    content: CellContentState,
    label: LabelState,
    indicator_animating: bool,
    // Token whose completion should run the policy's animation hook.
    hook_token: Option<FetchToken>,
    next_token: u64,
    dirty: bool,
}

impl Default for CellState {
    fn default() -> Self {
        Self {
            content: CellContentState::default(),
            label: LabelState::default(),
            indicator_animating: false,
            hook_token: None,
            next_token: 1,
            dirty: false,
        }
    }
}

impl CellState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &CellContentState {
        &self.content
    }

    pub fn label(&self) -> &LabelState {
        &self.label
    }

    pub fn active_fetch(&self) -> Option<FetchToken> {
        self.content.active_fetch
    }

    pub fn indicator_animating(&self) -> bool {
        self.indicator_animating
    }

    pub fn view(&self) -> CellViewModel {
        CellViewModel {
            label: LabelView {
                text: self.content.text.clone(),
                enabled_detectors: self.label.enabled_detectors.clone(),
                detector_attributes: self
                    .label
                    .enabled_detectors
                    .iter()
                    .filter_map(|kind| {
                        self.label
                            .resolved_attributes(*kind)
                            .map(|attributes| (*kind, attributes))
                    })
                    .collect(),
                text_color: self.label.text_color,
                insets: self.label.insets,
                font: self.label.font.clone(),
                number_of_lines: 1,
                line_break: LineBreak::TruncatingTail,
            },
            image_view: ImageView {
                image: self.content.image.clone(),
                content_mode: ContentMode::ScaleAspectFill,
            },
            indicator_animating: self.indicator_animating,
            fetching: self.content.is_fetching_remote_image,
            active_fetch: self.content.active_fetch,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Drops the active token, returning it so the caller can cancel the transport.
    pub(crate) fn invalidate_fetch(&mut self) -> Option<FetchToken> {
        self.hook_token = None;
        self.content.is_fetching_remote_image = false;
        self.content.active_fetch.take()
    }

    pub(crate) fn begin_fetch(&mut self, with_hook: bool) -> FetchToken {
        let token = FetchToken(self.next_token);
        self.next_token += 1;
        self.content.active_fetch = Some(token);
        self.content.is_fetching_remote_image = true;
        self.hook_token = with_hook.then_some(token);
        token
    }

    /// Ends the active fetch, reporting whether its completion owes a hook call.
    pub(crate) fn finish_fetch(&mut self) -> bool {
        self.content.active_fetch = None;
        self.content.is_fetching_remote_image = false;
        self.hook_token.take().is_some()
    }

    pub(crate) fn clear_content(&mut self) {
        self.content.text = None;
        self.content.image = None;
        self.label.enabled_detectors.clear();
        self.label.detector_attributes.clear();
        self.label.text_color = None;
    }

    pub(crate) fn content_mut(&mut self) -> &mut CellContentState {
        &mut self.content
    }

    pub(crate) fn label_mut(&mut self) -> &mut LabelState {
        &mut self.label
    }

    pub(crate) fn set_indicator(&mut self, animating: bool) {
        self.indicator_animating = animating;
    }

    pub(crate) fn apply_layout(&mut self, attributes: LayoutAttributes) {
        if self.label.insets != attributes.text_insets || self.label.font != attributes.text_font {
            self.label.insets = attributes.text_insets;
            self.label.font = attributes.text_font;
            self.mark_dirty();
        }
    }
}
