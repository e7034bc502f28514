use std::collections::{BTreeMap, BTreeSet};

use cell_core::{Color, DetectorKind, ImageView, Message, ResolvedStyle, StyleAttributes};

/// Called once with the populated image view after a remote image lands.
pub type AnimationHook = Box<dyn FnOnce(&ImageView)>;

/// Where the cell sits in the hosting list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellPosition {
    pub section: usize,
    pub item: usize,
}

/// List-wide facts a display policy may consult.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListContext {
    pub current_sender_id: String,
}

impl ListContext {
    pub fn is_from_current_sender(&self, message: &Message) -> bool {
        message.sender.id == self.current_sender_id
    }
}

/// Decides how a message is styled. Injected into every cell at wiring time.
pub trait DisplayPolicy {
    fn text_color(&self, message: &Message, position: CellPosition, context: &ListContext)
        -> Color;

    fn enabled_detectors(
        &self,
        message: &Message,
        position: CellPosition,
        context: &ListContext,
    ) -> BTreeSet<DetectorKind>;

    fn detector_attributes(
        &self,
        detector: DetectorKind,
        message: &Message,
        position: CellPosition,
    ) -> StyleAttributes;

    fn animation_hook(
        &self,
        _message: &Message,
        _position: CellPosition,
        _context: &ListContext,
    ) -> Option<AnimationHook> {
        None
    }

    /// Collects the styling inputs for one configuration.
    fn resolve_style(
        &self,
        message: &Message,
        position: CellPosition,
        context: &ListContext,
    ) -> ResolvedStyle {
        let enabled_detectors = self.enabled_detectors(message, position, context);
        let detector_attributes = enabled_detectors
            .iter()
            .map(|detector| {
                (
                    *detector,
                    self.detector_attributes(*detector, message, position),
                )
            })
            .collect::<BTreeMap<_, _>>();
        ResolvedStyle {
            text_color: self.text_color(message, position, context),
            enabled_detectors,
            detector_attributes,
        }
    }
}

/// Fixed colors for outgoing and incoming messages, links underlined.
#[derive(Debug, Clone)]
pub struct StaticDisplayPolicy {
    pub outgoing_text: Color,
    pub incoming_text: Color,
    pub detectors: BTreeSet<DetectorKind>,
    pub detector_style: StyleAttributes,
}

impl Default for StaticDisplayPolicy {
    fn default() -> Self {
        Self {
            outgoing_text: Color::WHITE,
            incoming_text: Color::DARK_GRAY,
            detectors: BTreeSet::from([DetectorKind::Url, DetectorKind::PhoneNumber]),
            detector_style: StyleAttributes {
                foreground: Some(Color::LINK_BLUE),
                underline: true,
                bold: false,
            },
        }
    }
}

impl DisplayPolicy for StaticDisplayPolicy {
    fn text_color(
        &self,
        message: &Message,
        _position: CellPosition,
        context: &ListContext,
    ) -> Color {
        if context.is_from_current_sender(message) {
            self.outgoing_text
        } else {
            self.incoming_text
        }
    }

    fn enabled_detectors(
        &self,
        _message: &Message,
        _position: CellPosition,
        _context: &ListContext,
    ) -> BTreeSet<DetectorKind> {
        self.detectors.clone()
    }

    fn detector_attributes(
        &self,
        _detector: DetectorKind,
        _message: &Message,
        _position: CellPosition,
    ) -> StyleAttributes {
        self.detector_style
    }
}
