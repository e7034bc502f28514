//! Message cell core: pure state machine and view-model helpers.
mod effect;
mod image;
mod message;
mod msg;
mod state;
mod style;
mod update;
mod view_model;

pub use effect::Effect;
pub use image::ImageHandle;
pub use message::{Message, MessageData, Sender};
pub use msg::{FetchFailure, Msg};
pub use state::{CellContentState, CellState, FetchToken, LabelState};
pub use style::{
    Color, DetectorKind, Font, Insets, LayoutAttributes, ResolvedStyle, StyleAttributes,
};
pub use update::update;
pub use view_model::{CellViewModel, ContentMode, ImageView, LabelView, LineBreak};
