//! Message cell host: wires the pure cell state machine to the image loader,
//! the display policy and the render command stream.
pub mod platform;

pub use platform::cell::{CellDelegate, CellError, MessageCell, MessageCellBuilder};
pub use platform::config::{AppConfig, ConfigError, FetchConfig, CONFIG_FILENAME};
pub use platform::logging::{LogDestination, LogLevel};
pub use platform::policy::{
    AnimationHook, CellPosition, DisplayPolicy, ListContext, StaticDisplayPolicy,
};
pub use platform::ui::render::{render, RenderCommand};
