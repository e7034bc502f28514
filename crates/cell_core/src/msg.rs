use crate::{FetchToken, ImageHandle, LayoutAttributes, Message, ResolvedStyle};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Host is about to recycle the cell for another message.
    PrepareForReuse,
    /// Layout pushed new text insets and font.
    ApplyLayout(LayoutAttributes),
    /// Host configures the cell for a message with styling already resolved.
    Configure {
        message: Message,
        style: ResolvedStyle,
        /// Whether the display policy supplied an on-image-ready hook.
        has_animation_hook: bool,
    },
    /// A remote image fetch finished, possibly for an earlier configuration.
    RemoteImageLoaded {
        token: FetchToken,
        result: Result<ImageHandle, FetchFailure>,
    },
}

/// Why a remote image could not be shown. The cell never surfaces these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    Transport(String),
    Decode(String),
}
