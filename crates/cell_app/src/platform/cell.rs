use std::sync::{Arc, OnceLock};

use cell_core::{update, CellState, CellViewModel, DetectorKind, LayoutAttributes, Message, Msg};
use cell_engine::{FetchSettings, ImageLoader};
use cell_logging::{cell_debug, cell_trace};
use thiserror::Error;

use super::effects::EffectRunner;
use super::policy::{AnimationHook, CellPosition, DisplayPolicy, ListContext};
use super::ui::render::{self, RenderCommand};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CellError {
    #[error("MessageCell requires a display policy; none was wired in")]
    MissingDisplayPolicy,
}

/// Receives taps on detector matches inside the cell's label.
pub trait CellDelegate {
    fn did_select_detector(&self, detector: DetectorKind, matched_text: &str);
}

#[derive(Default)]
pub struct MessageCellBuilder {
    display_policy: Option<Arc<dyn DisplayPolicy>>,
    loader: Option<ImageLoader>,
}

impl MessageCellBuilder {
    pub fn display_policy(mut self, policy: Arc<dyn DisplayPolicy>) -> Self {
        self.display_policy = Some(policy);
        self
    }

    /// Uses `loader` for remote images. Without one, every cell built in the
    /// process shares a single default loader and its worker thread.
    pub fn loader(mut self, loader: ImageLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn try_build(self) -> Result<MessageCell, CellError> {
        let display_policy = self
            .display_policy
            .ok_or(CellError::MissingDisplayPolicy)?;
        let loader = self.loader.unwrap_or_else(default_loader);
        Ok(MessageCell {
            state: CellState::new(),
            display_policy,
            effects: EffectRunner::new(loader),
            delegate: None,
            commands: Vec::new(),
        })
    }

    /// # Panics
    ///
    /// Panics when no display policy was supplied. That is a wiring bug, not a
    /// runtime condition.
    pub fn build(self) -> MessageCell {
        match self.try_build() {
            Ok(cell) => cell,
            Err(err) => panic!("{err}"),
        }
    }
}

fn default_loader() -> ImageLoader {
    static DEFAULT_LOADER: OnceLock<ImageLoader> = OnceLock::new();
    DEFAULT_LOADER
        .get_or_init(|| ImageLoader::new(FetchSettings::default()))
        .clone()
}

/// A recyclable list cell showing a caption over a local or remote image.
///
/// All methods must be called from the thread that owns the cell. Remote image
/// completions are only applied inside [`MessageCell::process_pending`].
pub struct MessageCell {
    state: CellState,
    display_policy: Arc<dyn DisplayPolicy>,
    effects: EffectRunner,
    delegate: Option<Arc<dyn CellDelegate>>,
    commands: Vec<RenderCommand>,
}

impl MessageCell {
    pub const REUSE_IDENTIFIER: &'static str = "messagekit.cell.imagetext";

    pub fn builder() -> MessageCellBuilder {
        MessageCellBuilder::default()
    }

    pub fn reuse_identifier(&self) -> &'static str {
        Self::REUSE_IDENTIFIER
    }

    /// Returns the cell to its empty state before the host recycles it.
    pub fn reset(&mut self) {
        self.dispatch(Msg::PrepareForReuse, None);
    }

    pub fn apply_layout(&mut self, attributes: LayoutAttributes) {
        self.dispatch(Msg::ApplyLayout(attributes), None);
    }

    pub fn configure(&mut self, message: &Message, position: CellPosition, context: &ListContext) {
        let style = self
            .display_policy
            .resolve_style(message, position, context);
        let hook = self
            .display_policy
            .animation_hook(message, position, context);
        cell_debug!(
            "Configuring cell for message {} at {}:{}",
            message.message_id,
            position.section,
            position.item
        );
        self.dispatch(
            Msg::Configure {
                message: message.clone(),
                style,
                has_animation_hook: hook.is_some(),
            },
            hook,
        );
    }

    /// Applies every fetch completion that has arrived. Returns how many were handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Some(msg) = self.effects.try_recv() {
            self.dispatch(msg, None);
            handled += 1;
        }
        handled
    }

    pub fn view(&self) -> CellViewModel {
        self.state.view()
    }

    pub fn state(&self) -> &CellState {
        &self.state
    }

    /// Fetches still running on the loader on behalf of this cell.
    pub fn in_flight_fetches(&self) -> usize {
        self.effects.in_flight()
    }

    pub fn take_render_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Forwarded to the label so detector taps reach the host.
    pub fn set_delegate(&mut self, delegate: Option<Arc<dyn CellDelegate>>) {
        self.delegate = delegate;
    }

    /// Entry point for the label when the user taps a detector match.
    /// Taps on detectors this configuration did not enable are dropped.
    pub fn label_did_select(&self, detector: DetectorKind, matched_text: &str) -> bool {
        if !self.state.label().enabled_detectors.contains(&detector) {
            return false;
        }
        match &self.delegate {
            Some(delegate) => {
                delegate.did_select_detector(detector, matched_text);
                true
            }
            None => false,
        }
    }

    fn dispatch(&mut self, msg: Msg, hook: Option<AnimationHook>) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let view = state.view();
        let was_dirty = state.consume_dirty();
        self.state = state;

        let mut hook = hook;
        let mut commands = Vec::new();
        self.effects.run(effects, &mut hook, &view.image_view, &mut commands);
        if hook.is_some() {
            cell_trace!("Animation hook dropped: configuration started no fetch");
        }

        if was_dirty {
            self.commands.extend(render::render(&view));
        }
        self.commands.extend(commands);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::MessageCell;
    use crate::StaticDisplayPolicy;

    #[test]
    fn cells_without_a_loader_share_one_worker() {
        let policy = Arc::new(StaticDisplayPolicy::default());
        let first = MessageCell::builder().display_policy(policy.clone()).build();
        let second = MessageCell::builder().display_policy(policy).build();
        assert!(first
            .effects
            .loader()
            .shares_worker_with(second.effects.loader()));
    }
}
