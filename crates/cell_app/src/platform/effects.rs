use std::collections::HashMap;
use std::sync::mpsc;

use cell_core::{Effect, FetchFailure, FetchToken, ImageHandle, ImageView, Msg};
use cell_engine::{FailureKind, FetchError, FetchHandle, ImageLoader, LoadedImage, LoaderEvent};
use cell_logging::{cell_debug, cell_trace, cell_warn};

use super::policy::AnimationHook;
use super::ui::render::RenderCommand;

/// Executes cell effects against the image loader and collects indicator commands.
pub(crate) struct EffectRunner {
    loader: ImageLoader,
    reply_tx: mpsc::Sender<LoaderEvent>,
    reply_rx: mpsc::Receiver<LoaderEvent>,
    in_flight: HashMap<FetchToken, FetchHandle>,
    hooks: HashMap<FetchToken, AnimationHook>,
}

impl EffectRunner {
    pub(crate) fn new(loader: ImageLoader) -> Self {
        let (reply_tx, reply_rx) = mpsc::channel();
        Self {
            loader,
            reply_tx,
            reply_rx,
            in_flight: HashMap::new(),
            hooks: HashMap::new(),
        }
    }

    /// `pending_hook` belongs to the configuration that produced `effects` and is
    /// bound to the fetch it starts, if any.
    pub(crate) fn run(
        &mut self,
        effects: Vec<Effect>,
        pending_hook: &mut Option<AnimationHook>,
        image_view: &ImageView,
        commands: &mut Vec<RenderCommand>,
    ) {
        for effect in effects {
            match effect {
                Effect::StartLoadingIndicator => commands.push(RenderCommand::StartIndicator),
                Effect::StopLoadingIndicator => commands.push(RenderCommand::StopIndicator),
                Effect::FetchRemoteImage { token, url } => {
                    cell_debug!("Fetching remote image {} from {}", token, url);
                    let handle = self
                        .loader
                        .load(token.get(), url.as_str(), self.reply_tx.clone());
                    self.in_flight.insert(token, handle);
                    if let Some(hook) = pending_hook.take() {
                        self.hooks.insert(token, hook);
                    }
                }
                Effect::CancelFetch { token } => {
                    if let Some(handle) = self.in_flight.remove(&token) {
                        cell_debug!("Cancelling remote image {}", token);
                        handle.cancel();
                    }
                    self.hooks.remove(&token);
                }
                Effect::RunAnimationHook { token } => {
                    if let Some(hook) = self.hooks.remove(&token) {
                        cell_trace!("Running image-ready hook for {}", token);
                        hook(image_view);
                    }
                }
            }
        }
    }

    /// Next completed fetch, translated into a cell message. Completions for
    /// tokens that were already cancelled or superseded are discarded here.
    pub(crate) fn try_recv(&mut self) -> Option<Msg> {
        loop {
            let LoaderEvent::Completed { tag, result } = self.reply_rx.try_recv().ok()?;
            let token = FetchToken::from_raw(tag);
            if self.in_flight.remove(&token).is_none() {
                cell_debug!("Discarding stale completion for {}", token);
                self.hooks.remove(&token);
                continue;
            }
            return Some(self.completion(token, result));
        }
    }

    fn completion(&mut self, token: FetchToken, result: Result<LoadedImage, FetchError>) -> Msg {
        let result = match result {
            Ok(loaded) => {
                ImageHandle::from_rgba(loaded.image.width, loaded.image.height, loaded.image.rgba)
                    .ok_or_else(|| FetchFailure::Decode("pixel buffer size mismatch".to_string()))
            }
            Err(err) => {
                cell_warn!("Remote image {} failed: {}", token, err);
                Err(match err.kind {
                    FailureKind::Decode => FetchFailure::Decode(err.message),
                    _ => FetchFailure::Transport(err.to_string()),
                })
            }
        };
        if result.is_err() {
            self.hooks.remove(&token);
        }
        Msg::RemoteImageLoaded { token, result }
    }

    #[cfg(test)]
    pub(crate) fn loader(&self) -> &ImageLoader {
        &self.loader
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}
