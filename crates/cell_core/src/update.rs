use crate::{
    CellState, Effect, FetchFailure, FetchToken, ImageHandle, Message, MessageData, Msg,
    ResolvedStyle,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: CellState, msg: Msg) -> (CellState, Vec<Effect>) {
    let effects = match msg {
        Msg::PrepareForReuse => prepare_for_reuse(&mut state),
        Msg::ApplyLayout(attributes) => {
            state.apply_layout(attributes);
            Vec::new()
        }
        Msg::Configure {
            message,
            style,
            has_animation_hook,
        } => configure(&mut state, message, style, has_animation_hook),
        Msg::RemoteImageLoaded { token, result } => image_loaded(&mut state, token, result),
    };

    (state, effects)
}

fn prepare_for_reuse(state: &mut CellState) -> Vec<Effect> {
    let before = state.clone();
    let mut effects = Vec::new();
    if let Some(token) = state.invalidate_fetch() {
        effects.push(Effect::CancelFetch { token });
    }
    if state.indicator_animating() {
        state.set_indicator(false);
        effects.push(Effect::StopLoadingIndicator);
    }
    state.clear_content();
    if *state != before {
        state.mark_dirty();
    }
    effects
}

fn configure(
    state: &mut CellState,
    message: Message,
    style: ResolvedStyle,
    has_animation_hook: bool,
) -> Vec<Effect> {
    let mut effects = Vec::with_capacity(3);

    // Invalidate before anything else so a late completion can never match.
    if let Some(token) = state.invalidate_fetch() {
        effects.push(Effect::CancelFetch { token });
    }

    // Started for every variant, including ones that never fetch.
    state.set_indicator(true);
    effects.push(Effect::StartLoadingIndicator);

    state.clear_content();
    let ResolvedStyle {
        text_color,
        enabled_detectors,
        mut detector_attributes,
    } = style;
    detector_attributes.retain(|kind, _| enabled_detectors.contains(kind));
    {
        let label = state.label_mut();
        label.enabled_detectors = enabled_detectors;
        label.detector_attributes = detector_attributes;
    }

    match message.data {
        MessageData::ImageText { text, image } => {
            let content = state.content_mut();
            content.image = Some(image);
            content.text = Some(text);
        }
        MessageData::ShareImage { text, image_url, .. } => {
            state.content_mut().text = Some(text);
            let token = state.begin_fetch(has_animation_hook);
            effects.push(Effect::FetchRemoteImage {
                token,
                url: image_url,
            });
        }
        MessageData::Text(_) | MessageData::Other => {}
    }

    // Applied last: the label color takes precedence over detector styling.
    state.label_mut().text_color = Some(text_color);
    state.mark_dirty();
    effects
}

fn image_loaded(
    state: &mut CellState,
    token: FetchToken,
    result: Result<ImageHandle, FetchFailure>,
) -> Vec<Effect> {
    if state.active_fetch() != Some(token) {
        return Vec::new();
    }

    let owes_hook = state.finish_fetch();
    state.mark_dirty();
    match result {
        Ok(image) => {
            state.content_mut().image = Some(image);
            state.set_indicator(false);
            let mut effects = vec![Effect::StopLoadingIndicator];
            if owes_hook {
                effects.push(Effect::RunAnimationHook { token });
            }
            effects
        }
        // The indicator keeps whatever state it had; nothing is surfaced.
        Err(_) => Vec::new(),
    }
}
