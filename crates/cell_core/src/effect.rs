use url::Url;

use crate::FetchToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartLoadingIndicator,
    StopLoadingIndicator,
    FetchRemoteImage { token: FetchToken, url: Url },
    /// The token was invalidated; the transport may abort the request.
    CancelFetch { token: FetchToken },
    /// The image for `token` is on screen; run the configuration's hook.
    RunAnimationHook { token: FetchToken },
}
