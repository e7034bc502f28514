use std::sync::{mpsc, Arc};
use std::thread;

use cell_logging::{cell_debug, cell_error, cell_warn};
use tokio_util::sync::CancellationToken;

use crate::fetch::{FetchSettings, ImageFetcher, ReqwestImageFetcher};
use crate::{decode_image, FailureKind, FetchError, LoadedImage, LoaderEvent, RequestTag};

enum LoaderCommand {
    Load {
        tag: RequestTag,
        url: String,
        cancel: CancellationToken,
        reply: mpsc::Sender<LoaderEvent>,
    },
}

/// Handle to a background thread that runs image loads on its own tokio runtime.
///
/// Clones share the same worker. The worker exits once every clone is dropped,
/// aborting whatever is still in flight.
#[derive(Clone)]
pub struct ImageLoader {
    cmd_tx: Arc<mpsc::Sender<LoaderCommand>>,
}

/// Cancels one load. Dropping the handle does not cancel.
#[derive(Debug, Clone)]
pub struct FetchHandle {
    tag: RequestTag,
    cancel: CancellationToken,
}

impl FetchHandle {
    pub fn tag(&self) -> RequestTag {
        self.tag
    }

    /// Aborts the request if it is still running and suppresses its completion.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl ImageLoader {
    pub fn new(settings: FetchSettings) -> Self {
        Self::with_fetcher(Arc::new(ReqwestImageFetcher::new(settings)))
    }

    pub fn with_fetcher(fetcher: Arc<dyn ImageFetcher>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    cell_error!("Failed to start image loader runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let fetcher = fetcher.clone();
                runtime.spawn(async move {
                    handle_command(fetcher.as_ref(), command).await;
                });
            }
            cell_debug!("Image loader shutting down");
        });

        Self {
            cmd_tx: Arc::new(cmd_tx),
        }
    }

    /// True when both handles drive the same worker thread.
    pub fn shares_worker_with(&self, other: &ImageLoader) -> bool {
        Arc::ptr_eq(&self.cmd_tx, &other.cmd_tx)
    }

    /// Starts loading `url`. The single completion, if any, goes to `reply`.
    pub fn load(
        &self,
        tag: RequestTag,
        url: impl Into<String>,
        reply: mpsc::Sender<LoaderEvent>,
    ) -> FetchHandle {
        let cancel = CancellationToken::new();
        let handle = FetchHandle {
            tag,
            cancel: cancel.clone(),
        };
        let command = LoaderCommand::Load {
            tag,
            url: url.into(),
            cancel,
            reply,
        };
        if self.cmd_tx.send(command).is_err() {
            cell_warn!("Image loader is gone; load {} dropped", tag);
        }
        handle
    }
}

async fn handle_command(fetcher: &dyn ImageFetcher, command: LoaderCommand) {
    match command {
        LoaderCommand::Load {
            tag,
            url,
            cancel,
            reply,
        } => {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    cell_debug!("Load {} cancelled before completion", tag);
                    return;
                }
                result = fetch_and_decode(fetcher, &url) => result,
            };
            if cancel.is_cancelled() {
                cell_debug!("Load {} finished after cancellation; dropped", tag);
                return;
            }
            let _ = reply.send(LoaderEvent::Completed { tag, result });
        }
    }
}

async fn fetch_and_decode(
    fetcher: &dyn ImageFetcher,
    url: &str,
) -> Result<LoadedImage, FetchError> {
    let output = fetcher.fetch(url).await?;
    let metadata = output.metadata;
    let bytes = output.bytes;
    let image = tokio::task::spawn_blocking(move || decode_image(&bytes))
        .await
        .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?
        .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
    Ok(LoadedImage { image, metadata })
}
