use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use explorer_logging::{explorer_debug, explorer_info};
use tokio::sync::mpsc as async_mpsc;
use tokio_util::sync::CancellationToken;

use crate::client::ApiClient;
use crate::{ApiRequest, EngineEvent};

/// Receives every completed request.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Runs backend requests on a background Tokio runtime.
///
/// Requests are executed concurrently and their events arrive in completion
/// order, not submission order.
pub struct EngineHandle {
    cmd_tx: async_mpsc::UnboundedSender<ApiRequest>,
    event_rx: Option<mpsc::Receiver<EngineEvent>>,
    shutdown: CancellationToken,
}

impl EngineHandle {
    /// Events are queued internally and read with `try_recv`/`recv_timeout`.
    pub fn new(client: Arc<dyn ApiClient>) -> io::Result<Self> {
        let (event_tx, event_rx) = mpsc::channel();
        let mut handle = Self::with_sink(client, Arc::new(ChannelEventSink::new(event_tx)))?;
        handle.event_rx = Some(event_rx);
        Ok(handle)
    }

    /// Events are pushed to `sink` from the runtime threads.
    pub fn with_sink(client: Arc<dyn ApiClient>, sink: Arc<dyn EventSink>) -> io::Result<Self> {
        let (cmd_tx, mut cmd_rx) = async_mpsc::unbounded_channel::<ApiRequest>();
        let shutdown = CancellationToken::new();
        let runtime = tokio::runtime::Runtime::new()?;
        let token = shutdown.clone();

        thread::Builder::new()
            .name("explorer-engine".into())
            .spawn(move || {
                runtime.block_on(async move {
                    loop {
                        tokio::select! {
                            _ = token.cancelled() => break,
                            request = cmd_rx.recv() => {
                                let Some(request) = request else { break };
                                let client = client.clone();
                                let sink = sink.clone();
                                tokio::spawn(async move {
                                    sink.emit(execute(client.as_ref(), request).await);
                                });
                            }
                        }
                    }
                });
                explorer_info!("engine stopped");
            })?;

        Ok(Self {
            cmd_tx,
            event_rx: None,
            shutdown,
        })
    }

    pub fn submit(&self, request: ApiRequest) {
        explorer_debug!("engine: submit {:?}", request);
        let _ = self.cmd_tx.send(request);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.as_ref()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.as_ref()?.recv_timeout(timeout).ok()
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn execute(client: &dyn ApiClient, request: ApiRequest) -> EngineEvent {
    match request {
        ApiRequest::ListChildren { path, show_hidden } => {
            let result = client.list_children(&path, show_hidden).await;
            EngineEvent::ChildrenLoaded { path, result }
        }
        ApiRequest::TreeStructure { generation } => EngineEvent::TreeStructureLoaded {
            generation,
            result: client.tree_structure().await,
        },
        ApiRequest::Code { generation, paths } => EngineEvent::CodeLoaded {
            generation,
            result: client.code(&paths).await,
        },
        ApiRequest::Preview { generation, path } => EngineEvent::PreviewLoaded {
            generation,
            result: client.preview(&path).await,
        },
        ApiRequest::Options => EngineEvent::OptionsLoaded(client.options().await),
        ApiRequest::Hidden => EngineEvent::HiddenLoaded(client.hidden().await),
        ApiRequest::SaveExtensions {
            extensions,
            explicit,
        } => EngineEvent::ExtensionsSaved {
            explicit,
            result: client.save_extensions(&extensions).await,
        },
        ApiRequest::SaveFavorites(favorites) => {
            EngineEvent::FavoritesSaved(client.save_favorites(&favorites).await)
        }
        ApiRequest::SaveHidden(hidden) => {
            EngineEvent::HiddenSaved(client.save_hidden(&hidden).await)
        }
        ApiRequest::Rename { path, new_name } => {
            let result = client.rename(&path, &new_name).await;
            EngineEvent::Renamed {
                path,
                new_name,
                result,
            }
        }
        ApiRequest::Delete { path } => {
            let result = client.delete(&path).await;
            EngineEvent::Deleted { path, result }
        }
    }
}
