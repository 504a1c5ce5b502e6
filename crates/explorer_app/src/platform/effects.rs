use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use explorer_core::{Effect, FsOutcome, Msg, NodeDescriptor, OptionsSnapshot};
use explorer_engine::{
    ApiClient, ApiError, ApiRequest, EngineEvent, EngineHandle, EventSink, FsReply, ListedNode,
    OptionsPayload,
};
use explorer_logging::explorer_info;

use super::app::Inbound;
use super::persistence;

/// Executes effects: backend calls go to the engine, clipboard and
/// preferences are handled locally.
pub struct EffectRunner {
    engine: EngineHandle,
    inbound: mpsc::Sender<Inbound>,
    prefs_path: PathBuf,
    clipboard: Option<arboard::Clipboard>,
}

impl EffectRunner {
    pub fn new(
        client: Arc<dyn ApiClient>,
        inbound: mpsc::Sender<Inbound>,
        prefs_path: PathBuf,
    ) -> std::io::Result<Self> {
        let sink = Arc::new(MsgSink {
            tx: inbound.clone(),
        });
        let engine = EngineHandle::with_sink(client, sink)?;
        Ok(Self {
            engine,
            inbound,
            prefs_path,
            clipboard: None,
        })
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CopyToClipboard { target, text } => {
                    let result = self.copy_to_clipboard(&text);
                    let _ = self
                        .inbound
                        .send(Inbound::Msg(Msg::ClipboardFinished { target, result }));
                }
                Effect::SavePreferences(preferences) => {
                    persistence::save_preferences(&self.prefs_path, preferences);
                }
                other => {
                    if let Some(request) = to_request(other) {
                        self.engine.submit(request);
                    }
                }
            }
        }
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), String> {
        if self.clipboard.is_none() {
            let clipboard = arboard::Clipboard::new().map_err(|err| err.to_string())?;
            self.clipboard = Some(clipboard);
        }
        let Some(clipboard) = self.clipboard.as_mut() else {
            return Err("clipboard unavailable".to_string());
        };
        clipboard
            .set_text(text.to_owned())
            .map_err(|err| err.to_string())?;
        explorer_info!("Copied {} bytes to clipboard", text.len());
        Ok(())
    }
}

struct MsgSink {
    tx: mpsc::Sender<Inbound>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(Inbound::Msg(to_msg(event)));
    }
}

/// Backend effects only; local effects return `None`.
fn to_request(effect: Effect) -> Option<ApiRequest> {
    let request = match effect {
        Effect::LoadChildren { path, show_hidden } => {
            ApiRequest::ListChildren { path, show_hidden }
        }
        Effect::FetchCode { generation, paths } => ApiRequest::Code { generation, paths },
        Effect::FetchTreeStructure { generation } => ApiRequest::TreeStructure { generation },
        Effect::FetchPreview { generation, path } => ApiRequest::Preview { generation, path },
        Effect::LoadOptions => ApiRequest::Options,
        Effect::LoadHidden => ApiRequest::Hidden,
        Effect::SaveExtensions {
            extensions,
            explicit,
        } => ApiRequest::SaveExtensions {
            extensions,
            explicit,
        },
        Effect::SaveFavorites(favorites) => ApiRequest::SaveFavorites(favorites),
        Effect::SaveHidden(hidden) => ApiRequest::SaveHidden(hidden),
        Effect::Rename { path, new_name } => ApiRequest::Rename { path, new_name },
        Effect::Delete { path } => ApiRequest::Delete { path },
        Effect::CopyToClipboard { .. } | Effect::SavePreferences(_) => return None,
    };
    Some(request)
}

fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ChildrenLoaded { path, result } => Msg::ChildrenLoaded {
            result: describe(result)
                .map(|nodes| nodes.into_iter().map(to_descriptor).collect()),
            parent: path,
        },
        EngineEvent::TreeStructureLoaded { generation, result } => Msg::TreeStructureLoaded {
            generation,
            result: describe(result),
        },
        EngineEvent::CodeLoaded { generation, result } => Msg::CodeLoaded {
            generation,
            result: describe(result),
        },
        EngineEvent::PreviewLoaded { generation, result } => Msg::PreviewLoaded {
            generation,
            result: describe(result),
        },
        EngineEvent::OptionsLoaded(result) => {
            Msg::OptionsLoaded(describe(result).map(to_snapshot))
        }
        EngineEvent::HiddenLoaded(result) => Msg::HiddenLoaded(describe(result)),
        EngineEvent::ExtensionsSaved { explicit, result } => Msg::ExtensionsSaved {
            explicit,
            result: describe(result),
        },
        EngineEvent::FavoritesSaved(result) => {
            Msg::FavoritesSaved(describe(result))
        }
        EngineEvent::HiddenSaved(result) => Msg::HiddenSaved(describe(result)),
        EngineEvent::Renamed {
            path,
            new_name,
            result,
        } => Msg::RenameFinished {
            old_path: path,
            new_name,
            result: describe(result).map(to_outcome),
        },
        EngineEvent::Deleted { path, result } => Msg::DeleteFinished {
            path,
            result: describe(result).map(to_outcome),
        },
    }
}

/// Failures are logged once, by `update`, with the context of the message.
fn describe<T>(result: Result<T, ApiError>) -> Result<T, String> {
    result.map_err(|err| err.to_string())
}

fn to_descriptor(node: ListedNode) -> NodeDescriptor {
    NodeDescriptor {
        id: node.id,
        text: node.text,
        has_children: node.has_children,
        disabled: node.disabled,
    }
}

fn to_snapshot(payload: OptionsPayload) -> OptionsSnapshot {
    OptionsSnapshot {
        known_extensions: payload.known_extensions,
        selected_extensions: payload.selected_extensions,
        favorites: payload.favorites,
    }
}

fn to_outcome(reply: FsReply) -> FsOutcome {
    if reply.success {
        FsOutcome::Done {
            new_path: reply.new_path,
        }
    } else {
        FsOutcome::Rejected {
            message: reply
                .message
                .unwrap_or_else(|| "Unknown error".to_string()),
        }
    }
}
