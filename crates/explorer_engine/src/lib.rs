//! Explorer engine: backend REST client and asynchronous effect execution.
mod client;
mod engine;
mod persist;
mod preview;
mod types;
mod wire;

pub use client::{ApiClient, ClientSettings, ReqwestApiClient, DEFAULT_BASE_URL};
pub use engine::{ChannelEventSink, EngineHandle, EventSink};
pub use persist::{ensure_dir, AtomicFileWriter, PersistError};
pub use preview::{prepare_preview_content, MAX_PREVIEW_CONTENT};
pub use types::{
    ApiError, ApiRequest, EngineEvent, FailureKind, FsReply, Generation, ListedNode,
    OptionsPayload,
};
