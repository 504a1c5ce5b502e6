use std::fmt;

/// Opaque request counter echoed back with the matching event.
pub type Generation = u64;

/// One directory entry from `GET /api/tree`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedNode {
    pub id: String,
    pub text: String,
    pub has_children: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptionsPayload {
    pub known_extensions: Vec<String>,
    pub selected_extensions: Vec<String>,
    pub favorites: Vec<String>,
}

/// Result body of a rename or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsReply {
    pub success: bool,
    pub new_path: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    ListChildren { path: String, show_hidden: bool },
    TreeStructure { generation: Generation },
    Code { generation: Generation, paths: Vec<String> },
    Preview { generation: Generation, path: String },
    Options,
    Hidden,
    SaveExtensions { extensions: Vec<String>, explicit: bool },
    SaveFavorites(Vec<String>),
    SaveHidden(Vec<String>),
    Rename { path: String, new_name: String },
    Delete { path: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ChildrenLoaded {
        path: String,
        result: Result<Vec<ListedNode>, ApiError>,
    },
    TreeStructureLoaded {
        generation: Generation,
        result: Result<String, ApiError>,
    },
    CodeLoaded {
        generation: Generation,
        result: Result<String, ApiError>,
    },
    PreviewLoaded {
        generation: Generation,
        result: Result<String, ApiError>,
    },
    OptionsLoaded(Result<OptionsPayload, ApiError>),
    HiddenLoaded(Result<Vec<String>, ApiError>),
    ExtensionsSaved {
        explicit: bool,
        result: Result<(), ApiError>,
    },
    FavoritesSaved(Result<(), ApiError>),
    HiddenSaved(Result<(), ApiError>),
    Renamed {
        path: String,
        new_name: String,
        result: Result<FsReply, ApiError>,
    },
    Deleted {
        path: String,
        result: Result<FsReply, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
