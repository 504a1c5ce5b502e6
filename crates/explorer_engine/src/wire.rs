//! JSON shapes exchanged with the backend.

use serde::{Deserialize, Serialize};

use crate::{FsReply, ListedNode, OptionsPayload};

/// The backend reports `children` either as a flag or as an inline list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum ChildrenField {
    Flag(bool),
    List(Vec<serde_json::Value>),
}

impl Default for ChildrenField {
    fn default() -> Self {
        ChildrenField::Flag(false)
    }
}

impl ChildrenField {
    fn is_truthy(&self) -> bool {
        match self {
            ChildrenField::Flag(flag) => *flag,
            ChildrenField::List(items) => !items.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct NodeStateWire {
    #[serde(default)]
    disabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TreeNodeWire {
    id: String,
    text: String,
    #[serde(default)]
    children: ChildrenField,
    #[serde(default)]
    state: Option<NodeStateWire>,
}

impl From<TreeNodeWire> for ListedNode {
    fn from(wire: TreeNodeWire) -> Self {
        ListedNode {
            has_children: wire.children.is_truthy(),
            disabled: wire.state.is_some_and(|state| state.disabled),
            id: wire.id,
            text: wire.text,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TreeStructureResponse {
    pub tree: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CodeResponse {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreviewResponse {
    #[serde(default)]
    pub content: String,
}

/// Error body of `/api/preview`; `content` must be present.
#[derive(Debug, Deserialize)]
pub(crate) struct PreviewRejection {
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct OptionsResponse {
    known_extensions: Vec<String>,
    selected_extensions: Vec<String>,
    favorites: Vec<String>,
}

impl From<OptionsResponse> for OptionsPayload {
    fn from(wire: OptionsResponse) -> Self {
        OptionsPayload {
            known_extensions: wire.known_extensions,
            selected_extensions: wire.selected_extensions,
            favorites: wire.favorites,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FsResponse {
    success: bool,
    #[serde(rename = "newPath", default)]
    new_path: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl From<FsResponse> for FsReply {
    fn from(wire: FsResponse) -> Self {
        FsReply {
            success: wire.success,
            new_path: wire.new_path,
            message: wire.message,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ExtensionsBody<'a> {
    pub extensions: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct FavoritesBody<'a> {
    pub favorites: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct HiddenBody<'a> {
    pub hidden: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct RenameBody<'a> {
    #[serde(rename = "oldPath")]
    pub old_path: &'a str,
    #[serde(rename = "newName")]
    pub new_name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteBody<'a> {
    pub path: &'a str,
}
