use crate::{CopyTarget, Generation, NodeId, Preferences};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadChildren { path: NodeId, show_hidden: bool },
    FetchCode { generation: Generation, paths: Vec<NodeId> },
    FetchTreeStructure { generation: Generation },
    FetchPreview { generation: Generation, path: NodeId },
    LoadOptions,
    LoadHidden,
    SaveExtensions { extensions: Vec<String>, explicit: bool },
    SaveFavorites(Vec<String>),
    SaveHidden(Vec<String>),
    Rename { path: NodeId, new_name: String },
    Delete { path: NodeId },
    CopyToClipboard { target: CopyTarget, text: String },
    SavePreferences(Preferences),
}
