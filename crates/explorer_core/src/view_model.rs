use crate::tree::TreeRow;
use crate::{NodeId, Tab, Theme};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionView {
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub base_dir: String,
    pub theme: Theme,
    pub show_hidden: bool,
    pub rows: Vec<TreeRow>,
    pub search_input: String,
    /// Checked files sorted by path.
    pub checked_files: Vec<NodeId>,
    pub active_tab: Tab,
    pub code_text: String,
    pub tree_text: String,
    pub preview_text: String,
    pub extensions: Vec<ExtensionView>,
    pub favorites: Vec<String>,
    pub hidden: Vec<String>,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    /// Head of the alert queue; blocks until dismissed.
    pub alert: Option<String>,
    pub prompt: Option<String>,
    pub notice: Option<String>,
    pub dirty: bool,
}
