//! Explorer core: pure state machine for the file tree, options and code panels.
pub mod code_panel;
pub mod debounce;
mod effect;
mod history;
mod menu;
mod msg;
mod options;
mod state;
pub mod tree;
mod types;
mod update;
mod view_model;

pub use code_panel::CodePanel;
pub use debounce::Debouncer;
pub use effect::Effect;
pub use history::History;
pub use menu::{build_menu, MenuAction, MenuContext, MenuDescriptor, MenuItem};
pub use msg::Msg;
pub use options::OptionsState;
pub use state::AppState;
pub use tree::{Expansion, NodeKind, TreeModel, TreeNode, TreeRow};
pub use types::{
    CopyTarget, FsOutcome, Generation, NodeDescriptor, NodeId, OptionsSnapshot, PendingInput,
    Preferences, Tab, Theme,
};
pub use update::update;
pub use view_model::{AppViewModel, ExtensionView};
