use std::time::Instant;

use crate::{
    CopyTarget, FsOutcome, Generation, MenuAction, NodeDescriptor, NodeId, OptionsSnapshot,
    Preferences, Tab,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Page load: base directory and the preferences read from local storage.
    Started {
        base_dir: NodeId,
        preferences: Preferences,
    },
    /// Clock tick driving every debounce.
    Tick(Instant),

    /// User clicked a node label (not its checkbox).
    NodeClicked(NodeId),
    /// User clicked a folder's expand arrow.
    ExpandToggled(NodeId),
    /// User clicked a node's checkbox.
    CheckToggled(NodeId),
    /// Backend listing for one folder.
    ChildrenLoaded {
        parent: NodeId,
        result: Result<Vec<NodeDescriptor>, String>,
    },
    /// User edited the search box (raw text, debounced in the core).
    SearchChanged(String),
    RefreshClicked,
    BackClicked,
    ForwardClicked,
    /// User picked an entry in a node's context menu.
    MenuActionChosen { node: NodeId, action: MenuAction },
    /// Answer to the rename prompt.
    RenameSubmitted(String),
    RenameFinished {
        old_path: NodeId,
        new_name: String,
        result: Result<FsOutcome, String>,
    },
    DeleteConfirmed,
    /// Rename prompt or delete confirmation dismissed.
    InputCancelled,
    DeleteFinished {
        path: NodeId,
        result: Result<FsOutcome, String>,
    },

    OptionsLoaded(Result<OptionsSnapshot, String>),
    HiddenLoaded(Result<Vec<String>, String>),
    ExtensionToggled(String),
    SelectAllExtensions,
    ClearAllExtensions,
    SaveExtensionsClicked,
    ExtensionsSaved {
        explicit: bool,
        result: Result<(), String>,
    },
    FavoriteAdded(String),
    FavoriteRemoved(String),
    /// User opened a favorite: folders become the root, files are revealed
    /// inside their parent.
    FavoriteOpened(String),
    FavoritesSaved(Result<(), String>),
    HiddenAdded(String),
    HiddenRemoved(String),
    HiddenSaved(Result<(), String>),
    ShowHiddenToggled,
    ThemeToggled,

    /// User removed entries from the selected-files list.
    FilesDeselected(Vec<NodeId>),

    TabSelected(Tab),
    GenerateCodeClicked,
    CodeLoaded {
        generation: Generation,
        result: Result<String, String>,
    },
    TreeStructureRequested,
    TreeStructureLoaded {
        generation: Generation,
        result: Result<String, String>,
    },
    PreviewLoaded {
        generation: Generation,
        result: Result<String, String>,
    },
    CopyCodeClicked,
    CopyTreeClicked,
    CopyAllClicked,
    ClipboardFinished {
        target: CopyTarget,
        result: Result<(), String>,
    },
    /// User acknowledged the alert at the head of the queue.
    AlertDismissed,
}
