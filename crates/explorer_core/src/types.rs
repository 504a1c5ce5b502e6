use std::fmt;

/// Filesystem path of a node, as reported by the backend.
pub type NodeId = String;

/// Monotonic request counter used to discard superseded responses.
pub type Generation = u64;

/// One directory entry as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDescriptor {
    pub id: NodeId,
    pub text: String,
    pub has_children: bool,
    /// Hidden entries listed while hidden items are shown.
    pub disabled: bool,
}

impl NodeDescriptor {
    pub fn file(id: impl Into<NodeId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            has_children: false,
            disabled: false,
        }
    }

    pub fn folder(id: impl Into<NodeId>, text: impl Into<String>) -> Self {
        Self {
            has_children: true,
            ..Self::file(id, text)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptionsSnapshot {
    pub known_extensions: Vec<String>,
    pub selected_extensions: Vec<String>,
    pub favorites: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Anything other than `"dark"` reads back as the light theme.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("dark") {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client-local preferences kept outside the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub theme: Theme,
    pub show_hidden: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Options,
    Code,
}

/// Backend answer to a rename or delete request that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsOutcome {
    Done { new_path: Option<NodeId> },
    Rejected { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyTarget {
    Path,
    Code,
    Tree,
    All,
}

impl CopyTarget {
    pub fn describe(self) -> &'static str {
        match self {
            CopyTarget::Path => "Path",
            CopyTarget::Code => "Code",
            CopyTarget::Tree => "Tree",
            CopyTarget::All => "Tree and code",
        }
    }
}

/// Input the front end must collect before the core can continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingInput {
    RenameName { path: NodeId, current_name: String },
    ConfirmDelete { path: NodeId, name: String },
}

impl PendingInput {
    pub fn prompt(&self) -> String {
        match self {
            PendingInput::RenameName { current_name, .. } => {
                format!("Enter new name (current: {current_name}):")
            }
            PendingInput::ConfirmDelete { name, .. } => {
                format!("Are you sure you want to delete '{name}'?")
            }
        }
    }
}
