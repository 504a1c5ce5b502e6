//! Code tab content and the request generations guarding it.

use crate::{CopyTarget, Generation, Tab};

pub const NO_FILES_SELECTED: &str = "// No files selected";
pub const CODE_LOADING: &str = "// Loading...";
pub const CODE_LOAD_FAILED: &str = "// Error loading code";
pub const TREE_PLACEHOLDER: &str = "// Tree structure not loaded";
pub const TREE_LOADING: &str = "// Loading tree structure...";
pub const TREE_LOAD_FAILED: &str = "// Error loading tree structure";
pub const PREVIEW_PLACEHOLDER: &str = "// Select a file to preview";
pub const PREVIEW_LOADING: &str = "// Loading preview...";
pub const PREVIEW_EMPTY: &str = "// No preview available or file is empty";
pub const PREVIEW_FAILED: &str = "// Error loading preview";

/// Latest request issued on one channel. Replies tagged with any other
/// generation are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Channel {
    latest: Generation,
}

impl Channel {
    fn next(&mut self) -> Generation {
        self.latest += 1;
        self.latest
    }

    fn is_current(&self, generation: Generation) -> bool {
        generation == self.latest
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodePanel {
    active_tab: Tab,
    code_text: String,
    tree_text: String,
    preview_text: String,
    code: Channel,
    tree: Channel,
    preview: Channel,
    /// Copy waiting for the tree structure fetch it triggered.
    pending_copy: Option<(Generation, CopyTarget)>,
}

impl Default for CodePanel {
    fn default() -> Self {
        Self {
            active_tab: Tab::Options,
            code_text: String::new(),
            tree_text: TREE_PLACEHOLDER.to_string(),
            preview_text: PREVIEW_PLACEHOLDER.to_string(),
            code: Channel::default(),
            tree: Channel::default(),
            preview: Channel::default(),
            pending_copy: None,
        }
    }
}

impl CodePanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    pub fn code_text(&self) -> &str {
        &self.code_text
    }

    pub fn tree_text(&self) -> &str {
        &self.tree_text
    }

    pub fn preview_text(&self) -> &str {
        &self.preview_text
    }

    /// Shows the empty-selection placeholder and invalidates in-flight fetches.
    pub fn show_no_selection(&mut self) {
        self.code.next();
        self.active_tab = Tab::Code;
        self.code_text = NO_FILES_SELECTED.to_string();
    }

    pub fn begin_code_fetch(&mut self) -> Generation {
        self.active_tab = Tab::Code;
        self.code_text = CODE_LOADING.to_string();
        self.code.next()
    }

    /// Returns false when the reply was superseded.
    pub fn finish_code_fetch(&mut self, generation: Generation, result: Result<String, String>) -> bool {
        if !self.code.is_current(generation) {
            return false;
        }
        self.code_text = match result {
            Ok(code) => code,
            Err(_) => CODE_LOAD_FAILED.to_string(),
        };
        true
    }

    pub fn begin_tree_fetch(&mut self, copy: Option<CopyTarget>) -> Generation {
        let generation = self.tree.next();
        self.tree_text = TREE_LOADING.to_string();
        self.pending_copy = copy.map(|target| (generation, target));
        generation
    }

    /// Stores the tree text and hands back the copy that was waiting on it.
    pub fn finish_tree_fetch(
        &mut self,
        generation: Generation,
        result: Result<String, String>,
    ) -> Option<Result<(CopyTarget, String), CopyTarget>> {
        if !self.tree.is_current(generation) {
            return None;
        }
        let copy = match self.pending_copy.take() {
            Some((pending, target)) if pending == generation => Some(target),
            _ => None,
        };
        match result {
            Ok(tree) => {
                self.tree_text = tree;
                copy.map(|target| Ok((target, self.copy_text(target))))
            }
            Err(_) => {
                self.tree_text = TREE_LOAD_FAILED.to_string();
                copy.map(Err)
            }
        }
    }

    pub fn begin_preview(&mut self) -> Generation {
        self.preview_text = PREVIEW_LOADING.to_string();
        self.preview.next()
    }

    pub fn finish_preview(&mut self, generation: Generation, result: Result<String, String>) -> bool {
        if !self.preview.is_current(generation) {
            return false;
        }
        self.preview_text = match result {
            Ok(content) if content.is_empty() => PREVIEW_EMPTY.to_string(),
            Ok(content) => content,
            Err(_) => PREVIEW_FAILED.to_string(),
        };
        true
    }

    /// Clipboard text for a copy target given the current panel content.
    pub fn copy_text(&self, target: CopyTarget) -> String {
        match target {
            CopyTarget::Code => self.code_text.clone(),
            CopyTarget::Tree => self.tree_text.clone(),
            CopyTarget::All => format!("{}\n\n{}", self.tree_text, self.code_text),
            CopyTarget::Path => String::new(),
        }
    }
}
