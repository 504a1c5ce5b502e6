use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::code_panel::CodePanel;
use crate::debounce::{Debouncer, CODE_FETCH_DEBOUNCE, EXTENSION_SAVE_DEBOUNCE, SEARCH_DEBOUNCE};
use crate::history::History;
use crate::menu::{build_menu, MenuContext, MenuDescriptor};
use crate::options::OptionsState;
use crate::tree::TreeModel;
use crate::view_model::{AppViewModel, ExtensionView};
use crate::{NodeId, PendingInput, Preferences};

/// A favorite being revealed once its parent folder has been listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FavoriteOpening {
    pub(crate) target: NodeId,
    /// Root to return to when the favorite turns out to be gone.
    pub(crate) previous_root: NodeId,
}

/// Page-lifetime client state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub(crate) preferences: Preferences,
    pub(crate) tree: TreeModel,
    pub(crate) options: OptionsState,
    pub(crate) code_panel: CodePanel,
    pub(crate) history: History,
    pub(crate) code_fetch: Debouncer<()>,
    pub(crate) search: Debouncer<String>,
    pub(crate) extension_save: Debouncer<()>,
    pub(crate) search_input: String,
    pub(crate) last_tick: Option<Instant>,
    pub(crate) alerts: VecDeque<String>,
    pub(crate) notice: Option<String>,
    pub(crate) pending_input: Option<PendingInput>,
    pub(crate) opening_favorite: Option<FavoriteOpening>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            preferences: Preferences::default(),
            tree: TreeModel::default(),
            options: OptionsState::default(),
            code_panel: CodePanel::default(),
            history: History::default(),
            code_fetch: Debouncer::new(CODE_FETCH_DEBOUNCE),
            search: Debouncer::new(SEARCH_DEBOUNCE),
            extension_save: Debouncer::new(EXTENSION_SAVE_DEBOUNCE),
            search_input: String::new(),
            last_tick: None,
            alerts: VecDeque::new(),
            notice: None,
            pending_input: None,
            opening_favorite: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn tree(&self) -> &TreeModel {
        &self.tree
    }

    pub fn options(&self) -> &OptionsState {
        &self.options
    }

    pub fn code_panel(&self) -> &CodePanel {
        &self.code_panel
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn pending_input(&self) -> Option<&PendingInput> {
        self.pending_input.as_ref()
    }

    pub fn alerts(&self) -> impl Iterator<Item = &String> {
        self.alerts.iter()
    }

    /// Context menu for a loaded node.
    pub fn menu_for(&self, id: &str) -> Option<MenuDescriptor> {
        let node = self.tree.node(id)?;
        let ctx = MenuContext {
            is_root: self.tree.is_root(id),
            is_favorite: self.options.is_favorite(id),
            is_hidden: self.options.is_hidden(id),
            is_checked: self.tree.is_checked(id),
        };
        Some(build_menu(node, &ctx))
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            base_dir: self.tree.root().to_string(),
            theme: self.preferences.theme,
            show_hidden: self.preferences.show_hidden,
            rows: self.tree.rows(),
            search_input: self.search_input.clone(),
            checked_files: self.tree.checked_files(),
            active_tab: self.code_panel.active_tab(),
            code_text: self.code_panel.code_text().to_string(),
            tree_text: self.code_panel.tree_text().to_string(),
            preview_text: self.code_panel.preview_text().to_string(),
            extensions: self
                .options
                .known_extensions()
                .iter()
                .map(|ext| ExtensionView {
                    name: ext.clone(),
                    selected: self.options.is_extension_selected(ext),
                })
                .collect(),
            favorites: self.options.favorites().to_vec(),
            hidden: self.options.hidden().to_vec(),
            can_go_back: self.history.can_go_back(),
            can_go_forward: self.history.can_go_forward(),
            alert: self.alerts.front().cloned(),
            prompt: self.pending_input.as_ref().map(PendingInput::prompt),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn push_alert(&mut self, message: impl Into<String>) {
        self.alerts.push_back(message.into());
        self.dirty = true;
    }

    pub(crate) fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
        self.dirty = true;
    }

    /// Time elapsed since the previous tick; zero for the first one.
    pub(crate) fn advance_clock(&mut self, now: Instant) -> Duration {
        let elapsed = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_tick = Some(now);
        elapsed
    }
}
