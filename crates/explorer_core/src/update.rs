use std::time::Duration;

use explorer_logging::{explorer_debug, explorer_info, explorer_warn};

use crate::state::FavoriteOpening;
use crate::tree::{display_name, parent_path, sibling_path, TreeModel, TreeNode};
use crate::{AppState, CopyTarget, Effect, FsOutcome, MenuAction, Msg, NodeId, PendingInput, Tab};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let mut effects = Vec::new();
    match msg {
        Msg::Started {
            base_dir,
            preferences,
        } => {
            explorer_info!("Starting explorer at {}", base_dir);
            state.preferences = preferences;
            state.tree = TreeModel::new(base_dir);
            let root = state.tree.root().to_string();
            if let Some(path) = state.tree.expand(&root) {
                effects.push(load_children(&state, path));
            }
            effects.push(Effect::LoadOptions);
            effects.push(Effect::LoadHidden);
            state.mark_dirty();
        }
        Msg::Tick(now) => {
            let elapsed = state.advance_clock(now);
            on_tick(&mut state, elapsed, &mut effects);
        }

        Msg::NodeClicked(id) => {
            select_node(&mut state, &id, true, &mut effects);
        }
        Msg::ExpandToggled(id) => {
            if let Some(path) = state.tree.toggle(&id) {
                effects.push(load_children(&state, path));
            }
            state.mark_dirty();
        }
        Msg::CheckToggled(id) => {
            if state.tree.toggle_check(&id).is_some() {
                state.code_fetch.call(());
                state.mark_dirty();
            }
        }
        Msg::ChildrenLoaded { parent, result } => {
            match result {
                Ok(listing) => {
                    for path in state.tree.apply_children(&parent, listing) {
                        effects.push(load_children(&state, path));
                    }
                    if state.tree.is_root(&parent) {
                        finish_opening_favorite(&mut state, &mut effects);
                    }
                }
                Err(err) => {
                    explorer_warn!("Failed to load tree data for path {}: {}", parent, err);
                    state.tree.fail_children(&parent);
                    if state.tree.is_root(&parent) {
                        if let Some(opening) = state.opening_favorite.take() {
                            state.push_alert(format!("Could not open '{}'.", opening.target));
                            reroot(&mut state, opening.previous_root, &mut effects);
                        }
                    }
                }
            }
            state.mark_dirty();
        }
        Msg::SearchChanged(query) => {
            state.search_input = query.clone();
            state.search.call(query);
            state.mark_dirty();
        }
        Msg::RefreshClicked => {
            refresh_tree(&mut state, &mut effects);
        }
        Msg::BackClicked => {
            if let Some(id) = state.history.back().cloned() {
                navigate_to(&mut state, &id, &mut effects);
            }
        }
        Msg::ForwardClicked => {
            if let Some(id) = state.history.forward().cloned() {
                navigate_to(&mut state, &id, &mut effects);
            }
        }
        Msg::MenuActionChosen { node, action } => {
            on_menu_action(&mut state, node, action, &mut effects);
        }
        Msg::RenameSubmitted(new_name) => match state.pending_input.take() {
            Some(PendingInput::RenameName { path, current_name }) => {
                let new_name = new_name.trim();
                if !new_name.is_empty() && new_name != current_name {
                    effects.push(Effect::Rename {
                        path,
                        new_name: new_name.to_string(),
                    });
                }
                state.mark_dirty();
            }
            other => state.pending_input = other,
        },
        Msg::DeleteConfirmed => match state.pending_input.take() {
            Some(PendingInput::ConfirmDelete { path, .. }) => {
                effects.push(Effect::Delete { path });
                state.mark_dirty();
            }
            other => state.pending_input = other,
        },
        Msg::InputCancelled => {
            if state.pending_input.take().is_some() {
                state.mark_dirty();
            }
        }
        Msg::RenameFinished {
            old_path,
            new_name,
            result,
        } => on_rename_finished(&mut state, old_path, &new_name, result, &mut effects),
        Msg::DeleteFinished { path, result } => {
            on_delete_finished(&mut state, path, result, &mut effects)
        }

        Msg::OptionsLoaded(result) => match result {
            Ok(snapshot) => {
                state.options.apply_snapshot(snapshot);
                state.extension_save.cancel();
                state.mark_dirty();
            }
            Err(err) => explorer_warn!("Failed to load options: {}", err),
        },
        Msg::HiddenLoaded(result) => match result {
            Ok(hidden) => {
                state.options.apply_hidden(hidden);
                state.mark_dirty();
            }
            Err(err) => explorer_warn!("Failed to load hidden items: {}", err),
        },
        Msg::ExtensionToggled(ext) => {
            if state.options.toggle_extension(&ext) {
                state.extension_save.call(());
                state.mark_dirty();
            }
        }
        Msg::SelectAllExtensions => {
            state.options.select_all();
            save_extensions(&mut state, false, &mut effects);
        }
        Msg::ClearAllExtensions => {
            state.options.clear_all();
            save_extensions(&mut state, false, &mut effects);
        }
        Msg::SaveExtensionsClicked => {
            save_extensions(&mut state, true, &mut effects);
        }
        Msg::ExtensionsSaved { explicit, result } => match result {
            Ok(()) => {
                refresh_tree(&mut state, &mut effects);
                if explicit {
                    state.push_alert("Extensions saved");
                }
            }
            Err(err) => explorer_warn!("Failed to save extensions: {}", err),
        },
        Msg::FavoriteAdded(path) => add_favorite(&mut state, &path, &mut effects),
        Msg::FavoriteRemoved(path) => remove_favorite(&mut state, &path, &mut effects),
        Msg::FavoriteOpened(path) => open_favorite(&mut state, path, &mut effects),
        Msg::FavoritesSaved(result) => {
            if let Err(err) = result {
                explorer_warn!("Failed to save favorites: {}", err);
                state.set_notice(format!("Failed to save favorites: {err}"));
            }
        }
        Msg::HiddenAdded(path) => add_hidden(&mut state, &path, &mut effects),
        Msg::HiddenRemoved(path) => remove_hidden(&mut state, &path, &mut effects),
        Msg::HiddenSaved(result) => match result {
            Ok(()) => {
                // Hidden entries only disappear or reappear after a reload.
                if !state.preferences.show_hidden {
                    refresh_tree(&mut state, &mut effects);
                }
            }
            Err(err) => {
                explorer_warn!("Failed to save hidden items: {}", err);
                state.set_notice(format!("Failed to save hidden items: {err}"));
            }
        },
        Msg::ShowHiddenToggled => {
            state.preferences.show_hidden = !state.preferences.show_hidden;
            effects.push(Effect::SavePreferences(state.preferences));
            refresh_tree(&mut state, &mut effects);
        }
        Msg::ThemeToggled => {
            state.preferences.theme = state.preferences.theme.toggled();
            effects.push(Effect::SavePreferences(state.preferences));
            state.mark_dirty();
        }

        Msg::FilesDeselected(ids) => {
            if ids.is_empty() {
                state.push_alert("Select at least one file to deselect.");
            } else {
                let mut changed = false;
                for id in &ids {
                    changed |= state.tree.set_checked(id, false);
                }
                if changed {
                    state.code_fetch.cancel();
                    fetch_code(&mut state, &mut effects);
                }
            }
        }

        Msg::TabSelected(tab) => {
            state.code_panel.set_tab(tab);
            state.mark_dirty();
        }
        Msg::GenerateCodeClicked => {
            state.code_fetch.cancel();
            fetch_code(&mut state, &mut effects);
        }
        Msg::CodeLoaded { generation, result } => {
            if let Err(err) = &result {
                explorer_warn!("Failed to load code: {}", err);
            }
            if state.code_panel.finish_code_fetch(generation, result) {
                state.mark_dirty();
            } else {
                explorer_debug!("Discarding stale code response {}", generation);
            }
        }
        Msg::TreeStructureRequested => {
            let generation = state.code_panel.begin_tree_fetch(None);
            effects.push(Effect::FetchTreeStructure { generation });
            state.mark_dirty();
        }
        Msg::TreeStructureLoaded { generation, result } => {
            if let Err(err) = &result {
                explorer_warn!("Failed to load tree structure: {}", err);
            }
            match state.code_panel.finish_tree_fetch(generation, result) {
                Some(Ok((target, text))) => {
                    effects.push(Effect::CopyToClipboard { target, text })
                }
                Some(Err(target)) => state.push_alert(copy_failed_message(target)),
                None => {}
            }
            state.mark_dirty();
        }
        Msg::PreviewLoaded { generation, result } => {
            if let Err(err) = &result {
                explorer_warn!("Preview error: {}", err);
            }
            if state.code_panel.finish_preview(generation, result) {
                state.mark_dirty();
            } else {
                explorer_debug!("Discarding stale preview response {}", generation);
            }
        }
        Msg::CopyCodeClicked => {
            effects.push(Effect::CopyToClipboard {
                target: CopyTarget::Code,
                text: state.code_panel.copy_text(CopyTarget::Code),
            });
        }
        Msg::CopyTreeClicked => copy_with_fresh_tree(&mut state, CopyTarget::Tree, &mut effects),
        Msg::CopyAllClicked => copy_with_fresh_tree(&mut state, CopyTarget::All, &mut effects),
        Msg::ClipboardFinished { target, result } => match result {
            Ok(()) => state.push_alert(format!("{} copied to clipboard!", target.describe())),
            Err(err) => {
                explorer_warn!("Failed to copy {}: {}", target.describe(), err);
                state.push_alert(copy_failed_message(target));
            }
        },
        Msg::AlertDismissed => {
            if state.alerts.pop_front().is_some() {
                state.mark_dirty();
            }
        }
    }

    (state, effects)
}

fn on_tick(state: &mut AppState, elapsed: Duration, effects: &mut Vec<Effect>) {
    if let Some(query) = state.search.advance(elapsed) {
        state.tree.set_search(&query);
        state.mark_dirty();
    }
    if state.extension_save.advance(elapsed).is_some() {
        effects.push(Effect::SaveExtensions {
            extensions: state.options.selected_extensions().to_vec(),
            explicit: false,
        });
    }
    if state.code_fetch.advance(elapsed).is_some() {
        // Only refetch while the code tab is on screen.
        if state.code_panel.active_tab() == Tab::Code {
            fetch_code(state, effects);
        }
    }
}

fn load_children(state: &AppState, path: NodeId) -> Effect {
    Effect::LoadChildren {
        path,
        show_hidden: state.preferences.show_hidden,
    }
}

fn refresh_tree(state: &mut AppState, effects: &mut Vec<Effect>) {
    if let Some(root) = state.tree.refresh() {
        effects.push(load_children(state, root));
    }
    state.mark_dirty();
}

fn select_node(state: &mut AppState, id: &str, record: bool, effects: &mut Vec<Effect>) {
    if !state.tree.select(id) {
        return;
    }
    if record {
        state.history.push(id.to_string());
    }
    if state.tree.node(id).is_some_and(TreeNode::is_folder) {
        if let Some(path) = state.tree.toggle(id) {
            effects.push(load_children(state, path));
        }
    } else {
        request_preview(state, id.to_string(), effects);
    }
    state.mark_dirty();
}

/// Replaces the tree with a fresh one rooted at `root`. History and the
/// search box belong to the old tree and are dropped with it.
fn reroot(state: &mut AppState, root: NodeId, effects: &mut Vec<Effect>) {
    explorer_info!("Opening {} as the tree root", root);
    state.opening_favorite = None;
    state.tree = TreeModel::new(root);
    state.history.clear();
    state.search_input.clear();
    state.search.cancel();
    state.code_fetch.cancel();
    let root = state.tree.root().to_string();
    if let Some(path) = state.tree.expand(&root) {
        effects.push(load_children(state, path));
    }
    state.mark_dirty();
}

fn open_favorite(state: &mut AppState, path: NodeId, effects: &mut Vec<Effect>) {
    if !state.options.is_favorite(&path) {
        explorer_debug!("Ignoring open of unknown favorite {}", path);
        return;
    }
    let known_folder = state.tree.node(&path).map(TreeNode::is_folder);
    match (known_folder, parent_path(&path)) {
        (Some(false) | None, Some(parent)) => {
            // Existence and kind are only known once the parent is listed.
            let previous_root = state.tree.root().to_string();
            reroot(state, parent, effects);
            state.opening_favorite = Some(FavoriteOpening {
                target: path,
                previous_root,
            });
        }
        _ => reroot(state, path, effects),
    }
}

fn finish_opening_favorite(state: &mut AppState, effects: &mut Vec<Effect>) {
    let Some(opening) = state.opening_favorite.take() else {
        return;
    };
    let target = opening.target;
    match state.tree.node(&target).map(TreeNode::is_folder) {
        Some(true) => reroot(state, target, effects),
        Some(false) => select_node(state, &target, true, effects),
        None if filtered_out(state, &target) => {
            state.push_alert(format!("'{target}' is filtered out of the tree."));
        }
        None => {
            explorer_warn!("Favorite {} no longer exists", target);
            remove_favorite(state, &target, effects);
            state.push_alert(format!("The path '{target}' no longer exists."));
            reroot(state, opening.previous_root, effects);
        }
    }
}

/// Whether the backend listing would leave `path` out even though it exists.
fn filtered_out(state: &AppState, path: &str) -> bool {
    if state.options.is_hidden(path) && !state.preferences.show_hidden {
        return true;
    }
    let selected = state.options.selected_extensions();
    if selected.is_empty() {
        return false;
    }
    let name = display_name(path);
    let ext = match name.rfind('.') {
        Some(idx) if idx > 0 => &name[idx..],
        _ => "",
    };
    !selected.iter().any(|selected| selected == ext)
}

fn navigate_to(state: &mut AppState, id: &str, effects: &mut Vec<Effect>) {
    state.tree.deselect_all();
    select_node(state, id, false, effects);
    state.mark_dirty();
}

fn request_preview(state: &mut AppState, path: NodeId, effects: &mut Vec<Effect>) {
    let generation = state.code_panel.begin_preview();
    effects.push(Effect::FetchPreview { generation, path });
    state.mark_dirty();
}

fn fetch_code(state: &mut AppState, effects: &mut Vec<Effect>) {
    let paths = state.tree.checked_leaves();
    if paths.is_empty() {
        state.code_panel.show_no_selection();
    } else {
        let generation = state.code_panel.begin_code_fetch();
        effects.push(Effect::FetchCode { generation, paths });
    }
    state.mark_dirty();
}

fn copy_with_fresh_tree(state: &mut AppState, target: CopyTarget, effects: &mut Vec<Effect>) {
    let generation = state.code_panel.begin_tree_fetch(Some(target));
    effects.push(Effect::FetchTreeStructure { generation });
    state.mark_dirty();
}

fn copy_failed_message(target: CopyTarget) -> String {
    format!("Failed to copy {}.", target.describe().to_lowercase())
}

fn save_extensions(state: &mut AppState, explicit: bool, effects: &mut Vec<Effect>) {
    state.extension_save.cancel();
    effects.push(Effect::SaveExtensions {
        extensions: state.options.selected_extensions().to_vec(),
        explicit,
    });
    state.mark_dirty();
}

fn add_favorite(state: &mut AppState, path: &str, effects: &mut Vec<Effect>) {
    if state.options.add_favorite(path) {
        effects.push(Effect::SaveFavorites(state.options.favorites().to_vec()));
        state.mark_dirty();
    }
}

fn remove_favorite(state: &mut AppState, path: &str, effects: &mut Vec<Effect>) {
    if state.options.remove_favorite(path) {
        effects.push(Effect::SaveFavorites(state.options.favorites().to_vec()));
        state.mark_dirty();
    }
}

fn add_hidden(state: &mut AppState, path: &str, effects: &mut Vec<Effect>) {
    if state.options.add_hidden(path) {
        effects.push(Effect::SaveHidden(state.options.hidden().to_vec()));
        state.mark_dirty();
    }
}

fn remove_hidden(state: &mut AppState, path: &str, effects: &mut Vec<Effect>) {
    if state.options.remove_hidden(path) {
        effects.push(Effect::SaveHidden(state.options.hidden().to_vec()));
        state.mark_dirty();
    }
}

fn on_menu_action(state: &mut AppState, node: NodeId, action: MenuAction, effects: &mut Vec<Effect>) {
    let Some(menu) = state.menu_for(&node) else {
        return;
    };
    if !menu.is_enabled(action) {
        explorer_debug!("Ignoring disabled menu action {:?} on {}", action, node);
        return;
    }
    match action {
        MenuAction::Preview => request_preview(state, node, effects),
        MenuAction::CopyPath => effects.push(Effect::CopyToClipboard {
            target: CopyTarget::Path,
            text: node,
        }),
        MenuAction::ToggleFavorite => {
            if state.options.is_favorite(&node) {
                remove_favorite(state, &node, effects);
            } else {
                add_favorite(state, &node, effects);
            }
        }
        MenuAction::ToggleHidden => {
            if state.options.is_hidden(&node) {
                remove_hidden(state, &node, effects);
            } else {
                add_hidden(state, &node, effects);
            }
        }
        MenuAction::Rename => {
            let current_name = state
                .tree
                .node(&node)
                .map(|n| n.text().to_string())
                .unwrap_or_default();
            state.pending_input = Some(PendingInput::RenameName {
                path: node,
                current_name,
            });
            state.mark_dirty();
        }
        MenuAction::Delete => {
            let name = state
                .tree
                .node(&node)
                .map(|n| n.text().to_string())
                .unwrap_or_default();
            state.pending_input = Some(PendingInput::ConfirmDelete { path: node, name });
            state.mark_dirty();
        }
        MenuAction::ToggleSelect => {
            if state.tree.toggle_check(&node).is_some() {
                state.code_fetch.call(());
                state.mark_dirty();
            }
        }
    }
}

fn on_rename_finished(
    state: &mut AppState,
    old_path: NodeId,
    new_name: &str,
    result: Result<FsOutcome, String>,
    effects: &mut Vec<Effect>,
) {
    match result {
        Ok(FsOutcome::Done { new_path }) => {
            let new_path = new_path.unwrap_or_else(|| sibling_path(&old_path, new_name));
            explorer_info!("Renamed {} to {}", old_path, new_path);
            let parent = state
                .tree
                .node(&old_path)
                .and_then(TreeNode::parent)
                .unwrap_or(state.tree.root())
                .to_string();
            state.tree.set_checked(&old_path, false);
            if let Some(path) = state.tree.refresh_node(&parent) {
                effects.push(load_children(state, path));
            }
            state.push_alert("Renamed successfully!");
            if state.options.is_favorite(&old_path) {
                state.options.remove_favorite(&old_path);
                state.options.add_favorite(&new_path);
                effects.push(Effect::SaveFavorites(state.options.favorites().to_vec()));
            }
            if state.options.is_hidden(&old_path) {
                state.options.remove_hidden(&old_path);
                state.options.add_hidden(&new_path);
                effects.push(Effect::SaveHidden(state.options.hidden().to_vec()));
            }
        }
        Ok(FsOutcome::Rejected { message }) => {
            state.push_alert(format!("Rename failed: {message}"));
        }
        Err(err) => {
            explorer_warn!("Rename error for {}: {}", old_path, err);
            state.push_alert("An error occurred during rename.");
        }
    }
}

fn on_delete_finished(
    state: &mut AppState,
    path: NodeId,
    result: Result<FsOutcome, String>,
    effects: &mut Vec<Effect>,
) {
    match result {
        Ok(FsOutcome::Done { .. }) => {
            explorer_info!("Deleted {}", path);
            state.tree.remove(&path);
            state.push_alert("Deleted successfully!");
            remove_favorite(state, &path, effects);
            remove_hidden(state, &path, effects);
        }
        Ok(FsOutcome::Rejected { message }) => {
            state.push_alert(format!("Delete failed: {message}"));
        }
        Err(err) => {
            explorer_warn!("Delete error for {}: {}", path, err);
            state.push_alert("An error occurred during delete.");
        }
    }
}
