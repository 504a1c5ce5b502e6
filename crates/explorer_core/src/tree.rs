//! In-memory directory tree with lazy children, independent checkboxes and a
//! search filter.
//!
//! Nodes are keyed by their filesystem path. Children of a folder are only
//! known once the backend listed them; expanding an unloaded folder hands the
//! caller the path to load. Checking a node never touches its relatives.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::{NodeDescriptor, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Folder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    Collapsed,
    Loading,
    Expanded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    id: NodeId,
    text: String,
    kind: NodeKind,
    disabled: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    expansion: Expansion,
    loaded: bool,
}

impl TreeNode {
    fn from_descriptor(descriptor: NodeDescriptor, parent: &str) -> Self {
        Self {
            kind: if descriptor.has_children {
                NodeKind::Folder
            } else {
                NodeKind::File
            },
            id: descriptor.id,
            text: descriptor.text,
            disabled: descriptor.disabled,
            parent: Some(parent.to_string()),
            children: Vec::new(),
            expansion: Expansion::Collapsed,
            loaded: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn disabled(&self) -> bool {
        self.disabled
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn expansion(&self) -> Expansion {
        self.expansion
    }
}

/// One visible line of the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub id: NodeId,
    pub text: String,
    pub depth: usize,
    pub kind: NodeKind,
    pub expansion: Expansion,
    pub checked: bool,
    pub selected: bool,
    pub disabled: bool,
    pub matched: bool,
}

struct SearchFilter {
    matches: HashSet<NodeId>,
    ancestors: HashSet<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TreeModel {
    root: NodeId,
    nodes: HashMap<NodeId, TreeNode>,
    checked: BTreeSet<NodeId>,
    selected: Option<NodeId>,
    /// Folders to reopen as their listing comes back after a refresh, keyed
    /// to the parent whose listing decides their fate.
    reopen: HashMap<NodeId, NodeId>,
    search: Option<String>,
}

impl TreeModel {
    pub fn new(root: impl Into<NodeId>) -> Self {
        let root = root.into();
        let node = TreeNode {
            id: root.clone(),
            text: display_name(&root).to_string(),
            kind: NodeKind::Folder,
            disabled: false,
            parent: None,
            children: Vec::new(),
            expansion: Expansion::Collapsed,
            loaded: false,
        };
        let mut nodes = HashMap::new();
        nodes.insert(root.clone(), node);
        Self {
            root,
            nodes,
            ..Self::default()
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn is_root(&self, id: &str) -> bool {
        self.root == id
    }

    pub fn node(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Opens a folder. Returns the path to load when its children are unknown.
    pub fn expand(&mut self, id: &str) -> Option<NodeId> {
        let node = self.nodes.get_mut(id)?;
        if node.kind != NodeKind::Folder || node.expansion != Expansion::Collapsed {
            return None;
        }
        if node.loaded {
            node.expansion = Expansion::Expanded;
            None
        } else {
            node.expansion = Expansion::Loading;
            Some(node.id.clone())
        }
    }

    pub fn collapse(&mut self, id: &str) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) if node.expansion != Expansion::Collapsed => {
                node.expansion = Expansion::Collapsed;
                true
            }
            _ => false,
        }
    }

    pub fn toggle(&mut self, id: &str) -> Option<NodeId> {
        let expansion = self.nodes.get(id)?.expansion;
        if expansion == Expansion::Collapsed {
            self.expand(id)
        } else {
            self.collapse(id);
            None
        }
    }

    /// Replaces a folder's children with a fresh listing. Returns folders that
    /// were open before a refresh and now need their own listing.
    pub fn apply_children(&mut self, parent: &str, listing: Vec<NodeDescriptor>) -> Vec<NodeId> {
        if !self.nodes.contains_key(parent) {
            return Vec::new();
        }
        self.remove_descendants(parent);

        let mut children = Vec::with_capacity(listing.len());
        let mut reload = Vec::new();
        for descriptor in listing {
            if descriptor.id == parent || self.nodes.contains_key(&descriptor.id) {
                continue;
            }
            let mut node = TreeNode::from_descriptor(descriptor, parent);
            if node.kind == NodeKind::Folder && self.reopen.remove(&node.id).is_some() {
                node.expansion = Expansion::Loading;
                reload.push(node.id.clone());
            }
            children.push(node.id.clone());
            self.nodes.insert(node.id.clone(), node);
        }
        self.prune_reopen(parent);

        if let Some(node) = self.nodes.get_mut(parent) {
            node.children = children;
            node.loaded = true;
            if node.expansion == Expansion::Loading {
                node.expansion = Expansion::Expanded;
            }
        }
        reload
    }

    /// A failed listing leaves the folder closed and empty so the next
    /// expansion retries.
    pub fn fail_children(&mut self, parent: &str) {
        self.remove_descendants(parent);
        self.prune_reopen(parent);
        if let Some(node) = self.nodes.get_mut(parent) {
            node.loaded = false;
            node.expansion = Expansion::Collapsed;
        }
    }

    /// Drops every loaded listing and reloads from the root. Folders open now
    /// are reopened as the new listings arrive.
    pub fn refresh(&mut self) -> Option<NodeId> {
        let root = self.root.clone();
        self.refresh_node(&root)
    }

    pub fn refresh_node(&mut self, id: &str) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        if node.kind != NodeKind::Folder {
            return None;
        }
        for descendant in self.descendants(id) {
            if let Some(node) = self.nodes.get(&descendant) {
                if node.expansion != Expansion::Collapsed {
                    let parent = node.parent.clone().unwrap_or_default();
                    self.reopen.insert(descendant, parent);
                }
            }
        }
        self.remove_descendants(id);
        let node = self.nodes.get_mut(id)?;
        node.loaded = false;
        node.expansion = Expansion::Loading;
        Some(node.id.clone())
    }

    /// Removes a node and its subtree. The root cannot be removed.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.is_root(id) {
            return false;
        }
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        if let Some(parent) = node.parent.clone() {
            if let Some(parent) = self.nodes.get_mut(&parent) {
                parent.children.retain(|child| child != id);
            }
        }
        let mut removed = self.descendants(id);
        removed.push(id.to_string());
        for id in removed {
            self.nodes.remove(&id);
            self.checked.remove(&id);
            self.reopen.remove(&id);
            if self.selected.as_deref() == Some(id.as_str()) {
                self.selected = None;
            }
        }
        true
    }

    pub fn is_checked(&self, id: &str) -> bool {
        self.checked.contains(id)
    }

    /// Flips the checkbox of a known node and returns its new state. Disabled
    /// nodes can be unchecked but never checked.
    pub fn toggle_check(&mut self, id: &str) -> Option<bool> {
        let node = self.nodes.get(id)?;
        if self.checked.remove(id) {
            Some(false)
        } else if node.disabled {
            None
        } else {
            self.checked.insert(id.to_string());
            Some(true)
        }
    }

    pub fn set_checked(&mut self, id: &str, checked: bool) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        if checked {
            !node.disabled && self.checked.insert(id.to_string())
        } else {
            self.checked.remove(id)
        }
    }

    /// Checked, enabled files in tree order.
    pub fn checked_leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![self.root.clone()];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if node.kind == NodeKind::File && !node.disabled && self.checked.contains(&id) {
                leaves.push(id.clone());
            }
            stack.extend(node.children.iter().rev().cloned());
        }
        leaves
    }

    /// Checked files sorted by path, as listed in the selected-files panel.
    pub fn checked_files(&self) -> Vec<NodeId> {
        let mut files = self.checked_leaves();
        files.sort();
        files
    }

    pub fn select(&mut self, id: &str) -> bool {
        match self.nodes.get(id) {
            Some(node) if !node.disabled => {}
            _ => return false,
        }
        self.selected = Some(id.to_string());
        true
    }

    pub fn deselect_all(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn set_search(&mut self, query: &str) {
        let query = query.trim();
        self.search = if query.is_empty() {
            None
        } else {
            Some(query.to_lowercase())
        };
    }

    /// Visible rows below the root. With a search active, only matches, their
    /// ancestors and the descendants of matches are shown.
    pub fn rows(&self) -> Vec<TreeRow> {
        let filter = self.search.as_deref().map(|query| self.build_filter(query));
        let mut rows = Vec::new();
        if let Some(root) = self.nodes.get(&self.root) {
            self.collect_rows(&root.children, 0, filter.as_ref(), false, &mut rows);
        }
        rows
    }

    fn collect_rows(
        &self,
        ids: &[NodeId],
        depth: usize,
        filter: Option<&SearchFilter>,
        under_match: bool,
        rows: &mut Vec<TreeRow>,
    ) {
        for id in ids {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            let (visible, matched, forced_open) = match filter {
                None => (true, false, false),
                Some(filter) => {
                    let matched = filter.matches.contains(id);
                    let ancestor = filter.ancestors.contains(id);
                    (under_match || matched || ancestor, matched, ancestor)
                }
            };
            if !visible {
                continue;
            }
            let open = node.kind == NodeKind::Folder
                && (node.expansion == Expansion::Expanded || forced_open);
            rows.push(TreeRow {
                id: node.id.clone(),
                text: node.text.clone(),
                depth,
                kind: node.kind,
                expansion: if forced_open && node.loaded {
                    Expansion::Expanded
                } else {
                    node.expansion
                },
                checked: self.checked.contains(id),
                selected: self.selected.as_deref() == Some(id.as_str()),
                disabled: node.disabled,
                matched,
            });
            if open {
                self.collect_rows(&node.children, depth + 1, filter, under_match || matched, rows);
            }
        }
    }

    fn build_filter(&self, query: &str) -> SearchFilter {
        let matches: HashSet<NodeId> = self
            .nodes
            .values()
            .filter(|node| node.id != self.root && node.text.to_lowercase().contains(query))
            .map(|node| node.id.clone())
            .collect();
        let mut ancestors = HashSet::new();
        for id in &matches {
            let mut cursor = self.nodes.get(id).and_then(|node| node.parent.clone());
            while let Some(parent) = cursor {
                if parent == self.root || !ancestors.insert(parent.clone()) {
                    break;
                }
                cursor = self.nodes.get(&parent).and_then(|node| node.parent.clone());
            }
        }
        SearchFilter { matches, ancestors }
    }

    fn descendants(&self, id: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .nodes
            .get(id)
            .map(|node| node.children.clone())
            .unwrap_or_default();
        while let Some(child) = stack.pop() {
            if let Some(node) = self.nodes.get(&child) {
                stack.extend(node.children.iter().cloned());
            }
            out.push(child);
        }
        out
    }

    /// Forgets pending reopens under `parent` that its latest listing did not
    /// bring back, together with everything that was to reopen beneath them.
    fn prune_reopen(&mut self, parent: &str) {
        let mut dropped: Vec<NodeId> = self
            .reopen
            .iter()
            .filter(|(_, owner)| owner.as_str() == parent)
            .map(|(id, _)| id.clone())
            .collect();
        while let Some(id) = dropped.pop() {
            self.reopen.remove(&id);
            dropped.extend(
                self.reopen
                    .iter()
                    .filter(|(_, owner)| **owner == id)
                    .map(|(child, _)| child.clone()),
            );
        }
    }

    fn remove_descendants(&mut self, id: &str) {
        for descendant in self.descendants(id) {
            self.nodes.remove(&descendant);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.children.clear();
        }
    }
}

/// Last path component, accepting both separators.
pub fn display_name(path: &str) -> &str {
    path.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .find(|part| !part.is_empty())
        .unwrap_or(path)
}

/// Path of a sibling entry named `new_name`, keeping the parent's separator.
pub fn sibling_path(path: &str, new_name: &str) -> NodeId {
    let trimmed = path.trim_end_matches(['/', '\\']);
    match trimmed.rfind(['/', '\\']) {
        Some(idx) => format!("{}{}", &trimmed[..=idx], new_name),
        None => new_name.to_string(),
    }
}

/// Parent directory of `path`, keeping a root separator such as `/` or `C:\`.
pub fn parent_path(path: &str) -> Option<NodeId> {
    let trimmed = path.trim_end_matches(['/', '\\']);
    let idx = trimmed.rfind(['/', '\\'])?;
    let head = &trimmed[..idx];
    if head.is_empty() || head.ends_with(':') {
        Some(trimmed[..=idx].to_string())
    } else {
        Some(head.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_handles_both_separators() {
        assert_eq!(display_name("/home/me/project"), "project");
        assert_eq!(display_name("C:\\work\\src\\"), "src");
        assert_eq!(display_name("plain"), "plain");
    }

    #[test]
    fn sibling_path_replaces_last_component() {
        assert_eq!(sibling_path("a/b.txt", "c.txt"), "a/c.txt");
        assert_eq!(sibling_path("C:\\a\\b.txt", "c.txt"), "C:\\a\\c.txt");
        assert_eq!(sibling_path("b.txt", "c.txt"), "c.txt");
    }

    #[test]
    fn parent_path_keeps_root_separators() {
        assert_eq!(parent_path("/p/src/a.rs"), Some("/p/src".to_string()));
        assert_eq!(parent_path("/p/"), Some("/".to_string()));
        assert_eq!(parent_path("C:\\work\\a.rs"), Some("C:\\work".to_string()));
        assert_eq!(parent_path("C:\\work"), Some("C:\\".to_string()));
        assert_eq!(parent_path("plain"), None);
    }

    #[test]
    fn collapse_then_expand_reuses_loaded_children() {
        let mut tree = TreeModel::new("/p");
        assert_eq!(tree.expand("/p"), Some("/p".to_string()));
        tree.apply_children("/p", vec![NodeDescriptor::folder("/p/src", "src")]);
        assert_eq!(tree.expand("/p/src"), Some("/p/src".to_string()));
        tree.apply_children("/p/src", vec![NodeDescriptor::file("/p/src/a.rs", "a.rs")]);

        assert!(tree.collapse("/p/src"));
        assert_eq!(tree.expand("/p/src"), None);
        assert_eq!(tree.node("/p/src").unwrap().expansion(), Expansion::Expanded);
    }

    #[test]
    fn refresh_forgets_open_folders_that_disappeared() {
        let mut tree = TreeModel::new("/p");
        tree.expand("/p");
        tree.apply_children(
            "/p",
            vec![
                NodeDescriptor::folder("/p/old", "old"),
                NodeDescriptor::folder("/p/src", "src"),
            ],
        );
        tree.expand("/p/old");
        tree.apply_children("/p/old", vec![NodeDescriptor::folder("/p/old/deep", "deep")]);
        tree.expand("/p/old/deep");
        tree.apply_children("/p/old/deep", Vec::new());
        tree.expand("/p/src");
        tree.apply_children("/p/src", Vec::new());

        assert_eq!(tree.refresh(), Some("/p".to_string()));
        assert_eq!(tree.reopen.len(), 3);

        let reload = tree.apply_children("/p", vec![NodeDescriptor::folder("/p/src", "src")]);
        assert_eq!(reload, vec!["/p/src".to_string()]);
        assert!(tree.reopen.is_empty());

        // A folder recreated later under the old name starts closed.
        tree.apply_children("/p", vec![NodeDescriptor::folder("/p/old", "old")]);
        assert_eq!(tree.node("/p/old").unwrap().expansion(), Expansion::Collapsed);
    }

    #[test]
    fn failed_listing_drops_pending_reopens_below_it() {
        let mut tree = TreeModel::new("/p");
        tree.expand("/p");
        tree.apply_children("/p", vec![NodeDescriptor::folder("/p/src", "src")]);
        tree.expand("/p/src");
        tree.apply_children("/p/src", Vec::new());

        tree.refresh();
        tree.fail_children("/p");
        assert!(tree.reopen.is_empty());
    }

    #[test]
    fn disabled_nodes_cannot_be_checked_or_selected() {
        let mut tree = TreeModel::new("/p");
        tree.expand("/p");
        let mut hidden = NodeDescriptor::file("/p/.env", ".env");
        hidden.disabled = true;
        tree.apply_children("/p", vec![hidden]);

        assert_eq!(tree.toggle_check("/p/.env"), None);
        assert!(!tree.set_checked("/p/.env", true));
        assert!(!tree.select("/p/.env"));
        assert!(tree.checked_leaves().is_empty());
        assert_eq!(tree.selected(), None);
    }

    #[test]
    fn files_never_expand() {
        let mut tree = TreeModel::new("/p");
        tree.expand("/p");
        tree.apply_children("/p", vec![NodeDescriptor::file("/p/a.rs", "a.rs")]);
        assert_eq!(tree.expand("/p/a.rs"), None);
        assert_eq!(tree.node("/p/a.rs").unwrap().expansion(), Expansion::Collapsed);
    }
}
