//! Extension filters, favorites and hidden paths.
//!
//! All mutators report whether anything changed so the caller only persists
//! real changes. Favorites and hidden paths are kept deduplicated and sorted.

use crate::OptionsSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptionsState {
    known_extensions: Vec<String>,
    selected_extensions: Vec<String>,
    favorites: Vec<String>,
    hidden: Vec<String>,
}

impl OptionsState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces extensions and favorites with what the backend reported.
    pub fn apply_snapshot(&mut self, snapshot: OptionsSnapshot) {
        let mut known = Vec::with_capacity(snapshot.known_extensions.len());
        for ext in snapshot.known_extensions {
            if !known.contains(&ext) {
                known.push(ext);
            }
        }
        self.selected_extensions = known
            .iter()
            .filter(|ext| snapshot.selected_extensions.contains(ext))
            .cloned()
            .collect();
        self.known_extensions = known;
        self.favorites = normalize(snapshot.favorites);
    }

    pub fn apply_hidden(&mut self, hidden: Vec<String>) {
        self.hidden = normalize(hidden);
    }

    pub fn known_extensions(&self) -> &[String] {
        &self.known_extensions
    }

    pub fn selected_extensions(&self) -> &[String] {
        &self.selected_extensions
    }

    pub fn is_extension_selected(&self, ext: &str) -> bool {
        self.selected_extensions.iter().any(|e| e == ext)
    }

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    pub fn hidden(&self) -> &[String] {
        &self.hidden
    }

    pub fn is_favorite(&self, path: &str) -> bool {
        self.favorites.binary_search_by(|f| f.as_str().cmp(path)).is_ok()
    }

    pub fn is_hidden(&self, path: &str) -> bool {
        self.hidden.binary_search_by(|h| h.as_str().cmp(path)).is_ok()
    }

    pub fn select_all(&mut self) -> bool {
        if self.selected_extensions == self.known_extensions {
            return false;
        }
        self.selected_extensions = self.known_extensions.clone();
        true
    }

    pub fn clear_all(&mut self) -> bool {
        if self.selected_extensions.is_empty() {
            return false;
        }
        self.selected_extensions.clear();
        true
    }

    /// Flips a known extension. Selection keeps the order of the known list.
    pub fn toggle_extension(&mut self, ext: &str) -> bool {
        if !self.known_extensions.iter().any(|k| k == ext) {
            return false;
        }
        if self.is_extension_selected(ext) {
            self.selected_extensions.retain(|e| e != ext);
        } else {
            let selected = &self.selected_extensions;
            self.selected_extensions = self
                .known_extensions
                .iter()
                .filter(|k| *k == ext || selected.contains(k))
                .cloned()
                .collect();
        }
        true
    }

    pub fn add_favorite(&mut self, path: &str) -> bool {
        insert_sorted(&mut self.favorites, path)
    }

    pub fn remove_favorite(&mut self, path: &str) -> bool {
        remove_sorted(&mut self.favorites, path)
    }

    pub fn add_hidden(&mut self, path: &str) -> bool {
        insert_sorted(&mut self.hidden, path)
    }

    pub fn remove_hidden(&mut self, path: &str) -> bool {
        remove_sorted(&mut self.hidden, path)
    }
}

fn normalize(mut paths: Vec<String>) -> Vec<String> {
    paths.retain(|p| !p.trim().is_empty());
    paths.sort();
    paths.dedup();
    paths
}

fn insert_sorted(list: &mut Vec<String>, path: &str) -> bool {
    let path = path.trim();
    if path.is_empty() {
        return false;
    }
    match list.binary_search_by(|p| p.as_str().cmp(path)) {
        Ok(_) => false,
        Err(pos) => {
            list.insert(pos, path.to_string());
            true
        }
    }
}

fn remove_sorted(list: &mut Vec<String>, path: &str) -> bool {
    match list.binary_search_by(|p| p.as_str().cmp(path)) {
        Ok(pos) => {
            list.remove(pos);
            true
        }
        Err(_) => false,
    }
}
