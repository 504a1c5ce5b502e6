//! Back/forward navigation over visited nodes.

use crate::NodeId;

/// Browser-style history: new visits truncate everything after the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct History {
    entries: Vec<NodeId>,
    cursor: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a visit. Revisiting the entry under the cursor is a no-op.
    pub fn push(&mut self, id: NodeId) {
        if let Some(cursor) = self.cursor {
            if self.entries.get(cursor) == Some(&id) {
                return;
            }
            self.entries.truncate(cursor + 1);
        }
        self.entries.push(id);
        self.cursor = Some(self.entries.len() - 1);
    }

    pub fn back(&mut self) -> Option<&NodeId> {
        let cursor = self.cursor.filter(|&c| c > 0)?;
        self.cursor = Some(cursor - 1);
        self.entries.get(cursor - 1)
    }

    pub fn forward(&mut self) -> Option<&NodeId> {
        let cursor = self.cursor.filter(|&c| c + 1 < self.entries.len())?;
        self.cursor = Some(cursor + 1);
        self.entries.get(cursor + 1)
    }

    pub fn can_go_back(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 < self.entries.len())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    pub fn entries(&self) -> &[NodeId] {
        &self.entries
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<&NodeId> {
        self.cursor.and_then(|c| self.entries.get(c))
    }
}
