//! Context menu descriptors computed from node and membership state.

use crate::tree::TreeNode;
use crate::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Preview,
    CopyPath,
    ToggleFavorite,
    ToggleHidden,
    Rename,
    Delete,
    ToggleSelect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub action: MenuAction,
    pub label: &'static str,
    pub enabled: bool,
    pub separator_before: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuDescriptor {
    pub node: NodeId,
    pub items: Vec<MenuItem>,
}

impl MenuDescriptor {
    pub fn item(&self, action: MenuAction) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.action == action)
    }

    pub fn is_enabled(&self, action: MenuAction) -> bool {
        self.item(action).is_some_and(|item| item.enabled)
    }
}

/// Everything about the node's surroundings the menu depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuContext {
    pub is_root: bool,
    pub is_favorite: bool,
    pub is_hidden: bool,
    pub is_checked: bool,
}

pub fn build_menu(node: &TreeNode, ctx: &MenuContext) -> MenuDescriptor {
    let item = |action, label, enabled, separator_before| MenuItem {
        action,
        label,
        enabled,
        separator_before,
    };
    MenuDescriptor {
        node: node.id().to_string(),
        items: vec![
            item(
                MenuAction::Preview,
                "Preview",
                !node.is_folder() && !node.disabled(),
                false,
            ),
            item(MenuAction::CopyPath, "Copy Path", true, false),
            item(
                MenuAction::ToggleFavorite,
                if ctx.is_favorite {
                    "Remove from Favorites"
                } else {
                    "Add to Favorites"
                },
                true,
                true,
            ),
            item(
                MenuAction::ToggleHidden,
                if ctx.is_hidden { "Show" } else { "Hide" },
                true,
                false,
            ),
            item(MenuAction::Rename, "Rename", !ctx.is_root, false),
            item(MenuAction::Delete, "Delete", !ctx.is_root, false),
            item(
                MenuAction::ToggleSelect,
                if ctx.is_checked { "Deselect" } else { "Select" },
                !node.disabled() || ctx.is_checked,
                true,
            ),
        ],
    }
}
