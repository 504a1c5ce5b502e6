use explorer_core::{
    AppViewModel, Expansion, MenuAction, MenuDescriptor, NodeKind, Tab, TreeRow,
};

pub const HELP: &str = "\
Tree:     open N | expand N | check N [N...] | menu N | do N <action>
          uncheck N [N...] (numbers from the checked files list)
          search <text> | refresh | back | forward
Actions:  preview, copy-path, favorite, hide, rename, delete, select
Options:  ext <ext>|all|none|save | fav add|rm <path> | fav open N|<path>
          hide add|rm <path>
          show-hidden | theme
Code:     tab options|code | generate | structure | copy code|tree|all
Other:    help | quit";

pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let nav = format!(
        "{} back | forward {}",
        if view.can_go_back { "<" } else { " " },
        if view.can_go_forward { ">" } else { " " }
    );
    lines.push(format!(
        "== {} == theme: {} | hidden items: {} | {}",
        view.base_dir,
        view.theme,
        if view.show_hidden { "shown" } else { "hidden" },
        nav
    ));
    if !view.search_input.is_empty() {
        lines.push(format!("Search: {}", view.search_input));
    }

    for (index, row) in view.rows.iter().enumerate() {
        lines.push(render_row(index + 1, row));
    }
    lines.push(format!("Checked files ({}):", view.checked_files.len()));
    lines.extend(numbered_lines(&view.checked_files));

    match view.active_tab {
        Tab::Options => {
            lines.push("-- Options --".to_string());
            let extensions = view
                .extensions
                .iter()
                .map(|ext| format!("[{}] {}", if ext.selected { "x" } else { " " }, ext.name))
                .collect::<Vec<_>>();
            lines.push(format!("Extensions: {}", join_or_none(&extensions)));
            lines.push("Favorites:".to_string());
            if view.favorites.is_empty() {
                lines.push("  (none)".to_string());
            }
            lines.extend(numbered_lines(&view.favorites));
            lines.push(format!("Hidden: {}", join_or_none(&view.hidden)));
        }
        Tab::Code => {
            lines.push("-- Code --".to_string());
            lines.extend(view.code_text.lines().map(str::to_string));
            if !view.tree_text.is_empty() {
                lines.push("-- Tree structure --".to_string());
                lines.extend(view.tree_text.lines().map(str::to_string));
            }
        }
    }

    if !view.preview_text.is_empty() {
        lines.push("-- Preview --".to_string());
        lines.extend(view.preview_text.lines().map(str::to_string));
    }

    if let Some(notice) = &view.notice {
        lines.push(format!("Note: {notice}"));
    }
    if let Some(alert) = &view.alert {
        lines.push(format!("!! {alert} (press Enter)"));
    } else if let Some(prompt) = &view.prompt {
        lines.push(format!("?? {prompt}"));
    }
    lines
}

pub fn render_menu(menu: &MenuDescriptor) -> Vec<String> {
    let mut lines = vec![format!("Menu for {}", menu.node)];
    for item in &menu.items {
        if item.separator_before {
            lines.push("  ----".to_string());
        }
        lines.push(format!(
            "  {:<10} {}{}",
            action_keyword(item.action),
            item.label,
            if item.enabled { "" } else { " (disabled)" }
        ));
    }
    lines
}

fn render_row(number: usize, row: &TreeRow) -> String {
    let marker = match (row.kind, row.expansion) {
        (NodeKind::File, _) => ' ',
        (NodeKind::Folder, Expansion::Collapsed) => '+',
        (NodeKind::Folder, Expansion::Loading) => '~',
        (NodeKind::Folder, Expansion::Expanded) => '-',
    };
    let mut line = format!(
        "{:>3}{}[{}] {}{} {}",
        number,
        if row.selected { '>' } else { ' ' },
        if row.checked { 'x' } else { ' ' },
        "  ".repeat(row.depth),
        marker,
        row.text
    );
    if row.kind == NodeKind::Folder {
        line.push('/');
    }
    if row.disabled {
        line.push_str(" (hidden)");
    }
    if row.matched {
        line.push_str(" *");
    }
    line
}

fn action_keyword(action: MenuAction) -> &'static str {
    match action {
        MenuAction::Preview => "preview",
        MenuAction::CopyPath => "copy-path",
        MenuAction::ToggleFavorite => "favorite",
        MenuAction::ToggleHidden => "hide",
        MenuAction::Rename => "rename",
        MenuAction::Delete => "delete",
        MenuAction::ToggleSelect => "select",
    }
}

fn numbered_lines(items: &[String]) -> impl Iterator<Item = String> + '_ {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| format!("  {}. {}", index + 1, item))
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}
