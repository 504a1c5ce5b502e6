//! Line commands typed at the console, resolved against the current view.

use explorer_core::{AppViewModel, MenuAction, Msg, NodeId, PendingInput, Tab};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(Vec<Msg>),
    ShowMenu(NodeId),
    Help,
    Quit,
}

pub fn parse(
    line: &str,
    view: &AppViewModel,
    pending: Option<&PendingInput>,
) -> Result<Command, String> {
    let line = line.trim();

    if view.alert.is_some() {
        return match line {
            "" | "ok" => Ok(send(Msg::AlertDismissed)),
            "quit" | "q" => Ok(Command::Quit),
            _ => Err("Press Enter to dismiss the alert first.".to_string()),
        };
    }

    match pending {
        Some(PendingInput::RenameName { .. }) => {
            return Ok(match line {
                "" | "cancel" => send(Msg::InputCancelled),
                name => send(Msg::RenameSubmitted(name.to_string())),
            });
        }
        Some(PendingInput::ConfirmDelete { .. }) => {
            return match line.to_ascii_lowercase().as_str() {
                "y" | "yes" => Ok(send(Msg::DeleteConfirmed)),
                "n" | "no" | "cancel" | "" => Ok(send(Msg::InputCancelled)),
                _ => Err("Answer yes or no.".to_string()),
            };
        }
        None => {}
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "" => return Err(String::new()),
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        "open" | "o" => send(Msg::NodeClicked(row_id(view, rest)?)),
        "expand" | "x" => send(Msg::ExpandToggled(row_id(view, rest)?)),
        "check" | "c" => {
            if rest.is_empty() {
                return Err("Usage: check <row> [row...]".to_string());
            }
            let msgs = rest
                .split_whitespace()
                .map(|token| row_id(view, token).map(Msg::CheckToggled))
                .collect::<Result<Vec<_>, _>>()?;
            Command::Send(msgs)
        }
        "uncheck" | "u" => {
            let ids = rest
                .split_whitespace()
                .map(|token| numbered(&view.checked_files, token))
                .collect::<Result<Vec<_>, _>>()?;
            send(Msg::FilesDeselected(ids))
        }
        "menu" | "m" => Command::ShowMenu(row_id(view, rest)?),
        "do" => {
            let (row, action) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "Usage: do <row> <action>".to_string())?;
            send(Msg::MenuActionChosen {
                node: row_id(view, row)?,
                action: parse_action(action.trim())?,
            })
        }
        "search" | "s" | "/" => send(Msg::SearchChanged(rest.to_string())),
        "refresh" | "r" => send(Msg::RefreshClicked),
        "back" | "b" => send(Msg::BackClicked),
        "forward" | "f" => send(Msg::ForwardClicked),
        "tab" => match rest {
            "options" => send(Msg::TabSelected(Tab::Options)),
            "code" => send(Msg::TabSelected(Tab::Code)),
            _ => return Err("Usage: tab options|code".to_string()),
        },
        "generate" | "g" => send(Msg::GenerateCodeClicked),
        "structure" => send(Msg::TreeStructureRequested),
        "copy" => match rest {
            "code" => send(Msg::CopyCodeClicked),
            "tree" => send(Msg::CopyTreeClicked),
            "all" => send(Msg::CopyAllClicked),
            _ => return Err("Usage: copy code|tree|all".to_string()),
        },
        "ext" => match rest {
            "" => return Err("Usage: ext <extension>|all|none|save".to_string()),
            "all" => send(Msg::SelectAllExtensions),
            "none" => send(Msg::ClearAllExtensions),
            "save" => send(Msg::SaveExtensionsClicked),
            ext => send(Msg::ExtensionToggled(ext.to_string())),
        },
        "fav" => match rest.split_once(char::is_whitespace) {
            Some(("open", target)) => {
                let target = target.trim();
                let path = if target.chars().all(|c| c.is_ascii_digit()) {
                    numbered(&view.favorites, target)?
                } else {
                    target.to_string()
                };
                send(Msg::FavoriteOpened(path))
            }
            _ => list_edit(rest, Msg::FavoriteAdded, Msg::FavoriteRemoved)?,
        },
        "hide" => list_edit(rest, Msg::HiddenAdded, Msg::HiddenRemoved)?,
        "show-hidden" => send(Msg::ShowHiddenToggled),
        "theme" => send(Msg::ThemeToggled),
        other => return Err(format!("Unknown command '{other}'. Type 'help'.")),
    };
    Ok(command)
}

fn send(msg: Msg) -> Command {
    Command::Send(vec![msg])
}

/// Rows are numbered from 1 as rendered.
fn row_id(view: &AppViewModel, token: &str) -> Result<NodeId, String> {
    let index = parse_number(token)?;
    index
        .checked_sub(1)
        .and_then(|i| view.rows.get(i))
        .map(|row| row.id.clone())
        .ok_or_else(|| format!("No row {index}"))
}

/// Entry of a rendered 1-based list, such as checked files or favorites.
fn numbered(items: &[String], token: &str) -> Result<String, String> {
    let index = parse_number(token)?;
    index
        .checked_sub(1)
        .and_then(|i| items.get(i))
        .cloned()
        .ok_or_else(|| format!("No entry {index}"))
}

fn parse_number(token: &str) -> Result<usize, String> {
    token
        .trim()
        .parse()
        .map_err(|_| format!("'{token}' is not a number"))
}

fn parse_action(raw: &str) -> Result<MenuAction, String> {
    Ok(match raw {
        "preview" => MenuAction::Preview,
        "copy-path" | "path" => MenuAction::CopyPath,
        "favorite" | "fav" => MenuAction::ToggleFavorite,
        "hide" | "show" => MenuAction::ToggleHidden,
        "rename" => MenuAction::Rename,
        "delete" => MenuAction::Delete,
        "select" | "deselect" => MenuAction::ToggleSelect,
        other => return Err(format!("Unknown action '{other}'")),
    })
}

fn list_edit(
    rest: &str,
    add: fn(String) -> Msg,
    remove: fn(String) -> Msg,
) -> Result<Command, String> {
    match rest.split_once(char::is_whitespace) {
        Some(("add", path)) => Ok(send(add(path.trim().to_string()))),
        Some(("rm", path)) => Ok(send(remove(path.trim().to_string()))),
        _ => Err("Usage: fav add|rm|open <path>, hide add|rm <path>".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use explorer_core::{Expansion, NodeKind, TreeRow};

    fn view_with_rows(ids: &[&str]) -> AppViewModel {
        AppViewModel {
            rows: ids
                .iter()
                .map(|id| TreeRow {
                    id: id.to_string(),
                    text: id.rsplit('/').next().unwrap_or(id).to_string(),
                    depth: 0,
                    kind: NodeKind::File,
                    expansion: Expansion::Collapsed,
                    checked: false,
                    selected: false,
                    disabled: false,
                    matched: false,
                })
                .collect(),
            ..AppViewModel::default()
        }
    }

    #[test]
    fn row_numbers_resolve_to_node_ids() {
        let view = view_with_rows(&["/p", "/p/a.rs", "/p/b.rs"]);
        assert_eq!(
            parse("check 2 3", &view, None),
            Ok(Command::Send(vec![
                Msg::CheckToggled("/p/a.rs".into()),
                Msg::CheckToggled("/p/b.rs".into()),
            ]))
        );
        assert_eq!(
            parse("do 2 rename", &view, None),
            Ok(send(Msg::MenuActionChosen {
                node: "/p/a.rs".into(),
                action: MenuAction::Rename,
            }))
        );
        assert!(parse("open 0", &view, None).is_err());
        assert!(parse("open 4", &view, None).is_err());
    }

    #[test]
    fn alert_blocks_other_commands() {
        let view = AppViewModel {
            alert: Some("Deleted successfully!".into()),
            ..view_with_rows(&["/p"])
        };
        assert_eq!(parse("", &view, None), Ok(send(Msg::AlertDismissed)));
        assert!(parse("refresh", &view, None).is_err());
    }

    #[test]
    fn pending_rename_takes_the_whole_line() {
        let view = view_with_rows(&["/p"]);
        let pending = PendingInput::RenameName {
            path: "/p/a b.txt".into(),
            current_name: "a b.txt".into(),
        };
        assert_eq!(
            parse("new name.txt", &view, Some(&pending)),
            Ok(send(Msg::RenameSubmitted("new name.txt".into())))
        );
        assert_eq!(
            parse("cancel", &view, Some(&pending)),
            Ok(send(Msg::InputCancelled))
        );
    }

    #[test]
    fn delete_confirmation_needs_yes_or_no() {
        let view = view_with_rows(&["/p"]);
        let pending = PendingInput::ConfirmDelete {
            path: "/p/a".into(),
            name: "a".into(),
        };
        assert_eq!(parse("YES", &view, Some(&pending)), Ok(send(Msg::DeleteConfirmed)));
        assert_eq!(parse("n", &view, Some(&pending)), Ok(send(Msg::InputCancelled)));
        assert!(parse("maybe", &view, Some(&pending)).is_err());
    }

    #[test]
    fn search_keeps_inner_spaces_and_empty_clears() {
        let view = AppViewModel::default();
        assert_eq!(
            parse("search main rs", &view, None),
            Ok(send(Msg::SearchChanged("main rs".into())))
        );
        assert_eq!(parse("search", &view, None), Ok(send(Msg::SearchChanged(String::new()))));
    }

    #[test]
    fn list_edits_and_extensions() {
        let view = AppViewModel::default();
        assert_eq!(
            parse("fav add /p/src", &view, None),
            Ok(send(Msg::FavoriteAdded("/p/src".into())))
        );
        assert_eq!(
            parse("hide rm /p/target", &view, None),
            Ok(send(Msg::HiddenRemoved("/p/target".into())))
        );
        assert_eq!(
            parse("ext .rs", &view, None),
            Ok(send(Msg::ExtensionToggled(".rs".into())))
        );
        assert_eq!(parse("ext all", &view, None), Ok(send(Msg::SelectAllExtensions)));
        assert!(parse("fav /p/src", &view, None).is_err());
    }

    #[test]
    fn favorites_open_by_number_or_path() {
        let view = AppViewModel {
            favorites: vec!["/p/src".into(), "/p/src/main.rs".into()],
            ..AppViewModel::default()
        };
        assert_eq!(
            parse("fav open 2", &view, None),
            Ok(send(Msg::FavoriteOpened("/p/src/main.rs".into())))
        );
        assert_eq!(
            parse("fav open /q/docs", &view, None),
            Ok(send(Msg::FavoriteOpened("/q/docs".into())))
        );
        assert!(parse("fav open 3", &view, None).is_err());
    }

    #[test]
    fn uncheck_indexes_the_checked_list() {
        let view = AppViewModel {
            checked_files: vec!["/p/a.rs".into(), "/p/b.rs".into(), "/p/c.rs".into()],
            ..view_with_rows(&["/p/c.rs"])
        };
        assert_eq!(
            parse("uncheck 3 1", &view, None),
            Ok(send(Msg::FilesDeselected(vec![
                "/p/c.rs".into(),
                "/p/a.rs".into()
            ])))
        );
        assert_eq!(parse("uncheck", &view, None), Ok(send(Msg::FilesDeselected(vec![]))));
        assert!(parse("uncheck 4", &view, None).is_err());
    }
}
