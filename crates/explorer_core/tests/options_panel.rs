use std::sync::Once;
use std::time::{Duration, Instant};

use explorer_core::{update, AppState, Effect, Msg, NodeDescriptor, OptionsSnapshot, Preferences};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(explorer_logging::initialize_for_tests);
}

fn loaded(show_hidden: bool) -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::Started {
            base_dir: "/p".to_string(),
            preferences: Preferences {
                show_hidden,
                ..Preferences::default()
            },
        },
    );
    let (state, _) = update(
        state,
        Msg::ChildrenLoaded {
            parent: "/p".to_string(),
            result: Ok(vec![NodeDescriptor::file("/p/main.rs", "main.rs")]),
        },
    );
    let (state, _) = update(
        state,
        Msg::OptionsLoaded(Ok(OptionsSnapshot {
            known_extensions: vec![".rs".into(), ".py".into(), ".md".into()],
            selected_extensions: vec![".rs".into()],
            favorites: vec![],
        })),
    );
    state
}

fn reload_count(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|effect| matches!(effect, Effect::LoadChildren { .. }))
        .count()
}

#[test]
fn favorites_stay_sorted_and_deduplicated() {
    init_logging();
    let mut state = loaded(false);
    let mut saves = Vec::new();
    let steps = [
        Msg::FavoriteAdded("z".into()),
        Msg::FavoriteAdded("a".into()),
        Msg::FavoriteAdded("m".into()),
        Msg::FavoriteAdded("a".into()),
        Msg::FavoriteRemoved("m".into()),
        Msg::FavoriteRemoved("missing".into()),
        Msg::FavoriteAdded("b".into()),
    ];
    for msg in steps {
        let (next, effects) = update(state, msg);
        saves.extend(effects);
        state = next;
    }

    assert_eq!(state.options().favorites(), ["a", "b", "z"]);
    // Duplicate adds and unknown removals are not persisted.
    assert_eq!(saves.len(), 5);
    assert_eq!(
        saves.last(),
        Some(&Effect::SaveFavorites(vec![
            "a".to_string(),
            "b".to_string(),
            "z".to_string()
        ]))
    );
}

#[test]
fn blank_favorite_and_hidden_inputs_are_ignored() {
    init_logging();
    let (state, effects) = update(loaded(false), Msg::FavoriteAdded("  ".into()));
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::HiddenAdded(String::new()));
    assert!(effects.is_empty());
    assert!(state.options().favorites().is_empty());
    assert!(state.options().hidden().is_empty());
}

#[test]
fn select_all_then_clear_all() {
    init_logging();
    let (state, effects) = update(loaded(false), Msg::SelectAllExtensions);
    let mut selected = state.options().selected_extensions().to_vec();
    let mut known = state.options().known_extensions().to_vec();
    selected.sort();
    known.sort();
    assert_eq!(selected, known);
    assert_eq!(
        effects,
        vec![Effect::SaveExtensions {
            extensions: vec![".rs".into(), ".py".into(), ".md".into()],
            explicit: false,
        }]
    );

    let (state, effects) = update(state, Msg::ClearAllExtensions);
    assert!(state.options().selected_extensions().is_empty());
    assert_eq!(
        effects,
        vec![Effect::SaveExtensions {
            extensions: vec![],
            explicit: false,
        }]
    );
}

#[test]
fn successful_extension_save_refreshes_tree() {
    init_logging();
    let (state, effects) = update(
        loaded(false),
        Msg::ExtensionsSaved {
            explicit: false,
            result: Ok(()),
        },
    );
    assert_eq!(reload_count(&effects), 1);
    assert_eq!(state.view().alert, None);

    let (state, effects) = update(
        state,
        Msg::ExtensionsSaved {
            explicit: true,
            result: Ok(()),
        },
    );
    assert_eq!(reload_count(&effects), 1);
    assert_eq!(state.view().alert.as_deref(), Some("Extensions saved"));

    let (state, effects) = update(
        state,
        Msg::ExtensionsSaved {
            explicit: true,
            result: Err("offline".into()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.alerts().count(), 1);
}

#[test]
fn extension_changes_autosave_after_idle_window() {
    init_logging();
    let t0 = Instant::now();
    let (state, _) = update(loaded(false), Msg::Tick(t0));

    let (state, effects) = update(state, Msg::ExtensionToggled(".py".into()));
    assert!(effects.is_empty());
    let (state, _) = update(state, Msg::Tick(t0 + Duration::from_millis(300)));
    let (state, effects) = update(state, Msg::ExtensionToggled(".md".into()));
    assert!(effects.is_empty());
    let (state, _) = update(state, Msg::Tick(t0 + Duration::from_millis(310)));
    let (state, effects) = update(state, Msg::Tick(t0 + Duration::from_millis(800)));
    assert!(effects.is_empty());

    let (state, effects) = update(state, Msg::Tick(t0 + Duration::from_millis(810)));
    assert_eq!(
        effects,
        vec![Effect::SaveExtensions {
            extensions: vec![".rs".into(), ".py".into(), ".md".into()],
            explicit: false,
        }]
    );

    let (_state, effects) = update(state, Msg::Tick(t0 + Duration::from_secs(5)));
    assert!(effects.is_empty());
}

#[test]
fn explicit_save_supersedes_pending_autosave() {
    init_logging();
    let t0 = Instant::now();
    let (state, _) = update(loaded(false), Msg::Tick(t0));
    let (state, _) = update(state, Msg::ExtensionToggled(".py".into()));
    let (state, effects) = update(state, Msg::SaveExtensionsClicked);
    assert_eq!(
        effects,
        vec![Effect::SaveExtensions {
            extensions: vec![".rs".into(), ".py".into()],
            explicit: true,
        }]
    );

    let (_state, effects) = update(state, Msg::Tick(t0 + Duration::from_secs(1)));
    assert!(effects.is_empty());
}

#[test]
fn loading_options_does_not_trigger_autosave() {
    init_logging();
    let t0 = Instant::now();
    let (state, _) = update(loaded(false), Msg::Tick(t0));
    let (_state, effects) = update(state, Msg::Tick(t0 + Duration::from_secs(1)));
    assert!(effects.is_empty());
}

#[test]
fn hidden_save_refreshes_only_when_hidden_items_are_not_shown() {
    init_logging();
    let (state, effects) = update(loaded(false), Msg::HiddenAdded("/p/main.rs".into()));
    assert_eq!(
        effects,
        vec![Effect::SaveHidden(vec!["/p/main.rs".to_string()])]
    );
    let (state, effects) = update(state, Msg::HiddenSaved(Ok(())));
    assert_eq!(reload_count(&effects), 1);
    let (_state, effects) = update(state, Msg::HiddenRemoved("/p/main.rs".into()));
    assert_eq!(effects, vec![Effect::SaveHidden(vec![])]);

    let (state, _) = update(loaded(true), Msg::HiddenAdded("/p/main.rs".into()));
    let (_state, effects) = update(state, Msg::HiddenSaved(Ok(())));
    assert_eq!(reload_count(&effects), 0);
}

#[test]
fn failed_persistence_keeps_local_change_and_shows_notice() {
    init_logging();
    let (state, _) = update(loaded(false), Msg::FavoriteAdded("/p/main.rs".into()));
    let (state, effects) = update(state, Msg::FavoritesSaved(Err("503".into())));

    assert!(effects.is_empty());
    assert_eq!(state.options().favorites(), ["/p/main.rs"]);
    let view = state.view();
    assert_eq!(view.notice.as_deref(), Some("Failed to save favorites: 503"));
    assert_eq!(view.alert, None);
}

#[test]
fn failed_option_loads_leave_state_unchanged() {
    init_logging();
    let state = loaded(false);
    let (state, _) = update(state, Msg::HiddenLoaded(Ok(vec!["/p/b".into(), "/p/a".into()])));
    let before = state.options().clone();

    let (state, effects) = update(state, Msg::OptionsLoaded(Err("refused".into())));
    assert!(effects.is_empty());
    let (state, _) = update(state, Msg::HiddenLoaded(Err("refused".into())));
    assert_eq!(state.options(), &before);
    assert_eq!(state.options().hidden(), ["/p/a", "/p/b"]);
}

#[test]
fn theme_toggle_persists_preference() {
    init_logging();
    let (state, effects) = update(loaded(false), Msg::ThemeToggled);
    assert_eq!(
        effects,
        vec![Effect::SavePreferences(Preferences {
            theme: explorer_core::Theme::Dark,
            show_hidden: false,
        })]
    );
    assert_eq!(state.view().theme, explorer_core::Theme::Dark);
}
