//! Tests for adapter classification and the registry.

use strum::IntoEnumIterator;
use wordle_board::{
    AdapterError, AdapterRegistry, GameAdapterConfig, RowResult, TileState, UnknownGame, presets,
};

fn states(labels: &[&str]) -> Vec<Option<String>> {
    labels.iter().map(|l| Some(l.to_string())).collect()
}

#[test]
fn test_builtin_adapters_are_valid() {
    let registry = AdapterRegistry::builtin();
    assert_eq!(registry.ids().collect::<Vec<_>>(), ["nyt", "wordly"]);
    for (id, config) in registry.iter() {
        assert!(config.validate().is_ok(), "{id} should be valid");
    }
}

#[test]
fn test_lookup_unknown_game() {
    let registry = AdapterRegistry::builtin();
    let err = registry.lookup("quordle").unwrap_err();
    assert_eq!(
        err,
        UnknownGame {
            game_id: "quordle".to_string()
        }
    );
    assert_eq!(err.to_string(), "unknown game `quordle`");
}

#[test]
fn test_row_selector_is_one_based() {
    let nyt = presets::nyt();
    assert_eq!(nyt.row_selector(1), "[role='group']:nth-child(1)");
    let wordly = presets::wordly();
    assert_eq!(wordly.row_selector(6), "div.Row:nth-child(6)");
}

#[test]
fn test_every_tile_state_has_a_distinct_label() {
    for adapter in [presets::nyt(), presets::wordly()] {
        for state in TileState::iter() {
            let label = adapter.label_for(state);
            assert_eq!(adapter.tile_state(label), Some(state), "{state} on {}", adapter.name());
            assert!(!adapter.is_unresolved(label));
        }
    }

    let names: Vec<String> = TileState::iter().map(|s| s.to_string()).collect();
    assert_eq!(names, ["correct", "present", "absent"]);
    // The data-state site uses the lowercase state names as labels.
    let nyt = presets::nyt();
    assert!(TileState::iter().all(|s| nyt.label_for(s) == s.to_string()));
}

#[test]
fn test_start_and_popup_selectors() {
    let nyt = presets::nyt();
    assert_eq!(
        nyt.start_selector().as_deref(),
        Some("button[data-testid='Play']")
    );
    assert_eq!(nyt.dismiss_selectors(), &["[data-testid='icon-close']"]);

    let wordly = presets::wordly();
    assert!(wordly.start_selector().is_none());
    assert!(wordly.dismiss_selectors().is_empty());

    assert_eq!(
        presets::nyt().with_start_selector(" ").validate(),
        Err(AdapterError::EmptyField {
            field: "start_selector"
        })
    );
    assert_eq!(
        presets::wordly()
            .with_dismiss_selectors(vec![String::new()])
            .validate(),
        Err(AdapterError::EmptyField {
            field: "dismiss_selectors"
        })
    );
}

#[test]
fn test_classify_data_state_feedback() {
    let nyt = presets::nyt();
    let result = nyt.classify(&states(&["absent", "present", "correct", "absent", "present"]));
    assert_eq!(result, RowResult::Feedback("bygby".parse().unwrap()));
}

#[test]
fn test_classify_class_list_feedback() {
    let wordly = presets::wordly();
    let result = wordly.classify(&states(&[
        "Row-letter letter-correct",
        "Row-letter  letter-elsewhere",
        "Row-letter letter-absent",
        "Row-letter letter-absent",
        "Row-letter letter-correct",
    ]));
    let feedback = result.feedback().expect("Should be accepted");
    assert_eq!(feedback.tiles()[1], TileState::Present);
    assert_eq!(feedback.to_string(), "gybbg");
}

#[test]
fn test_classify_unresolved_first_tile_is_rejected() {
    let nyt = presets::nyt();
    let result = nyt.classify(&states(&["tbd", "tbd", "tbd", "tbd", "tbd"]));
    assert_eq!(result, RowResult::Rejected);

    let wordly = presets::wordly();
    let result = wordly.classify(&states(&[
        "Row-letter selected",
        "Row-letter",
        "Row-letter",
        "Row-letter",
        "Row-letter",
    ]));
    assert_eq!(result, RowResult::Rejected);
}

#[test]
fn test_classify_wrong_tile_count_is_indeterminate() {
    let nyt = presets::nyt();
    let result = nyt.classify(&states(&["correct", "correct", "correct", "correct"]));
    assert_eq!(result, RowResult::Indeterminate);
    assert_eq!(nyt.classify(&[]), RowResult::Indeterminate);
}

#[test]
fn test_classify_unknown_or_missing_label_is_indeterminate() {
    let nyt = presets::nyt();
    let result = nyt.classify(&states(&["correct", "empty", "absent", "absent", "absent"]));
    assert_eq!(result, RowResult::Indeterminate);

    let mut partial = states(&["correct", "correct", "absent", "absent", "absent"]);
    partial[4] = None;
    assert_eq!(nyt.classify(&partial), RowResult::Indeterminate);
    assert_eq!(nyt.settled_tiles(&partial), 4);
}

#[test]
fn test_validate_rejects_missing_placeholder() {
    let config = presets::nyt().with_row_selector_template("[role='group']");
    assert_eq!(
        config.validate(),
        Err(AdapterError::RowPlaceholder { found: 0 })
    );

    let config = presets::nyt().with_row_selector_template("{row} {row}");
    assert_eq!(
        config.validate(),
        Err(AdapterError::RowPlaceholder { found: 2 })
    );
}

#[test]
fn test_validate_rejects_empty_field() {
    let config = GameAdapterConfig::new("Blank", "https://example.com");
    assert_eq!(
        config.validate(),
        Err(AdapterError::EmptyField {
            field: "board_selector"
        })
    );
}

#[test]
fn test_validate_rejects_duplicate_labels() {
    let config = presets::nyt().with_absent_label("present");
    assert!(matches!(
        config.validate(),
        Err(AdapterError::DuplicateLabel { .. })
    ));
}

#[test]
fn test_register_replaces_and_validates() {
    let mut registry = AdapterRegistry::new();
    assert!(registry.is_empty());

    registry
        .register("mirror", presets::nyt().with_url("https://mirror.example/wordle"))
        .expect("Valid adapter");
    assert_eq!(
        registry.lookup("mirror").unwrap().url(),
        "https://mirror.example/wordle"
    );

    let invalid = presets::nyt().with_tile_selector("");
    assert!(registry.register("broken", invalid).is_err());
    assert!(registry.lookup("broken").is_err());
    assert_eq!(registry.len(), 1);
}
