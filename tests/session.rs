//! Session Integration Tests
//!
//! Drives the remix screen state machine through whole user flows.

use remixer::core::{update, Effect, Msg, Session, ShareAction};
use remixer::domain::{Notice, Platform, RemixResult};

fn with_input(text: &str) -> Session {
    update(Session::new(), Msg::InputChanged(text.to_string())).0
}

fn thread(items: &[&str]) -> RemixResult {
    RemixResult::Sequence(items.iter().map(|s| s.to_string()).collect())
}

#[test]
fn test_blank_input_cannot_remix() {
    let state = with_input("   \n ");
    assert!(!state.can_remix(Platform::Twitter));

    let (state, effects) = update(state, Msg::RemixClicked(Platform::Twitter));
    assert!(effects.is_empty());
    assert!(!state.is_loading(Platform::Twitter));
}

#[test]
fn test_remix_click_emits_exactly_one_request() {
    let state = with_input("We shipped v2");
    let (state, effects) = update(state, Msg::RemixClicked(Platform::LinkedIn));

    assert_eq!(effects.len(), 1);
    match &effects[0] {
        Effect::Remix(request) => {
            assert_eq!(request.platform(), Platform::LinkedIn);
            assert_eq!(request.source_text(), "We shipped v2");
        }
        other => panic!("expected remix effect, got {:?}", other),
    }
    assert!(state.is_loading(Platform::LinkedIn));

    // Second click while loading does nothing
    let (state, effects) = update(state, Msg::RemixClicked(Platform::LinkedIn));
    assert!(effects.is_empty());
    assert!(state.is_loading(Platform::LinkedIn));
}

#[test]
fn test_platforms_load_independently() {
    let state = with_input("text");
    let (state, _) = update(state, Msg::RemixClicked(Platform::Twitter));
    let (state, effects) = update(state, Msg::RemixClicked(Platform::Instagram));

    assert_eq!(effects.len(), 1);
    assert!(state.is_loading(Platform::Twitter));
    assert!(state.is_loading(Platform::Instagram));
    assert!(!state.is_loading(Platform::LinkedIn));
}

#[test]
fn test_success_stores_output_and_clears_loading() {
    let state = with_input("text");
    let (state, _) = update(state, Msg::RemixClicked(Platform::Twitter));
    let (state, effects) = update(
        state,
        Msg::RemixSucceeded {
            platform: Platform::Twitter,
            result: thread(&["one", "two"]),
        },
    );

    assert!(effects.is_empty());
    assert!(!state.is_loading(Platform::Twitter));
    assert_eq!(state.output(Platform::Twitter), Some(&thread(&["one", "two"])));
}

#[test]
fn test_failure_clears_loading_and_keeps_previous_output() {
    let state = with_input("text");
    let (state, _) = update(state, Msg::RemixClicked(Platform::Instagram));
    let (state, _) = update(
        state,
        Msg::RemixSucceeded {
            platform: Platform::Instagram,
            result: RemixResult::Single("first caption".into()),
        },
    );

    let (state, _) = update(state, Msg::RemixClicked(Platform::Instagram));
    let (state, effects) = update(
        state,
        Msg::RemixFailed {
            platform: Platform::Instagram,
            error: "timed out".into(),
        },
    );

    assert!(!state.is_loading(Platform::Instagram));
    assert!(state.can_remix(Platform::Instagram));
    assert_eq!(
        effects,
        vec![Effect::Notify(Notice::remix_failed(Platform::Instagram))]
    );
    assert_eq!(
        state.output(Platform::Instagram),
        Some(&RemixResult::Single("first caption".into()))
    );
}

#[test]
fn test_stale_response_is_ignored() {
    let state = with_input("text");
    let (state, effects) = update(
        state,
        Msg::RemixSucceeded {
            platform: Platform::LinkedIn,
            result: RemixResult::Single("late".into()),
        },
    );

    assert!(effects.is_empty());
    assert!(state.output(Platform::LinkedIn).is_none());
}

#[test]
fn test_edit_then_save_persists_edited_text() {
    let state = with_input("text");
    let (state, _) = update(state, Msg::RemixClicked(Platform::Twitter));
    let (state, _) = update(
        state,
        Msg::RemixSucceeded {
            platform: Platform::Twitter,
            result: thread(&["one", "two"]),
        },
    );
    let (state, _) = update(
        state,
        Msg::ItemEdited {
            platform: Platform::Twitter,
            index: 1,
            text: "  two, edited  ".into(),
        },
    );

    let (_, effects) = update(
        state,
        Msg::SaveClicked {
            platform: Platform::Twitter,
            index: 1,
        },
    );

    match effects.as_slice() {
        [Effect::Save(item)] => {
            assert_eq!(item.content, "two, edited");
            assert_eq!(item.platform, Platform::Twitter);
        }
        other => panic!("expected one save effect, got {:?}", other),
    }
}

#[test]
fn test_actions_on_missing_items_do_nothing() {
    let state = with_input("text");
    for msg in [
        Msg::SaveClicked {
            platform: Platform::Twitter,
            index: 0,
        },
        Msg::CopyClicked {
            platform: Platform::Twitter,
            index: 0,
        },
        Msg::ShareClicked {
            platform: Platform::Twitter,
            index: 0,
        },
    ] {
        let (_, effects) = update(state.clone(), msg);
        assert!(effects.is_empty());
    }
}

#[test]
fn test_save_outcomes_become_notices() {
    let (_, effects) = update(
        Session::new(),
        Msg::SaveSucceeded {
            platform: Platform::Twitter,
        },
    );
    assert_eq!(
        effects,
        vec![Effect::Notify(Notice::success("Tweet saved successfully!"))]
    );

    let (_, effects) = update(
        Session::new(),
        Msg::SaveFailed {
            platform: Platform::LinkedIn,
            error: "503".into(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::Notify(Notice::error("Failed to save linkedin content"))]
    );
}

#[test]
fn test_copy_and_share_use_trimmed_item() {
    let state = with_input("text");
    let (state, _) = update(state, Msg::RemixClicked(Platform::Instagram));
    let (state, _) = update(
        state,
        Msg::RemixSucceeded {
            platform: Platform::Instagram,
            result: RemixResult::Single(" sunny day ☀️ ".into()),
        },
    );

    let (state, effects) = update(
        state,
        Msg::CopyClicked {
            platform: Platform::Instagram,
            index: 0,
        },
    );
    assert_eq!(effects, vec![Effect::Copy("sunny day ☀️".into())]);

    let (_, effects) = update(
        state,
        Msg::ShareClicked {
            platform: Platform::Instagram,
            index: 0,
        },
    );
    match effects.as_slice() {
        [Effect::Share(ShareAction::CopyThenOpen { text, url })] => {
            assert_eq!(text, "sunny day ☀️");
            assert_eq!(url, "https://www.instagram.com/");
        }
        other => panic!("expected copy-then-open, got {:?}", other),
    }
}
