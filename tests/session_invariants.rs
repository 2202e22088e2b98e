//! Property tests over arbitrary keystroke sequences.
//!
//! Verifies:
//! 1. Input never outgrows the target and the cursor tracks the input.
//! 2. Active mistakes always sit inside the typed prefix.
//! 3. Keystroke and mistake counters never decrease.
//! 4. Accuracy is finite and never above 100.
//! 5. Wrapping a composed paragraph keeps every visible character and
//!    respects the line width.
//! 6. Styled wrapping never splits an escape sequence, leaves no style
//!    open at a line end, and `cursor_line` agrees with line offsets.
//! 7. History groups never exceed their cap.

use chrono::{Duration as ChronoDuration, Utc};
use keytrail::session::input::KeyAction;
use keytrail::session::metrics;
use keytrail::session::result::{ResultIdentifier, TestKind, TestResult};
use keytrail::session::state::SessionState;
use keytrail::store::history::HistoryStore;
use keytrail::ui::ansi;
use keytrail::ui::ansi::{SgrState, Token};
use keytrail::ui::paragraph::{TextStyles, compose, cursor_line, wrap};
use keytrail::ui::theme::Theme;
use proptest::prelude::*;

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_target() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-d]{1,5}", 1..20).prop_map(|words| words.join(" "))
}

fn arb_action() -> impl Strategy<Value = KeyAction> {
    prop_oneof![
        6 => prop::char::range('a', 'e').prop_map(KeyAction::Rune),
        2 => Just(KeyAction::Space),
        1 => Just(KeyAction::Backspace),
        1 => Just(KeyAction::DeleteWord),
    ]
}

fn arb_actions() -> impl Strategy<Value = Vec<KeyAction>> {
    prop::collection::vec(arb_action(), 0..80)
}

/// Applies `actions` the way a run does: nothing is appended once the
/// target is complete.
fn play(target: &str, actions: &[KeyAction]) -> Vec<SessionState> {
    let mut states = vec![SessionState::new(target)];
    for action in actions {
        let state = states[states.len() - 1].clone();
        let appends = matches!(action, KeyAction::Rune(_) | KeyAction::Space);
        if appends && state.is_complete() {
            continue;
        }
        states.push(action.apply(state));
    }
    states
}

proptest! {
    #[test]
    fn input_stays_within_target(target in arb_target(), actions in arb_actions()) {
        for state in play(&target, &actions) {
            prop_assert!(state.input().len() <= state.target().len());
            prop_assert_eq!(state.cursor(), state.input().len());
        }
    }

    #[test]
    fn mistakes_stay_inside_typed_prefix(target in arb_target(), actions in arb_actions()) {
        for state in play(&target, &actions) {
            for idx in state.mistakes().active() {
                prop_assert!(idx < state.input().len());
            }
        }
    }

    #[test]
    fn counters_never_decrease(target in arb_target(), actions in arb_actions()) {
        let states = play(&target, &actions);
        for pair in states.windows(2) {
            prop_assert!(pair[1].raw_input_count() >= pair[0].raw_input_count());
            prop_assert!(pair[1].mistakes().raw_count() >= pair[0].mistakes().raw_count());
        }
    }

    #[test]
    fn accuracy_is_finite_and_at_most_100(target in arb_target(), actions in arb_actions()) {
        for state in play(&target, &actions) {
            let accuracy = metrics::accuracy(&state);
            prop_assert!(accuracy.is_finite(), "accuracy {}", accuracy);
            prop_assert!(accuracy <= 100.0, "accuracy {}", accuracy);
        }
    }

    #[test]
    fn wrap_keeps_text_and_width(
        target in arb_target(),
        actions in arb_actions(),
        width in 5usize..40,
    ) {
        let states = play(&target, &actions);
        let state = &states[states.len() - 1];
        let composed = compose(state, &TextStyles::plain());
        let lines = wrap(&composed, width);

        let joined: String = lines.iter().map(|l| ansi::strip(l)).collect();
        prop_assert_eq!(joined, ansi::strip(&composed));
        for line in &lines {
            prop_assert!(ansi::visible_width(line) <= width);
        }
    }

    #[test]
    fn styled_wrap_keeps_sequences_whole(
        target in arb_target(),
        actions in arb_actions(),
        width in 5usize..40,
    ) {
        let states = play(&target, &actions);
        let state = &states[states.len() - 1];
        let composed = compose(state, &Theme::default().text_styles());
        let lines = wrap(&composed, width);

        let joined: String = lines.iter().map(|l| ansi::strip(l)).collect();
        prop_assert_eq!(&joined, &target);
        for line in &lines {
            let visible = ansi::strip(line);
            prop_assert!(
                visible.chars().all(|c| c == ' ' || ('a'..='d').contains(&c)),
                "escape leaked into {:?}",
                line
            );
            prop_assert!(ansi::visible_width(line) <= width);

            let mut sgr = SgrState::default();
            for token in ansi::tokenize(line) {
                if let Token::Sgr(params) = token {
                    sgr.apply(&params);
                }
            }
            prop_assert!(sgr.is_default(), "style left open in {:?}", line);
        }

        let cursor = state.cursor();
        let current = cursor_line(&lines, cursor);
        let before: usize = lines[..current].iter().map(|l| ansi::strip(l).chars().count()).sum();
        let through = before + ansi::strip(&lines[current]).chars().count();
        if cursor < target.chars().count() {
            prop_assert!(before <= cursor && cursor < through);
        } else {
            prop_assert_eq!(current, lines.len() - 1);
        }
    }

    #[test]
    fn history_respects_cap(limit in 1usize..10, pushes in 0usize..30) {
        let mut history = HistoryStore::new(limit);
        let id = ResultIdentifier::new(TestKind::WordCount, 25, "Common words");
        let start = Utc::now();
        for i in 0..pushes {
            history.push(TestResult {
                identifier: id.clone(),
                wpm: i as u32,
                raw_wpm: i as u32,
                cpm: 0,
                accuracy: 100.0,
                delta_wpm: 0.0,
                elapsed_secs: 10.0,
                timestamp: start + ChronoDuration::seconds(i as i64),
                wpm_each_second: Vec::new(),
            });
        }
        let kept = history.results_for(&id);
        prop_assert_eq!(kept.len(), pushes.min(limit));
        if let Some(last) = kept.last() {
            prop_assert_eq!(last.wpm as usize, pushes - 1);
        }
    }
}
