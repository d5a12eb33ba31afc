//! Property-based tests for App state machine.
//!
//! Tests verify that invariants hold under arbitrary event sequences.
//! This ensures behavioral correctness across all possible execution paths.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use kprod_app::{App, AppAction, AppEvent, KeyInput, View, input};
use kprod_client::{ConnectError, Delivery, PublishError, PublishRequest, Session, SessionHandle};
use kprod_core::{ConnectionSettings, FormatError, Formatted};
use proptest::prelude::*;

/// Stand-in for a broker session; the App never calls it directly.
#[derive(Debug)]
struct NullSession;

#[async_trait]
impl Session for NullSession {
    async fn publish(&self, _request: PublishRequest) -> Result<Delivery, PublishError> {
        Err(PublishError::Closed)
    }

    async fn close(&self) {}
}

fn key_strategy() -> impl Strategy<Value = KeyInput> {
    prop_oneof![
        4 => any::<char>().prop_map(KeyInput::Char),
        2 => Just(KeyInput::Tab),
        2 => Just(KeyInput::BackTab),
        1 => Just(KeyInput::Backspace),
        1 => Just(KeyInput::Delete),
        1 => Just(KeyInput::Left),
        1 => Just(KeyInput::Right),
        1 => Just(KeyInput::Home),
        1 => Just(KeyInput::End),
        1 => Just(KeyInput::Enter),
        2 => Just(input::TOGGLE_VIEW),
        1 => Just(input::CONNECT),
        1 => Just(input::SAVE),
        1 => Just(input::FORMAT),
    ]
}

/// Generate random app events, including command results.
fn event_strategy() -> impl Strategy<Value = AppEvent> {
    prop_oneof![
        8 => key_strategy().prop_map(AppEvent::Key),
        1 => (1u16..200, 1u16..100).prop_map(|(c, r)| AppEvent::Resize(c, r)),
        1 => "[a-z\n]{0,8}".prop_map(AppEvent::Paste),
        1 => (0u64..4, any::<bool>()).prop_map(|(seq, ok)| AppEvent::ConnectFinished {
            seq,
            result: if ok {
                Ok(Arc::new(NullSession) as SessionHandle)
            } else {
                Err(ConnectError::Broker { brokers: "b:1".into(), reason: "down".into() })
            },
        }),
        1 => any::<bool>().prop_map(|ok| AppEvent::Published {
            key: "k".into(),
            value: "v".into(),
            completed_at: Local::now(),
            result: if ok {
                Ok(Delivery { partition: 0, offset: 1 })
            } else {
                Err(PublishError::Closed)
            },
        }),
        1 => "[{}a-z:\"]{0,6}".prop_map(|source| AppEvent::Formatted {
            result: Err(FormatError { reason: format!("bad: {source}") }),
            source,
        }),
        1 => Just(AppEvent::Formatted { source: String::new(), result: Ok(Formatted::Empty) }),
    ]
}

proptest! {
    #[test]
    fn prop_app_invariants_hold(events in prop::collection::vec(event_strategy(), 0..80)) {
        let mut app = App::new(ConnectionSettings::default());

        for event in events {
            let actions = app.handle(event);

            // Quit ends the session; nothing after it is processed.
            if actions.iter().any(|a| matches!(a, AppAction::Quit)) {
                prop_assert!(!app.is_connected());
                break;
            }

            prop_assert!(app.focus_index() < app.view().fields().len());
            prop_assert!(app.view() == View::Config || app.is_connected(),
                "message view requires a session");
            prop_assert!(!app.status_line().is_empty());
            for action in &actions {
                if let AppAction::Publish { value, .. } = action {
                    prop_assert!(!value.is_empty());
                }
            }
        }
    }
}
