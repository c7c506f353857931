use std::fs;

use flowtada_core::{
    parse_event_script, replay, welcome_message, ControllerConfig, Effect, HeaderVariant,
    ViewState,
};
use serde_json::Value;

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn portal_session_matches_golden() {
    let script = fs::read_to_string(fixture_path("portal_session.json"))
        .expect("Không đọc được kịch bản mẫu");
    let events = parse_event_script(&script).expect("Kịch bản không hợp lệ");

    let steps = replay(events, &ControllerConfig::default());
    assert_eq!(steps.len(), 10);

    let last = steps.last().expect("Kịch bản rỗng");
    let actual = serde_json::to_value(&last.state).expect("Không serialize state");

    let expected = fs::read_to_string(fixture_path("portal_session_final.json"))
        .expect("Không đọc được golden state");
    let expected: Value = serde_json::from_str(&expected).expect("Golden không hợp lệ");

    assert_eq!(actual, expected);
}

#[test]
fn portal_session_effect_trace() {
    let script = fs::read_to_string(fixture_path("portal_session.json"))
        .expect("Không đọc được kịch bản mẫu");
    let steps = replay(
        parse_event_script(&script).expect("Kịch bản không hợp lệ"),
        &ControllerConfig::default(),
    );

    assert_eq!(
        steps[0].effects,
        vec![Effect::SetHeader {
            variant: HeaderVariant::Top
        }]
    );
    // Click bên trong nav không đóng menu.
    assert!(steps[2].effects.is_empty());
    assert!(steps[2].state.menu_open);
    assert!(!steps[3].state.menu_open);

    // Mật khẩu ngắn: chỉ cảnh báo, modal vẫn mở.
    assert!(matches!(steps[5].effects.as_slice(), [Effect::Alert { .. }]));
    assert!(steps[5].state.modal_visible);
    assert!(steps[6].effects.is_empty());

    assert!(steps[7].state.login_pending());
    assert_eq!(
        steps[8].effects,
        vec![
            Effect::Alert {
                message: welcome_message("user@example.com")
            },
            Effect::RestoreSubmit,
            Effect::ClearCredentials,
            Effect::SetModalVisible { visible: false },
        ]
    );
}

#[test]
fn replay_is_deterministic() {
    let script = fs::read_to_string(fixture_path("portal_session.json"))
        .expect("Không đọc được kịch bản mẫu");
    let config = ControllerConfig::default();

    let first = replay(parse_event_script(&script).unwrap(), &config);
    let second = replay(parse_event_script(&script).unwrap(), &config);
    assert_eq!(first, second);
    assert_ne!(first[1].state, ViewState::default());
}
