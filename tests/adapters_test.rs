use faaah::adapters::{parse_line, Output};
use faaah::engine::{Notification, NotificationLevel};
use faaah::events::{DiagnosticCode, HostEvent, Severity};

#[test]
fn diagnostics_line_decodes_resources() {
    let line = r#"{"type":"diagnostics","resources":[{"uri":"file:///a.ts","diagnostics":[{"severity":"error","message":"';' expected.","code":{"value":1005,"target":"x"}},{"severity":"warning","message":"unused"}]}]}"#;
    let event = parse_line(line).unwrap().unwrap();

    let HostEvent::Diagnostics { resources } = event else {
        panic!("expected diagnostics event");
    };
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].uri.0, "file:///a.ts");
    let first = &resources[0].diagnostics[0];
    assert_eq!(first.severity, Severity::Error);
    assert_eq!(first.code.as_ref().and_then(DiagnosticCode::as_number), Some(1005));
    assert_eq!(resources[0].diagnostics[1].severity, Severity::Warning);
}

#[test]
fn exit_code_is_optional() {
    let event = parse_line(r#"{"type":"task_ended","task":"build"}"#)
        .unwrap()
        .unwrap();
    assert!(matches!(event, HostEvent::TaskEnded { exit_code: None, .. }));

    let event = parse_line(r#"{"type":"terminal_command_ended","exit_code":127}"#)
        .unwrap()
        .unwrap();
    assert!(matches!(
        event,
        HostEvent::TerminalCommandEnded {
            exit_code: Some(127)
        }
    ));
}

#[test]
fn unit_events_decode() {
    let event = parse_line(r#"{"type":"debug_session_ended"}"#).unwrap().unwrap();
    assert!(matches!(event, HostEvent::DebugSessionEnded));

    let event = parse_line(r#"{"type":"config_changed"}"#).unwrap().unwrap();
    assert!(matches!(event, HostEvent::ConfigChanged));
}

#[test]
fn blank_lines_are_skipped_and_garbage_errors() {
    assert!(parse_line("   ").unwrap().is_none());
    assert!(parse_line("{not json").is_err());
    assert!(parse_line(r#"{"type":"keyboard_smash"}"#).is_err());
}

#[test]
fn outputs_are_tagged_json() {
    let notification = Notification {
        level: NotificationLevel::Warning,
        message: "3 errors and counting. Are you okay?".to_string(),
    };
    let line = Output::Notification(&notification).to_line().unwrap();
    assert_eq!(
        line,
        r#"{"type":"notification","level":"warning","message":"3 errors and counting. Are you okay?"}"#
    );

    let line = Output::Status { text: "$(mute) FAAAH" }.to_line().unwrap();
    assert_eq!(line, r#"{"type":"status","text":"$(mute) FAAAH"}"#);
}
