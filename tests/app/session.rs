use termbus::{App, Config, TerminalEvent};
use tokio::io::BufReader;

async fn run_script(app: &App, script: &str) -> String {
    let mut out = Vec::new();
    app.run(BufReader::new(script.as_bytes()), &mut out)
        .await
        .expect("session");
    String::from_utf8(out).expect("utf8")
}

#[tokio::test]
async fn test_echo_writes_prompted_entry() {
    let app = App::new(&Config::default()).expect("app");
    let out = run_script(&app, "echo hello\n").await;
    assert_eq!(out, "$ echo hello\nhello\n");
    assert_eq!(app.console().history().len(), 1);
}

#[tokio::test]
async fn test_unknown_command_reports_error() {
    let app = App::new(&Config::default()).expect("app");
    let out = run_script(&app, "frobnicate\n").await;
    assert_eq!(out, "$ frobnicate\nError: unknown command: frobnicate\n");
}

#[tokio::test]
async fn test_error_response_includes_cause() {
    let app = App::new(&Config::default()).expect("app");
    let out = run_script(&app, "wait soon\n").await;
    assert!(out.starts_with("$ wait soon\nError: invalid duration `soon`: "));
}

#[tokio::test]
async fn test_busy_console_reports_dropped_line() {
    let app = App::new(&Config::default()).expect("app");
    app.console().set_external_loading(true);

    let out = run_script(&app, "echo hi\n\n").await;
    assert_eq!(out, "busy, discarded: echo hi\n");
    assert!(app.console().history().is_empty());

    app.console().set_external_loading(false);
    let out = run_script(&app, "echo hi\n").await;
    assert_eq!(out, "$ echo hi\nhi\n");
}

#[tokio::test]
async fn test_blank_lines_are_skipped() {
    let app = App::new(&Config::default()).expect("app");
    let out = run_script(&app, "\n   \necho x\n").await;
    assert_eq!(out, "$ echo x\nx\n");
}

#[tokio::test]
async fn test_clear_empties_history_silently() {
    let app = App::new(&Config::default()).expect("app");
    let out = run_script(&app, "echo a\nclear\n").await;
    assert_eq!(out, "$ echo a\na\n");
    assert!(app.console().history().is_empty());
}

#[tokio::test]
async fn test_exit_stops_reading() {
    let app = App::new(&Config::default()).expect("app");
    let out = run_script(&app, "echo one\nexit\necho two\n").await;
    assert_eq!(out, "$ echo one\none\n");
}

#[tokio::test]
async fn test_custom_prompt() {
    let mut config = Config::default();
    config.console.prompt = "cmd:~$".to_string();
    let app = App::new(&config).expect("app");
    let out = run_script(&app, "version\n").await;
    assert!(out.starts_with("cmd:~$ version\ntermbus "));
}

#[tokio::test]
async fn test_bus_events_reach_console() {
    let app = App::new(&Config::default()).expect("app");
    app.bus().emit_print("banner", "welcome");
    app.bus().publish(TerminalEvent::cast("warming up"));

    let history = app.console().history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].response, "welcome");
    assert_eq!(app.console().loading_messages(), vec!["warming up"]);

    app.bus().emit_clear();
    assert!(app.console().history().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_wait_reports_completion() {
    let app = App::new(&Config::default()).expect("app");
    let out = run_script(&app, "wait 250\n").await;
    assert_eq!(out, "$ wait 250\nwaited 250 ms\n");
    assert!(!app.console().is_loading());
}
