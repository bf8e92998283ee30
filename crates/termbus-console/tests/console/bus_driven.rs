use std::sync::Arc;
use std::time::Duration;
use termbus_console::Console;
use termbus_core::{EventBus, TerminalEvent};
use termbus_settings::ConsoleSettings;

fn attached(bus: &EventBus) -> Arc<Console> {
    let runner = |input: String| async move {
        match input.as_str() {
            "help" => Ok(Some("commands: help".to_string())),
            "fail" => Err(anyhow::anyhow!("no such command")),
            _ => Ok(None),
        }
    };
    let console = Console::new(Arc::new(runner), ConsoleSettings::default());
    console.attach(bus).expect("attach inside runtime");
    console
}

async fn wait_for_history(console: &Console, len: usize) {
    tokio::time::timeout(Duration::from_secs(1), async {
        while console.history().len() < len || console.is_loading() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("command finished in time");
}

#[tokio::test]
async fn test_run_event_executes_command() {
    let bus = EventBus::new();
    let console = attached(&bus);

    assert_eq!(bus.emit_run("help"), 1);
    wait_for_history(&console, 1).await;

    let history = console.history();
    assert_eq!(history[0].cmd, "help");
    assert_eq!(history[0].response, "commands: help");
}

#[tokio::test]
async fn test_run_event_error_is_printed() {
    let bus = EventBus::new();
    let console = attached(&bus);

    bus.emit_run("fail");
    wait_for_history(&console, 1).await;
    assert_eq!(console.history()[0].response, "Error: no such command");
}

#[tokio::test]
async fn test_print_cast_clear_events() {
    let bus = EventBus::new();
    let console = attached(&bus);

    bus.emit_print("echo foo", "foo");
    bus.emit_print("", "banner");
    assert_eq!(console.history().len(), 2);

    bus.emit_cast("Fetching data");
    assert_eq!(console.loading_messages(), vec!["Fetching data"]);

    bus.emit_clear();
    assert!(console.history().is_empty());
}

#[tokio::test]
async fn test_detached_console_ignores_events() {
    let bus = EventBus::new();
    let runner = |_: String| async move { Ok::<_, anyhow::Error>(None) };
    let console = Console::new(Arc::new(runner), ConsoleSettings::default());

    let subscription = console.attach(&bus).expect("attach");
    subscription.unsubscribe();

    bus.emit_print("echo foo", "foo");
    assert!(console.history().is_empty());
    assert_eq!(bus.subscriber_count(), 0);
}

#[tokio::test]
async fn test_other_listeners_see_console_traffic() {
    let bus = EventBus::new();
    let console = attached(&bus);

    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let log = seen.clone();
    bus.subscribe(move |event| log.lock().push(event.kind()));

    bus.emit_run("help");
    wait_for_history(&console, 1).await;

    assert_eq!(*seen.lock(), vec![TerminalEvent::run("help").kind()]);
}
