//! End-to-end flows through the app's key routing and event handling

use std::fs;
use std::time::Duration;

use aimate::services::InMemoryProjectService;
use aimate::ui::components::{MessageRole, ToastKind};
use aimate::ui::dialogs::DialogMode;
use crossterm::event::{Event, KeyCode};

use super::common::fixtures::{
    ctrl, key, settle, test_app, test_app_with_projects, type_text, TEST_DEBOUNCE,
};
use super::common::terminal::{buffer_contains, render_app};

fn toast_messages(app: &aimate::App) -> Vec<(ToastKind, String)> {
    app.toasts()
        .iter()
        .map(|t| (t.kind, t.message.clone()))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_first_frame_shows_layout() {
    let (mut app, _dir) = test_app();
    let buf = render_app(&mut app, 120, 40);

    assert!(buffer_contains(&buf, "Message"));
    assert!(buffer_contains(&buf, "Type a message…"));
    assert!(!app.is_modal_open());
}

#[tokio::test(start_paused = true)]
async fn test_typing_shows_knowledge_suggestions() {
    let (mut app, _dir) = test_app();

    type_text(&mut app, "tools");
    assert!(app.suggestions().is_empty());

    settle(&mut app, TEST_DEBOUNCE * 2).await;
    assert_eq!(app.suggestions().query(), "tools");
    assert_eq!(app.suggestions().items()[0].id, "tools");

    let buf = render_app(&mut app, 120, 40);
    assert!(buffer_contains(&buf, "Knowledge for \"tools\""));
}

#[tokio::test(start_paused = true)]
async fn test_accepting_suggestion_posts_it_and_clears_list() {
    let (mut app, _dir) = test_app();

    type_text(&mut app, "tools");
    settle(&mut app, TEST_DEBOUNCE * 2).await;
    app.handle_key(key(KeyCode::Tab));

    let last = app.chat().messages().last().unwrap();
    assert_eq!(last.role, MessageRole::Assistant);
    assert!(last.content.starts_with("Tools\n"));
    assert!(app.suggestions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_offline_notice_only_on_first_send() {
    let (mut app, _dir) = test_app();

    type_text(&mut app, "hello");
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.input(), "");
    let roles: Vec<_> = app.chat().messages().iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![MessageRole::User, MessageRole::System]);

    type_text(&mut app, "again");
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.chat().messages().len(), 3);

    // Blank input sends nothing
    type_text(&mut app, "   ");
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.chat().messages().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_paste_goes_to_input_on_one_line() {
    let (mut app, _dir) = test_app();

    app.handle_input(Event::Paste("line one\nline two".to_string()));
    assert_eq!(app.input(), "line one line two");
}

#[tokio::test(start_paused = true)]
async fn test_settings_save_writes_config_and_closes() {
    let (mut app, dir) = test_app();

    app.handle_key(key(KeyCode::F(2)));
    assert!(app.settings_dialog().is_open());
    assert_eq!(app.settings_dialog().active_tab(), Some("general"));

    // Keys stay in the dialog
    type_text(&mut app, "x");
    assert_eq!(app.input(), "");

    app.handle_key(ctrl('s'));
    assert!(!app.settings_dialog().is_open());

    let written = fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(written.contains("[chat]"));
    assert!(written.contains("max_tokens"));

    settle(&mut app, Duration::from_millis(10)).await;
    assert!(toast_messages(&app).contains(&(ToastKind::Success, "Settings saved".to_string())));
}

#[tokio::test(start_paused = true)]
async fn test_settings_reopen_starts_on_first_tab() {
    let (mut app, _dir) = test_app();

    app.handle_key(key(KeyCode::F(2)));
    app.handle_key(key(KeyCode::Tab));
    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.settings_dialog().active_tab(), Some("params"));

    app.handle_key(key(KeyCode::Esc));
    assert!(!app.is_modal_open());

    app.handle_key(key(KeyCode::F(2)));
    assert_eq!(app.settings_dialog().active_tab(), Some("general"));
}

#[tokio::test(start_paused = true)]
async fn test_create_project_adds_it_to_sidebar() {
    let (mut app, _dir) = test_app();
    app.load_projects();
    settle(&mut app, Duration::from_millis(10)).await;
    assert!(app.sidebar().projects().is_empty());

    app.handle_key(ctrl('n'));
    assert!(app.project_dialog().is_open());
    type_text(&mut app, "Research");
    app.handle_key(ctrl('s'));
    assert!(app.project_dialog().is_busy());

    settle(&mut app, Duration::from_millis(10)).await;
    assert!(!app.project_dialog().is_open());
    assert_eq!(
        app.sidebar().selected_project().map(|p| p.name.as_str()),
        Some("Research")
    );
    assert!(toast_messages(&app)
        .contains(&(ToastKind::Success, "Created project 'Research'".to_string())));
}

#[tokio::test(start_paused = true)]
async fn test_project_dialog_stays_busy_until_service_answers() {
    let service = InMemoryProjectService::new().with_latency(Duration::from_secs(2));
    let (mut app, _dir) = test_app_with_projects(service);

    app.handle_key(ctrl('n'));
    type_text(&mut app, "Slow");
    app.handle_key(ctrl('s'));

    settle(&mut app, Duration::from_millis(500)).await;
    assert!(app.project_dialog().is_open());
    assert!(app.project_dialog().is_busy());

    // A second save while the first is in flight is ignored
    app.handle_key(ctrl('s'));
    settle(&mut app, Duration::from_secs(3)).await;
    assert!(!app.project_dialog().is_open());
    assert_eq!(app.sidebar().projects().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_late_save_does_not_close_next_dialog() {
    let service = InMemoryProjectService::seeded().with_latency(Duration::from_secs(1));
    let (mut app, _dir) = test_app_with_projects(service);
    app.load_projects();
    settle(&mut app, Duration::from_millis(1500)).await;
    let name = app.sidebar().selected_project().unwrap().name.clone();

    app.handle_key(ctrl('e'));
    app.handle_key(ctrl('s'));
    assert!(app.project_dialog().is_busy());
    app.handle_key(key(KeyCode::Esc));
    assert!(!app.project_dialog().is_open());

    app.handle_key(ctrl('n'));
    type_text(&mut app, "Draft");

    settle(&mut app, Duration::from_secs(3)).await;
    assert!(app.project_dialog().is_open());
    assert_eq!(app.project_dialog().mode(), DialogMode::Create);
    assert!(!app.project_dialog().is_busy());
    assert!(toast_messages(&app)
        .contains(&(ToastKind::Success, format!("Saved project '{name}'"))));
}

#[tokio::test(start_paused = true)]
async fn test_edit_without_selection_warns() {
    let (mut app, _dir) = test_app();

    app.handle_key(ctrl('e'));
    assert!(!app.is_modal_open());
    assert_eq!(
        toast_messages(&app),
        vec![(ToastKind::Warning, "No project selected".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn test_tab_switch_shows_in_debug_console() {
    let (mut app, _dir) = test_app();

    app.handle_key(key(KeyCode::F(2)));
    app.handle_key(key(KeyCode::Tab));
    app.handle_key(key(KeyCode::Esc));

    app.handle_key(key(KeyCode::F(12)));
    assert!(app.debug_console().is_open());
    let buf = render_app(&mut app, 140, 45);
    assert!(buffer_contains(&buf, "Debug console"));
    assert!(buffer_contains(&buf, "Switched to Tools tab"));
}

#[tokio::test(start_paused = true)]
async fn test_quit_reaches_app_through_open_modal() {
    let (mut app, _dir) = test_app();

    app.handle_key(key(KeyCode::F(2)));
    app.handle_key(ctrl('q'));
    assert!(app.should_quit());
}
