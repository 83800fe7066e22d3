//! Lifecycle and footer contract of the modal shell, driven through the
//! public API the feature dialogs use.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use aimate::config::default_keybindings;
use aimate::debug::{EventLogger, LogError};
use aimate::ui::components::modal::{
    ActionFooter, FooterButton, FooterPress, Modal, ModalConfig, ModalOutcome, ModalProps,
    ModalState, StaticContent, TabDescriptor, TabSet,
};
use crossterm::event::KeyCode;
use parking_lot::Mutex;
use proptest::prelude::*;
use ratatui::{buffer::Buffer, layout::Rect, widgets::StatefulWidget};
use serde_json::Value;

use super::common::fixtures::key;
use super::common::terminal::buffer_to_string;

#[derive(Default)]
struct RecordingLogger {
    events: Mutex<Vec<(String, String, Option<Value>)>>,
}

impl EventLogger for RecordingLogger {
    fn log_event(
        &self,
        message: &str,
        event_key: &str,
        payload: Option<Value>,
    ) -> Result<(), LogError> {
        self.events
            .lock()
            .push((message.to_string(), event_key.to_string(), payload));
        Ok(())
    }
}

fn tabs_with_ids(ids: &[&str]) -> TabSet {
    TabSet::new(
        ids.iter()
            .map(|id| {
                let body = format!("{id} body");
                TabDescriptor::new(*id, id.to_uppercase(), move || {
                    StaticContent::boxed([body.clone()])
                })
            })
            .collect(),
    )
    .unwrap()
}

fn numbered_tabs(count: usize) -> TabSet {
    let ids: Vec<String> = (0..count).map(|i| format!("tab{i}")).collect();
    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    tabs_with_ids(&refs)
}

fn settings_tabs() -> TabSet {
    tabs_with_ids(&["general", "tools", "params"])
}

fn render(state: &mut ModalState, props: &ModalProps<'_>) -> String {
    let area = Rect::new(0, 0, 100, 30);
    let mut buf = Buffer::empty(area);
    Modal::new(props).render(area, &mut buf, state);
    buffer_to_string(&buf)
}

fn row_of(text: &str, needle: &str) -> usize {
    text.lines().position(|line| line.contains(needle)).unwrap()
}

fn tabbed(open: bool, tabs: TabSet) -> ModalProps<'static> {
    ModalProps::new(open, |_| {}, ModalConfig::new("Tabs").tabs(tabs))
}

#[test]
fn test_children_render_when_no_tabs() {
    let mut state = ModalState::new();
    let config = ModalConfig::new("Project").children(|| StaticContent::boxed(["child content"]));
    let props = ModalProps::new(true, |_| {}, config);

    let text = render(&mut state, &props);
    assert!(text.contains("child content"));
    assert_eq!(state.active_tab(), None);
    assert!(state.is_mounted());

    // No tab strip: the body starts on the first row inside the border
    assert_eq!(row_of(&text, "child content"), row_of(&text, " Project ") + 1);

    // Whereas a tabbed modal spends that row on the tab strip
    let mut tabbed_state = ModalState::new();
    let tabbed_config = ModalConfig::new("Project").tabs(settings_tabs());
    let tabbed_props = ModalProps::new(true, |_| {}, tabbed_config);
    let tabbed_text = render(&mut tabbed_state, &tabbed_props);
    assert!(tabbed_text.contains("GENERAL"));
    assert_eq!(
        row_of(&tabbed_text, "general body"),
        row_of(&tabbed_text, " Project ") + 2
    );
}

#[test]
fn test_tab_changes_while_open_keep_active_tab() {
    let mut state = ModalState::new();
    state.sync(&tabbed(true, settings_tabs()));
    assert!(state.select_tab(&tabbed(true, settings_tabs()), "params"));

    // A new tab list that still has "params" keeps it
    state.sync(&tabbed(true, tabs_with_ids(&["extra", "general", "params"])));
    assert_eq!(state.active_tab(), Some("params"));

    // Once "params" is gone the first tab takes over
    state.sync(&tabbed(true, tabs_with_ids(&["extra", "general"])));
    assert_eq!(state.active_tab(), Some("extra"));
}

#[test]
fn test_cancel_only_requests_close() {
    let saves = Rc::new(Cell::new(0));
    let deletes = Rc::new(Cell::new(0));
    let closes = Cell::new(Vec::new());

    let (s, d) = (saves.clone(), deletes.clone());
    let config = ModalConfig::new("Edit")
        .show_save(true)
        .show_delete(true)
        .on_save(move || {
            s.set(s.get() + 1);
            Ok(())
        })
        .on_delete(move || {
            d.set(d.get() + 1);
            Ok(())
        });
    let mut props = ModalProps::new(
        true,
        |open| {
            let mut seen = closes.take();
            seen.push(open);
            closes.set(seen);
        },
        config,
    );

    let press = ActionFooter::press(&mut props, FooterButton::Cancel).unwrap();
    assert_eq!(press, FooterPress::Closed);
    drop(props);

    assert_eq!(closes.take(), vec![false]);
    assert_eq!(saves.get(), 0);
    assert_eq!(deletes.get(), 0);
}

#[test]
fn test_reopen_mounts_fresh_content() {
    let mounts = Rc::new(Cell::new(0));
    let counter = mounts.clone();
    let config = || {
        let counter = counter.clone();
        ModalConfig::new("Counted").children(move || {
            counter.set(counter.get() + 1);
            StaticContent::boxed(["body"])
        })
    };

    let mut state = ModalState::new();
    state.sync(&ModalProps::new(true, |_| {}, config()));
    // Staying open does not remount
    state.sync(&ModalProps::new(true, |_| {}, config()));
    assert_eq!(mounts.get(), 1);

    state.sync(&ModalProps::new(false, |_| {}, config()));
    assert!(!state.is_mounted());
    state.sync(&ModalProps::new(true, |_| {}, config()));
    assert_eq!(mounts.get(), 2);
    assert!(state.is_mounted());
}

#[test]
fn test_switching_to_tools_logs_once() {
    let logger = Arc::new(RecordingLogger::default());
    let mut state = ModalState::new().with_logger(logger.clone());
    let keys = default_keybindings();
    let mut props = tabbed(true, settings_tabs());

    let text = render(&mut state, &props);
    assert!(text.contains("general body"));
    assert_eq!(state.active_tab(), Some("general"));

    let outcome = state.handle_key(key(KeyCode::Tab), &mut props, &keys).unwrap();
    assert_eq!(outcome, ModalOutcome::TabChanged);
    let text = render(&mut state, &props);
    assert!(text.contains("tools body"));
    assert!(!text.contains("general body"));

    // Re-selecting the active tab changes nothing
    assert!(!state.select_tab(&props, "tools"));

    let events = logger.events.lock();
    assert_eq!(events.len(), 1);
    let (message, event_key, payload) = &events[0];
    assert!(message.contains("TOOLS"));
    assert!(event_key.contains("tools"));
    let payload = payload.as_ref().unwrap();
    assert_eq!(payload["tabId"], "tools");
}

#[test]
fn test_delete_without_handler_is_hidden() {
    let config = ModalConfig::new("No delete").show_delete(true);
    let kinds: Vec<_> = ActionFooter::buttons(&config)
        .into_iter()
        .map(|b| b.kind)
        .collect();
    assert_eq!(kinds, vec![FooterButton::Cancel]);
}

#[test]
fn test_disabled_save_is_drawn_but_inert() {
    let saves = Rc::new(Cell::new(0));
    let s = saves.clone();
    let config = ModalConfig::new("Busy")
        .show_save(true)
        .save_disabled(true)
        .on_save(move || {
            s.set(s.get() + 1);
            Ok(())
        });

    let save = ActionFooter::buttons(&config)
        .into_iter()
        .find(|b| b.kind == FooterButton::Save)
        .unwrap();
    assert!(!save.enabled);

    let mut props = ModalProps::new(true, |_| {}, config);
    let press = ActionFooter::press(&mut props, FooterButton::Save).unwrap();
    assert_eq!(press, FooterPress::Ignored);
    drop(props);
    assert_eq!(saves.get(), 0);
}

#[test]
fn test_handler_error_reaches_caller() {
    let config = ModalConfig::new("Failing")
        .show_save(true)
        .on_save(|| Err(anyhow::anyhow!("disk full")));
    let mut props = ModalProps::new(true, |_| {}, config);

    let err = ActionFooter::press(&mut props, FooterButton::Save).unwrap_err();
    assert_eq!(err.to_string(), "disk full");
}

proptest! {
    #[test]
    fn prop_opening_always_starts_on_first_tab(count in 1usize..6, pick in 0usize..6) {
        let tabs = numbered_tabs(count);
        let mut state = ModalState::new();

        state.sync(&tabbed(true, tabs.clone()));
        prop_assert_eq!(state.active_tab(), Some("tab0"));

        let target = format!("tab{}", pick % count);
        state.select_tab(&tabbed(true, tabs.clone()), &target);
        prop_assert_eq!(state.active_tab(), Some(target.as_str()));

        state.sync(&tabbed(false, tabs.clone()));
        prop_assert_eq!(state.active_tab(), None);

        state.sync(&tabbed(true, tabs));
        prop_assert_eq!(state.active_tab(), Some("tab0"));
    }

    #[test]
    fn prop_buttons_follow_flags_and_handlers(
        show_save in any::<bool>(),
        show_delete in any::<bool>(),
        has_save in any::<bool>(),
        has_delete in any::<bool>(),
    ) {
        let mut config = ModalConfig::new("Flags")
            .show_save(show_save)
            .show_delete(show_delete);
        if has_save {
            config = config.on_save(|| Ok(()));
        }
        if has_delete {
            config = config.on_delete(|| Ok(()));
        }

        let kinds: Vec<_> = ActionFooter::buttons(&config).into_iter().map(|b| b.kind).collect();
        prop_assert_eq!(kinds.contains(&FooterButton::Save), show_save && has_save);
        prop_assert_eq!(kinds.contains(&FooterButton::Delete), show_delete && has_delete);
        prop_assert!(kinds.contains(&FooterButton::Cancel));
    }
}
