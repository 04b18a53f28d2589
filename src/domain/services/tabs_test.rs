use super::TabController;
use crate::domain::models::TabButton;
use crate::domain::models::TabContent;
use crate::domain::models::TabGroup;

fn group() -> TabGroup {
    return TabGroup::new("main-tab-selector")
        .button(TabButton::new("problem-tab", "Problem", "problem-pane"))
        .button(TabButton::new("chat-tab", "Chat", "chat-pane"))
        .button(TabButton::new("notes-tab", "Notes", "missing-pane"))
        .content(TabContent::new(
            "main-content",
            &["problem-pane", "chat-pane"],
        ));
}

fn active_count(tabs: &TabController) -> usize {
    return tabs
        .buttons()
        .iter()
        .filter(|b| return tabs.is_active(&b.id))
        .count();
}

#[test]
fn it_activates_the_first_button_by_default() {
    let tabs = TabController::init(Some(group()));

    assert_eq!(tabs.active_button().unwrap().id, "problem-tab");
    assert!(tabs.is_pane_shown("problem-pane"));
    assert!(!tabs.is_pane_shown("chat-pane"));
}

#[test]
fn it_activates_the_preselected_button() {
    let group = TabGroup::new("main-tab-selector")
        .button(TabButton::new("problem-tab", "Problem", "problem-pane"))
        .button(TabButton::new("chat-tab", "Chat", "chat-pane").preselected())
        .content(TabContent::new("main-content", &["problem-pane", "chat-pane"]));
    let tabs = TabController::init(Some(group));

    assert_eq!(tabs.active_pane(), Some("chat-pane"));
}

#[test]
fn it_switches_buttons_and_panes_together() {
    let mut tabs = TabController::init(Some(group()));

    assert!(tabs.activate("chat-tab"));
    assert!(tabs.is_active("chat-tab"));
    assert!(!tabs.is_active("problem-tab"));
    assert_eq!(tabs.active_pane(), Some("chat-pane"));
    assert_eq!(active_count(&tabs), 1);
}

#[test]
fn it_is_idempotent() {
    let mut tabs = TabController::init(Some(group()));

    assert!(tabs.activate("chat-tab"));
    assert!(tabs.activate("chat-tab"));
    assert_eq!(active_count(&tabs), 1);
    assert_eq!(tabs.active_pane(), Some("chat-pane"));
}

#[test]
fn it_shows_no_pane_for_a_missing_target() {
    let mut tabs = TabController::init(Some(group()));

    assert!(tabs.activate("notes-tab"));
    assert!(tabs.is_active("notes-tab"));
    assert_eq!(tabs.active_pane(), None);
}

#[test]
fn it_ignores_unknown_buttons() {
    let mut tabs = TabController::init(Some(group()));

    assert!(!tabs.activate("settings-tab"));
    assert!(tabs.is_active("problem-tab"));
}

#[test]
fn it_skips_hidden_buttons_by_default() {
    let group = TabGroup::new("output-tab-selector")
        .button(TabButton::new("status-tab", "Status", "status-pane").hidden())
        .button(TabButton::new("stdout-tab", "Output", "stdout-pane"))
        .content(TabContent::new(
            "output-content",
            &["status-pane", "stdout-pane"],
        ));
    let tabs = TabController::init(Some(group));

    assert_eq!(tabs.active_button().unwrap().id, "stdout-tab");
    assert!(!tabs.is_pane_shown("status-pane"));
}

#[test]
fn it_activates_nothing_when_every_button_is_hidden() {
    let group = TabGroup::new("output-tab-selector")
        .button(TabButton::new("status-tab", "Status", "status-pane").hidden())
        .content(TabContent::new("output-content", &["status-pane"]));
    let tabs = TabController::init(Some(group));

    assert!(tabs.active_button().is_none());
    assert!(!tabs.is_pane_shown("status-pane"));
}

#[test]
fn it_is_a_noop_without_a_group() {
    let mut tabs = TabController::init(None);

    assert!(tabs.is_noop());
    assert!(!tabs.activate("problem-tab"));
    assert!(tabs.active_button().is_none());
    assert!(tabs.buttons().is_empty());
}

#[test]
fn it_is_a_noop_without_a_content_container() {
    let group = TabGroup::new("main-tab-selector")
        .button(TabButton::new("problem-tab", "Problem", "problem-pane"));
    let mut tabs = TabController::init(Some(group));

    assert!(tabs.is_noop());
    assert!(!tabs.activate("problem-tab"));
}

#[test]
fn it_activates_hidden_buttons_once_shown_again() {
    let mut tabs = TabController::init(Some(group()));
    tabs.reset();

    assert!(tabs.active_button().is_none());
    assert!(tabs.visible_buttons().is_empty());

    tabs.set_visible("chat-tab", true);
    assert!(tabs.activate("chat-tab"));
    assert_eq!(tabs.active_pane(), Some("chat-pane"));
}

#[test]
fn it_cycles_through_visible_buttons() {
    let mut tabs = TabController::init(Some(group()));
    tabs.set_visible("notes-tab", false);

    assert!(tabs.cycle(true));
    assert!(tabs.is_active("chat-tab"));
    assert!(tabs.cycle(true));
    assert!(tabs.is_active("problem-tab"));
    assert!(tabs.cycle(false));
    assert!(tabs.is_active("chat-tab"));
}

#[test]
fn it_does_not_cycle_without_visible_buttons() {
    let mut tabs = TabController::init(Some(group()));
    tabs.reset();

    assert!(!tabs.cycle(true));
}
