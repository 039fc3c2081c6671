use chronicle_core::{TimelineConfig, TimelineItem};
use chronicle_engine::{SlideshowState, TimelineOrchestrator};

fn item(title: &str) -> TimelineItem {
    TimelineItem {
        title: title.to_string(),
        ..TimelineItem::default()
    }
}

#[test]
fn user_selection_moves_active_and_notifies_once() {
    let orchestrator =
        TimelineOrchestrator::new(vec![item("a"), item("b")], TimelineConfig::default());
    let mut changes = orchestrator.subscribe();
    assert!(!changes.has_changed().expect("Kênh thông báo bị đóng"));

    orchestrator.on_user_select(1);

    assert!(changes.has_changed().expect("Kênh thông báo bị đóng"));
    assert_eq!(*changes.borrow_and_update(), Some(1));
    let items = orchestrator.items();
    assert!(items[1].active);
    assert!(!items[0].active);
    assert_eq!(items.iter().filter(|entry| entry.active).count(), 1);

    // Selecting the already-active item again is a no-op without notification.
    orchestrator.on_user_select(1);
    assert!(!changes.has_changed().expect("Kênh thông báo bị đóng"));
}

#[test]
fn out_of_range_requests_are_silently_ignored() {
    let orchestrator =
        TimelineOrchestrator::new(vec![item("a"), item("b")], TimelineConfig::default());
    let mut changes = orchestrator.subscribe();

    orchestrator.set_active_index_from_prop(2);
    orchestrator.on_user_select(99);

    assert!(!changes.has_changed().expect("Kênh thông báo bị đóng"));
    assert_eq!(orchestrator.active_index(), Some(0));
    let items = orchestrator.items();
    assert!(items[0].active);
}

#[test]
fn prop_driven_selection_applies_until_the_user_overrides() {
    let orchestrator = TimelineOrchestrator::new(
        vec![item("a"), item("b"), item("c")],
        TimelineConfig::default(),
    );

    orchestrator.set_active_index_from_prop(2);
    assert_eq!(orchestrator.active_index(), Some(2));

    orchestrator.on_user_select(0);
    assert_eq!(orchestrator.active_index(), Some(0));
    let items = orchestrator.items();
    assert_eq!(items.iter().filter(|entry| entry.active).count(), 1);
}

#[test]
fn empty_timeline_is_a_valid_steady_state() {
    let config = TimelineConfig {
        slide_show: true,
        ..TimelineConfig::default()
    };
    let orchestrator = TimelineOrchestrator::new(Vec::new(), config);

    assert!(orchestrator.items().is_empty());
    assert_eq!(orchestrator.active_index(), None);

    orchestrator.start();
    assert_eq!(orchestrator.slideshow_state(), SlideshowState::Idle);

    orchestrator.on_user_select(0);
    assert_eq!(orchestrator.active_index(), None);
}

#[test]
fn identical_update_emits_no_notification_or_state_change() {
    let raw = vec![item("a"), item("b")];
    let orchestrator = TimelineOrchestrator::new(raw.clone(), TimelineConfig::default());
    let before = orchestrator.items();
    let mut changes = orchestrator.subscribe();

    orchestrator.on_external_items_changed(raw);

    assert!(!changes.has_changed().expect("Kênh thông báo bị đóng"));
    assert_eq!(orchestrator.items(), before);
}

#[test]
fn reconciliation_reports_active_index_changes() {
    let orchestrator =
        TimelineOrchestrator::new(vec![item("a"), item("b")], TimelineConfig::default());
    orchestrator.on_user_select(1);
    let mut changes = orchestrator.subscribe();

    // The active item is dropped; the active index falls back to the first.
    orchestrator.on_external_items_changed(vec![item("a")]);

    assert!(changes.has_changed().expect("Kênh thông báo bị đóng"));
    assert_eq!(*changes.borrow_and_update(), Some(0));
    assert_eq!(orchestrator.active_index(), Some(0));
}

#[test]
fn children_like_iterables_are_accepted() {
    let orchestrator = TimelineOrchestrator::new(vec![item("a")], TimelineConfig::default());
    let before = orchestrator.items();

    // Any iterable works as the entry point, not just a Vec.
    orchestrator.on_external_items_changed(["a", "b"].into_iter().map(item));

    let items = orchestrator.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, before[0].id);
}
