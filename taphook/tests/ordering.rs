//! Tap ordering observed through real dispatches.

use serde_json::json;
use taphook::{Hook, TapOptions, sync_hook, testing::OrderLog};

mod common;
use common::Build;

fn hook() -> Hook<Build> {
    sync_hook(["build"])
}

#[test]
fn test_registration_order_is_kept() {
    let hook = hook();
    let log = OrderLog::new();
    for name in ["a", "b", "c"] {
        hook.register(name, log.recorder(name, None)).unwrap();
    }
    hook.call(Build::new("web")).unwrap();
    assert_eq!(log.entries(), ["a", "b", "c"]);
}

#[test]
fn test_lower_stages_run_first() {
    let hook = hook();
    let log = OrderLog::new();
    hook.register("A", log.recorder("A", None)).unwrap();
    hook.register(json!({ "name": "B", "stage": -1 }), log.recorder("B", None))
        .unwrap();
    hook.register("C", log.recorder("C", None)).unwrap();

    hook.call(Build::new("web")).unwrap();
    assert_eq!(log.entries(), ["B", "A", "C"]);
}

#[test]
fn test_fractional_stages_sort_between_integers() {
    let hook = hook();
    let log = OrderLog::new();
    hook.register(json!({ "name": "two", "stage": 2 }), log.recorder("two", None))
        .unwrap();
    hook.register(json!({ "name": "one", "stage": 1 }), log.recorder("one", None))
        .unwrap();
    hook.register(json!({ "name": "between", "stage": 1.5 }), log.recorder("between", None))
        .unwrap();

    hook.call(Build::new("web")).unwrap();
    assert_eq!(log.entries(), ["one", "between", "two"]);
}

#[test]
fn test_non_numeric_stage_counts_as_zero() {
    let hook = hook();
    let log = OrderLog::new();
    hook.register(json!({ "name": "late", "stage": 1 }), log.recorder("late", None))
        .unwrap();
    hook.register(json!({ "name": "word", "stage": "high" }), log.recorder("word", None))
        .unwrap();
    hook.register(json!({ "name": "early", "stage": -1 }), log.recorder("early", None))
        .unwrap();

    hook.call(Build::new("web")).unwrap();
    assert_eq!(log.entries(), ["early", "word", "late"]);
}

#[test]
fn test_non_string_before_is_no_constraint() {
    let hook = hook();
    let log = OrderLog::new();
    hook.register("X", log.recorder("X", None)).unwrap();
    hook.register(json!({ "name": "Y", "before": 5 }), log.recorder("Y", None))
        .unwrap();

    assert_eq!(hook.tap_names(), ["X", "Y"]);
}

#[test]
fn test_before_list_places_tap_ahead_of_all_named() {
    let hook = hook();
    let log = OrderLog::new();
    hook.register("X", log.recorder("X", None)).unwrap();
    hook.register("Y", log.recorder("Y", None)).unwrap();
    hook.register(json!({ "name": "Z", "before": ["X", "Y"] }), log.recorder("Z", None))
        .unwrap();

    hook.call(Build::new("web")).unwrap();
    assert_eq!(log.entries(), ["Z", "X", "Y"]);
}

#[test]
fn test_before_single_name() {
    let hook = hook();
    let log = OrderLog::new();
    hook.register("X", log.recorder("X", None)).unwrap();
    hook.register("Y", log.recorder("Y", None)).unwrap();
    hook.register(TapOptions::new("Z").before("Y"), log.recorder("Z", None))
        .unwrap();

    assert_eq!(hook.tap_names(), ["X", "Z", "Y"]);
}

#[test]
fn test_before_string_form() {
    let hook = hook();
    let log = OrderLog::new();
    hook.register("X", log.recorder("X", None)).unwrap();
    hook.register(json!({ "name": "W", "before": "X" }), log.recorder("W", None))
        .unwrap();

    assert_eq!(hook.tap_names(), ["W", "X"]);
}

#[test]
fn test_unmatched_before_goes_first() {
    let hook = hook();
    let log = OrderLog::new();
    hook.register("X", log.recorder("X", None)).unwrap();
    hook.register(json!({ "name": "Q", "before": "missing" }), log.recorder("Q", None))
        .unwrap();

    assert_eq!(hook.tap_names(), ["Q", "X"]);
}

#[test]
fn test_taps_added_during_dispatch_join_next_time() {
    let hook = std::sync::Arc::new(hook());
    let log = OrderLog::new();

    let inner = std::sync::Arc::clone(&hook);
    let late = log.clone();
    hook.tap("spawner", move |_: &Build| {
        if inner.tap_names().len() == 1 {
            inner.register("late", late.recorder("late", None))?;
        }
        Ok(None)
    })
    .unwrap();

    hook.call(Build::new("web")).unwrap();
    assert!(log.is_empty());

    hook.call(Build::new("web")).unwrap();
    assert_eq!(log.entries(), ["late"]);
}
