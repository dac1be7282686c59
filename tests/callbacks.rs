//! Callback behavior tests
//!
//! Panicking callbacks, the stop predicate, manual triggering and unbinding.

mod common;

use std::panic::{catch_unwind, AssertUnwindSafe};

use common::{key_down, press, test_resolver, Spy, KEY_S};
use keytrap::{KeyEvent, Modifiers, Propagation, ShortcutError};

// ========================================================================
// Panicking Callbacks
// ========================================================================

#[test]
fn test_panicking_callback_leaves_resolver_consistent() {
    let mut resolver = test_resolver();
    let spy = Spy::new();
    resolver
        .bind::<_, _, ()>("x", |_: &KeyEvent, _: &str| panic!("callback failure"))
        .unwrap();
    resolver.bind("g i", spy.recorder()).unwrap();

    let result = catch_unwind(AssertUnwindSafe(|| press(&mut resolver, 'x')));
    assert!(result.is_err());

    // Bindings survive and sequences still match afterwards
    assert_eq!(resolver.table().len(), 2);
    assert!(!resolver.matcher().is_in_progress());
    press(&mut resolver, 'g');
    press(&mut resolver, 'i');
    assert_eq!(spy.call_count(), 1);
}

#[test]
fn test_panicking_sequence_callback_resets_progress() {
    let mut resolver = test_resolver();
    let calls = std::rc::Rc::new(std::cell::Cell::new(0));
    let counter = std::rc::Rc::clone(&calls);
    resolver
        .bind("g i", move |_: &KeyEvent, _: &str| {
            counter.set(counter.get() + 1);
            if counter.get() == 1 {
                panic!("first call fails");
            }
        })
        .unwrap();

    press(&mut resolver, 'g');
    let result = catch_unwind(AssertUnwindSafe(|| press(&mut resolver, 'i')));
    assert!(result.is_err());
    assert!(!resolver.matcher().is_in_progress());

    // The shared handler is still callable after the panic
    press(&mut resolver, 'g');
    press(&mut resolver, 'i');
    assert_eq!(calls.get(), 2);
}

// ========================================================================
// Stop Predicate
// ========================================================================

#[test]
fn test_stop_predicate_skips_callback() {
    let mut resolver = test_resolver();
    let spy = Spy::new();
    resolver.bind(["a", "b"], spy.recorder()).unwrap();
    resolver.set_stop_predicate(|_: &KeyEvent, combo: &str| combo == "a");

    press(&mut resolver, 'a');
    press(&mut resolver, 'b');
    assert_eq!(spy.args(), vec!["b".to_string()]);

    resolver.clear_stop_predicate();
    press(&mut resolver, 'a');
    assert_eq!(spy.call_count(), 2);
}

#[test]
fn test_stop_predicate_sees_event() {
    let mut resolver = test_resolver();
    let spy = Spy::new();
    resolver.bind("mod+s", spy.recorder()).unwrap();
    resolver.set_stop_predicate(|event: &KeyEvent, _: &str| event.modifiers.shift());

    key_down(&mut resolver, KEY_S, Modifiers::META);
    assert_eq!(spy.call_count(), 1);
}

#[test]
fn test_stopped_sequence_still_resets() {
    let mut resolver = test_resolver();
    let spy = Spy::new();
    resolver.bind("g i", spy.recorder()).unwrap();
    resolver.set_stop_predicate(|_: &KeyEvent, _: &str| true);

    press(&mut resolver, 'g');
    let event = press(&mut resolver, 'i');
    assert_eq!(spy.call_count(), 0);
    assert!(!event.default_prevented());
    assert!(!resolver.matcher().is_in_progress());
}

// ========================================================================
// Manual Trigger
// ========================================================================

#[test]
fn test_trigger_sequence_binding() {
    let mut resolver = test_resolver();
    let spy = Spy::new();
    resolver.bind("g i", spy.callback(Propagation::Suppress)).unwrap();

    assert_eq!(
        resolver.trigger("g i").unwrap(),
        Some(Propagation::Suppress)
    );
    assert_eq!(spy.args(), vec!["g i".to_string()]);
    assert!(!resolver.matcher().is_in_progress());
}

#[test]
fn test_trigger_unknown_shortcut() {
    let mut resolver = test_resolver();
    assert_eq!(resolver.trigger("z").unwrap(), None);
    assert!(matches!(
        resolver.trigger("hyper+z"),
        Err(ShortcutError::UnknownModifier { .. })
    ));
}

// ========================================================================
// Unbind
// ========================================================================

#[test]
fn test_unbind_removes_binding() {
    let mut resolver = test_resolver();
    let spy = Spy::new();
    resolver.bind(["a", "b"], spy.recorder()).unwrap();

    resolver.unbind("a").unwrap();
    press(&mut resolver, 'a');
    press(&mut resolver, 'b');
    assert_eq!(spy.args(), vec!["b".to_string()]);
}

#[test]
fn test_unbind_through_alias() {
    let mut resolver = test_resolver();
    let spy = Spy::new();
    resolver.bind("mod+s", spy.recorder()).unwrap();

    resolver.unbind("command+s").unwrap();
    key_down(&mut resolver, KEY_S, Modifiers::META);
    assert_eq!(spy.call_count(), 0);
    assert!(resolver.table().is_empty());
}

#[test]
fn test_unbind_one_of_shared_prefix_keeps_other() {
    let mut resolver = test_resolver();
    let spy = Spy::new();
    resolver.bind(["g i", "g a"], spy.recorder()).unwrap();

    press(&mut resolver, 'g');
    resolver.unbind("g i").unwrap();
    assert!(resolver.matcher().is_in_progress());

    press(&mut resolver, 'a');
    assert_eq!(spy.args(), vec!["g a".to_string()]);
}
