//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use keytrap::{KeyEvent, MatcherConfig, ModKey, Modifiers, Propagation, Resolver};

/// Key codes used by the tests
pub const KEY_ENTER: u32 = 13;
pub const KEY_G: u32 = 71;
pub const KEY_K: u32 = 75;
pub const KEY_O: u32 = 79;
pub const KEY_S: u32 = 83;
pub const KEY_I: u32 = 73;
pub const KEY_SHIFT: u32 = 16;

/// Resolver where `mod` means meta regardless of the host platform
pub fn test_resolver() -> Resolver {
    Resolver::with_config(MatcherConfig {
        mod_key: ModKey::Meta,
        ..MatcherConfig::default()
    })
}

/// Records every call a callback receives
#[derive(Clone, Default)]
pub struct Spy {
    calls: Rc<RefCell<Vec<String>>>,
}

impl Spy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback that records the matched string and returns `result`
    pub fn callback(&self, result: Propagation) -> impl FnMut(&KeyEvent, &str) -> Propagation {
        let calls = Rc::clone(&self.calls);
        move |_: &KeyEvent, combo: &str| {
            calls.borrow_mut().push(combo.to_string());
            result
        }
    }

    /// Callback that records the matched string and returns nothing
    pub fn recorder(&self) -> impl FnMut(&KeyEvent, &str) {
        let calls = Rc::clone(&self.calls);
        move |_: &KeyEvent, combo: &str| calls.borrow_mut().push(combo.to_string())
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn args(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn reset(&self) {
        self.calls.borrow_mut().clear();
    }
}

/// Fire a press-phase event for `c`
pub fn press(resolver: &mut Resolver, c: char) -> KeyEvent {
    press_with(resolver, c, Modifiers::NONE)
}

pub fn press_with(resolver: &mut Resolver, c: char, mods: Modifiers) -> KeyEvent {
    let mut event = KeyEvent::press(c).with_modifiers(mods);
    resolver.resolve(&mut event);
    event
}

/// Fire a key-down event for a key code
pub fn key_down(resolver: &mut Resolver, key_code: u32, mods: Modifiers) -> KeyEvent {
    let mut event = KeyEvent::down(key_code).with_modifiers(mods);
    resolver.resolve(&mut event);
    event
}

/// Fire a press-phase event at `start + millis`
pub fn press_at(resolver: &mut Resolver, c: char, start: Instant, millis: u64) -> KeyEvent {
    let mut event = KeyEvent::press(c).at(start + Duration::from_millis(millis));
    resolver.resolve(&mut event);
    event
}
