//! Raw key events as delivered by the host's event-listener glue

use std::time::Instant;

use crate::types::{EventPhase, Modifiers};

/// One raw key event plus the two flags a handler can set on it
///
/// The host fills in whichever channels its platform reports (character code,
/// key code), the modifier flags held while the event fired, and the phase.
/// After [`Resolver::resolve`](crate::Resolver::resolve) returns, the host
/// reads [`default_prevented`](Self::default_prevented) and
/// [`propagation_stopped`](Self::propagation_stopped) to decide what to do
/// with the native event.
#[derive(Debug, Clone)]
pub struct KeyEvent {
    pub phase: EventPhase,
    /// Character code of the produced character (press phase)
    pub char_code: Option<u32>,
    /// Platform key code of the physical key (down/up phases)
    pub key_code: Option<u32>,
    pub modifiers: Modifiers,
    /// When the event was delivered; drives sequence timeouts
    pub time: Instant,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl KeyEvent {
    /// Create an empty event for the given phase, timestamped now
    pub fn new(phase: EventPhase) -> Self {
        Self {
            phase,
            char_code: None,
            key_code: None,
            modifiers: Modifiers::NONE,
            time: Instant::now(),
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Press-phase event for a produced character
    pub fn press(c: char) -> Self {
        Self::new(EventPhase::Press).char_code(c as u32)
    }

    /// Key-down event for a platform key code
    pub fn down(key_code: u32) -> Self {
        Self::new(EventPhase::Down).key_code(key_code)
    }

    /// Key-up event for a platform key code
    pub fn up(key_code: u32) -> Self {
        Self::new(EventPhase::Up).key_code(key_code)
    }

    pub fn char_code(mut self, code: u32) -> Self {
        self.char_code = Some(code);
        self
    }

    pub fn key_code(mut self, code: u32) -> Self {
        self.key_code = Some(code);
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Override the delivery timestamp
    pub fn at(mut self, time: Instant) -> Self {
        self.time = time;
        self
    }

    /// Suppress the platform's default action for this event
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop the event from reaching further listeners
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_builder() {
        let event = KeyEvent::press('Z').with_modifiers(Modifiers::SHIFT);
        assert_eq!(event.phase, EventPhase::Press);
        assert_eq!(event.char_code, Some('Z' as u32));
        assert_eq!(event.key_code, None);
        assert!(event.modifiers.shift());
    }

    #[test]
    fn test_flags_start_clear() {
        let mut event = KeyEvent::down(83);
        assert!(!event.default_prevented());
        assert!(!event.propagation_stopped());

        event.prevent_default();
        assert!(event.default_prevented());
        assert!(!event.propagation_stopped());

        event.stop_propagation();
        assert!(event.propagation_stopped());
    }
}
