//! Resolver: turns raw key events into callback invocations
//!
//! # Pipeline
//!
//! ```text
//! KeyEvent → KeyNormalizer::trigger() → BindingTable::lookup()      → combo callback
//!                                     ↘ SequenceMatcher::feed()      → sequence callback
//! ```
//!
//! Direct combos and sequences are independent tracks. A single event can
//! fire one combo callback and one completed-sequence callback.

use std::fmt;

use crate::binding::{handler, Binding, Propagation};
use crate::config::MatcherConfig;
use crate::event::KeyEvent;
use crate::normalizer::KeyNormalizer;
use crate::parser::ShortcutError;
use crate::sequence::{SequenceMatcher, SequenceOutcome};
use crate::table::{BindingTable, IntoShortcuts, SequenceKey, Shortcut};
use crate::types::EventPhase;

/// Host gate consulted before each callback; `true` skips the callback
pub type StopPredicate = Box<dyn Fn(&KeyEvent, &str) -> bool>;

/// What happened while resolving one event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Literal shortcut strings whose callbacks ran, in call order
    pub fired: Vec<String>,
    /// A sequence is in progress after this event
    pub awaiting_sequence: bool,
    /// Combined directive of every callback that ran
    pub propagation: Propagation,
}

impl Resolution {
    /// Whether any callback ran
    pub fn is_match(&self) -> bool {
        !self.fired.is_empty()
    }
}

/// One independent shortcut-matching context
pub struct Resolver {
    normalizer: KeyNormalizer,
    table: BindingTable,
    matcher: SequenceMatcher,
    config: MatcherConfig,
    stop: Option<StopPredicate>,
}

impl Resolver {
    /// Resolver with default settings
    pub fn new() -> Self {
        Self::with_config(MatcherConfig::default())
    }

    pub fn with_config(config: MatcherConfig) -> Self {
        Self {
            normalizer: KeyNormalizer::new(),
            table: BindingTable::with_aliases(config.aliases()),
            matcher: SequenceMatcher::new(config.sequence_timeout()),
            config,
            stop: None,
        }
    }

    /// Replace the key normalizer (e.g. to plug in other platform quirks)
    pub fn with_normalizer(mut self, normalizer: KeyNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn table(&self) -> &BindingTable {
        &self.table
    }

    pub fn matcher(&self) -> &SequenceMatcher {
        &self.matcher
    }

    /// Skip callbacks for which `predicate(event, shortcut)` returns `true`
    ///
    /// Matching state still advances for skipped callbacks.
    pub fn set_stop_predicate<F>(&mut self, predicate: F)
    where
        F: Fn(&KeyEvent, &str) -> bool + 'static,
    {
        self.stop = Some(Box::new(predicate));
    }

    pub fn clear_stop_predicate(&mut self) {
        self.stop = None;
    }

    /// Bind one shortcut or a collection of shortcuts to a callback
    ///
    /// The callback receives the event and the literal string that matched.
    /// Returning `false` (or [`Propagation::Suppress`]) prevents the default
    /// action and stops propagation; `()`, `true` or
    /// [`Propagation::Continue`] leave the event alone.
    pub fn bind<S, F, R>(&mut self, shortcuts: S, callback: F) -> Result<(), ShortcutError>
    where
        S: IntoShortcuts,
        F: FnMut(&KeyEvent, &str) -> R + 'static,
        R: Into<Propagation>,
    {
        self.table.register(shortcuts, None, handler(callback))
    }

    /// Bind on an explicit event phase instead of the one picked per combo
    pub fn bind_with_phase<S, F, R>(
        &mut self,
        shortcuts: S,
        phase: EventPhase,
        callback: F,
    ) -> Result<(), ShortcutError>
    where
        S: IntoShortcuts,
        F: FnMut(&KeyEvent, &str) -> R + 'static,
        R: Into<Propagation>,
    {
        self.table.register(shortcuts, Some(phase), handler(callback))
    }

    /// Bind the shortcuts configured under `action`
    pub fn bind_action<F, R>(&mut self, action: &str, callback: F) -> Result<(), ShortcutError>
    where
        F: FnMut(&KeyEvent, &str) -> R + 'static,
        R: Into<Propagation>,
    {
        let shortcuts = self
            .config
            .shortcuts_for(action)
            .ok_or_else(|| ShortcutError::UnknownAction(action.to_string()))?;
        self.bind(shortcuts, callback)
    }

    /// Remove bindings registered on their default phase
    pub fn unbind(&mut self, shortcuts: impl IntoShortcuts) -> Result<(), ShortcutError> {
        let removed = self.table.unregister(shortcuts, None)?;
        self.forget_sequences(&removed);
        Ok(())
    }

    /// Remove bindings registered on an explicit phase
    pub fn unbind_with_phase(
        &mut self,
        shortcuts: impl IntoShortcuts,
        phase: EventPhase,
    ) -> Result<(), ShortcutError> {
        let removed = self.table.unregister(shortcuts, Some(phase))?;
        self.forget_sequences(&removed);
        Ok(())
    }

    fn forget_sequences(&mut self, removed: &[SequenceKey]) {
        for steps in removed {
            self.matcher.forget(steps);
        }
    }

    /// Drop every binding and any in-progress sequence
    pub fn reset(&mut self) {
        tracing::debug!(bindings = self.table.len(), "resetting all bindings");
        self.table.clear();
        self.matcher.reset();
    }

    /// Run the callback bound to `shortcut` as if it had been typed
    ///
    /// Returns `Ok(None)` when nothing is bound to it.
    pub fn trigger(&mut self, shortcut: &str) -> Result<Option<Propagation>, ShortcutError> {
        self.trigger_with_phase(shortcut, None)
    }

    /// [`trigger`](Self::trigger) for a binding registered on an explicit phase
    pub fn trigger_with_phase(
        &mut self,
        shortcut: &str,
        phase: Option<EventPhase>,
    ) -> Result<Option<Propagation>, ShortcutError> {
        let key = self.table.canonicalize(shortcut, phase)?;
        let Some(binding) = self.table.find(&key).cloned() else {
            return Ok(None);
        };

        let event_phase = match &key {
            Shortcut::Combo(trigger) => trigger.phase,
            Shortcut::Sequence(steps) => steps.last().map_or(EventPhase::Down, |s| s.phase),
        };
        let mut event = KeyEvent::new(event_phase);
        Ok(Some(self.fire(&binding, &mut event)))
    }

    /// Resolve one raw event, invoking matched callbacks
    ///
    /// All matching state is updated before any callback runs, so a callback
    /// that panics leaves the resolver consistent.
    pub fn resolve(&mut self, event: &mut KeyEvent) -> Resolution {
        let Some(trigger) = self.normalizer.trigger(event) else {
            tracing::trace!(?event, "unrecognized key event");
            return Resolution::default();
        };
        tracing::trace!(%trigger, "resolving");

        let direct = self.table.lookup(&trigger).cloned();

        let completed = match self.matcher.feed(&trigger, event.time, &self.table) {
            SequenceOutcome::Completed(steps) => self.table.sequence(&steps).cloned(),
            _ => None,
        };

        let mut resolution = Resolution {
            awaiting_sequence: self.matcher.is_in_progress(),
            ..Resolution::default()
        };

        for binding in direct.iter().chain(completed.iter()) {
            if self.is_stopped(event, &binding.shortcut) {
                tracing::trace!(shortcut = %binding.shortcut, "callback stopped by predicate");
                continue;
            }
            let directive = self.fire(binding, event);
            resolution.fired.push(binding.shortcut.clone());
            resolution.propagation = resolution.propagation.merge(directive);
        }

        resolution
    }

    fn is_stopped(&self, event: &KeyEvent, shortcut: &str) -> bool {
        self.stop.as_ref().is_some_and(|stop| stop(event, shortcut))
    }

    fn fire(&self, binding: &Binding, event: &mut KeyEvent) -> Propagation {
        tracing::debug!(shortcut = %binding.shortcut, "firing callback");
        let directive = binding.invoke(event);
        if directive.is_suppressed() {
            event.prevent_default();
            event.stop_propagation();
        }
        directive
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("table", &self.table)
            .field("matcher", &self.matcher)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
