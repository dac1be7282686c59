//! BindingTable: storage and keyed lookup of registered shortcuts

use std::collections::HashMap;
use std::fmt;

use crate::binding::{Binding, Handler};
use crate::parser::{parse_shortcut, Aliases, ShortcutError};
use crate::types::{EventPhase, Trigger};

/// Canonical key of a multi-step binding
pub type SequenceKey = Vec<Trigger>;

/// A shortcut string after canonicalization
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Shortcut {
    Combo(Trigger),
    Sequence(SequenceKey),
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shortcut::Combo(trigger) => write!(f, "{}", trigger),
            Shortcut::Sequence(steps) => {
                let parts: Vec<String> = steps.iter().map(|s| s.to_string()).collect();
                write!(f, "{}", parts.join(" "))
            }
        }
    }
}

/// One shortcut string or an ordered collection of them
pub trait IntoShortcuts {
    fn into_shortcuts(self) -> Vec<String>;
}

impl IntoShortcuts for &str {
    fn into_shortcuts(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoShortcuts for String {
    fn into_shortcuts(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoShortcuts for &String {
    fn into_shortcuts(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl IntoShortcuts for &[&str] {
    fn into_shortcuts(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> IntoShortcuts for [&str; N] {
    fn into_shortcuts(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl IntoShortcuts for Vec<&str> {
    fn into_shortcuts(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl IntoShortcuts for Vec<String> {
    fn into_shortcuts(self) -> Vec<String> {
        self
    }
}

impl IntoShortcuts for &[String] {
    fn into_shortcuts(self) -> Vec<String> {
        self.to_vec()
    }
}

/// Registered combos and sequences
///
/// Each canonical key holds exactly one binding; registering the same key
/// again replaces it.
#[derive(Debug, Default)]
pub struct BindingTable {
    aliases: Aliases,
    /// Single-step bindings
    combos: HashMap<Trigger, Binding>,
    /// Multi-step bindings
    sequences: HashMap<SequenceKey, Binding>,
    /// First step of every registered sequence
    sequence_starts: HashMap<Trigger, Vec<SequenceKey>>,
}

impl BindingTable {
    /// Create an empty table with platform aliases
    pub fn new() -> Self {
        Self::with_aliases(Aliases::platform())
    }

    pub fn with_aliases(aliases: Aliases) -> Self {
        Self {
            aliases,
            combos: HashMap::new(),
            sequences: HashMap::new(),
            sequence_starts: HashMap::new(),
        }
    }

    pub fn aliases(&self) -> &Aliases {
        &self.aliases
    }

    /// Canonicalize a shortcut string
    ///
    /// Without an explicit phase each step listens on its combo's default
    /// phase.
    pub fn canonicalize(
        &self,
        shortcut: &str,
        phase: Option<EventPhase>,
    ) -> Result<Shortcut, ShortcutError> {
        let combos = parse_shortcut(shortcut, &self.aliases)?;

        if combos.len() > 1 && phase == Some(EventPhase::Up) {
            return Err(ShortcutError::UpPhaseSequence(shortcut.to_string()));
        }

        let mut steps: Vec<Trigger> = combos
            .into_iter()
            .map(|combo| Trigger::new(combo, phase.unwrap_or_else(|| combo.default_phase())))
            .collect();

        if steps.len() == 1 {
            Ok(Shortcut::Combo(steps.remove(0)))
        } else {
            Ok(Shortcut::Sequence(steps))
        }
    }

    /// Register one or more shortcut strings against a shared handler
    ///
    /// Every string is parsed before anything is inserted, so a malformed
    /// element leaves the table untouched.
    pub fn register(
        &mut self,
        shortcuts: impl IntoShortcuts,
        phase: Option<EventPhase>,
        handler: Handler,
    ) -> Result<(), ShortcutError> {
        let shortcuts = shortcuts.into_shortcuts();
        if shortcuts.is_empty() {
            return Err(ShortcutError::Empty);
        }

        let parsed = shortcuts
            .into_iter()
            .map(|s| self.canonicalize(&s, phase).map(|key| (s, key)))
            .collect::<Result<Vec<_>, _>>()?;

        for (literal, key) in parsed {
            let binding = Binding::new(literal, handler.clone());
            self.insert(key, binding);
        }
        Ok(())
    }

    /// Insert a binding under its canonical key, replacing any previous one
    pub fn insert(&mut self, key: Shortcut, binding: Binding) {
        tracing::debug!(shortcut = %binding.shortcut, key = %key, "registering binding");

        let replaced = match key {
            Shortcut::Combo(trigger) => self.combos.insert(trigger, binding),
            Shortcut::Sequence(steps) => {
                if !self.sequences.contains_key(&steps) {
                    self.sequence_starts
                        .entry(steps[0])
                        .or_default()
                        .push(steps.clone());
                }
                self.sequences.insert(steps, binding)
            }
        };

        if let Some(old) = replaced {
            tracing::debug!(previous = %old.shortcut, "replaced existing binding");
        }
    }

    /// Remove the bindings for the given shortcut strings
    ///
    /// Returns the keys of removed sequences so in-progress matching can
    /// drop them.
    pub fn unregister(
        &mut self,
        shortcuts: impl IntoShortcuts,
        phase: Option<EventPhase>,
    ) -> Result<Vec<SequenceKey>, ShortcutError> {
        let keys = shortcuts
            .into_shortcuts()
            .iter()
            .map(|s| self.canonicalize(s, phase))
            .collect::<Result<Vec<_>, _>>()?;

        let mut removed_sequences = Vec::new();
        for key in keys {
            if let Some(steps) = self.remove(&key) {
                removed_sequences.push(steps);
            }
        }
        Ok(removed_sequences)
    }

    fn remove(&mut self, key: &Shortcut) -> Option<SequenceKey> {
        match key {
            Shortcut::Combo(trigger) => {
                if let Some(old) = self.combos.remove(trigger) {
                    tracing::debug!(shortcut = %old.shortcut, "removed binding");
                }
                None
            }
            Shortcut::Sequence(steps) => {
                let old = self.sequences.remove(steps.as_slice())?;
                tracing::debug!(shortcut = %old.shortcut, "removed sequence binding");

                if let Some(starts) = self.sequence_starts.get_mut(&steps[0]) {
                    starts.retain(|s| s != steps);
                    if starts.is_empty() {
                        self.sequence_starts.remove(&steps[0]);
                    }
                }
                Some(steps.clone())
            }
        }
    }

    /// Drop every binding
    pub fn clear(&mut self) {
        self.combos.clear();
        self.sequences.clear();
        self.sequence_starts.clear();
    }

    /// Direct single-step binding for a trigger
    pub fn lookup(&self, trigger: &Trigger) -> Option<&Binding> {
        self.combos.get(trigger)
    }

    /// Binding registered for a full sequence
    pub fn sequence(&self, steps: &[Trigger]) -> Option<&Binding> {
        self.sequences.get(steps)
    }

    /// Step `index` of a registered sequence
    pub fn lookup_sequence_step(&self, steps: &[Trigger], index: usize) -> Option<&Trigger> {
        let (key, _) = self.sequences.get_key_value(steps)?;
        key.get(index)
    }

    /// Sequences whose first step is `trigger`
    pub fn sequences_starting_with(&self, trigger: &Trigger) -> &[SequenceKey] {
        self.sequence_starts
            .get(trigger)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Binding for an already canonicalized shortcut
    pub fn find(&self, key: &Shortcut) -> Option<&Binding> {
        match key {
            Shortcut::Combo(trigger) => self.lookup(trigger),
            Shortcut::Sequence(steps) => self.sequence(steps),
        }
    }

    /// Number of registered combos and sequences
    pub fn len(&self) -> usize {
        self.combos.len() + self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{handler, Propagation};
    use crate::event::KeyEvent;
    use crate::types::{Combo, Modifiers};

    fn noop() -> Handler {
        handler(|_: &KeyEvent, _: &str| {})
    }

    fn table() -> BindingTable {
        BindingTable::with_aliases(Aliases::with_mod_key(Modifiers::META))
    }

    fn press(c: char) -> Trigger {
        Trigger::new(Combo::char(c), EventPhase::Press)
    }

    #[test]
    fn test_register_single_combo() {
        let mut table = table();
        table.register("z", None, noop()).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup(&press('z')).unwrap().shortcut, "z");
        assert!(table.lookup(&press('b')).is_none());
    }

    #[test]
    fn test_combo_with_modifier_uses_key_down() {
        let mut table = table();
        table.register("command+o", None, noop()).unwrap();

        let down = Trigger::new(
            Combo::char_with_mods('o', Modifiers::META),
            EventPhase::Down,
        );
        assert!(table.lookup(&down).is_some());
    }

    #[test]
    fn test_register_array_keeps_literals() {
        let mut table = table();
        table.register(["a", "B", "c"], None, noop()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.lookup(&press('a')).unwrap().shortcut, "a");
        assert_eq!(table.lookup(&press('b')).unwrap().shortcut, "B");
    }

    #[test]
    fn test_register_overwrites_same_canonical_key() {
        let mut table = table();
        let first = handler(|_: &KeyEvent, _: &str| Propagation::Continue);
        let second = handler(|_: &KeyEvent, _: &str| Propagation::Suppress);

        table.register("mod+s", None, first).unwrap();
        table.register("command+s", None, second).unwrap();

        assert_eq!(table.len(), 1);
        let trigger = Trigger::new(Combo::char_with_mods('s', Modifiers::META), EventPhase::Down);
        let binding = table.lookup(&trigger).unwrap();
        assert_eq!(binding.shortcut, "command+s");
        assert_eq!(
            binding.invoke(&KeyEvent::down(83)),
            Propagation::Suppress
        );
    }

    #[test]
    fn test_malformed_element_rejects_whole_array() {
        let mut table = table();
        let result = table.register(["a", "hyper+b"], None, noop());

        assert!(result.is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_sequence_registration_and_steps() {
        let mut table = table();
        table.register("g i", None, noop()).unwrap();
        table.register("g a", None, noop()).unwrap();

        let starts = table.sequences_starting_with(&press('g'));
        assert_eq!(starts.len(), 2);

        let gi = vec![press('g'), press('i')];
        assert_eq!(table.lookup_sequence_step(&gi, 1), Some(&press('i')));
        assert_eq!(table.lookup_sequence_step(&gi, 2), None);
        assert_eq!(table.sequence(&gi).unwrap().shortcut, "g i");

        // Sequences are not direct combos
        assert!(table.lookup(&press('g')).is_none());
    }

    #[test]
    fn test_sequence_overwrite_keeps_single_start_entry() {
        let mut table = table();
        table.register("g i", None, noop()).unwrap();
        table.register("G I", None, noop()).unwrap();

        assert_eq!(table.sequences_starting_with(&press('g')).len(), 1);
        let gi = vec![press('g'), press('i')];
        assert_eq!(table.sequence(&gi).unwrap().shortcut, "G I");
    }

    #[test]
    fn test_unregister() {
        let mut table = table();
        table.register(["x", "g i"], None, noop()).unwrap();

        let removed = table.unregister(["x", "g i"], None).unwrap();
        assert_eq!(removed, vec![vec![press('g'), press('i')]]);
        assert!(table.is_empty());
        assert!(table.sequences_starting_with(&press('g')).is_empty());
    }

    #[test]
    fn test_up_phase_sequence_rejected() {
        let table = table();
        assert_eq!(
            table.canonicalize("g i", Some(EventPhase::Up)),
            Err(ShortcutError::UpPhaseSequence("g i".to_string()))
        );
        assert!(table.canonicalize("g", Some(EventPhase::Up)).is_ok());
    }

    #[test]
    fn test_explicit_phase_applies_to_every_step() {
        let table = table();
        let key = table.canonicalize("a b", Some(EventPhase::Down)).unwrap();
        let Shortcut::Sequence(steps) = key else {
            panic!("expected a sequence");
        };
        assert!(steps.iter().all(|s| s.phase == EventPhase::Down));
    }
}
