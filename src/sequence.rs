//! Sequence matching state machine
//!
//! Tracks progress through multi-step bindings like `g i`. Sequences are a
//! separate track from direct combos: the resolver feeds every trigger here
//! whether or not it also matched a combo.

use std::time::{Duration, Instant};

use crate::table::{BindingTable, SequenceKey};
use crate::types::{EventPhase, KeyCode, Trigger};

/// Default time allowed between two steps of a sequence
pub const DEFAULT_SEQUENCE_TIMEOUT: Duration = Duration::from_millis(1000);

/// In-progress matching state
#[derive(Debug, Clone)]
pub struct SequenceProgress {
    /// Sequences still consistent with every step seen so far
    pub candidates: Vec<SequenceKey>,
    /// Index of the next expected step, shared by all candidates
    pub position: usize,
    /// When the last step was accepted
    pub last_step: Instant,
    /// Key of a step accepted on key-down. The press event the same
    /// keystroke delivers next is not a step of its own.
    pub pending_press: Option<KeyCode>,
}

/// Result of feeding one trigger to the matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceOutcome {
    /// The event does not take part in sequence matching
    Ignored,
    /// Nothing in progress and the trigger starts no sequence
    Idle,
    /// The trigger is the first step of at least one sequence
    Started,
    /// Candidates advanced to the next step
    Advanced,
    /// Some candidates diverged; others still wait for a different phase
    Pending,
    /// A sequence matched its final step
    Completed(SequenceKey),
    /// The trigger matched no candidate; state is back to idle
    Aborted,
}

/// One matching context: IDLE when `progress` is `None`
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    progress: Option<SequenceProgress>,
    timeout: Duration,
}

impl SequenceMatcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            progress: None,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Clear any in-progress sequence
    pub fn reset(&mut self) {
        self.progress = None;
    }

    pub fn is_in_progress(&self) -> bool {
        self.progress.is_some()
    }

    /// Index of the next expected step, 0 when idle
    pub fn position(&self) -> usize {
        self.progress.as_ref().map_or(0, |p| p.position)
    }

    pub fn progress(&self) -> Option<&SequenceProgress> {
        self.progress.as_ref()
    }

    /// Drop a sequence that is no longer registered
    pub fn forget(&mut self, steps: &[Trigger]) {
        let Some(progress) = self.progress.as_mut() else {
            return;
        };
        progress.candidates.retain(|c| c.as_slice() != steps);
        if progress.candidates.is_empty() {
            tracing::debug!("sequence removed while in progress, resetting");
            self.progress = None;
        }
    }

    /// Advance the state machine by one trigger
    pub fn feed(&mut self, trigger: &Trigger, now: Instant, table: &BindingTable) -> SequenceOutcome {
        if trigger.phase == EventPhase::Up {
            return SequenceOutcome::Ignored;
        }

        if self.expired(now) {
            tracing::debug!(timeout_ms = self.timeout.as_millis() as u64, "sequence timed out");
            self.progress = None;
        }

        match self.progress.take() {
            None => self.start(trigger, now, table),
            Some(progress) => self.step(progress, trigger, now),
        }
    }

    fn expired(&self, now: Instant) -> bool {
        self.progress
            .as_ref()
            .is_some_and(|p| now.saturating_duration_since(p.last_step) > self.timeout)
    }

    fn start(&mut self, trigger: &Trigger, now: Instant, table: &BindingTable) -> SequenceOutcome {
        let candidates = table.sequences_starting_with(trigger).to_vec();
        if candidates.is_empty() {
            return SequenceOutcome::Idle;
        }

        tracing::debug!(
            step = %trigger,
            candidates = candidates.len(),
            "sequence started"
        );
        self.progress = Some(SequenceProgress {
            candidates,
            position: 1,
            last_step: now,
            pending_press: pending_press(trigger),
        });
        SequenceOutcome::Started
    }

    fn step(&mut self, mut progress: SequenceProgress, trigger: &Trigger, now: Instant) -> SequenceOutcome {
        let position = progress.position;

        // Holding down a modifier on its way to the next combo is not a step
        if trigger.combo.key.is_modifier() {
            self.progress = Some(progress);
            return SequenceOutcome::Ignored;
        }

        let echo = trigger.phase == EventPhase::Press
            && progress.pending_press == Some(trigger.combo.key);
        progress.pending_press = None;
        if echo {
            tracing::trace!(step = %trigger, "press of the last key-down step, skipping");
            self.progress = Some(progress);
            return SequenceOutcome::Ignored;
        }

        let (evaluated, waiting): (Vec<SequenceKey>, Vec<SequenceKey>) = progress
            .candidates
            .into_iter()
            .partition(|c| c.get(position).is_some_and(|s| s.phase == trigger.phase));

        if evaluated.is_empty() {
            self.progress = Some(SequenceProgress {
                candidates: waiting,
                ..progress
            });
            return SequenceOutcome::Ignored;
        }

        let matched: Vec<SequenceKey> = evaluated
            .into_iter()
            .filter(|c| c[position] == *trigger)
            .collect();

        if matched.is_empty() {
            if waiting.is_empty() {
                tracing::debug!(step = %trigger, position, "sequence aborted");
                return SequenceOutcome::Aborted;
            }
            self.progress = Some(SequenceProgress {
                candidates: waiting,
                ..progress
            });
            return SequenceOutcome::Pending;
        }

        let next = position + 1;
        if let Some(done) = matched.iter().find(|c| c.len() == next) {
            tracing::debug!(steps = done.len(), "sequence completed");
            return SequenceOutcome::Completed(done.clone());
        }

        self.progress = Some(SequenceProgress {
            candidates: matched,
            position: next,
            last_step: now,
            pending_press: pending_press(trigger),
        });
        SequenceOutcome::Advanced
    }
}

fn pending_press(step: &Trigger) -> Option<KeyCode> {
    (step.phase == EventPhase::Down).then_some(step.combo.key)
}

impl Default for SequenceMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_SEQUENCE_TIMEOUT)
    }
}
