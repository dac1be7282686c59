//! Binding struct: the literal shortcut string plus its callback

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::event::KeyEvent;

/// What the host should do with the native event after a callback ran
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Propagation {
    /// Leave default handling and propagation untouched
    #[default]
    Continue,
    /// Prevent the default action and stop propagation
    Suppress,
}

impl Propagation {
    pub fn is_suppressed(self) -> bool {
        self == Propagation::Suppress
    }

    /// Suppress wins over continue
    pub fn merge(self, other: Propagation) -> Propagation {
        if self.is_suppressed() || other.is_suppressed() {
            Propagation::Suppress
        } else {
            Propagation::Continue
        }
    }
}

impl From<()> for Propagation {
    fn from(_: ()) -> Self {
        Propagation::Continue
    }
}

/// `false` suppresses, anything else continues
impl From<bool> for Propagation {
    fn from(keep_going: bool) -> Self {
        if keep_going {
            Propagation::Continue
        } else {
            Propagation::Suppress
        }
    }
}

/// A callback shared by every shortcut string it was registered for
pub type Handler = Rc<RefCell<dyn FnMut(&KeyEvent, &str) -> Propagation>>;

/// Wrap a closure into a [`Handler`]
pub fn handler<F, R>(mut callback: F) -> Handler
where
    F: FnMut(&KeyEvent, &str) -> R + 'static,
    R: Into<Propagation>,
{
    Rc::new(RefCell::new(
        move |event: &KeyEvent, combo: &str| -> Propagation { callback(event, combo).into() },
    ))
}

/// A registered shortcut
#[derive(Clone)]
pub struct Binding {
    /// The shortcut exactly as the caller wrote it
    pub shortcut: String,
    pub handler: Handler,
}

impl Binding {
    pub fn new(shortcut: impl Into<String>, handler: Handler) -> Self {
        Self {
            shortcut: shortcut.into(),
            handler,
        }
    }

    /// Run the callback with this binding's literal string
    pub fn invoke(&self, event: &KeyEvent) -> Propagation {
        let mut callback = self.handler.borrow_mut();
        (&mut *callback)(event, &self.shortcut)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("shortcut", &self.shortcut)
            .finish_non_exhaustive()
    }
}
