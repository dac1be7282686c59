//! Core types for shortcut matching: Modifiers, KeyCode, Combo, EventPhase, Trigger

use std::fmt;

/// Set of held modifier keys
///
/// Matching compares whole sets, so `ctrl+s` never matches `ctrl+shift+s`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(1 << 0);
    pub const SHIFT: Modifiers = Modifiers(1 << 1);
    pub const ALT: Modifiers = Modifiers(1 << 2);
    /// Command on macOS, the Windows key elsewhere
    pub const META: Modifiers = Modifiers(1 << 3);

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.contains(Modifiers::CTRL)
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.contains(Modifiers::SHIFT)
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.contains(Modifiers::ALT)
    }

    #[inline]
    pub const fn meta(self) -> bool {
        self.contains(Modifiers::META)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Drop every flag held in `other`
    #[inline]
    pub const fn without(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 & !other.0)
    }

    /// Every flag of `other` is held
    #[inline]
    pub const fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Get the platform-specific "command" modifier (Cmd on macOS, Ctrl elsewhere)
    pub fn cmd() -> Modifiers {
        if cfg!(target_os = "macos") {
            Modifiers::META
        } else {
            Modifiers::CTRL
        }
    }

    /// Canonical names of the held modifiers, alphabetically ordered
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        [
            (Modifiers::ALT, "alt"),
            (Modifiers::CTRL, "ctrl"),
            (Modifiers::META, "meta"),
            (Modifiers::SHIFT, "shift"),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self.names().collect();
        write!(f, "{}", parts.join("+"))
    }
}

/// Canonical identifier for one physical key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable key (letters normalized to lowercase)
    Char(char),

    // Named keys
    Backspace,
    Tab,
    Enter,
    Escape,
    Space,
    CapsLock,

    // Modifier keys pressed on their own
    Shift,
    Ctrl,
    Alt,
    Meta,

    // Arrow keys
    Up,
    Down,
    Left,
    Right,

    // Navigation
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,

    // Function keys
    F(u8), // F1-F19
}

impl KeyCode {
    /// Key for a printable character, folding case and the whitespace keys
    pub fn from_char(c: char) -> Option<KeyCode> {
        match c {
            ' ' => Some(KeyCode::Space),
            '\r' | '\n' => Some(KeyCode::Enter),
            '\t' => Some(KeyCode::Tab),
            c if c.is_control() => None,
            c => Some(KeyCode::Char(c.to_lowercase().next().unwrap_or(c))),
        }
    }

    /// Whether this is one of the modifier keys itself
    pub const fn is_modifier(self) -> bool {
        matches!(
            self,
            KeyCode::Shift | KeyCode::Ctrl | KeyCode::Alt | KeyCode::Meta
        )
    }

    /// The modifier flag a modifier key sets while held
    pub const fn as_modifier(self) -> Option<Modifiers> {
        match self {
            KeyCode::Shift => Some(Modifiers::SHIFT),
            KeyCode::Ctrl => Some(Modifiers::CTRL),
            KeyCode::Alt => Some(Modifiers::ALT),
            KeyCode::Meta => Some(Modifiers::META),
            _ => None,
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char('+') => write!(f, "plus"),
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::Backspace => write!(f, "backspace"),
            KeyCode::Tab => write!(f, "tab"),
            KeyCode::Enter => write!(f, "enter"),
            KeyCode::Escape => write!(f, "esc"),
            KeyCode::Space => write!(f, "space"),
            KeyCode::CapsLock => write!(f, "capslock"),
            KeyCode::Shift => write!(f, "shift"),
            KeyCode::Ctrl => write!(f, "ctrl"),
            KeyCode::Alt => write!(f, "alt"),
            KeyCode::Meta => write!(f, "meta"),
            KeyCode::Up => write!(f, "up"),
            KeyCode::Down => write!(f, "down"),
            KeyCode::Left => write!(f, "left"),
            KeyCode::Right => write!(f, "right"),
            KeyCode::Home => write!(f, "home"),
            KeyCode::End => write!(f, "end"),
            KeyCode::PageUp => write!(f, "pageup"),
            KeyCode::PageDown => write!(f, "pagedown"),
            KeyCode::Insert => write!(f, "ins"),
            KeyCode::Delete => write!(f, "del"),
            KeyCode::F(n) => write!(f, "f{}", n),
        }
    }
}

/// A key with the exact set of modifiers that must be held
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Combo {
    pub key: KeyCode,
    pub mods: Modifiers,
}

impl Combo {
    /// Create a new combo
    pub const fn new(key: KeyCode, mods: Modifiers) -> Self {
        Self { key, mods }
    }

    /// Create a combo with no modifiers
    pub const fn key(key: KeyCode) -> Self {
        Self {
            key,
            mods: Modifiers::NONE,
        }
    }

    /// Create a combo with a character key
    pub fn char(c: char) -> Self {
        Self::char_with_mods(c, Modifiers::NONE)
    }

    /// Create a combo with a character and modifiers
    pub fn char_with_mods(c: char, mods: Modifiers) -> Self {
        Self {
            key: KeyCode::Char(c.to_lowercase().next().unwrap_or(c)),
            mods,
        }
    }

    /// The phase a binding for this combo listens on when none is given.
    ///
    /// Plain printable characters use the press phase; anything held with a
    /// modifier, or a named key, uses key-down.
    pub fn default_phase(&self) -> EventPhase {
        match self.key {
            KeyCode::Char(_) if self.mods.is_empty() => EventPhase::Press,
            _ => EventPhase::Down,
        }
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.mods.is_empty() {
            write!(f, "{}+{}", self.mods, self.key)
        } else {
            write!(f, "{}", self.key)
        }
    }
}

/// Which part of a key stroke an event reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventPhase {
    Down,
    /// Composite phase carrying the produced character
    Press,
    Up,
}

impl fmt::Display for EventPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventPhase::Down => write!(f, "keydown"),
            EventPhase::Press => write!(f, "keypress"),
            EventPhase::Up => write!(f, "keyup"),
        }
    }
}

/// A combo bound to the event phase it fires on; the key of every binding
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Trigger {
    pub combo: Combo,
    pub phase: EventPhase,
}

impl Trigger {
    pub const fn new(combo: Combo, phase: EventPhase) -> Self {
        Self { combo, phase }
    }

    /// Trigger on the combo's default phase
    pub fn from_combo(combo: Combo) -> Self {
        Self {
            phase: combo.default_phase(),
            combo,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.combo, self.phase)
    }
}
