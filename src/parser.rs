//! Shortcut string parsing
//!
//! `"z"`, `"command+shift+o"`, `"ctrl++"` parse to a single [`Combo`];
//! whitespace-separated groups such as `"g i"` parse to a sequence.

use thiserror::Error;

use crate::types::{Combo, KeyCode, Modifiers};

/// Errors that can occur when parsing a shortcut string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShortcutError {
    #[error("shortcut string is empty")]
    Empty,
    #[error("unknown modifier '{modifier}' in shortcut '{shortcut}'")]
    UnknownModifier { shortcut: String, modifier: String },
    #[error("unknown key '{key}' in shortcut '{shortcut}'")]
    UnknownKey { shortcut: String, key: String },
    #[error("shortcut '{0}' has no key")]
    MissingKey(String),
    #[error("sequence '{0}' cannot fire on key-up")]
    UpPhaseSequence(String),
    #[error("no shortcuts configured for action '{0}'")]
    UnknownAction(String),
}

/// Modifier name canonicalization
///
/// Every shortcut string goes through this single step so `mod+s`,
/// `command+s` and `meta+s` never end up as distinct entries when they name
/// the same modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aliases {
    /// What `mod` stands for
    pub mod_key: Modifiers,
}

impl Aliases {
    /// `mod` is Cmd on macOS, Ctrl elsewhere
    pub fn platform() -> Self {
        Self {
            mod_key: Modifiers::cmd(),
        }
    }

    pub const fn with_mod_key(mod_key: Modifiers) -> Self {
        Self { mod_key }
    }

    /// Resolve a modifier name, already lowercased
    pub fn modifier(&self, name: &str) -> Option<Modifiers> {
        match name {
            "shift" => Some(Modifiers::SHIFT),
            "ctrl" | "control" => Some(Modifiers::CTRL),
            "alt" | "option" | "opt" => Some(Modifiers::ALT),
            "meta" | "command" | "cmd" | "super" => Some(Modifiers::META),
            "mod" => Some(self.mod_key),
            _ => None,
        }
    }
}

impl Default for Aliases {
    fn default() -> Self {
        Self::platform()
    }
}

/// Parse a shortcut into one combo per step
///
/// A single-element result is a plain combo; more than one is a sequence.
pub fn parse_shortcut(shortcut: &str, aliases: &Aliases) -> Result<Vec<Combo>, ShortcutError> {
    let trimmed = shortcut.trim();
    if trimmed.is_empty() {
        return Err(ShortcutError::Empty);
    }

    trimmed
        .split_whitespace()
        .map(|group| parse_combo(group, aliases))
        .collect()
}

/// Parse one `+`-joined group like `"ctrl+shift+s"` into a combo
pub fn parse_combo(group: &str, aliases: &Aliases) -> Result<Combo, ShortcutError> {
    if group == "+" {
        return Ok(Combo::char('+'));
    }

    // "ctrl++" binds the plus key
    let expanded = group.replace("++", "+plus");
    let parts: Vec<&str> = expanded.split('+').collect();

    let Some((key_part, modifier_parts)) = parts.split_last() else {
        return Err(ShortcutError::MissingKey(group.to_string()));
    };

    let mut mods = Modifiers::NONE;
    for part in modifier_parts {
        let lower = part.to_lowercase();
        match aliases.modifier(&lower) {
            Some(flag) => mods = mods | flag,
            None if part.is_empty() => return Err(ShortcutError::MissingKey(group.to_string())),
            None => {
                return Err(ShortcutError::UnknownModifier {
                    shortcut: group.to_string(),
                    modifier: part.to_string(),
                })
            }
        }
    }

    if key_part.is_empty() {
        return Err(ShortcutError::MissingKey(group.to_string()));
    }

    let lower = key_part.to_lowercase();

    // A modifier named as the key is that modifier key, which is itself held
    if let Some(flag) = aliases.modifier(&lower) {
        let key = modifier_key(flag);
        return Ok(Combo::new(key, mods | flag));
    }

    let key = parse_key_code(&lower).ok_or_else(|| ShortcutError::UnknownKey {
        shortcut: group.to_string(),
        key: key_part.to_string(),
    })?;

    Ok(Combo::new(key, mods))
}

fn modifier_key(flag: Modifiers) -> KeyCode {
    if flag.meta() {
        KeyCode::Meta
    } else if flag.ctrl() {
        KeyCode::Ctrl
    } else if flag.alt() {
        KeyCode::Alt
    } else {
        KeyCode::Shift
    }
}

/// Parse a key name or single character, already lowercased
fn parse_key_code(key: &str) -> Option<KeyCode> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return KeyCode::from_char(c);
    }

    let named = match key {
        "backspace" => KeyCode::Backspace,
        "tab" => KeyCode::Tab,
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Escape,
        "space" => KeyCode::Space,
        "capslock" => KeyCode::CapsLock,
        "plus" => KeyCode::Char('+'),

        "up" | "arrowup" => KeyCode::Up,
        "down" | "arrowdown" => KeyCode::Down,
        "left" | "arrowleft" => KeyCode::Left,
        "right" | "arrowright" => KeyCode::Right,

        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdown" | "pgdn" => KeyCode::PageDown,
        "ins" | "insert" => KeyCode::Insert,
        "del" | "delete" => KeyCode::Delete,

        _ => return parse_function_key(key),
    };
    Some(named)
}

fn parse_function_key(key: &str) -> Option<KeyCode> {
    let n: u8 = key.strip_prefix('f')?.parse().ok()?;
    (1..=19).contains(&n).then_some(KeyCode::F(n))
}
