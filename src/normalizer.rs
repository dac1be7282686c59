//! Convert raw key events into canonical triggers
//!
//! Two raw channels reach us: the character code (press phase) and the
//! platform key code (down/up phases). Both are folded into the same
//! [`KeyCode`] space so a shortcut string matches regardless of which
//! channel produced the event.

use crate::event::KeyEvent;
use crate::types::{Combo, EventPhase, KeyCode, Modifiers, Trigger};

/// Platform-specific remapping of alternate character codes
///
/// Some platforms report a different character while a modifier is held
/// (macOS option+z produces `Ω`). An implementation maps such a code back to
/// the key that was physically pressed. Returning `None` leaves the code to
/// the default character mapping.
pub trait PlatformQuirks {
    fn remap(&self, code: u32, mods: Modifiers) -> Option<KeyCode>;
}

impl<F> PlatformQuirks for F
where
    F: Fn(u32, Modifiers) -> Option<KeyCode>,
{
    fn remap(&self, code: u32, mods: Modifiers) -> Option<KeyCode> {
        self(code, mods)
    }
}

/// No remapping at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoQuirks;

impl PlatformQuirks for NoQuirks {
    fn remap(&self, _code: u32, _mods: Modifiers) -> Option<KeyCode> {
        None
    }
}

/// The macOS US option layer: characters produced by option+key
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionLayerQuirks;

impl PlatformQuirks for OptionLayerQuirks {
    fn remap(&self, code: u32, mods: Modifiers) -> Option<KeyCode> {
        if !mods.alt() {
            return None;
        }
        let c = char::from_u32(code)?;
        let base = match c {
            'å' | 'Å' => 'a',
            '∫' | 'ı' => 'b',
            'ç' | 'Ç' => 'c',
            '∂' | 'Î' => 'd',
            'ƒ' | 'Ï' => 'f',
            '©' | '˝' => 'g',
            '˙' | 'Ó' => 'h',
            '∆' | 'Ô' => 'j',
            '˚' => 'k',
            '¬' | 'Ò' => 'l',
            'µ' | 'Â' => 'm',
            'ø' | 'Ø' => 'o',
            'π' | '∏' => 'p',
            'œ' | 'Œ' => 'q',
            '®' | '‰' => 'r',
            'ß' | 'Í' => 's',
            '†' | 'ˇ' => 't',
            '√' | '◊' => 'v',
            '∑' | '„' => 'w',
            '≈' | '˛' => 'x',
            '¥' | 'Á' => 'y',
            'Ω' | '¸' => 'z',
            '¡' => '1',
            '™' => '2',
            '£' => '3',
            '¢' => '4',
            '∞' => '5',
            '§' => '6',
            '¶' => '7',
            '•' => '8',
            'ª' => '9',
            'º' => '0',
            _ => return None,
        };
        Some(KeyCode::Char(base))
    }
}

/// Symbols a US layout only produces with shift held
///
/// On the press phase the character already reflects shift, so shift is not
/// part of the combo for these.
const SHIFTED_SYMBOLS: &str = "~!@#$%^&*()_+{}|:\"<>?";

/// Map a platform key code to a canonical key
pub fn key_from_key_code(code: u32) -> Option<KeyCode> {
    let key = match code {
        8 => KeyCode::Backspace,
        9 => KeyCode::Tab,
        13 => KeyCode::Enter,
        16 => KeyCode::Shift,
        17 => KeyCode::Ctrl,
        18 => KeyCode::Alt,
        20 => KeyCode::CapsLock,
        27 => KeyCode::Escape,
        32 => KeyCode::Space,
        33 => KeyCode::PageUp,
        34 => KeyCode::PageDown,
        35 => KeyCode::End,
        36 => KeyCode::Home,
        37 => KeyCode::Left,
        38 => KeyCode::Up,
        39 => KeyCode::Right,
        40 => KeyCode::Down,
        45 => KeyCode::Insert,
        46 => KeyCode::Delete,
        91 | 92 | 93 | 224 => KeyCode::Meta,

        // Digits and letters share their ASCII codes
        48..=57 | 65..=90 => KeyCode::Char(char::from_u32(code)?.to_ascii_lowercase()),

        // Keypad normalizes to the characters it types
        96..=105 => KeyCode::Char(char::from_u32(code - 48)?),
        106 => KeyCode::Char('*'),
        107 => KeyCode::Char('+'),
        109 => KeyCode::Char('-'),
        110 => KeyCode::Char('.'),
        111 => KeyCode::Char('/'),

        112..=130 => KeyCode::F((code - 111) as u8),

        186 => KeyCode::Char(';'),
        187 => KeyCode::Char('='),
        188 => KeyCode::Char(','),
        189 => KeyCode::Char('-'),
        190 => KeyCode::Char('.'),
        191 => KeyCode::Char('/'),
        192 => KeyCode::Char('`'),
        219 => KeyCode::Char('['),
        220 => KeyCode::Char('\\'),
        221 => KeyCode::Char(']'),
        222 => KeyCode::Char('\''),

        _ => return None,
    };
    Some(key)
}

/// Turns [`KeyEvent`]s into [`Trigger`]s
pub struct KeyNormalizer {
    quirks: Box<dyn PlatformQuirks>,
}

impl KeyNormalizer {
    /// Normalizer using the macOS option-layer quirks
    pub fn new() -> Self {
        Self::with_quirks(OptionLayerQuirks)
    }

    /// Normalizer with a custom quirk table
    pub fn with_quirks(quirks: impl PlatformQuirks + 'static) -> Self {
        Self {
            quirks: Box::new(quirks),
        }
    }

    /// Canonical key for an event, or `None` if neither channel is recognized
    pub fn normalize(&self, event: &KeyEvent) -> Option<KeyCode> {
        match event.phase {
            EventPhase::Press => self.normalize_press(event),
            EventPhase::Down | EventPhase::Up => event
                .key_code
                .and_then(key_from_key_code)
                .or_else(|| event.char_code.and_then(char::from_u32).and_then(KeyCode::from_char)),
        }
    }

    fn normalize_press(&self, event: &KeyEvent) -> Option<KeyCode> {
        let mods = event.modifiers;

        // A modifying key may have changed the character; the key code still
        // names the physical key.
        if mods.alt() || mods.ctrl() || mods.meta() {
            if let Some(key) = event.key_code.and_then(key_from_key_code) {
                if !key.is_modifier() {
                    return Some(key);
                }
            }
        }

        let Some(code) = event.char_code else {
            return event.key_code.and_then(key_from_key_code);
        };

        if !mods.is_empty() {
            if let Some(key) = self.quirks.remap(code, mods) {
                return Some(key);
            }
        }

        char::from_u32(code).and_then(KeyCode::from_char)
    }

    /// The modifier set a binding must declare to match this event
    pub fn normalize_modifiers(&self, event: &KeyEvent, key: &KeyCode) -> Modifiers {
        let mods = event.modifiers;
        match (event.phase, key) {
            (EventPhase::Press, KeyCode::Char(c)) if SHIFTED_SYMBOLS.contains(*c) => {
                mods.without(Modifiers::SHIFT)
            }
            // Releasing a modifier key clears its own flag, but a binding
            // named after that key always declares it
            (EventPhase::Up, key) => match key.as_modifier() {
                Some(flag) => mods | flag,
                None => mods,
            },
            _ => mods,
        }
    }

    /// Full normalization: key, modifiers and phase
    pub fn trigger(&self, event: &KeyEvent) -> Option<Trigger> {
        let key = self.normalize(event)?;
        let mods = self.normalize_modifiers(event, &key);
        Some(Trigger::new(Combo::new(key, mods), event.phase))
    }
}

impl Default for KeyNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeyNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyNormalizer").finish_non_exhaustive()
    }
}
