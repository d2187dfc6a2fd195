use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Error type for key combination parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyComboError {
    #[error("empty key combination")]
    Empty,
    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),
    #[error("unknown key `{0}`")]
    UnknownKey(String),
}

/// A key plus the exact set of modifiers that must be held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyCombo {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        KeyCombo { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        KeyCombo::new(code, KeyModifiers::NONE)
    }

    /// Exact match on key and modifiers.
    ///
    /// For character keys Shift is ignored: the terminal has already applied
    /// it to the reported character.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        let key = normalize_key(*key);
        let (code, mut modifiers) = match key.code {
            KeyCode::BackTab => (KeyCode::Tab, key.modifiers | KeyModifiers::SHIFT),
            code => (code, key.modifiers),
        };
        let mut wanted = self.modifiers;
        if matches!(code, KeyCode::Char(_)) {
            modifiers.remove(KeyModifiers::SHIFT);
            wanted.remove(KeyModifiers::SHIFT);
        }
        code == self.code && modifiers == wanted
    }
}

impl FromStr for KeyCombo {
    type Err = KeyComboError;

    /// Parse names like `Enter`, `ArrowUp`, `shift+Tab`, `ctrl+q`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyComboError::Empty);
        }
        // A lone "+" is the plus key, "ctrl++" is ctrl and plus
        let (mods_part, key_part) = match s.strip_suffix("++") {
            Some(rest) => (Some(rest), "+"),
            None if s == "+" => (None, "+"),
            None => match s.rsplit_once('+') {
                Some((mods, key)) => (Some(mods), key),
                None => (None, s),
            },
        };

        let mut modifiers = KeyModifiers::NONE;
        if let Some(mods) = mods_part {
            for m in mods.split('+') {
                modifiers |= match m.to_ascii_lowercase().as_str() {
                    "ctrl" | "control" | "mod" => KeyModifiers::CONTROL,
                    "shift" => KeyModifiers::SHIFT,
                    "alt" | "option" => KeyModifiers::ALT,
                    "meta" | "cmd" | "super" => KeyModifiers::SUPER,
                    other => return Err(KeyComboError::UnknownModifier(other.to_string())),
                };
            }
        }

        Ok(KeyCombo::new(parse_key_name(key_part)?, modifiers))
    }
}

fn parse_key_name(name: &str) -> Result<KeyCode, KeyComboError> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }
    let code = match name.to_ascii_lowercase().as_str() {
        "enter" | "return" => KeyCode::Enter,
        "arrowup" | "up" => KeyCode::Up,
        "arrowdown" | "down" => KeyCode::Down,
        "arrowleft" | "left" => KeyCode::Left,
        "arrowright" | "right" => KeyCode::Right,
        "escape" | "esc" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "space" => KeyCode::Char(' '),
        _ => return Err(KeyComboError::UnknownKey(name.to_string())),
    };
    Ok(code)
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            write!(f, "Ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            write!(f, "Alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            write!(f, "Shift+")?;
        }
        match self.code {
            KeyCode::Char(' ') => write!(f, "Space"),
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::Up => write!(f, "\u{2191}"),
            KeyCode::Down => write!(f, "\u{2193}"),
            KeyCode::Esc => write!(f, "Esc"),
            KeyCode::Delete => write!(f, "Del"),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Parse a binding table from key names.
///
/// # Panics
///
/// Panics on a name that does not parse; binding tables are compile-time
/// constants.
pub fn bindings<T: Copy>(table: &[(&str, T)]) -> Vec<(KeyCombo, T)> {
    table
        .iter()
        .map(|(name, value)| {
            let combo = name
                .parse()
                .unwrap_or_else(|e| panic!("bad key binding {:?}: {}", name, e));
            (combo, *value)
        })
        .collect()
}

/// First-match dispatch: the value bound to the first combination matching
/// `key`, or `None` when the key should pass through.
pub fn dispatch<'a, T>(bindings: &'a [(KeyCombo, T)], key: &KeyEvent) -> Option<&'a T> {
    bindings
        .iter()
        .find(|(combo, _)| combo.matches(key))
        .map(|(_, value)| value)
}

/// Map of shifted characters for the US layout
fn shift_symbol(c: char) -> Option<char> {
    match c {
        '`' => Some('~'),
        '1' => Some('!'),
        '2' => Some('@'),
        '3' => Some('#'),
        '4' => Some('$'),
        '5' => Some('%'),
        '6' => Some('^'),
        '7' => Some('&'),
        '8' => Some('*'),
        '9' => Some('('),
        '0' => Some(')'),
        '-' => Some('_'),
        '=' => Some('+'),
        '[' => Some('{'),
        ']' => Some('}'),
        '\\' => Some('|'),
        ';' => Some(':'),
        '\'' => Some('"'),
        ',' => Some('<'),
        '.' => Some('>'),
        '/' => Some('?'),
        _ => None,
    }
}

/// Normalize key events from terminals using the kitty keyboard protocol.
///
/// Kitty protocol sends `Char(lowercase) + SHIFT` instead of `Char(UPPERCASE) + SHIFT`,
/// and `Char(base_symbol) + SHIFT` instead of `Char(shifted_symbol)`.
pub fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
    {
        if c.is_ascii_lowercase() {
            key.code = KeyCode::Char(c.to_ascii_uppercase());
        } else if let Some(shifted) = shift_symbol(c) {
            key.code = KeyCode::Char(shifted);
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
    }
    key
}
