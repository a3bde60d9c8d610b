//! Accelerator parsing and formatting.
//!
//! This module converts between the shortcut strings found in configuration
//! files and structured [`Accelerator`] values:
//!
//! - [`parse`]: `"<control>s"` or `"Ctrl+S"` to an accelerator
//! - [`format`]: an accelerator to its display label, `"Ctrl+S"`
//! - [`Accelerator::name`]: an accelerator to its canonical toolkit string,
//!   `"<Control>s"`
//!
//! Key codes are X11 keysym values and modifier bits follow the GDK layout,
//! so values can be handed to a toolkit accelerator map unchanged.
//!
//! # String Formats
//!
//! Toolkit style puts each modifier in angle brackets followed by the key
//! name: `"<Control>s"`, `"<Control><Shift>F5"`, `"<Primary>q"`. Modifier
//! names are case-insensitive.
//!
//! Label style joins modifiers and key with `+`: `"Ctrl+S"`, `"Alt+Shift+Tab"`.
//! It is accepted so that a formatted label parses back to the same value.
//!
//! ```
//! use tempo::accel::{self, ModifierMask};
//!
//! let save = accel::parse("<control>s").unwrap();
//! assert_eq!(save.modifier_mask, ModifierMask::CONTROL);
//! assert_eq!(accel::format(&save), "Ctrl+S");
//! assert_eq!(accel::parse("Ctrl+S").unwrap(), save);
//! ```

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

// =============================================================================
// Modifier Mask
// =============================================================================

/// Bit set of modifier keys, using the GDK bit layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModifierMask(u32);

impl ModifierMask {
    /// No modifiers.
    pub const NONE: Self = Self(0);
    /// Shift key.
    pub const SHIFT: Self = Self(1 << 0);
    /// Control key.
    pub const CONTROL: Self = Self(1 << 2);
    /// Alt key (Mod1).
    pub const ALT: Self = Self(1 << 3);
    /// Super (Windows/Command) key.
    pub const SUPER: Self = Self(1 << 26);
    /// Hyper key.
    pub const HYPER: Self = Self(1 << 27);
    /// Meta key.
    pub const META: Self = Self(1 << 28);

    /// Build a mask from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no bits are set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ModifierMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ModifierMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Modifiers in display order, with their toolkit and label names.
const MODIFIERS: [(ModifierMask, &str, &str); 6] = [
    (ModifierMask::CONTROL, "Control", "Ctrl"),
    (ModifierMask::ALT, "Alt", "Alt"),
    (ModifierMask::SHIFT, "Shift", "Shift"),
    (ModifierMask::SUPER, "Super", "Super"),
    (ModifierMask::HYPER, "Hyper", "Hyper"),
    (ModifierMask::META, "Meta", "Meta"),
];

fn toolkit_modifier(token: &str) -> Option<ModifierMask> {
    match token.to_ascii_lowercase().as_str() {
        "control" | "ctrl" | "ctl" | "primary" => Some(ModifierMask::CONTROL),
        "shift" | "shft" => Some(ModifierMask::SHIFT),
        "alt" | "mod1" => Some(ModifierMask::ALT),
        "super" => Some(ModifierMask::SUPER),
        "hyper" => Some(ModifierMask::HYPER),
        "meta" => Some(ModifierMask::META),
        _ => None,
    }
}

fn label_modifier(token: &str) -> Option<ModifierMask> {
    match token.to_ascii_lowercase().as_str() {
        "ctrl" | "control" => Some(ModifierMask::CONTROL),
        "alt" | "option" => Some(ModifierMask::ALT),
        "shift" => Some(ModifierMask::SHIFT),
        "super" | "cmd" | "command" | "win" => Some(ModifierMask::SUPER),
        "hyper" => Some(ModifierMask::HYPER),
        "meta" => Some(ModifierMask::META),
        _ => None,
    }
}

// =============================================================================
// Accelerator
// =============================================================================

/// A key chord: one key plus a set of modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Accelerator {
    /// X11 keysym of the key. Letters are stored lower-case.
    pub key_code: u32,
    /// Modifiers that must be held.
    pub modifier_mask: ModifierMask,
}

impl Accelerator {
    /// Create an accelerator from a key code and modifiers.
    pub fn new(key_code: u32, modifier_mask: ModifierMask) -> Self {
        Self {
            key_code,
            modifier_mask,
        }
    }

    /// Canonical toolkit string, e.g. `"<Control>s"`.
    pub fn name(&self) -> String {
        let mut name = String::new();
        for (mask, toolkit, _) in MODIFIERS {
            if self.modifier_mask.contains(mask) {
                name.push('<');
                name.push_str(toolkit);
                name.push('>');
            }
        }
        name.push_str(&key_name(self.key_code));
        name
    }

    /// Display label, e.g. `"Ctrl+S"`.
    pub fn label(&self) -> String {
        let mut parts: Vec<String> = MODIFIERS
            .iter()
            .filter(|(mask, _, _)| self.modifier_mask.contains(*mask))
            .map(|(_, _, label)| (*label).to_string())
            .collect();
        parts.push(key_label(self.key_code));
        parts.join("+")
    }
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Accelerator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

// =============================================================================
// Parse Errors
// =============================================================================

/// Error type for parsing shortcut strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The string is empty.
    #[error("empty shortcut")]
    Empty,
    /// A `<` modifier token has no closing `>`.
    #[error("unterminated modifier in '{0}'")]
    UnterminatedModifier(String),
    /// Unknown modifier name.
    #[error("unknown modifier: {0}")]
    UnknownModifier(String),
    /// Unknown key name.
    #[error("unknown key: {0}")]
    UnknownKey(String),
    /// Only modifiers were given.
    #[error("no key specified in '{0}'")]
    MissingKey(String),
}

// =============================================================================
// Parsing and Formatting
// =============================================================================

/// Parse a shortcut string into an accelerator.
///
/// Accepts toolkit style (`"<control>s"`) and label style (`"Ctrl+S"`).
pub fn parse(s: &str) -> Result<Accelerator, ParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParseError::Empty);
    }

    if s.starts_with('<') {
        parse_toolkit(s)
    } else {
        parse_label(s)
    }
}

/// Format an accelerator as a display label.
///
/// `format(&parse("<control>s")?)` is `"Ctrl+S"`.
pub fn format(accelerator: &Accelerator) -> String {
    accelerator.label()
}

fn parse_toolkit(s: &str) -> Result<Accelerator, ParseError> {
    let mut modifiers = ModifierMask::NONE;
    let mut rest = s;

    while let Some(token) = rest.strip_prefix('<') {
        let end = token
            .find('>')
            .ok_or_else(|| ParseError::UnterminatedModifier(s.to_string()))?;
        let name = &token[..end];
        modifiers |= toolkit_modifier(name)
            .ok_or_else(|| ParseError::UnknownModifier(name.to_string()))?;
        rest = &token[end + 1..];
    }

    let key = rest.trim();
    if key.is_empty() {
        return Err(ParseError::MissingKey(s.to_string()));
    }
    let key_code = lookup_key(key).ok_or_else(|| ParseError::UnknownKey(key.to_string()))?;

    Ok(Accelerator::new(key_code, modifiers))
}

fn parse_label(s: &str) -> Result<Accelerator, ParseError> {
    let parts: Vec<&str> = s.split('+').map(str::trim).collect();
    let (key, modifier_parts) = match parts.split_last() {
        Some((key, rest)) if !key.is_empty() => (*key, rest),
        _ => return Err(ParseError::MissingKey(s.to_string())),
    };

    let mut modifiers = ModifierMask::NONE;
    for part in modifier_parts {
        modifiers |=
            label_modifier(part).ok_or_else(|| ParseError::UnknownModifier(part.to_string()))?;
    }

    match lookup_key(key) {
        Some(key_code) => Ok(Accelerator::new(key_code, modifiers)),
        None if label_modifier(key).is_some() => Err(ParseError::MissingKey(s.to_string())),
        None => Err(ParseError::UnknownKey(key.to_string())),
    }
}

// =============================================================================
// Key Tables
// =============================================================================

/// Named keys: keysym, toolkit name, display label.
const NAMED_KEYS: &[(u32, &str, &str)] = &[
    (0x0020, "space", "Space"),
    (0x002c, "comma", ","),
    (0x002d, "minus", "-"),
    (0x002e, "period", "."),
    (0x002f, "slash", "/"),
    (0x003b, "semicolon", ";"),
    (0x003d, "equal", "="),
    (0xff08, "BackSpace", "Backspace"),
    (0xff09, "Tab", "Tab"),
    (0xff0d, "Return", "Enter"),
    (0xff13, "Pause", "Pause"),
    (0xff1b, "Escape", "Esc"),
    (0xff50, "Home", "Home"),
    (0xff51, "Left", "Left"),
    (0xff52, "Up", "Up"),
    (0xff53, "Right", "Right"),
    (0xff54, "Down", "Down"),
    (0xff55, "Page_Up", "Page Up"),
    (0xff56, "Page_Down", "Page Down"),
    (0xff57, "End", "End"),
    (0xff63, "Insert", "Insert"),
    (0xffff, "Delete", "Delete"),
];

const KEY_F1: u32 = 0xffbe;
const FUNCTION_KEYS: u32 = 12;

/// Resolve a key token (toolkit name, label or raw `0x` keysym) to a keysym.
fn lookup_key(token: &str) -> Option<u32> {
    let mut chars = token.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        if ch.is_ascii_alphanumeric() {
            return Some(ch.to_ascii_lowercase() as u32);
        }
    }

    if let Some(code) = NAMED_KEYS.iter().find_map(|(code, name, label)| {
        (name.eq_ignore_ascii_case(token) || label.eq_ignore_ascii_case(token)).then_some(*code)
    }) {
        return Some(code);
    }

    if let Some(n) = token
        .strip_prefix(|c: char| c.eq_ignore_ascii_case(&'f'))
        .and_then(|n| n.parse::<u32>().ok())
    {
        if (1..=FUNCTION_KEYS).contains(&n) {
            return Some(KEY_F1 + n - 1);
        }
    }

    token
        .strip_prefix("0x")
        .and_then(|hex| u32::from_str_radix(hex, 16).ok())
}

fn function_key(key_code: u32) -> Option<u32> {
    (KEY_F1..KEY_F1 + FUNCTION_KEYS)
        .contains(&key_code)
        .then(|| key_code - KEY_F1 + 1)
}

fn ascii_alphanumeric(key_code: u32) -> Option<char> {
    char::from_u32(key_code).filter(char::is_ascii_alphanumeric)
}

fn key_name(key_code: u32) -> String {
    if let Some(ch) = ascii_alphanumeric(key_code) {
        return ch.to_ascii_lowercase().to_string();
    }
    if let Some((_, name, _)) = NAMED_KEYS.iter().find(|(code, _, _)| *code == key_code) {
        return (*name).to_string();
    }
    match function_key(key_code) {
        Some(n) => format!("F{n}"),
        None => format!("0x{key_code:x}"),
    }
}

fn key_label(key_code: u32) -> String {
    if let Some(ch) = ascii_alphanumeric(key_code) {
        return ch.to_ascii_uppercase().to_string();
    }
    if let Some((_, _, label)) = NAMED_KEYS.iter().find(|(code, _, _)| *code == key_code) {
        return (*label).to_string();
    }
    match function_key(key_code) {
        Some(n) => format!("F{n}"),
        None => format!("0x{key_code:x}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toolkit_style() {
        let accel = parse("<control>s").unwrap();
        assert_eq!(accel.key_code, 's' as u32);
        assert_eq!(accel.modifier_mask, ModifierMask::CONTROL);

        let accel = parse("<Control><Shift>F5").unwrap();
        assert_eq!(accel.key_code, KEY_F1 + 4);
        assert_eq!(
            accel.modifier_mask,
            ModifierMask::CONTROL | ModifierMask::SHIFT
        );
    }

    #[test]
    fn test_modifier_names_are_case_insensitive() {
        let expected = parse("<control>b").unwrap();
        assert_eq!(parse("<Control>b").unwrap(), expected);
        assert_eq!(parse("<CTRL>b").unwrap(), expected);
        assert_eq!(parse("<Primary>b").unwrap(), expected);
    }

    #[test]
    fn test_letters_are_stored_lower_case() {
        assert_eq!(parse("<control>S").unwrap(), parse("<control>s").unwrap());
    }

    #[test]
    fn test_parse_label_style() {
        assert_eq!(parse("Ctrl+S").unwrap(), parse("<control>s").unwrap());
        assert_eq!(
            parse("Alt + Shift + Tab").unwrap(),
            Accelerator::new(0xff09, ModifierMask::ALT | ModifierMask::SHIFT)
        );
        assert_eq!(parse("Escape").unwrap(), Accelerator::new(0xff1b, ModifierMask::NONE));
    }

    #[test]
    fn test_format_labels() {
        assert_eq!(format(&parse("<control>s").unwrap()), "Ctrl+S");
        assert_eq!(format(&parse("<control>p").unwrap()), "Ctrl+P");
        assert_eq!(format(&parse("<shift><control>r").unwrap()), "Ctrl+Shift+R");
        assert_eq!(format(&parse("<alt>Return").unwrap()), "Alt+Enter");
        assert_eq!(format(&parse("F12").unwrap()), "F12");
        assert_eq!(format(&parse("<super>Page_Up").unwrap()), "Super+Page Up");
    }

    #[test]
    fn test_format_is_stable() {
        for s in ["<control>s", "<Control><Alt>Delete", "<meta>F1", "space", "<hyper>7"] {
            let label = format(&parse(s).unwrap());
            assert_eq!(format(&parse(&label).unwrap()), label, "unstable label for {s}");
        }
    }

    #[test]
    fn test_name_parses_back() {
        for s in ["<control>s", "<Shift><Alt>Left", "<control>0x1008ff14", "comma"] {
            let accel = parse(s).unwrap();
            assert_eq!(parse(&accel.name()).unwrap(), accel, "name {}", accel.name());
        }
        assert_eq!(parse("<control>S").unwrap().name(), "<Control>s");
    }

    #[test]
    fn test_unknown_modifier() {
        assert_eq!(
            parse("<bogus>s"),
            Err(ParseError::UnknownModifier("bogus".to_string()))
        );
        assert_eq!(
            parse("Hyperdrive+S"),
            Err(ParseError::UnknownModifier("Hyperdrive".to_string()))
        );
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            parse("<control>nope"),
            Err(ParseError::UnknownKey("nope".to_string()))
        );
        assert_eq!(parse("F13"), Err(ParseError::UnknownKey("F13".to_string())));
    }

    #[test]
    fn test_malformed_strings() {
        assert_eq!(parse("   "), Err(ParseError::Empty));
        assert!(matches!(
            parse("<control"),
            Err(ParseError::UnterminatedModifier(_))
        ));
        assert!(matches!(parse("<control>"), Err(ParseError::MissingKey(_))));
        assert!(matches!(parse("Ctrl+"), Err(ParseError::MissingKey(_))));
        assert!(matches!(parse("Ctrl"), Err(ParseError::MissingKey(_))));
    }

    #[test]
    fn test_display_and_from_str() {
        let accel: Accelerator = "<control>r".parse().unwrap();
        assert_eq!(accel.to_string(), "Ctrl+R");
    }
}
