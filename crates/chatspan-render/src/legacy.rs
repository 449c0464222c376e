//! Legacy inline color markers.
//!
//! Chat text carries styling as inline `§` codes: `§c` switches to red,
//! `§l` turns on bold, `§r` resets, and `§x§1§2§3§4§5§6` selects the true
//! color `#123456`. Configuration files use the friendlier `&`-form, which
//! [`translate`] converts into the canonical `§`-form exactly once.
//!
//! [`flat_runs`] and [`deserialize`] turn marked-up text into styled
//! [`Component`]s: a color code starts a new run and resets decorations,
//! decoration codes accumulate onto the current run, `§r` clears everything.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::component::{Component, TextColor, TextStyle};

/// Canonical marker character.
pub const SECTION: char = '§';

/// Shorthand marker character used in configuration input.
pub const ALTERNATE: char = '&';

/// Valid code characters: colors, decorations, reset, and the hex prefix.
fn is_code_char(c: char) -> bool {
    c.is_ascii_hexdigit() || matches!(c.to_ascii_lowercase(), 'k'..='o' | 'r' | 'x')
}

/// Converts `&`-form markers into `§`-form, folding the code to lowercase.
///
/// Only `&` followed by a valid code character is converted; any other `&`
/// passes through. The output contains no convertible `&`-form markers, so
/// translating twice equals translating once.
pub fn translate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ALTERNATE {
            if let Some(&next) = chars.peek() {
                if is_code_char(next) {
                    out.push(SECTION);
                    out.push(next.to_ascii_lowercase());
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Removes every `§` + code pair, leaving the bare text.
pub fn strip_codes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == SECTION {
            if let Some(&next) = chars.peek() {
                if is_code_char(next) {
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Splits marked-up text into styled leaf components, one per style run.
///
/// Intermediate runs with no visible text are dropped, but a trailing run
/// that carries styling is kept even when empty: a bare `§a` at the end of
/// a run must still hand its color to whatever follows. Markers that are
/// not valid codes (a trailing `§`, or `§` before an unknown character)
/// stay literal.
pub fn flat_runs(text: &str) -> Vec<Component> {
    let chars: Vec<char> = text.chars().collect();
    let mut runs = Vec::new();
    let mut style = TextStyle::default();
    let mut buf = String::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == SECTION && i + 1 < chars.len() {
            let code = chars[i + 1].to_ascii_lowercase();
            if code == 'x' {
                if let Some(color) = read_hex_sequence(&chars, i) {
                    flush(&mut runs, &mut buf, style);
                    style = TextStyle::colored(color);
                    i += 14; // §x plus six §h pairs
                    continue;
                }
            } else if let Some(color) = TextColor::from_code(code) {
                flush(&mut runs, &mut buf, style);
                // A color code starts a fresh style: decorations reset.
                style = TextStyle::colored(color);
                i += 2;
                continue;
            } else if matches!(code, 'k'..='o') {
                flush(&mut runs, &mut buf, style);
                match code {
                    'k' => style.obfuscated = true,
                    'l' => style.bold = true,
                    'm' => style.strikethrough = true,
                    'n' => style.underlined = true,
                    _ => style.italic = true,
                }
                i += 2;
                continue;
            } else if code == 'r' {
                flush(&mut runs, &mut buf, style);
                style = TextStyle::default();
                i += 2;
                continue;
            }
        }
        buf.push(chars[i]);
        i += 1;
    }

    if buf.is_empty() && style != TextStyle::default() {
        runs.push(Component::text("").with_style(style));
    } else {
        flush(&mut runs, &mut buf, style);
    }
    runs
}

fn flush(runs: &mut Vec<Component>, buf: &mut String, style: TextStyle) {
    if !buf.is_empty() {
        runs.push(Component::text(std::mem::take(buf)).with_style(style));
    }
}

/// Reads a `§x§R§R§G§G§B§B` sequence starting at `start` (pointing at `§`).
fn read_hex_sequence(chars: &[char], start: usize) -> Option<TextColor> {
    if start + 14 > chars.len() {
        return None;
    }
    let mut digits = [0u8; 6];
    for (n, digit) in digits.iter_mut().enumerate() {
        let pos = start + 2 + n * 2;
        if chars[pos] != SECTION {
            return None;
        }
        *digit = chars[pos + 1].to_digit(16)? as u8;
    }
    Some(TextColor::Rgb(
        digits[0] * 16 + digits[1],
        digits[2] * 16 + digits[3],
        digits[4] * 16 + digits[5],
    ))
}

/// Deserializes marked-up text into a single component node.
///
/// A single style run collapses to a lone node; multiple runs become
/// children of an empty root so later metadata attaches to one node.
pub fn deserialize(text: &str) -> Component {
    let mut runs = flat_runs(text);
    match runs.len() {
        0 => Component::text(""),
        1 => runs.remove(0),
        _ => Component {
            children: runs,
            ..Component::default()
        },
    }
}

static COLOR_MARKER: Lazy<Regex> = Lazy::new(|| {
    // Hex sequences first so their constituent codes are not misread as
    // standalone color codes.
    Regex::new("§x(?:§[0-9a-fA-F]){6}|§([0-9a-fA-F])").expect("marker pattern is valid")
});

/// Extracts the last explicit color marker in the text, scanning left to
/// right; the final occurrence wins whether it is a single-character code or
/// a six-digit hex sequence.
pub fn last_color(text: &str) -> Option<TextColor> {
    let mut last = None;
    for caps in COLOR_MARKER.captures_iter(text) {
        last = match caps.get(1) {
            Some(code) => code.as_str().chars().next().and_then(TextColor::from_code),
            None => {
                let digits: String = caps[0]
                    .chars()
                    .filter(|c| c.is_ascii_hexdigit())
                    .collect();
                TextColor::parse(&format!("#{}", digits)).ok()
            }
        };
    }
    last
}
