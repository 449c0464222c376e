//! Mutable format buffer with token-aware keyword replacement.
//!
//! [`KeywordBuffer`] holds the working copy of a format string while the
//! resolver substitutes `%keyword` tokens into it. Two rules keep repeated
//! substitution from corrupting earlier work:
//!
//! - a replacement value is inserted verbatim and never rescanned within the
//!   same call, so substitution cannot cascade;
//! - keyword matching skips any region occupied by an encoded interactive
//!   span token, so a keyword-shaped fragment inside a span's display text
//!   is never resolved again.

use std::ops::Range;

use chatspan_markup::{CLOSE_DELIM, OPEN_DELIM};

use crate::legacy;

/// The working format string during one render.
#[derive(Debug, Clone)]
pub struct KeywordBuffer {
    text: String,
}

impl KeywordBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The current buffer contents.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether the keyword occurs outside any embedded span token.
    pub fn contains(&self, keyword: &str) -> bool {
        let tokens = token_ranges(&self.text);
        self.text
            .match_indices(keyword)
            .any(|(pos, _)| !inside(&tokens, pos))
    }

    /// Replaces every occurrence of the literal keyword outside span tokens.
    ///
    /// Single pass over the current contents; occurrences introduced by
    /// `value` itself are not matched.
    pub fn replace(&mut self, keyword: &str, value: &str) {
        if keyword.is_empty() {
            return;
        }
        let tokens = token_ranges(&self.text);
        let mut out = String::with_capacity(self.text.len());
        let mut cursor = 0;
        for (pos, matched) in self.text.match_indices(keyword) {
            if pos < cursor || inside(&tokens, pos) {
                continue;
            }
            out.push_str(&self.text[cursor..pos]);
            out.push_str(value);
            cursor = pos + matched.len();
        }
        out.push_str(&self.text[cursor..]);
        self.text = out;
    }

    /// Converts `&`-form color markers to the canonical `§`-form, once.
    ///
    /// Idempotent: calling twice yields the same contents as calling once.
    pub fn translate_color_codes(&mut self) {
        self.text = legacy::translate(&self.text);
    }
}

/// Byte ranges of embedded span tokens, delimiter to delimiter inclusive.
fn token_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut search_from = 0;
    while let Some(rel_open) = text[search_from..].find(OPEN_DELIM) {
        let open = search_from + rel_open;
        match text[open..].find(CLOSE_DELIM) {
            Some(rel_close) => {
                let close = open + rel_close + CLOSE_DELIM.len_utf8();
                ranges.push(open..close);
                search_from = close;
            }
            // Unterminated delimiter: nothing after it is a token.
            None => break,
        }
    }
    ranges
}

fn inside(ranges: &[Range<usize>], pos: usize) -> bool {
    ranges.iter().any(|r| r.contains(&pos))
}
