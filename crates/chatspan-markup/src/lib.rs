//! Interactive-span token grammar for chat message formatting.
//!
//! This crate defines the escaped pseudo-markup used to embed clickable and
//! hoverable spans inside an otherwise plain format string, plus the parser
//! that recovers them. A token looks like:
//!
//! ```text
//! ＜type=RUN_COMMAND text="general" hover="Click to join" command="/ch join general"＞
//! ```
//!
//! The delimiters are the fullwidth angle brackets U+FF1C / U+FF1E, which do
//! not occur in ordinary chat input, so a token embedded in a working buffer
//! survives further literal string operations and can be decoded later with
//! a single non-overlapping pattern.
//!
//! # Example
//!
//! ```rust
//! use chatspan_markup::{parse, ClickAction, Segment, SpanToken};
//!
//! let token = SpanToken::run("general", "Click to join", "/ch join general");
//! let buffer = format!("[{}] hello", token.encode());
//!
//! let segments = parse(&buffer);
//! assert_eq!(segments.len(), 3);
//! assert!(matches!(&segments[0], Segment::Text(t) if t == "["));
//! assert!(matches!(&segments[1], Segment::Span(s) if s.action == ClickAction::RunCommand));
//! assert!(matches!(&segments[2], Segment::Text(t) if t == "] hello"));
//! ```
//!
//! # Grammar
//!
//! Exactly four fields, always in this order: `type`, `text`, `hover`,
//! `command`. Field values are quoted with `"` and may be empty; an empty
//! `hover` means "no hover payload". Tokens do not nest and span contents
//! are never re-scanned. Anything that fails the pattern is not a token and
//! stays part of the surrounding text run.

use once_cell::sync::Lazy;
use regex::Regex;

/// Opening token delimiter (fullwidth less-than, U+FF1C).
pub const OPEN_DELIM: char = '＜';

/// Closing token delimiter (fullwidth greater-than, U+FF1E).
pub const CLOSE_DELIM: char = '＞';

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        "＜type=(SUGGEST_COMMAND|RUN_COMMAND) \
         text=\"([^\"]*)\" hover=\"([^\"]*)\" command=\"([^\"]*)\"＞",
    )
    .expect("token pattern is valid")
});

/// What clicking a rendered span does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ClickAction {
    /// Execute the command immediately on click.
    RunCommand,
    /// Pre-fill the recipient's chat input with the command.
    SuggestCommand,
}

impl ClickAction {
    fn keyword(self) -> &'static str {
        match self {
            ClickAction::RunCommand => "RUN_COMMAND",
            ClickAction::SuggestCommand => "SUGGEST_COMMAND",
        }
    }

    fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "RUN_COMMAND" => Some(ClickAction::RunCommand),
            "SUGGEST_COMMAND" => Some(ClickAction::SuggestCommand),
            _ => None,
        }
    }
}

/// A decoded interactive span: display text plus click/hover metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanToken {
    /// Click behavior for the span.
    pub action: ClickAction,
    /// Text shown in place of the token.
    pub text: String,
    /// Hover text; empty means no hover payload.
    pub hover: String,
    /// Command carried by the click action.
    pub command: String,
}

impl SpanToken {
    /// Creates a token whose click runs a command immediately.
    pub fn run(
        text: impl Into<String>,
        hover: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self::new(ClickAction::RunCommand, text, hover, command)
    }

    /// Creates a token whose click suggests a command to the recipient.
    pub fn suggest(
        text: impl Into<String>,
        hover: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self::new(ClickAction::SuggestCommand, text, hover, command)
    }

    fn new(
        action: ClickAction,
        text: impl Into<String>,
        hover: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            action,
            text: sanitize(&text.into()),
            hover: sanitize(&hover.into()),
            command: sanitize(&command.into()),
        }
    }

    /// Whether the span carries a hover payload.
    pub fn has_hover(&self) -> bool {
        !self.hover.is_empty()
    }

    /// Encodes the token into its embeddable string form.
    ///
    /// Field values were sanitized at construction, so the result always
    /// matches the token pattern and round-trips through [`parse`].
    pub fn encode(&self) -> String {
        format!(
            "＜type={} text=\"{}\" hover=\"{}\" command=\"{}\"＞",
            self.action.keyword(),
            self.text,
            self.hover,
            self.command
        )
    }
}

/// Removes characters that would break the token grammar.
///
/// Double quotes end a field early and the fullwidth delimiters would open
/// or close a token mid-field; neither can be escaped in the grammar, so
/// both are dropped from field values.
fn sanitize(value: &str) -> String {
    if !value.contains(['"', OPEN_DELIM, CLOSE_DELIM]) {
        return value.to_string();
    }
    value
        .chars()
        .filter(|c| *c != '"' && *c != OPEN_DELIM && *c != CLOSE_DELIM)
        .collect()
}

/// One piece of a parsed buffer, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A run of ordinary text (may contain legacy color markers).
    Text(String),
    /// A decoded interactive span.
    Span(SpanToken),
}

impl Segment {
    /// The text this segment contributes to a flattened rendering.
    pub fn display_text(&self) -> &str {
        match self {
            Segment::Text(text) => text,
            Segment::Span(token) => &token.text,
        }
    }
}

/// Splits a resolved buffer into text runs and interactive spans.
///
/// One forward scan, leftmost-first, non-overlapping. Text between matches
/// becomes a [`Segment::Text`] (empty runs are omitted); trailing text after
/// the last match becomes a final run. Malformed tokens simply fail the
/// pattern and remain inside the surrounding text run.
pub fn parse(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last_end = 0;

    for caps in TOKEN_PATTERN.captures_iter(input) {
        let whole = caps.get(0).expect("group 0 always present");
        if whole.start() > last_end {
            segments.push(Segment::Text(input[last_end..whole.start()].to_string()));
        }

        // The pattern only admits the two known action keywords.
        let action = ClickAction::from_keyword(&caps[1]).expect("pattern restricts action");
        segments.push(Segment::Span(SpanToken {
            action,
            text: caps[2].to_string(),
            hover: caps[3].to_string(),
            command: caps[4].to_string(),
        }));

        last_end = whole.end();
    }

    if last_end < input.len() {
        segments.push(Segment::Text(input[last_end..].to_string()));
    }

    segments
}

/// Collapses every token in the buffer to its display text.
pub fn flatten(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for segment in parse(input) {
        out.push_str(segment.display_text());
    }
    out
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    // Ordinary chat text: printable ASCII, never the reserved delimiters.
    fn chat_text() -> impl Strategy<Value = String> {
        "[ -~]{0,40}".prop_filter("no delimiters", |s| {
            !s.contains(OPEN_DELIM) && !s.contains(CLOSE_DELIM)
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn plain_text_is_single_run(text in chat_text()) {
            prop_assume!(!text.is_empty());
            prop_assert_eq!(parse(&text), vec![Segment::Text(text)]);
        }

        #[test]
        fn encode_parse_roundtrip(
            text in chat_text(),
            hover in chat_text(),
            command in chat_text(),
            suggest in proptest::bool::ANY,
        ) {
            let token = if suggest {
                SpanToken::suggest(text, hover, command)
            } else {
                SpanToken::run(text, hover, command)
            };
            prop_assert_eq!(parse(&token.encode()), vec![Segment::Span(token)]);
        }

        #[test]
        fn flatten_reproduces_surrounding_text(
            before in chat_text(),
            display in chat_text(),
            after in chat_text(),
        ) {
            let token = SpanToken::run(display, "", "/cmd");
            let buffer = format!("{}{}{}", before, token.encode(), after);
            prop_assert_eq!(
                flatten(&buffer),
                format!("{}{}{}", before, token.text, after)
            );
        }
    }
}
