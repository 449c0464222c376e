//! # chatspan-render — chat-format resolution and rich-text rendering
//!
//! `chatspan-render` turns a configurable chat format string full of
//! `%keyword` placeholders into one of three rich-text representations used
//! by different presentation backends.
//!
//! ## Pipeline
//!
//! 1. [`ClickableMessage::resolve`] substitutes placeholders (template
//!    slots, channel info, timestamps, speaker info, world/server) in a
//!    strict order, embedding encoded interactive-span tokens (from
//!    [`chatspan_markup`]) where a keyword resolves to something clickable.
//! 2. The resolved buffer is parsed once into plain runs and span
//!    descriptors.
//! 3. A backend renders the parsed sequence:
//!    [`to_plain_text`](ClickableMessage::to_plain_text) for legacy-colored
//!    flat text, [`to_span_list`](ClickableMessage::to_span_list) for an
//!    ordered list of styled/interactive leaves, or
//!    [`to_component_tree`](ClickableMessage::to_component_tree) for a
//!    nested styled tree with identity substitution and color propagation.
//!
//! Each render call owns its working state; nothing persists across calls
//! and concurrent renders are fully independent.
//!
//! ## Quick start
//!
//! ```rust
//! use chatspan_render::context::{ChannelInfo, ResolutionContext, Speaker};
//! use chatspan_render::format::ClickableMessage;
//!
//! let speaker = Speaker::new("steve").display_name("Steve");
//! let channel = ChannelInfo::new("general", "§a");
//! let ctx = ResolutionContext::new().speaker(&speaker).channel(&channel);
//!
//! let mut msg = ClickableMessage::resolve("%color[%ch] %displayname: %msg", &ctx, true);
//! msg.replace("%msg", "hello");
//!
//! // Flat legacy text for console output.
//! assert_eq!(msg.to_plain_text(), "§a[general] Steve: hello");
//!
//! // Styled leaves for span-based backends; the channel and speaker
//! // leaves carry click actions.
//! let leaves = msg.to_span_list();
//! assert_eq!(leaves.len(), 5);
//! assert!(leaves[1].click.is_some());
//! ```
//!
//! ## External collaborators
//!
//! Template slots, hover wording, keyword expansion, and privilege checks
//! are host concerns, injected through the traits in [`context`]. Every
//! collaborator has a no-op default and every failure mode degrades to
//! rendering something reasonable; no error in this pipeline aborts message
//! delivery.

pub mod component;
pub mod context;
pub mod error;
pub mod format;
pub mod keyword;
pub mod legacy;

pub use component::{ClickAction, ClickEvent, Component, HoverEvent, TextColor, TextStyle};
pub use context::{ChannelInfo, PmTarget, ResolutionContext, Speaker};
pub use error::ColorParseError;
pub use format::{normal_chat_format, ClickableMessage};
pub use keyword::KeywordBuffer;

pub use chatspan_markup::{Segment, SpanToken};
