//! Resolution context: who is speaking, where, and which collaborators
//! supply the externally owned pieces of a render.
//!
//! The core borrows a [`ResolutionContext`] for exactly one render call and
//! never retains it. External concerns — template slots, hover wording,
//! keyword expansion, privilege checks — come in as trait objects with
//! no-op defaults, so a bare context still renders something reasonable.
//!
//! # Example
//!
//! ```rust
//! use chatspan_render::context::{ChannelInfo, ResolutionContext, Speaker};
//!
//! let speaker = Speaker::new("steve").display_name("§fSteve");
//! let channel = ChannelInfo::new("general", "§a");
//! let ctx = ResolutionContext::new()
//!     .speaker(&speaker)
//!     .channel(&channel);
//! # let _ = ctx;
//! ```

/// The speaker of one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Speaker {
    pub name: String,
    pub display_name: String,
    pub prefix: String,
    pub suffix: String,
    pub world: String,
    pub server: String,
    /// Whether the speaker is a live, connected identity. Keyword expansion
    /// only runs for connected speakers.
    pub connected: bool,
}

impl Speaker {
    /// A connected speaker whose display name defaults to the bare name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            prefix: String::new(),
            suffix: String::new(),
            world: String::new(),
            server: String::new(),
            connected: true,
        }
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn world(mut self, world: impl Into<String>) -> Self {
        self.world = world.into();
        self
    }

    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    pub fn disconnected(mut self) -> Self {
        self.connected = false;
        self
    }
}

/// The target of a private-message channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PmTarget {
    pub name: String,
    pub display_name: String,
    pub server: String,
}

impl PmTarget {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            server: String::new(),
        }
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }
}

/// The channel a message is rendered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub name: String,
    /// Legacy color code inserted for `%color`, e.g. `"§a"`.
    pub color_code: String,
    pub pm_target: Option<PmTarget>,
}

impl ChannelInfo {
    pub fn new(name: impl Into<String>, color_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color_code: color_code.into(),
            pm_target: None,
        }
    }

    pub fn pm_target(mut self, target: PmTarget) -> Self {
        self.pm_target = Some(target);
        self
    }
}

/// Supplies the numbered template slots `%0`–`%9`.
pub trait TemplateSource {
    fn template(&self, index: u8) -> Option<String>;
}

/// A template source with every slot empty.
pub struct NoTemplates;

impl TemplateSource for NoTemplates {
    fn template(&self, _index: u8) -> Option<String> {
        None
    }
}

/// Supplies the hover wording for channel and player names.
///
/// The wording is owned by the host (localization lives there); this trait
/// is a pure string function.
pub trait HoverTextSource {
    fn channel_hover(&self, channel: &str) -> String;
    fn player_hover(&self, player: &str) -> String;
}

/// Plain English hover wording.
pub struct DefaultHover;

impl HoverTextSource for DefaultHover {
    fn channel_hover(&self, channel: &str) -> String {
        format!("Click to join {}", channel)
    }

    fn player_hover(&self, player: &str) -> String {
        format!("Click to message {}", player)
    }
}

/// An optional external keyword-expansion service.
///
/// Returning `None` from [`expand`](Self::expand) means the service declined
/// or failed; the resolver falls back to the unexpanded string.
pub trait KeywordExpander {
    /// Whether the service is currently usable.
    fn available(&self) -> bool {
        true
    }

    fn expand(&self, speaker: &Speaker, text: &str) -> Option<String>;
}

/// An expander that never expands anything.
pub struct NoExpansion;

impl KeywordExpander for NoExpansion {
    fn available(&self) -> bool {
        false
    }

    fn expand(&self, _speaker: &Speaker, _text: &str) -> Option<String> {
        None
    }
}

/// Decides whether a speaker holds the elevated-styling capability.
///
/// The capability names behind this are environment-specific permission
/// strings, so the predicate is injected rather than hard-coded.
pub trait PrivilegeSource {
    fn is_privileged(&self, speaker: &Speaker) -> bool;
}

/// A privilege source that grants nothing.
pub struct NoPrivileges;

impl PrivilegeSource for NoPrivileges {
    fn is_privileged(&self, _speaker: &Speaker) -> bool {
        false
    }
}

/// Everything one render call may consult, borrowed for its duration.
pub struct ResolutionContext<'a> {
    pub(crate) speaker: Option<&'a Speaker>,
    pub(crate) channel: Option<&'a ChannelInfo>,
    pub(crate) templates: &'a dyn TemplateSource,
    pub(crate) hover: &'a dyn HoverTextSource,
    pub(crate) expander: Option<&'a dyn KeywordExpander>,
    pub(crate) privileges: &'a dyn PrivilegeSource,
}

impl<'a> ResolutionContext<'a> {
    /// A context with no speaker, no channel, and no-op collaborators.
    pub fn new() -> Self {
        Self {
            speaker: None,
            channel: None,
            templates: &NoTemplates,
            hover: &DefaultHover,
            expander: None,
            privileges: &NoPrivileges,
        }
    }

    pub fn speaker(mut self, speaker: &'a Speaker) -> Self {
        self.speaker = Some(speaker);
        self
    }

    pub fn channel(mut self, channel: &'a ChannelInfo) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn templates(mut self, templates: &'a dyn TemplateSource) -> Self {
        self.templates = templates;
        self
    }

    pub fn hover(mut self, hover: &'a dyn HoverTextSource) -> Self {
        self.hover = hover;
        self
    }

    pub fn expander(mut self, expander: &'a dyn KeywordExpander) -> Self {
        self.expander = Some(expander);
        self
    }

    pub fn privileges(mut self, privileges: &'a dyn PrivilegeSource) -> Self {
        self.privileges = privileges;
        self
    }
}

impl Default for ResolutionContext<'_> {
    fn default() -> Self {
        Self::new()
    }
}
