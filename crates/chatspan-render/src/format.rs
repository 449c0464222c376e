//! Placeholder resolution and the three rendering backends.
//!
//! [`ClickableMessage::resolve`] substitutes every `%keyword` in a format
//! string against a [`ResolutionContext`], embedding encoded span tokens
//! where a keyword resolves to something clickable. The resolved buffer can
//! then be rendered three ways:
//!
//! - [`to_plain_text`](ClickableMessage::to_plain_text) — legacy-colored
//!   flat string, interactivity discarded (console and log output);
//! - [`to_span_list`](ClickableMessage::to_span_list) — an ordered list of
//!   styled leaf components, interactive leaves carrying click and hover;
//! - [`to_component_tree`](ClickableMessage::to_component_tree) — a nested
//!   styled tree, optionally substituting a pre-built identity tree for the
//!   speaker's own name.
//!
//! Substitution order is load-bearing: later steps may introduce text that
//! looks like an earlier keyword and must not be re-resolved. The order
//! below must not be rearranged.

use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use chatspan_markup::{self as markup, Segment, SpanToken};

use crate::component::{ClickEvent, Component, HoverEvent};
use crate::context::{HoverTextSource, ResolutionContext, Speaker};
use crate::keyword::KeywordBuffer;
use crate::legacy;

fn join_command(channel: &str) -> String {
    format!("/ch join {}", channel)
}

fn tell_command(player: &str) -> String {
    format!("/tell {}", player)
}

/// Expander placeholders look like `%name%`; anything the expander left in
/// that shape is stripped to the empty string.
static UNRESOLVED_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new("%[A-Za-z0-9_-]+%").expect("placeholder pattern is valid"));

/// A fully resolved format string, ready for rendering.
///
/// Created by [`resolve`](Self::resolve) or
/// [`channel_message`](Self::channel_message); owns its working buffer and a
/// snapshot of the speaker data the tree backend needs. Nothing is shared
/// across renders.
#[derive(Debug, Clone)]
pub struct ClickableMessage {
    buffer: KeywordBuffer,
    speaker: Option<Speaker>,
    privileged: bool,
}

impl ClickableMessage {
    /// Resolves every keyword in `format` against the context.
    ///
    /// `link_wrap` controls whether speaker-name keywords become clickable
    /// spans (suggesting a tell command) or plain text.
    ///
    /// Missing values substitute empty strings; an unavailable expander
    /// falls back to the unexpanded string. This never fails.
    pub fn resolve(format: &str, ctx: &ResolutionContext, link_wrap: bool) -> Self {
        let mut buffer = KeywordBuffer::new(format);

        if let Some(channel) = ctx.channel {
            // Numbered template slots come first: the lowest-indexed slot
            // present in the buffer with a non-null value wins, once.
            for index in 0..=9u8 {
                let key = format!("%{}", index);
                if buffer.contains(&key) {
                    if let Some(value) = ctx.templates.template(index) {
                        buffer.replace(&key, &value);
                        break;
                    }
                }
            }

            let join = SpanToken::run(
                &channel.name,
                ctx.hover.channel_hover(&channel.name),
                join_command(&channel.name),
            );
            buffer.replace("%ch", &join.encode());
            buffer.replace("%color", &channel.color_code);

            if let Some(target) = &channel.pm_target {
                let tell = SpanToken::suggest(
                    &target.display_name,
                    ctx.hover.player_hover(&target.name),
                    tell_command(&target.name),
                );
                buffer.replace("%to", &tell.encode());
                buffer.replace("%recieverserver", &target.server);
            }
        }

        if buffer.contains("%date") {
            buffer.replace("%date", &Local::now().format("%Y/%m/%d").to_string());
        }
        if buffer.contains("%time") {
            buffer.replace("%time", &Local::now().format("%H:%M:%S").to_string());
        }

        if let Some(speaker) = ctx.speaker {
            if link_wrap {
                let display = SpanToken::suggest(
                    &speaker.display_name,
                    ctx.hover.player_hover(&speaker.name),
                    tell_command(&speaker.name),
                )
                .encode();
                buffer.replace("%displayname", &display);
                buffer.replace("%username", &display);

                let bare = SpanToken::suggest(
                    &speaker.name,
                    ctx.hover.player_hover(&speaker.name),
                    tell_command(&speaker.name),
                );
                buffer.replace("%player", &bare.encode());
            } else {
                buffer.replace("%displayname", &speaker.display_name);
                buffer.replace("%username", &speaker.display_name);
                buffer.replace("%player", &speaker.name);
            }

            // One containment check covers both keywords.
            if buffer.contains("%prefix") || buffer.contains("%suffix") {
                buffer.replace("%prefix", &speaker.prefix);
                buffer.replace("%suffix", &speaker.suffix);
            }

            buffer.replace("%world", &speaker.world);
            buffer.replace("%server", &speaker.server);
        }

        if let (Some(expander), Some(speaker)) = (ctx.expander, ctx.speaker) {
            if expander.available() && speaker.connected {
                match expander.expand(speaker, buffer.as_str()) {
                    Some(expanded) => {
                        let stripped = UNRESOLVED_PLACEHOLDER.replace_all(&expanded, "");
                        buffer = KeywordBuffer::new(stripped.into_owned());
                    }
                    None => {
                        debug!(speaker = %speaker.name, "keyword expander declined; keeping unexpanded format");
                    }
                }
            } else {
                debug!("keyword expander unavailable; keeping unexpanded format");
            }
        }

        let privileged = ctx
            .speaker
            .map_or(false, |s| ctx.privileges.is_privileged(s));

        Self {
            buffer,
            speaker: ctx.speaker.cloned(),
            privileged,
        }
    }

    /// Substitutes `%channel%` with a clickable join span for the channel.
    ///
    /// Hover and command use the color-stripped channel name; the display
    /// text keeps its markers.
    pub fn channel_message(
        format: &str,
        channel_name: &str,
        hover: &dyn HoverTextSource,
    ) -> Self {
        let stripped = legacy::strip_codes(channel_name);
        let token = SpanToken::run(
            channel_name,
            hover.channel_hover(&stripped),
            join_command(&stripped),
        );
        let mut buffer = KeywordBuffer::new(format);
        buffer.replace("%channel%", &token.encode());
        Self {
            buffer,
            speaker: None,
            privileged: false,
        }
    }

    /// Substitutes one more keyword after resolution (the host injects the
    /// message body this way).
    pub fn replace(&mut self, keyword: &str, value: &str) {
        self.buffer.replace(keyword, value);
    }

    /// The resolved intermediate markup.
    pub fn as_str(&self) -> &str {
        self.buffer.as_str()
    }

    /// Flattens to legacy-colored text: span tokens collapse to their
    /// display text, hover and click metadata are discarded.
    pub fn to_plain_text(&self) -> String {
        markup::flatten(self.buffer.as_str())
    }

    /// Renders an ordered list of styled leaf components.
    ///
    /// Plain runs split into one leaf per legacy style run; each span
    /// becomes one interactive leaf. A span leaf inherits the color active
    /// at the end of the previous leaf so it visually continues the
    /// surrounding run.
    pub fn to_span_list(&self) -> Vec<Component> {
        let text = legacy::translate(self.buffer.as_str());
        let mut list: Vec<Component> = Vec::new();

        for segment in markup::parse(&text) {
            match segment {
                Segment::Text(run) => list.extend(legacy::flat_runs(&run)),
                Segment::Span(token) => {
                    let mut leaf = Component::text(&token.text)
                        .with_click(ClickEvent::new(token.action, &token.command));
                    if token.has_hover() {
                        leaf.hover = Some(HoverEvent::new(&token.hover));
                    }
                    if let Some(last) = list.last() {
                        leaf.style.color = last.style.color;
                    }
                    list.push(leaf);
                }
            }
        }

        list
    }

    /// Renders a nested styled tree, substituting `identity` for spans whose
    /// display text is the speaker's own display name.
    ///
    /// For a privileged speaker the identity tree is recolored with the last
    /// explicit color marker preceding the span; only the color attribute
    /// changes. Non-privileged speakers get the tree unmodified. Spans
    /// without an identity match deserialize their display text through the
    /// legacy markers. Hover attaches only when non-empty.
    pub fn to_component_tree(&self, identity: Option<&Component>) -> Component {
        let text = legacy::translate(self.buffer.as_str());
        let mut root = Component::empty();
        // Flattened text so far, for preceding-color extraction.
        let mut preceding = String::new();

        for segment in markup::parse(&text) {
            match segment {
                Segment::Text(run) => {
                    preceding.push_str(&run);
                    root.children.push(legacy::deserialize(&run));
                }
                Segment::Span(token) => {
                    let mut node = match identity {
                        Some(tree) if self.is_own_name(&token.text) => {
                            if self.privileged {
                                match legacy::last_color(&preceding) {
                                    Some(color) => tree.recolored(color),
                                    None => tree.clone(),
                                }
                            } else {
                                tree.clone()
                            }
                        }
                        _ => legacy::deserialize(&token.text),
                    };

                    if token.has_hover() {
                        node.hover = Some(HoverEvent::new(&token.hover));
                    }
                    node.click = Some(ClickEvent::new(token.action, &token.command));

                    preceding.push_str(&token.text);
                    root.children.push(node);
                }
            }
        }

        root
    }

    fn is_own_name(&self, text: &str) -> bool {
        self.speaker
            .as_ref()
            .map_or(false, |s| s.display_name == text)
    }
}

/// Converts a format for hosts that feed it through positional formatting:
/// `%displayName`/`%username` become `%1$s` and `%msg` becomes `%2$s`
/// before any other keyword resolution, then the rest resolves without
/// link-wrapping and flattens.
pub fn normal_chat_format(format: &str, ctx: &ResolutionContext) -> String {
    let format = format
        .replace("%displayName", "%1$s")
        .replace("%username", "%1$s")
        .replace("%msg", "%2$s");
    // The channel is dropped for this pass: a template slot matching `%1`
    // would otherwise eat the `%1$s` positional token just produced.
    let ctx = ResolutionContext {
        speaker: ctx.speaker,
        channel: None,
        templates: ctx.templates,
        hover: ctx.hover,
        expander: ctx.expander,
        privileges: ctx.privileges,
    };
    ClickableMessage::resolve(&format, &ctx, false).to_plain_text()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{TextColor, TextStyle};
    use crate::context::{
        ChannelInfo, DefaultHover, KeywordExpander, PmTarget, PrivilegeSource, TemplateSource,
    };
    use chatspan_markup::ClickAction;

    struct Slots(Vec<Option<&'static str>>);

    impl TemplateSource for Slots {
        fn template(&self, index: u8) -> Option<String> {
            self.0
                .get(index as usize)
                .and_then(|slot| slot.map(str::to_string))
        }
    }

    struct AlwaysPrivileged;

    impl PrivilegeSource for AlwaysPrivileged {
        fn is_privileged(&self, _speaker: &Speaker) -> bool {
            true
        }
    }

    mod slots {
        use super::*;

        #[test]
        fn first_present_slot_with_value_wins_once() {
            let channel = ChannelInfo::new("general", "§a");
            let slots = Slots(vec![None, Some("X")]);
            let ctx = ResolutionContext::new().channel(&channel).templates(&slots);

            // Slot 0 has no value, so it stays literal; slot 1 resolves and
            // the scan stops there.
            let msg = ClickableMessage::resolve("%0 %1", &ctx, true);
            assert_eq!(msg.to_plain_text(), "%0 X");
        }

        #[test]
        fn only_one_slot_resolves_per_render() {
            let channel = ChannelInfo::new("general", "§a");
            let slots = Slots(vec![Some("A"), Some("B")]);
            let ctx = ResolutionContext::new().channel(&channel).templates(&slots);

            let msg = ClickableMessage::resolve("%0 %1", &ctx, true);
            assert_eq!(msg.to_plain_text(), "A %1");
        }

        #[test]
        fn slots_need_a_channel() {
            let slots = Slots(vec![Some("A")]);
            let ctx = ResolutionContext::new().templates(&slots);

            let msg = ClickableMessage::resolve("%0", &ctx, true);
            assert_eq!(msg.to_plain_text(), "%0");
        }
    }

    mod channel_keywords {
        use super::*;

        #[test]
        fn ch_becomes_a_run_span() {
            let channel = ChannelInfo::new("general", "§a");
            let ctx = ResolutionContext::new().channel(&channel);

            let msg = ClickableMessage::resolve("[%ch] ", &ctx, true);
            let segments = markup::parse(msg.as_str());
            let Segment::Span(token) = &segments[1] else {
                panic!("expected a span, got {:?}", segments[1]);
            };
            assert_eq!(token.action, ClickAction::RunCommand);
            assert_eq!(token.text, "general");
            assert_eq!(token.command, "/ch join general");
        }

        #[test]
        fn color_is_literal() {
            let channel = ChannelInfo::new("general", "§a");
            let ctx = ResolutionContext::new().channel(&channel);

            let msg = ClickableMessage::resolve("%color%username", &ctx, true);
            assert!(msg.as_str().starts_with("§a"));
        }

        #[test]
        fn pm_target_keywords() {
            let channel = ChannelInfo::new("tell", "§7").pm_target(
                PmTarget::new("alex").display_name("Alex").server("lobby"),
            );
            let ctx = ResolutionContext::new().channel(&channel);

            let msg = ClickableMessage::resolve("%to@%recieverserver", &ctx, true);
            assert_eq!(msg.to_plain_text(), "Alex@lobby");

            let segments = markup::parse(msg.as_str());
            let Segment::Span(token) = &segments[0] else {
                panic!("expected a span");
            };
            assert_eq!(token.action, ClickAction::SuggestCommand);
            assert_eq!(token.command, "/tell alex");
        }

        #[test]
        fn no_pm_target_leaves_keywords_untouched() {
            let channel = ChannelInfo::new("general", "§a");
            let ctx = ResolutionContext::new().channel(&channel);

            let msg = ClickableMessage::resolve("%to", &ctx, true);
            assert_eq!(msg.to_plain_text(), "%to");
        }
    }

    mod date_time {
        use super::*;

        #[test]
        fn date_is_slash_separated() {
            let ctx = ResolutionContext::new();
            let msg = ClickableMessage::resolve("%date", &ctx, true);
            let out = msg.to_plain_text();
            assert_eq!(out.len(), 10);
            assert_eq!(out.matches('/').count(), 2);
        }

        #[test]
        fn time_is_colon_separated() {
            let ctx = ResolutionContext::new();
            let msg = ClickableMessage::resolve("%time", &ctx, true);
            let out = msg.to_plain_text();
            assert_eq!(out.len(), 8);
            assert_eq!(out.matches(':').count(), 2);
        }
    }

    mod speaker_keywords {
        use super::*;

        #[test]
        fn link_wrapped_names_become_suggest_spans() {
            let speaker = Speaker::new("steve").display_name("Steve");
            let ctx = ResolutionContext::new().speaker(&speaker);

            let msg = ClickableMessage::resolve("%displayname: hi", &ctx, true);
            let segments = markup::parse(msg.as_str());
            let Segment::Span(token) = &segments[0] else {
                panic!("expected a span");
            };
            assert_eq!(token.action, ClickAction::SuggestCommand);
            assert_eq!(token.text, "Steve");
            assert_eq!(token.command, "/tell steve");
        }

        #[test]
        fn unwrapped_names_are_plain() {
            let speaker = Speaker::new("steve").display_name("Steve");
            let ctx = ResolutionContext::new().speaker(&speaker);

            let msg = ClickableMessage::resolve("%displayname/%player", &ctx, false);
            assert_eq!(msg.as_str(), "Steve/steve");
        }

        #[test]
        fn prefix_suffix_replaced_together() {
            let speaker = Speaker::new("steve").prefix("[Admin]").suffix("!");
            let ctx = ResolutionContext::new().speaker(&speaker);

            let msg = ClickableMessage::resolve("%prefix%player%suffix", &ctx, false);
            assert_eq!(msg.to_plain_text(), "[Admin]steve!");
        }

        #[test]
        fn world_and_server_are_literal() {
            let speaker = Speaker::new("steve").world("nether").server("hub");
            let ctx = ResolutionContext::new().speaker(&speaker);

            let msg = ClickableMessage::resolve("%world@%server", &ctx, false);
            assert_eq!(msg.to_plain_text(), "nether@hub");
        }

        #[test]
        fn no_speaker_leaves_keywords_untouched() {
            let ctx = ResolutionContext::new();
            let msg = ClickableMessage::resolve("%player in %world", &ctx, true);
            assert_eq!(msg.to_plain_text(), "%player in %world");
        }

        #[test]
        fn missing_values_substitute_empty() {
            let speaker = Speaker::new("steve");
            let ctx = ResolutionContext::new().speaker(&speaker);

            let msg = ClickableMessage::resolve("<%prefix%player%suffix>", &ctx, false);
            assert_eq!(msg.to_plain_text(), "<steve>");
        }
    }

    mod expansion {
        use super::*;

        struct Upper;

        impl KeywordExpander for Upper {
            fn expand(&self, _speaker: &Speaker, text: &str) -> Option<String> {
                Some(text.replace("%emote_wave%", "waves"))
            }
        }

        struct Declines;

        impl KeywordExpander for Declines {
            fn expand(&self, _speaker: &Speaker, _text: &str) -> Option<String> {
                None
            }
        }

        #[test]
        fn expander_runs_after_everything_else() {
            let speaker = Speaker::new("steve");
            let ctx = ResolutionContext::new().speaker(&speaker).expander(&Upper);

            let msg = ClickableMessage::resolve("%player %emote_wave%", &ctx, false);
            assert_eq!(msg.to_plain_text(), "steve waves");
        }

        #[test]
        fn unresolved_placeholders_are_stripped_after_expansion() {
            let speaker = Speaker::new("steve");
            let ctx = ResolutionContext::new().speaker(&speaker).expander(&Upper);

            let msg = ClickableMessage::resolve("a%unknown_token%b", &ctx, false);
            assert_eq!(msg.to_plain_text(), "ab");
        }

        #[test]
        fn declined_expansion_keeps_unexpanded_text() {
            let speaker = Speaker::new("steve");
            let ctx = ResolutionContext::new()
                .speaker(&speaker)
                .expander(&Declines);

            let msg = ClickableMessage::resolve("a%unknown_token%b", &ctx, false);
            assert_eq!(msg.to_plain_text(), "a%unknown_token%b");
        }

        #[test]
        fn disconnected_speaker_skips_expansion() {
            let speaker = Speaker::new("steve").disconnected();
            let ctx = ResolutionContext::new().speaker(&speaker).expander(&Upper);

            let msg = ClickableMessage::resolve("%emote_wave%", &ctx, false);
            assert_eq!(msg.to_plain_text(), "%emote_wave%");
        }
    }

    mod plain_backend {
        use super::*;

        #[test]
        fn token_free_template_matches_literal_substitution() {
            let speaker = Speaker::new("steve")
                .display_name("Steve")
                .world("overworld");
            let ctx = ResolutionContext::new().speaker(&speaker);

            let msg = ClickableMessage::resolve("(%world) %player:", &ctx, false);
            assert_eq!(msg.to_plain_text(), "(overworld) steve:");
        }

        #[test]
        fn color_markers_remain() {
            let channel = ChannelInfo::new("general", "§a");
            let ctx = ResolutionContext::new().channel(&channel);

            let msg = ClickableMessage::resolve("%color[%ch]", &ctx, true);
            assert_eq!(msg.to_plain_text(), "§a[general]");
        }
    }

    mod span_list_backend {
        use super::*;

        #[test]
        fn spans_inherit_previous_leaf_color() {
            let speaker = Speaker::new("steve").display_name("Steve");
            let channel = ChannelInfo::new("general", "§a");
            let ctx = ResolutionContext::new().speaker(&speaker).channel(&channel);

            let msg = ClickableMessage::resolve("%color>%displayname", &ctx, true);
            let list = msg.to_span_list();
            assert_eq!(list.len(), 2);
            assert_eq!(list[0].style.color, Some(TextColor::Green));
            // The interactive leaf continues the surrounding color run.
            assert_eq!(list[1].style.color, Some(TextColor::Green));
            assert!(list[1].click.is_some());
        }

        #[test]
        fn leading_span_keeps_no_color() {
            let speaker = Speaker::new("steve");
            let ctx = ResolutionContext::new().speaker(&speaker);

            let msg = ClickableMessage::resolve("%displayname: hi", &ctx, true);
            let list = msg.to_span_list();
            assert_eq!(list[0].style.color, None);
        }

        #[test]
        fn display_text_round_trips_through_leaves() {
            let speaker = Speaker::new("steve").display_name("Steve");
            let channel = ChannelInfo::new("general", "§a");
            let ctx = ResolutionContext::new().speaker(&speaker).channel(&channel);

            let msg = ClickableMessage::resolve("[%ch] %displayname: hi", &ctx, true);
            let joined: String = msg
                .to_span_list()
                .iter()
                .map(|leaf| leaf.text.as_str())
                .collect();
            assert_eq!(joined, msg.to_plain_text());
        }

        #[test]
        fn empty_hover_attaches_nothing() {
            struct SilentHover;

            impl HoverTextSource for SilentHover {
                fn channel_hover(&self, _channel: &str) -> String {
                    String::new()
                }
                fn player_hover(&self, _player: &str) -> String {
                    String::new()
                }
            }

            let channel = ChannelInfo::new("general", "§a");
            let ctx = ResolutionContext::new()
                .channel(&channel)
                .hover(&SilentHover);

            let msg = ClickableMessage::resolve("%ch", &ctx, true);
            let list = msg.to_span_list();
            assert!(list[0].hover.is_none());
            assert!(list[0].click.is_some());
        }

        #[test]
        fn ampersand_markers_are_translated() {
            let ctx = ResolutionContext::new();
            let msg = ClickableMessage::resolve("&chello", &ctx, true);
            let list = msg.to_span_list();
            assert_eq!(list[0].style.color, Some(TextColor::Red));
        }
    }

    mod tree_backend {
        use super::*;

        fn identity_tree() -> Component {
            let mut style = TextStyle::colored(TextColor::White);
            style.shadow = true;
            Component::text("Steve").with_style(style)
        }

        #[test]
        fn identity_substitution_preserves_decoration() {
            let speaker = Speaker::new("steve").display_name("Steve");
            let ctx = ResolutionContext::new()
                .speaker(&speaker)
                .privileges(&AlwaysPrivileged);

            let msg = ClickableMessage::resolve("§c%displayname hi", &ctx, true);
            let tree = msg.to_component_tree(Some(&identity_tree()));

            let name = &tree.children[1];
            assert_eq!(name.style.color, Some(TextColor::Red));
            assert!(name.style.shadow);
            assert!(name.click.is_some());
        }

        #[test]
        fn hex_marker_recolors_identity() {
            let speaker = Speaker::new("steve").display_name("Steve");
            let ctx = ResolutionContext::new()
                .speaker(&speaker)
                .privileges(&AlwaysPrivileged);

            let msg = ClickableMessage::resolve("§x§1§2§3§4§5§6%displayname", &ctx, true);
            let tree = msg.to_component_tree(Some(&identity_tree()));

            assert_eq!(
                tree.children[1].style.color,
                Some(TextColor::Rgb(0x12, 0x34, 0x56))
            );
        }

        #[test]
        fn unprivileged_speaker_keeps_identity_untouched() {
            let speaker = Speaker::new("steve").display_name("Steve");
            let ctx = ResolutionContext::new().speaker(&speaker);

            let msg = ClickableMessage::resolve("§c%displayname", &ctx, true);
            let tree = msg.to_component_tree(Some(&identity_tree()));

            // No recoloring at all without the capability.
            assert_eq!(tree.children[1].style.color, Some(TextColor::White));
            assert!(tree.children[1].style.shadow);
        }

        #[test]
        fn privileged_without_preceding_marker_keeps_identity_color() {
            let speaker = Speaker::new("steve").display_name("Steve");
            let ctx = ResolutionContext::new()
                .speaker(&speaker)
                .privileges(&AlwaysPrivileged);

            let msg = ClickableMessage::resolve("%displayname", &ctx, true);
            let tree = msg.to_component_tree(Some(&identity_tree()));
            assert_eq!(tree.children[0].style.color, Some(TextColor::White));
        }

        #[test]
        fn without_identity_tree_names_parse_as_legacy_text() {
            let speaker = Speaker::new("steve").display_name("§bSteve");
            let ctx = ResolutionContext::new().speaker(&speaker);

            let msg = ClickableMessage::resolve("%displayname", &ctx, true);
            let tree = msg.to_component_tree(None);

            assert_eq!(tree.children[0].text, "Steve");
            assert_eq!(tree.children[0].style.color, Some(TextColor::Aqua));
        }

        #[test]
        fn non_identity_spans_keep_their_own_text() {
            let speaker = Speaker::new("steve").display_name("Steve");
            let channel = ChannelInfo::new("general", "§a");
            let ctx = ResolutionContext::new()
                .speaker(&speaker)
                .channel(&channel)
                .privileges(&AlwaysPrivileged);

            let msg = ClickableMessage::resolve("[%ch] %displayname", &ctx, true);
            let tree = msg.to_component_tree(Some(&identity_tree()));

            // children: "[", channel span, "] ", identity
            assert_eq!(tree.children[1].text, "general");
            assert_eq!(tree.children[3].text, "Steve");
            assert!(tree.children[3].style.shadow);
        }

        #[test]
        fn tree_flattens_to_plain_text() {
            let speaker = Speaker::new("steve").display_name("Steve");
            let channel = ChannelInfo::new("general", "§a");
            let ctx = ResolutionContext::new().speaker(&speaker).channel(&channel);

            let msg = ClickableMessage::resolve("[%ch] %displayname: hi", &ctx, true);
            let tree = msg.to_component_tree(None);
            assert_eq!(tree.plain_text(), legacy::strip_codes(&msg.to_plain_text()));
        }
    }

    mod channel_messages {
        use super::*;

        #[test]
        fn channel_keyword_becomes_join_span() {
            let msg =
                ClickableMessage::channel_message("%channel% was created", "§agen§r", &DefaultHover);
            let segments = markup::parse(msg.as_str());
            let Segment::Span(token) = &segments[0] else {
                panic!("expected a span");
            };
            // Display keeps markers; hover and command use the stripped name.
            assert_eq!(token.text, "§agen§r");
            assert_eq!(token.command, "/ch join gen");
            assert!(token.hover.contains("gen"));
        }
    }

    mod normal_chat {
        use super::*;

        #[test]
        fn positional_mapping_applies_first() {
            let speaker = Speaker::new("steve").display_name("Steve");
            let ctx = ResolutionContext::new().speaker(&speaker);

            let out = normal_chat_format("%displayName says: %msg", &ctx);
            assert_eq!(out, "%1$s says: %2$s");
        }

        #[test]
        fn username_maps_to_first_position() {
            let ctx = ResolutionContext::new();
            assert_eq!(normal_chat_format("%username: %msg", &ctx), "%1$s: %2$s");
        }

        #[test]
        fn remaining_keywords_resolve_plainly() {
            let speaker = Speaker::new("steve").world("nether");
            let ctx = ResolutionContext::new().speaker(&speaker);

            let out = normal_chat_format("[%world] %displayName: %msg", &ctx);
            assert_eq!(out, "[nether] %1$s: %2$s");
        }

        #[test]
        fn channel_context_cannot_touch_positional_tokens() {
            let speaker = Speaker::new("steve").display_name("Steve");
            let channel = ChannelInfo::new("general", "§a");
            let slots = Slots(vec![None, Some("TEMPLATE")]);
            let ctx = ResolutionContext::new()
                .speaker(&speaker)
                .channel(&channel)
                .templates(&slots);

            // Slot 1 would match the `%1` inside `%1$s`, and `%ch` would
            // resolve too. Both stay inert on this path.
            let out = normal_chat_format("%ch %displayName says: %msg", &ctx);
            assert_eq!(out, "%ch %1$s says: %2$s");
        }
    }

    mod post_resolution {
        use super::*;

        #[test]
        fn host_injects_message_body() {
            let speaker = Speaker::new("steve");
            let ctx = ResolutionContext::new().speaker(&speaker);

            let mut msg = ClickableMessage::resolve("%player: %msg", &ctx, false);
            msg.replace("%msg", "hello there");
            assert_eq!(msg.to_plain_text(), "steve: hello there");
        }
    }
}
