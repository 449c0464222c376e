//! Styled-text component model.
//!
//! A [`Component`] is a node in a rich-text tree: display text, a style
//! (color plus decoration flags), optional click and hover metadata, and an
//! ordered list of child nodes that inherit decoration from their parent in
//! the presentation layer.
//!
//! Components serialize to the JSON chat-component shape via serde, with
//! unset fields omitted:
//!
//! ```rust
//! use chatspan_render::component::{Component, TextColor};
//!
//! let node = Component::text("hello").with_color(TextColor::Red);
//! assert_eq!(
//!     node.to_json(),
//!     serde_json::json!({"text": "hello", "color": "red"})
//! );
//! ```

use serde::{Serialize, Serializer};

use crate::error::ColorParseError;

pub use chatspan_markup::ClickAction;

/// A chat text color: one of the sixteen named colors or a true-color RGB
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
    Rgb(u8, u8, u8),
}

impl TextColor {
    /// Resolves a single-character legacy color code (`0`–`9`, `a`–`f`).
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_lowercase() {
            '0' => Some(TextColor::Black),
            '1' => Some(TextColor::DarkBlue),
            '2' => Some(TextColor::DarkGreen),
            '3' => Some(TextColor::DarkAqua),
            '4' => Some(TextColor::DarkRed),
            '5' => Some(TextColor::DarkPurple),
            '6' => Some(TextColor::Gold),
            '7' => Some(TextColor::Gray),
            '8' => Some(TextColor::DarkGray),
            '9' => Some(TextColor::Blue),
            'a' => Some(TextColor::Green),
            'b' => Some(TextColor::Aqua),
            'c' => Some(TextColor::Red),
            'd' => Some(TextColor::LightPurple),
            'e' => Some(TextColor::Yellow),
            'f' => Some(TextColor::White),
            _ => None,
        }
    }

    /// Parses a color from a name (`red`, `dark_blue`, …) or a hex code
    /// (`#rgb` or `#rrggbb`).
    pub fn parse(s: &str) -> Result<Self, ColorParseError> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        match s {
            "black" => Ok(TextColor::Black),
            "dark_blue" => Ok(TextColor::DarkBlue),
            "dark_green" => Ok(TextColor::DarkGreen),
            "dark_aqua" => Ok(TextColor::DarkAqua),
            "dark_red" => Ok(TextColor::DarkRed),
            "dark_purple" => Ok(TextColor::DarkPurple),
            "gold" => Ok(TextColor::Gold),
            "gray" => Ok(TextColor::Gray),
            "dark_gray" => Ok(TextColor::DarkGray),
            "blue" => Ok(TextColor::Blue),
            "green" => Ok(TextColor::Green),
            "aqua" => Ok(TextColor::Aqua),
            "red" => Ok(TextColor::Red),
            "light_purple" => Ok(TextColor::LightPurple),
            "yellow" => Ok(TextColor::Yellow),
            "white" => Ok(TextColor::White),
            other => Err(ColorParseError::UnknownName(other.to_string())),
        }
    }

    fn parse_hex(hex: &str) -> Result<Self, ColorParseError> {
        let invalid = || ColorParseError::InvalidHex(format!("#{}", hex));
        match hex.len() {
            // 3-digit shorthand: #rgb -> #rrggbb
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).map_err(|_| invalid())? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).map_err(|_| invalid())? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).map_err(|_| invalid())? * 17;
                Ok(TextColor::Rgb(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| invalid())?;
                let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| invalid())?;
                let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| invalid())?;
                Ok(TextColor::Rgb(r, g, b))
            }
            _ => Err(invalid()),
        }
    }

    /// The canonical name for named colors, `None` for RGB values.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            TextColor::Black => Some("black"),
            TextColor::DarkBlue => Some("dark_blue"),
            TextColor::DarkGreen => Some("dark_green"),
            TextColor::DarkAqua => Some("dark_aqua"),
            TextColor::DarkRed => Some("dark_red"),
            TextColor::DarkPurple => Some("dark_purple"),
            TextColor::Gold => Some("gold"),
            TextColor::Gray => Some("gray"),
            TextColor::DarkGray => Some("dark_gray"),
            TextColor::Blue => Some("blue"),
            TextColor::Green => Some("green"),
            TextColor::Aqua => Some("aqua"),
            TextColor::Red => Some("red"),
            TextColor::LightPurple => Some("light_purple"),
            TextColor::Yellow => Some("yellow"),
            TextColor::White => Some("white"),
            TextColor::Rgb(..) => None,
        }
    }

    /// The RGB value of the color.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            TextColor::Black => (0x00, 0x00, 0x00),
            TextColor::DarkBlue => (0x00, 0x00, 0xaa),
            TextColor::DarkGreen => (0x00, 0xaa, 0x00),
            TextColor::DarkAqua => (0x00, 0xaa, 0xaa),
            TextColor::DarkRed => (0xaa, 0x00, 0x00),
            TextColor::DarkPurple => (0xaa, 0x00, 0xaa),
            TextColor::Gold => (0xff, 0xaa, 0x00),
            TextColor::Gray => (0xaa, 0xaa, 0xaa),
            TextColor::DarkGray => (0x55, 0x55, 0x55),
            TextColor::Blue => (0x55, 0x55, 0xff),
            TextColor::Green => (0x55, 0xff, 0x55),
            TextColor::Aqua => (0x55, 0xff, 0xff),
            TextColor::Red => (0xff, 0x55, 0x55),
            TextColor::LightPurple => (0xff, 0x55, 0xff),
            TextColor::Yellow => (0xff, 0xff, 0x55),
            TextColor::White => (0xff, 0xff, 0xff),
            TextColor::Rgb(r, g, b) => (*r, *g, *b),
        }
    }

    /// The `#rrggbb` form of the color.
    pub fn hex_string(&self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl Serialize for TextColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.name() {
            Some(name) => serializer.serialize_str(name),
            None => serializer.serialize_str(&self.hex_string()),
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Color and decoration flags for one component.
///
/// The default style carries no color and no decorations; absent attributes
/// are inherited from the enclosing node by the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<TextColor>,
    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub underlined: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub obfuscated: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub shadow: bool,
}

impl TextStyle {
    /// A style carrying only a color.
    pub fn colored(color: TextColor) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }
}

/// A click action attached to a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClickEvent {
    pub action: ClickAction,
    #[serde(rename = "value")]
    pub command: String,
}

impl ClickEvent {
    pub fn new(action: ClickAction, command: impl Into<String>) -> Self {
        Self {
            action,
            command: command.into(),
        }
    }
}

/// Hover text attached to a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoverEvent {
    #[serde(rename = "contents")]
    pub text: String,
}

impl HoverEvent {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A node in a styled-text tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Component {
    pub text: String,
    #[serde(flatten)]
    pub style: TextStyle,
    #[serde(rename = "clickEvent", skip_serializing_if = "Option::is_none")]
    pub click: Option<ClickEvent>,
    #[serde(rename = "hoverEvent", skip_serializing_if = "Option::is_none")]
    pub hover: Option<HoverEvent>,
    #[serde(rename = "extra", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Component>,
}

impl Component {
    /// A node with the given display text and an empty style.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// An empty node, used as a tree root holding only children.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sets the node's color.
    pub fn with_color(mut self, color: TextColor) -> Self {
        self.style.color = Some(color);
        self
    }

    /// Sets the node's full style.
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// Attaches a click action.
    pub fn with_click(mut self, click: ClickEvent) -> Self {
        self.click = Some(click);
        self
    }

    /// Attaches hover text.
    pub fn with_hover(mut self, hover: HoverEvent) -> Self {
        self.hover = Some(hover);
        self
    }

    /// Appends a child node.
    pub fn with_child(mut self, child: Component) -> Self {
        self.children.push(child);
        self
    }

    /// Returns a copy of this tree with the color of every node overwritten.
    ///
    /// Only the color attribute changes; decorations (shadow, bold, …),
    /// click/hover metadata, and the tree shape are preserved.
    pub fn recolored(&self, color: TextColor) -> Component {
        let mut node = self.clone();
        node.recolor_in_place(color);
        node
    }

    fn recolor_in_place(&mut self, color: TextColor) {
        self.style.color = Some(color);
        for child in &mut self.children {
            child.recolor_in_place(color);
        }
    }

    /// Depth-first concatenation of all display text in the tree.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Serializes the component tree into the JSON chat-component shape.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
