//! Error types for color parsing.
//!
//! The rendering pipeline itself never fails — missing data becomes empty
//! text and malformed tokens degrade to plain runs. The only fallible public
//! surface is [`TextColor::parse`](crate::component::TextColor::parse).

/// Errors from parsing a color name or hex code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    /// The string is not a known named chat color.
    #[error("unknown color name: {0}")]
    UnknownName(String),

    /// The string is not a valid 3- or 6-digit hex color.
    #[error("invalid hex color: {0}")]
    InvalidHex(String),
}
