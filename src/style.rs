//! Terminal styling utilities
//!
//! One palette for all CLI output:
//! - Semantic colors for status (green/yellow/red)
//! - Cyan for headers and technical values
//! - A true-color swatch standing in for the page's preview border

use crossterm::style::{Color, StyledContent, Stylize, style};
use std::fmt;

use crate::color::DisplayColor;
use crate::status::Status;

/// Role a piece of text plays in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Header,
    Success,
    Error,
    Warning,
    Technical,
}

impl Tone {
    fn paint<D: fmt::Display>(self, text: D) -> StyledContent<D> {
        let color = match self {
            Self::Header | Self::Technical => Color::Cyan,
            Self::Success => Color::Green,
            Self::Error => Color::Red,
            Self::Warning => Color::Yellow,
        };
        let styled = style(text).with(color);
        if self == Self::Header {
            styled.bold()
        } else {
            styled
        }
    }
}

/// Extension trait for consistent Sezanlight styling
///
/// # Examples
///
/// ```
/// use sezanlight::style::SezanlightStyle;
///
/// println!("{}", "Controller".header());
/// println!("{}", "success".success());
/// println!("{}", "clr_range".technical());
/// ```
pub trait SezanlightStyle: fmt::Display + Sized {
    /// Section headers
    fn header(self) -> StyledContent<Self> {
        Tone::Header.paint(self)
    }

    fn success(self) -> StyledContent<Self> {
        Tone::Success.paint(self)
    }

    /// Error messages and status codes
    fn error(self) -> StyledContent<Self> {
        Tone::Error.paint(self)
    }

    /// Values that were dropped or could not be loaded
    fn warning(self) -> StyledContent<Self> {
        Tone::Warning.paint(self)
    }

    /// URLs, setting names, device values
    fn technical(self) -> StyledContent<Self> {
        Tone::Technical.paint(self)
    }
}

impl<T: fmt::Display> SezanlightStyle for T {}

/// Solid block in the given display color; channels outside 0-255 render as 0
#[must_use]
pub fn swatch(color: DisplayColor) -> StyledContent<&'static str> {
    let channel = |v: i64| u8::try_from(v).unwrap_or(0);
    "      ".on(Color::Rgb {
        r: channel(color.r),
        g: channel(color.g),
        b: channel(color.b),
    })
}

/// Status line as printed by the CLI
#[must_use]
pub fn status_line(status: &Status) -> String {
    match status {
        Status::Idle => "(cleared)".dim().to_string(),
        Status::Success => status.success().to_string(),
        Status::Message(_) => status.error().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::style::Attribute;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_is_bold_cyan() {
        let header = "Controller".header();
        assert_eq!(header.style().foreground_color, Some(Color::Cyan));
        assert!(header.style().attributes.has(Attribute::Bold));

        let value = "clr_range".technical();
        assert_eq!(value.style().foreground_color, Some(Color::Cyan));
        assert!(!value.style().attributes.has(Attribute::Bold));
    }

    #[test]
    fn test_status_colors() {
        assert_eq!(Status::Success.success().style().foreground_color, Some(Color::Green));
        assert_eq!(
            Status::Message("400".into()).error().style().foreground_color,
            Some(Color::Red)
        );
        assert_eq!(*Status::Success.success().content(), Status::Success);
    }

    #[test]
    fn test_swatch_zeroes_out_of_range_channels() {
        let block = swatch(DisplayColor::new(300, 10, -1));
        assert_eq!(
            block.style().background_color,
            Some(Color::Rgb { r: 0, g: 10, b: 0 })
        );
    }
}
