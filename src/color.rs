//! Color encoding
//!
//! Converts between the user-facing 0-255 RGB scale (display domain) and the
//! controller's native intensity scale `[0, clr_range]` (device domain).
//!
//! Both directions truncate toward zero. The controller has always received
//! truncated values, so rounding to nearest would change the wire output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound of the display domain
pub const DISPLAY_MAX: i64 = 255;

/// Color as typed by the user, 0-255 per channel.
///
/// Channels are kept raw: out-of-range input is only clamped when encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayColor {
    pub r: i64,
    pub g: i64,
    pub b: i64,
}

/// Color in the controller's native range, as sent to `/color/set/` and
/// returned by `/color/get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceColor {
    pub r: u32,
    pub g: u32,
    pub b: u32,
}

impl DisplayColor {
    #[must_use]
    pub const fn new(r: i64, g: i64, b: i64) -> Self {
        Self { r, g, b }
    }

    /// Build a color from the raw text of the three input fields.
    #[must_use]
    pub fn from_fields(r: &str, g: &str, b: &str) -> Self {
        Self::new(parse_channel(r), parse_channel(g), parse_channel(b))
    }
}

impl fmt::Display for DeviceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r={} g={} b={}", self.r, self.g, self.b)
    }
}

/// Parse a channel field the way the form always has: take the leading
/// integer (`"12abc"` is 12, `"3.7"` is 3) and fall back to 0 when there is
/// none.
#[must_use]
pub fn parse_channel(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first().copied() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    // Saturate absurdly long inputs instead of failing; they clamp anyway.
    let value = digits[..end]
        .bytes()
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')));

    if negative { -value } else { value }
}

fn channel_to_device(display: i64, clr_range: u32) -> u32 {
    if display <= 0 || clr_range == 0 {
        return 0;
    }
    let range = u128::from(clr_range);
    let scaled = display.unsigned_abs() as u128 * range / DISPLAY_MAX as u128;
    scaled.min(range) as u32
}

fn channel_to_display(device: u32, clr_range: u32) -> i64 {
    if clr_range == 0 {
        return 0;
    }
    let scaled = u64::from(device) * DISPLAY_MAX as u64 / u64::from(clr_range);
    (scaled as i64).min(DISPLAY_MAX)
}

/// Scale a display color into `[0, clr_range]`, clamping and truncating
/// each channel.
#[must_use]
pub fn to_device(display: DisplayColor, clr_range: u32) -> DeviceColor {
    DeviceColor {
        r: channel_to_device(display.r, clr_range),
        g: channel_to_device(display.g, clr_range),
        b: channel_to_device(display.b, clr_range),
    }
}

/// Inverse of [`to_device`], used when showing what the controller reports.
#[must_use]
pub fn to_display(device: DeviceColor, clr_range: u32) -> DisplayColor {
    DisplayColor {
        r: channel_to_display(device.r, clr_range),
        g: channel_to_display(device.g, clr_range),
        b: channel_to_display(device.b, clr_range),
    }
}

/// CSS color for the preview border. No range conversion; channels outside
/// 0-255 render as 0.
#[must_use]
pub fn preview_css(display: DisplayColor) -> String {
    let channel = |v: i64| if (0..=DISPLAY_MAX).contains(&v) { v } else { 0 };
    format!(
        "rgb({},{},{})",
        channel(display.r),
        channel(display.g),
        channel(display.b)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("128", 128 ; "plain")]
    #[test_case("  42", 42 ; "leading whitespace")]
    #[test_case("12abc", 12 ; "trailing garbage")]
    #[test_case("3.7", 3 ; "decimal truncated")]
    #[test_case("-5", -5 ; "negative")]
    #[test_case("+7", 7 ; "explicit plus")]
    #[test_case("", 0 ; "empty")]
    #[test_case("abc", 0 ; "non numeric")]
    #[test_case("-", 0 ; "lone sign")]
    fn test_parse_channel(raw: &str, expected: i64) {
        assert_eq!(parse_channel(raw), expected);
    }

    #[test]
    fn test_to_device_boundaries() {
        for range in [1, 20, 255, 1023, 20000] {
            let device = to_device(DisplayColor::new(0, 255, 0), range);
            assert_eq!(device, DeviceColor { r: 0, g: range, b: 0 });
        }
    }

    #[test]
    fn test_to_device_truncates() {
        // 128 * 20000 / 255 = 10039.2...
        let device = to_device(DisplayColor::new(128, 1, 254), 20000);
        assert_eq!(device, DeviceColor { r: 10039, g: 78, b: 19921 });

        // 1 * 1023 / 255 = 4.01..., 254 * 1023 / 255 = 1018.98...
        let device = to_device(DisplayColor::new(1, 254, 127), 1023);
        assert_eq!(device, DeviceColor { r: 4, g: 1018, b: 509 });
    }

    #[test]
    fn test_to_device_clamps_out_of_range_input() {
        let device = to_device(DisplayColor::new(-40, 300, i64::MAX), 1023);
        assert_eq!(device, DeviceColor { r: 0, g: 1023, b: 1023 });
    }

    #[test]
    fn test_to_device_stays_in_range_and_is_monotonic() {
        for range in [1, 7, 255, 1000, 1023, 20000] {
            let mut previous = 0;
            for x in -10..=300 {
                let device = to_device(DisplayColor::new(x, x, x), range);
                assert!(device.r <= range, "channel above range {range} for {x}");
                assert!(device.r >= previous, "not monotonic at {x} (range {range})");
                previous = device.r;
            }
        }
    }

    #[test]
    fn test_non_numeric_fields_encode_as_zero() {
        let from_text = DisplayColor::from_fields("", "abc", "0");
        assert_eq!(from_text, DisplayColor::new(0, 0, 0));
        assert_eq!(to_device(from_text, 1023), DeviceColor::default());
    }

    #[test]
    fn test_to_display_inverse() {
        let display = to_display(DeviceColor { r: 1023, g: 0, b: 512 }, 1023);
        assert_eq!(display, DisplayColor::new(255, 0, 127));
    }

    #[test]
    fn test_to_display_clamps_values_above_range() {
        // Controller still holds a value from a wider range
        let display = to_display(DeviceColor { r: 20000, g: 0, b: 0 }, 1023);
        assert_eq!(display.r, 255);
    }

    #[test]
    fn test_preview_css() {
        assert_eq!(preview_css(DisplayColor::new(255, 128, 0)), "rgb(255,128,0)");
        assert_eq!(preview_css(DisplayColor::new(-1, 256, 10)), "rgb(0,0,10)");
    }

    #[test]
    fn test_device_color_json() {
        let color: DeviceColor = serde_json::from_str(r#"{"r":1023,"g":0,"b":12}"#).unwrap();
        assert_eq!(color, DeviceColor { r: 1023, g: 0, b: 12 });
    }
}
