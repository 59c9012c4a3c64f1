use crate::color::{ColorFormat, Color, HslColor, HUE_MAX, PERCENT_MAX};
use crate::error::{ColorError, ColorResult};
use crate::notation::match_notation;
use log::debug;
use regex::{Captures, Regex};
use std::fmt;
use std::sync::LazyLock;

/// Payload shape. Groups: 2 hex-shaped, 4 rgb-shaped, 5 hsl-shaped.
static SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^\s*((([a-zA-Z0-9]{3}){1,2})|([0-9\s,;]*[^°%a-zA-Z]*)|([0-9\s,;°%]*[^a-zA-Z]*))\s*$",
  )
  .unwrap()
});

static HEX_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\s*((?:[a-fA-F0-9]{3}){1,2})\s*$").unwrap());

static RGB_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\s*([0-9]+)\s*(?:\s+|,|;)\s*([0-9]+)\s*(?:\s+|,|;)\s*([0-9]+)\s*$").unwrap()
});

static HSL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^\s*([0-9]+)\s*[°%]?\s*(?:\s+|,|;)\s*([0-9]+)\s*[°%]?\s*(?:\s+|,|;)\s*([0-9]+)\s*[°%]?\s*$",
  )
  .unwrap()
});

/// A decoded color in the notation it was typed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedColor {
  /// 3 or 6 hex digits, without `#`
  Hex(String),
  Rgb(Color),
  Hsl(HslColor),
}

impl ParsedColor {
  pub fn format(&self) -> ColorFormat {
    match self {
      ParsedColor::Hex(_) => ColorFormat::Hex,
      ParsedColor::Rgb(_) => ColorFormat::Rgb,
      ParsedColor::Hsl(_) => ColorFormat::Hsl,
    }
  }
}

impl fmt::Display for ParsedColor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ParsedColor::Hex(hex) => write!(f, "#{}", hex),
      ParsedColor::Rgb([r, g, b]) => write!(f, "rgb({}, {}, {})", r, g, b),
      ParsedColor::Hsl([h, s, l]) => write!(f, "hsl({}, {}%, {}%)", h, s, l),
    }
  }
}

/// Parse raw user text into a color
pub fn match_and_decode(raw: &str) -> ColorResult<ParsedColor> {
  let matched = match_notation(raw)?;
  let parsed = decode(&matched.inner, matched.tag)?;
  debug!("Decoded {:?} as {}", raw, parsed);
  Ok(parsed)
}

/// Decode an unwrapped payload, honouring an explicit notation tag if present
pub fn decode(inner: &str, tag: Option<ColorFormat>) -> ColorResult<ParsedColor> {
  let (format, payload) = classify(inner, tag)?;
  match format {
    ColorFormat::Hex => decode_hex(payload),
    ColorFormat::Rgb => decode_rgb(payload),
    ColorFormat::Hsl => decode_hsl(payload),
    ColorFormat::Idle => Err(no_match(inner)),
  }
}

/// Pick the notation for `inner` and return the payload text for it
fn classify(inner: &str, tag: Option<ColorFormat>) -> ColorResult<(ColorFormat, &str)> {
  let caps = SHAPE_RE.captures(inner).ok_or_else(|| no_match(inner))?;
  let hex = caps.get(2).map(|m| m.as_str());
  let rgb = caps.get(4).map(|m| m.as_str());
  let hsl = caps.get(5).map(|m| m.as_str());

  let picked = match tag {
    None | Some(ColorFormat::Idle) => hex
      .map(|p| (ColorFormat::Hex, p))
      .or_else(|| rgb.map(|p| (ColorFormat::Rgb, p)))
      .or_else(|| hsl.map(|p| (ColorFormat::Hsl, p))),
    Some(ColorFormat::Hex) => hex.map(|p| (ColorFormat::Hex, p)),
    Some(ColorFormat::Rgb) => rgb.map(|p| (ColorFormat::Rgb, p)),
    // Degree and percent markers are optional for HSL
    Some(ColorFormat::Hsl) => rgb.or(hsl).map(|p| (ColorFormat::Hsl, p)),
  };

  match (picked, tag) {
    (Some(picked), _) => Ok(picked),
    (None, Some(tag)) if tag != ColorFormat::Idle => Err(ColorError::TagShapeMismatch {
      tag,
      payload: inner.trim().to_string(),
    }),
    (None, _) => Err(no_match(inner)),
  }
}

fn decode_hex(payload: &str) -> ColorResult<ParsedColor> {
  let caps = HEX_RE.captures(payload).ok_or_else(|| no_match(payload))?;
  Ok(ParsedColor::Hex(caps[1].to_string()))
}

fn decode_rgb(payload: &str) -> ColorResult<ParsedColor> {
  let caps = RGB_RE.captures(payload).ok_or_else(|| no_match(payload))?;
  Ok(ParsedColor::Rgb([
    channel(&caps, 1, "Red", 255)? as u8,
    channel(&caps, 2, "Green", 255)? as u8,
    channel(&caps, 3, "Blue", 255)? as u8,
  ]))
}

fn decode_hsl(payload: &str) -> ColorResult<ParsedColor> {
  let caps = HSL_RE.captures(payload).ok_or_else(|| no_match(payload))?;
  Ok(ParsedColor::Hsl([
    channel(&caps, 1, "Hue", HUE_MAX)?,
    channel(&caps, 2, "Saturation", PERCENT_MAX)?,
    channel(&caps, 3, "Lightness", PERCENT_MAX)?,
  ]))
}

/// Read capture `index` as an integer within `0..=max`
fn channel(caps: &Captures, index: usize, name: &'static str, max: u16) -> ColorResult<u16> {
  let text = &caps[index];
  match text.parse::<u16>() {
    Ok(value) if value <= max => Ok(value),
    _ => Err(ColorError::OutOfRange {
      channel: name,
      value: text.to_string(),
      max,
    }),
  }
}

fn no_match(input: &str) -> ColorError {
  ColorError::NoMatch {
    input: input.trim().to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn untagged_priority_is_hex_then_rgb_then_hsl() {
    assert_eq!(decode("abc", None).unwrap(), ParsedColor::Hex("abc".into()));
    assert_eq!(decode("1, 2, 3", None).unwrap(), ParsedColor::Rgb([1, 2, 3]));
    assert_eq!(
      decode("10°, 20%, 30%", None).unwrap(),
      ParsedColor::Hsl([10, 20, 30])
    );
  }

  #[test]
  fn hsl_tag_accepts_unmarked_groups() {
    assert_eq!(
      decode("200 50 50", Some(ColorFormat::Hsl)).unwrap(),
      ParsedColor::Hsl([200, 50, 50])
    );
  }

  #[test]
  fn tag_must_match_payload_shape() {
    assert!(matches!(
      decode("10, 20%, 30%", Some(ColorFormat::Rgb)),
      Err(ColorError::TagShapeMismatch {
        tag: ColorFormat::Rgb,
        ..
      })
    ));
    assert!(matches!(
      decode("1, 2, 3", Some(ColorFormat::Hex)),
      Err(ColorError::TagShapeMismatch { .. })
    ));
    assert!(matches!(
      decode("123", Some(ColorFormat::Rgb)),
      Err(ColorError::TagShapeMismatch { .. })
    ));
  }

  #[test]
  fn hex_shaped_token_must_be_hex_digits() {
    assert!(matches!(
      decode("xyz", None),
      Err(ColorError::NoMatch { .. })
    ));
  }

  #[test]
  fn rgb_needs_exactly_three_groups() {
    assert!(matches!(
      decode("1, 2", None),
      Err(ColorError::NoMatch { .. })
    ));
    assert!(matches!(
      decode("1, 2, 3, 4", None),
      Err(ColorError::NoMatch { .. })
    ));
  }

  #[test]
  fn ranges_are_enforced() {
    assert!(matches!(
      decode("256, 0, 0", None),
      Err(ColorError::OutOfRange { channel: "Red", .. })
    ));
    assert!(matches!(
      decode("361, 0%, 0%", None),
      Err(ColorError::OutOfRange { channel: "Hue", .. })
    ));
    assert!(matches!(
      decode("0, 0%, 101%", None),
      Err(ColorError::OutOfRange {
        channel: "Lightness",
        ..
      })
    ));
    assert!(matches!(
      decode("99999999, 0, 0", None),
      Err(ColorError::OutOfRange { .. })
    ));
  }

  #[test]
  fn parsed_color_display() {
    assert_eq!(ParsedColor::Rgb([1, 2, 3]).to_string(), "rgb(1, 2, 3)");
    assert_eq!(ParsedColor::Hsl([200, 50, 40]).to_string(), "hsl(200, 50%, 40%)");
    assert_eq!(ParsedColor::Hex("FF0000".into()).to_string(), "#FF0000");
    assert_eq!(ParsedColor::Hsl([0, 0, 0]).format(), ColorFormat::Hsl);
  }
}
