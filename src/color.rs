// based on https://github.com/benface/bgone/blob/b362931f37252301f0f8dec183b2072f415b9b5f/src/color.rs

use anyhow::{Context, Result};
use std::fmt;
use std::str::FromStr;

/// Multiplier to expand hex color shorthand (e.g., F -> FF)
const HEX_SHORTHAND_MULTIPLIER: u8 = 17;

/// Largest legal hue, in degrees
pub const HUE_MAX: u16 = 360;

/// Largest legal saturation or lightness, in percent
pub const PERCENT_MAX: u16 = 100;

/// RGB color represented as [R, G, B] with values 0-255
pub type Color = [u8; 3];

/// Normalized RGB color with values 0.0-1.0
pub type NormalizedColor = [f64; 3];

/// HSL color represented as [H, S, L] with H in 0-360 and S, L in 0-100
pub type HslColor = [u16; 3];

/// The notation a color was typed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorFormat {
  /// Nothing parsed yet
  #[default]
  Idle,
  Hex,
  Rgb,
  Hsl,
}

impl ColorFormat {
  pub fn as_str(&self) -> &'static str {
    match self {
      ColorFormat::Idle => "IDLE",
      ColorFormat::Hex => "HEX",
      ColorFormat::Rgb => "RGB",
      ColorFormat::Hsl => "HSL",
    }
  }
}

impl fmt::Display for ColorFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ColorFormat {
  type Err = anyhow::Error;

  /// Parses a notation tag case-insensitively. `Idle` is never produced.
  fn from_str(tag: &str) -> Result<Self> {
    if tag.eq_ignore_ascii_case("hex") {
      Ok(ColorFormat::Hex)
    } else if tag.eq_ignore_ascii_case("rgb") {
      Ok(ColorFormat::Rgb)
    } else if tag.eq_ignore_ascii_case("hsl") {
      Ok(ColorFormat::Hsl)
    } else {
      anyhow::bail!("Unknown color format tag: {}", tag)
    }
  }
}

/// Parse a hex color string into RGB
/// Supports: "#ff0000", "ff0000", "#f00", "f00"
pub fn parse_hex_color(hex: &str) -> Result<Color> {
  let hex = hex.trim().trim_start_matches('#');
  if !hex.is_ascii() {
    anyhow::bail!("Hex color must be ASCII (got: {})", hex);
  }

  let (r, g, b) = match hex.len() {
    3 => {
      // Expand shorthand: "f00" -> "ff0000"
      let r = u8::from_str_radix(&hex[0..1], 16).context("Invalid red component")?;
      let g = u8::from_str_radix(&hex[1..2], 16).context("Invalid green component")?;
      let b = u8::from_str_radix(&hex[2..3], 16).context("Invalid blue component")?;
      (
        r * HEX_SHORTHAND_MULTIPLIER,
        g * HEX_SHORTHAND_MULTIPLIER,
        b * HEX_SHORTHAND_MULTIPLIER,
      )
    }
    6 => {
      let r = u8::from_str_radix(&hex[0..2], 16).context("Invalid red component")?;
      let g = u8::from_str_radix(&hex[2..4], 16).context("Invalid green component")?;
      let b = u8::from_str_radix(&hex[4..6], 16).context("Invalid blue component")?;
      (r, g, b)
    }
    _ => anyhow::bail!("Hex color must be 3 or 6 characters long (got: {})", hex),
  };

  Ok([r, g, b])
}

/// Format an RGB color as six upper-case hex digits, without the `#`
pub fn rgb_to_hex(color: Color) -> String {
  format!("{:02X}{:02X}{:02X}", color[0], color[1], color[2])
}

/// Convert a Color to NormalizedColor
pub fn normalize_color(color: Color) -> NormalizedColor {
  [
    color[0] as f64 / 255.0,
    color[1] as f64 / 255.0,
    color[2] as f64 / 255.0,
  ]
}

/// Convert a NormalizedColor back to Color
pub fn denormalize_color(color: NormalizedColor) -> Color {
  [
    (color[0] * 255.0).round().clamp(0.0, 255.0) as u8,
    (color[1] * 255.0).round().clamp(0.0, 255.0) as u8,
    (color[2] * 255.0).round().clamp(0.0, 255.0) as u8,
  ]
}

/// Convert RGB to HSL, rounding every component to an integer
pub fn rgb_to_hsl(color: Color) -> HslColor {
  let [r, g, b] = normalize_color(color);
  let min = r.min(g).min(b);
  let max = r.max(g).max(b);
  let delta = max - min;

  let mut h = if delta == 0.0 {
    0.0
  } else if r == max {
    (g - b) / delta
  } else if g == max {
    2.0 + (b - r) / delta
  } else {
    4.0 + (r - g) / delta
  };
  h = (h * 60.0).min(360.0);
  if h < 0.0 {
    h += 360.0;
  }

  let l = (min + max) / 2.0;
  let s = if delta == 0.0 {
    0.0
  } else if l <= 0.5 {
    delta / (max + min)
  } else {
    delta / (2.0 - max - min)
  };

  [
    h.round() as u16,
    (s * 100.0).round() as u16,
    (l * 100.0).round() as u16,
  ]
}

/// Convert HSL to RGB
///
/// Fails when a component is outside its legal range.
pub fn hsl_to_rgb(hsl: HslColor) -> Result<Color> {
  let [h, s, l] = hsl;
  if h > HUE_MAX || s > PERCENT_MAX || l > PERCENT_MAX {
    anyhow::bail!("HSL components out of range: {:?}", hsl);
  }

  let h = h as f64 / 360.0;
  let s = s as f64 / 100.0;
  let l = l as f64 / 100.0;

  if s == 0.0 {
    return Ok(denormalize_color([l, l, l]));
  }

  let t2 = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
  let t1 = 2.0 * l - t2;

  let mut rgb = [0.0; 3];
  for (i, channel) in rgb.iter_mut().enumerate() {
    let mut t3 = h - (i as f64 - 1.0) / 3.0;
    if t3 < 0.0 {
      t3 += 1.0;
    }
    if t3 > 1.0 {
      t3 -= 1.0;
    }

    *channel = if 6.0 * t3 < 1.0 {
      t1 + (t2 - t1) * 6.0 * t3
    } else if 2.0 * t3 < 1.0 {
      t2
    } else if 3.0 * t3 < 2.0 {
      t1 + (t2 - t1) * (2.0 / 3.0 - t3) * 6.0
    } else {
      t1
    };
  }

  Ok(denormalize_color(rgb))
}
