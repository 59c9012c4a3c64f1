use crate::color::{
  hsl_to_rgb, parse_hex_color, rgb_to_hex, rgb_to_hsl, Color, ColorFormat, HslColor,
};
use crate::decode::{match_and_decode, ParsedColor};
use crate::error::ColorResult;
use crate::solver::{BlendResult, GrayscaleBlend};
use log::warn;

const DEFAULT_HEX: &str = "000000";

/// One color slot (foreground, background or result) in all three notations
///
/// The three notations are always derived from the one most recently set, so
/// they stay consistent with each other.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRecord {
  hex: String,
  rgb: Color,
  hsl: HslColor,
  format: ColorFormat,
  is_set: bool,
  /// Opacity of this color, 1.0 unless produced by the alpha solver
  alpha: f64,
  grayscale: Option<GrayscaleBlend>,
}

impl Default for ColorRecord {
  fn default() -> Self {
    Self {
      hex: DEFAULT_HEX.to_string(),
      rgb: [0, 0, 0],
      hsl: [0, 0, 0],
      format: ColorFormat::Idle,
      is_set: false,
      alpha: 1.0,
      grayscale: None,
    }
  }
}

impl ColorRecord {
  pub fn new() -> Self {
    Self::default()
  }

  /// Restore black defaults and clear the set flag
  pub fn reset(&mut self) {
    *self = Self::default();
  }

  /// Reset, then parse `raw` into this record
  ///
  /// On failure the record stays at its defaults.
  pub fn set_from_text(&mut self, raw: &str) -> ColorResult<()> {
    self.reset();
    let parsed = match_and_decode(raw)?;
    self.set_from(&parsed);
    Ok(())
  }

  /// Store a decoded color and derive the other two notations from it
  pub fn set_from(&mut self, parsed: &ParsedColor) {
    self.reset();

    match parsed {
      ParsedColor::Hex(hex) => match parse_hex_color(hex) {
        Ok(rgb) => {
          self.hex = rgb_to_hex(rgb);
          self.rgb = rgb;
          self.hsl = rgb_to_hsl(rgb);
        }
        Err(e) => {
          warn!("Failed to convert hex {:?}: {:#}", hex, e);
          self.hex = hex.to_ascii_uppercase();
        }
      },
      ParsedColor::Rgb(rgb) => {
        self.rgb = *rgb;
        self.hex = rgb_to_hex(*rgb);
        self.hsl = rgb_to_hsl(*rgb);
      }
      ParsedColor::Hsl(hsl) => {
        self.hsl = *hsl;
        match hsl_to_rgb(*hsl) {
          Ok(rgb) => {
            self.rgb = rgb;
            self.hex = rgb_to_hex(rgb);
          }
          Err(e) => warn!("Failed to convert hsl {:?}: {:#}", hsl, e),
        }
      }
    }

    self.format = parsed.format();
    self.is_set = true;
  }

  /// Build the result slot from a solver outcome
  ///
  /// Holds the scan's composited color at the discovered alpha, and the
  /// grayscale data when the shortcut applied. Only a scan color sets the
  /// record; grayscale-only results are read through `grayscale()`.
  pub fn from_blend(result: &BlendResult) -> Self {
    let mut record = Self::default();
    if let Ok(scan) = &result.scan {
      record.set_from(&ParsedColor::Rgb(scan.color));
      record.alpha = scan.alpha;
    }
    record.grayscale = result.grayscale;
    record
  }

  pub fn is_set(&self) -> bool {
    self.is_set
  }

  /// Notation the record was last set from, `Idle` when unset
  pub fn format(&self) -> ColorFormat {
    self.format
  }

  pub fn rgb_channels(&self) -> Color {
    self.rgb
  }

  pub fn hsl_channels(&self) -> HslColor {
    self.hsl
  }

  pub fn alpha(&self) -> f64 {
    self.alpha
  }

  pub fn grayscale(&self) -> Option<GrayscaleBlend> {
    self.grayscale
  }

  pub fn is_grayscale(&self) -> bool {
    self.rgb[0] == self.rgb[1] && self.rgb[0] == self.rgb[2]
  }

  /// `#RRGGBB`
  pub fn hex(&self) -> String {
    format!("#{}", self.hex)
  }

  /// `rgb(r, g, b)`
  pub fn rgb(&self) -> String {
    let [r, g, b] = self.rgb;
    format!("rgb({}, {}, {})", r, g, b)
  }

  /// `hsl(h, s%, l%)`
  pub fn hsl(&self) -> String {
    let [h, s, l] = self.hsl;
    format!("hsl({}, {}%, {}%)", h, s, l)
  }

  /// `#AARRGGBB`, alpha byte first
  pub fn hex_with_alpha(&self) -> String {
    format!("#{:02X}{}", alpha_byte(self.alpha), self.hex)
  }

  /// `rgba(r, g, b, a)`
  pub fn rgba(&self) -> String {
    let [r, g, b] = self.rgb;
    format!("rgba({}, {}, {}, {})", r, g, b, round2(self.alpha))
  }

  /// `hsla(h, s%, l%, a)`
  pub fn hsla(&self) -> String {
    let [h, s, l] = self.hsl;
    format!("hsla({}, {}%, {}%, {})", h, s, l, round2(self.alpha))
  }

  /// `#AAFFFFFF` or `#AA000000`, depending on which bound the grayscale blend uses
  pub fn hex_with_grayscale(&self) -> Option<String> {
    self.grayscale.map(|gray| {
      format!(
        "#{:02X}{}",
        alpha_byte(gray.alpha),
        if gray.fore_high { "FFFFFF" } else { "000000" }
      )
    })
  }

  /// `rgba(255, 255, 255, a)` or `rgba(0, 0, 0, a)`
  pub fn rgba_with_grayscale(&self) -> Option<String> {
    self.grayscale.map(|gray| {
      let v = gray.bound();
      format!("rgba({}, {}, {}, {})", v, v, v, round2(gray.alpha))
    })
  }

  /// `hsla(0, 0%, 100%, a)` or `hsla(0, 0%, 0%, a)`
  pub fn hsla_with_grayscale(&self) -> Option<String> {
    self.grayscale.map(|gray| {
      let lightness = if gray.fore_high { 100 } else { 0 };
      format!("hsla(0, 0%, {}%, {})", lightness, round2(gray.alpha))
    })
  }
}

fn alpha_byte(alpha: f64) -> u8 {
  (alpha * 255.0).round().clamp(0.0, 255.0) as u8
}

fn round2(value: f64) -> f64 {
  (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ColorError;

  #[test]
  fn defaults_are_black_and_unset() {
    let record = ColorRecord::new();
    assert!(!record.is_set());
    assert_eq!(record.hex(), "#000000");
    assert_eq!(record.rgb(), "rgb(0, 0, 0)");
    assert_eq!(record.hsl(), "hsl(0, 0%, 0%)");
    assert_eq!(record.format(), ColorFormat::Idle);
  }

  #[test]
  fn rgb_derives_hex_and_hsl() {
    let mut record = ColorRecord::new();
    record.set_from(&ParsedColor::Rgb([255, 0, 0]));
    assert!(record.is_set());
    assert_eq!(record.format(), ColorFormat::Rgb);
    assert_eq!(record.hex(), "#FF0000");
    assert_eq!(record.hsl(), "hsl(0, 100%, 50%)");
  }

  #[test]
  fn shorthand_hex_expands() {
    let mut record = ColorRecord::new();
    record.set_from(&ParsedColor::Hex("f0a".into()));
    assert_eq!(record.hex(), "#FF00AA");
    assert_eq!(record.rgb_channels(), [255, 0, 170]);
  }

  #[test]
  fn hsl_derives_rgb() {
    let mut record = ColorRecord::new();
    record.set_from(&ParsedColor::Hsl([200, 50, 50]));
    assert_eq!(record.rgb(), "rgb(64, 149, 191)");
    assert_eq!(record.hex(), "#4095BF");
    assert_eq!(record.hsl_channels(), [200, 50, 50]);
  }

  #[test]
  fn hex_round_trips_through_rgb() {
    for rgb in [[0, 0, 0], [18, 52, 86], [255, 128, 1], [200, 200, 200]] {
      let mut record = ColorRecord::new();
      record.set_from(&ParsedColor::Rgb(rgb));
      assert_eq!(parse_hex_color(&record.hex()).unwrap(), rgb);
    }
  }

  #[test]
  fn failed_parse_leaves_defaults() {
    let mut record = ColorRecord::new();
    record.set_from_text("rgb(10, 20, 30)").unwrap();
    assert!(record.is_set());

    let err = record.set_from_text("rgb(256, 0, 0)").unwrap_err();
    assert!(matches!(err, ColorError::OutOfRange { .. }));
    assert_eq!(record, ColorRecord::default());
  }

  #[test]
  fn grayscale_predicate() {
    let mut record = ColorRecord::new();
    record.set_from(&ParsedColor::Rgb([7, 7, 7]));
    assert!(record.is_grayscale());
    record.set_from(&ParsedColor::Rgb([7, 7, 8]));
    assert!(!record.is_grayscale());
  }

  #[test]
  fn alpha_strings() {
    let mut record = ColorRecord::new();
    record.set_from(&ParsedColor::Rgb([255, 0, 0]));
    record.alpha = 0.5;
    assert_eq!(record.hex_with_alpha(), "#80FF0000");
    assert_eq!(record.rgba(), "rgba(255, 0, 0, 0.5)");
    assert_eq!(record.hsla(), "hsla(0, 100%, 50%, 0.5)");
    assert_eq!(record.hex_with_grayscale(), None);
  }

  #[test]
  fn grayscale_strings() {
    let mut record = ColorRecord::new();
    record.grayscale = Some(GrayscaleBlend {
      alpha: 100.0 / 155.0,
      fore_high: true,
    });
    assert_eq!(record.hex_with_grayscale().unwrap(), "#A5FFFFFF");
    assert_eq!(
      record.rgba_with_grayscale().unwrap(),
      "rgba(255, 255, 255, 0.65)"
    );
    assert_eq!(
      record.hsla_with_grayscale().unwrap(),
      "hsla(0, 0%, 100%, 0.65)"
    );

    record.grayscale = Some(GrayscaleBlend {
      alpha: 0.75,
      fore_high: false,
    });
    assert_eq!(record.hsla_with_grayscale().unwrap(), "hsla(0, 0%, 0%, 0.75)");
    assert_eq!(ColorRecord::new().hsla_with_grayscale(), None);
  }

  #[test]
  fn grayscale_only_blend_stays_unset() {
    let result = BlendResult {
      scan: Err(ColorError::NoSolution),
      grayscale: Some(GrayscaleBlend {
        alpha: 0.5,
        fore_high: true,
      }),
    };
    let record = ColorRecord::from_blend(&result);
    assert!(!record.is_set());
    assert_eq!(record.rgb(), "rgb(0, 0, 0)");
    assert_eq!(record.grayscale().unwrap().alpha, 0.5);
    assert_eq!(record.hex_with_grayscale().unwrap(), "#80FFFFFF");
  }
}
