use crate::color::Color;
use crate::decode::match_and_decode;
use crate::record::ColorRecord;
use crate::solver::solve_alpha as solve;
use napi::bindgen_prelude::*;
use napi_derive::napi;

#[napi(object)]
pub struct RgbColor {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

#[napi(object)]
pub struct HslColor {
  pub h: u16,
  pub s: u16,
  pub l: u16,
}

#[napi(object)]
pub struct ColorInfo {
  /// The notation the input was typed in: "HEX", "RGB" or "HSL"
  pub format: String,
  /// "#RRGGBB"
  pub hex: String,
  /// "rgb(r, g, b)"
  pub rgb: String,
  /// "hsl(h, s%, l%)"
  pub hsl: String,
  pub channels: RgbColor,
  pub hsl_channels: HslColor,
  /// Whether all three RGB channels are equal
  pub is_grayscale: bool,
}

#[napi(object)]
pub struct GrayscaleInfo {
  /// Exact alpha (0.0-1.0) over pure white or pure black
  pub alpha: f64,
  /// True when the blend is toward white, false when toward black
  pub fore_high: bool,
  /// "#AAFFFFFF" or "#AA000000"
  pub hex: String,
  /// "rgba(255, 255, 255, a)" or "rgba(0, 0, 0, a)"
  pub rgba: String,
  /// "hsla(0, 0%, 100%, a)" or "hsla(0, 0%, 0%, a)"
  pub hsla: String,
}

#[napi(object)]
pub struct BlendInfo {
  /// Whether the scan or the grayscale shortcut found an alpha
  pub success: bool,
  /// Discovered alpha (0.0-1.0), the grayscale answer when there is one
  pub alpha: Option<f64>,
  /// Alpha step found by the scan (1-100)
  pub alpha_step: Option<u32>,
  /// The composited color at that alpha
  pub color: Option<RgbColor>,
  /// "#AARRGGBB" of the scan color
  pub hex: Option<String>,
  /// "rgba(r, g, b, a)" of the scan color
  pub rgba: Option<String>,
  /// "hsla(h, s%, l%, a)" of the scan color
  pub hsla: Option<String>,
  /// Whether the composited color equals the foreground exactly
  pub exact: bool,
  /// Set only when both colors are gray
  pub grayscale: Option<GrayscaleInfo>,
  /// Why the scan failed, if it did
  pub error: Option<String>,
}

#[napi]
/// Install the logger. Repeated calls are ignored.
///
/// # Arguments
/// * `filter` - An env_logger filter such as "debug"; defaults to `RUST_LOG`
pub fn init_logger(filter: Option<String>) {
  let mut builder = env_logger::Builder::from_default_env();
  if let Some(filter) = filter {
    builder.parse_filters(&filter);
  }
  let _ = builder.try_init();
}

#[napi]
/// Parse a color typed as HEX, RGB or HSL
///
/// Supports formats like: "#f00", "FF0000", "rgb(255, 0, 0)", "[255;0;0]",
/// "hsl 200, 50%, 50%", "{200 50 50}"
///
/// # Arguments
/// * `input` - The color text
///
/// # Returns
/// The color in all three notations
pub fn parse_color(input: String) -> Result<ColorInfo> {
  let mut record = ColorRecord::new();
  record
    .set_from_text(&input)
    .map_err(|e| Error::new(Status::InvalidArg, format!("Invalid color: {}", e)))?;
  Ok(color_info(&record))
}

#[napi]
/// Detect which notation a color was typed in
///
/// # Returns
/// "HEX", "RGB" or "HSL"
pub fn detect_format(input: String) -> Result<String> {
  let parsed = match_and_decode(&input)
    .map_err(|e| Error::new(Status::InvalidArg, format!("Invalid color: {}", e)))?;
  Ok(parsed.format().to_string())
}

#[napi]
/// Find the alpha at which the background color reproduces the foreground color
///
/// # Arguments
/// * `fore` - The observed foreground color text
/// * `back` - The background color text
///
/// # Returns
/// The discovered alpha and composited color, plus the exact grayscale
/// answer when both colors are gray
pub fn solve_alpha(fore: String, back: String) -> Result<BlendInfo> {
  let mut fore_record = ColorRecord::new();
  fore_record.set_from_text(&fore).map_err(|e| {
    Error::new(
      Status::InvalidArg,
      format!("Invalid foreground color: {}", e),
    )
  })?;

  let mut back_record = ColorRecord::new();
  back_record.set_from_text(&back).map_err(|e| {
    Error::new(
      Status::InvalidArg,
      format!("Invalid background color: {}", e),
    )
  })?;

  let result = solve(&fore_record, &back_record);
  let out = ColorRecord::from_blend(&result);
  let scan = result.scan.as_ref().ok();

  Ok(BlendInfo {
    success: result.success(),
    alpha: result.alpha(),
    alpha_step: scan.map(|s| s.step),
    color: result.color().map(rgb_color),
    hex: scan.map(|_| out.hex_with_alpha()),
    rgba: scan.map(|_| out.rgba()),
    hsla: scan.map(|_| out.hsla()),
    exact: scan.is_some_and(|s| s.exact),
    grayscale: result.grayscale.map(|gray| GrayscaleInfo {
      alpha: gray.alpha,
      fore_high: gray.fore_high,
      hex: out.hex_with_grayscale().unwrap_or_default(),
      rgba: out.rgba_with_grayscale().unwrap_or_default(),
      hsla: out.hsla_with_grayscale().unwrap_or_default(),
    }),
    error: result.scan.as_ref().err().map(|e| e.to_string()),
  })
}

fn rgb_color(color: Color) -> RgbColor {
  RgbColor {
    r: color[0],
    g: color[1],
    b: color[2],
  }
}

fn color_info(record: &ColorRecord) -> ColorInfo {
  let [h, s, l] = record.hsl_channels();
  ColorInfo {
    format: record.format().to_string(),
    hex: record.hex(),
    rgb: record.rgb(),
    hsl: record.hsl(),
    channels: rgb_color(record.rgb_channels()),
    hsl_channels: HslColor { h, s, l },
    is_grayscale: record.is_grayscale(),
  }
}
