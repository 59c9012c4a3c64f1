// Unblend per channel at alpha a: c = (fore - back + back * a) / a

use crate::color::Color;
use crate::error::ColorError;
use crate::record::ColorRecord;
use log::debug;
use nalgebra::Vector3;

/// Absorbs float error before flooring, so 29.999999999999996 floors to 30
const FLOOR_EPSILON: f64 = 1e-9;

/// Tolerances for the alpha scan
///
/// The slack bounds are empirically tuned, not derived from the compositing
/// math. They are kept as-is so results match existing users.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
  /// Lowest tolerated unblended channel value
  pub channel_min: f64,
  /// Highest tolerated unblended channel value
  pub channel_max: f64,
  /// Value `channel_min` snaps to
  pub balanced_min: f64,
  /// Value `channel_max` snaps to
  pub balanced_max: f64,
  /// Number of alpha steps; step `n` means alpha `n / alpha_steps`
  pub alpha_steps: u32,
}

impl Default for SolverConfig {
  fn default() -> Self {
    Self {
      channel_min: -1.0,
      channel_max: 256.0,
      balanced_min: 0.0,
      balanced_max: 255.0,
      alpha_steps: 100,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
  Increasing,
  Decreasing,
}

/// An accepted alpha step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanMatch {
  /// Accepted step, `1..=alpha_steps`
  pub step: u32,
  /// `step / alpha_steps`
  pub alpha: f64,
  /// Unblended color, clamped to 0-255
  pub color: Color,
  pub direction: SearchDirection,
  /// The color equals the foreground exactly
  pub exact: bool,
}

/// Closed-form result when both colors are gray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrayscaleBlend {
  pub alpha: f64,
  /// Foreground is lighter than background, so the blend is toward white
  pub fore_high: bool,
}

impl GrayscaleBlend {
  /// Channel value of the bound color, 255 or 0
  pub fn bound(&self) -> u8 {
    if self.fore_high {
      255
    } else {
      0
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlendResult {
  pub scan: Result<ScanMatch, ColorError>,
  pub grayscale: Option<GrayscaleBlend>,
}

impl BlendResult {
  pub fn success(&self) -> bool {
    self.scan.is_ok() || self.grayscale.is_some()
  }

  /// Discovered alpha, preferring the exact grayscale answer
  pub fn alpha(&self) -> Option<f64> {
    match (self.preferred_grayscale(), &self.scan) {
      (Some(gray), _) => Some(gray.alpha),
      (None, Ok(scan)) => Some(scan.alpha),
      (None, Err(_)) => None,
    }
  }

  /// Composited color, preferring the grayscale bound color
  pub fn color(&self) -> Option<Color> {
    match (self.preferred_grayscale(), &self.scan) {
      (Some(gray), _) => {
        let v = gray.bound();
        Some([v, v, v])
      }
      (None, Ok(scan)) => Some(scan.color),
      (None, Err(_)) => None,
    }
  }

  /// Grayscale answer, unless it is a zero alpha and the scan hit the
  /// foreground exactly
  fn preferred_grayscale(&self) -> Option<&GrayscaleBlend> {
    match (&self.grayscale, &self.scan) {
      (Some(gray), Ok(scan)) if gray.alpha == 0.0 && scan.exact => None,
      (gray, _) => gray.as_ref(),
    }
  }
}

pub fn solve_alpha(fore: &ColorRecord, back: &ColorRecord) -> BlendResult {
  solve_alpha_with_config(fore, back, &SolverConfig::default())
}

pub fn solve_alpha_with_config(
  fore: &ColorRecord,
  back: &ColorRecord,
  config: &SolverConfig,
) -> BlendResult {
  if !fore.is_set() || !back.is_set() {
    return BlendResult {
      scan: Err(ColorError::Unset),
      grayscale: None,
    };
  }

  let fore_rgb = fore.rgb_channels();
  let back_rgb = back.rgb_channels();

  let scan = match scan_alpha(fore_rgb, back_rgb, SearchDirection::Increasing, config) {
    Ok(found) => Ok(found),
    Err(e) => {
      debug!("Increasing alpha scan failed ({}), trying decreasing", e);
      scan_alpha(fore_rgb, back_rgb, SearchDirection::Decreasing, config)
    }
  };

  let grayscale = if fore.is_grayscale() && back.is_grayscale() {
    Some(grayscale_alpha(fore_rgb[0], back_rgb[0]))
  } else {
    None
  };

  debug!(
    "Solved {} over {}: scan {:?}, grayscale {:?}",
    fore.rgb(),
    back.rgb(),
    scan,
    grayscale
  );

  BlendResult { scan, grayscale }
}

/// Walk the alpha steps in one direction and return the first accepted step
pub fn scan_alpha(
  fore: Color,
  back: Color,
  direction: SearchDirection,
  config: &SolverConfig,
) -> Result<ScanMatch, ColorError> {
  let fore_vec = Vector3::new(fore[0] as f64, fore[1] as f64, fore[2] as f64);
  let back_vec = Vector3::new(back[0] as f64, back[1] as f64, back[2] as f64);

  let steps: Box<dyn Iterator<Item = u32>> = match direction {
    SearchDirection::Increasing => Box::new(1..=config.alpha_steps),
    SearchDirection::Decreasing => Box::new((1..=config.alpha_steps).rev()),
  };

  for step in steps {
    let alpha = step as f64 / config.alpha_steps as f64;
    let unblended = (fore_vec - back_vec + back_vec * alpha) / alpha;

    if unblended.iter().any(|c| !c.is_finite()) {
      return Err(ColorError::NonFinite { step });
    }

    let rejected = match direction {
      SearchDirection::Increasing => unblended.iter().any(|&c| c < config.channel_min),
      SearchDirection::Decreasing => unblended.iter().all(|&c| c < config.channel_max),
    };
    if rejected {
      continue;
    }

    if unblended
      .iter()
      .any(|&c| c < config.channel_min || c > config.channel_max)
    {
      continue;
    }

    let color = unblended.map(|c| snap_channel((c + FLOOR_EPSILON).floor(), config));
    let color = [color[0], color[1], color[2]];
    let exact = color == fore;

    debug!(
      "Accepted alpha step {} ({:?}): {:?}{}",
      step,
      direction,
      color,
      if exact { " (exact)" } else { "" }
    );

    return Ok(ScanMatch {
      step,
      alpha,
      color,
      direction,
      exact,
    });
  }

  Err(ColorError::NoSolution)
}

/// Closed-form alpha for two gray channels
pub fn grayscale_alpha(fore: u8, back: u8) -> GrayscaleBlend {
  let fore_high = fore > back;
  if fore == back {
    return GrayscaleBlend {
      alpha: 0.0,
      fore_high,
    };
  }

  let bound = if fore_high { 255.0 } else { 0.0 };
  let (fore, back) = (fore as f64, back as f64);
  let alpha = (fore - back) / (bound - back);

  GrayscaleBlend { alpha, fore_high }
}

/// Snap slack extremes to the legal range and clamp
fn snap_channel(value: f64, config: &SolverConfig) -> u8 {
  let value = if value == config.channel_max {
    config.balanced_max
  } else if value == config.channel_min {
    config.balanced_min
  } else {
    value
  };
  value.clamp(0.0, 255.0) as u8
}
