use crate::color::ColorFormat;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorError {
  /// Empty or whitespace-only input
  #[error("Color input is empty")]
  Blank,

  /// Input matches none of the recognised notations
  #[error("Unrecognized color notation: {input:?}")]
  NoMatch { input: String },

  /// An explicit tag names a notation the payload is not shaped like
  #[error("Tag {tag} does not match payload {payload:?}")]
  TagShapeMismatch { tag: ColorFormat, payload: String },

  /// A numeric channel is outside its notation's legal range
  #[error("{channel} value {value} is out of range (0-{max})")]
  OutOfRange {
    channel: &'static str,
    value: String,
    max: u16,
  },

  /// A derived channel became NaN or infinite while unblending
  #[error("Non-finite channel value at alpha step {step}")]
  NonFinite { step: u32 },

  /// Both scan directions were exhausted
  #[error("No alpha value reproduces the foreground color")]
  NoSolution,

  /// The solver was given a record that holds no parsed color
  #[error("Both foreground and background colors must be set")]
  Unset,
}

pub type ColorResult<T> = Result<T, ColorError>;
