#![deny(clippy::all)]

pub mod color;
pub mod decode;
pub mod error;
pub mod notation;
pub mod record;
pub mod solver;

#[cfg(not(test))]
mod binding;


pub use crate::color::ColorFormat;
pub use crate::decode::{match_and_decode, ParsedColor};
pub use crate::error::{ColorError, ColorResult};
pub use crate::record::ColorRecord;
pub use crate::solver::{solve_alpha, BlendResult, SolverConfig};
