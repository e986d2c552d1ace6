#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// blur pipeline module.
pub mod blur;

/// Error types for the blur filters.
pub mod error;

/// image filtering module.
pub mod filter;

/// blur configuration module.
pub mod options;

/// border padding module.
pub mod padding;

/// module containing parallization utilities.
pub mod parallel;

pub use crate::blur::{blur, blur_into, blur_u8};
pub use crate::error::{BlurError, ConfigurationError};
pub use crate::options::BlurOptions;
