#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image representation for filtering purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

/// bit-depth conversions between 8 and 16 bit images.
pub mod ops;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageOrigin, ImageSize};
