use blurify_image::ImageError;

use crate::parallel::ParallelError;

/// Options that can never produce a valid kernel.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigurationError {
    /// The kernel needs a center pixel, so its side must be odd.
    #[error("kernel size must be an odd number, got {0}")]
    EvenKernelSize(usize),

    /// The number of kernel taps does not fit in a `usize`.
    #[error("kernel size {0} is too large")]
    KernelSizeTooLarge(usize),

    /// The gaussian spread must be a positive finite number.
    #[error("sigma must be a positive finite number, got {0}")]
    InvalidSigma(f64),
}

/// An error type for the blur filters.
#[derive(thiserror::Error, Debug)]
pub enum BlurError {
    /// The options were rejected before any pixel was processed.
    #[error("invalid blur configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The requested filter family is not supported.
    #[error("invalid filter type: {0}")]
    InvalidFilter(String),

    /// Only RGB and RGBA images can be blurred.
    #[error("blur supports 3 or 4 channel images, got {0} channels")]
    UnsupportedChannels(usize),

    /// Error raised by the image container.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error raised while scheduling the per-row work.
    #[error(transparent)]
    Parallel(#[from] ParallelError),

    /// The options could not be decoded from json.
    #[error("failed to parse blur options: {0}")]
    Parse(#[from] serde_json::Error),
}
