use std::{f64::consts::PI, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{BlurError, ConfigurationError};

/// The filter families a blur kernel can be generated from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterKind {
    /// Gaussian weighted average controlled by `sigma`.
    #[default]
    #[serde(rename = "GAUSSIAN")]
    Gaussian,

    /// Uniform box average over the whole window.
    #[serde(rename = "MOVING_AVG")]
    MovingAverage,
}

impl FromStr for FilterKind {
    type Err = BlurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gaussian" => Ok(FilterKind::Gaussian),
            "moving_avg" | "moving_average" | "movingaverage" | "box" => {
                Ok(FilterKind::MovingAverage)
            }
            _ => Err(BlurError::InvalidFilter(s.to_string())),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterKind::Gaussian => write!(f, "GAUSSIAN"),
            FilterKind::MovingAverage => write!(f, "MOVING_AVG"),
        }
    }
}

/// Where the gaussian is centered inside the kernel window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelAnchor {
    /// The gaussian peaks at the top-left tap and the weights are used as sampled,
    /// without normalization. This is the historical behavior of the filter.
    #[default]
    Corner,

    /// The gaussian peaks at the center tap and the weights are normalized to sum to one.
    Center,
}

/// A square convolution kernel with row-major weights.
///
/// The weighted sum of a window is divided by `divisor` before it is written out.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f64>,
    divisor: f64,
}

impl Kernel {
    /// Get the side length of the kernel.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get the number of pixels the kernel reaches on each side of its center.
    pub fn half_width(&self) -> usize {
        self.size / 2
    }

    /// Get the weights in row-major order.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Get the divisor applied after the weighted sum.
    pub fn divisor(&self) -> f64 {
        self.divisor
    }

    /// Get the weight at the given row and column.
    ///
    /// # Panics
    ///
    /// If `row` or `col` is not smaller than the kernel size.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.size && col < self.size);
        self.weights[row * self.size + col]
    }

    /// Get the sum of all the weights.
    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// Check that a kernel side length has a center tap and a representable tap count.
pub fn validate_kernel_size(kernel_size: usize) -> Result<(), ConfigurationError> {
    if kernel_size % 2 != 1 {
        return Err(ConfigurationError::EvenKernelSize(kernel_size));
    }
    if kernel_size.checked_mul(kernel_size).is_none() {
        return Err(ConfigurationError::KernelSizeTooLarge(kernel_size));
    }
    Ok(())
}

/// Check that a gaussian spread is usable.
pub fn validate_sigma(sigma: f64) -> Result<(), ConfigurationError> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(ConfigurationError::InvalidSigma(sigma));
    }
    Ok(())
}

/// Create the single tap kernel that leaves every pixel unchanged.
pub fn identity_kernel() -> Kernel {
    Kernel {
        size: 1,
        weights: vec![1.0],
        divisor: 1.0,
    }
}

/// Create a moving average (box) kernel.
///
/// # Arguments
///
/// * `kernel_size` - The side length of the kernel.
///
/// # Returns
///
/// A kernel with all weights set to one and a divisor of `kernel_size²`.
pub fn moving_average_kernel_2d(kernel_size: usize) -> Kernel {
    Kernel {
        size: kernel_size,
        weights: vec![1.0; kernel_size * kernel_size],
        divisor: (kernel_size * kernel_size) as f64,
    }
}

/// Create a gaussian blur kernel.
///
/// The weight of the tap at `(i, j)` is the 2D normal density
/// `exp(-(i² + j²) / 2σ²) / (2πσ²)`. With [`KernelAnchor::Corner`] the raw indices are used,
/// with [`KernelAnchor::Center`] the offsets from the center tap are used and the
/// weights are rescaled to sum to one.
///
/// # Arguments
///
/// * `kernel_size` - The side length of the kernel.
/// * `sigma` - The sigma of the gaussian kernel.
/// * `anchor` - Where the gaussian peak sits in the window.
pub fn gaussian_kernel_2d(kernel_size: usize, sigma: f64, anchor: KernelAnchor) -> Kernel {
    let two_sigma_sq = 2.0 * sigma * sigma;
    let scale = 1.0 / (PI * two_sigma_sq);
    let shift = match anchor {
        KernelAnchor::Corner => 0.0,
        KernelAnchor::Center => (kernel_size / 2) as f64,
    };

    let mut weights = Vec::with_capacity(kernel_size * kernel_size);
    for i in 0..kernel_size {
        let y = i as f64 - shift;
        for j in 0..kernel_size {
            let x = j as f64 - shift;
            weights.push(scale * (-(y * y + x * x) / two_sigma_sq).exp());
        }
    }

    if anchor == KernelAnchor::Center {
        let norm = weights.iter().sum::<f64>();
        weights.iter_mut().for_each(|w| *w /= norm);
    }

    Kernel {
        size: kernel_size,
        weights,
        divisor: 1.0,
    }
}

/// Generate the kernel for a filter family.
///
/// A kernel of size one is always the identity, whatever the family.
///
/// # Arguments
///
/// * `filter` - The filter family.
/// * `kernel_size` - The side length of the kernel, must be odd.
/// * `sigma` - The gaussian spread, must be positive for [`FilterKind::Gaussian`].
/// * `anchor` - Where the gaussian peak sits in the window.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] for an even kernel size or an unusable sigma.
pub fn generate(
    filter: FilterKind,
    kernel_size: usize,
    sigma: f64,
    anchor: KernelAnchor,
) -> Result<Kernel, BlurError> {
    validate_kernel_size(kernel_size)?;

    let kernel = match filter {
        FilterKind::Gaussian => {
            validate_sigma(sigma)?;
            if kernel_size == 1 {
                identity_kernel()
            } else {
                gaussian_kernel_2d(kernel_size, sigma, anchor)
            }
        }
        FilterKind::MovingAverage => moving_average_kernel_2d(kernel_size),
    };

    Ok(kernel)
}
