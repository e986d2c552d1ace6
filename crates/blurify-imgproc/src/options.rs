use serde::{Deserialize, Serialize};

use crate::error::{BlurError, ConfigurationError};
use crate::filter::{kernels, AlphaMode, FilterKind, KernelAnchor};
use crate::padding::PaddingPolicy;
use crate::parallel::ExecutionStrategy;

/// Kernel size used when the option is left at zero.
pub const DEFAULT_KERNEL_SIZE: usize = 3;

/// Gaussian sigma used when the option is left at zero.
pub const DEFAULT_SIGMA: f64 = 1.0;

/// Parameters of a blur.
///
/// A zero `kernel_size` or `sigma` means "unset" and is replaced by the defaults before
/// the options are validated.
///
/// # Examples
///
/// ```
/// use blurify_imgproc::filter::FilterKind;
/// use blurify_imgproc::options::BlurOptions;
///
/// let opts = BlurOptions::new(FilterKind::MovingAverage).with_kernel_size(5);
/// assert_eq!(opts.kernel_size, 5);
/// assert!(opts.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBlurOptions")]
pub struct BlurOptions {
    /// Side length of the kernel, must be odd.
    pub kernel_size: usize,
    /// The filter family.
    pub filter: FilterKind,
    /// Spread of the gaussian, ignored by the moving average.
    pub sigma: f64,
    /// How the image border is extended.
    pub padding: PaddingPolicy,
    /// Where the gaussian peak sits in the kernel window.
    pub anchor: KernelAnchor,
    /// Filter the alpha channel instead of forcing the output opaque.
    pub preserve_alpha: bool,
    /// How the output rows are scheduled.
    #[serde(skip_serializing)]
    pub strategy: ExecutionStrategy,
}

impl Default for BlurOptions {
    fn default() -> Self {
        Self {
            kernel_size: DEFAULT_KERNEL_SIZE,
            filter: FilterKind::default(),
            sigma: DEFAULT_SIGMA,
            padding: PaddingPolicy::default(),
            anchor: KernelAnchor::default(),
            preserve_alpha: false,
            strategy: ExecutionStrategy::default(),
        }
    }
}

impl BlurOptions {
    /// Create the default options for a filter family.
    pub fn new(filter: FilterKind) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    /// Set the kernel size.
    pub fn with_kernel_size(mut self, kernel_size: usize) -> Self {
        self.kernel_size = kernel_size;
        self
    }

    /// Set the gaussian sigma.
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Set the padding policy.
    pub fn with_padding(mut self, padding: PaddingPolicy) -> Self {
        self.padding = padding;
        self
    }

    /// Set the gaussian anchor.
    pub fn with_anchor(mut self, anchor: KernelAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Keep the alpha channel of RGBA images.
    pub fn with_preserve_alpha(mut self, preserve_alpha: bool) -> Self {
        self.preserve_alpha = preserve_alpha;
        self
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Replace the unset (zero) kernel size and sigma with their defaults.
    pub fn with_defaults(mut self) -> Self {
        if self.kernel_size == 0 {
            self.kernel_size = DEFAULT_KERNEL_SIZE;
        }
        if self.sigma == 0.0 {
            self.sigma = DEFAULT_SIGMA;
        }
        self
    }

    /// Check the options after defaults were applied.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] for an even kernel size, or a non positive sigma
    /// when the gaussian filter is selected.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        kernels::validate_kernel_size(self.kernel_size)?;
        if self.filter == FilterKind::Gaussian {
            kernels::validate_sigma(self.sigma)?;
        }
        Ok(())
    }

    /// The number of pixels the kernel reaches on each side of its center.
    pub fn half_width(&self) -> usize {
        self.kernel_size / 2
    }

    /// The alpha handling selected by `preserve_alpha`.
    pub fn alpha_mode(&self) -> AlphaMode {
        if self.preserve_alpha {
            AlphaMode::Preserve
        } else {
            AlphaMode::ForceOpaque
        }
    }

    /// Decode options from a json document.
    ///
    /// Only `filter` is required. The keys of the historical configuration
    /// (`KernelSize`, `Filter`, `Sigma`) are accepted as aliases.
    ///
    /// # Errors
    ///
    /// Returns [`BlurError::InvalidFilter`] for an unknown filter name and
    /// [`BlurError::Parse`] for a malformed document.
    ///
    /// # Examples
    ///
    /// ```
    /// use blurify_imgproc::filter::FilterKind;
    /// use blurify_imgproc::options::BlurOptions;
    ///
    /// let opts = BlurOptions::from_json(r#"{"KernelSize": 5, "Filter": "MOVING_AVG"}"#).unwrap();
    /// assert_eq!(opts.kernel_size, 5);
    /// assert_eq!(opts.filter, FilterKind::MovingAverage);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, BlurError> {
        let raw: RawBlurOptions = serde_json::from_str(json)?;
        Self::try_from(raw)
    }
}

/// The serialized form of [`BlurOptions`], with the filter still a free string.
#[derive(Debug, Deserialize)]
struct RawBlurOptions {
    #[serde(default, alias = "KernelSize")]
    kernel_size: usize,
    #[serde(alias = "Filter")]
    filter: String,
    #[serde(default, alias = "Sigma")]
    sigma: f64,
    #[serde(default)]
    padding: PaddingPolicy,
    #[serde(default)]
    anchor: KernelAnchor,
    #[serde(default)]
    preserve_alpha: bool,
}

impl TryFrom<RawBlurOptions> for BlurOptions {
    type Error = BlurError;

    fn try_from(raw: RawBlurOptions) -> Result<Self, Self::Error> {
        Ok(Self {
            kernel_size: raw.kernel_size,
            filter: raw.filter.parse()?,
            sigma: raw.sigma,
            padding: raw.padding,
            anchor: raw.anchor,
            preserve_alpha: raw.preserve_alpha,
            strategy: ExecutionStrategy::default(),
        })
    }
}
