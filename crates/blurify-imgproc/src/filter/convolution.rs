use blurify_image::ImageError;

use super::kernels::Kernel;
use crate::padding::PaddedImage;

/// The largest value a 16 bit channel can hold.
pub const CHANNEL_MAX: u16 = u16::MAX;

/// What happens to the alpha channel of RGBA images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlphaMode {
    /// Output alpha is fully opaque and the source alpha is ignored.
    #[default]
    ForceOpaque,

    /// Alpha is filtered with the same weighted sum as the color channels.
    Preserve,
}

/// The window of pixels a kernel is applied to.
///
/// The buffer is allocated once and refilled for every output pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighborhood<const C: usize> {
    size: usize,
    pixels: Vec<[u16; C]>,
}

impl<const C: usize> Neighborhood<C> {
    /// Create a zeroed `size × size` window.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            pixels: vec![[0; C]; size * size],
        }
    }

    /// Create a window from row-major pixels.
    ///
    /// # Errors
    ///
    /// If the number of pixels is not `size²`, an error is returned.
    pub fn from_pixels(size: usize, pixels: Vec<[u16; C]>) -> Result<Self, ImageError> {
        if pixels.len() != size * size {
            return Err(ImageError::InvalidChannelShape(
                pixels.len() * C,
                size * size * C,
            ));
        }
        Ok(Self { size, pixels })
    }

    /// Get the side length of the window.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get the pixels in row-major order.
    pub fn pixels(&self) -> &[[u16; C]] {
        &self.pixels
    }

    /// Fill the window of the source pixel `(x, y)` from the padded image.
    ///
    /// The window covers padded columns `x..=x + 2p` and rows `y..=y + 2p`, which is
    /// centered on the source pixel since the source is shifted by `p`.
    pub fn gather(&mut self, padded: &PaddedImage<C>, x: usize, y: usize) {
        let size = self.size;
        for (dy, row) in self.pixels.chunks_exact_mut(size).enumerate() {
            for (dx, pixel) in row.iter_mut().enumerate() {
                *pixel = padded.sample(x + dx, y + dy);
            }
        }
    }
}

/// Reduce a window to one pixel through a kernel.
///
/// Each product is truncated before it is accumulated, the sum is divided by the kernel
/// divisor, truncated again and saturated to [`CHANNEL_MAX`].
///
/// # Arguments
///
/// * `neighborhood` - The window, same size as the kernel.
/// * `kernel` - The weights and divisor.
/// * `alpha` - How the fourth channel is produced when `C == 4`.
///
/// PRECONDITION: `neighborhood.size() == kernel.size()`.
pub fn convolve<const C: usize>(
    neighborhood: &Neighborhood<C>,
    kernel: &Kernel,
    alpha: AlphaMode,
) -> [u16; C] {
    debug_assert_eq!(neighborhood.size(), kernel.size());

    let filtered = match alpha {
        AlphaMode::Preserve => C,
        AlphaMode::ForceOpaque => C.min(3),
    };

    let mut sum = [0u64; C];
    for (pixel, &weight) in neighborhood.pixels().iter().zip(kernel.weights()) {
        for ch in 0..filtered {
            sum[ch] += (f64::from(pixel[ch]) * weight) as u64;
        }
    }

    let mut out = [CHANNEL_MAX; C];
    for ch in 0..filtered {
        let value = (sum[ch] as f64 / kernel.divisor()) as u64;
        out[ch] = value.min(CHANNEL_MAX as u64) as u16;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::kernels::{
        gaussian_kernel_2d, identity_kernel, moving_average_kernel_2d, KernelAnchor,
    };
    use crate::padding::{pad, PaddingPolicy};
    use blurify_image::Image;

    #[test]
    fn test_convolve_moving_average() -> Result<(), ImageError> {
        let kernel = moving_average_kernel_2d(3);

        #[rustfmt::skip]
        let neighborhood = Neighborhood::from_pixels(3, vec![
            [9, 0, 900, 1], [9, 0, 900, 1], [9, 0, 900, 1],
            [9, 0, 900, 1], [9, 10, 900, 1], [9, 0, 900, 1],
            [9, 0, 900, 1], [9, 0, 900, 1], [0, 0, 0, 1],
        ])?;

        // 72 / 9, 10 / 9, 7200 / 9
        assert_eq!(
            convolve(&neighborhood, &kernel, AlphaMode::ForceOpaque),
            [8, 1, 800, CHANNEL_MAX]
        );
        assert_eq!(
            convolve(&neighborhood, &kernel, AlphaMode::Preserve),
            [8, 1, 800, 1]
        );

        Ok(())
    }

    #[test]
    fn test_convolve_truncates_each_product() -> Result<(), ImageError> {
        let kernel = gaussian_kernel_2d(3, 1.0, KernelAnchor::Corner);
        let neighborhood = Neighborhood::<3>::from_pixels(3, vec![[65535, 100, 6]; 9])?;

        // 6 * w truncates to zero for every tap
        assert_eq!(
            convolve(&neighborhood, &kernel, AlphaMode::ForceOpaque),
            [31644, 44, 0]
        );

        Ok(())
    }

    #[test]
    fn test_convolve_saturates() -> Result<(), ImageError> {
        let neighborhood = Neighborhood::<3>::from_pixels(1, vec![[65535, 1, 2]])?;
        assert_eq!(
            convolve(&neighborhood, &identity_kernel(), AlphaMode::ForceOpaque),
            [65535, 1, 2]
        );

        // the uncentered density peaks at ~3.98 for a narrow sigma
        let kernel = gaussian_kernel_2d(3, 0.2, KernelAnchor::Corner);
        let neighborhood = Neighborhood::<4>::from_pixels(3, vec![[65535; 4]; 9])?;
        assert_eq!(
            convolve(&neighborhood, &kernel, AlphaMode::Preserve),
            [CHANNEL_MAX; 4]
        );

        Ok(())
    }

    #[test]
    fn test_neighborhood_from_pixels_size_mismatch() {
        let res = Neighborhood::<3>::from_pixels(2, vec![[0; 3]; 3]);
        assert_eq!(res, Err(ImageError::InvalidChannelShape(9, 12)));
    }

    #[test]
    fn test_gather() -> Result<(), ImageError> {
        let src = Image::<u16, 3>::new(
            [2, 2].into(),
            vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4],
        )?;
        let padded = pad(&src, 1, PaddingPolicy::ZeroTrailingPad)?;
        let mut neighborhood = Neighborhood::<3>::new(3);

        neighborhood.gather(&padded, 0, 0);
        #[rustfmt::skip]
        assert_eq!(
            neighborhood.pixels(),
            &[
                [0, 0, 0], [0, 0, 0], [0, 0, 0],
                [0, 0, 0], [1, 1, 1], [2, 2, 2],
                [0, 0, 0], [3, 3, 3], [4, 4, 4],
            ]
        );

        neighborhood.gather(&padded, 1, 1);
        #[rustfmt::skip]
        assert_eq!(
            neighborhood.pixels(),
            &[
                [1, 1, 1], [2, 2, 2], [0, 0, 0],
                [3, 3, 3], [4, 4, 4], [0, 0, 0],
                [0, 0, 0], [0, 0, 0], [0, 0, 0],
            ]
        );

        Ok(())
    }
}
