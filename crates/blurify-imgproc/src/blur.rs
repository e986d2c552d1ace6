use std::borrow::Cow;

use blurify_image::{
    ops::{expand_depth, reduce_depth},
    Image, ImageError,
};

use crate::error::BlurError;
use crate::filter::{convolve, kernels, Neighborhood, CHANNEL_MAX};
use crate::options::BlurOptions;
use crate::padding::pad;
use crate::parallel::par_iter_rows_init;

/// Blur an RGB or RGBA image.
///
/// The options are completed with their defaults and validated before any pixel is
/// touched. On success the output has the size and origin of `src`.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C), C being 3 or 4.
/// * `opts` - The blur parameters.
///
/// # Errors
///
/// Returns [`BlurError::Configuration`] for unusable options and
/// [`BlurError::UnsupportedChannels`] when `C` is neither 3 nor 4.
///
/// # Example
///
/// ```
/// use blurify_image::{Image, ImageSize};
/// use blurify_imgproc::blur::blur;
/// use blurify_imgproc::filter::FilterKind;
/// use blurify_imgproc::options::BlurOptions;
///
/// let src = Image::<u16, 3>::from_size_val(ImageSize { width: 4, height: 3 }, 1000).unwrap();
/// let dst = blur(&src, &BlurOptions::new(FilterKind::MovingAverage)).unwrap();
///
/// assert_eq!(dst.size(), src.size());
/// assert_eq!(dst.get_pixel(1, 1).unwrap(), &[1000, 1000, 1000]);
/// ```
pub fn blur<const C: usize>(
    src: &Image<u16, C>,
    opts: &BlurOptions,
) -> Result<Image<u16, C>, BlurError> {
    let mut dst = Image::from_size_val(src.size(), 0u16)?.with_origin(src.origin());
    blur_into(src, &mut dst, opts)?;
    Ok(dst)
}

/// Blur an RGB or RGBA image into a preallocated destination.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `opts` - The blur parameters.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn blur_into<const C: usize>(
    src: &Image<u16, C>,
    dst: &mut Image<u16, C>,
    opts: &BlurOptions,
) -> Result<(), BlurError> {
    if C != 3 && C != 4 {
        return Err(BlurError::UnsupportedChannels(C));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        )
        .into());
    }

    let opts = opts.with_defaults();
    opts.validate()?;

    let kernel = kernels::generate(opts.filter, opts.kernel_size, opts.sigma, opts.anchor)?;
    let alpha = opts.alpha_mode();

    log::debug!(
        "blur {}: filter {} size {} sigma {} padding {:?} anchor {:?} alpha {:?}",
        src.size(),
        opts.filter,
        opts.kernel_size,
        opts.sigma,
        opts.padding,
        opts.anchor,
        alpha,
    );

    // the color of a translucent pixel is sampled as if composited over black
    let source = if C == 4 && !opts.preserve_alpha {
        Cow::Owned(premultiply_alpha(src))
    } else {
        Cow::Borrowed(src)
    };

    let padded = pad(&source, kernel.half_width(), opts.padding)?;
    log::trace!("padded buffer {}", padded.image().size());

    par_iter_rows_init(
        dst.as_slice_mut(),
        src.width() * C,
        opts.strategy,
        || Neighborhood::<C>::new(kernel.size()),
        |neighborhood, y, row| {
            for (x, out) in row.chunks_exact_mut(C).enumerate() {
                neighborhood.gather(&padded, x, y);
                out.copy_from_slice(&convolve(neighborhood, &kernel, alpha));
            }
        },
    )?;

    Ok(())
}

/// Blur an 8 bit RGB or RGBA image.
///
/// The image is expanded to 16 bits, blurred with [`blur`] and reduced back by keeping the
/// high byte of every channel. When alpha is forced opaque, RGBA colors are premultiplied
/// and rounded down to 8 bits before they are expanded.
pub fn blur_u8<const C: usize>(
    src: &Image<u8, C>,
    opts: &BlurOptions,
) -> Result<Image<u8, C>, BlurError> {
    let source = if C == 4 && !opts.preserve_alpha {
        Cow::Owned(premultiply_alpha_u8(src))
    } else {
        Cow::Borrowed(src)
    };

    let mut wide = Image::from_size_val(src.size(), 0u16)?.with_origin(src.origin());
    expand_depth(&source, &mut wide)?;

    let blurred = blur(&wide, opts)?;

    let mut dst = Image::from_size_val(src.size(), 0u8)?.with_origin(src.origin());
    reduce_depth(&blurred, &mut dst)?;
    Ok(dst)
}

/// Scale the color channels of an RGBA image by its alpha.
fn premultiply_alpha<const C: usize>(src: &Image<u16, C>) -> Image<u16, C> {
    let mut dst = src.clone();
    dst.as_slice_mut().chunks_exact_mut(C).for_each(|pixel| {
        let a = u32::from(pixel[C - 1]);
        for ch in pixel[..C - 1].iter_mut() {
            *ch = (u32::from(*ch) * a / u32::from(CHANNEL_MAX)) as u16;
        }
    });
    dst
}

/// Premultiply the colors of an 8 bit RGBA image at 16 bit precision and keep the high byte.
///
/// The alpha of the result is opaque, so [`blur`] samples the colors unchanged.
fn premultiply_alpha_u8<const C: usize>(src: &Image<u8, C>) -> Image<u8, C> {
    let mut dst = src.clone();
    dst.as_slice_mut().chunks_exact_mut(C).for_each(|pixel| {
        let a = u32::from(pixel[C - 1]) * 257;
        for ch in pixel[..C - 1].iter_mut() {
            *ch = ((u32::from(*ch) * 257 * a / u32::from(CHANNEL_MAX)) >> 8) as u8;
        }
        pixel[C - 1] = u8::MAX;
    });
    dst
}
