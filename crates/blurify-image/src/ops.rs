use crate::{Image, ImageError};

/// Expand an 8 bit image to the 16 bit working depth.
///
/// Every channel is replicated into both bytes, so `0xff` maps to `0xffff`.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image.
///
/// Example:
///
/// ```
/// use blurify_image::{Image, ImageSize};
/// use blurify_image::ops::expand_depth;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     vec![0u8, 255],
/// ).unwrap();
///
/// let mut image_u16 = Image::from_size_val(image.size(), 0u16).unwrap();
///
/// expand_depth(&image, &mut image_u16).unwrap();
///
/// assert_eq!(image_u16.as_slice(), &[0, 65535]);
/// ```
pub fn expand_depth<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u16, C>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(src.as_slice().iter())
        .for_each(|(out, &inp)| *out = u16::from(inp) * 0x101);

    Ok(())
}

/// Reduce a 16 bit image to 8 bits per channel by keeping the high byte.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image.
pub fn reduce_depth<const C: usize>(
    src: &Image<u16, C>,
    dst: &mut Image<u8, C>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(src.as_slice().iter())
        .for_each(|(out, &inp)| *out = (inp >> 8) as u8);

    Ok(())
}
