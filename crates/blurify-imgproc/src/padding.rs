use blurify_image::{Image, ImageError, ImageSize};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// How the border of an image is extended before it is filtered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaddingPolicy {
    /// The image is shifted by the kernel half width inside a zero filled buffer that only
    /// grows on the trailing edges. Samples past the buffer read as zero, so every border
    /// pixel is averaged with black.
    ///
    /// Example: ...0 0 | a b c d | 0 0...
    #[default]
    ZeroTrailingPad,

    /// The outermost row or column of pixels is repeated into the border.
    ///
    /// Example: ...a a | a b c d | d d...
    EdgeClamp,

    /// The border mirrors the image around the edge pixel, without repeating it.
    ///
    /// Example: ...c b | a b c d | c b...
    Mirror,
}

impl PaddingPolicy {
    #[inline]
    fn reflect101(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i;
            } else if i >= len {
                i = 2 * len - i - 2;
            }
        }
        i as usize
    }

    /// Maps index `i` to a valid index i.e. within `[0, len)` according to the policy.
    ///
    /// - `EdgeClamp`: clamp to edge
    /// - `Mirror`: mirror excluding edge
    /// - `ZeroTrailingPad`: `None` outside the image, the sample is zero
    ///
    /// # Arguments
    /// - `i`: The (possibly out-of-range) coordinate index.
    /// - `len`: The valid length of the dimension.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        match self {
            PaddingPolicy::ZeroTrailingPad => {
                (i >= 0 && (i as usize) < len).then_some(i as usize)
            }
            PaddingPolicy::EdgeClamp => Some(i.clamp(0, len as isize - 1) as usize),
            PaddingPolicy::Mirror => Some(Self::reflect101(i, len)),
        }
    }

    /// The padding extents this policy allocates for a kernel half width.
    pub fn extents(&self, half_width: usize) -> Padding2D {
        match self {
            PaddingPolicy::ZeroTrailingPad => Padding2D {
                top: half_width,
                bottom: 0,
                left: half_width,
                right: 0,
            },
            PaddingPolicy::EdgeClamp | PaddingPolicy::Mirror => Padding2D {
                top: half_width,
                bottom: half_width,
                left: half_width,
                right: half_width,
            },
        }
    }

    /// Fills the border rows and columns of `new_data` from the copied image.
    ///
    /// # Notes
    /// - [`PaddingPolicy::ZeroTrailingPad`] keeps the zero filled border.
    fn apply_padding<const C: usize>(
        &self,
        new_data: &mut [u16],
        old_size: ImageSize,
        new_size: ImageSize,
        padding: &Padding2D,
    ) {
        if let PaddingPolicy::ZeroTrailingPad = self {
            return;
        }

        let row_stride = new_size.width * C;

        // top
        {
            let (top_section, rest) = new_data.split_at_mut(padding.top * row_stride);

            top_section
                .par_chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(y, dst_row)| {
                    let src_y = self
                        .map_index(y as isize - padding.top as isize, old_size.height)
                        .unwrap_or(0);
                    let src_row = &rest[src_y * row_stride..(src_y + 1) * row_stride];
                    dst_row.copy_from_slice(src_row);
                });
        }

        // bottom
        {
            let split_point = (new_size.height - padding.bottom) * row_stride;
            let (rest, bottom_section) = new_data.split_at_mut(split_point);

            bottom_section
                .par_chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(idx, dst_row)| {
                    let y = new_size.height - padding.bottom + idx;
                    let src_y = self
                        .map_index(y as isize - padding.top as isize, old_size.height)
                        .unwrap_or(0);
                    let src_start = (src_y + padding.top) * row_stride;
                    dst_row.copy_from_slice(&rest[src_start..src_start + row_stride]);
                });
        }

        new_data.par_chunks_exact_mut(row_stride).for_each(|row| {
            let border = (0..padding.left).chain(new_size.width - padding.right..new_size.width);
            for x in border {
                let src_x = self
                    .map_index(x as isize - padding.left as isize, old_size.width)
                    .unwrap_or(0);
                let src_idx = (padding.left + src_x) * C;
                row.copy_within(src_idx..src_idx + C, x * C);
            }
        });
    }
}

/// Represents 2D padding with top, bottom, left, and right values (in pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding2D {
    /// Amount of padding to add on the top side.
    pub top: usize,
    /// Amount of padding to add on the bottom side.
    pub bottom: usize,
    /// Amount of padding to add on the left side.
    pub left: usize,
    /// Amount of padding to add on the right side.
    pub right: usize,
}

impl Padding2D {
    /// The size of an image of `old_size` after this padding is applied.
    pub fn padded_size(&self, old_size: ImageSize) -> ImageSize {
        ImageSize {
            width: old_size.width + self.left + self.right,
            height: old_size.height + self.top + self.bottom,
        }
    }
}

/// A source image extended with a border so every output pixel has a full window.
///
/// Pixel `(x, y)` of the source sits at `(x + half_width, y + half_width)` of the padded
/// buffer, so the window of source pixel `(x, y)` starts at padded `(x, y)`.
#[derive(Debug, Clone)]
pub struct PaddedImage<const C: usize> {
    image: Image<u16, C>,
}

impl<const C: usize> PaddedImage<C> {
    /// Get the padded pixel buffer.
    pub fn image(&self) -> &Image<u16, C> {
        &self.image
    }

    /// Read the pixel at padded coordinates. Samples outside the buffer are zero.
    #[inline]
    pub fn sample(&self, x: usize, y: usize) -> [u16; C] {
        let mut pixel = [0u16; C];
        if x < self.image.width() && y < self.image.height() {
            let offset = (y * self.image.width() + x) * C;
            pixel.copy_from_slice(&self.image.as_slice()[offset..offset + C]);
        }
        pixel
    }
}

/// Extends an image with a border of `half_width` pixels following `policy`.
///
/// # Arguments
///
/// * `src` - The source image to pad.
/// * `half_width` - The kernel half width, i.e. the number of border pixels in front of
///   the image.
/// * `policy` - The border handling defined in [`PaddingPolicy`].
///
/// # Example
///
/// ```rust
/// use blurify_image::{Image, ImageSize};
/// use blurify_imgproc::padding::{pad, PaddingPolicy};
///
/// let src = Image::<u16, 3>::from_size_val(ImageSize { width: 2, height: 2 }, 1).unwrap();
///
/// let padded = pad(&src, 1, PaddingPolicy::ZeroTrailingPad).unwrap();
/// assert_eq!(padded.image().size(), ImageSize { width: 3, height: 3 });
///
/// let padded = pad(&src, 1, PaddingPolicy::EdgeClamp).unwrap();
/// assert_eq!(padded.image().size(), ImageSize { width: 4, height: 4 });
/// ```
pub fn pad<const C: usize>(
    src: &Image<u16, C>,
    half_width: usize,
    policy: PaddingPolicy,
) -> Result<PaddedImage<C>, ImageError> {
    let padding = policy.extents(half_width);
    let new_size = padding.padded_size(src.size());

    // zero fill first, the source is then copied at the (left, top) offset
    let mut dst = Image::<u16, C>::from_size_val(new_size, 0)?;

    if src.width() > 0 && src.height() > 0 {
        let new_stride = new_size.width * C;
        let old_stride = src.width() * C;
        let row_offset = padding.top * new_stride + padding.left * C;

        let new_data = dst.as_slice_mut();
        for (src_row, dst_row) in src
            .as_slice()
            .chunks_exact(old_stride)
            .zip(new_data[row_offset..].chunks_mut(new_stride))
        {
            dst_row[..old_stride].copy_from_slice(src_row);
        }

        policy.apply_padding::<C>(new_data, src.size(), new_size, &padding);
    }

    Ok(PaddedImage { image: dst })
}
