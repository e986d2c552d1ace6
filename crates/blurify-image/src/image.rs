use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use blurify_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Position of the top-left pixel of an image in its parent coordinate frame.
///
/// Filters never read it; it is carried unchanged from the input to the output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImageOrigin {
    /// Horizontal offset in pixels
    pub x: isize,
    /// Vertical offset in pixels
    pub y: isize,
}

/// Represents an image with interleaved pixel data.
///
/// The pixels are stored row-major with shape (H, W, C), where H is the height of the image,
/// W the width and C the number of channels.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const CHANNELS: usize> {
    size: ImageSize,
    origin: ImageOrigin,
    data: Vec<T>,
}

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image.
    ///
    /// # Returns
    ///
    /// A new image with the given pixel data.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use blurify_image::{Image, ImageSize};
    ///
    /// let image = Image::<u16, 4>::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0u16; 10 * 20 * 4],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 4);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        // check if the data length matches the image size
        if data.len() != size.width * size.height * CHANNELS {
            return Err(ImageError::InvalidChannelShape(
                data.len(),
                size.width * size.height * CHANNELS,
            ));
        }

        Ok(Self {
            size,
            origin: ImageOrigin::default(),
            data,
        })
    }

    /// Create a new image with the given size and default pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `val` - The default value of the pixel data.
    ///
    /// # Examples
    ///
    /// ```
    /// use blurify_image::{Image, ImageSize};
    ///
    /// let image = Image::<u16, 3>::from_size_val(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     0u16,
    /// ).unwrap();
    ///
    /// assert_eq!(image.as_slice().len(), 10 * 20 * 3);
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.width * size.height * CHANNELS];
        Image::new(size, data)
    }

    /// Create a new image filled with one pixel value.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `pixel` - The value of every pixel, one entry per channel.
    pub fn from_size_pixel(size: ImageSize, pixel: [T; CHANNELS]) -> Result<Self, ImageError>
    where
        T: Copy,
    {
        let data = (0..size.width * size.height)
            .flat_map(|_| pixel)
            .collect::<Vec<_>>();
        Image::new(size, data)
    }

    /// Return the image placed at the given origin.
    pub fn with_origin(mut self, origin: ImageOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Get the origin of the image.
    pub fn origin(&self) -> ImageOrigin {
        self.origin
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// Get the pixel data as a flat slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the pixel data as a flat mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Get the channels of the pixel at the given coordinates.
    ///
    /// # Arguments
    ///
    /// * `x` - The x-coordinate of the pixel.
    /// * `y` - The y-coordinate of the pixel.
    ///
    /// # Errors
    ///
    /// If the coordinates are outside the image, an error is returned.
    pub fn get_pixel(&self, x: usize, y: usize) -> Result<&[T], ImageError> {
        let offset = self.pixel_offset(x, y)?;
        Ok(&self.data[offset..offset + CHANNELS])
    }

    /// Overwrite the channels of the pixel at the given coordinates.
    ///
    /// # Errors
    ///
    /// If the coordinates are outside the image, an error is returned.
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: [T; CHANNELS]) -> Result<(), ImageError>
    where
        T: Copy,
    {
        let offset = self.pixel_offset(x, y)?;
        self.data[offset..offset + CHANNELS].copy_from_slice(&pixel);
        Ok(())
    }

    fn pixel_offset(&self, x: usize, y: usize) -> Result<usize, ImageError> {
        if x >= self.width() || y >= self.height() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }
        Ok((y * self.width() + x) * CHANNELS)
    }
}

#[cfg(test)]
mod tests {
    use crate::image::{Image, ImageError, ImageOrigin, ImageSize};

    #[test]
    fn image_size() {
        let image_size = ImageSize {
            width: 10,
            height: 20,
        };
        assert_eq!(image_size.width, 10);
        assert_eq!(image_size.height, 20);
        assert_eq!(ImageSize::from([10, 20]), image_size);
    }

    #[test]
    fn image_smoke() -> Result<(), ImageError> {
        let image = Image::<u16, 4>::new(
            ImageSize {
                width: 10,
                height: 20,
            },
            vec![0u16; 10 * 20 * 4],
        )?;
        assert_eq!(image.size().width, 10);
        assert_eq!(image.size().height, 20);
        assert_eq!(image.num_channels(), 4);
        assert_eq!(image.origin(), ImageOrigin::default());

        Ok(())
    }

    #[test]
    fn image_invalid_data_length() {
        let res = Image::<u16, 3>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0u16; 11],
        );
        assert_eq!(res, Err(ImageError::InvalidChannelShape(11, 12)));
    }

    #[test]
    fn image_from_size_pixel() -> Result<(), ImageError> {
        let image = Image::<u16, 3>::from_size_pixel([2, 1].into(), [1, 2, 3])?;
        assert_eq!(image.as_slice(), &[1, 2, 3, 1, 2, 3]);
        Ok(())
    }

    #[test]
    fn image_get_set_pixel() -> Result<(), ImageError> {
        let mut image = Image::<u16, 4>::from_size_val([3, 2].into(), 0)?;
        image.set_pixel(2, 1, [7, 8, 9, 10])?;

        assert_eq!(image.get_pixel(2, 1)?, &[7, 8, 9, 10]);
        assert_eq!(image.get_pixel(0, 0)?, &[0, 0, 0, 0]);
        assert_eq!(&image.as_slice()[20..24], &[7, 8, 9, 10]);

        assert_eq!(
            image.get_pixel(3, 0),
            Err(ImageError::PixelIndexOutOfBounds(3, 0, 3, 2))
        );

        Ok(())
    }

    #[test]
    fn image_origin() -> Result<(), ImageError> {
        let origin = ImageOrigin { x: -4, y: 12 };
        let image = Image::<u16, 3>::from_size_val([1, 1].into(), 0)?.with_origin(origin);
        assert_eq!(image.origin(), origin);
        Ok(())
    }
}
