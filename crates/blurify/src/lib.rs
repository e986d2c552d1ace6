#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use blurify_image as image;

#[doc(inline)]
pub use blurify_imgproc as imgproc;
