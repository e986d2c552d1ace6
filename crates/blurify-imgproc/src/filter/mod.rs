//! Filter operations
//!
//! This module provides the kernels and the per-pixel convolution used by the blur.

/// Filter kernels
pub mod kernels;

/// Convolution of a pixel window with a kernel
mod convolution;
pub use convolution::*;

pub use kernels::{FilterKind, Kernel, KernelAnchor};
