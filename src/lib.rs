// texview: typed, zero-copy views over multi-dimensional pixel buffers
//
// Images own one buffer; views borrow it and can be re-anchored, mirrored,
// transposed and sliced without copying. Layouts decide how positions map
// to bytes (strided row-major or Z-order), and RawImage carries untyped
// bytes plus metadata that can be reinterpreted as a typed view.

pub mod addressing;
pub mod block;
pub mod convert;
pub mod extent;
pub mod image;
pub mod iter;
pub mod layout;
pub mod metadata;
pub mod pixel;
pub mod raw_image;
pub mod resample;
pub mod sampler;
pub mod storage;
pub mod view;

#[cfg(feature = "codec")]
pub mod codec;

pub use crate::block::{Bc1Block, BlockFormat, BlockImage, BlockView};
pub use crate::convert::{convert_image, ConvertPixel, Converter, DefaultConverter};
pub use crate::extent::{Coords, Extent, Extent1, Extent1Array, Extent2, Extent2Array, Extent3, ExtentCube, SliceAt, SwapAxes};
pub use crate::image::Image;
pub use crate::layout::{Layout, Linear, ZOrder};
pub use crate::metadata::{ColorSpace, ImageKind, ImageMetadata, LayoutKind, PixelFormat};
pub use crate::pixel::{Mix, Pixel, Rgb, Rgba, Scalar};
pub use crate::raw_image::{AlignedBuffer, ImageShape, RawImage, RawImageError};
pub use crate::sampler::{Filter, Lookup, Sampler};
pub use crate::view::{View, ViewMut};
