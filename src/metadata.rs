// metadata.rs — Type-erased image description.
//
// A RawImage carries one of these next to its byte buffer. The record is
// everything needed to decide whether the bytes may be reinterpreted as a
// typed view: topology, memory layout, pixel format, colour space, channel
// and mip counts, plus up to four extents and byte strides.
//
// Wire layout of the fixed header (little endian, 44 bytes):
//
//   offset  size  field
//   0       1     kind
//   1       1     layout
//   2       1     format
//   3       1     space
//   4       4     channels     (u32)
//   8       4     mip_levels   (u32)
//   12      16    extents[4]   (i32 each)
//   28      16    strides[4]   (i32 each)

use serde::{Deserialize, Serialize};

use crate::extent::{Coords, Extent};
use crate::layout::Layout;
use crate::pixel::Pixel;
use crate::raw_image::RawImageError;

/// Topology of the image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ImageKind {
    #[default]
    Invalid = 0,
    Image1D = 1,
    Image2D = 2,
    Image3D = 3,
    ImageCube = 4,
    Image1DArray = 5,
    Image2DArray = 6,
}

/// How elements are arranged in memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LayoutKind {
    #[default]
    Invalid = 0,
    StridedLinear = 1,
    ZOrder = 2,
    Custom = 255,
}

/// Scalar kind of one channel, or a named GPU format.
///
/// For the raw numeric kinds a pixel is `channels × scalar`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PixelFormat {
    #[default]
    Invalid = 0,

    B1,
    B8,
    C8,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    U8Norm,
    U16Norm,
    U32Norm,
    U64Norm,
    F16,
    F32,
    F64,
    /// Opaque plain-old-data, size given by `channels`.
    Pod,

    Rgba8UnormSrgb,

    Bgra8Unorm,
    B10G11R11Ufloat,

    Bc1Unorm,
    Bc1UnormSrgb,
    Bc2Unorm,
    Bc2UnormSrgb,
    Bc3Unorm,
    Bc3UnormSrgb,
    Bc6hFloat,
    Bc6hUfloat,

    Depth32Float,
    Depth16Unorm,

    Depth32FloatStencil8,
    Depth24UnormStencil8,
}

/// Colour space of the channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ColorSpace {
    #[default]
    None = 0,
    Rgb,
    Srgb,
    Hsv,
    Hsl,
    Yuv,
    Cmyk,
    CieLab,
    CieLuv,
    CieXyz,
}

impl ImageKind {
    const ALL: [ImageKind; 7] = [
        ImageKind::Invalid,
        ImageKind::Image1D,
        ImageKind::Image2D,
        ImageKind::Image3D,
        ImageKind::ImageCube,
        ImageKind::Image1DArray,
        ImageKind::Image2DArray,
    ];

    pub fn from_u8(v: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| *k as u8 == v)
    }
}

impl LayoutKind {
    pub fn from_u8(v: u8) -> Option<Self> {
        [
            LayoutKind::Invalid,
            LayoutKind::StridedLinear,
            LayoutKind::ZOrder,
            LayoutKind::Custom,
        ]
        .into_iter()
        .find(|k| *k as u8 == v)
    }
}

impl ColorSpace {
    pub fn from_u8(v: u8) -> Option<Self> {
        [
            ColorSpace::None,
            ColorSpace::Rgb,
            ColorSpace::Srgb,
            ColorSpace::Hsv,
            ColorSpace::Hsl,
            ColorSpace::Yuv,
            ColorSpace::Cmyk,
            ColorSpace::CieLab,
            ColorSpace::CieLuv,
            ColorSpace::CieXyz,
        ]
        .into_iter()
        .find(|s| *s as u8 == v)
    }
}

impl PixelFormat {
    const ALL: [PixelFormat; 35] = {
        use PixelFormat::*;
        [
            Invalid,
            B1,
            B8,
            C8,
            I8,
            I16,
            I32,
            I64,
            U8,
            U16,
            U32,
            U64,
            U8Norm,
            U16Norm,
            U32Norm,
            U64Norm,
            F16,
            F32,
            F64,
            Pod,
            Rgba8UnormSrgb,
            Bgra8Unorm,
            B10G11R11Ufloat,
            Bc1Unorm,
            Bc1UnormSrgb,
            Bc2Unorm,
            Bc2UnormSrgb,
            Bc3Unorm,
            Bc3UnormSrgb,
            Bc6hFloat,
            Bc6hUfloat,
            Depth32Float,
            Depth16Unorm,
            Depth32FloatStencil8,
            Depth24UnormStencil8,
        ]
    };

    pub fn from_u8(v: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| *f as u8 == v)
    }

    /// Bytes of one channel, or 0 for packed and block-compressed formats.
    pub const fn bytes_per_channel(self) -> u32 {
        use PixelFormat::*;
        match self {
            B8 | C8 | I8 | U8 | U8Norm | Pod | Rgba8UnormSrgb | Bgra8Unorm => 1,
            I16 | U16 | U16Norm | F16 | Depth16Unorm => 2,
            I32 | U32 | U32Norm | F32 | Depth32Float => 4,
            I64 | U64 | U64Norm | F64 => 8,
            Invalid | B1 | B10G11R11Ufloat | Depth32FloatStencil8 | Depth24UnormStencil8 => 0,
            Bc1Unorm | Bc1UnormSrgb | Bc2Unorm | Bc2UnormSrgb | Bc3Unorm | Bc3UnormSrgb
            | Bc6hFloat | Bc6hUfloat => 0,
        }
    }

    pub fn is_block_compressed(self) -> bool {
        use PixelFormat::*;
        matches!(
            self,
            Bc1Unorm | Bc1UnormSrgb | Bc2Unorm | Bc2UnormSrgb | Bc3Unorm | Bc3UnormSrgb
                | Bc6hFloat | Bc6hUfloat
        )
    }
}

// ---------------------------------------------------------------------------
// ImageMetadata
// ---------------------------------------------------------------------------

/// Description of a type-erased image buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub kind: ImageKind,
    pub layout: LayoutKind,
    pub format: PixelFormat,
    pub space: ColorSpace,
    pub channels: u32,
    /// Number of stored mip levels; 1 means only the base level.
    pub mip_levels: u32,
    /// Per-axis extent, unused axes are 0.
    pub extents: [i32; 4],
    /// Per-axis byte stride, unused axes are 0.
    pub strides: [i32; 4],
}

impl ImageMetadata {
    /// Size of the encoded header in bytes.
    pub const HEADER_LEN: usize = 44;

    /// Static part of the descriptor of a typed image: everything except
    /// extents and strides, which stay zero.
    pub fn descriptor<T: Pixel, E: Extent, L: Layout>() -> Self {
        ImageMetadata {
            kind: E::KIND,
            layout: L::KIND,
            format: T::FORMAT,
            space: T::SPACE,
            channels: T::CHANNELS,
            mip_levels: 1,
            extents: [0; 4],
            strides: [0; 4],
        }
    }

    /// Full descriptor of a typed image with the given shape.
    pub fn describe<T: Pixel, E: Extent, L: Layout>(extent: &E, strides: [i32; 4]) -> Self {
        ImageMetadata {
            extents: pad4(&extent.to_ivec()),
            strides,
            ..Self::descriptor::<T, E, L>()
        }
    }

    /// Compares everything that decides whether a reinterpretation is
    /// valid. Extents and strides are deliberately not part of it.
    pub fn is_structurally_compatible(&self, other: &ImageMetadata) -> bool {
        self.kind == other.kind
            && self.layout == other.layout
            && self.format == other.format
            && self.space == other.space
            && self.format.bytes_per_channel() == other.format.bytes_per_channel()
            && self.channels == other.channels
            && self.mip_levels == other.mip_levels
    }

    /// Extent of the first `E::Pos::DIMS` axes.
    pub fn extent<E: Extent>(&self) -> E {
        E::from_ivec(take(&self.extents))
    }

    pub fn to_header_bytes(&self) -> [u8; Self::HEADER_LEN] {
        let mut out = [0u8; Self::HEADER_LEN];
        out[0] = self.kind as u8;
        out[1] = self.layout as u8;
        out[2] = self.format as u8;
        out[3] = self.space as u8;
        out[4..8].copy_from_slice(&self.channels.to_le_bytes());
        out[8..12].copy_from_slice(&self.mip_levels.to_le_bytes());
        for i in 0..4 {
            let e = 12 + i * 4;
            let s = 28 + i * 4;
            out[e..e + 4].copy_from_slice(&self.extents[i].to_le_bytes());
            out[s..s + 4].copy_from_slice(&self.strides[i].to_le_bytes());
        }
        out
    }

    pub fn from_header_bytes(bytes: &[u8]) -> Result<Self, RawImageError> {
        if bytes.len() < Self::HEADER_LEN {
            return Err(RawImageError::Truncated {
                needed: Self::HEADER_LEN,
                got: bytes.len(),
            });
        }
        let u32_at = |o: usize| u32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]]);
        let i32_at = |o: usize| i32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]]);

        let kind = ImageKind::from_u8(bytes[0])
            .ok_or(RawImageError::UnknownTag { field: "kind", value: bytes[0] })?;
        let layout = LayoutKind::from_u8(bytes[1])
            .ok_or(RawImageError::UnknownTag { field: "layout", value: bytes[1] })?;
        let format = PixelFormat::from_u8(bytes[2])
            .ok_or(RawImageError::UnknownTag { field: "format", value: bytes[2] })?;
        let space = ColorSpace::from_u8(bytes[3])
            .ok_or(RawImageError::UnknownTag { field: "space", value: bytes[3] })?;

        let mut extents = [0i32; 4];
        let mut strides = [0i32; 4];
        for i in 0..4 {
            extents[i] = i32_at(12 + i * 4);
            strides[i] = i32_at(28 + i * 4);
        }

        Ok(ImageMetadata {
            kind,
            layout,
            format,
            space,
            channels: u32_at(4),
            mip_levels: u32_at(8),
            extents,
            strides,
        })
    }
}

/// Zero-pad a tuple to the 4 metadata slots.
pub fn pad4<P: Coords>(v: &P) -> [i32; 4] {
    let mut out = [0i32; 4];
    out[..P::DIMS].copy_from_slice(v.as_ref());
    out
}

/// Read the first `P::DIMS` metadata slots.
pub fn take<P: Coords>(v: &[i32; 4]) -> P {
    let mut out = P::splat(0);
    out.as_mut().copy_from_slice(&v[..P::DIMS]);
    out
}
