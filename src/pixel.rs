// pixel.rs — Element types that can live in an image buffer.
//
// A pixel is any plain-old-data value with a static descriptor: which scalar
// kind each channel uses, how many channels there are, and which colour
// space they live in. The descriptor is what a RawImage compares before it
// lets a byte buffer be reinterpreted as a typed view, so it has to be
// spelled out per type rather than guessed from the memory layout.
//
//   u8, f32, ...      one channel, SPACE = None
//   [S; N]            N channels of S, SPACE = None
//   Rgb<S>, Rgba<S>   3/4 channels of S, SPACE = Rgb
//
// `bytemuck::Pod` is the "trivially copyable, every bit pattern valid"
// guarantee. It is what makes reinterpreting raw bytes sound.

use std::fmt::Debug;

use bytemuck::{Pod, Zeroable};

use crate::metadata::{ColorSpace, PixelFormat};

// ---------------------------------------------------------------------------
// Pixel / Scalar
// ---------------------------------------------------------------------------

/// Trait for types that can serve as elements of an image.
pub trait Pixel: Pod + Debug + PartialEq + Send + Sync + 'static {
    /// Scalar kind of one channel.
    const FORMAT: PixelFormat;

    /// Number of channels.
    const CHANNELS: u32;

    const SPACE: ColorSpace = ColorSpace::None;

    /// Bytes per channel, derived from `FORMAT`.
    const BYTES_PER_CHANNEL: u32 = Self::FORMAT.bytes_per_channel();
}

/// Single-channel numeric pixel.
pub trait Scalar: Pixel {}

macro_rules! impl_scalar {
    ($($t:ty => $fmt:ident),* $(,)?) => {
        $(
            impl Pixel for $t {
                const FORMAT: PixelFormat = PixelFormat::$fmt;
                const CHANNELS: u32 = 1;
            }

            impl Scalar for $t {}
        )*
    };
}

impl_scalar!(
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
);

impl<S: Scalar, const N: usize> Pixel for [S; N] {
    const FORMAT: PixelFormat = S::FORMAT;
    const CHANNELS: u32 = N as u32;
}

// ---------------------------------------------------------------------------
// Named colour pixels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct Rgb<S> {
    pub r: S,
    pub g: S,
    pub b: S,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct Rgba<S> {
    pub r: S,
    pub g: S,
    pub b: S,
    pub a: S,
}

impl<S> Rgb<S> {
    pub const fn new(r: S, g: S, b: S) -> Self {
        Rgb { r, g, b }
    }
}

impl<S> Rgba<S> {
    pub const fn new(r: S, g: S, b: S, a: S) -> Self {
        Rgba { r, g, b, a }
    }
}

// SAFETY: #[repr(C)] structs of 3 or 4 identical Pod fields have no padding
// and every bit pattern of the fields is a valid value.
unsafe impl<S: Scalar> Zeroable for Rgb<S> {}
unsafe impl<S: Scalar> Pod for Rgb<S> {}
unsafe impl<S: Scalar> Zeroable for Rgba<S> {}
unsafe impl<S: Scalar> Pod for Rgba<S> {}

impl<S: Scalar> Pixel for Rgb<S> {
    const FORMAT: PixelFormat = S::FORMAT;
    const CHANNELS: u32 = 3;
    const SPACE: ColorSpace = ColorSpace::Rgb;
}

impl<S: Scalar> Pixel for Rgba<S> {
    const FORMAT: PixelFormat = S::FORMAT;
    const CHANNELS: u32 = 4;
    const SPACE: ColorSpace = ColorSpace::Rgb;
}

// ---------------------------------------------------------------------------
// Mix — linear blend used by the sampler
// ---------------------------------------------------------------------------

/// Linear interpolation `a·(1−t) + b·t`.
pub trait Mix: Copy {
    fn mix(a: Self, b: Self, t: f32) -> Self;
}

impl Mix for f32 {
    #[inline]
    fn mix(a: f32, b: f32, t: f32) -> f32 {
        a * (1.0 - t) + b * t
    }
}

impl Mix for f64 {
    #[inline]
    fn mix(a: f64, b: f64, t: f32) -> f64 {
        let t = t as f64;
        a * (1.0 - t) + b * t
    }
}

impl<M: Mix, const N: usize> Mix for [M; N] {
    #[inline]
    fn mix(a: Self, b: Self, t: f32) -> Self {
        let mut out = a;
        for i in 0..N {
            out[i] = M::mix(a[i], b[i], t);
        }
        out
    }
}

impl<M: Mix> Mix for Rgb<M> {
    #[inline]
    fn mix(a: Self, b: Self, t: f32) -> Self {
        Rgb::new(M::mix(a.r, b.r, t), M::mix(a.g, b.g, t), M::mix(a.b, b.b, t))
    }
}

impl<M: Mix> Mix for Rgba<M> {
    #[inline]
    fn mix(a: Self, b: Self, t: f32) -> Self {
        Rgba::new(
            M::mix(a.r, b.r, t),
            M::mix(a.g, b.g, t),
            M::mix(a.b, b.b, t),
            M::mix(a.a, b.a, t),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptors() {
        assert_eq!(<u8 as Pixel>::FORMAT, PixelFormat::U8);
        assert_eq!(<u8 as Pixel>::CHANNELS, 1);
        assert_eq!(<f64 as Pixel>::BYTES_PER_CHANNEL, 8);
        assert_eq!(<[u16; 3] as Pixel>::CHANNELS, 3);
        assert_eq!(<[u16; 3] as Pixel>::SPACE, ColorSpace::None);
        assert_eq!(<Rgba<f32> as Pixel>::FORMAT, PixelFormat::F32);
        assert_eq!(<Rgba<f32> as Pixel>::CHANNELS, 4);
        assert_eq!(<Rgb<u8> as Pixel>::SPACE, ColorSpace::Rgb);
    }

    #[test]
    fn test_rgb_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Rgb<u8>>(), 3);
        assert_eq!(std::mem::size_of::<Rgba<f32>>(), 16);
        let px = Rgba::new(1u8, 2, 3, 4);
        assert_eq!(bytemuck::bytes_of(&px), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_mix() {
        assert!((f32::mix(2.0, 4.0, 0.25) - 2.5).abs() < 1e-6);
        assert!((f64::mix(0.0, 1.0, 0.5) - 0.5).abs() < 1e-12);
        let m = <[f32; 2]>::mix([0.0, 10.0], [1.0, 20.0], 0.5);
        assert!((m[0] - 0.5).abs() < 1e-6 && (m[1] - 15.0).abs() < 1e-6);
        let c = Rgb::mix(Rgb::new(0.0f32, 0.0, 0.0), Rgb::new(1.0, 2.0, 4.0), 0.5);
        assert_eq!(c, Rgb::new(0.5, 1.0, 2.0));
    }
}
