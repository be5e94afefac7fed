// convert.rs — Element conversion between pixel types.
//
// Copying between views of different element types goes through a
// Converter. The default one uses `ConvertPixel`, which only exists for
// conversions that are well defined without extra parameters:
//
//   T   → T        identity
//   u8  → u16 …    lossless integer widening
//   f32 → f64
//   u8  → f32/f64  normalized to [0, 1]    (v / 255)
//   f32/f64 → u8   denormalized from [0, 1] (v · 255, clamped, rounded)
//   [S; N], Rgb<S>, Rgba<S>  componentwise
//
// Anything else (narrowing, 16-bit ↔ float, signed normalized) has no impl
// and fails to compile. Callers who want one of those pass their own
// converter via `map` or `in_place`.

use crate::extent::Extent;
use crate::image::Image;
use crate::layout::Layout;
use crate::pixel::{Pixel, Rgb, Rgba, Scalar};
use crate::view::View;

// ---------------------------------------------------------------------------
// ConvertPixel
// ---------------------------------------------------------------------------

/// Default conversion from `Self` to `D`.
pub trait ConvertPixel<D>: Pixel {
    fn convert_pixel(self) -> D;
}

macro_rules! impl_identity {
    ($($t:ty),*) => {
        $(
            impl ConvertPixel<$t> for $t {
                #[inline]
                fn convert_pixel(self) -> $t {
                    self
                }
            }
        )*
    };
}

impl_identity!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

macro_rules! impl_widen {
    ($src:ty => $($dst:ty),*) => {
        $(
            impl ConvertPixel<$dst> for $src {
                #[inline]
                fn convert_pixel(self) -> $dst {
                    <$dst>::from(self)
                }
            }
        )*
    };
}

impl_widen!(u8 => u16, u32, u64, i16, i32, i64);
impl_widen!(u16 => u32, u64, i32, i64);
impl_widen!(u32 => u64, i64);
impl_widen!(i8 => i16, i32, i64);
impl_widen!(i16 => i32, i64);
impl_widen!(i32 => i64);
impl_widen!(f32 => f64);

impl ConvertPixel<f32> for u8 {
    #[inline]
    fn convert_pixel(self) -> f32 {
        self as f32 / 255.0
    }
}

impl ConvertPixel<f64> for u8 {
    #[inline]
    fn convert_pixel(self) -> f64 {
        self as f64 / 255.0
    }
}

impl ConvertPixel<u8> for f32 {
    #[inline]
    fn convert_pixel(self) -> u8 {
        (self * 255.0).clamp(0.0, 255.0).round() as u8
    }
}

impl ConvertPixel<u8> for f64 {
    #[inline]
    fn convert_pixel(self) -> u8 {
        (self * 255.0).clamp(0.0, 255.0).round() as u8
    }
}

impl<S, D, const N: usize> ConvertPixel<[D; N]> for [S; N]
where
    S: Scalar + ConvertPixel<D>,
    D: Scalar,
{
    #[inline]
    fn convert_pixel(self) -> [D; N] {
        self.map(|c| c.convert_pixel())
    }
}

impl<S: Scalar + ConvertPixel<D>, D: Scalar> ConvertPixel<Rgb<D>> for Rgb<S> {
    #[inline]
    fn convert_pixel(self) -> Rgb<D> {
        Rgb::new(self.r.convert_pixel(), self.g.convert_pixel(), self.b.convert_pixel())
    }
}

impl<S: Scalar + ConvertPixel<D>, D: Scalar> ConvertPixel<Rgba<D>> for Rgba<S> {
    #[inline]
    fn convert_pixel(self) -> Rgba<D> {
        Rgba::new(
            self.r.convert_pixel(),
            self.g.convert_pixel(),
            self.b.convert_pixel(),
            self.a.convert_pixel(),
        )
    }
}

// Named colour pixels and plain arrays share a memory layout; convert
// freely between them so codec and sampler code can work on arrays.

impl<S: Scalar + ConvertPixel<D>, D: Scalar> ConvertPixel<[D; 3]> for Rgb<S> {
    #[inline]
    fn convert_pixel(self) -> [D; 3] {
        [self.r.convert_pixel(), self.g.convert_pixel(), self.b.convert_pixel()]
    }
}

impl<S: Scalar + ConvertPixel<D>, D: Scalar> ConvertPixel<[D; 4]> for Rgba<S> {
    #[inline]
    fn convert_pixel(self) -> [D; 4] {
        [
            self.r.convert_pixel(),
            self.g.convert_pixel(),
            self.b.convert_pixel(),
            self.a.convert_pixel(),
        ]
    }
}

impl<S: Scalar + ConvertPixel<D>, D: Scalar> ConvertPixel<Rgb<D>> for [S; 3] {
    #[inline]
    fn convert_pixel(self) -> Rgb<D> {
        let [r, g, b] = self;
        Rgb::new(r.convert_pixel(), g.convert_pixel(), b.convert_pixel())
    }
}

impl<S: Scalar + ConvertPixel<D>, D: Scalar> ConvertPixel<Rgba<D>> for [S; 4] {
    #[inline]
    fn convert_pixel(self) -> Rgba<D> {
        let [r, g, b, a] = self;
        Rgba::new(r.convert_pixel(), g.convert_pixel(), b.convert_pixel(), a.convert_pixel())
    }
}

// ---------------------------------------------------------------------------
// Converter strategies
// ---------------------------------------------------------------------------

/// Writes the conversion of `src` into `dst`.
pub trait Converter<S, D> {
    fn convert(&self, dst: &mut D, src: &S);
}

/// Converter backed by `ConvertPixel`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConverter;

impl<S: ConvertPixel<D>, D> Converter<S, D> for DefaultConverter {
    #[inline]
    fn convert(&self, dst: &mut D, src: &S) {
        *dst = src.convert_pixel();
    }
}

/// Value-returning closure converter, see [`map`].
#[derive(Debug, Clone, Copy)]
pub struct MapFn<F>(F);

impl<S, D, F: Fn(&S) -> D> Converter<S, D> for MapFn<F> {
    #[inline]
    fn convert(&self, dst: &mut D, src: &S) {
        *dst = (self.0)(src);
    }
}

/// In-place closure converter, see [`in_place`].
#[derive(Debug, Clone, Copy)]
pub struct InPlaceFn<F>(F);

impl<S, D, F: Fn(&mut D, &S)> Converter<S, D> for InPlaceFn<F> {
    #[inline]
    fn convert(&self, dst: &mut D, src: &S) {
        (self.0)(dst, src);
    }
}

/// Converter from a closure `|&src| -> dst`.
pub fn map<S, D, F: Fn(&S) -> D>(f: F) -> MapFn<F> {
    MapFn(f)
}

/// Converter from a closure `|&mut dst, &src|`.
pub fn in_place<S, D, F: Fn(&mut D, &S)>(f: F) -> InPlaceFn<F> {
    InPlaceFn(f)
}

/// Convert any view into a freshly allocated linear image of `D`.
pub fn convert_image<D, T, E, L>(src: View<'_, T, E, L>) -> Image<D, E>
where
    D: Pixel,
    T: ConvertPixel<D>,
    E: Extent,
    L: Layout,
{
    let mut dst = Image::uninitialized(src.extent());
    src.copy_to(&mut dst.view_mut());
    dst
}
