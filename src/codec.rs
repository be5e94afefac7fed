// codec.rs — Writing 2D views to image files through the `image` crate.
//
// The container is chosen from the file extension. Everything except `.hdr`
// is an LDR container (PNG, BMP) and takes 8- or 16-bit channels; `.hdr`
// takes 32-bit float channels.
//
//   write(img.view(), "out.png")?;            // u8 / u16 pixels pass through
//   write(img.view().mirrored_y(), "a.png")?; // repacked to natural order first
//   write(float_img.view(), "sky.hdr")?;    // f32 pixels pass through
//
// Pixels whose channel type the container cannot take are converted through
// `Encodable` into a natural temporary before encoding. The buffer handed to
// the encoder is borrowed directly from the view when the view is linear,
// natural-strided and already of a direct type.

use std::path::Path;

use thiserror::Error;

use crate::convert::{map, ConvertPixel};
use crate::extent::{Extent, Extent2};
use crate::image::Image;
use crate::layout::Layout;
use crate::metadata::{LayoutKind, PixelFormat};
use crate::pixel::{Pixel, Rgb, Rgba, Scalar};
use crate::view::View;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("no encoder for {channels} channel(s) at {bit_depth} bits")]
    UnsupportedLayout { channels: u32, bit_depth: u32 },

    #[error(transparent)]
    Image(#[from] ::image::ImageError),
}

// ---------------------------------------------------------------------------
// Encodable
// ---------------------------------------------------------------------------

/// Pixels that can be brought into a form the encoders accept.
pub trait Encodable: Pixel {
    /// 8-bit equivalent for LDR containers.
    type Ldr: Pixel;
    /// 32-bit float equivalent for HDR containers.
    type Hdr: Pixel;

    fn to_ldr(&self) -> Self::Ldr;
    fn to_hdr(&self) -> Self::Hdr;
}

impl Encodable for u8 {
    type Ldr = u8;
    type Hdr = f32;

    fn to_ldr(&self) -> u8 {
        *self
    }

    fn to_hdr(&self) -> f32 {
        self.convert_pixel()
    }
}

impl Encodable for u16 {
    type Ldr = u8;
    type Hdr = f32;

    fn to_ldr(&self) -> u8 {
        ((*self as u32 + 128) / 257) as u8
    }

    fn to_hdr(&self) -> f32 {
        *self as f32 / 65535.0
    }
}

impl Encodable for f32 {
    type Ldr = u8;
    type Hdr = f32;

    fn to_ldr(&self) -> u8 {
        self.convert_pixel()
    }

    fn to_hdr(&self) -> f32 {
        *self
    }
}

impl Encodable for f64 {
    type Ldr = u8;
    type Hdr = f32;

    fn to_ldr(&self) -> u8 {
        self.convert_pixel()
    }

    fn to_hdr(&self) -> f32 {
        *self as f32
    }
}

impl<S, const N: usize> Encodable for [S; N]
where
    S: Encodable + Scalar,
    S::Ldr: Scalar,
    S::Hdr: Scalar,
{
    type Ldr = [S::Ldr; N];
    type Hdr = [S::Hdr; N];

    fn to_ldr(&self) -> Self::Ldr {
        self.map(|c| c.to_ldr())
    }

    fn to_hdr(&self) -> Self::Hdr {
        self.map(|c| c.to_hdr())
    }
}

impl<S> Encodable for Rgb<S>
where
    S: Encodable + Scalar,
    S::Ldr: Scalar,
    S::Hdr: Scalar,
{
    type Ldr = Rgb<S::Ldr>;
    type Hdr = Rgb<S::Hdr>;

    fn to_ldr(&self) -> Self::Ldr {
        Rgb::new(self.r.to_ldr(), self.g.to_ldr(), self.b.to_ldr())
    }

    fn to_hdr(&self) -> Self::Hdr {
        Rgb::new(self.r.to_hdr(), self.g.to_hdr(), self.b.to_hdr())
    }
}

impl<S> Encodable for Rgba<S>
where
    S: Encodable + Scalar,
    S::Ldr: Scalar,
    S::Hdr: Scalar,
{
    type Ldr = Rgba<S::Ldr>;
    type Hdr = Rgba<S::Hdr>;

    fn to_ldr(&self) -> Self::Ldr {
        Rgba::new(self.r.to_ldr(), self.g.to_ldr(), self.b.to_ldr(), self.a.to_ldr())
    }

    fn to_hdr(&self) -> Self::Hdr {
        Rgba::new(self.r.to_hdr(), self.g.to_hdr(), self.b.to_hdr(), self.a.to_hdr())
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Encode `view` into the file at `path`; the container follows the
/// extension.
///
/// # Panics
/// Panics if the file name has no extension.
pub fn write<T, L>(view: View<'_, T, Extent2, L>, path: impl AsRef<Path>) -> Result<(), CodecError>
where
    T: Encodable,
    L: Layout,
{
    let path = path.as_ref();
    if extension(path).eq_ignore_ascii_case("hdr") {
        if T::FORMAT == PixelFormat::F32 {
            write_direct(view, path)
        } else {
            log::debug!("codec: converting {:?} to f32 for {}", T::FORMAT, path.display());
            write_direct(materialize(view, |p: &T| p.to_hdr()).view(), path)
        }
    } else if matches!(T::FORMAT, PixelFormat::U8 | PixelFormat::U16) {
        write_direct(view, path)
    } else {
        log::debug!("codec: converting {:?} to u8 for {}", T::FORMAT, path.display());
        write_direct(materialize(view, |p: &T| p.to_ldr()).view(), path)
    }
}

/// Text after the final `.` of the file name.
fn extension(path: &Path) -> String {
    let s = path.to_string_lossy();
    let sep = s.rfind(|c| c == '/' || c == std::path::MAIN_SEPARATOR);
    let d = match s.rfind('.') {
        Some(d) if sep.map_or(true, |p| d > p) => d,
        _ => panic!("codec::write: path {s:?} has no file extension"),
    };
    s[d + 1..].to_string()
}

fn color_type(channels: u32, bit_depth: u32) -> Result<::image::ColorType, CodecError> {
    use ::image::ColorType::*;
    Ok(match (channels, bit_depth) {
        (1, 8) => L8,
        (2, 8) => La8,
        (3, 8) => Rgb8,
        (4, 8) => Rgba8,
        (1, 16) => L16,
        (2, 16) => La16,
        (3, 16) => Rgb16,
        (4, 16) => Rgba16,
        (3, 32) => Rgb32F,
        (4, 32) => Rgba32F,
        _ => return Err(CodecError::UnsupportedLayout { channels, bit_depth }),
    })
}

fn materialize<T, D, L, F>(view: View<'_, T, Extent2, L>, f: F) -> Image<D, Extent2>
where
    T: Pixel,
    D: Pixel,
    L: Layout,
    F: Fn(&T) -> D,
{
    let mut out = Image::uninitialized(view.extent());
    view.copy_to_with(&mut out.view_mut(), &map(f));
    out
}

fn write_direct<P: Pixel, L: Layout>(view: View<'_, P, Extent2, L>, path: &Path) -> Result<(), CodecError> {
    let color = color_type(P::CHANNELS, P::BYTES_PER_CHANNEL * 8)?;
    let extent = view.extent();
    let elem_size = std::mem::size_of::<P>() as i32;
    let (w, h) = (extent.width as u32, extent.height as u32);

    if L::KIND == LayoutKind::StridedLinear
        && !view.is_empty()
        && L::is_natural(&view.map(), elem_size, &extent.to_ivec())
    {
        log::debug!("codec: writing {w}x{h} {color:?} from view memory");
        // SAFETY: a natural linear view covers `byte_size` contiguous bytes
        // starting at its data pointer, borrowed for the view's lifetime.
        let bytes = unsafe { std::slice::from_raw_parts(view.data_ptr() as *const u8, view.byte_size() as usize) };
        ::image::save_buffer(path, bytes, w, h, color)?;
    } else {
        log::debug!("codec: repacking {w}x{h} {color:?} before writing");
        let packed: Image<P, Extent2> = Image::from_view(view);
        ::image::save_buffer(path, bytemuck::cast_slice(packed.as_slice()), w, h, color)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        assert_eq!(extension(Path::new("out.png")), "png");
        assert_eq!(extension(Path::new("/tmp/a.b/sky.HDR")), "HDR");
    }

    #[test]
    #[should_panic(expected = "no file extension")]
    fn test_extension_missing() {
        extension(Path::new("/tmp/a.b/noext"));
    }

    #[test]
    fn test_color_type_mapping() {
        assert_eq!(color_type(3, 8).unwrap(), ::image::ColorType::Rgb8);
        assert_eq!(color_type(1, 16).unwrap(), ::image::ColorType::L16);
        assert_eq!(color_type(4, 32).unwrap(), ::image::ColorType::Rgba32F);
        assert!(matches!(
            color_type(1, 32),
            Err(CodecError::UnsupportedLayout { channels: 1, bit_depth: 32 })
        ));
    }

    #[test]
    fn test_encodable_scaling() {
        assert_eq!(65535u16.to_ldr(), 255);
        assert_eq!(257u16.to_ldr(), 1);
        assert_eq!(0.5f32.to_ldr(), 128);
        assert!((255u8.to_hdr() - 1.0).abs() < 1e-6);
        assert_eq!(Rgb::new(1.0f32, 0.0, 2.0).to_ldr(), Rgb::new(255u8, 0, 255));
        assert_eq!([0u16, 65535].to_hdr(), [0.0f32, 1.0]);
    }
}
