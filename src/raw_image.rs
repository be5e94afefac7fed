// raw_image.rs — Type-erased image: metadata + aligned byte buffer.
//
// A RawImage is what crosses boundaries that cannot carry Rust types (files,
// sockets, plugin interfaces). It can be turned back into typed views when
// the static descriptor of the requested view matches the stored metadata:
//
//   let raw = RawImage::from_image(&img);
//   let bytes = raw.to_bytes();
//   let back = RawImage::from_bytes(&bytes)?;
//   let v = back.view_as::<View<u8, Extent2>>();
//
// The buffer is a Vec<u64> underneath, so its start is 8-byte aligned and
// every Pixel type may alias it. Stored strides may be negative; the view's
// data pointer is then placed so the lowest addressed byte is the first
// byte of the buffer.
//
// Serialized form: 44-byte header, u64 LE payload length, payload.

use thiserror::Error;

use crate::block::{block_extent, BlockFormat, BlockImage, BlockView};
use crate::extent::{Extent, Extent2};
use crate::image::Image;
use crate::layout::{Layout, Linear};
use crate::metadata::{take, ImageKind, ImageMetadata};
use crate::pixel::Pixel;
use crate::view::{View, ViewMut};

/// Errors from decoding serialized raw images.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RawImageError {
    #[error("input truncated: need {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },

    #[error("unknown {field} tag {value}")]
    UnknownTag { field: &'static str, value: u8 },

    #[error("payload is {got} bytes, header announces {expected}")]
    PayloadSize { expected: usize, got: usize },
}

// ---------------------------------------------------------------------------
// AlignedBuffer
// ---------------------------------------------------------------------------

/// Byte buffer whose start is aligned to 8 bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignedBuffer {
    words: Vec<u64>,
    len: usize,
}

impl AlignedBuffer {
    pub const ALIGN: usize = std::mem::align_of::<u64>();

    pub fn zeroed(len: usize) -> Self {
        AlignedBuffer { words: vec![0u64; len.div_ceil(8)], len }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut buf = Self::zeroed(bytes.len());
        buf.as_bytes_mut().copy_from_slice(bytes);
        buf
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<u64, u8>(&self.words)[..self.len]
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let len = self.len;
        &mut bytemuck::cast_slice_mut::<u64, u8>(&mut self.words)[..len]
    }

    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.words.as_ptr() as *const u8
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.words.as_mut_ptr() as *mut u8
    }
}

// ---------------------------------------------------------------------------
// ImageShape
// ---------------------------------------------------------------------------

/// Static shape of a typed image or view: the key for reinterpreting a
/// RawImage.
pub trait ImageShape {
    type Pixel: Pixel;
    type Extent: Extent;
    type Layout: Layout;

    fn descriptor() -> ImageMetadata {
        ImageMetadata::descriptor::<Self::Pixel, Self::Extent, Self::Layout>()
    }
}

impl<'a, T: Pixel, E: Extent, L: Layout> ImageShape for View<'a, T, E, L> {
    type Pixel = T;
    type Extent = E;
    type Layout = L;
}

impl<'a, T: Pixel, E: Extent, L: Layout> ImageShape for ViewMut<'a, T, E, L> {
    type Pixel = T;
    type Extent = E;
    type Layout = L;
}

impl<T: Pixel, E: Extent, L: Layout> ImageShape for Image<T, E, L> {
    type Pixel = T;
    type Extent = E;
    type Layout = L;
}

// ---------------------------------------------------------------------------
// RawImage
// ---------------------------------------------------------------------------

/// Metadata plus the bytes it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    metadata: ImageMetadata,
    buffer: AlignedBuffer,
}

/// Where a typed view lands inside the buffer.
struct Placement<M> {
    base: usize,
    map: M,
}

impl RawImage {
    // --- Construction ---

    /// Copy `bytes` into a new raw image described by `metadata`.
    pub fn from_parts(metadata: ImageMetadata, bytes: &[u8]) -> Self {
        RawImage { metadata, buffer: AlignedBuffer::from_bytes(bytes) }
    }

    /// Natural-layout snapshot of any view.
    pub fn from_view<T: Pixel, E: Extent, L: Layout>(view: View<'_, T, E, L>) -> Self {
        let extent = view.extent();
        let elem = std::mem::size_of::<T>();
        let map = L::natural(elem as i32, &extent.to_ivec());
        let mut buffer = AlignedBuffer::zeroed(L::storage_len(&extent.to_ivec()) * elem);
        {
            // SAFETY: the buffer is 8-byte aligned, sized for the natural
            // layout and exclusively borrowed for this block.
            let mut dst: ViewMut<'_, T, E, L> =
                unsafe { ViewMut::from_raw_parts(buffer.as_mut_ptr() as *mut T, extent, map) };
            let copy = crate::convert::in_place(|d: &mut T, s: &T| *d = *s);
            view.copy_to_with(&mut dst, &copy);
        }
        let metadata = ImageMetadata::describe::<T, E, L>(&extent, L::encode_strides(&map));
        log::debug!(
            "raw image: snapshot {:?} {:?} ({} bytes)",
            metadata.kind,
            metadata.extents,
            buffer.len()
        );
        RawImage { metadata, buffer }
    }

    pub fn from_image<T: Pixel, E: Extent, L: Layout>(image: &Image<T, E, L>) -> Self {
        Self::from_view(image.view())
    }

    /// Raw copy of a block-compressed image (tiles stored row by row).
    pub fn from_block_image<B: BlockFormat>(image: &BlockImage<B>) -> Self {
        let metadata = block_metadata::<B>(image.extent());
        RawImage::from_parts(metadata, bytemuck::cast_slice(image.blocks()))
    }

    // --- Accessors ---

    pub fn metadata(&self) -> &ImageMetadata {
        &self.metadata
    }

    pub fn bytes(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    pub fn buffer(&self) -> &AlignedBuffer {
        &self.buffer
    }

    // --- Reinterpretation ---

    /// `true` iff the metadata matches the static shape of `V`.
    pub fn can_view_as<V: ImageShape>(&self) -> bool {
        self.placement::<V::Pixel, V::Extent, V::Layout>().is_some()
    }

    /// Read-only typed view of the buffer.
    ///
    /// # Panics
    /// Panics if the metadata does not match `V`, the buffer does not cover
    /// every addressed byte, or strides break the pixel alignment.
    pub fn view_as<V: ImageShape>(&self) -> View<'_, V::Pixel, V::Extent, V::Layout> {
        let (extent, placement) = self.checked_placement::<V::Pixel, V::Extent, V::Layout>();
        log::debug!("raw image: viewing {:?} as {}", self.metadata.kind, std::any::type_name::<V::Pixel>());
        // SAFETY: `checked_placement` verified coverage and alignment; the
        // view borrows `self` for its lifetime.
        unsafe {
            View::from_raw_parts(
                self.buffer.as_ptr().add(placement.base) as *const V::Pixel,
                extent,
                placement.map,
            )
        }
    }

    /// Mutable typed view of the buffer.
    ///
    /// # Panics
    /// As `view_as`, and also if two positions would share an element.
    pub fn view_as_mut<V: ImageShape>(&mut self) -> ViewMut<'_, V::Pixel, V::Extent, V::Layout> {
        let (extent, placement) = self.checked_placement::<V::Pixel, V::Extent, V::Layout>();
        let elem = std::mem::size_of::<V::Pixel>() as i32;
        assert!(
            V::Layout::is_injective(&placement.map, elem, &extent.to_ivec()),
            "cannot view raw image mutably: strides {:?} overlap",
            self.metadata.strides
        );
        log::debug!(
            "raw image: viewing {:?} mutably as {}",
            self.metadata.kind,
            std::any::type_name::<V::Pixel>()
        );
        // SAFETY: as in `view_as`, plus the map is injective and `self` is
        // borrowed exclusively.
        unsafe {
            ViewMut::from_raw_parts(
                self.buffer.as_mut_ptr().add(placement.base) as *mut V::Pixel,
                extent,
                placement.map,
            )
        }
    }

    /// `true` iff `convert_to::<I>()` would succeed.
    pub fn can_convert_to<I: ImageShape>(&self) -> bool {
        self.can_view_as::<I>()
    }

    /// Copy into a freshly allocated image with a natural layout.
    ///
    /// # Panics
    /// Panics if the metadata does not match `I`.
    pub fn convert_to<I: ImageShape>(&self) -> Image<I::Pixel, I::Extent, I::Layout> {
        log::debug!(
            "raw image: converting {:?} to {}",
            self.metadata.kind,
            std::any::type_name::<I::Pixel>()
        );
        Image::from_view(self.view_as::<I>())
    }

    // --- Block-compressed access ---

    pub fn can_view_blocks_as<B: BlockFormat>(&self) -> bool {
        let md = &self.metadata;
        if md.kind != ImageKind::Image2D || md.extents[0] < 0 || md.extents[1] < 0 {
            return false;
        }
        let extent: Extent2 = md.extent();
        let expected = block_metadata::<B>(extent);
        let tiles = block_extent::<B>(extent).element_count() as usize;
        *md == expected && self.buffer.len() == tiles * std::mem::size_of::<B>()
    }

    /// # Panics
    /// Panics if the metadata does not describe `B` tiles.
    pub fn block_view_as<B: BlockFormat>(&self) -> BlockView<'_, B> {
        assert!(
            self.can_view_blocks_as::<B>(),
            "cannot view raw image {:?} as {} blocks",
            self.metadata.format,
            std::any::type_name::<B>()
        );
        BlockView::new(bytemuck::cast_slice(self.buffer.as_bytes()), self.metadata.extent())
    }

    // --- Serialization ---

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(ImageMetadata::HEADER_LEN + 8 + self.buffer.len());
        out.extend_from_slice(&self.metadata.to_header_bytes());
        out.extend_from_slice(&(self.buffer.len() as u64).to_le_bytes());
        out.extend_from_slice(self.buffer.as_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RawImageError> {
        let metadata = ImageMetadata::from_header_bytes(bytes)?;
        let start = ImageMetadata::HEADER_LEN + 8;
        if bytes.len() < start {
            return Err(RawImageError::Truncated { needed: start, got: bytes.len() });
        }
        let mut len = [0u8; 8];
        len.copy_from_slice(&bytes[ImageMetadata::HEADER_LEN..start]);
        let expected = u64::from_le_bytes(len) as usize;
        let payload = &bytes[start..];
        if payload.len() != expected {
            return Err(RawImageError::PayloadSize { expected, got: payload.len() });
        }
        Ok(RawImage::from_parts(metadata, payload))
    }

    // --- Internal helpers ---

    /// Extent and buffer placement for a `T/E/L` view, `None` if the
    /// metadata or buffer cannot support it.
    fn placement<T: Pixel, E: Extent, L: Layout>(&self) -> Option<(E, Placement<L::Map<E::Pos>>)> {
        let md = &self.metadata;
        if !md.is_structurally_compatible(&ImageMetadata::descriptor::<T, E, L>()) {
            return None;
        }
        let ivec: E::Pos = take(&md.extents);
        if !E::is_valid_ivec(&ivec) {
            return None;
        }
        let elem = std::mem::size_of::<T>() as i32;
        let map = L::decode_strides(&md.strides, elem, &ivec)?;

        let align = std::mem::align_of::<T>() as i64;
        if md.strides.iter().any(|&s| s as i64 % align != 0) {
            return None;
        }

        let base = match L::offset_range(&map, &ivec) {
            None => 0,
            Some((lo, hi)) => {
                let base = -lo;
                if base % align != 0 || hi + base + elem as i64 > self.buffer.len() as i64 {
                    return None;
                }
                base as usize
            }
        };
        Some((E::from_ivec(ivec), Placement { base, map }))
    }

    fn checked_placement<T: Pixel, E: Extent, L: Layout>(&self) -> (E, Placement<L::Map<E::Pos>>) {
        let md = &self.metadata;
        match self.placement::<T, E, L>() {
            Some(found) => found,
            None => panic!(
                "cannot view raw image ({:?} {:?} {:?} ×{}, extents {:?}, strides {:?}, {} bytes) as {} {:?} {:?}",
                md.kind,
                md.layout,
                md.format,
                md.channels,
                md.extents,
                md.strides,
                self.buffer.len(),
                std::any::type_name::<T>(),
                E::KIND,
                L::KIND,
            ),
        }
    }
}

fn block_metadata<B: BlockFormat>(extent: Extent2) -> ImageMetadata {
    let tiles = block_extent::<B>(extent);
    let size = std::mem::size_of::<B>() as i32;
    ImageMetadata {
        kind: ImageKind::Image2D,
        layout: Linear::KIND,
        format: B::FORMAT,
        channels: <B::Texel as Pixel>::CHANNELS,
        space: <B::Texel as Pixel>::SPACE,
        mip_levels: 1,
        extents: [extent.width, extent.height, 0, 0],
        strides: [size, size * tiles.width, 0, 0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Bc1Block;
    use crate::extent::Extent3;
    use crate::layout::ZOrder;

    #[test]
    fn test_aligned_buffer() {
        let buf = AlignedBuffer::from_bytes(&[1, 2, 3, 4, 5]);
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.as_bytes(), &[1, 2, 3, 4, 5]);
        assert_eq!(buf.as_ptr() as usize % AlignedBuffer::ALIGN, 0);
    }

    #[test]
    fn test_negative_stride_base_placement() {
        // 3×2 u16 image stored bottom row first: stride y = -6.
        let bytes: Vec<u8> = [3u16, 4, 5, 0, 1, 2]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let md = ImageMetadata::describe::<u16, Extent2, Linear>(&Extent2::new(3, 2), [2, -6, 0, 0]);
        let raw = RawImage::from_parts(md, &bytes);
        let v = raw.view_as::<View<u16, Extent2>>();
        let got: Vec<u16> = (0..2).flat_map(|y| (0..3).map(move |x| v[[x, y]])).collect();
        assert_eq!(got, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_rejects_short_buffer() {
        let md = ImageMetadata::describe::<u8, Extent2, Linear>(&Extent2::new(4, 4), [1, 4, 0, 0]);
        let raw = RawImage::from_parts(md, &[0u8; 15]);
        assert!(!raw.can_view_as::<View<u8, Extent2>>());
    }

    #[test]
    fn test_rejects_misaligned_stride() {
        let md = ImageMetadata::describe::<u32, Extent2, Linear>(&Extent2::new(2, 2), [4, 10, 0, 0]);
        let raw = RawImage::from_parts(md, &[0u8; 32]);
        assert!(!raw.can_view_as::<View<u32, Extent2>>());
    }

    #[test]
    #[should_panic(expected = "overlap")]
    fn test_view_as_mut_rejects_overlap() {
        let md = ImageMetadata::describe::<u8, Extent2, Linear>(&Extent2::new(4, 2), [1, 2, 0, 0]);
        let mut raw = RawImage::from_parts(md, &[0u8; 8]);
        assert!(raw.can_view_as::<View<u8, Extent2>>());
        let _ = raw.view_as_mut::<ViewMut<u8, Extent2>>();
    }

    #[test]
    fn test_zorder_snapshot_roundtrip() {
        let mut img = Image::<u8, Extent3, ZOrder>::defaulted(Extent3::new(3, 2, 2));
        for (p, v) in img.view_mut().entries_mut() {
            *v = (p[0] + 3 * p[1] + 6 * p[2]) as u8;
        }
        let raw = RawImage::from_image(&img);
        assert_eq!(raw.metadata().layout, crate::metadata::LayoutKind::ZOrder);
        assert!(!raw.can_view_as::<View<u8, Extent3>>());
        let back = raw.convert_to::<Image<u8, Extent3, ZOrder>>();
        assert_eq!(back[[2, 1, 1]], 11);
    }

    #[test]
    fn test_block_roundtrip() {
        let img = BlockImage::from_blocks(Extent2::new(4, 8), vec![Bc1Block::solid(0xf800); 2]);
        let raw = RawImage::from_bytes(&RawImage::from_block_image(&img).to_bytes())
            .expect("valid serialized image");
        assert!(raw.can_view_blocks_as::<Bc1Block>());
        assert!(!raw.can_view_as::<View<u8, Extent2>>());
        assert_eq!(raw.block_view_as::<Bc1Block>().at([1, 6]).r, 255);
    }

    #[test]
    fn test_from_bytes_errors() {
        assert!(matches!(
            RawImage::from_bytes(&[0u8; 10]),
            Err(RawImageError::Truncated { needed: 44, got: 10 })
        ));
        let raw = RawImage::from_image(&Image::from_vec(Extent2::new(2, 1), vec![1u8, 2]));
        let mut bytes = raw.to_bytes();
        bytes.pop();
        assert_eq!(
            RawImage::from_bytes(&bytes),
            Err(RawImageError::PayloadSize { expected: 2, got: 1 })
        );
    }
}
