// block.rs — Block-compressed 2D storage.
//
// GPU block formats store fixed-size tiles of texels in one opaque unit.
// They cannot be addressed per element, so they get their own read-only
// view that decodes on access instead of handing out references:
//
//   BlockImage<B>        owns Vec<B>, extent in texels
//   BlockView<'a, B>     at(p) -> B::Texel (decoded by value)
//
// BC1 (DXT1) layout, one u64 per 4×4 tile, little endian:
//
//   bits  0..16   colour 0 (RGB565)
//   bits 16..32   colour 1 (RGB565)
//   bits 32..64   16 × 2-bit palette indices, texel (x, y) at 2·(4y + x)
//
//   c0 >  c1:  palette = c0, c1, (2c0 + c1)/3, (c0 + 2c1)/3
//   c0 <= c1:  palette = c0, c1, (c0 + c1)/2, transparent black

use std::fmt::Debug;

use bytemuck::{Pod, Zeroable};

use crate::convert::{ConvertPixel, Converter, DefaultConverter};
use crate::extent::{Extent, Extent2};
use crate::iter::Positions;
use crate::layout::Layout;
use crate::metadata::PixelFormat;
use crate::pixel::{Pixel, Rgba};
use crate::storage::BlockStorage;
use crate::view::ViewMut;

/// A compressed tile of `BLOCK_WIDTH × BLOCK_HEIGHT` texels.
pub trait BlockFormat: Pod + Debug + PartialEq + Send + Sync + 'static {
    const FORMAT: PixelFormat;
    const BLOCK_WIDTH: i32;
    const BLOCK_HEIGHT: i32;

    /// Decoded texel type.
    type Texel: Pixel;

    /// Decode texel `(x, y)` of this tile, both in `[0, BLOCK_*)`.
    fn texel(&self, x: i32, y: i32) -> Self::Texel;
}

// ---------------------------------------------------------------------------
// BC1
// ---------------------------------------------------------------------------

/// One BC1 / DXT1 tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Bc1Block(pub u64);

impl Bc1Block {
    /// Build a tile from two RGB565 endpoints and packed 2-bit indices.
    pub fn new(color0: u16, color1: u16, indices: u32) -> Self {
        let v = color0 as u64 | (color1 as u64) << 16 | (indices as u64) << 32;
        Bc1Block(v.to_le())
    }

    /// Tile where every texel has the same RGB565 colour.
    pub fn solid(color: u16) -> Self {
        Self::new(color, color, 0)
    }

    #[inline]
    fn bits(&self) -> u64 {
        u64::from_le(self.0)
    }

    pub fn color0(&self) -> u16 {
        self.bits() as u16
    }

    pub fn color1(&self) -> u16 {
        (self.bits() >> 16) as u16
    }

    pub fn palette(&self) -> [Rgba<u8>; 4] {
        let (c0, c1) = (self.color0(), self.color1());
        let p0 = rgb565(c0);
        let p1 = rgb565(c1);
        let blend = |w0: u16, w1: u16, d: u16| {
            let f = |a: u8, b: u8| ((a as u16 * w0 + b as u16 * w1) / d) as u8;
            Rgba::new(f(p0.r, p1.r), f(p0.g, p1.g), f(p0.b, p1.b), 255)
        };
        if c0 > c1 {
            [p0, p1, blend(2, 1, 3), blend(1, 2, 3)]
        } else {
            [p0, p1, blend(1, 1, 2), Rgba::new(0, 0, 0, 0)]
        }
    }
}

fn rgb565(c: u16) -> Rgba<u8> {
    let r = ((c >> 11) & 0x1f) as u8;
    let g = ((c >> 5) & 0x3f) as u8;
    let b = (c & 0x1f) as u8;
    Rgba::new(r << 3 | r >> 2, g << 2 | g >> 4, b << 3 | b >> 2, 255)
}

impl BlockFormat for Bc1Block {
    const FORMAT: PixelFormat = PixelFormat::Bc1Unorm;
    const BLOCK_WIDTH: i32 = 4;
    const BLOCK_HEIGHT: i32 = 4;

    type Texel = Rgba<u8>;

    fn texel(&self, x: i32, y: i32) -> Rgba<u8> {
        debug_assert!((0..4).contains(&x) && (0..4).contains(&y));
        let shift = 32 + 2 * (4 * y + x) as u64;
        let index = ((self.bits() >> shift) & 0b11) as usize;
        self.palette()[index]
    }
}

/// Number of tiles needed to cover `extent` texels.
pub fn block_extent<B: BlockFormat>(extent: Extent2) -> Extent2 {
    let div = |n: i32, d: i32| (n + d - 1) / d;
    Extent2::new(
        div(extent.width, B::BLOCK_WIDTH),
        div(extent.height, B::BLOCK_HEIGHT),
    )
}

// ---------------------------------------------------------------------------
// BlockImage
// ---------------------------------------------------------------------------

/// Owning block-compressed 2D image.
#[derive(Debug)]
pub struct BlockImage<B> {
    storage: BlockStorage<B>,
    extent: Extent2,
}

impl<B: BlockFormat> BlockImage<B> {
    pub fn defaulted(extent: Extent2) -> Self {
        let mut storage = BlockStorage::new();
        storage.resize_defaulted(block_extent::<B>(extent).element_count() as usize);
        BlockImage { storage, extent }
    }

    pub fn filled(extent: Extent2, block: B) -> Self {
        let mut storage = BlockStorage::new();
        storage.resize_filled(block_extent::<B>(extent).element_count() as usize, block);
        BlockImage { storage, extent }
    }

    /// Wrap tiles stored row by row.
    ///
    /// # Panics
    /// Panics if `blocks` does not hold exactly the tiles covering `extent`.
    pub fn from_blocks(extent: Extent2, blocks: Vec<B>) -> Self {
        let needed = block_extent::<B>(extent).element_count() as usize;
        assert_eq!(
            blocks.len(),
            needed,
            "{} blocks given, extent {:?} needs {needed}",
            blocks.len(),
            extent
        );
        BlockImage { storage: BlockStorage::from_vec(blocks), extent }
    }

    /// Extent in texels.
    pub fn extent(&self) -> Extent2 {
        self.extent
    }

    pub fn blocks(&self) -> &[B] {
        self.storage.as_slice()
    }

    pub fn blocks_mut(&mut self) -> &mut [B] {
        self.storage.as_mut_slice()
    }

    pub fn view(&self) -> BlockView<'_, B> {
        BlockView::new(self.storage.as_slice(), self.extent)
    }
}

// ---------------------------------------------------------------------------
// BlockView
// ---------------------------------------------------------------------------

/// Read-only, decoding view of block-compressed texels.
#[derive(Debug, Clone, Copy)]
pub struct BlockView<'a, B> {
    blocks: &'a [B],
    extent: Extent2,
    blocks_per_row: i32,
}

impl<'a, B: BlockFormat> BlockView<'a, B> {
    /// # Panics
    /// Panics if `blocks` cannot cover `extent`.
    pub fn new(blocks: &'a [B], extent: Extent2) -> Self {
        let tiles = block_extent::<B>(extent);
        assert!(
            blocks.len() as u64 >= tiles.element_count(),
            "{} blocks cannot cover extent {:?}",
            blocks.len(),
            extent
        );
        BlockView { blocks, extent, blocks_per_row: tiles.width }
    }

    pub fn extent(&self) -> Extent2 {
        self.extent
    }

    pub fn contains(&self, p: [i32; 2]) -> bool {
        p[0] >= 0 && p[1] >= 0 && p[0] < self.extent.width && p[1] < self.extent.height
    }

    /// Decoded texel at `p`.
    ///
    /// # Panics
    /// Panics if `p` is outside the view.
    pub fn at(&self, p: [i32; 2]) -> B::Texel {
        assert!(self.contains(p), "texel {p:?} out of bounds for extent {:?}", self.extent);
        let (bx, by) = (p[0] / B::BLOCK_WIDTH, p[1] / B::BLOCK_HEIGHT);
        let block = &self.blocks[(by * self.blocks_per_row + bx) as usize];
        block.texel(p[0] % B::BLOCK_WIDTH, p[1] % B::BLOCK_HEIGHT)
    }

    pub fn positions(&self) -> Positions<[i32; 2]> {
        Positions::row_major(self.extent.to_ivec())
    }

    /// Decoded texels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = B::Texel> + 'a {
        let view = *self;
        self.positions().map(move |p| view.at(p))
    }

    pub fn copy_to<D, E2, L2>(&self, dst: &mut ViewMut<'_, D, E2, L2>)
    where
        D: Pixel,
        B::Texel: ConvertPixel<D>,
        E2: Extent<Pos = [i32; 2]>,
        L2: Layout,
    {
        self.copy_to_with(dst, &DefaultConverter);
    }

    pub fn copy_to_with<D, E2, L2, C>(&self, dst: &mut ViewMut<'_, D, E2, L2>, converter: &C)
    where
        D: Pixel,
        E2: Extent<Pos = [i32; 2]>,
        L2: Layout,
        C: Converter<B::Texel, D>,
    {
        assert_eq!(
            self.extent.to_ivec(),
            dst.extent().to_ivec(),
            "copy_to: source and destination extents differ"
        );
        for p in self.positions() {
            let texel = self.at(p);
            converter.convert(dst.at_mut(p), &texel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Image;

    const RED: u16 = 0xf800;
    const BLUE: u16 = 0x001f;
    const WHITE: u16 = 0xffff;

    #[test]
    fn test_rgb565_expansion() {
        assert_eq!(rgb565(RED), Rgba::new(255, 0, 0, 255));
        assert_eq!(rgb565(WHITE), Rgba::new(255, 255, 255, 255));
        assert_eq!(rgb565(0), Rgba::new(0, 0, 0, 255));
    }

    #[test]
    fn test_bc1_four_colour_mode() {
        // Texels 0..4 of row 0 use indices 0, 1, 2, 3.
        let b = Bc1Block::new(WHITE, 0, 0b11_10_01_00);
        assert_eq!(b.texel(0, 0), Rgba::new(255, 255, 255, 255));
        assert_eq!(b.texel(1, 0), Rgba::new(0, 0, 0, 255));
        assert_eq!(b.texel(2, 0), Rgba::new(170, 170, 170, 255));
        assert_eq!(b.texel(3, 0), Rgba::new(85, 85, 85, 255));
        assert_eq!(b.texel(0, 1), Rgba::new(255, 255, 255, 255));
    }

    #[test]
    fn test_bc1_three_colour_mode() {
        let b = Bc1Block::new(0, WHITE, 0b11_10_01_00);
        assert_eq!(b.texel(2, 0), Rgba::new(127, 127, 127, 255));
        assert_eq!(b.texel(3, 0), Rgba::new(0, 0, 0, 0));
    }

    #[test]
    fn test_block_image_partial_tiles() {
        let img = BlockImage::from_blocks(
            Extent2::new(6, 3),
            vec![Bc1Block::solid(RED), Bc1Block::solid(BLUE)],
        );
        let v = img.view();
        assert_eq!(v.at([3, 2]), Rgba::new(255, 0, 0, 255));
        assert_eq!(v.at([5, 0]), Rgba::new(0, 0, 255, 255));
        assert_eq!(v.pixels().count(), 18);

        let mut out = Image::<[f32; 4], Extent2>::defaulted(Extent2::new(6, 3));
        v.copy_to(&mut out.view_mut());
        assert!((out[[4, 1]][2] - 1.0).abs() < 1e-6);
        assert!((out[[0, 0]][0] - 1.0).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "blocks given")]
    fn test_from_blocks_count_mismatch() {
        let _ = BlockImage::from_blocks(Extent2::new(8, 8), vec![Bc1Block::default(); 3]);
    }

    #[test]
    fn test_block_storage_sizes() {
        assert_eq!(block_extent::<Bc1Block>(Extent2::new(9, 4)), Extent2::new(3, 1));
        let img = BlockImage::<Bc1Block>::defaulted(Extent2::new(16, 16));
        assert_eq!(img.blocks().len(), 16);
    }
}
