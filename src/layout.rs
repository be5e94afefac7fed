// layout.rs — Memory layout strategies.
//
// A view is "data pointer + extent + map". The map is whatever a layout
// needs to turn an integer position into a byte offset from the pointer.
// Every view transform (subview, mirror, swap, slice) is expressed as
// "shift the pointer by N bytes and produce a new map", so View and ViewMut
// never have to know which layout they are addressing.
//
//   Linear   map = per-axis byte stride
//            offset(p) = Σ p[i]·stride[i]
//
//   ZOrder   map = storage origin + (storage axis, direction) per view axis
//            offset(p) = elem · tiled_morton(origin + dir·p)
//
// The set of layouts is closed: the trait is sealed, because views hand out
// references computed from these offsets and an incorrect third-party map
// would be unsound.

use std::fmt::Debug;

use crate::addressing;
use crate::extent::Coords;
use crate::metadata::{pad4, take, LayoutKind};

mod sealed {
    pub trait Sealed {}
}

/// Addressing strategy of a view or image.
pub trait Layout: sealed::Sealed + Copy + Debug + Default + Send + Sync + 'static {
    const KIND: LayoutKind;

    /// Per-view addressing state for positions of type `P`.
    type Map<P: Coords>: Copy + Debug + PartialEq + Send + Sync + 'static;

    /// Number of elements a buffer needs to hold an image of `extent`.
    fn storage_len<P: Coords>(extent: &P) -> usize;

    /// Map of a freshly allocated image.
    fn natural<P: Coords>(elem_size: i32, extent: &P) -> Self::Map<P>;

    fn is_natural<P: Coords>(map: &Self::Map<P>, elem_size: i32, extent: &P) -> bool;

    /// Byte offset of `p` from the view's data pointer.
    fn offset<P: Coords>(map: &Self::Map<P>, p: &P) -> i64;

    /// Lowest and highest byte offset touched by positions in `extent`.
    fn offset_range<P: Coords>(map: &Self::Map<P>, extent: &P) -> Option<(i64, i64)>;

    /// `true` iff no two positions in `extent` share an element.
    fn is_injective<P: Coords>(map: &Self::Map<P>, elem_size: i32, extent: &P) -> bool;

    /// Re-anchor at `start`. Returns the pointer shift and the new map.
    fn subview<P: Coords>(map: &Self::Map<P>, start: &P) -> (i64, Self::Map<P>);

    /// Reverse `axis` of a view with `extent`.
    fn mirrored<P: Coords>(map: &Self::Map<P>, extent: &P, axis: usize) -> (i64, Self::Map<P>);

    fn swapped<P: Coords>(map: &Self::Map<P>, a0: usize, a1: usize) -> Self::Map<P>;

    /// Fix `axis` at `index` and drop it.
    fn sliced<P: Coords, Q: Coords>(map: &Self::Map<P>, axis: usize, index: i32) -> (i64, Self::Map<Q>);

    /// Axis permutation, fastest-varying in memory first.
    fn iteration_order<P: Coords>(map: &Self::Map<P>) -> P;

    /// Strides recorded in metadata for a natural image.
    fn encode_strides<P: Coords>(map: &Self::Map<P>) -> [i32; 4];

    /// Rebuild a map from metadata strides, `None` if this layout cannot
    /// address them.
    fn decode_strides<P: Coords>(strides: &[i32; 4], elem_size: i32, extent: &P) -> Option<Self::Map<P>>;
}

// ---------------------------------------------------------------------------
// Linear
// ---------------------------------------------------------------------------

/// Strided row-major layout. The map is the per-axis byte stride, which may
/// be negative after mirroring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Linear;

impl sealed::Sealed for Linear {}

impl Layout for Linear {
    const KIND: LayoutKind = LayoutKind::StridedLinear;

    type Map<P: Coords> = P;

    fn storage_len<P: Coords>(extent: &P) -> usize {
        extent.as_ref().iter().map(|&e| e.max(0) as usize).product()
    }

    fn natural<P: Coords>(elem_size: i32, extent: &P) -> P {
        addressing::natural_stride_for(elem_size, extent)
    }

    fn is_natural<P: Coords>(stride: &P, elem_size: i32, extent: &P) -> bool {
        addressing::is_natural_stride(stride, elem_size, extent)
    }

    #[inline]
    fn offset<P: Coords>(stride: &P, p: &P) -> i64 {
        addressing::strided_offset(p, stride)
    }

    fn offset_range<P: Coords>(stride: &P, extent: &P) -> Option<(i64, i64)> {
        addressing::offset_range(stride, extent)
    }

    fn is_injective<P: Coords>(stride: &P, elem_size: i32, extent: &P) -> bool {
        addressing::is_non_overlapping(stride, extent, elem_size)
    }

    fn subview<P: Coords>(stride: &P, start: &P) -> (i64, P) {
        (addressing::strided_offset(start, stride), *stride)
    }

    fn mirrored<P: Coords>(stride: &P, extent: &P, axis: usize) -> (i64, P) {
        let last = (extent[axis] - 1).max(0) as i64;
        let mut out = *stride;
        out[axis] = -stride[axis];
        (last * stride[axis] as i64, out)
    }

    fn swapped<P: Coords>(stride: &P, a0: usize, a1: usize) -> P {
        let mut out = *stride;
        out.as_mut().swap(a0, a1);
        out
    }

    fn sliced<P: Coords, Q: Coords>(stride: &P, axis: usize, index: i32) -> (i64, Q) {
        (
            index as i64 * stride[axis] as i64,
            addressing::remove_axis(stride, axis),
        )
    }

    fn iteration_order<P: Coords>(stride: &P) -> P {
        addressing::stride_order(stride)
    }

    fn encode_strides<P: Coords>(stride: &P) -> [i32; 4] {
        pad4(stride)
    }

    fn decode_strides<P: Coords>(strides: &[i32; 4], _elem_size: i32, _extent: &P) -> Option<P> {
        Some(take(strides))
    }
}

// ---------------------------------------------------------------------------
// ZOrder
// ---------------------------------------------------------------------------
// Elements are stored in square Morton tiles. The tile side is the largest
// power of two that every storage axis needs, 2^k with
// k = min_i ceil(log2 extent[i]). Inside a tile the storage index is the bit
// interleave of the low k bits of each coordinate, storage axis 0 in the
// least significant bit. Tiles are laid out row-major above that, axis 0
// fastest, so a long thin image degrades to plain row-major order instead
// of a sparse curve.
//
//   2D, 4×4:   x →               2D, 8×2 (tile side 2):
//        y   0  1  4  5               0  1  4  5  8  9 12 13
//        ↓   2  3  6  7               2  3  6  7 10 11 14 15
//            8  9 12 13
//           10 11 14 15
//
// Views never move the data pointer. A view keeps the storage coordinate of
// its position 0 (`origin`) and, per view axis, which storage axis it walks
// and in which direction. Subview moves the origin, mirror flips a
// direction, swap permutes the axis table, slice drops an entry.
//
// Non-power-of-two extents pad each axis up to whole tiles, which keeps the
// buffer within a small constant factor of the element count.

/// Morton-order layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZOrder;

impl sealed::Sealed for ZOrder {}

/// Addressing state of a Z-order view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZMap<P> {
    elem_size: i32,
    /// Dimensionality of the underlying storage (fixed at allocation).
    storage_dims: u8,
    /// log2 of the tile side.
    tile_bits: u8,
    /// Number of tiles along each storage axis.
    tiles: [i32; 4],
    origin: [i32; 4],
    axis: P,
    dir: P,
}

/// Interleave the low bits of `c[..dims]`, `c[0]` in bit 0.
pub fn morton(c: &[i32; 4], dims: usize) -> u64 {
    if dims == 0 {
        return 0;
    }
    let bits = (64 / dims).min(31);
    let mut out = 0u64;
    for bit in 0..bits {
        for (i, &v) in c.iter().enumerate().take(dims) {
            out |= (((v as u64) >> bit) & 1) << (bit * dims + i);
        }
    }
    out
}

fn ceil_log2(e: i32) -> u32 {
    if e <= 1 {
        0
    } else {
        32 - ((e - 1) as u32).leading_zeros()
    }
}

/// Tile side exponent and tile grid for a storage box of `extent`.
fn tiling<P: Coords>(extent: &P) -> (u32, [i32; 4]) {
    let bits = (0..P::DIMS).map(|i| ceil_log2(extent[i])).min().unwrap_or(0);
    let mut tiles = [1i32; 4];
    for i in 0..P::DIMS {
        tiles[i] = if extent[i] <= 0 { 0 } else { ((extent[i] - 1) >> bits) + 1 };
    }
    (bits, tiles)
}

impl<P: Coords> ZMap<P> {
    /// Element index of storage coordinate `s`.
    fn storage_index(&self, s: &[i32; 4]) -> u64 {
        let dims = self.storage_dims as usize;
        let bits = self.tile_bits as u32;
        let mask = ((1u32 << bits) - 1) as i32;
        let mut inner = [0i32; 4];
        let mut tile = 0u64;
        for i in (0..dims).rev() {
            tile = tile * self.tiles[i] as u64 + (s[i] >> bits) as u64;
            inner[i] = s[i] & mask;
        }
        (tile << (bits as usize * dims)) | morton(&inner, dims)
    }

    fn storage_coord(&self, p: &P) -> [i32; 4] {
        let mut s = self.origin;
        for i in 0..P::DIMS {
            s[self.axis[i] as usize] += self.dir[i] * p[i];
        }
        s
    }
}

impl Layout for ZOrder {
    const KIND: LayoutKind = LayoutKind::ZOrder;

    type Map<P: Coords> = ZMap<P>;

    fn storage_len<P: Coords>(extent: &P) -> usize {
        if addressing::is_any_zero(extent) {
            return 0;
        }
        let (bits, tiles) = tiling(extent);
        let count: usize = tiles[..P::DIMS].iter().map(|&t| t as usize).product();
        count << (bits as usize * P::DIMS)
    }

    fn natural<P: Coords>(elem_size: i32, extent: &P) -> ZMap<P> {
        let (bits, tiles) = tiling(extent);
        let mut axis = P::splat(0);
        for i in 0..P::DIMS {
            axis[i] = i as i32;
        }
        ZMap {
            elem_size,
            storage_dims: P::DIMS as u8,
            tile_bits: bits as u8,
            tiles,
            origin: [0; 4],
            axis,
            dir: P::splat(1),
        }
    }

    fn is_natural<P: Coords>(map: &ZMap<P>, elem_size: i32, extent: &P) -> bool {
        *map == Self::natural(elem_size, extent)
    }

    #[inline]
    fn offset<P: Coords>(map: &ZMap<P>, p: &P) -> i64 {
        let s = map.storage_coord(p);
        map.elem_size as i64 * map.storage_index(&s) as i64
    }

    fn offset_range<P: Coords>(map: &ZMap<P>, extent: &P) -> Option<(i64, i64)> {
        if addressing::is_any_zero(extent) {
            return None;
        }
        // The index is monotone in every storage coordinate (a tile step
        // outweighs any in-tile offset), so the extremes sit at the low and
        // high corners of the storage box.
        let mut lo = map.origin;
        let mut hi = map.origin;
        for i in 0..P::DIMS {
            let a = map.axis[i] as usize;
            let span = map.dir[i] * (extent[i] - 1);
            lo[a] += span.min(0);
            hi[a] += span.max(0);
        }
        let elem = map.elem_size as i64;
        Some((elem * map.storage_index(&lo) as i64, elem * map.storage_index(&hi) as i64))
    }

    fn is_injective<P: Coords>(_map: &ZMap<P>, _elem_size: i32, _extent: &P) -> bool {
        // Distinct view axes always walk distinct storage axes.
        true
    }

    fn subview<P: Coords>(map: &ZMap<P>, start: &P) -> (i64, ZMap<P>) {
        let mut out = *map;
        out.origin = map.storage_coord(start);
        (0, out)
    }

    fn mirrored<P: Coords>(map: &ZMap<P>, extent: &P, axis: usize) -> (i64, ZMap<P>) {
        let mut out = *map;
        let a = map.axis[axis] as usize;
        out.origin[a] += map.dir[axis] * (extent[axis] - 1).max(0);
        out.dir[axis] = -map.dir[axis];
        (0, out)
    }

    fn swapped<P: Coords>(map: &ZMap<P>, a0: usize, a1: usize) -> ZMap<P> {
        let mut out = *map;
        out.axis.as_mut().swap(a0, a1);
        out.dir.as_mut().swap(a0, a1);
        out
    }

    fn sliced<P: Coords, Q: Coords>(map: &ZMap<P>, axis: usize, index: i32) -> (i64, ZMap<Q>) {
        let mut origin = map.origin;
        origin[map.axis[axis] as usize] += map.dir[axis] * index;
        (
            0,
            ZMap {
                elem_size: map.elem_size,
                storage_dims: map.storage_dims,
                tile_bits: map.tile_bits,
                tiles: map.tiles,
                origin,
                axis: addressing::remove_axis(&map.axis, axis),
                dir: addressing::remove_axis(&map.dir, axis),
            },
        )
    }

    fn iteration_order<P: Coords>(map: &ZMap<P>) -> P {
        // Lower storage axes occupy lower bits, both inside a tile and in
        // the tile grid.
        addressing::stride_order(&map.axis)
    }

    fn encode_strides<P: Coords>(map: &ZMap<P>) -> [i32; 4] {
        let mut out = [0i32; 4];
        out[0] = map.elem_size;
        out
    }

    fn decode_strides<P: Coords>(strides: &[i32; 4], elem_size: i32, extent: &P) -> Option<ZMap<P>> {
        let natural = Self::natural(elem_size, extent);
        (Self::encode_strides(&natural) == *strides).then_some(natural)
    }
}
