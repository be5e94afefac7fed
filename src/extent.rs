// extent.rs — Shape descriptors for every image topology.
//
// An extent answers "how many elements along each axis". The addressing
// layer never looks at the named fields; it works on the integer tuple
// returned by `to_ivec()`, so one generic View can address a 1D strip, a
// 2D array texture or a cube map with the same code.
//
//   Extent1       [width]
//   Extent2       [width, height]
//   Extent3       [width, height, depth]
//   Extent1Array  [width, layers]
//   Extent2Array  [width, height, layers]
//   ExtentCube    [size, size, 6]
//
// Positions and strides are plain `[i32; N]` arrays. `Coords` is the small
// trait that lets generic code talk about "an N-tuple" without const
// generic arithmetic (which stable Rust does not have).

use std::fmt::Debug;
use std::ops::{Index, IndexMut};

use crate::metadata::ImageKind;

// ---------------------------------------------------------------------------
// Coords
// ---------------------------------------------------------------------------

/// Fixed-size integer tuple used for positions, extents and strides.
pub trait Coords:
    Copy
    + Debug
    + Eq
    + Index<usize, Output = i32>
    + IndexMut<usize>
    + AsRef<[i32]>
    + AsMut<[i32]>
    + Send
    + Sync
    + 'static
{
    /// Number of axes.
    const DIMS: usize;

    /// Matching real-valued tuple (fractional sample positions).
    type Real: Copy + Debug + PartialEq + Index<usize, Output = f32> + IndexMut<usize> + AsRef<[f32]>;

    fn splat(v: i32) -> Self;

    fn splat_real(v: f32) -> Self::Real;
}

impl<const N: usize> Coords for [i32; N] {
    const DIMS: usize = N;

    type Real = [f32; N];

    #[inline]
    fn splat(v: i32) -> Self {
        [v; N]
    }

    #[inline]
    fn splat_real(v: f32) -> [f32; N] {
        [v; N]
    }
}

// ---------------------------------------------------------------------------
// Extent trait
// ---------------------------------------------------------------------------

/// Per-axis size descriptor of an image topology.
pub trait Extent: Copy + Debug + PartialEq + Send + Sync + 'static {
    /// Position/stride tuple with one component per axis.
    type Pos: Coords;

    /// Image kind recorded in metadata for this topology.
    const KIND: ImageKind;

    fn to_ivec(&self) -> Self::Pos;

    fn from_ivec(v: Self::Pos) -> Self;

    /// `true` iff `from_ivec(v)` would accept `v`.
    fn is_valid_ivec(v: &Self::Pos) -> bool {
        v.as_ref().iter().all(|&e| e >= 0)
    }

    /// Total number of elements (product of all axes).
    fn element_count(&self) -> u64 {
        self.to_ivec()
            .as_ref()
            .iter()
            .map(|&e| e.max(0) as u64)
            .product()
    }
}

#[inline]
fn assert_non_negative(v: &[i32]) {
    assert!(
        v.iter().all(|&e| e >= 0),
        "extent {v:?} must not have negative sizes"
    );
}

// ---------------------------------------------------------------------------
// Concrete extents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Extent1 {
    pub width: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Extent2 {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Extent3 {
    pub width: i32,
    pub height: i32,
    pub depth: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Extent1Array {
    pub width: i32,
    pub layers: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Extent2Array {
    pub width: i32,
    pub height: i32,
    pub layers: i32,
}

/// Six square faces of `size × size`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ExtentCube {
    pub size: i32,
}

impl Extent1 {
    pub fn new(width: i32) -> Self {
        Self::from_ivec([width])
    }
}

impl Extent2 {
    pub fn new(width: i32, height: i32) -> Self {
        Self::from_ivec([width, height])
    }
}

impl Extent3 {
    pub fn new(width: i32, height: i32, depth: i32) -> Self {
        Self::from_ivec([width, height, depth])
    }
}

impl Extent1Array {
    pub fn new(width: i32, layers: i32) -> Self {
        Self::from_ivec([width, layers])
    }
}

impl Extent2Array {
    pub fn new(width: i32, height: i32, layers: i32) -> Self {
        Self::from_ivec([width, height, layers])
    }
}

impl ExtentCube {
    /// Number of faces of every cube map.
    pub const FACES: i32 = 6;

    pub fn new(size: i32) -> Self {
        assert!(size >= 0, "cube size {size} must not be negative");
        ExtentCube { size }
    }
}

impl Extent for Extent1 {
    type Pos = [i32; 1];
    const KIND: ImageKind = ImageKind::Image1D;

    fn to_ivec(&self) -> [i32; 1] {
        [self.width]
    }

    fn from_ivec(v: [i32; 1]) -> Self {
        assert_non_negative(&v);
        Extent1 { width: v[0] }
    }
}

impl Extent for Extent2 {
    type Pos = [i32; 2];
    const KIND: ImageKind = ImageKind::Image2D;

    fn to_ivec(&self) -> [i32; 2] {
        [self.width, self.height]
    }

    fn from_ivec(v: [i32; 2]) -> Self {
        assert_non_negative(&v);
        Extent2 { width: v[0], height: v[1] }
    }
}

impl Extent for Extent3 {
    type Pos = [i32; 3];
    const KIND: ImageKind = ImageKind::Image3D;

    fn to_ivec(&self) -> [i32; 3] {
        [self.width, self.height, self.depth]
    }

    fn from_ivec(v: [i32; 3]) -> Self {
        assert_non_negative(&v);
        Extent3 { width: v[0], height: v[1], depth: v[2] }
    }
}

impl Extent for Extent1Array {
    type Pos = [i32; 2];
    const KIND: ImageKind = ImageKind::Image1DArray;

    fn to_ivec(&self) -> [i32; 2] {
        [self.width, self.layers]
    }

    fn from_ivec(v: [i32; 2]) -> Self {
        assert_non_negative(&v);
        Extent1Array { width: v[0], layers: v[1] }
    }
}

impl Extent for Extent2Array {
    type Pos = [i32; 3];
    const KIND: ImageKind = ImageKind::Image2DArray;

    fn to_ivec(&self) -> [i32; 3] {
        [self.width, self.height, self.layers]
    }

    fn from_ivec(v: [i32; 3]) -> Self {
        assert_non_negative(&v);
        Extent2Array { width: v[0], height: v[1], layers: v[2] }
    }
}

impl Extent for ExtentCube {
    type Pos = [i32; 3];
    const KIND: ImageKind = ImageKind::ImageCube;

    fn to_ivec(&self) -> [i32; 3] {
        [self.size, self.size, Self::FACES]
    }

    fn is_valid_ivec(v: &[i32; 3]) -> bool {
        v[0] >= 0 && v[0] == v[1] && v[2] == Self::FACES
    }

    fn from_ivec(v: [i32; 3]) -> Self {
        assert_non_negative(&v);
        assert!(v[0] == v[1], "cube maps are always square, got {}×{}", v[0], v[1]);
        assert!(v[2] == Self::FACES, "cube maps have 6 faces, got {}", v[2]);
        ExtentCube { size: v[0] }
    }
}

// ---------------------------------------------------------------------------
// Slicing table
// ---------------------------------------------------------------------------
// Fixing one axis of a view yields a view of one lower dimensionality. Only
// the pairs listed here have a meaningful lower topology; slicing any other
// (extent, axis) pair fails to compile because the bound is not satisfied.

/// Extents that can be sliced along `AXIS`, and the resulting extent.
pub trait SliceAt<const AXIS: usize>: Extent {
    type Sliced: Extent;
}

impl SliceAt<0> for Extent2 {
    type Sliced = Extent1;
}
impl SliceAt<1> for Extent2 {
    type Sliced = Extent1;
}

impl SliceAt<0> for Extent3 {
    type Sliced = Extent2;
}
impl SliceAt<1> for Extent3 {
    type Sliced = Extent2;
}
impl SliceAt<2> for Extent3 {
    type Sliced = Extent2;
}

impl SliceAt<0> for Extent1Array {
    type Sliced = Extent1;
}
impl SliceAt<1> for Extent1Array {
    type Sliced = Extent1;
}

impl SliceAt<0> for Extent2Array {
    type Sliced = Extent1Array;
}
impl SliceAt<1> for Extent2Array {
    type Sliced = Extent1Array;
}
impl SliceAt<2> for Extent2Array {
    type Sliced = Extent2;
}

impl SliceAt<0> for ExtentCube {
    type Sliced = Extent1Array;
}
impl SliceAt<1> for ExtentCube {
    type Sliced = Extent1Array;
}
impl SliceAt<2> for ExtentCube {
    type Sliced = Extent2;
}

// ---------------------------------------------------------------------------
// Swap table
// ---------------------------------------------------------------------------
// Exchanging two axes keeps the extent type, so the swapped extent must
// still be a valid value of it. A cube's face axis always has length 6 and
// can never trade places with a spatial axis; every other pair of distinct
// axes is listed here.

/// Extents whose axes `A0` and `A1` may be exchanged.
///
/// ```compile_fail
/// use texview::{ExtentCube, Image};
/// let cube = Image::<f32, ExtentCube>::defaulted(ExtentCube::new(2));
/// let _ = cube.view().swapped_xz();
/// ```
pub trait SwapAxes<const A0: usize, const A1: usize>: Extent {}

macro_rules! swap_axes {
    ($ext:ty: $(($a:literal, $b:literal)),+) => {
        $(
            impl SwapAxes<$a, $b> for $ext {}
            impl SwapAxes<$b, $a> for $ext {}
        )+
    };
}

swap_axes!(Extent2: (0, 1));
swap_axes!(Extent3: (0, 1), (0, 2), (1, 2));
swap_axes!(Extent1Array: (0, 1));
swap_axes!(Extent2Array: (0, 1), (0, 2), (1, 2));
swap_axes!(ExtentCube: (0, 1));
