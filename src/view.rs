// view.rs — Non-owning, typed windows onto image memory.
//
// A view is three things:
//
//   ptr     address of position 0 (not necessarily the lowest address)
//   extent  how many positions along each axis
//   map     layout state that turns a position into a byte offset
//
// Views are cheap to transform. Subview, mirror, swap and slice only move
// `ptr` and rewrite `map`, the pixels stay where they are:
//
//   data (2×2):   1 2        mirrored_x:  2 1      swapped_xy:  1 3
//                 3 4                     4 3                   2 4
//
// `View` is the shared form (`Copy`, many readers), `ViewMut` the exclusive
// one. The lifetime `'a` is the borrow of whatever owns the memory, so a
// view can never outlive its image.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use crate::addressing;
use crate::convert::{ConvertPixel, Converter, DefaultConverter};
use crate::extent::{Coords, Extent, Extent1Array, Extent2Array, ExtentCube, SliceAt, SwapAxes};
use crate::iter::{Entries, EntriesMut, Pixels, PixelsMut, Positions};
use crate::layout::{Layout, Linear};
use crate::pixel::Pixel;

/// Shared, read-only view.
pub struct View<'a, T, E: Extent, L: Layout = Linear> {
    pub(crate) ptr: *const u8,
    pub(crate) extent: E,
    pub(crate) map: L::Map<E::Pos>,
    _marker: PhantomData<&'a T>,
}

/// Exclusive, read-write view.
pub struct ViewMut<'a, T, E: Extent, L: Layout = Linear> {
    pub(crate) ptr: *mut u8,
    pub(crate) extent: E,
    pub(crate) map: L::Map<E::Pos>,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T, E: Extent, L: Layout> Clone for View<'a, T, E, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T, E: Extent, L: Layout> Copy for View<'a, T, E, L> {}

// SAFETY: a View is a shared borrow of `T`s.
unsafe impl<'a, T: Sync, E: Extent, L: Layout> Send for View<'a, T, E, L> {}
unsafe impl<'a, T: Sync, E: Extent, L: Layout> Sync for View<'a, T, E, L> {}
// SAFETY: a ViewMut is an exclusive borrow of `T`s.
unsafe impl<'a, T: Send, E: Extent, L: Layout> Send for ViewMut<'a, T, E, L> {}
unsafe impl<'a, T: Sync, E: Extent, L: Layout> Sync for ViewMut<'a, T, E, L> {}

// ---------------------------------------------------------------------------
// Compile-time axis checks
// ---------------------------------------------------------------------------

struct AxisCheck<P, const A: usize>(PhantomData<P>);

impl<P: Coords, const A: usize> AxisCheck<P, A> {
    const OK: () = assert!(A < P::DIMS, "axis out of range for this view");
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

impl<'a, T: Pixel, E: Extent, L: Layout> View<'a, T, E, L> {
    /// Build a view from raw parts.
    ///
    /// # Safety
    /// Every position inside `extent` must map to an aligned, initialized
    /// `T` that stays valid and unmodified for `'a`.
    pub unsafe fn from_raw_parts(ptr: *const T, extent: E, map: L::Map<E::Pos>) -> Self {
        View { ptr: ptr as *const u8, extent, map, _marker: PhantomData }
    }

    #[inline]
    pub fn extent(&self) -> E {
        self.extent
    }

    /// Layout state (the byte stride for linear views).
    #[inline]
    pub fn map(&self) -> L::Map<E::Pos> {
        self.map
    }

    #[inline]
    pub fn element_count(&self) -> u64 {
        self.extent.element_count()
    }

    /// Bytes occupied by the viewed elements (excluding gaps).
    #[inline]
    pub fn byte_size(&self) -> u64 {
        self.element_count() * std::mem::size_of::<T>() as u64
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        addressing::is_any_zero(&self.extent.to_ivec())
    }

    /// Address of position 0.
    #[inline]
    pub fn data_ptr(&self) -> *const T {
        self.ptr as *const T
    }

    #[inline]
    pub fn contains(&self, p: E::Pos) -> bool {
        addressing::is_non_negative(&p) && addressing::is_smaller_than(&p, &self.extent.to_ivec())
    }

    #[inline]
    pub fn is_on_boundary(&self, p: E::Pos) -> bool {
        addressing::is_on_boundary(&p, &self.extent.to_ivec())
    }

    /// # Panics
    /// Panics if `p` is outside the view.
    #[inline]
    pub fn at(&self, p: E::Pos) -> &'a T {
        assert!(
            self.contains(p),
            "position {p:?} out of bounds for extent {:?}",
            self.extent.to_ivec()
        );
        // SAFETY: bounds checked above.
        unsafe { self.at_unchecked(p) }
    }

    /// # Safety
    /// `p` must be inside the view.
    #[inline(always)]
    pub unsafe fn at_unchecked(&self, p: E::Pos) -> &'a T {
        debug_assert!(self.contains(p), "at_unchecked({p:?}) out of bounds");
        &*(self.ptr.offset(L::offset(&self.map, &p) as isize) as *const T)
    }

    // --- Transforms ---

    /// View of the box `[start, start + extent)`.
    ///
    /// # Panics
    /// Panics if a non-empty box does not fit inside this view.
    pub fn subview(&self, start: E::Pos, extent: E::Pos) -> Self {
        check_subview(&start, &extent, &self.extent.to_ivec());
        let (shift, map) = L::subview(&self.map, &start);
        View {
            ptr: self.ptr.wrapping_offset(shift as isize),
            extent: E::from_ivec(extent),
            map,
            _marker: PhantomData,
        }
    }

    /// View of the inclusive box `[min, max]`.
    pub fn subview_between(&self, min: E::Pos, max: E::Pos) -> Self {
        self.subview(min, inclusive_extent(&min, &max))
    }

    /// Reverse the order of positions along `AXIS`.
    pub fn mirrored<const AXIS: usize>(&self) -> Self {
        let () = AxisCheck::<E::Pos, AXIS>::OK;
        let (shift, map) = L::mirrored(&self.map, &self.extent.to_ivec(), AXIS);
        View {
            ptr: self.ptr.wrapping_offset(shift as isize),
            extent: self.extent,
            map,
            _marker: PhantomData,
        }
    }

    /// Exchange axes `A0` and `A1`.
    pub fn swapped<const A0: usize, const A1: usize>(&self) -> Self
    where
        E: SwapAxes<A0, A1>,
    {
        let mut e = self.extent.to_ivec();
        e.as_mut().swap(A0, A1);
        View {
            ptr: self.ptr,
            extent: E::from_ivec(e),
            map: L::swapped::<E::Pos>(&self.map, A0, A1),
            _marker: PhantomData,
        }
    }

    /// Fix `AXIS` at `index`, yielding a view of one lower dimension.
    ///
    /// # Panics
    /// Panics if `index` is outside `[0, extent[AXIS])`.
    pub fn sliced_at<const AXIS: usize>(&self, index: i32) -> View<'a, T, E::Sliced, L>
    where
        E: SliceAt<AXIS>,
    {
        let e = self.extent.to_ivec();
        check_slice(AXIS, index, &e);
        let (shift, map) = L::sliced::<E::Pos, <E::Sliced as Extent>::Pos>(&self.map, AXIS, index);
        View {
            ptr: self.ptr.wrapping_offset(shift as isize),
            extent: E::Sliced::from_ivec(addressing::remove_axis(&e, AXIS)),
            map,
            _marker: PhantomData,
        }
    }

    pub fn mirrored_x(&self) -> Self {
        self.mirrored::<0>()
    }

    pub fn mirrored_y(&self) -> Self {
        self.mirrored::<1>()
    }

    pub fn mirrored_z(&self) -> Self {
        self.mirrored::<2>()
    }

    pub fn mirrored_w(&self) -> Self {
        self.mirrored::<3>()
    }

    pub fn swapped_xy(&self) -> Self
    where
        E: SwapAxes<0, 1>,
    {
        self.swapped::<0, 1>()
    }

    pub fn swapped_xz(&self) -> Self
    where
        E: SwapAxes<0, 2>,
    {
        self.swapped::<0, 2>()
    }

    pub fn swapped_yz(&self) -> Self
    where
        E: SwapAxes<1, 2>,
    {
        self.swapped::<1, 2>()
    }

    /// Row `y` (axis 1 fixed).
    pub fn row(&self, y: i32) -> View<'a, T, E::Sliced, L>
    where
        E: SliceAt<1>,
    {
        self.sliced_at::<1>(y)
    }

    /// Column `x` (axis 0 fixed).
    pub fn column(&self, x: i32) -> View<'a, T, E::Sliced, L>
    where
        E: SliceAt<0>,
    {
        self.sliced_at::<0>(x)
    }

    // --- Iteration ---

    /// All positions, in memory order of this view.
    pub fn positions(&self) -> Positions<E::Pos> {
        Positions::new(self.extent.to_ivec(), L::iteration_order::<E::Pos>(&self.map))
    }

    pub fn pixels(&self) -> Pixels<'a, T, E, L> {
        Pixels::new(*self)
    }

    pub fn entries(&self) -> Entries<'a, T, E, L> {
        Entries::new(*self)
    }

    pub fn for_each<F: FnMut(E::Pos, &T)>(&self, mut f: F) {
        for (p, v) in self.entries() {
            f(p, v);
        }
    }

    // --- Copy ---

    /// Copy every element into `dst` using the default conversion.
    ///
    /// # Panics
    /// Panics if the extents differ.
    pub fn copy_to<D, E2, L2>(&self, dst: &mut ViewMut<'_, D, E2, L2>)
    where
        D: Pixel,
        T: ConvertPixel<D>,
        E2: Extent<Pos = E::Pos>,
        L2: Layout,
    {
        self.copy_to_with(dst, &DefaultConverter);
    }

    /// Copy every element into `dst` through `converter`.
    pub fn copy_to_with<D, E2, L2, C>(&self, dst: &mut ViewMut<'_, D, E2, L2>, converter: &C)
    where
        D: Pixel,
        E2: Extent<Pos = E::Pos>,
        L2: Layout,
        C: Converter<T, D>,
    {
        assert_eq!(
            self.extent.to_ivec(),
            dst.extent.to_ivec(),
            "copy_to: source and destination extents differ"
        );
        for (p, s) in self.entries() {
            // SAFETY: both views share the extent checked above.
            let d = unsafe { dst.at_unchecked_mut(p) };
            converter.convert(d, s);
        }
    }
}

impl<'a, T: Pixel, E: Extent> View<'a, T, E, Linear> {
    /// Natural-stride view over a slice.
    ///
    /// # Panics
    /// Panics if the slice holds fewer than `extent.element_count()` items.
    pub fn from_slice(data: &'a [T], extent: E) -> Self {
        assert!(
            data.len() as u64 >= extent.element_count(),
            "slice of {} elements cannot hold extent {:?}",
            data.len(),
            extent.to_ivec()
        );
        let stride = Linear::natural(std::mem::size_of::<T>() as i32, &extent.to_ivec());
        // SAFETY: the slice covers the natural layout and is borrowed for 'a.
        unsafe { View::from_raw_parts(data.as_ptr(), extent, stride) }
    }

    /// Per-axis byte stride.
    #[inline]
    pub fn stride_bytes(&self) -> E::Pos {
        self.map
    }

    pub fn has_natural_stride(&self) -> bool {
        addressing::is_natural_stride(&self.map, std::mem::size_of::<T>() as i32, &self.extent.to_ivec())
    }

    /// The viewed elements as one slice, if they are packed row-major.
    pub fn as_slice(&self) -> Option<&'a [T]> {
        if !self.has_natural_stride() {
            return None;
        }
        let len = self.element_count() as usize;
        if len == 0 {
            return Some(&[]);
        }
        // SAFETY: natural stride means `len` contiguous elements from ptr.
        Some(unsafe { std::slice::from_raw_parts(self.ptr as *const T, len) })
    }
}

impl<'a, T: Pixel, L: Layout> View<'a, T, Extent1Array, L> {
    pub fn layer(&self, i: i32) -> View<'a, T, crate::extent::Extent1, L> {
        self.sliced_at::<1>(i)
    }
}

impl<'a, T: Pixel, L: Layout> View<'a, T, Extent2Array, L> {
    pub fn layer(&self, i: i32) -> View<'a, T, crate::extent::Extent2, L> {
        self.sliced_at::<2>(i)
    }
}

impl<'a, T: Pixel, L: Layout> View<'a, T, ExtentCube, L> {
    /// Face `i` of the cube (0..6).
    pub fn face(&self, i: i32) -> View<'a, T, crate::extent::Extent2, L> {
        self.sliced_at::<2>(i)
    }
}

impl<'a, T: Pixel, E: Extent, L: Layout> Index<E::Pos> for View<'a, T, E, L> {
    type Output = T;

    #[inline]
    fn index(&self, p: E::Pos) -> &T {
        self.at(p)
    }
}

impl<'a, T: Pixel, E: Extent, L: Layout> fmt::Debug for View<'a, T, E, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("element", &std::any::type_name::<T>())
            .field("extent", &self.extent)
            .field("map", &self.map)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ViewMut
// ---------------------------------------------------------------------------

impl<'a, T: Pixel, E: Extent, L: Layout> ViewMut<'a, T, E, L> {
    /// Build a mutable view from raw parts.
    ///
    /// # Safety
    /// Every position inside `extent` must map to a distinct, aligned,
    /// initialized `T` that nobody else accesses for `'a`.
    pub unsafe fn from_raw_parts(ptr: *mut T, extent: E, map: L::Map<E::Pos>) -> Self {
        ViewMut { ptr: ptr as *mut u8, extent, map, _marker: PhantomData }
    }

    /// Shared view of the same elements.
    #[inline]
    pub fn as_view(&self) -> View<'_, T, E, L> {
        View { ptr: self.ptr, extent: self.extent, map: self.map, _marker: PhantomData }
    }

    /// Shorter-lived mutable view of the same elements.
    #[inline]
    pub fn reborrow(&mut self) -> ViewMut<'_, T, E, L> {
        ViewMut { ptr: self.ptr, extent: self.extent, map: self.map, _marker: PhantomData }
    }

    #[inline]
    pub fn extent(&self) -> E {
        self.extent
    }

    #[inline]
    pub fn map(&self) -> L::Map<E::Pos> {
        self.map
    }

    #[inline]
    pub fn element_count(&self) -> u64 {
        self.extent.element_count()
    }

    #[inline]
    pub fn byte_size(&self) -> u64 {
        self.element_count() * std::mem::size_of::<T>() as u64
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        addressing::is_any_zero(&self.extent.to_ivec())
    }

    #[inline]
    pub fn data_ptr(&self) -> *mut T {
        self.ptr as *mut T
    }

    #[inline]
    pub fn contains(&self, p: E::Pos) -> bool {
        self.as_view().contains(p)
    }

    #[inline]
    pub fn is_on_boundary(&self, p: E::Pos) -> bool {
        self.as_view().is_on_boundary(p)
    }

    #[inline]
    pub fn at(&self, p: E::Pos) -> &T {
        self.as_view().at(p)
    }

    /// # Safety
    /// `p` must be inside the view.
    #[inline(always)]
    pub unsafe fn at_unchecked(&self, p: E::Pos) -> &T {
        self.as_view().at_unchecked(p)
    }

    /// # Panics
    /// Panics if `p` is outside the view.
    #[inline]
    pub fn at_mut(&mut self, p: E::Pos) -> &mut T {
        assert!(
            self.contains(p),
            "position {p:?} out of bounds for extent {:?}",
            self.extent.to_ivec()
        );
        // SAFETY: bounds checked above.
        unsafe { self.at_unchecked_mut(p) }
    }

    /// # Safety
    /// `p` must be inside the view.
    #[inline(always)]
    pub unsafe fn at_unchecked_mut(&mut self, p: E::Pos) -> &mut T {
        debug_assert!(self.contains(p), "at_unchecked_mut({p:?}) out of bounds");
        &mut *(self.ptr.offset(L::offset(&self.map, &p) as isize) as *mut T)
    }

    // --- Transforms (consume the exclusive borrow) ---

    pub fn subview(self, start: E::Pos, extent: E::Pos) -> Self {
        check_subview(&start, &extent, &self.extent.to_ivec());
        let (shift, map) = L::subview(&self.map, &start);
        ViewMut {
            ptr: self.ptr.wrapping_offset(shift as isize),
            extent: E::from_ivec(extent),
            map,
            _marker: PhantomData,
        }
    }

    pub fn subview_between(self, min: E::Pos, max: E::Pos) -> Self {
        let extent = inclusive_extent(&min, &max);
        self.subview(min, extent)
    }

    pub fn mirrored<const AXIS: usize>(self) -> Self {
        let () = AxisCheck::<E::Pos, AXIS>::OK;
        let (shift, map) = L::mirrored(&self.map, &self.extent.to_ivec(), AXIS);
        ViewMut {
            ptr: self.ptr.wrapping_offset(shift as isize),
            extent: self.extent,
            map,
            _marker: PhantomData,
        }
    }

    pub fn swapped<const A0: usize, const A1: usize>(self) -> Self
    where
        E: SwapAxes<A0, A1>,
    {
        let mut e = self.extent.to_ivec();
        e.as_mut().swap(A0, A1);
        ViewMut {
            ptr: self.ptr,
            extent: E::from_ivec(e),
            map: L::swapped::<E::Pos>(&self.map, A0, A1),
            _marker: PhantomData,
        }
    }

    pub fn sliced_at<const AXIS: usize>(self, index: i32) -> ViewMut<'a, T, E::Sliced, L>
    where
        E: SliceAt<AXIS>,
    {
        let e = self.extent.to_ivec();
        check_slice(AXIS, index, &e);
        let (shift, map) = L::sliced::<E::Pos, <E::Sliced as Extent>::Pos>(&self.map, AXIS, index);
        ViewMut {
            ptr: self.ptr.wrapping_offset(shift as isize),
            extent: E::Sliced::from_ivec(addressing::remove_axis(&e, AXIS)),
            map,
            _marker: PhantomData,
        }
    }

    pub fn mirrored_x(self) -> Self {
        self.mirrored::<0>()
    }

    pub fn mirrored_y(self) -> Self {
        self.mirrored::<1>()
    }

    pub fn mirrored_z(self) -> Self {
        self.mirrored::<2>()
    }

    pub fn mirrored_w(self) -> Self {
        self.mirrored::<3>()
    }

    pub fn swapped_xy(self) -> Self
    where
        E: SwapAxes<0, 1>,
    {
        self.swapped::<0, 1>()
    }

    pub fn swapped_xz(self) -> Self
    where
        E: SwapAxes<0, 2>,
    {
        self.swapped::<0, 2>()
    }

    pub fn swapped_yz(self) -> Self
    where
        E: SwapAxes<1, 2>,
    {
        self.swapped::<1, 2>()
    }

    pub fn row(self, y: i32) -> ViewMut<'a, T, E::Sliced, L>
    where
        E: SliceAt<1>,
    {
        self.sliced_at::<1>(y)
    }

    pub fn column(self, x: i32) -> ViewMut<'a, T, E::Sliced, L>
    where
        E: SliceAt<0>,
    {
        self.sliced_at::<0>(x)
    }

    // --- Iteration ---

    pub fn positions(&self) -> Positions<E::Pos> {
        self.as_view().positions()
    }

    pub fn pixels(&self) -> Pixels<'_, T, E, L> {
        Pixels::new(self.as_view())
    }

    pub fn entries(&self) -> Entries<'_, T, E, L> {
        Entries::new(self.as_view())
    }

    pub fn pixels_mut(&mut self) -> PixelsMut<'_, T, E, L> {
        PixelsMut::new(self.ptr, self.map, self.positions())
    }

    pub fn entries_mut(&mut self) -> EntriesMut<'_, T, E, L> {
        EntriesMut::new(self.ptr, self.map, self.positions())
    }

    pub fn for_each<F: FnMut(E::Pos, &T)>(&self, f: F) {
        self.as_view().for_each(f)
    }

    // --- Fill / copy ---

    pub fn fill(&mut self, value: T) {
        for px in self.pixels_mut() {
            *px = value;
        }
    }

    /// `even` where the coordinate sum is even, `odd` elsewhere.
    pub fn fill_checkerboard(&mut self, even: T, odd: T) {
        for (p, px) in self.entries_mut() {
            let sum: i32 = p.as_ref().iter().sum();
            *px = if sum % 2 == 0 { even } else { odd };
        }
    }

    pub fn copy_to<D, E2, L2>(&self, dst: &mut ViewMut<'_, D, E2, L2>)
    where
        D: Pixel,
        T: ConvertPixel<D>,
        E2: Extent<Pos = E::Pos>,
        L2: Layout,
    {
        self.as_view().copy_to(dst);
    }

    pub fn copy_to_with<D, E2, L2, C>(&self, dst: &mut ViewMut<'_, D, E2, L2>, converter: &C)
    where
        D: Pixel,
        E2: Extent<Pos = E::Pos>,
        L2: Layout,
        C: Converter<T, D>,
    {
        self.as_view().copy_to_with(dst, converter);
    }

    /// Overwrite this view with the converted contents of `src`.
    pub fn copy_from<S, E2, L2>(&mut self, src: View<'_, S, E2, L2>)
    where
        S: ConvertPixel<T>,
        E2: Extent<Pos = E::Pos>,
        L2: Layout,
    {
        src.copy_to(self);
    }
}

impl<'a, T: Pixel, E: Extent> ViewMut<'a, T, E, Linear> {
    pub fn from_slice(data: &'a mut [T], extent: E) -> Self {
        assert!(
            data.len() as u64 >= extent.element_count(),
            "slice of {} elements cannot hold extent {:?}",
            data.len(),
            extent.to_ivec()
        );
        let stride = Linear::natural(std::mem::size_of::<T>() as i32, &extent.to_ivec());
        // SAFETY: the slice covers the natural layout and is borrowed
        // exclusively for 'a.
        unsafe { ViewMut::from_raw_parts(data.as_mut_ptr(), extent, stride) }
    }

    #[inline]
    pub fn stride_bytes(&self) -> E::Pos {
        self.map
    }

    pub fn has_natural_stride(&self) -> bool {
        self.as_view().has_natural_stride()
    }
}

impl<'a, T: Pixel, L: Layout> ViewMut<'a, T, Extent1Array, L> {
    pub fn layer(self, i: i32) -> ViewMut<'a, T, crate::extent::Extent1, L> {
        self.sliced_at::<1>(i)
    }
}

impl<'a, T: Pixel, L: Layout> ViewMut<'a, T, Extent2Array, L> {
    pub fn layer(self, i: i32) -> ViewMut<'a, T, crate::extent::Extent2, L> {
        self.sliced_at::<2>(i)
    }
}

impl<'a, T: Pixel, L: Layout> ViewMut<'a, T, ExtentCube, L> {
    pub fn face(self, i: i32) -> ViewMut<'a, T, crate::extent::Extent2, L> {
        self.sliced_at::<2>(i)
    }
}

impl<'a, T: Pixel, E: Extent, L: Layout> Index<E::Pos> for ViewMut<'a, T, E, L> {
    type Output = T;

    #[inline]
    fn index(&self, p: E::Pos) -> &T {
        self.at(p)
    }
}

impl<'a, T: Pixel, E: Extent, L: Layout> IndexMut<E::Pos> for ViewMut<'a, T, E, L> {
    #[inline]
    fn index_mut(&mut self, p: E::Pos) -> &mut T {
        self.at_mut(p)
    }
}

impl<'a, T: Pixel, E: Extent, L: Layout> fmt::Debug for ViewMut<'a, T, E, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewMut")
            .field("element", &std::any::type_name::<T>())
            .field("extent", &self.extent)
            .field("map", &self.map)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn check_subview<P: Coords>(start: &P, extent: &P, outer: &P) {
    assert!(addressing::is_non_negative(extent), "subview extent {extent:?} is negative");
    if addressing::is_any_zero(extent) {
        return;
    }
    let end = addressing::add(start, extent);
    let fits = addressing::is_non_negative(start)
        && (0..P::DIMS).all(|i| end[i] <= outer[i]);
    assert!(
        fits,
        "subview at {start:?} with extent {extent:?} exceeds view extent {outer:?}"
    );
}

fn check_slice<P: Coords>(axis: usize, index: i32, extent: &P) {
    assert!(
        index >= 0 && index < extent[axis],
        "slice index {index} out of range for axis {axis} of extent {extent:?}"
    );
}

fn inclusive_extent<P: Coords>(min: &P, max: &P) -> P {
    let mut e = *max;
    for i in 0..P::DIMS {
        e[i] = max[i] - min[i] + 1;
    }
    e
}
