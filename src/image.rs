// image.rs — Owning image container, generic over element, topology and layout.
//
// Image<T, E, L> = Storage<T> + extent + natural layout map.
//
// It owns exactly one buffer and always addresses it with the natural map of
// its layout (packed row-major strides for Linear, origin-anchored Morton
// order for ZOrder). Everything interesting happens through views:
//
//   let mut img = Image::<f32, Extent2>::defaulted(Extent2::new(64, 48));
//   img.view_mut().subview([8, 8], [16, 16]).fill(1.0);
//   let flipped = img.view().mirrored_y();
//
// Moving an Image moves the Vec header only, never the pixels, so
// `data_ptr()` is stable across moves. Views borrow the image, so the borrow
// checker rejects any resize or drop while a view is alive.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::convert::in_place;
use crate::extent::Extent;
use crate::iter::Positions;
use crate::layout::{Layout, Linear};
use crate::pixel::Pixel;
use crate::storage::Storage;
use crate::view::{View, ViewMut};

/// An image that owns its elements.
pub struct Image<T, E: Extent, L: Layout = Linear> {
    storage: Storage<T>,
    extent: E,
    map: L::Map<E::Pos>,
}

// Clone is manual: it reallocates at the natural layout and copies element
// by element through a view, which is the same path every other copy uses.
impl<T: Pixel, E: Extent, L: Layout> Clone for Image<T, E, L> {
    fn clone(&self) -> Self {
        let mut out = Image::uninitialized(self.extent);
        self.view()
            .copy_to_with(&mut out.view_mut(), &in_place(|d: &mut T, s: &T| *d = *s));
        out
    }
}

impl<T: Pixel, E: Extent, L: Layout> Image<T, E, L> {
    // --- Constructors ---

    /// Image with every element set to `value`.
    pub fn filled(extent: E, value: T) -> Self {
        let mut img = Self::empty(extent);
        img.storage.resize_filled(L::storage_len(&extent.to_ivec()), value);
        img
    }

    /// Image with every element zeroed.
    pub fn defaulted(extent: E) -> Self {
        let mut img = Self::empty(extent);
        img.storage.resize_defaulted(L::storage_len(&extent.to_ivec()));
        img
    }

    /// Image whose contents are unspecified (zeroed on allocation).
    pub fn uninitialized(extent: E) -> Self {
        let mut img = Self::empty(extent);
        img.storage.resize_uninitialized(L::storage_len(&extent.to_ivec()));
        img
    }

    /// Deep copy of any view with the same element type and topology.
    pub fn from_view<L2: Layout>(src: View<'_, T, E, L2>) -> Self {
        let mut img = Self::uninitialized(src.extent());
        src.copy_to_with(&mut img.view_mut(), &in_place(|d: &mut T, s: &T| *d = *s));
        img
    }

    fn empty(extent: E) -> Self {
        Image {
            storage: Storage::new(),
            extent,
            map: L::natural(std::mem::size_of::<T>() as i32, &extent.to_ivec()),
        }
    }

    // --- Resizing (contents are discarded) ---

    pub fn resize(&mut self, extent: E) {
        self.reshape(extent);
        self.storage.resize_defaulted(L::storage_len(&extent.to_ivec()));
    }

    pub fn resize_filled(&mut self, extent: E, value: T) {
        self.reshape(extent);
        self.storage.resize_filled(L::storage_len(&extent.to_ivec()), value);
    }

    pub fn resize_uninitialized(&mut self, extent: E) {
        self.reshape(extent);
        self.storage.resize_uninitialized(L::storage_len(&extent.to_ivec()));
    }

    fn reshape(&mut self, extent: E) {
        self.extent = extent;
        self.map = L::natural(std::mem::size_of::<T>() as i32, &extent.to_ivec());
    }

    // --- Accessors ---

    #[inline]
    pub fn extent(&self) -> E {
        self.extent
    }

    /// Address of the first stored element.
    #[inline]
    pub fn data_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    /// Number of stored elements (may exceed the element count for ZOrder).
    #[inline]
    pub fn storage_len(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn view(&self) -> View<'_, T, E, L> {
        // SAFETY: the natural map addresses only the owned buffer, which is
        // borrowed for the lifetime of the view.
        unsafe { View::from_raw_parts(self.storage.as_ptr(), self.extent, self.map) }
    }

    #[inline]
    pub fn view_mut(&mut self) -> ViewMut<'_, T, E, L> {
        // SAFETY: as in `view`, and the natural map is injective.
        unsafe { ViewMut::from_raw_parts(self.storage.as_mut_ptr(), self.extent, self.map) }
    }

    #[inline]
    pub fn at(&self, p: E::Pos) -> &T {
        self.view().at(p)
    }

    #[inline]
    pub fn at_mut(&mut self, p: E::Pos) -> &mut T {
        assert!(
            self.view().contains(p),
            "position {p:?} out of bounds for extent {:?}",
            self.extent.to_ivec()
        );
        let off = L::offset(&self.map, &p) as usize / std::mem::size_of::<T>().max(1);
        &mut self.storage.as_mut_slice()[off]
    }

    pub fn fill(&mut self, value: T) {
        self.view_mut().fill(value);
    }

    pub fn positions(&self) -> Positions<E::Pos> {
        self.view().positions()
    }
}

impl<T: Pixel, E: Extent> Image<T, E, Linear> {
    /// Wrap a packed row-major vector.
    ///
    /// # Panics
    /// Panics if `data.len()` differs from `extent.element_count()`.
    pub fn from_vec(extent: E, data: Vec<T>) -> Self {
        assert_eq!(
            data.len() as u64,
            extent.element_count(),
            "data length ({}) must equal element count of extent {:?}",
            data.len(),
            extent.to_ivec()
        );
        Image {
            storage: Storage::from_vec(data),
            extent,
            map: Linear::natural(std::mem::size_of::<T>() as i32, &extent.to_ivec()),
        }
    }

    /// All elements in row-major order.
    pub fn as_slice(&self) -> &[T] {
        self.storage.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.storage.as_mut_slice()
    }

    #[inline]
    pub fn stride_bytes(&self) -> E::Pos {
        self.map
    }
}

impl<T: Pixel, E: Extent, L: Layout> Index<E::Pos> for Image<T, E, L> {
    type Output = T;

    #[inline]
    fn index(&self, p: E::Pos) -> &T {
        self.at(p)
    }
}

impl<T: Pixel, E: Extent, L: Layout> IndexMut<E::Pos> for Image<T, E, L> {
    #[inline]
    fn index_mut(&mut self, p: E::Pos) -> &mut T {
        self.at_mut(p)
    }
}

// Debug formatting — useful for small images in tests.
impl<T: Pixel, E: Extent, L: Layout> fmt::Debug for Image<T, E, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Image<{}, {:?}> {{ extent: {:?}, values: [",
            std::any::type_name::<T>(),
            L::KIND,
            self.extent.to_ivec(),
        )?;
        for (i, p) in Positions::row_major(self.extent.to_ivec()).take(16).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", self.at(p))?;
        }
        if self.extent.element_count() > 16 {
            write!(f, ", ...")?;
        }
        write!(f, "] }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extent::{Extent2, Extent3};
    use crate::layout::ZOrder;

    #[test]
    fn test_new_image_natural_stride() {
        let img = Image::<f32, Extent2>::defaulted(Extent2::new(10, 5));
        assert_eq!(img.stride_bytes(), [4, 40]);
        assert!(img.view().has_natural_stride());
        assert!(img.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_filled_and_index() {
        let mut img = Image::<u8, Extent3>::filled(Extent3::new(2, 2, 2), 7);
        assert_eq!(img[[1, 1, 1]], 7);
        img[[1, 0, 1]] = 3;
        assert_eq!(img.as_slice()[5], 3);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut a = Image::from_vec(Extent2::new(2, 2), vec![1u16, 2, 3, 4]);
        let b = a.clone();
        a[[0, 0]] = 9;
        assert_eq!(b[[0, 0]], 1);
        assert_ne!(a.data_ptr(), b.data_ptr());
    }

    #[test]
    fn test_move_keeps_data_pointer() {
        let img = Image::<u32, Extent2>::defaulted(Extent2::new(8, 8));
        let before = img.data_ptr();
        let moved = img;
        assert_eq!(moved.data_ptr(), before);
        let boxed = Box::new(moved);
        assert_eq!(boxed.data_ptr(), before);
    }

    #[test]
    fn test_resize_discards_contents() {
        let mut img = Image::<i32, Extent2>::filled(Extent2::new(3, 3), 5);
        img.resize(Extent2::new(3, 3));
        assert!(img.as_slice().iter().all(|&v| v == 0));
        img.resize_filled(Extent2::new(4, 1), 2);
        assert_eq!(img.extent(), Extent2::new(4, 1));
        assert_eq!(img.as_slice(), &[2, 2, 2, 2]);
        assert_eq!(img.stride_bytes(), [4, 16]);
    }

    #[test]
    fn test_from_view_of_mirror() {
        let img = Image::from_vec(Extent2::new(2, 2), vec![1i32, 2, 3, 4]);
        let flipped: Image<i32, Extent2> = Image::from_view(img.view().mirrored_y());
        assert_eq!(flipped.as_slice(), &[3, 4, 1, 2]);
        assert!(flipped.view().has_natural_stride());
    }

    #[test]
    #[should_panic(expected = "data length")]
    fn test_from_vec_length_mismatch() {
        let _ = Image::from_vec(Extent2::new(3, 3), vec![0u8; 8]);
    }

    #[test]
    fn test_zorder_image() {
        let mut img = Image::<u16, Extent2, ZOrder>::defaulted(Extent2::new(3, 3));
        assert_eq!(img.storage_len(), 16);
        for (p, v) in img.view_mut().entries_mut() {
            *v = (p[0] + 10 * p[1]) as u16;
        }
        assert_eq!(img[[2, 2]], 22);
        assert_eq!(img[[1, 2]], 21);

        let linear = Image::<u16, Extent2>::from_view(img.view());
        assert_eq!(linear.as_slice(), &[0, 1, 2, 10, 11, 12, 20, 21, 22]);

        let copy = img.clone();
        assert_eq!(copy[[2, 1]], 12);
    }
}
