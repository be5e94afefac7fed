// iter.rs — Position and element iterators over views.
//
// Positions are produced odometer-style: the axis with the smallest memory
// step turns fastest, so walking a mirrored or swapped view still touches
// memory in ascending (or descending) address order.
//
//   order = [1, 0]   (view swapped: axis 1 has the small stride)
//   (0,0) (0,1) (0,2) ... (1,0) (1,1) ...
//
// All iterators are lazy and `Clone`; cloning a fresh iterator restarts the
// walk.

use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::addressing;
use crate::extent::{Coords, Extent};
use crate::layout::Layout;
use crate::pixel::Pixel;
use crate::view::View;

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// Every position inside an extent, fastest axis first.
#[derive(Debug, Clone)]
pub struct Positions<P: Coords> {
    extent: P,
    order: P,
    next: Option<P>,
    remaining: usize,
}

impl<P: Coords> Positions<P> {
    /// `order[0]` is the axis that turns fastest.
    pub fn new(extent: P, order: P) -> Self {
        let empty = addressing::is_any_zero(&extent);
        let remaining = if empty {
            0
        } else {
            extent.as_ref().iter().map(|&e| e as usize).product()
        };
        Positions {
            extent,
            order,
            next: (!empty).then(|| P::splat(0)),
            remaining,
        }
    }

    /// Plain axis-0-fastest walk.
    pub fn row_major(extent: P) -> Self {
        let mut order = P::splat(0);
        for i in 0..P::DIMS {
            order[i] = i as i32;
        }
        Self::new(extent, order)
    }
}

impl<P: Coords> Iterator for Positions<P> {
    type Item = P;

    fn next(&mut self) -> Option<P> {
        let current = self.next?;
        let mut n = current;
        let mut wrapped = true;
        for k in 0..P::DIMS {
            let axis = self.order[k] as usize;
            n[axis] += 1;
            if n[axis] < self.extent[axis] {
                wrapped = false;
                break;
            }
            n[axis] = 0;
        }
        self.next = (!wrapped).then_some(n);
        self.remaining -= 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<P: Coords> ExactSizeIterator for Positions<P> {}
impl<P: Coords> FusedIterator for Positions<P> {}

// ---------------------------------------------------------------------------
// Read-only element iterators
// ---------------------------------------------------------------------------

/// `&T` for every position of a view.
pub struct Pixels<'a, T, E: Extent, L: Layout> {
    view: View<'a, T, E, L>,
    positions: Positions<E::Pos>,
}

impl<'a, T: Pixel, E: Extent, L: Layout> Pixels<'a, T, E, L> {
    pub(crate) fn new(view: View<'a, T, E, L>) -> Self {
        Pixels { positions: view.positions(), view }
    }
}

impl<'a, T: Pixel, E: Extent, L: Layout> Clone for Pixels<'a, T, E, L> {
    fn clone(&self) -> Self {
        Pixels { view: self.view, positions: self.positions.clone() }
    }
}

impl<'a, T: Pixel, E: Extent, L: Layout> Iterator for Pixels<'a, T, E, L> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        let p = self.positions.next()?;
        // SAFETY: positions are inside the view's extent.
        Some(unsafe { self.view.at_unchecked(p) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl<'a, T: Pixel, E: Extent, L: Layout> ExactSizeIterator for Pixels<'a, T, E, L> {}

/// `(position, &T)` for every position of a view.
pub struct Entries<'a, T, E: Extent, L: Layout> {
    view: View<'a, T, E, L>,
    positions: Positions<E::Pos>,
}

impl<'a, T: Pixel, E: Extent, L: Layout> Entries<'a, T, E, L> {
    pub(crate) fn new(view: View<'a, T, E, L>) -> Self {
        Entries { positions: view.positions(), view }
    }
}

impl<'a, T: Pixel, E: Extent, L: Layout> Clone for Entries<'a, T, E, L> {
    fn clone(&self) -> Self {
        Entries { view: self.view, positions: self.positions.clone() }
    }
}

impl<'a, T: Pixel, E: Extent, L: Layout> Iterator for Entries<'a, T, E, L> {
    type Item = (E::Pos, &'a T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let p = self.positions.next()?;
        // SAFETY: positions are inside the view's extent.
        Some((p, unsafe { self.view.at_unchecked(p) }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl<'a, T: Pixel, E: Extent, L: Layout> ExactSizeIterator for Entries<'a, T, E, L> {}

// ---------------------------------------------------------------------------
// Mutable element iterators
// ---------------------------------------------------------------------------
// Handing out one `&mut T` per position is sound because every ViewMut map
// is injective: distinct positions never share an element.

/// `&mut T` for every position of a mutable view.
pub struct PixelsMut<'a, T, E: Extent, L: Layout> {
    ptr: *mut u8,
    map: L::Map<E::Pos>,
    positions: Positions<E::Pos>,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T: Pixel, E: Extent, L: Layout> PixelsMut<'a, T, E, L> {
    pub(crate) fn new(ptr: *mut u8, map: L::Map<E::Pos>, positions: Positions<E::Pos>) -> Self {
        PixelsMut { ptr, map, positions, _marker: PhantomData }
    }
}

impl<'a, T: Pixel, E: Extent, L: Layout> Iterator for PixelsMut<'a, T, E, L> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        let p = self.positions.next()?;
        let off = L::offset(&self.map, &p) as isize;
        // SAFETY: `p` is in range and visited once; the map is injective.
        Some(unsafe { &mut *(self.ptr.offset(off) as *mut T) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl<'a, T: Pixel, E: Extent, L: Layout> ExactSizeIterator for PixelsMut<'a, T, E, L> {}

/// `(position, &mut T)` for every position of a mutable view.
pub struct EntriesMut<'a, T, E: Extent, L: Layout> {
    inner: PixelsMut<'a, T, E, L>,
}

impl<'a, T: Pixel, E: Extent, L: Layout> EntriesMut<'a, T, E, L> {
    pub(crate) fn new(ptr: *mut u8, map: L::Map<E::Pos>, positions: Positions<E::Pos>) -> Self {
        EntriesMut { inner: PixelsMut::new(ptr, map, positions) }
    }
}

impl<'a, T: Pixel, E: Extent, L: Layout> Iterator for EntriesMut<'a, T, E, L> {
    type Item = (E::Pos, &'a mut T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let p = self.inner.positions.next()?;
        let off = L::offset(&self.inner.map, &p) as isize;
        // SAFETY: see PixelsMut::next.
        Some((p, unsafe { &mut *(self.inner.ptr.offset(off) as *mut T) }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T: Pixel, E: Extent, L: Layout> ExactSizeIterator for EntriesMut<'a, T, E, L> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_row_major() {
        let got: Vec<[i32; 2]> = Positions::row_major([2, 2]).collect();
        assert_eq!(got, vec![[0, 0], [1, 0], [0, 1], [1, 1]]);
    }

    #[test]
    fn test_positions_custom_order() {
        let got: Vec<[i32; 2]> = Positions::new([2, 3], [1, 0]).collect();
        assert_eq!(got, vec![[0, 0], [0, 1], [0, 2], [1, 0], [1, 1], [1, 2]]);
    }

    #[test]
    fn test_positions_exact_size_and_restart() {
        let it = Positions::row_major([3, 2, 2]);
        assert_eq!(it.len(), 12);
        let again = it.clone();
        assert_eq!(it.count(), 12);
        assert_eq!(again.last(), Some([2, 1, 1]));
    }

    #[test]
    fn test_positions_empty() {
        assert_eq!(Positions::row_major([0, 4]).count(), 0);
        assert_eq!(Positions::row_major([4, 0, 2]).next(), None);
    }
}
