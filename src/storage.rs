// storage.rs — Owning element buffers.
//
// Storage is the only place that allocates. Images own one and hand out
// views into it; views never allocate or free.
//
// Resizing to the current length keeps the allocation. `resize_defaulted`
// and `resize_filled` then overwrite in place, while `resize_uninitialized`
// leaves the old contents alone. A fresh allocation from
// `resize_uninitialized` is zeroed: every `Pod` type accepts the all-zero
// bit pattern, and handing out truly uninitialized memory would be UB.

use bytemuck::Zeroable;

use crate::block::BlockFormat;
use crate::pixel::Pixel;

/// Owning, contiguous buffer of `T`.
#[derive(Debug, Default)]
pub struct Storage<T> {
    data: Vec<T>,
}

impl<T: Pixel> Storage<T> {
    pub fn new() -> Self {
        Storage { data: Vec::new() }
    }

    pub fn from_vec(data: Vec<T>) -> Self {
        Storage { data }
    }

    /// Resize to `len` elements. Contents are unspecified.
    pub fn resize_uninitialized(&mut self, len: usize) {
        if self.data.len() == len {
            return;
        }
        log::trace!("storage: allocating {len} × {} bytes", std::mem::size_of::<T>());
        self.data = vec![T::zeroed(); len];
    }

    /// Resize to `len` elements, all set to `T::zeroed()`.
    pub fn resize_defaulted(&mut self, len: usize) {
        self.resize_filled(len, T::zeroed());
    }

    /// Resize to `len` elements, all set to `value`.
    pub fn resize_filled(&mut self, len: usize, value: T) {
        if self.data.len() == len {
            self.data.fill(value);
            return;
        }
        log::trace!("storage: allocating {len} × {} bytes", std::mem::size_of::<T>());
        self.data = vec![value; len];
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_mut_ptr()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

/// Owning buffer of compressed blocks.
#[derive(Debug, Default)]
pub struct BlockStorage<B> {
    blocks: Vec<B>,
}

impl<B: BlockFormat> BlockStorage<B> {
    pub fn new() -> Self {
        BlockStorage { blocks: Vec::new() }
    }

    pub fn from_vec(blocks: Vec<B>) -> Self {
        BlockStorage { blocks }
    }

    pub fn resize_uninitialized(&mut self, len: usize) {
        if self.blocks.len() != len {
            log::trace!("block storage: allocating {len} blocks");
            self.blocks = vec![B::zeroed(); len];
        }
    }

    pub fn resize_defaulted(&mut self, len: usize) {
        self.resize_filled(len, B::zeroed());
    }

    pub fn resize_filled(&mut self, len: usize, value: B) {
        if self.blocks.len() == len {
            self.blocks.fill(value);
        } else {
            log::trace!("block storage: allocating {len} blocks");
            self.blocks = vec![value; len];
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn as_slice(&self) -> &[B] {
        &self.blocks
    }

    pub fn as_mut_slice(&mut self) -> &mut [B] {
        &mut self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_size_resize_reuses_allocation() {
        let mut s = Storage::<u32>::new();
        s.resize_filled(16, 7);
        let ptr = s.as_ptr();
        s.resize_defaulted(16);
        assert_eq!(s.as_ptr(), ptr);
        assert!(s.as_slice().iter().all(|&v| v == 0));

        s.as_mut_slice()[3] = 42;
        s.resize_uninitialized(16);
        assert_eq!(s.as_ptr(), ptr);
        assert_eq!(s.as_slice()[3], 42);
    }

    #[test]
    fn test_fresh_uninitialized_is_zeroed() {
        let mut s = Storage::<f32>::new();
        s.resize_uninitialized(8);
        assert_eq!(s.len(), 8);
        assert!(s.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_resize_changes_length() {
        let mut s = Storage::from_vec(vec![1u8, 2, 3]);
        s.resize_filled(5, 9);
        assert_eq!(s.as_slice(), &[9, 9, 9, 9, 9]);
        s.resize_defaulted(0);
        assert!(s.is_empty());
    }
}
