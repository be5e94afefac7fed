// addressing.rs — Pure position/stride predicates.
//
// These are the only functions that know how an integer position maps to
// a byte offset. Everything above (views, images, samplers) composes them.
//
//   offset(p) = Σ p[i] · stride[i]            (signed, accumulated in i64)
//
//   natural stride for element size s and extent e:
//     [s, s·e0, s·e0·e1, s·e0·e1·e2]         (row-major, no padding)
//
// Strides may be negative. A mirrored view keeps positions in [0, extent)
// and flips the sign of one stride instead of moving data.

use crate::extent::Coords;

/// `true` iff every component of `p` is `>= 0`.
#[inline]
pub fn is_non_negative<P: Coords>(p: &P) -> bool {
    p.as_ref().iter().all(|&c| c >= 0)
}

/// Componentwise `p < e`.
#[inline]
pub fn is_smaller_than<P: Coords>(p: &P, e: &P) -> bool {
    p.as_ref().iter().zip(e.as_ref()).all(|(&c, &n)| c < n)
}

/// `true` iff any coordinate sits on the first or last index of its axis.
#[inline]
pub fn is_on_boundary<P: Coords>(p: &P, e: &P) -> bool {
    p.as_ref()
        .iter()
        .zip(e.as_ref())
        .any(|(&c, &n)| c == 0 || c == n - 1)
}

#[inline]
pub fn is_any_zero<P: Coords>(e: &P) -> bool {
    e.as_ref().iter().any(|&n| n == 0)
}

/// Byte offset of `p` for the given per-axis byte stride.
#[inline]
pub fn strided_offset<P: Coords>(p: &P, stride: &P) -> i64 {
    p.as_ref()
        .iter()
        .zip(stride.as_ref())
        .map(|(&c, &s)| c as i64 * s as i64)
        .sum()
}

/// Row-major, unpadded stride for elements of `elem_size` bytes.
///
/// # Panics
/// Panics if a stride component does not fit in `i32`.
pub fn natural_stride_for<P: Coords>(elem_size: i32, e: &P) -> P {
    let mut stride = P::splat(0);
    let mut acc = elem_size as i64;
    for axis in 0..P::DIMS {
        assert!(
            acc <= i32::MAX as i64,
            "natural stride {acc} for extent {e:?} overflows i32"
        );
        stride[axis] = acc as i32;
        acc *= e[axis].max(0) as i64;
    }
    stride
}

#[inline]
pub fn is_natural_stride<P: Coords>(stride: &P, elem_size: i32, e: &P) -> bool {
    *stride == natural_stride_for(elem_size, e)
}

/// Lowest and highest byte offset addressed by positions inside `e`.
///
/// Returns `None` for an empty extent (nothing is addressed).
pub fn offset_range<P: Coords>(stride: &P, e: &P) -> Option<(i64, i64)> {
    if is_any_zero(e) {
        return None;
    }
    let mut lo = 0i64;
    let mut hi = 0i64;
    for axis in 0..P::DIMS {
        let span = (e[axis] as i64 - 1) * stride[axis] as i64;
        lo += span.min(0);
        hi += span.max(0);
    }
    Some((lo, hi))
}

/// Sufficient check that no two positions inside `e` share a byte.
///
/// Walking the axes from smallest to largest |stride|, each step must clear
/// the full span covered by all faster axes. Natural strides and everything
/// derived from them by subview/mirror/swap/slice pass this test.
pub fn is_non_overlapping<P: Coords>(stride: &P, e: &P, elem_size: i32) -> bool {
    let order = stride_order(stride);
    let mut required = elem_size as i64;
    for k in 0..P::DIMS {
        let axis = order[k] as usize;
        if e[axis] <= 1 {
            continue;
        }
        let step = (stride[axis] as i64).abs();
        if step < required {
            return false;
        }
        required = step * e[axis] as i64;
    }
    true
}

/// Axis indices sorted by ascending |stride| (ties keep axis order).
///
/// `order[0]` is the axis that should vary fastest during iteration.
pub fn stride_order<P: Coords>(stride: &P) -> P {
    let mut order = P::splat(0);
    for axis in 0..P::DIMS {
        order[axis] = axis as i32;
    }
    // Insertion sort: at most 4 entries.
    for i in 1..P::DIMS {
        let mut j = i;
        while j > 0 {
            let a = order[j - 1] as usize;
            let b = order[j] as usize;
            if stride[a].unsigned_abs() > stride[b].unsigned_abs() {
                order.as_mut().swap(j - 1, j);
                j -= 1;
            } else {
                break;
            }
        }
    }
    order
}

/// Copy `v` without component `axis` into the next lower tuple type.
pub fn remove_axis<P: Coords, Q: Coords>(v: &P, axis: usize) -> Q {
    debug_assert_eq!(Q::DIMS + 1, P::DIMS, "remove_axis must drop exactly one axis");
    let mut out = Q::splat(0);
    let mut j = 0;
    for i in 0..P::DIMS {
        if i != axis {
            out[j] = v[i];
            j += 1;
        }
    }
    out
}

/// Componentwise `a + b`.
#[inline]
pub fn add<P: Coords>(a: &P, b: &P) -> P {
    let mut out = *a;
    for axis in 0..P::DIMS {
        out[axis] += b[axis];
    }
    out
}
