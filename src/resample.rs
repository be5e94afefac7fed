// resample.rs — One 2× reduction step for 2D views.
//
// Each output texel is the average of a 2×2 block of input texels. With
// texel centres at integer positions, the centre of block (2x, 2y)..(2x+1,
// 2y+1) sits at (2x + 0.5, 2y + 0.5), so one bilinear sample there is the
// box average. An odd side drops its last row or column, so only whole
// blocks are averaged. A side of 1 stays 1 and averages that texel with
// itself through the clamped lookup.
//
//   input 5×3  →  output 2×1   (column 4 and row 2 unused)
//   input 1×1  →  output 1×1   (never shrinks below one texel)
//
// Building a full mip chain is a loop over this step and is left to callers.

use crate::convert::ConvertPixel;
use crate::extent::{Extent, Extent2};
use crate::image::Image;
use crate::layout::Layout;
use crate::pixel::{Mix, Pixel};
use crate::sampler::linear_clamped;
use crate::view::View;

/// Extent of the next smaller level: halved, at least 1 along each axis.
pub fn downsampled_extent(extent: Extent2) -> Extent2 {
    Extent2::new((extent.width / 2).max(1), (extent.height / 2).max(1))
}

/// Half-resolution copy of `src` with 2×2 box filtering.
pub fn downsample_2x<P, T, L>(src: View<'_, T, Extent2, L>) -> Image<P, Extent2>
where
    P: Pixel + Mix,
    T: ConvertPixel<P>,
    L: Layout,
{
    let mut dst = Image::uninitialized(downsampled_extent(src.extent()));
    downsample_2x_into(src, &mut dst);
    dst
}

/// Downsample into a pre-allocated image, resizing it if needed.
pub fn downsample_2x_into<P, T, L>(src: View<'_, T, Extent2, L>, dst: &mut Image<P, Extent2>)
where
    P: Pixel + Mix,
    T: ConvertPixel<P>,
    L: Layout,
{
    let extent = downsampled_extent(src.extent());
    if dst.extent() != extent {
        dst.resize_uninitialized(extent);
    }
    if src.is_empty() {
        return;
    }
    let sampler = linear_clamped::<P, _, _, _>(src);
    for (p, out) in dst.view_mut().entries_mut() {
        *out = sampler.sample([2.0 * p[0] as f32 + 0.5, 2.0 * p[1] as f32 + 0.5]);
    }
}
