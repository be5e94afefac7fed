// sampler.rs — Filtered reads at fractional positions.
//
// Integer positions are texel centres. A sample at p = (1.5, 0.0) lies
// exactly between texels (1, 0) and (2, 0).
//
// A sampler combines:
//   lookup  what an out-of-range integer position reads
//   filter  how neighbouring texels are combined
//
// Linear filtering works for any dimensionality: gather the 2^D corner
// texels, then blend pairwise along axis 0, then axis 1, and so on. In 2D:
//
//   v0 = mix(l(x0, y0), l(x1, y0), fx)
//   v1 = mix(l(x0, y1), l(x1, y1), fx)
//   result = mix(v0, v1, fy)
//
// The sampler's output type P may differ from the stored element type; each
// texel is converted through ConvertPixel before blending, so a u8 image can
// be sampled straight into normalized f32.

use bytemuck::Zeroable;

use crate::convert::ConvertPixel;
use crate::extent::{Coords, Extent};
use crate::layout::Layout;
use crate::pixel::{Mix, Pixel};
use crate::view::View;

/// Texel coordinates are kept within ±2^30 so that corner offsets and
/// wrap-around arithmetic never overflow `i32`.
const MAX_TEXEL: f32 = (1 << 30) as f32;

/// `floor(x)` as a texel coordinate. NaN maps to 0.
#[inline]
fn texel_floor(x: f32) -> i32 {
    x.floor().clamp(-MAX_TEXEL, MAX_TEXEL) as i32
}

/// Behaviour for integer positions outside the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<P> {
    /// Clamp each coordinate to `[0, extent − 1]`.
    Clamped,
    /// Wrap around (`p mod extent`).
    Repeated,
    /// Mirror at every edge: 0 1 2 | 2 1 0 | 0 1 2 ...
    Mirrored,
    /// Return this value.
    Bordered(P),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    #[default]
    Linear,
}

/// Most texels read by one sample (2^4 for 4D views).
const MAX_CORNERS: usize = 16;

/// Reads a view at fractional positions, producing `P`.
#[derive(Clone, Copy)]
pub struct Sampler<'a, T, E: Extent, L: Layout, P> {
    view: View<'a, T, E, L>,
    lookup: Lookup<P>,
    filter: Filter,
}

impl<'a, T, E, L, P> Sampler<'a, T, E, L, P>
where
    T: ConvertPixel<P>,
    E: Extent,
    L: Layout,
    P: Pixel + Mix,
{
    pub fn new(view: View<'a, T, E, L>, lookup: Lookup<P>, filter: Filter) -> Self {
        Sampler { view, lookup, filter }
    }

    pub fn view(&self) -> View<'a, T, E, L> {
        self.view
    }

    pub fn lookup(&self) -> Lookup<P> {
        self.lookup
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Texel at integer position `p`, after applying the lookup policy.
    ///
    /// # Panics
    /// Panics if the view is empty and the policy is not `Bordered`.
    pub fn fetch(&self, p: E::Pos) -> P {
        let extent = self.view.extent().to_ivec();
        let mut q = p;
        match self.lookup {
            Lookup::Bordered(border) => {
                if !self.view.contains(p) {
                    return border;
                }
            }
            Lookup::Clamped => {
                for i in 0..<E::Pos as Coords>::DIMS {
                    q[i] = p[i].clamp(0, (extent[i] - 1).max(0));
                }
            }
            Lookup::Repeated => {
                for i in 0..<E::Pos as Coords>::DIMS {
                    q[i] = p[i].rem_euclid(extent[i].max(1));
                }
            }
            Lookup::Mirrored => {
                for i in 0..<E::Pos as Coords>::DIMS {
                    let n = extent[i].max(1);
                    let m = p[i].rem_euclid(2 * n);
                    q[i] = if m >= n { 2 * n - 1 - m } else { m };
                }
            }
        }
        self.view.at(q).convert_pixel()
    }

    /// Sample at a fractional position (texel centres at integers).
    pub fn sample(&self, p: <E::Pos as Coords>::Real) -> P {
        match self.filter {
            Filter::Nearest => {
                let mut q = <E::Pos as Coords>::splat(0);
                for i in 0..<E::Pos as Coords>::DIMS {
                    q[i] = texel_floor(p[i] + 0.5);
                }
                self.fetch(q)
            }
            Filter::Linear => self.sample_linear(&p),
        }
    }

    /// Sample at normalized coordinates, `uv ∈ [0, 1]` spanning the view.
    pub fn sample_uv(&self, uv: <E::Pos as Coords>::Real) -> P {
        let extent = self.view.extent().to_ivec();
        let mut p = uv;
        for i in 0..<E::Pos as Coords>::DIMS {
            p[i] = uv[i] * extent[i] as f32 - 0.5;
        }
        self.sample(p)
    }

    fn sample_linear(&self, p: &<E::Pos as Coords>::Real) -> P {
        let dims = <E::Pos as Coords>::DIMS;
        let mut base = <E::Pos as Coords>::splat(0);
        let mut frac = [0.0f32; 4];
        for i in 0..dims {
            let f = p[i].floor();
            base[i] = texel_floor(f);
            frac[i] = p[i] - f;
        }

        // Corner c sits at base + bit i of c along axis i.
        let corners = 1usize << dims;
        let mut v = [P::zeroed(); MAX_CORNERS];
        for (c, slot) in v.iter_mut().enumerate().take(corners) {
            let mut q = base;
            for i in 0..dims {
                q[i] += ((c >> i) & 1) as i32;
            }
            *slot = self.fetch(q);
        }

        // Blend away one axis per pass; pairs differ in the lowest bit.
        let mut n = corners;
        for t in frac.iter().take(dims) {
            n /= 2;
            for j in 0..n {
                v[j] = P::mix(v[2 * j], v[2 * j + 1], *t);
            }
        }
        v[0]
    }
}

/// Bilinear (n-linear) sampler clamping at the edges.
pub fn linear_clamped<P, T, E, L>(view: View<'_, T, E, L>) -> Sampler<'_, T, E, L, P>
where
    T: ConvertPixel<P>,
    E: Extent,
    L: Layout,
    P: Pixel + Mix,
{
    Sampler::new(view, Lookup::Clamped, Filter::Linear)
}

/// Nearest-texel sampler clamping at the edges.
pub fn nearest_clamped<P, T, E, L>(view: View<'_, T, E, L>) -> Sampler<'_, T, E, L, P>
where
    T: ConvertPixel<P>,
    E: Extent,
    L: Layout,
    P: Pixel + Mix,
{
    Sampler::new(view, Lookup::Clamped, Filter::Nearest)
}
