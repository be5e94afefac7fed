// tests/test_sampler.rs — Integration tests for filtered reads.

use texview::sampler::{linear_clamped, nearest_clamped};
use texview::{Extent2, Filter, Image, Lookup, Rgb, Sampler, ZOrder};

fn ramp() -> Image<f32, Extent2> {
    // [[ 0, 10, 20],
    //  [30, 40, 50]]
    Image::from_vec(Extent2::new(3, 2), vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0])
}

#[test]
fn bilinear_is_exact_at_texel_centres() {
    let img = ramp();
    let s = linear_clamped::<f32, _, _, _>(img.view());
    for p in img.positions() {
        let v = s.sample([p[0] as f32, p[1] as f32]);
        assert!((v - img[p]).abs() < 1e-6, "at {p:?}: {v}");
    }
}

#[test]
fn bilinear_interpolates_between_texels() {
    let img = ramp();
    let s = linear_clamped::<f32, _, _, _>(img.view());
    // Halfway between (0,0) and (1,1): mean of 0, 10, 30, 40.
    assert!((s.sample([0.5, 0.5]) - 20.0).abs() < 1e-6);
    // A plane is reproduced exactly by bilinear interpolation.
    assert!((s.sample([1.25, 0.75]) - (12.5 + 22.5)).abs() < 1e-5);
}

#[test]
fn clamped_lookup_outside() {
    let img = ramp();
    let s = linear_clamped::<f32, _, _, _>(img.view());
    assert!((s.sample([-3.0, -3.0]) - 0.0).abs() < 1e-6);
    assert!((s.sample([9.0, 9.0]) - 50.0).abs() < 1e-6);
}

#[test]
fn bordered_lookup_blends_with_border() {
    let img = ramp();
    let s = Sampler::new(img.view(), Lookup::Bordered(100.0f32), Filter::Linear);
    assert_eq!(s.fetch([-1, 0]), 100.0);
    assert!((s.sample([-0.5, 0.0]) - 50.0).abs() < 1e-6);
}

#[test]
fn repeated_lookup_wraps() {
    let img = ramp();
    let s = Sampler::new(img.view(), Lookup::<f32>::Repeated, Filter::Nearest);
    assert_eq!(s.fetch([3, 0]), 0.0);
    assert_eq!(s.fetch([-1, -1]), 50.0);
}

#[test]
fn u8_samples_as_normalized_f32() {
    let img = Image::from_vec(Extent2::new(2, 1), vec![0u8, 255]);
    let s = linear_clamped::<f32, _, _, _>(img.view());
    assert!((s.sample([0.0, 0.0]) - 0.0).abs() < 1e-6);
    assert!((s.sample([1.0, 0.0]) - 1.0).abs() < 1e-6);
    assert!((s.sample([0.5, 0.0]) - 0.5).abs() < 1e-6);
}

#[test]
fn rgb_samples_componentwise() {
    let img = Image::from_vec(
        Extent2::new(2, 1),
        vec![Rgb::new(0u8, 255, 0), Rgb::new(255u8, 255, 0)],
    );
    let s = linear_clamped::<Rgb<f32>, _, _, _>(img.view());
    let c = s.sample([0.5, 0.0]);
    assert!((c.r - 0.5).abs() < 1e-6);
    assert!((c.g - 1.0).abs() < 1e-6);
    assert!(c.b.abs() < 1e-6);
}

#[test]
fn sampling_transformed_and_zorder_views() {
    let img = ramp();
    let s = nearest_clamped::<f32, _, _, _>(img.view().mirrored_y());
    assert_eq!(s.sample([0.2, 0.1]), 30.0);

    let z: Image<f32, Extent2, ZOrder> = Image::from_view(img.view());
    let sz = linear_clamped::<f32, _, _, _>(z.view());
    assert!((sz.sample([1.5, 0.5]) - 30.0).abs() < 1e-6);
}

#[test]
fn uv_coordinates_span_the_view() {
    let img = ramp();
    let s = linear_clamped::<f32, _, _, _>(img.view());
    assert!((s.sample_uv([0.0, 0.0]) - 0.0).abs() < 1e-6);
    assert!((s.sample_uv([1.0, 1.0]) - 50.0).abs() < 1e-6);
    assert!((s.sample_uv([0.5, 0.5]) - 25.0).abs() < 1e-6);
}

#[test]
fn bilinear_is_bit_exact() {
    // [[0.1, 0.1, 0.7],
    //  [0.3, 0.9, 0.2]]
    let img = Image::from_vec(Extent2::new(3, 2), vec![0.1f32, 0.1, 0.7, 0.3, 0.9, 0.2]);
    let s = linear_clamped::<f32, _, _, _>(img.view());
    for p in img.positions() {
        assert_eq!(s.sample([p[0] as f32, p[1] as f32]), img[p], "at {p:?}");
    }
    // Midway between two equal neighbours.
    assert_eq!(s.sample([0.5, 0.0]), 0.1);
}

#[test]
fn far_outside_samples_every_lookup() {
    let img = Image::<f32, Extent2>::filled(Extent2::new(4, 4), 2.0);
    let lookups = [Lookup::Clamped, Lookup::Repeated, Lookup::Mirrored, Lookup::Bordered(2.0f32)];
    for lookup in lookups {
        let s = Sampler::new(img.view(), lookup, Filter::Linear);
        assert_eq!(s.sample([3.0e9, 1.0]), 2.0, "{lookup:?}");
        assert_eq!(s.sample([1.0, -3.0e9]), 2.0, "{lookup:?}");
    }
    let s = linear_clamped::<f32, _, _, _>(img.view());
    assert_eq!(s.sample([3.0e9, 1.0]), 2.0);
}
