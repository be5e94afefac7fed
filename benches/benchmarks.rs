// benches/benchmarks.rs -- Iteration, copy and sampling benchmarks.
//
//   cargo bench
//
// All inputs are synthetic 752×480 scenes, so the numbers compare layouts
// and view transforms on the same data.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use texview::convert::convert_image;
use texview::resample::downsample_2x;
use texview::sampler::linear_clamped;
use texview::{Extent2, Image, ZOrder};

// ============================================================
// Helpers
// ============================================================

const W: i32 = 752;
const H: i32 = 480;

/// Gradient with a few bright rectangles.
fn make_scene() -> Image<u8, Extent2> {
    let mut img = Image::defaulted(Extent2::new(W, H));
    for (p, v) in img.view_mut().entries_mut() {
        *v = ((p[0] * 200 / W) + (p[1] * 55 / H)) as u8;
    }
    for rect in 0..6 {
        let start = [50 + rect * 100, 40 + (rect % 3) * 120];
        img.view_mut().subview(start, [80, 60]).fill(180 + rect as u8 * 10);
    }
    img
}

// ============================================================
// Benchmarks
// ============================================================

fn bench_iterate(c: &mut Criterion) {
    let img = make_scene();
    let z: Image<u8, Extent2, ZOrder> = Image::from_view(img.view());

    let mut group = c.benchmark_group("iterate");
    group.bench_function("linear_sum", |b| {
        b.iter(|| img.view().pixels().map(|&v| v as u64).sum::<u64>())
    });
    group.bench_function("swapped_sum", |b| {
        b.iter(|| img.view().swapped_xy().pixels().map(|&v| v as u64).sum::<u64>())
    });
    group.bench_function("zorder_sum", |b| {
        b.iter(|| z.view().pixels().map(|&v| v as u64).sum::<u64>())
    });
    group.finish();
}

fn bench_copy(c: &mut Criterion) {
    let img = make_scene();
    let mut dst = Image::<u8, Extent2>::defaulted(Extent2::new(W, H));
    let mut z = Image::<u8, Extent2, ZOrder>::defaulted(Extent2::new(W, H));

    let mut group = c.benchmark_group("copy");
    group.bench_function("linear_to_linear", |b| {
        b.iter(|| img.view().copy_to(&mut dst.view_mut()))
    });
    group.bench_function("mirrored_to_linear", |b| {
        b.iter(|| img.view().mirrored_y().copy_to(&mut dst.view_mut()))
    });
    group.bench_function("linear_to_zorder", |b| {
        b.iter(|| img.view().copy_to(&mut z.view_mut()))
    });
    group.bench_function("u8_to_f32", |b| {
        b.iter(|| convert_image::<f32, _, _, _>(img.view()))
    });
    group.finish();
}

fn bench_sample(c: &mut Criterion) {
    let img = make_scene();
    let s = linear_clamped::<f32, _, _, _>(img.view());

    let mut group = c.benchmark_group("sample");
    for n in [1_000usize, 100_000] {
        group.bench_with_input(BenchmarkId::new("bilinear", n), &n, |b, &n| {
            b.iter(|| {
                let mut acc = 0.0f32;
                for i in 0..n {
                    let x = (i % W as usize) as f32 + 0.37;
                    let y = ((i * 7) % H as usize) as f32 + 0.61;
                    acc += s.sample(black_box([x, y]));
                }
                acc
            })
        });
    }
    group.bench_function("downsample_2x", |b| {
        b.iter(|| downsample_2x::<f32, _, _>(img.view()))
    });
    group.finish();
}

criterion_group!(benches, bench_iterate, bench_copy, bench_sample);
criterion_main!(benches);
