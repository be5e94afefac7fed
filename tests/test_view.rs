// tests/test_view.rs — Integration tests for views: transforms, iteration,
// copying.
//
// Only the public API is used here, so these double as a check that views
// compose the way a caller would write them.

use texview::{Extent1, Extent2, Extent3, ExtentCube, Image, Layout, Linear, Pixel, View, ZOrder};

/// Row-major rows of a 2D view, read through `at`.
fn rows<T: Pixel, L: Layout>(v: View<'_, T, Extent2, L>) -> Vec<Vec<T>> {
    let e = v.extent();
    (0..e.height).map(|y| (0..e.width).map(|x| *v.at([x, y])).collect()).collect()
}

fn sample_2x2() -> Image<i32, Extent2> {
    // [[1, 2],
    //  [3, 4]]
    Image::from_vec(Extent2::new(2, 2), vec![1, 2, 3, 4])
}

// ===== The 2×2 scenario =====

#[test]
fn mirror_x_of_2x2() {
    let img = sample_2x2();
    assert_eq!(rows(img.view().mirrored_x()), vec![vec![2, 1], vec![4, 3]]);
}

#[test]
fn swap_xy_of_2x2() {
    let img = sample_2x2();
    assert_eq!(rows(img.view().swapped_xy()), vec![vec![1, 3], vec![2, 4]]);
}

#[test]
fn subview_column_of_2x2() {
    let img = sample_2x2();
    let col = img.view().subview([1, 0], [1, 2]);
    assert_eq!(col.extent(), Extent2::new(1, 2));
    assert_eq!(rows(col), vec![vec![2], vec![4]]);
}

// ===== Involutions =====

#[test]
fn mirror_and_swap_are_involutions() {
    let data: Vec<u16> = (0..35).collect();
    let img = Image::from_vec(Extent2::new(7, 5), data);
    let v = img.view();
    assert_eq!(rows(v.mirrored_x().mirrored_x()), rows(v));
    assert_eq!(rows(v.mirrored_y().mirrored_y()), rows(v));
    assert_eq!(rows(v.swapped_xy().swapped_xy()), rows(v));
    assert_eq!(v.mirrored_x().mirrored_x().data_ptr(), v.data_ptr());
    assert_eq!(v.swapped_xy().swapped_xy().stride_bytes(), v.stride_bytes());
}

#[test]
fn zorder_mirror_and_swap_are_involutions() {
    let mut img = Image::<u32, Extent2, ZOrder>::defaulted(Extent2::new(5, 3));
    for (p, v) in img.view_mut().entries_mut() {
        *v = (p[0] * 100 + p[1]) as u32;
    }
    let v = img.view();
    assert_eq!(rows(v.mirrored_y().mirrored_y()), rows(v));
    assert_eq!(rows(v.swapped_xy().swapped_xy()), rows(v));
    assert_eq!(*v.mirrored_x().at([0, 2]), 402);
}

fn volume<L: Layout>() -> Image<u32, Extent3, L> {
    let mut img = Image::<u32, Extent3, L>::defaulted(Extent3::new(3, 2, 4));
    for (p, v) in img.view_mut().entries_mut() {
        *v = (p[0] + 10 * p[1] + 100 * p[2]) as u32;
    }
    img
}

fn same_volume<L: Layout>(a: View<'_, u32, Extent3, L>, b: View<'_, u32, Extent3, L>) -> bool {
    a.extent() == b.extent() && a.positions().all(|p| a[p] == b[p])
}

#[test]
fn volume_mirror_and_swap_are_involutions() {
    let img = volume::<Linear>();
    let v = img.view();
    assert!(same_volume(v.mirrored_x().mirrored_x(), v));
    assert!(same_volume(v.mirrored_y().mirrored_y(), v));
    assert!(same_volume(v.mirrored_z().mirrored_z(), v));
    assert!(same_volume(v.swapped_xz().swapped_xz(), v));
    assert!(same_volume(v.swapped_yz().swapped_yz(), v));
    assert_eq!(v.mirrored_z()[[2, 1, 0]], 312);
    assert_eq!(v.swapped_xz().extent(), Extent3::new(4, 2, 3));
    assert_eq!(v.swapped_xz()[[3, 1, 2]], 312);

    let z = volume::<ZOrder>();
    let zv = z.view();
    assert!(same_volume(zv.mirrored_z().mirrored_z(), zv));
    assert_eq!(zv.mirrored_z()[[1, 0, 1]], 201);
}

#[test]
fn cube_faces_swap_in_plane() {
    let mut cube = Image::<u8, ExtentCube>::defaulted(ExtentCube::new(2));
    cube[[1, 0, 4]] = 9;
    let swapped = cube.view().swapped_xy();
    assert_eq!(swapped.extent(), ExtentCube::new(2));
    assert_eq!(swapped[[0, 1, 4]], 9);
}

// ===== Subviews & boundaries =====

#[test]
fn subview_reads_parent_elements() {
    let data: Vec<i32> = (0..24).collect();
    let img = Image::from_vec(Extent3::new(4, 3, 2), data);
    let sub = img.view().subview([1, 1, 1], [2, 2, 1]);
    for p in sub.positions() {
        let q = [p[0] + 1, p[1] + 1, p[2] + 1];
        assert_eq!(sub[p], img[q], "mismatch at {p:?}");
    }
}

#[test]
fn boundary_predicate_on_4x4() {
    let img = Image::<u8, Extent2>::defaulted(Extent2::new(4, 4));
    let v = img.view();
    let boundary = v.positions().filter(|&p| v.is_on_boundary(p)).count();
    assert_eq!(boundary, 12);
    assert!(v.is_on_boundary([0, 2]));
    assert!(v.is_on_boundary([3, 3]));
    assert!(!v.is_on_boundary([1, 2]));
}

#[test]
fn slices_of_a_volume() {
    let data: Vec<i32> = (0..24).collect();
    let img = Image::from_vec(Extent3::new(4, 3, 2), data);
    let plane = img.view().sliced_at::<2>(1);
    assert_eq!(plane.extent(), Extent2::new(4, 3));
    assert_eq!(plane[[0, 0]], 12);
    let line = plane.row(2);
    assert_eq!(line.extent(), Extent1::new(4));
    assert_eq!(line[[3]], 23);
}

// ===== Mutation through views =====

#[test]
fn write_through_mirrored_subview() {
    let mut img = Image::<u8, Extent2>::defaulted(Extent2::new(4, 4));
    img.view_mut().subview([0, 0], [2, 4]).mirrored_y().row(0).fill(9);
    assert_eq!(img[[0, 3]], 9);
    assert_eq!(img[[1, 3]], 9);
    assert_eq!(img[[2, 3]], 0);
    assert_eq!(img.as_slice().iter().filter(|&&v| v == 9).count(), 2);
}

#[test]
fn copy_between_layouts() {
    let src = sample_2x2();
    let mut dst = Image::<i32, Extent2, ZOrder>::defaulted(Extent2::new(2, 2));
    src.view().swapped_xy().copy_to(&mut dst.view_mut());
    assert_eq!(rows(dst.view()), vec![vec![1, 3], vec![2, 4]]);
}

#[test]
fn copy_converts_u8_to_f32() {
    let src = Image::from_vec(Extent2::new(2, 1), vec![0u8, 255]);
    let mut dst = Image::<f32, Extent2>::defaulted(Extent2::new(2, 1));
    src.view().copy_to(&mut dst.view_mut());
    assert!((dst[[0, 0]] - 0.0).abs() < 1e-6);
    assert!((dst[[1, 0]] - 1.0).abs() < 1e-6);
}

#[test]
#[should_panic(expected = "extents differ")]
fn copy_rejects_extent_mismatch() {
    let src = sample_2x2();
    let mut dst = Image::<i32, Extent2>::defaulted(Extent2::new(3, 2));
    src.view().copy_to(&mut dst.view_mut());
}

#[test]
#[should_panic(expected = "exceeds view extent")]
fn subview_out_of_range_panics() {
    let img = sample_2x2();
    let _ = img.view().subview([1, 1], [2, 1]);
}

#[test]
fn view_over_borrowed_slice() {
    let data = [5u8, 6, 7, 8, 9, 10];
    let v = View::from_slice(&data, Extent2::new(3, 2));
    assert_eq!(v[[2, 1]], 10);
    assert_eq!(v.as_slice(), Some(&data[..]));
    assert_eq!(v.mirrored_x().as_slice(), None);
}
