// tests/test_codec.rs — Writing views to files and reading them back with
// the `image` crate.

#![cfg(feature = "codec")]

use std::path::PathBuf;

use texview::codec::{write, CodecError};
use texview::{Extent2, Image, Rgb, ZOrder};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("texview_{}_{name}", std::process::id()))
}

#[test]
fn write_u8_png_round_trip() {
    let data: Vec<u8> = (0..12).map(|v| v * 20).collect();
    let img = Image::from_vec(Extent2::new(4, 3), data.clone());
    let path = temp_path("gray.png");
    write(img.view(), &path).expect("write png");

    let back = image::open(&path).expect("read png").into_luma8();
    assert_eq!(back.dimensions(), (4, 3));
    assert_eq!(back.into_raw(), data);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn write_mirrored_view_is_repacked() {
    let img = Image::from_vec(Extent2::new(2, 2), vec![1u8, 2, 3, 4]);
    let path = temp_path("mirrored.png");
    write(img.view().mirrored_y(), &path).expect("write png");

    let back = image::open(&path).expect("read png").into_luma8();
    assert_eq!(back.into_raw(), vec![3, 4, 1, 2]);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn write_float_rgb_as_8bit() {
    let img = Image::<Rgb<f32>, Extent2>::filled(Extent2::new(3, 1), Rgb::new(1.0, 0.5, 0.0));
    let path = temp_path("rgb.png");
    write(img.view(), &path).expect("write png");

    let back = image::open(&path).expect("read png").into_rgb8();
    assert!(back.pixels().all(|p| p.0 == [255, 128, 0]));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn write_u16_png_keeps_depth() {
    let img = Image::<u16, Extent2, ZOrder>::filled(Extent2::new(3, 3), 40000);
    let path = temp_path("deep.png");
    write(img.view(), &path).expect("write png");

    let back = image::open(&path).expect("read png").into_luma16();
    assert!(back.into_raw().iter().all(|&v| v == 40000));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn write_hdr_from_u8() {
    let img = Image::<[u8; 3], Extent2>::filled(Extent2::new(2, 2), [255, 0, 255]);
    let path = temp_path("sky.HDR");
    write(img.view(), &path).expect("write hdr");

    let back = image::open(&path).expect("read hdr").into_rgb32f();
    assert_eq!(back.dimensions(), (2, 2));
    assert!(back.pixels().all(|p| (p.0[0] - 1.0).abs() < 0.02 && p.0[1].abs() < 0.02));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn unsupported_channel_count() {
    let img = Image::<[u8; 5], Extent2>::defaulted(Extent2::new(1, 1));
    let err = write(img.view(), temp_path("five.png")).unwrap_err();
    assert!(matches!(err, CodecError::UnsupportedLayout { channels: 5, bit_depth: 8 }));
}

#[test]
#[should_panic(expected = "no file extension")]
fn missing_extension_panics() {
    let img = Image::<u8, Extent2>::defaulted(Extent2::new(1, 1));
    let _ = write(img.view(), temp_path("noext"));
}
