use std::path::PathBuf;

use super::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("unit-image-io")
        .join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn checker() -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 2,
        data: vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 255,
        ],
    }
}

#[test]
fn saves_png_and_creates_parent_dirs() {
    let path = scratch_dir("png").join("nested").join("frame000.png");
    save_frame(&checker(), &path).unwrap();

    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (2, 2));
    assert_eq!(img.get_pixel(1, 0).0, [0, 255, 0]);
    assert_eq!(img.get_pixel(0, 1).0, [0, 0, 255]);
}

#[test]
fn unknown_extension_falls_back_to_png() {
    let path = scratch_dir("noext").join("frame");
    save_frame(&checker(), &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn mismatched_buffer_is_rejected() {
    let bad = FrameRGBA {
        width: 3,
        height: 3,
        data: vec![0; 4],
    };
    assert!(matches!(
        save_frame(&bad, &scratch_dir("bad").join("x.png")),
        Err(MdlError::Validation(_))
    ));
    assert!(matches!(encode_png(&bad), Err(MdlError::Validation(_))));
}

#[test]
fn png_bytes_decode_back_to_the_frame() {
    let png = encode_png(&checker()).unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(img.into_raw(), checker().data);
}

#[test]
fn saved_rgb_keeps_color_channels_and_drops_alpha() {
    let frame = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![10, 20, 30, 0],
    };
    let path = scratch_dir("alpha").join("a.png");
    save_frame(&frame, &path).unwrap();

    let img = image::open(&path).unwrap();
    assert_eq!(img.color(), image::ColorType::Rgb8);
    assert_eq!(img.to_rgb8().get_pixel(0, 0).0, [10, 20, 30]);
}
