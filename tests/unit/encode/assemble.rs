use image::AnimationDecoder as _;

use super::*;
use crate::{encode::image_io::save_frame, render::screen::FrameRGBA};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("unit-assemble")
        .join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn solid(shade: u8) -> FrameRGBA {
    FrameRGBA {
        width: 4,
        height: 4,
        data: [shade, shade, shade, 255].repeat(16),
    }
}

#[test]
fn output_path_defaults_to_the_frame_directory() {
    let cfg = AssembleConfig::default();
    let frames = vec![PathBuf::from("anim/demo000.png")];
    assert_eq!(cfg.output_path("demo", &frames), PathBuf::from("anim/demo.gif"));

    let cfg = AssembleConfig {
        format: AssembleFormat::Mp4,
        out_dir: Some(PathBuf::from("out")),
        ..AssembleConfig::default()
    };
    assert_eq!(cfg.output_path("demo", &frames), PathBuf::from("out/demo.mp4"));
}

#[test]
fn gif_contains_every_frame_in_order() {
    let dir = scratch_dir("gif");
    let frames: Vec<PathBuf> = (0..3u8)
        .map(|k| {
            let path = dir.join(format!("g{k:03}.png"));
            save_frame(&solid(k * 100), &path).unwrap();
            path
        })
        .collect();

    let out = assemble_frames(&AssembleConfig::default(), "g", &frames).unwrap();
    assert_eq!(out, dir.join("g.gif"));

    let decoder =
        image::codecs::gif::GifDecoder::new(std::io::BufReader::new(File::open(&out).unwrap()))
            .unwrap();
    let decoded = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(decoded.len(), 3);
    let shades: Vec<u8> = decoded.iter().map(|f| f.buffer().get_pixel(0, 0).0[0]).collect();
    assert!(shades[0] < shades[1] && shades[1] < shades[2], "{shades:?}");
}

#[test]
fn empty_frame_list_and_zero_fps_are_rejected() {
    assert!(matches!(
        assemble_frames(&AssembleConfig::default(), "x", &[]),
        Err(MdlError::Validation(_))
    ));
    let cfg = AssembleConfig {
        fps: 0,
        ..AssembleConfig::default()
    };
    assert!(matches!(
        assemble_frames(&cfg, "x", &[PathBuf::from("a.png")]),
        Err(MdlError::Validation(_))
    ));
}

#[test]
fn format_names_parse_lowercase() {
    let f: AssembleFormat = serde_json::from_str("\"mp4\"").unwrap();
    assert_eq!(f, AssembleFormat::Mp4);
    assert_eq!(AssembleFormat::default().extension(), "gif");
}
