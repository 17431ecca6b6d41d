use std::{
    io::{Cursor, Write as _},
    path::Path,
    process::{Command, Stdio},
};

use anyhow::Context as _;

use crate::{
    foundation::error::{MdlError, MdlResult},
    render::screen::FrameRGBA,
};

/// Viewer the frames are piped into by [`display_frame`].
pub const DISPLAY_PROGRAM: &str = "display";

pub fn ensure_parent_dir(path: &Path) -> MdlResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Write `frame` to `path`; the format follows the extension and defaults to PNG.
pub fn save_frame(frame: &FrameRGBA, path: &Path) -> MdlResult<()> {
    ensure_parent_dir(path)?;
    let format = image::ImageFormat::from_path(path).unwrap_or(image::ImageFormat::Png);
    let rgb = image::DynamicImage::ImageRgba8(rgba_image(frame)?).to_rgb8();
    image::save_buffer_with_format(
        path,
        &rgb,
        frame.width,
        frame.height,
        image::ColorType::Rgb8,
        format,
    )
    .map_err(|e| MdlError::collaborator(format!("write image '{}': {e}", path.display())))
}

pub fn encode_png(frame: &FrameRGBA) -> MdlResult<Vec<u8>> {
    let img = rgba_image(frame)?;
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| MdlError::collaborator(format!("encode png: {e}")))?;
    Ok(out)
}

/// Pipe the frame as PNG into [`DISPLAY_PROGRAM`] and wait for the viewer to close.
pub fn display_frame(frame: &FrameRGBA) -> MdlResult<()> {
    let png = encode_png(frame)?;
    let mut child = Command::new(DISPLAY_PROGRAM)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| MdlError::collaborator(format!("failed to spawn '{DISPLAY_PROGRAM}': {e}")))?;

    {
        let stdin = child
            .stdin
            .as_mut()
            .ok_or_else(|| MdlError::collaborator("failed to open viewer stdin"))?;
        stdin
            .write_all(&png)
            .map_err(|e| MdlError::collaborator(format!("failed to write frame to viewer: {e}")))?;
    }
    drop(child.stdin.take());

    let status = child
        .wait()
        .map_err(|e| MdlError::collaborator(format!("failed to wait for viewer: {e}")))?;
    if !status.success() {
        return Err(MdlError::collaborator(format!(
            "'{DISPLAY_PROGRAM}' exited with status {status}"
        )));
    }
    Ok(())
}

pub(crate) fn rgba_image(frame: &FrameRGBA) -> MdlResult<image::RgbaImage> {
    image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone()).ok_or_else(|| {
        MdlError::validation(format!(
            "frame buffer of {} bytes does not match {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/image_io.rs"]
mod tests;
