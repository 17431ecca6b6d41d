use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::Context as _;

use crate::{
    encode::image_io::ensure_parent_dir,
    foundation::error::{MdlError, MdlResult},
};

/// Container the saved frames are combined into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssembleFormat {
    /// Looping GIF, encoded in-process.
    #[default]
    Gif,
    /// H.264 MP4 through the system `ffmpeg`.
    Mp4,
}

impl AssembleFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Gif => "gif",
            Self::Mp4 => "mp4",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssembleConfig {
    pub format: AssembleFormat,
    pub fps: u32,
    /// Destination directory; `None` writes next to the first frame.
    pub out_dir: Option<PathBuf>,
}

impl Default for AssembleConfig {
    fn default() -> Self {
        Self {
            format: AssembleFormat::Gif,
            fps: 30,
            out_dir: None,
        }
    }
}

impl AssembleConfig {
    pub fn validate(&self) -> MdlResult<()> {
        if self.fps == 0 {
            return Err(MdlError::validation("assembly fps must be non-zero"));
        }
        Ok(())
    }

    /// `<dir>/<basename>.<ext>` where `dir` is `out_dir` or the first frame's directory.
    pub fn output_path(&self, basename: &str, frames: &[PathBuf]) -> PathBuf {
        let dir = self.out_dir.clone().unwrap_or_else(|| {
            frames
                .first()
                .and_then(|p| p.parent())
                .map(Path::to_path_buf)
                .unwrap_or_default()
        });
        dir.join(format!("{basename}.{}", self.format.extension()))
    }
}

/// Combine `frames` (in order) into one animation and return its path.
pub fn assemble_frames(
    cfg: &AssembleConfig,
    basename: &str,
    frames: &[PathBuf],
) -> MdlResult<PathBuf> {
    cfg.validate()?;
    if frames.is_empty() {
        return Err(MdlError::validation("no frames to assemble"));
    }
    let out = cfg.output_path(basename, frames);
    ensure_parent_dir(&out)?;
    match cfg.format {
        AssembleFormat::Gif => write_gif(&out, frames, cfg.fps)?,
        AssembleFormat::Mp4 => write_mp4(&out, frames, cfg.fps)?,
    }
    Ok(out)
}

fn load_rgba(path: &Path) -> MdlResult<image::RgbaImage> {
    let img = image::open(path)
        .map_err(|e| MdlError::collaborator(format!("read frame '{}': {e}", path.display())))?;
    Ok(img.to_rgba8())
}

fn write_gif(out: &Path, frames: &[PathBuf], fps: u32) -> MdlResult<()> {
    use image::codecs::gif::{GifEncoder, Repeat};

    let file =
        File::create(out).with_context(|| format!("create animation '{}'", out.display()))?;
    let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), 10);
    encoder
        .set_repeat(Repeat::Infinite)
        .map_err(|e| MdlError::collaborator(format!("gif encoder: {e}")))?;

    let delay = image::Delay::from_numer_denom_ms(1000, fps);
    for path in frames {
        let frame = image::Frame::from_parts(load_rgba(path)?, 0, 0, delay);
        encoder
            .encode_frame(frame)
            .map_err(|e| MdlError::collaborator(format!("gif encode '{}': {e}", path.display())))?;
    }
    Ok(())
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Stream the decoded frames as raw RGBA into `ffmpeg`.
fn write_mp4(out: &Path, frames: &[PathBuf], fps: u32) -> MdlResult<()> {
    let first = load_rgba(&frames[0])?;
    let (width, height) = first.dimensions();
    if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
        return Err(MdlError::validation(
            "frame width/height must be even (required for yuv420p mp4 output)",
        ));
    }
    if !is_ffmpeg_on_path() {
        return Err(MdlError::collaborator(
            "ffmpeg is required for MP4 assembly, but was not found on PATH",
        ));
    }

    let mut child = Command::new("ffmpeg")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .args(["-y", "-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgba"])
        .args(["-s", &format!("{width}x{height}")])
        .args(["-framerate", &fps.to_string(), "-i", "pipe:0"])
        .args(["-c:v", "libx264", "-pix_fmt", "yuv420p"])
        .arg(out)
        .spawn()
        .map_err(|e| MdlError::collaborator(format!("failed to spawn ffmpeg: {e}")))?;

    let written = (|| -> MdlResult<()> {
        let stdin = child
            .stdin
            .as_mut()
            .ok_or_else(|| MdlError::collaborator("failed to open ffmpeg stdin (unexpected)"))?;
        stdin
            .write_all(first.as_raw())
            .map_err(|e| MdlError::collaborator(format!("failed to write frame to ffmpeg: {e}")))?;
        for path in &frames[1..] {
            let img = load_rgba(path)?;
            if img.dimensions() != (width, height) {
                return Err(MdlError::validation(format!(
                    "frame '{}' is {}x{}, expected {width}x{height}",
                    path.display(),
                    img.width(),
                    img.height()
                )));
            }
            stdin.write_all(img.as_raw()).map_err(|e| {
                MdlError::collaborator(format!("failed to write frame to ffmpeg: {e}"))
            })?;
        }
        Ok(())
    })();
    drop(child.stdin.take());

    let output = child
        .wait_with_output()
        .map_err(|e| MdlError::collaborator(format!("failed to wait for ffmpeg to finish: {e}")))?;
    written?;
    if !output.status.success() {
        return Err(MdlError::collaborator(format!(
            "ffmpeg exited with status {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/assemble.rs"]
mod tests;
