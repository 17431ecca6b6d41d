use std::path::PathBuf;

use crate::foundation::{
    core::Rgba8,
    error::{MdlError, MdlResult},
};

/// Upper bound on [`RenderSettings::step`].
pub const MAX_STEP: u32 = 4096;

/// Screen, tessellation and output configuration for a run.
///
/// Every field has a default, so scripts may embed a partial settings object.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Screen width in pixels.
    pub width: u32,
    /// Screen height in pixels.
    pub height: u32,
    /// Color the screen is cleared to at the start of every frame.
    pub clear_rgba: [u8; 4],
    /// Stroke color for shapes without a material.
    pub draw_rgba: [u8; 4],
    /// Subdivisions per full turn for spheres and tori, in `3..=MAX_STEP`.
    pub step: u32,
    /// Directory animation frames are written to.
    pub out_dir: PathBuf,
    /// Zero-padding width of frame numbers. `None` picks the smallest width (at least 3) that
    /// keeps every frame of the run in lexicographic order; a narrower override is widened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_digits: Option<usize>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            clear_rgba: Rgba8::WHITE.to_array(),
            draw_rgba: Rgba8::BLACK.to_array(),
            step: 20,
            out_dir: PathBuf::from("anim"),
            frame_digits: None,
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> MdlResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(MdlError::validation("screen width/height must be non-zero"));
        }
        if u16::try_from(self.width).is_err() || u16::try_from(self.height).is_err() {
            return Err(MdlError::validation(format!(
                "screen {}x{} exceeds the {}px limit",
                self.width,
                self.height,
                u16::MAX
            )));
        }
        if !(3..=MAX_STEP).contains(&self.step) {
            return Err(MdlError::validation(format!(
                "tessellation step {} is outside 3..={MAX_STEP}",
                self.step
            )));
        }
        if self.frame_digits == Some(0) {
            return Err(MdlError::validation("frame_digits must be >= 1 when set"));
        }
        Ok(())
    }

    pub fn clear_color(&self) -> Rgba8 {
        Rgba8::from_array(self.clear_rgba)
    }

    pub fn draw_color(&self) -> Rgba8 {
        Rgba8::from_array(self.draw_rgba)
    }
}
