use std::path::{Path, PathBuf};

use crate::{
    encode::{
        assemble::{AssembleConfig, assemble_frames},
        image_io::{display_frame, save_frame},
        sink::FrameSink,
    },
    foundation::error::MdlResult,
    render::screen::FrameRGBA,
};

/// Sink backed by the filesystem, an external viewer and an animation encoder.
#[derive(Clone, Debug, Default)]
pub struct FileSink {
    assemble: AssembleConfig,
    assembled: Option<PathBuf>,
}

impl FileSink {
    pub fn new(assemble: AssembleConfig) -> Self {
        Self {
            assemble,
            assembled: None,
        }
    }

    /// Path of the animation written by the last `assemble` call.
    pub fn assembled(&self) -> Option<&Path> {
        self.assembled.as_deref()
    }
}

impl FrameSink for FileSink {
    fn save(&mut self, frame: &FrameRGBA, path: &Path) -> MdlResult<()> {
        save_frame(frame, path)
    }

    fn display(&mut self, frame: &FrameRGBA) -> MdlResult<()> {
        display_frame(frame)
    }

    fn assemble(&mut self, basename: &str, frames: &[PathBuf]) -> MdlResult<()> {
        let out = assemble_frames(&self.assemble, basename, frames)?;
        tracing::info!(path = %out.display(), frames = frames.len(), "assembled animation");
        self.assembled = Some(out);
        Ok(())
    }
}
