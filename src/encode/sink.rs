use std::path::{Path, PathBuf};

use crate::{foundation::error::MdlResult, render::screen::FrameRGBA};

/// Output collaborator for rendered frames.
///
/// The executor calls `save`/`display` in opcode order within a frame and frames in increasing
/// index order; `assemble` is called at most once, after the last frame of an animation.
pub trait FrameSink: Send {
    /// Write `frame` to `path`.
    fn save(&mut self, frame: &FrameRGBA, path: &Path) -> MdlResult<()>;
    /// Show `frame` to the user.
    fn display(&mut self, frame: &FrameRGBA) -> MdlResult<()>;
    /// Combine previously saved frame files into one animation named after `basename`.
    fn assemble(&mut self, basename: &str, frames: &[PathBuf]) -> MdlResult<()>;
}

/// One call recorded by a [`MemorySink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkEvent {
    Saved { path: PathBuf, frame: FrameRGBA },
    Displayed { frame: FrameRGBA },
    Assembled { basename: String, frames: Vec<PathBuf> },
}

/// In-memory sink for tests, embedding and parallel workers.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    events: Vec<SinkEvent>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded calls in call order.
    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<SinkEvent> {
        self.events
    }

    /// Paths of every saved frame, in call order.
    pub fn saved_paths(&self) -> Vec<&Path> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Saved { path, .. } => Some(path.as_path()),
                _ => None,
            })
            .collect()
    }

    /// Forward every recorded call to `sink`, in recording order.
    pub fn replay_into(self, sink: &mut dyn FrameSink) -> MdlResult<()> {
        for event in self.events {
            match event {
                SinkEvent::Saved { path, frame } => sink.save(&frame, &path)?,
                SinkEvent::Displayed { frame } => sink.display(&frame)?,
                SinkEvent::Assembled { basename, frames } => sink.assemble(&basename, &frames)?,
            }
        }
        Ok(())
    }
}

impl FrameSink for MemorySink {
    fn save(&mut self, frame: &FrameRGBA, path: &Path) -> MdlResult<()> {
        self.events.push(SinkEvent::Saved {
            path: path.to_path_buf(),
            frame: frame.clone(),
        });
        Ok(())
    }

    fn display(&mut self, frame: &FrameRGBA) -> MdlResult<()> {
        self.events.push(SinkEvent::Displayed {
            frame: frame.clone(),
        });
        Ok(())
    }

    fn assemble(&mut self, basename: &str, frames: &[PathBuf]) -> MdlResult<()> {
        self.events.push(SinkEvent::Assembled {
            basename: basename.to_string(),
            frames: frames.to_vec(),
        });
        Ok(())
    }
}

/// Zero-padding width for frame numbers.
///
/// Always wide enough for `num_frames - 1`, so files sort in frame order. Without an override the
/// width is at least 3; an override narrower than the last frame number is widened.
pub fn frame_digits(num_frames: u32, override_digits: Option<usize>) -> usize {
    let widest = num_frames.saturating_sub(1).max(1).ilog10() as usize + 1;
    match override_digits {
        Some(d) => d.max(widest),
        None => widest.max(3),
    }
}

/// `<basename><k zero-padded>.png`
pub fn frame_file_name(basename: &str, index: u32, digits: usize) -> String {
    format!("{basename}{index:0digits$}.png")
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
