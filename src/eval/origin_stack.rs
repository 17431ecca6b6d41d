use glam::DMat4;

use crate::foundation::{
    error::{MdlError, MdlResult},
    math,
};

/// Stack of coordinate-frame transforms.
///
/// The bottom entry is the world frame; the stack never drops below it. Entries are plain
/// values, so a pushed frame never aliases the one beneath it.
#[derive(Clone, Debug)]
pub struct OriginStack {
    frames: Vec<DMat4>,
}

impl Default for OriginStack {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginStack {
    /// A stack holding only the identity world frame.
    pub fn new() -> Self {
        Self {
            frames: vec![DMat4::IDENTITY],
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Duplicate the top so the new frame inherits the current transform.
    pub fn push(&mut self) {
        let top = *self.peek();
        self.frames.push(top);
    }

    pub fn pop(&mut self) -> MdlResult<DMat4> {
        if self.frames.len() <= 1 {
            return Err(MdlError::EmptyStack);
        }
        self.frames.pop().ok_or(MdlError::EmptyStack)
    }

    pub fn peek(&self) -> &DMat4 {
        // Non-empty by construction: `pop` refuses to remove the world frame.
        &self.frames[self.frames.len() - 1]
    }

    pub fn replace_top(&mut self, transform: DMat4) {
        let last = self.frames.len() - 1;
        self.frames[last] = transform;
    }

    /// Fold a local transform into the current frame (`top = top * local`).
    pub fn fold(&mut self, local: &DMat4) {
        let folded = math::compose(self.peek(), local);
        self.replace_top(folded);
    }

    /// Back to `[identity]`.
    pub fn reset(&mut self) {
        self.frames.clear();
        self.frames.push(DMat4::IDENTITY);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/origin_stack.rs"]
mod tests;
