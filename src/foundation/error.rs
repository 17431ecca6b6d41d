/// Convenience result type used across the engine.
pub type MdlResult<T> = Result<T, MdlError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum MdlError {
    /// Animation configuration that cannot be scheduled (e.g. `vary` without `frames`).
    #[error("config error: {0}")]
    Config(String),

    /// A `vary` opcode whose frame range is empty or reversed.
    #[error("invalid range: vary '{knob}' frames {start_frame}..={end_frame}")]
    InvalidRange {
        /// Knob targeted by the offending `vary`.
        knob: String,
        /// First frame of the range.
        start_frame: u32,
        /// Last frame of the range.
        end_frame: u32,
    },

    /// `pop` on an origin stack that only holds the world frame.
    #[error("empty stack: cannot pop the world coordinate frame")]
    EmptyStack,

    /// Symbol referenced by name or handle that does not exist (or has no value yet).
    #[error("symbol not found: {0}")]
    NotFound(String),

    /// Symbol used as a different kind than it was declared with.
    #[error("symbol kind mismatch: '{name}' is a {found}, expected a {expected}")]
    SymbolKind {
        /// Symbol name.
        name: String,
        /// Kind the caller needed.
        expected: &'static str,
        /// Kind the symbol actually has.
        found: &'static str,
    },

    /// Invalid user-provided settings or script data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure reported by an output collaborator (image writer, viewer, assembler).
    #[error("collaborator error: {0}")]
    Collaborator(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MdlError {
    /// Build a [`MdlError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`MdlError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`MdlError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MdlError::Collaborator`] value.
    pub fn collaborator(msg: impl Into<String>) -> Self {
        Self::Collaborator(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
