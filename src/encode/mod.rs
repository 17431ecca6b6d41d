//! Output collaborators: frame files, the live viewer and animation assembly.

pub(crate) mod assemble;
pub(crate) mod file;
pub(crate) mod image_io;
pub(crate) mod sink;
