pub(crate) mod geometry;
pub(crate) mod pipeline;
pub(crate) mod screen;
pub(crate) mod settings;
