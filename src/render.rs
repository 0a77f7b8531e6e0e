//! CPU rasterization of frame descriptors (powered by `vello_cpu`).

pub(crate) mod backend;
pub(crate) mod cpu;
pub(crate) mod paint;
pub(crate) mod text;
