//! Attention-grabbing captions shown over the opening seconds of a render.

pub(crate) mod catalog;
