//! Source decoding: still images and narration audio.

pub(crate) mod decode;
pub(crate) mod media;
pub(crate) mod temp;
