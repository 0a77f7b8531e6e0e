//! Pure per-frame composition logic.
//!
//! Everything here is a function of elapsed time and the [`crate::Timeline`]; pixels are produced
//! later by [`crate::render`].

pub(crate) mod frame;
pub(crate) mod zoom;
