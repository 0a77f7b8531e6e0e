//! Slide timeline derived from narration length.

pub(crate) mod plan;
