/// Crate-wide result alias.
pub type ReelResult<T> = Result<T, ReelError>;

/// Errors raised by planning, composition, and encoding.
///
/// Every variant is terminal for a render: the session releases what it acquired and returns the
/// error once, with no partial output.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Caller supplied unusable input (no images, non-positive duration, ...).
    #[error("input error: {0}")]
    Input(String),

    /// Narration audio could not be decoded into a duration-bearing buffer.
    #[error("decode error: {0}")]
    Decode(String),

    /// The composition surface (render context, fonts, paints) could not be set up.
    #[error("context error: {0}")]
    Context(String),

    /// The encode session could not be started, fed, or finalized.
    #[error("encode error: {0}")]
    Encode(String),

    /// A source image failed to decode. `index` is the position in the caller's image list.
    #[error("image load error: image #{index}: {reason}")]
    ImageLoad {
        /// Position of the failing image in the caller-supplied order.
        index: usize,
        /// Decoder message.
        reason: String,
    },

    /// Configuration or option values are out of range.
    #[error("validation error: {0}")]
    Validation(String),

    /// An internal invariant was violated (fail-fast).
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// The render was cancelled through its cancellation flag.
    #[error("render cancelled")]
    Cancelled,

    #[error(transparent)]
    /// Wrapped IO/plumbing error.
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build an [`ReelError::Input`].
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build an [`ReelError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build an [`ReelError::Context`].
    pub fn context(msg: impl Into<String>) -> Self {
        Self::Context(msg.into())
    }

    /// Build an [`ReelError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build an [`ReelError::ImageLoad`].
    pub fn image_load(index: usize, reason: impl Into<String>) -> Self {
        Self::ImageLoad {
            index,
            reason: reason.into(),
        }
    }

    /// Build an [`ReelError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`ReelError::Invariant`].
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
