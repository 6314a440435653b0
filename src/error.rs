use thiserror::Error;

/// Why a file selection was rejected.
///
/// Errors are `Clone` so they can travel inside UI messages; io errors are
/// stringified for the same reason.
#[derive(Debug, Clone, Error)]
pub enum PickError {
    /// The chosen file's declared content type is not an image.
    #[error("{name} is not an image file")]
    NotAnImage { name: String },

    /// The chosen file could not be read.
    #[error("could not read {name}: {reason}")]
    Read { name: String, reason: String },
}
