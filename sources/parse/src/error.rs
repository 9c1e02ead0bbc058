use support::bytes_ext::Truncated;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("magic number mismatch (expected: {expected:08x}, actual: {actual:08x})")]
    InvalidMagic { expected: u32, actual: u32 },

    #[error("file too short ({0})")]
    TruncatedInput(#[from] Truncated),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    pub fn is_truncated(&self) -> bool {
        matches!(self, DecodeError::TruncatedInput(_))
    }

    pub fn is_invalid_magic(&self) -> bool {
        matches!(self, DecodeError::InvalidMagic { .. })
    }
}
