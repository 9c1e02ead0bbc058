use crate::error::DecodeError;

pub type DecodeResult<T> = Result<T, DecodeError>;
