pub mod address;
pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod header;
pub mod parser;
pub mod payload;
pub mod region;
pub mod result;
pub mod symbol;

extern crate bytes;
extern crate support;

pub use cache::AotCache;
pub use error::DecodeError;
pub use parser::{DecodeOptions, Header, Parser};
pub use result::DecodeResult;
