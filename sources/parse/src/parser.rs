use support::cursor::ByteCursor;
use tracing::{debug, warn};

use crate::config::ConfigurationHeader;
use crate::constants::{AOT_CACHE_MAGIC, CONFIG_HEADER_OFFSET};
use crate::error::DecodeError;
use crate::header::GenericHeader;
use crate::region::Regions;
use crate::result::DecodeResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Expected value of the first four bytes, read little endian.
    pub magic: u32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            magic: AOT_CACHE_MAGIC,
        }
    }
}

/// Every fixed header of a cache file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub generic: GenericHeader,
    pub regions: Regions,
    pub config: ConfigurationHeader,
}

pub struct Parser<T> {
    cursor: ByteCursor<T>,
    options: DecodeOptions,
}

impl<T: AsRef<[u8]>> Parser<T> {
    pub fn new(source: T, options: DecodeOptions) -> Self {
        Self {
            cursor: ByteCursor::new(source),
            options,
        }
    }

    /// Consume the parser, handing back the cursor for follow-up reads.
    pub fn into_cursor(self) -> ByteCursor<T> {
        self.cursor
    }

    pub fn parse(&mut self) -> DecodeResult<Header> {
        self.cursor.seek(0);

        // Format checking: nothing past the magic is read unless it matches
        let magic = self.cursor.scoped(|c| c.read_u32())?;
        if magic != self.options.magic {
            return Err(DecodeError::InvalidMagic {
                expected: self.options.magic,
                actual: magic,
            });
        }

        let generic = GenericHeader::parse(&mut self.cursor)?;
        if u64::from(generic.header_size) > self.cursor.len() {
            warn!(
                "header size {} is larger than the file ({} bytes)",
                generic.header_size,
                self.cursor.len()
            );
        }

        let regions = Regions::parse(&mut self.cursor)?;
        debug_assert_eq!(self.cursor.position(), CONFIG_HEADER_OFFSET);

        let config = ConfigurationHeader::parse(&mut self.cursor)?;
        debug!(
            "parsed header, version {}, requested base {:#x}",
            generic.version, config.requested_base_address
        );

        Ok(Header {
            generic,
            regions,
            config,
        })
    }
}
