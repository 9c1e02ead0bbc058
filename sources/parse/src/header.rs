use support::bytes_ext::Truncated;
use support::cursor::ByteCursor;
use tracing::trace;

/// The leading `GenericCDSFileMapHeader`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenericHeader {
    pub magic: u32,
    pub crc: u32,
    pub version: i32,
    pub header_size: u32,
    pub base_archive_name_offset: u32,
    pub base_archive_name_size: u32,
}

impl GenericHeader {
    /// Decode the header at the cursor's position. The magic is returned as read,
    /// the caller decides whether it is acceptable.
    pub fn parse<T: AsRef<[u8]>>(cursor: &mut ByteCursor<T>) -> Result<Self, Truncated> {
        let header = Self {
            magic: cursor.read_u32()?,
            crc: cursor.read_u32()?,
            version: cursor.read_i32()?,
            header_size: cursor.read_u32()?,
            base_archive_name_offset: cursor.read_u32()?,
            base_archive_name_size: cursor.read_u32()?,
        };

        trace!("parsed generic header {:?}", header);
        Ok(header)
    }

    /// Dynamic archives record the path of the static archive they sit on top of.
    pub fn has_base_archive(&self) -> bool {
        self.base_archive_name_size > 0
    }
}
