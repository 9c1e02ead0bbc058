use crate::region::Region;

/// Translates dump-time addresses into file offsets and back.
///
/// At dump time a region's first byte lived at `requested_base + mapping_offset` and
/// is stored at `file_offset`, so the distance from either base is the same. All
/// arithmetic wraps. Use [`AddressTranslator::resolve`] when the result must land
/// inside the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressTranslator {
    requested_base: u64,
}

impl AddressTranslator {
    pub fn new(requested_base: u64) -> Self {
        Self { requested_base }
    }

    pub fn requested_base(&self) -> u64 {
        self.requested_base
    }

    fn mapped_base(&self, region: &Region) -> u64 {
        self.requested_base.wrapping_add(region.mapping_offset)
    }

    pub fn to_file_offset(&self, addr: u64, region: &Region) -> u64 {
        region
            .file_offset
            .wrapping_add(addr.wrapping_sub(self.mapped_base(region)))
    }

    pub fn to_address(&self, file_offset: u64, region: &Region) -> u64 {
        self.mapped_base(region)
            .wrapping_add(file_offset.wrapping_sub(region.file_offset))
    }

    /// Offset of `addr` relative to the start of the region, if it falls within `used`.
    pub fn region_offset(&self, addr: u64, region: &Region) -> Option<u64> {
        let relative = addr.wrapping_sub(self.mapped_base(region));
        (relative < region.used).then_some(relative)
    }

    /// Bounds checked [`AddressTranslator::to_file_offset`].
    pub fn resolve(&self, addr: u64, region: &Region) -> Option<u64> {
        self.region_offset(addr, region)
            .map(|relative| region.file_offset.wrapping_add(relative))
    }
}
