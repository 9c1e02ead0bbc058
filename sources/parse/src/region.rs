use std::fmt;
use std::ops::Range;

use support::bytes_ext::Truncated;
use support::cursor::ByteCursor;
use tracing::trace;

use crate::constants::{NUM_REGIONS, REGION_RUNTIME_PADDING};

/// Role of a region, fixed by its index in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    ReadWrite,
    ReadOnly,
    Bitmap,
    Heap,
    Code,
}

impl RegionKind {
    pub const ALL: [RegionKind; NUM_REGIONS] = [
        RegionKind::ReadWrite,
        RegionKind::ReadOnly,
        RegionKind::Bitmap,
        RegionKind::Heap,
        RegionKind::Code,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            RegionKind::ReadWrite => 0,
            RegionKind::ReadOnly => 1,
            RegionKind::Bitmap => 2,
            RegionKind::Heap => 3,
            RegionKind::Code => 4,
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            RegionKind::ReadWrite => "rw",
            RegionKind::ReadOnly => "ro",
            RegionKind::Bitmap => "bm",
            RegionKind::Heap => "hp",
            RegionKind::Code => "ac",
        }
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// One `CDSFileMapRegion` entry as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub crc: u32,
    pub read_only: u32,
    pub allow_exec: u32,
    pub is_heap_region: u32,
    pub is_bitmap_region: u32,
    pub mapped_from_file: u32,

    pub file_offset: u64,
    pub mapping_offset: u64,
    pub used: u64,
    pub oopmap_offset: u64,
    pub oopmap_size_in_bits: u64,
    pub ptrmap_offset: u64,
    pub ptrmap_size_in_bits: u64,
}

impl Region {
    pub fn parse<T: AsRef<[u8]>>(cursor: &mut ByteCursor<T>) -> Result<Self, Truncated> {
        let region = Self {
            crc: cursor.read_u32()?,
            read_only: cursor.read_u32()?,
            allow_exec: cursor.read_u32()?,
            is_heap_region: cursor.read_u32()?,
            is_bitmap_region: cursor.read_u32()?,
            mapped_from_file: cursor.read_u32()?,
            file_offset: cursor.read_u64()?,
            mapping_offset: cursor.read_u64()?,
            used: cursor.read_u64()?,
            oopmap_offset: cursor.read_u64()?,
            oopmap_size_in_bits: cursor.read_u64()?,
            ptrmap_offset: cursor.read_u64()?,
            ptrmap_size_in_bits: cursor.read_u64()?,
        };

        cursor.skip(REGION_RUNTIME_PADDING)?;
        Ok(region)
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only != 0
    }

    pub fn allows_exec(&self) -> bool {
        self.allow_exec != 0
    }

    pub fn is_heap(&self) -> bool {
        self.is_heap_region != 0
    }

    pub fn is_bitmap(&self) -> bool {
        self.is_bitmap_region != 0
    }

    pub fn is_mapped_from_file(&self) -> bool {
        self.mapped_from_file != 0
    }

    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Virtual address range this region occupied at dump time.
    pub fn mapped_range(&self, requested_base: u64) -> Range<u64> {
        let start = requested_base.wrapping_add(self.mapping_offset);
        start..start.wrapping_add(self.used)
    }
}

/// The region table, indexed by [`RegionKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    values: [Region; NUM_REGIONS],
}

impl Regions {
    pub fn new(values: [Region; NUM_REGIONS]) -> Self {
        Self { values }
    }

    /// Decode exactly [`NUM_REGIONS`] entries. No validation or reordering happens here.
    pub fn parse<T: AsRef<[u8]>>(cursor: &mut ByteCursor<T>) -> Result<Self, Truncated> {
        let mut values = [Region::default(); NUM_REGIONS];
        for (kind, slot) in RegionKind::ALL.iter().zip(values.iter_mut()) {
            *slot = Region::parse(cursor)?;
            trace!("parsed region {} {:?}", kind, slot);
        }

        Ok(Self { values })
    }

    pub fn get(&self, kind: RegionKind) -> &Region {
        &self.values[kind.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (RegionKind, &Region)> + '_ {
        RegionKind::ALL.into_iter().zip(self.values.iter())
    }

    pub fn as_slice(&self) -> &[Region] {
        &self.values
    }
}
