//! Field layout of the cache file, 64-bit platforms only.

/// Default magic, read as a little endian u32 from the first four bytes (`F0 0B AB A2` on disk).
pub const AOT_CACHE_MAGIC: u32 = 0xa2ab0bf0;
/// HotSpot static CDS archive magic.
pub const CDS_ARCHIVE_MAGIC: u32 = 0xf00baba2;
/// HotSpot dynamic CDS archive magic.
pub const CDS_DYNAMIC_ARCHIVE_MAGIC: u32 = 0xf00baba8;

pub const GENERIC_HEADER_SIZE: u64 = 24;

pub const NUM_REGIONS: usize = 5;
pub const REGION_SIZE: u64 = 96;
/// `mapped_base` and `in_reserved_space`, runtime only.
pub const REGION_RUNTIME_PADDING: usize = 16;
pub const REGION_TABLE_OFFSET: u64 = GENERIC_HEADER_SIZE;

pub const CONFIG_HEADER_OFFSET: u64 = REGION_TABLE_OFFSET + NUM_REGIONS as u64 * REGION_SIZE;
pub const JVM_IDENT_LENGTH: usize = 256;

pub const MAPPED_HEAP_HEADER_SIZE: u64 = 56;
pub const STREAMED_HEAP_HEADER_SIZE: u64 = 40;
pub const HEAP_HEADER_BLOCK_SIZE: u64 = MAPPED_HEAP_HEADER_SIZE + STREAMED_HEAP_HEADER_SIZE;

/// Everything from the region alignment up to and including `ro_ptrmap_start_pos`.
pub const CONFIG_FIXED_FIELDS_SIZE: u64 = 392;
pub const PROFILE_TRAILER_SIZE: u64 = 40;

pub const CONFIG_HEADER_SIZE: u64 =
    CONFIG_FIXED_FIELDS_SIZE + HEAP_HEADER_BLOCK_SIZE + PROFILE_TRAILER_SIZE;

/// Smallest file that can hold every fixed header.
pub const MIN_HEADER_SIZE: u64 = CONFIG_HEADER_OFFSET + CONFIG_HEADER_SIZE;

/// Symbol: `u32` hash and refcount, `u16` length, then the body.
pub const SYMBOL_HEADER_SIZE: u64 = 6;
