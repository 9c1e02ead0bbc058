#![allow(dead_code)]

use std::{fs, path::PathBuf, sync::Once};

use bytes::BufMut;
use parse::constants::{
    AOT_CACHE_MAGIC, HEAP_HEADER_BLOCK_SIZE, JVM_IDENT_LENGTH, MIN_HEADER_SIZE, NUM_REGIONS,
    REGION_RUNTIME_PADDING,
};
use parse::region::Region;
use tracing::Level;
use tracing_subscriber::fmt;

const TMP_DIR: &str = env!("CARGO_TARGET_TMPDIR");

static LOGGING: Once = Once::new();

pub fn init_logging() {
    LOGGING.call_once(|| {
        let format = fmt::format()
            .with_ansi(false)
            .without_time()
            .with_level(true)
            .with_target(false)
            .compact();

        tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .event_format(format)
            .with_test_writer()
            .init();
    });
}

/// Writes synthetic cache files field by field, in file order.
#[derive(Debug, Clone)]
pub struct CacheImage {
    pub magic: u32,
    pub crc: u32,
    pub version: i32,
    pub header_size: u32,
    pub base_archive_name_offset: u32,
    pub base_archive_name_size: u32,
    pub regions: [Region; NUM_REGIONS],

    pub core_region_alignment: u64,
    pub jvm_ident: String,
    pub requested_base_address: u64,
    pub mapped_base_address: u64,
    pub object_streaming_mode: bool,
    /// Twelve words covering both heap header views.
    pub heap_words: [u64; 12],

    /// Extra bytes placed at absolute file offsets once the headers are written.
    pub patches: Vec<(usize, Vec<u8>)>,
    /// Pad the file with zeros up to this length.
    pub min_len: usize,
}

pub fn image() -> CacheImage {
    CacheImage {
        magic: AOT_CACHE_MAGIC,
        crc: 0,
        version: 1,
        header_size: MIN_HEADER_SIZE as u32,
        base_archive_name_offset: 0,
        base_archive_name_size: 0,
        regions: [Region::default(); NUM_REGIONS],
        core_region_alignment: 0x1000,
        jvm_ident: "OpenJDK 64-Bit Server VM (25-internal) for linux-amd64".to_string(),
        requested_base_address: 0x8_0000_0000,
        mapped_base_address: 0x8_0000_0000,
        object_streaming_mode: false,
        heap_words: [0; 12],
        patches: vec![],
        min_len: 0,
    }
}

impl CacheImage {
    pub fn with_region(mut self, index: usize, region: Region) -> Self {
        self.regions[index] = region;
        self
    }

    pub fn with_bytes(mut self, offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        self.patches.push((offset, bytes.into()));
        self
    }

    pub fn with_len(mut self, len: usize) -> Self {
        self.min_len = len;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::with_capacity(MIN_HEADER_SIZE as usize);

        out.put_u32_le(self.magic);
        out.put_u32_le(self.crc);
        out.put_i32_le(self.version);
        out.put_u32_le(self.header_size);
        out.put_u32_le(self.base_archive_name_offset);
        out.put_u32_le(self.base_archive_name_size);

        for region in &self.regions {
            out.put_u32_le(region.crc);
            out.put_u32_le(region.read_only);
            out.put_u32_le(region.allow_exec);
            out.put_u32_le(region.is_heap_region);
            out.put_u32_le(region.is_bitmap_region);
            out.put_u32_le(region.mapped_from_file);
            out.put_u64_le(region.file_offset);
            out.put_u64_le(region.mapping_offset);
            out.put_u64_le(region.used);
            out.put_u64_le(region.oopmap_offset);
            out.put_u64_le(region.oopmap_size_in_bits);
            out.put_u64_le(region.ptrmap_offset);
            out.put_u64_le(region.ptrmap_size_in_bits);
            out.put_bytes(0xee, REGION_RUNTIME_PADDING);
        }

        out.put_u64_le(self.core_region_alignment);
        out.put_i32_le(8); // obj_alignment
        out.put_bytes(0, 4);
        out.put_u64_le(0); // narrow_oop_base
        out.put_i32_le(3); // narrow_oop_shift
        out.put_u8(1); // compact_strings
        out.put_u8(0); // compact_headers
        out.put_bytes(0, 2);
        out.put_u64_le(1 << 30); // max_heap_size
        out.put_i32_le(0); // narrow_oop_mode
        out.put_u8(self.object_streaming_mode as u8);
        out.put_u8(1); // compressed_oops
        out.put_u8(1); // compressed_class_pointers
        out.put_bytes(0, 1);
        out.put_i32_le(22); // narrow_klass_pointer_bits
        out.put_i32_le(0); // narrow_klass_shift
        out.put_u64_le(0x10); // cloned_vtables_offset
        out.put_u64_le(0x20); // early_serialized_data_offset
        out.put_u64_le(0x30); // serialized_data_offset

        let mut ident = self.jvm_ident.clone().into_bytes();
        ident.resize(JVM_IDENT_LENGTH, 0);
        out.put_slice(&ident);

        out.put_u64_le(0x40); // class_location_config_offset
        out.put_u8(0); // verify_local
        out.put_u8(1); // verify_remote
        out.put_u8(1); // has_platform_or_app_classes
        out.put_bytes(0, 5);
        out.put_u64_le(self.requested_base_address);
        out.put_u64_le(self.mapped_base_address);
        out.put_u8(1); // use_optimized_module_handling
        out.put_u8(1); // has_aot_linked_classes
        out.put_u8(0); // has_full_module_graph
        out.put_bytes(0, 5);
        out.put_u64_le(0x50); // rw_ptrmap_start_pos
        out.put_u64_le(0x60); // ro_ptrmap_start_pos

        for word in self.heap_words {
            out.put_u64_le(word);
        }
        debug_assert_eq!(self.heap_words.len() as u64 * 8, HEAP_HEADER_BLOCK_SIZE);

        out.put_u8(1); // compiler_type
        out.put_i32_le(111); // type_profile_level
        out.put_bytes(0, 3);
        out.put_i32_le(2); // type_profile_args_limit
        out.put_i32_le(2); // type_profile_parms_limit
        out.put_i64_le(8); // type_profile_width
        out.put_i64_le(2); // bci_profile_width
        out.put_u8(1); // profile_traps
        out.put_u8(1); // type_profile_casts
        out.put_i32_le(3); // spec_trap_limit_extra_entries
        out.put_bytes(0, 2);

        assert_eq!(out.len() as u64, MIN_HEADER_SIZE);

        for (offset, bytes) in &self.patches {
            let end = offset + bytes.len();
            if out.len() < end {
                out.resize(end, 0);
            }
            out[*offset..end].copy_from_slice(bytes);
        }

        if out.len() < self.min_len {
            out.resize(self.min_len, 0);
        }

        out
    }

    pub fn write(&self, name: &str) -> PathBuf {
        let path = PathBuf::from(TMP_DIR).join(name);
        fs::write(&path, self.build()).expect("fixture to be written");
        path
    }
}

/// Encode a Symbol record: hash and refcount, length, body.
pub fn symbol(body: &str) -> Vec<u8> {
    let mut out: Vec<u8> = vec![];
    out.put_u32_le(0);
    out.put_u16_le(body.len() as u16);
    out.put_slice(body.as_bytes());
    out
}

pub fn words(values: &[u64]) -> Vec<u8> {
    let mut out: Vec<u8> = vec![];
    for value in values {
        out.put_u64_le(*value);
    }
    out
}
