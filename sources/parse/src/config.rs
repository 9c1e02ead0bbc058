use enum_as_inner::EnumAsInner;
use support::bytes_ext::Truncated;
use support::cursor::ByteCursor;
use tracing::trace;

use crate::constants::JVM_IDENT_LENGTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeapRootSegments {
    pub base_offset: u64,
    pub count: u64,
    pub roots_count: i32,
    pub max_size_in_bytes: u64,
    pub max_size_in_elems: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MappedHeapHeader {
    pub ptrmap_start_pos: u64,
    pub oopmap_start_pos: u64,
    pub root_segments: HeapRootSegments,
}

impl MappedHeapHeader {
    fn parse<T: AsRef<[u8]>>(cursor: &mut ByteCursor<T>) -> Result<Self, Truncated> {
        let ptrmap_start_pos = cursor.read_u64()?;
        let oopmap_start_pos = cursor.read_u64()?;

        let base_offset = cursor.read_u64()?;
        let count = cursor.read_u64()?;
        let roots_count = cursor.read_i32()?;
        cursor.skip(4)?;
        let max_size_in_bytes = cursor.read_u64()?;
        let max_size_in_elems = cursor.read_i32()?;
        cursor.skip(4)?;

        Ok(Self {
            ptrmap_start_pos,
            oopmap_start_pos,
            root_segments: HeapRootSegments {
                base_offset,
                count,
                roots_count,
                max_size_in_bytes,
                max_size_in_elems,
            },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamedHeapHeader {
    pub forwarding_offset: u64,
    pub roots_offset: u64,
    pub root_highest_object_index_table_offset: u64,
    pub num_roots: u64,
    pub num_archived_objects: u64,
}

impl StreamedHeapHeader {
    fn parse<T: AsRef<[u8]>>(cursor: &mut ByteCursor<T>) -> Result<Self, Truncated> {
        Ok(Self {
            forwarding_offset: cursor.read_u64()?,
            roots_offset: cursor.read_u64()?,
            root_highest_object_index_table_offset: cursor.read_u64()?,
            num_roots: cursor.read_u64()?,
            num_archived_objects: cursor.read_u64()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapKind {
    Mapped,
    Streamed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumAsInner)]
pub enum HeapHeader {
    Mapped(MappedHeapHeader),
    Streamed(StreamedHeapHeader),
}

/// Both interpretations of the heap header block.
///
/// The file does not say which one is meaningful, so both are always decoded and the
/// caller picks with [`HeapHeaders::view`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeapHeaders {
    pub mapped: MappedHeapHeader,
    pub streamed: StreamedHeapHeader,
}

impl HeapHeaders {
    pub fn parse<T: AsRef<[u8]>>(cursor: &mut ByteCursor<T>) -> Result<Self, Truncated> {
        Ok(Self {
            mapped: MappedHeapHeader::parse(cursor)?,
            streamed: StreamedHeapHeader::parse(cursor)?,
        })
    }

    pub fn view(&self, kind: HeapKind) -> HeapHeader {
        match kind {
            HeapKind::Mapped => HeapHeader::Mapped(self.mapped),
            HeapKind::Streamed => HeapHeader::Streamed(self.streamed),
        }
    }
}

/// Compiler and profiling settings recorded after the heap header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProfileSettings {
    pub compiler_type: u8,
    pub type_profile_level: i32,
    pub type_profile_args_limit: i32,
    pub type_profile_parms_limit: i32,
    pub type_profile_width: i64,
    pub bci_profile_width: i64,
    pub profile_traps: bool,
    pub type_profile_casts: bool,
    pub spec_trap_limit_extra_entries: i32,
}

impl ProfileSettings {
    pub fn parse<T: AsRef<[u8]>>(cursor: &mut ByteCursor<T>) -> Result<Self, Truncated> {
        let compiler_type = cursor.read_u8()?;
        let type_profile_level = cursor.read_i32()?;
        cursor.skip(3)?;
        let type_profile_args_limit = cursor.read_i32()?;
        let type_profile_parms_limit = cursor.read_i32()?;
        let type_profile_width = cursor.read_i64()?;
        let bci_profile_width = cursor.read_i64()?;
        let profile_traps = cursor.read_bool()?;
        let type_profile_casts = cursor.read_bool()?;
        let spec_trap_limit_extra_entries = cursor.read_i32()?;
        cursor.skip(2)?;

        Ok(Self {
            compiler_type,
            type_profile_level,
            type_profile_args_limit,
            type_profile_parms_limit,
            type_profile_width,
            bci_profile_width,
            profile_traps,
            type_profile_casts,
            spec_trap_limit_extra_entries,
        })
    }
}

/// The VM configuration part of `FileMapHeader`, following the region table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationHeader {
    pub core_region_alignment: u64,
    pub obj_alignment: i32,
    pub narrow_oop_base: u64,
    pub narrow_oop_shift: i32,
    pub compact_strings: bool,
    pub compact_headers: bool,
    pub max_heap_size: u64,
    pub narrow_oop_mode: i32,
    pub object_streaming_mode: bool,
    pub compressed_oops: bool,
    pub compressed_class_pointers: bool,
    pub narrow_klass_pointer_bits: i32,
    pub narrow_klass_shift: i32,

    pub cloned_vtables_offset: u64,
    pub early_serialized_data_offset: u64,
    pub serialized_data_offset: u64,

    /// Stored as is, trailing NULs included.
    pub jvm_ident: String,
    pub class_location_config_offset: u64,

    pub verify_local: bool,
    pub verify_remote: bool,
    pub has_platform_or_app_classes: bool,

    pub requested_base_address: u64,
    pub mapped_base_address: u64,

    pub use_optimized_module_handling: bool,
    pub has_aot_linked_classes: bool,
    pub has_full_module_graph: bool,

    pub rw_ptrmap_start_pos: u64,
    pub ro_ptrmap_start_pos: u64,

    pub heap: HeapHeaders,
    pub profile: ProfileSettings,
}

impl ConfigurationHeader {
    pub fn parse<T: AsRef<[u8]>>(cursor: &mut ByteCursor<T>) -> Result<Self, Truncated> {
        let core_region_alignment = cursor.read_u64()?;
        let obj_alignment = cursor.read_i32()?;
        cursor.skip(4)?;

        let narrow_oop_base = cursor.read_u64()?;
        let narrow_oop_shift = cursor.read_i32()?;
        let compact_strings = cursor.read_bool()?;
        let compact_headers = cursor.read_bool()?;
        cursor.skip(2)?;

        let max_heap_size = cursor.read_u64()?;
        let narrow_oop_mode = cursor.read_i32()?;
        let object_streaming_mode = cursor.read_bool()?;
        let compressed_oops = cursor.read_bool()?;
        let compressed_class_pointers = cursor.read_bool()?;
        cursor.skip(1)?;

        let narrow_klass_pointer_bits = cursor.read_i32()?;
        let narrow_klass_shift = cursor.read_i32()?;

        let cloned_vtables_offset = cursor.read_u64()?;
        let early_serialized_data_offset = cursor.read_u64()?;
        let serialized_data_offset = cursor.read_u64()?;

        let ident = cursor.read_bytes(JVM_IDENT_LENGTH)?;
        let jvm_ident = String::from_utf8_lossy(&ident).into_owned();
        trace!("parsed jvm ident {:?}", jvm_ident.trim_end_matches('\0'));

        let class_location_config_offset = cursor.read_u64()?;
        let verify_local = cursor.read_bool()?;
        let verify_remote = cursor.read_bool()?;
        let has_platform_or_app_classes = cursor.read_bool()?;
        cursor.skip(5)?;

        let requested_base_address = cursor.read_u64()?;
        let mapped_base_address = cursor.read_u64()?;

        let use_optimized_module_handling = cursor.read_bool()?;
        let has_aot_linked_classes = cursor.read_bool()?;
        let has_full_module_graph = cursor.read_bool()?;
        cursor.skip(5)?;

        let rw_ptrmap_start_pos = cursor.read_u64()?;
        let ro_ptrmap_start_pos = cursor.read_u64()?;

        let heap = HeapHeaders::parse(cursor)?;
        trace!("parsed heap headers {:?}", heap);

        let profile = ProfileSettings::parse(cursor)?;
        trace!("parsed profile settings {:?}", profile);

        Ok(Self {
            core_region_alignment,
            obj_alignment,
            narrow_oop_base,
            narrow_oop_shift,
            compact_strings,
            compact_headers,
            max_heap_size,
            narrow_oop_mode,
            object_streaming_mode,
            compressed_oops,
            compressed_class_pointers,
            narrow_klass_pointer_bits,
            narrow_klass_shift,
            cloned_vtables_offset,
            early_serialized_data_offset,
            serialized_data_offset,
            jvm_ident,
            class_location_config_offset,
            verify_local,
            verify_remote,
            has_platform_or_app_classes,
            requested_base_address,
            mapped_base_address,
            use_optimized_module_handling,
            has_aot_linked_classes,
            has_full_module_graph,
            rw_ptrmap_start_pos,
            ro_ptrmap_start_pos,
            heap,
            profile,
        })
    }

    /// The identity string without its NUL padding.
    pub fn jvm_ident_trimmed(&self) -> &str {
        self.jvm_ident.trim_end_matches('\0')
    }
}
