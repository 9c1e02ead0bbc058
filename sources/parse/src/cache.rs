use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use support::cursor::ByteCursor;
use tracing::{debug, info};

use crate::address::AddressTranslator;
use crate::config::ConfigurationHeader;
use crate::header::GenericHeader;
use crate::parser::{DecodeOptions, Header, Parser};
use crate::payload::RegionData;
use crate::region::{RegionKind, Regions};
use crate::result::DecodeResult;
use crate::symbol::{SymbolLocator, SymbolMatch};

/// A decoded cache file together with the bytes it was decoded from.
///
/// Every lookup builds a fresh cursor over the source, so lookups never observe each
/// other's positions.
pub struct AotCache<S = Mmap> {
    source: S,
    header: Header,
}

impl AotCache<Mmap> {
    pub fn open(path: impl AsRef<Path>, options: DecodeOptions) -> DecodeResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;

        // Safety: the map is read only, and a cache file is not expected to change while
        // it is being inspected
        let map = unsafe { Mmap::map(&file)? };
        info!("mapped {} ({} bytes)", path.display(), map.len());

        Self::from_source(map, options)
    }
}

impl<S: AsRef<[u8]>> AotCache<S> {
    pub fn from_source(source: S, options: DecodeOptions) -> DecodeResult<Self> {
        let header = Parser::new(source.as_ref(), options).parse()?;
        Ok(Self { source, header })
    }

    pub fn bytes(&self) -> &[u8] {
        self.source.as_ref()
    }

    pub fn len(&self) -> u64 {
        self.bytes().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn generic(&self) -> &GenericHeader {
        &self.header.generic
    }

    pub fn regions(&self) -> &Regions {
        &self.header.regions
    }

    pub fn config(&self) -> &ConfigurationHeader {
        &self.header.config
    }

    pub fn translator(&self) -> AddressTranslator {
        AddressTranslator::new(self.header.config.requested_base_address)
    }

    pub fn region_data(&self) -> DecodeResult<Vec<RegionData>> {
        let mut cursor = ByteCursor::new(self.bytes());
        Ok(RegionData::load_all(&mut cursor, &self.header.regions)?)
    }

    /// The path of the static archive a dynamic archive is layered on, if recorded.
    pub fn base_archive_name(&self) -> DecodeResult<Option<String>> {
        let generic = &self.header.generic;
        if !generic.has_base_archive() {
            return Ok(None);
        }

        let mut cursor = ByteCursor::new(self.bytes());
        cursor.seek(generic.base_archive_name_offset.into());
        let raw = cursor.read_bytes(generic.base_archive_name_size as usize)?;

        let name = raw.split(|&b| b == 0).next().unwrap_or_default();
        Ok(Some(String::from_utf8_lossy(name).into_owned()))
    }

    /// Run the heuristic symbol scan over the read-write region.
    pub fn symbols(&self, locator: &SymbolLocator) -> DecodeResult<Vec<SymbolMatch>> {
        let data = self.region_data()?;
        let rw = &data[RegionKind::ReadWrite.index()];
        let ro = self.header.regions.get(RegionKind::ReadOnly);

        let matches: Vec<SymbolMatch> = locator
            .scan(self.bytes(), rw, ro, self.translator())
            .collect();

        debug!(
            "found {} symbols with pattern {:#018x}",
            matches.len(),
            locator.pattern()
        );
        Ok(matches)
    }
}
