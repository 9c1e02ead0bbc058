use bytes::Bytes;
use support::bytes_ext::Truncated;
use support::cursor::ByteCursor;
use tracing::{debug, warn};

use crate::region::{Region, RegionKind, Regions};

/// The raw bytes of one region as stored in the file.
///
/// The span runs from the region's `file_offset` to the next region's `file_offset`
/// (or the end of the file), so alignment padding is included. The code region is
/// never read and always holds no bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionData {
    pub kind: RegionKind,
    pub region: Region,
    pub bytes: Bytes,
}

impl RegionData {
    pub fn index(&self) -> usize {
        self.kind.index()
    }

    /// The `used` prefix of the payload, clipped to what was actually read.
    pub fn used_bytes(&self) -> &[u8] {
        let used = usize::try_from(self.region.used).unwrap_or(usize::MAX);
        &self.bytes[..used.min(self.bytes.len())]
    }

    /// Materialize every region. The cursor's position is restored afterwards,
    /// whether or not loading succeeded.
    pub fn load_all<T: AsRef<[u8]>>(
        cursor: &mut ByteCursor<T>,
        regions: &Regions,
    ) -> Result<Vec<RegionData>, Truncated> {
        cursor.scoped(|cursor| {
            regions
                .iter()
                .map(|(kind, region)| -> Result<RegionData, Truncated> {
                    let bytes = match kind {
                        RegionKind::Code => Bytes::new(),
                        _ => load_span(cursor, kind, region, regions)?,
                    };

                    Ok(RegionData {
                        kind,
                        region: *region,
                        bytes,
                    })
                })
                .collect()
        })
    }
}

/// `[start, end)` for a region, where `end` is the closest later start of any other region.
pub fn region_span(start: u64, regions: &Regions, file_len: u64) -> Option<(u64, u64)> {
    if start >= file_len {
        return None;
    }

    let end = regions
        .as_slice()
        .iter()
        .map(|r| r.file_offset)
        .filter(|&other| other > start && other < file_len)
        .min()
        .unwrap_or(file_len);

    Some((start, end)).filter(|(start, end)| end > start)
}

fn load_span<T: AsRef<[u8]>>(
    cursor: &mut ByteCursor<T>,
    kind: RegionKind,
    region: &Region,
    regions: &Regions,
) -> Result<Bytes, Truncated> {
    let Some((start, end)) = region_span(region.file_offset, regions, cursor.len()) else {
        debug!("region {} has no bytes in the file", kind);
        return Ok(Bytes::new());
    };

    let span = end - start;
    if region.used > span {
        warn!(
            "region {} claims {} used bytes but only {} are available before the next region",
            kind, region.used, span
        );
    }

    debug!("region {} spans [{:#x}, {:#x})", kind, start, end);
    cursor.seek(start);
    // The span is bounded by the source length, which already fits in memory
    let bytes = cursor.read_bytes(span as usize)?;
    Ok(Bytes::from(bytes))
}
