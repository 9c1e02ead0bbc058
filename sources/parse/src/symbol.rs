//! Heuristic recovery of symbol names.
//!
//! There is no metadata decoder here. The read-write region is scanned for one
//! recognised 64-bit word, which is taken to start a record laid out as
//! `[pattern][16 bytes of bookkeeping][pointer to Symbol]`. The pointer is resolved into
//! the read-only region and a symbol is decoded there. Anything that fails a bounds
//! check is skipped, so misses are expected and silent.

use support::bytes_ext::Truncated;
use support::cursor::ByteCursor;
use tracing::{debug, trace};

use crate::address::AddressTranslator;
use crate::constants::SYMBOL_HEADER_SIZE;
use crate::payload::RegionData;
use crate::region::Region;

const WORD: usize = 8;
const RECORD_BOOKKEEPING: usize = 16;

/// A canonical length prefixed string, identified only by where it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub file_offset: u64,
    pub hash_and_refcount: u32,
    pub length: u16,
    pub body: String,
}

impl Symbol {
    /// Decode the symbol at `file_offset` without moving the cursor.
    pub fn parse<T: AsRef<[u8]>>(
        cursor: &mut ByteCursor<T>,
        file_offset: u64,
    ) -> Result<Self, Truncated> {
        cursor.scoped(|cursor| -> Result<Self, Truncated> {
            cursor.seek(file_offset);
            let hash_and_refcount = cursor.read_u32()?;
            let length = cursor.read_u16()?;
            let body = cursor.read_bytes(length.into())?;

            Ok(Symbol {
                file_offset,
                hash_and_refcount,
                length,
                body: String::from_utf8_lossy(&body).into_owned(),
            })
        })
    }

    /// Bytes occupied in the file.
    pub fn size(&self) -> u64 {
        SYMBOL_HEADER_SIZE + u64::from(self.length)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolMatch {
    /// Where the pattern was found, relative to the start of the read-write region.
    pub region_offset: u64,
    /// Where the pattern was found in the file.
    pub file_offset: u64,
    pub pointer: u64,
    pub symbol: Symbol,
}

impl SymbolMatch {
    pub fn name(&self) -> &str {
        &self.symbol.body
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolLocator {
    pattern: u64,
}

impl SymbolLocator {
    pub fn new(pattern: u64) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> u64 {
        self.pattern
    }

    /// Lazily scan `rw` for the pattern, resolving hits into `ro`. `source` is the whole
    /// file and gets its own cursor, so no caller position is disturbed.
    pub fn scan<'a>(
        &self,
        source: &'a [u8],
        rw: &'a RegionData,
        ro: &'a Region,
        translator: AddressTranslator,
    ) -> SymbolMatches<'a> {
        SymbolMatches {
            pattern: self.pattern,
            payload: &rw.bytes,
            used: rw.used_bytes().len(),
            rw_file_offset: rw.region.file_offset,
            ro,
            translator,
            cursor: ByteCursor::new(source),
            next: 0,
        }
    }
}

pub struct SymbolMatches<'a> {
    pattern: u64,
    payload: &'a [u8],
    used: usize,
    rw_file_offset: u64,
    ro: &'a Region,
    translator: AddressTranslator,
    cursor: ByteCursor<&'a [u8]>,
    next: usize,
}

fn word_at(bytes: &[u8], offset: usize) -> Option<u64> {
    let end = offset.checked_add(WORD)?;
    let word: [u8; WORD] = bytes.get(offset..end)?.try_into().ok()?;
    Some(u64::from_le_bytes(word))
}

impl SymbolMatches<'_> {
    fn resolve(&mut self, offset: usize) -> Option<SymbolMatch> {
        let pointer = word_at(self.payload, offset + WORD + RECORD_BOOKKEEPING)?;

        let Some(target) = self.translator.resolve(pointer, self.ro) else {
            trace!("pointer {:#x} at rw+{:#x} is outside ro", pointer, offset);
            return None;
        };

        match Symbol::parse(&mut self.cursor, target) {
            Ok(symbol) => Some(SymbolMatch {
                region_offset: offset as u64,
                file_offset: self.rw_file_offset.wrapping_add(offset as u64),
                pointer,
                symbol,
            }),
            Err(err) => {
                trace!("symbol at {:#x} could not be read: {}", target, err);
                None
            }
        }
    }
}

impl Iterator for SymbolMatches<'_> {
    type Item = SymbolMatch;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next + WORD <= self.used {
            let offset = self.next;
            self.next += WORD;

            if word_at(self.payload, offset) != Some(self.pattern) {
                continue;
            }

            if let Some(found) = self.resolve(offset) {
                debug!(
                    "symbol {:?} at rw+{:#x} via {:#x}",
                    found.symbol.body, offset, found.pointer
                );
                return Some(found);
            }
        }

        None
    }
}
