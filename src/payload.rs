//! Parsing a finished bitstream into the hidden file.
//!
//! Layout, all fields MSB first:
//!
//! ```text
//! | name length N (8) | name (8 * N) | size S (32) | data (8 * S) | ignored... |
//! ```

use crate::bits::{bits_to_bytes, bits_to_uint};
use crate::error::{ExtractError, Result};
use crate::FALLBACK_NAME;
use log::warn;

/// A file recovered from the carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredPayload {
    pub name: String,
    pub data: Vec<u8>,
}

/// Sequential reader over a bit slice.
struct BitReader<'a> {
    bits: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        let end = self.pos + count;
        let slice = self.bits.get(self.pos..end).ok_or(ExtractError::Truncated {
            needed: end,
            available: self.bits.len(),
        })?;
        self.pos = end;
        Ok(slice)
    }

    fn uint(&mut self, width: usize) -> Result<u64> {
        self.take(width).map(bits_to_uint)
    }

    fn bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        self.take(8 * count).map(bits_to_bytes)
    }
}

/// Decodes the name as UTF-8 (lossy), substituting [`FALLBACK_NAME`] when empty.
pub fn decode_name(raw: &[u8]) -> String {
    let name = String::from_utf8_lossy(raw);
    if let std::borrow::Cow::Owned(_) = name {
        warn!("Embedded name is not valid UTF-8; invalid bytes replaced");
    }
    if name.is_empty() {
        warn!("Embedded name is empty; using '{}'", FALLBACK_NAME);
        return FALLBACK_NAME.to_string();
    }
    name.into_owned()
}

/// Parses `bits` into name and data. Bits past the declared length are ignored.
pub fn decode(bits: &[u8]) -> Result<RecoveredPayload> {
    let mut reader = BitReader { bits, pos: 0 };

    let name_len = reader.uint(8)? as usize;
    let name = decode_name(&reader.bytes(name_len)?);
    let size = reader.uint(32)? as usize;
    let data = reader.bytes(size)?;

    Ok(RecoveredPayload { name, data })
}
