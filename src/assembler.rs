//! Scan order, bitstream assembly and the early-stop rule.
//!
//! The scan is one flat, lazily produced sequence of block sites: channel,
//! then plane (ascending), then block row, then block column. A plane's score
//! grid is computed when the scan first reaches it, so nothing past the halt
//! point is ever scored. [`Assembler`] holds the only mutable state and
//! decides when the stream is complete.

use crate::bitplane::BitPlane;
use crate::bits::bits_to_uint;
use crate::carrier::Carrier;
use crate::complexity::{is_admitted, score_grid};
use crate::conjugate::resolve;
use crate::error::{ExtractError, Result};
use crate::{CHANNELS, MAX_PLANE, MIN_PLANE};
use log::{debug, info};
use serde::Serialize;
use std::ops::ControlFlow;

/// Bits in the name-length field.
const NAME_LEN_BITS: usize = 8;
/// Bits in the payload-size field.
const SIZE_BITS: usize = 32;

/// Position of one block in the scan.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSite {
    pub channel: usize,
    pub plane: u8,
    pub block_row: usize,
    pub block_col: usize,
}

/// Counters gathered while scanning, reported after extraction.
#[derive(Serialize, Debug, Clone, Default)]
pub struct ScanStats {
    pub blocks_visited: usize,
    pub blocks_admitted: usize,
    pub bits_collected: usize,
    pub bits_required: usize,
    pub halted_at: Option<ScanSite>,
}

/// Every block site of `carrier` in scan order, paired with its complexity.
pub fn scan_sites(carrier: &Carrier) -> impl Iterator<Item = (ScanSite, u32)> + '_ {
    (0..CHANNELS)
        .flat_map(move |channel| {
            (MIN_PLANE..=MAX_PLANE).map(move |plane| BitPlane::new(carrier, channel, plane))
        })
        .flat_map(|plane| {
            let scores = score_grid(&plane);
            let cols = plane.block_cols();
            debug!(
                "channel {} plane {}: {}x{} blocks, {} above threshold",
                plane.channel(),
                plane.plane(),
                plane.block_rows(),
                cols,
                scores.iter().filter(|&&s| is_admitted(s)).count()
            );
            scores.into_iter().enumerate().map(move |(idx, score)| {
                let site = ScanSite {
                    channel: plane.channel(),
                    plane: plane.plane(),
                    block_row: idx / cols,
                    block_col: idx % cols,
                };
                (site, score)
            })
        })
}

/// Growing bitstream plus the header-driven completion rule.
///
/// After every push: once 8 bits exist the header length `8 + 8N + 32` is
/// fixed; once the header is in, the payload size fixes the total length.
#[derive(Debug, Default)]
pub struct Assembler {
    bits: Vec<u8>,
    header_len: Option<usize>,
    required: Option<usize>,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one block's bits and reports whether the stream is complete.
    pub fn push(&mut self, bits: &[u8]) -> bool {
        self.bits.extend_from_slice(bits);
        self.update_required();
        self.is_complete()
    }

    fn update_required(&mut self) {
        if self.required.is_some() || self.bits.len() < NAME_LEN_BITS {
            return;
        }
        let header_len = match self.header_len {
            Some(len) => len,
            None => {
                let name_len = bits_to_uint(&self.bits[..NAME_LEN_BITS]) as usize;
                let len = NAME_LEN_BITS + 8 * name_len + SIZE_BITS;
                self.header_len = Some(len);
                len
            }
        };
        if self.bits.len() < header_len {
            return;
        }
        let size = bits_to_uint(&self.bits[header_len - SIZE_BITS..header_len]) as usize;
        let required = header_len + 8 * size;
        info!(
            "Header decoded: payload of {} bytes, {} bits required in total",
            size, required
        );
        self.required = Some(required);
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Total bits needed, once the header has been read.
    pub fn required_len(&self) -> Option<usize> {
        self.required
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.required, Some(required) if self.bits.len() >= required)
    }

    /// The finished bitstream, or [`ExtractError::ScanExhausted`].
    pub fn finish(self) -> Result<Vec<u8>> {
        if self.is_complete() {
            Ok(self.bits)
        } else {
            Err(ExtractError::ScanExhausted {
                collected: self.bits.len(),
                required: self.required,
            })
        }
    }
}

/// Handles one site: admitted blocks are de-conjugated and appended.
fn visit(
    carrier: &Carrier,
    assembler: &mut Assembler,
    stats: &mut ScanStats,
    site: ScanSite,
    score: u32,
) -> ControlFlow<ScanSite> {
    stats.blocks_visited += 1;
    if !is_admitted(score) {
        return ControlFlow::Continue(());
    }
    stats.blocks_admitted += 1;

    let plane = BitPlane::new(carrier, site.channel, site.plane);
    let block = plane.block(site.block_row, site.block_col);
    let flag = plane.flag(site.block_row, site.block_col);
    if assembler.push(&resolve(flag, &block)) {
        ControlFlow::Break(site)
    } else {
        ControlFlow::Continue(())
    }
}

/// Scans `carrier` until the embedded payload is complete.
///
/// Returns the raw bitstream (possibly longer than required) with the scan
/// counters, or [`ExtractError::ScanExhausted`] if the carrier runs out first.
pub fn assemble(carrier: &Carrier) -> Result<(Vec<u8>, ScanStats)> {
    let mut assembler = Assembler::new();
    let mut stats = ScanStats::default();

    let flow = scan_sites(carrier)
        .try_for_each(|(site, score)| visit(carrier, &mut assembler, &mut stats, site, score));

    if let ControlFlow::Break(site) = flow {
        info!(
            "Payload complete at channel {} plane {} block ({}, {})",
            site.channel, site.plane, site.block_row, site.block_col
        );
        stats.halted_at = Some(site);
    }
    stats.bits_collected = assembler.len();
    stats.bits_required = assembler.required_len().unwrap_or(0);

    let bits = assembler.finish()?;
    Ok((bits, stats))
}
