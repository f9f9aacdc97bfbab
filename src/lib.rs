//! Recovery of files hidden in an image with Bit-Plane Complexity
//! Segmentation (BPCS) steganography.
//!
//! The carrier's three colour channels are split into bit-planes, each plane
//! into 8x8 blocks, and every block noisy enough to clear [`THRESHOLD`] is
//! read back as 63 payload bits. The bits form a self-describing stream:
//! name length, name, payload size, payload.

use serde::Serialize;
use std::path::{Path, PathBuf};

pub mod assembler;
pub mod bitplane;
pub mod bits;
pub mod carrier;
pub mod complexity;
pub mod conjugate;
pub mod error;
pub mod payload;
pub mod sink;

pub use assembler::{assemble, Assembler, ScanSite, ScanStats};
pub use carrier::Carrier;
pub use error::{ExtractError, Result};
pub use payload::RecoveredPayload;
pub use sink::{DirSink, PayloadSink};

// These constants are shared with the embedder. If any of them differ,
// extraction silently produces garbage.

/// Side length of a square block, in pixels.
pub const BLOCK_SIZE: usize = 8;
/// Number of cells in one block.
pub const BLOCK_CELLS: usize = BLOCK_SIZE * BLOCK_SIZE;
/// Payload bits carried by an admitted block; cell (0,0) is never used.
pub const BITS_PER_BLOCK: usize = BLOCK_CELLS - 1;
/// Lowest bit-plane scanned (0 = least significant).
pub const MIN_PLANE: u8 = 1;
/// Highest bit-plane scanned, inclusive.
pub const MAX_PLANE: u8 = 5;
/// Colour channels scanned, in R, G, B order.
pub const CHANNELS: usize = 3;
/// Minimum complexity for a block to be treated as carrying data.
pub const THRESHOLD: u32 = 34;
/// Name used when the embedded name decodes to an empty string.
pub const FALLBACK_NAME: &str = "recovered.bin";

/// A fully decoded carrier: the payload plus how the scan went.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub payload: RecoveredPayload,
    pub stats: ScanStats,
}

/// What gets printed (or serialized with `--json`) after a successful run.
#[derive(Serialize, Debug, Clone)]
pub struct ExtractionReport {
    pub name: String,
    pub path: PathBuf,
    pub bytes: usize,
    pub bits_collected: usize,
    pub bits_required: usize,
    pub blocks_visited: usize,
    pub blocks_admitted: usize,
    pub halted_at: Option<ScanSite>,
}

/// Decodes the payload hidden in an already-loaded carrier.
pub fn extract_carrier(carrier: &Carrier) -> Result<Extraction> {
    let (bits, stats) = assemble(carrier)?;
    let payload = payload::decode(&bits)?;
    Ok(Extraction { payload, stats })
}

/// Opens the image at `path` and decodes the payload hidden in it.
pub fn extract(path: impl AsRef<Path>) -> Result<Extraction> {
    let carrier = Carrier::open(path)?;
    extract_carrier(&carrier)
}

/// Decodes the payload hidden in `path` and hands it to `sink`.
pub fn extract_to<S: PayloadSink>(path: impl AsRef<Path>, sink: &S) -> Result<ExtractionReport> {
    let Extraction { payload, stats } = extract(path)?;
    let written = sink.persist(&payload.name, &payload.data)?;

    Ok(ExtractionReport {
        name: payload.name,
        path: written,
        bytes: payload.data.len(),
        bits_collected: stats.bits_collected,
        bits_required: stats.bits_required,
        blocks_visited: stats.blocks_visited,
        blocks_admitted: stats.blocks_admitted,
        halted_at: stats.halted_at,
    })
}
