//! Bit-plane view over one channel, partitioned into whole blocks.
//!
//! Pixels past the last whole block in either direction are not part of the
//! grid at all. Nothing is padded or partially read.

use crate::carrier::Carrier;
use crate::BLOCK_SIZE;

/// One BLOCK_SIZE x BLOCK_SIZE binary block, indexed `[row][col]`.
pub type Block = [[u8; BLOCK_SIZE]; BLOCK_SIZE];

/// Bit `plane` of every sample in `channel`, seen as a grid of blocks.
#[derive(Debug, Clone, Copy)]
pub struct BitPlane<'a> {
    carrier: &'a Carrier,
    channel: usize,
    plane: u8,
}

impl<'a> BitPlane<'a> {
    pub fn new(carrier: &'a Carrier, channel: usize, plane: u8) -> Self {
        Self {
            carrier,
            channel,
            plane,
        }
    }

    pub fn channel(&self) -> usize {
        self.channel
    }

    pub fn plane(&self) -> u8 {
        self.plane
    }

    /// Number of whole block rows; zero when the image is shorter than a block.
    pub fn block_rows(&self) -> usize {
        self.carrier.height() / BLOCK_SIZE
    }

    /// Number of whole block columns.
    pub fn block_cols(&self) -> usize {
        self.carrier.width() / BLOCK_SIZE
    }

    pub fn block_count(&self) -> usize {
        self.block_rows() * self.block_cols()
    }

    /// The plane bits under block (`block_row`, `block_col`).
    pub fn block(&self, block_row: usize, block_col: usize) -> Block {
        debug_assert!(block_row < self.block_rows() && block_col < self.block_cols());
        let (y0, x0) = (block_row * BLOCK_SIZE, block_col * BLOCK_SIZE);
        let mut block = [[0u8; BLOCK_SIZE]; BLOCK_SIZE];
        for (r, row) in block.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (self.carrier.sample(y0 + r, x0 + c, self.channel) >> self.plane) & 1;
            }
        }
        block
    }

    /// Bit 0 of the untouched sample at the block's top-left pixel.
    ///
    /// This is the conjugation flag. It is read from the raw byte, not from
    /// this plane, so it is shared by every scanned plane of the channel.
    pub fn flag(&self, block_row: usize, block_col: usize) -> u8 {
        self.carrier
            .sample(block_row * BLOCK_SIZE, block_col * BLOCK_SIZE, self.channel)
            & 1
    }

    /// All blocks in row-major order.
    pub fn blocks(&self) -> impl Iterator<Item = Block> + '_ {
        let cols = self.block_cols();
        (0..self.block_rows())
            .flat_map(move |r| (0..cols).map(move |c| (r, c)))
            .map(move |(r, c)| self.block(r, c))
    }
}
