//! Undoing checkerboard conjugation.
//!
//! The embedder XORs a block with [`CHECKERBOARD`] when its payload bits are
//! too regular to clear the threshold, and records that in the flag bit.

use crate::bitplane::Block;
use crate::{BITS_PER_BLOCK, BLOCK_SIZE};

const fn checkerboard() -> Block {
    let mut board = [[0u8; BLOCK_SIZE]; BLOCK_SIZE];
    let mut r = 0;
    while r < BLOCK_SIZE {
        let mut c = 0;
        while c < BLOCK_SIZE {
            board[r][c] = ((r + c) & 1) as u8;
            c += 1;
        }
        r += 1;
    }
    board
}

/// Cell (r, c) is `(r + c) mod 2`.
pub const CHECKERBOARD: Block = checkerboard();

/// Payload bits of an admitted block, row-major with cell (0,0) skipped.
///
/// With `flag == 1` each bit is XORed with the matching checkerboard cell.
pub fn resolve(flag: u8, block: &Block) -> [u8; BITS_PER_BLOCK] {
    let mut out = [0u8; BITS_PER_BLOCK];
    let cells = block.iter().flatten().zip(CHECKERBOARD.iter().flatten()).skip(1);
    for (slot, (&bit, &mask)) in out.iter_mut().zip(cells) {
        *slot = if flag == 1 { bit ^ mask } else { bit };
    }
    out
}
