//! Transition-count complexity of binary blocks.

use crate::bitplane::{BitPlane, Block};
use crate::{BLOCK_SIZE, THRESHOLD};

/// Highest possible score, reached by a checkerboard.
pub const MAX_COMPLEXITY: u32 = (2 * BLOCK_SIZE * (BLOCK_SIZE - 1)) as u32;

/// Number of horizontally and vertically adjacent cell pairs that differ.
pub fn complexity(block: &Block) -> u32 {
    let horizontal: u32 = block
        .iter()
        .map(|row| row.windows(2).map(|w| (w[0] ^ w[1]) as u32).sum::<u32>())
        .sum();
    let vertical: u32 = block
        .windows(2)
        .map(|rows| {
            rows[0]
                .iter()
                .zip(rows[1].iter())
                .map(|(a, b)| (a ^ b) as u32)
                .sum::<u32>()
        })
        .sum();
    horizontal + vertical
}

#[inline]
pub fn is_admitted(score: u32) -> bool {
    score >= THRESHOLD
}

/// Scores of every block of `plane`, row-major.
///
/// The grid is fully materialised before anything is appended to the
/// bitstream; each entry depends only on its own block.
pub fn score_grid(plane: &BitPlane<'_>) -> Vec<u32> {
    plane.blocks().map(|block| complexity(&block)).collect()
}
