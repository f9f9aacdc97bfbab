//! A minimal BPCS embedder: the inverse of the extractor, used to build
//! stego carriers for the integration tests.

#![allow(dead_code)]

use anyhow::{bail, Result};
use bpcs_extract::bitplane::Block;
use bpcs_extract::complexity::{complexity, is_admitted};
use bpcs_extract::conjugate::CHECKERBOARD;
use bpcs_extract::{BITS_PER_BLOCK, BLOCK_SIZE, CHANNELS, MAX_PLANE, MIN_PLANE};
use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

/// Uniform noise: almost every block of every plane is complex.
pub fn noise_carrier(width: u32, height: u32, seed: u64) -> RgbImage {
    let mut rng = StdRng::seed_from_u64(seed);
    RgbImage::from_fn(width, height, |_, _| Rgb([rng.gen(), rng.gen(), rng.gen()]))
}

/// The embedded stream: name length, name, payload size, payload; MSB first.
pub fn stream_bits(name: &[u8], data: &[u8]) -> Vec<u8> {
    let mut bytes = vec![name.len() as u8];
    bytes.extend_from_slice(name);
    bytes.extend_from_slice(&(data.len() as u32).to_be_bytes());
    bytes.extend_from_slice(data);
    bytes
        .iter()
        .flat_map(|&byte| (0..8).map(move |i| (byte >> (7 - i)) & 1))
        .collect()
}

fn plane_bit(img: &RgbImage, x: u32, y: u32, channel: usize, plane: u8) -> u8 {
    (img.get_pixel(x, y)[channel] >> plane) & 1
}

fn write_block(img: &mut RgbImage, bx: u32, by: u32, channel: usize, plane: u8, block: &Block) {
    for (r, row) in block.iter().enumerate() {
        for (c, &bit) in row.iter().enumerate() {
            let px = img.get_pixel_mut(bx + c as u32, by + r as u32);
            px[channel] = (px[channel] & !(1u8 << plane)) | (bit << plane);
        }
    }
}

/// Hides `bits` in `img` following the extractor's scan order.
///
/// The conjugation flag lives in bit 0 of a block's top-left pixel and is
/// shared by every plane of that channel, so it is fixed the first time a
/// block position carries data. Blocks that can't be made complex enough
/// are cleared so the extractor skips them.
pub fn embed(img: &mut RgbImage, bits: &[u8], seed: u64) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let (rows, cols) = (img.height() as usize / BLOCK_SIZE, img.width() as usize / BLOCK_SIZE);
    let mut flags: Vec<Option<u8>> = vec![None; CHANNELS * rows * cols];
    let mut pos = 0;

    for channel in 0..CHANNELS {
        for plane in MIN_PLANE..=MAX_PLANE {
            for row in 0..rows {
                for col in 0..cols {
                    if pos >= bits.len() {
                        return Ok(());
                    }
                    let (bx, by) = ((col * BLOCK_SIZE) as u32, (row * BLOCK_SIZE) as u32);
                    let chunk: Vec<u8> = (0..BITS_PER_BLOCK)
                        .map(|k| bits.get(pos + k).copied().unwrap_or_else(|| rng.gen_range(0..2)))
                        .collect();
                    let corner = plane_bit(img, bx, by, channel, plane);

                    let build = |flag: u8| {
                        let mut block = [[0u8; BLOCK_SIZE]; BLOCK_SIZE];
                        block[0][0] = corner;
                        for (k, &bit) in chunk.iter().enumerate() {
                            let (r, c) = ((k + 1) / BLOCK_SIZE, (k + 1) % BLOCK_SIZE);
                            block[r][c] = bit ^ (flag & CHECKERBOARD[r][c]);
                        }
                        block
                    };

                    let slot = (channel * rows + row) * cols + col;
                    let candidates: Vec<u8> = match flags[slot] {
                        Some(flag) => vec![flag],
                        None => vec![0, 1],
                    };
                    let chosen = candidates
                        .into_iter()
                        .map(|flag| (flag, build(flag)))
                        .find(|(_, block)| is_admitted(complexity(block)));

                    match chosen {
                        Some((flag, block)) => {
                            write_block(img, bx, by, channel, plane, &block);
                            let px = img.get_pixel_mut(bx, by);
                            px[channel] = (px[channel] & !1u8) | flag;
                            flags[slot] = Some(flag);
                            pos += BITS_PER_BLOCK;
                        }
                        None => {
                            write_block(img, bx, by, channel, plane, &[[0; BLOCK_SIZE]; BLOCK_SIZE]);
                        }
                    }
                }
            }
        }
    }

    if pos < bits.len() {
        bail!("carrier too small: embedded {} of {} bits", pos, bits.len());
    }
    Ok(())
}

/// A fresh noise carrier holding `name` and `data`.
pub fn stego_image(width: u32, height: u32, name: &[u8], data: &[u8], seed: u64) -> Result<RgbImage> {
    let mut img = noise_carrier(width, height, seed);
    embed(&mut img, &stream_bits(name, data), seed ^ 0x5eed)?;
    Ok(img)
}

/// An empty per-test directory, removed when the guard drops.
pub fn scratch_dir(tag: &str) -> Result<TempDir> {
    let dir = tempfile::Builder::new()
        .prefix(&format!("bpcs_{}_", tag))
        .tempdir()?;
    Ok(dir)
}
