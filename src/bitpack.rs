//! Repack, reverse, and rotate byte-backed bit streams between arbitrary
//! bits-per-symbol representations.
//!
//! Symbols are right-justified within a byte (e.g. a 3-bit symbol occupies
//! bits 2..0); bits are read and packed most-significant-first.

/// Identity-if-equal repack between `current_bps` and `new_bps`, both in `1..=8`.
///
/// Uses specialized fast paths for the common 8<->1 conversions and a
/// general bit-at-a-time path otherwise. If the total bit count is not a
/// multiple of `new_bps`, the final output symbol is left-justified within
/// its remaining bits (equivalent to zero-padding the stream's tail).
pub fn repack(payload: &[u8], current_bps: u32, new_bps: u32) -> Vec<u8> {
    assert!((1..=8).contains(&current_bps));
    assert!((1..=8).contains(&new_bps));

    if current_bps == new_bps {
        return payload.to_vec();
    }
    if current_bps == 8 && new_bps == 1 {
        return unpack(payload);
    }
    if current_bps == 1 && new_bps == 8 {
        return pack(payload);
    }

    let packed_bits_count = payload.len() as u64 * current_bps as u64;
    let repacked_count = packed_bits_count.div_ceil(new_bps as u64) as usize;
    let mut out = vec![0u8; repacked_count];

    let mut packed_symb = 0u8;
    let mut repacked_symb = 0u8;
    let mut packed_symbols_processed = 0usize;
    let mut packed_bits_processed = 0u32;
    let mut repacked_symbols_processed = 0usize;
    let mut repacked_bits_processed = 0u32;

    for _ in 0..packed_bits_count {
        repacked_symb <<= 1;

        if packed_bits_processed == 0 {
            packed_symb = payload[packed_symbols_processed];
            packed_symbols_processed += 1;
        }

        let mask = current_bps - packed_bits_processed - 1;
        repacked_symb |= (packed_symb >> mask) & 0x01;

        if repacked_bits_processed == new_bps - 1 {
            out[repacked_symbols_processed] = repacked_symb;
            repacked_symbols_processed += 1;
            repacked_symb = 0;
        }

        packed_bits_processed = (packed_bits_processed + 1) % current_bps;
        repacked_bits_processed = (repacked_bits_processed + 1) % new_bps;
    }

    if repacked_symbols_processed < repacked_count {
        repacked_symb <<= new_bps - repacked_bits_processed;
        out[repacked_symbols_processed] = repacked_symb;
    }

    out
}

/// Pack one-bit-per-byte symbols (LSB of each byte significant) into
/// eight-bits-per-byte output, MSB first.
pub fn pack(payload: &[u8]) -> Vec<u8> {
    let packed_count = payload.len().div_ceil(8);
    let mut out = vec![0u8; packed_count];

    let mut bit_idx = 0u32;
    let mut out_idx = 0usize;
    let mut packing = 0u8;

    for &sym in payload {
        packing |= sym & 0x01;
        bit_idx += 1;
        if bit_idx == 8 {
            out[out_idx] = packing;
            out_idx += 1;
            packing = 0;
            bit_idx = 0;
        } else {
            packing <<= 1;
        }
    }

    let rem = payload.len() % 8;
    if rem > 0 {
        out[out_idx] = packing << (7 - rem);
    }

    out
}

/// Unpack eight-bits-per-byte symbols into one-bit-per-byte output, MSB first.
pub fn unpack(payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; payload.len() * 8];
    for (i, &byte) in payload.iter().enumerate() {
        for b in 0..8 {
            out[i * 8 + b] = (byte >> (7 - b)) & 0x01;
        }
    }
    out
}

/// Reverse a bit stream, either by byte order (`byte_level = true`) or by
/// full logical bit order at the given `current_bps` granularity.
pub fn reverse(payload: &[u8], current_bps: u32, byte_level: bool) -> Vec<u8> {
    if byte_level {
        let mut out = payload.to_vec();
        out.reverse();
        return out;
    }
    if current_bps == 1 {
        let mut out = payload.to_vec();
        out.reverse();
        return out;
    }
    let mut bits = unpack_bps(payload, current_bps);
    bits.reverse();
    repack_from_bits(&bits, current_bps)
}

/// Rotate the logical bit stream by `num_bits mod total_bits`.
///
/// `left = true` rotates toward lower indices (the first bit moves to the
/// end); `left = false` rotates toward higher indices.
pub fn roll(payload: &[u8], current_bps: u32, num_bits: usize, left: bool) -> Vec<u8> {
    if num_bits == 0 || payload.is_empty() {
        return payload.to_vec();
    }
    let mut logical = unpack_bps(payload, current_bps);
    let shift = num_bits % logical.len().max(1);
    if shift != 0 {
        if left {
            logical.rotate_left(shift);
        } else {
            logical.rotate_right(shift);
        }
    }
    repack_from_bits(&logical, current_bps)
}

/// Unpack `payload` (symbols of `bps` bits, right-justified) into a
/// one-bit-per-`bool` logical stream, MSB first within each symbol.
fn unpack_bps(payload: &[u8], bps: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() * bps as usize);
    for &sym in payload {
        for b in (0..bps).rev() {
            out.push((sym >> b) & 0x01);
        }
    }
    out
}

/// Inverse of [`unpack_bps`]: pack a one-bit-per-entry logical stream back
/// into `bps`-bit symbols, zero-padding a short final symbol.
fn repack_from_bits(bits: &[u8], bps: u32) -> Vec<u8> {
    let count = (bits.len() as u64).div_ceil(bps as u64) as usize;
    let mut out = vec![0u8; count];
    for (i, chunk) in bits.chunks(bps as usize).enumerate() {
        let mut sym = 0u8;
        for (j, &bit) in chunk.iter().enumerate() {
            sym |= (bit & 0x01) << (bps as usize - 1 - j);
        }
        out[i] = sym;
    }
    out
}
