//! The identity FEC codec: no error correction, codeword equals message.

use crate::error::{Error, Result};
use crate::fec::FecCodec;
use crate::fec::scheme::FecScheme;

/// Passthrough codec. `k = n = max_continuous_cw_len`; `encode`/`decode`
/// just copy bytes, truncating or zero-padding to the configured length.
#[derive(Debug, Clone)]
pub struct NoFec {
    len_bytes: usize,
}

impl NoFec {
    /// `max_continuous_cw_len_bits` must be a multiple of 8.
    pub fn new(max_continuous_cw_len_bits: u32) -> Self {
        NoFec {
            len_bytes: (max_continuous_cw_len_bits / 8) as usize,
        }
    }
}

impl FecCodec for NoFec {
    fn encode(&self, message: &[u8]) -> Result<Vec<u8>> {
        if message.len() != self.len_bytes {
            return Err(Error::FecEncodeFailed(FecScheme::NoFec));
        }
        Ok(message.to_vec())
    }

    fn decode(&self, codeword: &[u8]) -> (Vec<u8>, u32) {
        let mut out = codeword.to_vec();
        out.resize(self.len_bytes, 0);
        (out, 0)
    }

    fn k_bytes(&self) -> usize {
        self.len_bytes
    }

    fn n_bytes(&self) -> usize {
        self.len_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_is_identity() {
        let codec = NoFec::new(32);
        let msg = vec![1u8, 2, 3, 4];
        assert_eq!(codec.encode(&msg).unwrap(), msg);
    }

    #[test]
    fn decode_pads_short_codeword() {
        let codec = NoFec::new(32);
        let (out, errs) = codec.decode(&[1, 2]);
        assert_eq!(out, vec![1, 2, 0, 0]);
        assert_eq!(errs, 0);
    }

    #[test]
    fn decode_truncates_long_codeword() {
        let codec = NoFec::new(16);
        let (out, _) = codec.decode(&[1, 2, 3, 4]);
        assert_eq!(out, vec![1, 2]);
    }
}
