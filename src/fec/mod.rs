//! Forward error correction: the scheme registry and codec implementations.
//!
//! Only `NO_FEC` and `CCSDS_CONVOLUTIONAL_CODING_R_1_2` have working codecs;
//! every other catalog entry is still a valid [`scheme::FecScheme`] for
//! metadata queries (`n`, `k`, rate), matching the reference registry's
//! "many schemes tabulated, two implemented" shape.

pub mod convolutional;
pub mod no_fec;
pub mod scheme;

use crate::error::{Error, Result};
use convolutional::{ConvParams, ConvolutionalHd};
use no_fec::NoFec;
use scheme::{BlockInfo, FecScheme, Rate};

/// The default continuous codeword length: one full frame payload, in bits.
pub const DEFAULT_MAX_CONTINUOUS_CW_LEN_BITS: u32 = crate::frame::MAX_MTU as u32 * 8;

/// Encode/decode capability for one FEC scheme instance.
pub trait FecCodec: std::fmt::Debug {
    /// Encode exactly `k_bytes()` bytes into exactly `n_bytes()` bytes.
    fn encode(&self, message: &[u8]) -> Result<Vec<u8>>;

    /// Decode a codeword of `n_bytes()` bytes into a message of exactly
    /// `k_bytes()` bytes, plus a bit-error estimate (`0` on success; this
    /// family of hard-decision codecs cannot do better).
    fn decode(&self, codeword: &[u8]) -> (Vec<u8>, u32);

    /// Message size in bytes.
    fn k_bytes(&self) -> usize;

    /// Codeword size in bytes.
    fn n_bytes(&self) -> usize;
}

/// Size a continuous (convolutional) scheme from its configured maximum
/// codeword length: `k = floor(max_cw * rate / 8) * 8`, then `n = k / rate`
/// rounded to the nearest byte. Only `rate = 1/2` (the one convolutional
/// scheme this core constructs a codec for) comes out byte-exact; the other
/// four convolutional rates are tabulated here for metadata queries only; see
/// `DESIGN.md`.
fn continuous_block_info(rate: Rate, max_cw_bits: u32) -> BlockInfo {
    let raw_k = (max_cw_bits as u64 * rate.num as u64) / rate.den as u64;
    let k_bits = ((raw_k / 8) * 8) as u32;
    let exact_n = k_bits as f64 * rate.den as f64 / rate.num as f64;
    let n_bits = ((exact_n / 8.0).round() as u32) * 8;
    BlockInfo {
        n_bits,
        k_bits,
        rate,
    }
}

/// `(n, k, rate)` for `scheme`. `max_continuous_cw_len_bits` is only used for
/// `NO_FEC` and the convolutional schemes; block schemes ignore it.
pub fn scheme_info(scheme: FecScheme, max_continuous_cw_len_bits: u32) -> Result<BlockInfo> {
    if scheme == FecScheme::NoFec {
        return Ok(BlockInfo {
            n_bits: max_continuous_cw_len_bits,
            k_bits: max_continuous_cw_len_bits,
            rate: Rate { num: 1, den: 1 },
        });
    }
    if scheme.is_convolutional() {
        let rate = scheme.rate().ok_or(Error::NoRateForScheme(scheme))?;
        return Ok(continuous_block_info(rate, max_continuous_cw_len_bits));
    }
    scheme.block_info().ok_or(Error::NoRateForScheme(scheme))
}

/// Construct the codec for `scheme`, or `UnimplementedCodec` for every
/// catalog entry beyond `NO_FEC` and the CCSDS rate-1/2 convolutional code.
pub fn codec_for(scheme: FecScheme, max_continuous_cw_len_bits: u32) -> Result<Box<dyn FecCodec>> {
    match scheme {
        FecScheme::NoFec => {
            let info = scheme_info(scheme, max_continuous_cw_len_bits)?;
            Ok(Box::new(NoFec::new(info.n_bits)))
        }
        FecScheme::CcsdsConvolutionalR1_2 => {
            let info = scheme_info(scheme, max_continuous_cw_len_bits)?;
            Ok(Box::new(ConvolutionalHd::new(
                scheme,
                ConvParams::CCSDS_K7,
                (info.k_bits / 8) as usize,
                (info.n_bits / 8) as usize,
            )))
        }
        other => Err(Error::UnimplementedCodec(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_fec_info_is_rate_one() {
        let info = scheme_info(FecScheme::NoFec, 952).unwrap();
        assert_eq!(info.n_bits, 952);
        assert_eq!(info.k_bits, 952);
    }

    #[test]
    fn convolutional_info_is_byte_aligned() {
        let info = scheme_info(FecScheme::CcsdsConvolutionalR1_2, 952).unwrap();
        assert_eq!(info.k_bits % 8, 0);
        assert_eq!(info.n_bits % 8, 0);
        assert_eq!(info.n_bits, info.k_bits * 2);
    }

    #[test]
    fn unimplemented_scheme_reports_error() {
        let err = codec_for(FecScheme::CcsdsTurbo1784R1_2, 952).unwrap_err();
        assert_eq!(err, Error::UnimplementedCodec(FecScheme::CcsdsTurbo1784R1_2));
    }

    #[test]
    fn no_fec_codec_round_trips() {
        let codec = codec_for(FecScheme::NoFec, 32).unwrap();
        let msg = vec![1u8, 2, 3, 4];
        let cw = codec.encode(&msg).unwrap();
        let (decoded, errs) = codec.decode(&cw);
        assert_eq!(decoded, msg);
        assert_eq!(errs, 0);
    }

    #[test]
    fn convolutional_codec_round_trips() {
        let codec = codec_for(FecScheme::CcsdsConvolutionalR1_2, 32).unwrap();
        let msg = vec![0u8; codec.k_bytes()];
        let cw = codec.encode(&msg).unwrap();
        assert_eq!(cw.len(), codec.n_bytes());
        let (decoded, _) = codec.decode(&cw);
        assert_eq!(decoded, msg);
    }
}
