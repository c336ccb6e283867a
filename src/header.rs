//! MPDU header: serialize and parse the 9-byte Golay-protected header that
//! precedes every frame's payload.

use crate::error::{Error, Result};
use crate::fec::scheme::FecScheme;
use crate::golay::{self, Decoded};

/// The header's on-wire length in bytes.
pub const HEADER_LEN: usize = 9;

/// A parsed, field-level view of the MPDU header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Radio modulation id, 0..7.
    pub modulation: u8,
    /// FEC scheme in effect for this frame's codeword fragment.
    pub fec_scheme: FecScheme,
    /// Monotonically increasing fragment index within the codeword stream, 0..127.
    pub codeword_fragment_index: u8,
    /// Declared length of the user packet payload this frame's packet belongs to.
    pub user_packet_payload_length: u16,
    /// Reserved packet-fragment index; always 0 for the fragmentation scheme this core uses.
    pub user_packet_fragment_index: u8,
}

impl Header {
    /// Serialize into exactly [`HEADER_LEN`] bytes: three Golay codewords,
    /// each emitted big-endian.
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let word1 = ((self.modulation as u32 & 0x7) << 9)
            | ((self.fec_scheme.as_u16() as u32 & 0x3F) << 3)
            | ((self.codeword_fragment_index as u32 >> 4) & 0x7);
        let word2 = ((self.codeword_fragment_index as u32 & 0xF) << 8)
            | ((self.user_packet_payload_length as u32 >> 4) & 0xFF);
        let word3 = ((self.user_packet_payload_length as u32 & 0xF) << 8)
            | (self.user_packet_fragment_index as u32 & 0xFF);

        let cw1 = golay::encode(word1 as u16);
        let cw2 = golay::encode(word2 as u16);
        let cw3 = golay::encode(word3 as u16);

        let mut out = [0u8; HEADER_LEN];
        out[0..3].copy_from_slice(&cw1.to_be_bytes()[1..4]);
        out[3..6].copy_from_slice(&cw2.to_be_bytes()[1..4]);
        out[6..9].copy_from_slice(&cw3.to_be_bytes()[1..4]);
        out
    }

    /// Parse [`HEADER_LEN`] bytes, correcting up to 3 bit errors per Golay
    /// codeword. Fails if any codeword is uncorrectable or the parsed FEC
    /// scheme tag is unknown.
    pub fn decode(bytes: &[u8]) -> Result<Header> {
        if bytes.len() != HEADER_LEN {
            return Err(Error::BadFrameLength {
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        }
        let cw1 = u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]);
        let cw2 = u32::from_be_bytes([0, bytes[3], bytes[4], bytes[5]]);
        let cw3 = u32::from_be_bytes([0, bytes[6], bytes[7], bytes[8]]);

        let word1 = match golay::decode(cw1) {
            Decoded::Message(m) => m as u32,
            Decoded::Uncorrectable => {
                log::warn!("header decode: codeword 1 uncorrectable");
                return Err(Error::BadHeader("codeword 1 uncorrectable"));
            }
        };
        let word2 = match golay::decode(cw2) {
            Decoded::Message(m) => m as u32,
            Decoded::Uncorrectable => {
                log::warn!("header decode: codeword 2 uncorrectable");
                return Err(Error::BadHeader("codeword 2 uncorrectable"));
            }
        };
        let word3 = match golay::decode(cw3) {
            Decoded::Message(m) => m as u32,
            Decoded::Uncorrectable => {
                log::warn!("header decode: codeword 3 uncorrectable");
                return Err(Error::BadHeader("codeword 3 uncorrectable"));
            }
        };

        let modulation = ((word1 >> 9) & 0x7) as u8;
        let fec_tag = ((word1 >> 3) & 0x3F) as u16;
        let cwfi_high = word1 & 0x7;
        let cwfi_low = (word2 >> 8) & 0xF;
        let codeword_fragment_index = ((cwfi_high << 4) | cwfi_low) as u8;
        let upl_high = word2 & 0xFF;
        let upl_low = (word3 >> 8) & 0xF;
        let user_packet_payload_length = ((upl_high << 4) | upl_low) as u16;
        let user_packet_fragment_index = (word3 & 0xFF) as u8;

        let fec_scheme = FecScheme::from_u16(fec_tag).map_err(|_| {
            log::warn!("header decode: unknown FEC scheme tag {fec_tag:#04x}");
            Error::BadHeader("unknown FEC scheme tag")
        })?;

        Ok(Header {
            modulation,
            fec_scheme,
            codeword_fragment_index,
            user_packet_payload_length,
            user_packet_fragment_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Header {
        Header {
            modulation: 3,
            fec_scheme: FecScheme::NoFec,
            codeword_fragment_index: 0,
            user_packet_payload_length: 10,
            user_packet_fragment_index: 0,
        }
    }

    #[test]
    fn round_trips() -> Result<()> {
        let h = sample();
        let bytes = h.encode();
        assert_eq!(Header::decode(&bytes)?, h);
        Ok(())
    }

    #[test]
    fn round_trips_all_field_combinations_sampled() -> Result<()> {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let h = Header {
                modulation: rng.random_range(0..8),
                fec_scheme: FecScheme::from_u16(rng.random_range(0..=0x30))?,
                codeword_fragment_index: rng.random_range(0..128),
                user_packet_payload_length: rng.random_range(0..4096),
                user_packet_fragment_index: rng.random_range(0..=255),
            };
            let bytes = h.encode();
            assert_eq!(Header::decode(&bytes)?, h);
        }
        Ok(())
    }

    #[test]
    fn bad_length_is_rejected() {
        assert_eq!(
            Header::decode(&[0u8; 8]),
            Err(Error::BadFrameLength {
                expected: HEADER_LEN,
                actual: 8
            })
        );
    }

    #[test]
    fn uncorrectable_codeword_is_bad_header() {
        let h = sample();
        let mut bytes = h.encode();
        // Flip 4 bits in the first codeword: beyond the 3-bit correction bound.
        bytes[0] ^= 0b1111_0000;
        assert!(matches!(Header::decode(&bytes), Err(Error::BadHeader(_))));
    }
}
