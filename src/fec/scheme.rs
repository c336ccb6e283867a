//! The FEC scheme enumeration and its static metadata table.
//!
//! Values and ordering match the reference registry exactly so that a tag
//! observed on the wire round-trips through this enum without renumbering.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Coding rate as a small rational, kept exact rather than as `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate {
    /// Numerator.
    pub num: u32,
    /// Denominator.
    pub den: u32,
}

impl Rate {
    const fn new(num: u32, den: u32) -> Self {
        Rate { num, den }
    }

    /// The rate as a floating-point fraction, for tolerance comparisons.
    pub fn as_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

/// One row of the fixed block-scheme table: codeword length, message length
/// (both bits), and coding rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    /// Codeword length in bits.
    pub n_bits: u32,
    /// Message length in bits.
    pub k_bits: u32,
    /// Coding rate.
    pub rate: Rate,
}

/// All known FEC schemes, in the order and with the values of the reference
/// enumeration (`CCSDS_CONVOLUTIONAL_CODING_R_1_2 = 0x0000` through
/// `LAST = 0x0031`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum FecScheme {
    CcsdsConvolutionalR1_2 = 0x0000,
    CcsdsConvolutionalR2_3 = 0x0001,
    CcsdsConvolutionalR3_4 = 0x0002,
    CcsdsConvolutionalR5_6 = 0x0003,
    CcsdsConvolutionalR7_8 = 0x0004,
    CcsdsReedSolomon255_239Interleaving1 = 0x0005,
    CcsdsReedSolomon255_239Interleaving2 = 0x0006,
    CcsdsReedSolomon255_239Interleaving3 = 0x0007,
    CcsdsReedSolomon255_239Interleaving4 = 0x0008,
    CcsdsReedSolomon255_239Interleaving5 = 0x0009,
    CcsdsReedSolomon255_239Interleaving8 = 0x000A,
    CcsdsReedSolomon255_223Interleaving1 = 0x000B,
    CcsdsReedSolomon255_223Interleaving2 = 0x000C,
    CcsdsReedSolomon255_223Interleaving3 = 0x000D,
    CcsdsReedSolomon255_223Interleaving4 = 0x000E,
    CcsdsReedSolomon255_223Interleaving5 = 0x000F,
    CcsdsReedSolomon255_223Interleaving8 = 0x0010,
    CcsdsTurbo1784R1_2 = 0x0011,
    CcsdsTurbo1784R1_3 = 0x0012,
    CcsdsTurbo1784R1_4 = 0x0013,
    CcsdsTurbo1784R1_6 = 0x0014,
    CcsdsTurbo3568R1_2 = 0x0015,
    CcsdsTurbo3568R1_3 = 0x0016,
    CcsdsTurbo3568R1_4 = 0x0017,
    CcsdsTurbo3568R1_6 = 0x0018,
    CcsdsTurbo7136R1_2 = 0x0019,
    CcsdsTurbo7136R1_3 = 0x001A,
    CcsdsTurbo7136R1_4 = 0x001B,
    CcsdsTurbo7136R1_6 = 0x001C,
    CcsdsTurbo8920R1_2 = 0x001D,
    CcsdsTurbo8920R1_3 = 0x001E,
    CcsdsTurbo8920R1_4 = 0x001F,
    CcsdsTurbo8920R1_6 = 0x0020,
    CcsdsLdpcOrangeBook1280 = 0x0021,
    CcsdsLdpcOrangeBook1536 = 0x0022,
    CcsdsLdpcOrangeBook2048 = 0x0023,
    Ieee80211nQcldpc648R1_2 = 0x0024,
    Ieee80211nQcldpc648R2_3 = 0x0025,
    Ieee80211nQcldpc648R3_4 = 0x0026,
    Ieee80211nQcldpc648R5_6 = 0x0027,
    Ieee80211nQcldpc1296R1_2 = 0x0028,
    Ieee80211nQcldpc1296R2_3 = 0x0029,
    Ieee80211nQcldpc1296R3_4 = 0x002A,
    Ieee80211nQcldpc1296R5_6 = 0x002B,
    Ieee80211nQcldpc1944R1_2 = 0x002C,
    Ieee80211nQcldpc1944R2_3 = 0x002D,
    Ieee80211nQcldpc1944R3_4 = 0x002E,
    Ieee80211nQcldpc1944R5_6 = 0x002F,
    /// No forward error correction; the codec is the identity function.
    NoFec = 0x0030,
    /// Sentinel marking the end of the enumeration. Not a constructible scheme.
    Last = 0x0031,
}

impl FecScheme {
    /// Parse a wire tag into a scheme, rejecting `LAST` and anything beyond it.
    pub fn from_u16(tag: u16) -> Result<Self> {
        use FecScheme::*;
        Ok(match tag {
            0x0000 => CcsdsConvolutionalR1_2,
            0x0001 => CcsdsConvolutionalR2_3,
            0x0002 => CcsdsConvolutionalR3_4,
            0x0003 => CcsdsConvolutionalR5_6,
            0x0004 => CcsdsConvolutionalR7_8,
            0x0005 => CcsdsReedSolomon255_239Interleaving1,
            0x0006 => CcsdsReedSolomon255_239Interleaving2,
            0x0007 => CcsdsReedSolomon255_239Interleaving3,
            0x0008 => CcsdsReedSolomon255_239Interleaving4,
            0x0009 => CcsdsReedSolomon255_239Interleaving5,
            0x000A => CcsdsReedSolomon255_239Interleaving8,
            0x000B => CcsdsReedSolomon255_223Interleaving1,
            0x000C => CcsdsReedSolomon255_223Interleaving2,
            0x000D => CcsdsReedSolomon255_223Interleaving3,
            0x000E => CcsdsReedSolomon255_223Interleaving4,
            0x000F => CcsdsReedSolomon255_223Interleaving5,
            0x0010 => CcsdsReedSolomon255_223Interleaving8,
            0x0011 => CcsdsTurbo1784R1_2,
            0x0012 => CcsdsTurbo1784R1_3,
            0x0013 => CcsdsTurbo1784R1_4,
            0x0014 => CcsdsTurbo1784R1_6,
            0x0015 => CcsdsTurbo3568R1_2,
            0x0016 => CcsdsTurbo3568R1_3,
            0x0017 => CcsdsTurbo3568R1_4,
            0x0018 => CcsdsTurbo3568R1_6,
            0x0019 => CcsdsTurbo7136R1_2,
            0x001A => CcsdsTurbo7136R1_3,
            0x001B => CcsdsTurbo7136R1_4,
            0x001C => CcsdsTurbo7136R1_6,
            0x001D => CcsdsTurbo8920R1_2,
            0x001E => CcsdsTurbo8920R1_3,
            0x001F => CcsdsTurbo8920R1_4,
            0x0020 => CcsdsTurbo8920R1_6,
            0x0021 => CcsdsLdpcOrangeBook1280,
            0x0022 => CcsdsLdpcOrangeBook1536,
            0x0023 => CcsdsLdpcOrangeBook2048,
            0x0024 => Ieee80211nQcldpc648R1_2,
            0x0025 => Ieee80211nQcldpc648R2_3,
            0x0026 => Ieee80211nQcldpc648R3_4,
            0x0027 => Ieee80211nQcldpc648R5_6,
            0x0028 => Ieee80211nQcldpc1296R1_2,
            0x0029 => Ieee80211nQcldpc1296R2_3,
            0x002A => Ieee80211nQcldpc1296R3_4,
            0x002B => Ieee80211nQcldpc1296R5_6,
            0x002C => Ieee80211nQcldpc1944R1_2,
            0x002D => Ieee80211nQcldpc1944R2_3,
            0x002E => Ieee80211nQcldpc1944R3_4,
            0x002F => Ieee80211nQcldpc1944R5_6,
            0x0030 => NoFec,
            other => return Err(Error::InvalidScheme(other)),
        })
    }

    /// The wire tag for this scheme.
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

// Serialized as the bare wire tag: `FecScheme` carries no payload beyond it.
impl Serialize for FecScheme {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u16(self.as_u16())
    }
}

impl<'de> Deserialize<'de> for FecScheme {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tag = u16::deserialize(deserializer)?;
        FecScheme::from_u16(tag).map_err(serde::de::Error::custom)
    }
}

impl FecScheme {
    /// True for the five continuous (convolutional) schemes, whose `(n, k)`
    /// depend on a configured maximum codeword length rather than being
    /// fixed. `NO_FEC` is also length-configurable but follows its own
    /// `k = n = max_cw` rule rather than this one, so it is excluded here.
    pub fn is_convolutional(self) -> bool {
        use FecScheme::*;
        matches!(
            self,
            CcsdsConvolutionalR1_2
                | CcsdsConvolutionalR2_3
                | CcsdsConvolutionalR3_4
                | CcsdsConvolutionalR5_6
                | CcsdsConvolutionalR7_8
        )
    }

    /// The coding rate for this scheme, or `None` for `LAST`.
    pub fn rate(self) -> Option<Rate> {
        use FecScheme::*;
        Some(match self {
            CcsdsConvolutionalR1_2 => Rate::new(1, 2),
            CcsdsConvolutionalR2_3 => Rate::new(2, 3),
            CcsdsConvolutionalR3_4 => Rate::new(3, 4),
            CcsdsConvolutionalR5_6 => Rate::new(5, 6),
            CcsdsConvolutionalR7_8 => Rate::new(7, 8),
            CcsdsReedSolomon255_239Interleaving1
            | CcsdsReedSolomon255_239Interleaving2
            | CcsdsReedSolomon255_239Interleaving3
            | CcsdsReedSolomon255_239Interleaving4
            | CcsdsReedSolomon255_239Interleaving5
            | CcsdsReedSolomon255_239Interleaving8 => Rate::new(1912, 2040),
            CcsdsReedSolomon255_223Interleaving1
            | CcsdsReedSolomon255_223Interleaving2
            | CcsdsReedSolomon255_223Interleaving3
            | CcsdsReedSolomon255_223Interleaving4
            | CcsdsReedSolomon255_223Interleaving5
            | CcsdsReedSolomon255_223Interleaving8 => Rate::new(1784, 2040),
            CcsdsTurbo1784R1_2 | CcsdsTurbo3568R1_2 | CcsdsTurbo7136R1_2 | CcsdsTurbo8920R1_2 => {
                Rate::new(1, 2)
            }
            CcsdsTurbo1784R1_3 | CcsdsTurbo3568R1_3 | CcsdsTurbo7136R1_3 | CcsdsTurbo8920R1_3 => {
                Rate::new(1, 3)
            }
            CcsdsTurbo1784R1_4 | CcsdsTurbo3568R1_4 | CcsdsTurbo7136R1_4 | CcsdsTurbo8920R1_4 => {
                Rate::new(1, 4)
            }
            CcsdsTurbo1784R1_6 | CcsdsTurbo3568R1_6 | CcsdsTurbo7136R1_6 | CcsdsTurbo8920R1_6 => {
                Rate::new(1, 6)
            }
            CcsdsLdpcOrangeBook1280 => Rate::new(4, 5),
            CcsdsLdpcOrangeBook1536 => Rate::new(2, 3),
            CcsdsLdpcOrangeBook2048 => Rate::new(1, 2),
            Ieee80211nQcldpc648R1_2 | Ieee80211nQcldpc1296R1_2 | Ieee80211nQcldpc1944R1_2 => {
                Rate::new(1, 2)
            }
            Ieee80211nQcldpc648R2_3 | Ieee80211nQcldpc1296R2_3 | Ieee80211nQcldpc1944R2_3 => {
                Rate::new(2, 3)
            }
            Ieee80211nQcldpc648R3_4 | Ieee80211nQcldpc1296R3_4 | Ieee80211nQcldpc1944R3_4 => {
                Rate::new(3, 4)
            }
            Ieee80211nQcldpc648R5_6 | Ieee80211nQcldpc1296R5_6 | Ieee80211nQcldpc1944R5_6 => {
                Rate::new(5, 6)
            }
            NoFec => Rate::new(1, 1),
            Last => return None,
        })
    }

    /// `(n, k)` in bits for a fixed-size block scheme. Returns `None` for the
    /// five continuous schemes and for `LAST`; those are sized by
    /// [`crate::fec::continuous_block_info`] instead.
    pub fn block_info(self) -> Option<BlockInfo> {
        use FecScheme::*;
        let (n_bits, k_bits) = match self {
            CcsdsReedSolomon255_239Interleaving1
            | CcsdsReedSolomon255_239Interleaving2
            | CcsdsReedSolomon255_239Interleaving3
            | CcsdsReedSolomon255_239Interleaving4
            | CcsdsReedSolomon255_239Interleaving5
            | CcsdsReedSolomon255_239Interleaving8 => (2040, 1912),
            CcsdsReedSolomon255_223Interleaving1
            | CcsdsReedSolomon255_223Interleaving2
            | CcsdsReedSolomon255_223Interleaving3
            | CcsdsReedSolomon255_223Interleaving4
            | CcsdsReedSolomon255_223Interleaving5
            | CcsdsReedSolomon255_223Interleaving8 => (2040, 1784),
            CcsdsTurbo1784R1_2 => (3576, 1784),
            CcsdsTurbo1784R1_3 => (5364, 1784),
            CcsdsTurbo1784R1_4 => (7152, 1784),
            CcsdsTurbo1784R1_6 => (10728, 1784),
            CcsdsTurbo3568R1_2 => (7144, 3568),
            CcsdsTurbo3568R1_3 => (10716, 3568),
            CcsdsTurbo3568R1_4 => (14288, 3568),
            CcsdsTurbo3568R1_6 => (21432, 3568),
            CcsdsTurbo7136R1_2 => (14280, 7136),
            CcsdsTurbo7136R1_3 => (21420, 7136),
            CcsdsTurbo7136R1_4 => (28560, 7136),
            CcsdsTurbo7136R1_6 => (42840, 7136),
            CcsdsTurbo8920R1_2 => (17848, 8920),
            CcsdsTurbo8920R1_3 => (26772, 8920),
            CcsdsTurbo8920R1_4 => (35696, 8920),
            CcsdsTurbo8920R1_6 => (53544, 8920),
            CcsdsLdpcOrangeBook1280 => (1280, 1024),
            CcsdsLdpcOrangeBook1536 => (1536, 1024),
            CcsdsLdpcOrangeBook2048 => (2048, 1024),
            Ieee80211nQcldpc648R1_2 => (648, 324),
            Ieee80211nQcldpc648R2_3 => (648, 432),
            Ieee80211nQcldpc648R3_4 => (648, 486),
            Ieee80211nQcldpc648R5_6 => (648, 540),
            Ieee80211nQcldpc1296R1_2 => (1296, 648),
            Ieee80211nQcldpc1296R2_3 => (1296, 864),
            Ieee80211nQcldpc1296R3_4 => (1296, 972),
            Ieee80211nQcldpc1296R5_6 => (1296, 1080),
            Ieee80211nQcldpc1944R1_2 => (1944, 972),
            Ieee80211nQcldpc1944R2_3 => (1944, 1296),
            Ieee80211nQcldpc1944R3_4 => (1944, 1458),
            Ieee80211nQcldpc1944R5_6 => (1944, 1620),
            _ => return None,
        };
        Some(BlockInfo {
            n_bits,
            k_bits,
            rate: self.rate()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_wire_tag() {
        for tag in 0x0000u16..=0x0030 {
            let scheme = FecScheme::from_u16(tag).unwrap();
            assert_eq!(scheme.as_u16(), tag);
        }
    }

    #[test]
    fn last_and_beyond_are_invalid() {
        assert_eq!(FecScheme::from_u16(0x0031), Err(Error::InvalidScheme(0x0031)));
        assert_eq!(FecScheme::from_u16(0xFFFF), Err(Error::InvalidScheme(0xFFFF)));
    }

    #[test]
    fn block_schemes_have_sane_dimensions() {
        for tag in 0x0005u16..=0x002F {
            let scheme = FecScheme::from_u16(tag).unwrap();
            let info = scheme.block_info().expect("block scheme");
            assert!(info.k_bits > 0);
            assert!(info.n_bits >= info.k_bits);
            assert_eq!(info.n_bits % 8, 0);
            let rate = info.rate.as_f64();
            let observed = info.k_bits as f64 / info.n_bits as f64;
            assert!((rate - observed).abs() < 0.01, "{scheme:?}: {rate} vs {observed}");
        }
    }

    #[test]
    fn continuous_schemes_have_no_block_info() {
        assert!(FecScheme::CcsdsConvolutionalR1_2.block_info().is_none());
        assert!(FecScheme::NoFec.block_info().is_none());
    }
}
