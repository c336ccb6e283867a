//! Runtime configuration for a [`crate::mac::Mac`] instance.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fec::{self, DEFAULT_MAX_CONTINUOUS_CW_LEN_BITS};
use crate::fec::scheme::FecScheme;

/// UHF radio modulation, indexing the fixed baud-rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Modulation {
    Baud1200 = 0,
    Baud2400 = 1,
    Baud4800 = 2,
    Baud9600a = 3,
    Baud9600b = 4,
    Baud19200a = 5,
    Baud19200b = 6,
    Baud19200c = 7,
}

/// Baud rate for each [`Modulation`] value, indexed 0..7.
pub const BAUD_TABLE: [u32; 8] = [1200, 2400, 4800, 9600, 9600, 19200, 19200, 19200];

impl Modulation {
    /// Parse a raw 3-bit modulation id.
    pub fn from_u8(v: u8) -> Option<Modulation> {
        use Modulation::*;
        Some(match v {
            0 => Baud1200,
            1 => Baud2400,
            2 => Baud4800,
            3 => Baud9600a,
            4 => Baud9600b,
            5 => Baud19200a,
            6 => Baud19200b,
            7 => Baud19200c,
            _ => return None,
        })
    }

    /// This modulation's baud rate.
    pub fn baud(self) -> u32 {
        BAUD_TABLE[self as usize]
    }
}

/// Plain, serializable configuration for a `Mac` instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacConfig {
    /// Radio modulation.
    pub modulation: Modulation,
    /// FEC scheme in effect for both transmit and expected receive.
    pub fec_scheme: FecScheme,
    /// Maximum continuous codeword length in bits, sizing `NO_FEC` and the
    /// convolutional schemes. Block schemes ignore this.
    pub max_continuous_cw_len_bits: u32,
}

impl MacConfig {
    /// Validate `fec_scheme` against the registry and build a config.
    pub fn new(
        modulation: Modulation,
        fec_scheme: FecScheme,
        max_continuous_cw_len_bits: u32,
    ) -> Result<MacConfig> {
        fec::scheme_info(fec_scheme, max_continuous_cw_len_bits)?;
        Ok(MacConfig {
            modulation,
            fec_scheme,
            max_continuous_cw_len_bits,
        })
    }
}

impl Default for MacConfig {
    fn default() -> Self {
        MacConfig {
            modulation: Modulation::Baud1200,
            fec_scheme: FecScheme::NoFec,
            max_continuous_cw_len_bits: DEFAULT_MAX_CONTINUOUS_CW_LEN_BITS,
        }
    }
}
