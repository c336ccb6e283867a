//! The 128-byte MPDU: header plus payload, as transmitted over the radio in
//! transparent mode.

use crate::error::{Error, Result};
use crate::header::{HEADER_LEN, Header};

/// Total frame length on the wire.
pub const FRAME_LEN: usize = 128;

/// Payload region size: `FRAME_LEN - HEADER_LEN`.
pub const MAX_MTU: usize = FRAME_LEN - HEADER_LEN;

/// One 128-byte radio frame: a decoded header plus its 119-byte payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The frame's header.
    pub header: Header,
    /// The payload region, always exactly [`MAX_MTU`] bytes.
    pub payload: [u8; MAX_MTU],
}

impl Frame {
    /// Build a frame from a header and payload bytes, zero-padding a short
    /// payload. `FrameOverflow` if `payload` exceeds [`MAX_MTU`] bytes.
    pub fn new(header: Header, payload: &[u8]) -> Result<Frame> {
        if payload.len() > MAX_MTU {
            return Err(Error::FrameOverflow(payload.len()));
        }
        let mut buf = [0u8; MAX_MTU];
        buf[..payload.len()].copy_from_slice(payload);
        Ok(Frame {
            header,
            payload: buf,
        })
    }

    /// Parse a raw 128-byte frame off the wire.
    pub fn parse(bytes: &[u8]) -> Result<Frame> {
        if bytes.len() != FRAME_LEN {
            return Err(Error::BadFrameLength {
                expected: FRAME_LEN,
                actual: bytes.len(),
            });
        }
        let header = Header::decode(&bytes[..HEADER_LEN])?;
        let mut payload = [0u8; MAX_MTU];
        payload.copy_from_slice(&bytes[HEADER_LEN..]);
        Ok(Frame { header, payload })
    }

    /// Serialize back into the 128-byte wire representation.
    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        let mut out = [0u8; FRAME_LEN];
        out[..HEADER_LEN].copy_from_slice(&self.header.encode());
        out[HEADER_LEN..].copy_from_slice(&self.payload);
        out
    }
}

/// Number of frames needed to carry a packet of `packet_len_bytes` bytes
/// (inclusive of the MAC's framing prefix) under `scheme`, given the
/// scheme's `(n, k)` sizing.
pub fn num_frames_for(packet_len_bytes: usize, k_bytes: usize, n_bytes: usize) -> usize {
    if packet_len_bytes == 0 {
        return 1;
    }
    let num_codewords = packet_len_bytes.div_ceil(k_bytes);
    let frames_per_codeword = n_bytes.div_ceil(MAX_MTU);
    num_codewords * frames_per_codeword
}
