//! Typed error enum for the MAC/FEC/header subsystem.

/// Errors that can be returned by fallible constructors and parse functions.
///
/// `Mac::process_frame` never returns one of these: recoverable receive-path
/// conditions collapse into [`crate::mac::Status::NeedMore`] instead, per the
/// per-frame contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The FEC scheme tag is not one of the known enumeration values.
    #[error("invalid FEC scheme: {0:#06x}")]
    InvalidScheme(u16),

    /// The FEC scheme has no defined coding rate.
    #[error("no coding rate defined for scheme {0:?}")]
    NoRateForScheme(crate::fec::scheme::FecScheme),

    /// A codec was requested for a scheme whose encoder/decoder is not implemented.
    #[error("codec not implemented for scheme {0:?}")]
    UnimplementedCodec(crate::fec::scheme::FecScheme),

    /// FEC encode failed for an implemented codec.
    #[error("FEC encode failed for scheme {0:?}")]
    FecEncodeFailed(crate::fec::scheme::FecScheme),

    /// A raw frame was not exactly 128 bytes.
    #[error("bad frame length: expected {expected}, got {actual}")]
    BadFrameLength {
        /// The required frame length.
        expected: usize,
        /// The length actually observed.
        actual: usize,
    },

    /// A header failed to decode: an uncorrectable Golay codeword, or the
    /// parsed FEC scheme was not a known tag.
    #[error("bad header: {0}")]
    BadHeader(&'static str),

    /// A frame's payload would not fit in the 119-byte payload region.
    #[error("frame payload overflow: {0} bytes exceeds 119")]
    FrameOverflow(usize),

    /// The packet's serialized length exceeds the 12-bit length field's range (4095).
    #[error("packet too large: {0} bytes exceeds 4095")]
    PacketTooLarge(usize),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
