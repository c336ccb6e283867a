//! The MAC: packet fragmentation/FEC encoding on transmit, reassembly on
//! receive.

use crate::config::MacConfig;
use crate::error::{Error, Result};
use crate::fec::{self, FecCodec};
use crate::frame::{self, Frame, MAX_MTU};
use crate::header::Header;

/// Fixed framing prefix the MAC prepends on transmit and strips on receive:
/// 4 bytes of padding, a little-endian `u16` data length, and a
/// little-endian `u32` routing id. The routing id has no producer in this
/// core (it is reserved for an outer layer); this implementation always
/// writes zero and ignores it on receive.
pub const HEADER_PREFIX: usize = 10;

/// Outcome of feeding one frame to [`Mac::process_frame`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// A full packet was reassembled; call [`Mac::take_packet`] to retrieve it.
    PacketReady,
    /// Reserved for wire/API compatibility; never constructed by this core.
    PacketReadyAndResubmitPrevious,
    /// Not enough frames yet; no action needed from the caller.
    NeedMore,
}

struct ReceiveState {
    first_fragment_seen: bool,
    expected_frames: usize,
    frames_received: usize,
    current_packet_length: usize,
    codeword_accumulator: Vec<u8>,
    declared_fec_scheme: Option<crate::fec::scheme::FecScheme>,
}

impl ReceiveState {
    fn new() -> Self {
        ReceiveState {
            first_fragment_seen: false,
            expected_frames: 0,
            frames_received: 0,
            current_packet_length: 0,
            codeword_accumulator: Vec::new(),
            declared_fec_scheme: None,
        }
    }

    fn reset(&mut self) {
        *self = ReceiveState::new();
    }
}

/// The MAC: fragmentation, reassembly, and FEC coordination for one
/// modulation/scheme pair at a time.
pub struct Mac {
    config: MacConfig,
    codec: Box<dyn FecCodec>,
    rx: ReceiveState,
    last_packet: Option<Vec<u8>>,
}

impl Mac {
    /// Build a MAC for `config`, constructing its codec up front.
    pub fn new(config: MacConfig) -> Result<Mac> {
        let codec = fec::codec_for(config.fec_scheme, config.max_continuous_cw_len_bits)?;
        Ok(Mac {
            config,
            codec,
            rx: ReceiveState::new(),
            last_packet: None,
        })
    }

    /// Current configuration.
    pub fn config(&self) -> MacConfig {
        self.config
    }

    /// Replace the FEC scheme. Discards any in-progress receive assembly.
    pub fn set_fec_scheme(&mut self, scheme: crate::fec::scheme::FecScheme) -> Result<()> {
        let codec = fec::codec_for(scheme, self.config.max_continuous_cw_len_bits)?;
        self.codec = codec;
        self.config.fec_scheme = scheme;
        self.rx.reset();
        Ok(())
    }

    /// Replace the radio modulation. Does not affect receive assembly.
    pub fn set_modulation(&mut self, modulation: crate::config::Modulation) {
        self.config.modulation = modulation;
    }

    /// Encode `packet` into a sequence of 128-byte frames ready for
    /// transmission, per the transmit procedure.
    pub fn encode_packet(&self, packet: &[u8]) -> Result<Vec<[u8; frame::FRAME_LEN]>> {
        let data_length = packet.len();
        if data_length > 0x0FFF {
            return Err(Error::PacketTooLarge(data_length));
        }
        let mut stream = Vec::with_capacity(HEADER_PREFIX + packet.len());
        stream.extend_from_slice(&[0u8; 4]);
        stream.extend_from_slice(&(data_length as u16).to_le_bytes());
        stream.extend_from_slice(&0u32.to_le_bytes());
        stream.extend_from_slice(packet);

        let k_bytes = self.codec.k_bytes();
        let n_bytes = self.codec.n_bytes();

        let mut codewords = Vec::new();
        for message in stream.chunks(k_bytes) {
            let mut msg = message.to_vec();
            msg.resize(k_bytes, 0);
            let cw = self
                .codec
                .encode(&msg)
                .map_err(|_| Error::FecEncodeFailed(self.config.fec_scheme))?;
            codewords.extend_from_slice(&cw);
        }
        debug_assert_eq!(codewords.len() % n_bytes, 0);

        let mut frames = Vec::new();
        for (i, chunk) in codewords.chunks(MAX_MTU).enumerate() {
            let header = Header {
                modulation: self.config.modulation as u8,
                fec_scheme: self.config.fec_scheme,
                codeword_fragment_index: i as u8,
                user_packet_payload_length: data_length as u16,
                user_packet_fragment_index: 0,
            };
            let frame = Frame::new(header, chunk)?;
            frames.push(frame.to_bytes());
        }
        log::debug!(
            "encode_packet: {} bytes -> {} frames, scheme={:?}",
            packet.len(),
            frames.len(),
            self.config.fec_scheme
        );
        Ok(frames)
    }

    /// Feed one received 128-byte frame into the reassembly state machine.
    pub fn process_frame(&mut self, raw: &[u8]) -> Status {
        let parsed = Frame::parse(raw);

        let parsed = match parsed {
            Ok(f) => f,
            Err(_) => {
                if self.rx.first_fragment_seen
                    && self.rx.frames_received + 1 == self.rx.expected_frames
                {
                    log::warn!("process_frame: final frame lost, padding and finalizing");
                    self.rx
                        .codeword_accumulator
                        .extend(std::iter::repeat_n(0u8, MAX_MTU));
                    self.rx.frames_received += 1;
                    return self.maybe_finalize();
                }
                return Status::NeedMore;
            }
        };

        let header = parsed.header;

        if !self.rx.first_fragment_seen {
            if header.codeword_fragment_index != 0 {
                return Status::NeedMore;
            }
            if header.fec_scheme != self.config.fec_scheme {
                return Status::NeedMore;
            }
            self.rx.current_packet_length =
                header.user_packet_payload_length as usize + HEADER_PREFIX;
            self.rx.declared_fec_scheme = Some(header.fec_scheme);
            self.rx.expected_frames = frame::num_frames_for(
                self.rx.current_packet_length,
                self.codec.k_bytes(),
                self.codec.n_bytes(),
            );
            self.rx.frames_received = 1;
            self.rx.codeword_accumulator.extend_from_slice(&parsed.payload);
            self.rx.first_fragment_seen = true;
            log::debug!(
                "process_frame: first fragment, packet_len={}, expected_frames={}",
                self.rx.current_packet_length,
                self.rx.expected_frames
            );
            return self.maybe_finalize();
        }

        let idx = header.codeword_fragment_index as usize;
        if idx == self.rx.frames_received {
            self.rx.codeword_accumulator.extend_from_slice(&parsed.payload);
            self.rx.frames_received += 1;
        } else if idx > self.rx.frames_received {
            let gap = idx - self.rx.frames_received;
            log::warn!("process_frame: gap of {gap} frame(s), zero-padding");
            for _ in 0..gap {
                self.rx
                    .codeword_accumulator
                    .extend(std::iter::repeat_n(0u8, MAX_MTU));
            }
            self.rx.codeword_accumulator.extend_from_slice(&parsed.payload);
            self.rx.frames_received = idx + 1;
        } else {
            log::warn!("process_frame: fragment index {idx} already seen, treating as lost frame");
            return Status::NeedMore;
        }

        self.maybe_finalize()
    }

    fn maybe_finalize(&mut self) -> Status {
        if self.rx.frames_received < self.rx.expected_frames {
            return Status::NeedMore;
        }
        let n_bytes = self.codec.n_bytes();
        let target = self.rx.current_packet_length;

        let mut accumulator = std::mem::take(&mut self.rx.codeword_accumulator);
        let padded_len = accumulator.len().next_multiple_of(n_bytes);
        accumulator.resize(padded_len, 0);

        let mut message = Vec::with_capacity(padded_len);
        for codeword in accumulator.chunks(n_bytes) {
            let (decoded, _errs) = self.codec.decode(codeword);
            message.extend_from_slice(&decoded);
        }
        message.resize(target, 0);
        log::debug!("process_frame: finalize, packet_len={target}");
        let prefix_len = HEADER_PREFIX.min(message.len());
        self.last_packet = Some(message[prefix_len..].to_vec());
        self.rx.reset();
        Status::PacketReady
    }

    /// Take the most recently reassembled packet, if any.
    pub fn take_packet(&mut self) -> Option<Vec<u8>> {
        self.last_packet.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Modulation;
    use crate::fec::scheme::FecScheme;

    fn mac(scheme: FecScheme) -> Mac {
        Mac::new(MacConfig::new(Modulation::Baud9600a, scheme, 952).unwrap()).unwrap()
    }

    fn round_trip(packet: &[u8], scheme: FecScheme) -> (usize, Vec<u8>) {
        let tx = mac(scheme);
        let frames = tx.encode_packet(packet).unwrap();
        let mut rx = mac(scheme);
        let mut out = None;
        for f in &frames {
            if rx.process_frame(f) == Status::PacketReady {
                out = rx.take_packet();
            }
        }
        (frames.len(), out.expect("packet ready"))
    }

    #[test]
    fn seed_1_small_no_fec_packet() {
        let packet: Vec<u8> = (0x30u8..0x3A).collect();
        let (frames, decoded) = round_trip(&packet, FecScheme::NoFec);
        assert_eq!(frames, 1);
        assert_eq!(decoded, packet);
    }

    #[test]
    fn seed_2_358_bytes_no_fec() {
        let packet: Vec<u8> = (0..358u32).map(|i| ((i % 79) as u8) + 0x30).collect();
        let (frames, decoded) = round_trip(&packet, FecScheme::NoFec);
        assert_eq!(frames, 4);
        assert_eq!(decoded, packet);
    }

    #[test]
    fn seed_3_358_bytes_convolutional() {
        let packet: Vec<u8> = (0..358u32).map(|i| ((i % 79) as u8) + 0x30).collect();
        let (frames, decoded) = round_trip(&packet, FecScheme::CcsdsConvolutionalR1_2);
        assert_eq!(frames, 7);
        assert_eq!(decoded, packet);
    }

    #[test]
    fn round_trip_over_sampled_lengths_and_schemes() {
        for &len in &[0usize, 10, 103, 358, 4095] {
            for &scheme in &[FecScheme::NoFec, FecScheme::CcsdsConvolutionalR1_2] {
                let packet: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
                let (_frames, decoded) = round_trip(&packet, scheme);
                assert_eq!(decoded, packet, "len={len} scheme={scheme:?}");
            }
        }
    }

    #[test]
    fn dropping_non_first_frame_still_finalizes() {
        let packet: Vec<u8> = (0..358u32).map(|i| ((i % 79) as u8) + 0x30).collect();
        let tx = mac(FecScheme::NoFec);
        let frames = tx.encode_packet(&packet).unwrap();
        assert!(frames.len() > 1);
        let mut rx = mac(FecScheme::NoFec);
        let mut status = Status::NeedMore;
        for (i, f) in frames.iter().enumerate() {
            if i == frames.len() - 2 {
                continue;
            }
            status = rx.process_frame(f);
        }
        assert_eq!(status, Status::PacketReady);
        let decoded = rx.take_packet().unwrap();
        assert_eq!(decoded.len(), packet.len());
    }

    #[test]
    fn dropping_first_frame_never_finalizes() {
        let packet: Vec<u8> = (0..358u32).map(|i| ((i % 79) as u8) + 0x30).collect();
        let tx = mac(FecScheme::NoFec);
        let frames = tx.encode_packet(&packet).unwrap();
        let mut rx = mac(FecScheme::NoFec);
        let mut saw_ready = false;
        for f in frames.iter().skip(1) {
            if rx.process_frame(f) == Status::PacketReady {
                saw_ready = true;
            }
        }
        assert!(!saw_ready);
    }

    #[test]
    fn reordering_drops_the_out_of_order_fragment() {
        let packet: Vec<u8> = (0..358u32).map(|i| ((i % 79) as u8) + 0x30).collect();
        let tx = mac(FecScheme::NoFec);
        let mut frames = tx.encode_packet(&packet).unwrap();
        assert_eq!(frames.len(), 4);
        frames.swap(1, 2);
        let mut rx = mac(FecScheme::NoFec);
        let mut status = Status::NeedMore;
        for f in &frames {
            status = rx.process_frame(f);
        }
        // Fragment index 2 arrives before index 1, opening a gap that is
        // zero-padded; when index 1 then arrives it is behind the assembly
        // point and is dropped rather than resetting the whole packet.
        assert_eq!(status, Status::PacketReady);
        let decoded = rx.take_packet().unwrap();
        assert_eq!(decoded.len(), packet.len());
        let lost_start = MAX_MTU - HEADER_PREFIX;
        let lost_end = 2 * MAX_MTU - HEADER_PREFIX;
        assert_eq!(&decoded[..lost_start], &packet[..lost_start]);
        assert!(decoded[lost_start..lost_end].iter().all(|&b| b == 0));
        assert_eq!(&decoded[lost_end..], &packet[lost_end..]);
    }

    #[test]
    fn seed_6_frame_replaced_by_zeros() {
        let packet: Vec<u8> = (0..358u32).map(|i| ((i % 79) as u8) + 0x30).collect();
        let tx = mac(FecScheme::NoFec);
        let mut frames = tx.encode_packet(&packet).unwrap();
        assert_eq!(frames.len(), 4);
        frames[2] = [0u8; frame::FRAME_LEN];
        let mut rx = mac(FecScheme::NoFec);
        let mut status = Status::NeedMore;
        for f in &frames {
            status = rx.process_frame(f);
        }
        assert_eq!(status, Status::PacketReady);
        let decoded = rx.take_packet().unwrap();
        assert_eq!(decoded.len(), packet.len());
        assert_eq!(&decoded[..2 * MAX_MTU - HEADER_PREFIX], &packet[..2 * MAX_MTU - HEADER_PREFIX]);
    }
}
