#![warn(missing_docs)]
/*! UHF data-link MAC, FEC, and header subsystem for a spacecraft radio.

This crate implements a single MAC layer sitting between an application's
packets and a transparent-mode UHF radio: it fragments outgoing packets into
fixed-length MPDUs, applies forward error correction, and reassembles
incoming MPDU streams back into packets, tolerating lost or reordered
frames per [`mac::Status`].

# Architecture overview

```text
   [ application packet ]
            ↓
      [ Mac::encode_packet ]   fragment + FEC encode
            ↓
   [ 128-byte MPDU frames ]  →  radio  →  [ 128-byte MPDU frames ]
                                                  ↓
                                       [ Mac::process_frame ]  reassemble + FEC decode
                                                  ↓
                                       [ application packet ]
```

[`frame::Frame`] is the 128-byte MPDU: a 9-byte Golay-protected [`header::Header`]
followed by a 119-byte payload. [`fec`] holds the scheme registry and the
codecs ([`fec::no_fec::NoFec`], [`fec::convolutional::ConvolutionalHd`]).
[`golay`] and [`bitpack`] are the low-level coding primitives both of those
build on. [`config::MacConfig`] configures a [`mac::Mac`] instance, and
[`ffi`] exposes the same operations as an `extern "C"` surface for embedding
in a non-Rust radio stack.

# Examples

```
use rustradio_mac::config::{MacConfig, Modulation};
use rustradio_mac::fec::scheme::FecScheme;
use rustradio_mac::mac::{Mac, Status};

let tx = Mac::new(MacConfig::new(Modulation::Baud9600a, FecScheme::NoFec, 952)?)?;
let mut rx = Mac::new(MacConfig::new(Modulation::Baud9600a, FecScheme::NoFec, 952)?)?;

let packet = b"hello satellite";
let frames = tx.encode_packet(packet)?;

let mut received = None;
for frame in &frames {
    if rx.process_frame(frame) == Status::PacketReady {
        received = rx.take_packet();
    }
}
assert_eq!(received.as_deref(), Some(&packet[..]));
# Ok::<(), rustradio_mac::error::Error>(())
```
 */

pub mod bitpack;
pub mod config;
pub mod error;
pub mod fec;
pub mod ffi;
pub mod frame;
pub mod golay;
pub mod header;
pub mod mac;

pub use error::Error;
