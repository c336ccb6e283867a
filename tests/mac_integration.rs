//! End-to-end MAC tests through the public API only.

use rustradio_mac::config::{MacConfig, Modulation};
use rustradio_mac::fec::scheme::FecScheme;
use rustradio_mac::mac::{Mac, Status};

fn round_trip(packet: &[u8], scheme: FecScheme) -> Vec<u8> {
    let config = MacConfig::new(Modulation::Baud9600a, scheme, 952).unwrap();
    let tx = Mac::new(config).unwrap();
    let mut rx = Mac::new(config).unwrap();

    let frames = tx.encode_packet(packet).unwrap();
    let mut out = None;
    for frame in &frames {
        if rx.process_frame(frame) == Status::PacketReady {
            out = rx.take_packet();
        }
    }
    out.expect("packet ready")
}

#[test]
fn no_fec_round_trip() {
    let packet = b"CQ CQ DE satellite";
    assert_eq!(round_trip(packet, FecScheme::NoFec), packet);
}

#[test]
fn convolutional_round_trip_multi_frame() {
    let packet: Vec<u8> = (0..500u32).map(|i| (i % 251) as u8).collect();
    assert_eq!(
        round_trip(&packet, FecScheme::CcsdsConvolutionalR1_2),
        packet
    );
}

#[test]
fn config_loads_from_json_like_an_uplinked_command() {
    let json = r#"{"modulation":"Baud19200a","fec_scheme":48,"max_continuous_cw_len_bits":952}"#;
    let config: MacConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.modulation, Modulation::Baud19200a);
    assert_eq!(config.fec_scheme, FecScheme::NoFec);
    Mac::new(config).unwrap();
}

#[test]
fn empty_packet_round_trips() {
    assert_eq!(round_trip(&[], FecScheme::NoFec), Vec::<u8>::new());
}
