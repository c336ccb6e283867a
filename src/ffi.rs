//! C wrapper surface for embedding this MAC core in a non-Rust radio stack.
//!
//! One opaque handle per `Mac` instance, created with [`mac_create`] and
//! freed with [`mac_destroy`]. Every other function takes that handle as
//! its first argument and never panics: a null or otherwise bad handle
//! yields the documented sentinel return value instead.

use libc::{c_uchar, c_uint, c_ushort};

use crate::config::{MacConfig, Modulation};
use crate::fec::scheme::FecScheme;
use crate::frame::FRAME_LEN;
use crate::mac::{Mac, Status};

/// Sentinel returned by [`get_error_correction_scheme`] when `m` is bad.
pub const ERROR_CORRECTION_SCHEME_BAD_WRAPPER_CONTEXT: c_ushort = 0xFFFF;

/// Sentinel returned by [`get_rf_mode_number`] when `m` is bad.
pub const RF_MODE_BAD_WRAPPER_CONTEXT: c_uchar = 0xFF;

/// Outcome of [`process_packet`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketProcessingStatus {
    /// A full packet is ready; retrieve it with [`get_raw_packet_buffer`].
    PacketReady = 0,
    /// Reserved for wire compatibility; never returned by this core.
    PacketReadyResubmitPreviousPacket = 1,
    /// Not enough frames yet.
    ReadyForNextPacket = 2,
    /// `m` was null.
    BadWrapperContext = 100,
}

impl From<Status> for PacketProcessingStatus {
    fn from(s: Status) -> Self {
        match s {
            Status::PacketReady => PacketProcessingStatus::PacketReady,
            Status::PacketReadyAndResubmitPrevious => {
                PacketProcessingStatus::PacketReadyResubmitPreviousPacket
            }
            Status::NeedMore => PacketProcessingStatus::ReadyForNextPacket,
        }
    }
}

/// Opaque MAC handle, boxed and leaked across the FFI boundary.
pub struct mac_t {
    mac: Mac,
    raw_packet: Option<Vec<u8>>,
    mpdu_payloads: Vec<u8>,
}

/// Construct a MAC for `rf_mode_number`/`fec_scheme`. Returns null if
/// `fec_scheme` is not a known tag or has no defined coding rate.
///
/// # Safety
/// The returned pointer, if non-null, must eventually be passed to exactly
/// one call of [`mac_destroy`] and to no other allocator.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn mac_create(rf_mode_number: c_uchar, fec_scheme: c_ushort) -> *mut mac_t {
    let Some(modulation) = Modulation::from_u8(rf_mode_number) else {
        return std::ptr::null_mut();
    };
    let Ok(scheme) = FecScheme::from_u16(fec_scheme) else {
        return std::ptr::null_mut();
    };
    let Ok(config) = MacConfig::new(modulation, scheme, crate::fec::DEFAULT_MAX_CONTINUOUS_CW_LEN_BITS)
    else {
        return std::ptr::null_mut();
    };
    let Ok(mac) = Mac::new(config) else {
        return std::ptr::null_mut();
    };
    Box::into_raw(Box::new(mac_t {
        mac,
        raw_packet: None,
        mpdu_payloads: Vec::new(),
    }))
}

/// Destroy a handle created by [`mac_create`]. `m` may be null (no-op).
///
/// # Safety
/// `m` must be either null or a pointer previously returned by
/// [`mac_create`] and not yet destroyed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn mac_destroy(m: *mut mac_t) {
    if m.is_null() {
        return;
    }
    // SAFETY: caller guarantees `m` came from `mac_create` and is still live.
    drop(unsafe { Box::from_raw(m) });
}

/// Current FEC scheme, or [`ERROR_CORRECTION_SCHEME_BAD_WRAPPER_CONTEXT`] if
/// `m` is null.
///
/// # Safety
/// `m` must be either null or a live handle from [`mac_create`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn get_error_correction_scheme(m: *const mac_t) -> c_ushort {
    // SAFETY: caller guarantees `m` is null or a live handle.
    match unsafe { m.as_ref() } {
        Some(h) => h.mac.config().fec_scheme.as_u16(),
        None => ERROR_CORRECTION_SCHEME_BAD_WRAPPER_CONTEXT,
    }
}

/// Replace the FEC scheme. Returns `false` if `m` is null or `fec_scheme`
/// is not a known, codec-constructible tag.
///
/// # Safety
/// `m` must be either null or a live handle from [`mac_create`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn set_error_correction_scheme(
    m: *mut mac_t,
    fec_scheme: c_ushort,
) -> bool {
    // SAFETY: caller guarantees `m` is null or a live handle.
    let Some(h) = (unsafe { m.as_mut() }) else {
        return false;
    };
    let Ok(scheme) = FecScheme::from_u16(fec_scheme) else {
        return false;
    };
    h.mac.set_fec_scheme(scheme).is_ok()
}

/// Current RF mode, or [`RF_MODE_BAD_WRAPPER_CONTEXT`] if `m` is null.
///
/// # Safety
/// `m` must be either null or a live handle from [`mac_create`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn get_rf_mode_number(m: *const mac_t) -> c_uchar {
    // SAFETY: caller guarantees `m` is null or a live handle.
    match unsafe { m.as_ref() } {
        Some(h) => h.mac.config().modulation as c_uchar,
        None => RF_MODE_BAD_WRAPPER_CONTEXT,
    }
}

/// Replace the RF mode. Returns `false` if `m` is null or `rf_mode_number`
/// is out of the 3-bit range.
///
/// # Safety
/// `m` must be either null or a live handle from [`mac_create`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn set_rf_mode_number(m: *mut mac_t, rf_mode_number: c_uchar) -> bool {
    // SAFETY: caller guarantees `m` is null or a live handle.
    let Some(h) = (unsafe { m.as_mut() }) else {
        return false;
    };
    let Some(modulation) = Modulation::from_u8(rf_mode_number) else {
        return false;
    };
    h.mac.set_modulation(modulation);
    true
}

/// Feed one received MPDU to the reassembly state machine.
///
/// # Safety
/// `m` must be either null or a live handle from [`mac_create`]. `payload`
/// must point to at least `payload_length` readable bytes, or be null if
/// `payload_length` is 0.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn process_packet(
    m: *mut mac_t,
    payload: *const c_uchar,
    payload_length: c_uint,
) -> PacketProcessingStatus {
    // SAFETY: caller guarantees `m` is null or a live handle.
    let Some(h) = (unsafe { m.as_mut() }) else {
        return PacketProcessingStatus::BadWrapperContext;
    };
    // SAFETY: caller guarantees `payload` is valid for `payload_length` bytes.
    let bytes = unsafe { std::slice::from_raw_parts(payload, payload_length as usize) };
    let status = h.mac.process_frame(bytes);
    if status == Status::PacketReady {
        h.raw_packet = h.mac.take_packet();
    }
    status.into()
}

/// Pointer to the most recently reassembled packet's bytes, or null if
/// `m` is bad or no packet is ready.
///
/// # Safety
/// `m` must be either null or a live handle from [`mac_create`]. The
/// returned pointer is valid only until the next call on `m`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn get_raw_packet_buffer(m: *mut mac_t) -> *const c_uchar {
    // SAFETY: caller guarantees `m` is null or a live handle.
    match unsafe { m.as_ref() } {
        Some(h) => h
            .raw_packet
            .as_ref()
            .map_or(std::ptr::null(), |p| p.as_ptr()),
        None => std::ptr::null(),
    }
}

/// Length in bytes of the buffer returned by [`get_raw_packet_buffer`], or
/// `-1` if `m` is bad or no packet is ready.
///
/// # Safety
/// `m` must be either null or a live handle from [`mac_create`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn get_raw_packet_length(m: *const mac_t) -> i32 {
    // SAFETY: caller guarantees `m` is null or a live handle.
    match unsafe { m.as_ref() } {
        Some(h) => h.raw_packet.as_ref().map_or(-1, |p| p.len() as i32),
        None => -1,
    }
}

/// Fragment and FEC-encode `packet` for transmission. On success, the
/// resulting MPDUs are concatenated into the buffer returned by
/// [`mpdu_payloads_buffer`]. Returns `false` if `m` is null or the packet
/// is too large to encode.
///
/// # Safety
/// `m` must be either null or a live handle from [`mac_create`]. `packet`
/// must point to at least `len` readable bytes, or be null if `len` is 0.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn prepare_packet_for_tx(
    m: *mut mac_t,
    packet: *const c_uchar,
    len: c_ushort,
) -> bool {
    // SAFETY: caller guarantees `m` is null or a live handle.
    let Some(h) = (unsafe { m.as_mut() }) else {
        return false;
    };
    // SAFETY: caller guarantees `packet` is valid for `len` bytes.
    let bytes = unsafe { std::slice::from_raw_parts(packet, len as usize) };
    let Ok(frames) = h.mac.encode_packet(bytes) else {
        return false;
    };
    h.mpdu_payloads.clear();
    for f in &frames {
        h.mpdu_payloads.extend_from_slice(f);
    }
    true
}

/// Pointer to the MPDU payloads buffer filled by [`prepare_packet_for_tx`],
/// or null if `m` is bad.
///
/// # Safety
/// `m` must be either null or a live handle from [`mac_create`]. The
/// returned pointer is valid only until the next call on `m`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn mpdu_payloads_buffer(m: *const mac_t) -> *const c_uchar {
    // SAFETY: caller guarantees `m` is null or a live handle.
    match unsafe { m.as_ref() } {
        Some(h) => h.mpdu_payloads.as_ptr(),
        None => std::ptr::null(),
    }
}

/// Length in bytes of the buffer returned by [`mpdu_payloads_buffer`]; an
/// integer multiple of [`raw_mpdu_length`]. Returns `-1` if `m` is null.
///
/// # Safety
/// `m` must be either null or a live handle from [`mac_create`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn mpdu_payloads_buffer_length(m: *const mac_t) -> i32 {
    // SAFETY: caller guarantees `m` is null or a live handle.
    match unsafe { m.as_ref() } {
        Some(h) => h.mpdu_payloads.len() as i32,
        None => -1,
    }
}

/// The fixed raw MPDU length in bytes, for every scheme.
#[unsafe(no_mangle)]
pub extern "C" fn raw_mpdu_length() -> c_uint {
    FRAME_LEN as c_uint
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_destroy_round_trip() {
        let m = unsafe { mac_create(3, FecScheme::NoFec.as_u16()) };
        assert!(!m.is_null());
        assert_eq!(unsafe { get_error_correction_scheme(m) }, FecScheme::NoFec.as_u16());
        assert_eq!(unsafe { get_rf_mode_number(m) }, 3);
        unsafe { mac_destroy(m) };
    }

    #[test]
    fn create_rejects_unimplemented_scheme() {
        let m = unsafe { mac_create(0, FecScheme::CcsdsTurbo1784R1_2.as_u16()) };
        assert!(m.is_null());
    }

    #[test]
    fn null_handle_is_safe_everywhere() {
        let m: *mut mac_t = std::ptr::null_mut();
        assert_eq!(
            unsafe { get_error_correction_scheme(m) },
            ERROR_CORRECTION_SCHEME_BAD_WRAPPER_CONTEXT
        );
        assert_eq!(unsafe { get_rf_mode_number(m) }, RF_MODE_BAD_WRAPPER_CONTEXT);
        assert!(!unsafe { set_error_correction_scheme(m, 0) });
        assert!(!unsafe { set_rf_mode_number(m, 0) });
        assert_eq!(
            unsafe { process_packet(m, std::ptr::null(), 0) },
            PacketProcessingStatus::BadWrapperContext
        );
        assert!(unsafe { get_raw_packet_buffer(m) }.is_null());
        assert_eq!(unsafe { get_raw_packet_length(m) }, -1);
        assert!(!unsafe { prepare_packet_for_tx(m, std::ptr::null(), 0) });
        assert!(unsafe { mpdu_payloads_buffer(m) }.is_null());
        assert_eq!(unsafe { mpdu_payloads_buffer_length(m) }, -1);
    }

    #[test]
    fn tx_then_rx_round_trip_through_ffi() {
        let tx = unsafe { mac_create(3, FecScheme::NoFec.as_u16()) };
        let rx = unsafe { mac_create(3, FecScheme::NoFec.as_u16()) };
        let packet = b"hello satellite";
        assert!(unsafe { prepare_packet_for_tx(tx, packet.as_ptr(), packet.len() as c_ushort) });
        let buf = unsafe { mpdu_payloads_buffer(tx) };
        let buf_len = unsafe { mpdu_payloads_buffer_length(tx) } as usize;
        assert_eq!(buf_len % FRAME_LEN, 0);

        let mut status = PacketProcessingStatus::ReadyForNextPacket;
        for frame in unsafe { std::slice::from_raw_parts(buf, buf_len) }.chunks(FRAME_LEN) {
            status = unsafe { process_packet(rx, frame.as_ptr(), frame.len() as c_uint) };
        }
        assert_eq!(status, PacketProcessingStatus::PacketReady);
        let len = unsafe { get_raw_packet_length(rx) } as usize;
        let ptr = unsafe { get_raw_packet_buffer(rx) };
        let decoded = unsafe { std::slice::from_raw_parts(ptr, len) };
        assert_eq!(decoded, packet);

        unsafe {
            mac_destroy(tx);
            mac_destroy(rx);
        }
    }
}
