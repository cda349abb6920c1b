//! Control payload builders.
//!
//! Control payloads carry the shared clock and timeline reference (and
//! one-shot events) to the controller. They flow through the same chunker
//! and corridor as instruction streams.

use std::time::{SystemTime, UNIX_EPOCH};

use bytes::{BufMut, Bytes, BytesMut};

use crate::flags::{FLAG_EMIT_EVENT, FLAG_SET_TIMELINE};

/// Wall-clock milliseconds reduced modulo 2^31 so the value fits the 4-byte
/// signed-safe wire field. Recomputed fresh for every synchronization send;
/// never cache one across messages.
pub fn clock_timestamp(now: SystemTime) -> u32 {
    let millis = now
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    (millis % 0x7fff_ffff) as u32
}

/// Pack the timeline bitfield: 4-bit timeline index in the low nibble,
/// paused flag in bit 4.
pub fn timeline_flags(index: u8, paused: bool) -> u8 {
    (index & 0x0f) | ((paused as u8) << 4)
}

/// Build a timeline reference payload.
///
/// Layout: `[SET_TIMELINE][clock:4 LE][elapsed:4 LE][bitfield:1]`.
pub fn set_timeline(clock: u32, elapsed_ms: u32, index: u8, paused: bool) -> Bytes {
    let mut buf = BytesMut::with_capacity(10);
    buf.put_u8(FLAG_SET_TIMELINE);
    buf.put_u32_le(clock);
    buf.put_u32_le(elapsed_ms);
    buf.put_u8(timeline_flags(index, paused));
    buf.freeze()
}

/// Build an event payload.
///
/// Layout: `[EMIT_EVENT][device:1][code:1][param:1][timeline:4 LE]`.
pub fn emit_event(device_id: u8, code: u8, parameter: u8, timeline_ms: u32) -> Bytes {
    let mut buf = BytesMut::with_capacity(8);
    buf.put_u8(FLAG_EMIT_EVENT);
    buf.put_u8(device_id);
    buf.put_u8(code);
    buf.put_u8(parameter);
    buf.put_u32_le(timeline_ms);
    buf.freeze()
}

/// Raw clock reference written to the clock-sync channel: 4 bytes LE,
/// no flag byte.
pub fn clock_sync(clock: u32) -> Bytes {
    let mut buf = BytesMut::with_capacity(4);
    buf.put_u32_le(clock);
    buf.freeze()
}

/// Single-byte probe confirming the clock reference landed; the controller
/// treats a zero on the clock-sync channel as the end of clock sync.
pub fn clock_sync_ack() -> Bytes {
    Bytes::from_static(&[0])
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn clock_timestamp_wraps_at_2_pow_31() {
        let just_past_wrap = UNIX_EPOCH + Duration::from_millis(0x7fff_ffff + 5);
        assert_eq!(clock_timestamp(just_past_wrap), 5);

        let early = UNIX_EPOCH + Duration::from_millis(123_456);
        assert_eq!(clock_timestamp(early), 123_456);
    }

    #[test]
    fn timeline_flags_packing() {
        assert_eq!(timeline_flags(0, false), 0b0000_0000);
        assert_eq!(timeline_flags(0, true), 0b0001_0000);
        assert_eq!(timeline_flags(3, true), 0b0001_0011);
        // Index is truncated to the low nibble.
        assert_eq!(timeline_flags(0xff, false), 0b0000_1111);
    }

    #[test]
    fn set_timeline_layout() {
        let payload = set_timeline(0x0201, 0x0403, 1, true);
        assert_eq!(
            payload.as_ref(),
            &[FLAG_SET_TIMELINE, 0x01, 0x02, 0, 0, 0x03, 0x04, 0, 0, 0b0001_0001]
        );
        assert_eq!(payload.len(), 10);
    }

    #[test]
    fn emit_event_layout() {
        let payload = emit_event(255, 7, 42, 0x0102_0304);
        assert_eq!(
            payload.as_ref(),
            &[FLAG_EMIT_EVENT, 255, 7, 42, 0x04, 0x03, 0x02, 0x01]
        );
        assert_eq!(payload.len(), 8);
    }

    #[test]
    fn clock_sync_is_bare_timestamp() {
        assert_eq!(clock_sync(0x0A0B_0C0D).as_ref(), &[0x0D, 0x0C, 0x0B, 0x0A]);
        assert_eq!(clock_sync_ack().as_ref(), &[0]);
    }
}
