//! Protocol control bytes.
//!
//! Codes 251-255 sit above every opcode band and are shared by both
//! opcode-table generations; a decoder can always recognize a payload's kind
//! and its terminator regardless of the pinned table version.

/// Payload kind: compiled instruction stream follows.
pub const FLAG_LUME_BYTES: u8 = 251;

/// Payload kind: timeline reference (clock timestamp + elapsed + flags).
pub const FLAG_SET_TIMELINE: u8 = 252;

/// Payload kind: a single choreography event.
pub const FLAG_EMIT_EVENT: u8 = 253;

/// Closes one statement inside an instruction stream.
pub const END_OF_STATEMENT: u8 = 254;

/// Terminates an instruction-stream payload.
pub const END_OF_LUME_BYTES: u8 = 255;

/// Device id the controlling application uses when emitting events itself.
pub const DEVICE_ID_APP: u8 = 255;

/// Returns a human-readable name for a protocol flag byte.
pub fn flag_name(flag: u8) -> &'static str {
    match flag {
        FLAG_LUME_BYTES => "LUME_BYTES",
        FLAG_SET_TIMELINE => "SET_TIMELINE",
        FLAG_EMIT_EVENT => "EMIT_EVENT",
        END_OF_STATEMENT => "END_OF_STATEMENT",
        END_OF_LUME_BYTES => "END_OF_LUME_BYTES",
        _ => "OPCODE",
    }
}
