//! Wire-level payload layout and frame chunking for the lumen link protocol.
//!
//! Everything the remote controller sees on the wire is defined here:
//! - Protocol flag bytes delimiting payload kinds
//! - Control payloads (timeline reference, event emission, clock sync)
//! - The frame chunker that fits arbitrary-length payloads into the link's
//!   maximum transmission unit
//!
//! Payloads are self-delimited by their flag and terminator bytes; consumers
//! must not rely on transport-level length alone.

pub mod chunker;
pub mod control;
pub mod error;
pub mod flags;
pub mod version;

pub use chunker::{chunk, Frame, DEFAULT_MTU, FRAME_HEADER_SIZE};
pub use control::{
    clock_sync, clock_sync_ack, clock_timestamp, emit_event, set_timeline, timeline_flags,
};
pub use error::{Result, WireError};
pub use flags::{
    flag_name, DEVICE_ID_APP, END_OF_LUME_BYTES, END_OF_STATEMENT, FLAG_EMIT_EVENT,
    FLAG_LUME_BYTES, FLAG_SET_TIMELINE,
};
pub use version::ProtocolVersion;
