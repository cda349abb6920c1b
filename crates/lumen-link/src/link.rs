//! The external link collaborator.
//!
//! The core never touches the radio. It consumes a [`Link`] implementation
//! for raw primitives and receives lifecycle changes as [`LinkEvent`]s over
//! a channel — no re-entrant callback chains.

use std::future::Future;

use bytes::Bytes;

use crate::error::Result;

/// Link lifecycle as reported by the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

impl LinkState {
    pub fn name(&self) -> &'static str {
        match self {
            LinkState::Disconnected => "disconnected",
            LinkState::Connecting => "connecting",
            LinkState::Connected => "connected",
            LinkState::Disconnecting => "disconnecting",
        }
    }
}

impl std::fmt::Display for LinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Logical channels the remote controller exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkChannel {
    /// Chunked payload traffic (instruction streams, control payloads).
    Instruction,
    /// Raw clock reference writes.
    ClockSync,
}

/// Events raised by the collaborator, consumed by the connection driver.
#[derive(Debug, Clone)]
pub enum LinkEvent {
    StateChanged(LinkState),
}

/// Raw primitives supplied by the external collaborator.
///
/// `write` resolves once the link confirms the write completed — that
/// completion signal is the corridor's readiness gate, so an implementation
/// must not resolve early.
pub trait Link: Send + Sync + 'static {
    /// Ask the collaborator to open the link. Progress arrives as
    /// [`LinkEvent`]s, not through this call.
    fn connect(&self) -> Result<()>;

    /// Enumerate the logical channels once the link reports connected.
    fn discover_channels(&self) -> impl Future<Output = Result<Vec<LinkChannel>>> + Send;

    /// Write one chunk on a channel.
    fn write(&self, channel: LinkChannel, chunk: Bytes) -> impl Future<Output = Result<()>> + Send;
}
