//! The single-writer readiness gate.
//!
//! The link is one shared, unbuffered resource: at most one write may be
//! outstanding, and frames of one payload go out strictly in ascending
//! offset order. An async mutex serializes whole payloads (frames of
//! distinct payloads never interleave); within a payload, each frame write
//! awaits the collaborator's completion, bounded by a timeout and raced
//! against a cancellation token.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use lumen_wire::{chunk, DEFAULT_MTU};

use crate::error::{LinkError, Result};
use crate::link::{Link, LinkChannel};

/// Delivery knobs for one corridor.
#[derive(Debug, Clone)]
pub struct SendConfig {
    /// Maximum transmission unit of the link, frame header included.
    pub mtu: usize,
    /// Upper bound on each write's completion wait.
    pub write_timeout: Duration,
}

impl Default for SendConfig {
    fn default() -> Self {
        Self {
            mtu: DEFAULT_MTU,
            write_timeout: Duration::from_secs(5),
        }
    }
}

/// Serializes payload delivery over the shared link.
pub struct Corridor<L> {
    link: Arc<L>,
    gate: Mutex<()>,
    config: SendConfig,
    cancel: RwLock<CancellationToken>,
}

impl<L: Link> Corridor<L> {
    pub fn new(link: Arc<L>) -> Self {
        Self::with_config(link, SendConfig::default())
    }

    pub fn with_config(link: Arc<L>, config: SendConfig) -> Self {
        Self {
            link,
            gate: Mutex::new(()),
            config,
            cancel: RwLock::new(CancellationToken::new()),
        }
    }

    pub fn config(&self) -> &SendConfig {
        &self.config
    }

    /// Abort the send currently holding the corridor (and any send that was
    /// already queued behind it). Sends issued afterwards are unaffected.
    pub fn cancel_in_flight(&self) {
        let mut guard = self.cancel.write().expect("cancel lock poisoned");
        let old = std::mem::replace(&mut *guard, CancellationToken::new());
        drop(guard);
        old.cancel();
    }

    /// Chunk a payload and deliver its frames in offset order on the
    /// instruction channel.
    pub async fn send(&self, payload: impl Into<Bytes>) -> Result<()> {
        let frames = chunk(payload, self.config.mtu)?;
        let token = self.current_token();

        let _gate = self.gate.lock().await;
        for frame in &frames {
            self.deliver(LinkChannel::Instruction, frame.encode(), &token)
                .await?;
            debug!(
                session_id = frame.session_id,
                offset = frame.offset,
                len = frame.chunk.len(),
                "frame delivered"
            );
        }
        Ok(())
    }

    /// One gated raw write outside the chunker path (clock-sync traffic).
    pub async fn write(&self, channel: LinkChannel, bytes: Bytes) -> Result<()> {
        let token = self.current_token();
        let _gate = self.gate.lock().await;
        self.deliver(channel, bytes, &token).await
    }

    async fn deliver(
        &self,
        channel: LinkChannel,
        bytes: Bytes,
        token: &CancellationToken,
    ) -> Result<()> {
        tokio::select! {
            _ = token.cancelled() => Err(LinkError::Cancelled),
            written = timeout(self.config.write_timeout, self.link.write(channel, bytes)) => {
                match written {
                    Ok(result) => result,
                    Err(_) => Err(LinkError::Timeout(self.config.write_timeout)),
                }
            }
        }
    }

    fn current_token(&self) -> CancellationToken {
        self.cancel.read().expect("cancel lock poisoned").clone()
    }
}
