//! The narrow surface applications drive.
//!
//! One conductor owns the corridor and the timeline for a single link and
//! exposes the whole core: compile, send, timeline control, event emission.
//! Construction hands back the connection driver (spawn [`Connection::run`]
//! on a task) and the event sender the collaborator feeds.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};

use bytes::{BufMut, Bytes, BytesMut};
use tokio::sync::{mpsc, watch};

use lumen_script::{compile, CompiledScript};
use lumen_wire::{clock_timestamp, emit_event, set_timeline, ProtocolVersion};

use crate::connection::Connection;
use crate::corridor::{Corridor, SendConfig};
use crate::error::{LinkError, Result};
use crate::link::{Link, LinkEvent, LinkState};
use crate::timeline::Timeline;

/// Conductor construction knobs.
#[derive(Debug, Clone, Default)]
pub struct ConductorConfig {
    /// Opcode-table generation pinned for this session.
    pub version: ProtocolVersion,
    /// Delivery configuration for the corridor.
    pub send: SendConfig,
}

/// High-level handle over one link.
pub struct Conductor<L: Link> {
    link: Arc<L>,
    corridor: Arc<Corridor<L>>,
    timeline: Arc<Mutex<Timeline>>,
    state: watch::Receiver<LinkState>,
    version: ProtocolVersion,
}

/// Capacity of the event queue between the collaborator and the driver.
const EVENT_QUEUE: usize = 16;

impl<L: Link> Conductor<L> {
    /// Wire up a conductor with default configuration.
    pub fn new(link: L) -> (Self, Connection<L>, mpsc::Sender<LinkEvent>) {
        Self::with_config(link, ConductorConfig::default())
    }

    /// Wire up a conductor, the connection driver and the collaborator's
    /// event sender.
    pub fn with_config(
        link: L,
        config: ConductorConfig,
    ) -> (Self, Connection<L>, mpsc::Sender<LinkEvent>) {
        let link = Arc::new(link);
        let corridor = Arc::new(Corridor::with_config(Arc::clone(&link), config.send));
        let timeline = Arc::new(Mutex::new(Timeline::new()));
        let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE);
        let (state_tx, state_rx) = watch::channel(LinkState::Disconnected);

        let driver = Connection::new(
            Arc::clone(&link),
            Arc::clone(&corridor),
            Arc::clone(&timeline),
            event_rx,
            state_tx,
            config.version,
        );

        let conductor = Self {
            link,
            corridor,
            timeline,
            state: state_rx,
            version: config.version,
        };
        (conductor, driver, event_tx)
    }

    /// Ask the collaborator to open the link; progress arrives as events.
    pub fn connect(&self) -> Result<()> {
        self.link.connect()
    }

    /// Current link lifecycle state.
    pub fn state(&self) -> LinkState {
        *self.state.borrow()
    }

    /// Watch every lifecycle transition.
    pub fn subscribe(&self) -> watch::Receiver<LinkState> {
        self.state.clone()
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Compile a script against the pinned table version. Never fails;
    /// dropped tokens ride along as diagnostics.
    pub fn compile(&self, script: &str) -> CompiledScript {
        compile(script, self.version)
    }

    /// Deliver an already-built payload.
    pub async fn send(&self, payload: impl Into<Bytes>) -> Result<()> {
        self.ensure_connected()?;
        self.corridor.send(payload).await
    }

    /// Compile and deliver a script, stamped with the current timeline
    /// position so the controller picks it up mid-performance.
    pub async fn send_script(&self, script: &str) -> Result<CompiledScript> {
        self.ensure_connected()?;
        let compiled = self.compile(script);

        let header = self.timeline_payload();
        let mut payload = BytesMut::with_capacity(header.len() + compiled.bytes.len());
        payload.put_slice(&header);
        payload.put_slice(&compiled.bytes);

        self.corridor.send(payload.freeze()).await?;
        Ok(compiled)
    }

    /// Start (or resume) the timeline and announce it. Returns the elapsed
    /// program time; already running is a no-op that sends nothing.
    pub async fn start_timeline(&self) -> Result<Duration> {
        self.ensure_connected()?;
        let now = Instant::now();
        let (changed, payload, elapsed) = {
            let mut timeline = self.timeline.lock().expect("timeline lock poisoned");
            let changed = timeline.start(now);
            let elapsed = timeline.elapsed(now);
            (changed, compose_reference(&timeline, elapsed), elapsed)
        };
        if changed {
            self.corridor.send(payload).await?;
        }
        Ok(elapsed)
    }

    /// Pause the timeline and announce it. Already paused or stopped is a
    /// no-op that sends nothing.
    pub async fn pause_timeline(&self) -> Result<Duration> {
        self.ensure_connected()?;
        let now = Instant::now();
        let (changed, payload, elapsed) = {
            let mut timeline = self.timeline.lock().expect("timeline lock poisoned");
            let changed = timeline.pause(now);
            let elapsed = timeline.elapsed(now);
            (changed, compose_reference(&timeline, elapsed), elapsed)
        };
        if changed {
            self.corridor.send(payload).await?;
        }
        Ok(elapsed)
    }

    /// Reset the timeline to zero, stopped, and announce it.
    pub async fn stop_timeline(&self) -> Result<()> {
        self.ensure_connected()?;
        let payload = {
            let mut timeline = self.timeline.lock().expect("timeline lock poisoned");
            timeline.stop();
            compose_reference(&timeline, Duration::ZERO)
        };
        self.corridor.send(payload).await
    }

    /// Push an explicit timeline position without touching local state.
    pub async fn push_timeline(&self, elapsed: Duration, paused: bool) -> Result<()> {
        self.ensure_connected()?;
        let index = {
            let timeline = self.timeline.lock().expect("timeline lock poisoned");
            timeline.index()
        };
        let payload = set_timeline(
            clock_timestamp(SystemTime::now()),
            elapsed.as_millis() as u32,
            index,
            paused,
        );
        self.corridor.send(payload).await
    }

    /// Emit a one-shot choreography event anchored at `at` on the timeline.
    pub async fn emit_event(
        &self,
        device_id: u8,
        code: u8,
        parameter: u8,
        at: Duration,
    ) -> Result<()> {
        self.ensure_connected()?;
        let payload = emit_event(device_id, code, parameter, at.as_millis() as u32);
        self.corridor.send(payload).await
    }

    /// Elapsed program time. Pure read; sends nothing.
    pub fn elapsed(&self) -> Duration {
        self.timeline
            .lock()
            .expect("timeline lock poisoned")
            .elapsed(Instant::now())
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.state() != LinkState::Connected {
            return Err(LinkError::NotConnected);
        }
        Ok(())
    }

    fn timeline_payload(&self) -> Bytes {
        let timeline = self.timeline.lock().expect("timeline lock poisoned");
        let elapsed = timeline.elapsed(Instant::now());
        compose_reference(&timeline, elapsed)
    }
}

/// Timeline reference payload with a fresh clock timestamp.
fn compose_reference(timeline: &Timeline, elapsed: Duration) -> Bytes {
    set_timeline(
        clock_timestamp(SystemTime::now()),
        elapsed.as_millis() as u32,
        timeline.index(),
        timeline.paused_flag(),
    )
}
