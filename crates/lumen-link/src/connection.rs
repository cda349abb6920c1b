//! Event-driven connection lifecycle.
//!
//! The collaborator reports raw lifecycle changes as [`LinkEvent`]s; this
//! driver consumes them from a channel, mirrors every transition to the
//! registered observer, and runs the post-connect synchronization sequence.
//! The clock reference must land before the timeline reference goes out —
//! each step awaits the previous one's completion, so the ordering is
//! structural rather than polled.

use std::sync::{Arc, Mutex};
use std::time::{Instant, SystemTime};

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use lumen_wire::{clock_sync, clock_sync_ack, clock_timestamp, set_timeline, ProtocolVersion};

use crate::corridor::Corridor;
use crate::error::{LinkError, Result};
use crate::link::{Link, LinkChannel, LinkEvent, LinkState};
use crate::timeline::Timeline;

/// Consumes link events and drives lifecycle side effects.
///
/// Run it to completion on its own task; it exits when the event channel
/// closes.
pub struct Connection<L: Link> {
    link: Arc<L>,
    corridor: Arc<Corridor<L>>,
    timeline: Arc<Mutex<Timeline>>,
    events: mpsc::Receiver<LinkEvent>,
    observer: watch::Sender<LinkState>,
    state: LinkState,
    version: ProtocolVersion,
}

impl<L: Link> Connection<L> {
    pub fn new(
        link: Arc<L>,
        corridor: Arc<Corridor<L>>,
        timeline: Arc<Mutex<Timeline>>,
        events: mpsc::Receiver<LinkEvent>,
        observer: watch::Sender<LinkState>,
        version: ProtocolVersion,
    ) -> Self {
        Self {
            link,
            corridor,
            timeline,
            events,
            observer,
            state: LinkState::Disconnected,
            version,
        }
    }

    /// The opcode-table generation pinned for this session.
    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Drive the state machine until the collaborator drops its event
    /// sender.
    pub async fn run(mut self) {
        while let Some(event) = self.events.recv().await {
            self.handle(event).await;
        }
        debug!("link event channel closed, connection driver exiting");
    }

    async fn handle(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::StateChanged(next) => self.transition(next).await,
        }
    }

    async fn transition(&mut self, next: LinkState) {
        info!(from = %self.state, to = %next, "link state changed");
        self.state = next;
        let _ = self.observer.send(next);

        match next {
            LinkState::Connected => {
                if let Err(err) = self.synchronize().await {
                    warn!(%err, "post-connect synchronization failed");
                }
            }
            LinkState::Disconnected => {
                // Abandon whatever was mid-transfer; partial delivery is not
                // rolled back, the receiver discards the incomplete session.
                self.corridor.cancel_in_flight();
            }
            LinkState::Connecting | LinkState::Disconnecting => {}
        }
    }

    /// Channel discovery, then clock sync, then the timeline reference.
    async fn synchronize(&self) -> Result<()> {
        let channels = self.link.discover_channels().await?;
        if !channels.contains(&LinkChannel::Instruction)
            || !channels.contains(&LinkChannel::ClockSync)
        {
            return Err(LinkError::Discovery(format!(
                "link exposed {channels:?}, need instruction and clock-sync"
            )));
        }
        info!(version = %self.version, "channels ready, synchronizing");

        // Fresh wall-clock reference, then the zero probe confirming it
        // landed. Both complete before any timeline bytes go out.
        self.corridor
            .write(
                LinkChannel::ClockSync,
                clock_sync(clock_timestamp(SystemTime::now())),
            )
            .await?;
        self.corridor
            .write(LinkChannel::ClockSync, clock_sync_ack())
            .await?;

        let payload = {
            let timeline = self.timeline.lock().expect("timeline lock poisoned");
            set_timeline(
                clock_timestamp(SystemTime::now()),
                timeline.elapsed(Instant::now()).as_millis() as u32,
                timeline.index(),
                timeline.paused_flag(),
            )
        };
        self.corridor.send(payload).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use bytes::Bytes;

    use lumen_wire::FLAG_SET_TIMELINE;

    use super::*;

    #[derive(Default)]
    struct ScriptedLink {
        writes: StdMutex<Vec<(LinkChannel, Bytes)>>,
        fail_discovery: AtomicBool,
    }

    impl ScriptedLink {
        fn writes(&self) -> Vec<(LinkChannel, Bytes)> {
            self.writes.lock().expect("writes lock").clone()
        }
    }

    impl Link for ScriptedLink {
        fn connect(&self) -> Result<()> {
            Ok(())
        }

        async fn discover_channels(&self) -> Result<Vec<LinkChannel>> {
            if self.fail_discovery.load(Ordering::SeqCst) {
                return Err(LinkError::Discovery("scripted failure".into()));
            }
            Ok(vec![LinkChannel::Instruction, LinkChannel::ClockSync])
        }

        async fn write(&self, channel: LinkChannel, chunk: Bytes) -> Result<()> {
            self.writes
                .lock()
                .expect("writes lock")
                .push((channel, chunk));
            Ok(())
        }
    }

    struct Harness {
        link: Arc<ScriptedLink>,
        events: mpsc::Sender<LinkEvent>,
        observer: watch::Receiver<LinkState>,
    }

    fn spawn_driver() -> Harness {
        let link = Arc::new(ScriptedLink::default());
        let corridor = Arc::new(Corridor::new(Arc::clone(&link)));
        let timeline = Arc::new(Mutex::new(Timeline::new()));
        let (event_tx, event_rx) = mpsc::channel(8);
        let (state_tx, state_rx) = watch::channel(LinkState::Disconnected);

        let driver = Connection::new(
            Arc::clone(&link),
            corridor,
            timeline,
            event_rx,
            state_tx,
            ProtocolVersion::V2,
        );
        tokio::spawn(driver.run());

        Harness {
            link,
            events: event_tx,
            observer: state_rx,
        }
    }

    async fn wait_for_writes(link: &ScriptedLink, count: usize) -> Vec<(LinkChannel, Bytes)> {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let writes = link.writes();
                if writes.len() >= count {
                    return writes;
                }
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("synchronization writes should appear")
    }

    #[tokio::test]
    async fn driver_carries_the_pinned_version() {
        let link = Arc::new(ScriptedLink::default());
        let corridor = Arc::new(Corridor::new(Arc::clone(&link)));
        let timeline = Arc::new(Mutex::new(Timeline::new()));
        let (_event_tx, event_rx) = mpsc::channel(1);
        let (state_tx, _state_rx) = watch::channel(LinkState::Disconnected);

        let driver = Connection::new(
            link,
            corridor,
            timeline,
            event_rx,
            state_tx,
            ProtocolVersion::V1,
        );
        assert_eq!(driver.version(), ProtocolVersion::V1);
    }

    #[tokio::test]
    async fn observer_sees_each_transition() {
        let mut harness = spawn_driver();

        for state in [LinkState::Connecting, LinkState::Connected] {
            harness
                .events
                .send(LinkEvent::StateChanged(state))
                .await
                .expect("event should enqueue");
            harness
                .observer
                .changed()
                .await
                .expect("observer should be notified");
            assert_eq!(*harness.observer.borrow(), state);
        }
    }

    #[tokio::test]
    async fn connected_runs_clock_sync_before_timeline_sync() {
        let harness = spawn_driver();

        harness
            .events
            .send(LinkEvent::StateChanged(LinkState::Connected))
            .await
            .expect("event should enqueue");

        let writes = wait_for_writes(&harness.link, 3).await;

        // Clock reference, then the zero probe, both on the clock-sync
        // channel, before any instruction-channel traffic.
        assert_eq!(writes[0].0, LinkChannel::ClockSync);
        assert_eq!(writes[0].1.len(), 4);
        assert_eq!(writes[1].0, LinkChannel::ClockSync);
        assert_eq!(writes[1].1.as_ref(), &[0]);

        assert_eq!(writes[2].0, LinkChannel::Instruction);
        // One frame: 12-byte header, then the 10-byte timeline payload for
        // a stopped timeline (elapsed 0, paused bit set).
        let frame = writes[2].1.as_ref();
        assert_eq!(frame[12], FLAG_SET_TIMELINE);
        assert_eq!(&frame[17..21], &[0, 0, 0, 0]);
        assert_eq!(frame[21], 0b0001_0000);
    }

    #[tokio::test]
    async fn failed_discovery_sends_nothing() {
        let harness = spawn_driver();
        harness.link.fail_discovery.store(true, Ordering::SeqCst);

        harness
            .events
            .send(LinkEvent::StateChanged(LinkState::Connected))
            .await
            .expect("event should enqueue");

        // Give the driver a chance to (wrongly) write something.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(harness.link.writes().is_empty());
    }

    #[tokio::test]
    async fn full_lifecycle_round_trip() {
        let mut harness = spawn_driver();

        let sequence = [
            LinkState::Connecting,
            LinkState::Connected,
            LinkState::Disconnecting,
            LinkState::Disconnected,
        ];
        for state in sequence {
            harness
                .events
                .send(LinkEvent::StateChanged(state))
                .await
                .expect("event should enqueue");
            harness
                .observer
                .changed()
                .await
                .expect("observer should be notified");
            assert_eq!(*harness.observer.borrow(), state);
        }
    }
}
