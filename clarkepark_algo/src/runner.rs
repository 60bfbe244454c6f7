// Drives a Session from a periodic tick source on its own task.
// The task is the only writer: commands arrive over a channel and are applied right
// before the next tick, and every finished tick is published as a whole Snapshot.
// Readers never see a half-updated history or a domain computed from a stale angle.

// Key Features:
// - Tick sources are injectable, tests feed synthetic timestamps.
// - Stop is idempotent and only takes effect between ticks.
// - The final Session is handed back on join, nothing mutates it after stop.

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use core::future::Future;
use core::time::Duration;
use std::collections::VecDeque;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::{Result, SessionError};
use crate::snapshot::Snapshot;
use crate::state::Command;
use crate::Session;

/// Default frame period, roughly a 60 Hz display
pub const FRAME_PERIOD: Duration = Duration::from_millis(16);

/// Source of monotonically increasing tick timestamps.
///
/// Returning `None` ends the session as if it was stopped.
pub trait TickSource: Send + 'static {
    fn next_tick(&mut self) -> impl Future<Output = Option<Duration>> + Send;
}

/// Frame-paced ticks from a tokio interval, stamped relative to creation time.
pub struct IntervalTicks {
    interval: Interval,
    origin: Instant,
}

impl IntervalTicks {
    pub fn new(period: Duration) -> Self {
        let mut interval = interval(period);
        // Late frames are not replayed in a burst
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval,
            origin: Instant::now(),
        }
    }
}

impl Default for IntervalTicks {
    fn default() -> Self {
        Self::new(FRAME_PERIOD)
    }
}

impl TickSource for IntervalTicks {
    fn next_tick(&mut self) -> impl Future<Output = Option<Duration>> + Send {
        async move {
            let at = self.interval.tick().await;
            Some(at.saturating_duration_since(self.origin))
        }
    }
}

/// Fixed list of timestamps, exhausted after the last one.
pub struct ScriptedTicks {
    stamps: VecDeque<Duration>,
}

impl ScriptedTicks {
    pub fn new(stamps: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            stamps: stamps.into_iter().collect(),
        }
    }

    /// `count` ticks spaced by `period`, starting at zero
    pub fn uniform(period: Duration, count: u32) -> Self {
        Self::new((0..count).map(|i| period * i))
    }
}

impl TickSource for ScriptedTicks {
    fn next_tick(&mut self) -> impl Future<Output = Option<Duration>> + Send {
        let next = self.stamps.pop_front();
        async move {
            // Let stop requests and commands interleave with scripted ticks
            tokio::task::yield_now().await;
            next
        }
    }
}

/// Spawns session tasks.
pub struct SessionRunner;

impl SessionRunner {
    /// Moves `session` onto a new task ticking from `source`. Needs a tokio runtime.
    pub fn spawn<S: TickSource>(session: Session, source: S) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());
        let (stop_tx, stop_rx) = watch::channel(false);

        info!("session runner started");
        let task = tokio::spawn(run(session, source, command_rx, snapshot_tx, stop_rx));

        SessionHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            stop: stop_tx,
            task: Some(task),
        }
    }
}

async fn run<S: TickSource>(
    mut session: Session,
    mut source: S,
    mut commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<Snapshot>,
    mut stop: watch::Receiver<bool>,
) -> Session {
    loop {
        let now = tokio::select! {
            biased;
            // Only `true` is ever sent, a dropped sender counts as stop too
            _ = stop.changed() => break,
            next = source.next_tick() => match next {
                Some(now) => now,
                None => {
                    debug!("tick source exhausted");
                    break;
                }
            },
        };

        // A stop that raced the tick wins, the tick is dropped
        if *stop.borrow() {
            break;
        }

        while let Ok(command) = commands.try_recv() {
            // Already validated by the handle, the session logs rejections itself
            if session.apply(command).is_err() {
                continue;
            }
        }

        session.tick(now);
        snapshots.send_replace(session.snapshot());
    }

    info!(ticks = session.ticks(), "session runner stopped");
    session
}

/// Control side of a running session.
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<Snapshot>,
    stop: watch::Sender<bool>,
    task: Option<JoinHandle<Session>>,
}

impl SessionHandle {
    /// Queue `command` for the next tick. Invalid input is rejected here and never queued.
    pub fn send(&self, command: Command) -> Result<()> {
        if let Err(err) = command.validate() {
            warn!(?command, %err, "command rejected");
            return Err(err.into());
        }
        if self.is_stopped() {
            return Err(SessionError::Stopped);
        }
        self.commands
            .send(command)
            .map_err(|_| SessionError::Stopped)
    }

    /// Latest committed tick
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified after every committed tick
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Requests the task to stop. Calling it again is a no-op.
    pub fn stop(&self) {
        let was_stopped = self.stop.send_replace(true);
        if !was_stopped {
            debug!("session stop requested");
        }
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop.borrow() || self.commands.is_closed()
    }

    /// Stops the task and returns the final session.
    pub async fn join(mut self) -> Result<Session> {
        self.stop();
        match self.task.take() {
            Some(task) => Ok(task.await?),
            None => Err(SessionError::Stopped),
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{Domain, HISTORY_LENGTH};
    use crate::state::SimulationConfig;
    use core::f64::consts::PI;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[tokio::test]
    async fn scripted_ticks_drive_the_angle() {
        let stamps = [0, 250, 500].map(Duration::from_millis);
        let handle = SessionRunner::spawn(Session::new(), ScriptedTicks::new(stamps));

        let mut updates = handle.subscribe();
        while updates.changed().await.is_ok() {
            if updates.borrow().ticks == 3 {
                break;
            }
        }
        let session = handle.join().await.unwrap();
        assert_eq!(session.ticks(), 3);
        assert!(approx_eq(session.current_state().angle, PI));
    }

    #[tokio::test]
    async fn exhausted_source_ends_session() {
        let handle = SessionRunner::spawn(
            Session::new(),
            ScriptedTicks::uniform(Duration::from_millis(16), 10),
        );
        let mut updates = handle.subscribe();
        while updates.changed().await.is_ok() {}

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.ticks, 10);
        assert!(handle.is_stopped());
        assert!(matches!(
            handle.send(Command::Reset),
            Err(SessionError::Stopped)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn commands_apply_before_next_tick() {
        let handle = SessionRunner::spawn(Session::new(), IntervalTicks::default());
        tokio::time::sleep(Duration::from_millis(100)).await;

        handle.send(Command::SetPlaying(false)).unwrap();
        handle.send(Command::SetAmplitude(0.5)).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let paused = handle.snapshot();
        assert!(!paused.state.is_playing);
        assert!(approx_eq(paused.park.d, 0.5));

        tokio::time::sleep(Duration::from_millis(200)).await;
        let later = handle.snapshot();
        assert!(later.ticks > paused.ticks);
        assert_eq!(later.state.angle, paused.state.angle);
        assert_eq!(later.history(Domain::Abc).samples(), paused.history(Domain::Abc).samples());
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_command_is_rejected_at_the_handle() {
        let config = SimulationConfig {
            speed: 2.0,
            ..SimulationConfig::default()
        };
        let handle =
            SessionRunner::spawn(Session::with_config(config).unwrap(), IntervalTicks::default());

        assert!(matches!(
            handle.send(Command::SetSpeed(f64::NAN)),
            Err(SessionError::Command(_))
        ));
        tokio::time::sleep(Duration::from_millis(64)).await;
        assert_eq!(handle.snapshot().state.speed, 2.0);

        let session = handle.join().await.unwrap();
        assert_eq!(session.current_state().speed, 2.0);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent_and_final() {
        let handle = SessionRunner::spawn(Session::new(), IntervalTicks::default());
        tokio::time::sleep(Duration::from_millis(100)).await;

        handle.stop();
        handle.stop();
        assert!(handle.is_stopped());
        assert!(matches!(
            handle.send(Command::TogglePlaying),
            Err(SessionError::Stopped)
        ));

        let mut updates = handle.subscribe();
        let session = handle.join().await.unwrap();
        assert_eq!(updates.borrow_and_update().ticks, session.ticks());

        // Sender is gone with the task, no snapshot follows the stop
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(updates.changed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn published_snapshots_are_complete() {
        let handle = SessionRunner::spawn(Session::new(), IntervalTicks::default());
        let mut updates = handle.subscribe();

        for _ in 0..20 {
            updates.changed().await.unwrap();
            let snapshot = updates.borrow_and_update().clone();
            for domain in Domain::ALL {
                assert_eq!(snapshot.history(domain).samples().len(), HISTORY_LENGTH);
            }
            if snapshot.ticks > 1 {
                let newest = snapshot.history(Domain::Dq).samples()[0].clone();
                assert!(approx_eq(newest[0], snapshot.park.d));
                assert!(approx_eq(newest[1], snapshot.park.q));
            }
        }
        drop(handle);
    }
}
