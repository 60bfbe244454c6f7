pub mod error;
pub mod history;
pub mod math_float;
pub mod motion;
pub mod runner;
pub mod snapshot;
pub mod state;

use core::time::Duration;

use tracing::{debug, info, trace, warn};

pub use error::{CommandError, SessionError};
pub use history::{Domain, History, HistoryView, HISTORY_LENGTH};
pub use math_float::transforms::{clarke, park, three_phase, ClarkePair, ParkPair, PhaseTriple};
pub use runner::{IntervalTicks, ScriptedTicks, SessionHandle, SessionRunner, TickSource};
pub use snapshot::Snapshot;
pub use state::{Command, SimulationConfig, SimulationState};

use motion::phase_clock::PhaseClock;

/// One simulation session, owning the state, the clock and the sample history.
pub struct Session {
    state: SimulationState, // Only independently mutable values
    clock: PhaseClock,      // Timestamp baseline between ticks
    history: History,       // Newest-first samples for abc, alpha/beta and dq
    ticks: u64,             // Number of processed ticks, including paused ones
}

impl Session {
    /// Create a session with default settings: angle 0, speed 1.0, amplitude 1.0, playing.
    pub fn new() -> Self {
        Self::from_state(SimulationState::default())
    }

    /// Create a session from validated initial values.
    pub fn with_config(config: SimulationConfig) -> Result<Self, CommandError> {
        config.validate()?;
        Ok(Self::from_state(config.into()))
    }

    fn from_state(state: SimulationState) -> Self {
        info!(
            speed = state.speed,
            amplitude = state.amplitude,
            playing = state.is_playing,
            "simulation session created"
        );
        Self {
            state,
            clock: PhaseClock::new(),
            history: History::new(),
            ticks: 0,
        }
    }

    /// Main update method.
    ///
    /// # Arguments
    /// * `now` - monotonic timestamp of the tick source
    ///
    /// Advances the angle and records one sample per domain, all derived from the
    /// same angle. The very first tick only sets the time baseline, paused ticks
    /// only move the baseline forward.
    pub fn tick(&mut self, now: Duration) {
        self.ticks += 1;
        let Some(dt) = self.clock.tick(now) else {
            return;
        };

        if !self.state.is_playing {
            return;
        }

        self.state.angle = PhaseClock::advance(self.state.angle, self.state.speed, dt);

        let (phase, clarke, park) = self.transforms();
        self.history.record(phase, clarke, park);
        trace!(angle = self.state.angle, d = park.d, q = park.q, "tick");
    }

    /// Apply one command. Rejected commands leave the session untouched.
    pub fn apply(&mut self, command: Command) -> Result<(), CommandError> {
        if let Err(err) = command.validate() {
            warn!(?command, %err, "command rejected");
            return Err(err);
        }

        self.execute(command);
        Ok(())
    }

    // Commands past validation, every one is traced
    fn execute(&mut self, command: Command) {
        match command {
            Command::SetPlaying(playing) => self.state.is_playing = playing,
            Command::TogglePlaying => self.state.is_playing = !self.state.is_playing,
            Command::Reset => self.reset(),
            Command::SetSpeed(speed) => self.state.speed = speed,
            Command::SetAmplitude(amplitude) => self.state.amplitude = amplitude,
            Command::SetShowProjections(show) => self.state.show_projections = show,
            Command::ToggleProjections => {
                self.state.show_projections = !self.state.show_projections
            }
        }
        debug!(?command, "command applied");
    }

    #[inline(always)]
    pub fn set_playing(&mut self, playing: bool) {
        self.execute(Command::SetPlaying(playing));
    }

    /// Zero the angle and the histories. Speed, amplitude and play state are kept
    /// and no sample is recorded until the next tick.
    pub fn reset(&mut self) {
        self.state.angle = 0.0;
        self.history.clear();
        info!("simulation reset");
    }

    #[inline(always)]
    pub fn set_speed(&mut self, speed: f64) -> Result<(), CommandError> {
        self.apply(Command::SetSpeed(speed))
    }

    #[inline(always)]
    pub fn set_amplitude(&mut self, amplitude: f64) -> Result<(), CommandError> {
        self.apply(Command::SetAmplitude(amplitude))
    }

    #[inline(always)]
    pub fn set_show_projections(&mut self, show: bool) {
        self.execute(Command::SetShowProjections(show));
    }

    /// Getter for the state
    pub fn current_state(&self) -> SimulationState {
        self.state
    }

    pub fn current_phase(&self) -> PhaseTriple {
        three_phase(self.state.angle, self.state.amplitude)
    }

    pub fn current_clarke(&self) -> ClarkePair {
        clarke(self.current_phase())
    }

    pub fn current_park(&self) -> ParkPair {
        park(self.current_clarke(), self.state.angle)
    }

    /// Newest-first samples of `domain`, always `HISTORY_LENGTH` long
    pub fn history(&self, domain: Domain) -> HistoryView<'_> {
        self.history.view(domain)
    }

    /// Getter for processed tick count
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Copy of the committed state for readers outside the tick loop
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.state, self.transforms(), self.ticks, self.history.clone())
    }

    // All three domains from the one current angle
    fn transforms(&self) -> (PhaseTriple, ClarkePair, ParkPair) {
        let phase = three_phase(self.state.angle, self.state.amplitude);
        let clarke = clarke(phase);
        (phase, clarke, park(clarke, self.state.angle))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
