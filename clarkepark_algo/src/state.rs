// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use core::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{CommandError, SessionError};

/// Speed range offered by the controls (revolutions per second). Not enforced by the core.
pub const SPEED_RANGE: RangeInclusive<f64> = 0.1..=3.0;
/// Amplitude range offered by the controls. Not enforced by the core.
pub const AMPLITUDE_RANGE: RangeInclusive<f64> = 0.2..=1.5;

/// Independently mutable simulation state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub angle: f64,            // Electrical angle in [0, 2π)
    pub speed: f64,            // Revolutions per second, any finite value
    pub amplitude: f64,        // Peak phase value, any finite value
    pub is_playing: bool,      // Clock and history advance only while set
    pub show_projections: bool, // Presentation hint, no numeric effect
}

impl Default for SimulationState {
    fn default() -> Self {
        SimulationConfig::default().into()
    }
}

/// Initial values of a session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub speed: f64,
    pub amplitude: f64,
    pub playing: bool,
    pub show_projections: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            amplitude: 1.0,
            playing: true,
            show_projections: true,
        }
    }
}

impl SimulationConfig {
    /// Parses a JSON config, missing fields fall back to defaults
    pub fn from_json(text: &str) -> Result<Self, SessionError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies the same finite-value rule as the speed and amplitude commands
    pub fn validate(&self) -> Result<(), CommandError> {
        finite("speed", self.speed)?;
        finite("amplitude", self.amplitude)?;
        Ok(())
    }
}

impl From<SimulationConfig> for SimulationState {
    fn from(config: SimulationConfig) -> Self {
        Self {
            angle: 0.0,
            speed: config.speed,
            amplitude: config.amplitude,
            is_playing: config.playing,
            show_projections: config.show_projections,
        }
    }
}

/// Commands accepted by a session, applied between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    SetPlaying(bool),
    TogglePlaying,
    Reset,
    SetSpeed(f64),
    SetAmplitude(f64),
    SetShowProjections(bool),
    ToggleProjections,
}

impl Command {
    /// Rejects non-finite speed or amplitude before it reaches the state
    pub fn validate(&self) -> Result<(), CommandError> {
        match *self {
            Command::SetSpeed(speed) => finite("speed", speed),
            Command::SetAmplitude(amplitude) => finite("amplitude", amplitude),
            _ => Ok(()),
        }
    }
}

#[inline]
fn finite(field: &'static str, value: f64) -> Result<(), CommandError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CommandError::NonFinite { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_matches_session_start() {
        let state = SimulationState::default();
        assert_eq!(state.angle, 0.0);
        assert_eq!(state.speed, 1.0);
        assert_eq!(state.amplitude, 1.0);
        assert!(state.is_playing);
        assert!(state.show_projections);
    }

    #[test]
    fn non_finite_commands_are_rejected() {
        assert_eq!(
            Command::SetSpeed(f64::NAN).validate().map_err(|e| match e {
                CommandError::NonFinite { field, .. } => field,
            }),
            Err("speed")
        );
        assert!(Command::SetAmplitude(f64::INFINITY).validate().is_err());
        assert!(Command::SetAmplitude(f64::NEG_INFINITY).validate().is_err());
        assert!(Command::SetSpeed(-12.0).validate().is_ok());
        assert!(Command::Reset.validate().is_ok());
    }

    #[test]
    fn partial_json_config_keeps_defaults() {
        let config = SimulationConfig::from_json(r#"{ "speed": 2.5, "playing": false }"#)
            .expect("valid config");
        assert_eq!(config.speed, 2.5);
        assert_eq!(config.amplitude, 1.0);
        assert!(!config.playing);
        assert!(config.show_projections);
    }

    #[test]
    fn malformed_json_config_is_an_error() {
        assert!(matches!(
            SimulationConfig::from_json("{ speed: }"),
            Err(SessionError::Config(_))
        ));
    }

    #[test]
    fn ranges_cover_defaults() {
        let config = SimulationConfig::default();
        assert!(SPEED_RANGE.contains(&config.speed));
        assert!(AMPLITUDE_RANGE.contains(&config.amplitude));
    }
}
