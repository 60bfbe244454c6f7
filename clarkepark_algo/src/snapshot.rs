// Point-in-time copy of everything the presentation side reads.
// A snapshot is taken only after a tick has fully completed, so the current values
// and all three histories always belong to the same angle.

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use crate::history::{Domain, History, HistoryView};
use crate::math_float::transforms::{ClarkePair, ParkPair, PhaseTriple};
use crate::state::SimulationState;

/// Committed result of one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub state: SimulationState,
    pub phase: PhaseTriple,
    pub clarke: ClarkePair,
    pub park: ParkPair,
    pub ticks: u64,
    history: History,
}

impl Snapshot {
    pub(crate) fn new(
        state: SimulationState,
        (phase, clarke, park): (PhaseTriple, ClarkePair, ParkPair),
        ticks: u64,
        history: History,
    ) -> Self {
        Self {
            state,
            phase,
            clarke,
            park,
            ticks,
            history,
        }
    }

    pub fn history(&self, domain: Domain) -> HistoryView<'_> {
        self.history.view(domain)
    }
}
