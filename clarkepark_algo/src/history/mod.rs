// Rolling sample history for the three signal domains.
// One fixed-length buffer per domain, all written in the same tick from the same angle,
// read newest-first by the waveform plots.

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

pub mod fifo_buffer;

use serde::{Deserialize, Serialize};

use crate::math_float::transforms::{ClarkePair, ParkPair, PhaseTriple};
use fifo_buffer::BufferFIFO;

/// Number of samples kept per domain
pub const HISTORY_LENGTH: usize = 300;

/// Signal domain selector for history queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    Abc,
    AlphaBeta,
    Dq,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Abc, Domain::AlphaBeta, Domain::Dq];

    /// Number of traces plotted for the domain
    pub const fn channels(self) -> usize {
        match self {
            Domain::Abc => 3,
            Domain::AlphaBeta | Domain::Dq => 2,
        }
    }
}

/// Sample of one domain, flattened to plot channels
pub trait Sample: Default + Copy {
    fn channels(&self) -> Vec<f64>;
}

impl Sample for PhaseTriple {
    fn channels(&self) -> Vec<f64> {
        vec![self.a, self.b, self.c]
    }
}

impl Sample for ClarkePair {
    fn channels(&self) -> Vec<f64> {
        vec![self.alpha, self.beta]
    }
}

impl Sample for ParkPair {
    fn channels(&self) -> Vec<f64> {
        vec![self.d, self.q]
    }
}

pub type PhaseHistory = BufferFIFO<PhaseTriple, HISTORY_LENGTH>;
pub type ClarkeHistory = BufferFIFO<ClarkePair, HISTORY_LENGTH>;
pub type ParkHistory = BufferFIFO<ParkPair, HISTORY_LENGTH>;

/// Borrowed view of one domain buffer
#[derive(Clone, Copy, Debug)]
pub enum HistoryView<'a> {
    Abc(&'a PhaseHistory),
    AlphaBeta(&'a ClarkeHistory),
    Dq(&'a ParkHistory),
}

impl HistoryView<'_> {
    /// Always `HISTORY_LENGTH`
    pub fn len(&self) -> usize {
        HISTORY_LENGTH
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Per-channel series, each newest-first
    pub fn traces(&self) -> Vec<Vec<f64>> {
        match self {
            HistoryView::Abc(buf) => split_channels(buf),
            HistoryView::AlphaBeta(buf) => split_channels(buf),
            HistoryView::Dq(buf) => split_channels(buf),
        }
    }

    /// Per-sample channel values, newest-first
    pub fn samples(&self) -> Vec<Vec<f64>> {
        match self {
            HistoryView::Abc(buf) => buf.iter().map(|s| s.channels()).collect(),
            HistoryView::AlphaBeta(buf) => buf.iter().map(|s| s.channels()).collect(),
            HistoryView::Dq(buf) => buf.iter().map(|s| s.channels()).collect(),
        }
    }
}

fn split_channels<T: Sample, const N: usize>(buf: &BufferFIFO<T, N>) -> Vec<Vec<f64>> {
    let mut traces: Vec<Vec<f64>> = Vec::new();
    for sample in buf.iter() {
        let values = sample.channels();
        if traces.is_empty() {
            traces = vec![Vec::with_capacity(N); values.len()];
        }
        for (trace, value) in traces.iter_mut().zip(values) {
            trace.push(value);
        }
    }
    traces
}

/// Histories of all three domains, always written together.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct History {
    abc: PhaseHistory,
    alpha_beta: ClarkeHistory,
    dq: ParkHistory,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one sample per domain
    pub fn record(&mut self, phase: PhaseTriple, clarke: ClarkePair, park: ParkPair) {
        self.abc.push(phase);
        self.alpha_beta.push(clarke);
        self.dq.push(park);
    }

    /// Zero-fills every domain
    pub fn clear(&mut self) {
        self.abc.clear();
        self.alpha_beta.clear();
        self.dq.clear();
    }

    pub fn view(&self, domain: Domain) -> HistoryView<'_> {
        match domain {
            Domain::Abc => HistoryView::Abc(&self.abc),
            Domain::AlphaBeta => HistoryView::AlphaBeta(&self.alpha_beta),
            Domain::Dq => HistoryView::Dq(&self.dq),
        }
    }

    pub fn phase(&self) -> &PhaseHistory {
        &self.abc
    }

    pub fn clarke(&self) -> &ClarkeHistory {
        &self.alpha_beta
    }

    pub fn park(&self) -> &ParkHistory {
        &self.dq
    }
}
