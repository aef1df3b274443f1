//! Per-tick waveform step generators
//!
//! One phase struct per waveform kind, each with a `step` that runs in
//! bounded time (no loops over the period, no trig calls) because it
//! executes once per timer tick. The phase variants are carried in a
//! tagged [`WavePhase`] and dispatched by `match`, so a kind always
//! travels with its own state.

use crate::dac::{DacCode, AMPLITUDE, CEILING, DC_BIAS};
use crate::synth::params::{SynthParams, WaveformKind};

/// Bhaskara I's sine approximation over integer degrees
///
/// For `d` in `[0, 180]`: `4d(180-d) / (40500 - d(180-d))`, a value in
/// `[0, 1]`; the second half-wave mirrors the first with the sign
/// flipped. Exact at 0, 90, 180, 270 degrees; the absolute error
/// against `sin` stays below 0.0017 everywhere else. Degrees outside
/// `[0, 360)` are reduced first.
#[inline]
pub fn bhaskara_sin(degree: u16) -> f32 {
    let d = (degree % 360) as i32;
    let (half, sign) = if d <= 180 { (d, 1.0f32) } else { (d - 180, -1.0f32) };
    let prod = half * (180 - half);
    sign * (4 * prod) as f32 / (40_500 - prod) as f32
}

/// Square-wave phase state
///
/// `points` and `on_ticks` are latched at each cycle start, so duty or
/// frequency changes never deform a pulse already in progress; they take
/// effect when the cycle wraps.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SquarePhase {
    elapsed_ticks: u32,
    on_ticks: u32,
    points: u32,
}

impl SquarePhase {
    pub(crate) fn new(params: &SynthParams) -> Self {
        let mut phase = SquarePhase {
            elapsed_ticks: 0,
            on_ticks: 0,
            points: 1,
        };
        phase.latch(params);
        phase
    }

    /// Re-sample period and high interval for the cycle that starts now
    fn latch(&mut self, params: &SynthParams) {
        self.points = params.frequency.points_per_cycle();
        self.on_ticks = (self.points as f32 * params.duty_cycle()).round() as u32;
    }

    #[inline]
    pub(crate) fn step(&mut self, params: &SynthParams) -> DacCode {
        let code = if self.elapsed_ticks < self.on_ticks {
            CEILING
        } else {
            DC_BIAS
        };
        self.elapsed_ticks += 1;
        if self.elapsed_ticks >= self.points {
            self.elapsed_ticks = 0;
            self.latch(params);
        }
        DacCode::new(code)
    }
}

/// Sine-wave phase state: current position in whole degrees
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SinePhase {
    degree: u16,
}

impl SinePhase {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn step(&mut self, params: &SynthParams) -> DacCode {
        // Renormalize before use; malformed state self-corrects here
        // instead of propagating (the tick path has no error channel).
        self.degree %= 360;

        let swing = (AMPLITUDE as f32 * bhaskara_sin(self.degree)).round() as i32;
        let code = DacCode::from_clamped(DC_BIAS as i32 + swing);

        // Coarser frequencies advance in bigger degree steps; the floor
        // keeps the step integral, which is what gives the waveform its
        // faceted look at high frequencies.
        let degree_step = (360 / params.frequency.points_per_cycle()).max(1) as u16;
        self.degree = (self.degree + degree_step) % 360;

        code
    }
}

/// Sawtooth phase state: the current ramp level in code units
///
/// Kept as an `f32` accumulator because the per-tick step size is
/// fractional for every supported frequency.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SawtoothPhase {
    ramp: f32,
}

impl SawtoothPhase {
    pub(crate) fn new() -> Self {
        SawtoothPhase {
            ramp: DC_BIAS as f32,
        }
    }

    #[inline]
    pub(crate) fn step(&mut self, params: &SynthParams) -> DacCode {
        let code = DacCode::from_clamped(self.ramp.round() as i32);

        let step_size = AMPLITUDE as f32 / params.frequency.points_per_cycle() as f32;
        self.ramp += step_size;
        // Compare in rounded code units: the accumulated ramp can land a
        // fraction of a code under the ceiling after a full period.
        if self.ramp.round() as i32 >= CEILING as i32 {
            self.ramp = DC_BIAS as f32;
        }

        code
    }
}

/// Tagged per-waveform runtime state
///
/// The dispatcher holds exactly one variant; switching waveform kind
/// replaces it wholesale, so no counter from a previous waveform can
/// leak into the new one.
#[derive(Debug, Clone, Copy)]
pub(crate) enum WavePhase {
    Square(SquarePhase),
    Sine(SinePhase),
    Sawtooth(SawtoothPhase),
}

impl WavePhase {
    /// Fresh phase state for the given kind
    pub(crate) fn for_kind(params: &SynthParams) -> Self {
        match params.kind {
            WaveformKind::Square => WavePhase::Square(SquarePhase::new(params)),
            WaveformKind::Sine => WavePhase::Sine(SinePhase::new()),
            WaveformKind::Sawtooth => WavePhase::Sawtooth(SawtoothPhase::new()),
        }
    }

    /// The kind this phase state belongs to
    pub(crate) fn kind(&self) -> WaveformKind {
        match self {
            WavePhase::Square(_) => WaveformKind::Square,
            WavePhase::Sine(_) => WaveformKind::Sine,
            WavePhase::Sawtooth(_) => WaveformKind::Sawtooth,
        }
    }

    /// Advance one tick and produce the next DAC code
    #[inline]
    pub(crate) fn step(&mut self, params: &SynthParams) -> DacCode {
        match self {
            WavePhase::Square(phase) => phase.step(params),
            WavePhase::Sine(phase) => phase.step(params),
            WavePhase::Sawtooth(phase) => phase.step(params),
        }
    }
}
