//! Shared synthesis parameters
//!
//! The foreground control loop owns parameter changes; the tick path only
//! ever reads. [`SharedParams`] encodes that single-writer/single-reader
//! contract: writers commit a whole-struct update under one short lock,
//! readers take a `Copy` snapshot under the same lock, so a torn
//! multi-field read cannot happen.

use crate::synth::frequency::Frequency;
use parking_lot::Mutex;
use std::sync::Arc;

/// Lowest storable duty cycle
pub const DUTY_MIN: f32 = 0.1;
/// Highest storable duty cycle
pub const DUTY_MAX: f32 = 0.9;
/// Duty-cycle change applied per keypad nudge
pub const DUTY_STEP: f32 = 0.1;
/// Duty cycle installed at startup and by the reset key
pub const DUTY_DEFAULT: f32 = 0.5;

/// Which waveform the generator is producing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveformKind {
    /// Two-level pulse with adjustable duty cycle
    Square,
    /// Linear ramp with a sharp fall back to the DC bias
    Sawtooth,
    /// Approximate sine (Bhaskara I), faceted at low point counts
    Sine,
}

impl WaveformKind {
    /// Three-letter display name, as shown on the status panel
    pub fn label(self) -> &'static str {
        match self {
            WaveformKind::Square => "SQR",
            WaveformKind::Sawtooth => "SAW",
            WaveformKind::Sine => "SIN",
        }
    }
}

impl std::fmt::Display for WaveformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The live synthesis settings: waveform kind, frequency, duty cycle
///
/// Duty cycle applies only to [`WaveformKind::Square`] and is clamped
/// into `[DUTY_MIN, DUTY_MAX]` by every mutation path, so a stored value
/// is always usable without re-validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    /// Selected waveform
    pub kind: WaveformKind,
    /// Selected output frequency
    pub frequency: Frequency,
    duty_cycle: f32,
}

impl SynthParams {
    /// Create parameters, clamping the duty cycle into range
    pub fn new(kind: WaveformKind, frequency: Frequency, duty_cycle: f32) -> Self {
        SynthParams {
            kind,
            frequency,
            duty_cycle: duty_cycle.clamp(DUTY_MIN, DUTY_MAX),
        }
    }

    /// The stored duty cycle, always within `[DUTY_MIN, DUTY_MAX]`
    #[inline]
    pub fn duty_cycle(&self) -> f32 {
        self.duty_cycle
    }

    /// Replace the duty cycle, clamping into range
    pub fn set_duty_cycle(&mut self, duty: f32) {
        self.duty_cycle = duty.clamp(DUTY_MIN, DUTY_MAX);
    }

    /// Nudge the duty cycle by `delta`, clamping into range
    pub fn adjust_duty_cycle(&mut self, delta: f32) {
        self.set_duty_cycle(self.duty_cycle + delta);
    }
}

impl Default for SynthParams {
    /// Startup defaults: square wave, 100 Hz, 50% duty
    fn default() -> Self {
        SynthParams::new(WaveformKind::Square, Frequency::Hz100, DUTY_DEFAULT)
    }
}

/// Shared handle to the synthesis parameters
///
/// # Contract
/// - Exactly one context writes (the foreground control loop), via
///   [`SharedParams::commit`].
/// - Exactly one context reads (the tick path), via
///   [`SharedParams::snapshot`].
///
/// The lock is held only for the copy in/out, never across a DAC write
/// or a key wait, so neither context can stall the other for longer than
/// a few loads and stores. Waveform-kind changes need no extra
/// coordination: the dispatcher detects a kind/phase mismatch on its
/// next tick and resets the phase itself.
#[derive(Debug, Clone)]
pub struct SharedParams {
    inner: Arc<Mutex<SynthParams>>,
}

impl SharedParams {
    /// Wrap an initial parameter set
    pub fn new(params: SynthParams) -> Self {
        SharedParams {
            inner: Arc::new(Mutex::new(params)),
        }
    }

    /// Copy out the current parameters (reader side)
    #[inline]
    pub fn snapshot(&self) -> SynthParams {
        *self.inner.lock()
    }

    /// Apply a multi-field update atomically (writer side)
    ///
    /// The closure runs under the lock; a reader snapshot observes either
    /// the whole update or none of it.
    pub fn commit<F>(&self, update: F)
    where
        F: FnOnce(&mut SynthParams),
    {
        let mut guard = self.inner.lock();
        update(&mut guard);
    }
}

impl Default for SharedParams {
    fn default() -> Self {
        SharedParams::new(SynthParams::default())
    }
}
