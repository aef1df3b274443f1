//! Waveform synthesis engine
//!
//! The digitally controlled oscillator ([`Dco`]) is the tick dispatcher:
//! it is invoked once per fixed-period timer tick, snapshots the shared
//! parameters, steps the phase state of the selected waveform, and
//! latches the resulting DAC code. The dispatcher itself is stateless
//! beyond the phase it carries; "reset on kind change" is the only
//! externally triggered transition.

pub mod frequency;
pub mod params;
mod wave;

pub use wave::bhaskara_sin;

use crate::dac::{DacCode, DacTransport};
use crate::synth::params::SharedParams;
use crate::synth::wave::WavePhase;
use crate::Result;

/// The digitally controlled oscillator
///
/// Owns a reader handle to the shared parameters and the phase state of
/// the currently selected waveform. Drive it by calling [`Dco::clock`]
/// once per timer tick (or one of the batch helpers); the emitted code
/// is available from [`Dco::last_code`] or forwarded directly with
/// [`Dco::run_tick`].
///
/// A waveform-kind change committed by the control loop is picked up
/// lazily: the next `clock` notices that the snapshot kind differs from
/// the phase's owning kind and installs a fresh phase before stepping,
/// so stale state from the previous waveform never reaches the output.
/// Committing the same kind again is a no-op and does not reset phase.
#[derive(Debug)]
pub struct Dco {
    params: SharedParams,
    phase: WavePhase,
    last_code: DacCode,
    ticks: u64,
}

impl Dco {
    /// Create an oscillator reading from the given parameter handle
    pub fn new(params: SharedParams) -> Self {
        let snapshot = params.snapshot();
        Dco {
            params,
            phase: WavePhase::for_kind(&snapshot),
            last_code: DacCode::default(),
            ticks: 0,
        }
    }

    /// Advance the oscillator by one timer tick
    ///
    /// Snapshots the shared parameters, resets the phase if the waveform
    /// kind changed since the last tick, steps the selected generator,
    /// and latches the new DAC code.
    pub fn clock(&mut self) {
        let snapshot = self.params.snapshot();
        if snapshot.kind != self.phase.kind() {
            self.phase = WavePhase::for_kind(&snapshot);
        }
        self.last_code = self.phase.step(&snapshot);
        self.ticks += 1;
    }

    /// The code latched by the most recent tick
    #[inline]
    pub fn last_code(&self) -> DacCode {
        self.last_code
    }

    /// Total ticks executed since creation
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Clone of the parameter handle (for handing to a control loop)
    pub fn params(&self) -> SharedParams {
        self.params.clone()
    }

    /// One full tick: advance and forward the code to the transport
    ///
    /// Transport failure is returned as-is; a failed write leaves the
    /// physical output undefined, so callers end the run rather than
    /// retry (a retry would desynchronize the tick timing).
    pub fn run_tick<D: DacTransport>(&mut self, dac: &mut D) -> Result<()> {
        self.clock();
        dac.write_sample(self.last_code)
    }

    /// Generate `count` consecutive DAC codes
    pub fn generate_codes(&mut self, count: usize) -> Vec<DacCode> {
        let mut codes = Vec::with_capacity(count);
        for _ in 0..count {
            self.clock();
            codes.push(self.last_code);
        }
        codes
    }

    /// Fill a buffer with normalized audio samples, one tick per slot
    ///
    /// This avoids per-call allocations; prefer it in the streaming hot
    /// path.
    pub fn fill_samples(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            self.clock();
            *sample = self.last_code.to_sample();
        }
    }
}
