//! Keypad-driven DAC function generator
//!
//! A software rendition of a classic bench function generator: a digitally
//! controlled oscillator that emits one 12-bit DAC code per fixed-period
//! timer tick, synthesizing a square, sawtooth, or approximate sine wave.
//! Frequency and duty cycle are adjusted live from keypad events, and the
//! current settings are formatted as a two-line character-display panel.
//!
//! # Features
//! - Per-tick waveform synthesis at a fixed 27 kHz tick rate
//! - Five selectable output frequencies (100-500 Hz)
//! - Duty-cycle control for the square wave (10%-90%, cycle-latched)
//! - Trigonometric-free sine synthesis (Bhaskara I's approximation)
//! - 4x3 matrix keypad scan decoding
//! - WAV and CSV capture export for offline waveform inspection
//! - Optional real-time audio monitoring of the DAC output
//!
//! # Crate feature flags
//! - `streaming` (opt-in): Real-time audio monitoring of the generated
//!   waveform (enables optional `rodio` dep)
//!
//! # Quick start
//! ## Core engine only
//! ```
//! use funcgen::{Dco, Frequency, SharedParams, SynthParams, WaveformKind};
//!
//! let params = SharedParams::new(SynthParams::default());
//! let mut dco = Dco::new(params.clone());
//!
//! // One timer tick: advance phase, emit the next DAC code.
//! dco.clock();
//! let code = dco.last_code();
//! assert!(code.get() <= 4095);
//!
//! // Live parameter change from the control loop.
//! params.commit(|p| {
//!     p.kind = WaveformKind::Sine;
//!     p.frequency = Frequency::Hz500;
//! });
//! dco.clock();
//! ```
//!
//! ## Real-time monitoring
//! ```no_run
//! # #[cfg(feature = "streaming")]
//! # {
//! use funcgen::streaming::{AudioDevice, StreamConfig, StreamingDac};
//! use funcgen::{Dco, SharedParams, SynthParams};
//!
//! let cfg = StreamConfig::default();
//! let monitor = StreamingDac::new(cfg).unwrap();
//! let _dev = AudioDevice::new(cfg.sample_rate, cfg.channels, monitor.buffer()).unwrap();
//! let mut dco = Dco::new(SharedParams::new(SynthParams::default()));
//! // push samples into the monitor in a loop
//! # }
//! ```

#![warn(missing_docs)]

// Domain modules
pub mod dac; // DAC codes and the transport seam
pub mod export; // Waveform capture (WAV/CSV)
pub mod keypad; // Key symbols & matrix scan decoding
pub mod panel; // Two-line status display formatting
pub mod synth; // Waveform synthesis engine (core)

#[cfg(feature = "streaming")]
pub mod streaming; // Audio output & streaming

/// Error types for function-generator operations
#[derive(thiserror::Error, Debug)]
pub enum FuncgenError {
    /// IO error from filesystem or device
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Audio device error
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Error writing a capture file
    #[error("Export error: {0}")]
    ExportError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for FuncgenError {
    /// Converts a String into `FuncgenError::Other`.
    ///
    /// This is a convenience conversion for generic string errors; it loses
    /// semantic information about the error type. Prefer the specific
    /// variant constructors (`ConfigError`, `AudioDeviceError`,
    /// `ExportError`) where the failure class is known.
    fn from(msg: String) -> Self {
        FuncgenError::Other(msg)
    }
}

impl From<&str> for FuncgenError {
    /// Converts a string slice into `FuncgenError::Other`.
    ///
    /// See [`From<String>`] for guidance on when to use explicit variant
    /// constructors instead.
    fn from(msg: &str) -> Self {
        FuncgenError::Other(msg.to_string())
    }
}

/// Result type for function-generator operations
pub type Result<T> = std::result::Result<T, FuncgenError>;

// Public API exports
pub use dac::{CodeSink, DacCode, DacTransport, DiscardDac};
pub use keypad::{apply_key, Key};
pub use synth::frequency::{Frequency, TICK_RATE_HZ};
pub use synth::params::{SharedParams, SynthParams, WaveformKind};
pub use synth::Dco;

#[cfg(feature = "streaming")]
pub use streaming::{AudioDevice, PlaybackStats, RingBuffer, StreamConfig, StreamingDac};
