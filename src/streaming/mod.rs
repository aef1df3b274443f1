//! Real-time audio monitoring of the DAC output
//!
//! The generated code stream doubles as an audio signal: each 12-bit
//! code maps to a normalized sample around the DC bias. This module
//! carries those samples from the producer (the engine pacing thread)
//! to the system audio device through a ring buffer, so generation and
//! playback run concurrently with fixed memory use.

pub mod audio_device;
pub mod monitor;
pub mod ring_buffer;

pub use audio_device::AudioDevice;
pub use monitor::{PlaybackStats, StreamingDac};
pub use ring_buffer::RingBuffer;

use crate::synth::frequency::TICK_RATE_HZ;

/// Producer backoff when the ring buffer is full, in microseconds
pub const BUFFER_BACKOFF_MICROS: u64 = 100;

/// Configuration for streaming playback
#[derive(Debug, Clone, Copy)]
pub struct StreamConfig {
    /// Size of the ring buffer (in samples)
    /// Larger buffers = more latency but less chance of underrun
    pub ring_buffer_size: usize,

    /// Sample rate in Hz (normally the engine tick rate)
    pub sample_rate: u32,

    /// Number of audio channels
    pub channels: u16,
}

impl StreamConfig {
    /// Configuration optimized for low latency
    /// Buffer = 4096 samples, about 152 ms at the 27 kHz tick rate
    pub fn low_latency(sample_rate: u32) -> Self {
        StreamConfig {
            ring_buffer_size: 4096,
            sample_rate,
            channels: 1,
        }
    }

    /// Configuration optimized for stability
    /// Buffer = 16384 samples, about 607 ms at the 27 kHz tick rate
    pub fn stable(sample_rate: u32) -> Self {
        StreamConfig {
            ring_buffer_size: 16384,
            sample_rate,
            channels: 1,
        }
    }

    /// Get latency in milliseconds
    pub fn latency_ms(&self) -> f32 {
        ((self.ring_buffer_size as f32) / (self.sample_rate as f32)) * 1000.0
    }
}

impl Default for StreamConfig {
    /// Low-latency monitoring at the engine tick rate
    ///
    /// A live instrument wants key presses audible promptly, so the
    /// default trades underrun headroom for responsiveness.
    fn default() -> Self {
        Self::low_latency(TICK_RATE_HZ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_config_latency() {
        let config = StreamConfig::low_latency(TICK_RATE_HZ);
        let latency = config.latency_ms();
        assert!(latency > 150.0 && latency < 153.0);
    }

    #[test]
    fn test_default_runs_at_tick_rate() {
        let config = StreamConfig::default();
        assert_eq!(config.sample_rate, TICK_RATE_HZ);
        assert_eq!(config.channels, 1);
    }
}
