//! Streaming DAC monitor
//!
//! [`StreamingDac`] is the `DacTransport` of the realtime CLI: codes are
//! converted to normalized samples and pushed through the ring buffer to
//! the audio device. Writes apply backpressure when the buffer is full,
//! which is what paces the engine to the audio clock.

use super::{RingBuffer, StreamConfig, BUFFER_BACKOFF_MICROS};
use crate::dac::{DacCode, DacTransport};
use crate::Result;
use parking_lot::Mutex;
use std::sync::Arc;

/// Playback statistics for monitoring overruns and buffer health
#[derive(Debug, Clone)]
pub struct PlaybackStats {
    /// Number of overrun events (non-blocking write hit a full buffer)
    pub overrun_count: usize,
    /// Number of samples pushed to the buffer
    pub samples_played: usize,
    /// Current buffer fill percentage
    pub fill_percentage: f32,
}

/// Ring-buffer-backed DAC transport with playback statistics
///
/// Clones share the same buffer and statistics, so the producer thread
/// can own one handle while the control loop polls another.
#[derive(Clone)]
pub struct StreamingDac {
    /// Ring buffer for sample storage
    buffer: Arc<RingBuffer>,
    /// Stream configuration
    config: StreamConfig,
    /// Playback statistics
    stats: Arc<Mutex<PlaybackStats>>,
}

impl StreamingDac {
    /// Create a monitor with the given stream configuration
    pub fn new(config: StreamConfig) -> Result<Self> {
        let buffer = Arc::new(RingBuffer::new(config.ring_buffer_size)?);

        let stats = Arc::new(Mutex::new(PlaybackStats {
            overrun_count: 0,
            samples_played: 0,
            fill_percentage: 0.0,
        }));

        Ok(StreamingDac {
            buffer,
            config,
            stats,
        })
    }

    /// Write samples, blocking until all of them are stored
    ///
    /// Backpressure from a full buffer is the pacing mechanism: the
    /// producer sleeps briefly and retries until the audio device has
    /// drained room. Returns the number of samples written (always
    /// `samples.len()` on return).
    pub fn write_blocking(&self, samples: &[f32]) -> usize {
        let mut total_written = 0;
        let mut remaining = samples;

        while !remaining.is_empty() {
            let written = self.buffer.write(remaining);

            let mut stats = self.stats.lock();
            stats.samples_played += written;
            stats.fill_percentage = self.buffer.fill_percentage();
            drop(stats);

            total_written += written;

            if written == 0 {
                std::thread::sleep(std::time::Duration::from_micros(BUFFER_BACKOFF_MICROS));
            } else {
                remaining = &remaining[written..];
            }
        }

        total_written
    }

    /// Write samples without blocking (returns the count stored)
    ///
    /// A short write counts as one overrun event in the statistics.
    pub fn write_nonblocking(&self, samples: &[f32]) -> usize {
        let written = self.buffer.write(samples);
        let fill_pct = self.buffer.fill_percentage();

        let mut stats = self.stats.lock();
        if written < samples.len() {
            stats.overrun_count += 1;
        }
        stats.samples_played += written;
        stats.fill_percentage = fill_pct;

        written
    }

    /// Number of samples that can be written without blocking
    pub fn available_write(&self) -> usize {
        self.buffer.available_write()
    }

    /// Snapshot of the current playback statistics
    pub fn get_stats(&self) -> PlaybackStats {
        self.stats.lock().clone()
    }

    /// Buffer fill percentage (0.0 to 1.0)
    pub fn fill_percentage(&self) -> f32 {
        self.buffer.fill_percentage()
    }

    /// Buffer latency in milliseconds
    pub fn latency_ms(&self) -> f32 {
        self.config.latency_ms()
    }

    /// The stream configuration
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Handle to the ring buffer for audio device integration
    pub fn buffer(&self) -> Arc<RingBuffer> {
        Arc::clone(&self.buffer)
    }
}

impl DacTransport for StreamingDac {
    /// Forward one code to the monitor, blocking on a full buffer
    fn write_sample(&mut self, code: DacCode) -> Result<()> {
        self.write_blocking(&[code.to_sample()]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::frequency::TICK_RATE_HZ;

    #[test]
    fn test_nonblocking_write_reports_overrun() {
        let mut config = StreamConfig::low_latency(TICK_RATE_HZ);
        config.ring_buffer_size = 16;
        let monitor = StreamingDac::new(config).unwrap();

        // Capacity 16 leaves 15 usable slots; 20 samples cannot fit.
        let written = monitor.write_nonblocking(&[0.0; 20]);
        assert_eq!(written, 15);

        let stats = monitor.get_stats();
        assert_eq!(stats.overrun_count, 1);
        assert_eq!(stats.samples_played, 15);
    }

    #[test]
    fn test_blocking_write_completes_once_drained() {
        let mut config = StreamConfig::low_latency(TICK_RATE_HZ);
        config.ring_buffer_size = 64;
        let monitor = StreamingDac::new(config).unwrap();
        let buffer = monitor.buffer();

        // Drain concurrently so the blocked producer can finish.
        let consumer = std::thread::spawn(move || {
            let mut drained = 0;
            let mut scratch = [0.0f32; 32];
            while drained < 100 {
                drained += buffer.read(&mut scratch);
            }
        });

        let written = monitor.write_blocking(&[0.5; 100]);
        assert_eq!(written, 100);
        consumer.join().unwrap();
    }

    #[test]
    fn test_transport_accepts_codes() {
        let mut monitor = StreamingDac::new(StreamConfig::default()).unwrap();
        monitor.write_sample(DacCode::new(2048)).unwrap();
        assert_eq!(monitor.get_stats().samples_played, 1);
    }
}
