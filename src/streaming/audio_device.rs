//! Audio device integration using rodio
//!
//! Plays the monitored DAC samples from the ring buffer on the system
//! audio device. Underruns produce silence rather than ending the
//! stream, since a live instrument keeps running even when the producer
//! momentarily falls behind.

use super::RingBuffer;
use crate::Result;
use rodio::{OutputStream, Sink, Source};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Audio source that reads from the ring buffer
struct RingBufferSource {
    ring_buffer: Arc<RingBuffer>,
    sample_rate: u32,
    channels: u16,
    finished: Arc<AtomicBool>,
    /// Internal buffer for batch reads (reduces lock contention)
    buffer: Vec<f32>,
    /// Current position in the internal buffer
    buffer_pos: usize,
}

impl RingBufferSource {
    fn new(
        ring_buffer: Arc<RingBuffer>,
        sample_rate: u32,
        channels: u16,
        finished: Arc<AtomicBool>,
    ) -> Self {
        RingBufferSource {
            ring_buffer,
            sample_rate,
            channels,
            finished,
            buffer: vec![0.0f32; 1024],
            buffer_pos: 1024, // Start by reading a fresh batch
        }
    }
}

impl Source for RingBufferSource {
    fn current_frame_len(&self) -> Option<usize> {
        let available = self.ring_buffer.available_read();
        if available > 0 {
            Some(available)
        } else {
            Some(1024) // Reasonable chunk size while idle
        }
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        // Open-ended stream
        None
    }
}

impl Iterator for RingBufferSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.finished.load(Ordering::Relaxed) {
            return None;
        }

        if self.buffer_pos >= self.buffer.len() {
            let read = self.ring_buffer.read(&mut self.buffer);
            self.buffer_pos = 0;
            if read == 0 {
                // Underrun: feed silence to keep the stream alive.
                self.buffer.fill(0.0);
            } else if read < self.buffer.len() {
                self.buffer[read..].fill(0.0);
            }
        }

        let sample = self.buffer[self.buffer_pos];
        self.buffer_pos += 1;
        Some(sample)
    }
}

/// Audio playback device using rodio
pub struct AudioDevice {
    _stream: OutputStream,
    _sink: Sink,
    running: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

impl AudioDevice {
    /// Create an audio device and start playing from the ring buffer
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz (normally the engine tick rate)
    /// * `channels` - Number of audio channels (1 for the mono DAC line)
    /// * `ring_buffer` - Buffer the monitor writes generated samples into
    pub fn new(sample_rate: u32, channels: u16, ring_buffer: Arc<RingBuffer>) -> Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| format!("Failed to create audio stream: {e}"))?;

        let sink =
            Sink::try_new(&stream_handle).map_err(|e| format!("Failed to create audio sink: {e}"))?;

        let finished = Arc::new(AtomicBool::new(false));
        let source =
            RingBufferSource::new(ring_buffer, sample_rate, channels, Arc::clone(&finished));
        sink.append(source);

        let running = Arc::new(AtomicBool::new(true));

        Ok(AudioDevice {
            _stream: stream,
            _sink: sink,
            running,
            finished,
        })
    }

    /// Pause playback
    pub fn pause(&self) {
        self._sink.pause();
    }

    /// Resume playback
    pub fn play(&self) {
        self._sink.play();
    }

    /// Check if the device is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Signal that no more samples will be produced
    ///
    /// Lets the playback stream terminate instead of playing silence
    /// forever.
    pub fn finish(&self) {
        self.finished.store(true, Ordering::Relaxed);
    }
}

impl Drop for AudioDevice {
    fn drop(&mut self) {
        self.pause();
        self.running.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn try_audio_device(
        buffer_len: usize,
        sample_rate: u32,
        channels: u16,
    ) -> Option<(AudioDevice, Arc<RingBuffer>)> {
        let ring_buffer = Arc::new(RingBuffer::new(buffer_len).expect("Failed to create ring buffer"));

        match AudioDevice::new(sample_rate, channels, Arc::clone(&ring_buffer)) {
            Ok(device) => Some((device, ring_buffer)),
            Err(err) => {
                eprintln!("Skipping audio_device test (audio backend unavailable): {err}");
                None
            }
        }
    }

    #[test]
    fn test_audio_device_creation() {
        let Some((device, _ring)) = try_audio_device(4096, 27_000, 1) else {
            return;
        };
        assert!(device.is_running());
    }

    #[test]
    fn test_finish_signal_stops_source() {
        let ring_buffer = Arc::new(RingBuffer::new(1024).unwrap());
        let finished = Arc::new(AtomicBool::new(false));
        let mut source =
            RingBufferSource::new(Arc::clone(&ring_buffer), 27_000, 1, Arc::clone(&finished));

        assert!(source.next().is_some());
        finished.store(true, Ordering::Relaxed);
        assert_eq!(source.next(), None);
    }

    #[test]
    fn test_source_returns_silence_on_underrun() {
        let ring_buffer = Arc::new(RingBuffer::new(1024).unwrap());
        let finished = Arc::new(AtomicBool::new(false));
        let mut source = RingBufferSource::new(ring_buffer, 27_000, 1, finished);

        // Empty buffer: the stream keeps running on silence.
        assert_eq!(source.next(), Some(0.0));
    }

    #[test]
    fn test_source_reports_stream_parameters() {
        let ring_buffer = Arc::new(RingBuffer::new(1024).unwrap());
        let finished = Arc::new(AtomicBool::new(false));
        let source = RingBufferSource::new(ring_buffer, 27_000, 1, finished);

        assert_eq!(source.sample_rate(), 27_000);
        assert_eq!(source.channels(), 1);
        assert!(source.current_frame_len().is_some());
    }
}
