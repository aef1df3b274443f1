//! Ring buffer between the engine pacing thread and the audio device
//!
//! Single producer (sample generation), single consumer (playback).
//! Storage is mutex-guarded with atomic position tracking for cross-
//! thread visibility; capacity is a power of two so position wrapping is
//! a mask. Memory use is fixed at `capacity * sizeof(f32)` regardless of
//! how long the instrument runs.

use crate::{FuncgenError, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Ring buffer for streaming audio samples
///
/// All methods take `&self`; one thread may write while another reads.
/// The buffer keeps one slot empty to distinguish full from empty, so
/// usable capacity is `capacity - 1`.
#[derive(Debug)]
pub struct RingBuffer {
    /// Shared sample storage
    buffer: Mutex<Vec<f32>>,
    /// Write position (producer side)
    write_pos: AtomicUsize,
    /// Read position (consumer side)
    read_pos: AtomicUsize,
    /// Capacity, always a power of two
    capacity: usize,
    /// Mask for fast wrapping: `pos & mask == pos % capacity`
    mask: usize,
}

impl RingBuffer {
    /// Create a ring buffer, rounding the capacity up to a power of two
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a zero capacity or one that would
    /// allocate more than 512 MB of samples.
    pub fn new(requested_capacity: usize) -> Result<Self> {
        if requested_capacity == 0 {
            return Err(FuncgenError::ConfigError(
                "Ring buffer capacity must be greater than 0".into(),
            ));
        }

        let capacity = requested_capacity.next_power_of_two();

        const MAX_CAPACITY: usize = 512 * 1024 * 1024 / std::mem::size_of::<f32>();
        if capacity > MAX_CAPACITY {
            return Err(FuncgenError::ConfigError(format!(
                "Ring buffer capacity {capacity} exceeds maximum safe size {MAX_CAPACITY}"
            )));
        }

        Ok(RingBuffer {
            buffer: Mutex::new(vec![0.0; capacity]),
            write_pos: AtomicUsize::new(0),
            read_pos: AtomicUsize::new(0),
            mask: capacity - 1,
            capacity,
        })
    }

    /// Number of samples ready to read
    pub fn available_read(&self) -> usize {
        let write = self.write_pos.load(Ordering::Acquire);
        let read = self.read_pos.load(Ordering::Acquire);

        if write >= read {
            write - read
        } else {
            self.capacity - (read - write)
        }
    }

    /// Number of samples that can be written without blocking
    pub fn available_write(&self) -> usize {
        self.capacity - self.available_read() - 1
    }

    /// Write samples (producer side)
    ///
    /// Returns the number of samples actually stored; 0 when the buffer
    /// is full. Never blocks.
    pub fn write(&self, samples: &[f32]) -> usize {
        let mut buf = self.buffer.lock();

        // Positions are re-read under the lock so the free-space
        // computation cannot race the consumer.
        let write_pos = self.write_pos.load(Ordering::Acquire);
        let read_pos = self.read_pos.load(Ordering::Acquire);

        let available = if write_pos >= read_pos {
            self.capacity - (write_pos - read_pos) - 1
        } else {
            (read_pos - write_pos) - 1
        };

        let to_write = samples.len().min(available);
        if to_write == 0 {
            return 0;
        }

        let write_idx = write_pos & self.mask;
        if write_idx + to_write <= self.capacity {
            buf[write_idx..write_idx + to_write].copy_from_slice(&samples[..to_write]);
        } else {
            // Wrap-around write
            let first_part = self.capacity - write_idx;
            buf[write_idx..].copy_from_slice(&samples[..first_part]);
            buf[..to_write - first_part].copy_from_slice(&samples[first_part..to_write]);
        }

        drop(buf);
        self.write_pos
            .store(write_pos + to_write, Ordering::Release);

        to_write
    }

    /// Read samples (consumer side)
    ///
    /// Returns the number of samples copied into `dest`; 0 when the
    /// buffer is empty. Never blocks.
    pub fn read(&self, dest: &mut [f32]) -> usize {
        let buf = self.buffer.lock();

        let write_pos = self.write_pos.load(Ordering::Acquire);
        let read_pos = self.read_pos.load(Ordering::Acquire);

        let available = if write_pos >= read_pos {
            write_pos - read_pos
        } else {
            self.capacity - (read_pos - write_pos)
        };

        let to_read = dest.len().min(available);
        if to_read == 0 {
            return 0;
        }

        let read_idx = read_pos & self.mask;
        if read_idx + to_read <= self.capacity {
            dest[..to_read].copy_from_slice(&buf[read_idx..read_idx + to_read]);
        } else {
            // Wrap-around read
            let first_part = self.capacity - read_idx;
            dest[..first_part].copy_from_slice(&buf[read_idx..]);
            dest[first_part..to_read].copy_from_slice(&buf[..to_read - first_part]);
        }

        drop(buf);
        self.read_pos.store(read_pos + to_read, Ordering::Release);

        to_read
    }

    /// Fraction of the buffer currently holding samples (0.0 to 1.0)
    pub fn fill_percentage(&self) -> f32 {
        (self.available_read() as f32) / (self.capacity as f32)
    }

    /// Buffer capacity after power-of-two rounding
    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether no samples are waiting
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.available_read() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_buffer_creation() {
        let rb = RingBuffer::new(1024).unwrap();
        assert_eq!(rb.capacity(), 1024);
        assert!(rb.is_empty());
    }

    #[test]
    fn test_capacity_rounds_to_power_of_two() {
        let rb = RingBuffer::new(1000).unwrap();
        assert_eq!(rb.capacity(), 1024);
    }

    #[test]
    fn test_write_and_read() {
        let rb = RingBuffer::new(16).unwrap();
        let samples = vec![0.1, 0.2, 0.3, 0.4];

        let written = rb.write(&samples);
        assert_eq!(written, 4);
        assert_eq!(rb.available_read(), 4);

        let mut dest = vec![0.0; 4];
        let read = rb.read(&mut dest);
        assert_eq!(read, 4);
        assert_eq!(dest, samples);
    }

    #[test]
    fn test_wrap_around() {
        let rb = RingBuffer::new(16).unwrap();

        let data1 = vec![1.0; 10];
        let data2 = vec![2.0; 8];

        assert_eq!(rb.write(&data1), 10);

        let mut buf = vec![0.0; 5];
        assert_eq!(rb.read(&mut buf), 5);
        assert_eq!(&buf[..], &data1[..5]);

        // This write crosses the end of the storage.
        assert!(rb.write(&data2) > 0);

        let mut buf = vec![0.0; 15];
        let read = rb.read(&mut buf);
        assert!(read > 0);
        assert_eq!(&buf[..5], &data1[5..]);
    }

    #[test]
    fn test_full_buffer_rejects_writes() {
        let rb = RingBuffer::new(8).unwrap();
        assert_eq!(rb.write(&[1.0; 7]), 7);
        assert_eq!(rb.available_write(), 0);
        assert_eq!(rb.write(&[2.0]), 0);
    }

    #[test]
    fn test_fill_percentage() {
        let rb = RingBuffer::new(128).unwrap();
        assert_eq!(rb.fill_percentage(), 0.0);

        rb.write(&vec![1.0; 64]);
        let fill = rb.fill_percentage();
        assert!(fill > 0.45 && fill < 0.55, "Fill percentage {fill}");
    }

    #[test]
    fn test_zero_capacity_error() {
        assert!(RingBuffer::new(0).is_err());
    }

    #[test]
    fn test_max_capacity_exceeded() {
        let max_plus_one = (512 * 1024 * 1024 / std::mem::size_of::<f32>()) + 1;
        assert!(RingBuffer::new(max_plus_one).is_err());
    }
}
