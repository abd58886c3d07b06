//! # Frame Buffer Module
//!
//! This module provides the circular (ring) buffer between the camera and
//! the display.
//!
//! ## Plain English Explanation
//!
//! The camera and the screen run at different speeds. The camera drops
//! each new picture into the next slot of a circular rack; the screen
//! always grabs the picture that went in most recently. Neither side ever
//! waits for the other.
//!
//! Every slot starts out holding a plain white 640×480 picture, so the
//! screen always has *something* to show, even before the first frame.

mod ring_buffer;

pub use ring_buffer::RingBuffer;

use std::num::NonZeroUsize;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::capture::Frame;
use crate::config::{ConfigError, ScaleSettings};
use crate::error::PreviewResult;
use crate::resample;

// ============================================
// FRAME RING BUFFER
// Thread-safe ring of shared frames
// ============================================

/// A thread-safe ring of frames shared between a producer and a consumer.
///
/// ## How Concurrency Works
///
/// Slots hold `Arc<Frame>`. A push builds (and, if enabled, resamples)
/// the new frame BEFORE taking the lock, then only swaps a pointer and
/// moves the cursor while holding it. A pop clones the newest pointer
/// under a read lock. So a reader sees either the old frame or the new
/// one, never half of each, and a frame it got earlier stays readable
/// after its slot is reused.
pub struct FrameRingBuffer {
    /// Slots and write cursor, protected by a read-write lock
    inner: RwLock<RingBuffer<Arc<Frame>>>,

    /// Scaling knobs, read fresh on every push
    settings: Arc<ScaleSettings>,
}

impl FrameRingBuffer {
    /// Creates a buffer of `capacity` blank slots.
    ///
    /// ## Parameters
    /// - `capacity`: Number of slots (must be at least 1)
    /// - `settings`: Shared scale settings consulted by `push`
    pub fn new(capacity: usize, settings: Arc<ScaleSettings>) -> PreviewResult<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or(ConfigError::ZeroCapacity)?;

        // One placeholder shared by every slot: frames are never mutated.
        let placeholder = Arc::new(Frame::blank());

        Ok(Self {
            inner: RwLock::new(RingBuffer::filled(capacity, placeholder)),
            settings,
        })
    }

    /// Creates a buffer with its own scale settings (divisors of 1).
    pub fn with_scaling(capacity: usize, enable_scaling: bool) -> PreviewResult<Self> {
        Self::new(capacity, Arc::new(ScaleSettings::new(enable_scaling)))
    }

    /// Adds a new frame to the buffer
    ///
    /// ## What Happens (Plain English)
    ///
    /// 1. No frame? Nothing happens.
    /// 2. If scaling is on, read the CURRENT divisors and resize the frame
    ///    to `640 / scale_x × 480 / scale_y`.
    /// 3. Put the result in the slot under the cursor and move the cursor.
    ///
    /// A zero divisor rejects the push before any pixel work; the buffer
    /// is left exactly as it was.
    pub fn push(&self, frame: Option<Frame>) -> PreviewResult<()> {
        let Some(frame) = frame else {
            return Ok(());
        };

        let scale = self.settings.snapshot();
        let frame = if scale.enabled {
            let (width, height) = scale.target_size()?;
            resample::resample(&frame, width, height, scale.strategy)?
        } else {
            frame
        };

        self.inner.write().push(Arc::new(frame));
        Ok(())
    }

    /// Returns the most recently pushed frame.
    ///
    /// Before any push this is the white placeholder. Calling it again
    /// without a push in between returns the same frame.
    pub fn pop(&self) -> Arc<Frame> {
        Arc::clone(self.inner.read().latest())
    }

    /// Index of the slot the next push will write.
    pub fn current_index(&self) -> usize {
        self.inner.read().current_index()
    }

    /// Returns the number of slots
    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    /// The scale settings this buffer reads on every push
    pub fn settings(&self) -> &Arc<ScaleSettings> {
        &self.settings
    }

    /// Takes a snapshot of every slot, oldest write first
    ///
    /// Slots never written still hold the placeholder.
    pub fn snapshot(&self) -> Vec<Arc<Frame>> {
        self.inner.read().iter().cloned().collect()
    }
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PreviewError;
    use crate::resample::ResampleStrategy;
    use std::thread;

    // Helper to create a small solid frame whose colour encodes `id`
    fn dummy_frame(id: u8) -> Frame {
        Frame::filled(4, 3, [id, id.wrapping_mul(3), 255 - id]).unwrap()
    }

    #[test]
    fn test_buffer_creation() {
        let buffer = FrameRingBuffer::with_scaling(8, false).unwrap();

        assert_eq!(buffer.capacity(), 8);
        assert_eq!(buffer.current_index(), 0);

        let first = buffer.pop();
        assert_eq!(*first, Frame::blank());
        assert_eq!(buffer.snapshot().len(), 8);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        match FrameRingBuffer::with_scaling(0, false) {
            Err(PreviewError::InvalidConfiguration(ConfigError::ZeroCapacity)) => {}
            Err(other) => panic!("Expected ZeroCapacity, got {:?}", other),
            Ok(_) => panic!("Zero-capacity buffer was created"),
        }
    }

    #[test]
    fn test_push_and_pop() {
        let buffer = FrameRingBuffer::with_scaling(5, false).unwrap();

        for i in 0..5 {
            buffer.push(Some(dummy_frame(i))).unwrap();
            assert_eq!(*buffer.pop(), dummy_frame(i));
            assert_eq!(buffer.current_index(), (i as usize + 1) % 5);
        }
    }

    #[test]
    fn test_wraparound() {
        let buffer = FrameRingBuffer::with_scaling(3, false).unwrap();

        // Add 4 frames (1 more than capacity)
        for i in 1..=4 {
            buffer.push(Some(dummy_frame(i))).unwrap();
        }

        assert_eq!(*buffer.pop(), dummy_frame(4));
        assert_eq!(buffer.current_index(), 1);

        let snapshot: Vec<Frame> = buffer.snapshot().iter().map(|f| (**f).clone()).collect();
        assert_eq!(snapshot, vec![dummy_frame(2), dummy_frame(3), dummy_frame(4)]);
        // Frame 1 has been overwritten
        assert!(!snapshot.contains(&dummy_frame(1)));
    }

    #[test]
    fn test_pop_is_idempotent() {
        let buffer = FrameRingBuffer::with_scaling(4, false).unwrap();
        buffer.push(Some(dummy_frame(9))).unwrap();

        let a = buffer.pop();
        let b = buffer.pop();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(buffer.current_index(), 1);
    }

    #[test]
    fn test_popped_frame_survives_overwrite() {
        let buffer = FrameRingBuffer::with_scaling(1, false).unwrap();
        buffer.push(Some(dummy_frame(1))).unwrap();
        let held = buffer.pop();

        buffer.push(Some(dummy_frame(2))).unwrap();

        assert_eq!(*held, dummy_frame(1));
        assert_eq!(*buffer.pop(), dummy_frame(2));
    }

    #[test]
    fn test_null_push_ignored() {
        let buffer = FrameRingBuffer::with_scaling(4, false).unwrap();
        buffer.push(Some(dummy_frame(1))).unwrap();
        let before = buffer.snapshot();

        buffer.push(None).unwrap();

        assert_eq!(buffer.current_index(), 1);
        let after = buffer.snapshot();
        assert!(before.iter().zip(&after).all(|(a, b)| Arc::ptr_eq(a, b)));
    }

    #[test]
    fn test_scaling_on_push() {
        let settings = Arc::new(ScaleSettings::new(true));
        settings.set_divisors(2, 4);
        let buffer = FrameRingBuffer::new(2, Arc::clone(&settings)).unwrap();

        buffer.push(Some(Frame::filled(640, 480, [9, 9, 9]).unwrap())).unwrap();
        assert_eq!(buffer.pop().dimensions(), (320, 120));

        // Latest config wins on the very next push
        settings.set_divisors(4, 4);
        settings.set_strategy(ResampleStrategy::Nearest);
        buffer.push(Some(dummy_frame(1))).unwrap();
        assert_eq!(buffer.pop().dimensions(), (160, 120));

        // Disabled: stored as-is
        settings.set_enabled(false);
        buffer.push(Some(dummy_frame(2))).unwrap();
        assert_eq!(*buffer.pop(), dummy_frame(2));
    }

    #[test]
    fn test_zero_divisor_rejected() {
        let buffer = FrameRingBuffer::with_scaling(3, true).unwrap();
        buffer.settings().set_divisors(0, 2);

        let result = buffer.push(Some(dummy_frame(1)));

        assert!(matches!(
            result,
            Err(PreviewError::InvalidConfiguration(ConfigError::ZeroDivisor { .. }))
        ));
        assert_eq!(buffer.current_index(), 0);
        assert_eq!(*buffer.pop(), Frame::blank());
    }

    #[test]
    fn test_concurrent_push_pop_never_torn() {
        let buffer = Arc::new(FrameRingBuffer::with_scaling(4, false).unwrap());

        let producer = {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                for i in 0..500u32 {
                    let shade = (i % 256) as u8;
                    let frame = Frame::filled(32, 24, [shade, shade, shade]).unwrap();
                    buffer.push(Some(frame)).unwrap();
                }
            })
        };

        for _ in 0..2000 {
            let frame = buffer.pop();
            let first = frame.as_raw()[0];
            assert!(frame.as_raw().iter().all(|&b| b == first));
        }

        producer.join().unwrap();
        assert_eq!(buffer.current_index(), 500 % 4);
        let last = (499 % 256) as u8;
        assert_eq!(buffer.pop().pixel(0, 0), [last; 3]);
    }
}
