//! # Ring Buffer Implementation
//!
//! A fixed number of slots and a write cursor that wraps around.
//!
//! ## Plain English
//!
//! Picture a circular track with numbered parking spots, every spot
//! already occupied by a placeholder car. Each new car parks in the spot
//! under the arrow, the old occupant is towed away, and the arrow moves
//! one spot forward (back to spot 0 after the last one).

use std::num::NonZeroUsize;

/// A fixed-capacity ring of always-populated slots.
///
/// ## Properties
/// - Fixed capacity (doesn't grow)
/// - Every slot holds a value from construction on
/// - O(1) push, overwriting the oldest slot
#[derive(Debug)]
pub struct RingBuffer<T> {
    /// The slots, exactly `capacity` of them
    slots: Vec<T>,

    /// Slot that receives the next push
    write_index: usize,
}

impl<T: Clone> RingBuffer<T> {
    /// Creates a ring with every slot set to `placeholder`.
    ///
    /// ## Example
    /// ```
    /// # use std::num::NonZeroUsize;
    /// # use camera_preview::buffer::RingBuffer;
    /// let ring = RingBuffer::filled(NonZeroUsize::new(3).unwrap(), 0);
    /// assert_eq!(ring.capacity(), 3);
    /// assert_eq!(ring.current_index(), 0);
    /// ```
    pub fn filled(capacity: NonZeroUsize, placeholder: T) -> Self {
        Self {
            slots: vec![placeholder; capacity.get()],
            write_index: 0,
        }
    }
}

impl<T> RingBuffer<T> {
    /// Stores `item` under the cursor and advances the cursor.
    ///
    /// Returns the value that was displaced.
    pub fn push(&mut self, item: T) -> T {
        let displaced = std::mem::replace(&mut self.slots[self.write_index], item);
        self.write_index = (self.write_index + 1) % self.slots.len();
        displaced
    }

    /// The most recently written slot (a placeholder before any push).
    pub fn latest(&self) -> &T {
        let capacity = self.slots.len();
        &self.slots[(self.write_index + capacity - 1) % capacity]
    }

    /// Index of the slot that receives the next push.
    pub fn current_index(&self) -> usize {
        self.write_index
    }

    /// Returns the maximum capacity.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns an iterator over all slots (oldest write to newest).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (newer, older) = self.slots.split_at(self.write_index);
        older.iter().chain(newer.iter())
    }
}

// ============================================
// TESTS
// ============================================
