//! # Display Loop Module
//!
//! A background thread that keeps handing the newest frame to the
//! renderer.
//!
//! ## Plain English
//!
//! The screen side doesn't get told when a new picture arrives. Instead it
//! keeps looking at the buffer ("anything new? anything new?") and, when
//! the newest picture changed, passes it to whoever draws it. Asking it to
//! stop takes effect between two looks; the thread is never killed.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{Sender, TrySendError};

use crate::buffer::FrameRingBuffer;
use crate::capture::Frame;
use crate::error::PreviewResult;

// ============================================
// DISPLAY LOOP
// ============================================

/// Handle to a running display loop.
///
/// Dropping the handle stops the loop and waits for the thread.
pub struct DisplayLoop {
    /// Cleared to ask the loop to stop
    running: Arc<AtomicBool>,

    /// Counters shared with the loop thread
    counters: Arc<Counters>,

    handle: Option<JoinHandle<()>>,
}

#[derive(Debug, Default)]
struct Counters {
    presented: AtomicU64,
    dropped: AtomicU64,
}

/// Statistics about what the display loop delivered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DisplayStats {
    /// Frames handed to the renderer
    pub frames_presented: u64,
    /// New frames the renderer never got because it was still busy
    pub frames_dropped: u64,
}

impl DisplayLoop {
    /// Starts polling `buffer` on a background thread.
    ///
    /// ## Parameters
    /// - `buffer`: Where frames come from
    /// - `sender`: Channel to the renderer; the loop never blocks on it
    /// - `interval`: Sleep between iterations, `None` to busy-poll
    pub fn spawn(
        buffer: Arc<FrameRingBuffer>,
        sender: Sender<Arc<Frame>>,
        interval: Option<Duration>,
    ) -> PreviewResult<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let counters = Arc::new(Counters::default());

        let handle = {
            let running = Arc::clone(&running);
            let counters = Arc::clone(&counters);
            thread::Builder::new()
                .name("preview-display".into())
                .spawn(move || run(&buffer, &sender, interval, &running, &counters))?
        };

        log::info!("Display loop started (interval: {:?})", interval);

        Ok(Self {
            running,
            counters,
            handle: Some(handle),
        })
    }

    /// Asks the loop to stop and waits for it to finish its iteration.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Display loop thread panicked");
            }
            let stats = self.stats();
            log::info!(
                "Display loop stopped: {} presented, {} dropped",
                stats.frames_presented,
                stats.frames_dropped
            );
        }
    }

    /// Returns whether the loop thread is still going.
    ///
    /// False after `stop`, or once the renderer hung up.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Returns a copy of the counters.
    pub fn stats(&self) -> DisplayStats {
        DisplayStats {
            frames_presented: self.counters.presented.load(Ordering::Relaxed),
            frames_dropped: self.counters.dropped.load(Ordering::Relaxed),
        }
    }
}

impl Drop for DisplayLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The loop body.
fn run(
    buffer: &FrameRingBuffer,
    sender: &Sender<Arc<Frame>>,
    interval: Option<Duration>,
    running: &AtomicBool,
    counters: &Counters,
) {
    let mut last: Option<Arc<Frame>> = None;
    // Refused by a busy renderer and not delivered yet
    let mut pending: Option<Arc<Frame>> = None;

    while running.load(Ordering::SeqCst) {
        let frame = buffer.pop();

        let unchanged = last.as_ref().is_some_and(|prev| Arc::ptr_eq(prev, &frame));
        if !unchanged {
            match sender.try_send(Arc::clone(&frame)) {
                Ok(()) => {
                    counters.presented.fetch_add(1, Ordering::Relaxed);
                    pending = None;
                    last = Some(frame);
                }
                // Renderer still busy: leave `last` alone so the frame is
                // offered again next time round. It only counts as dropped
                // once a newer frame replaces it.
                Err(TrySendError::Full(_)) => {
                    let superseded = pending
                        .as_ref()
                        .is_some_and(|waiting| !Arc::ptr_eq(waiting, &frame));
                    if superseded {
                        counters.dropped.fetch_add(1, Ordering::Relaxed);
                    }
                    pending = Some(frame);
                }
                Err(TrySendError::Disconnected(_)) => {
                    log::warn!("Renderer disconnected, ending display loop");
                    running.store(false, Ordering::SeqCst);
                    break;
                }
            }
        }

        match interval {
            Some(pause) => thread::sleep(pause),
            None => thread::yield_now(),
        }
    }

    // Still waiting when the loop ended: never shown
    if pending.is_some() {
        counters.dropped.fetch_add(1, Ordering::Relaxed);
    }
}

// ============================================
// TESTS
// ============================================
