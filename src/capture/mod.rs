//! # Frame Capture Module
//!
//! The boundary between a camera and the preview core.
//!
//! ## Plain English
//!
//! A camera raises a "new frame!" event whenever it has a picture ready,
//! on whatever thread its driver likes. We model that as a trait: start
//! the source with a callback, and the source calls it once per frame
//! until it is stopped.

mod frame;
mod simulated;

pub use frame::{Frame, BASE_HEIGHT, BASE_WIDTH};
pub use simulated::SimulatedCamera;

use std::sync::Arc;

use thiserror::Error;

// ============================================
// COMMON INTERFACE
// ============================================

/// Callback invoked once per frame-ready event.
///
/// The frame is `None` when the device signalled an event without an
/// image; the buffer ignores those.
pub type FrameCallback = Arc<dyn Fn(Option<Frame>) + Send + Sync>;

/// Trait for anything that produces camera frames.
///
/// Real device drivers live outside this crate; they only need to
/// implement this trait to feed a preview session.
pub trait FrameSource: Send + Sync {
    /// Starts capturing frames.
    /// Frames are sent to the provided callback.
    fn start(&self, on_frame: FrameCallback) -> Result<(), SourceError>;

    /// Stops capturing frames.
    ///
    /// No callback may run once this returns, except when it is called
    /// from inside the callback itself.
    fn stop(&self);

    /// Returns whether capture is currently active.
    fn is_active(&self) -> bool;

    /// Returns the name of this capture source (for logging/UI).
    fn source_name(&self) -> &'static str;
}

/// Errors that can occur while starting a capture source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Capture already running
    #[error("capture already running")]
    AlreadyRunning,

    /// The device or its worker thread couldn't be started
    #[error("initialization failed: {0}")]
    InitFailed(String),
}

// ============================================
// TESTS
// ============================================
