//! # Camera Preview
//!
//! The core of a live camera preview: captured frames go into a ring
//! buffer (optionally shrunk on the way in) and a display loop keeps
//! showing the newest one.
//!
//! ## Architecture Overview
//!
//! The crate is structured into independent modules:
//!
//! - `buffer`: Ring buffer of frames shared by camera and display
//! - `resample`: Nearest-neighbour and bilinear resizing
//! - `capture`: Frame type and the camera source interface
//! - `display`: Background loop feeding the renderer
//! - `config`: Session configuration and live scale settings
//! - `error`: Error types

// ============================================
// MODULE DECLARATIONS
// ============================================

pub mod buffer;
pub mod capture;
pub mod config;
pub mod display;
pub mod error;
pub mod resample;

// ============================================
// RE-EXPORTS
// ============================================

pub use buffer::FrameRingBuffer;
pub use capture::{Frame, FrameSource, SimulatedCamera};
pub use config::{Config, ScaleSettings};
pub use display::{DisplayLoop, DisplayStats};
pub use error::{PreviewError, PreviewResult};
pub use resample::ResampleStrategy;

// ============================================
// IMPORTS
// ============================================

use std::sync::Arc;

use crossbeam::channel::{self, Receiver};
use log::{info, warn};
use parking_lot::Mutex;

// ============================================
// PREVIEW SESSION
// ============================================

/// One camera preview session.
///
/// ## Plain English
///
/// This is the "control center" for one camera connection:
/// - Receives captured frames and stores them
/// - Runs the loop that hands the newest frame to the screen
/// - Lets the UI change the scale factor on the fly
pub struct CameraPreview {
    /// The circular buffer storing recent frames
    buffer: Arc<FrameRingBuffer>,

    /// Scale settings the buffer reads on every push
    scale: Arc<ScaleSettings>,

    /// Session configuration
    config: Config,

    /// The running display loop, if any
    display: Mutex<Option<DisplayLoop>>,

    /// Statistics about operation
    stats: Arc<Mutex<PreviewStats>>,
}

/// Runtime statistics for monitoring
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PreviewStats {
    /// Frame events received from the camera
    pub frames_received: u64,
    /// Events that carried no frame
    pub frames_ignored: u64,
    /// Frames the buffer refused (bad scale configuration)
    pub frames_rejected: u64,
}

impl CameraPreview {
    /// Creates a new session with default configuration.
    pub fn new() -> PreviewResult<Self> {
        Self::with_config(Config::default())
    }

    /// Creates a new session with custom configuration.
    ///
    /// ## Returns
    /// A new `CameraPreview` or the first configuration problem found
    pub fn with_config(config: Config) -> PreviewResult<Self> {
        if let Some(problem) = config.validate().into_iter().next() {
            return Err(problem.into());
        }

        info!(
            "Initializing camera preview: {} slots, scaling {} (factor {}, {:?})",
            config.buffer_capacity,
            if config.scaling_enabled { "on" } else { "off" },
            config.scale_factor,
            config.strategy
        );

        let scale = Arc::new(ScaleSettings::from_config(&config));
        let buffer = Arc::new(FrameRingBuffer::new(
            config.buffer_capacity,
            Arc::clone(&scale),
        )?);

        Ok(Self {
            buffer,
            scale,
            config,
            display: Mutex::new(None),
            stats: Arc::new(Mutex::new(PreviewStats::default())),
        })
    }

    /// Called on every frame-ready event from the camera.
    ///
    /// Rejected frames are logged and counted; the session carries on
    /// with the next one.
    pub fn on_frame_captured(&self, frame: Option<Frame>) {
        Self::store_frame(&self.buffer, &self.stats, frame);
    }

    fn store_frame(buffer: &FrameRingBuffer, stats: &Mutex<PreviewStats>, frame: Option<Frame>) {
        let present = frame.is_some();
        let result = buffer.push(frame);

        let mut stats = stats.lock();
        stats.frames_received += 1;
        if !present {
            stats.frames_ignored += 1;
        }
        if let Err(e) = result {
            stats.frames_rejected += 1;
            warn!("Frame rejected: {}", e);
        }
    }

    /// Starts `source`, feeding every frame it produces into this session.
    pub fn attach_source(&self, source: &dyn FrameSource) -> PreviewResult<()> {
        let buffer = Arc::clone(&self.buffer);
        let stats = Arc::clone(&self.stats);

        source.start(Arc::new(move |frame: Option<Frame>| {
            Self::store_frame(&buffer, &stats, frame)
        }))?;

        info!("Capture source attached: {}", source.source_name());
        Ok(())
    }

    /// Starts the display loop.
    ///
    /// ## Returns
    /// The channel the renderer reads frames from
    pub fn start_display(&self) -> PreviewResult<Receiver<Arc<Frame>>> {
        let mut display = self.display.lock();
        if matches!(&*display, Some(running) if running.is_running()) {
            return Err(PreviewError::DisplayAlreadyRunning);
        }

        let (sender, receiver) = channel::bounded(self.config.display_queue_depth);
        *display = Some(DisplayLoop::spawn(
            Arc::clone(&self.buffer),
            sender,
            self.config.display_interval(),
        )?);

        Ok(receiver)
    }

    /// Stops the display loop, if one is running.
    ///
    /// ## Returns
    /// What the loop delivered before stopping
    pub fn stop_display(&self) -> Option<DisplayStats> {
        let mut display = self.display.lock().take()?;
        display.stop();
        Some(display.stats())
    }

    /// Applies a user-facing scale factor (clamped to 1-20, 1 = off).
    ///
    /// Takes effect on the next captured frame.
    pub fn set_scale_factor(&self, factor: u32) -> u32 {
        let applied = self.scale.set_scale_factor(factor);
        if applied != factor {
            warn!("Scale factor {} clamped to {}", factor, applied);
        }
        info!("Scale factor set to {}", applied);
        applied
    }

    /// The live scale settings shared with the buffer.
    pub fn scale_settings(&self) -> &Arc<ScaleSettings> {
        &self.scale
    }

    /// The newest frame in the buffer.
    pub fn latest_frame(&self) -> Arc<Frame> {
        self.buffer.pop()
    }

    /// The slot the next frame will be written to.
    pub fn buffer_index(&self) -> usize {
        self.buffer.current_index()
    }

    /// The underlying ring buffer.
    pub fn buffer(&self) -> &Arc<FrameRingBuffer> {
        &self.buffer
    }

    /// Returns a copy of the current statistics.
    pub fn stats(&self) -> PreviewStats {
        self.stats.lock().clone()
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ends the session's display side.
    ///
    /// Capture sources are owned by the caller and must be stopped there.
    pub fn shutdown(&self) {
        info!("Shutting down camera preview...");
        self.stop_display();
        info!("Shutdown complete");
    }
}

// ============================================
// LOGGING
// ============================================

/// Initialize logging (`RUST_LOG` overrides the `Info` default).
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use std::thread;
    use std::time::{Duration, Instant};

    fn solid(shade: u8) -> Frame {
        Frame::filled(640, 480, [shade; 3]).unwrap()
    }

    #[test]
    fn test_preview_creation() {
        init_logging();
        let preview = CameraPreview::new().unwrap();

        assert_eq!(preview.buffer_index(), 0);
        assert_eq!(*preview.latest_frame(), Frame::blank());
        assert_eq!(preview.stats(), PreviewStats::default());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.buffer_capacity = 0;

        match CameraPreview::with_config(config) {
            Err(PreviewError::InvalidConfiguration(ConfigError::ZeroCapacity)) => {}
            Err(other) => panic!("Expected ZeroCapacity, got {:?}", other),
            Ok(_) => panic!("Session created with zero capacity"),
        }
    }

    #[test]
    fn test_frame_accounting() {
        let preview = CameraPreview::with_config(Config::low_latency()).unwrap();

        preview.on_frame_captured(Some(solid(1)));
        preview.on_frame_captured(None);
        preview.on_frame_captured(Some(solid(2)));

        let stats = preview.stats();
        assert_eq!(stats.frames_received, 3);
        assert_eq!(stats.frames_ignored, 1);
        assert_eq!(stats.frames_rejected, 0);
        assert_eq!(preview.buffer_index(), 2);
        assert_eq!(*preview.latest_frame(), solid(2));
    }

    #[test]
    fn test_scale_factor_changes_next_frame() {
        let preview = CameraPreview::new().unwrap();

        preview.on_frame_captured(Some(solid(5)));
        assert_eq!(preview.latest_frame().dimensions(), (640, 480));

        assert_eq!(preview.set_scale_factor(4), 4);
        preview.on_frame_captured(Some(solid(5)));
        assert_eq!(preview.latest_frame().dimensions(), (160, 120));

        assert_eq!(preview.set_scale_factor(0), 1);
        preview.on_frame_captured(Some(solid(5)));
        assert_eq!(preview.latest_frame().dimensions(), (640, 480));
    }

    #[test]
    fn test_rejected_frame_counted() {
        let preview = CameraPreview::new().unwrap();
        preview.scale_settings().set_enabled(true);
        preview.scale_settings().set_divisors(0, 0);

        preview.on_frame_captured(Some(solid(1)));

        assert_eq!(preview.stats().frames_rejected, 1);
        assert_eq!(preview.buffer_index(), 0);
    }

    #[test]
    fn test_display_round_trip() {
        let preview = CameraPreview::with_config(Config::low_latency()).unwrap();
        let frames = preview.start_display().unwrap();

        assert!(matches!(
            preview.start_display(),
            Err(PreviewError::DisplayAlreadyRunning)
        ));

        assert_eq!(*frames.recv_timeout(Duration::from_secs(5)).unwrap(), Frame::blank());

        preview.on_frame_captured(Some(solid(77)));
        let shown = frames.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(shown.pixel(0, 0), [77, 77, 77]);

        let stats = preview.stop_display().unwrap();
        assert_eq!(stats.frames_presented, 2);
        assert!(preview.stop_display().is_none());
    }

    #[test]
    fn test_simulated_source_feeds_buffer() {
        let preview = CameraPreview::with_config(Config::reduced(4)).unwrap();
        let camera = SimulatedCamera::with_params(200, 64, 48);

        preview.attach_source(&camera).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while preview.stats().frames_received < 3 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        camera.stop();

        assert!(preview.stats().frames_received >= 3);
        // 64×48 frames were stored at 640/4 × 480/4
        assert_eq!(preview.latest_frame().dimensions(), (160, 120));

        preview.shutdown();
    }
}
