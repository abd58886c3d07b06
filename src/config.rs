//! # Configuration Module
//!
//! This module handles all configurable settings for the camera preview.
//!
//! ## Plain English Explanation
//!
//! There are two kinds of settings:
//!
//! - `Config`: chosen once when a preview session starts (how many frames
//!   to keep, how the display loop paces itself).
//! - `ScaleSettings`: the "shrink the picture" knob. The user can turn it
//!   at any time while frames are flowing, and the very next frame uses
//!   the new value.

use std::time::Duration;

use parking_lot::RwLock;
use thiserror::Error;

use crate::capture::{BASE_HEIGHT, BASE_WIDTH};
use crate::resample::ResampleStrategy;

/// Smallest scale factor the scale control accepts (1 = no scaling).
pub const MIN_SCALE_FACTOR: u32 = 1;

/// Largest scale factor the scale control accepts.
pub const MAX_SCALE_FACTOR: u32 = 20;

// ============================================
// MAIN CONFIGURATION
// ============================================

/// All configuration options for a preview session
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    // ----------------------------------------
    // BUFFER SETTINGS
    // "How much to remember"
    // ----------------------------------------
    /// Number of frame slots in the ring buffer
    ///
    /// ## Plain English
    /// The display only ever shows the newest frame, so this mostly
    /// controls how much slack there is between camera and screen.
    pub buffer_capacity: usize,

    // ----------------------------------------
    // SCALING SETTINGS
    // "How big should stored frames be"
    // ----------------------------------------
    /// Resample every pushed frame before storing it
    pub scaling_enabled: bool,

    /// Divisor applied to the 640×480 base resolution (1-20)
    pub scale_factor: u32,

    /// Which resampler to use when scaling
    pub strategy: ResampleStrategy,

    // ----------------------------------------
    // DISPLAY SETTINGS
    // "How the screen side polls"
    // ----------------------------------------
    /// Sleep between display iterations, in milliseconds
    ///
    /// ## Plain English
    /// 0 means poll as fast as possible (the loop only yields).
    pub display_interval_ms: u64,

    /// How many frames may wait for the renderer before new ones are dropped
    pub display_queue_depth: usize,
}

impl Config {
    /// Creates a configuration with all default values
    pub fn new() -> Self {
        Self {
            buffer_capacity: 64,
            scaling_enabled: false,
            scale_factor: MIN_SCALE_FACTOR,
            strategy: ResampleStrategy::Bilinear,
            display_interval_ms: 0,
            display_queue_depth: 1,
        }
    }

    /// A small buffer and a busy display loop, for the snappiest preview
    pub fn low_latency() -> Self {
        Self {
            buffer_capacity: 4,
            display_interval_ms: 0,
            ..Self::new()
        }
    }

    /// Stores frames at `640 / factor × 480 / factor`
    ///
    /// The factor is NOT clamped here; `validate` reports it instead.
    pub fn reduced(factor: u32) -> Self {
        Self {
            scaling_enabled: factor != MIN_SCALE_FACTOR,
            scale_factor: factor,
            ..Self::new()
        }
    }

    /// Validates the configuration and returns errors if invalid
    ///
    /// Returns a list of problems, or empty if all is well.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.buffer_capacity == 0 {
            errors.push(ConfigError::ZeroCapacity);
        }

        if !(MIN_SCALE_FACTOR..=MAX_SCALE_FACTOR).contains(&self.scale_factor) {
            errors.push(ConfigError::ScaleFactorOutOfRange(self.scale_factor));
        }

        if self.display_queue_depth == 0 {
            errors.push(ConfigError::ZeroQueueDepth);
        }

        errors
    }

    /// Pacing for the display loop, `None` when it should busy-poll
    pub fn display_interval(&self) -> Option<Duration> {
        (self.display_interval_ms > 0).then(|| Duration::from_millis(self.display_interval_ms))
    }

    /// Memory held by a buffer full of frames at the configured size
    ///
    /// ## Returns
    /// Estimated memory usage in megabytes
    pub fn estimated_memory_mb(&self) -> f32 {
        let divisor = if self.scaling_enabled {
            self.scale_factor.max(1)
        } else {
            1
        };
        let bytes_per_frame = (BASE_WIDTH / divisor) as f32 * (BASE_HEIGHT / divisor) as f32 * 3.0;

        (self.buffer_capacity as f32 * bytes_per_frame) / (1024.0 * 1024.0)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================
// SHARED SCALE SETTINGS
// ============================================

/// One consistent reading of the scale settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScaleState {
    /// Resample pushed frames?
    pub enabled: bool,
    /// Horizontal divisor of the base width
    pub scale_x: u32,
    /// Vertical divisor of the base height
    pub scale_y: u32,
    /// Resampler used when enabled
    pub strategy: ResampleStrategy,
}

impl ScaleState {
    /// Target size for a resample: `(640 / scale_x, 480 / scale_y)`.
    ///
    /// A zero divisor or a divisor larger than the base size is rejected
    /// instead of producing a 0-pixel image.
    pub fn target_size(&self) -> Result<(u32, u32), ConfigError> {
        if self.scale_x == 0 || self.scale_y == 0 {
            return Err(ConfigError::ZeroDivisor {
                scale_x: self.scale_x,
                scale_y: self.scale_y,
            });
        }

        let width = BASE_WIDTH / self.scale_x;
        let height = BASE_HEIGHT / self.scale_y;
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidTargetSize { width, height });
        }

        Ok((width, height))
    }
}

/// Scale settings shared between whoever turns the knob and the buffer.
///
/// ## Plain English
///
/// The buffer reads these on EVERY push, so a change made from the UI
/// thread shows up on the very next captured frame. There is no smoothing:
/// the latest value always wins.
#[derive(Debug)]
pub struct ScaleSettings {
    state: RwLock<ScaleState>,
}

impl ScaleSettings {
    /// Creates settings with divisors of 1 and the bilinear resampler.
    pub fn new(enabled: bool) -> Self {
        Self {
            state: RwLock::new(ScaleState {
                enabled,
                scale_x: MIN_SCALE_FACTOR,
                scale_y: MIN_SCALE_FACTOR,
                strategy: ResampleStrategy::default(),
            }),
        }
    }

    /// Creates settings matching a session configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            state: RwLock::new(ScaleState {
                enabled: config.scaling_enabled,
                scale_x: config.scale_factor,
                scale_y: config.scale_factor,
                strategy: config.strategy,
            }),
        }
    }

    /// Reads every field under one lock.
    pub fn snapshot(&self) -> ScaleState {
        *self.state.read()
    }

    pub fn is_enabled(&self) -> bool {
        self.state.read().enabled
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.state.write().enabled = enabled;
    }

    /// Sets the raw divisor pair. Not clamped: a zero divisor is accepted
    /// here and rejected by the next push.
    pub fn set_divisors(&self, scale_x: u32, scale_y: u32) {
        let mut state = self.state.write();
        state.scale_x = scale_x;
        state.scale_y = scale_y;
    }

    pub fn set_strategy(&self, strategy: ResampleStrategy) {
        self.state.write().strategy = strategy;
    }

    /// Applies a user-facing scale factor.
    ///
    /// The factor is clamped to `[1, 20]`. A factor of 1 switches scaling
    /// off and leaves the divisors alone; anything else switches it on and
    /// sets both divisors.
    ///
    /// ## Returns
    /// The factor actually applied
    pub fn set_scale_factor(&self, requested: u32) -> u32 {
        let factor = requested.clamp(MIN_SCALE_FACTOR, MAX_SCALE_FACTOR);
        let mut state = self.state.write();

        if factor == MIN_SCALE_FACTOR {
            state.enabled = false;
        } else {
            state.enabled = true;
            state.scale_x = factor;
            state.scale_y = factor;
        }

        factor
    }
}

impl Default for ScaleSettings {
    fn default() -> Self {
        Self::new(false)
    }
}

// ============================================
// CONFIGURATION ERRORS
// ============================================

/// Errors that can occur with configuration values
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The ring buffer needs at least one slot
    #[error("buffer capacity must be at least 1")]
    ZeroCapacity,

    /// A scale divisor of zero would divide by zero
    #[error("scale divisors must be positive (got {scale_x}x{scale_y})")]
    ZeroDivisor { scale_x: u32, scale_y: u32 },

    /// Resampling needs a target of at least 1×1
    #[error("resample target {width}x{height} has no pixels")]
    InvalidTargetSize { width: u32, height: u32 },

    /// Scale factor outside the accepted range
    #[error("scale factor {0} is outside valid range (1-20)")]
    ScaleFactorOutOfRange(u32),

    /// The renderer channel needs room for at least one frame
    #[error("display queue depth must be at least 1")]
    ZeroQueueDepth,
}

// ============================================
// TESTS
// ============================================
