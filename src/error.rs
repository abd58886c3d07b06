//! # Error Types Module
//!
//! This module defines the error types used throughout the preview core.
//!
//! ## Plain English Explanation
//!
//! Only a handful of things can go wrong here:
//!
//! - "InvalidConfiguration: you asked for a buffer with zero slots"
//! - "InvalidFrame: the pixel data doesn't match the stated size"
//! - "Source: the camera couldn't start"
//!
//! A captured frame that never arrived (`None`) is NOT an error. The
//! buffer just ignores it.

use std::io;

use thiserror::Error;

use crate::capture::SourceError;
use crate::config::ConfigError;

// ============================================
// MAIN PREVIEW ERROR
// ============================================

/// The main error type for the camera preview core.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// A configuration value makes the requested operation impossible
    ///
    /// ## Examples
    /// - Buffer capacity of zero
    /// - Scale divisor of zero at push time
    /// - Resample target of 0×N
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// Raw pixel data length doesn't match `width × height × 3`
    #[error("Invalid frame: expected {expected} bytes, got {got}")]
    InvalidFrame { expected: usize, got: usize },

    /// A frame must be at least 1×1
    #[error("Frame has no pixels ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },

    /// The capture source refused to start
    #[error("Capture source error: {0}")]
    Source(#[from] SourceError),

    /// `start_display` was called while a display loop is already running
    #[error("Display loop is already running")]
    DisplayAlreadyRunning,

    /// Generic I/O error (thread spawn failures end up here)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// ============================================
// RESULT TYPE ALIAS
// ============================================

/// A Result type that uses PreviewError
pub type PreviewResult<T> = Result<T, PreviewError>;

// ============================================
// TESTS
// ============================================
