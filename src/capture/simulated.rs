//! # Simulated Camera
//!
//! Generates test pattern frames for exercising the pipeline without a
//! real device.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::{Frame, FrameCallback, FrameSource, SourceError, BASE_HEIGHT, BASE_WIDTH};

/// Simulated camera that generates a moving gradient.
pub struct SimulatedCamera {
    is_active: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
    fps: u32,
    width: u32,
    height: u32,
}

impl SimulatedCamera {
    /// Creates a 640×480 source at 30 FPS.
    pub fn new() -> Self {
        Self::with_params(30, BASE_WIDTH, BASE_HEIGHT)
    }

    /// Creates with custom parameters.
    ///
    /// `fps` of zero is treated as 1.
    pub fn with_params(fps: u32, width: u32, height: u32) -> Self {
        Self {
            is_active: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
            fps: fps.max(1),
            width,
            height,
        }
    }
}

impl FrameSource for SimulatedCamera {
    fn start(&self, on_frame: FrameCallback) -> Result<(), SourceError> {
        // Held until the handle is stored, so a racing `stop` can join it
        let mut worker = self.worker.lock();
        if self.is_active.swap(true, Ordering::SeqCst) {
            return Err(SourceError::AlreadyRunning);
        }

        let is_active = Arc::clone(&self.is_active);
        let fps = self.fps;
        let width = self.width;
        let height = self.height;

        let spawned = thread::Builder::new()
            .name("simulated-camera".into())
            .spawn(move || {
                log::info!("Simulated camera started: {}x{} @ {} FPS", width, height, fps);

                let frame_duration = Duration::from_micros(1_000_000 / fps as u64);
                let mut frame_number = 0u32;
                let start_time = Instant::now();

                while is_active.load(Ordering::SeqCst) {
                    match generate_test_frame(frame_number, width, height) {
                        Ok(frame) => on_frame(Some(frame)),
                        Err(e) => {
                            log::warn!("Simulated frame generation failed: {}", e);
                            on_frame(None);
                        }
                    }

                    frame_number = frame_number.wrapping_add(1);

                    // Maintain frame rate
                    let elapsed = start_time.elapsed();
                    let expected = frame_duration * frame_number;
                    if expected > elapsed {
                        thread::sleep(expected - elapsed);
                    }

                    if frame_number % (fps * 5) == 0 {
                        log::debug!("Simulated: {} frames captured", frame_number);
                    }
                }

                log::info!("Simulated camera stopped after {} frames", frame_number);
            });

        match spawned {
            Ok(handle) => {
                *worker = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.is_active.store(false, Ordering::SeqCst);
                Err(SourceError::InitFailed(e.to_string()))
            }
        }
    }

    /// Stops the worker and waits for it, so no callback runs after this
    /// returns. Called from inside the callback it only clears the flag.
    fn stop(&self) {
        self.is_active.store(false, Ordering::SeqCst);

        let Some(handle) = self.worker.lock().take() else {
            return;
        };
        if handle.thread().id() == thread::current().id() {
            return;
        }
        if handle.join().is_err() {
            log::error!("Simulated camera thread panicked");
        }
    }

    fn is_active(&self) -> bool {
        self.is_active.load(Ordering::SeqCst)
    }

    fn source_name(&self) -> &'static str {
        "Simulated"
    }
}

impl Default for SimulatedCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SimulatedCamera {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Generates a test frame with a colourful moving pattern.
fn generate_test_frame(frame_number: u32, width: u32, height: u32) -> crate::PreviewResult<Frame> {
    let mut rgb = vec![0u8; width as usize * height as usize * 3];

    let t = frame_number as f32 * 0.05;

    for y in 0..height {
        for x in 0..width {
            let idx = (y as usize * width as usize + x as usize) * 3;

            let fx = x as f32 / width as f32;
            let fy = y as f32 / height as f32;

            rgb[idx] = ((fx * 255.0 + t * 50.0).sin().abs() * 255.0) as u8;
            rgb[idx + 1] = ((fy * 255.0 + t * 30.0).cos().abs() * 255.0) as u8;
            rgb[idx + 2] = (((fx + fy) * 127.5 + t * 40.0).sin().abs() * 255.0) as u8;
        }
    }

    Frame::from_raw(width, height, rgb)
}

// ============================================
// TESTS
// ============================================
