//! # Camera Preview Demo
//!
//! Runs a simulated camera into a preview session for a few seconds,
//! changing the scale factor halfway through, and "renders" by printing
//! what the display loop hands over.
//!
//! Run with: `cargo run --example preview`

use std::thread;
use std::time::{Duration, Instant};

use camera_preview::{CameraPreview, Config, FrameSource, SimulatedCamera};

fn main() -> anyhow::Result<()> {
    camera_preview::init_logging();

    let mut config = Config::default();
    config.display_interval_ms = 5;

    let preview = CameraPreview::with_config(config)?;
    println!("Buffer slots: {}", preview.config().buffer_capacity);
    println!(
        "Estimated memory: {:.1} MB",
        preview.config().estimated_memory_mb()
    );

    let camera = SimulatedCamera::new();
    preview.attach_source(&camera)?;
    let frames = preview.start_display()?;

    let started = Instant::now();
    let mut rescaled = false;
    let mut shown = 0u64;

    while started.elapsed() < Duration::from_secs(4) {
        if !rescaled && started.elapsed() > Duration::from_secs(2) {
            let applied = preview.set_scale_factor(4);
            println!("Scale factor -> {}", applied);
            rescaled = true;
        }

        if let Ok(frame) = frames.recv_timeout(Duration::from_millis(100)) {
            shown += 1;
            if shown % 10 == 0 {
                println!(
                    "Frame {:>4}: {}x{}, top-left {:?}, write index {}",
                    shown,
                    frame.width(),
                    frame.height(),
                    frame.pixel(0, 0),
                    preview.buffer_index()
                );
            }
        }

        // Pretend rendering takes a moment
        thread::sleep(Duration::from_millis(10));
    }

    camera.stop();
    let display = preview.stop_display().unwrap_or_default();
    preview.shutdown();

    let stats = preview.stats();
    println!();
    println!("Frames captured:  {}", stats.frames_received);
    println!("Frames rejected:  {}", stats.frames_rejected);
    println!("Frames presented: {}", display.frames_presented);
    println!("Frames dropped:   {}", display.frames_dropped);

    Ok(())
}
