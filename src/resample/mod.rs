//! # Resampling Module
//!
//! Produces a new frame of a requested size from a source frame.
//!
//! ## Plain English
//!
//! Two ways to resize a picture:
//!
//! - **Nearest neighbour**: each output pixel copies ONE source pixel.
//!   Fast, blocky when enlarging.
//! - **Bilinear**: each output pixel blends the FOUR source pixels around
//!   it, weighted by distance. Smoother, a little slower.
//!
//! Both are pure: the source frame is never touched and a fresh frame
//! comes back. Channel values are truncated, never rounded, so output is
//! bit-for-bit reproducible.

mod bilinear;
mod nearest;

use image::RgbImage;
use rayon::prelude::*;

use crate::capture::Frame;
use crate::config::ConfigError;
use crate::error::PreviewResult;

/// Which resampler to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResampleStrategy {
    /// Copy the closest source pixel
    Nearest,
    /// Blend the four surrounding source pixels
    #[default]
    Bilinear,
}

/// Resizes `src` to `width × height` with the given strategy.
pub fn resample(
    src: &Frame,
    width: u32,
    height: u32,
    strategy: ResampleStrategy,
) -> PreviewResult<Frame> {
    match strategy {
        ResampleStrategy::Nearest => scale_nearest(src, width, height),
        ResampleStrategy::Bilinear => scale_bilinear(src, width, height),
    }
}

/// Nearest-neighbour resize.
///
/// Destination `(i, j)` copies source `(floor(i·sx), floor(j·sy))` where
/// `sx = src.width / width` and `sy = src.height / height`.
pub fn scale_nearest(src: &Frame, width: u32, height: u32) -> PreviewResult<Frame> {
    render(src, width, height, nearest::sample)
}

/// Bilinear resize.
///
/// Neighbour coordinates are clamped to the source before the fractional
/// offsets are taken, so edge pixels reproduce the source edge exactly.
pub fn scale_bilinear(src: &Frame, width: u32, height: u32) -> PreviewResult<Frame> {
    render(src, width, height, bilinear::sample)
}

/// Continuous source position of a destination pixel, plus source bounds.
#[derive(Clone, Copy, Debug)]
struct SourcePoint {
    x: f32,
    y: f32,
    max_x: u32,
    max_y: u32,
}

/// Fills a `width × height` frame row by row, asking `sample` for each
/// destination pixel.
fn render<F>(src: &Frame, width: u32, height: u32, sample: F) -> PreviewResult<Frame>
where
    F: Fn(&RgbImage, SourcePoint) -> [u8; 3] + Sync,
{
    if width == 0 || height == 0 {
        return Err(ConfigError::InvalidTargetSize { width, height }.into());
    }

    let image = src.as_image();
    let scale_x = src.width() as f32 / width as f32;
    let scale_y = src.height() as f32 / height as f32;
    let max_x = src.width() - 1;
    let max_y = src.height() - 1;

    let row_len = width as usize * 3;
    let mut data = vec![0u8; row_len * height as usize];

    data.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(j, row)| {
            let y = j as f32 * scale_y;
            for (i, pixel) in row.chunks_exact_mut(3).enumerate() {
                let point = SourcePoint {
                    x: i as f32 * scale_x,
                    y,
                    max_x,
                    max_y,
                };
                pixel.copy_from_slice(&sample(image, point));
            }
        });

    Frame::from_raw(width, height, data)
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PreviewError;

    const BLACK: [u8; 3] = [0, 0, 0];
    const WHITE: [u8; 3] = [255, 255, 255];
    const RED: [u8; 3] = [255, 0, 0];
    const GREEN: [u8; 3] = [0, 255, 0];

    /// 2×2 frame: black, white on top; red, green below.
    fn corners() -> Frame {
        let data = [BLACK, WHITE, RED, GREEN].concat();
        Frame::from_raw(2, 2, data).unwrap()
    }

    fn pixels(frame: &Frame) -> Vec<[u8; 3]> {
        frame
            .as_raw()
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
            .collect()
    }

    #[test]
    fn test_nearest_upscale() {
        let out = scale_nearest(&corners(), 4, 4).unwrap();

        assert_eq!(out.dimensions(), (4, 4));
        // Each source pixel becomes a 2×2 block
        assert_eq!(out.pixel(0, 0), BLACK);
        assert_eq!(out.pixel(1, 1), BLACK);
        assert_eq!(out.pixel(2, 0), WHITE);
        assert_eq!(out.pixel(3, 1), WHITE);
        assert_eq!(out.pixel(0, 3), RED);
        assert_eq!(out.pixel(3, 3), GREEN);

        // Nothing but the four source colours
        assert!(pixels(&out).iter().all(|p| [BLACK, WHITE, RED, GREEN].contains(p)));
    }

    #[test]
    fn test_bilinear_corners_match_source() {
        let out = scale_bilinear(&corners(), 4, 4).unwrap();

        assert_eq!(out.pixel(0, 0), BLACK);
        assert_eq!(out.pixel(3, 0), WHITE);
        assert_eq!(out.pixel(0, 3), RED);
        assert_eq!(out.pixel(3, 3), GREEN);
    }

    #[test]
    fn test_bilinear_blends_interior() {
        let src = corners();
        let bilinear = scale_bilinear(&src, 4, 4).unwrap();
        let nearest = scale_nearest(&src, 4, 4).unwrap();

        // (1,1) maps to (0.5, 0.5): an even blend of all four corners,
        // truncated: 127.5 -> 127, 63.75 -> 63
        assert_eq!(bilinear.pixel(1, 1), [127, 127, 63]);
        // (1,0) maps to (0.5, 0): halfway between black and white
        assert_eq!(bilinear.pixel(1, 0), [127, 127, 127]);

        assert_ne!(bilinear, nearest);
        let nearest_colours = pixels(&nearest);
        assert!(!nearest_colours.contains(&bilinear.pixel(1, 1)));
    }

    #[test]
    fn test_bilinear_non_power_of_two_ratio() {
        let src = Frame::from_raw(2, 1, vec![10, 0, 90, 120, 100, 0]).unwrap();

        // scale_x = 2/3 in f32 = 0.6666667, so x = 1 lands at dx = 0.6666667
        let out = scale_bilinear(&src, 3, 1).unwrap();

        assert_eq!(out.pixel(0, 0), [10, 0, 90]);
        // 83.33 -> 83, 66.67 -> 66 (not 67), and 90 × 0.3333333 comes out
        // as 29.999998 in f32, which truncates to 29
        assert_eq!(out.pixel(1, 0), [83, 66, 29]);
        // x = 2 maps to 1.3333334; the right neighbour clamps onto the
        // edge pixel, so the weights collapse onto a single colour
        assert_eq!(out.pixel(2, 0), [120, 100, 0]);

        let nearest = scale_nearest(&src, 3, 1).unwrap();
        assert_eq!(nearest.pixel(1, 0), [10, 0, 90]);
        assert_eq!(nearest.pixel(2, 0), [120, 100, 0]);
    }

    #[test]
    fn test_identity_size() {
        let src = corners();
        assert_eq!(scale_nearest(&src, 2, 2).unwrap(), src);
        assert_eq!(scale_bilinear(&src, 2, 2).unwrap(), src);
    }

    #[test]
    fn test_downscale_uniform() {
        let src = Frame::filled(640, 480, [12, 34, 56]).unwrap();

        for strategy in [ResampleStrategy::Nearest, ResampleStrategy::Bilinear] {
            let out = resample(&src, 160, 120, strategy).unwrap();
            assert_eq!(out.dimensions(), (160, 120));
            assert!(pixels(&out).iter().all(|p| *p == [12, 34, 56]));
        }
    }

    #[test]
    fn test_single_pixel_source() {
        let src = Frame::filled(1, 1, RED).unwrap();
        // Power-of-two ratios keep the weights exact in f32
        let out = scale_bilinear(&src, 2, 4).unwrap();
        assert_eq!(out.dimensions(), (2, 4));
        assert!(pixels(&out).iter().all(|p| *p == RED));
    }

    #[test]
    fn test_zero_target_rejected() {
        let src = corners();

        for (w, h) in [(0, 4), (4, 0), (0, 0)] {
            for strategy in [ResampleStrategy::Nearest, ResampleStrategy::Bilinear] {
                match resample(&src, w, h, strategy) {
                    Err(PreviewError::InvalidConfiguration(ConfigError::InvalidTargetSize {
                        width,
                        height,
                    })) => assert_eq!((width, height), (w, h)),
                    other => panic!("Expected InvalidTargetSize, got {:?}", other),
                }
            }
        }
    }

    #[test]
    fn test_default_strategy() {
        assert_eq!(ResampleStrategy::default(), ResampleStrategy::Bilinear);
    }
}
