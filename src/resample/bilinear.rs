use image::RgbImage;

use super::SourcePoint;

/// Blends the four neighbours of the continuous position.
///
/// Neighbours are clamped first, then the fractional offsets are taken
/// from the clamped top-left corner.
pub(super) fn sample(image: &RgbImage, point: SourcePoint) -> [u8; 3] {
    let x1 = (point.x as u32).min(point.max_x);
    let y1 = (point.y as u32).min(point.max_y);
    let x2 = (x1 + 1).min(point.max_x);
    let y2 = (y1 + 1).min(point.max_y);

    let dx = point.x - x1 as f32;
    let dy = point.y - y1 as f32;

    let c1 = image.get_pixel(x1, y1).0;
    let c2 = image.get_pixel(x2, y1).0;
    let c3 = image.get_pixel(x1, y2).0;
    let c4 = image.get_pixel(x2, y2).0;

    let mut out = [0u8; 3];
    for (channel, value) in out.iter_mut().enumerate() {
        *value = interpolate(
            c1[channel] as f32,
            c2[channel] as f32,
            c3[channel] as f32,
            c4[channel] as f32,
            dx,
            dy,
        ) as u8;
    }
    out
}

fn interpolate(c1: f32, c2: f32, c3: f32, c4: f32, dx: f32, dy: f32) -> f32 {
    c1 * (1.0 - dx) * (1.0 - dy) + c2 * dx * (1.0 - dy) + c3 * (1.0 - dx) * dy + c4 * dx * dy
}
