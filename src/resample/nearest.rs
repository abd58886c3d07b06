use image::RgbImage;

use super::SourcePoint;

/// Copies the source pixel at the floor of the continuous position.
pub(super) fn sample(image: &RgbImage, point: SourcePoint) -> [u8; 3] {
    // Float error can land exactly on the far edge; keep it in bounds.
    let x = (point.x as u32).min(point.max_x);
    let y = (point.y as u32).min(point.max_y);

    image.get_pixel(x, y).0
}
