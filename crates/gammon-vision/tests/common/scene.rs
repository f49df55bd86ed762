//! Synthetic board scenes drawn with plain pixel fills.

use image::{Rgb, RgbImage};

// Synthetic scene colours.
pub const LIGHT_TABLE: Rgb<u8> = Rgb([230, 230, 230]);
pub const WOOD: Rgb<u8> = Rgb([150, 110, 70]);
pub const FELT: Rgb<u8> = Rgb([20, 80, 40]);
pub const BLACK_CHECKER: Rgb<u8> = Rgb([25, 25, 25]);
pub const WHITE_CHECKER: Rgb<u8> = Rgb([240, 240, 240]);
pub const DIE_BODY: Rgb<u8> = Rgb([180, 20, 20]);
pub const PIP: Rgb<u8> = Rgb([255, 255, 255]);

/// Board rectangle drawn by [`board_image`], inclusive pixel bounds.
pub const BOARD_RECT: (u32, u32, u32, u32) = (40, 40, 439, 299);
pub const FRAME_SIZE: (u32, u32) = (480, 360);

pub fn fill_rect(img: &mut RgbImage, (x0, y0, x1, y1): (u32, u32, u32, u32), color: Rgb<u8>) {
    for y in y0..=y1.min(img.height() - 1) {
        for x in x0..=x1.min(img.width() - 1) {
            img.put_pixel(x, y, color);
        }
    }
}

pub fn fill_disk(img: &mut RgbImage, cx: i32, cy: i32, radius: i32, color: Rgb<u8>) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Empty board on a light table: a high-contrast outline for calibration.
pub fn board_image() -> RgbImage {
    let mut img = RgbImage::from_pixel(FRAME_SIZE.0, FRAME_SIZE.1, LIGHT_TABLE);
    fill_rect(&mut img, BOARD_RECT, FELT);
    img
}

/// Board on a wooden table; wood falls in neither checker range and stays
/// below the pip threshold, so only checkers and pips produce blobs.
pub fn play_image() -> RgbImage {
    let mut img = RgbImage::from_pixel(FRAME_SIZE.0, FRAME_SIZE.1, WOOD);
    fill_rect(&mut img, BOARD_RECT, FELT);
    img
}

/// Red die with white pips at `offsets` from its centre.
pub fn draw_die(img: &mut RgbImage, cx: i32, cy: i32, offsets: &[(i32, i32)]) {
    fill_rect(
        img,
        ((cx - 20) as u32, (cy - 20) as u32, (cx + 20) as u32, (cy + 20) as u32),
        DIE_BODY,
    );
    for &(dx, dy) in offsets {
        fill_disk(img, cx + dx, cy + dy, 4, PIP);
    }
}

pub const THREE: [(i32, i32); 3] = [(-10, -10), (0, 0), (10, 10)];
pub const FIVE: [(i32, i32); 5] = [(-10, -10), (10, -10), (0, 0), (-10, 10), (10, 10)];
