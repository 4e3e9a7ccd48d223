// unit tests

mod pipeline;

use crate::{PixelBuffer, PixelFormat, Rect, ResizeConfig, Resizer};

// test helper functions

/// RGBA8 buffer at the origin filled by `f(x, y)`.
fn rgba8_from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> [u8; 4]) -> PixelBuffer {
    let mut buf = PixelBuffer::new(Rect::sized(width, height), PixelFormat::Rgba8);
    for y in 0..height {
        for x in 0..width {
            buf.set_pixel(x as i64, y as i64, &f(x, y)).unwrap();
        }
    }
    buf
}

fn gray16_from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> u16) -> PixelBuffer {
    let mut buf = PixelBuffer::new(Rect::sized(width, height), PixelFormat::Gray16);
    for y in 0..height {
        for x in 0..width {
            buf.set_pixel(x as i64, y as i64, &f(x, y).to_be_bytes())
                .unwrap();
        }
    }
    buf
}

/// Deterministic pseudo-random bytes for test images.
fn noise(x: usize, y: usize, salt: u32) -> u8 {
    let mut h = (x as u32).wrapping_mul(0x9E37_79B9) ^ (y as u32).wrapping_mul(0x85EB_CA6B) ^ salt;
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    (h & 0xFF) as u8
}

fn resizer(workers: usize) -> Resizer {
    Resizer::new(ResizeConfig::default().with_workers(workers)).unwrap()
}
