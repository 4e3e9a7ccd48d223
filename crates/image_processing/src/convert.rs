// Conversion between decoded `image` crate images and engine buffers.

use std::sync::Arc;

use anyhow::{Context, bail};
use another_resize::{Image, PixelBuffer, PixelFormat, PixelSource, Rect, YCbCr};
use image::{DynamicImage, ImageBuffer, Luma, Rgb, Rgba};

/// Decoded image the engine has no dense layout for, widened to RGBA16.
pub struct DecodedSource {
    pixels: ImageBuffer<Rgba<u16>, Vec<u16>>,
}

impl DecodedSource {
    pub fn new(image: &DynamicImage) -> Self {
        Self {
            pixels: image.to_rgba16(),
        }
    }
}

impl PixelSource for DecodedSource {
    fn bounds(&self) -> Rect {
        Rect::sized(self.pixels.width() as usize, self.pixels.height() as usize)
    }

    fn rgba16(&self, x: i64, y: i64) -> [u16; 4] {
        self.pixels.get_pixel(x as u32, y as u32).0
    }
}

/// Wraps a decoded image for the engine.
///
/// 8- and 16-bit RGBA and gray images become dense buffers; everything
/// else is sampled through [`DecodedSource`].
///
pub fn to_engine(image: DynamicImage) -> anyhow::Result<Image> {
    let rect = Rect::sized(image.width() as usize, image.height() as usize);

    let buf = match image {
        DynamicImage::ImageRgba8(buf) => {
            PixelBuffer::from_raw(rect, rect.width() * 4, buf.into_raw(), PixelFormat::Rgba8)?
        }
        DynamicImage::ImageLuma8(buf) => {
            PixelBuffer::from_raw(rect, rect.width(), buf.into_raw(), PixelFormat::Gray8)?
        }
        DynamicImage::ImageRgba16(buf) => PixelBuffer::from_raw(
            rect,
            rect.width() * 8,
            big_endian(buf.as_raw()),
            PixelFormat::Rgba16,
        )?,
        DynamicImage::ImageLuma16(buf) => PixelBuffer::from_raw(
            rect,
            rect.width() * 2,
            big_endian(buf.as_raw()),
            PixelFormat::Gray16,
        )?,
        other => {
            log::debug!("sampling {:?} through the generic path", other.color());
            return Ok(Image::Generic(Arc::new(DecodedSource::new(&other))));
        }
    };

    Ok(Image::Dense(buf))
}

/// Converts an engine image back into a `DynamicImage`.
pub fn from_engine(image: &Image) -> anyhow::Result<DynamicImage> {
    match image {
        Image::Dense(buf) => dense_to_dynamic(buf),
        Image::YCbCr(ycc) => Ok(DynamicImage::ImageRgb8(ycbcr_to_rgb(ycc))),
        Image::Generic(_) => bail!("resize output is never a generic source"),
    }
}

fn dense_to_dynamic(buf: &PixelBuffer) -> anyhow::Result<DynamicImage> {
    let (width, height) = (buf.width() as u32, buf.height() as u32);
    let rows = tight_rows(buf);

    let image = match buf.format() {
        PixelFormat::Rgba8 => ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rows)
            .map(DynamicImage::ImageRgba8),
        PixelFormat::Gray8 => ImageBuffer::<Luma<u8>, _>::from_raw(width, height, rows)
            .map(DynamicImage::ImageLuma8),
        PixelFormat::Rgba16 => ImageBuffer::<Rgba<u16>, _>::from_raw(width, height, native(&rows))
            .map(DynamicImage::ImageRgba16),
        PixelFormat::Gray16 => ImageBuffer::<Luma<u16>, _>::from_raw(width, height, native(&rows))
            .map(DynamicImage::ImageLuma16),
    };

    image.with_context(|| format!("buffer does not hold a {width}x{height} image"))
}

/// JFIF full-range conversion, chroma sampled at the covering position.
fn ycbcr_to_rgb(ycc: &YCbCr) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
    let rect = ycc.rect();
    let (dx, dy) = ycc.ratio().divisors();

    ImageBuffer::from_fn(rect.width() as u32, rect.height() as u32, |x, y| {
        let lx = rect.min.x + i64::from(x);
        let ly = rect.min.y + i64::from(y);
        let (cx, cy) = (lx.div_euclid(dx), ly.div_euclid(dy));

        let sample = |plane: &PixelBuffer, px: i64, py: i64| {
            plane.pixel(px, py).map_or(0.0, |p| f32::from(p[0]))
        };
        let luma = sample(ycc.y(), lx, ly);
        let cb = sample(ycc.cb(), cx, cy) - 128.0;
        let cr = sample(ycc.cr(), cx, cy) - 128.0;

        let to_u8 = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        Rgb([
            to_u8(luma + 1.402 * cr),
            to_u8(luma - 0.344_136 * cb - 0.714_136 * cr),
            to_u8(luma + 1.772 * cb),
        ])
    })
}

/// Row bytes without stride padding.
fn tight_rows(buf: &PixelBuffer) -> Vec<u8> {
    let row_bytes = buf.width() * buf.format().bytes_per_pixel();
    if buf.stride() == row_bytes {
        return buf.samples()[..row_bytes * buf.height()].to_vec();
    }
    buf.samples()
        .chunks(buf.stride())
        .take(buf.height())
        .flat_map(|row| &row[..row_bytes])
        .copied()
        .collect()
}

fn big_endian(samples: &[u16]) -> Vec<u8> {
    samples.iter().flat_map(|v| v.to_be_bytes()).collect()
}

fn native(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .collect()
}
