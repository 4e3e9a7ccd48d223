// In-memory pixel storage shared by every pipeline.

use crate::error::{ResizeError, ResizeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

/// Half-open rectangle `[min, max)`. The origin is not necessarily zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Builds a rectangle from two corners, swapping coordinates if needed
    /// so that `min <= max` on both axes.
    pub fn new(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        Self {
            min: Point {
                x: x0.min(x1),
                y: y0.min(y1),
            },
            max: Point {
                x: x0.max(x1),
                y: y0.max(y1),
            },
        }
    }

    /// Rectangle anchored at the origin.
    pub fn sized(width: usize, height: usize) -> Self {
        Self::new(0, 0, width as i64, height as i64)
    }

    /// Zero when the corners are inverted.
    pub fn width(&self) -> usize {
        self.max.x.saturating_sub(self.min.x).max(0) as usize
    }

    pub fn height(&self) -> usize {
        self.max.y.saturating_sub(self.min.y).max(0) as usize
    }

    fn is_inverted(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.min.x && x < self.max.x && y >= self.min.y && y < self.max.y
    }
}

/// Dense interleaved encodings the specialised pipelines understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgba8,
    Rgba16,
    Gray8,
    Gray16,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            Self::Rgba8 | Self::Rgba16 => 4,
            Self::Gray8 | Self::Gray16 => 1,
        }
    }

    pub fn bytes_per_sample(self) -> usize {
        match self {
            Self::Rgba8 | Self::Gray8 => 1,
            Self::Rgba16 | Self::Gray16 => 2,
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        self.channels() * self.bytes_per_sample()
    }
}

/// A rectangle of pixels backed by a byte buffer.
///
/// Rows are `stride` bytes apart; 16-bit samples are stored big-endian.
/// Pixel coordinates passed to the accessors are absolute, i.e. they live
/// inside `rect` rather than starting at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub(crate) rect: Rect,
    pub(crate) stride: usize,
    pub(crate) samples: Vec<u8>,
    pub(crate) format: PixelFormat,
}

impl PixelBuffer {
    /// Zero-filled buffer with a tight stride.
    pub fn new(rect: Rect, format: PixelFormat) -> Self {
        let stride = rect.width() * format.bytes_per_pixel();
        Self {
            rect,
            stride,
            samples: vec![0; stride * rect.height()],
            format,
        }
    }

    /// Wraps existing samples after checking that they cover `rect`.
    pub fn from_raw(
        rect: Rect,
        stride: usize,
        samples: Vec<u8>,
        format: PixelFormat,
    ) -> ResizeResult<Self> {
        if rect.is_inverted() {
            let offset = if rect.min.x > rect.max.x { rect.min.x } else { rect.min.y };
            return Err(ResizeError::bounds(offset, 0));
        }

        let overflow = || ResizeError::bounds(i64::MAX, samples.len());
        let row_bytes = rect
            .width()
            .checked_mul(format.bytes_per_pixel())
            .ok_or_else(overflow)?;
        if stride < row_bytes {
            return Err(ResizeError::bounds(row_bytes as i64, stride));
        }

        let required = match rect.height() {
            0 => 0,
            h => stride
                .checked_mul(h - 1)
                .and_then(|n| n.checked_add(row_bytes))
                .ok_or_else(overflow)?,
        };
        if samples.len() < required {
            return Err(ResizeError::bounds(required as i64, samples.len()));
        }

        Ok(Self {
            rect,
            stride,
            samples,
            format,
        })
    }

    /// Buffer of a single colour; `pixel` must hold one pixel's bytes.
    pub fn filled(rect: Rect, format: PixelFormat, pixel: &[u8]) -> ResizeResult<Self> {
        let bpp = format.bytes_per_pixel();
        if pixel.len() != bpp {
            return Err(ResizeError::bounds(pixel.len() as i64, bpp));
        }
        let mut buf = Self::new(rect, format);
        for chunk in buf.samples.chunks_exact_mut(bpp) {
            chunk.copy_from_slice(pixel);
        }
        Ok(buf)
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn width(&self) -> usize {
        self.rect.width()
    }

    pub fn height(&self) -> usize {
        self.rect.height()
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Bytes of the pixel at absolute position `(x, y)`.
    pub fn pixel(&self, x: i64, y: i64) -> Option<&[u8]> {
        let at = self.pixel_offset(x, y)?;
        Some(&self.samples[at..at + self.format.bytes_per_pixel()])
    }

    pub fn set_pixel(&mut self, x: i64, y: i64, bytes: &[u8]) -> ResizeResult<()> {
        let bpp = self.format.bytes_per_pixel();
        let at = self
            .pixel_offset(x, y)
            .ok_or_else(|| ResizeError::bounds(x, self.rect.width()))?;
        if bytes.len() != bpp {
            return Err(ResizeError::bounds(bytes.len() as i64, bpp));
        }
        self.samples[at..at + bpp].copy_from_slice(bytes);
        Ok(())
    }

    /// Samples of the pixel at `(x, y)` widened to 16 bits per channel.
    pub fn pixel16(&self, x: i64, y: i64) -> Option<Vec<u16>> {
        let px = self.pixel(x, y)?;
        Some(match self.format.bytes_per_sample() {
            1 => px.iter().map(|&v| u16::from(v) * 257).collect(),
            _ => px
                .chunks_exact(2)
                .map(|b| u16::from_be_bytes([b[0], b[1]]))
                .collect(),
        })
    }

    /// Row `r` counted from the top of the rectangle, without padding.
    pub(crate) fn row(&self, r: usize) -> ResizeResult<&[u8]> {
        let start = r * self.stride;
        let end = start + self.width() * self.format.bytes_per_pixel();
        self.samples
            .get(start..end)
            .ok_or_else(|| ResizeError::bounds(end as i64, self.samples.len()))
    }

    fn pixel_offset(&self, x: i64, y: i64) -> Option<usize> {
        if !self.rect.contains(x, y) {
            return None;
        }
        let col = (x - self.rect.min.x) as usize;
        let row = (y - self.rect.min.y) as usize;
        Some(row * self.stride + col * self.format.bytes_per_pixel())
    }
}

/// Border-replicate index mapping: anything left of the axis maps to 0,
/// anything right of it maps to `len - 1`.
#[inline]
pub fn clamp_index(i: i64, len: usize) -> usize {
    if i <= 0 || len == 0 {
        0
    } else {
        (i as usize).min(len - 1)
    }
}
