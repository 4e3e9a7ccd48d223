// Planar luma/chroma images with subsampled chroma.

use crate::buffer::{PixelBuffer, PixelFormat, Point, Rect};
use crate::error::{ResizeError, ResizeResult};

/// How many luma samples share one chroma sample, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubsampleRatio {
    R444,
    R422,
    R420,
    R440,
    R411,
    R410,
}

impl SubsampleRatio {
    /// Horizontal and vertical chroma divisors.
    pub fn divisors(self) -> (i64, i64) {
        match self {
            Self::R444 => (1, 1),
            Self::R422 => (2, 1),
            Self::R420 => (2, 2),
            Self::R440 => (1, 2),
            Self::R411 => (4, 1),
            Self::R410 => (4, 2),
        }
    }

    /// Chroma plane rectangle covering the luma rectangle `luma`.
    pub fn chroma_rect(self, luma: Rect) -> Rect {
        let (dx, dy) = self.divisors();
        Rect {
            min: Point {
                x: luma.min.x.div_euclid(dx),
                y: luma.min.y.div_euclid(dy),
            },
            max: Point {
                x: (luma.max.x + dx - 1).div_euclid(dx),
                y: (luma.max.y + dy - 1).div_euclid(dy),
            },
        }
    }
}

/// Three independently strided `Gray8` planes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YCbCr {
    ratio: SubsampleRatio,
    y: PixelBuffer,
    cb: PixelBuffer,
    cr: PixelBuffer,
}

impl YCbCr {
    /// Zeroed image with plane sizes derived from `rect` and `ratio`.
    pub fn new(rect: Rect, ratio: SubsampleRatio) -> Self {
        let chroma = ratio.chroma_rect(rect);
        Self {
            ratio,
            y: PixelBuffer::new(rect, PixelFormat::Gray8),
            cb: PixelBuffer::new(chroma, PixelFormat::Gray8),
            cr: PixelBuffer::new(chroma, PixelFormat::Gray8),
        }
    }

    /// Assembles an image from existing planes.
    ///
    /// __Errors:__
    ///
    /// + `UnsupportedFormat` - a plane is not `Gray8` or a chroma plane does
    ///   not cover the rectangle `ratio` implies.
    ///
    pub fn from_planes(
        ratio: SubsampleRatio,
        y: PixelBuffer,
        cb: PixelBuffer,
        cr: PixelBuffer,
    ) -> ResizeResult<Self> {
        for plane in [&y, &cb, &cr] {
            if plane.format() != PixelFormat::Gray8 {
                return Err(ResizeError::unsupported(format!(
                    "planar samples must be Gray8, got {:?}",
                    plane.format()
                )));
            }
        }

        let expected = ratio.chroma_rect(y.rect());
        if cb.rect() != expected || cr.rect() != expected {
            return Err(ResizeError::unsupported(format!(
                "chroma planes {:?}/{:?} do not match {ratio:?} layout {expected:?}",
                cb.rect(),
                cr.rect()
            )));
        }

        Ok(Self { ratio, y, cb, cr })
    }

    pub fn ratio(&self) -> SubsampleRatio {
        self.ratio
    }

    pub fn rect(&self) -> Rect {
        self.y.rect()
    }

    pub fn y(&self) -> &PixelBuffer {
        &self.y
    }

    pub fn cb(&self) -> &PixelBuffer {
        &self.cb
    }

    pub fn cr(&self) -> &PixelBuffer {
        &self.cr
    }

    pub fn into_planes(self) -> (PixelBuffer, PixelBuffer, PixelBuffer) {
        (self.y, self.cb, self.cr)
    }
}
