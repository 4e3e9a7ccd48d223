use std::fmt;
use std::sync::Arc;

use crate::buffer::{PixelBuffer, PixelFormat, Rect};
use crate::ycc::YCbCr;

/// Per-pixel read access for layouts the engine has no specialised path for.
///
/// Coordinates are absolute and always lie inside `bounds()`.
pub trait PixelSource: Send + Sync {
    fn bounds(&self) -> Rect;

    /// Red, green, blue and alpha, 16 bits each.
    fn rgba16(&self, x: i64, y: i64) -> [u16; 4];
}

impl PixelSource for PixelBuffer {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn rgba16(&self, x: i64, y: i64) -> [u16; 4] {
        match self.pixel16(x, y) {
            Some(px) if self.format.channels() == 4 => [px[0], px[1], px[2], px[3]],
            Some(px) => [px[0], px[0], px[0], u16::MAX],
            None => [0; 4],
        }
    }
}

/// Any image the engine accepts or produces.
#[derive(Clone)]
pub enum Image {
    Dense(PixelBuffer),
    YCbCr(YCbCr),
    Generic(Arc<dyn PixelSource>),
}

impl Image {
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Dense(buf) => buf.rect(),
            Self::YCbCr(ycc) => ycc.rect(),
            Self::Generic(src) => src.bounds(),
        }
    }

    /// Pixel format of dense images.
    pub fn format(&self) -> Option<PixelFormat> {
        match self {
            Self::Dense(buf) => Some(buf.format()),
            _ => None,
        }
    }

    pub fn as_dense(&self) -> Option<&PixelBuffer> {
        match self {
            Self::Dense(buf) => Some(buf),
            _ => None,
        }
    }

    pub fn into_dense(self) -> Option<PixelBuffer> {
        match self {
            Self::Dense(buf) => Some(buf),
            _ => None,
        }
    }

    pub fn as_ycbcr(&self) -> Option<&YCbCr> {
        match self {
            Self::YCbCr(ycc) => Some(ycc),
            _ => None,
        }
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dense(buf) => f.debug_tuple("Dense").field(buf).finish(),
            Self::YCbCr(ycc) => f.debug_tuple("YCbCr").field(ycc).finish(),
            Self::Generic(src) => f.debug_tuple("Generic").field(&src.bounds()).finish(),
        }
    }
}

impl From<PixelBuffer> for Image {
    fn from(buf: PixelBuffer) -> Self {
        Self::Dense(buf)
    }
}

impl From<YCbCr> for Image {
    fn from(ycc: YCbCr) -> Self {
        Self::YCbCr(ycc)
    }
}
