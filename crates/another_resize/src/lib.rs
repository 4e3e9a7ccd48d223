#[cfg(test)]
mod tests;

// Image resampling with separable interpolation kernels.

pub mod buffer;
pub mod config;
pub mod convolve;
pub mod dims;
pub mod dispatch;
pub mod error;
pub mod image;
pub mod kernels;
pub mod pipeline;
pub mod weights;
pub mod ycc;

pub use buffer::{PixelBuffer, PixelFormat, Point, Rect, clamp_index};
pub use config::ResizeConfig;
pub use dims::{Dimensions, effective_dimensions};
pub use error::{ResizeError, ResizeResult};
pub use image::{Image, PixelSource};
pub use kernels::Interpolation;
pub use pipeline::Resizer;
pub use ycc::{SubsampleRatio, YCbCr};

/// Resizes `image` to `width` x `height` with the default configuration.
///
/// If one of `width` or `height` is zero it is derived from the other so
/// that the aspect ratio of `image` is kept; if both are zero the image
/// keeps its size.
///
/// Returns `None` if the resize fails; use [`resize_checked`] to find out
/// why.
///
pub fn resize(width: usize, height: usize, image: &Image, kind: Interpolation) -> Option<Image> {
    match Resizer::new(ResizeConfig::default()) {
        Ok(resizer) => resizer.resize(width, height, image, kind),
        Err(err) => {
            log::warn!("could not start resizer: {err}");
            None
        }
    }
}

/// Same as [`resize`], but reports the reason of a failure.
pub fn resize_checked(
    width: usize,
    height: usize,
    image: &Image,
    kind: Interpolation,
) -> ResizeResult<Image> {
    Resizer::new(ResizeConfig::default())?.resize_checked(width, height, image, kind)
}
