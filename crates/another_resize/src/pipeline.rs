// Two-pass separable resampling.
//
// The first pass filters the rows of the source and writes a transposed
// intermediate; the second pass filters the rows of that intermediate,
// which are the source columns, and transposes back. Both passes use the
// same row convolution.

use crate::buffer::{PixelBuffer, PixelFormat, Rect};
use crate::config::ResizeConfig;
use crate::convolve::{self, Convolver};
use crate::dims::{Dimensions, effective_dimensions};
use crate::dispatch::Dispatcher;
use crate::error::{ResizeError, ResizeResult};
use crate::image::{Image, PixelSource};
use crate::kernels::Interpolation;
use crate::weights::{Axis, Filter, FloatTable, Weight, WeightTable};
use crate::ycc::YCbCr;

/// Resampling engine with a fixed configuration and worker pool.
#[derive(Debug)]
pub struct Resizer {
    config: ResizeConfig,
    dispatcher: Dispatcher,
}

impl Resizer {
    /// __Errors:__
    ///
    /// + `InvalidBlur` - `config.blur` is not finite and positive.
    ///
    /// + `ThreadPool` - the worker threads could not be spawned.
    ///
    pub fn new(config: ResizeConfig) -> ResizeResult<Self> {
        if !config.blur.is_finite() || config.blur <= 0.0 {
            return Err(ResizeError::InvalidBlur(config.blur));
        }
        let dispatcher = Dispatcher::new(config.worker_count())?;
        Ok(Self { config, dispatcher })
    }

    pub fn config(&self) -> &ResizeConfig {
        &self.config
    }

    pub fn workers(&self) -> usize {
        self.dispatcher.workers()
    }

    /// Like [`Resizer::resize_checked`], but any failure is reported as
    /// `None`.
    pub fn resize(
        &self,
        width: usize,
        height: usize,
        image: &Image,
        kind: Interpolation,
    ) -> Option<Image> {
        match self.resize_checked(width, height, image, kind) {
            Ok(resized) => Some(resized),
            Err(err) => {
                log::warn!("resize to {width}x{height} failed: {err}");
                None
            }
        }
    }

    /// Resamples `image` to `width` x `height`.
    ///
    /// A zero dimension is inferred from the other one and the source
    /// aspect ratio. Dense and planar images keep their format; generic
    /// sources come back as `Rgba16`.
    ///
    pub fn resize_checked(
        &self,
        width: usize,
        height: usize,
        image: &Image,
        kind: Interpolation,
    ) -> ResizeResult<Image> {
        let bounds = image.bounds();
        let dims = effective_dimensions(width, height, bounds.width(), bounds.height());
        let filter = Filter::new(kind, self.config.blur);

        log::debug!(
            "resizing {}x{} -> {}x{} with {kind:?} on {} workers",
            bounds.width(),
            bounds.height(),
            dims.width,
            dims.height,
            self.workers()
        );

        match image {
            Image::Dense(buf) => {
                let resized = match buf.format() {
                    PixelFormat::Rgba8 => self.two_pass::<i16>(buf, &dims, &filter, convolve::rgba8),
                    PixelFormat::Gray8 => self.two_pass::<i16>(buf, &dims, &filter, convolve::gray8),
                    PixelFormat::Rgba16 => self.two_pass::<f32>(buf, &dims, &filter, convolve::rgba16),
                    PixelFormat::Gray16 => self.two_pass::<f32>(buf, &dims, &filter, convolve::gray16),
                }?;
                Ok(Image::Dense(resized))
            }
            Image::YCbCr(ycc) => self.resize_ycbcr(ycc, &dims, &filter).map(Image::YCbCr),
            Image::Generic(source) => self
                .resize_generic(source.as_ref(), &dims, &filter)
                .map(Image::Dense),
        }
    }

    fn two_pass<W: Weight>(
        &self,
        input: &PixelBuffer,
        dims: &Dimensions,
        filter: &Filter,
        conv: Convolver<W>,
    ) -> ResizeResult<PixelBuffer> {
        let min = input.rect().min;
        self.two_pass_from(input, (min.x as f64, min.y as f64), dims, filter, conv)
    }

    /// Two passes whose destination grid starts at source position `origin`,
    /// given in the input's own coordinates.
    fn two_pass_from<W: Weight>(
        &self,
        input: &PixelBuffer,
        origin: (f64, f64),
        dims: &Dimensions,
        filter: &Filter,
        conv: Convolver<W>,
    ) -> ResizeResult<PixelBuffer> {
        let horizontal = WeightTable::<W>::build(
            &Axis {
                dst_len: dims.width,
                origin: origin.0,
                src_len: input.width(),
                scale: dims.scale_x,
            },
            filter,
        )?;

        let mut temp = PixelBuffer::new(Rect::sized(input.height(), dims.width), input.format());
        log::debug!(
            "horizontal pass: {} -> {} columns, filter length {}",
            input.width(),
            dims.width,
            horizontal.filter_len()
        );
        self.dispatcher
            .run(&mut temp, |strip| conv(input, strip, &horizontal))?;

        // temp column r holds input row min.y + r
        let origin_y = origin.1 - input.rect().min.y as f64;
        self.second_pass(&temp, origin_y, dims, filter, conv)
    }

    /// Filters the transposed intermediate and writes the final buffer.
    /// `origin_y` counts from the intermediate's first column.
    fn second_pass<W: Weight>(
        &self,
        temp: &PixelBuffer,
        origin_y: f64,
        dims: &Dimensions,
        filter: &Filter,
        conv: Convolver<W>,
    ) -> ResizeResult<PixelBuffer> {
        let vertical = WeightTable::<W>::build(
            &Axis {
                dst_len: dims.height,
                origin: temp.rect().min.x as f64 + origin_y,
                src_len: temp.width(),
                scale: dims.scale_y,
            },
            filter,
        )?;

        let mut result = PixelBuffer::new(Rect::sized(dims.width, dims.height), temp.format());
        log::debug!(
            "vertical pass: {} -> {} rows, filter length {}",
            temp.width(),
            dims.height,
            vertical.filter_len()
        );
        self.dispatcher
            .run(&mut result, |strip| conv(temp, strip, &vertical))?;

        Ok(result)
    }

    /// Resamples each plane on its own grid. Chroma placement follows the
    /// luma geometry: a chroma sample spans `divisor` luma samples, so the
    /// luma scale carries over and the luma origin is divided down.
    fn resize_ycbcr(
        &self,
        input: &YCbCr,
        dims: &Dimensions,
        filter: &Filter,
    ) -> ResizeResult<YCbCr> {
        let ratio = input.ratio();
        let y = self.two_pass::<i16>(input.y(), dims, filter, convolve::gray8)?;

        let (dx, dy) = ratio.divisors();
        let luma_min = input.rect().min;
        let origin = (luma_min.x as f64 / dx as f64, luma_min.y as f64 / dy as f64);

        let dst_chroma = ratio.chroma_rect(Rect::sized(dims.width, dims.height));
        let chroma_dims = Dimensions {
            width: dst_chroma.width(),
            height: dst_chroma.height(),
            ..*dims
        };

        let cb =
            self.two_pass_from::<i16>(input.cb(), origin, &chroma_dims, filter, convolve::gray8)?;
        let cr =
            self.two_pass_from::<i16>(input.cr(), origin, &chroma_dims, filter, convolve::gray8)?;

        YCbCr::from_planes(ratio, y, cb, cr)
    }

    /// First pass reads through the accessor, second pass runs on the
    /// `Rgba16` intermediate.
    fn resize_generic(
        &self,
        source: &dyn PixelSource,
        dims: &Dimensions,
        filter: &Filter,
    ) -> ResizeResult<PixelBuffer> {
        let bounds = source.bounds();
        if bounds.is_empty() {
            return Err(ResizeError::unsupported(format!(
                "generic source with empty bounds {bounds:?}"
            )));
        }

        let horizontal = FloatTable::build(
            &Axis {
                dst_len: dims.width,
                origin: bounds.min.x as f64,
                src_len: bounds.width(),
                scale: dims.scale_x,
            },
            filter,
        )?;

        let mut temp = PixelBuffer::new(
            Rect::sized(bounds.height(), dims.width),
            PixelFormat::Rgba16,
        );
        log::debug!(
            "generic horizontal pass: {} -> {} columns, filter length {}",
            bounds.width(),
            dims.width,
            horizontal.filter_len()
        );
        self.dispatcher
            .run(&mut temp, |strip| convolve::generic(source, strip, &horizontal))?;

        self.second_pass(&temp, 0.0, dims, filter, convolve::rgba16)
    }
}
