// Image operations backed by the resampling engine.

use anyhow::Context;
use another_resize::{Interpolation, ResizeConfig, Resizer};
use image::{DynamicImage, ImageFormat};

use crate::ImageProcessor;
use crate::convert;

/// Resize the image with the engine and save it to the output path.
///
/// A zero `new_width` or `new_height` is inferred from the aspect ratio.
/// The output format follows the extension of the output path.
///
pub fn save_resize(
    image_proc: ImageProcessor,
    new_width: usize,
    new_height: usize,
    kind: Interpolation,
    config: ResizeConfig,
) -> anyhow::Result<()> {
    log::info!("Image loaded successfully!");
    log::info!("Dimensions: {:?}", image_proc.dimensions);

    let resizer = Resizer::new(config)?;
    log::info!(
        "Resizing image with {kind:?} (blur {}) on {} workers...",
        resizer.config().blur,
        resizer.workers()
    );

    let input = convert::to_engine(image_proc.image)?;
    let resized = resizer.resize_checked(new_width, new_height, &input, kind)?;
    let output = convert::from_engine(&resized)?;

    log::info!("Resize success! New dimensions: {:?}", (output.width(), output.height()));

    let format = ImageFormat::from_path(&image_proc.output_path)
        .with_context(|| format!("unknown output format: {}", image_proc.output_path))?;

    // jpeg has neither alpha nor 16-bit samples
    let output = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(output.to_rgb8()),
        _ => output,
    };

    output
        .save_with_format(&image_proc.output_path, format)
        .with_context(|| format!("unable to save image to {}", image_proc.output_path))?;

    Ok(())
}
