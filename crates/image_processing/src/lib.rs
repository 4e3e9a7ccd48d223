// top-level library module

pub mod basic_ops;
pub mod convert;

use anyhow::Context;
use image::DynamicImage;

/// A decoded input image and where its processed version goes.
pub struct ImageProcessor {
    pub image: DynamicImage,
    pub dimensions: (u32, u32),
    pub output_path: String,
}

impl ImageProcessor {
    pub fn from_file(filepath: &str, output_path: &str) -> anyhow::Result<Self> {
        let image_bytes = std::fs::read(filepath)
            .with_context(|| format!("unable to read image at path: {filepath}"))?;

        let image = image::load_from_memory(&image_bytes)
            .with_context(|| format!("unable to decode image at path: {filepath}"))?;
        let dimensions = (image.width(), image.height());

        Ok(Self {
            image,
            dimensions,
            output_path: output_path.to_string(),
        })
    }
}
