// Target dimension inference.

/// Output size of a resize call and the source-per-destination scale on
/// each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
    pub scale_x: f64,
    pub scale_y: f64,
}

/// Resolves requested dimensions against the source size.
///
/// A zero dimension is derived from the other one so that the aspect ratio
/// of the source is kept; when both are zero the image keeps its size.
///
/// __Arguments:__
///
/// + `width`, `height` - requested output size, zero meaning "infer"
///
/// + `src_width`, `src_height` - size of the source image
///
pub fn effective_dimensions(
    width: usize,
    height: usize,
    src_width: usize,
    src_height: usize,
) -> Dimensions {
    let (scale_x, scale_y) = scale_factors(width, height, src_width as f64, src_height as f64);

    // inferred sizes are biased by 0.7 before truncation
    let width = match width {
        0 => (0.7 + src_width as f64 / scale_x) as usize,
        w => w,
    };
    let height = match height {
        0 => (0.7 + src_height as f64 / scale_y) as usize,
        h => h,
    };

    Dimensions {
        width,
        height,
        scale_x,
        scale_y,
    }
}

fn scale_factors(width: usize, height: usize, old_width: f64, old_height: f64) -> (f64, f64) {
    match (width, height) {
        (0, 0) => (1.0, 1.0),
        (0, h) => {
            let scale = old_height / h as f64;
            (scale, scale)
        }
        (w, 0) => {
            let scale = old_width / w as f64;
            (scale, scale)
        }
        (w, h) => (old_width / w as f64, old_height / h as f64),
    }
}
