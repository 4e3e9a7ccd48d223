// Continuous interpolation kernels.
//
// Every kernel is a pure function of the signed distance `x`, measured in
// source pixels from the sample centre, and is zero outside `[-taps, taps]`.

use std::f64::consts::PI;

/// Interpolation methods the engine can resample with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interpolation {
    NearestNeighbor,
    Bilinear,
    Bicubic,
    MitchellNetravali,
    Lanczos2,
    Lanczos3,
}

/// Support radius plus the function to sample.
#[derive(Clone, Copy)]
pub struct Kernel {
    pub taps: usize,
    pub evaluate: fn(f64) -> f64,
}

impl std::fmt::Debug for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kernel").field("taps", &self.taps).finish()
    }
}

impl Interpolation {
    pub fn kernel(self) -> Kernel {
        let (taps, evaluate): (usize, fn(f64) -> f64) = match self {
            Self::NearestNeighbor => (1, nearest),
            Self::Bilinear => (1, linear),
            Self::Bicubic => (2, cubic),
            Self::MitchellNetravali => (2, mitchell_netravali),
            Self::Lanczos2 => (2, lanczos2),
            Self::Lanczos3 => (3, lanczos3),
        };
        Kernel { taps, evaluate }
    }
}

impl std::str::FromStr for Interpolation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" | "nearest-neighbor" => Ok(Self::NearestNeighbor),
            "bilinear" | "linear" => Ok(Self::Bilinear),
            "bicubic" | "cubic" => Ok(Self::Bicubic),
            "mitchell" | "mitchell-netravali" => Ok(Self::MitchellNetravali),
            "lanczos2" => Ok(Self::Lanczos2),
            "lanczos3" => Ok(Self::Lanczos3),
            other => Err(format!("unknown interpolation '{other}'")),
        }
    }
}

/// Box of width one. Only meaningful as a placeholder: nearest neighbour
/// resampling selects samples directly instead of weighting them.
pub fn nearest(x: f64) -> f64 {
    if (-0.5..0.5).contains(&x) { 1.0 } else { 0.0 }
}

pub fn linear(x: f64) -> f64 {
    let x = x.abs();
    if x < 1.0 { 1.0 - x } else { 0.0 }
}

/// Keys cubic convolution with `a = -0.5`.
pub fn cubic(x: f64) -> f64 {
    const A: f64 = -0.5;
    let x = x.abs();
    if x < 1.0 {
        ((A + 2.0) * x - (A + 3.0)) * x * x + 1.0
    } else if x < 2.0 {
        ((A * x - 5.0 * A) * x + 8.0 * A) * x - 4.0 * A
    } else {
        0.0
    }
}

/// Mitchell-Netravali cubic with `B = C = 1/3`.
pub fn mitchell_netravali(x: f64) -> f64 {
    const B: f64 = 1.0 / 3.0;
    const C: f64 = 1.0 / 3.0;
    let x = x.abs();
    if x < 1.0 {
        ((12.0 - 9.0 * B - 6.0 * C) * x * x * x + (-18.0 + 12.0 * B + 6.0 * C) * x * x
            + (6.0 - 2.0 * B))
            / 6.0
    } else if x < 2.0 {
        ((-B - 6.0 * C) * x * x * x
            + (6.0 * B + 30.0 * C) * x * x
            + (-12.0 * B - 48.0 * C) * x
            + (8.0 * B + 24.0 * C))
            / 6.0
    } else {
        0.0
    }
}

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

fn lanczos(a: f64, x: f64) -> f64 {
    if x.abs() < a { sinc(x) * sinc(x / a) } else { 0.0 }
}

pub fn lanczos2(x: f64) -> f64 {
    lanczos(2.0, x)
}

pub fn lanczos3(x: f64) -> f64 {
    lanczos(3.0, x)
}
