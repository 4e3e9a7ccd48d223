// Weight tables: per destination coordinate, where to start reading in the
// source axis and how much every tap contributes.

use std::fmt::Debug;
use std::ops::AddAssign;

use crate::error::{ResizeError, ResizeResult};
use crate::kernels::{Interpolation, Kernel};

/// Fractional bits of the 8-bit pipelines' fixed-point coefficients.
pub const FIXED_SHIFT: u32 = 12;

/// Unit weight in fixed point.
pub const FIXED_ONE: i16 = 1 << FIXED_SHIFT;

/// Smallest magnitude a floating coefficient keeps; anything below cannot
/// move a 16-bit sample.
pub const FLOAT_CUTOFF: f64 = 1.0 / 65536.0;

/// Scalar type a table stores its coefficients in.
///
/// `i16` backs the fixed-point 8-bit pipelines, `f32` the 16-bit and
/// generic ones.
pub trait Weight: Copy + PartialEq + Debug + Send + Sync + 'static {
    type Acc: Copy + PartialEq + Default + Debug + AddAssign + Send + Sync;

    const ZERO: Self;
    const ONE: Self;

    /// Converts a normalised weight, dropping values below the resolution.
    fn quantize(w: f64) -> Self;

    fn widen(self) -> Self::Acc;
}

impl Weight for i16 {
    type Acc = i32;

    const ZERO: Self = 0;
    const ONE: Self = FIXED_ONE;

    fn quantize(w: f64) -> Self {
        (w * f64::from(FIXED_ONE))
            .round()
            .clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
    }

    fn widen(self) -> i32 {
        i32::from(self)
    }
}

impl Weight for f32 {
    type Acc = f32;

    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn quantize(w: f64) -> Self {
        if w.abs() < FLOAT_CUTOFF { 0.0 } else { w as f32 }
    }

    fn widen(self) -> f32 {
        self
    }
}

/// One axis of a resampling pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    /// Number of destination samples along the axis.
    pub dst_len: usize,
    /// Source position of the left edge of destination sample 0. Offsets in
    /// the table are absolute source coordinates.
    pub origin: f64,
    pub src_len: usize,
    /// Source units per destination unit.
    pub scale: f64,
}

#[derive(Debug, Clone, Copy)]
pub enum Filter {
    /// Pick exactly one source sample per destination coordinate.
    Nearest,
    Kernel { kernel: Kernel, blur: f64 },
}

impl Filter {
    pub fn new(kind: Interpolation, blur: f64) -> Self {
        match kind {
            Interpolation::NearestNeighbor => Self::Nearest,
            _ => Self::Kernel {
                kernel: kind.kernel(),
                blur,
            },
        }
    }
}

/// Coefficients for a single destination coordinate.
#[derive(Debug, Clone, Copy)]
pub struct WeightRow<'a, W: Weight> {
    pub offset: i64,
    pub coeffs: &'a [W],
    /// Sum of the coefficients as applied during accumulation.
    pub sum: W::Acc,
}

/// Read-only table shared by every worker of a pass.
#[derive(Debug, Clone)]
pub struct WeightTable<W: Weight> {
    coeffs: Vec<W>,
    offsets: Vec<i64>,
    sums: Vec<W::Acc>,
    filter_len: usize,
}

pub type FixedTable = WeightTable<i16>;
pub type FloatTable = WeightTable<f32>;

impl<W: Weight> WeightTable<W> {
    /// Builds the table for `axis`.
    ///
    /// __Errors:__
    ///
    /// + `InvalidBounds` - either extent is zero, the scale or origin is not
    ///   finite, the offsets overflow, or the table does not fit in memory.
    ///
    pub fn build(axis: &Axis, filter: &Filter) -> ResizeResult<Self> {
        if axis.src_len == 0 || axis.dst_len == 0 {
            return Err(ResizeError::bounds(axis.dst_len as i64, axis.src_len));
        }
        if !axis.scale.is_finite() || axis.scale <= 0.0 || !axis.origin.is_finite() {
            return Err(ResizeError::bounds(0, axis.src_len));
        }

        let table = match *filter {
            Filter::Nearest => Self::nearest(axis),
            Filter::Kernel { kernel, blur } => Self::convolution(axis, kernel, blur)?,
        };

        // offsets are clamped when read, so only arithmetic overflow is left to catch
        for &offset in &table.offsets {
            if offset.checked_add(table.filter_len as i64).is_none() {
                return Err(ResizeError::bounds(offset, axis.src_len));
            }
        }

        Ok(table)
    }

    fn nearest(axis: &Axis) -> Self {
        let offsets = (0..axis.dst_len)
            .map(|d| ((d as f64 + 0.5) * axis.scale + axis.origin).floor() as i64)
            .collect();

        Self {
            coeffs: vec![W::ONE; axis.dst_len],
            offsets,
            sums: vec![W::ONE.widen(); axis.dst_len],
            filter_len: 1,
        }
    }

    fn convolution(axis: &Axis, kernel: Kernel, blur: f64) -> ResizeResult<Self> {
        // upsampling never shrinks the support below the native kernel radius
        let support = axis.scale.max(1.0);
        let radius = kernel.taps as f64 * support * blur;
        let too_large = || ResizeError::bounds(i64::MAX, axis.src_len);

        let half = (radius.ceil() as usize).max(1);
        let half_taps = i64::try_from(half).map_err(|_| too_large())?;
        let filter_len = half.checked_mul(2).ok_or_else(too_large)?;
        let count = axis.dst_len.checked_mul(filter_len).ok_or_else(too_large)?;

        let mut coeffs: Vec<W> = Vec::new();
        let mut raw: Vec<f64> = Vec::new();
        coeffs.try_reserve_exact(count).map_err(|_| too_large())?;
        raw.try_reserve_exact(filter_len).map_err(|_| too_large())?;
        raw.resize(filter_len, 0.0);

        let mut offsets = Vec::with_capacity(axis.dst_len);
        let mut sums = Vec::with_capacity(axis.dst_len);

        log::trace!("weight table: {} rows of {filter_len} taps", axis.dst_len);

        for d in 0..axis.dst_len {
            let center = (d as f64 + 0.5) * axis.scale + axis.origin;
            let offset = (center - 0.5).floor() as i64 - half_taps + 1;
            let nearest_tap = (center.floor() as i64 - offset) as usize;

            let mut total = 0.0;
            for (i, w) in raw.iter_mut().enumerate() {
                let s = (offset + i as i64) as f64;
                *w = (kernel.evaluate)((s + 0.5 - center) / support / blur);
                total += *w;
            }

            let row_start = coeffs.len();
            if total.abs() < f64::EPSILON {
                coeffs.extend((0..filter_len).map(|i| if i == nearest_tap { W::ONE } else { W::ZERO }));
            } else {
                coeffs.extend(raw.iter().map(|&w| W::quantize(w / total)));
            }

            let row = &mut coeffs[row_start..];
            let mut sum = W::Acc::default();
            for &c in row.iter() {
                sum += c.widen();
            }

            // quantisation may eat the whole row on extreme downscales
            if sum == W::Acc::default() {
                row.fill(W::ZERO);
                row[nearest_tap] = W::ONE;
                sum = W::ONE.widen();
            }

            offsets.push(offset);
            sums.push(sum);
        }

        Ok(Self {
            coeffs,
            offsets,
            sums,
            filter_len,
        })
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn filter_len(&self) -> usize {
        self.filter_len
    }

    pub fn row(&self, d: usize) -> WeightRow<'_, W> {
        let start = d * self.filter_len;
        WeightRow {
            offset: self.offsets[d],
            coeffs: &self.coeffs[start..start + self.filter_len],
            sum: self.sums[d],
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = WeightRow<'_, W>> + '_ {
        (0..self.len()).map(|d| self.row(d))
    }
}
