// One-dimensional convolution along the rows of an input buffer.
//
// Every routine reads input rows and writes the transposed result: the
// destination row `d` holds the samples computed with weight row `d`, and
// destination column `r` comes from input row `r`. Running the same routine
// twice therefore resamples both axes and restores the orientation.

use crate::buffer::{PixelBuffer, clamp_index};
use crate::dispatch::Strip;
use crate::error::{ResizeError, ResizeResult};
use crate::image::PixelSource;
use crate::weights::{FixedTable, FloatTable, Weight, WeightTable};

pub type Convolver<W> = fn(&PixelBuffer, Strip<'_>, &WeightTable<W>) -> ResizeResult<()>;

pub fn rgba8(input: &PixelBuffer, strip: Strip<'_>, table: &FixedTable) -> ResizeResult<()> {
    fixed::<4>(input, strip, table)
}

pub fn gray8(input: &PixelBuffer, strip: Strip<'_>, table: &FixedTable) -> ResizeResult<()> {
    fixed::<1>(input, strip, table)
}

pub fn rgba16(input: &PixelBuffer, strip: Strip<'_>, table: &FloatTable) -> ResizeResult<()> {
    float::<4>(input, strip, table)
}

pub fn gray16(input: &PixelBuffer, strip: Strip<'_>, table: &FloatTable) -> ResizeResult<()> {
    float::<1>(input, strip, table)
}

/// 8-bit samples, fixed-point coefficients, 32-bit accumulation.
fn fixed<const C: usize>(
    input: &PixelBuffer,
    mut strip: Strip<'_>,
    table: &FixedTable,
) -> ResizeResult<()> {
    check_shapes(input.width(), input.height(), C, &strip, table)?;

    let extent = input.width();
    let min_x = input.rect.min.x;

    for r in 0..input.height() {
        let line = input.row(r)?;
        for k in 0..strip.rows {
            let row = table.row(strip.first_row + k);

            let mut acc = [0i32; C];
            for (i, &coeff) in row.coeffs.iter().enumerate() {
                if coeff == 0 {
                    continue;
                }
                let xi = clamp_index(row.offset - min_x + i as i64, extent) * C;
                let coeff = i32::from(coeff);
                for (a, &v) in acc.iter_mut().zip(&line[xi..xi + C]) {
                    *a += coeff * i32::from(v);
                }
            }

            let out = &mut strip.row_mut(k)[r * C..(r + 1) * C];
            for (o, a) in out.iter_mut().zip(acc) {
                *o = clamp_u8(div_round(a, row.sum));
            }
        }
    }

    Ok(())
}

/// Big-endian 16-bit samples with floating coefficients.
fn float<const C: usize>(
    input: &PixelBuffer,
    mut strip: Strip<'_>,
    table: &FloatTable,
) -> ResizeResult<()> {
    check_shapes(input.width(), input.height(), 2 * C, &strip, table)?;

    let extent = input.width();
    let min_x = input.rect.min.x;

    for r in 0..input.height() {
        let line = input.row(r)?;
        for k in 0..strip.rows {
            let row = table.row(strip.first_row + k);

            let mut acc = [0f32; C];
            for (i, &coeff) in row.coeffs.iter().enumerate() {
                if coeff == 0.0 {
                    continue;
                }
                let xi = clamp_index(row.offset - min_x + i as i64, extent) * 2 * C;
                for (c, a) in acc.iter_mut().enumerate() {
                    let at = xi + 2 * c;
                    *a += coeff * f32::from(u16::from_be_bytes([line[at], line[at + 1]]));
                }
            }

            let out = &mut strip.row_mut(k)[r * 2 * C..(r + 1) * 2 * C];
            for (o, a) in out.chunks_exact_mut(2).zip(acc) {
                o.copy_from_slice(&clamp_u16(a / row.sum).to_be_bytes());
            }
        }
    }

    Ok(())
}

/// First pass for sources without a known layout: every sample goes
/// through the accessor, the output is RGBA with 16 bits per channel.
pub fn generic(
    source: &dyn PixelSource,
    mut strip: Strip<'_>,
    table: &FloatTable,
) -> ResizeResult<()> {
    let bounds = source.bounds();
    check_shapes(bounds.width(), bounds.height(), 8, &strip, table)?;

    let extent = bounds.width();

    for r in 0..bounds.height() {
        let y = bounds.min.y + r as i64;
        for k in 0..strip.rows {
            let row = table.row(strip.first_row + k);

            let mut acc = [0f32; 4];
            for (i, &coeff) in row.coeffs.iter().enumerate() {
                if coeff == 0.0 {
                    continue;
                }
                let x = bounds.min.x
                    + clamp_index(row.offset - bounds.min.x + i as i64, extent) as i64;
                for (a, v) in acc.iter_mut().zip(source.rgba16(x, y)) {
                    *a += coeff * f32::from(v);
                }
            }

            let out = &mut strip.row_mut(k)[r * 8..(r + 1) * 8];
            for (o, a) in out.chunks_exact_mut(2).zip(acc) {
                o.copy_from_slice(&clamp_u16(a / row.sum).to_be_bytes());
            }
        }
    }

    Ok(())
}

/// Rejects empty source lines, strips that cannot hold one transposed input
/// row per column, and strips that reach past the end of the table.
fn check_shapes<W: Weight>(
    source_len: usize,
    columns: usize,
    bytes_per_pixel: usize,
    strip: &Strip<'_>,
    table: &WeightTable<W>,
) -> ResizeResult<()> {
    if strip.rows == 0 || columns == 0 {
        return Ok(());
    }
    if source_len == 0 {
        return Err(ResizeError::bounds(0, source_len));
    }
    let needed = columns * bytes_per_pixel;
    if strip.stride < needed || strip.data.len() < strip.stride * (strip.rows - 1) + needed {
        return Err(ResizeError::bounds(needed as i64, strip.data.len()));
    }
    let last = strip.first_row + strip.rows;
    if last > table.len() {
        return Err(ResizeError::bounds(last as i64, table.len()));
    }
    Ok(())
}

/// Quotient rounded to nearest, halves round up.
#[inline]
fn div_round(n: i32, d: i32) -> i32 {
    if d > 0 {
        (n + d / 2).div_euclid(d)
    } else {
        (f64::from(n) / f64::from(d)).round() as i32
    }
}

#[inline]
fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

#[inline]
fn clamp_u16(v: f32) -> u16 {
    v.round().clamp(0.0, 65535.0) as u16
}
