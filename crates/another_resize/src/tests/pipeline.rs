use std::sync::Arc;

use super::{gray16_from_fn, noise, resizer, rgba8_from_fn};
use crate::weights::{Axis, Filter, FloatTable};
use crate::{
    Image, Interpolation, PixelBuffer, PixelFormat, PixelSource, Rect, ResizeConfig, ResizeError,
    Resizer, SubsampleRatio, YCbCr, clamp_index,
};

const ALL_KINDS: [Interpolation; 6] = [
    Interpolation::NearestNeighbor,
    Interpolation::Bilinear,
    Interpolation::Bicubic,
    Interpolation::MitchellNetravali,
    Interpolation::Lanczos2,
    Interpolation::Lanczos3,
];

const INTERPOLATING_KINDS: [Interpolation; 4] = [
    Interpolation::Bilinear,
    Interpolation::Bicubic,
    Interpolation::Lanczos2,
    Interpolation::Lanczos3,
];

fn dense(image: Image) -> PixelBuffer {
    image.into_dense().expect("dense output")
}

#[test]
fn flat_image_resamples_to_itself() {
    let input = Image::from(rgba8_from_fn(4, 4, |_, _| [10, 20, 30, 255]));

    for kind in ALL_KINDS {
        let out = dense(crate::resize(2, 2, &input, kind).unwrap());
        assert_eq!((out.width(), out.height()), (2, 2));
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(out.pixel(x, y), Some(&[10, 20, 30, 255][..]), "{kind:?}");
            }
        }
    }
}

#[test]
fn single_pixel_upscale_replicates_the_pixel() {
    let input = Image::from(rgba8_from_fn(1, 1, |_, _| [200, 100, 50, 25]));
    let out = dense(resizer(3).resize_checked(5, 5, &input, Interpolation::Lanczos3).unwrap());

    assert_eq!((out.width(), out.height()), (5, 5));
    for y in 0..5 {
        for x in 0..5 {
            assert_eq!(out.pixel(x, y), Some(&[200, 100, 50, 25][..]));
        }
    }

    let input = Image::from(gray16_from_fn(1, 1, |_, _| 40_000));
    let out = dense(resizer(3).resize_checked(5, 5, &input, Interpolation::Lanczos3).unwrap());
    assert!(out.samples().chunks_exact(2).all(|b| b == 40_000u16.to_be_bytes()));
}

#[test]
fn nearest_upscale_repeats_blocks() {
    let input = Image::from(rgba8_from_fn(2, 2, |x, y| [x as u8 * 100, y as u8 * 100, 7, 255]));
    let out = dense(
        resizer(2)
            .resize_checked(4, 4, &input, Interpolation::NearestNeighbor)
            .unwrap(),
    );
    let src = input.as_dense().unwrap();

    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(out.pixel(x, y), src.pixel(x / 2, y / 2), "({x}, {y})");
        }
    }
}

#[test]
fn identity_resize_is_near_identity() {
    let src = rgba8_from_fn(9, 7, |x, y| {
        [noise(x, y, 1), noise(x, y, 2), noise(x, y, 3), noise(x, y, 4)]
    });
    let input = Image::from(src.clone());

    for kind in INTERPOLATING_KINDS {
        let out = dense(resizer(4).resize_checked(9, 7, &input, kind).unwrap());
        for (a, b) in out.samples().iter().zip(src.samples()) {
            assert!(a.abs_diff(*b) <= 1, "{kind:?}: {a} vs {b}");
        }
    }
}

#[test]
fn identity_resize_sixteen_bit() {
    let src = gray16_from_fn(6, 5, |x, y| u16::from(noise(x, y, 9)) * 257);
    let input = Image::from(src.clone());

    for kind in INTERPOLATING_KINDS {
        let out = dense(resizer(2).resize_checked(6, 5, &input, kind).unwrap());
        assert_eq!(out.format(), PixelFormat::Gray16);
        for y in 0..5 {
            for x in 0..6 {
                let a = out.pixel16(x, y).unwrap()[0];
                let b = src.pixel16(x, y).unwrap()[0];
                assert!(a.abs_diff(b) <= 1, "{kind:?}: {a} vs {b}");
            }
        }
    }
}

#[test]
fn origin_offset_does_not_shift_content() {
    let mut src = PixelBuffer::new(Rect::new(3, -2, 12, 5), PixelFormat::Gray8);
    for y in -2..5 {
        for x in 3..12 {
            src.set_pixel(x, y, &[noise(x as usize, (y + 2) as usize, 5)]).unwrap();
        }
    }
    let out = dense(
        resizer(3)
            .resize_checked(9, 7, &Image::from(src.clone()), Interpolation::Lanczos2)
            .unwrap(),
    );

    assert_eq!(out.rect(), Rect::sized(9, 7));
    for y in 0..7 {
        for x in 0..9 {
            assert_eq!(out.pixel(x, y), src.pixel(x + 3, y - 2));
        }
    }
}

#[test]
fn worker_count_does_not_change_output() {
    let input = Image::from(rgba8_from_fn(37, 23, |x, y| {
        [noise(x, y, 11), noise(x, y, 12), noise(x, y, 13), 255]
    }));

    for kind in [Interpolation::Lanczos3, Interpolation::NearestNeighbor] {
        let single = dense(resizer(1).resize_checked(50, 11, &input, kind).unwrap());
        let many = dense(resizer(5).resize_checked(50, 11, &input, kind).unwrap());
        assert_eq!(single, many, "{kind:?}");
    }

    let input = Image::from(gray16_from_fn(13, 29, |x, y| u16::from(noise(x, y, 3)) << 8));
    let single = dense(resizer(1).resize_checked(7, 40, &input, Interpolation::Bicubic).unwrap());
    let many = dense(resizer(6).resize_checked(7, 40, &input, Interpolation::Bicubic).unwrap());
    assert_eq!(single, many);
}

#[test]
fn two_passes_match_direct_separable_sum() {
    let (src_w, src_h, dst_w, dst_h) = (7, 5, 4, 9);
    // mid-range samples keep overshoot away from the clamps
    let src = gray16_from_fn(src_w, src_h, |x, y| (u16::from(noise(x, y, 21) / 2) + 64) * 257);
    let filter = Filter::new(Interpolation::MitchellNetravali, 1.0);

    let out = dense(
        resizer(2)
            .resize_checked(dst_w, dst_h, &Image::from(src.clone()), Interpolation::MitchellNetravali)
            .unwrap(),
    );

    let table = |src_len: usize, dst_len: usize| {
        FloatTable::build(
            &Axis {
                dst_len,
                origin: 0.0,
                src_len,
                scale: src_len as f64 / dst_len as f64,
            },
            &filter,
        )
        .unwrap()
    };
    let horizontal = table(src_w, dst_w);
    let vertical = table(src_h, dst_h);

    for dy in 0..dst_h {
        let vrow = vertical.row(dy);
        for dx in 0..dst_w {
            let hrow = horizontal.row(dx);
            let mut acc = 0.0f64;
            for (j, &wy) in vrow.coeffs.iter().enumerate() {
                let sy = clamp_index(vrow.offset + j as i64, src_h);
                for (i, &wx) in hrow.coeffs.iter().enumerate() {
                    let sx = clamp_index(hrow.offset + i as i64, src_w);
                    let v = src.pixel16(sx as i64, sy as i64).unwrap()[0];
                    acc += f64::from(wx) * f64::from(wy) * f64::from(v);
                }
            }
            let expected = (acc / f64::from(hrow.sum) / f64::from(vrow.sum))
                .round()
                .clamp(0.0, 65535.0);
            let got = f64::from(out.pixel16(dx as i64, dy as i64).unwrap()[0]);
            assert!((got - expected).abs() <= 2.0, "({dx}, {dy}): {got} vs {expected}");
        }
    }
}

#[test]
fn zero_dimension_is_inferred_from_aspect_ratio() {
    let input = Image::from(PixelBuffer::new(Rect::sized(100, 50), PixelFormat::Gray8));
    let resizer = resizer(2);

    let out = dense(resizer.resize_checked(40, 0, &input, Interpolation::Bilinear).unwrap());
    assert_eq!((out.width(), out.height()), (40, 20));

    let out = dense(resizer.resize_checked(0, 10, &input, Interpolation::Bilinear).unwrap());
    assert_eq!((out.width(), out.height()), (20, 10));

    let out = dense(resizer.resize_checked(0, 0, &input, Interpolation::Bilinear).unwrap());
    assert_eq!((out.width(), out.height()), (100, 50));
}

#[test]
fn empty_source_fails_cleanly() {
    let input = Image::from(PixelBuffer::new(Rect::sized(0, 3), PixelFormat::Rgba8));

    assert!(matches!(
        crate::resize_checked(4, 4, &input, Interpolation::Bicubic),
        Err(ResizeError::InvalidBounds { .. })
    ));
    assert!(crate::resize(4, 4, &input, Interpolation::Bicubic).is_none());
}

#[test]
fn invalid_blur_is_rejected() {
    for blur in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            Resizer::new(ResizeConfig::default().with_blur(blur)),
            Err(ResizeError::InvalidBlur(_))
        ));
    }
}

#[test]
fn oversized_blur_fails_cleanly() {
    let input = Image::from(rgba8_from_fn(4, 4, |x, y| [x as u8, y as u8, 0, 255]));
    let gray = Image::from(gray16_from_fn(4, 4, |x, _| x as u16));

    for blur in [1e18, 1e30] {
        let resizer = Resizer::new(ResizeConfig::default().with_blur(blur).with_workers(1)).unwrap();
        assert_eq!(resizer.config().blur, blur);

        assert!(matches!(
            resizer.resize_checked(2, 2, &input, Interpolation::Bilinear),
            Err(ResizeError::InvalidBounds { .. })
        ));
        assert!(matches!(
            resizer.resize_checked(3, 3, &gray, Interpolation::Lanczos3),
            Err(ResizeError::InvalidBounds { .. })
        ));
        assert!(resizer.resize(2, 2, &input, Interpolation::Bicubic).is_none());
    }
}

#[test]
fn blur_widens_the_support() {
    let impulse = Image::from(rgba8_from_fn(9, 9, |x, y| {
        if (x, y) == (4, 4) { [255; 4] } else { [0; 4] }
    }));

    let sharp = dense(resizer(2).resize_checked(9, 9, &impulse, Interpolation::Bilinear).unwrap());
    assert_eq!(sharp.pixel(3, 4), Some(&[0u8; 4][..]));

    let soft = Resizer::new(ResizeConfig::default().with_blur(2.0).with_workers(2)).unwrap();
    let soft = dense(soft.resize_checked(9, 9, &impulse, Interpolation::Bilinear).unwrap());
    assert!(soft.pixel(3, 4).unwrap()[0] > 0);
    assert!(soft.pixel(4, 4).unwrap()[0] < 255);
}

#[test]
fn planar_image_keeps_its_layout() {
    let ratio = SubsampleRatio::R420;
    let luma = Rect::sized(8, 6);
    let chroma = ratio.chroma_rect(luma);
    let input = YCbCr::from_planes(
        ratio,
        PixelBuffer::filled(luma, PixelFormat::Gray8, &[100]).unwrap(),
        PixelBuffer::filled(chroma, PixelFormat::Gray8, &[50]).unwrap(),
        PixelBuffer::filled(chroma, PixelFormat::Gray8, &[200]).unwrap(),
    )
    .unwrap();

    let out = resizer(2)
        .resize_checked(5, 3, &Image::from(input), Interpolation::Lanczos2)
        .unwrap();
    let out = out.as_ycbcr().expect("planar output");

    assert_eq!(out.ratio(), ratio);
    assert_eq!(out.rect(), Rect::sized(5, 3));
    assert_eq!(out.cb().rect(), Rect::sized(3, 2));
    assert!(out.y().samples().iter().all(|&v| v == 100));
    assert!(out.cb().samples().iter().all(|&v| v == 50));
    assert!(out.cr().samples().iter().all(|&v| v == 200));
}

/// 4:2:0 planes over `luma` with `cb` growing along x and `cr` along y.
fn ramp_planes(luma: Rect) -> YCbCr {
    let ratio = SubsampleRatio::R420;
    let chroma = ratio.chroma_rect(luma);
    let mut cb = PixelBuffer::new(chroma, PixelFormat::Gray8);
    let mut cr = PixelBuffer::new(chroma, PixelFormat::Gray8);
    for y in chroma.min.y..chroma.max.y {
        for x in chroma.min.x..chroma.max.x {
            cb.set_pixel(x, y, &[(100 * (x - chroma.min.x)) as u8]).unwrap();
            cr.set_pixel(x, y, &[(100 * (y - chroma.min.y)) as u8]).unwrap();
        }
    }
    let y = PixelBuffer::filled(luma, PixelFormat::Gray8, &[80]).unwrap();
    YCbCr::from_planes(ratio, y, cb, cr).unwrap()
}

#[test]
fn chroma_follows_luma_at_odd_origin() {
    // chroma covers luma [0, 6) on both axes, luma starts at 1
    let input = ramp_planes(Rect::new(1, 1, 5, 5));
    assert_eq!(input.cb().rect(), Rect::sized(3, 3));

    let out = resizer(2)
        .resize_checked(4, 4, &Image::from(input), Interpolation::Bilinear)
        .unwrap();
    let out = out.as_ycbcr().unwrap();

    assert_eq!(out.cb().rect(), Rect::sized(2, 2));
    for y in 0..2 {
        for x in 0..2 {
            // each output chroma sample spans half of two source samples
            assert_eq!(out.cb().pixel(x, y), Some(&[[50, 150][x as usize]][..]));
            assert_eq!(out.cr().pixel(x, y), Some(&[[50, 150][y as usize]][..]));
        }
    }
    assert!(out.y().samples().iter().all(|&v| v == 80));
}

#[test]
fn chroma_identity_at_even_origin() {
    let input = ramp_planes(Rect::new(-2, 4, 4, 8));

    let out = resizer(2)
        .resize_checked(6, 4, &Image::from(input.clone()), Interpolation::Bilinear)
        .unwrap();
    let out = out.as_ycbcr().unwrap();

    assert_eq!(out.cb().samples(), input.cb().samples());
    assert_eq!(out.cr().samples(), input.cr().samples());
}

struct Checker {
    bounds: Rect,
}

impl PixelSource for Checker {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn rgba16(&self, x: i64, y: i64) -> [u16; 4] {
        if (x + y) % 2 == 0 {
            [u16::MAX, 0, 0, u16::MAX]
        } else {
            [0, 0, u16::MAX, u16::MAX]
        }
    }
}

#[test]
fn generic_source_goes_through_accessors() {
    let input = Image::Generic(Arc::new(Checker {
        bounds: Rect::new(1, 1, 7, 5),
    }));

    let out = dense(resizer(2).resize_checked(3, 2, &input, Interpolation::Bilinear).unwrap());
    assert_eq!(out.format(), PixelFormat::Rgba16);
    assert_eq!((out.width(), out.height()), (3, 2));
    for y in 0..2 {
        for x in 0..3 {
            let px = out.pixel16(x, y).unwrap();
            assert_eq!(px[1], 0);
            assert_eq!(px[3], u16::MAX);
        }
    }

    let nearest = dense(
        resizer(2)
            .resize_checked(6, 4, &input, Interpolation::NearestNeighbor)
            .unwrap(),
    );
    assert_eq!(nearest.pixel16(0, 0), Some(vec![u16::MAX, 0, 0, u16::MAX]));
    assert_eq!(nearest.pixel16(1, 0), Some(vec![0, 0, u16::MAX, u16::MAX]));
}

#[test]
fn generic_path_matches_dense_path() {
    let mut src = PixelBuffer::new(Rect::sized(11, 6), PixelFormat::Rgba16);
    for y in 0..6 {
        for x in 0..11 {
            let px: Vec<u8> = (0..4u32)
                .flat_map(|c| (u16::from(noise(x, y, c)) * 250).to_be_bytes())
                .collect();
            src.set_pixel(x as i64, y as i64, &px).unwrap();
        }
    }

    let resizer = resizer(3);
    let dense_out = resizer
        .resize_checked(4, 9, &Image::from(src.clone()), Interpolation::Lanczos3)
        .unwrap();
    let generic_out = resizer
        .resize_checked(4, 9, &Image::Generic(Arc::new(src)), Interpolation::Lanczos3)
        .unwrap();

    assert_eq!(dense(dense_out), dense(generic_out));
}

#[test]
fn empty_generic_source_is_unsupported() {
    let input = Image::Generic(Arc::new(Checker {
        bounds: Rect::new(3, 3, 3, 8),
    }));
    assert!(matches!(
        resizer(1).resize_checked(2, 2, &input, Interpolation::Bilinear),
        Err(ResizeError::UnsupportedFormat(_))
    ));
}
