//! Float pixel kernels (component F): planar GBR(A) linearize/matrix/
//! delinearize, in half-float (LUT-driven) and f32 (analytic) variants.
//!
//! Planes carry their own row stride (padding past `width` samples, per the
//! data crate's aligned plane allocation), so every pass here walks rows
//! through [`PlaneView`]/[`PlaneViewMut`] rather than a flat slice.

use half::f16;

use crate::builder::{f_delin, f_lin};
use crate::config::EffectiveConfig;
use crate::kernel::int::{PlaneView, PlaneViewMut};

fn matrix3x3_f32(m: &[[f32; 3]; 3], v: (f32, f32, f32)) -> (f32, f32, f32) {
    (
        m[0][0] * v.0 + m[0][1] * v.1 + m[0][2] * v.2,
        m[1][0] * v.0 + m[1][1] * v.1 + m[1][2] * v.2,
        m[2][0] * v.0 + m[2][1] * v.1 + m[2][2] * v.2,
    )
}

fn apply_half_lut_row(row: &mut [f16], lut: &[u16]) {
    for v in row.iter_mut() {
        *v = f16::from_bits(lut[v.to_bits() as usize]);
    }
}

/// Planar GBR(A) half-float kernel for one slice's rows. `gbr` is `(g, b,
/// r)` to match the plane order the GBR layout carries; `cfg.lrgb_matrix_f32`
/// is built over `(r, g, b)` (`builder::rgb_to_xyz`'s column order), so the
/// matrix stage below feeds and reads back the triple in `(r, g, b)` order
/// rather than the plane tuple's own `(g, b, r)` order.
///
/// Per spec 4.6: a pair of LUT passes around an optional half-float 3x3
/// matrix multiply (computed promoted to f32, demoted back to half). When
/// the source is already linear and `lrgb2lrgb` is a passthrough, the
/// delinearize LUT is applied directly in a single pass.
pub fn gbr_half(
    mut gbr: (PlaneViewMut<f16>, PlaneViewMut<f16>, PlaneViewMut<f16>),
    cfg: &EffectiveConfig,
) {
    let luts = cfg
        .half_luts
        .as_ref()
        .expect("half pipeline requires half_luts unless rgb2rgb_passthrough");

    let src_is_linear = cfg.in_tag.xfer == csc_data::colorspace::TransferCharacteristic::Linear;
    let width = gbr.0.width;
    let height = gbr.0.height;

    if src_is_linear && cfg.passthrough.lrgb2lrgb {
        for row in 0..height {
            apply_half_lut_row(gbr.0.row_mut(row), &luts.delin_lut);
            apply_half_lut_row(gbr.1.row_mut(row), &luts.delin_lut);
            apply_half_lut_row(gbr.2.row_mut(row), &luts.delin_lut);
        }
        return;
    }

    if !src_is_linear {
        for row in 0..height {
            apply_half_lut_row(gbr.0.row_mut(row), &luts.lin_lut);
            apply_half_lut_row(gbr.1.row_mut(row), &luts.lin_lut);
            apply_half_lut_row(gbr.2.row_mut(row), &luts.lin_lut);
        }
    }

    if !cfg.passthrough.lrgb2lrgb {
        let m = cfg.lrgb_matrix_f32;
        for row in 0..height {
            let g = gbr.0.row_mut(row);
            let b = gbr.1.row_mut(row);
            let r = gbr.2.row_mut(row);
            for i in 0..width {
                let v = (r[i].to_f32(), g[i].to_f32(), b[i].to_f32());
                let (rr, gg, bb) = matrix3x3_f32(&m, v);
                r[i] = f16::from_f32(rr);
                g[i] = f16::from_f32(gg);
                b[i] = f16::from_f32(bb);
            }
        }
    }

    for row in 0..height {
        apply_half_lut_row(gbr.0.row_mut(row), &luts.delin_lut);
        apply_half_lut_row(gbr.1.row_mut(row), &luts.delin_lut);
        apply_half_lut_row(gbr.2.row_mut(row), &luts.delin_lut);
    }
}

/// Planar GBR(A) f32 kernel: linearize and delinearize computed
/// analytically (no LUT) per spec 4.6 — the f32 path has no headroom
/// concern the integer pseudo-fixed scale needs to guard against.
pub fn gbr_f32(
    mut gbr: (PlaneViewMut<f32>, PlaneViewMut<f32>, PlaneViewMut<f32>),
    cfg: &EffectiveConfig,
) {
    if cfg.passthrough.rgb2rgb {
        return;
    }

    let src = cfg.f32_src_xfer;
    let dst = cfg.f32_dst_xfer;
    let width = gbr.0.width;
    let height = gbr.0.height;

    for row in 0..height {
        for v in gbr.0.row_mut(row).iter_mut() {
            *v = f_lin(src, *v as f64) as f32;
        }
        for v in gbr.1.row_mut(row).iter_mut() {
            *v = f_lin(src, *v as f64) as f32;
        }
        for v in gbr.2.row_mut(row).iter_mut() {
            *v = f_lin(src, *v as f64) as f32;
        }
    }

    if !cfg.passthrough.lrgb2lrgb {
        let m = cfg.lrgb_matrix_f32;
        for row in 0..height {
            let g = gbr.0.row_mut(row);
            let b = gbr.1.row_mut(row);
            let r = gbr.2.row_mut(row);
            for i in 0..width {
                let (rr, gg, bb) = matrix3x3_f32(&m, (r[i], g[i], b[i]));
                r[i] = rr;
                g[i] = gg;
                b[i] = bb;
            }
        }
    }

    for row in 0..height {
        for v in gbr.0.row_mut(row).iter_mut() {
            *v = f_delin(dst, *v as f64) as f32;
        }
        for v in gbr.1.row_mut(row).iter_mut() {
            *v = f_delin(dst, *v as f64) as f32;
        }
        for v in gbr.2.row_mut(row).iter_mut() {
            *v = f_delin(dst, *v as f64) as f32;
        }
    }
}

/// Copies an alpha plane byte-exact (spec 4.6: "Alpha plane, if present, is
/// copied byte-exact"), row by row to respect each side's own stride.
pub fn copy_alpha<T: Copy>(src: PlaneView<T>, mut dst: PlaneViewMut<T>) {
    for row in 0..dst.height {
        dst.row_mut(row).copy_from_slice(src.row(row));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{configure, ConversionOptions};
    use csc_data::colorspace::{ColorPrimaries, MatrixCoefficients, TransferCharacteristic};
    use csc_data::pixel::formats;
    use float_cmp::approx_eq;
    use std::sync::atomic::AtomicBool;

    #[test]
    fn gbr_f32_srgb_midgray_matches_reference() {
        let mut in_fmt = *formats::GBRPF32;
        in_fmt.primaries = ColorPrimaries::BT709;
        in_fmt.xfer = TransferCharacteristic::Linear;
        in_fmt.matrix = MatrixCoefficients::Identity;
        let mut out_fmt = in_fmt;
        out_fmt.xfer = TransferCharacteristic::SRGB;

        let warned = AtomicBool::new(false);
        let cfg = configure(&in_fmt, &out_fmt, &ConversionOptions::default(), &warned).unwrap();

        let mut g = [0.5f32];
        let mut b = [0.5f32];
        let mut r = [0.5f32];
        gbr_f32(
            (
                PlaneViewMut { data: &mut g, stride: 1, width: 1, height: 1 },
                PlaneViewMut { data: &mut b, stride: 1, width: 1, height: 1 },
                PlaneViewMut { data: &mut r, stride: 1, width: 1, height: 1 },
            ),
            &cfg,
        );

        // S5: linear 0.5 -> sRGB ~= 0.7354
        assert!(approx_eq!(f32, g[0], 0.7354, epsilon = 0.01));
        assert!(approx_eq!(f32, b[0], 0.7354, epsilon = 0.01));
        assert!(approx_eq!(f32, r[0], 0.7354, epsilon = 0.01));
    }

    #[test]
    fn gbr_half_linear_passthrough_takes_single_lut_pass() {
        let mut in_fmt = *formats::GBRPF16;
        in_fmt.primaries = ColorPrimaries::BT709;
        in_fmt.xfer = TransferCharacteristic::Linear;
        in_fmt.matrix = MatrixCoefficients::Identity;
        let mut out_fmt = in_fmt;
        out_fmt.xfer = TransferCharacteristic::SRGB;

        let warned = AtomicBool::new(false);
        let cfg = configure(&in_fmt, &out_fmt, &ConversionOptions::default(), &warned).unwrap();
        assert!(cfg.passthrough.lrgb2lrgb);

        let mut g = [f16::from_f32(0.5)];
        let mut b = [f16::from_f32(0.5)];
        let mut r = [f16::from_f32(0.5)];
        gbr_half(
            (
                PlaneViewMut { data: &mut g, stride: 1, width: 1, height: 1 },
                PlaneViewMut { data: &mut b, stride: 1, width: 1, height: 1 },
                PlaneViewMut { data: &mut r, stride: 1, width: 1, height: 1 },
            ),
            &cfg,
        );
        assert!(approx_eq!(f32, g[0].to_f32(), 0.7354, epsilon = 0.01));
    }

    #[test]
    fn copy_alpha_respects_independent_strides() {
        let src = vec![1u8, 2, 3, 0, 4, 5, 6, 0];
        let mut dst = vec![0u8; 6];
        copy_alpha(
            PlaneView { data: &src, stride: 4, width: 3, height: 2 },
            PlaneViewMut { data: &mut dst, stride: 3, width: 3, height: 2 },
        );
        assert_eq!(dst, vec![1, 2, 3, 4, 5, 6]);
    }
}
