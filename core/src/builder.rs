//! Composes RGB<->XYZ, chromatic adaptation, RGB<->RGB', and YUV<->RGB
//! matrices, and builds the linearize/delinearize LUTs.

use half::f16;

use crate::matrix::{Mat3, LUT_CENTER, LUT_SIZE_HALF, LUT_SIZE_INT, RGB_RANGE};
use crate::tables::{self, PrimariesXy, TransferParams};
use csc_data::colorspace::TransferCharacteristic;

/// Bradford and Von Kries cone-response matrices (fixed 3x3 tables).
pub const BRADFORD: Mat3 = Mat3([
    [0.8951, 0.2664, -0.1614],
    [-0.7502, 1.7135, 0.0367],
    [0.0389, -0.0685, 1.0296],
]);

pub const VON_KRIES: Mat3 = Mat3([
    [0.40024, 0.70760, -0.08081],
    [-0.22630, 1.16532, 0.04570],
    [0.0, 0.0, 0.91822],
]);

/// Chromatic adaptation algorithm selector (option `wpadapt`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitepointAdaptation {
    Bradford,
    VonKries,
    Identity,
}

fn xy_to_xyz(x: f64, y: f64) -> (f64, f64, f64) {
    (x / y, 1.0, (1.0 - x - y) / y)
}

/// Builds the RGB -> XYZ matrix for a primaries/whitepoint set: solve for
/// per-channel scale factors `Sr, Sg, Sb` such that `M . (1,1,1) = W_XYZ`,
/// then fold the scales into `M`'s columns.
pub fn rgb_to_xyz(p: &PrimariesXy) -> Mat3 {
    let r = xy_to_xyz(p.x_r, p.y_r);
    let g = xy_to_xyz(p.x_g, p.y_g);
    let b = xy_to_xyz(p.x_b, p.y_b);
    let w = xy_to_xyz(p.x_w, p.y_w);

    let unscaled = Mat3([[r.0, g.0, b.0], [r.1, g.1, b.1], [r.2, g.2, b.2]]);
    let inv = unscaled.invert().expect("primaries matrix is singular");
    let s = inv.mul_vec(w);

    Mat3([
        [r.0 * s.0, g.0 * s.1, b.0 * s.2],
        [r.1 * s.0, g.1 * s.1, b.1 * s.2],
        [r.2 * s.0, g.2 * s.1, b.2 * s.2],
    ])
}

/// `Ma^-1 . diag(Wd_cone / Ws_cone) . Ma`. `Identity` adaptation returns the
/// identity matrix outright — distinct from adapting between two equal
/// whitepoints, which also yields identity but by computation rather than
/// by suppression (design note: useful when a downstream consumer performs
/// its own adaptation).
pub fn chromatic_adaptation(
    ws: (f64, f64),
    wd: (f64, f64),
    mode: WhitepointAdaptation,
) -> Mat3 {
    let ma = match mode {
        WhitepointAdaptation::Bradford => BRADFORD,
        WhitepointAdaptation::VonKries => VON_KRIES,
        WhitepointAdaptation::Identity => return Mat3::IDENTITY,
    };
    let ws_xyz = xy_to_xyz(ws.0, ws.1);
    let wd_xyz = xy_to_xyz(wd.0, wd.1);
    let ws_cone = ma.mul_vec(ws_xyz);
    let wd_cone = ma.mul_vec(wd_xyz);
    let diag = Mat3::diag((
        wd_cone.0 / ws_cone.0,
        wd_cone.1 / ws_cone.1,
        wd_cone.2 / ws_cone.2,
    ));
    let ma_inv = ma.invert().expect("cone matrix is invertible");
    ma_inv.mul(&diag).mul(&ma)
}

/// RGB -> YUV matrix from `(Kr, Kb)`, `Kg = 1 - Kr - Kb`.
pub fn rgb_to_yuv(kr: f64, kb: f64) -> Mat3 {
    let kg = 1.0 - kr - kb;
    Mat3([
        [kr, kg, kb],
        [-kr / (2.0 * (1.0 - kb)), -kg / (2.0 * (1.0 - kb)), 0.5],
        [0.5, -kg / (2.0 * (1.0 - kr)), -kb / (2.0 * (1.0 - kr))],
    ])
}

pub fn yuv_to_rgb(kr: f64, kb: f64) -> Mat3 {
    rgb_to_yuv(kr, kb).invert().expect("YUV matrix is invertible")
}

// --- Fixed-point quantisation (spec 4.2) ---------------------------------

/// `lrgb2lrgb` coefficients: `round(c * 16384)`.
pub fn quantize_lrgb2lrgb(m: &Mat3) -> [[i16; 3]; 3] {
    quantize_scaled(m, 16384.0)
}

/// `yuv2rgb` coefficients: `round(28672 * 2^(d-1) * c / range)`.
pub fn quantize_yuv2rgb(m: &Mat3, d: u8, y_range: f64, uv_range: f64) -> [[i16; 3]; 3] {
    let half = 2f64.powi(d as i32 - 1);
    let mut out = [[0i16; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            let range = if j == 0 { y_range } else { uv_range };
            out[i][j] = crate::matrix::round_i16(RGB_RANGE * half * m.0[i][j] / range);
        }
    }
    out
}

/// `rgb2yuv` coefficients: `round(2^(29-d) * range * c / 28672)`.
pub fn quantize_rgb2yuv(m: &Mat3, d: u8, y_range: f64, uv_range: f64) -> [[i16; 3]; 3] {
    let scale = 2f64.powi(29 - d as i32);
    let mut out = [[0i16; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            let range = if i == 0 { y_range } else { uv_range };
            out[i][j] = crate::matrix::round_i16(scale * range * m.0[i][j] / RGB_RANGE);
        }
    }
    out
}

/// `yuv2yuv` fast-path coefficients: `round(16384 * c * out_range * 2^d_in /
/// (in_range * 2^d_out))`, scaled per output row — row 0 (Y) by the Y range
/// pair, rows 1/2 (U, V) by the UV range pair, since the composed matrix is
/// only diagonal-dominant when both sides share `(Kr, Kb)`; when the matrix
/// tag differs too (yuv2yuv_fastmode only requires primaries/transfer to
/// agree, spec 4.4), off-diagonal terms carry real U/V cross-talk that
/// still needs row-correct range scaling.
pub fn quantize_yuv2yuv(
    m: &Mat3,
    d_in: u8,
    d_out: u8,
    y_range: (f64, f64),
    uv_range: (f64, f64),
) -> [[i16; 3]; 3] {
    let mut out = [[0i16; 3]; 3];
    for i in 0..3 {
        let (range_in, range_out) = if i == 0 { y_range } else { uv_range };
        let scale =
            16384.0 * range_out * 2f64.powi(d_in as i32) / (range_in * 2f64.powi(d_out as i32));
        for j in 0..3 {
            out[i][j] = crate::matrix::round_i16(m.0[i][j] * scale);
        }
    }
    out
}

fn quantize_scaled(m: &Mat3, scale: f64) -> [[i16; 3]; 3] {
    let mut out = [[0i16; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            out[i][j] = crate::matrix::round_i16(m.0[i][j] * scale);
        }
    }
    out
}

// --- LUT construction (spec 4.2) -----------------------------------------

fn piecewise(v: f64, p: &TransferParams, forward: bool) -> f64 {
    // `forward` selects delinearize (f_delin: linear -> encoded); the
    // inverse (f_lin) is evaluated by swapping beta for its image under
    // delinearize, i.e. reflecting at `v = +-beta*delta`.
    let TransferParams {
        alpha,
        beta,
        gamma,
        delta,
    } = *p;
    if forward {
        if v <= -beta {
            -alpha * (-v).powf(gamma) + (alpha - 1.0)
        } else if v.abs() < beta {
            delta * v
        } else {
            alpha * v.powf(gamma) - (alpha - 1.0)
        }
    } else {
        let boundary = beta * delta;
        if v <= -boundary {
            -(((alpha - 1.0) - v) / alpha).powf(1.0 / gamma)
        } else if v.abs() < boundary {
            v / delta
        } else {
            ((v + (alpha - 1.0)) / alpha).powf(1.0 / gamma)
        }
    }
}

/// Evaluates the delinearize function (linear -> encoded) for a transfer
/// characteristic, dispatching to the external provider for non-parametric
/// entries.
pub fn f_delin(t: TransferCharacteristic, v: f64) -> f64 {
    if tables::is_external(t) {
        tables::external(t, v, false).unwrap_or(v)
    } else if let Some(p) = tables::transfer_params(t) {
        piecewise(v, &p, true)
    } else {
        v
    }
}

/// Evaluates the linearize function (encoded -> linear). Per design note
/// (a), when `t` is non-parametric it is only ever used as a delinearize
/// target; callers needing a linearize for a non-parametric source fall
/// back to the external provider's inverse directly (not routed through
/// this piecewise path).
pub fn f_lin(t: TransferCharacteristic, v: f64) -> f64 {
    if tables::is_external(t) {
        tables::external(t, v, true).unwrap_or(v)
    } else if let Some(p) = tables::transfer_params(t) {
        piecewise(v, &p, false)
    } else {
        v
    }
}

/// The pair of integer-pipeline LUTs: `lin_lut` (delinearized -> linear)
/// and `delin_lut` (linear -> delinearized), 32768 `i16` entries each.
#[derive(Debug, Clone)]
pub struct IntLutPair {
    pub lin_lut: Vec<i16>,
    pub delin_lut: Vec<i16>,
}

fn lut_index_to_value(n: usize) -> f64 {
    (n as f64 - LUT_CENTER as f64) / RGB_RANGE
}

fn clip_i16_round(v: f64) -> i16 {
    crate::matrix::round_i16(RGB_RANGE * v)
}

/// Builds both integer LUTs for converting from `src` to `dst` transfer
/// characteristics: `delin_lut` targets `dst`, `lin_lut` inverts `src`.
pub fn build_int_luts(src: TransferCharacteristic, dst: TransferCharacteristic) -> IntLutPair {
    let mut lin_lut = vec![0i16; LUT_SIZE_INT];
    let mut delin_lut = vec![0i16; LUT_SIZE_INT];
    for n in 0..LUT_SIZE_INT {
        let v = lut_index_to_value(n);
        lin_lut[n] = clip_i16_round(f_lin(src, v));
        delin_lut[n] = clip_i16_round(f_delin(dst, v));
    }
    IntLutPair { lin_lut, delin_lut }
}

/// The pair of half-float-pipeline LUTs, indexed by raw f16 bit pattern.
#[derive(Debug, Clone)]
pub struct HalfLutPair {
    pub lin_lut: Vec<u16>,
    pub delin_lut: Vec<u16>,
}

/// Builds both half-float LUTs. Indices are raw `f16` bit patterns (65536
/// of them); no clipping is applied beyond half's own saturation on
/// overflow, per spec.
pub fn build_half_luts(src: TransferCharacteristic, dst: TransferCharacteristic) -> HalfLutPair {
    let mut lin_lut = vec![0u16; LUT_SIZE_HALF];
    let mut delin_lut = vec![0u16; LUT_SIZE_HALF];
    for n in 0..LUT_SIZE_HALF {
        let v = f16::from_bits(n as u16).to_f64();
        lin_lut[n] = f16::from_f64(f_lin(src, v)).to_bits();
        delin_lut[n] = f16::from_f64(f_delin(dst, v)).to_bits();
    }
    HalfLutPair { lin_lut, delin_lut }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{luma_coeffs, primaries_xy};
    use csc_data::colorspace::{ColorPrimaries, MatrixCoefficients};
    use float_cmp::approx_eq;

    #[test]
    fn yuv_matrix_inverse_is_exact() {
        let (kr, kb) = luma_coeffs(MatrixCoefficients::BT709).unwrap();
        let fwd = rgb_to_yuv(kr, kb);
        let inv = yuv_to_rgb(kr, kb);
        let prod = fwd.mul(&inv);
        for i in 0..3 {
            for j in 0..3 {
                let expect = if i == j { 1.0 } else { 0.0 };
                assert!(approx_eq!(f64, prod.0[i][j], expect, epsilon = 1e-12));
            }
        }
    }

    #[test]
    fn identity_adaptation_ignores_whitepoint_mismatch() {
        let m = chromatic_adaptation((0.3127, 0.3290), (0.310, 0.316), WhitepointAdaptation::Identity);
        assert_eq!(m, Mat3::IDENTITY);
    }

    #[test]
    fn bradford_adaptation_between_equal_whitepoints_is_near_identity() {
        let w = (0.3127, 0.3290);
        let m = chromatic_adaptation(w, w, WhitepointAdaptation::Bradford);
        for i in 0..3 {
            for j in 0..3 {
                let expect = if i == j { 1.0 } else { 0.0 };
                assert!(approx_eq!(f64, m.0[i][j], expect, epsilon = 1e-9));
            }
        }
    }

    #[test]
    fn rgb_to_xyz_maps_white_to_white() {
        let p = primaries_xy(ColorPrimaries::BT709).unwrap();
        let m = rgb_to_xyz(&p);
        let xyz = m.mul_vec((1.0, 1.0, 1.0));
        let expect = xy_to_xyz(p.x_w, p.y_w);
        assert!(approx_eq!(f64, xyz.0, expect.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, xyz.2, expect.2, epsilon = 1e-9));
    }

    #[test]
    fn lut_round_trip_within_tolerance() {
        let luts = build_int_luts(TransferCharacteristic::BT1886, TransferCharacteristic::BT1886);
        // every code maps through delin then lin within a few codes, since
        // src == dst here and the piecewise form is monotonic and its own
        // near-inverse away from extreme clipping.
        let mut max_diff = 0i32;
        for n in 3000..30000 {
            let d = luts.delin_lut[n] as i32 + LUT_CENTER;
            let d = d.clamp(0, (crate::matrix::LUT_SIZE_INT - 1) as i32) as usize;
            let back = luts.lin_lut[d] as i32 + LUT_CENTER;
            max_diff = max_diff.max((back - n as i32).abs());
        }
        assert!(max_diff <= 4, "max_diff={max_diff}");
    }
}
