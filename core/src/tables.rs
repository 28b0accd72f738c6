//! Per-enum color-science lookups: chromaticities, luma coefficients,
//! transfer-characteristic parameters, and the convenience "all" presets.
//!
//! All values are ITU-R/SMPTE/ISO public constants, the same ones
//! `libavutil/csp.c` tabulates by enum id.

use csc_data::colorspace::{ColorPrimaries, MatrixCoefficients, TransferCharacteristic};

/// Chromaticity coordinates of the red, green, blue, and white points of an
/// RGB basis, in CIE 1931 xy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimariesXy {
    pub x_r: f64,
    pub y_r: f64,
    pub x_g: f64,
    pub y_g: f64,
    pub x_b: f64,
    pub y_b: f64,
    pub x_w: f64,
    pub y_w: f64,
}

const D65: (f64, f64) = (0.3127, 0.3290);
const ILLUMINANT_C: (f64, f64) = (0.310, 0.316);
const DCI: (f64, f64) = (0.314, 0.351);

/// Returns the chromaticity tuple for a primaries enum, or `None` if the
/// enum has no physical chromaticity (unspecified/reserved/identity).
pub fn primaries_xy(p: ColorPrimaries) -> Option<PrimariesXy> {
    let (r, g, b, w) = match p {
        ColorPrimaries::BT709 => ((0.640, 0.330), (0.300, 0.600), (0.150, 0.060), D65),
        ColorPrimaries::BT470M => ((0.670, 0.330), (0.210, 0.710), (0.140, 0.080), ILLUMINANT_C),
        ColorPrimaries::BT470BG => ((0.640, 0.330), (0.290, 0.600), (0.150, 0.060), D65),
        ColorPrimaries::ST170M => ((0.630, 0.340), (0.310, 0.595), (0.155, 0.070), D65),
        ColorPrimaries::ST240M => ((0.630, 0.340), (0.310, 0.595), (0.155, 0.070), D65),
        ColorPrimaries::BT2020 => ((0.708, 0.292), (0.170, 0.797), (0.131, 0.046), D65),
        ColorPrimaries::ST428 => ((1.0, 0.0), (0.0, 1.0), (0.0, 0.0), (1.0 / 3.0, 1.0 / 3.0)),
        ColorPrimaries::P3DCI => ((0.680, 0.320), (0.265, 0.690), (0.150, 0.060), DCI),
        ColorPrimaries::P3Display => ((0.680, 0.320), (0.265, 0.690), (0.150, 0.060), D65),
        _ => return None,
    };
    Some(PrimariesXy {
        x_r: r.0,
        y_r: r.1,
        x_g: g.0,
        y_g: g.1,
        x_b: b.0,
        y_b: b.1,
        x_w: w.0,
        y_w: w.1,
    })
}

/// Returns `(Kr, Kb)` luma coefficients for a matrix enum, or `None` when
/// the matrix has no linear luma weighting (`Identity`, `YCgCo`, `ICtCp`,
/// constant-luminance BT.2020 — see the BT.2020 constant-luminance note in
/// the design notes: it is recognised but routed through the
/// non-constant-luminance coefficients).
pub fn luma_coeffs(m: MatrixCoefficients) -> Option<(f64, f64)> {
    match m {
        MatrixCoefficients::BT709 => Some((0.2126, 0.0722)),
        MatrixCoefficients::BT470BG | MatrixCoefficients::ST170M => Some((0.299, 0.114)),
        MatrixCoefficients::ST240M => Some((0.212, 0.087)),
        MatrixCoefficients::BT2020NonConstantLuminance
        | MatrixCoefficients::BT2020ConstantLuminance => Some((0.2627, 0.0593)),
        _ => None,
    }
}

/// Parametric transfer-characteristic coefficients `(alpha, beta, gamma,
/// delta)` such that, for `v` the decoded (linear) sample on `[0,1]`:
///
/// ```text
/// f_delin(v) = -alpha*|v|^gamma + (alpha-1)   for v <= -beta
///            =  delta*v                       for |v| < beta
///            =  alpha*v^gamma - (alpha-1)      for v >= beta
/// ```
///
/// `None` means the characteristic is non-parametric and must go through
/// [`external`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferParams {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub delta: f64,
}

pub fn transfer_params(t: TransferCharacteristic) -> Option<TransferParams> {
    use TransferCharacteristic::*;
    let (alpha, beta, gamma, delta) = match t {
        BT1886 | ST170M | BT2020Ten | BT2020Twelve | XVYCC => (1.099, 0.018, 0.45, 4.5),
        BT470M => (1.0, 0.0, 1.0 / 2.2, 0.0),
        BT470BG => (1.0, 0.0, 1.0 / 2.8, 0.0),
        ST240M => (1.1115, 0.0228, 0.45, 4.0),
        Linear => (1.0, 0.0, 1.0, 0.0),
        SRGB => (1.055, 0.0031308, 1.0 / 2.4, 12.92),
        _ => return None,
    };
    Some(TransferParams {
        alpha,
        beta,
        gamma,
        delta,
    })
}

/// Transfer characteristics with no closed parametric form but a fixed
/// analytic function the engine implements directly, per design note (a):
/// these are the only non-parametric TRCs usable as a delinearize target.
pub fn is_external(t: TransferCharacteristic) -> bool {
    matches!(
        t,
        TransferCharacteristic::PerceptualQuantizer | TransferCharacteristic::HybridLogGamma
    )
}

/// SMPTE ST 2084 (PQ) and ARIB STD-B67 (HLG) transfer functions.
///
/// `inverse = false` maps linear `v` (nominal `[0,1]`, PQ extends to 10000
/// cd/m^2) to the encoded signal; `inverse = true` is the OETF's inverse
/// (decode).
pub fn external(t: TransferCharacteristic, v: f64, inverse: bool) -> Option<f64> {
    match t {
        TransferCharacteristic::PerceptualQuantizer => {
            const M1: f64 = 2610.0 / 16384.0;
            const M2: f64 = 2523.0 / 4096.0 * 128.0;
            const C1: f64 = 3424.0 / 4096.0;
            const C2: f64 = 2413.0 / 4096.0 * 32.0;
            const C3: f64 = 2392.0 / 4096.0 * 32.0;
            if inverse {
                // encoded -> linear
                let ep = v.max(0.0).powf(1.0 / M2);
                let num = (ep - C1).max(0.0);
                let den = C2 - C3 * ep;
                Some((num / den).powf(1.0 / M1))
            } else {
                let lp = v.max(0.0).powf(M1);
                Some(((C1 + C2 * lp) / (1.0 + C3 * lp)).powf(M2))
            }
        }
        TransferCharacteristic::HybridLogGamma => {
            const A: f64 = 0.17883277;
            const B: f64 = 1.0 - 4.0 * A;
            const C: f64 = 0.5 - A * (4.0 * A).ln();
            if inverse {
                // encoded signal -> linear scene value
                Some(if v <= 0.5 {
                    v * v / 3.0
                } else {
                    (((v - C) / A).exp() + B) / 12.0
                })
            } else {
                // linear scene value -> encoded signal
                let e = v.max(0.0);
                Some(if e <= 1.0 / 12.0 {
                    (3.0 * e).sqrt()
                } else {
                    A * (12.0 * e - B).ln() + C
                })
            }
        }
        _ => None,
    }
}

/// The convenience "all"/"space" preset enum (FFmpeg's `enum Colorspace`):
/// sets primaries, transfer, and matrix together from one name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    BT470M,
    BT470BG,
    BT601525,
    BT601625,
    BT709,
    SMPTE170M,
    SMPTE240M,
    BT2020,
}

/// Returns the `(primaries, transfer, matrix)` triple a preset expands to.
pub fn preset_tuple(p: Preset) -> (ColorPrimaries, TransferCharacteristic, MatrixCoefficients) {
    use ColorPrimaries as CP;
    use MatrixCoefficients as MC;
    use TransferCharacteristic as TC;
    match p {
        Preset::BT470M => (CP::BT470M, TC::BT470M, MC::BT470M),
        Preset::BT470BG => (CP::BT470BG, TC::BT470BG, MC::BT470BG),
        Preset::BT601525 => (CP::ST170M, TC::ST170M, MC::ST170M),
        Preset::BT601625 => (CP::BT470BG, TC::BT470BG, MC::BT470BG),
        Preset::BT709 => (CP::BT709, TC::BT1886, MC::BT709),
        Preset::SMPTE170M => (CP::ST170M, TC::ST170M, MC::ST170M),
        Preset::SMPTE240M => (CP::ST240M, TC::ST240M, MC::ST240M),
        Preset::BT2020 => (CP::BT2020, TC::BT2020Ten, MC::BT2020NonConstantLuminance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn bt709_primaries_match_known_constants() {
        let p = primaries_xy(ColorPrimaries::BT709).unwrap();
        assert!(approx_eq!(f64, p.x_r, 0.640, epsilon = 1e-9));
        assert!(approx_eq!(f64, p.y_w, 0.3290, epsilon = 1e-9));
    }

    #[test]
    fn unspecified_has_no_chromaticity() {
        assert_eq!(primaries_xy(ColorPrimaries::Unspecified), None);
        assert_eq!(primaries_xy(ColorPrimaries::Reserved0), None);
    }

    #[test]
    fn pq_round_trips_within_tolerance() {
        let linear = 0.18_f64;
        let encoded = external(TransferCharacteristic::PerceptualQuantizer, linear, false).unwrap();
        let back = external(TransferCharacteristic::PerceptualQuantizer, encoded, true).unwrap();
        assert!(approx_eq!(f64, linear, back, epsilon = 1e-6));
    }

    #[test]
    fn hlg_round_trips_within_tolerance_on_both_sides_of_the_knee() {
        for linear in [0.02_f64, 0.18, 0.5, 0.9] {
            let encoded = external(TransferCharacteristic::HybridLogGamma, linear, false).unwrap();
            let back = external(TransferCharacteristic::HybridLogGamma, encoded, true).unwrap();
            assert!(
                approx_eq!(f64, linear, back, epsilon = 1e-6),
                "linear={linear} encoded={encoded} back={back}"
            );
        }
    }

    #[test]
    fn hlg_knee_is_continuous() {
        let below = external(TransferCharacteristic::HybridLogGamma, 1.0 / 12.0 - 1e-9, false).unwrap();
        let above = external(TransferCharacteristic::HybridLogGamma, 1.0 / 12.0 + 1e-9, false).unwrap();
        assert!(approx_eq!(f64, below, above, epsilon = 1e-4));
    }
}
