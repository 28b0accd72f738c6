//! The pipeline configurator (component D): tag resolution, the format
//! gate, passthrough flag computation, and lazy coefficient/LUT rebuild.

use std::sync::atomic::{AtomicBool, Ordering};

use csc_data::colorspace::{ColorPrimaries, MatrixCoefficients, TransferCharacteristic, YUVRange};
use csc_data::pixel::Formaton;

use crate::builder::{
    build_half_luts, build_int_luts, chromatic_adaptation, quantize_lrgb2lrgb, quantize_rgb2yuv,
    quantize_yuv2rgb, quantize_yuv2yuv, rgb_to_xyz, rgb_to_yuv, HalfLutPair, IntLutPair,
    WhitepointAdaptation,
};
use crate::error::{Error, Result};
use crate::matrix::{splat_matrix, CoeffMatrix, Lanes8};
use crate::tables::{luma_coeffs, preset_tuple, primaries_xy, Preset};

/// One side's resolved color tag: every field is a concrete, known-tuple
/// value (never `Unspecified`/`Reserved`) once resolution has succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTag {
    pub primaries: ColorPrimaries,
    pub xfer: TransferCharacteristic,
    pub matrix: MatrixCoefficients,
    pub range: YUVRange,
}

/// Pixel layout, orthogonal to the color tag: chroma subsampling and depth
/// for YUV, or the float lane width for planar GBR(A).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Yuv {
        log2_cw: u8,
        log2_ch: u8,
        depth: u8,
    },
    GbrHalf {
        alpha: bool,
    },
    GbrFloat {
        alpha: bool,
    },
}

impl Layout {
    pub fn is_rgb(&self) -> bool {
        matches!(self, Layout::GbrHalf { .. } | Layout::GbrFloat { .. })
    }

    pub fn has_alpha(&self) -> bool {
        match self {
            Layout::Yuv { .. } => false,
            Layout::GbrHalf { alpha } | Layout::GbrFloat { alpha } => *alpha,
        }
    }

    /// Derives a `Layout` from a `Formaton`, per the supported-format list
    /// in the external interface table.
    pub fn from_formaton(fmt: &Formaton) -> Result<Layout> {
        use csc_data::pixel::ColorModel::Trichromatic;
        use csc_data::pixel::TrichromaticEncodingSystem as Tri;
        use csc_data::pixel::YUVSystem;
        let depth = fmt.get_chromaton(0).map(|c| c.depth).unwrap_or(0);
        match fmt.get_model() {
            Trichromatic(Tri::YUV(YUVSystem::YCbCr(_))) => {
                fmt.get_chromaton(0).ok_or_else(|| {
                    Error::UnsupportedFormat("missing luma plane descriptor".into())
                })?;
                let chroma = fmt.get_chromaton(1).ok_or_else(|| {
                    Error::UnsupportedFormat("missing chroma plane descriptor".into())
                })?;
                if !matches!(depth, 8 | 10 | 12) {
                    return Err(Error::UnsupportedFormat(format!(
                        "unsupported YUV bit depth {depth}"
                    )));
                }
                let (log2_cw, log2_ch) = (chroma.h_ss, chroma.v_ss);
                if !matches!((log2_cw, log2_ch), (0, 0) | (1, 0) | (1, 1)) {
                    return Err(Error::UnsupportedFormat(format!(
                        "unsupported chroma subsampling {log2_cw}x{log2_ch}"
                    )));
                }
                Ok(Layout::Yuv {
                    log2_cw,
                    log2_ch,
                    depth,
                })
            }
            Trichromatic(Tri::RGB) if depth == 16 => Ok(Layout::GbrHalf {
                alpha: fmt.has_alpha(),
            }),
            Trichromatic(Tri::RGB) if depth == 32 => Ok(Layout::GbrFloat {
                alpha: fmt.has_alpha(),
            }),
            _ => Err(Error::UnsupportedFormat(
                "only planar YUV 8/10/12-bit and planar GBR(A) half/float are supported".into(),
            )),
        }
    }
}

/// Floyd-Steinberg dithering selector (option `dither`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dither {
    #[default]
    None,
    Fsb,
}

/// Per-side user overrides (the `i`-prefixed options target the input side;
/// unprefixed options target the output side).
#[derive(Debug, Clone, Copy, Default)]
pub struct TagOverride {
    pub all: Option<Preset>,
    pub primaries: Option<ColorPrimaries>,
    pub xfer: Option<TransferCharacteristic>,
    pub matrix: Option<MatrixCoefficients>,
    pub range: Option<YUVRange>,
}

/// The full set of user-facing configuration options (spec section 6).
#[derive(Debug, Clone, Default)]
pub struct ConversionOptions {
    pub input: TagOverride,
    pub output: TagOverride,
    /// Pins the output pixel format; `None` keeps the input's layout.
    pub format: Option<Formaton>,
    /// Forces `rgb2rgb_passthrough` (ignore primaries and gamma).
    pub fast: bool,
    pub dither: Dither,
    pub wpadapt: WhitepointAdaptation,
}

impl Default for WhitepointAdaptation {
    fn default() -> Self {
        WhitepointAdaptation::Bradford
    }
}

fn resolve_side(
    over: &TagOverride,
    frame_primaries: ColorPrimaries,
    frame_xfer: TransferCharacteristic,
    frame_matrix: MatrixCoefficients,
    frame_range: YUVRange,
    required: bool,
    warned_range: &AtomicBool,
) -> Result<ColorTag> {
    let (preset_p, preset_t, preset_m) = over
        .all
        .map(preset_tuple)
        .map(|t| (Some(t.0), Some(t.1), Some(t.2)))
        .unwrap_or((None, None, None));

    let primaries = over
        .primaries
        .or(preset_p)
        .unwrap_or(frame_primaries);
    let xfer = over.xfer.or(preset_t).unwrap_or(frame_xfer);
    let matrix = over.matrix.or(preset_m).unwrap_or(frame_matrix);
    let mut range = over.range.unwrap_or(frame_range);

    if range == YUVRange::Unspecified {
        if !warned_range.swap(true, Ordering::Relaxed) {
            log::warn!("color range unspecified, assuming limited range");
        }
        range = YUVRange::Limited;
    }

    if required {
        if primaries_xy(primaries).is_none() {
            return Err(Error::UnsupportedTag(format!(
                "no chromaticity mapping for primaries {primaries:?}"
            )));
        }
        if !crate::tables::is_external(xfer) && crate::tables::transfer_params(xfer).is_none() {
            return Err(Error::UnsupportedTag(format!(
                "no mapping for transfer characteristic {xfer:?}"
            )));
        }
        if matrix != MatrixCoefficients::Identity && luma_coeffs(matrix).is_none() {
            return Err(Error::UnsupportedTag(format!(
                "no luma coefficients for matrix {matrix:?}"
            )));
        }
    }

    Ok(ColorTag {
        primaries,
        xfer,
        matrix,
        range,
    })
}

/// Usable range width `y_rng`/`uv_rng` (spec: "per side: usable range
/// widths for Y and UV after subtracting `off`").
pub fn range_widths(range: YUVRange, depth: u8) -> (f64, f64) {
    let d = depth as i32;
    match range {
        YUVRange::Full => {
            let full = (2f64.powi(d)) - 1.0;
            (full, full)
        }
        YUVRange::Limited | YUVRange::Unspecified => {
            let y = 219.0 * 2f64.powi(d - 8);
            let uv = 224.0 * 2f64.powi(d - 8);
            (y, uv)
        }
    }
}

/// Y/UV offset for a given range and depth (subtracted before matrixing).
pub fn range_offset(range: YUVRange, depth: u8) -> (f64, f64) {
    match range {
        YUVRange::Full => (0.0, 2f64.powi(depth as i32 - 1)),
        YUVRange::Limited | YUVRange::Unspecified => {
            (16.0 * 2f64.powi(depth as i32 - 8), 2f64.powi(depth as i32 - 1))
        }
    }
}

/// Four independent passthrough flags (spec 4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassthroughFlags {
    pub lrgb2lrgb: bool,
    pub rgb2rgb: bool,
    pub yuv2yuv_fastmode: bool,
    pub yuv2yuv_passthrough: bool,
}

fn compute_passthrough(
    in_tag: &ColorTag,
    out_tag: &ColorTag,
    in_layout: &Layout,
    out_layout: &Layout,
    fast: bool,
    dither: Dither,
) -> PassthroughFlags {
    let lrgb2lrgb = in_tag.primaries == out_tag.primaries;
    let same_xfer = in_tag.xfer == out_tag.xfer && !crate::tables::is_external(out_tag.xfer);
    let rgb2rgb = fast || (lrgb2lrgb && same_xfer);

    let (in_sub, out_sub) = match (in_layout, out_layout) {
        (
            Layout::Yuv {
                log2_cw: icw,
                log2_ch: ich,
                ..
            },
            Layout::Yuv {
                log2_cw: ocw,
                log2_ch: och,
                ..
            },
        ) => (Some((*icw, *ich)), Some((*ocw, *och))),
        _ => (None, None),
    };
    // The fused fastmode kernel has no gamma/LUT stage to diffuse error
    // through, so a dithering request must fall through to the full
    // rgb2yuv_fsb path even when primaries/transfer/subsampling otherwise
    // qualify for the fast path (spec property 4 ties passthrough
    // equivalence to "dither is off").
    let yuv2yuv_fastmode =
        rgb2rgb && in_sub.is_some() && in_sub == out_sub && dither == Dither::None;

    let same_depth = match (in_layout, out_layout) {
        (Layout::Yuv { depth: di, .. }, Layout::Yuv { depth: d_o, .. }) => di == d_o,
        _ => false,
    };
    let yuv2yuv_passthrough =
        yuv2yuv_fastmode && in_tag.range == out_tag.range && in_tag.matrix == out_tag.matrix && same_depth;

    PassthroughFlags {
        lrgb2lrgb,
        rgb2rgb,
        yuv2yuv_fastmode,
        yuv2yuv_passthrough,
    }
}

/// Which kernel family a fully-resolved configuration dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    Integer,
    HalfFloat,
    Float32,
}

/// Cached fixed-point coefficients, in the shape the integer kernels need.
#[derive(Debug, Clone)]
pub struct IntCoefficients {
    pub yuv2rgb: CoeffMatrix,
    pub rgb2yuv: CoeffMatrix,
    pub yuv2yuv: CoeffMatrix,
    pub lrgb2lrgb: CoeffMatrix,
    pub in_off: (Lanes8, Lanes8),
    pub out_off: (Lanes8, Lanes8),
    pub y_rng: (f64, f64),
    pub uv_rng: (f64, f64),
}

/// The fully resolved, immutable-until-tags-change effective configuration.
pub struct EffectiveConfig {
    pub in_tag: ColorTag,
    pub out_tag: ColorTag,
    pub in_layout: Layout,
    pub out_layout: Layout,
    pub passthrough: PassthroughFlags,
    pub kind: PipelineKind,
    pub int_coeffs: Option<IntCoefficients>,
    pub int_luts: Option<IntLutPair>,
    pub half_luts: Option<HalfLutPair>,
    pub f32_src_xfer: TransferCharacteristic,
    pub f32_dst_xfer: TransferCharacteristic,
    pub lrgb_matrix_f32: [[f32; 3]; 3],
}

fn lrgb_to_lrgb_matrix(
    in_tag: &ColorTag,
    out_tag: &ColorTag,
    wpadapt: WhitepointAdaptation,
) -> Result<crate::matrix::Mat3> {
    let in_p = primaries_xy(in_tag.primaries)
        .ok_or_else(|| Error::UnsupportedTag(format!("primaries {:?}", in_tag.primaries)))?;
    let out_p = primaries_xy(out_tag.primaries)
        .ok_or_else(|| Error::UnsupportedTag(format!("primaries {:?}", out_tag.primaries)))?;
    let rgb_xyz_in = rgb_to_xyz(&in_p);
    let rgb_xyz_out = rgb_to_xyz(&out_p);
    let xyz_rgb_out = rgb_xyz_out.invert().expect("xyz->rgb always invertible");
    let adapt = chromatic_adaptation((in_p.x_w, in_p.y_w), (out_p.x_w, out_p.y_w), wpadapt);
    Ok(xyz_rgb_out.mul(&adapt).mul(&rgb_xyz_in))
}

/// Builds the effective configuration for a conversion from `in_fmt`'s tags
/// and layout to `out_fmt`'s, applying `opts`. This is the pipeline
/// configurator's entry point (component D).
pub fn configure(
    in_fmt: &Formaton,
    out_fmt: &Formaton,
    opts: &ConversionOptions,
    warned_range: &AtomicBool,
) -> Result<EffectiveConfig> {
    let in_layout = Layout::from_formaton(in_fmt)?;
    let out_layout = Layout::from_formaton(out_fmt)?;
    if in_layout.is_rgb() != out_layout.is_rgb() {
        return Err(Error::UnsupportedFormat(
            "cannot mix RGB and non-RGB sides in one conversion".into(),
        ));
    }

    let in_tag = resolve_side(
        &opts.input,
        in_fmt.get_primaries(),
        in_fmt.get_xfer(),
        in_fmt.get_matrix(),
        in_fmt.get_range(),
        false,
        warned_range,
    )?;
    let out_tag = resolve_side(
        &opts.output,
        out_fmt.get_primaries(),
        out_fmt.get_xfer(),
        out_fmt.get_matrix(),
        out_fmt.get_range(),
        true,
        warned_range,
    )?;

    let passthrough = compute_passthrough(&in_tag, &out_tag, &in_layout, &out_layout, opts.fast, opts.dither);

    let kind = match (&in_layout, &out_layout) {
        (Layout::GbrHalf { .. }, _) | (_, Layout::GbrHalf { .. }) => PipelineKind::HalfFloat,
        (Layout::GbrFloat { .. }, _) | (_, Layout::GbrFloat { .. }) => PipelineKind::Float32,
        _ => PipelineKind::Integer,
    };

    let mut cfg = EffectiveConfig {
        in_tag,
        out_tag,
        in_layout,
        out_layout,
        passthrough,
        kind,
        int_coeffs: None,
        int_luts: None,
        half_luts: None,
        f32_src_xfer: in_tag.xfer,
        f32_dst_xfer: out_tag.xfer,
        lrgb_matrix_f32: [[0.0; 3]; 3],
    };

    match kind {
        PipelineKind::Integer => build_integer_stage(&mut cfg, opts)?,
        PipelineKind::HalfFloat | PipelineKind::Float32 => build_float_stage(&mut cfg, opts)?,
    }

    Ok(cfg)
}

fn build_integer_stage(cfg: &mut EffectiveConfig, opts: &ConversionOptions) -> Result<()> {
    let in_depth = match cfg.in_layout {
        Layout::Yuv { depth, .. } => depth,
        _ => unreachable!(),
    };
    let out_depth = match cfg.out_layout {
        Layout::Yuv { depth, .. } => depth,
        _ => unreachable!(),
    };

    let (in_kr, in_kb) = luma_coeffs(cfg.in_tag.matrix)
        .ok_or_else(|| Error::UnsupportedTag(format!("matrix {:?}", cfg.in_tag.matrix)))?;
    let (out_kr, out_kb) = luma_coeffs(cfg.out_tag.matrix)
        .ok_or_else(|| Error::UnsupportedTag(format!("matrix {:?}", cfg.out_tag.matrix)))?;

    let in_y_rng_uv = range_widths(cfg.in_tag.range, in_depth);
    let out_y_rng_uv = range_widths(cfg.out_tag.range, out_depth);
    let in_off = range_offset(cfg.in_tag.range, in_depth);
    let out_off = range_offset(cfg.out_tag.range, out_depth);

    let yuv_to_rgb_m = crate::builder::yuv_to_rgb(in_kr, in_kb);
    let rgb_to_yuv_m = rgb_to_yuv(out_kr, out_kb);

    let yuv2rgb = quantize_yuv2rgb(&yuv_to_rgb_m, in_depth, in_y_rng_uv.0, in_y_rng_uv.1);
    let rgb2yuv = quantize_rgb2yuv(&rgb_to_yuv_m, out_depth, out_y_rng_uv.0, out_y_rng_uv.1);

    // coefficient invariants (property 2)
    debug_assert_eq!(yuv2rgb[0][1], 0);
    debug_assert_eq!(yuv2rgb[2][2], 0);
    debug_assert_eq!(yuv2rgb[0][0], yuv2rgb[1][0]);
    debug_assert_eq!(yuv2rgb[1][0], yuv2rgb[2][0]);

    let lrgb_m = if cfg.passthrough.lrgb2lrgb {
        crate::matrix::Mat3::IDENTITY
    } else {
        lrgb_to_lrgb_matrix(&cfg.in_tag, &cfg.out_tag, opts.wpadapt)?
    };
    let lrgb2lrgb = quantize_lrgb2lrgb(&lrgb_m);

    let yuv2yuv_m = if cfg.passthrough.yuv2yuv_fastmode {
        // Fused fast path: compose yuv_in->rgb with rgb->yuv_out in one
        // matrix (no gamma stage since rgb2rgb_passthrough holds here).
        // Reduces to the identity only when both sides share (Kr,Kb);
        // S2-style matrix-only conversions (same primaries/transfer,
        // different matrix) need the real composed matrix, not identity.
        let composed = rgb_to_yuv_m.mul(&yuv_to_rgb_m);
        quantize_yuv2yuv(
            &composed,
            in_depth,
            out_depth,
            (in_y_rng_uv.0, out_y_rng_uv.0),
            (in_y_rng_uv.1, out_y_rng_uv.1),
        )
    } else {
        [[0i16; 3]; 3]
    };
    if cfg.passthrough.yuv2yuv_fastmode {
        debug_assert_eq!(yuv2yuv_m[1][0], 0);
        debug_assert_eq!(yuv2yuv_m[2][0], 0);
    }

    cfg.int_coeffs = Some(IntCoefficients {
        yuv2rgb: splat_matrix(yuv2rgb),
        rgb2yuv: splat_matrix(rgb2yuv),
        yuv2yuv: splat_matrix(yuv2yuv_m),
        lrgb2lrgb: splat_matrix(lrgb2lrgb),
        in_off: (Lanes8::splat(in_off.0 as i16), Lanes8::splat(in_off.1 as i16)),
        out_off: (
            Lanes8::splat(out_off.0 as i16),
            Lanes8::splat(out_off.1 as i16),
        ),
        y_rng: (in_y_rng_uv.0, out_y_rng_uv.0),
        uv_rng: (in_y_rng_uv.1, out_y_rng_uv.1),
    });

    if !cfg.passthrough.rgb2rgb {
        cfg.int_luts = Some(build_int_luts(cfg.in_tag.xfer, cfg.out_tag.xfer));
    }

    Ok(())
}

fn build_float_stage(cfg: &mut EffectiveConfig, opts: &ConversionOptions) -> Result<()> {
    let lrgb_m = if cfg.passthrough.lrgb2lrgb {
        crate::matrix::Mat3::IDENTITY
    } else {
        lrgb_to_lrgb_matrix(&cfg.in_tag, &cfg.out_tag, opts.wpadapt)?
    };
    let mut f32m = [[0f32; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            f32m[i][j] = lrgb_m.0[i][j] as f32;
        }
    }
    cfg.lrgb_matrix_f32 = f32m;

    if !cfg.passthrough.rgb2rgb && cfg.kind == PipelineKind::HalfFloat {
        cfg.half_luts = Some(build_half_luts(cfg.in_tag.xfer, cfg.out_tag.xfer));
    }

    Ok(())
}

/// Holds everything that must survive across frames for one conversion
/// pipeline instance: cached configuration, the one-shot range warning
/// flag, and (owned by the caller's scratch allocator) the dither state.
/// Rebuilt lazily whenever the (tags, layout) key changes.
pub struct ConversionContext {
    opts: ConversionOptions,
    cached: Option<(Formaton, Formaton, EffectiveConfig)>,
    warned_range: AtomicBool,
}

impl ConversionContext {
    pub fn new(opts: ConversionOptions) -> Self {
        ConversionContext {
            opts,
            cached: None,
            warned_range: AtomicBool::new(false),
        }
    }

    /// The options this context was constructed with.
    pub fn options(&self) -> &ConversionOptions {
        &self.opts
    }

    /// Returns the effective configuration for `(in_fmt, out_fmt)`,
    /// rebuilding it if the cache is stale.
    pub fn get_or_build(
        &mut self,
        in_fmt: &Formaton,
        out_fmt: &Formaton,
    ) -> Result<&EffectiveConfig> {
        let stale = match &self.cached {
            Some((ci, co, _)) => ci != in_fmt || co != out_fmt,
            None => true,
        };
        if stale {
            let cfg = configure(in_fmt, out_fmt, &self.opts, &self.warned_range)?;
            self.cached = Some((*in_fmt, *out_fmt, cfg));
        }
        Ok(&self.cached.as_ref().unwrap().2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csc_data::pixel::formats;

    #[test]
    fn identical_tags_yield_full_passthrough() {
        let fmt = formats::YUV420
            .with_tags(
                ColorPrimaries::BT709,
                TransferCharacteristic::BT1886,
                MatrixCoefficients::BT709,
            )
            .with_range(YUVRange::Limited);
        let warned = AtomicBool::new(false);
        let cfg = configure(&fmt, &fmt, &ConversionOptions::default(), &warned).unwrap();
        assert!(cfg.passthrough.yuv2yuv_passthrough);
    }

    #[test]
    fn fast_option_forces_rgb2rgb_passthrough() {
        let mut in_fmt = *formats::YUV420;
        in_fmt.primaries = ColorPrimaries::BT709;
        in_fmt.xfer = TransferCharacteristic::BT1886;
        in_fmt.matrix = MatrixCoefficients::BT709;
        in_fmt.range = YUVRange::Limited;
        let mut out_fmt = in_fmt;
        out_fmt.matrix = MatrixCoefficients::BT470BG;

        let opts = ConversionOptions {
            fast: true,
            ..Default::default()
        };
        let warned = AtomicBool::new(false);
        let cfg = configure(&in_fmt, &out_fmt, &opts, &warned).unwrap();
        assert!(cfg.passthrough.rgb2rgb);
        assert!(!cfg.passthrough.yuv2yuv_passthrough);
    }

    #[test]
    fn odd_dimension_checked_elsewhere_but_unspecified_range_warns_once() {
        let mut fmt = *formats::YUV420;
        fmt.primaries = ColorPrimaries::BT709;
        fmt.xfer = TransferCharacteristic::BT1886;
        fmt.matrix = MatrixCoefficients::BT709;
        fmt.range = YUVRange::Unspecified;
        let warned = AtomicBool::new(false);
        let tag = resolve_side(
            &TagOverride::default(),
            fmt.get_primaries(),
            fmt.get_xfer(),
            fmt.get_matrix(),
            fmt.get_range(),
            true,
            &warned,
        )
        .unwrap();
        assert_eq!(tag.range, YUVRange::Limited);
        assert!(warned.load(Ordering::Relaxed));
    }
}
