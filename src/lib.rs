//! Colorspace conversion engine.
//!
//! `data` carries the color-tagged pixel format and frame data model;
//! `convert` is the tag resolver, matrix/LUT builder, and slice-parallel
//! pixel kernels that turn one color characterization into another.

pub mod data {
    pub use csc_data::*;
}

pub mod convert {
    pub use csc_core::*;
}
