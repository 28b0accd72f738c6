use thiserror::Error;

/// Failures the configurator can surface before any pixel is touched.
///
/// Every variant is raised synchronously at frame arrival; no error is ever
/// produced once slice dispatch has started.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Frame width or height is odd.
    #[error("invalid frame dimensions {width}x{height}: both must be even")]
    InvalidDimensions {
        /// Offending width.
        width: usize,
        /// Offending height.
        height: usize,
    },

    /// Pixel format, bit depth, or RGB/YUV mixing is out of scope.
    #[error("unsupported pixel format: {0}")]
    UnsupportedFormat(String),

    /// A required color tag has no known mapping, or is `unspecified` with
    /// no preset to substitute it.
    #[error("unsupported color tag: {0}")]
    UnsupportedTag(String),

    /// Allocation of scratch buffers or LUTs failed.
    #[error("out of memory allocating {0}")]
    OutOfMemory(String),
}

pub type Result<T> = std::result::Result<T, Error>;
