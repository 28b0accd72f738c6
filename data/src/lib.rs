pub mod rational {
    pub use num_rational::*;
}

pub mod audiosample;
pub mod colorspace;
pub mod frame;
pub mod packet;
pub mod params;
pub mod pixel;
pub mod timeinfo;
pub mod value;
