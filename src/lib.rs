// #![deny(missing_docs)]

//! Content-aware image shrinking.
//!
//! Seam carving narrows an image by repeatedly removing the connected
//! top-to-bottom path of pixels that carries the least visual energy,
//! so flat regions give way before edges and detail do.

pub mod ternary;

pub mod error;
pub use error::{CarveError, Result};

pub mod plane;
pub use plane::{PixelBuffer, Plane, ScalarField};

pub mod codec;
pub mod luminance;

pub mod energy;
pub use energy::{EnergyField, Score};

pub mod cost;
pub mod seamfinder;
pub use seamfinder::Seam;

pub mod rescore;

pub mod palette;

pub mod animation;
pub use animation::{AnimationOptions, FrameSink, GifRecorder, NoFrames};

pub mod seamcarver;
pub use seamcarver::{carve, carve_with, seams_for_ratio, SeamCarver, DEFAULT_KEEP_RATIO};
