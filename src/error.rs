// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors
//!
//! Everything that can go wrong happens at the edges: validating the
//! request, allocating the working buffers, and talking to the image
//! and animation codecs.  Once a carver exists, the carving loop
//! itself cannot fail.

use failure::Fail;
use std::io;

/// The error type for every fallible operation in this crate.
#[derive(Debug, Fail)]
pub enum CarveError {
    /// The image is empty, or more seams were requested than there
    /// are columns to remove.
    #[fail(
        display = "cannot remove {} seams from a {}x{} image",
        seams, width, height
    )]
    InvalidDimensions { width: u32, height: u32, seams: u32 },

    /// A working buffer could not be allocated.
    #[fail(display = "could not allocate a {}x{} buffer", width, height)]
    AllocationFailure { width: u32, height: u32 },

    /// The image could not be decoded or encoded.
    #[fail(display = "image codec failure: {}", _0)]
    CodecFailure(#[cause] image::ImageError),

    /// The seam animation could not be encoded.
    #[fail(display = "animation encoding failure: {}", _0)]
    AnimationFailure(#[cause] gif::EncodingError),

    /// GIF frames are limited to 65535 pixels on a side.
    #[fail(display = "a {}x{} image is too large to animate", width, height)]
    FrameTooLarge { width: u32, height: u32 },

    #[fail(display = "i/o failure: {}", _0)]
    Io(#[cause] io::Error),
}

impl From<image::ImageError> for CarveError {
    fn from(err: image::ImageError) -> Self {
        CarveError::CodecFailure(err)
    }
}

impl From<gif::EncodingError> for CarveError {
    fn from(err: gif::EncodingError) -> Self {
        CarveError::AnimationFailure(err)
    }
}

impl From<io::Error> for CarveError {
    fn from(err: io::Error) -> Self {
        CarveError::Io(err)
    }
}

/// Shorthand for results carrying a [`CarveError`].
pub type Result<T> = std::result::Result<T, CarveError>;
