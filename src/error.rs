// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

/// A rendering error.
///
/// Only a handful of anomalies surface to the caller. Everything else
/// (degenerate geometry, out-of-bounds coordinates, empty polygons) is
/// recovered locally as a silent no-op.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Error {
    /// A surface, mask or scratch buffer allocation failed.
    AllocationFailed,
    /// A relative path segment was appended without a current point.
    InvalidPath,
    /// A device-to-user conversion was requested on a non-invertible transform.
    InvalidTransform,
    /// A surface was requested with an impossible size/format combination.
    UnsupportedPixelFormat,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::AllocationFailed => write!(f, "buffer allocation failed"),
            Error::InvalidPath => write!(f, "path has no current point"),
            Error::InvalidTransform => write!(f, "transform is not invertible"),
            Error::UnsupportedPixelFormat => {
                write!(f, "unsupported pixel format or surface size")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<vellum_path::PathError> for Error {
    fn from(_: vellum_path::PathError) -> Self {
        Error::InvalidPath
    }
}
