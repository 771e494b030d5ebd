// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

/*!
Geometry primitives and the path builder for [vellum](https://github.com/vellum-rs/vellum).

Provides points, affine transforms and the path node stream the renderer
consumes. Path coordinates are `f64` and are mapped into device space at
append time by the builder's current transform.
*/

#![warn(missing_docs)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![allow(clippy::approx_constant)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]
#![allow(clippy::too_many_arguments)]

mod path;
mod path_builder;
mod point;
mod scalar;
mod transform;

pub use path::{Path, PathNode};
pub use path_builder::{FixedPathBuilder, PathBuilder, PathError};
pub use point::Point;
pub use scalar::{Scalar, SCALAR_NEARLY_ZERO};
pub use transform::Transform;
