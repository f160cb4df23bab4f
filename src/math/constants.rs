/* Copyright 2020 @Yuchen Wong */

use nalgebra as na;

pub type Float = f32;
pub type Vector2f = na::Vector2<Float>;

pub const EPSILON: Float = 1e-4;

/// Total mass at or below this is treated as degenerate by every CDF builder.
pub const CDF_EPSILON: Float = 1e-6;

/// Largest `Float` strictly below one.
pub const ONE_MINUS_EPSILON: Float = 0.99999994;
