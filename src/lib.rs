// Copyright @yucwang 2021

//! Importance-sampling primitives: piecewise-constant 1D and 2D distributions,
//! fixed-size CDF tables and alias tables.

pub extern crate nalgebra as na;

pub mod math;
pub mod sampler;

#[cfg(test)]
mod test_utils;

pub use sampler::{AliasTable, Distribution1D, Distribution2D, StaticCdf};
