// Copyright @yucwang 2026

use crate::math::constants::{Float, CDF_EPSILON};
use super::distribution_1d::{
    cdf_continuous_pdf, cdf_discrete_pdf, cdf_sample_continuous, cdf_sample_discrete, CdfTable,
};

/// Normalized CDF over `N` bins, buildable in a `const` context.
///
/// Only the upper edges `cdf[1..=N]` are stored; `cdf[0]` is always zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticCdf<const N: usize> {
    upper: [Float; N],
}

impl<const N: usize> StaticCdf<N> {
    pub const fn new(weights: &[Float; N]) -> Self {
        Self::normalized(*weights)
    }

    /// Sums three weight sets bin by bin before normalizing.
    pub const fn new_summed(a: &[Float; N], b: &[Float; N], c: &[Float; N]) -> Self {
        let mut sums = [0.0 as Float; N];
        let mut i = 0;
        while i < N {
            sums[i] = a[i] + b[i] + c[i];
            i += 1;
        }
        Self::normalized(sums)
    }

    const fn normalized(weights: [Float; N]) -> Self {
        let mut upper = [0.0 as Float; N];
        let mut total: Float = 0.0;
        let mut i = 0;
        while i < N {
            total += weights[i] / N as Float;
            upper[i] = total;
            i += 1;
        }

        i = 0;
        if total <= CDF_EPSILON {
            while i < N {
                upper[i] = (i + 1) as Float / N as Float;
                i += 1;
            }
        } else {
            while i < N {
                upper[i] /= total;
                i += 1;
            }
        }
        if N > 0 {
            upper[N - 1] = 1.0;
        }
        Self { upper }
    }

    pub const fn size(&self) -> usize {
        N
    }

    pub const fn at(&self, index: usize) -> Float {
        if index == 0 {
            0.0
        } else {
            self.upper[index - 1]
        }
    }

    /// Returns `(x, pdf, offset)`.
    pub fn sample_continuous(&self, u: Float) -> (Float, Float, usize) {
        cdf_sample_continuous(self, u)
    }

    /// Returns `(pdf, offset)`.
    pub fn continuous_pdf(&self, x: Float) -> (Float, usize) {
        cdf_continuous_pdf(self, x)
    }

    /// Returns `(index, pmf, remainder)`.
    pub fn sample_discrete(&self, u: Float) -> (usize, Float, Float) {
        cdf_sample_discrete(self, u)
    }

    pub fn discrete_pdf(&self, index: usize) -> Float {
        cdf_discrete_pdf(self, index)
    }
}

impl<const N: usize> CdfTable for StaticCdf<N> {
    fn entries(&self) -> usize {
        N + 1
    }

    fn at(&self, index: usize) -> Float {
        StaticCdf::at(self, index)
    }
}
