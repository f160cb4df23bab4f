// Copyright @yucwang 2026

use crate::math::constants::{Float, CDF_EPSILON, ONE_MINUS_EPSILON};
use crate::math::interval::find_interval;

/// Read access to a normalized CDF with `bins() + 1` entries, `at(0) == 0` and
/// `at(bins()) == 1`.
pub trait CdfTable {
    fn entries(&self) -> usize;
    fn at(&self, index: usize) -> Float;

    fn bins(&self) -> usize {
        self.entries() - 1
    }
}

impl CdfTable for [Float] {
    fn entries(&self) -> usize {
        self.len()
    }

    fn at(&self, index: usize) -> Float {
        self[index]
    }
}

impl<const N: usize> CdfTable for [Float; N] {
    fn entries(&self) -> usize {
        N
    }

    fn at(&self, index: usize) -> Float {
        self[index]
    }
}

/// Bin holding `x`, for `x` in `[0, 1]`.
fn bin_of(x: Float, bins: usize) -> usize {
    ((x * bins as Float) as usize).min(bins - 1)
}

/// `(offset + du) / bins`, nudged by single ulps so it never rounds into a
/// neighbouring bin. Keeps `continuous_pdf(x)` on the same offset as the sample.
fn bin_point(offset: usize, du: Float, bins: usize) -> Float {
    let mut x = ((offset as Float + du) / bins as Float).min(ONE_MINUS_EPSILON);
    while x > 0.0 && bin_of(x, bins) > offset {
        x = Float::from_bits(x.to_bits() - 1);
    }
    while bin_of(x, bins) < offset {
        x = Float::from_bits(x.to_bits() + 1);
    }
    x
}

fn locate<C: CdfTable + ?Sized>(cdf: &C, u: Float) -> (usize, Float) {
    let offset = find_interval(cdf.entries(), |i| cdf.at(i) <= u);
    let width = cdf.at(offset + 1) - cdf.at(offset);
    let du = if width > CDF_EPSILON {
        (u - cdf.at(offset)) / width
    } else {
        0.0
    };
    (offset, du)
}

/// Probability mass of bin `index`.
pub fn cdf_discrete_pdf<C: CdfTable + ?Sized>(cdf: &C, index: usize) -> Float {
    debug_assert!(index < cdf.bins(), "bin index {} out of range", index);
    cdf.at(index + 1) - cdf.at(index)
}

/// Returns `(index, pmf, remainder)`.
pub fn cdf_sample_discrete<C: CdfTable + ?Sized>(cdf: &C, u: Float) -> (usize, Float, Float) {
    let (offset, du) = locate(cdf, u);
    (offset, cdf_discrete_pdf(cdf, offset), du)
}

/// Returns `(x, pdf, offset)` with `x` in `[0, 1)`.
pub fn cdf_sample_continuous<C: CdfTable + ?Sized>(cdf: &C, u: Float) -> (Float, Float, usize) {
    let bins = cdf.bins();
    let (offset, du) = locate(cdf, u);
    let pdf = cdf_discrete_pdf(cdf, offset) * bins as Float;
    (bin_point(offset, du, bins), pdf, offset)
}

/// Returns `(pdf, offset)` of the density at `x`.
pub fn cdf_continuous_pdf<C: CdfTable + ?Sized>(cdf: &C, x: Float) -> (Float, usize) {
    let bins = cdf.bins();
    let offset = bin_of(x, bins);
    (cdf_discrete_pdf(cdf, offset) * bins as Float, offset)
}

/// CDF at `x`, linearly interpolated inside the bin.
pub fn cdf_eval_continuous<C: CdfTable + ?Sized>(cdf: &C, x: Float) -> Float {
    let bins = cdf.bins();
    let offset = bin_of(x, bins);
    let t = (x * bins as Float - offset as Float).clamp(0.0, 1.0);
    cdf.at(offset) * (1.0 - t) + cdf.at(offset + 1) * t
}

/// CDF at the lower edge of the bin holding `x`.
pub fn cdf_eval_discrete<C: CdfTable + ?Sized>(cdf: &C, x: Float) -> Float {
    cdf.at(bin_of(x, cdf.bins()))
}

pub(crate) fn validate_weights(weights: &[Float]) -> Result<(), String> {
    if weights.is_empty() {
        return Err(String::from("distribution needs at least one weight"));
    }
    match weights.iter().position(|w| !w.is_finite() || *w < 0.0) {
        Some(i) => Err(format!("weight {} is not a finite non-negative value: {}", i, weights[i])),
        None => Ok(()),
    }
}

/// Piecewise-constant distribution over `[0, 1)` with `size()` equal bins.
///
/// Filled once through [`generate`](Self::generate) (or `from_values`), read-only
/// afterwards. Sampling and PDF queries are allocation free and take `&self`.
#[derive(Debug, Clone)]
pub struct Distribution1D {
    values: Vec<Float>,
    cdf: Vec<Float>,
    integral: Float,
    is_setup: bool,
}

impl Distribution1D {
    pub fn new(size: usize) -> Self {
        debug_assert!(size > 0, "Distribution1D needs at least one bin");
        Self {
            values: vec![0.0; size],
            cdf: vec![0.0; size + 1],
            integral: 0.0,
            is_setup: false,
        }
    }

    pub fn from_values(values: Vec<Float>) -> std::result::Result<Self, String> {
        validate_weights(&values)?;
        let mut dist = Self {
            cdf: vec![0.0; values.len() + 1],
            values,
            integral: 0.0,
            is_setup: false,
        };
        dist.setup();
        Ok(dist)
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Pre-normalization mass, `sum(values) / size`.
    pub fn integral(&self) -> Float {
        self.integral
    }

    pub fn values(&self) -> &[Float] {
        &self.values
    }

    pub fn cdf(&self) -> &[Float] {
        &self.cdf
    }

    pub fn is_setup(&self) -> bool {
        self.is_setup
    }

    pub fn is_degenerate(&self) -> bool {
        self.integral <= CDF_EPSILON
    }

    pub fn generate<F>(&mut self, mut value_fn: F)
    where
        F: FnMut(usize) -> Float,
    {
        for (i, value) in self.values.iter_mut().enumerate() {
            *value = value_fn(i);
        }
        self.setup();
    }

    pub fn setup(&mut self) {
        let n = self.size();

        self.cdf[0] = 0.0;
        for i in 1..n + 1 {
            self.cdf[i] = self.cdf[i - 1] + self.values[i - 1] / n as Float;
        }
        self.integral = self.cdf[n];

        if self.is_degenerate() {
            log::debug!("1D distribution of {} bins has no mass ({}), using uniform CDF.", n, self.integral);
            for (i, c) in self.cdf.iter_mut().enumerate() {
                *c = i as Float / n as Float;
            }
        } else {
            let integral = self.integral;
            for c in self.cdf.iter_mut().skip(1) {
                *c /= integral;
            }
        }
        self.cdf[n] = 1.0;
        self.is_setup = true;
    }

    fn bin_density(&self, offset: usize) -> Float {
        if self.is_degenerate() {
            1.0
        } else {
            self.values[offset] / self.integral
        }
    }

    /// Returns `(x, pdf, offset)`.
    pub fn sample_continuous(&self, u: Float) -> (Float, Float, usize) {
        debug_assert!(self.is_setup, "sampling a Distribution1D before setup");
        let (offset, du) = locate(self.cdf.as_slice(), u);
        (bin_point(offset, du, self.size()), self.bin_density(offset), offset)
    }

    /// Returns `(pdf, offset)`.
    pub fn continuous_pdf(&self, x: Float) -> (Float, usize) {
        debug_assert!(self.is_setup, "evaluating a Distribution1D before setup");
        let offset = bin_of(x, self.size());
        (self.bin_density(offset), offset)
    }

    /// Returns `(index, pmf, remainder)`. The remainder is the position of `u`
    /// inside the chosen CDF segment and is again uniform on `[0, 1)`.
    pub fn sample_discrete(&self, u: Float) -> (usize, Float, Float) {
        debug_assert!(self.is_setup, "sampling a Distribution1D before setup");
        let (offset, du) = locate(self.cdf.as_slice(), u);
        (offset, self.discrete_pdf(offset), du)
    }

    pub fn discrete_pdf(&self, index: usize) -> Float {
        debug_assert!(index < self.size(), "bin index {} out of range", index);
        self.bin_density(index) / self.size() as Float
    }

    pub fn eval_continuous(&self, x: Float) -> Float {
        cdf_eval_continuous(self.cdf.as_slice(), x)
    }

    pub fn eval_discrete(&self, x: Float) -> Float {
        cdf_eval_discrete(self.cdf.as_slice(), x)
    }

    /// Lowers every discrete PDF by `v`, clamps at zero and rebuilds.
    pub fn reduce_pdf_by(&mut self, v: Float) {
        let pdfs: Vec<Float> = (0..self.size()).map(|i| self.discrete_pdf(i)).collect();
        self.generate(|i| (pdfs[i] - v).max(0.0));
    }
}
