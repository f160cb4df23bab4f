// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f};
use super::distribution_1d::{validate_weights, Distribution1D};

use std::thread;

/// Piecewise-constant distribution over `[0, 1)^2`.
///
/// One conditional [`Distribution1D`] per row and a marginal over the row
/// integrals. Rows are generated in parallel; the marginal is only built once
/// every row has finished.
#[derive(Debug, Clone)]
pub struct Distribution2D {
    width: usize,
    height: usize,
    conditional: Vec<Distribution1D>,
    marginal: Distribution1D,
    compensated: bool,
}

impl Distribution2D {
    pub fn new(width: usize, height: usize) -> Self {
        debug_assert!(width > 0 && height > 0, "Distribution2D needs a non-empty grid");
        Self {
            width,
            height,
            conditional: vec![Distribution1D::new(width); height],
            marginal: Distribution1D::new(height),
            compensated: false,
        }
    }

    /// Builds from row-major weights, `values[y * width + x]`.
    pub fn from_values(values: &[Float], width: usize, height: usize) -> std::result::Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("distribution has invalid resolution: {}x{}", width, height));
        }
        if values.len() != width * height {
            return Err(format!("expected {}x{} = {} weights, got {}",
                               width, height, width * height, values.len()));
        }
        validate_weights(values)?;

        let mut dist = Self::new(width, height);
        dist.generate(|x, y| values[y * width + x]);
        Ok(dist)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn integral(&self) -> Float {
        self.marginal.integral()
    }

    pub fn marginal(&self) -> &Distribution1D {
        &self.marginal
    }

    pub fn conditional(&self, y: usize) -> &Distribution1D {
        &self.conditional[y]
    }

    pub fn is_setup(&self) -> bool {
        self.marginal.is_setup()
    }

    pub fn generate<F>(&mut self, value_fn: F)
    where
        F: Fn(usize, usize) -> Float + Sync,
    {
        log::info!("Generating {}x{} 2D distribution.", self.width, self.height);
        self.for_each_row(|y, row| row.generate(|x| value_fn(x, y)));
        self.build_marginal();
    }

    /// MIS compensation: subtracts the average row PDF from every row and
    /// rebuilds. Rows left without mass become uniform.
    pub fn apply_compensation(&mut self) {
        debug_assert!(self.is_setup(), "compensating a Distribution2D before generate");
        debug_assert!(!self.compensated, "compensation already applied");

        let row_average = |row: &Distribution1D| {
            (0..row.size()).map(|x| row.discrete_pdf(x)).sum::<Float>() / row.size() as Float
        };
        let average = self.conditional.iter().map(row_average).sum::<Float>() / self.height as Float;

        log::info!("Applying MIS compensation to {}x{} distribution, average pdf = {}.",
                   self.width, self.height, average);
        self.for_each_row(|_, row| row.reduce_pdf_by(average));
        self.build_marginal();
        self.compensated = true;
    }

    /// Returns the sampled point and its density.
    pub fn sample_continuous(&self, u: &Vector2f) -> (Vector2f, Float) {
        debug_assert!(self.is_setup(), "sampling a Distribution2D before generate");
        let (d1, pdf_y, row) = self.marginal.sample_continuous(u.y);
        let (d0, pdf_x, _) = self.conditional[row].sample_continuous(u.x);
        (Vector2f::new(d0, d1), pdf_x * pdf_y)
    }

    pub fn continuous_pdf(&self, p: &Vector2f) -> Float {
        debug_assert!(self.is_setup(), "evaluating a Distribution2D before generate");
        let (pdf_y, row) = self.marginal.continuous_pdf(p.y);
        let (pdf_x, _) = self.conditional[row].continuous_pdf(p.x);
        pdf_x * pdf_y
    }

    /// Runs `op` on every row across scoped threads. Rows are split into
    /// contiguous chunks, so each thread owns disjoint rows; returning from the
    /// scope joins all of them.
    fn for_each_row<F>(&mut self, op: F)
    where
        F: Fn(usize, &mut Distribution1D) + Sync,
    {
        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(self.height)
            .max(1);
        let rows_per_thread = (self.height + thread_count - 1) / thread_count;
        let op = &op;

        thread::scope(|scope| {
            for (chunk, rows) in self.conditional.chunks_mut(rows_per_thread).enumerate() {
                scope.spawn(move || {
                    let first = chunk * rows_per_thread;
                    for (i, row) in rows.iter_mut().enumerate() {
                        op(first + i, row);
                    }
                });
            }
        });
    }

    fn build_marginal(&mut self) {
        let integrals: Vec<Float> = self.conditional.iter().map(|row| row.integral()).collect();
        self.marginal.generate(|y| integrals[y]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::EPSILON;
    use crate::test_utils::{init_logger, TestRng};

    fn close(a: Float, b: Float) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn uniform_grid_has_unit_density() {
        let mut dist = Distribution2D::new(2, 2);
        dist.generate(|_, _| 1.0);

        let mut rng = TestRng::new(1);
        for _ in 0..100 {
            let u = Vector2f::new(rng.next_float(), rng.next_float());
            let (p, pdf) = dist.sample_continuous(&u);
            assert!(close(pdf, 1.0));
            assert_eq!(dist.continuous_pdf(&p), pdf);
            assert!(close(p.x, u.x) && close(p.y, u.y));
        }
    }

    #[test]
    fn marginal_holds_row_integrals() {
        init_logger();
        let mut dist = Distribution2D::new(5, 7);
        dist.generate(|x, y| (x + 2 * y) as Float);

        for y in 0..dist.height() {
            assert_eq!(dist.marginal().values()[y], dist.conditional(y).integral());
        }
        // Mean of x + 2y over the grid.
        assert!(close(dist.integral(), 2.0 + 6.0));
    }

    #[test]
    fn sample_and_pdf_agree() {
        let mut rng = TestRng::new(9);
        let weights: Vec<Float> = (0..12 * 9).map(|_| rng.next_float() * 4.0).collect();
        let dist = Distribution2D::from_values(&weights, 12, 9).unwrap();

        for _ in 0..2000 {
            let u = Vector2f::new(rng.next_float(), rng.next_float());
            let (p, pdf) = dist.sample_continuous(&u);
            assert!(p.x >= 0.0 && p.x < 1.0 && p.y >= 0.0 && p.y < 1.0);
            assert_eq!(dist.continuous_pdf(&p), pdf);
        }
    }

    #[test]
    fn density_matches_cell_weight() {
        let weights = [1.0, 3.0, 0.0, 4.0];
        let dist = Distribution2D::from_values(&weights, 2, 2).unwrap();
        // Mean weight is 2, so density is weight / 2.
        assert!(close(dist.continuous_pdf(&Vector2f::new(0.25, 0.25)), 0.5));
        assert!(close(dist.continuous_pdf(&Vector2f::new(0.75, 0.25)), 1.5));
        assert!(close(dist.continuous_pdf(&Vector2f::new(0.25, 0.75)), 0.0));
        assert!(close(dist.continuous_pdf(&Vector2f::new(0.75, 0.75)), 2.0));
    }

    #[test]
    fn zero_rows_are_skipped() {
        let dist = Distribution2D::from_values(&[0.0, 0.0, 1.0, 1.0, 0.0, 0.0], 2, 3).unwrap();
        assert!(dist.conditional(0).is_degenerate());

        let mut rng = TestRng::new(4);
        for _ in 0..500 {
            let u = Vector2f::new(rng.next_float(), rng.next_float());
            let (p, pdf) = dist.sample_continuous(&u);
            assert!(p.y >= 1.0 / 3.0 && p.y < 2.0 / 3.0);
            assert!(close(pdf, 3.0));
        }
    }

    #[test]
    fn compensation_removes_flat_baseline() {
        init_logger();
        // Row 0 is flat, row 1 has a single peak.
        let weights = [1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 4.0];
        let mut dist = Distribution2D::from_values(&weights, 4, 2).unwrap();
        dist.apply_compensation();

        assert!(dist.conditional(0).is_degenerate());
        assert!(close(dist.conditional(1).discrete_pdf(3), 1.0));
        for y in 0..2 {
            assert_eq!(dist.marginal().values()[y], dist.conditional(y).integral());
        }

        // The flat row lost all its mass, so every sample lands in the peak.
        let mut rng = TestRng::new(2);
        for _ in 0..200 {
            let u = Vector2f::new(rng.next_float(), rng.next_float());
            let (p, pdf) = dist.sample_continuous(&u);
            assert!(p.x >= 0.75 && p.y >= 0.5);
            assert_eq!(dist.continuous_pdf(&p), pdf);
        }
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(Distribution2D::from_values(&[1.0, 2.0, 3.0], 2, 2).is_err());
        assert!(Distribution2D::from_values(&[], 0, 2).is_err());
        assert!(Distribution2D::from_values(&[1.0, -2.0], 2, 1).is_err());
    }
}
