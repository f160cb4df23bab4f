// Copyright @yucwang 2026

use crate::math::constants::{Float, CDF_EPSILON};
use super::distribution_1d::validate_weights;

use std::collections::VecDeque;

/// Vose's alias method for O(1) discrete sampling.
///
/// Weights are set freely until [`setup`](Self::setup); afterwards the table is
/// frozen and `sample` returns bins with exactly the frozen probabilities.
#[derive(Debug, Clone)]
pub struct AliasTable {
    probability: Vec<Float>,
    prob_table: Vec<Float>,
    alias_table: Vec<u32>,
}

impl AliasTable {
    pub fn new(resolution: usize) -> Self {
        debug_assert!(resolution > 0, "AliasTable needs at least one bin");
        Self {
            probability: vec![0.0; resolution],
            prob_table: Vec::new(),
            alias_table: Vec::new(),
        }
    }

    /// Normalizes `weights` and builds the tables.
    pub fn from_weights(weights: &[Float]) -> std::result::Result<Self, String> {
        validate_weights(weights)?;
        if weights.len() > u32::MAX as usize {
            return Err(format!("alias table too large: {} bins", weights.len()));
        }

        let mut table = Self {
            probability: weights.to_vec(),
            prob_table: Vec::new(),
            alias_table: Vec::new(),
        };
        table.normalize();
        table.setup();
        Ok(table)
    }

    pub fn resolution(&self) -> usize {
        self.probability.len()
    }

    pub fn set_probability(&mut self, index: usize, value: Float) {
        debug_assert!(!self.is_setup(), "alias table is frozen after setup");
        self.probability[index] = value;
    }

    pub fn probability(&self, index: usize) -> Float {
        self.probability[index]
    }

    pub fn probabilities(&self) -> &[Float] {
        &self.probability
    }

    /// Divides by the total weight; no-op when there is no mass.
    pub fn normalize(&mut self) {
        let sum: Float = self.probability.iter().sum();
        if sum <= CDF_EPSILON {
            log::debug!("Alias table of {} bins has no mass, skipping normalize.", self.resolution());
            return;
        }
        self.scale(1.0 / sum);
    }

    /// Divides by the largest weight; no-op when there is no mass.
    pub fn rebound(&mut self) {
        let max = self.probability.iter().fold(0.0 as Float, |m, p| m.max(*p));
        if max <= CDF_EPSILON {
            log::debug!("Alias table of {} bins has no mass, skipping rebound.", self.resolution());
            return;
        }
        self.scale(1.0 / max);
    }

    pub fn scale(&mut self, factor: Float) {
        debug_assert!(!self.is_setup(), "alias table is frozen after setup");
        for p in self.probability.iter_mut() {
            *p *= factor;
        }
    }

    pub fn is_setup(&self) -> bool {
        !self.prob_table.is_empty()
    }

    /// Builds the probability and alias tables. Expects normalized weights.
    pub fn setup(&mut self) {
        debug_assert!(!self.is_setup(), "alias table set up twice");
        let n = self.resolution();
        let mut prob_table = vec![1.0 as Float; n];
        let mut alias_table: Vec<u32> = (0..n as u32).collect();

        let mut excess: Vec<Float> = self.probability.iter().map(|p| p * n as Float).collect();
        let mut small = VecDeque::with_capacity(n);
        let mut large = VecDeque::with_capacity(n);
        for (i, e) in excess.iter().enumerate() {
            if *e < 1.0 {
                small.push_back(i);
            } else {
                large.push_back(i);
            }
        }

        while let (Some(&s), Some(&l)) = (small.front(), large.front()) {
            small.pop_front();
            large.pop_front();

            prob_table[s] = excess[s];
            alias_table[s] = l as u32;

            excess[l] = (excess[l] + excess[s]) - 1.0;
            if excess[l] < 1.0 {
                small.push_back(l);
            } else {
                large.push_back(l);
            }
        }
        // Whatever is left in either queue is a full bin aliased to itself,
        // which is how both tables were initialized.

        self.prob_table = prob_table;
        self.alias_table = alias_table;
    }

    /// Draws a bin from two independent uniforms in `[0, 1)`.
    /// Returns `(index, probability)`.
    pub fn sample(&self, u1: Float, u2: Float) -> (usize, Float) {
        debug_assert!(self.is_setup(), "sampling an alias table before setup");
        let n = self.resolution();
        let bin = ((u1 * n as Float) as usize).min(n - 1);
        let index = if u2 < self.prob_table[bin] {
            bin
        } else {
            self.alias_table[bin] as usize
        };
        (index, self.probability[index])
    }
}
