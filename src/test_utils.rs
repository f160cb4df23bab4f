// Copyright @yucwang 2026

use crate::math::constants::Float;

/// SplitMix64 stream of uniforms in `[0, 1)` for the statistical tests.
pub struct TestRng {
    state: u64,
}

impl TestRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    pub fn next_float(&mut self) -> Float {
        // 24 random bits keep the result strictly below one.
        (self.next_u64() >> 40) as Float * (1.0 / (1u64 << 24) as Float)
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
