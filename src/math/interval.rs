// Copyright @yucwang 2026

/// Binary search over a monotonic predicate on `[0, size)`.
///
/// `pred` must hold for every index below some threshold `k` and fail from `k`
/// on. Returns `k - 1` clamped to `[0, size - 2]`, i.e. the start of the
/// interval `[i, i + 1]` that brackets the transition. This is the lookup
/// used for every CDF inversion in the crate.
pub fn find_interval<P>(size: usize, pred: P) -> usize
where
    P: Fn(usize) -> bool,
{
    debug_assert!(size >= 2, "find_interval needs at least one interval");

    let mut first = 0usize;
    let mut len = size;
    while len > 0 {
        let half = len >> 1;
        let middle = first + half;
        if pred(middle) {
            first = middle + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }

    first.saturating_sub(1).min(size.saturating_sub(2))
}
