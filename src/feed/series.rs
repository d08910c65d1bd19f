//! src/feed/series.rs
//!
//! Sliding window of samples from a bounded random walk.

use std::collections::VecDeque;

use rand::Rng;

#[derive(Debug)]
pub struct Series {
    /// samples in the visible window (oldest at front)
    points: VecDeque<u64>,

    /// contiguous copy of `points`, handed to widgets that want a slice
    data_vec: Vec<u64>,

    capacity: usize,
    ceiling: u64,
}

impl Series {
    /// Create a window of `capacity` samples in `0..=ceiling`, pre-filled at
    /// the midpoint.
    pub fn new(capacity: usize, ceiling: u64) -> Self {
        let points: VecDeque<u64> = std::iter::repeat_n(ceiling / 2, capacity).collect();
        let data_vec = points.iter().copied().collect();
        Self {
            points,
            data_vec,
            capacity,
            ceiling,
        }
    }

    /// Append a sample, dropping the oldest once the window is full.
    ///
    /// Maintains invariant: points.len() <= capacity.
    pub fn push(&mut self, value: u64) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(value.min(self.ceiling));

        self.data_vec.clear();
        self.data_vec.extend(self.points.iter().copied());
    }

    /// Take one random step from the last sample.
    pub fn step<R: Rng>(&mut self, rng: &mut R) {
        let last = self.last() as i64;
        let delta = rng.random_range(-4i64..=4);
        let next = (last + delta).clamp(0, self.ceiling as i64);
        self.push(next as u64);
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.data_vec
    }

    pub fn last(&self) -> u64 {
        self.points.back().copied().unwrap_or(self.ceiling / 2)
    }

    pub fn ceiling(&self) -> u64 {
        self.ceiling
    }

    /// (min, max) over the visible window.
    pub fn range(&self) -> (u64, u64) {
        let mn = self.data_vec.iter().copied().min().unwrap_or(0);
        let mx = self.data_vec.iter().copied().max().unwrap_or(0);
        (mn, mx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn window_is_bounded() {
        let mut s = Series::new(3, 100);
        for v in [10, 20, 30, 40] {
            s.push(v);
        }
        assert_eq!(s.as_slice(), &[20, 30, 40]);
        assert_eq!(s.range(), (20, 40));
    }

    #[test]
    fn samples_are_capped() {
        let mut s = Series::new(2, 50);
        s.push(500);
        assert_eq!(s.last(), 50);
    }

    #[test]
    fn random_walk_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut s = Series::new(16, 10);
        for _ in 0..500 {
            s.step(&mut rng);
            assert!(s.last() <= 10);
        }
        assert_eq!(s.as_slice().len(), 16);
    }
}
