//! Bounded history of observations used by adaptive optimizers.
//!
//! The most important type is [`History`].

use std::{
    cmp::Ordering,
    collections::{vec_deque, VecDeque},
};

use getset::{CopyGetters, Getters};
use nalgebra::DVector;

/// A single observation in normalized space.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct Sample {
    /// Point in the normalized unit hypercube.
    #[getset(get = "pub")]
    point: DVector<f64>,
    /// Observed objective value.
    #[getset(get_copy = "pub")]
    value: f64,
    /// Iteration at which the sample was observed.
    #[getset(get_copy = "pub")]
    index: usize,
}

impl Sample {
    /// Creates a new sample.
    pub fn new(point: DVector<f64>, value: f64, index: usize) -> Self {
        Self {
            point,
            value,
            index,
        }
    }
}

/// Forgetting window of the most recent samples.
///
/// Once the window is full, pushing a new sample evicts the oldest one. The
/// history never holds more samples than its capacity.
#[derive(Debug, Clone)]
pub struct History {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl History {
    /// Creates an empty history with given capacity. Zero capacity is treated
    /// as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Gets the maximum number of samples kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Gets the number of samples currently kept.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Appends a sample, returning the evicted one if the window was full.
    pub fn push(&mut self, sample: Sample) -> Option<Sample> {
        let evicted = if self.samples.len() >= self.capacity {
            self.samples.pop_front()
        } else {
            None
        };

        self.samples.push_back(sample);
        evicted
    }

    /// Iterates over the samples from the oldest to the newest.
    pub fn iter(&self) -> vec_deque::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Returns the samples ordered by value from the best to the worst.
    /// Non-finite values are placed last, ties keep the order of observation.
    pub fn sorted(&self) -> Vec<&Sample> {
        let mut sorted = self.samples.iter().collect::<Vec<_>>();
        sorted.sort_by(|lhs, rhs| compare_values(lhs.value, rhs.value));
        sorted
    }

    /// Gets the sample with the lowest finite value. If no value is finite, the
    /// oldest sample is returned.
    pub fn best(&self) -> Option<&Sample> {
        self.samples
            .iter()
            .reduce(|best, sample| match compare_values(sample.value, best.value) {
                Ordering::Less => sample,
                _ => best,
            })
    }

    /// Removes all samples except the best one.
    pub fn retain_best(&mut self) {
        let best = self.best().cloned();
        self.samples.clear();
        self.samples.extend(best);
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Sample;
    type IntoIter = vec_deque::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn compare_values(lhs: f64, rhs: f64) -> Ordering {
    match (lhs.is_finite(), rhs.is_finite()) {
        (true, true) => lhs.partial_cmp(&rhs).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(value: f64, index: usize) -> Sample {
        Sample::new(DVector::from_element(2, index as f64 / 10.0), value, index)
    }

    #[test]
    fn window_is_bounded() {
        let mut history = History::new(3);

        for i in 0..3 {
            assert_eq!(history.push(sample(i as f64, i)), None);
        }
        assert_eq!(history.len(), 3);

        let evicted = history.push(sample(10.0, 3)).unwrap();
        assert_eq!(evicted.index(), 0);
        assert_eq!(history.len(), 3);
        assert_eq!(
            history.iter().map(Sample::index).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn zero_capacity() {
        let mut history = History::new(0);
        history.push(sample(1.0, 0));
        history.push(sample(0.0, 1));
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn sorted_puts_non_finite_last() {
        let mut history = History::new(10);
        history.push(sample(f64::NAN, 0));
        history.push(sample(3.0, 1));
        history.push(sample(f64::NEG_INFINITY, 2));
        history.push(sample(-1.0, 3));
        history.push(sample(3.0, 4));

        let order = history
            .sorted()
            .into_iter()
            .map(Sample::index)
            .collect::<Vec<_>>();
        assert_eq!(&order[..3], &[3, 1, 4]);
        assert!(order[3..].contains(&0));
        assert!(order[3..].contains(&2));
    }

    #[test]
    fn best() {
        let mut history = History::new(10);
        assert!(history.best().is_none());

        history.push(sample(f64::NAN, 0));
        assert_eq!(history.best().map(Sample::index), Some(0));

        history.push(sample(2.0, 1));
        history.push(sample(0.5, 2));
        history.push(sample(0.5, 3));
        assert_eq!(history.best().map(Sample::index), Some(2));

        history.retain_best();
        assert_eq!(history.len(), 1);
        assert_eq!(history.iter().next().map(Sample::index), Some(2));
    }
}
