//! Generation-over-generation history for the fitness graph.

use std::collections::VecDeque;

/// Bounded history of one metric; the oldest sample is evicted when full.
pub struct RingBuffer {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Oldest sample first.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<f32> {
        self.samples.back().copied()
    }

    /// Smallest and largest retained sample.
    pub fn range(&self) -> Option<(f32, f32)> {
        self.iter().fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

pub struct EvolutionStats {
    pub best_fitness: RingBuffer,
    pub mean_fitness: RingBuffer,
    pub score: RingBuffer,
    pub all_time_best: f32,
    pub all_time_score: u32,
}

impl EvolutionStats {
    pub fn new(capacity: usize) -> Self {
        Self {
            best_fitness: RingBuffer::new(capacity),
            mean_fitness: RingBuffer::new(capacity),
            score: RingBuffer::new(capacity),
            all_time_best: 0.0,
            all_time_score: 0,
        }
    }

    pub fn record(&mut self, best: f32, mean: f32, score: u32) {
        if self.best_fitness.is_empty() || best > self.all_time_best {
            self.all_time_best = best;
        }
        self.all_time_score = self.all_time_score.max(score);
        self.best_fitness.push(best);
        self.mean_fitness.push(mean);
        self.score.push(score as f32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_buffer_iterates_in_insertion_order_after_wrap() {
        let mut buf = RingBuffer::new(3);
        buf.push(1.0);
        buf.push(2.0);
        buf.push(3.0);
        buf.push(4.0);

        let values: Vec<f32> = buf.iter().collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0]);
        assert_eq!(buf.last(), Some(4.0));
        assert_eq!(buf.range(), Some((2.0, 4.0)));
        assert_eq!(RingBuffer::new(4).range(), None);
    }

    #[test]
    fn stats_keep_all_time_records_beyond_window() {
        let mut stats = EvolutionStats::new(2);
        stats.record(-2.0, -4.0, 0);
        assert_eq!(stats.all_time_best, -2.0);

        stats.record(30.0, 10.0, 6);
        stats.record(12.0, 8.0, 2);
        stats.record(15.0, 9.0, 3);

        assert_eq!(stats.all_time_best, 30.0);
        assert_eq!(stats.all_time_score, 6);
        let best: Vec<f32> = stats.best_fitness.iter().collect();
        assert_eq!(best, vec![12.0, 15.0]);
    }
}
