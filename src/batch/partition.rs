//! Static work partitioning
//!
//! A batch of `total` units is cut into `workers` contiguous half-open
//! ranges of `total / workers` units each. The last range also takes the
//! `total % workers` leftover, so the ranges are disjoint and cover
//! `[0, total)` exactly once.

use std::ops::Range;

/// Worker count for a batch of `total` units
///
/// Small batches are not worth the thread overhead and run on one worker.
/// A requested count of zero is treated as one.
pub fn effective_workers(total: usize, requested: usize, parallel_threshold: usize) -> usize {
    if total < parallel_threshold {
        1
    } else {
        requested.max(1)
    }
}

/// One worker's share of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Worker index
    pub worker: usize,

    /// First unit (inclusive)
    pub start: usize,

    /// End of the range (exclusive)
    pub end: usize,
}

impl Partition {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Mapping from worker index to its contiguous range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPlan {
    total: usize,
    partitions: Vec<Partition>,
}

impl PartitionPlan {
    pub fn new(total: usize, workers: usize) -> Self {
        let workers = workers.max(1);
        let per_worker = total / workers;

        let partitions = (0..workers)
            .map(|worker| {
                let start = worker * per_worker;
                let end = if worker == workers - 1 {
                    total
                } else {
                    start + per_worker
                };
                Partition { worker, start, end }
            })
            .collect();

        Self { total, partitions }
    }

    /// Units covered by the plan
    pub fn total(&self) -> usize {
        self.total
    }

    /// Units absorbed by the last partition beyond the even share
    pub fn leftover(&self) -> usize {
        self.total % self.partitions.len()
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Partition> {
        self.partitions.iter()
    }

    /// Number of partitions (equals the worker count)
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Apply the plan to a list of the same length
    pub fn split<'a, T>(&self, items: &'a [T]) -> Vec<&'a [T]> {
        debug_assert_eq!(items.len(), self.total);
        self.partitions.iter().map(|p| &items[p.range()]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(plan: &PartitionPlan) -> Vec<(usize, usize)> {
        plan.iter().map(|p| (p.start, p.end)).collect()
    }

    /// Every unit in [0, total) is covered exactly once
    fn assert_exact_cover(plan: &PartitionPlan) {
        let mut seen = vec![0u8; plan.total()];
        for p in plan.iter() {
            for i in p.range() {
                seen[i] += 1;
            }
        }
        assert!(seen.iter().all(|&n| n == 1), "plan {:?} is not an exact cover", plan);
    }

    #[test]
    fn test_even_split() {
        let plan = PartitionPlan::new(1000, 4);
        assert_eq!(
            ranges(&plan),
            vec![(0, 250), (250, 500), (500, 750), (750, 1000)]
        );
        assert_eq!(plan.leftover(), 0);
    }

    #[test]
    fn test_last_partition_absorbs_leftover() {
        let plan = PartitionPlan::new(1001, 4);
        assert_eq!(
            ranges(&plan),
            vec![(0, 250), (250, 500), (500, 750), (750, 1001)]
        );
        assert_eq!(plan.leftover(), 1);
        assert_eq!(plan.partitions()[3].len(), 251);
    }

    #[test]
    fn test_zero_workers_clamped() {
        let plan = PartitionPlan::new(10, 0);
        assert_eq!(plan.len(), 1);
        assert_eq!(ranges(&plan), vec![(0, 10)]);
    }

    #[test]
    fn test_fewer_units_than_workers() {
        let plan = PartitionPlan::new(3, 4);
        assert_eq!(ranges(&plan), vec![(0, 0), (0, 0), (0, 0), (0, 3)]);
        assert!(plan.partitions()[0].is_empty());
        assert_exact_cover(&plan);
    }

    #[test]
    fn test_empty_total() {
        let plan = PartitionPlan::new(0, 8);
        assert_eq!(plan.len(), 8);
        assert!(plan.iter().all(Partition::is_empty));
    }

    #[test]
    fn test_exact_cover_many_shapes() {
        for total in [0, 1, 7, 64, 999, 1000, 1001, 4099] {
            for workers in 1..=17 {
                let plan = PartitionPlan::new(total, workers);
                assert_eq!(plan.len(), workers);
                assert_exact_cover(&plan);
                // contiguous and ordered
                for pair in plan.partitions().windows(2) {
                    assert_eq!(pair[0].end, pair[1].start);
                }
            }
        }
    }

    #[test]
    fn test_split_slices() {
        let items: Vec<u32> = (0..10).collect();
        let plan = PartitionPlan::new(items.len(), 3);
        let chunks = plan.split(&items);
        assert_eq!(chunks, vec![&[0u32, 1, 2][..], &[3, 4, 5][..], &[6, 7, 8, 9][..]]);
    }

    #[test]
    fn test_effective_workers() {
        assert_eq!(effective_workers(999, 8, 1000), 1);
        assert_eq!(effective_workers(1000, 8, 1000), 8);
        assert_eq!(effective_workers(7000, 0, 1000), 1);
        assert_eq!(effective_workers(0, 8, 0), 8);
    }
}
