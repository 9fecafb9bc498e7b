//! This module contains utility structures for managing k-best elements using a binary heap.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use ordered_float::OrderedFloat; // For using f64 in BinaryHeap

/// One selected neighbor: its distance to the query, its storage index and its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor<P> {
    pub distance: f64,
    pub index: usize,
    pub data: P,
}

/// Represents an element in the KBestNeighbors heap.
///
/// Ordered by distance first and storage index second, so that among equal
/// distances the point stored earlier counts as nearer.
#[derive(Debug)]
struct HeapElement<P> {
    distance: OrderedFloat<f64>,
    index: usize,
    data: P,
}

impl<P> HeapElement<P> {
    fn key(&self) -> (OrderedFloat<f64>, usize) {
        (self.distance, self.index)
    }
}

impl<P> PartialEq for HeapElement<P> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}
impl<P> Eq for HeapElement<P> {}

impl<P> PartialOrd for HeapElement<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P> Ord for HeapElement<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: the worst of the k kept candidates sits on top.
        self.key().cmp(&other.key())
    }
}

/// Manages a collection of the K "best" (smallest distance) items seen so far.
///
/// The result is identical to stably sorting every candidate by distance and
/// taking the first `capacity`, but only `capacity` items are ever held.
/// NaN distances rank after every other distance.
#[derive(Debug)]
pub struct KBestNeighbors<P> {
    capacity: usize,
    heap: BinaryHeap<HeapElement<P>>,
}

impl<P> KBestNeighbors<P> {
    pub fn new(capacity: usize) -> Self {
        KBestNeighbors {
            capacity,
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Offers a candidate stored at `index`.
    pub fn add(&mut self, distance: f64, index: usize, point_data: P) {
        if self.capacity == 0 {
            return;
        }
        let item = HeapElement { distance: OrderedFloat(distance), index, data: point_data };
        if self.heap.len() < self.capacity {
            self.heap.push(item);
        } else if let Some(mut farthest) = self.heap.peek_mut() {
            if item < *farthest {
                *farthest = item;
            }
        }
    }

    /// Returns the current number of neighbors stored.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Consumes the heap, returning the kept neighbors nearest-to-farthest.
    pub fn into_sorted_neighbors(self) -> Vec<Neighbor<P>> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|elem| Neighbor { distance: elem.distance.0, index: elem.index, data: elem.data })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_k_smallest_in_ascending_order() {
        let mut best = KBestNeighbors::new(3);
        for (i, d) in [5.0, 1.0, 4.0, 2.0, 3.0].into_iter().enumerate() {
            best.add(d, i, i);
        }
        assert_eq!(best.len(), 3);
        let indices: Vec<usize> = best.into_sorted_neighbors().into_iter().map(|n| n.data).collect();
        assert_eq!(indices, vec![1, 3, 4]);
    }

    #[test]
    fn test_equal_distances_keep_storage_order() {
        let mut best = KBestNeighbors::new(2);
        for i in 0..5 {
            best.add(1.0, i, i);
        }
        let neighbors = best.into_sorted_neighbors();
        assert_eq!(neighbors.iter().map(|n| n.index).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_matches_stable_sort() {
        let distances = [3.0, 1.0, 3.0, 0.5, 1.0, 3.0, 0.5, 2.0];
        let mut expected: Vec<(f64, usize)> = distances.iter().copied().zip(0..).collect();
        expected.sort_by(|a, b| a.0.total_cmp(&b.0));

        for k in 1..=distances.len() {
            let mut best = KBestNeighbors::new(k);
            for (i, &d) in distances.iter().enumerate() {
                best.add(d, i, ());
            }
            let got: Vec<(f64, usize)> = best
                .into_sorted_neighbors()
                .into_iter()
                .map(|n| (n.distance, n.index))
                .collect();
            assert_eq!(got, expected[..k].to_vec(), "k = {}", k);
        }
    }

    #[test]
    fn test_nan_distances_rank_last() {
        let mut best = KBestNeighbors::new(2);
        best.add(f64::NAN, 0, "nan");
        best.add(10.0, 1, "far");
        best.add(1.0, 2, "near");
        let labels: Vec<&str> = best.into_sorted_neighbors().into_iter().map(|n| n.data).collect();
        assert_eq!(labels, vec!["near", "far"]);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut best = KBestNeighbors::new(0);
        best.add(1.0, 0, ());
        assert!(best.is_empty());
    }
}
