//! In-place sorting of candidates by distance key.
//!
//! Two algorithms are provided on purpose: insertion sort is the stable
//! reference and timing baseline, quicksort (Lomuto, last element as pivot)
//! the fast path. Neither allocates.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::candidates::Candidate;

/// Which algorithm(s) to run when ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortMode {
    #[default]
    QuickSort,
    InsertionSort,
    /// Quicksort one candidate list, then insertion sort a freshly filtered
    /// second list, timing both.
    Both,
}

impl SortMode {
    /// The next mode in the selector cycle.
    pub fn next(self) -> Self {
        match self {
            SortMode::QuickSort => SortMode::InsertionSort,
            SortMode::InsertionSort => SortMode::Both,
            SortMode::Both => SortMode::QuickSort,
        }
    }

    /// Short button label.
    pub fn label(self) -> &'static str {
        match self {
            SortMode::QuickSort => "QSORT",
            SortMode::InsertionSort => "ISORT",
            SortMode::Both => "BOTH",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single sorting algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortAlgorithm {
    Insertion,
    Quick,
}

impl SortAlgorithm {
    pub fn sort(self, items: &mut [Candidate]) {
        match self {
            SortAlgorithm::Insertion => insertion_sort(items),
            SortAlgorithm::Quick => quick_sort(items),
        }
    }
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortAlgorithm::Insertion => f.write_str("Insertion sort"),
            SortAlgorithm::Quick => f.write_str("Quick sort"),
        }
    }
}

/// Stable adjacent-swap insertion sort, ascending by key.
pub fn insertion_sort(items: &mut [Candidate]) {
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && items[j - 1].key > items[j].key {
            items.swap(j, j - 1);
            j -= 1;
        }
    }
}

/// Lomuto quicksort, ascending by key. Not stable.
///
/// Recurses into the smaller partition and loops on the larger one, so stack
/// depth stays logarithmic even on already-sorted input. The resulting order
/// is the same as recursing on both sides.
pub fn quick_sort(items: &mut [Candidate]) {
    let mut rest = items;
    while rest.len() > 1 {
        let pivot = partition(rest);
        let (left, right) = std::mem::take(&mut rest).split_at_mut(pivot);
        let right = &mut right[1..];
        if left.len() < right.len() {
            quick_sort(left);
            rest = right;
        } else {
            quick_sort(right);
            rest = left;
        }
    }
}

/// Moves every element with a key below the last element's key in front of
/// it and returns the pivot's final position.
fn partition(items: &mut [Candidate]) -> usize {
    let high = items.len() - 1;
    let pivot = items[high].key;
    let mut store = 0;
    for j in 0..high {
        if items[j].key < pivot {
            items.swap(j, store);
            store += 1;
        }
    }
    items.swap(store, high);
    store
}

/// How long one algorithm took over how many candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortTiming {
    pub algorithm: SortAlgorithm,
    pub len: usize,
    pub elapsed: Duration,
}

/// Sorts `items` with `algorithm`, logging and returning the running time.
pub fn timed_sort(algorithm: SortAlgorithm, items: &mut [Candidate]) -> SortTiming {
    let start = Instant::now();
    algorithm.sort(items);
    let elapsed = start.elapsed();
    log::info!("{} running time: {} ms", algorithm, elapsed.as_millis());
    SortTiming {
        algorithm,
        len: items.len(),
        elapsed,
    }
}

/// Whether `items` is non-decreasing by key.
pub fn is_sorted_by_key(items: &[Candidate]) -> bool {
    items.windows(2).all(|w| w[0].key <= w[1].key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn candidates(keys: &[u32]) -> Vec<Candidate> {
        keys.iter()
            .enumerate()
            .map(|(i, &k)| Candidate::new(i, k))
            .collect()
    }

    fn keys(items: &[Candidate]) -> Vec<u32> {
        items.iter().map(|c| c.key).collect()
    }

    fn sorted_indices(items: &[Candidate]) -> Vec<usize> {
        let mut indices: Vec<usize> = items.iter().map(|c| c.index).collect();
        indices.sort_unstable();
        indices
    }

    #[test]
    fn test_insertion_sort_basic() {
        let mut items = candidates(&[50, 200, 10]);
        insertion_sort(&mut items);
        assert_eq!(keys(&items), vec![10, 50, 200]);
        assert_eq!(items[0].index, 2);
    }

    #[test]
    fn test_quick_sort_basic() {
        let mut items = candidates(&[50, 200, 10]);
        quick_sort(&mut items);
        assert_eq!(keys(&items), vec![10, 50, 200]);
        assert_eq!(items[0].index, 2);
    }

    #[test]
    fn test_empty_and_single_are_noops() {
        let mut empty: Vec<Candidate> = vec![];
        quick_sort(&mut empty);
        insertion_sort(&mut empty);
        assert!(empty.is_empty());

        let mut one = candidates(&[7]);
        quick_sort(&mut one);
        insertion_sort(&mut one);
        assert_eq!(one, candidates(&[7]));
    }

    #[test]
    fn test_partition_places_pivot() {
        let mut items = candidates(&[9, 3, 7, 1, 5]);
        let p = partition(&mut items);
        assert_eq!(p, 2);
        assert_eq!(items[p].key, 5);
        assert!(items[..p].iter().all(|c| c.key < 5));
        assert!(items[p + 1..].iter().all(|c| c.key >= 5));
    }

    #[test]
    fn test_random_inputs_sorted_permutations() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for len in [2usize, 3, 17, 21, 100, 1066] {
            let input: Vec<u32> = (0..len).map(|_| rng.gen_range(0..4000)).collect();
            let original = candidates(&input);

            let mut by_insertion = original.clone();
            insertion_sort(&mut by_insertion);
            let mut by_quick = original.clone();
            quick_sort(&mut by_quick);

            assert!(is_sorted_by_key(&by_insertion));
            assert!(is_sorted_by_key(&by_quick));
            assert_eq!(sorted_indices(&by_insertion), sorted_indices(&original));
            assert_eq!(sorted_indices(&by_quick), sorted_indices(&original));
            assert_eq!(keys(&by_insertion), keys(&by_quick));
        }
    }

    #[test]
    fn test_unique_keys_give_identical_order() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut input: Vec<u32> = (0..500).map(|k| k * 3).collect();
        for i in (1..input.len()).rev() {
            let j = rng.gen_range(0..=i);
            input.swap(i, j);
        }
        let mut a = candidates(&input);
        let mut b = a.clone();
        insertion_sort(&mut a);
        quick_sort(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_insertion_sort_is_stable() {
        let mut items = candidates(&[5, 1, 5, 1, 5]);
        insertion_sort(&mut items);
        let indices: Vec<usize> = items.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn test_sorted_input_unchanged() {
        let sorted = candidates(&[1, 2, 2, 3, 8, 8, 13, 40]);

        let mut again = sorted.clone();
        insertion_sort(&mut again);
        assert_eq!(again, sorted);

        let unique = candidates(&[1, 2, 3, 5, 8, 13, 21]);
        let mut again = unique.clone();
        quick_sort(&mut again);
        assert_eq!(again, unique);
    }

    #[test]
    fn test_quick_sort_deterministic() {
        let input = candidates(&[4, 4, 1, 4, 0, 4, 2]);
        let mut a = input.clone();
        let mut b = input.clone();
        quick_sort(&mut a);
        quick_sort(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_quick_sort_descending_worst_case() {
        let input: Vec<u32> = (0..5000).rev().collect();
        let mut items = candidates(&input);
        quick_sort(&mut items);
        assert!(is_sorted_by_key(&items));
        assert_eq!(items[0].index, 4999);
    }

    #[test]
    fn test_sort_mode_cycle_and_labels() {
        assert_eq!(SortMode::default(), SortMode::QuickSort);
        assert_eq!(SortMode::QuickSort.next(), SortMode::InsertionSort);
        assert_eq!(SortMode::InsertionSort.next(), SortMode::Both);
        assert_eq!(SortMode::Both.next(), SortMode::QuickSort);
        assert_eq!(SortMode::Both.to_string(), "BOTH");
    }

    #[test]
    fn test_timed_sort_reports_length() {
        let mut items = candidates(&[3, 2, 1]);
        let timing = timed_sort(SortAlgorithm::Quick, &mut items);
        assert_eq!(timing.algorithm, SortAlgorithm::Quick);
        assert_eq!(timing.len, 3);
        assert!(is_sorted_by_key(&items));
    }
}
