//! Filter + sort pass producing the ranked candidate list.

use crate::candidates::{build_candidates, Candidate};
use crate::errors::FinderResult;
use crate::projection::{MapPoint, MapProjection};
use crate::rating::DisplayRating;
use crate::sort::{timed_sort, SortAlgorithm, SortMode, SortTiming};
use crate::store::{BlockDevice, RecordStore};

/// Timings of the most recent ranking.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortReport {
    pub mode: SortMode,
    /// One entry per algorithm run, in run order
    pub timings: Vec<SortTiming>,
}

impl SortReport {
    pub fn timing(&self, algorithm: SortAlgorithm) -> Option<&SortTiming> {
        self.timings.iter().find(|t| t.algorithm == algorithm)
    }
}

/// Owns the candidate buffers so repeated rankings reuse their capacity.
#[derive(Debug, Default)]
pub struct Ranker {
    candidates: Vec<Candidate>,
    comparison: Vec<Candidate>,
    report: SortReport,
    ranked: bool,
}

impl Ranker {
    pub fn with_capacity(capacity: usize) -> Self {
        Ranker {
            candidates: Vec::with_capacity(capacity),
            comparison: Vec::with_capacity(capacity),
            report: SortReport {
                mode: SortMode::default(),
                timings: Vec::with_capacity(2),
            },
            ranked: false,
        }
    }

    /// Filters all records against `min_rating`, keys them by distance from
    /// `cursor` and sorts them according to `mode`.
    ///
    /// In [`SortMode::Both`] the quicksorted list is built first and kept as
    /// [`comparison`](Self::comparison); the store is then scanned again and
    /// the insertion-sorted result becomes [`candidates`](Self::candidates).
    /// The two scans are independent reads.
    pub fn rank<D: BlockDevice>(
        &mut self,
        store: &mut RecordStore<D>,
        cursor: MapPoint,
        min_rating: DisplayRating,
        projection: &MapProjection,
        mode: SortMode,
    ) -> FinderResult<&SortReport> {
        self.comparison.clear();
        self.report.timings.clear();
        self.report.mode = mode;
        self.ranked = false;

        let timings = &mut self.report.timings;
        match mode {
            SortMode::QuickSort => {
                build_candidates(store, cursor, min_rating, projection, &mut self.candidates)?;
                timings.push(timed_sort(SortAlgorithm::Quick, &mut self.candidates));
            }
            SortMode::InsertionSort => {
                build_candidates(store, cursor, min_rating, projection, &mut self.candidates)?;
                timings.push(timed_sort(SortAlgorithm::Insertion, &mut self.candidates));
            }
            SortMode::Both => {
                build_candidates(store, cursor, min_rating, projection, &mut self.comparison)?;
                timings.push(timed_sort(SortAlgorithm::Quick, &mut self.comparison));
                build_candidates(store, cursor, min_rating, projection, &mut self.candidates)?;
                timings.push(timed_sort(SortAlgorithm::Insertion, &mut self.candidates));
            }
        }

        self.ranked = true;
        Ok(&self.report)
    }

    /// Ranked candidates from the latest run.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// The quicksorted list of the latest [`SortMode::Both`] run.
    pub fn comparison(&self) -> Option<&[Candidate]> {
        (!self.comparison.is_empty()).then_some(self.comparison.as_slice())
    }

    pub fn last_report(&self) -> Option<&SortReport> {
        self.ranked.then_some(&self.report)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
