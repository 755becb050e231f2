//! Distance and rating filter pass.

use crate::errors::FinderResult;
use crate::projection::{MapPoint, MapProjection};
use crate::rating::DisplayRating;
use crate::store::{BlockDevice, RecordStore};

/// A record that passed the rating filter, keyed by its distance to the
/// cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidate {
    /// Record index in the store
    pub index: usize,
    /// Manhattan distance from the cursor, in map pixels
    pub key: u32,
}

impl Candidate {
    pub fn new(index: usize, key: u32) -> Self {
        Candidate { index, key }
    }
}

/// Scans every record and refills `out` with the ones whose display rating is
/// at least `min_rating`, in record index order.
///
/// `out` is cleared first; its capacity is reused across calls.
pub fn build_candidates<D: BlockDevice>(
    store: &mut RecordStore<D>,
    cursor: MapPoint,
    min_rating: DisplayRating,
    projection: &MapProjection,
    out: &mut Vec<Candidate>,
) -> FinderResult<()> {
    out.clear();
    out.reserve(store.len());

    for index in 0..store.len() {
        let record = store.read_record(index)?;
        if min_rating.admits(record.rating) {
            let key = cursor.manhattan(projection.project(&record));
            out.push(Candidate::new(index, key));
        }
    }

    log::debug!(
        "{} of {} records pass rating {} from cursor ({}, {})",
        out.len(),
        store.len(),
        min_rating,
        cursor.x,
        cursor.y
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::GeoBounds;
    use crate::store::{MemoryBlockDevice, Record};

    fn projection() -> MapProjection {
        MapProjection::new(GeoBounds::default(), 2048, 2048)
    }

    fn record_at(p: &MapProjection, x: i32, y: i32, rating: u8, name: &str) -> Record {
        Record::new(p.y_to_lat(y), p.x_to_lon(x), rating, name)
    }

    fn store_of(records: &[Record]) -> RecordStore<MemoryBlockDevice> {
        let device = MemoryBlockDevice::from_records(0, records).unwrap();
        RecordStore::new(device, 0, records.len())
    }

    #[test]
    fn test_keys_are_manhattan_distances() {
        let p = projection();
        let records: Vec<Record> = [(100, 100), (400, 250), (1000, 90)]
            .iter()
            .map(|&(x, y)| record_at(&p, x, y, 10, "r"))
            .collect();
        let mut store = store_of(&records);
        let cursor = MapPoint::new(300, 200);

        let mut out = Vec::new();
        build_candidates(&mut store, cursor, DisplayRating::MIN, &p, &mut out).unwrap();

        assert_eq!(out.len(), 3);
        for (candidate, record) in out.iter().zip(records.iter()) {
            assert_eq!(candidate.key, cursor.manhattan(p.project(record)));
        }
    }

    #[test]
    fn test_filter_preserves_index_order() {
        let p = projection();
        let ratings = [0u8, 9, 3, 10, 8, 9];
        let records: Vec<Record> = ratings
            .iter()
            .enumerate()
            .map(|(i, &r)| record_at(&p, i as i32 * 50, 0, r, "r"))
            .collect();
        let mut store = store_of(&records);

        let mut out = Vec::new();
        let five = DisplayRating::new(5).unwrap();
        build_candidates(&mut store, MapPoint::new(0, 0), five, &p, &mut out).unwrap();

        let indices: Vec<usize> = out.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![1, 3, 5]);
    }

    #[test]
    fn test_rebuild_clears_previous_candidates() {
        let p = projection();
        let records: Vec<Record> = (0..20)
            .map(|i| record_at(&p, i * 10, i * 10, (i % 11) as u8, "r"))
            .collect();
        let mut store = store_of(&records);
        let mut out = Vec::new();

        build_candidates(&mut store, MapPoint::new(0, 0), DisplayRating::MIN, &p, &mut out)
            .unwrap();
        assert_eq!(out.len(), 20);

        let four = DisplayRating::new(4).unwrap();
        build_candidates(&mut store, MapPoint::new(0, 0), four, &p, &mut out).unwrap();
        assert!(out.len() < 20);
        assert!(out.iter().all(|c| records[c.index].display_rating() >= 4));
    }

    #[test]
    fn test_scan_reads_each_block_once() {
        let p = projection();
        let records: Vec<Record> = (0..24).map(|i| record_at(&p, i, i, 5, "r")).collect();
        let mut store = store_of(&records);
        let mut out = Vec::new();

        build_candidates(&mut store, MapPoint::new(0, 0), DisplayRating::MIN, &p, &mut out)
            .unwrap();
        assert_eq!(store.device().read_count(), 3);
    }

    #[test]
    fn test_zero_key_for_record_under_cursor() {
        let p = projection();
        let records = vec![record_at(&p, 512, 768, 6, "here")];
        let mut store = store_of(&records);
        let cursor = p.project(&records[0]);

        let mut out = Vec::new();
        build_candidates(&mut store, cursor, DisplayRating::MIN, &p, &mut out).unwrap();
        assert_eq!(out, vec![Candidate::new(0, 0)]);
    }

    #[test]
    fn test_extreme_coordinates_rank_last() {
        let identity = MapProjection::new(
            GeoBounds {
                lat_north: 0,
                lat_south: 2048,
                lon_west: 0,
                lon_east: 2048,
            },
            2048,
            2048,
        );
        let records = vec![
            Record::new(i32::MIN, i32::MIN, 10, "far"),
            Record::new(i32::MAX, i32::MAX, 10, "other far"),
            Record::new(1000, 1000, 10, "near"),
        ];
        let mut store = store_of(&records);

        let mut out = Vec::new();
        build_candidates(&mut store, MapPoint::new(1024, 1024), DisplayRating::MIN, &identity, &mut out)
            .unwrap();

        assert_eq!(out[0].key, u32::MAX);
        assert_eq!(out[1].key, 2 * (i32::MAX as u32 - 1024));
        assert_eq!(out[2].key, 48);
        crate::sort::quick_sort(&mut out);
        let order: Vec<usize> = out.iter().map(|c| c.index).collect();
        assert_eq!(order, vec![2, 1, 0]);
    }
}
