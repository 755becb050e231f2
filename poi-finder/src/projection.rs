//! Projection from fixed-point geographic coordinates onto the map plane.

use serde::{Deserialize, Serialize};

use crate::store::Record;

/// Integer position on the map, in map pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MapPoint {
    pub x: i32,
    pub y: i32,
}

impl MapPoint {
    pub fn new(x: i32, y: i32) -> Self {
        MapPoint { x, y }
    }

    /// Taxicab distance to `other`, saturating at `u32::MAX`.
    pub fn manhattan(self, other: MapPoint) -> u32 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
    }
}

/// Geographic extent covered by the map, in the records' fixed-point units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub lat_north: i32,
    pub lat_south: i32,
    pub lon_west: i32,
    pub lon_east: i32,
}

impl Default for GeoBounds {
    fn default() -> Self {
        GeoBounds {
            lat_north: 5_361_858,
            lat_south: 5_340_953,
            lon_west: -11_368_652,
            lon_east: -11_333_496,
        }
    }
}

/// Linear re-map of `x` from `[in_min, in_max]` to `[out_min, out_max]`,
/// truncating toward zero. Values outside the input range extrapolate,
/// saturating at the bounds of `i64`.
pub fn remap(x: i64, in_min: i64, in_max: i64, out_min: i64, out_max: i64) -> i64 {
    let (x, in_min, in_max) = (x as i128, in_min as i128, in_max as i128);
    let (out_min, out_max) = (out_min as i128, out_max as i128);
    let mapped = (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min;
    mapped.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

fn saturate_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Maps lon to x and lat to y, north at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapProjection {
    bounds: GeoBounds,
    map_width: i32,
    map_height: i32,
}

impl MapProjection {
    pub fn new(bounds: GeoBounds, map_width: i32, map_height: i32) -> Self {
        MapProjection {
            bounds,
            map_width,
            map_height,
        }
    }

    /// Map x of `lon`; far outside the bounds it saturates at the `i32` range.
    pub fn lon_to_x(&self, lon: i32) -> i32 {
        saturate_i32(remap(
            lon as i64,
            self.bounds.lon_west as i64,
            self.bounds.lon_east as i64,
            0,
            self.map_width as i64,
        ))
    }

    pub fn lat_to_y(&self, lat: i32) -> i32 {
        saturate_i32(remap(
            lat as i64,
            self.bounds.lat_north as i64,
            self.bounds.lat_south as i64,
            0,
            self.map_height as i64,
        ))
    }

    pub fn project(&self, record: &Record) -> MapPoint {
        MapPoint::new(self.lon_to_x(record.lon), self.lat_to_y(record.lat))
    }

    /// Inverse of [`lon_to_x`](Self::lon_to_x), up to truncation.
    pub fn x_to_lon(&self, x: i32) -> i32 {
        saturate_i32(remap(
            x as i64,
            0,
            self.map_width as i64,
            self.bounds.lon_west as i64,
            self.bounds.lon_east as i64,
        ))
    }

    /// Inverse of [`lat_to_y`](Self::lat_to_y), up to truncation.
    pub fn y_to_lat(&self, y: i32) -> i32 {
        saturate_i32(remap(
            y as i64,
            0,
            self.map_height as i64,
            self.bounds.lat_north as i64,
            self.bounds.lat_south as i64,
        ))
    }
}
