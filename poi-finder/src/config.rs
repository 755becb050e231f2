//! Engine configuration.
//!
//! Every tunable lives in [`FinderConfig`]. Build one with
//! [`FinderConfig::builder`]; `build()` validates the whole set at once.

use serde::{Deserialize, Serialize};

use crate::errors::{FinderError, FinderResult};
use crate::input::JoystickConfig;
use crate::projection::{GeoBounds, MapProjection};
use crate::rating::DisplayRating;
use crate::sort::SortMode;
use crate::store::{BlockId, RetryPolicy};
use crate::touch::TouchCalibration;
use crate::viewport::MapGeometry;

/// Where the records live on the block device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Block holding records 0..8
    pub base_block: BlockId,
    pub record_count: usize,
    pub retry: RetryPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            base_block: 4_000_000,
            record_count: 1066,
            retry: RetryPolicy::Unbounded,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    pub geometry: MapGeometry,
    pub geo_bounds: GeoBounds,
    pub joystick: JoystickConfig,
    pub touch: TouchCalibration,
    pub store: StoreConfig,
    /// Side of the square cursor marker, in pixels
    pub cursor_size: i32,
    pub initial_rating: DisplayRating,
    pub sort_mode: SortMode,
}

impl Default for FinderConfig {
    fn default() -> Self {
        FinderConfig {
            geometry: MapGeometry::default(),
            geo_bounds: GeoBounds::default(),
            joystick: JoystickConfig::default(),
            touch: TouchCalibration::default(),
            store: StoreConfig::default(),
            cursor_size: 9,
            initial_rating: DisplayRating::MIN,
            sort_mode: SortMode::QuickSort,
        }
    }
}

impl FinderConfig {
    pub fn builder() -> FinderConfigBuilder {
        FinderConfigBuilder::new()
    }

    pub fn validate(&self) -> FinderResult<()> {
        self.geometry.validate()?;
        self.joystick.validate()?;
        self.touch.validate()?;

        if self.geo_bounds.lat_north == self.geo_bounds.lat_south
            || self.geo_bounds.lon_west == self.geo_bounds.lon_east
        {
            return Err(FinderError::InvalidConfig(
                "Geographic bounds must span a non-empty area".to_string(),
            ));
        }
        if self.cursor_size <= 0
            || self.cursor_size >= self.geometry.window_width
            || self.cursor_size >= self.geometry.window_height
        {
            return Err(FinderError::InvalidConfig(format!(
                "Cursor size {} does not fit the {}x{} window",
                self.cursor_size, self.geometry.window_width, self.geometry.window_height
            )));
        }
        if self.touch.screen_width < self.geometry.window_width
            || self.touch.screen_height < self.geometry.window_height
        {
            return Err(FinderError::InvalidConfig(format!(
                "Screen {}x{} smaller than the map window",
                self.touch.screen_width, self.touch.screen_height
            )));
        }
        if self.store.record_count == 0 {
            return Err(FinderError::InvalidConfig(
                "Record count must be positive".to_string(),
            ));
        }
        if let RetryPolicy::Bounded { attempts: 0, .. } = self.store.retry {
            return Err(FinderError::InvalidConfig(
                "Bounded retry needs at least one attempt".to_string(),
            ));
        }
        Ok(())
    }

    pub fn projection(&self) -> MapProjection {
        MapProjection::new(
            self.geo_bounds,
            self.geometry.map_width,
            self.geometry.map_height,
        )
    }
}

/// Fluent builder for [`FinderConfig`].
pub struct FinderConfigBuilder {
    config: FinderConfig,
}

impl Default for FinderConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FinderConfigBuilder {
    pub fn new() -> Self {
        FinderConfigBuilder {
            config: FinderConfig::default(),
        }
    }

    #[inline]
    pub fn geometry(mut self, geometry: MapGeometry) -> Self {
        self.config.geometry = geometry;
        self
    }

    #[inline]
    pub fn geo_bounds(mut self, geo_bounds: GeoBounds) -> Self {
        self.config.geo_bounds = geo_bounds;
        self
    }

    #[inline]
    pub fn joystick(mut self, joystick: JoystickConfig) -> Self {
        self.config.joystick = joystick;
        self
    }

    #[inline]
    pub fn touch_calibration(mut self, touch: TouchCalibration) -> Self {
        self.config.touch = touch;
        self
    }

    #[inline]
    pub fn base_block(mut self, base_block: BlockId) -> Self {
        self.config.store.base_block = base_block;
        self
    }

    #[inline]
    pub fn record_count(mut self, record_count: usize) -> Self {
        self.config.store.record_count = record_count;
        self
    }

    #[inline]
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.config.store.retry = retry;
        self
    }

    #[inline]
    pub fn cursor_size(mut self, cursor_size: i32) -> Self {
        self.config.cursor_size = cursor_size;
        self
    }

    #[inline]
    pub fn initial_rating(mut self, rating: DisplayRating) -> Self {
        self.config.initial_rating = rating;
        self
    }

    #[inline]
    pub fn sort_mode(mut self, sort_mode: SortMode) -> Self {
        self.config.sort_mode = sort_mode;
        self
    }

    pub fn build(self) -> FinderResult<FinderConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
