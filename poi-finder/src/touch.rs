//! Touch panel calibration and sidebar zones.

use serde::{Deserialize, Serialize};

use crate::errors::{FinderError, FinderResult};
use crate::input::TouchPoint;
use crate::projection::remap;
use crate::viewport::ScreenPoint;

/// Raw panel range and pressure band.
///
/// The panel is mounted rotated: raw y runs along the screen's x axis and
/// raw x along its y axis, both reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchCalibration {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
    pub min_pressure: i32,
    pub max_pressure: i32,
    pub screen_width: i32,
    pub screen_height: i32,
}

impl Default for TouchCalibration {
    fn default() -> Self {
        TouchCalibration {
            min_x: 100,
            min_y: 120,
            max_x: 940,
            max_y: 920,
            min_pressure: 10,
            max_pressure: 1000,
            screen_width: 480,
            screen_height: 320,
        }
    }
}

/// Region of the screen a touch landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchZone {
    /// The map window
    MapArea,
    /// Upper sidebar button, cycles the minimum rating
    RatingButton,
    /// Lower sidebar button, cycles the sort mode
    SortButton,
}

impl TouchCalibration {
    pub fn validate(&self) -> FinderResult<()> {
        if self.min_x >= self.max_x || self.min_y >= self.max_y {
            return Err(FinderError::InvalidConfig(
                "Touch calibration minimum must be below maximum".to_string(),
            ));
        }
        if self.min_pressure > self.max_pressure {
            return Err(FinderError::InvalidConfig(format!(
                "Touch pressure band empty: {}..={}",
                self.min_pressure, self.max_pressure
            )));
        }
        Ok(())
    }

    pub fn is_touch(&self, point: &TouchPoint) -> bool {
        (self.min_pressure..=self.max_pressure).contains(&point.pressure)
    }

    /// Screen position of a touch, or `None` when pressure is outside the
    /// valid band.
    pub fn to_screen(&self, point: &TouchPoint) -> Option<ScreenPoint> {
        if !self.is_touch(point) {
            return None;
        }
        let x = remap(
            point.y as i64,
            self.min_x as i64,
            self.max_x as i64,
            (self.screen_width - 1) as i64,
            0,
        );
        let y = remap(
            point.x as i64,
            self.min_y as i64,
            self.max_y as i64,
            (self.screen_height - 1) as i64,
            0,
        );
        Some(ScreenPoint::new(x as i32, y as i32))
    }

    /// Raw sample that lands at (or within a pixel of) `screen`.
    pub fn to_raw(&self, screen: ScreenPoint, pressure: i32) -> TouchPoint {
        let y = remap(
            screen.x as i64,
            (self.screen_width - 1) as i64,
            0,
            self.min_x as i64,
            self.max_x as i64,
        );
        let x = remap(
            screen.y as i64,
            (self.screen_height - 1) as i64,
            0,
            self.min_y as i64,
            self.max_y as i64,
        );
        TouchPoint::new(x as i32, y as i32, pressure)
    }

    /// Zone under a screen position. The sidebar starts at `window_width`
    /// and is split in two halves; its borders belong to no zone.
    pub fn classify(&self, screen: ScreenPoint, window_width: i32) -> Option<TouchZone> {
        let split = self.screen_height / 2;
        if screen.x < window_width {
            Some(TouchZone::MapArea)
        } else if screen.x > window_width {
            if screen.y > 0 && screen.y < split {
                Some(TouchZone::RatingButton)
            } else if screen.y > split && screen.y < self.screen_height {
                Some(TouchZone::SortButton)
            } else {
                None
            }
        } else {
            None
        }
    }

    /// `to_screen` followed by `classify`.
    pub fn zone_of(&self, point: &TouchPoint, window_width: i32) -> Option<TouchZone> {
        self.to_screen(point)
            .and_then(|screen| self.classify(screen, window_width))
    }
}
