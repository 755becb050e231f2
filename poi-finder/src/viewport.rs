//! Visible window over the map, the cursor inside it, and tile panning.

use serde::{Deserialize, Serialize};

use crate::errors::{FinderError, FinderResult};
use crate::projection::MapPoint;

/// Position on the screen, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        ScreenPoint { x, y }
    }
}

/// Sizes of the map and of the window that shows part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapGeometry {
    pub map_width: i32,
    pub map_height: i32,
    pub window_width: i32,
    pub window_height: i32,
}

impl Default for MapGeometry {
    fn default() -> Self {
        MapGeometry {
            map_width: 2048,
            map_height: 2048,
            window_width: 420,
            window_height: 320,
        }
    }
}

impl MapGeometry {
    pub fn validate(&self) -> FinderResult<()> {
        if self.window_width <= 0 || self.window_height <= 0 {
            return Err(FinderError::InvalidConfig(format!(
                "Window must be non-empty, got {}x{}",
                self.window_width, self.window_height
            )));
        }
        if self.window_width > self.map_width || self.window_height > self.map_height {
            return Err(FinderError::InvalidConfig(format!(
                "Window {}x{} larger than map {}x{}",
                self.window_width, self.window_height, self.map_width, self.map_height
            )));
        }
        Ok(())
    }

    pub fn max_origin_x(&self) -> i32 {
        self.map_width - self.window_width
    }

    pub fn max_origin_y(&self) -> i32 {
        self.map_height - self.window_height
    }

    /// Window centre in window coordinates.
    pub fn window_center(&self) -> ScreenPoint {
        ScreenPoint::new(self.window_width / 2, self.window_height / 2)
    }
}

/// Window edge the cursor pushed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Tile shifts performed during one cursor move, at most one per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pan {
    pub horizontal: Option<Edge>,
    pub vertical: Option<Edge>,
}

impl Pan {
    pub fn any(&self) -> bool {
        self.horizontal.is_some() || self.vertical.is_some()
    }
}

/// Owns the viewport origin and the cursor.
///
/// Invariants: `0 <= origin <= map - window` and `0 <= cursor <= window - 1`
/// on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportController {
    geometry: MapGeometry,
    cursor_half: i32,
    origin: MapPoint,
    cursor: ScreenPoint,
}

impl ViewportController {
    /// Window centred on the map, cursor centred in the window.
    pub fn new(geometry: MapGeometry, cursor_size: i32) -> Self {
        let origin = MapPoint::new(
            geometry.map_width / 2 - geometry.window_width / 2,
            geometry.map_height / 2 - geometry.window_height / 2,
        );
        ViewportController {
            geometry,
            cursor_half: cursor_size / 2,
            origin,
            cursor: geometry.window_center(),
        }
    }

    pub fn geometry(&self) -> &MapGeometry {
        &self.geometry
    }

    pub fn origin(&self) -> MapPoint {
        self.origin
    }

    pub fn cursor(&self) -> ScreenPoint {
        self.cursor
    }

    /// Cursor position in map coordinates.
    pub fn cursor_map_point(&self) -> MapPoint {
        MapPoint::new(self.origin.x + self.cursor.x, self.origin.y + self.cursor.y)
    }

    fn cursor_max_x(&self) -> i32 {
        self.geometry.window_width - 1 - self.cursor_half
    }

    fn cursor_max_y(&self) -> i32 {
        self.geometry.window_height - 1 - self.cursor_half
    }

    /// Moves the cursor by `(dx, dy)`, clamps it so the whole marker stays in
    /// the window, and shifts the window one tile when the cursor is pinned
    /// against an edge the map extends beyond.
    pub fn move_cursor(&mut self, dx: i32, dy: i32) -> Pan {
        let half = self.cursor_half;
        self.cursor.x = (self.cursor.x + dx).clamp(half, self.cursor_max_x());
        self.cursor.y = (self.cursor.y + dy).clamp(half, self.cursor_max_y());

        let mut pan = Pan::default();

        if self.cursor.x <= half && self.origin.x != 0 {
            pan.horizontal = Some(Edge::Left);
        } else if self.cursor.x >= self.cursor_max_x()
            && self.origin.x != self.geometry.max_origin_x()
        {
            pan.horizontal = Some(Edge::Right);
        }

        if self.cursor.y <= half && self.origin.y != 0 {
            pan.vertical = Some(Edge::Top);
        } else if self.cursor.y >= self.cursor_max_y()
            && self.origin.y != self.geometry.max_origin_y()
        {
            pan.vertical = Some(Edge::Bottom);
        }

        if let Some(edge) = pan.horizontal {
            self.shift(edge);
        }
        if let Some(edge) = pan.vertical {
            self.shift(edge);
        }
        pan
    }

    fn shift(&mut self, edge: Edge) {
        let g = self.geometry;
        let center = g.window_center();
        match edge {
            Edge::Left | Edge::Right => {
                let step = if edge == Edge::Left {
                    -g.window_width
                } else {
                    g.window_width
                };
                self.origin.x = (self.origin.x + step).clamp(0, g.max_origin_x());
                self.cursor.x = center.x;
            }
            Edge::Top | Edge::Bottom => {
                let step = if edge == Edge::Top {
                    -g.window_height
                } else {
                    g.window_height
                };
                self.origin.y = (self.origin.y + step).clamp(0, g.max_origin_y());
                self.cursor.y = center.y;
            }
        }
        log::debug!(
            "Panned {:?}, origin now ({}, {})",
            edge,
            self.origin.x,
            self.origin.y
        );
    }

    /// Moves the window so `target` is centred where the map allows, and puts
    /// the cursor on it.
    pub fn recenter_on(&mut self, target: MapPoint) {
        let g = self.geometry;
        let (ox, cx) = recenter_axis(target.x, g.map_width, g.window_width);
        let (oy, cy) = recenter_axis(target.y, g.map_height, g.window_height);
        self.origin = MapPoint::new(ox, oy);
        self.cursor = ScreenPoint::new(cx, cy);
    }

    /// Screen position of `point` if it lies strictly inside the window.
    pub fn screen_position(&self, point: MapPoint) -> Option<ScreenPoint> {
        let x = point.x - self.origin.x;
        let y = point.y - self.origin.y;
        (x > 0 && y > 0 && x < self.geometry.window_width && y < self.geometry.window_height)
            .then_some(ScreenPoint::new(x, y))
    }
}

/// Origin and cursor on one axis for centring on `target`.
pub fn recenter_axis(target: i32, map: i32, window: i32) -> (i32, i32) {
    let half = window / 2;
    let max_origin = map - window;

    let (origin, cursor) = if target < 0 {
        (0, 0)
    } else if target > map {
        (max_origin, window - 1)
    } else if target + half > map {
        (max_origin, target - max_origin)
    } else if target - half < 0 {
        (0, target)
    } else {
        let origin = (target - half).min(max_origin);
        (origin, target - origin)
    };

    (origin, cursor.clamp(0, window - 1))
}
