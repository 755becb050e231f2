//! The control loop context.
//!
//! [`FinderEngine`] owns all mutable state: the record store and its cache,
//! the viewport, the candidate buffers, the filter and sort settings and the
//! current [`Mode`]. Each call to [`FinderEngine::tick`] samples input once,
//! updates state and issues drawing requests, strictly in that order.

use crate::candidates::Candidate;
use crate::config::FinderConfig;
use crate::errors::FinderResult;
use crate::input::{Axis, InputSource, TouchPoint};
use crate::navigator::{NavInput, NavOutcome, ResultListNavigator};
use crate::projection::{MapPoint, MapProjection};
use crate::ranking::{Ranker, SortReport};
use crate::rating::DisplayRating;
use crate::sort::SortMode;
use crate::store::{BlockDevice, Record, RecordStore, StoreStats};
use crate::surface::Surface;
use crate::touch::TouchZone;
use crate::viewport::{ScreenPoint, ViewportController};

/// What the engine is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Moving the cursor around the map.
    FreeNavigation,
    /// Browsing the ranked list; left only by selecting an entry.
    Browsing(ResultListNavigator),
}

pub struct FinderEngine<D> {
    config: FinderConfig,
    store: RecordStore<D>,
    projection: MapProjection,
    viewport: ViewportController,
    ranker: Ranker,
    min_rating: DisplayRating,
    sort_mode: SortMode,
    mode: Mode,
    confirm_held: bool,
    touch_held: bool,
    last_selection: Option<Record>,
}

impl<D: BlockDevice> FinderEngine<D> {
    pub fn new(config: FinderConfig, device: D) -> FinderResult<Self> {
        config.validate()?;

        let store = RecordStore::with_retry_policy(
            device,
            config.store.base_block,
            config.store.record_count,
            config.store.retry,
        );
        log::info!(
            "Finder over {} records from block {}",
            config.store.record_count,
            config.store.base_block
        );

        Ok(FinderEngine {
            projection: config.projection(),
            viewport: ViewportController::new(config.geometry, config.cursor_size),
            ranker: Ranker::with_capacity(config.store.record_count),
            min_rating: config.initial_rating,
            sort_mode: config.sort_mode,
            mode: Mode::FreeNavigation,
            confirm_held: false,
            touch_held: false,
            last_selection: None,
            store,
            config,
        })
    }

    /// Draws the initial screen: map window, sidebar buttons and cursor.
    pub fn start<S: Surface>(&mut self, surface: &mut S) {
        self.draw_screen(surface);
    }

    /// Runs one iteration of the control loop.
    ///
    /// Errors come only from the record store, and only under a bounded
    /// retry policy.
    pub fn tick<I: InputSource, S: Surface>(
        &mut self,
        input: &mut I,
        surface: &mut S,
    ) -> FinderResult<()> {
        input.begin_tick();
        let horizontal = input.read_axis(Axis::Horizontal);
        let vertical = input.read_axis(Axis::Vertical);
        let confirm = input.is_confirm_pressed();
        let touch = input.read_touch();

        // only press transitions count, tracked in every mode
        let confirm_pressed = confirm && !self.confirm_held;
        self.confirm_held = confirm;
        let touching = self.config.touch.is_touch(&touch);
        let touch_pressed = touching && !self.touch_held;
        self.touch_held = touching;

        let mode = self.mode;
        match mode {
            Mode::FreeNavigation => {
                let fresh_touch = touch_pressed.then_some(touch);
                self.free_navigation(horizontal, vertical, confirm_pressed, fresh_touch, surface)
            }
            Mode::Browsing(nav) => self.browse(nav, vertical, confirm_pressed, surface),
        }
    }

    fn free_navigation<S: Surface>(
        &mut self,
        horizontal: i32,
        vertical: i32,
        confirm_pressed: bool,
        fresh_touch: Option<TouchPoint>,
        surface: &mut S,
    ) -> FinderResult<()> {
        if confirm_pressed {
            return self.enter_browsing(surface);
        }

        if let Some(touch) = fresh_touch {
            self.handle_touch(touch, surface)?;
        }

        let joystick = self.config.joystick;
        let moving = joystick.outside_dead_zone(horizontal) || joystick.outside_dead_zone(vertical);
        if !moving {
            return Ok(());
        }

        self.erase_cursor(surface);
        let (dx, dy) = joystick.cursor_delta(horizontal, vertical);
        let pan = self.viewport.move_cursor(dx, dy);
        if pan.any() {
            self.draw_window(surface);
        }
        self.draw_cursor(surface);
        Ok(())
    }

    fn handle_touch<S: Surface>(&mut self, touch: TouchPoint, surface: &mut S) -> FinderResult<()> {
        let calibration = self.config.touch;
        match calibration.zone_of(&touch, self.config.geometry.window_width) {
            Some(TouchZone::RatingButton) => {
                self.min_rating = self.min_rating.next();
                log::info!("Rating selected is: {}", self.min_rating);
                surface.show_rating(self.min_rating);
            }
            Some(TouchZone::SortButton) => {
                self.sort_mode = self.sort_mode.next();
                log::info!("Doing: {}", self.sort_mode);
                surface.show_sort_mode(self.sort_mode);
            }
            Some(TouchZone::MapArea) => self.draw_records(surface)?,
            None => {}
        }
        Ok(())
    }

    fn enter_browsing<S: Surface>(&mut self, surface: &mut S) -> FinderResult<()> {
        let cursor = self.viewport.cursor_map_point();
        self.ranker.rank(
            &mut self.store,
            cursor,
            self.min_rating,
            &self.projection,
            self.sort_mode,
        )?;

        let Some(nav) = ResultListNavigator::new(self.ranker.len()) else {
            log::warn!("No records rated {} or better, staying on the map", self.min_rating);
            return Ok(());
        };

        surface.clear();
        self.render_page(&nav, surface)?;
        self.mode = Mode::Browsing(nav);
        Ok(())
    }

    fn browse<S: Surface>(
        &mut self,
        mut nav: ResultListNavigator,
        vertical: i32,
        confirm_pressed: bool,
        surface: &mut S,
    ) -> FinderResult<()> {
        let joystick = self.config.joystick;
        let input = if vertical < joystick.list_up_below {
            NavInput::Up
        } else if vertical > joystick.list_down_above {
            NavInput::Down
        } else if confirm_pressed {
            NavInput::Confirm
        } else {
            NavInput::Idle
        };
        if confirm_pressed && matches!(input, NavInput::Up | NavInput::Down) {
            // stick wins; a still-held button confirms once it returns to rest
            self.confirm_held = false;
        }

        let outcome = nav.handle(input);
        self.mode = Mode::Browsing(nav);

        match outcome {
            NavOutcome::Unchanged => Ok(()),
            NavOutcome::Moved { previous, current } => {
                let first = nav.page_range().start;
                self.render_row(previous, first + previous, false, surface)?;
                self.render_row(current, first + current, true, surface)
            }
            NavOutcome::PageChanged { .. } => {
                surface.clear();
                self.render_page(&nav, surface)
            }
            NavOutcome::Selected(selection) => self.select(selection, surface),
        }
    }

    fn render_page<S: Surface>(
        &mut self,
        nav: &ResultListNavigator,
        surface: &mut S,
    ) -> FinderResult<()> {
        let range = nav.page_range();
        let first = range.start;
        for position in range {
            let row = position - first;
            self.render_row(row, position, row == nav.offset(), surface)?;
        }
        Ok(())
    }

    fn render_row<S: Surface>(
        &mut self,
        row: usize,
        position: usize,
        highlighted: bool,
        surface: &mut S,
    ) -> FinderResult<()> {
        let index = self.ranker.candidates()[position].index;
        let record = self.store.read_record(index)?;
        surface.print_row(row, &record.name(), highlighted);
        Ok(())
    }

    fn select<S: Surface>(&mut self, selection: usize, surface: &mut S) -> FinderResult<()> {
        let index = self.ranker.candidates()[selection].index;
        let record = self.store.read_record(index)?;
        let target = self.projection.project(&record);
        log::info!(
            "Selected {} at map ({}, {})",
            record.name(),
            target.x,
            target.y
        );

        self.viewport.recenter_on(target);
        self.last_selection = Some(record);
        self.mode = Mode::FreeNavigation;
        self.draw_screen(surface);
        Ok(())
    }

    /// Draws a dot for every record passing the rating filter that falls
    /// inside the window.
    pub fn draw_records<S: Surface>(&mut self, surface: &mut S) -> FinderResult<()> {
        let mut drawn = 0usize;
        for index in 0..self.store.len() {
            let record = self.store.read_record(index)?;
            if !self.min_rating.admits(record.rating) {
                continue;
            }
            if let Some(at) = self.viewport.screen_position(self.projection.project(&record)) {
                surface.draw_record_dot(at);
                drawn += 1;
            }
        }
        log::debug!("Drew {} records in view", drawn);
        Ok(())
    }

    fn draw_screen<S: Surface>(&self, surface: &mut S) {
        surface.clear();
        self.draw_window(surface);
        surface.show_rating(self.min_rating);
        surface.show_sort_mode(self.sort_mode);
        self.draw_cursor(surface);
    }

    fn draw_window<S: Surface>(&self, surface: &mut S) {
        let g = self.viewport.geometry();
        surface.draw_map(
            self.viewport.origin(),
            ScreenPoint::new(0, 0),
            g.window_width,
            g.window_height,
        );
    }

    fn draw_cursor<S: Surface>(&self, surface: &mut S) {
        surface.draw_cursor(self.viewport.cursor(), self.config.cursor_size);
    }

    /// Restores the map under the cursor marker.
    fn erase_cursor<S: Surface>(&self, surface: &mut S) {
        let half = self.config.cursor_size / 2;
        let cursor = self.viewport.cursor();
        let origin = self.viewport.origin();
        surface.draw_map(
            MapPoint::new(origin.x + cursor.x - half, origin.y + cursor.y - half),
            ScreenPoint::new(cursor.x - half, cursor.y - half),
            self.config.cursor_size,
            self.config.cursor_size,
        );
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_browsing(&self) -> bool {
        matches!(self.mode, Mode::Browsing(_))
    }

    pub fn navigator(&self) -> Option<&ResultListNavigator> {
        match &self.mode {
            Mode::Browsing(nav) => Some(nav),
            Mode::FreeNavigation => None,
        }
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn min_rating(&self) -> DisplayRating {
        self.min_rating
    }

    pub fn set_min_rating(&mut self, rating: DisplayRating) {
        self.min_rating = rating;
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.sort_mode = mode;
    }

    /// Ranked candidates of the latest browse.
    pub fn candidates(&self) -> &[Candidate] {
        self.ranker.candidates()
    }

    /// Quicksorted list of the latest browse in [`SortMode::Both`].
    pub fn comparison(&self) -> Option<&[Candidate]> {
        self.ranker.comparison()
    }

    pub fn last_sort_report(&self) -> Option<&SortReport> {
        self.ranker.last_report()
    }

    pub fn last_selection(&self) -> Option<&Record> {
        self.last_selection.as_ref()
    }

    pub fn store(&self) -> &RecordStore<D> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut RecordStore<D> {
        &mut self.store
    }

    pub fn store_stats(&self) -> StoreStats {
        self.store.stats()
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    pub fn projection(&self) -> &MapProjection {
        &self.projection
    }
}
