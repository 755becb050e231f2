//! Output sink for everything the engine draws.

use crate::projection::MapPoint;
use crate::rating::DisplayRating;
use crate::sort::SortMode;
use crate::viewport::ScreenPoint;

/// Drawing requests issued by the engine.
pub trait Surface {
    /// Fills the whole screen with the background colour.
    fn clear(&mut self);

    /// Copies the `width` x `height` map region starting at `source` to the
    /// screen at `dest`.
    fn draw_map(&mut self, source: MapPoint, dest: ScreenPoint, width: i32, height: i32);

    /// Draws the square cursor marker centred on `at`.
    fn draw_cursor(&mut self, at: ScreenPoint, size: i32);

    /// Draws a record's dot centred on `at`.
    fn draw_record_dot(&mut self, at: ScreenPoint);

    /// Prints one list row; highlighted rows use inverted colours.
    fn print_row(&mut self, row: usize, text: &str, highlighted: bool);

    fn show_rating(&mut self, rating: DisplayRating);

    fn show_sort_mode(&mut self, mode: SortMode);
}

/// One recorded drawing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    Clear,
    Map {
        source: MapPoint,
        dest: ScreenPoint,
        width: i32,
        height: i32,
    },
    Cursor {
        at: ScreenPoint,
        size: i32,
    },
    RecordDot {
        at: ScreenPoint,
    },
    Row {
        row: usize,
        text: String,
        highlighted: bool,
    },
    Rating(u8),
    SortMode(SortMode),
}

/// Surface that keeps every request, for headless runs and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Returns and forgets everything recorded so far.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Rows printed, in order, as `(row, text, highlighted)`.
    pub fn rows(&self) -> Vec<(usize, &str, bool)> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Row {
                    row,
                    text,
                    highlighted,
                } => Some((*row, text.as_str(), *highlighted)),
                _ => None,
            })
            .collect()
    }

    pub fn count_where(&self, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|cmd| predicate(cmd)).count()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn draw_map(&mut self, source: MapPoint, dest: ScreenPoint, width: i32, height: i32) {
        self.commands.push(DrawCommand::Map {
            source,
            dest,
            width,
            height,
        });
    }

    fn draw_cursor(&mut self, at: ScreenPoint, size: i32) {
        self.commands.push(DrawCommand::Cursor { at, size });
    }

    fn draw_record_dot(&mut self, at: ScreenPoint) {
        self.commands.push(DrawCommand::RecordDot { at });
    }

    fn print_row(&mut self, row: usize, text: &str, highlighted: bool) {
        self.commands.push(DrawCommand::Row {
            row,
            text: text.to_string(),
            highlighted,
        });
    }

    fn show_rating(&mut self, rating: DisplayRating) {
        self.commands.push(DrawCommand::Rating(rating.value()));
    }

    fn show_sort_mode(&mut self, mode: SortMode) {
        self.commands.push(DrawCommand::SortMode(mode));
    }
}
