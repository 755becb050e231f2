//! Paginated result list with a highlighted selection.
//!
//! The list is shown 21 rows at a time. Moving within a page reports the two
//! rows whose highlight changed so the caller can redraw just those; crossing
//! a page boundary reports the new page for a full redraw.

use std::ops::Range;

/// Rows per page
pub const PAGE_SIZE: usize = 21;

/// One step of user input while browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavInput {
    Up,
    Down,
    Confirm,
    Idle,
}

/// What the caller has to redraw after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavOutcome {
    /// Nothing changed.
    Unchanged,
    /// Highlight moved within the page; rows are page-relative.
    Moved { previous: usize, current: usize },
    /// A different page is now shown.
    PageChanged { page: usize },
    /// Browsing finished with this absolute candidate index.
    Selected(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavState {
    Browsing,
    Selected,
}

/// Tracks `(page, offset)` over `count` sorted candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultListNavigator {
    count: usize,
    page: usize,
    offset: usize,
    state: NavState,
}

impl ResultListNavigator {
    /// Starts at the first candidate. Returns `None` for an empty list, which
    /// has nothing to select.
    pub fn new(count: usize) -> Option<Self> {
        (count > 0).then_some(ResultListNavigator {
            count,
            page: 0,
            offset: 0,
            state: NavState::Browsing,
        })
    }

    pub fn handle(&mut self, input: NavInput) -> NavOutcome {
        if self.state == NavState::Selected {
            return NavOutcome::Selected(self.selection());
        }

        match input {
            NavInput::Up => self.move_up(),
            NavInput::Down => self.move_down(),
            NavInput::Confirm => {
                self.state = NavState::Selected;
                NavOutcome::Selected(self.selection())
            }
            NavInput::Idle => NavOutcome::Unchanged,
        }
    }

    fn move_up(&mut self) -> NavOutcome {
        if self.offset > 0 {
            self.offset -= 1;
            NavOutcome::Moved {
                previous: self.offset + 1,
                current: self.offset,
            }
        } else if self.page > 0 {
            self.page -= 1;
            self.offset = PAGE_SIZE - 1;
            NavOutcome::PageChanged { page: self.page }
        } else {
            NavOutcome::Unchanged
        }
    }

    fn move_down(&mut self) -> NavOutcome {
        if self.selection() + 1 >= self.count {
            return NavOutcome::Unchanged;
        }
        if self.offset < PAGE_SIZE - 1 {
            self.offset += 1;
            NavOutcome::Moved {
                previous: self.offset - 1,
                current: self.offset,
            }
        } else {
            self.page += 1;
            self.offset = 0;
            NavOutcome::PageChanged { page: self.page }
        }
    }

    /// Absolute index of the highlighted candidate.
    pub fn selection(&self) -> usize {
        self.page * PAGE_SIZE + self.offset
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_selected(&self) -> bool {
        self.state == NavState::Selected
    }

    /// Candidate indices shown on the current page.
    pub fn page_range(&self) -> Range<usize> {
        let start = self.page * PAGE_SIZE;
        start..(start + PAGE_SIZE).min(self.count)
    }

    /// Number of pages needed for all candidates.
    pub fn page_count(&self) -> usize {
        self.count.div_ceil(PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(nav: &mut ResultListNavigator, input: NavInput, times: usize) {
        for _ in 0..times {
            nav.handle(input);
        }
    }

    #[test]
    fn test_empty_list_has_no_navigator() {
        assert!(ResultListNavigator::new(0).is_none());
    }

    #[test]
    fn test_initial_state() {
        let nav = ResultListNavigator::new(50).unwrap();
        assert_eq!(nav.page(), 0);
        assert_eq!(nav.offset(), 0);
        assert_eq!(nav.page_range(), 0..21);
        assert_eq!(nav.page_count(), 3);
    }

    #[test]
    fn test_move_within_page_reports_two_rows() {
        let mut nav = ResultListNavigator::new(50).unwrap();
        assert_eq!(
            nav.handle(NavInput::Down),
            NavOutcome::Moved {
                previous: 0,
                current: 1
            }
        );
        assert_eq!(
            nav.handle(NavInput::Up),
            NavOutcome::Moved {
                previous: 1,
                current: 0
            }
        );
    }

    #[test]
    fn test_up_at_top_of_first_page_is_noop() {
        let mut nav = ResultListNavigator::new(5).unwrap();
        assert_eq!(nav.handle(NavInput::Up), NavOutcome::Unchanged);
        assert_eq!(nav.selection(), 0);
    }

    #[test]
    fn test_down_past_offset_twenty_turns_page() {
        let mut nav = ResultListNavigator::new(50).unwrap();
        press(&mut nav, NavInput::Down, 20);
        assert_eq!(nav.offset(), 20);

        assert_eq!(nav.handle(NavInput::Down), NavOutcome::PageChanged { page: 1 });
        assert_eq!(nav.page(), 1);
        assert_eq!(nav.offset(), 0);
        assert_eq!(nav.selection(), 21);
        assert_eq!(nav.page_range(), 21..42);
    }

    #[test]
    fn test_up_from_offset_zero_lands_on_last_row_of_previous_page() {
        let mut nav = ResultListNavigator::new(50).unwrap();
        press(&mut nav, NavInput::Down, 21);
        assert_eq!(nav.page(), 1);

        assert_eq!(nav.handle(NavInput::Up), NavOutcome::PageChanged { page: 0 });
        assert_eq!(nav.offset(), 20);
        assert_eq!(nav.selection(), 20);
    }

    #[test]
    fn test_down_stops_at_last_candidate() {
        let mut nav = ResultListNavigator::new(25).unwrap();
        press(&mut nav, NavInput::Down, 100);
        assert_eq!(nav.selection(), 24);
        assert_eq!(nav.page(), 1);
        assert_eq!(nav.page_range(), 21..25);
        assert_eq!(nav.handle(NavInput::Down), NavOutcome::Unchanged);
    }

    #[test]
    fn test_down_at_offset_twenty_of_exact_last_page_is_noop() {
        let mut nav = ResultListNavigator::new(42).unwrap();
        press(&mut nav, NavInput::Down, 41);
        assert_eq!(nav.page(), 1);
        assert_eq!(nav.offset(), 20);
        assert_eq!(nav.handle(NavInput::Down), NavOutcome::Unchanged);
        assert_eq!(nav.selection(), 41);
    }

    #[test]
    fn test_selection_always_in_range() {
        let mut nav = ResultListNavigator::new(30).unwrap();
        let script = [
            NavInput::Down,
            NavInput::Up,
            NavInput::Up,
            NavInput::Down,
            NavInput::Idle,
        ];
        for step in 0..400 {
            nav.handle(script[(step * 7) % script.len()]);
            if step % 3 == 0 {
                nav.handle(NavInput::Down);
            }
            assert!(nav.selection() < nav.count());
            assert!(nav.offset() < PAGE_SIZE);
        }
    }

    #[test]
    fn test_confirm_is_terminal() {
        let mut nav = ResultListNavigator::new(50).unwrap();
        press(&mut nav, NavInput::Down, 23);
        assert_eq!(nav.handle(NavInput::Confirm), NavOutcome::Selected(23));
        assert!(nav.is_selected());

        assert_eq!(nav.handle(NavInput::Down), NavOutcome::Selected(23));
        assert_eq!(nav.selection(), 23);
    }

    #[test]
    fn test_single_candidate() {
        let mut nav = ResultListNavigator::new(1).unwrap();
        assert_eq!(nav.handle(NavInput::Down), NavOutcome::Unchanged);
        assert_eq!(nav.page_range(), 0..1);
        assert_eq!(nav.handle(NavInput::Confirm), NavOutcome::Selected(0));
    }
}
