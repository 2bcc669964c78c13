//! Paged selection menu driven by the rotary encoder.
//!
//! Four items are visible at a time, one per display row. The active item
//! is marked by a `<` in the last column. Moving past either end of the
//! list is a no-op.

use crate::{
    display::{Display, COLS, ROWS},
    encoder::EncoderDelta,
    model::{SattrackError, SattrackResult},
    panel::InputPanel,
};

pub const PAGE_SIZE: usize = ROWS;
const CURSOR_COL: usize = COLS - 1;
const CURSOR_MARK: &str = "<";
const LABEL_WIDTH: usize = COLS - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuPhase {
    Closed,
    Open,
}

#[derive(Debug, Clone)]
pub struct MenuState {
    items: Vec<String>,
    active_index: usize,
    page: usize,
    phase: MenuPhase,
}

impl MenuState {
    pub fn new<I, S>(items: I) -> SattrackResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        if items.is_empty() {
            return Err(SattrackError::EmptyMenu);
        }
        Ok(Self {
            items,
            active_index: 0,
            page: 0,
            phase: MenuPhase::Closed,
        })
    }

    /// Index of the active item; the selection once the operator confirms.
    pub fn selected(&self) -> usize {
        self.active_index
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn phase(&self) -> MenuPhase {
        self.phase
    }

    fn max_index(&self) -> usize {
        self.items.len() - 1
    }

    /// Returns whether the index moved.
    pub fn increment(&mut self) -> bool {
        if self.active_index < self.max_index() {
            self.active_index += 1;
            true
        } else {
            false
        }
    }

    /// Returns whether the index moved.
    pub fn decrement(&mut self) -> bool {
        if self.active_index > 0 {
            self.active_index -= 1;
            true
        } else {
            false
        }
    }

    /// Moves by one encoder detent and redraws the cursor.
    pub fn apply_delta(
        &mut self,
        delta: EncoderDelta,
        display: &mut dyn Display,
    ) -> SattrackResult<()> {
        match delta {
            EncoderDelta::Forward => {
                self.increment();
            }
            EncoderDelta::Backward => {
                self.decrement();
            }
            EncoderDelta::Still => {}
        }
        self.cursor_redraw(display)
    }

    /// Brings the visible page in line with the active index and moves the
    /// cursor mark to its row. Safe to call repeatedly.
    pub fn cursor_redraw(&mut self, display: &mut dyn Display) -> SattrackResult<()> {
        let page = self.active_index / PAGE_SIZE;
        if page != self.page {
            self.page = page;
            self.render_page(display)?;
        }

        for row in 0..PAGE_SIZE {
            display.set_cursor(row, CURSOR_COL)?;
            display.write(" ")?;
        }
        display.set_cursor(self.active_index % PAGE_SIZE, CURSOR_COL)?;
        display.write(CURSOR_MARK)?;
        display.flush()
    }

    /// Redraws the labels of the current page.
    pub fn render_page(&self, display: &mut dyn Display) -> SattrackResult<()> {
        display.clear()?;
        let start = self.page * PAGE_SIZE;
        for (row, label) in self.items.iter().skip(start).take(PAGE_SIZE).enumerate() {
            display.set_cursor(row, 0)?;
            let visible: String = label.chars().take(LABEL_WIDTH).collect();
            display.write(&visible)?;
        }
        Ok(())
    }

    /// Draws the menu and starts listening to the encoder.
    pub fn enable(
        &mut self,
        display: &mut dyn Display,
        panel: &mut dyn InputPanel,
    ) -> SattrackResult<()> {
        self.page = self.active_index / PAGE_SIZE;
        self.render_page(display)?;
        self.cursor_redraw(display)?;
        panel.set_encoder_enabled(true);
        self.phase = MenuPhase::Open;
        Ok(())
    }

    /// Stops listening to the encoder and blanks the display.
    pub fn disable(
        &mut self,
        display: &mut dyn Display,
        panel: &mut dyn InputPanel,
    ) -> SattrackResult<()> {
        panel.set_encoder_enabled(false);
        self.phase = MenuPhase::Closed;
        display.clear()?;
        display.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::CharGrid;
    use crate::panel::PanelEvent;
    use std::time::Duration;

    #[derive(Default)]
    struct SwitchPanel {
        enabled: bool,
    }

    impl InputPanel for SwitchPanel {
        fn set_encoder_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }

        fn next_event(&mut self, _timeout: Option<Duration>) -> SattrackResult<Option<PanelEvent>> {
            Ok(None)
        }

        fn release(&mut self) {}
    }

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Item {i}")).collect()
    }

    fn cursor_rows(grid: &CharGrid) -> Vec<usize> {
        (0..ROWS)
            .filter(|row| grid.cell(*row, CURSOR_COL) == Some('<'))
            .collect()
    }

    #[test]
    fn empty_menu_rejected() {
        assert!(matches!(
            MenuState::new(Vec::<String>::new()),
            Err(SattrackError::EmptyMenu)
        ));
    }

    #[test]
    fn clamps_at_both_ends() {
        let mut menu = MenuState::new(labels(3)).unwrap();
        assert!(!menu.decrement());
        assert_eq!(menu.selected(), 0);
        assert!(menu.increment());
        assert!(menu.increment());
        assert!(!menu.increment());
        assert_eq!(menu.selected(), 2);
    }

    #[test]
    fn five_detents_over_three_targets_stop_at_last() {
        let mut grid = CharGrid::new();
        let mut panel = SwitchPanel::default();
        let mut menu = MenuState::new(["A", "B", "C"]).unwrap();
        menu.enable(&mut grid, &mut panel).unwrap();
        for _ in 0..5 {
            menu.apply_delta(EncoderDelta::Forward, &mut grid).unwrap();
        }
        assert_eq!(menu.selected(), 2);
        assert_eq!(cursor_rows(&grid), vec![2]);
    }

    #[test]
    fn index_stays_in_range_for_any_walk() {
        let mut grid = CharGrid::new();
        let mut menu = MenuState::new(labels(6)).unwrap();
        let walk = [1, 1, -1, 1, 1, 1, 1, 1, 1, -1, -1, -1, -1, -1, -1, -1, -1, 1];
        for step in walk {
            let delta = if step > 0 {
                EncoderDelta::Forward
            } else {
                EncoderDelta::Backward
            };
            menu.apply_delta(delta, &mut grid).unwrap();
            assert!(menu.selected() < 6);
            assert_eq!(menu.page(), menu.selected() / PAGE_SIZE);
        }
    }

    #[test]
    fn renders_first_page_with_cursor() {
        let mut grid = CharGrid::new();
        let mut panel = SwitchPanel::default();
        let mut menu = MenuState::new(["Back", "Change Target", "Quit"]).unwrap();
        menu.enable(&mut grid, &mut panel).unwrap();
        assert!(panel.enabled);
        assert_eq!(menu.phase(), MenuPhase::Open);
        assert!(grid.row_text(0).starts_with("Back"));
        assert!(grid.row_text(1).starts_with("Change Target"));
        assert!(grid.row_text(2).starts_with("Quit"));
        assert_eq!(grid.row_text(3).trim(), "");
        assert_eq!(cursor_rows(&grid), vec![0]);
    }

    #[test]
    fn crossing_a_page_boundary_redraws_the_list() {
        let mut grid = CharGrid::new();
        let mut panel = SwitchPanel::default();
        let mut menu = MenuState::new(labels(6)).unwrap();
        menu.enable(&mut grid, &mut panel).unwrap();
        for _ in 0..4 {
            menu.apply_delta(EncoderDelta::Forward, &mut grid).unwrap();
        }
        assert_eq!(menu.page(), 1);
        assert!(grid.row_text(0).starts_with("Item 4"));
        assert!(grid.row_text(1).starts_with("Item 5"));
        assert_eq!(grid.row_text(2).trim(), "");
        assert_eq!(cursor_rows(&grid), vec![0]);

        menu.apply_delta(EncoderDelta::Backward, &mut grid).unwrap();
        assert_eq!(menu.page(), 0);
        assert!(grid.row_text(0).starts_with("Item 0"));
        assert_eq!(cursor_rows(&grid), vec![3]);
    }

    #[test]
    fn cursor_redraw_is_idempotent() {
        let mut grid = CharGrid::new();
        let mut panel = SwitchPanel::default();
        let mut menu = MenuState::new(labels(7)).unwrap();
        menu.enable(&mut grid, &mut panel).unwrap();
        for _ in 0..5 {
            menu.increment();
        }
        menu.cursor_redraw(&mut grid).unwrap();
        let first = grid.clone();
        let page = menu.page();
        menu.cursor_redraw(&mut grid).unwrap();
        assert_eq!(grid, first);
        assert_eq!(menu.page(), page);
    }

    #[test]
    fn long_labels_leave_the_cursor_column_alone() {
        let mut grid = CharGrid::new();
        let mut panel = SwitchPanel::default();
        let mut menu = MenuState::new(["A VERY LONG SATELLITE NAME"]).unwrap();
        menu.enable(&mut grid, &mut panel).unwrap();
        assert_eq!(grid.row_text(0), "A VERY LONG SATELLI<");
        assert_eq!(grid.row_text(1).trim(), "");
    }

    #[test]
    fn disable_clears_and_closes() {
        let mut grid = CharGrid::new();
        let mut panel = SwitchPanel::default();
        let mut menu = MenuState::new(labels(2)).unwrap();
        menu.enable(&mut grid, &mut panel).unwrap();
        menu.disable(&mut grid, &mut panel).unwrap();
        assert!(!panel.enabled);
        assert!(grid.is_blank());
        assert_eq!(menu.phase(), MenuPhase::Closed);
    }
}
