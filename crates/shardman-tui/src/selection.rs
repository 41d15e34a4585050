//! The selection state machine for the dashboard.
//!
//! Focus lives in one of two regions: the shard rows (each row carries a
//! 4-way action cursor) or the 3x2 global action grid below them. Vertical
//! movement crosses the boundary between the regions; horizontal movement
//! cycles within a row or the grid and wraps instead of clamping.

use shardman_core::ShardAction;

/// Number of per-shard row actions.
const ROW_ACTION_COUNT: usize = 4;
/// Number of global grid actions.
const GRID_ACTION_COUNT: usize = 6;
/// Columns in the global grid.
const GRID_COLS: usize = 2;

/// Per-shard action cursor positions, in row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Start,
    Stop,
    Restart,
    Logs,
}

impl RowAction {
    pub const ALL: [RowAction; ROW_ACTION_COUNT] = [
        RowAction::Start,
        RowAction::Stop,
        RowAction::Restart,
        RowAction::Logs,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RowAction::Start => "Start",
            RowAction::Stop => "Stop",
            RowAction::Restart => "Restart",
            RowAction::Logs => "Logs",
        }
    }

    /// The supervisor action for this cursor position, `None` for Logs.
    pub fn shard_action(&self) -> Option<ShardAction> {
        match self {
            RowAction::Start => Some(ShardAction::Start),
            RowAction::Stop => Some(ShardAction::Stop),
            RowAction::Restart => Some(ShardAction::Restart),
            RowAction::Logs => None,
        }
    }
}

/// Global grid actions, laid out 3 rows by 2 columns in pairs:
/// start/stop, enable/disable, restart/update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    StartAll,
    StopAll,
    EnableAll,
    DisableAll,
    RestartAll,
    Update,
}

impl GlobalAction {
    pub const ALL: [GlobalAction; GRID_ACTION_COUNT] = [
        GlobalAction::StartAll,
        GlobalAction::StopAll,
        GlobalAction::EnableAll,
        GlobalAction::DisableAll,
        GlobalAction::RestartAll,
        GlobalAction::Update,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GlobalAction::StartAll => "Start",
            GlobalAction::StopAll => "Stop",
            GlobalAction::EnableAll => "Enable",
            GlobalAction::DisableAll => "Disable",
            GlobalAction::RestartAll => "Restart",
            GlobalAction::Update => "Update",
        }
    }

    /// The supervisor action for this cell, `None` for Update (which runs
    /// the external updater instead of a unit action).
    pub fn shard_action(&self) -> Option<ShardAction> {
        match self {
            GlobalAction::StartAll => Some(ShardAction::Start),
            GlobalAction::StopAll => Some(ShardAction::Stop),
            GlobalAction::EnableAll => Some(ShardAction::Enable),
            GlobalAction::DisableAll => Some(ShardAction::Disable),
            GlobalAction::RestartAll => Some(ShardAction::Restart),
            GlobalAction::Update => None,
        }
    }
}

/// Where the focus currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// A shard row (index into the snapshot).
    Shard(usize),
    /// A cell of the global action grid (index into [`GlobalAction::ALL`]).
    Global(usize),
}

/// Cursor state for the whole dashboard.
///
/// The shard row index is remembered while focus sits in the global grid,
/// so leaving the grid upward returns to the exact row the operator came
/// from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    shard_row: usize,
    row_action: usize,
    global: Option<usize>,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    pub fn new() -> Self {
        Self {
            shard_row: 0,
            row_action: 0,
            global: None,
        }
    }

    /// The active focus position.
    pub fn focus(&self) -> Focus {
        match self.global {
            Some(cell) => Focus::Global(cell),
            None => Focus::Shard(self.shard_row),
        }
    }

    pub fn shard_row(&self) -> usize {
        self.shard_row
    }

    pub fn row_action(&self) -> RowAction {
        RowAction::ALL[self.row_action]
    }

    pub fn global_action(&self) -> Option<GlobalAction> {
        self.global.map(|cell| GlobalAction::ALL[cell])
    }

    /// Move focus down one step.
    ///
    /// Within the grid this steps a full grid row (two cells) and stops at
    /// the bottom row; from the last shard row (or an empty shard list) it
    /// enters the grid at cell 0.
    pub fn move_down(&mut self, shard_count: usize) {
        match self.global {
            Some(cell) => {
                if cell + GRID_COLS < GRID_ACTION_COUNT {
                    self.global = Some(cell + GRID_COLS);
                }
            }
            None => {
                if shard_count == 0 || self.shard_row + 1 >= shard_count {
                    self.global = Some(0);
                } else {
                    self.shard_row += 1;
                }
            }
        }
    }

    /// Move focus up one step.
    ///
    /// From the grid's top row focus returns to the shard region with the
    /// remembered row untouched; within the shard region movement clamps
    /// at row 0.
    pub fn move_up(&mut self, _shard_count: usize) {
        match self.global {
            Some(cell) => {
                if cell < GRID_COLS {
                    self.global = None;
                } else {
                    self.global = Some(cell - GRID_COLS);
                }
            }
            None => {
                self.shard_row = self.shard_row.saturating_sub(1);
            }
        }
    }

    /// Cycle the horizontal cursor right, wrapping.
    pub fn cycle_right(&mut self) {
        match self.global {
            Some(cell) => self.global = Some((cell + 1) % GRID_ACTION_COUNT),
            None => self.row_action = (self.row_action + 1) % ROW_ACTION_COUNT,
        }
    }

    /// Cycle the horizontal cursor left, wrapping.
    pub fn cycle_left(&mut self) {
        match self.global {
            Some(cell) => {
                self.global = Some((cell + GRID_ACTION_COUNT - 1) % GRID_ACTION_COUNT)
            }
            None => self.row_action = (self.row_action + ROW_ACTION_COUNT - 1) % ROW_ACTION_COUNT,
        }
    }

    /// Clamp the remembered shard row after the fleet shrank or the
    /// terminal was resized.
    pub fn clamp(&mut self, shard_count: usize) {
        if shard_count == 0 {
            self.shard_row = 0;
        } else if self.shard_row >= shard_count {
            self.shard_row = shard_count - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(selection: &Selection, shard_count: usize) -> bool {
        match selection.focus() {
            Focus::Shard(row) => row == 0 || row < shard_count,
            Focus::Global(cell) => cell < GRID_ACTION_COUNT,
        }
    }

    #[test]
    fn test_down_from_last_shard_enters_grid() {
        let mut sel = Selection::new();
        sel.move_down(2); // row 0 -> row 1
        assert_eq!(sel.focus(), Focus::Shard(1));
        sel.move_down(2); // last row -> grid cell 0
        assert_eq!(sel.focus(), Focus::Global(0));
    }

    #[test]
    fn test_up_from_grid_top_row_restores_shard_row() {
        let mut sel = Selection::new();
        sel.move_down(2);
        sel.move_down(2);
        assert_eq!(sel.focus(), Focus::Global(0));
        sel.move_up(2);
        // The shard row is exactly where the operator left it.
        assert_eq!(sel.focus(), Focus::Shard(1));
    }

    #[test]
    fn test_grid_vertical_steps_by_row() {
        let mut sel = Selection::new();
        sel.move_down(1); // enter grid at 0
        sel.move_down(1);
        assert_eq!(sel.focus(), Focus::Global(2));
        sel.move_down(1);
        assert_eq!(sel.focus(), Focus::Global(4));
        // Bottom row: no-op
        sel.move_down(1);
        assert_eq!(sel.focus(), Focus::Global(4));
        sel.move_up(1);
        assert_eq!(sel.focus(), Focus::Global(2));
    }

    #[test]
    fn test_grid_bottom_right_cell_is_terminal_downward() {
        let mut sel = Selection::new();
        sel.move_down(1);
        sel.cycle_right(); // cell 1
        sel.move_down(1); // cell 3
        sel.move_down(1); // cell 5
        assert_eq!(sel.focus(), Focus::Global(5));
        sel.move_down(1);
        assert_eq!(sel.focus(), Focus::Global(5));
    }

    #[test]
    fn test_shard_up_clamps_at_zero() {
        let mut sel = Selection::new();
        sel.move_up(3);
        assert_eq!(sel.focus(), Focus::Shard(0));
    }

    #[test]
    fn test_horizontal_wraps_in_both_regions() {
        let mut sel = Selection::new();
        sel.cycle_left();
        assert_eq!(sel.row_action(), RowAction::Logs);
        sel.cycle_right();
        assert_eq!(sel.row_action(), RowAction::Start);

        sel.move_down(1); // enter grid
        sel.cycle_left();
        assert_eq!(sel.global_action(), Some(GlobalAction::Update));
        sel.cycle_right();
        assert_eq!(sel.global_action(), Some(GlobalAction::StartAll));
    }

    #[test]
    fn test_empty_fleet_can_reach_grid() {
        let mut sel = Selection::new();
        sel.move_down(0);
        assert_eq!(sel.focus(), Focus::Global(0));
        sel.move_up(0);
        assert_eq!(sel.focus(), Focus::Shard(0));
    }

    #[test]
    fn test_focus_never_escapes_valid_range() {
        // Drive the machine through a long fixed walk and check the focus
        // invariant after every step.
        let moves = [
            "d", "d", "d", "d", "r", "d", "u", "l", "d", "d", "d", "r", "r", "r", "u", "u", "u",
            "u", "l", "l", "d", "r", "d", "l", "u", "d", "d", "d", "d", "d", "u", "r",
        ];
        for shard_count in [0usize, 1, 2, 5] {
            let mut sel = Selection::new();
            for step in moves {
                match step {
                    "d" => sel.move_down(shard_count),
                    "u" => sel.move_up(shard_count),
                    "l" => sel.cycle_left(),
                    "r" => sel.cycle_right(),
                    _ => unreachable!(),
                }
                assert!(valid(&sel, shard_count), "invalid focus {:?}", sel.focus());
            }
        }
    }

    #[test]
    fn test_clamp_after_fleet_shrink() {
        let mut sel = Selection::new();
        sel.move_down(5);
        sel.move_down(5);
        sel.move_down(5);
        assert_eq!(sel.focus(), Focus::Shard(3));
        sel.clamp(2);
        assert_eq!(sel.focus(), Focus::Shard(1));
        sel.clamp(0);
        assert_eq!(sel.focus(), Focus::Shard(0));
    }

    #[test]
    fn test_viewer_round_trip_leaves_selection_intact() {
        // The log viewer never touches Selection; equality is the contract.
        let mut sel = Selection::new();
        sel.move_down(3);
        sel.cycle_right();
        let saved = sel.clone();
        // ... viewer opens and closes ...
        assert_eq!(sel, saved);
    }

    #[test]
    fn test_action_mappings() {
        assert_eq!(RowAction::Logs.shard_action(), None);
        assert_eq!(
            RowAction::Restart.shard_action(),
            Some(ShardAction::Restart)
        );
        assert_eq!(GlobalAction::Update.shard_action(), None);
        assert_eq!(
            GlobalAction::DisableAll.shard_action(),
            Some(ShardAction::Disable)
        );
    }
}
