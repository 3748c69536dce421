//! Search effort handed to an engine for one move.

use std::time::Duration;

/// Limits for a single engine call.
///
/// Depth is always set; the move time is an optional extra cap that engines
/// may honour (UCI engines receive it as `movetime`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudget {
    /// Search depth in plies, at least 1
    pub depth: u8,
    /// Maximum thinking time for the move (None = depth only)
    pub move_time: Option<Duration>,
}

impl SearchBudget {
    /// Depth-only budget. A depth of zero is raised to one.
    pub fn depth(depth: u8) -> Self {
        Self {
            depth: depth.max(1),
            move_time: None,
        }
    }

    pub fn with_move_time(self, move_time: Duration) -> Self {
        Self {
            move_time: Some(move_time),
            ..self
        }
    }

    /// Arguments for a UCI `go` command.
    pub fn go_command(&self) -> String {
        match self.move_time {
            Some(t) => format!("go depth {} movetime {}", self.depth, t.as_millis()),
            None => format!("go depth {}", self.depth),
        }
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self::depth(5)
    }
}
