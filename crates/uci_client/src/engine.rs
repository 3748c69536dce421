//! An external UCI engine running as a child process.

use std::io::BufReader;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use game_core::{Engine, EngineError, Move, Position, SearchBudget};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::session::UciSession;

/// Owns the engine process for the lifetime of the game.
///
/// Dropping the engine sends `quit` and reaps the process, killing it if it
/// has not exited.
pub struct UciEngine {
    child: Child,
    session: UciSession<BufReader<ChildStdout>, ChildStdin>,
}

impl UciEngine {
    /// Starts the executable named in `config` and completes the handshake.
    pub fn spawn(config: &EngineConfig) -> Result<Self, EngineError> {
        let path = config
            .path
            .as_ref()
            .ok_or_else(|| EngineError::Unavailable("no engine path configured".into()))?;

        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                path: path.display().to_string(),
                source,
            })?;
        debug!(path = %path.display(), pid = child.id(), "engine process started");

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(EngineError::Unavailable("engine pipes unavailable".into()));
        };

        // Built before the handshake so a failed handshake still reaps the child.
        let mut engine = Self {
            child,
            session: UciSession::new(BufReader::new(stdout), stdin),
        };
        engine.session.handshake(&config.option_values())?;
        info!(engine = engine.session.name(), "engine ready");
        Ok(engine)
    }
}

impl Engine for UciEngine {
    fn best_move(&mut self, pos: &Position, budget: SearchBudget) -> Result<Move, EngineError> {
        self.session.best_move(pos, budget)
    }

    fn name(&self) -> &str {
        self.session.name()
    }

    fn new_game(&mut self) -> Result<(), EngineError> {
        self.session.new_game()
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        let _ = self.session.quit();
        match self.child.try_wait() {
            Ok(Some(status)) => debug!(%status, "engine exited"),
            _ => {
                if let Err(e) = self.child.kill() {
                    warn!(error = %e, "failed to kill engine process");
                }
                let _ = self.child.wait();
            }
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
