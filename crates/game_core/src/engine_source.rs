//! Move source backed by an [`Engine`].

use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use tracing::{debug, error};

use crate::budget::SearchBudget;
use crate::position::Position;
use crate::source::{MoveSource, PendingMove, SourceError};
use crate::{Engine, EngineError};

/// Asks an engine for its best move on a blocking worker thread.
pub struct EngineSource {
    name: String,
    engine: Arc<Mutex<Box<dyn Engine>>>,
    budget: SearchBudget,
}

impl EngineSource {
    pub fn new(engine: Box<dyn Engine>, budget: SearchBudget) -> Self {
        Self {
            name: engine.name().to_string(),
            engine: Arc::new(Mutex::new(engine)),
            budget,
        }
    }
}

impl MoveSource for EngineSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn activate(&mut self, position: &Position) -> PendingMove {
        let (tx, rx) = oneshot::channel();
        let engine = Arc::clone(&self.engine);
        let position = position.clone();
        let budget = self.budget;
        debug!(engine = %self.name, depth = budget.depth, "engine thinking");

        tokio::task::spawn_blocking(move || {
            let result = match engine.lock() {
                Ok(mut engine) => engine.best_move(&position, budget),
                Err(_) => Err(EngineError::Unavailable("engine lock poisoned".to_string())),
            };
            if let Err(e) = &result {
                error!(error = %e, "engine call failed");
            }
            // The coordinator may have stopped listening; nothing to do then.
            let _ = tx.send(result.map_err(SourceError::from));
        });

        rx
    }
}

#[cfg(test)]
#[path = "engine_source_tests.rs"]
mod engine_source_tests;
