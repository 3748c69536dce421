//! UCI engine client
//!
//! Runs an external engine executable and talks to it over stdin/stdout:
//! - `EngineConfig` describes which executable to run and how hard it searches
//! - `UciSession` speaks the protocol over any reader/writer pair
//! - `UciEngine` owns the child process and implements `game_core::Engine`

mod config;
mod engine;
mod session;

pub use config::*;
pub use engine::*;
pub use session::*;
