//! The client side of the UCI conversation, independent of where the bytes go.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use game_core::{EngineError, Move, Position, SearchBudget};
use tracing::{debug, trace};

/// Speaks UCI to an engine over a line reader and a writer.
///
/// Every command and every reply is logged at trace level under the `uci`
/// target.
pub struct UciSession<R, W> {
    reader: R,
    writer: W,
    name: String,
}

impl<R: BufRead, W: Write> UciSession<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            name: String::from("uci engine"),
        }
    }

    /// Name the engine reported with `id name`, or a placeholder before the
    /// handshake.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `uci` / `uciok`, then the configured options, then `isready` / `readyok`.
    pub fn handshake(&mut self, options: &BTreeMap<String, String>) -> Result<(), EngineError> {
        self.send("uci")?;
        for line in self.read_until("uciok")? {
            if let Some(name) = line.strip_prefix("id name ") {
                self.name = name.trim().to_string();
            }
        }
        for (name, value) in options {
            self.send(&format!("setoption name {name} value {value}"))?;
        }
        self.sync()
    }

    /// Blocks until the engine answers `isready`.
    pub fn sync(&mut self) -> Result<(), EngineError> {
        self.send("isready")?;
        self.read_until("readyok").map(|_| ())
    }

    pub fn new_game(&mut self) -> Result<(), EngineError> {
        self.send("ucinewgame")?;
        self.sync()
    }

    /// Sends the position and a `go`, then waits for `bestmove`.
    ///
    /// `0000` and `(none)` mean the engine found nothing to play. A move that
    /// is not legal in `pos` is a protocol error.
    pub fn best_move(&mut self, pos: &Position, budget: SearchBudget) -> Result<Move, EngineError> {
        self.send(&pos.uci_position_command())?;
        self.send(&budget.go_command())?;

        loop {
            let line = self.read_line()?;
            let mut parts = line.split_whitespace();
            match parts.next() {
                Some("bestmove") => {
                    let txt = parts.next().unwrap_or("(none)");
                    if txt == "0000" || txt == "(none)" {
                        return Err(EngineError::NoMove);
                    }
                    return pos.parse_uci_move(txt).ok_or_else(|| {
                        EngineError::Protocol(format!("engine played illegal move `{txt}`"))
                    });
                }
                Some("info") => {
                    if let Some(score) = info_score(&line) {
                        debug!(engine = %self.name, score, "search info");
                    }
                }
                _ => {}
            }
        }
    }

    pub fn quit(&mut self) -> Result<(), EngineError> {
        self.send("quit")
    }

    fn send(&mut self, cmd: &str) -> Result<(), EngineError> {
        trace!(target: "uci", ">> {cmd}");
        writeln!(self.writer, "{cmd}")?;
        self.writer.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, EngineError> {
        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Err(EngineError::Unavailable(format!(
                "{} closed its output",
                self.name
            )));
        }
        let line = buf.trim().to_string();
        trace!(target: "uci", "<< {line}");
        Ok(line)
    }

    /// Reads lines up to `token`, returning the lines before it.
    fn read_until(&mut self, token: &str) -> Result<Vec<String>, EngineError> {
        let mut seen = Vec::new();
        loop {
            let line = self.read_line()?;
            if line == token {
                return Ok(seen);
            }
            seen.push(line);
        }
    }

    #[cfg(test)]
    pub(crate) fn writer(&self) -> &W {
        &self.writer
    }
}

/// The `score cp N` or `score mate N` part of an info line, rendered as text.
fn info_score(line: &str) -> Option<String> {
    let mut parts = line.split_whitespace().skip_while(|p| *p != "score").skip(1);
    match (parts.next()?, parts.next()?) {
        ("cp", n) => Some(format!("{n}cp")),
        ("mate", n) => Some(format!("mate {n}")),
        _ => None,
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
