//! Reads the human's commands from stdin.

use std::sync::Arc;

use game_core::{ParseError, PieceKind, SelectionHandle, Square};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::presenter::ConsolePresenter;

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// A pick, with the promotion piece when typed as in `e7e8q`.
    Pick {
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    },
    Hints,
    /// Turn the board around.
    Flip,
    Quit,
}

/// Accepts `e2e4`, `e2 e4`, `e2-e4` and `e7e8q`, plus `moves`, `?`, `flip`
/// and `quit`.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "moves" | "?" => return Ok(Command::Hints),
        "flip" | "reverse" => return Ok(Command::Flip),
        "quit" | "exit" | "resign" => return Ok(Command::Quit),
        _ => {}
    }

    let compact: String = line
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    let bad = || ParseError::Move(line.to_string());
    if !compact.is_ascii() || !(4..=5).contains(&compact.len()) {
        return Err(bad());
    }
    let from: Square = compact[0..2].parse()?;
    let to: Square = compact[2..4].parse()?;
    let promotion = match compact[4..].chars().next() {
        None => None,
        Some(c) => Some(
            PieceKind::from_letter(c)
                .filter(|k| k.is_promotion_target())
                .ok_or_else(bad)?,
        ),
    };
    Ok(Command::Pick {
        from,
        to,
        promotion,
    })
}

/// Forwards stdin lines until `quit` or end of input.
///
/// While a promotion prompt is open, the line goes to the prompt instead.
/// Returning drops `handle`, which closes the human's move source.
pub async fn read_commands(presenter: Arc<ConsolePresenter>, handle: SelectionHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "failed to read stdin");
                break;
            }
        };
        if presenter.is_prompting() {
            presenter.answer_promotion(line);
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Pick {
                from,
                to,
                promotion,
            }) => {
                debug!(%from, %to, "selection");
                presenter.preselect_promotion(promotion);
                if !handle.select(from, to) {
                    break;
                }
            }
            Ok(Command::Hints) => presenter.print_hints(),
            Ok(Command::Flip) => {
                presenter.flip();
            }
            Ok(Command::Quit) => break,
            Err(e) => println!("{e}. Enter moves like e2e4."),
        }
    }
    presenter.close_input();
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod input_tests;
