//! Text presenter: prints the board after each move and asks for promotion
//! pieces on the terminal.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use game_core::{BoardMirror, BoardOrientation, Color, Move, PieceKind, Presenter, Square};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Draws `mirror` as text with `orientation` deciding which side is at the
/// bottom. The squares of `last` are bracketed.
pub fn render_board(mirror: &BoardMirror, orientation: BoardOrientation, last: Option<Move>) -> String {
    let mut out = String::new();
    for row in 0..8 {
        let Some(first) = orientation.from_display(row, 0) else {
            continue;
        };
        let _ = write!(out, "{} ", first.rank() + 1);
        for col in 0..8 {
            let Some(sq) = orientation.from_display(row, col) else {
                continue;
            };
            let glyph = mirror.piece_at(sq).map_or('.', |p| p.fen_char());
            let marked = last.is_some_and(|mv| mv.from == sq || mv.to == sq);
            if marked {
                let _ = write!(out, "[{glyph}]");
            } else {
                let _ = write!(out, " {glyph} ");
            }
        }
        out.push('\n');
    }
    out.push_str("  ");
    for col in 0..8 {
        if let Some(sq) = orientation.from_display(7, col) {
            let file = (b'a' + sq.file()) as char;
            let _ = write!(out, " {file} ");
        }
    }
    out.push('\n');
    out
}

/// Presenter for a terminal game.
///
/// Promotion answers arrive from the input task through
/// [`ConsolePresenter::answer_promotion`] while a prompt is open.
pub struct ConsolePresenter {
    orientation: Mutex<BoardOrientation>,
    /// Last board shown and the move that produced it, for redrawing.
    shown: Mutex<Option<(BoardMirror, Option<Move>)>>,
    human: Color,
    targets: Mutex<BTreeMap<Square, BTreeSet<Square>>>,
    prompting: AtomicBool,
    input_closed: AtomicBool,
    preselected: Mutex<Option<PieceKind>>,
    answers_tx: mpsc::UnboundedSender<String>,
    answers_rx: Mutex<mpsc::UnboundedReceiver<String>>,
}

impl ConsolePresenter {
    pub fn new(orientation: BoardOrientation, human: Color) -> Self {
        let (answers_tx, answers_rx) = mpsc::unbounded_channel();
        Self {
            orientation: Mutex::new(orientation),
            shown: Mutex::new(None),
            human,
            targets: Mutex::new(BTreeMap::new()),
            prompting: AtomicBool::new(false),
            input_closed: AtomicBool::new(false),
            preselected: Mutex::new(None),
            answers_tx,
            answers_rx: Mutex::new(answers_rx),
        }
    }

    /// Prints the starting board.
    pub fn show(&self, mirror: &BoardMirror) {
        self.draw(mirror, None);
    }

    pub fn orientation(&self) -> BoardOrientation {
        self.orientation
            .lock()
            .map(|o| *o)
            .unwrap_or_default()
    }

    /// Turns the board around and redraws the last position shown.
    pub fn flip(&self) -> BoardOrientation {
        let flipped = match self.orientation.lock() {
            Ok(mut orientation) => {
                *orientation = orientation.flipped();
                *orientation
            }
            Err(_) => return BoardOrientation::default(),
        };
        debug!(?flipped, "board flipped");
        if let Some(board) = self.redraw() {
            println!("{board}");
        }
        flipped
    }

    /// The last board shown, rendered in the current orientation.
    pub fn redraw(&self) -> Option<String> {
        let (mirror, last) = (*self.shown.lock().ok()?)?;
        Some(render_board(&mirror, self.orientation(), last))
    }

    fn draw(&self, mirror: &BoardMirror, last: Option<Move>) {
        if let Ok(mut shown) = self.shown.lock() {
            *shown = Some((*mirror, last));
        }
        println!("{}", render_board(mirror, self.orientation(), last));
    }

    /// True while a promotion prompt waits for a line of input.
    pub fn is_prompting(&self) -> bool {
        self.prompting.load(Ordering::Acquire)
    }

    pub fn answer_promotion(&self, line: String) {
        let _ = self.answers_tx.send(line);
    }

    /// Stdin is gone; an open prompt is dismissed and later ones are skipped.
    pub fn close_input(&self) {
        self.input_closed.store(true, Ordering::Release);
        let _ = self.answers_tx.send(String::new());
    }

    /// Piece named in a move like `e7e8q`, used instead of prompting.
    pub fn preselect_promotion(&self, kind: Option<PieceKind>) {
        if let Ok(mut slot) = self.preselected.lock() {
            *slot = kind;
        }
    }

    /// Lists the moves currently open to the human.
    pub fn print_hints(&self) {
        let Ok(targets) = self.targets.lock() else {
            return;
        };
        if targets.is_empty() {
            println!("Not your turn.");
            return;
        }
        for (origin, dests) in targets.iter() {
            let dests: Vec<String> = dests.iter().map(Square::to_string).collect();
            println!("  {origin}: {}", dests.join(" "));
        }
    }
}

impl Presenter for ConsolePresenter {
    fn on_move_applied(&self, mv: Move, mirror: &BoardMirror) {
        println!("\n{mv}");
        self.draw(mirror, Some(mv));
    }

    fn on_game_ended(&self, reason: &str) {
        println!("Game over: {reason}");
    }

    fn on_candidate_targets_changed(&self, origin: Square, targets: &BTreeSet<Square>) {
        let Ok(mut map) = self.targets.lock() else {
            return;
        };
        let was_idle = map.is_empty();
        if targets.is_empty() {
            map.remove(&origin);
        } else {
            map.insert(origin, targets.clone());
        }
        if was_idle && !map.is_empty() {
            println!("{} to move. Enter a move like e2e4 (`moves` lists them).", self.human);
        }
    }

    fn prompt_promotion_choice(&self, color: Color) -> Option<PieceKind> {
        if let Some(kind) = self.preselected.lock().ok().and_then(|mut slot| slot.take()) {
            return Some(kind);
        }
        let mut answers = self.answers_rx.lock().ok()?;
        // Raised before printing so a quick answer is routed here, not read
        // as a move.
        self.prompting.store(true, Ordering::Release);
        if self.input_closed.load(Ordering::Acquire) {
            self.prompting.store(false, Ordering::Release);
            return None;
        }

        println!("Promote {color} pawn to (q)ueen, (r)ook, (b)ishop or k(n)ight? Empty line cancels.");
        let answer = answers.blocking_recv();
        self.prompting.store(false, Ordering::Release);
        // Lines sent after the answer belong to no prompt.
        while answers.try_recv().is_ok() {}

        let letter = answer?.trim().chars().next()?;
        match PieceKind::from_letter(letter).filter(|k| k.is_promotion_target()) {
            Some(kind) => {
                debug!(?kind, "promotion chosen");
                Some(kind)
            }
            None => {
                warn!(%letter, "not a promotion piece");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "presenter_tests.rs"]
mod presenter_tests;
