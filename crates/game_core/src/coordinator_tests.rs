use super::*;
use crate::types::{PieceKind, Square};
use crate::EngineError;
use std::collections::{BTreeSet, VecDeque};
use std::sync::Mutex;
use tokio::sync::oneshot;

type Log = Arc<Mutex<Vec<&'static str>>>;

/// Plays a fixed list of answers, one per activation.
struct ScriptedSource {
    name: &'static str,
    script: VecDeque<Result<Move, SourceError>>,
    log: Log,
}

impl ScriptedSource {
    fn boxed(name: &'static str, moves: &[&str], log: &Log) -> Box<dyn MoveSource> {
        Box::new(Self {
            name,
            script: moves.iter().map(|m| Ok(m.parse().unwrap())).collect(),
            log: Arc::clone(log),
        })
    }

    fn failing(name: &'static str, log: &Log) -> Box<dyn MoveSource> {
        Box::new(Self {
            name,
            script: VecDeque::from([Err(SourceError::Engine(EngineError::NoMove))]),
            log: Arc::clone(log),
        })
    }
}

impl MoveSource for ScriptedSource {
    fn name(&self) -> &str {
        self.name
    }

    fn activate(&mut self, _position: &Position) -> crate::PendingMove {
        self.log.lock().unwrap().push(self.name);
        let (tx, rx) = oneshot::channel();
        // An exhausted script drops the sender, which reads as a disconnect.
        if let Some(answer) = self.script.pop_front() {
            let _ = tx.send(answer);
        }
        rx
    }
}

#[derive(Default)]
struct RecordingPresenter {
    applied: Mutex<Vec<Move>>,
    ended: Mutex<Vec<String>>,
}

impl Presenter for RecordingPresenter {
    fn on_move_applied(&self, mv: Move, _mirror: &BoardMirror) {
        self.applied.lock().unwrap().push(mv);
    }

    fn on_game_ended(&self, reason: &str) {
        self.ended.lock().unwrap().push(reason.to_string());
    }

    fn on_candidate_targets_changed(&self, _origin: Square, _targets: &BTreeSet<Square>) {}

    fn prompt_promotion_choice(&self, _color: Color) -> Option<PieceKind> {
        None
    }
}

fn coordinator(
    position: Position,
    white: Box<dyn MoveSource>,
    black: Box<dyn MoveSource>,
) -> (TurnCoordinator, Arc<RecordingPresenter>) {
    let presenter = Arc::new(RecordingPresenter::default());
    let coord = TurnCoordinator::new(position, white, black, presenter.clone());
    (coord, presenter)
}

async fn step(coord: &mut TurnCoordinator) -> Result<Option<GameResult>, CoordinatorError> {
    let produced = coord.inbox.recv().await.unwrap();
    coord.on_move_produced(produced)
}

#[tokio::test]
async fn fools_mate_ends_the_game() {
    let log = Log::default();
    let (mut coord, presenter) = coordinator(
        Position::startpos(),
        ScriptedSource::boxed("white", &["f2f3", "g2g4", "a2a3"], &log),
        ScriptedSource::boxed("black", &["e7e5", "d8h4"], &log),
    );

    let result = coord.run().await.unwrap();

    assert_eq!(
        result,
        GameResult::Checkmate {
            winner: Color::Black
        }
    );
    assert_eq!(coord.result(), Some(result));
    assert_eq!(*log.lock().unwrap(), vec!["white", "black", "white", "black"]);
    assert_eq!(*presenter.ended.lock().unwrap(), vec!["Checkmate! Black wins"]);
    assert_eq!(presenter.applied.lock().unwrap().len(), 4);
    assert!(coord.mirror().matches(coord.position()));

    // Finished games never activate again.
    coord.start();
    assert_eq!(coord.activations(), 4);
}

#[tokio::test]
async fn roles_alternate_after_each_move() {
    let log = Log::default();
    let (mut coord, _presenter) = coordinator(
        Position::startpos(),
        ScriptedSource::boxed("white", &["e2e4", "g1f3"], &log),
        ScriptedSource::boxed("black", &["e7e5", "b8c6"], &log),
    );

    assert_eq!(coord.moving(), Color::White);
    coord.start();
    for expected in [Color::Black, Color::White, Color::Black, Color::White] {
        assert_eq!(step(&mut coord).await.unwrap(), None);
        assert_eq!(coord.moving(), expected);
        assert_eq!(coord.position().side_to_move(), expected);
        assert!(coord.mirror().matches(coord.position()));
    }
    assert_eq!(
        *log.lock().unwrap(),
        vec!["white", "black", "white", "black", "white"]
    );
}

#[tokio::test]
async fn illegal_move_reactivates_the_same_source() {
    let log = Log::default();
    let (mut coord, presenter) = coordinator(
        Position::startpos(),
        ScriptedSource::boxed("white", &["e2e5", "e2e4"], &log),
        ScriptedSource::boxed("black", &["e7e5"], &log),
    );

    coord.start();
    assert_eq!(step(&mut coord).await.unwrap(), None);
    assert_eq!(coord.moving(), Color::White);
    assert!(coord.position().moves().is_empty());
    assert!(presenter.applied.lock().unwrap().is_empty());

    assert_eq!(step(&mut coord).await.unwrap(), None);
    assert_eq!(coord.moving(), Color::Black);
    assert_eq!(*log.lock().unwrap(), vec!["white", "white", "black"]);
}

#[tokio::test]
async fn moves_from_stale_activations_are_ignored() {
    let log = Log::default();
    let (mut coord, _presenter) = coordinator(
        Position::startpos(),
        ScriptedSource::boxed("white", &[], &log),
        ScriptedSource::boxed("black", &[], &log),
    );

    let stale = MoveProduced {
        activation: 42,
        outcome: Ok("e2e4".parse().unwrap()),
    };
    assert_eq!(coord.on_move_produced(stale).unwrap(), None);
    assert!(coord.position().moves().is_empty());
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn source_failure_ends_the_game() {
    let log = Log::default();
    let (mut coord, presenter) = coordinator(
        Position::startpos(),
        ScriptedSource::failing("engine", &log),
        ScriptedSource::boxed("black", &[], &log),
    );

    let err = coord.run().await.unwrap_err();

    assert!(matches!(
        err,
        CoordinatorError::Source {
            side: Color::White,
            source: SourceError::Engine(EngineError::NoMove),
        }
    ));
    let ended = presenter.ended.lock().unwrap();
    assert_eq!(ended.len(), 1);
    assert!(ended[0].contains("engine"));
    assert_eq!(coord.result(), None);
}

#[tokio::test]
async fn black_to_move_activates_black_first() {
    let log = Log::default();
    let pos = Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
        .unwrap();
    let (mut coord, _presenter) = coordinator(
        pos,
        ScriptedSource::boxed("white", &[], &log),
        ScriptedSource::boxed("black", &["c7c5"], &log),
    );

    assert_eq!(coord.moving(), Color::Black);
    coord.start();
    step(&mut coord).await.unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["black", "white"]);
}

#[tokio::test]
async fn finished_position_never_activates() {
    let log = Log::default();
    let mated =
        Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
    let (mut coord, presenter) = coordinator(
        mated,
        ScriptedSource::boxed("white", &[], &log),
        ScriptedSource::boxed("black", &[], &log),
    );

    let result = coord.run().await.unwrap();

    assert_eq!(
        result,
        GameResult::Checkmate {
            winner: Color::Black
        }
    );
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(presenter.ended.lock().unwrap().len(), 1);
}
