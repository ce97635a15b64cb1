// =============================================================================
// External move providers
//
// The rules engine never searches. Computer moves come from a MoveProvider:
// either an external UCI process (UciEngine) or a uniformly random legal-move
// picker (RandomMover) used for self-play and tests.
//
// Providers are slow and blocking, so an EngineWorker runs one on a background
// thread. Each request carries a CancelToken; replies whose token was
// cancelled in the meantime are dropped on the owner's side, so a stale move
// can never reach the board.
// =============================================================================

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::board::Board;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::fen;
use crate::legality::legal_moves;
use crate::moves::Move;
use crate::piece::{Color, PieceKind};
use crate::square::Square;

/// Something that can propose a move for `side` in a position.
pub trait MoveProvider: Send {
    fn compute_move(
        &mut self,
        board: &Board,
        side: Color,
        double_step: Option<Square>,
    ) -> Result<Move, EngineError>;
}

// =============================================================================
// UCI process
// =============================================================================

pub struct UciEngine {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    config: EngineConfig,
}

impl UciEngine {
    /// Spawn the engine and run the handshake.
    pub fn start(config: EngineConfig) -> Result<Self, EngineError> {
        let mut child = Command::new(&config.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                path: config.path.clone(),
                source,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Protocol("engine stdin unavailable".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Protocol("engine stdout unavailable".into()))?;

        let mut engine = UciEngine {
            child,
            stdin,
            reader: BufReader::new(stdout),
            config,
        };

        engine.send("uci")?;
        engine.wait_for("uciok")?;
        for option in engine.config.uci_options() {
            engine.send(&option)?;
        }
        engine.send("isready")?;
        engine.wait_for("readyok")?;
        debug!("engine '{}' ready", engine.config.path);

        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn send(&mut self, cmd: &str) -> Result<(), EngineError> {
        debug!("engine <- {cmd}");
        writeln!(self.stdin, "{cmd}")?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Read lines until one starts with `prefix`. End of output means the
    /// process went away.
    fn wait_for(&mut self, prefix: &str) -> Result<String, EngineError> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(EngineError::Disconnected);
            }
            let trimmed = line.trim();
            if trimmed.starts_with(prefix) {
                debug!("engine -> {trimmed}");
                return Ok(trimmed.to_string());
            }
        }
    }
}

impl MoveProvider for UciEngine {
    fn compute_move(
        &mut self,
        board: &Board,
        side: Color,
        double_step: Option<Square>,
    ) -> Result<Move, EngineError> {
        let position = fen::export(board, side, double_step);
        self.send(&format!("position fen {position}"))?;
        let go = self.config.go_command();
        self.send(&go)?;
        let line = self.wait_for("bestmove")?;
        parse_bestmove(&line)
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        let _ = self.send("quit");
        let _ = self.child.wait();
    }
}

/// Extract the move from a `bestmove <code> [ponder <code>]` line.
pub fn parse_bestmove(line: &str) -> Result<Move, EngineError> {
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("bestmove") {
        return Err(EngineError::Protocol(format!("expected bestmove, got '{line}'")));
    }
    match tokens.next() {
        None | Some("(none)") | Some("0000") => Err(EngineError::NoMove),
        Some(code) => Move::from_uci(code),
    }
}

// =============================================================================
// Random legal moves
// =============================================================================

/// Picks uniformly among the legal moves. Promotions choose a random kind.
pub struct RandomMover {
    rng: StdRng,
}

impl Default for RandomMover {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomMover {
    pub fn new() -> Self {
        RandomMover {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomMover {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl MoveProvider for RandomMover {
    fn compute_move(
        &mut self,
        board: &Board,
        side: Color,
        double_step: Option<Square>,
    ) -> Result<Move, EngineError> {
        let moves = legal_moves(board, side, double_step);
        let &(from, to) = moves.choose(&mut self.rng).ok_or(EngineError::NoMove)?;
        let mut mv = Move::new(from, to);
        let is_pawn = board.get(from).is_some_and(|p| p.kind == PieceKind::Pawn);
        if is_pawn && to.rank == side.promotion_rank() {
            mv.promotion = PieceKind::PROMOTIONS.choose(&mut self.rng).copied();
        }
        Ok(mv)
    }
}

// =============================================================================
// Background worker
// =============================================================================

/// Shared "still wanted" flag for one request.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

struct Request {
    board: Board,
    side: Color,
    double_step: Option<Square>,
    token: CancelToken,
}

struct Reply {
    token: CancelToken,
    result: Result<Move, EngineError>,
}

/// Owns a provider on its own thread. Results are only ever handed back to
/// the caller; the worker never sees the live game.
pub struct EngineWorker {
    requests: Option<mpsc::Sender<Request>>,
    replies: mpsc::Receiver<Reply>,
    handle: Option<JoinHandle<()>>,
}

impl EngineWorker {
    pub fn spawn<P: MoveProvider + 'static>(mut provider: P) -> Result<Self, EngineError> {
        let (request_tx, request_rx) = mpsc::channel::<Request>();
        let (reply_tx, reply_rx) = mpsc::channel::<Reply>();

        let handle = thread::Builder::new()
            .name("engine-worker".into())
            .spawn(move || {
                for request in request_rx {
                    if request.token.is_cancelled() {
                        debug!("skipping cancelled engine request");
                        continue;
                    }
                    let result =
                        provider.compute_move(&request.board, request.side, request.double_step);
                    let reply = Reply {
                        token: request.token,
                        result,
                    };
                    if reply_tx.send(reply).is_err() {
                        break;
                    }
                }
            })?;

        Ok(EngineWorker {
            requests: Some(request_tx),
            replies: reply_rx,
            handle: Some(handle),
        })
    }

    /// Queue a request for a snapshot of the position. Cancel the returned
    /// token when the answer is no longer wanted (undo, new game, shutdown).
    pub fn request(
        &self,
        board: &Board,
        side: Color,
        double_step: Option<Square>,
    ) -> Result<CancelToken, EngineError> {
        let token = CancelToken::new();
        let request = Request {
            board: board.clone(),
            side,
            double_step,
            token: token.clone(),
        };
        self.requests
            .as_ref()
            .ok_or(EngineError::Disconnected)?
            .send(request)
            .map_err(|_| EngineError::Disconnected)?;
        Ok(token)
    }

    /// Non-blocking poll. Cancelled replies are discarded.
    pub fn try_reply(&self) -> Option<Result<Move, EngineError>> {
        loop {
            match self.replies.try_recv() {
                Ok(reply) if reply.token.is_cancelled() => {
                    debug!("discarding reply to a cancelled request");
                }
                Ok(reply) => return Some(reply.result),
                Err(mpsc::TryRecvError::Empty) => return None,
                Err(mpsc::TryRecvError::Disconnected) => {
                    return Some(Err(EngineError::Disconnected))
                }
            }
        }
    }

    /// Block until a wanted reply arrives.
    pub fn wait_reply(&self) -> Result<Move, EngineError> {
        loop {
            let reply = self.replies.recv().map_err(|_| EngineError::Disconnected)?;
            if reply.token.is_cancelled() {
                debug!("discarding reply to a cancelled request");
                continue;
            }
            return reply.result;
        }
    }
}

impl Drop for EngineWorker {
    fn drop(&mut self) {
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("engine worker panicked");
            }
        }
    }
}
