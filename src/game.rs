//! Core game state and logic
//!
//! Drives one session: spawn, fall, move/rotate, lock, clear, score and
//! respawn, until a freshly spawned piece collides or the player quits.

use crate::board::Board;
use crate::piece::Piece;
use crate::randomizer::PieceSource;
use crate::score::Score;
use crate::submit::ScoreSubmitter;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    /// A new piece collided on spawn
    ToppedOut,
    /// The player quit
    Aborted,
}

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    GameOver(GameOverCause),
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    Pause,
    Quit,
}

/// The main game struct
pub struct Game {
    /// Locked cells
    board: Board,
    /// Current falling piece
    current_piece: Option<Piece>,
    /// Lookahead piece, promoted on the next spawn
    next_piece: Option<Piece>,
    /// Score tracking
    score: Score,
    /// Milliseconds accumulated towards the next gravity step
    drop_timer_ms: u64,
    /// Current game state
    state: GameState,
    /// Pieces locked this session
    pieces_locked: u32,
    /// Games started on this engine, tags score submissions
    game_number: u32,
    /// Piece generator
    source: Box<dyn PieceSource>,
    /// Where the final score goes on a top-out
    submitter: Box<dyn ScoreSubmitter>,
    /// Player the score is submitted for
    username: String,
}

impl Game {
    /// Create a game on a `width` x `height` board and start it
    ///
    /// Panics if either dimension is zero.
    pub fn new(
        width: usize,
        height: usize,
        username: impl Into<String>,
        source: Box<dyn PieceSource>,
        submitter: Box<dyn ScoreSubmitter>,
    ) -> Self {
        let mut game = Self {
            board: Board::new(width, height),
            current_piece: None,
            next_piece: None,
            score: Score::new(),
            drop_timer_ms: 0,
            state: GameState::Playing,
            pieces_locked: 0,
            game_number: 0,
            source,
            submitter,
            username: username.into(),
        };
        game.start();
        game
    }

    /// Reset everything and spawn the first piece
    pub fn start(&mut self) {
        self.board = Board::new(self.board.width(), self.board.height());
        self.score = Score::new();
        self.drop_timer_ms = 0;
        self.state = GameState::Playing;
        self.pieces_locked = 0;
        self.current_piece = None;
        self.next_piece = None;
        self.game_number += 1;
        tracing::info!("Game {} for {}", self.game_number, self.username);
        self.spawn();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> Option<&Piece> {
        self.current_piece.as_ref()
    }

    pub fn next_piece(&self) -> Option<&Piece> {
        self.next_piece.as_ref()
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == GameState::Paused
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.state, GameState::GameOver(_))
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    /// Number of the game in progress, starting at 1
    pub fn game_number(&self) -> u32 {
        self.game_number
    }

    /// Process an action
    pub fn process_action(&mut self, action: Action) {
        match action {
            Action::MoveLeft => {
                self.move_piece(-1, 0);
            }
            Action::MoveRight => {
                self.move_piece(1, 0);
            }
            Action::SoftDrop => {
                self.move_piece(0, 1);
            }
            Action::Rotate => {
                self.rotate();
            }
            Action::Pause => self.toggle_pause(),
            Action::Quit => self.abort(),
        }
    }

    /// Advance gravity by `delta_ms` milliseconds (call every frame)
    ///
    /// Once the accumulated time reaches the drop interval the piece falls
    /// one row and the accumulator restarts from zero; any overshoot is lost.
    pub fn tick(&mut self, delta_ms: u64) {
        if self.state != GameState::Playing {
            return;
        }

        self.drop_timer_ms = self.drop_timer_ms.saturating_add(delta_ms);
        if self.drop_timer_ms >= self.score.drop_interval_ms {
            self.move_piece(0, 1);
            self.drop_timer_ms = 0;
        }
    }

    /// Try to shift the current piece, returns true if it moved
    ///
    /// A blocked downward move locks the piece. Blocked sideways or upward
    /// moves are ignored.
    pub fn move_piece(&mut self, dx: i32, dy: i32) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(piece) = &self.current_piece else {
            return false;
        };

        let candidate = piece.shifted(dx, dy);
        if !self.board.collides(&candidate) {
            self.current_piece = Some(candidate);
            return true;
        }

        if dy > 0 {
            self.lock_piece();
        }
        false
    }

    /// Try to turn the current piece clockwise in place, returns true if it turned
    pub fn rotate(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(piece) = &self.current_piece else {
            return false;
        };

        let candidate = piece.rotated();
        if self.board.collides(&candidate) {
            return false;
        }
        self.current_piece = Some(candidate);
        true
    }

    /// Flip between playing and paused; ignored once the game is over
    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            GameState::Playing => GameState::Paused,
            GameState::Paused => GameState::Playing,
            over @ GameState::GameOver(_) => over,
        };
    }

    /// End the session at the player's request; the score is not submitted
    pub fn abort(&mut self) {
        if !self.is_game_over() {
            self.finish(GameOverCause::Aborted);
        }
    }

    /// Promote the lookahead piece and draw a new one
    ///
    /// If the promoted piece already collides the game is over.
    pub fn spawn(&mut self) {
        if self.is_game_over() {
            return;
        }

        let piece = match self.next_piece.take() {
            Some(piece) => piece,
            None => self.make_piece(),
        };
        self.next_piece = Some(self.make_piece());

        let topped_out = self.board.collides(&piece);
        tracing::debug!(
            "Spawned {} at ({}, {}), next {:?}",
            piece.piece_type.letter(),
            piece.x,
            piece.y,
            self.next_piece.as_ref().map(|p| p.piece_type.letter())
        );
        self.current_piece = Some(piece);

        if topped_out {
            self.finish(GameOverCause::ToppedOut);
        }
    }

    fn make_piece(&mut self) -> Piece {
        Piece::spawn(self.source.next_piece(), self.board.width())
    }

    /// Lock the current piece, clear rows, score, and spawn the next one
    fn lock_piece(&mut self) {
        let Some(piece) = self.current_piece.take() else {
            return;
        };

        self.board.lock(&piece);
        self.pieces_locked += 1;

        let lines = self.board.clear_full_rows() as u32;
        if lines > 0 {
            let level_before = self.score.level;
            let awarded = self.score.add_clear(lines);
            tracing::debug!(
                "Cleared {} line(s) for {} points, total {}",
                lines,
                awarded,
                self.score.points
            );
            if self.score.level > level_before {
                tracing::info!(
                    "Level {} reached, drop interval {}ms",
                    self.score.level,
                    self.score.drop_interval_ms
                );
            }
        }

        self.spawn();
    }

    fn finish(&mut self, cause: GameOverCause) {
        self.state = GameState::GameOver(cause);
        tracing::info!(
            "Game over ({:?}) for {}: score {}, level {}, lines {}",
            cause,
            self.username,
            self.score.points,
            self.score.level,
            self.score.lines
        );
        tracing::debug!("Final board:\n{}", self.board);
        if cause == GameOverCause::ToppedOut {
            self.submitter.submit(self.game_number, &self.username, self.score.points);
        }
    }

    #[cfg(test)]
    fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    fn score_mut(&mut self) -> &mut Score {
        &mut self.score
    }
}
