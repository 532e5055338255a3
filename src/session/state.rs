//! Quiz state machine.
//!
//! The machine sequences through: Start → Playing → Result → Playing ... →
//! RankingReview, and back to Start on restart. Every transition takes the
//! current instant explicitly so round timing is deterministic under test.

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::time::Instant;

use super::summary::{RoundResult, SessionSummary};
use super::PlayerIdentity;
use crate::content::ContentBundle;
use crate::puzzle::{generate_target, score, Puzzle, RoundPools, ROUND_COUNT};
use crate::render::{Rasterize, RenderedImage};

/// Screen-level phase of the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Identity entry
    Start,
    /// A puzzle is shown and the timer runs
    Playing,
    /// Score of the last round is shown
    Result,
    /// Session finished, ranking board shown
    RankingReview,
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GamePhase::Start => write!(f, "Start"),
            GamePhase::Playing => write!(f, "Playing"),
            GamePhase::Result => write!(f, "Result"),
            GamePhase::RankingReview => write!(f, "Ranking review"),
        }
    }
}

/// Running totals of the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Current round (1-based), 0 before the session starts
    pub round: u8,
    pub cumulative_elapsed_ms: u64,
    pub accuracy_sum: u32,
    pub rounds_completed: u8,
    pub current_bundle_id: String,
    /// Play number of this session (completed plays + 1)
    pub play_count: u32,
}

/// Sentence pools for one session.
#[derive(Debug, Clone, Default)]
pub struct SessionContent {
    pub mindset: Vec<String>,
    pub digital: Vec<String>,
    /// Rotated bundle used by round 3
    pub bundle: ContentBundle,
}

/// What `advance` moved to.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    NextRound(u8),
    Finished(SessionSummary),
}

/// Single-owner quiz state. Randomness and rasterization are injected.
pub struct QuizMachine<R: Rng = StdRng> {
    phase: GamePhase,
    session: SessionState,
    identity: PlayerIdentity,
    content: SessionContent,
    puzzle: Option<Puzzle>,
    started_at: Option<Instant>,
    results: Vec<RoundResult>,
    summary: Option<SessionSummary>,
    rasterizer: Box<dyn Rasterize + Send>,
    rng: R,
}

impl QuizMachine<StdRng> {
    /// Machine seeded from OS entropy.
    pub fn from_entropy(rasterizer: Box<dyn Rasterize + Send>) -> Self {
        Self::new(rasterizer, StdRng::from_os_rng())
    }
}

impl<R: Rng> QuizMachine<R> {
    pub fn new(rasterizer: Box<dyn Rasterize + Send>, rng: R) -> Self {
        Self {
            phase: GamePhase::Start,
            session: SessionState::default(),
            identity: PlayerIdentity::default(),
            content: SessionContent::default(),
            puzzle: None,
            started_at: None,
            results: Vec::new(),
            summary: None,
            rasterizer,
            rng,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn identity(&self) -> &PlayerIdentity {
        &self.identity
    }

    pub fn puzzle(&self) -> Option<&Puzzle> {
        self.puzzle.as_ref()
    }

    pub fn last_result(&self) -> Option<&RoundResult> {
        self.results.last()
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    /// Randomness source shared with bundle selection.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Errors unless the machine is in `expected`.
    pub fn expect_phase(&self, expected: GamePhase, action: &str) -> Result<()> {
        if self.phase != expected {
            return Err(anyhow!(
                "Cannot {} in phase {} (expected {})",
                action,
                self.phase,
                expected
            ));
        }
        Ok(())
    }

    /// Starts a session at round 1.
    ///
    /// `completed_plays` is the server's play count; this session becomes play
    /// `completed_plays + 1`.
    pub fn begin(
        &mut self,
        identity: PlayerIdentity,
        completed_plays: u32,
        content: SessionContent,
        now: Instant,
    ) -> Result<&Puzzle> {
        self.expect_phase(GamePhase::Start, "begin")?;
        identity.validate()?;

        crate::log(&format!(
            "Session start: play {} for {}/{} with bundle '{}'",
            completed_plays.saturating_add(1),
            identity.company,
            identity.employee_id,
            content.bundle.id
        ));

        self.session = SessionState {
            round: 1,
            current_bundle_id: content.bundle.id.clone(),
            play_count: completed_plays.saturating_add(1),
            ..SessionState::default()
        };
        self.identity = identity;
        self.content = content;
        self.results.clear();
        self.summary = None;
        self.start_round(now);

        self.current_puzzle()
    }

    /// Grades the answer to the current puzzle.
    pub fn submit(&mut self, raw: &str, now: Instant) -> Result<RoundResult> {
        self.expect_phase(GamePhase::Playing, "submit")?;
        let puzzle = self
            .puzzle
            .as_ref()
            .ok_or_else(|| anyhow!("No active puzzle to submit"))?;
        let started = self
            .started_at
            .ok_or_else(|| anyhow!("Round {} has no start time", puzzle.round))?;

        let elapsed_ms = now.saturating_duration_since(started).as_millis() as u64;
        let accuracy = score(puzzle.kind, &puzzle.target, raw);
        let result = RoundResult {
            round: puzzle.round,
            kind: puzzle.kind,
            elapsed_ms,
            accuracy,
        };

        self.session.cumulative_elapsed_ms += elapsed_ms;
        self.session.accuracy_sum += accuracy as u32;
        self.session.rounds_completed += 1;
        self.results.push(result.clone());
        self.phase = GamePhase::Result;

        crate::log(&format!(
            "Round {} ({}) submitted: {} ms, {}%",
            result.round, result.kind, elapsed_ms, accuracy
        ));
        Ok(result)
    }

    /// Moves to the next round, or finishes the session after the last one.
    pub fn advance(&mut self, now: Instant) -> Result<Advance> {
        self.expect_phase(GamePhase::Result, "advance")?;

        if self.session.round >= ROUND_COUNT {
            let summary = SessionSummary::new(
                self.session.cumulative_elapsed_ms,
                self.session.accuracy_sum,
                self.session.rounds_completed,
                self.results.clone(),
            );
            crate::log(&format!(
                "Session finished: {} ms total, {:.2}% average",
                summary.total_ms, summary.avg_accuracy
            ));
            self.summary = Some(summary.clone());
            self.started_at = None;
            self.phase = GamePhase::RankingReview;
            return Ok(Advance::Finished(summary));
        }

        self.session.round += 1;
        self.start_round(now);
        Ok(Advance::NextRound(self.session.round))
    }

    /// Returns to the start screen from any phase, clearing the session.
    pub fn restart(&mut self) {
        self.phase = GamePhase::Start;
        self.session = SessionState::default();
        self.content = SessionContent::default();
        self.puzzle = None;
        self.started_at = None;
        self.results.clear();
        self.summary = None;
    }

    fn current_puzzle(&self) -> Result<&Puzzle> {
        self.puzzle
            .as_ref()
            .ok_or_else(|| anyhow!("No puzzle generated"))
    }

    /// Generates and renders the puzzle for `session.round`, then starts the timer.
    fn start_round(&mut self, now: Instant) {
        let round = self.session.round;
        let pools = RoundPools {
            mindset: &self.content.mindset,
            digital: &self.content.digital,
            bundle: &self.content.bundle.segments,
        };
        let target = generate_target(round, &pools, &mut self.rng);

        let rng: &mut dyn RngCore = &mut self.rng;
        let image = match self.rasterizer.rasterize(&target.content, rng) {
            Ok(image) => image,
            Err(e) => {
                crate::log(&format!("Round {} render failed, using blank image: {}", round, e));
                RenderedImage::placeholder()
            }
        };

        self.puzzle = Some(Puzzle {
            round,
            kind: target.kind,
            target: target.answer,
            image,
        });
        self.started_at = Some(now);
        self.phase = GamePhase::Playing;
    }
}
