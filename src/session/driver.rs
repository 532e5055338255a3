//! Session driver.
//!
//! Couples the quiz machine with the score service and the local store. Network
//! calls run on worker threads; `poll` applies whatever has finished. The GUI
//! owns one driver and calls `poll` every frame.

use anyhow::{anyhow, Result};
use rand::Rng;
use std::time::Instant;

use super::state::{Advance, GamePhase, QuizMachine, SessionContent};
use super::store::{load_rotation, save_identity, save_rotation, KeyValueStore};
use super::summary::RoundResult;
use super::PlayerIdentity;
use crate::api::worker::{request_play_count, request_ranking, request_submit};
use crate::api::{PendingRequest, RankingBoard, RequestState, SharedService, SubmitPayload};
use crate::content::library::BASELINE_LOAD_ERROR;
use crate::content::{bundle_ids, select_bundle, BaselinePools, ContentLibrary, DEFAULT_BUNDLE_ID};
use crate::log;
use crate::puzzle::Puzzle;

/// Resolves the round-3 bundle for play `next_play` and assembles the session pools.
///
/// The rotation is persisted only when a slot was assigned. The default bundle
/// comes from the preloaded baseline; any other bundle is read from disk.
pub fn prepare_content<R: Rng + ?Sized>(
    store: &mut dyn KeyValueStore,
    library: &ContentLibrary,
    baseline: &BaselinePools,
    next_play: u32,
    rng: &mut R,
) -> SessionContent {
    let rotation = load_rotation(store);
    let ids = bundle_ids();
    let selection = select_bundle(next_play, &rotation, &ids, rng);

    if selection.changed {
        if let Err(e) = save_rotation(store, &selection.rotation) {
            log(&format!("Failed to save bundle rotation: {}", e));
        }
    }

    let bundle = if selection.bundle_id == DEFAULT_BUNDLE_ID {
        baseline.default_bundle.clone()
    } else {
        library.load_bundle(&selection.bundle_id)
    };

    SessionContent {
        mindset: baseline.mindset.clone(),
        digital: baseline.digital.clone(),
        bundle,
    }
}

/// Persists the identity, logging instead of failing.
pub fn remember_identity(store: &mut dyn KeyValueStore, identity: &PlayerIdentity) {
    if let Err(e) = save_identity(store, identity) {
        log(&format!("Failed to save player identity: {}", e));
    }
}

/// Outcome of the automatic session submission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    #[default]
    NotSent,
    Sending,
    Accepted,
    Failed,
}

impl SubmitStatus {
    pub fn status_text(&self) -> &'static str {
        match self {
            Self::NotSent => "",
            Self::Sending => "기록 전송 중...",
            Self::Accepted => "기록이 등록되었습니다.",
            Self::Failed => "기록 전송에 실패했습니다.",
        }
    }
}

/// Runs sessions against a score service and a local store.
pub struct SessionDriver<K: KeyValueStore> {
    machine: QuizMachine,
    service: SharedService,
    store: K,
    library: ContentLibrary,
    baseline: Option<BaselinePools>,
    pending_play_count: Option<(PendingRequest<u32>, PlayerIdentity)>,
    pending_submit: Option<PendingRequest<bool>>,
    pending_ranking: Option<PendingRequest<RankingBoard>>,
    ranking: Option<RankingBoard>,
    ranking_panel_open: bool,
    submit_status: SubmitStatus,
}

impl<K: KeyValueStore> SessionDriver<K> {
    /// `baseline` is `None` when the default bundle failed to load; starting is
    /// then refused.
    pub fn new(
        machine: QuizMachine,
        service: SharedService,
        store: K,
        library: ContentLibrary,
        baseline: Option<BaselinePools>,
    ) -> Self {
        Self {
            machine,
            service,
            store,
            library,
            baseline,
            pending_play_count: None,
            pending_submit: None,
            pending_ranking: None,
            ranking: None,
            ranking_panel_open: false,
            submit_status: SubmitStatus::NotSent,
        }
    }

    pub fn machine(&self) -> &QuizMachine {
        &self.machine
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    /// Board for the visible ranking view, once loaded.
    pub fn ranking(&self) -> Option<&RankingBoard> {
        self.ranking.as_ref()
    }

    pub fn submit_status(&self) -> SubmitStatus {
        self.submit_status
    }

    /// Waiting for the play count before round 1.
    pub fn is_starting(&self) -> bool {
        self.pending_play_count.is_some()
    }

    pub fn ranking_panel_open(&self) -> bool {
        self.ranking_panel_open
    }

    pub fn has_pending_requests(&self) -> bool {
        self.pending_play_count.is_some()
            || self.pending_submit.is_some()
            || self.pending_ranking.is_some()
    }

    /// Validates and saves the identity, then asks the proxy for the play count.
    /// Round 1 starts from `poll` once the count arrives.
    pub fn request_start(&mut self, identity: PlayerIdentity) -> Result<()> {
        self.machine.expect_phase(GamePhase::Start, "start")?;
        if self.is_starting() {
            return Err(anyhow!("Session start already in progress"));
        }
        if self.baseline.is_none() {
            return Err(anyhow!(BASELINE_LOAD_ERROR));
        }
        identity.validate()?;

        remember_identity(&mut self.store, &identity);
        self.close_ranking_panel();
        let pending = request_play_count(&self.service, &identity.company, &identity.employee_id);
        self.pending_play_count = Some((pending, identity));
        Ok(())
    }

    /// Picks the round-3 bundle for play `completed_plays + 1` and starts round 1.
    pub fn begin_session(
        &mut self,
        identity: PlayerIdentity,
        completed_plays: u32,
        now: Instant,
    ) -> Result<&Puzzle> {
        self.machine.expect_phase(GamePhase::Start, "begin")?;
        identity.validate()?;
        let baseline = self
            .baseline
            .as_ref()
            .ok_or_else(|| anyhow!(BASELINE_LOAD_ERROR))?;

        let content = prepare_content(
            &mut self.store,
            &self.library,
            baseline,
            completed_plays.saturating_add(1),
            self.machine.rng_mut(),
        );
        self.machine.begin(identity, completed_plays, content, now)
    }

    pub fn submit(&mut self, raw: &str, now: Instant) -> Result<RoundResult> {
        self.machine.submit(raw, now)
    }

    /// Moves past the round result. After the last round the session is posted;
    /// the ranking is fetched once the post has finished.
    pub fn advance(&mut self, now: Instant) -> Result<Advance> {
        let advance = self.machine.advance(now)?;
        if let Advance::Finished(summary) = &advance {
            let payload = SubmitPayload::new(self.machine.identity(), summary);
            self.pending_submit = Some(request_submit(&self.service, payload));
            self.pending_ranking = None;
            self.ranking = None;
            self.submit_status = SubmitStatus::Sending;
        }
        Ok(advance)
    }

    /// Back to the start screen. A ranking still loading for the old session
    /// is dropped.
    pub fn restart(&mut self) {
        self.machine.restart();
        self.pending_ranking = None;
        self.ranking = None;
        self.ranking_panel_open = false;
        self.submit_status = SubmitStatus::NotSent;
    }

    /// Opens the ranking board from the start screen, fetching a fresh copy.
    pub fn open_ranking_panel(&mut self) -> Result<()> {
        self.machine.expect_phase(GamePhase::Start, "open the ranking")?;
        self.ranking_panel_open = true;
        self.ranking = None;
        self.pending_ranking = Some(request_ranking(&self.service));
        Ok(())
    }

    pub fn close_ranking_panel(&mut self) {
        if self.ranking_panel_open {
            self.ranking_panel_open = false;
            self.pending_ranking = None;
            self.ranking = None;
        }
    }

    fn ranking_visible(&self) -> bool {
        self.ranking_panel_open || self.machine.phase() == GamePhase::RankingReview
    }

    /// Applies finished requests. Fails only when round 1 could not start.
    pub fn poll(&mut self, now: Instant) -> Result<()> {
        let mut started = Ok(());

        if let Some((pending, _)) = &self.pending_play_count {
            let count = match pending.poll() {
                RequestState::Waiting => None,
                RequestState::Done(count) => Some(count),
                RequestState::Lost => Some(0),
            };
            if let Some(count) = count {
                if let Some((_, identity)) = self.pending_play_count.take() {
                    started = self.begin_session(identity, count, now).map(|_| ());
                    if let Err(e) = &started {
                        log(&format!("Failed to start session: {}", e));
                    }
                }
            }
        }

        if let Some(pending) = &self.pending_submit {
            let accepted = match pending.poll() {
                RequestState::Waiting => None,
                RequestState::Done(accepted) => Some(accepted),
                RequestState::Lost => Some(false),
            };
            if let Some(accepted) = accepted {
                self.pending_submit = None;
                if self.machine.phase() == GamePhase::RankingReview {
                    self.submit_status = if accepted {
                        SubmitStatus::Accepted
                    } else {
                        SubmitStatus::Failed
                    };
                    self.pending_ranking = Some(request_ranking(&self.service));
                } else {
                    log("Session post finished after restart, skipping ranking");
                }
            }
        }

        if let Some(pending) = &self.pending_ranking {
            let board = match pending.poll() {
                RequestState::Waiting => None,
                RequestState::Done(board) => Some(board),
                RequestState::Lost => Some(RankingBoard::failed(
                    crate::api::client::RANKING_NETWORK_ERROR,
                )),
            };
            if let Some(board) = board {
                self.pending_ranking = None;
                if self.ranking_visible() {
                    self.ranking = Some(board);
                } else {
                    log("Dropping ranking result for a closed view");
                }
            }
        }

        started
    }
}
