//! Quiz session flow.
//!
//! This module provides:
//! - The Start/Playing/Result/RankingReview state machine
//! - Round results, session totals and feedback levels
//! - Player identity validation and local persistence
//! - A driver tying the machine to the score service and the local store

pub mod driver;
pub mod identity;
pub mod state;
pub mod store;
pub mod summary;

pub use driver::{SessionDriver, SubmitStatus};
pub use identity::PlayerIdentity;
pub use state::{Advance, GamePhase, QuizMachine, SessionContent, SessionState};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use summary::{FeedbackLevel, RoundResult, SessionSummary};
