//! Ranking proxy access.
//!
//! This module provides:
//! - JSON wire types for play count, ranking and submission
//! - The `ScoreService` trait and its blocking HTTP implementation
//! - Worker threads that run requests off the UI thread

pub mod client;
pub mod types;
pub mod worker;

pub use client::{HttpScoreService, RankingBoard, ScoreService};
pub use types::{RankingEntry, SubmitPayload};
pub use worker::{PendingRequest, RequestState, SharedService};
