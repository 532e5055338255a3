//! Text content for the transcription rounds.
//!
//! This module provides:
//! - The bundle catalog and JSON bundle parsing
//! - Loading of bundles from the content directory with fallbacks
//! - The sticky 10-play bundle rotation for round 3

pub mod bundle;
pub mod library;
pub mod rotation;

pub use bundle::{bundle_ids, find_bundle, ContentBundle, DEFAULT_BUNDLE_ID, TEXT_BUNDLES};
pub use library::{BaselinePools, ContentLibrary};
pub use rotation::{select_bundle, BundleRotation, BundleSelection};
