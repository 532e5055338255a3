//! Puzzle targets and grading.
//!
//! This module provides:
//! - Per-round target generation (sentences, arithmetic, glyph counts)
//! - Scoring of submissions against targets

pub mod generator;
pub mod scoring;

pub use generator::{generate_target, PuzzleContent, RoundPools, Target};
pub use scoring::score;

use serde::{Deserialize, Serialize};

use crate::render::RenderedImage;

/// Rounds per session.
pub const ROUND_COUNT: u8 = 5;

/// Grading policy of a puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PuzzleKind {
    /// Transcribe a paragraph, graded by edit distance
    Text,
    /// Solve an expression, graded by exact match
    Arithmetic,
    /// Count glyphs, graded by exact match
    DotCount,
}

impl PuzzleKind {
    /// Grading policy for a 1-based round. Unknown rounds are text rounds.
    pub fn for_round(round: u8) -> Self {
        match round {
            4 => PuzzleKind::Arithmetic,
            5 => PuzzleKind::DotCount,
            _ => PuzzleKind::Text,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, PuzzleKind::Arithmetic | PuzzleKind::DotCount)
    }
}

impl std::fmt::Display for PuzzleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PuzzleKind::Text => write!(f, "text"),
            PuzzleKind::Arithmetic => write!(f, "arithmetic"),
            PuzzleKind::DotCount => write!(f, "dotCount"),
        }
    }
}

/// The active puzzle of a round.
#[derive(Debug, Clone)]
pub struct Puzzle {
    /// Round number (1-based)
    pub round: u8,
    pub kind: PuzzleKind,
    /// Graded answer
    pub target: String,
    /// Rendered puzzle image
    pub image: RenderedImage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_for_round() {
        assert_eq!(PuzzleKind::for_round(1), PuzzleKind::Text);
        assert_eq!(PuzzleKind::for_round(3), PuzzleKind::Text);
        assert_eq!(PuzzleKind::for_round(4), PuzzleKind::Arithmetic);
        assert_eq!(PuzzleKind::for_round(5), PuzzleKind::DotCount);
        assert_eq!(PuzzleKind::for_round(9), PuzzleKind::Text);
    }

    #[test]
    fn test_kind_display_matches_wire_names() {
        assert_eq!(PuzzleKind::DotCount.to_string(), "dotCount");
        assert_eq!(
            serde_json::to_string(&PuzzleKind::DotCount).unwrap(),
            "\"dotCount\""
        );
    }
}
