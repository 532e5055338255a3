//! Round results, session totals and result-screen feedback.

use serde::Serialize;

use crate::puzzle::PuzzleKind;

/// Outcome of one submitted round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    pub round: u8,
    pub kind: PuzzleKind,
    pub elapsed_ms: u64,
    pub accuracy: u8,
}

/// Totals of a finished session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub total_ms: u64,
    /// Mean accuracy over completed rounds, unrounded
    pub avg_accuracy: f64,
    pub rounds: u8,
    pub results: Vec<RoundResult>,
}

impl SessionSummary {
    pub fn new(total_ms: u64, accuracy_sum: u32, rounds: u8, results: Vec<RoundResult>) -> Self {
        let avg_accuracy = if rounds > 0 {
            accuracy_sum as f64 / rounds as f64
        } else {
            0.0
        };
        Self {
            total_ms,
            avg_accuracy,
            rounds,
            results,
        }
    }

    /// Total time in seconds, two decimals.
    pub fn time_taken_secs(&self) -> f64 {
        round2(self.total_ms as f64 / 1000.0)
    }

    /// Mean accuracy, two decimals.
    pub fn accuracy_percent(&self) -> f64 {
        round2(self.avg_accuracy)
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Milliseconds as `"12.34"` seconds.
pub fn format_seconds(ms: u64) -> String {
    format!("{:.2}", ms as f64 / 1000.0)
}

/// Color band of a time or accuracy figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackLevel {
    Good,
    Ok,
    Bad,
}

impl std::fmt::Display for FeedbackLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedbackLevel::Good => write!(f, "good"),
            FeedbackLevel::Ok => write!(f, "ok"),
            FeedbackLevel::Bad => write!(f, "bad"),
        }
    }
}

const GOOD_SECS_PER_ROUND: f64 = 10.0;
const OK_SECS_PER_ROUND: f64 = 20.0;

fn time_level(ms: u64, rounds: u8) -> FeedbackLevel {
    let secs = ms as f64 / 1000.0;
    let rounds = rounds as f64;
    if secs <= GOOD_SECS_PER_ROUND * rounds {
        FeedbackLevel::Good
    } else if secs <= OK_SECS_PER_ROUND * rounds {
        FeedbackLevel::Ok
    } else {
        FeedbackLevel::Bad
    }
}

/// Level of a single round's time.
pub fn round_time_level(elapsed_ms: u64) -> FeedbackLevel {
    time_level(elapsed_ms, 1)
}

/// Level of the running total after `round` rounds.
pub fn cumulative_time_level(total_ms: u64, round: u8) -> FeedbackLevel {
    time_level(total_ms, round)
}

pub fn accuracy_level(accuracy: u8) -> FeedbackLevel {
    match accuracy {
        100.. => FeedbackLevel::Good,
        80..=99 => FeedbackLevel::Ok,
        _ => FeedbackLevel::Bad,
    }
}

/// Highlight for a round finished within 20 s at 80% or better.
pub fn is_fast_and_accurate(elapsed_ms: u64, accuracy: u8) -> bool {
    elapsed_ms > 0 && elapsed_ms <= 20_000 && accuracy >= 80
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(round: u8, elapsed_ms: u64, accuracy: u8) -> RoundResult {
        RoundResult {
            round,
            kind: PuzzleKind::for_round(round),
            elapsed_ms,
            accuracy,
        }
    }

    #[test]
    fn test_session_average() {
        let results: Vec<RoundResult> = [100, 100, 100, 0, 100]
            .iter()
            .enumerate()
            .map(|(i, &acc)| result(i as u8 + 1, 1000, acc))
            .collect();
        let accuracy_sum = results.iter().map(|r| r.accuracy as u32).sum();
        let summary = SessionSummary::new(5000, accuracy_sum, 5, results);
        assert_eq!(summary.avg_accuracy, 80.0);
        assert_eq!(summary.total_ms, 5000);
        assert_eq!(summary.rounds, 5);
    }

    #[test]
    fn test_empty_session_average_is_zero() {
        assert_eq!(SessionSummary::new(0, 0, 0, Vec::new()).avg_accuracy, 0.0);
    }

    #[test]
    fn test_rounding() {
        let summary = SessionSummary::new(12_346, 287, 3, Vec::new());
        assert_eq!(summary.time_taken_secs(), 12.35);
        assert_eq!(summary.accuracy_percent(), 95.67);
        assert_eq!(format_seconds(12_346), "12.35");
        assert_eq!(format_seconds(0), "0.00");
    }

    #[test]
    fn test_time_levels() {
        assert_eq!(round_time_level(10_000), FeedbackLevel::Good);
        assert_eq!(round_time_level(10_001), FeedbackLevel::Ok);
        assert_eq!(round_time_level(20_000), FeedbackLevel::Ok);
        assert_eq!(round_time_level(20_001), FeedbackLevel::Bad);

        assert_eq!(cumulative_time_level(30_000, 3), FeedbackLevel::Good);
        assert_eq!(cumulative_time_level(45_000, 3), FeedbackLevel::Ok);
        assert_eq!(cumulative_time_level(61_000, 3), FeedbackLevel::Bad);
    }

    #[test]
    fn test_accuracy_levels() {
        assert_eq!(accuracy_level(100), FeedbackLevel::Good);
        assert_eq!(accuracy_level(99), FeedbackLevel::Ok);
        assert_eq!(accuracy_level(80), FeedbackLevel::Ok);
        assert_eq!(accuracy_level(79), FeedbackLevel::Bad);
    }

    #[test]
    fn test_fast_and_accurate() {
        assert!(is_fast_and_accurate(15_000, 80));
        assert!(!is_fast_and_accurate(0, 100));
        assert!(!is_fast_and_accurate(20_001, 100));
        assert!(!is_fast_and_accurate(5_000, 79));
    }
}
