//! Grading of submissions.
//!
//! Text rounds compare whitespace-free strings by Levenshtein distance.
//! Numeric rounds are all-or-nothing.

use super::PuzzleKind;

/// Removes all whitespace, including line breaks introduced by wrapping or pasting.
pub fn normalize_input(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Edit distance with unit cost insertions, deletions and substitutions.
///
/// Operates on Unicode scalar values so each Hangul syllable counts once.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            curr[j] = if a[i - 1] == b[j - 1] {
                prev[j - 1]
            } else {
                // deletion, insertion, substitution
                (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + 1)
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Parses a numeric answer. Only finite numbers are accepted.
fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Accuracy of a text transcription, 0..=100.
pub fn text_accuracy(target: &str, submission: &str) -> u8 {
    let target = normalize_input(target);
    let submission = normalize_input(submission);
    if target.is_empty() || submission.is_empty() {
        return 0;
    }

    let len = target.chars().count() as f64;
    let distance = levenshtein(&target, &submission) as f64;
    let raw = (len - distance) / len * 100.0;
    raw.max(0.0).round().min(100.0) as u8
}

/// Accuracy of a numeric answer: 100 on exact match, otherwise 0.
pub fn numeric_accuracy(target: &str, submission: &str) -> u8 {
    match (parse_number(target), parse_number(submission)) {
        (Some(expected), Some(actual)) if expected == actual => 100,
        _ => 0,
    }
}

/// Grades a submission for the given puzzle kind. Pure and deterministic.
pub fn score(kind: PuzzleKind, target: &str, submission: &str) -> u8 {
    if kind.is_numeric() {
        numeric_accuracy(target, submission)
    } else {
        text_accuracy(target, submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("가나다", "가나라"), 1);
        assert_eq!(levenshtein("가나다", "가다"), 1);
    }

    #[test]
    fn test_text_cases() {
        assert_eq!(score(PuzzleKind::Text, "가나다", "가나다"), 100);
        assert_eq!(score(PuzzleKind::Text, "가나다", "가나라"), 67);
        assert_eq!(score(PuzzleKind::Text, "가나다", ""), 0);
    }

    #[test]
    fn test_self_score_is_full() {
        let target = "메밀꽃 필 무렵\n달밤의 길";
        assert_eq!(score(PuzzleKind::Text, target, target), 100);
    }

    #[test]
    fn test_whitespace_is_ignored() {
        let target = "작은 자동화가 모여서 퇴근 시간을 앞당깁니다.";
        let compact = "작은자동화가모여서퇴근시간을앞당깁니다.";
        let wrapped = "작은 자동화가\n모여서   퇴근\r\n시간을 앞당깁니다.";
        assert_eq!(score(PuzzleKind::Text, target, compact), 100);
        assert_eq!(score(PuzzleKind::Text, target, wrapped), 100);

        let typo = "작은 자동화가 모여서 퇴근 시간을 앞당김니다.";
        let typo_spaced = "작은자동화가 모여서\n퇴근시간을 앞당김니다.";
        assert_eq!(
            score(PuzzleKind::Text, target, typo),
            score(PuzzleKind::Text, target, typo_spaced)
        );
    }

    #[test]
    fn test_whitespace_only_submission_is_zero() {
        assert_eq!(score(PuzzleKind::Text, "가나다", " \n\t "), 0);
    }

    #[test]
    fn test_empty_target_is_zero() {
        assert_eq!(score(PuzzleKind::Text, "", "가나다"), 0);
        assert_eq!(score(PuzzleKind::Text, "  ", "가나다"), 0);
    }

    #[test]
    fn test_long_garbage_clamps_to_zero() {
        assert_eq!(score(PuzzleKind::Text, "가", "abcdefghij"), 0);
    }

    #[test]
    fn test_numeric_cases() {
        assert_eq!(score(PuzzleKind::Arithmetic, "1000", "1000"), 100);
        assert_eq!(score(PuzzleKind::Arithmetic, "1000", "999"), 0);
        assert_eq!(score(PuzzleKind::Arithmetic, "1000", "abc"), 0);
        assert_eq!(score(PuzzleKind::DotCount, "42", " 42 "), 100);
        assert_eq!(score(PuzzleKind::DotCount, "42", "42.0"), 100);
        assert_eq!(score(PuzzleKind::DotCount, "42", ""), 0);
        assert_eq!(score(PuzzleKind::DotCount, "42", "inf"), 0);
    }
}
