//! Target generation for each round.
//!
//! Rounds 1-3 draw one whole sentence from a pool. Round 4 builds a
//! multiplication with an added or subtracted term. Round 5 draws the number
//! of glyphs to count.

use rand::seq::IndexedRandom;
use rand::Rng;

use super::PuzzleKind;
use crate::content::bundle::fallback_segments;

/// Inclusive range of the two factors in the arithmetic round.
const FACTOR_RANGE: std::ops::RangeInclusive<i64> = 100..=999;

/// Inclusive range of the added/subtracted term.
const TERM_RANGE: std::ops::RangeInclusive<i64> = 0..=999;

/// Inclusive range of glyphs in the counting round.
pub const COUNT_RANGE: std::ops::RangeInclusive<u32> = 30..=50;

/// What the renderer has to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PuzzleContent {
    /// Paragraph text on the manuscript background
    Paragraph(String),
    /// Arithmetic expression on a white background
    Expression(String),
    /// Number of glyphs to scatter
    Count(u32),
}

/// A generated round: the graded answer plus what to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub kind: PuzzleKind,
    pub answer: String,
    pub content: PuzzleContent,
}

/// Sentence pools available to the text rounds.
#[derive(Debug, Clone, Copy)]
pub struct RoundPools<'a> {
    /// Round 1
    pub mindset: &'a [String],
    /// Round 2
    pub digital: &'a [String],
    /// Round 3, the rotated bundle
    pub bundle: &'a [String],
}

impl<'a> RoundPools<'a> {
    /// Pool for a text round. Empty fixed pools fall back to the bundle.
    fn for_round(&self, round: u8) -> &'a [String] {
        match round {
            1 if !self.mindset.is_empty() => self.mindset,
            2 if !self.digital.is_empty() => self.digital,
            _ => self.bundle,
        }
    }
}

/// Draws one whole entry from the pool, trimmed.
///
/// Blank entries are never drawn. If the pool has no usable entry the
/// built-in fallback sentences are used instead, so the result is never empty.
pub fn pick_sentence<R: Rng + ?Sized>(pool: &[String], rng: &mut R) -> String {
    let usable: Vec<&str> = pool
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    if let Some(sentence) = usable.choose(rng) {
        return sentence.to_string();
    }

    crate::log("Sentence pool has no usable entries, using fallback sentences");
    let fallback = fallback_segments();
    fallback
        .choose(rng)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Operator joining the product and the term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Plus,
    Minus,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Operator::Plus => '+',
            Operator::Minus => '-',
        }
    }
}

/// `a × b op c` with its non-negative result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArithmeticProblem {
    pub a: i64,
    pub b: i64,
    pub c: i64,
    pub op: Operator,
    pub result: i64,
}

impl ArithmeticProblem {
    fn evaluate(a: i64, b: i64, c: i64, op: Operator) -> i64 {
        match op {
            Operator::Plus => a * b + c,
            Operator::Minus => a * b - c,
        }
    }

    /// Text drawn on the puzzle image.
    pub fn expression(&self) -> String {
        format!("{} × {} {} {}", self.a, self.b, self.op.symbol(), self.c)
    }
}

/// Draws an arithmetic problem, redrawing the whole tuple while the result is negative.
pub fn generate_arithmetic<R: Rng + ?Sized>(rng: &mut R) -> ArithmeticProblem {
    loop {
        let a = rng.random_range(FACTOR_RANGE);
        let b = rng.random_range(FACTOR_RANGE);
        let c = rng.random_range(TERM_RANGE);
        let op = if rng.random_bool(0.5) {
            Operator::Plus
        } else {
            Operator::Minus
        };

        let result = ArithmeticProblem::evaluate(a, b, c, op);
        if result < 0 {
            continue;
        }
        return ArithmeticProblem { a, b, c, op, result };
    }
}

/// Draws the number of glyphs for the counting round.
pub fn generate_count<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.random_range(COUNT_RANGE)
}

/// Generates the target for a 1-based round.
///
/// Rounds outside 1..=5 produce a text puzzle from the bundle pool.
pub fn generate_target<R: Rng + ?Sized>(round: u8, pools: &RoundPools<'_>, rng: &mut R) -> Target {
    match PuzzleKind::for_round(round) {
        PuzzleKind::Arithmetic => {
            let problem = generate_arithmetic(rng);
            Target {
                kind: PuzzleKind::Arithmetic,
                answer: problem.result.to_string(),
                content: PuzzleContent::Expression(problem.expression()),
            }
        }
        PuzzleKind::DotCount => {
            let count = generate_count(rng);
            Target {
                kind: PuzzleKind::DotCount,
                answer: count.to_string(),
                content: PuzzleContent::Count(count),
            }
        }
        PuzzleKind::Text => {
            let sentence = pick_sentence(pools.for_round(round), rng);
            Target {
                kind: PuzzleKind::Text,
                answer: sentence.clone(),
                content: PuzzleContent::Paragraph(sentence),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_arithmetic_result_never_negative() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let p = generate_arithmetic(&mut rng);
            assert!(p.result >= 0);
            assert!(FACTOR_RANGE.contains(&p.a));
            assert!(FACTOR_RANGE.contains(&p.b));
            assert!(TERM_RANGE.contains(&p.c));
            assert_eq!(p.result, ArithmeticProblem::evaluate(p.a, p.b, p.c, p.op));
        }
    }

    #[test]
    fn test_expression_format() {
        let p = ArithmeticProblem {
            a: 123,
            b: 456,
            c: 78,
            op: Operator::Minus,
            result: 123 * 456 - 78,
        };
        assert_eq!(p.expression(), "123 × 456 - 78");
    }

    #[test]
    fn test_count_in_range() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..500 {
            assert!(COUNT_RANGE.contains(&generate_count(&mut rng)));
        }
    }

    #[test]
    fn test_pick_sentence_trims_whole_entry() {
        let mut rng = StdRng::seed_from_u64(0);
        let pool = strings(&["  한 문장 전체입니다.  \n"]);
        assert_eq!(pick_sentence(&pool, &mut rng), "한 문장 전체입니다.");
    }

    #[test]
    fn test_pick_sentence_skips_blank_and_falls_back() {
        let mut rng = StdRng::seed_from_u64(0);
        let blank = strings(&["   ", ""]);
        let sentence = pick_sentence(&blank, &mut rng);
        assert!(fallback_segments().contains(&sentence));
        assert!(!pick_sentence(&[], &mut rng).is_empty());
    }

    #[test]
    fn test_round_pools() {
        let mut rng = StdRng::seed_from_u64(4);
        let mindset = strings(&["마음가짐"]);
        let digital = strings(&["디지털"]);
        let bundle = strings(&["소설"]);
        let pools = RoundPools {
            mindset: &mindset,
            digital: &digital,
            bundle: &bundle,
        };

        assert_eq!(generate_target(1, &pools, &mut rng).answer, "마음가짐");
        assert_eq!(generate_target(2, &pools, &mut rng).answer, "디지털");
        assert_eq!(generate_target(3, &pools, &mut rng).answer, "소설");
        assert_eq!(generate_target(7, &pools, &mut rng).answer, "소설");
    }

    #[test]
    fn test_empty_fixed_pool_uses_bundle() {
        let mut rng = StdRng::seed_from_u64(4);
        let bundle = strings(&["소설"]);
        let pools = RoundPools {
            mindset: &[],
            digital: &[],
            bundle: &bundle,
        };
        assert_eq!(generate_target(1, &pools, &mut rng).answer, "소설");
    }

    #[test]
    fn test_numeric_targets() {
        let mut rng = StdRng::seed_from_u64(8);
        let pools = RoundPools {
            mindset: &[],
            digital: &[],
            bundle: &[],
        };

        let arithmetic = generate_target(4, &pools, &mut rng);
        assert_eq!(arithmetic.kind, PuzzleKind::Arithmetic);
        assert!(arithmetic.answer.parse::<u64>().is_ok());
        assert!(matches!(arithmetic.content, PuzzleContent::Expression(_)));

        let count = generate_target(5, &pools, &mut rng);
        assert_eq!(count.kind, PuzzleKind::DotCount);
        match count.content {
            PuzzleContent::Count(n) => assert_eq!(count.answer, n.to_string()),
            other => panic!("unexpected content {:?}", other),
        }
    }
}
