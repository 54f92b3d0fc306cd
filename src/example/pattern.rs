// Pattern-driven string generation
//
// Produces a string matching a `pattern` keyword. The generator is seeded with
// a constant so the same pattern always yields the same example.

use rand::{rngs::StdRng, Rng, SeedableRng};
use regex_syntax::hir::{Hir, HirKind};
use regex_syntax::ParserBuilder;

use crate::internal::error::{Error, Result};

/// Seed used unless configured otherwise.
pub const DEFAULT_PATTERN_SEED: u64 = 1589525091;

/// Total repetitions allowed for `*`, `+` and `{n,}` (never fewer than `n`).
pub const DEFAULT_REPEAT_LIMIT: u32 = 3;

/// Deterministic string generator for regular expressions.
#[derive(Debug, Clone, Copy)]
pub struct PatternGenerator {
    seed: u64,
    repeat_limit: u32,
}

impl Default for PatternGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN_SEED, DEFAULT_REPEAT_LIMIT)
    }
}

impl PatternGenerator {
    pub fn new(seed: u64, repeat_limit: u32) -> Self {
        Self { seed, repeat_limit }
    }

    /// Generates one string matching `pattern`.
    pub fn generate(&self, pattern: &str) -> Result<String> {
        let pattern_error = |reason: String| Error::PatternError {
            pattern: pattern.to_string(),
            reason,
        };

        let hir = ParserBuilder::new()
            .build()
            .parse(pattern)
            .map_err(|e| pattern_error(e.to_string()))?;
        let hir = bounded(hir, self.repeat_limit);

        // Every repetition is bounded by now, so no extra repeats are added
        let regex =
            rand_regex::Regex::with_hir(hir, 0).map_err(|e| pattern_error(e.to_string()))?;

        // Fresh generator per pattern: output must not depend on traversal order
        let mut rng = StdRng::seed_from_u64(self.seed);
        let bytes: Vec<u8> = rng.sample(&regex);
        String::from_utf8(bytes)
            .map_err(|e| pattern_error(format!("generated text is not UTF-8: {}", e)))
    }
}

/// Drops anchors and word boundaries and caps unbounded repetitions.
///
/// Sampling only needs a string the pattern matches; a sampled string is
/// always matched as a whole, so look-around assertions carry no information.
fn bounded(hir: Hir, limit: u32) -> Hir {
    match hir.into_kind() {
        HirKind::Empty | HirKind::Look(_) => Hir::empty(),
        HirKind::Literal(literal) => Hir::literal(literal.0),
        HirKind::Class(class) => Hir::class(class),
        HirKind::Repetition(mut repetition) => {
            if repetition.max.is_none() {
                repetition.max = Some(repetition.min.max(limit));
            }
            repetition.sub = Box::new(bounded(*repetition.sub, limit));
            Hir::repetition(repetition)
        }
        HirKind::Capture(mut capture) => {
            capture.sub = Box::new(bounded(*capture.sub, limit));
            Hir::capture(capture)
        }
        HirKind::Concat(parts) => {
            Hir::concat(parts.into_iter().map(|part| bounded(part, limit)).collect())
        }
        HirKind::Alternation(branches) => Hir::alternation(
            branches
                .into_iter()
                .map(|branch| bounded(branch, limit))
                .collect(),
        ),
    }
}
