//! Fuzzy dish-name matching
//!
//! Scores candidate names on a 0-100 scale; the session accepts a match at
//! or above its configured threshold.

/// Scores a queried dish name against the recipe corpus
pub trait RecipeMatcher: Send + Sync {
    /// Best-scoring candidate and its score, or None if there are no candidates
    fn best_match(&self, query: &str, candidates: &[String]) -> Option<(String, u8)>;
}

/// Token-sort edit-distance matcher
///
/// Word order and case are normalized away before scoring, so
/// "soup tomato" and "Tomato Soup" score 100.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenSortMatcher;

impl RecipeMatcher for TokenSortMatcher {
    fn best_match(&self, query: &str, candidates: &[String]) -> Option<(String, u8)> {
        candidates
            .iter()
            .map(|candidate| (candidate.clone(), similarity(query, candidate)))
            .max_by_key(|(_, score)| *score)
    }
}

/// Similarity ratio in `[0, 100]` after token-sort normalization
fn similarity(a: &str, b: &str) -> u8 {
    let a = normalize(a);
    let b = normalize(b);

    let len = a.chars().count().max(b.chars().count());
    if len == 0 {
        return 100;
    }

    let distance = edit_distance(&a, &b);
    u8::try_from((len.saturating_sub(distance)) * 100 / len).unwrap_or(0)
}

/// Lowercase, split into words, sort, rejoin
fn normalize(s: &str) -> String {
    let lowered = s.to_lowercase();
    let mut words: Vec<&str> = lowered.split_whitespace().collect();
    words.sort_unstable();
    words.join(" ")
}

/// Levenshtein distance over chars, two-row DP
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
