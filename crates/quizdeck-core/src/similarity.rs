//! String similarity scoring for free-text answers.
//!
//! The grader accepts an answer when it is close enough to the expected
//! text rather than character-identical; these are the primitives it
//! cascades through.

/// Lower-case `s` and strip every character outside `[a-z0-9]`.
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Classic Levenshtein distance: substitution, insertion, and deletion all
/// cost 1. Runs in `O(|a|·|b|)` over the chars of both strings.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// `1 - distance / max(|a|, |b|)`, defined as `1.0` when both strings are
/// empty. Symmetric in its arguments.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - edit_distance(a, b) as f64 / max_len as f64
}

/// Fraction of significant reference tokens found inside the candidate.
///
/// The reference is lower-cased and split on whitespace, keeping tokens
/// longer than 3 characters; the candidate is matched as lower-cased raw
/// text. Returns `0.0` when no qualifying tokens exist.
pub fn keyword_overlap(candidate: &str, reference: &str) -> f64 {
    let candidate = candidate.to_lowercase();
    let reference = reference.to_lowercase();
    let keywords: Vec<&str> = reference
        .split_whitespace()
        .filter(|word| word.len() > 3)
        .collect();
    if keywords.is_empty() {
        return 0.0;
    }
    let hits = keywords
        .iter()
        .filter(|keyword| candidate.contains(**keyword))
        .count();
    hits as f64 / keywords.len() as f64
}
