//! Fuzzy token matching
//!
//! Two normalized tokens are "the same word" when they are equal, when one
//! contains the other with little length drift, or when a single substitution
//! or deletion in the query token makes either of those true.
//! Lengths and positions count `char`s, not bytes.

use super::tokenizer::normalize_all;

/// Candidates must be longer than this for containment to count
const MIN_CONTAINMENT_LEN: usize = 4;

/// Containment only counts while the lengths differ by less than this
const MAX_LENGTH_DRIFT: usize = 3;

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Direct match of two normalized tokens: equality or bounded containment.
/// An empty token never matches, not even another empty one.
pub fn matches(candidate: &str, query: &str) -> bool {
    if candidate.is_empty() || query.is_empty() {
        return false;
    }
    if candidate == query {
        return true;
    }

    let candidate_len = candidate.chars().count();
    let query_len = query.chars().count();
    if candidate_len <= MIN_CONTAINMENT_LEN || candidate_len.abs_diff(query_len) >= MAX_LENGTH_DRIFT {
        return false;
    }

    candidate.contains(query) || query.contains(candidate)
}

/// Try every single-position mutation of `query` against `candidate`.
///
/// At each index the character is replaced by each of `a..=z`, then deleted,
/// so the worst case is `27 * len(query)` calls to [`matches`].
pub fn matches_with_mutation(candidate: &str, query: &str) -> bool {
    if candidate.is_empty() {
        return false;
    }

    let chars: Vec<char> = query.chars().collect();
    (0..chars.len()).any(|index| mutations_at(&chars, index).any(|mutated| matches(candidate, &mutated)))
}

/// The 27 variants of `chars` with position `index` substituted or removed
fn mutations_at(chars: &[char], index: usize) -> impl Iterator<Item = String> + '_ {
    let (head, tail) = (&chars[..index], &chars[index + 1..]);
    ALPHABET
        .chars()
        .map(Some)
        .chain(std::iter::once(None))
        .map(move |replacement| {
            let mut mutated = String::with_capacity(chars.len() + 1);
            mutated.extend(head);
            if let Some(c) = replacement {
                mutated.push(c);
            }
            mutated.extend(tail);
            mutated
        })
}

/// Whether a document token covers a query token, mutation tried last
pub fn token_matches(candidate: &str, query: &str) -> bool {
    matches(candidate, query) || matches_with_mutation(candidate, query)
}

/// Positional match of two equal-length, already normalized sequences.
/// Every position has to match.
pub fn window_matches<C, Q>(window: &[C], query: &[Q]) -> bool
where
    C: AsRef<str>,
    Q: AsRef<str>,
{
    debug_assert_eq!(window.len(), query.len());
    window
        .iter()
        .zip(query)
        .all(|(candidate, query)| token_matches(candidate.as_ref(), query.as_ref()))
}

/// Normalize both raw sequences pairwise and compare them as a window
pub fn check_words(window: &[&str], query: &[&str]) -> bool {
    window_matches(&normalize_all(window), &normalize_all(query))
}
