//! Tokenizer and normalizer
//!
//! Tokens are split on a literal single space: no trimming and no collapsing,
//! so `"a  b"` yields `["a", "", "b"]`. Normalization strips ASCII
//! punctuation and lowercases what remains.

/// Split text into tokens on every single space
pub fn split_tokens(text: &str) -> Vec<&str> {
    text.split(' ').collect()
}

/// Normalize a token for comparison: drop ASCII punctuation, lowercase the rest
pub fn normalize(word: &str) -> String {
    word.chars()
        .filter(|c| !c.is_ascii_punctuation())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalize every token of a sequence, keeping positions
pub fn normalize_all(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|token| normalize(token)).collect()
}
