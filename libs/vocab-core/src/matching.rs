//! Answer matching for typed vocabulary answers.

use crate::types::AnswerOutcome;
use serde::{Deserialize, Serialize};

/// Characters removed from both sides before comparing.
const STRIPPED_PUNCTUATION: &[char] = &[
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`', '~',
    '(', ')',
];

/// Separator between synonyms in an accepted answer.
pub const SYNONYM_SEPARATOR: char = '/';

/// Classification of a typed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Exact,
    Fuzzy,
    Incorrect,
}

impl Verdict {
    pub fn outcome(self) -> AnswerOutcome {
        match self {
            Self::Exact => AnswerOutcome::Exact,
            Self::Fuzzy => AnswerOutcome::Fuzzy,
            Self::Incorrect => AnswerOutcome::Incorrect,
        }
    }
}

/// Result of comparing a typed answer to the accepted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub verdict: Verdict,
    /// Normalized typed answer (for display).
    pub typed_normalized: String,
    /// Synonym that matched, as written in the accepted answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_synonym: Option<String>,
    /// Edit distance to the matched synonym.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<usize>,
}

/// Classify a typed answer against an accepted answer.
pub fn classify(typed: &str, accepted: &str) -> Verdict {
    compare_answer(typed, accepted).verdict
}

/// Compare a typed answer to every synonym of the accepted answer.
///
/// Synonyms are tried in order and the first exact or fuzzy hit wins.
pub fn compare_answer(typed: &str, accepted: &str) -> MatchResult {
    let typed_normalized = normalize(typed);

    for synonym in accepted.split(SYNONYM_SEPARATOR) {
        let candidate = normalize(synonym);
        if candidate.is_empty() {
            continue;
        }

        if typed_normalized == candidate {
            return MatchResult {
                verdict: Verdict::Exact,
                typed_normalized,
                matched_synonym: Some(synonym.trim().to_string()),
                distance: Some(0),
            };
        }

        let distance = levenshtein_distance(&typed_normalized, &candidate);
        if distance > 0 && distance <= tolerance(candidate.chars().count()) {
            return MatchResult {
                verdict: Verdict::Fuzzy,
                typed_normalized,
                matched_synonym: Some(synonym.trim().to_string()),
                distance: Some(distance),
            };
        }
    }

    MatchResult {
        verdict: Verdict::Incorrect,
        typed_normalized,
        matched_synonym: None,
        distance: None,
    }
}

/// Lowercase, trim and strip punctuation.
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .trim()
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect()
}

/// Typos allowed for a candidate of the given length.
pub fn tolerance(candidate_len: usize) -> usize {
    match candidate_len {
        0..=3 => 0,
        4..=6 => 1,
        _ => 2,
    }
}

/// Calculate Levenshtein distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rows instead of the full matrix
    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);

            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
