// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Keyword-based mood inference.
//!
//! One fixed rule table, evaluated in order with case-insensitive substring
//! matching. The server chat handler and the offline chat fallback both call
//! [`infer`]; there is no second copy of the table anywhere.

use serde::Serialize;

use crate::mood::Mood;

/// Bumped whenever a keyword or the rule order changes.
pub const RULE_TABLE_VERSION: u32 = 2;

/// Maximum number of moods returned.
pub const MAX_SUGGESTIONS: usize = 2;

/// Returned when no rule matches.
pub const DEFAULT_MOODS: [Mood; 2] = [Mood::Calm, Mood::Chill];

/// Trigger keywords (lowercase) mapped to a mood.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct InferenceRule {
    pub mood: Mood,
    pub keywords: &'static [&'static str],
}

impl InferenceRule {
    /// Whether any keyword occurs in already-lowercased text.
    fn matches(&self, lowercase_text: &str) -> bool {
        self.keywords.iter().any(|k| lowercase_text.contains(k))
    }
}

/// Rule table in priority order.
pub const RULES: [InferenceRule; 8] = [
    InferenceRule { mood: Mood::Tired, keywords: &["tired", "exhausted", "sleep"] },
    InferenceRule { mood: Mood::Stressed, keywords: &["stress", "overwhelm", "pressure"] },
    InferenceRule { mood: Mood::Anxious, keywords: &["anxious", "nervous", "worry", "worried"] },
    InferenceRule { mood: Mood::Happy, keywords: &["happy", "joy", "glad", "excited"] },
    InferenceRule { mood: Mood::Focused, keywords: &["focus", "concentrate", "attention"] },
    InferenceRule { mood: Mood::Chill, keywords: &["relax", "chill", "unwind"] },
    InferenceRule { mood: Mood::Playful, keywords: &["play", "fun", "enjoy", "light"] },
    InferenceRule { mood: Mood::Calm, keywords: &["calm", "peace", "quiet", "tranquil"] },
];

/// Infer up to two moods from free text.
///
/// Matches are returned in table order. Never empty: with no match the
/// result is [`DEFAULT_MOODS`].
pub fn infer(text: &str) -> Vec<Mood> {
    let lowercase = text.to_lowercase();
    let matched: Vec<Mood> = RULES
        .iter()
        .filter(|rule| rule.matches(&lowercase))
        .map(|rule| rule.mood)
        .take(MAX_SUGGESTIONS)
        .collect();

    if matched.is_empty() {
        DEFAULT_MOODS.to_vec()
    } else {
        matched
    }
}

/// Whether `text` hit at least one rule (as opposed to getting the defaults).
pub fn has_match(text: &str) -> bool {
    let lowercase = text.to_lowercase();
    RULES.iter().any(|rule| rule.matches(&lowercase))
}

/// Serializable snapshot of the rule table.
#[derive(Debug, Clone, Serialize)]
pub struct RuleTable {
    pub version: u32,
    pub rules: Vec<InferenceRule>,
    pub defaults: Vec<Mood>,
}

pub fn rule_table() -> RuleTable {
    RuleTable {
        version: RULE_TABLE_VERSION,
        rules: RULES.to_vec(),
        defaults: DEFAULT_MOODS.to_vec(),
    }
}

/// Sentence presented alongside the suggestions, e.g. "Calm or Chill".
pub fn join_moods(moods: &[Mood]) -> String {
    moods.iter().map(|m| m.name()).collect::<Vec<_>>().join(" or ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tired_first() {
        let moods = infer("I feel very tired and exhausted");
        assert_eq!(moods[0], Mood::Tired);
        assert_eq!(moods.len(), 1);
    }

    #[test]
    fn test_no_match_defaults() {
        assert_eq!(infer("just feeling okay"), vec![Mood::Calm, Mood::Chill]);
        assert!(!has_match("just feeling okay"));
    }

    #[test]
    fn test_two_matches_in_table_order() {
        assert_eq!(infer("I'm stressed but also happy"), vec![Mood::Stressed, Mood::Happy]);
        // Order follows the table, not the text.
        assert_eq!(infer("happy yet stressed"), vec![Mood::Stressed, Mood::Happy]);
    }

    #[test]
    fn test_truncated_to_two() {
        let moods = infer("tired, stressed, anxious and I want calm");
        assert_eq!(moods, vec![Mood::Tired, Mood::Stressed]);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(infer("SO MUCH PRESSURE"), vec![Mood::Stressed]);
    }

    #[test]
    fn test_substring_semantics() {
        // "sleepy" contains "sleep", "overwhelmed" contains "overwhelm".
        assert_eq!(infer("sleepy"), vec![Mood::Tired]);
        assert_eq!(infer("overwhelmed"), vec![Mood::Stressed]);
    }

    #[test]
    fn test_empty_text_defaults() {
        assert_eq!(infer(""), DEFAULT_MOODS.to_vec());
    }

    #[test]
    fn test_rule_table_covers_every_mood_once() {
        let mut seen: Vec<Mood> = RULES.iter().map(|r| r.mood).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), Mood::ALL.len());
    }

    #[test]
    fn test_rule_keywords_lowercase() {
        for rule in RULES {
            for k in rule.keywords {
                assert_eq!(*k, k.to_lowercase());
            }
        }
    }

    #[test]
    fn test_join_moods() {
        assert_eq!(join_moods(&[Mood::Calm, Mood::Chill]), "Calm or Chill");
        assert_eq!(join_moods(&[Mood::Tired]), "Tired");
    }

    #[test]
    fn test_rule_table_serializes() {
        let json = serde_json::to_value(rule_table()).unwrap();
        assert_eq!(json["version"], RULE_TABLE_VERSION);
        assert_eq!(json["rules"][0]["mood"], "Tired");
        assert_eq!(json["defaults"][1], "Chill");
    }
}
