// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

use proptest::prelude::*;
use serenity_core::chat::ChatReply;
use serenity_core::inference::{has_match, DEFAULT_MOODS, MAX_SUGGESTIONS, RULES};
use serenity_core::{infer, Mood};

fn table_index(mood: Mood) -> usize {
    RULES.iter().position(|r| r.mood == mood).unwrap_or(usize::MAX)
}

proptest! {
    #[test]
    fn infer_is_idempotent(text in ".{0,120}") {
        prop_assert_eq!(infer(&text), infer(&text));
    }

    #[test]
    fn infer_never_empty_and_at_most_two(text in ".{0,120}") {
        let moods = infer(&text);
        prop_assert!(!moods.is_empty());
        prop_assert!(moods.len() <= MAX_SUGGESTIONS);
    }

    #[test]
    fn matches_follow_table_order_without_duplicates(text in "[a-z ]{0,80}") {
        let moods = infer(&text);
        if has_match(&text) {
            let idx: Vec<usize> = moods.iter().map(|m| table_index(*m)).collect();
            prop_assert!(idx.windows(2).all(|w| w[0] < w[1]));
        } else {
            prop_assert_eq!(moods, DEFAULT_MOODS.to_vec());
        }
    }

    #[test]
    fn case_does_not_matter(text in "[a-zA-Z ]{0,80}") {
        prop_assert_eq!(infer(&text.to_uppercase()), infer(&text.to_lowercase()));
    }

    #[test]
    fn keyword_anywhere_is_found(prefix in "[0-9 ]{0,20}", suffix in "[0-9 ]{0,20}", rule in 0usize..8) {
        let keyword = RULES[rule].keywords[0];
        let text = format!("{prefix}{keyword}{suffix}");
        prop_assert_eq!(infer(&text)[0], RULES[rule].mood);
    }

    #[test]
    fn offline_reply_matches_inference(text in ".{0,60}") {
        let reply = ChatReply::offline(&text);
        prop_assert_eq!(reply.moods(), infer(&text));
    }
}
