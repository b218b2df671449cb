pub const SUGGESTION_THRESHOLD: f64 = 0.6;
pub const MAX_SUGGESTIONS: usize = 3;

// Normalized to [0, 1]: 1.0 for identical strings, 0.0 for fully disjoint.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.chars().collect::<Vec<_>>();
    let b = b.chars().collect::<Vec<_>>();

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }

    let distance = edit_distance(&a, &b);
    1.0 - distance as f64 / a.len().max(b.len()) as f64
}

fn edit_distance(a: &[char], b: &[char]) -> usize {
    let mut previous = (0..=b.len()).collect::<Vec<usize>>();
    let mut current = vec![0usize; b.len() + 1];

    for (row, &a_char) in a.iter().enumerate() {
        current[0] = row + 1;
        for (column, &b_char) in b.iter().enumerate() {
            let substitution = previous[column] + usize::from(a_char != b_char);
            let insertion = current[column] + 1;
            let deletion = previous[column + 1] + 1;
            current[column + 1] = substitution.min(insertion).min(deletion);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

// Candidates scoring at or above the threshold, most similar first, ties
// broken lexicographically, capped at MAX_SUGGESTIONS.
pub fn suggest<'a>(key: &str, candidates: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    let mut scored = candidates
        .into_iter()
        .map(|candidate| (similarity(key, candidate), candidate))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect::<Vec<_>>();

    scored.sort_by(|(score_a, key_a), (score_b, key_b)| {
        score_b.total_cmp(score_a).then_with(|| key_a.cmp(key_b))
    });
    scored.truncate(MAX_SUGGESTIONS);
    scored.into_iter().map(|(_, key)| key.clone()).collect()
}

#[cfg(test)]
mod similarity_tests {
    use super::*;

    fn keys(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn identical_and_empty_strings_score_one() {
        assert_eq!(similarity("Oda", "Oda"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert_eq!(similarity("", "abc"), 0.0);
    }

    #[test]
    fn single_edit_scores_proportionally_to_length() {
        assert!((similarity("Hero", "Hera") - 0.75).abs() < 1e-9);
        assert!((similarity("KiyosuCastle", "KiyosuCastl") - 11.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn edit_distance_counts_multibyte_characters_as_single_edits() {
        assert_eq!(edit_distance(&['織', '田'], &['織', '井']), 1);
        assert!((similarity("織田信長", "織田信秀") - 0.75).abs() < 1e-9);
    }

    #[test]
    fn suggest_filters_below_threshold() {
        let candidates = keys(&["Oda", "Takeda", "completely_different"]);
        let suggestions = suggest("Odda", &candidates);
        assert_eq!(suggestions, vec!["Oda".to_string()]);
    }

    #[test]
    fn suggest_caps_at_three_and_orders_most_similar_first() {
        let candidates = keys(&["Hero1", "Hero2", "Hero3", "Hero45", "Hero"]);
        let suggestions = suggest("Hero4", &candidates);
        assert_eq!(suggestions.len(), MAX_SUGGESTIONS);
        assert_eq!(suggestions[0], "Hero45");
        // Remaining candidates all score 0.8; lexicographic tie-break.
        assert_eq!(&suggestions[1..], &["Hero".to_string(), "Hero1".to_string()]);
    }

    #[test]
    fn suggest_returns_empty_for_no_close_matches() {
        let candidates = keys(&["Azuchi", "Kiyosu"]);
        assert!(suggest("Nagashino", &candidates).is_empty());
    }
}
