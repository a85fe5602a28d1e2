//! Keyword retrieval over the directory.
//!
//! Scores each record by how many question tokens occur as substrings of its
//! searchable text, and falls back to the first listed records when nothing
//! overlaps so that a non-empty directory always yields a source.

use crate::types::{ScoredRecord, ServiceRecord};

/// Maximum number of records returned for one question.
pub const MAX_SOURCES: usize = 2;

/// Score assigned to records returned by the no-overlap fallback.
pub const FALLBACK_SCORE: u32 = 1;

/// Split a question into lowercase whitespace-separated tokens.
pub fn tokenize(question: &str) -> Vec<String> {
    question
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Count the tokens that occur in `haystack`; repeated tokens count each time.
pub fn score(tokens: &[String], haystack: &str) -> u32 {
    tokens
        .iter()
        .filter(|token| haystack.contains(token.as_str()))
        .count() as u32
}

/// Whether `record` is listed under a town matching `filter`.
fn matches_town(record: &ServiceRecord, filter: &str) -> bool {
    record.town.to_lowercase().contains(filter)
}

/// Rank directory records against a question.
///
/// Returns at most [`MAX_SOURCES`] records ordered by descending score, ties
/// kept in directory order. When no record overlaps the question, returns
/// the first town-matching records (or the first records overall without a
/// filter) with [`FALLBACK_SCORE`].
///
/// # Arguments
/// * `records` - The loaded directory
/// * `question` - Free-text question
/// * `town_filter` - Optional town preference; blank counts as none
pub fn retrieve(
    records: &[ServiceRecord],
    question: &str,
    town_filter: Option<&str>,
) -> Vec<ScoredRecord> {
    let tokens = tokenize(question);
    let filter = town_filter
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty());

    let candidates: Vec<&ServiceRecord> = records
        .iter()
        .filter(|r| filter.as_deref().map_or(true, |f| matches_town(r, f)))
        .collect();

    let mut scored: Vec<ScoredRecord> = candidates
        .iter()
        .map(|record| ScoredRecord {
            score: score(&tokens, &record.haystack()),
            record: (*record).clone(),
        })
        .filter(|s| s.score > 0)
        .collect();

    if scored.is_empty() {
        tracing::debug!(
            "No keyword overlap for {} tokens across {} candidates; using first listings",
            tokens.len(),
            candidates.len()
        );
        return candidates
            .into_iter()
            .take(MAX_SOURCES)
            .map(|record| ScoredRecord {
                record: record.clone(),
                score: FALLBACK_SCORE,
            })
            .collect();
    }

    // sort_by is stable, so equal scores keep directory order
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(MAX_SOURCES);

    tracing::debug!(
        "Top scores: {:?}",
        scored.iter().map(|s| s.score).collect::<Vec<_>>()
    );

    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(town: &str, category: &str, name: &str) -> ServiceRecord {
        ServiceRecord {
            town: town.to_string(),
            category: category.to_string(),
            name: name.to_string(),
            url: "http://example.org".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_tokenize_lowercases_and_drops_blanks() {
        assert_eq!(tokenize("  Meals in   LINDEN "), vec!["meals", "in", "linden"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_score_counts_duplicate_tokens() {
        let tokens = tokenize("meals meals linden");
        assert_eq!(score(&tokens, "linden meals senior meals co"), 3);
    }

    #[test]
    fn test_score_matches_substrings() {
        let tokens = tokenize("meal");
        assert_eq!(score(&tokens, "senior meals co"), 1);
    }

    #[test]
    fn test_empty_directory_returns_nothing() {
        assert!(retrieve(&[], "meals", None).is_empty());
    }

    #[test]
    fn test_town_filter_with_no_matches_returns_nothing() {
        let records = vec![record("Linden", "Meals", "A")];
        assert!(retrieve(&records, "meals", Some("Cedar")).is_empty());
    }

    #[test]
    fn test_blank_town_filter_is_ignored() {
        let records = vec![record("Linden", "Meals", "A")];
        let results = retrieve(&records, "meals", Some("   "));
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_town_filter_is_case_insensitive_substring() {
        let records = vec![
            record("East Linden", "Meals", "A"),
            record("Cedar", "Meals", "B"),
        ];
        let results = retrieve(&records, "meals", Some("linden"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record.name, "A");
    }

    #[test]
    fn test_results_are_capped_and_ordered() {
        let records = vec![
            record("Linden", "Transport", "Ride Share"),
            record("Linden", "Meals", "Senior Meals"),
            record("Linden", "Meals", "Meals On Wheels Linden"),
        ];
        let results = retrieve(&records, "meals linden wheels", None);

        assert_eq!(results.len(), MAX_SOURCES);
        assert_eq!(results[0].record.name, "Meals On Wheels Linden");
        assert!(results[0].score >= results[1].score);
    }
}
