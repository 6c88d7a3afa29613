//! Search filter over the article collection
//!
//! Case-insensitive substring match against title, source and summary.
//! Pure and order-preserving, so filtering twice with the same query gives
//! the same result as filtering once.

use crate::articles::Article;

/// Filter `articles` by `query`; a blank query returns the input unchanged
pub fn filter(articles: &[Article], query: &str) -> Vec<Article> {
    if query.trim().is_empty() {
        return articles.to_vec();
    }
    let needle = query.to_lowercase();
    articles
        .iter()
        .filter(|a| matches(a, &needle))
        .cloned()
        .collect()
}

/// Whether `article` contains the already-lowercased `needle`
pub fn matches(article: &Article, needle: &str) -> bool {
    article.title.to_lowercase().contains(needle)
        || article.source.to_lowercase().contains(needle)
        || article
            .summary
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
            .contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn article(id: &str, title: &str, source: &str, summary: Option<&str>) -> Article {
        Article {
            id: id.to_string(),
            title: title.to_string(),
            source: source.to_string(),
            url: format!("https://example.com/{}", id),
            summary: summary.map(str::to_string),
            published_at: Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap(),
            image_url: None,
            is_saved: false,
        }
    }

    fn collection() -> Vec<Article> {
        vec![
            article("1", "Alpha release", "hacker_news", None),
            article("2", "Weekly digest", "bens_bites", Some("New LLM benchmarks")),
            article("3", "Agents in production", "reddit", Some("Lessons learned")),
            article("4", "Model cards", "ai_rundown", None),
        ]
    }

    fn ids(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_empty_query_is_identity() {
        let all = collection();
        assert_eq!(filter(&all, ""), all);
        assert_eq!(filter(&all, "   \t"), all);
    }

    #[test]
    fn test_case_insensitive_title() {
        let out = filter(&collection(), "A");
        assert!(ids(&out).contains(&"1"));

        let out = filter(&collection(), "ALPHA");
        assert_eq!(ids(&out), vec!["1"]);
    }

    #[test]
    fn test_matches_source_and_summary() {
        assert_eq!(ids(&filter(&collection(), "bens")), vec!["2"]);
        assert_eq!(ids(&filter(&collection(), "lessons")), vec!["3"]);
    }

    #[test]
    fn test_absent_summary_is_empty_text() {
        assert_eq!(ids(&filter(&collection(), "benchmarks")), vec!["2"]);
        assert!(filter(&collection(), "zzz").is_empty());
    }

    #[test]
    fn test_preserves_order() {
        let out = filter(&collection(), "e");
        let positions: Vec<usize> = out
            .iter()
            .map(|a| collection().iter().position(|b| b.id == a.id).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_idempotent() {
        let all = collection();
        for q in ["", "a", "Digest", "news", "nothing here", "  "] {
            let once = filter(&all, q);
            assert_eq!(filter(&once, q), once, "query {:?}", q);
        }
    }
}
