/// Keyword matching over the category catalog.
///
/// Matching is substring containment, case-insensitive, over a category's
/// key, title, and keywords. Every category is evaluated (no early exit) and
/// results come back in catalog order, so the first element is the match a
/// consumer should render. The matcher is pure and synchronous: it reads the
/// immutable catalog and nothing else, so concurrent calls need no locking.
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::error::AppError;
use crate::model::Category;

pub struct Matcher {
    catalog: Arc<Catalog>,
}

impl Matcher {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Return the keys of every matching category, in catalog order.
    ///
    /// A category matches when its key, its lower-cased title, or any of its
    /// keywords contains the lower-cased term as a substring. Callers strip
    /// whitespace before invoking; an empty result is an answer, not an
    /// error.
    pub fn search(&self, term: &str) -> Vec<&str> {
        let t = term.to_lowercase();
        self.catalog
            .iter()
            .filter(|c| {
                c.key.contains(&t)
                    || c.title.to_lowercase().contains(&t)
                    || c.keywords.iter().any(|k| k.contains(&t))
            })
            .map(|c| c.key.as_str())
            .collect()
    }

    /// The guide selection policy: trim, reject empty queries, and hand back
    /// the FIRST match's category. First-match-wins over declaration order is
    /// deliberate; no relevance ranking.
    pub fn select_guide(&self, raw_query: &str) -> Result<&Category, AppError> {
        let query = raw_query.trim();
        if query.is_empty() {
            return Err(AppError::EmptyQuery);
        }

        let matches = self.search(query);
        match matches.first() {
            Some(key) => self
                .catalog
                .lookup(key)
                .ok_or_else(|| AppError::UnknownCategory((*key).to_string())),
            None => Err(AppError::NoMatch {
                query: query.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin;

    fn matcher() -> Matcher {
        Matcher::new(Arc::new(Catalog::new(builtin()).unwrap()))
    }

    fn fixture_category(key: &str, title: &str, keywords: &[&str]) -> Category {
        Category {
            key: key.to_string(),
            title: title.to_string(),
            icon: String::new(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            content: format!("<p>{title}</p>"),
        }
    }

    #[test]
    fn every_keyword_matches_its_category_case_insensitively() {
        let m = matcher();
        for category in builtin() {
            for keyword in &category.keywords {
                let shouted = keyword.to_uppercase();
                let matches = m.search(&shouted);
                assert!(
                    matches.contains(&category.key.as_str()),
                    "search({shouted:?}) should include {}",
                    category.key
                );
            }
        }
    }

    #[test]
    fn title_substrings_match() {
        let m = matcher();
        assert!(m.search("Recycling Guide").contains(&"plastic"));
        assert!(m.search("organic waste").contains(&"organic"));
        // a mid-title fragment, not a whole word
        assert!(m.search("azard").contains(&"hazardous"));
    }

    #[test]
    fn no_match_returns_empty_not_error() {
        let m = matcher();
        assert!(m.search("zzqqnonexistent").is_empty());
    }

    #[test]
    fn ambiguous_terms_resolve_by_declaration_order() {
        // "bottle" is a keyword of both plastic and glass; plastic is
        // declared first and must win every time.
        let m = matcher();
        let first = m.search("bottle");
        assert_eq!(first.first(), Some(&"plastic"));
        assert!(first.contains(&"glass"));
        for _ in 0..10 {
            assert_eq!(m.search("bottle"), first);
        }
    }

    #[test]
    fn search_is_idempotent() {
        let m = matcher();
        for term in ["can", "paper", "jar", "e"] {
            assert_eq!(m.search(term), m.search(term));
        }
    }

    #[test]
    fn bottle_selects_the_plastic_guide() {
        let m = matcher();
        let guide = m.select_guide("bottle").unwrap();
        assert_eq!(guide.key, "plastic");
        assert_eq!(guide.title, "Plastic Recycling Guide");
    }

    #[test]
    fn whitespace_query_is_rejected_with_the_exact_message() {
        let m = matcher();
        let err = m.select_guide("  ").unwrap_err();
        assert!(matches!(err, AppError::EmptyQuery));
        assert_eq!(err.to_string(), "Please enter a search term.");
    }

    #[test]
    fn unmatched_query_is_echoed_back() {
        let m = matcher();
        let err = m.select_guide("xyz123").unwrap_err();
        assert_eq!(err.to_string(), "No results found for \"xyz123\"");
    }

    #[test]
    fn query_is_trimmed_before_matching_but_echoed_trimmed() {
        let m = matcher();
        let guide = m.select_guide("  battery  ").unwrap();
        assert_eq!(guide.key, "hazardous");

        let err = m.select_guide("  xyz123  ").unwrap_err();
        assert_eq!(err.to_string(), "No results found for \"xyz123\"");
    }

    #[test]
    fn battery_matches_hazardous_only() {
        let m = matcher();
        assert_eq!(m.search("battery"), vec!["hazardous"]);
    }

    #[test]
    fn key_substrings_match_too() {
        let m = matcher();
        assert!(m.search("plas").contains(&"plastic"));
        assert!(m.search("azardo").contains(&"hazardous"));
    }

    #[test]
    fn matcher_works_with_injected_fixture_data() {
        let catalog = Catalog::new(vec![
            fixture_category("first", "First Guide", &["shared"]),
            fixture_category("second", "Second Guide", &["shared", "only-second"]),
        ])
        .unwrap();
        let m = Matcher::new(Arc::new(catalog));

        assert_eq!(m.search("shared"), vec!["first", "second"]);
        assert_eq!(m.select_guide("shared").unwrap().key, "first");
        assert_eq!(m.search("only-second"), vec!["second"]);
    }
}
