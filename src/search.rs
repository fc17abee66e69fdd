use tracing::debug;

pub const MIN_QUERY_LEN: usize = 2;

/// Test names offered as suggestions when no catalogue is supplied.
pub const DEFAULT_CATALOGUE: [&str; 5] = [
    "تحاليل الدم الشاملة",
    "فحص الكلى والكبد",
    "تحاليل الهرمونات",
    "فحص السكري",
    "أشعة الرنين المغناطيسي",
];

/// Live search suggestions over a fixed list of test names.
#[derive(Debug, Clone)]
pub struct Suggester {
    catalogue: Vec<String>,
}

impl Default for Suggester {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOGUE.iter().map(|s| s.to_string()).collect())
    }
}

impl Suggester {
    pub fn new(catalogue: Vec<String>) -> Self {
        Self { catalogue }
    }

    /// Entries containing `query`; nothing for queries under two characters.
    pub fn suggest(&self, query: &str) -> Vec<&str> {
        if query.encode_utf16().count() < MIN_QUERY_LEN {
            return Vec::new();
        }
        let hits: Vec<&str> = self
            .catalogue
            .iter()
            .filter(|entry| entry.contains(query))
            .map(String::as_str)
            .collect();
        debug!(query, hits = hits.len(), "suggestions");
        hits
    }
}

/// The query to search for, as typed; `None` for a blank query ("all results").
pub fn search_target(query: &str) -> Option<&str> {
    (!query.trim().is_empty()).then_some(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_queries_return_nothing() {
        let s = Suggester::default();
        assert!(s.suggest("").is_empty());
        assert!(s.suggest("ف").is_empty());
    }

    #[test]
    fn matches_substrings() {
        let s = Suggester::default();
        assert_eq!(s.suggest("فحص"), vec!["فحص الكلى والكبد", "فحص السكري"]);
        assert_eq!(s.suggest("الهرمونات"), vec!["تحاليل الهرمونات"]);
        assert!(s.suggest("xyz").is_empty());
    }

    #[test]
    fn custom_catalogue_is_case_sensitive() {
        let s = Suggester::new(vec!["Blood panel".into(), "Thyroid".into()]);
        assert_eq!(s.suggest("Blo"), vec!["Blood panel"]);
        assert!(s.suggest("blo").is_empty());
    }

    #[test]
    fn search_target_keeps_query_as_typed() {
        assert_eq!(search_target("  سكري "), Some("  سكري "));
        assert_eq!(search_target("سكري"), Some("سكري"));
        assert_eq!(search_target("   "), None);
        assert_eq!(search_target(""), None);
    }
}
