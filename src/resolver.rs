//! City resolution: raw origin/destination strings to canonical codes.
//!
//! Resolution is best-effort and never fails: a miss returns the raw text
//! with a null code. When a city is served by several airports the entry's
//! designated primary code is returned; callers that need the alternates
//! query the [`AliasTable`] directly.

use tracing::debug;

use crate::alias::{self, AliasTable, FuzzyPolicy, Lang};
use crate::{normalize, regex};

/// Outcome of resolving one raw city string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Canonical city name on a hit; the raw input on a miss.
    pub name: String,
    /// Primary code on a hit; `None` on a miss.
    pub code: Option<String>,
}

/// Resolves raw city text against a borrowed, immutable alias table.
#[derive(Debug, Clone)]
pub struct CityResolver<'a> {
    table: &'a AliasTable,
    fuzzy: FuzzyPolicy,
}

impl<'a> CityResolver<'a> {
    pub fn new(table: &'a AliasTable) -> Self {
        Self::with_policy(table, FuzzyPolicy::default())
    }

    pub fn with_policy(table: &'a AliasTable, fuzzy: FuzzyPolicy) -> Self {
        CityResolver { table, fuzzy }
    }

    /// Lookup order: exact match on the normalized text (tag-specific, then
    /// language-agnostic), then bounded fuzzy match, then miss.
    pub fn resolve(&self, raw: &str) -> Resolution {
        let (city, _area) = split_city_area(raw);
        let key = alias::canonical_key(&city);
        if key.is_empty() {
            return Resolution { name: raw.trim().to_string(), code: None };
        }

        let lang = if normalize::contains_persian(&key) { Lang::Fa } else { Lang::En };

        if let Some(entry) = self.table.get(&key, lang) {
            return Resolution {
                name: entry.canonical_name.clone(),
                code: Some(entry.primary_code.clone()),
            };
        }

        if let Some(entry) = self.table.fuzzy(&key, &self.fuzzy) {
            return Resolution {
                name: entry.canonical_name.clone(),
                code: Some(entry.primary_code.clone()),
            };
        }

        debug!(raw, "city unresolved");
        Resolution { name: raw.trim().to_string(), code: None }
    }
}

/// Split `"City (Area)"` into the city and its parenthesized area. Posts
/// often carry a neighborhood after the city ("تهران (نیلوفران)"); only the
/// city part is resolvable.
pub(crate) fn split_city_area(text: &str) -> (String, String) {
    let re = regex!(r"^(.+?)\s*[(（]\s*([^)）]+?)\s*[)）]");
    match re.captures(text.trim()) {
        Some(caps) => (caps[1].trim().to_string(), caps[2].trim().to_string()),
        None => (text.trim().to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_scripts_resolve_to_the_same_code() {
        let table = AliasTable::builtin();
        let resolver = CityResolver::new(&table);
        let fa = resolver.resolve("تهران");
        let en = resolver.resolve("Tehran");
        assert_eq!(fa.code.as_deref(), Some("THR"));
        assert_eq!(en.code.as_deref(), Some("THR"));
        assert_eq!(fa.name, en.name);
    }

    #[test]
    fn miss_preserves_raw_text_with_null_code() {
        let table = AliasTable::builtin();
        let resolver = CityResolver::new(&table);
        let out = resolver.resolve("Atlantis");
        assert_eq!(out.name, "Atlantis");
        assert_eq!(out.code, None);
    }

    #[test]
    fn parenthesized_area_is_dropped_before_lookup() {
        let table = AliasTable::builtin();
        let resolver = CityResolver::new(&table);
        let out = resolver.resolve("تهران (نیلوفران)");
        assert_eq!(out.code.as_deref(), Some("THR"));
        assert_eq!(out.name, "Tehran");
    }

    #[test]
    fn fuzzy_typo_still_resolves() {
        let table = AliasTable::builtin();
        let resolver = CityResolver::new(&table);
        assert_eq!(resolver.resolve("Torontto").code.as_deref(), Some("YYZ"));
    }

    #[test]
    fn degraded_table_always_misses() {
        let table = AliasTable::degraded();
        let resolver = CityResolver::new(&table);
        assert_eq!(resolver.resolve("Tehran").code, None);
        assert_eq!(resolver.resolve("Tehran").name, "Tehran");
    }

    #[test]
    fn split_city_area_variants() {
        assert_eq!(
            split_city_area("تورنتو (نورث یورک)"),
            ("تورنتو".to_string(), "نورث یورک".to_string())
        );
        assert_eq!(split_city_area("Toronto"), ("Toronto".to_string(), String::new()));
    }
}
