//! Translation store keyed by category, source text and language.

use std::collections::{
    BTreeMap,
    BTreeSet,
};
use std::io::{
    Read,
    Write,
};

use super::StoreError;
use crate::types::TranslationRecord;

/// Language -> record.
type ByLanguage = BTreeMap<String, TranslationRecord>;

/// Source text -> translations of that text.
type BySource = BTreeMap<String, ByLanguage>;

/// Translation records grouped by category.
///
/// A (category, source text, language) triple identifies at most one record;
/// adding another record for the same triple replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationStore {
    /// Category -> source text -> language -> record.
    by_category: BTreeMap<String, BySource>,
}

impl TranslationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, returning the one it replaced, if any.
    pub fn add(&mut self, record: TranslationRecord) -> Option<TranslationRecord> {
        let replaced = self
            .by_category
            .entry(record.category.clone())
            .or_default()
            .entry(record.source_text.clone())
            .or_default()
            .insert(record.language.clone(), record);
        if let Some(previous) = &replaced {
            tracing::debug!(
                category = %previous.category,
                language = %previous.language,
                "Replacing translation for '{}'",
                previous.source_text
            );
        }
        replaced
    }

    /// Returns records matching every given predicate.
    #[must_use]
    pub fn filter(
        &self,
        category: Option<&str>,
        language: Option<&str>,
    ) -> Vec<&TranslationRecord> {
        let matches_language = |record: &&TranslationRecord| {
            language.is_none_or(|language| record.language == language)
        };
        match category {
            Some(category) => self
                .by_category
                .get(category)
                .into_iter()
                .flat_map(BTreeMap::values)
                .flat_map(BTreeMap::values)
                .filter(matches_language)
                .collect(),
            None => self.iter().filter(matches_language).collect(),
        }
    }

    /// Exact lookup by (category, source text, language).
    #[must_use]
    pub fn get(
        &self,
        category: &str,
        source_text: &str,
        language: &str,
    ) -> Option<&TranslationRecord> {
        self.by_category.get(category)?.get(source_text)?.get(language)
    }

    /// Iterates over all records ordered by category, source text, then language.
    pub fn iter(&self) -> impl Iterator<Item = &TranslationRecord> {
        self.by_category.values().flat_map(BTreeMap::values).flat_map(BTreeMap::values)
    }

    /// Languages that have at least one record.
    #[must_use]
    pub fn languages(&self) -> BTreeSet<&str> {
        self.iter().map(|record| record.language.as_str()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_category.values().flat_map(BTreeMap::values).map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty()
    }

    /// Writes every record as a JSON array.
    pub fn dump<W: Write>(&self, mut sink: W) -> Result<(), StoreError> {
        let records: Vec<&TranslationRecord> = self.iter().collect();
        serde_json::to_writer_pretty(&mut sink, &records)?;
        sink.flush()?;
        Ok(())
    }

    /// Reads a store written by [`TranslationStore::dump`].
    pub fn load<R: Read>(source: R) -> Result<Self, StoreError> {
        let records: Vec<TranslationRecord> = serde_json::from_reader(source)?;
        tracing::debug!(count = records.len(), "Loaded translations");
        Ok(records.into_iter().collect())
    }
}

impl Extend<TranslationRecord> for TranslationStore {
    fn extend<I: IntoIterator<Item = TranslationRecord>>(&mut self, iter: I) {
        for record in iter {
            self.add(record);
        }
    }
}

impl IntoIterator for TranslationStore {
    type Item = TranslationRecord;
    type IntoIter = std::vec::IntoIter<TranslationRecord>;

    /// Yields the records in [`TranslationStore::iter`] order.
    fn into_iter(self) -> Self::IntoIter {
        self.by_category
            .into_values()
            .flat_map(BTreeMap::into_values)
            .flat_map(BTreeMap::into_values)
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl FromIterator<TranslationRecord> for TranslationStore {
    fn from_iter<I: IntoIterator<Item = TranslationRecord>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[fixture]
    fn store() -> TranslationStore {
        [
            TranslationRecord::new("ValueError", "%s too long", "en", ""),
            TranslationRecord::new("ValueError", "%s too long", "es", "%s es muy largo"),
            TranslationRecord::new(
                "NameError",
                "name %s is not defined",
                "es",
                "el nombre %s no está definido",
            ),
            TranslationRecord::new(
                "NameError",
                "name %s is not defined",
                "pt",
                "o nome %s não está definido",
            ),
        ]
        .into_iter()
        .collect()
    }

    #[rstest]
    fn get_by_triple(store: TranslationStore) {
        let record = store.get("ValueError", "%s too long", "es");

        assert_that!(record.map(|r| r.translated_text.as_str()), some(eq("%s es muy largo")));
        assert_that!(store.get("ValueError", "%s too long", "pt"), none());
        assert_that!(store.get("TypeError", "%s too long", "es"), none());
    }

    #[rstest]
    #[case::everything(None, None, 4)]
    #[case::by_category(Some("NameError"), None, 2)]
    #[case::by_language(None, Some("es"), 2)]
    #[case::both(Some("ValueError"), Some("en"), 1)]
    #[case::unknown_category(Some("KeyError"), None, 0)]
    #[case::unknown_language(Some("NameError"), Some("ja"), 0)]
    fn filter_combines_predicates(
        store: TranslationStore,
        #[case] category: Option<&str>,
        #[case] language: Option<&str>,
        #[case] expected: usize,
    ) {
        assert_that!(store.filter(category, language).len(), eq(expected));
    }

    #[rstest]
    fn add_replaces_same_triple() {
        let mut store = TranslationStore::new();
        store.add(TranslationRecord::new("ValueError", "%s too long", "es", "viejo %s"));

        let replaced =
            store.add(TranslationRecord::new("ValueError", "%s too long", "es", "nuevo %s"));

        assert_that!(replaced.map(|r| r.translated_text), some(eq("viejo %s")));
        assert_that!(store.len(), eq(1));
        assert_that!(
            store.get("ValueError", "%s too long", "es").map(|r| r.translated_text.as_str()),
            some(eq("nuevo %s"))
        );
    }

    #[rstest]
    fn merging_stores_replaces_shared_triples(store: TranslationStore) {
        let mut merged = store.clone();
        let update: TranslationStore = [
            TranslationRecord::new("ValueError", "%s too long", "es", "%s es largo"),
            TranslationRecord::new("KeyError", "%s", "es", "%s"),
        ]
        .into_iter()
        .collect();
        merged.extend(update);

        assert_that!(merged.len(), eq(store.len() + 1));
        assert_that!(
            merged.get("ValueError", "%s too long", "es").map(|r| r.translated_text.as_str()),
            some(eq("%s es largo"))
        );
    }

    #[rstest]
    fn into_iter_matches_iter_order(store: TranslationStore) {
        let borrowed: Vec<TranslationRecord> = store.iter().cloned().collect();

        assert_eq!(store.into_iter().collect::<Vec<_>>(), borrowed);
    }

    #[rstest]
    fn languages_lists_each_code_once(store: TranslationStore) {
        assert_eq!(store.languages().into_iter().collect::<Vec<_>>(), vec!["en", "es", "pt"]);
    }

    #[rstest]
    fn dump_then_load_keeps_every_record(store: TranslationStore) {
        let mut buffer = Vec::new();
        store.dump(&mut buffer).unwrap();

        let loaded = TranslationStore::load(buffer.as_slice()).unwrap();

        assert_eq!(loaded, store);
    }

    #[rstest]
    fn dump_is_stable(store: TranslationStore) {
        let mut first = Vec::new();
        let mut second = Vec::new();
        store.dump(&mut first).unwrap();
        store.clone().dump(&mut second).unwrap();

        assert_eq!(first, second);
    }
}
