//! Template store keyed by category.

use std::collections::{
    BTreeMap,
    BTreeSet,
    btree_map,
};
use std::io::{
    Read,
    Write,
};

use super::StoreError;
use crate::types::Template;

/// Set of templates grouped by category.
///
/// Within a category templates are kept sorted by text; [`TemplateStore::filter`]
/// returns them in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateStore {
    /// Category -> templates of that category.
    by_category: BTreeMap<String, BTreeSet<Template>>,
}

impl TemplateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a template. Returns false if it was already present.
    pub fn add(&mut self, template: Template) -> bool {
        self.by_category.entry(template.category.clone()).or_default().insert(template)
    }

    /// Returns the templates of `category`, or every template when `None`.
    #[must_use]
    pub fn filter(&self, category: Option<&str>) -> Vec<&Template> {
        match category {
            Some(category) => {
                self.by_category.get(category).map(|set| set.iter().collect()).unwrap_or_default()
            }
            None => self.iter().collect(),
        }
    }

    /// Iterates over all templates ordered by category, then text.
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.by_category.values().flatten()
    }

    #[must_use]
    pub fn contains(&self, template: &Template) -> bool {
        self.by_category.get(&template.category).is_some_and(|set| set.contains(template))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.by_category.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_category.values().map(BTreeSet::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty()
    }

    /// Writes every template as a JSON array.
    pub fn dump<W: Write>(&self, mut sink: W) -> Result<(), StoreError> {
        let templates: Vec<&Template> = self.iter().collect();
        serde_json::to_writer_pretty(&mut sink, &templates)?;
        sink.flush()?;
        Ok(())
    }

    /// Reads a store written by [`TemplateStore::dump`].
    pub fn load<R: Read>(source: R) -> Result<Self, StoreError> {
        let templates: Vec<Template> = serde_json::from_reader(source)?;
        tracing::debug!(count = templates.len(), "Loaded templates");
        Ok(templates.into_iter().collect())
    }
}

impl Extend<Template> for TemplateStore {
    fn extend<I: IntoIterator<Item = Template>>(&mut self, iter: I) {
        for template in iter {
            self.add(template);
        }
    }
}

impl IntoIterator for TemplateStore {
    type Item = Template;
    type IntoIter = std::iter::Flatten<btree_map::IntoValues<String, BTreeSet<Template>>>;

    /// Yields the templates in [`TemplateStore::iter`] order.
    fn into_iter(self) -> Self::IntoIter {
        self.by_category.into_values().flatten()
    }
}

impl FromIterator<Template> for TemplateStore {
    fn from_iter<I: IntoIterator<Item = Template>>(iter: I) -> Self {
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
    fn store() -> TemplateStore {
        [
            Template::new("ValueError", "%s too long"),
            Template::new("ValueError", "%s es muy largo"),
            Template::new("NameError", "name %s is not defined"),
        ]
        .into_iter()
        .collect()
    }

    #[rstest]
    fn empty_store() {
        let store = TemplateStore::new();

        assert_that!(store.len(), eq(0));
        assert_that!(store.is_empty(), eq(true));
        assert_that!(store.filter(None), is_empty());
    }

    #[rstest]
    fn add_is_idempotent() {
        let mut store = TemplateStore::new();

        assert_that!(store.add(Template::new("ValueError", "%s too long")), eq(true));
        assert_that!(store.add(Template::new("ValueError", "%s too long")), eq(false));
        assert_that!(store.len(), eq(1));
        assert_that!(store.contains(&Template::new("ValueError", "%s too long")), eq(true));
    }

    #[rstest]
    fn filter_by_category(store: TemplateStore) {
        assert_that!(store.filter(Some("ValueError")).len(), eq(2));
        assert_that!(store.filter(Some("NameError")).len(), eq(1));
        assert_that!(store.filter(Some("ZeroDivisionError")), is_empty());
        assert_that!(store.filter(None).len(), eq(3));
    }

    #[rstest]
    fn filter_is_sorted_by_text(store: TemplateStore) {
        let texts: Vec<&str> =
            store.filter(Some("ValueError")).iter().map(|t| t.text.as_str()).collect();

        assert_eq!(texts, vec!["%s es muy largo", "%s too long"]);
    }

    #[rstest]
    fn same_text_in_two_categories_is_two_templates() {
        let mut store = TemplateStore::new();
        store.add(Template::new("TypeError", "bad %s"));
        store.add(Template::new("ValueError", "bad %s"));

        assert_that!(store.len(), eq(2));
        assert_eq!(store.categories().collect::<Vec<_>>(), vec!["TypeError", "ValueError"]);
    }

    #[rstest]
    fn dump_then_load_keeps_every_template(store: TemplateStore) {
        let mut buffer = Vec::new();
        store.dump(&mut buffer).unwrap();

        let loaded = TemplateStore::load(buffer.as_slice()).unwrap();

        assert_eq!(loaded, store);
    }

    #[rstest]
    fn extend_from_another_store(store: TemplateStore) {
        let mut merged: TemplateStore =
            [Template::new("NameError", "name %s is not defined")].into_iter().collect();

        merged.extend(store.clone());

        assert_eq!(merged, store);
        let owned: Vec<Template> = store.clone().into_iter().collect();
        assert_eq!(owned, store.iter().cloned().collect::<Vec<_>>());
    }

    #[rstest]
    fn load_collapses_duplicates() {
        let json = r#"[
            {"category": "NameError", "text": "name %s is not defined"},
            {"category": "NameError", "text": "name %s is not defined"}
        ]"#;

        let store = TemplateStore::load(json.as_bytes()).unwrap();

        assert_that!(store.len(), eq(1));
    }

    #[rstest]
    fn load_rejects_malformed_input() {
        let result = TemplateStore::load("not json".as_bytes());

        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }
}
