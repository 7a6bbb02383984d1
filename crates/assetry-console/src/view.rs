//! List filtering and bulk selection.
//!
//! A [`Filter`] is a pure predicate over records; [`ListView`] pairs one
//! with a [`Selection`] and enforces that changing the filter clears the
//! selection.

use assetry_core::{Entity, EntityId, Facet, Record};
use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;

/// Facet value that disables a facet.
pub const ALL: &str = "all";

/// Search term plus exact-match facets.
///
/// A record passes when the search term is empty or a case-insensitive
/// substring of one of its search fields, and every active facet equals the
/// record's value exactly. A facet the kind does not expose never matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    search: String,
    facets: BTreeMap<Facet, String>,
}

impl Filter {
    /// A filter that passes everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style search term.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.set_search(term);
        self
    }

    /// Builder-style facet.
    pub fn facet(mut self, facet: Facet, value: impl Into<String>) -> Self {
        self.set_facet(facet, value);
        self
    }

    /// Sets the search term. A blank term clears it; any other term is
    /// matched as given, surrounding spaces included.
    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        self.search = if term.trim().is_empty() {
            String::new()
        } else {
            term.to_lowercase()
        };
    }

    /// Sets a facet. `"all"` (or an empty value) removes it.
    pub fn set_facet(&mut self, facet: Facet, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() || value == ALL {
            self.facets.remove(&facet);
        } else {
            self.facets.insert(facet, value);
        }
    }

    /// Returns `true` when the filter passes everything.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.facets.is_empty()
    }

    /// Active facets.
    pub fn facets(&self) -> impl Iterator<Item = (Facet, &str)> {
        self.facets.iter().map(|(f, v)| (*f, v.as_str()))
    }

    /// Tests one entity.
    pub fn matches<E: Entity>(&self, entity: &E) -> bool {
        let found = self.search.is_empty()
            || entity
                .search_text()
                .iter()
                .any(|text| text.to_lowercase().contains(&self.search));
        found
            && self
                .facets
                .iter()
                .all(|(facet, wanted)| entity.facet(*facet) == Some(wanted.as_str()))
    }

    /// Lazily filters records, preserving order.
    pub fn apply<'a, E: Entity>(
        &'a self,
        records: impl IntoIterator<Item = &'a Record<E>> + 'a,
    ) -> impl Iterator<Item = &'a Record<E>> + 'a {
        records.into_iter().filter(move |record| self.matches(&record.fields))
    }
}

/// Explicit set of record ids chosen for a bulk action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<EntityId>,
}

impl Selection {
    /// Empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or removes one id.
    pub fn toggle(&mut self, id: &EntityId) {
        if !self.ids.remove(id) {
            self.ids.insert(id.clone());
        }
    }

    /// Adds one id.
    pub fn insert(&mut self, id: EntityId) {
        self.ids.insert(id);
    }

    /// Returns `true` when `id` is selected.
    pub fn contains(&self, id: &EntityId) -> bool {
        self.ids.contains(id)
    }

    /// Drops every id.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids, sorted.
    pub fn ids(&self) -> Vec<EntityId> {
        self.ids.iter().cloned().collect()
    }
}

impl FromIterator<EntityId> for Selection {
    fn from_iter<I: IntoIterator<Item = EntityId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// List screen state for one kind: filter plus selection.
#[derive(Debug, Clone)]
pub struct ListView<E> {
    filter: Filter,
    selection: Selection,
    entity: PhantomData<fn() -> E>,
}

impl<E> Default for ListView<E> {
    fn default() -> Self {
        Self {
            filter: Filter::default(),
            selection: Selection::default(),
            entity: PhantomData,
        }
    }
}

impl<E: Entity> ListView<E> {
    /// A view showing everything, nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current filter.
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Replaces the filter. Clears the selection.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.selection.clear();
    }

    /// Changes the search term. Clears the selection.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filter.set_search(term);
        self.selection.clear();
    }

    /// Changes one facet. Clears the selection.
    pub fn set_facet(&mut self, facet: Facet, value: impl Into<String>) {
        self.filter.set_facet(facet, value);
        self.selection.clear();
    }

    /// Current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Mutable selection, for toggling rows.
    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Selects every visible record.
    pub fn select_visible<'a>(&mut self, records: impl IntoIterator<Item = &'a Record<E>>) {
        for record in records {
            if self.filter.matches(&record.fields) {
                self.selection.ids.insert(record.id.clone());
            }
        }
    }

    /// Takes the selection for a bulk action, leaving it empty.
    pub fn take_selection(&mut self) -> Selection {
        std::mem::take(&mut self.selection)
    }

    /// Visible records, in store order.
    pub fn rows<'a>(
        &'a self,
        records: impl IntoIterator<Item = &'a Record<E>> + 'a,
    ) -> impl Iterator<Item = &'a Record<E>> + 'a {
        self.filter.apply(records)
    }
}
