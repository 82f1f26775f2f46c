//! Multi-selection set with an id to kind side table.

use std::collections::HashMap;

use crate::elements::{ElementId, ElementKind};

/// The set of selected elements.
///
/// Ids keep their selection order; `kinds` maps each selected id to the
/// collection it lives in so callers can dispatch without scanning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    order: Vec<ElementId>,
    kinds: HashMap<ElementId, ElementKind>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id`. Without `additive` the previous selection is replaced.
    pub fn select(&mut self, id: &str, kind: ElementKind, additive: bool) {
        if !additive {
            self.clear();
        }
        if self.kinds.insert(id.to_string(), kind).is_none() {
            self.order.push(id.to_string());
        }
    }

    /// Add or remove `id`. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: &str, kind: ElementKind) -> bool {
        if self.remove(id) {
            false
        } else {
            self.select(id, kind, true);
            true
        }
    }

    /// Deselect `id`, returning whether it was selected.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.kinds.remove(id).is_some() {
            self.order.retain(|selected| selected != id);
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.kinds.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.kinds.contains_key(id)
    }

    pub fn kind_of(&self, id: &str) -> Option<ElementKind> {
        self.kinds.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Selected ids in selection order.
    pub fn ids(&self) -> &[ElementId] {
        &self.order
    }

    /// Selected ids with their kinds, in selection order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ElementKind)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.kinds.get(id).map(|kind| (id.as_str(), *kind)))
    }

    /// The single selected element, if exactly one is selected.
    pub fn single(&self) -> Option<(&str, ElementKind)> {
        if self.len() == 1 { self.iter().next() } else { None }
    }
}
