use std::collections::HashSet;

use crate::model::Employee;

/// Items a selection set can hold. The key is identity; everything else on
/// the item is display data.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Employee {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Ordered, uniquely-keyed selection carried across pages.
///
/// `membership` is always exactly the key-projection of `items`; every
/// mutation updates both together. All operations are total: duplicate adds
/// and absent removes are no-ops, not errors.
#[derive(Clone, Debug)]
pub struct SelectionSet<T> {
    items: Vec<T>,
    membership: HashSet<String>,
}

impl<T: Keyed> SelectionSet<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            membership: HashSet::new(),
        }
    }

    /// Rebuild from a persisted item list. Later duplicates of a key are
    /// dropped; the first occurrence wins.
    pub fn from_items(items: Vec<T>) -> Self {
        let mut set = Self::new();
        for item in items {
            set.add(item);
        }
        set
    }

    /// Append unless the key is already present. Returns whether it was added.
    pub fn add(&mut self, item: T) -> bool {
        if self.membership.contains(item.key()) {
            return false;
        }
        self.membership.insert(item.key().to_string());
        self.items.push(item);
        true
    }

    /// Drop the item with this key, if present. Returns whether it was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        if !self.membership.remove(key) {
            return false;
        }
        self.items.retain(|item| item.key() != key);
        true
    }

    /// Remove when present, add when absent. Returns whether the item is now
    /// selected.
    pub fn toggle(&mut self, item: T) -> bool {
        if self.membership.contains(item.key()) {
            self.remove(&item.key().to_string());
            false
        } else {
            self.add(item);
            true
        }
    }

    /// Add every candidate not already present, keeping existing order and
    /// appending new ones in candidate order.
    pub fn select_all(&mut self, candidates: impl IntoIterator<Item = T>) {
        for candidate in candidates {
            self.add(candidate);
        }
    }

    /// Remove every candidate whose key is currently selected.
    pub fn unselect_all<'a>(&mut self, candidates: impl IntoIterator<Item = &'a T>)
    where
        T: 'a,
    {
        for candidate in candidates {
            self.remove(candidate.key());
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.membership.clear();
    }

    pub fn contains(&self, key: &str) -> bool {
        self.membership.contains(key)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.key())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Keyed> Default for SelectionSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emp(id: &str) -> Employee {
        Employee {
            id: id.to_string(),
            employee_no: format!("no-{id}"),
            name: format!("name-{id}"),
            position_id: 1,
            position_name: "picker".to_string(),
            clock_in: None,
        }
    }

    fn invariant_holds(set: &SelectionSet<Employee>) -> bool {
        let projected: HashSet<String> = set.items().iter().map(|e| e.id.clone()).collect();
        projected.len() == set.len() && projected.iter().all(|id| set.contains(id))
    }

    #[test]
    fn add_is_idempotent() {
        let mut set = SelectionSet::new();
        assert!(set.add(emp("e1")));
        assert!(!set.add(emp("e1")));
        assert_eq!(set.len(), 1);
        assert!(invariant_holds(&set));
    }

    #[test]
    fn remove_absent_is_a_noop() {
        let mut set: SelectionSet<Employee> = SelectionSet::new();
        assert!(!set.remove("ghost"));
        assert!(set.is_empty());
    }

    #[test]
    fn toggle_is_an_involution() {
        let mut set = SelectionSet::new();
        set.add(emp("e1"));
        set.add(emp("e2"));

        assert!(set.toggle(emp("e3")));
        assert!(!set.toggle(emp("e3")));
        assert_eq!(set.len(), 2);
        assert!(set.contains("e1"));
        assert!(set.contains("e2"));
        assert!(!set.contains("e3"));
        assert!(invariant_holds(&set));
    }

    #[test]
    fn membership_tracks_items_after_every_mutation() {
        let mut set = SelectionSet::new();
        set.add(emp("a"));
        assert!(invariant_holds(&set));
        set.add(emp("b"));
        assert!(invariant_holds(&set));
        set.remove("a");
        assert!(invariant_holds(&set));
        set.toggle(emp("c"));
        assert!(invariant_holds(&set));
        set.clear();
        assert!(invariant_holds(&set));
    }

    #[test]
    fn select_all_appends_missing_in_candidate_order() {
        let mut set = SelectionSet::new();
        set.add(emp("b"));
        set.select_all(vec![emp("a"), emp("b"), emp("c")]);

        let ids: Vec<&str> = set.keys().collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn unselect_all_removes_only_the_candidates() {
        let mut set = SelectionSet::new();
        set.add(emp("kept"));
        set.select_all(vec![emp("a"), emp("b")]);

        let page = vec![emp("a"), emp("b"), emp("never-selected")];
        set.unselect_all(&page);

        assert_eq!(set.len(), 1);
        assert!(set.contains("kept"));
        assert!(invariant_holds(&set));
    }

    #[test]
    fn from_items_keeps_first_occurrence_of_a_duplicate() {
        let mut dup = emp("e1");
        dup.name = "other".to_string();
        let set = SelectionSet::from_items(vec![emp("e1"), dup, emp("e2")]);

        assert_eq!(set.len(), 2);
        assert_eq!(set.items()[0].name, "name-e1");
    }
}
