//! Ordered relation collections with singular-relation semantics.
//!
//! A relation collection maps relation names (`self`, `next`, `ea:order`) to
//! an ordered list of items. Relations keep the order in which they were
//! first added, and items keep the order in which they were added to their
//! relation. A subset of relation names can be marked *singular*: such a
//! relation holds at most one item and is written as a single JSON value
//! instead of an array.

use std::collections::BTreeSet;
use std::ops::Index;

use crate::error::{HalError, Result};

/// One relation as produced by [`RelationCollection::iter`].
#[derive(Debug)]
pub struct RelationEntry<'a, T> {
    pub relation: &'a str,
    pub singular: bool,
    pub items: &'a [T],
}

impl<T> RelationEntry<'_, T> {
    /// Whether the relation is written as a single object rather than an array.
    pub fn is_single_object(&self) -> bool {
        self.singular && self.items.len() == 1
    }
}

impl<T> Clone for RelationEntry<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RelationEntry<'_, T> {}

/// Insertion-ordered relation storage without any singular policy.
///
/// Shared by [`RelationCollection`] and the embedded-resource store, whose
/// singular set lives in the owning resource's link collection.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RelationMap<T> {
    entries: Vec<(String, Vec<T>)>,
}

impl<T> Default for RelationMap<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> RelationMap<T> {
    fn position(&self, relation: &str) -> Option<usize> {
        self.entries.iter().position(|(name, _)| name == relation)
    }

    pub(crate) fn get(&self, relation: &str) -> &[T] {
        match self.position(relation) {
            Some(i) => &self.entries[i].1,
            None => &[],
        }
    }

    pub(crate) fn get_mut(&mut self, relation: &str) -> &mut [T] {
        match self.position(relation) {
            Some(i) => &mut self.entries[i].1,
            None => &mut [],
        }
    }

    pub(crate) fn contains(&self, relation: &str) -> bool {
        self.position(relation).is_some()
    }

    /// Append `item`; `relation` must already be validated.
    pub(crate) fn push(&mut self, relation: &str, item: T, singular: bool) -> Result<()> {
        match self.position(relation) {
            Some(i) => {
                let items = &mut self.entries[i].1;
                if singular && !items.is_empty() {
                    tracing::debug!(relation, "rejected second item in singular relation");
                    return Err(HalError::InvalidOperation(format!(
                        "relation {relation:?} is singular and already holds an item"
                    )));
                }
                items.push(item);
            }
            None => self.entries.push((relation.to_string(), vec![item])),
        }
        Ok(())
    }

    /// Register `relation` without items, if it is not present yet.
    pub(crate) fn touch(&mut self, relation: &str) {
        if !self.contains(relation) {
            self.entries.push((relation.to_string(), Vec::new()));
        }
    }

    pub(crate) fn remove(&mut self, relation: &str) -> bool {
        match self.position(relation) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn item_count(&self) -> usize {
        self.entries.iter().map(|(_, items)| items.len()).sum()
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub(crate) fn all(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().flat_map(|(_, items)| items.iter())
    }

    pub(crate) fn iter<'a>(&'a self, singular: &'a BTreeSet<String>) -> Iter<'a, T> {
        Iter {
            inner: self.entries.iter(),
            singular,
        }
    }
}

/// Iterator over the relations of a collection, in insertion order.
pub struct Iter<'a, T> {
    inner: std::slice::Iter<'a, (String, Vec<T>)>,
    singular: &'a BTreeSet<String>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = RelationEntry<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let (relation, items) = self.inner.next()?;
        Some(RelationEntry {
            relation,
            singular: self.singular.contains(relation),
            items,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A generic ordered multimap from relation name to items of type `T`.
///
/// Relation names are case-sensitive and must not be blank: mutating
/// methods fail with [`HalError::InvalidArgument`] for an empty or
/// whitespace-only name, while lookups simply find nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationCollection<T> {
    map: RelationMap<T>,
    singular: BTreeSet<String>,
}

impl<T> Default for RelationCollection<T> {
    fn default() -> Self {
        Self {
            map: RelationMap::default(),
            singular: BTreeSet::new(),
        }
    }
}

impl<T> RelationCollection<T> {
    /// Create an empty collection with no singular relations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collection with `relations` pre-marked singular.
    pub fn with_singular<I, S>(relations: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut collection = Self::new();
        for relation in relations {
            collection.mark_singular(relation.as_ref())?;
        }
        Ok(collection)
    }

    /// Append `item` to `relation`, creating the relation if needed.
    ///
    /// Fails with [`HalError::InvalidOperation`] if the relation is singular
    /// and already holds an item.
    pub fn add(&mut self, relation: &str, item: T) -> Result<()> {
        validate_relation(relation)?;
        let singular = self.singular.contains(relation);
        self.map.push(relation, item, singular)
    }

    /// Append every item in order.
    ///
    /// Stops at the first failure; items added before it stay in place. An
    /// empty `items` still registers `relation`, so that an empty JSON array
    /// survives a decode/encode round trip.
    pub fn add_all<I>(&mut self, relation: &str, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        validate_relation(relation)?;
        self.map.touch(relation);
        for item in items {
            self.add(relation, item)?;
        }
        Ok(())
    }

    /// Replace the contents of `relation` with `item`.
    ///
    /// Never fails because the relation is singular.
    pub fn set(&mut self, relation: &str, item: T) -> Result<()> {
        validate_relation(relation)?;
        self.map.remove(relation);
        self.add(relation, item)
    }

    /// Replace the contents of `relation` with `items`.
    pub fn set_all<I>(&mut self, relation: &str, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        validate_relation(relation)?;
        self.map.remove(relation);
        self.add_all(relation, items)
    }

    /// Items of `relation`; empty for an unknown or blank relation.
    pub fn get(&self, relation: &str) -> &[T] {
        self.map.get(relation)
    }

    /// The first item of `relation`, if any.
    pub fn first(&self, relation: &str) -> Option<&T> {
        self.get(relation).first()
    }

    pub fn contains(&self, relation: &str) -> bool {
        self.map.contains(relation)
    }

    pub fn contains_item(&self, relation: &str, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.get(relation).contains(item)
    }

    /// Whether `item` occurs under any relation.
    pub fn contains_any(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.map.all().any(|candidate| candidate == item)
    }

    /// Remove `relation` and all of its items. Singular marking is untouched.
    pub fn remove(&mut self, relation: &str) -> bool {
        self.map.remove(relation)
    }

    /// Mark `relation` as holding at most one item. Idempotent; the relation
    /// does not need to exist yet.
    pub fn mark_singular(&mut self, relation: &str) -> Result<()> {
        validate_relation(relation)?;
        if self.singular.insert(relation.to_string()) {
            tracing::trace!(relation, "marked relation singular");
        }
        Ok(())
    }

    pub fn is_singular(&self, relation: &str) -> bool {
        self.singular.contains(relation)
    }

    pub fn singular_relations(&self) -> impl Iterator<Item = &str> {
        self.singular.iter().map(String::as_str)
    }

    /// Remove every relation and item. Singular markings are kept: they
    /// describe the shape of the collection, not its contents.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Number of distinct relations.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.len() == 0
    }

    /// Total number of items across all relations.
    pub fn item_count(&self) -> usize {
        self.map.item_count()
    }

    pub fn relation_names(&self) -> impl Iterator<Item = &str> {
        self.map.names()
    }

    /// Every item, relation by relation.
    pub fn all(&self) -> impl Iterator<Item = &T> {
        self.map.all()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.map.iter(&self.singular)
    }

    pub(crate) fn singular_set(&self) -> &BTreeSet<String> {
        &self.singular
    }
}

impl<T> Index<&str> for RelationCollection<T> {
    type Output = [T];

    fn index(&self, relation: &str) -> &[T] {
        self.get(relation)
    }
}

impl<'a, T> IntoIterator for &'a RelationCollection<T> {
    type Item = RelationEntry<'a, T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Fail with [`HalError::InvalidArgument`] for an empty or whitespace-only
/// relation name.
pub fn validate_relation(relation: &str) -> Result<()> {
    if relation.trim().is_empty() {
        return Err(HalError::blank_relation());
    }
    Ok(())
}

// --- tests -------------------------------------------------------------------
