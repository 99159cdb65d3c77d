//! Embedded resources (`_embedded`) and their binding to `_links`.
//!
//! A resource stores its embedded resources in an [`EmbeddedResources`]
//! value, but all access goes through a view that borrows the resource's
//! own [`LinkCollection`] alongside it:
//!
//! - [`ResourceCollection`]: read-only view;
//! - [`ResourceCollectionMut`]: mutable view.
//!
//! Through the view, the embedded resources share the link collection's
//! singular relations (marking a relation singular here marks it on the
//! links) and may only use relation names that are declared as links. The
//! borrow ties the view's lifetime to the link collection, so it can never
//! observe a stale or dropped one.

use crate::error::{HalError, Result};
use crate::links::LinkCollection;
use crate::relation::{validate_relation, Iter, RelationMap};
use crate::resource::HalResource;

/// Owned storage for the embedded resources of one resource.
///
/// Holds no policy of its own; see the module docs.
#[derive(Debug, Default)]
pub struct EmbeddedResources {
    map: RelationMap<Box<dyn HalResource>>,
}

impl EmbeddedResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.map.len() == 0
    }
}

/// Read-only view of embedded resources bound to a link collection.
#[derive(Debug, Clone, Copy)]
pub struct ResourceCollection<'a> {
    links: &'a LinkCollection,
    resources: &'a EmbeddedResources,
}

impl<'a> ResourceCollection<'a> {
    pub fn bind(links: &'a LinkCollection, resources: &'a EmbeddedResources) -> Self {
        Self { links, resources }
    }

    /// Embedded resources of `relation`; empty for an unknown relation.
    pub fn get(&self, relation: &str) -> &'a [Box<dyn HalResource>] {
        self.resources.map.get(relation)
    }

    pub fn first(&self, relation: &str) -> Option<&'a dyn HalResource> {
        self.get(relation).first().map(|resource| &**resource)
    }

    pub fn contains(&self, relation: &str) -> bool {
        self.resources.map.contains(relation)
    }

    /// Whether this exact resource instance is embedded under `relation`.
    pub fn contains_resource(&self, relation: &str, resource: &dyn HalResource) -> bool {
        self.get(relation).iter().any(|candidate| same(&**candidate, resource))
    }

    /// Whether this exact resource instance is embedded under any relation.
    pub fn contains_any(&self, resource: &dyn HalResource) -> bool {
        self.resources.map.all().any(|candidate| same(&**candidate, resource))
    }

    /// Singularity is read from the bound link collection.
    pub fn is_singular(&self, relation: &str) -> bool {
        self.links.is_singular(relation)
    }

    /// The relation names embedded resources may use: the link relations.
    pub fn allowed_relations(&self) -> impl Iterator<Item = &'a str> {
        self.links.relation_names()
    }

    pub fn is_allowed(&self, relation: &str) -> bool {
        self.links.contains(relation)
    }

    pub fn len(&self) -> usize {
        self.resources.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.resources.map.item_count()
    }

    pub fn relation_names(&self) -> impl Iterator<Item = &'a str> {
        self.resources.map.names()
    }

    pub fn all(&self) -> impl Iterator<Item = &'a dyn HalResource> {
        self.resources.map.all().map(|resource| &**resource)
    }

    pub fn iter(&self) -> Iter<'a, Box<dyn HalResource>> {
        self.resources.map.iter(self.links.as_relations().singular_set())
    }
}

impl<'a> IntoIterator for ResourceCollection<'a> {
    type Item = crate::relation::RelationEntry<'a, Box<dyn HalResource>>;
    type IntoIter = Iter<'a, Box<dyn HalResource>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Mutable view of embedded resources bound to a link collection.
#[derive(Debug)]
pub struct ResourceCollectionMut<'a> {
    links: &'a mut LinkCollection,
    resources: &'a mut EmbeddedResources,
}

impl<'a> ResourceCollectionMut<'a> {
    pub fn bind(links: &'a mut LinkCollection, resources: &'a mut EmbeddedResources) -> Self {
        Self { links, resources }
    }

    /// Reborrow as a read-only view.
    pub fn as_view(&self) -> ResourceCollection<'_> {
        ResourceCollection::bind(self.links, self.resources)
    }

    /// Embed `resource` under `relation`.
    ///
    /// Fails with [`HalError::InvalidOperation`] if the bound link collection
    /// has no `relation`, or if the relation is singular and occupied.
    pub fn add(&mut self, relation: &str, resource: impl HalResource) -> Result<()> {
        self.add_boxed(relation, Box::new(resource))
    }

    pub fn add_boxed(&mut self, relation: &str, resource: Box<dyn HalResource>) -> Result<()> {
        self.check_declared(relation)?;
        let singular = self.links.is_singular(relation);
        self.resources.map.push(relation, resource, singular)
    }

    /// Embed every resource in order, failing fast. An empty `resources`
    /// still registers the relation.
    pub fn add_all<I>(&mut self, relation: &str, resources: I) -> Result<()>
    where
        I: IntoIterator<Item = Box<dyn HalResource>>,
    {
        self.check_declared(relation)?;
        self.resources.map.touch(relation);
        for resource in resources {
            self.add_boxed(relation, resource)?;
        }
        Ok(())
    }

    /// Replace `relation` with the single `resource`.
    pub fn set(&mut self, relation: &str, resource: impl HalResource) -> Result<()> {
        self.set_boxed(relation, Box::new(resource))
    }

    pub fn set_boxed(&mut self, relation: &str, resource: Box<dyn HalResource>) -> Result<()> {
        self.check_declared(relation)?;
        self.resources.map.remove(relation);
        self.add_boxed(relation, resource)
    }

    pub fn set_all<I>(&mut self, relation: &str, resources: I) -> Result<()>
    where
        I: IntoIterator<Item = Box<dyn HalResource>>,
    {
        self.check_declared(relation)?;
        self.resources.map.remove(relation);
        self.add_all(relation, resources)
    }

    /// Embedded resources of `relation`, for in-place edits.
    pub fn get_mut(&mut self, relation: &str) -> &mut [Box<dyn HalResource>] {
        self.resources.map.get_mut(relation)
    }

    pub fn remove(&mut self, relation: &str) -> bool {
        self.resources.map.remove(relation)
    }

    /// Remove every embedded resource. Links and singular markings are kept.
    pub fn clear(&mut self) {
        self.resources.map.clear();
    }

    /// Mark `relation` singular on the bound link collection, which makes it
    /// singular for links and embedded resources alike.
    pub fn mark_singular(&mut self, relation: &str) -> Result<()> {
        self.links.mark_singular(relation)
    }

    fn check_declared(&self, relation: &str) -> Result<()> {
        validate_relation(relation)?;
        if !self.links.contains(relation) {
            tracing::debug!(relation, "rejected embedded resource under undeclared relation");
            return Err(HalError::InvalidOperation(format!(
                "cannot embed a resource under {relation:?}: the resource has no {relation:?} link relation"
            )));
        }
        Ok(())
    }
}

fn same(candidate: &dyn HalResource, resource: &dyn HalResource) -> bool {
    std::ptr::addr_eq(candidate as *const dyn HalResource, resource as *const dyn HalResource)
}

// --- tests -------------------------------------------------------------------
