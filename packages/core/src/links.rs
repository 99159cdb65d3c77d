//! The `_links` collection of a resource.

use std::ops::Index;

use crate::curie::{is_curie, split_curie, Curie, CURIES};
use crate::error::{HalError, Result};
use crate::link::LinkObject;
use crate::relation::{validate_relation, Iter, RelationCollection};

/// The reserved relation pointing at the resource itself.
pub const SELF: &str = "self";

/// A relation collection of link objects.
///
/// `self` is singular from construction. Anything added under `curies` must
/// pass [`is_curie`]; otherwise the add fails with
/// [`HalError::InvalidOperation`].
#[derive(Debug, Clone, PartialEq)]
pub struct LinkCollection {
    links: RelationCollection<LinkObject>,
}

impl Default for LinkCollection {
    fn default() -> Self {
        let mut links = RelationCollection::new();
        links.mark_singular(SELF).expect("`self` is a valid relation name");
        Self { links }
    }
}

impl LinkCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, relation: &str, link: impl Into<LinkObject>) -> Result<()> {
        let link = link.into();
        check_curie(relation, &link)?;
        self.links.add(relation, link)
    }

    /// Add every link in order, failing fast; see
    /// [`RelationCollection::add_all`].
    pub fn add_all<I, L>(&mut self, relation: &str, links: I) -> Result<()>
    where
        I: IntoIterator<Item = L>,
        L: Into<LinkObject>,
    {
        self.links.add_all(relation, std::iter::empty())?;
        for link in links {
            self.add(relation, link)?;
        }
        Ok(())
    }

    /// Replace `relation` with the single `link`. Curie validation runs
    /// before anything is removed.
    pub fn set(&mut self, relation: &str, link: impl Into<LinkObject>) -> Result<()> {
        let link = link.into();
        validate_relation(relation)?;
        check_curie(relation, &link)?;
        self.links.set(relation, link)
    }

    pub fn set_all<I, L>(&mut self, relation: &str, links: I) -> Result<()>
    where
        I: IntoIterator<Item = L>,
        L: Into<LinkObject>,
    {
        validate_relation(relation)?;
        let links: Vec<LinkObject> = links.into_iter().map(Into::into).collect();
        for link in &links {
            check_curie(relation, link)?;
        }
        self.links.set_all(relation, links)
    }

    pub fn get(&self, relation: &str) -> &[LinkObject] {
        self.links.get(relation)
    }

    pub fn first(&self, relation: &str) -> Option<&LinkObject> {
        self.links.first(relation)
    }

    pub fn contains(&self, relation: &str) -> bool {
        self.links.contains(relation)
    }

    pub fn contains_item(&self, relation: &str, link: &LinkObject) -> bool {
        self.links.contains_item(relation, link)
    }

    pub fn contains_any(&self, link: &LinkObject) -> bool {
        self.links.contains_any(link)
    }

    /// Remove `relation` and its links. Resources embedded under the same
    /// relation stay, but the owning resource no longer encodes until the
    /// link relation is added back.
    pub fn remove(&mut self, relation: &str) -> bool {
        self.links.remove(relation)
    }

    pub fn mark_singular(&mut self, relation: &str) -> Result<()> {
        self.links.mark_singular(relation)
    }

    pub fn is_singular(&self, relation: &str) -> bool {
        self.links.is_singular(relation)
    }

    pub fn singular_relations(&self) -> impl Iterator<Item = &str> {
        self.links.singular_relations()
    }

    /// Remove every link; singular markings (including `self`) are kept.
    pub fn clear(&mut self) {
        self.links.clear();
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.links.item_count()
    }

    pub fn relation_names(&self) -> impl Iterator<Item = &str> {
        self.links.relation_names()
    }

    pub fn all(&self) -> impl Iterator<Item = &LinkObject> {
        self.links.all()
    }

    pub fn iter(&self) -> Iter<'_, LinkObject> {
        self.links.iter()
    }

    /// The relation collection underneath, for read-only generic use.
    pub fn as_relations(&self) -> &RelationCollection<LinkObject> {
        &self.links
    }

    /// The `self` link, if present.
    pub fn self_link(&self) -> Option<&LinkObject> {
        self.links.first(SELF)
    }

    /// Replace the `self` link.
    pub fn set_self(&mut self, link: impl Into<LinkObject>) -> Result<()> {
        self.set(SELF, link)
    }

    /// All links under `curies`, as curies.
    ///
    /// Every item there passed [`is_curie`] when it was added, so the
    /// conversion cannot fail for links added through this collection.
    pub fn curies(&self) -> Vec<Curie> {
        self.links
            .get(CURIES)
            .iter()
            .filter_map(|link| Curie::try_from(link.clone()).ok())
            .collect()
    }

    /// The curie called `name`.
    pub fn curie(&self, name: &str) -> Option<Curie> {
        self.curies().into_iter().find(|curie| curie.name() == name)
    }

    /// Expand a CURIE relation such as `ea:basket` using the curies declared
    /// in this collection. `None` if `relation` is not a CURIE or its prefix
    /// is not declared here.
    pub fn expand_relation(&self, relation: &str) -> Option<String> {
        let (prefix, reference) = split_curie(relation)?;
        self.curie(prefix).map(|curie| curie.expand(reference))
    }
}

impl Index<&str> for LinkCollection {
    type Output = [LinkObject];

    fn index(&self, relation: &str) -> &[LinkObject] {
        self.get(relation)
    }
}

impl<'a> IntoIterator for &'a LinkCollection {
    type Item = crate::relation::RelationEntry<'a, LinkObject>;
    type IntoIter = Iter<'a, LinkObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// --- helpers -----------------------------------------------------------------

fn check_curie(relation: &str, link: &LinkObject) -> Result<()> {
    if relation == CURIES && !is_curie(link) {
        tracing::debug!(href = link.as_link().href(), "rejected non-curie under `curies`");
        return Err(HalError::InvalidOperation(format!(
            "the `curies` relation only accepts curies, but {:?} is not a valid curie",
            link.as_link().href()
        )));
    }
    Ok(())
}

// --- tests -------------------------------------------------------------------
