//! Reading HAL+JSON into resources and relation collections.
//!
//! Decoding streams through serde: each relation value is read as an array
//! (every element decoded, then added together) or as a single object
//! (the relation is marked singular, then the item added). Anything else
//! fails with [`HalError::Deserialization`].
//!
//! Which type an item decodes to is decided per relation by an
//! [`ItemResolver`]:
//!
//! - [`LinkTypes`] picks [`Link`] or [`Curie`] for each link relation;
//! - [`ResourceTypes`] picks the concrete resource type for each embedded
//!   relation;
//! - [`Uniform`] decodes every relation as the same `T`.
//!
//! Errors raised by the collections themselves (a second item in a
//! singular relation, a non-curie under `curies`, an embedded relation
//! with no matching link) come back with their own [`HalError`] variant,
//! as does any error returned by a custom resolver.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::value::MapAccessDeserializer;
use serde::de::{self, DeserializeOwned, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::curie::Curie;
use crate::error::{HalError, Result};
use crate::link::{Link, LinkObject};
use crate::links::LinkCollection;
use crate::relation::RelationCollection;
use crate::resource::{HalResource, HasEmbedded, Resource, ResourceData, EMBEDDED, LINKS};

// --- resolvers ---------------------------------------------------------------

/// Decides how the items of a relation are decoded.
pub trait ItemResolver<T> {
    fn deserialize_item<'de, D>(&self, relation: &str, deserializer: D) -> std::result::Result<T, D::Error>
    where
        D: Deserializer<'de>;
}

/// Decodes every relation as `T`.
pub struct Uniform<T>(PhantomData<fn() -> T>);

impl<T> Uniform<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Uniform<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> ItemResolver<T> for Uniform<T> {
    fn deserialize_item<'de, D>(&self, _relation: &str, deserializer: D) -> std::result::Result<T, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer)
    }
}

/// The concrete shape of a decoded link object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkKind {
    #[default]
    Link,
    Curie,
}

/// Per-relation link kinds.
///
/// The default maps `curies` to [`LinkKind::Curie`] and everything else to
/// [`LinkKind::Link`], so declared curies decode as [`Curie`] values. An
/// item under a [`LinkKind::Curie`] relation that is not a valid curie
/// decodes as a plain [`Link`]; a [`LinkCollection`] then rejects it under
/// `curies` with [`HalError::InvalidOperation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTypes {
    default: LinkKind,
    relations: HashMap<String, LinkKind>,
}

impl Default for LinkTypes {
    fn default() -> Self {
        Self::plain().with(crate::curie::CURIES, LinkKind::Curie)
    }
}

impl LinkTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every relation as a plain [`Link`], `curies` included.
    pub fn plain() -> Self {
        Self {
            default: LinkKind::Link,
            relations: HashMap::new(),
        }
    }

    pub fn with(mut self, relation: impl Into<String>, kind: LinkKind) -> Self {
        self.relations.insert(relation.into(), kind);
        self
    }

    pub fn with_default(mut self, kind: LinkKind) -> Self {
        self.default = kind;
        self
    }

    pub fn kind_for(&self, relation: &str) -> LinkKind {
        self.relations.get(relation).copied().unwrap_or(self.default)
    }
}

impl ItemResolver<LinkObject> for LinkTypes {
    fn deserialize_item<'de, D>(&self, relation: &str, deserializer: D) -> std::result::Result<LinkObject, D::Error>
    where
        D: Deserializer<'de>,
    {
        match self.kind_for(relation) {
            LinkKind::Link => Link::deserialize(deserializer).map(LinkObject::Link),
            // a link that is not a curie is left for the collection to reject
            LinkKind::Curie => {
                let link = Link::deserialize(deserializer)?;
                Ok(Curie::try_from(link.clone()).map_or(LinkObject::Link(link), LinkObject::Curie))
            }
        }
    }
}

type DecodeFn = dyn Fn(&Decoder, Value) -> Result<Box<dyn HalResource>> + Send + Sync;

/// Per-relation types for embedded resources.
///
/// Unregistered relations decode as the default type,
/// [`JsonResource`](crate::JsonResource)
/// unless changed with [`with_default`](ResourceTypes::with_default).
#[derive(Clone)]
pub struct ResourceTypes {
    default: Arc<DecodeFn>,
    relations: HashMap<String, Arc<DecodeFn>>,
}

impl Default for ResourceTypes {
    fn default() -> Self {
        Self {
            default: typed::<Map<String, Value>>(),
            relations: HashMap::new(),
        }
    }
}

impl fmt::Debug for ResourceTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut relations: Vec<&str> = self.relations.keys().map(String::as_str).collect();
        relations.sort_unstable();
        f.debug_struct("ResourceTypes").field("relations", &relations).finish_non_exhaustive()
    }
}

impl ResourceTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode resources embedded under `relation` as `Resource<T>`.
    pub fn register<T: ResourceData>(mut self, relation: impl Into<String>) -> Self {
        self.relations.insert(relation.into(), typed::<T>());
        self
    }

    /// Decode resources embedded under `relation` with `decode`, which
    /// receives the decoder in use and the resource's JSON object.
    pub fn register_with<F>(mut self, relation: impl Into<String>, decode: F) -> Self
    where
        F: Fn(&Decoder, Value) -> Result<Box<dyn HalResource>> + Send + Sync + 'static,
    {
        self.relations.insert(relation.into(), Arc::new(decode));
        self
    }

    pub fn with_default<T: ResourceData>(mut self) -> Self {
        self.default = typed::<T>();
        self
    }

    pub fn is_registered(&self, relation: &str) -> bool {
        self.relations.contains_key(relation)
    }

    fn decode(&self, decoder: &Decoder, relation: &str, value: Value) -> Result<Box<dyn HalResource>> {
        let decode: &DecodeFn = &**self.relations.get(relation).unwrap_or(&self.default);
        decode(decoder, value)
    }
}

fn typed<T: ResourceData>() -> Arc<DecodeFn> {
    Arc::new(|decoder: &Decoder, value: Value| {
        let resource = decoder.resource_from_value::<T>(value)?;
        Ok(Box::new(resource) as Box<dyn HalResource>)
    })
}

// --- decoder -----------------------------------------------------------------

/// Reads HAL+JSON using a set of link and resource types.
///
/// ```
/// # use societatis_hal::{Decoder, HasEmbedded, Resource, ResourceTypes};
/// #[derive(Debug, serde::Serialize, serde::Deserialize)]
/// struct Order { total: f64 }
///
/// let decoder = Decoder::new()
///     .with_resource_types(ResourceTypes::new().register::<Order>("ea:order"));
/// let orders = decoder
///     .resource_from_str::<()>(r#"{
///         "_links": { "ea:order": [{ "href": "/orders/123" }] },
///         "_embedded": { "ea:order": [{ "total": 30.0 }] }
///     }"#)
///     .unwrap();
/// let order = orders.embedded().first("ea:order").unwrap();
/// assert_eq!(order.downcast_ref::<Resource<Order>>().unwrap().data().total, 30.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    link_types: LinkTypes,
    resource_types: ResourceTypes,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_link_types(mut self, link_types: LinkTypes) -> Self {
        self.link_types = link_types;
        self
    }

    pub fn with_resource_types(mut self, resource_types: ResourceTypes) -> Self {
        self.resource_types = resource_types;
        self
    }

    pub fn link_types(&self) -> &LinkTypes {
        &self.link_types
    }

    pub fn resource_types(&self) -> &ResourceTypes {
        &self.resource_types
    }

    pub fn resource_from_str<T: ResourceData>(&self, json: &str) -> Result<Resource<T>> {
        let ctx = Context::new(self);
        let result = read_with(serde_json::de::StrRead::new(json), |de| ResourceSeed::<T>::new(&ctx).deserialize(de));
        ctx.finish(result)
    }

    pub fn resource_from_slice<T: ResourceData>(&self, json: &[u8]) -> Result<Resource<T>> {
        let ctx = Context::new(self);
        let result = read_with(serde_json::de::SliceRead::new(json), |de| ResourceSeed::<T>::new(&ctx).deserialize(de));
        ctx.finish(result)
    }

    pub fn resource_from_reader<T: ResourceData, R: io::Read>(&self, reader: R) -> Result<Resource<T>> {
        let ctx = Context::new(self);
        let result = read_with(serde_json::de::IoRead::new(reader), |de| ResourceSeed::<T>::new(&ctx).deserialize(de));
        ctx.finish(result)
    }

    pub fn resource_from_value<T: ResourceData>(&self, value: Value) -> Result<Resource<T>> {
        let ctx = Context::new(self);
        let result = ResourceSeed::<T>::new(&ctx).deserialize(value);
        ctx.finish(result)
    }

    /// Read a bare `_links` object.
    pub fn links_from_str(&self, json: &str) -> Result<LinkCollection> {
        let ctx = Context::new(self);
        let result = read_with(serde_json::de::StrRead::new(json), |de| {
            RelationsSeed::new(&ctx, &self.link_types, LinkCollection::new()).deserialize(de)
        });
        ctx.finish(result)
    }

    pub fn links_from_value(&self, value: Value) -> Result<LinkCollection> {
        let ctx = Context::new(self);
        let result = RelationsSeed::new(&ctx, &self.link_types, LinkCollection::new()).deserialize(value);
        ctx.finish(result)
    }

    /// Read a bare relation object whose items are all `T`.
    pub fn relations_from_str<T: DeserializeOwned>(&self, json: &str) -> Result<RelationCollection<T>> {
        self.relations_from_str_with(json, &Uniform::<T>::new())
    }

    pub fn relations_from_str_with<T, R>(&self, json: &str, resolver: &R) -> Result<RelationCollection<T>>
    where
        R: ItemResolver<T>,
    {
        let ctx = Context::new(self);
        let result = read_with(serde_json::de::StrRead::new(json), |de| {
            RelationsSeed::new(&ctx, resolver, RelationCollection::new()).deserialize(de)
        });
        ctx.finish(result)
    }
}

/// Read a resource with the default [`Decoder`].
pub fn from_str<T: ResourceData>(json: &str) -> Result<Resource<T>> {
    Decoder::default().resource_from_str(json)
}

pub fn from_slice<T: ResourceData>(json: &[u8]) -> Result<Resource<T>> {
    Decoder::default().resource_from_slice(json)
}

pub fn from_reader<T: ResourceData, R: io::Read>(reader: R) -> Result<Resource<T>> {
    Decoder::default().resource_from_reader(reader)
}

pub fn from_value<T: ResourceData>(value: Value) -> Result<Resource<T>> {
    Decoder::default().resource_from_value(value)
}

pub fn links_from_str(json: &str) -> Result<LinkCollection> {
    Decoder::default().links_from_str(json)
}

pub fn relations_from_str<T: DeserializeOwned>(json: &str) -> Result<RelationCollection<T>> {
    Decoder::default().relations_from_str(json)
}

fn read_with<'de, R, V, F>(read: R, decode: F) -> serde_json::Result<V>
where
    R: serde_json::de::Read<'de>,
    F: FnOnce(&mut serde_json::Deserializer<R>) -> serde_json::Result<V>,
{
    let mut de = serde_json::Deserializer::new(read);
    let value = decode(&mut de)?;
    de.end()?;
    Ok(value)
}

// --- serde plumbing ----------------------------------------------------------

/// State shared by one decode call. Keeps the first domain error so it can
/// be returned as-is once serde has unwound.
struct Context<'d> {
    decoder: &'d Decoder,
    failure: RefCell<Option<HalError>>,
}

impl<'d> Context<'d> {
    fn new(decoder: &'d Decoder) -> Self {
        Self {
            decoder,
            failure: RefCell::new(None),
        }
    }

    fn fail<E: de::Error>(&self, err: HalError) -> E {
        let message = err.to_string();
        let mut slot = self.failure.borrow_mut();
        if slot.is_none() {
            *slot = Some(err);
        }
        E::custom(message)
    }

    fn finish<V>(self, result: serde_json::Result<V>) -> Result<V> {
        result.map_err(|err| {
            self.failure
                .into_inner()
                .unwrap_or_else(|| HalError::Deserialization(err.to_string()))
        })
    }
}

/// Where decoded relation items go.
trait RelationSink {
    type Item;

    fn add_many(&mut self, relation: &str, items: Vec<Self::Item>) -> Result<()>;
    fn add_single(&mut self, relation: &str, item: Self::Item) -> Result<()>;
}

impl<T> RelationSink for RelationCollection<T> {
    type Item = T;

    fn add_many(&mut self, relation: &str, items: Vec<T>) -> Result<()> {
        self.add_all(relation, items)
    }

    fn add_single(&mut self, relation: &str, item: T) -> Result<()> {
        self.mark_singular(relation)?;
        self.add(relation, item)
    }
}

impl RelationSink for LinkCollection {
    type Item = LinkObject;

    fn add_many(&mut self, relation: &str, items: Vec<LinkObject>) -> Result<()> {
        self.add_all(relation, items)
    }

    fn add_single(&mut self, relation: &str, item: LinkObject) -> Result<()> {
        self.mark_singular(relation)?;
        self.add(relation, item)
    }
}

/// An `_embedded` relation read but not yet attached. `_embedded` may come
/// before `_links` in the document, and the embedding check needs the links.
struct StagedRelation {
    relation: String,
    singular: bool,
    resources: Vec<Box<dyn HalResource>>,
}

impl RelationSink for Vec<StagedRelation> {
    type Item = Box<dyn HalResource>;

    fn add_many(&mut self, relation: &str, resources: Vec<Box<dyn HalResource>>) -> Result<()> {
        self.push(StagedRelation {
            relation: relation.to_string(),
            singular: false,
            resources,
        });
        Ok(())
    }

    fn add_single(&mut self, relation: &str, resource: Box<dyn HalResource>) -> Result<()> {
        self.push(StagedRelation {
            relation: relation.to_string(),
            singular: true,
            resources: vec![resource],
        });
        Ok(())
    }
}

struct EmbeddedResolver<'c> {
    ctx: &'c Context<'c>,
}

impl ItemResolver<Box<dyn HalResource>> for EmbeddedResolver<'_> {
    fn deserialize_item<'de, D>(&self, relation: &str, deserializer: D) -> std::result::Result<Box<dyn HalResource>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let decoder = self.ctx.decoder;
        decoder
            .resource_types
            .decode(decoder, relation, value)
            .map_err(|err| self.ctx.fail(err))
    }
}

/// Reads a relation object into a sink.
struct RelationsSeed<'c, R, S> {
    ctx: &'c Context<'c>,
    resolver: &'c R,
    sink: S,
}

impl<'c, R, S> RelationsSeed<'c, R, S> {
    fn new(ctx: &'c Context<'c>, resolver: &'c R, sink: S) -> Self {
        Self { ctx, resolver, sink }
    }
}

impl<'de, R, S> DeserializeSeed<'de> for RelationsSeed<'_, R, S>
where
    S: RelationSink,
    R: ItemResolver<S::Item>,
{
    type Value = S;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<S, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de, R, S> Visitor<'de> for RelationsSeed<'_, R, S>
where
    S: RelationSink,
    R: ItemResolver<S::Item>,
{
    type Value = S;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a relation object")
    }

    fn visit_map<A: MapAccess<'de>>(mut self, mut map: A) -> std::result::Result<S, A::Error> {
        while let Some(relation) = map.next_key::<String>()? {
            map.next_value_seed(RelationValueSeed {
                ctx: self.ctx,
                resolver: self.resolver,
                relation: &relation,
                sink: &mut self.sink,
            })?;
        }
        Ok(self.sink)
    }
}

/// Reads one relation value: an array of items or a single item.
struct RelationValueSeed<'a, 'c, R, S> {
    ctx: &'c Context<'c>,
    resolver: &'c R,
    relation: &'a str,
    sink: &'a mut S,
}

impl<'de, R, S> DeserializeSeed<'de> for RelationValueSeed<'_, '_, R, S>
where
    S: RelationSink,
    R: ItemResolver<S::Item>,
{
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de, R, S> Visitor<'de> for RelationValueSeed<'_, '_, R, S>
where
    S: RelationSink,
    R: ItemResolver<S::Item>,
{
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "array or object as value of relation {:?}", self.relation)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<(), A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element_seed(ItemSeed::<S::Item, R> {
            resolver: self.resolver,
            relation: self.relation,
            item: PhantomData,
        })? {
            items.push(item);
        }
        self.sink
            .add_many(self.relation, items)
            .map_err(|err| self.ctx.fail(err))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> std::result::Result<(), A::Error> {
        let item = self
            .resolver
            .deserialize_item(self.relation, MapAccessDeserializer::new(map))?;
        tracing::trace!(relation = self.relation, "single-object relation marked singular");
        self.sink
            .add_single(self.relation, item)
            .map_err(|err| self.ctx.fail(err))
    }
}

struct ItemSeed<'a, T, R> {
    resolver: &'a R,
    relation: &'a str,
    item: PhantomData<fn() -> T>,
}

impl<'de, T, R: ItemResolver<T>> DeserializeSeed<'de> for ItemSeed<'_, T, R> {
    type Value = T;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<T, D::Error> {
        self.resolver.deserialize_item(self.relation, deserializer)
    }
}

/// Reads a whole resource object.
struct ResourceSeed<'c, T> {
    ctx: &'c Context<'c>,
    data: PhantomData<fn() -> T>,
}

impl<'c, T> ResourceSeed<'c, T> {
    fn new(ctx: &'c Context<'c>) -> Self {
        Self { ctx, data: PhantomData }
    }
}

impl<'de, T: ResourceData> DeserializeSeed<'de> for ResourceSeed<'_, T> {
    type Value = Resource<T>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Resource<T>, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de, T: ResourceData> Visitor<'de> for ResourceSeed<'_, T> {
    type Value = Resource<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a HAL resource object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Resource<T>, A::Error> {
        let ctx = self.ctx;
        let mut links = LinkCollection::new();
        let mut staged: Vec<StagedRelation> = Vec::new();
        let mut fields = Map::new();

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                LINKS => {
                    links = map.next_value_seed(RelationsSeed::new(ctx, &ctx.decoder.link_types, links))?;
                }
                EMBEDDED => {
                    let resolver = EmbeddedResolver { ctx };
                    staged = map.next_value_seed(RelationsSeed::new(ctx, &resolver, staged))?;
                }
                _ => {
                    let value: Value = map.next_value()?;
                    fields.insert(key, value);
                }
            }
        }

        let data = decode_payload::<T>(fields).map_err(|err| ctx.fail::<A::Error>(err))?;
        let mut resource = Resource::with_links(data, links);
        attach_embedded(&mut resource, staged).map_err(|err| ctx.fail::<A::Error>(err))?;
        Ok(resource)
    }
}

fn attach_embedded<T>(resource: &mut Resource<T>, staged: Vec<StagedRelation>) -> Result<()> {
    let mut embedded = resource.embedded_mut();
    for StagedRelation { relation, singular, resources } in staged {
        if singular {
            embedded.mark_singular(&relation)?;
        }
        embedded.add_all(&relation, resources)?;
    }
    Ok(())
}

/// Decode the payload from the fields left after `_links` and `_embedded`.
/// Payloads that decode from `null`, such as `()` or `Option<_>`, are
/// accepted whatever the fields; the fields are then ignored.
fn decode_payload<T: DeserializeOwned>(fields: Map<String, Value>) -> Result<T> {
    match serde_json::from_value(Value::Object(fields)) {
        Ok(data) => Ok(data),
        Err(err) => serde_json::from_value(Value::Null).map_err(|_| payload_error(err)),
    }
}

fn payload_error(err: serde_json::Error) -> HalError {
    HalError::Deserialization(format!("resource data: {err}"))
}

// --- Deserialize impls -------------------------------------------------------

impl<'de, T: DeserializeOwned> Deserialize<'de> for RelationCollection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let decoder = Decoder::default();
        let ctx = Context::new(&decoder);
        RelationsSeed::new(&ctx, &Uniform::<T>::new(), RelationCollection::new()).deserialize(deserializer)
    }
}

impl<'de> Deserialize<'de> for LinkCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let decoder = Decoder::default();
        let ctx = Context::new(&decoder);
        RelationsSeed::new(&ctx, &decoder.link_types, LinkCollection::new()).deserialize(deserializer)
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curie::CURIES;
    use crate::link::HasTarget;
    use crate::resource::{HasLinks, JsonResource};
    use serde::Serialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Summary {
        currently_processing: u32,
        shipped_today: u32,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Order {
        total: f64,
        currency: String,
    }

    #[test]
    fn array_and_object_relations() {
        let links = links_from_str(
            r#"{ "self": { "href": "/orders" }, "next": [{ "href": "/orders?page=2" }] }"#,
        )
        .unwrap();
        assert!(links.is_singular("self"));
        assert!(!links.is_singular("next"));
        assert_eq!(links.get("next")[0].href(), "/orders?page=2");
    }

    #[test]
    fn object_relation_is_marked_singular() {
        let relations: RelationCollection<u32> = Decoder::new()
            .relations_from_str_with(r#"{ "a": { "x": 1 } }"#, &ObjectLen)
            .unwrap();
        assert!(relations.is_singular("a"));
        assert_eq!(relations.get("a"), [1]);
    }

    /// Decodes any object as its number of keys.
    struct ObjectLen;

    impl ItemResolver<u32> for ObjectLen {
        fn deserialize_item<'de, D>(&self, _relation: &str, deserializer: D) -> std::result::Result<u32, D::Error>
        where
            D: Deserializer<'de>,
        {
            Map::<String, Value>::deserialize(deserializer).map(|m| m.len() as u32)
        }
    }

    #[test]
    fn scalar_relation_value_fails() {
        let err = relations_from_str::<u32>(r#"{ "a": 1 }"#).unwrap_err();
        assert!(matches!(&err, HalError::Deserialization(msg) if msg.contains("array or object")));
    }

    #[test]
    fn empty_array_registers_relation() {
        let relations = relations_from_str::<u32>(r#"{ "a": [] }"#).unwrap();
        assert!(relations.contains("a"));
        assert!(relations.get("a").is_empty());
    }

    #[test]
    fn non_object_top_level_fails() {
        assert!(matches!(links_from_str("[1]"), Err(HalError::Deserialization(_))));
        assert!(matches!(from_str::<()>("42"), Err(HalError::Deserialization(_))));
        assert!(matches!(from_str::<()>("{} trailing"), Err(HalError::Deserialization(_))));
    }

    #[test]
    fn truncated_input_fails() {
        assert!(matches!(links_from_str(r#"{"self":{"href":"/a"}"#), Err(HalError::Deserialization(_))));
        assert!(matches!(links_from_str(""), Err(HalError::Deserialization(_))));
        assert!(matches!(from_str::<()>(""), Err(HalError::Deserialization(_))));
        assert!(matches!(
            from_str::<()>(r#"{"_links":{"self":{"href":"/a"}},"_embedded":{"#),
            Err(HalError::Deserialization(_))
        ));
    }

    #[test]
    fn curies_decode_as_curies() {
        let links = links_from_str(
            r#"{ "curies": [{ "href": "/docs/{rel}", "templated": true, "name": "ea" }] }"#,
        )
        .unwrap();
        assert!(links.get(CURIES)[0].as_curie().is_some());
        assert_eq!(links.expand_relation("ea:order").as_deref(), Some("/docs/order"));
    }

    #[test]
    fn non_curie_under_curies_is_rejected() {
        let err = Decoder::new()
            .with_link_types(LinkTypes::plain())
            .links_from_str(r#"{ "curies": [{ "href": "/docs" }] }"#)
            .unwrap_err();
        assert!(matches!(err, HalError::InvalidOperation(_)));
    }

    #[test]
    fn non_curie_under_curies_is_invalid_operation_by_default() {
        let err = links_from_str(r#"{ "curies": [{ "href": "/docs" }] }"#).unwrap_err();
        assert!(matches!(err, HalError::InvalidOperation(_)));
        let err = from_str::<()>(r#"{ "_links": { "curies": { "href": "/docs" } } }"#).unwrap_err();
        assert!(matches!(err, HalError::InvalidOperation(_)));
    }

    #[test]
    fn blank_curie_name_never_becomes_a_curie() {
        let links = links_from_str(
            r#"{ "curies": [{ "href": "/d/{rel}", "templated": true, "name": "  " }] }"#,
        )
        .unwrap();
        assert!(links.get(CURIES)[0].as_curie().is_none());
        assert!(links.curies().is_empty());
        assert_eq!(links.expand_relation("x:y"), None);
    }

    #[test]
    fn typed_payload_and_links() {
        let summary: Resource<Summary> = from_str(
            r#"{
                "_links": { "self": { "href": "/orders" } },
                "currentlyProcessing": 14,
                "shippedToday": 20
            }"#,
        )
        .unwrap();
        assert_eq!(summary.data().shipped_today, 20);
        assert_eq!(summary.links().self_link().unwrap().href(), "/orders");
    }

    #[test]
    fn embedded_before_links_is_accepted() {
        let decoder = Decoder::new()
            .with_resource_types(ResourceTypes::new().register::<Order>("ea:order"));
        let resource = decoder
            .resource_from_str::<()>(
                r#"{
                    "_embedded": { "ea:order": { "total": 30.0, "currency": "USD" } },
                    "_links": { "ea:order": { "href": "/orders/123" } }
                }"#,
            )
            .unwrap();
        let embedded = resource.embedded();
        assert!(embedded.is_singular("ea:order"));
        let order = embedded.first("ea:order").unwrap();
        assert_eq!(order.downcast_ref::<Resource<Order>>().unwrap().data().currency, "USD");
    }

    #[test]
    fn embedded_without_link_is_invalid_operation() {
        let err = from_str::<()>(r#"{ "_embedded": { "ea:order": [{ "total": 1 }] } }"#).unwrap_err();
        assert!(matches!(err, HalError::InvalidOperation(msg) if msg.contains("ea:order")));
    }

    #[test]
    fn unregistered_embedded_relation_decodes_as_json() {
        let resource = from_str::<()>(
            r#"{ "_links": { "item": [{ "href": "/a" }] }, "_embedded": { "item": [{ "a": 1 }] } }"#,
        )
        .unwrap();
        let item = resource.embedded().first("item").unwrap();
        assert_eq!(item.downcast_ref::<JsonResource>().unwrap().data()["a"], 1);
    }

    #[test]
    fn resolver_errors_propagate_unchanged() {
        let types = ResourceTypes::new().register_with("item", |_, _| {
            Err(HalError::NotFound("no resource type for `item`".into()))
        });
        let err = Decoder::new()
            .with_resource_types(types)
            .resource_from_str::<()>(
                r#"{ "_links": { "item": { "href": "/a" } }, "_embedded": { "item": { "a": 1 } } }"#,
            )
            .unwrap_err();
        assert_eq!(err, HalError::NotFound("no resource type for `item`".into()));
    }

    #[test]
    fn payload_type_mismatch_is_deserialization_error() {
        let err = from_str::<Order>(r#"{ "total": "lots" }"#).unwrap_err();
        assert!(matches!(err, HalError::Deserialization(msg) if msg.starts_with("resource data")));
    }

    #[test]
    fn links_only_document_decodes_into_unit_and_option() {
        from_str::<()>(r#"{ "_links": { "self": { "href": "/" } } }"#).unwrap();
        let none = from_str::<Option<Order>>("{}").unwrap();
        assert!(none.data().is_none());
    }

    #[test]
    fn unit_payload_ignores_data_fields() {
        let resource = from_str::<()>(r#"{ "_links": { "self": { "href": "/" } }, "extra": 1 }"#).unwrap();
        assert_eq!(resource.links().self_link().unwrap().href(), "/");
        // a typed payload that does not fit is still an error
        assert!(from_str::<Order>(r#"{ "extra": 1 }"#).is_err());
    }

    #[test]
    fn serde_deserialize_for_collections() {
        let links: LinkCollection = serde_json::from_str(r#"{ "self": { "href": "/" } }"#).unwrap();
        assert!(links.is_singular("self"));
        let relations: RelationCollection<String> =
            serde_json::from_str(r#"{ "tags": ["a", "b"] }"#).unwrap();
        assert_eq!(relations.get("tags"), ["a", "b"]);
    }
}
