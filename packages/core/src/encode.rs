//! Writing resources and relation collections as HAL+JSON.
//!
//! A relation is written as a single JSON object when it is singular and
//! holds exactly one item; in every other case, including an empty
//! relation, it is written as an array. A resource is written as `_links`
//! (omitted when empty), then its payload fields, then `_embedded`
//! (omitted when empty). An embedded relation whose link relation has been
//! removed since the resources were added is not written: encoding fails
//! with [`HalError::InvalidOperation`], as decoding the output would.
//!
//! Relation collections and link collections implement [`Serialize`]
//! directly. Resources do too, but the functions here keep
//! [`HalError::InvalidArgument`] from a bad payload distinct from writer
//! failures, which come back as [`HalError::Serialization`].

use std::io;

use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::embedded::ResourceCollection;
use crate::error::{HalError, Result};
use crate::links::LinkCollection;
use crate::relation::{RelationCollection, RelationEntry};
use crate::resource::{check_reserved, HalResource, Resource, ResourceData, EMBEDDED, LINKS};

/// Encode `resource` as a JSON value.
pub fn to_value<R: HalResource + ?Sized>(resource: &R) -> Result<Value> {
    let mut object = Map::new();

    let links = resource.links();
    if !links.is_empty() {
        let value = serde_json::to_value(links).map_err(serialization)?;
        object.insert(LINKS.to_string(), value);
    }

    let fields = resource.data_fields()?;
    check_reserved(&fields)?;
    object.extend(fields);

    let embedded = resource.embedded();
    if !embedded.is_empty() {
        object.insert(EMBEDDED.to_string(), embedded_to_value(embedded)?);
    }

    tracing::trace!(
        links = links.len(),
        embedded = embedded.len(),
        "encoded resource"
    );
    Ok(Value::Object(object))
}

pub fn to_string<R: HalResource + ?Sized>(resource: &R) -> Result<String> {
    serde_json::to_string(&to_value(resource)?).map_err(serialization)
}

pub fn to_string_pretty<R: HalResource + ?Sized>(resource: &R) -> Result<String> {
    serde_json::to_string_pretty(&to_value(resource)?).map_err(serialization)
}

pub fn to_vec<R: HalResource + ?Sized>(resource: &R) -> Result<Vec<u8>> {
    serde_json::to_vec(&to_value(resource)?).map_err(serialization)
}

pub fn to_writer<W: io::Write, R: HalResource + ?Sized>(writer: W, resource: &R) -> Result<()> {
    serde_json::to_writer(writer, &to_value(resource)?).map_err(serialization)
}

fn embedded_to_value(embedded: ResourceCollection<'_>) -> Result<Value> {
    let mut object = Map::new();
    for entry in embedded {
        if !embedded.is_allowed(entry.relation) {
            tracing::debug!(relation = entry.relation, "embedded relation lost its link relation");
            return Err(HalError::InvalidOperation(format!(
                "cannot write embedded relation {:?}: the resource has no {:?} link relation",
                entry.relation, entry.relation
            )));
        }
        let value = if entry.is_single_object() {
            to_value(&*entry.items[0])?
        } else {
            Value::Array(
                entry
                    .items
                    .iter()
                    .map(|resource| to_value(&**resource))
                    .collect::<Result<_>>()?,
            )
        };
        object.insert(entry.relation.to_string(), value);
    }
    Ok(Value::Object(object))
}

fn serialization(err: serde_json::Error) -> HalError {
    HalError::Serialization(err.to_string())
}

// --- Serialize impls ---------------------------------------------------------

fn serialize_relations<'a, T, I, S>(entries: I, len: usize, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: Serialize + 'a,
    I: Iterator<Item = RelationEntry<'a, T>>,
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(len))?;
    for entry in entries {
        if entry.is_single_object() {
            map.serialize_entry(entry.relation, &entry.items[0])?;
        } else {
            map.serialize_entry(entry.relation, entry.items)?;
        }
    }
    map.end()
}

impl<T: Serialize> Serialize for RelationCollection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_relations(self.iter(), self.len(), serializer)
    }
}

impl Serialize for LinkCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_relations(self.iter(), self.len(), serializer)
    }
}

impl Serialize for ResourceCollection<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        embedded_to_value(*self).map_err(S::Error::custom)?.serialize(serializer)
    }
}

impl Serialize for dyn HalResource {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        to_value(self).map_err(S::Error::custom)?.serialize(serializer)
    }
}

impl<T: ResourceData> Serialize for Resource<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        to_value(self).map_err(S::Error::custom)?.serialize(serializer)
    }
}

// --- tests -------------------------------------------------------------------
