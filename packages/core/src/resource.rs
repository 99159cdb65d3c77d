//! The resource model: capability traits and the generic [`Resource`] type.
//!
//! A HAL resource is a JSON object carrying `_links`, optionally
//! `_embedded`, and the fields of its payload:
//!
//! ```json
//! {
//!   "_links": { "self": { "href": "/orders/123" } },
//!   "total": 30.0,
//!   "currency": "USD",
//!   "_embedded": { ... }
//! }
//! ```
//!
//! [`Resource<T>`] pairs a serde payload `T` with its links and embedded
//! resources. Embedded resources are heterogeneous and stored as
//! `Box<dyn HalResource>`; use [`downcast_ref`](HalResource::downcast_ref)
//! to get the concrete type back.

use std::any::Any;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::embedded::{EmbeddedResources, ResourceCollection, ResourceCollectionMut};
use crate::error::{HalError, Result};
use crate::links::LinkCollection;

/// Reserved property holding the links of a resource.
pub const LINKS: &str = "_links";

/// Reserved property holding the embedded resources of a resource.
pub const EMBEDDED: &str = "_embedded";

pub trait HasLinks {
    fn links(&self) -> &LinkCollection;
    fn links_mut(&mut self) -> &mut LinkCollection;
}

/// Access to `_embedded`, always bound to the resource's own links.
pub trait HasEmbedded {
    fn embedded(&self) -> ResourceCollection<'_>;
    fn embedded_mut(&mut self) -> ResourceCollectionMut<'_>;
}

/// Anything that can be written and stored as a HAL resource.
///
/// Implemented by every [`Resource<T>`]. A custom implementation must keep
/// its embedded view bound to its own link collection, and
/// [`data_fields`](HalResource::data_fields) must not return the reserved
/// `_links` or `_embedded` keys.
pub trait HalResource: HasLinks + HasEmbedded + fmt::Debug + Any {
    /// The payload fields, in the order they are written after `_links`.
    fn data_fields(&self) -> Result<Map<String, Value>>;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn HalResource {
    pub fn is<R: HalResource>(&self) -> bool {
        self.as_any().is::<R>()
    }

    pub fn downcast_ref<R: HalResource>(&self) -> Option<&R> {
        self.as_any().downcast_ref::<R>()
    }

    pub fn downcast_mut<R: HalResource>(&mut self) -> Option<&mut R> {
        self.as_any_mut().downcast_mut::<R>()
    }
}

/// A payload type usable as resource data.
///
/// Blanket-implemented for every owned serde type. `Resource<T>` itself
/// does not implement `Deserialize`, so a resource can never be the data of
/// another resource.
pub trait ResourceData: Serialize + DeserializeOwned + fmt::Debug + 'static {}

impl<T> ResourceData for T where T: Serialize + DeserializeOwned + fmt::Debug + 'static {}

/// A resource whose data is an arbitrary JSON object.
pub type JsonResource = Resource<Map<String, Value>>;

/// A HAL resource with payload `T`.
///
/// `T` must serialise to a JSON object (or to `null`, for a resource with
/// links only; `()` works). Its fields are written flat next to `_links` and
/// `_embedded`.
#[derive(Debug)]
pub struct Resource<T> {
    data: T,
    links: LinkCollection,
    embedded: EmbeddedResources,
}

impl<T: Default> Default for Resource<T> {
    fn default() -> Self {
        Self {
            data: T::default(),
            links: LinkCollection::default(),
            embedded: EmbeddedResources::default(),
        }
    }
}

impl<T> Resource<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            links: LinkCollection::new(),
            embedded: EmbeddedResources::new(),
        }
    }

    /// A resource with pre-built links and no embedded resources.
    pub fn with_links(data: T, links: LinkCollection) -> Self {
        Self {
            data,
            links,
            embedded: EmbeddedResources::new(),
        }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    pub fn set_data(&mut self, data: T) {
        self.data = data;
    }

    pub fn into_data(self) -> T {
        self.data
    }

    /// Split into payload and links, dropping the embedded resources.
    pub fn into_parts(self) -> (T, LinkCollection) {
        (self.data, self.links)
    }

    /// Replace the payload, keeping links and embedded resources.
    pub fn map_data<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
        Resource {
            data: f(self.data),
            links: self.links,
            embedded: self.embedded,
        }
    }
}

impl<T> HasLinks for Resource<T> {
    fn links(&self) -> &LinkCollection {
        &self.links
    }

    fn links_mut(&mut self) -> &mut LinkCollection {
        &mut self.links
    }
}

impl<T> HasEmbedded for Resource<T> {
    fn embedded(&self) -> ResourceCollection<'_> {
        ResourceCollection::bind(&self.links, &self.embedded)
    }

    fn embedded_mut(&mut self) -> ResourceCollectionMut<'_> {
        ResourceCollectionMut::bind(&mut self.links, &mut self.embedded)
    }
}

impl<T: ResourceData> HalResource for Resource<T> {
    fn data_fields(&self) -> Result<Map<String, Value>> {
        payload_fields(&self.data)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Serialise `data` into the flat field map of a resource.
///
/// `null` yields no fields. Anything that is not an object, or an object
/// using a reserved key, fails with [`HalError::InvalidArgument`].
pub fn payload_fields<T: Serialize + ?Sized>(data: &T) -> Result<Map<String, Value>> {
    let value =
        serde_json::to_value(data).map_err(|e| HalError::Serialization(format!("resource data: {e}")))?;
    match value {
        Value::Object(fields) => {
            check_reserved(&fields)?;
            Ok(fields)
        }
        Value::Null => Ok(Map::new()),
        other => Err(HalError::InvalidArgument(format!(
            "resource data must serialize to a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

pub(crate) fn check_reserved(fields: &Map<String, Value>) -> Result<()> {
    for key in [LINKS, EMBEDDED] {
        if fields.contains_key(key) {
            return Err(HalError::InvalidArgument(format!(
                "resource data must not itself be a resource (it has a {key:?} property)"
            )));
        }
    }
    Ok(())
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::Link;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Order {
        total: f64,
        currency: String,
    }

    #[test]
    fn data_accessors() {
        let mut order = Resource::new(Order { total: 30.0, currency: "USD".into() });
        order.data_mut().total = 20.0;
        assert_eq!(order.data().total, 20.0);
        order.set_data(Order::default());
        assert_eq!(order.into_data(), Order::default());
    }

    #[test]
    fn payload_fields_flatten_in_declaration_order() {
        let order = Resource::new(Order { total: 30.0, currency: "USD".into() });
        let fields = order.data_fields().unwrap();
        assert_eq!(fields.keys().collect::<Vec<_>>(), ["total", "currency"]);
    }

    #[test]
    fn unit_payload_has_no_fields() {
        assert!(Resource::new(()).data_fields().unwrap().is_empty());
    }

    #[test]
    fn scalar_payload_rejected() {
        let err = Resource::new(42u32).data_fields();
        assert!(matches!(err, Err(HalError::InvalidArgument(msg)) if msg.contains("a number")));
    }

    #[test]
    fn payload_with_reserved_key_rejected() {
        let sneaky = Resource::new(json!({ "_links": {}, "id": 1 }));
        assert!(matches!(sneaky.data_fields(), Err(HalError::InvalidArgument(_))));
    }

    #[test]
    fn downcast_embedded_resource() {
        let mut orders = Resource::new(());
        orders.links_mut().add("ea:order", Link::new("/orders/123").unwrap()).unwrap();
        orders
            .embedded_mut()
            .add("ea:order", Resource::new(Order { total: 30.0, currency: "USD".into() }))
            .unwrap();

        let embedded = orders.embedded().first("ea:order").unwrap();
        assert!(embedded.is::<Resource<Order>>());
        assert_eq!(embedded.downcast_ref::<Resource<Order>>().unwrap().data().currency, "USD");
        assert!(embedded.downcast_ref::<JsonResource>().is_none());
    }

    #[test]
    fn map_data_keeps_links() {
        let mut resource = Resource::new(1u8);
        resource.links_mut().set_self(Link::new("/x").unwrap()).unwrap();
        let mapped = resource.map_data(|n| json!({ "n": n }));
        assert_eq!(mapped.data()["n"], 1);
        assert!(mapped.links().self_link().is_some());
    }
}
