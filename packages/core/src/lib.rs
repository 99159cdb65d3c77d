//! HAL (Hypertext Application Language) resources for Rust.
//!
//! This crate provides the HAL resource model (links, curies, relation
//! collections with singular relations, embedded resources) together with a
//! JSON encoder and a streaming, serde-based decoder. It is the foundation
//! for the `hal` CLI and the `societatis-hal-wasm` WebAssembly bindings.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`link`] | [`Link`], [`LinkObject`] and the capability traits [`HasTarget`], [`HasTemplateFlag`], [`HasMetadata`] |
//! | [`curie`] | [`Curie`], the [`is_curie`] check and CURIE relation expansion |
//! | [`relation`] | Insertion-ordered [`RelationCollection`] with singular relations |
//! | [`links`] | [`LinkCollection`]: `self` singular, `curies` gated |
//! | [`embedded`] | [`ResourceCollection`] views binding `_embedded` to `_links` |
//! | [`resource`] | [`Resource<T>`] and the [`HalResource`] trait |
//! | [`encode`] | Writing HAL+JSON via [`to_string`], [`to_value`], ... |
//! | [`decode`] | Reading HAL+JSON via [`from_str`] or a configured [`Decoder`] |
//! | [`validation`] | Document-level checks via [`validate_resource`] |
//! | [`render`] | Plain-text outlines of resources |
//!
//! # Quick start
//!
//! ```rust
//! use societatis_hal::{from_str, to_string, HasLinks, Link, Resource};
//!
//! let mut resource = Resource::new(());
//! resource.links_mut().set_self(Link::new("/orders").unwrap()).unwrap();
//! let json = to_string(&resource).unwrap();
//! assert_eq!(json, r#"{"_links":{"self":{"href":"/orders"}}}"#);
//!
//! let back: Resource<()> = from_str(&json).unwrap();
//! assert!(back.links().is_singular("self"));
//! ```

pub mod curie;
pub mod decode;
pub mod embedded;
pub mod encode;
pub mod error;
pub mod link;
pub mod links;
pub mod relation;
pub mod render;
pub mod resource;
pub mod validation;

pub use curie::{is_curie, split_curie, Curie, CURIES};
pub use decode::{
    from_reader, from_slice, from_str, from_value, links_from_str, relations_from_str, Decoder,
    ItemResolver, LinkKind, LinkTypes, ResourceTypes, Uniform,
};
pub use embedded::{EmbeddedResources, ResourceCollection, ResourceCollectionMut};
pub use encode::{to_string, to_string_pretty, to_value, to_vec, to_writer};
pub use error::{HalError, Result};
pub use link::{HasMetadata, HasTarget, HasTemplateFlag, Link, LinkObject};
pub use links::{LinkCollection, SELF};
pub use relation::{validate_relation, RelationCollection, RelationEntry};
pub use render::{render_links, render_resource};
pub use resource::{
    payload_fields, HalResource, HasEmbedded, HasLinks, JsonResource, Resource, ResourceData,
    EMBEDDED, LINKS,
};
pub use validation::{validate_resource, ValidationError};
