use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::curie::{split_curie, Curie};
use crate::embedded::ResourceCollection;
use crate::link::{HasTarget, HasTemplateFlag};
use crate::links::LinkCollection;
use crate::resource::{HalResource, HasEmbedded, HasLinks};

/// Document-level problems found by [`validate_resource`].
///
/// Construction already rules out blank hrefs and non-curies under
/// `curies`, and embedding checks the link relation when a resource is
/// added; these checks cover what a well-formed value can still get wrong,
/// such as a link relation removed after resources were embedded under it.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("relation {relation:?} uses curie prefix {prefix:?}, which no curie in scope declares")]
    UnknownCuriePrefix { relation: String, prefix: String },

    #[error("curie name {0:?} is declared more than once")]
    DuplicateCurieName(String),

    #[error("embedded relation {0:?} has no matching link relation")]
    UndeclaredEmbedded(String),

    #[error("singular relation {relation:?} holds {count} items")]
    SingularOverflow { relation: String, count: usize },

    #[error(
        "link {href:?} under relation {relation:?} looks like a URI template \
         but is not marked templated"
    )]
    UntemplatedTemplate { relation: String, href: String },

    #[error("in embedded {relation:?}[{index}]: {source}")]
    InEmbedded {
        relation: String,
        index: usize,
        source: Box<ValidationError>,
    },
}

/// Validate `resource` and everything embedded in it.
///
/// Returns the first [`ValidationError`] found. Each resource is checked in
/// this order: curie names, link relations, embedded relations, then each
/// embedded resource in document order. Curies declared by a resource stay
/// in scope for the resources embedded in it; curie prefixes are only
/// checked where at least one curie is in scope.
pub fn validate_resource<R: HalResource + ?Sized>(resource: &R) -> Result<(), ValidationError> {
    validate_level(resource.links(), resource.embedded(), &[])
}

fn validate_level(
    links: &LinkCollection,
    embedded: ResourceCollection<'_>,
    inherited: &[Curie],
) -> Result<(), ValidationError> {
    let own = links.curies();
    let mut names = HashSet::new();
    for curie in &own {
        if !names.insert(curie.name()) {
            return Err(ValidationError::DuplicateCurieName(curie.name().to_string()));
        }
    }
    // own curies shadow inherited ones of the same name
    let scope: Vec<Curie> = own.iter().chain(inherited).cloned().collect();

    for entry in links {
        if let Some((prefix, _)) = split_curie(entry.relation) {
            if !scope.is_empty() && !scope.iter().any(|c| c.name() == prefix) {
                return Err(ValidationError::UnknownCuriePrefix {
                    relation: entry.relation.to_string(),
                    prefix: prefix.to_string(),
                });
            }
        }
        check_singular(entry.relation, entry.singular, entry.items.len())?;
        for link in entry.items {
            if !link.is_templated() && TEMPLATE_EXPRESSION_RE.is_match(link.href()) {
                return Err(ValidationError::UntemplatedTemplate {
                    relation: entry.relation.to_string(),
                    href: link.href().to_string(),
                });
            }
        }
    }

    for entry in embedded {
        if !links.contains(entry.relation) {
            return Err(ValidationError::UndeclaredEmbedded(entry.relation.to_string()));
        }
        check_singular(entry.relation, entry.singular, entry.items.len())?;
        for (index, resource) in entry.items.iter().enumerate() {
            validate_level(resource.links(), resource.embedded(), &scope).map_err(|source| {
                ValidationError::InEmbedded {
                    relation: entry.relation.to_string(),
                    index,
                    source: Box::new(source),
                }
            })?;
        }
    }

    Ok(())
}

// --- helpers -----------------------------------------------------------------

fn check_singular(relation: &str, singular: bool, count: usize) -> Result<(), ValidationError> {
    if singular && count > 1 {
        return Err(ValidationError::SingularOverflow {
            relation: relation.to_string(),
            count,
        });
    }
    Ok(())
}

/// `\{[^{}\s]+\}`, an RFC 6570 expression such as `{id}` or `{?page,size}`
static TEMPLATE_EXPRESSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{[^{}\s]+\}").expect("invalid template expression regex")
});

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curie::CURIES;
    use crate::embedded::{EmbeddedResources, ResourceCollectionMut};
    use crate::error::Result as HalResult;
    use crate::link::Link;
    use crate::resource::Resource;
    use serde_json::{json, Map, Value};
    use std::any::Any;

    fn link(href: &str) -> Link {
        Link::new(href).unwrap()
    }

    fn orders() -> Resource<Value> {
        let mut resource = Resource::new(json!({ "currentlyProcessing": 14 }));
        let links = resource.links_mut();
        links.set_self(link("/orders")).unwrap();
        links.add(CURIES, Curie::new("ea", "http://example.com/docs/rels/{rel}").unwrap()).unwrap();
        links.add("ea:order", link("/orders/123")).unwrap();
        links.add("ea:find", link("/orders{?id}").with_templated(true)).unwrap();
        resource
    }

    #[test]
    fn valid_document() {
        let mut resource = orders();
        let mut order = Resource::new(json!({ "total": 30.0 }));
        order.links_mut().add("ea:basket", link("/baskets/98712")).unwrap();
        resource.embedded_mut().add("ea:order", order).unwrap();
        assert_eq!(validate_resource(&resource), Ok(()));
    }

    #[test]
    fn unknown_prefix_rejected() {
        let mut resource = orders();
        resource.links_mut().add("xx:thing", link("/x")).unwrap();
        assert_eq!(
            validate_resource(&resource),
            Err(ValidationError::UnknownCuriePrefix {
                relation: "xx:thing".into(),
                prefix: "xx".into(),
            })
        );
    }

    #[test]
    fn prefixes_unchecked_without_curies() {
        let mut resource = Resource::new(());
        resource.links_mut().add("xx:thing", link("/x")).unwrap();
        resource.links_mut().add("http://example.com/rels/y", link("/y")).unwrap();
        assert_eq!(validate_resource(&resource), Ok(()));
    }

    #[test]
    fn duplicate_curie_names() {
        let mut resource = orders();
        resource
            .links_mut()
            .add(CURIES, Curie::new("ea", "/other/{rel}").unwrap())
            .unwrap();
        assert_eq!(
            validate_resource(&resource),
            Err(ValidationError::DuplicateCurieName("ea".into()))
        );
    }

    #[test]
    fn untemplated_template() {
        let mut resource = Resource::new(());
        resource.links_mut().add("find", link("/orders{?id}")).unwrap();
        assert!(matches!(
            validate_resource(&resource),
            Err(ValidationError::UntemplatedTemplate { .. })
        ));
    }

    #[test]
    fn singular_overflow_after_late_marking() {
        let mut resource = Resource::new(());
        let links = resource.links_mut();
        links.add("item", link("/a")).unwrap();
        links.add("item", link("/b")).unwrap();
        links.mark_singular("item").unwrap();
        assert_eq!(
            validate_resource(&resource),
            Err(ValidationError::SingularOverflow { relation: "item".into(), count: 2 })
        );
    }

    #[test]
    fn errors_in_embedded_resources_are_located() {
        let mut resource = orders();
        let mut first = Resource::new(json!({}));
        first.links_mut().add("ea:basket", link("/b")).unwrap();
        let mut second = Resource::new(json!({}));
        second.links_mut().add("zz:basket", link("/b")).unwrap();
        let mut embedded = resource.embedded_mut();
        embedded.add("ea:order", first).unwrap();
        embedded.add("ea:order", second).unwrap();

        let err = validate_resource(&resource).unwrap_err();
        assert!(matches!(
            &err,
            ValidationError::InEmbedded { relation, index: 1, source }
                if relation == "ea:order"
                    && matches!(**source, ValidationError::UnknownCuriePrefix { .. })
        ));
        assert!(err.to_string().starts_with("in embedded \"ea:order\"[1]: "));
    }

    /// A resource whose embedded view is bound to links it does not expose.
    #[derive(Debug, Default)]
    struct Detached {
        links: LinkCollection,
        hidden: LinkCollection,
        embedded: EmbeddedResources,
    }

    impl HasLinks for Detached {
        fn links(&self) -> &LinkCollection {
            &self.links
        }
        fn links_mut(&mut self) -> &mut LinkCollection {
            &mut self.links
        }
    }

    impl HasEmbedded for Detached {
        fn embedded(&self) -> ResourceCollection<'_> {
            ResourceCollection::bind(&self.hidden, &self.embedded)
        }
        fn embedded_mut(&mut self) -> ResourceCollectionMut<'_> {
            ResourceCollectionMut::bind(&mut self.hidden, &mut self.embedded)
        }
    }

    impl HalResource for Detached {
        fn data_fields(&self) -> HalResult<Map<String, Value>> {
            Ok(Map::new())
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn undeclared_embedded_relation() {
        let mut resource = Detached::default();
        resource.hidden.add("item", link("/a")).unwrap();
        resource.embedded_mut().add("item", Resource::new(())).unwrap();
        assert_eq!(
            validate_resource(&resource),
            Err(ValidationError::UndeclaredEmbedded("item".into()))
        );
    }
}
