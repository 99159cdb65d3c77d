//! Link objects and the capability traits shared by every link shape.
//!
//! A HAL link object serialises as
//! `{ "href": "...", "templated": true, "type": "...", ... }` with every
//! field except `href` omitted when unset. [`LinkObject`] is the tagged
//! variant stored in a [`LinkCollection`](crate::LinkCollection): either a
//! plain [`Link`] or a [`Curie`].

use serde::{Deserialize, Deserializer, Serialize};

use crate::curie::Curie;
use crate::error::{HalError, Result};

/// Something that points at a target URI (or URI template).
pub trait HasTarget {
    fn href(&self) -> &str;
}

/// Something that may declare its target to be a URI template.
pub trait HasTemplateFlag {
    /// `None` means "unspecified"; `Some(false)` is an explicit "no".
    fn templated(&self) -> Option<bool>;

    fn is_templated(&self) -> bool {
        self.templated() == Some(true)
    }
}

/// Optional descriptive metadata of a link object.
pub trait HasMetadata {
    /// Media type hint for the target (`type` on the wire).
    fn media_type(&self) -> Option<&str>;
    fn deprecation(&self) -> Option<&str>;
    /// Secondary key for links sharing a relation.
    fn name(&self) -> Option<&str>;
    fn profile(&self) -> Option<&str>;
    fn title(&self) -> Option<&str>;
    fn href_lang(&self) -> Option<&str>;
}

/// A HAL link object.
///
/// `href` is required and never blank; it can only be changed through
/// [`Link::set_href`], which re-checks that. All other fields are optional
/// metadata and may be changed freely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(deserialize_with = "non_blank_href")]
    href: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templated: Option<bool>,

    /// Media type hint, `type` on the wire.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    /// URL describing the planned deprecation of this link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Language of the target resource. Written as `hrefLang`; `hreflang`
    /// is accepted when reading.
    #[serde(
        rename = "hrefLang",
        alias = "hreflang",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub href_lang: Option<String>,
}

impl Link {
    /// Create a link to `href`.
    ///
    /// Fails with [`HalError::InvalidArgument`] if `href` is empty or
    /// whitespace-only.
    pub fn new(href: impl Into<String>) -> Result<Self> {
        let href = href.into();
        check_href(&href)?;
        Ok(Self {
            href,
            templated: None,
            media_type: None,
            deprecation: None,
            name: None,
            profile: None,
            title: None,
            href_lang: None,
        })
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    /// Replace the target. Fails with [`HalError::InvalidArgument`] on a
    /// blank value, leaving the link unchanged.
    pub fn set_href(&mut self, href: impl Into<String>) -> Result<()> {
        let href = href.into();
        check_href(&href)?;
        self.href = href;
        Ok(())
    }

    pub fn with_templated(mut self, templated: bool) -> Self {
        self.templated = Some(templated);
        self
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn with_deprecation(mut self, deprecation: impl Into<String>) -> Self {
        self.deprecation = Some(deprecation.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_href_lang(mut self, href_lang: impl Into<String>) -> Self {
        self.href_lang = Some(href_lang.into());
        self
    }
}

impl HasTarget for Link {
    fn href(&self) -> &str {
        &self.href
    }
}

impl HasTemplateFlag for Link {
    fn templated(&self) -> Option<bool> {
        self.templated
    }
}

impl HasMetadata for Link {
    fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }
    fn deprecation(&self) -> Option<&str> {
        self.deprecation.as_deref()
    }
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
    fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
    fn href_lang(&self) -> Option<&str> {
        self.href_lang.as_deref()
    }
}

/// An item of a link collection: a plain link or a curie.
///
/// Both variants serialise as an ordinary link object. Deserialising
/// through serde always yields [`LinkObject::Link`]; use
/// [`LinkTypes`](crate::LinkTypes) to decode a relation as curies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LinkObject {
    Link(Link),
    Curie(Curie),
}

impl LinkObject {
    /// The underlying link fields, whichever the variant.
    pub fn as_link(&self) -> &Link {
        match self {
            LinkObject::Link(link) => link,
            LinkObject::Curie(curie) => curie.as_link(),
        }
    }

    pub fn into_link(self) -> Link {
        match self {
            LinkObject::Link(link) => link,
            LinkObject::Curie(curie) => curie.into_link(),
        }
    }

    /// See [`is_curie`](crate::curie::is_curie).
    pub fn is_curie(&self) -> bool {
        crate::curie::is_curie(self)
    }

    pub fn as_curie(&self) -> Option<&Curie> {
        match self {
            LinkObject::Curie(curie) => Some(curie),
            LinkObject::Link(_) => None,
        }
    }
}

impl From<Link> for LinkObject {
    fn from(link: Link) -> Self {
        LinkObject::Link(link)
    }
}

impl From<Curie> for LinkObject {
    fn from(curie: Curie) -> Self {
        LinkObject::Curie(curie)
    }
}

impl<'de> Deserialize<'de> for LinkObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Link::deserialize(deserializer).map(LinkObject::Link)
    }
}

impl HasTarget for LinkObject {
    fn href(&self) -> &str {
        self.as_link().href()
    }
}

impl HasTemplateFlag for LinkObject {
    fn templated(&self) -> Option<bool> {
        self.as_link().templated
    }
}

impl HasMetadata for LinkObject {
    fn media_type(&self) -> Option<&str> {
        self.as_link().media_type.as_deref()
    }
    fn deprecation(&self) -> Option<&str> {
        self.as_link().deprecation.as_deref()
    }
    fn name(&self) -> Option<&str> {
        self.as_link().name.as_deref()
    }
    fn profile(&self) -> Option<&str> {
        self.as_link().profile.as_deref()
    }
    fn title(&self) -> Option<&str> {
        self.as_link().title.as_deref()
    }
    fn href_lang(&self) -> Option<&str> {
        self.as_link().href_lang.as_deref()
    }
}

// --- helpers -----------------------------------------------------------------

pub(crate) fn check_href(href: &str) -> Result<()> {
    if href.trim().is_empty() {
        return Err(HalError::InvalidArgument(
            "link href must not be empty or whitespace".into(),
        ));
    }
    Ok(())
}

fn non_blank_href<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    let href = String::deserialize(deserializer)?;
    if href.trim().is_empty() {
        return Err(serde::de::Error::custom("link href must not be empty"));
    }
    Ok(href)
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_href_rejected() {
        assert!(matches!(Link::new(""), Err(HalError::InvalidArgument(_))));
        assert!(matches!(Link::new("   "), Err(HalError::InvalidArgument(_))));
    }

    #[test]
    fn set_href_keeps_old_value_on_failure() {
        let mut link = Link::new("/orders").unwrap();
        assert!(link.set_href(" ").is_err());
        assert_eq!(link.href(), "/orders");
        link.set_href("/orders/1").unwrap();
        assert_eq!(link.href(), "/orders/1");
    }

    #[test]
    fn unset_fields_are_omitted() {
        let link = Link::new("/orders{?id}").unwrap().with_templated(true);
        assert_eq!(
            serde_json::to_value(&link).unwrap(),
            json!({ "href": "/orders{?id}", "templated": true })
        );
    }

    #[test]
    fn all_fields_use_wire_names() {
        let link = Link::new("/orders")
            .unwrap()
            .with_templated(false)
            .with_media_type("application/hal+json")
            .with_deprecation("/deprecations/orders")
            .with_name("orders")
            .with_profile("/profiles/order-list")
            .with_title("Orders")
            .with_href_lang("en");
        let v = serde_json::to_value(&link).unwrap();
        assert_eq!(v["type"], "application/hal+json");
        assert_eq!(v["hrefLang"], "en");
        assert_eq!(v["templated"], false);
        let back: Link = serde_json::from_value(v).unwrap();
        assert_eq!(back, link);
    }

    #[test]
    fn lowercase_hreflang_accepted() {
        let link: Link = serde_json::from_value(json!({ "href": "/a", "hreflang": "nl" })).unwrap();
        assert_eq!(link.href_lang.as_deref(), Some("nl"));
    }

    #[test]
    fn missing_or_blank_href_fails_to_decode() {
        assert!(serde_json::from_value::<Link>(json!({ "title": "x" })).is_err());
        assert!(serde_json::from_value::<Link>(json!({ "href": "" })).is_err());
    }

    #[test]
    fn capabilities_read_through_link_object() {
        let obj = LinkObject::from(Link::new("/a").unwrap().with_title("A"));
        assert_eq!(HasTarget::href(&obj), "/a");
        assert_eq!(obj.title(), Some("A"));
        assert!(!obj.is_templated());
    }
}
