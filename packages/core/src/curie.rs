//! Curies (compact URIs) and CURIE-style relation names.
//!
//! A curie is a named, templated link stored under the reserved `curies`
//! relation. Its `href` contains a `{rel}` placeholder, so a relation written
//! as `ea:basket` can be expanded to the documentation URI of `basket` in
//! the `ea` namespace.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{HalError, Result};
use crate::link::{HasMetadata, HasTarget, HasTemplateFlag, Link, LinkObject};

/// The relation under which curies are declared.
pub const CURIES: &str = "curies";

/// Placeholder substituted by [`Curie::expand`].
pub const REL_PLACEHOLDER: &str = "{rel}";

/// A curie: a link that is always templated and always named.
///
/// Both invariants are checked at construction and on every mutation, so a
/// `Curie` value can never be observed with `templated != Some(true)` or a
/// blank name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Curie {
    link: Link,
}

impl Curie {
    /// Create a curie called `name` for the URI template `template`.
    ///
    /// Fails with [`HalError::InvalidArgument`] if either is blank.
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Result<Self> {
        let name = name.into();
        check_name(&name)?;
        let link = Link::new(template)?.with_templated(true).with_name(name);
        Ok(Self { link })
    }

    pub fn name(&self) -> &str {
        // set at construction and only ever replaced by a checked value
        self.link.name.as_deref().unwrap_or_default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        check_name(&name)?;
        self.link.name = Some(name);
        Ok(())
    }

    pub fn href(&self) -> &str {
        self.link.href()
    }

    pub fn set_href(&mut self, href: impl Into<String>) -> Result<()> {
        self.link.set_href(href)
    }

    /// Only `Some(true)` is accepted; anything else fails with
    /// [`HalError::InvalidOperation`].
    pub fn set_templated(&mut self, templated: Option<bool>) -> Result<()> {
        if templated != Some(true) {
            return Err(HalError::InvalidOperation("a curie is always templated".into()));
        }
        self.link.templated = templated;
        Ok(())
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.link.title = title;
    }

    pub fn set_media_type(&mut self, media_type: Option<String>) {
        self.link.media_type = media_type;
    }

    pub fn set_deprecation(&mut self, deprecation: Option<String>) {
        self.link.deprecation = deprecation;
    }

    pub fn set_profile(&mut self, profile: Option<String>) {
        self.link.profile = profile;
    }

    pub fn set_href_lang(&mut self, href_lang: Option<String>) {
        self.link.href_lang = href_lang;
    }

    pub fn as_link(&self) -> &Link {
        &self.link
    }

    pub fn into_link(self) -> Link {
        self.link
    }

    /// Substitute `reference` for every `{rel}` in the template.
    ///
    /// ```
    /// # use societatis_hal::Curie;
    /// let ea = Curie::new("ea", "http://example.com/docs/rels/{rel}").unwrap();
    /// assert_eq!(ea.expand("basket"), "http://example.com/docs/rels/basket");
    /// ```
    pub fn expand(&self, reference: &str) -> String {
        self.link.href().replace(REL_PLACEHOLDER, reference)
    }
}

impl TryFrom<Link> for Curie {
    type Error = HalError;

    /// Accepts links passing the [`is_curie`] heuristic whose name is not
    /// blank.
    fn try_from(link: Link) -> Result<Self> {
        if !looks_like_curie(&link) {
            return Err(HalError::InvalidOperation(format!(
                "link {:?} is not a valid curie: it must be templated, named, and contain {REL_PLACEHOLDER}",
                link.href()
            )));
        }
        check_name(link.name.as_deref().unwrap_or_default())?;
        Ok(Self { link })
    }
}

impl TryFrom<LinkObject> for Curie {
    type Error = HalError;

    fn try_from(link: LinkObject) -> Result<Self> {
        match link {
            LinkObject::Curie(curie) => Ok(curie),
            LinkObject::Link(link) => Curie::try_from(link),
        }
    }
}

impl<'de> Deserialize<'de> for Curie {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let link = Link::deserialize(deserializer)?;
        Curie::try_from(link).map_err(serde::de::Error::custom)
    }
}

impl HasTarget for Curie {
    fn href(&self) -> &str {
        self.link.href()
    }
}

impl HasTemplateFlag for Curie {
    fn templated(&self) -> Option<bool> {
        Some(true)
    }
}

impl HasMetadata for Curie {
    fn media_type(&self) -> Option<&str> {
        self.link.media_type.as_deref()
    }
    fn deprecation(&self) -> Option<&str> {
        self.link.deprecation.as_deref()
    }
    fn name(&self) -> Option<&str> {
        Some(Curie::name(self))
    }
    fn profile(&self) -> Option<&str> {
        self.link.profile.as_deref()
    }
    fn title(&self) -> Option<&str> {
        self.link.title.as_deref()
    }
    fn href_lang(&self) -> Option<&str> {
        self.link.href_lang.as_deref()
    }
}

/// Whether `link` may be stored under the `curies` relation.
///
/// True for a structural [`Curie`], or for a plain link that is templated,
/// named and whose `href` contains `{rel}`. The second branch is a heuristic
/// and does not check full CURIE template syntax.
pub fn is_curie(link: &LinkObject) -> bool {
    match link {
        LinkObject::Curie(_) => true,
        LinkObject::Link(link) => looks_like_curie(link),
    }
}

fn looks_like_curie(link: &Link) -> bool {
    link.templated == Some(true)
        && link.name.is_some()
        && link.href().contains(REL_PLACEHOLDER)
}

fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(HalError::InvalidArgument("curie name must not be empty or whitespace".into()));
    }
    Ok(())
}

/// Split a CURIE relation such as `ea:basket` into `("ea", "basket")`.
///
/// Returns `None` for plain registered relations (`next`) and for absolute
/// URIs whose reference starts with `//` (`http://example.com/rels/x`).
pub fn split_curie(relation: &str) -> Option<(&str, &str)> {
    let caps = CURIE_RELATION_RE.captures(relation)?;
    let prefix = caps.get(1)?.as_str();
    let reference = caps.get(2)?.as_str();
    if reference.starts_with("//") {
        return None;
    }
    Some((prefix, reference))
}

/// `^([A-Za-z_][A-Za-z0-9_.-]*):(.+)$`
static CURIE_RELATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_.\-]*):(.+)$").expect("invalid curie relation regex")
});

// --- tests -------------------------------------------------------------------
