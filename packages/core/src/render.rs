//! Human-readable text rendering of resources.
//!
//! The output is an indented outline for terminals and logs. It is not a
//! wire format and may change; only HAL+JSON is normative.

use serde_json::Value;

use crate::curie::CURIES;
use crate::link::{HasMetadata, HasTarget, HasTemplateFlag, LinkObject};
use crate::links::{LinkCollection, SELF};
use crate::resource::{HalResource, HasEmbedded, HasLinks};

/// Render a resource and everything embedded in it.
///
/// ```text
/// Resource /orders  4 links, 2 fields, 1 embedded
///
/// Links:
///   self      /orders
///   next      /orders?page=2
///   ea:find   /orders{?id}  [templated]
///   curies    ea = http://example.com/docs/rels/{rel}
///
/// Data:
///   currentlyProcessing: 14
///   shippedToday: 20
///
/// Embedded ea:order (2):
///   [0] Resource /orders/123  3 links, 3 fields
///       ...
/// ```
pub fn render_resource<R: HalResource + ?Sized>(resource: &R) -> String {
    let mut out = String::new();
    render_into(&mut out, resource, 0);
    out
}

/// Render a link collection as `relation  href  [flags]` lines.
pub fn render_links(links: &LinkCollection) -> String {
    let mut out = String::new();
    push_links(&mut out, links, "");
    out
}

fn render_into<R: HalResource + ?Sized>(out: &mut String, resource: &R, depth: usize) {
    let indent = "    ".repeat(depth);
    let links = resource.links();
    let embedded = resource.embedded();

    // header line
    let target = links
        .self_link()
        .map(|link| format!(" {}", link.href()))
        .unwrap_or_default();
    let fields = resource.data_fields();
    let field_count = fields.as_ref().map(|f| f.len()).unwrap_or(0);
    out.push_str(&format!(
        "Resource{}  {}, {}",
        target,
        plural(links.item_count(), "link"),
        plural(field_count, "field")
    ));
    if !embedded.is_empty() {
        out.push_str(&format!(", {} embedded", embedded.item_count()));
    }
    out.push('\n');

    if !links.is_empty() {
        out.push_str(&format!("\n{indent}Links:\n"));
        push_links(out, links, &format!("{indent}  "));
    }

    match fields {
        Ok(fields) if !fields.is_empty() => {
            out.push_str(&format!("\n{indent}Data:\n"));
            for (key, value) in &fields {
                out.push_str(&format!("{indent}  {key}: {}\n", excerpt(value, 72)));
            }
        }
        Ok(_) => {}
        Err(err) => out.push_str(&format!("\n{indent}Data: unavailable ({err})\n")),
    }

    for entry in embedded {
        out.push_str(&format!(
            "\n{indent}Embedded {} ({}):\n",
            entry.relation,
            entry.items.len()
        ));
        for (i, item) in entry.items.iter().enumerate() {
            out.push_str(&format!("{indent}  [{i}] "));
            render_into(out, &**item, depth + 1);
        }
    }
}

fn push_links(out: &mut String, links: &LinkCollection, indent: &str) {
    let width = links.relation_names().map(str::len).max().unwrap_or(0);
    for entry in links {
        for link in entry.items {
            let target = if entry.relation == CURIES {
                match link.name() {
                    Some(name) => format!("{name} = {}", link.href()),
                    None => link.href().to_string(),
                }
            } else {
                link.href().to_string()
            };
            out.push_str(&format!(
                "{indent}{:<width$}  {}{}\n",
                entry.relation,
                target,
                flags(entry.relation, link)
            ));
        }
    }
}

fn flags(relation: &str, link: &LinkObject) -> String {
    let mut flags = Vec::new();
    // curies are templated by definition
    if link.is_templated() && relation != CURIES {
        flags.push("templated".to_string());
    }
    if relation != CURIES && relation != SELF {
        if let Some(name) = link.name() {
            flags.push(format!("name={name}"));
        }
    }
    if let Some(media_type) = link.media_type() {
        flags.push(format!("type={media_type}"));
    }
    if link.deprecation().is_some() {
        flags.push("deprecated".to_string());
    }
    let title = link
        .title()
        .map(|title| format!("  \"{title}\""))
        .unwrap_or_default();
    if flags.is_empty() {
        title
    } else {
        format!("  [{}]{}", flags.join(", "), title)
    }
}

// --- helpers -----------------------------------------------------------------

fn plural(n: usize, noun: &str) -> String {
    format!("{} {}{}", n, noun, if n == 1 { "" } else { "s" })
}

fn excerpt(value: &Value, max: usize) -> String {
    let text = value.to_string();
    if text.chars().count() <= max {
        return text;
    }
    let cut: String = text.chars().take(max - 1).collect();
    format!("{cut}…")
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curie::Curie;
    use crate::link::Link;
    use crate::resource::Resource;
    use serde_json::json;

    fn orders() -> Resource<Value> {
        let mut resource = Resource::new(json!({ "currentlyProcessing": 14, "shippedToday": 20 }));
        let links = resource.links_mut();
        links.set_self(Link::new("/orders").unwrap()).unwrap();
        links
            .add(CURIES, Curie::new("ea", "http://example.com/docs/rels/{rel}").unwrap())
            .unwrap();
        links
            .add("ea:find", Link::new("/orders{?id}").unwrap().with_templated(true))
            .unwrap();
        links
            .add("ea:order", Link::new("/orders/123").unwrap().with_title("First order"))
            .unwrap();
        resource
    }

    #[test]
    fn header_counts() {
        let rendered = render_resource(&orders());
        assert!(rendered.starts_with("Resource /orders  4 links, 2 fields\n"));
    }

    #[test]
    fn links_section() {
        let rendered = render_resource(&orders());
        assert!(rendered.contains("  ea:find   /orders{?id}  [templated]\n"));
        assert!(rendered.contains("  curies    ea = http://example.com/docs/rels/{rel}\n"));
        assert!(rendered.contains("/orders/123  \"First order\""));
        assert!(rendered.contains("  shippedToday: 20\n"));
    }

    #[test]
    fn embedded_resources_are_nested() {
        let mut resource = orders();
        let mut order = Resource::new(json!({ "total": 30.0, "currency": "USD" }));
        order.links_mut().set_self(Link::new("/orders/123").unwrap()).unwrap();
        resource.embedded_mut().add("ea:order", order).unwrap();

        let rendered = render_resource(&resource);
        assert!(rendered.contains(", 1 embedded\n"));
        assert!(rendered.contains("\nEmbedded ea:order (1):\n  [0] Resource /orders/123  1 link, 2 fields\n"));
        assert!(rendered.contains("\n    Data:\n      total: 30.0\n"));
    }

    #[test]
    fn long_values_are_cut() {
        let long = "x".repeat(200);
        let resource = Resource::new(json!({ "note": long }));
        let rendered = render_resource(&resource);
        let line = rendered.lines().find(|l| l.contains("note:")).unwrap();
        assert!(line.ends_with('…'));
    }

    #[test]
    fn render_links_alone() {
        let mut links = LinkCollection::new();
        links.add("next", Link::new("/p/2").unwrap().with_name("page")).unwrap();
        assert_eq!(render_links(&links), "next  /p/2  [name=page]\n");
    }
}
