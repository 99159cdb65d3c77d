//! `hal`: command-line tool for HAL+JSON documents.
//!
//! Subcommands:
//!
//! - **`validate`**: decode a document and run the document-level checks.
//! - **`render`**: print a plain-text outline of a document.
//! - **`normalize`**: decode and re-encode a document in canonical form.
//! - **`expand`**: expand a CURIE relation using the document's curies.
//! - **`new`**: build a resource from flags and print it.
//!
//! Subcommands that take a FILE read it from a path or from stdin (`-`).
//! Exit codes: 0 success, 1 invalid document, 2 unreadable input or usage
//! error.

mod config;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use societatis_hal::{
    render_resource, to_string, to_string_pretty, validate_resource, Curie, HalResource, HasLinks,
    JsonResource, Link, Resource, CURIES,
};
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

/// hal: HAL+JSON command-line tool
///
/// Validate, inspect and build HAL resources.
#[derive(Parser)]
#[command(name = "hal", version, about, long_about = None)]
struct Cli {
    /// Diagnostic log filter, e.g. `societatis_hal=debug`.
    #[arg(long, global = true, value_name = "FILTER", env = "HAL_LOG")]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a HAL document.
    ///
    /// Decodes the document (construction rules such as singular relations
    /// and declared embedded relations apply) and then runs the
    /// document-level checks. Exits 0 if valid, 1 otherwise.
    ///
    /// Pass `-` as FILE to read from stdin.
    Validate {
        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,
    },

    /// Render a HAL document as a plain-text outline.
    Render {
        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,
    },

    /// Decode a HAL document and print it re-encoded.
    ///
    /// Links come first, then data fields, then embedded resources; a
    /// relation is written as an object only when it is singular.
    Normalize {
        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,

        /// Print on one line (default from HAL_COMPACT).
        #[arg(long)]
        compact: bool,

        /// Refuse documents that fail validation (default from HAL_STRICT).
        #[arg(long)]
        strict: bool,
    },

    /// Expand a CURIE relation such as `ea:basket` using the document's curies.
    Expand {
        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,

        /// The relation to expand.
        relation: String,
    },

    /// Build a new HAL resource and print it as JSON.
    ///
    /// Examples:
    ///   hal new --self /orders --link next=/orders?page=2
    ///   hal new --self /orders/123 --curie ea=http://example.com/docs/rels/{rel} \
    ///     --link ea:basket=/baskets/98712 --single ea:basket --data '{"total":30.0}'
    New {
        /// Target of the `self` link.
        #[arg(long = "self", value_name = "HREF")]
        self_href: Option<String>,

        /// A link: <rel>=<href>. Repeat for multiple links.
        #[arg(long = "link", value_name = "REL=HREF")]
        links: Vec<String>,

        /// A templated link: <rel>=<template>. Repeat for multiple links.
        #[arg(long = "template", value_name = "REL=TEMPLATE")]
        templates: Vec<String>,

        /// Mark a relation singular (written as an object, not an array).
        #[arg(long = "single", value_name = "REL")]
        singular: Vec<String>,

        /// A curie: <name>=<template containing {rel}>.
        #[arg(long = "curie", value_name = "NAME=TEMPLATE")]
        curies: Vec<String>,

        /// Data fields as a JSON object.
        #[arg(long, value_name = "JSON")]
        data: Option<String>,

        /// Print on one line (default from HAL_COMPACT).
        #[arg(long)]
        compact: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = CliConfig::from_env();
    init_tracing(cli.log.as_deref().unwrap_or(&config.log_filter));

    match cli.command {
        Command::Validate { file } => {
            let resource = decode(&file);
            match validate_resource(&resource) {
                Ok(()) => println!("valid"),
                Err(e) => {
                    eprintln!("error: {}", e);
                    process::exit(1);
                }
            }
        }

        Command::Render { file } => {
            let resource = decode(&file);
            print!("{}", render_resource(&resource));
        }

        Command::Normalize {
            file,
            compact,
            strict,
        } => {
            let resource = decode(&file);
            if strict || config.strict {
                if let Err(e) = validate_resource(&resource) {
                    eprintln!("error: {}", e);
                    process::exit(1);
                }
            }
            println!("{}", encode(&resource, compact || config.compact));
        }

        Command::Expand { file, relation } => {
            let resource = decode(&file);
            match resource.links().expand_relation(&relation) {
                Some(uri) => println!("{}", uri),
                None => {
                    eprintln!(
                        "error: {:?} is not a CURIE relation declared by this document",
                        relation
                    );
                    process::exit(1);
                }
            }
        }

        Command::New {
            self_href,
            links,
            templates,
            singular,
            curies,
            data,
            compact,
        } => {
            let data = match data {
                Some(raw) => parse_data(&raw),
                None => Map::new(),
            };
            let mut resource: JsonResource = Resource::new(data);
            let collection = resource.links_mut();

            // singular before links, so a second link for the relation fails
            for relation in &singular {
                collection.mark_singular(relation).unwrap_or_else(|e| fatal(&e.to_string()));
            }
            if let Some(href) = self_href {
                let link = Link::new(href).unwrap_or_else(|e| fatal(&e.to_string()));
                collection.set_self(link).unwrap_or_else(|e| fatal(&e.to_string()));
            }
            for raw in &curies {
                let (name, template) = parse_pair(raw, "--curie", "<name>=<template>");
                let curie = Curie::new(name, template).unwrap_or_else(|e| fatal(&e.to_string()));
                collection.add(CURIES, curie).unwrap_or_else(|e| fatal(&e.to_string()));
            }
            for (raw, templated) in links
                .iter()
                .map(|raw| (raw, false))
                .chain(templates.iter().map(|raw| (raw, true)))
            {
                let (relation, href) = if templated {
                    parse_pair(raw, "--template", "<rel>=<template>")
                } else {
                    parse_pair(raw, "--link", "<rel>=<href>")
                };
                let mut link = Link::new(href).unwrap_or_else(|e| fatal(&e.to_string()));
                if templated {
                    link = link.with_templated(true);
                }
                collection.add(relation, link).unwrap_or_else(|e| fatal(&e.to_string()));
            }

            // never print a document `hal validate` would reject
            if let Err(e) = validate_resource(&resource) {
                fatal(&format!("resource is invalid: {}", e));
            }
            println!("{}", encode(&resource, compact || config.compact));
        }
    }
}

fn init_tracing(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
}

/// Read the full contents of a file, or stdin when the path is `"-"`.
fn read_input(path: &Path) -> String {
    if path.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .unwrap_or_else(|e| fatal(&format!("failed to read stdin: {}", e)));
        buf
    } else {
        fs::read_to_string(path).unwrap_or_else(|e| {
            fatal(&format!("failed to read {}: {}", path.display(), e))
        })
    }
}

/// Decode a document with untyped data and untyped embedded resources.
fn decode(path: &Path) -> JsonResource {
    let json = read_input(path);
    tracing::debug!(path = %path.display(), bytes = json.len(), "decoding document");
    societatis_hal::from_str(&json)
        .unwrap_or_else(|e| fatal(&format!("failed to decode {}: {}", path.display(), e)))
}

fn encode(resource: &dyn HalResource, compact: bool) -> String {
    let encoded = if compact {
        to_string(resource)
    } else {
        to_string_pretty(resource)
    };
    encoded.unwrap_or_else(|e| fatal(&e.to_string()))
}

fn parse_data(raw: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(fields)) => fields,
        Ok(_) => fatal("--data must be a JSON object"),
        Err(e) => fatal(&format!("--data is not valid JSON: {}", e)),
    }
}

/// Split `<key>=<value>`; both sides must be non-empty.
fn parse_pair<'a>(raw: &'a str, flag: &str, format: &str) -> (&'a str, &'a str) {
    split_pair(raw).unwrap_or_else(|| {
        fatal(&format!("invalid {} {:?}: expected format {}", flag, raw, format))
    })
}

fn split_pair(raw: &str) -> Option<(&str, &str)> {
    let (key, value) = raw.split_once('=')?;
    if key.trim().is_empty() || value.trim().is_empty() {
        return None;
    }
    Some((key, value))
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("hal: {}", msg);
    process::exit(2);
}

// --- tests -------------------------------------------------------------------
