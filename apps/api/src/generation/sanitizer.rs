//! Sanitizer — last pass over an assembled document before it is stored.
//!
//! Rules, in order:
//! 1. remember whether the input opened with a doctype
//! 2. parse with html5ever (never fails on near-HTML text)
//! 3. drop every `<script>` subtree
//! 4. strip `style` from `.ai-section` elements and everything inside them
//! 5. give every `.subsection` container a `.subsection-title` heading if it has none
//! 6. serialize
//! 7. re-attach the doctype if the serializer lost it
//!
//! Running the pass on its own output is a no-op.

use std::cell::RefCell;
use std::rc::Rc;

use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{parse_document, parse_fragment, Attribute, LocalName, Namespace, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use thiserror::Error;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
const DOCTYPE: &str = "<!DOCTYPE html>";

const AI_SECTION_CLASS: &str = "ai-section";
const SUBSECTION_CLASS: &str = "subsection";
const SUBSECTION_TITLE_CLASS: &str = "subsection-title";
const DEFAULT_SUBSECTION_TITLE: &str = "Subsection";

const SUBSECTION_CONTAINERS: &[&str] = &["div", "section"];
const TITLE_ELEMENTS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

#[derive(Debug, Error)]
pub enum SanitizeError {
    #[error("document produced no parse tree")]
    Unparseable,

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] std::io::Error),

    #[error("serialized document is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Sanitizes an assembled HTML document. Pure and deterministic.
pub fn validate_document(html: &str) -> Result<String, SanitizeError> {
    let had_doctype = starts_with_doctype(html);

    // `dom` owns the tree; dropping it tears down every node below `root`.
    let (dom, root) = parse(html, had_doctype)?;
    remove_scripts(&root);
    strip_ai_section_styles(&root);
    ensure_subsection_titles(&root);

    let mut cleaned = serialize_children(&root)?;
    drop(dom);
    if had_doctype && !starts_with_doctype(&cleaned) {
        cleaned = format!("{DOCTYPE}\n{cleaned}");
    }
    Ok(cleaned)
}

fn starts_with_doctype(html: &str) -> bool {
    html.trim_start()
        .get(..9)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("<!doctype"))
}

/// Full documents keep their `<html>` skeleton. Anything else is parsed as body
/// content so bare fragments are not wrapped in `<html><head><body>`.
///
/// Returns the dom together with the node whose children make up the output.
fn parse(html: &str, had_doctype: bool) -> Result<(RcDom, Handle), SanitizeError> {
    let is_full_document = had_doctype || html.to_ascii_lowercase().contains("<html");

    if is_full_document {
        let dom = parse_document(RcDom::default(), ParseOpts::default())
            .one(StrTendril::from_slice(html));
        let root = dom.document.clone();
        return Ok((dom, root));
    }

    let dom = parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        html_name("body"),
        Vec::new(),
    )
    .one(StrTendril::from_slice(html));

    // Fragment parsing roots the content under a synthetic <html> element.
    let fragment_root = dom.document.children.borrow().first().cloned();
    match fragment_root {
        Some(root) => Ok((dom, root)),
        None => Err(SanitizeError::Unparseable),
    }
}

fn serialize_children(root: &Handle) -> Result<String, SanitizeError> {
    let mut bytes = Vec::new();
    let handle: SerializableHandle = root.clone().into();
    serialize(&mut bytes, &handle, SerializeOpts::default())?;
    Ok(String::from_utf8(bytes)?)
}

fn remove_scripts(node: &Handle) {
    node.children
        .borrow_mut()
        .retain(|child| !is_element(child, &["script"]));

    for child in child_containers(node) {
        remove_scripts(&child);
    }
}

fn strip_ai_section_styles(root: &Handle) {
    for section in descendants(root)
        .into_iter()
        .filter(|node| has_class(node, AI_SECTION_CLASS))
    {
        remove_style(&section);
        for inner in descendants(&section) {
            remove_style(&inner);
        }
    }
}

fn ensure_subsection_titles(root: &Handle) {
    for subsection in descendants(root).into_iter().filter(|node| {
        is_element(node, SUBSECTION_CONTAINERS) && has_class(node, SUBSECTION_CLASS)
    }) {
        let has_title = descendants(&subsection)
            .iter()
            .any(|node| is_element(node, TITLE_ELEMENTS) && has_class(node, SUBSECTION_TITLE_CLASS));

        if !has_title {
            let title = subsection_title();
            title.parent.set(Some(Rc::downgrade(&subsection)));
            subsection.children.borrow_mut().insert(0, title);
        }
    }
}

/// `<h4 class="subsection-title">Subsection</h4>`
fn subsection_title() -> Handle {
    let title = Node::new(NodeData::Element {
        name: html_name("h4"),
        attrs: RefCell::new(vec![Attribute {
            name: QualName::new(None, Namespace::from(""), LocalName::from("class")),
            value: StrTendril::from_slice(SUBSECTION_TITLE_CLASS),
        }]),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    });

    let text = Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from_slice(DEFAULT_SUBSECTION_TITLE)),
    });
    text.parent.set(Some(Rc::downgrade(&title)));
    title.children.borrow_mut().push(text);

    title
}

fn html_name(local: &str) -> QualName {
    QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(local))
}

/// Every node below `node`, in document order.
fn descendants(node: &Handle) -> Vec<Handle> {
    let mut out = Vec::new();
    collect_descendants(node, &mut out);
    out
}

fn collect_descendants(node: &Handle, out: &mut Vec<Handle>) {
    for child in child_containers(node) {
        if !matches!(child.data, NodeData::Document) {
            out.push(child.clone());
        }
        collect_descendants(&child, out);
    }
}

/// Direct children plus a `<template>`'s content fragment, so every rule walks
/// the same tree.
fn child_containers(node: &Handle) -> Vec<Handle> {
    let mut children = node.children.borrow().clone();
    if let NodeData::Element {
        template_contents, ..
    } = &node.data
    {
        if let Some(contents) = template_contents.borrow().as_ref() {
            children.push(contents.clone());
        }
    }
    children
}

fn is_element(node: &Handle, names: &[&str]) -> bool {
    match &node.data {
        NodeData::Element { name, .. } => names.contains(&&*name.local),
        _ => false,
    }
}

/// Exact token match against the whitespace-separated `class` attribute.
fn has_class(node: &Handle, class: &str) -> bool {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs.borrow().iter().any(|attr| {
            &*attr.name.local == "class" && attr.value.split_ascii_whitespace().any(|c| c == class)
        }),
        _ => false,
    }
}

fn remove_style(node: &Handle) {
    if let NodeData::Element { attrs, .. } = &node.data {
        attrs
            .borrow_mut()
            .retain(|attr| &*attr.name.local != "style");
    }
}
