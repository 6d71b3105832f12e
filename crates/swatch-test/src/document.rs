//! In-memory documents with explicit computed styles.
//!
//! A [`SyntheticDocument`] starts as `<html><body></body></html>`. Elements are
//! appended with the [`Element`] builder and carry their computed styles
//! directly; there is no cascade. Styles set with
//! [`SyntheticDocument::with_default_style`] apply to every element that does
//! not set the property itself.
//!
//! ```rust
//! use swatch_dispatch::StyledDocument;
//! use swatch_test::{Element, SyntheticDocument};
//!
//! let mut doc = SyntheticDocument::new().with_default_style("border-radius", "8px");
//! let header = doc.append_to_body(Element::new("header").class("site").style("color", "#111"));
//! doc.append(header, Element::new("a").class("btn").text("Sign up"));
//!
//! assert_eq!(doc.query_selector("header.site"), Some(header));
//! assert_eq!(doc.computed_style(header, "border-radius").as_deref(), Some("8px"));
//! assert_eq!(doc.text_content(header), "Sign up");
//! ```

use std::collections::HashMap;

use swatch_dispatch::{ElementId, StyledDocument};

use crate::selector::{Matchable, SelectorList};

const ROOT: ElementId = 0;

/// Builder for one element.
#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
    styles: HashMap<String, String>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    /// Adds one or more space-separated classes.
    pub fn class(mut self, classes: &str) -> Self {
        let existing = self.attr_value("class").unwrap_or_default();
        let joined = if existing.is_empty() {
            classes.trim().to_string()
        } else {
            format!("{} {}", existing, classes.trim())
        };
        self.set_attr("class", &joined);
        self
    }

    pub fn id(mut self, id: &str) -> Self {
        self.set_attr("id", id);
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Own text, placed before any children's text.
    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Sets a computed style value.
    pub fn style(mut self, property: &str, value: &str) -> Self {
        self.styles.insert(property.to_string(), value.to_string());
        self
    }

    /// Sets all four `border-<side>-width`/`-color` values and the `border`
    /// shorthand the way engines report them.
    pub fn border(self, width: &str, style: &str, color: &str) -> Self {
        let mut el = self.style("border", &format!("{} {} {}", width, style, color));
        for side in ["top", "right", "bottom", "left"] {
            el = el
                .style(&format!("border-{}-width", side), width)
                .style(&format!("border-{}-color", side), color);
        }
        el
    }

    fn attr_value(&self, name: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    fn set_attr(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.attributes.push((name, value.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    element: Element,
    children: Vec<ElementId>,
}

impl Matchable for Node {
    fn tag(&self) -> &str {
        &self.element.tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.element
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A document tree implementing [`StyledDocument`].
#[derive(Debug, Clone)]
pub struct SyntheticDocument {
    nodes: Vec<Node>,
    body: Option<ElementId>,
    default_styles: HashMap<String, String>,
    media: HashMap<String, bool>,
    prefers_dark: bool,
}

impl Default for SyntheticDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticDocument {
    /// An empty `<html><body></body></html>` document.
    pub fn new() -> Self {
        let mut doc = Self::without_body();
        doc.body = Some(doc.append(ROOT, Element::new("body")));
        doc
    }

    /// A document with only a root element.
    pub fn without_body() -> Self {
        SyntheticDocument {
            nodes: vec![Node {
                element: Element::new("html"),
                children: Vec::new(),
            }],
            body: None,
            default_styles: HashMap::new(),
            media: HashMap::new(),
            prefers_dark: false,
        }
    }

    pub fn root_id(&self) -> ElementId {
        ROOT
    }

    pub fn body_id(&self) -> Option<ElementId> {
        self.body
    }

    /// Appends `element` as the last child of `parent` and returns its id.
    ///
    /// # Panics
    ///
    /// If `parent` is not an element of this document.
    pub fn append(&mut self, parent: ElementId, element: Element) -> ElementId {
        assert!(parent < self.nodes.len(), "unknown parent element {}", parent);
        let id = self.nodes.len();
        self.nodes.push(Node {
            element,
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Appends to `<body>`, or to the root when there is no body.
    pub fn append_to_body(&mut self, element: Element) -> ElementId {
        self.append(self.body.unwrap_or(ROOT), element)
    }

    /// Sets a computed style on an existing element.
    pub fn set_style(&mut self, element: ElementId, property: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.element
                .styles
                .insert(property.to_string(), value.to_string());
        }
    }

    /// Adds classes to an existing element.
    pub fn add_class(&mut self, element: ElementId, classes: &str) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.element = std::mem::take(&mut node.element).class(classes);
        }
    }

    /// Style reported for every element that does not set `property`.
    pub fn with_default_style(mut self, property: &str, value: &str) -> Self {
        self.default_styles
            .insert(property.to_string(), value.to_string());
        self
    }

    /// Fixes the answer to a media query.
    pub fn with_media(mut self, query: &str, matches: bool) -> Self {
        self.media.insert(normalize_query(query), matches);
        self
    }

    /// Sets the color scheme the page is viewed in, answering
    /// `prefers-color-scheme` queries. Light unless set.
    pub fn prefers_dark(mut self, dark: bool) -> Self {
        self.prefers_dark = dark;
        self
    }

    fn preorder(&self, from: ElementId, out: &mut Vec<ElementId>) {
        out.push(from);
        for &child in &self.nodes[from].children {
            self.preorder(child, out);
        }
    }
}

impl StyledDocument for SyntheticDocument {
    fn elements(&self) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        self.preorder(ROOT, &mut out);
        out
    }

    fn root(&self) -> Option<ElementId> {
        Some(ROOT)
    }

    fn body(&self) -> Option<ElementId> {
        self.body
    }

    fn query_selector_all(&self, selectors: &str) -> Vec<ElementId> {
        let list = match SelectorList::parse(selectors) {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!(%err, "selector not supported by synthetic document");
                return Vec::new();
            }
        };
        self.elements()
            .into_iter()
            .filter(|&id| list.matches(&self.nodes[id]))
            .collect()
    }

    fn tag_name(&self, element: ElementId) -> String {
        self.nodes
            .get(element)
            .map(|n| n.element.tag.clone())
            .unwrap_or_default()
    }

    fn class_name(&self, element: ElementId) -> String {
        self.nodes
            .get(element)
            .and_then(|n| n.attribute("class"))
            .unwrap_or_default()
            .to_string()
    }

    fn text_content(&self, element: ElementId) -> String {
        if element >= self.nodes.len() {
            return String::new();
        }
        let mut ids = Vec::new();
        self.preorder(element, &mut ids);
        ids.into_iter()
            .map(|id| self.nodes[id].element.text.as_str())
            .collect()
    }

    fn computed_style(&self, element: ElementId, property: &str) -> Option<String> {
        let node = self.nodes.get(element)?;
        node.element
            .styles
            .get(property)
            .or_else(|| self.default_styles.get(property))
            .cloned()
    }

    /// Fixed answers win. Otherwise `prefers-color-scheme` follows
    /// [`prefers_dark`](SyntheticDocument::prefers_dark) and every other query
    /// is false.
    fn matches_media(&self, query: &str) -> bool {
        let query = normalize_query(query);
        if let Some(&fixed) = self.media.get(&query) {
            return fixed;
        }
        match query.as_str() {
            "(prefers-color-scheme: dark)" => self.prefers_dark,
            "(prefers-color-scheme: light)" => !self.prefers_dark,
            _ => false,
        }
    }
}

fn normalize_query(query: &str) -> String {
    query
        .to_ascii_lowercase()
        .replace(':', ": ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("( ", "(")
        .replace(" )", ")")
}
