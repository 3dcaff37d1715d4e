//! HTML AST
//!
//! The generic markup tree the HTML parser produces for a template. It knows
//! nothing about bindings; the language service only queries it to find which
//! raw attribute (and attribute value) a position falls in.

use crate::ast_path::AstPath;
use crate::parse_util::{in_span_exclusive, Span, Spanned};

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(Text),
    Comment(Comment),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
    pub source_span: Span,
    pub start_source_span: Span,
    pub end_source_span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    /// Covers `name="value"`.
    pub source_span: Span,
    pub key_span: Option<Span>,
    /// Covers the value without its quotes.
    pub value_span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub value: String,
    pub source_span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub value: Option<String>,
    pub source_span: Span,
}

/// Borrowed view of any HTML node, attributes included.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Element(&'a Element),
    Attribute(&'a Attribute),
    Text(&'a Text),
    Comment(&'a Comment),
}

impl<'a> From<&'a Node> for NodeRef<'a> {
    fn from(node: &'a Node) -> Self {
        match node {
            Node::Element(e) => NodeRef::Element(e),
            Node::Text(t) => NodeRef::Text(t),
            Node::Comment(c) => NodeRef::Comment(c),
        }
    }
}

impl Spanned for NodeRef<'_> {
    fn source_span(&self) -> Span {
        match self {
            NodeRef::Element(e) => e.source_span,
            NodeRef::Attribute(a) => a.source_span,
            NodeRef::Text(t) => t.source_span,
            NodeRef::Comment(c) => c.source_span,
        }
    }
}

pub type HtmlAstPath<'a> = AstPath<NodeRef<'a>>;

impl<'a> HtmlAstPath<'a> {
    /// The nearest enclosing attribute.
    pub fn first_attribute(&self) -> Option<&'a Attribute> {
        self.first(|node| match node {
            NodeRef::Attribute(attr) => Some(attr),
            _ => None,
        })
    }
}

/// Collects every node whose span contains `position`, outermost first.
pub fn get_path_to_node_at_position(nodes: &[Node], position: usize) -> HtmlAstPath<'_> {
    let mut path = HtmlAstPath::new([], position);
    visit_all(nodes, position, &mut path);
    path
}

fn visit_all<'a>(nodes: &'a [Node], position: usize, path: &mut HtmlAstPath<'a>) {
    for node in nodes {
        visit(NodeRef::from(node), position, path);
    }
}

fn visit<'a>(node: NodeRef<'a>, position: usize, path: &mut HtmlAstPath<'a>) {
    if !in_span_exclusive(position, Some(node.source_span())) {
        return;
    }
    path.push(node);
    if let NodeRef::Element(element) = node {
        for attr in &element.attrs {
            visit(NodeRef::Attribute(attr), position, path);
        }
        visit_all(&element.children, position, path);
    }
}
