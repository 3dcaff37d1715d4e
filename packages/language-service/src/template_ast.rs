//! Template AST
//!
//! The template tree after directive matching: every element knows which
//! directives were attached to it, and bindings are split into element
//! properties, directive inputs and events. The HTML AST and this tree describe
//! the same text and share template-relative offsets, but no nodes.

use crate::ast_path::AstPath;
use crate::expression_ast::Ast;
use crate::parse_util::{in_span, is_narrower, Span, Spanned};
use crate::symbols::StaticSymbol;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileTypeMetadata {
    pub reference: StaticSymbol,
}

/// What the compiler knows about a directive class, independent of where it
/// is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileDirectiveSummary {
    #[serde(rename = "type")]
    pub type_: CompileTypeMetadata,
    pub is_component: bool,
    pub selector: Option<String>,
    /// class field name -> public binding name
    #[serde(default)]
    pub inputs: IndexMap<String, String>,
    /// class field name -> public event name
    #[serde(default)]
    pub outputs: IndexMap<String, String>,
    #[serde(default)]
    pub export_as: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplateAst {
    Element(ElementAst),
    EmbeddedTemplate(EmbeddedTemplateAst),
    Reference(ReferenceAst),
    Variable(VariableAst),
    Event(BoundEventAst),
    ElementProperty(BoundElementPropertyAst),
    Attr(AttrAst),
    Directive(DirectiveAst),
    DirectiveProperty(BoundDirectivePropertyAst),
    BoundText(BoundTextAst),
    Text(TextAst),
    NgContent(NgContentAst),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementAst {
    pub name: String,
    pub attrs: Vec<AttrAst>,
    pub inputs: Vec<BoundElementPropertyAst>,
    pub outputs: Vec<BoundEventAst>,
    pub references: Vec<ReferenceAst>,
    pub directives: Vec<DirectiveAst>,
    pub children: Vec<TemplateAst>,
    pub source_span: Span,
}

/// `<ng-template>` or a `*structural` directive host.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedTemplateAst {
    pub attrs: Vec<AttrAst>,
    pub outputs: Vec<BoundEventAst>,
    pub references: Vec<ReferenceAst>,
    pub variables: Vec<VariableAst>,
    pub directives: Vec<DirectiveAst>,
    pub children: Vec<TemplateAst>,
    pub source_span: Span,
}

/// `#name` or `#name="exportAs"`. `value` is the referenced directive type,
/// or `None` when it could not be determined.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceAst {
    pub name: String,
    pub value: Option<StaticSymbol>,
    pub source_span: Span,
}

/// `let-name="value"`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableAst {
    pub name: String,
    pub value: String,
    pub source_span: Span,
}

/// `(name)="handler"`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundEventAst {
    pub name: String,
    pub target: Option<String>,
    pub handler: Ast,
    pub source_span: Span,
    pub handler_span: Span,
}

/// `[name]="value"` that binds a DOM property rather than a directive input.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundElementPropertyAst {
    pub name: String,
    pub value: Ast,
    pub source_span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttrAst {
    pub name: String,
    pub value: String,
    pub source_span: Span,
}

/// One directive attached to an element.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveAst {
    pub directive: CompileDirectiveSummary,
    pub inputs: Vec<BoundDirectivePropertyAst>,
    pub source_span: Span,
}

/// `[templateName]="value"` bound to a directive input.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundDirectivePropertyAst {
    /// The directive's class field.
    pub directive_name: String,
    /// The name used in the template.
    pub template_name: String,
    pub value: Ast,
    pub source_span: Span,
}

/// `{{ value }}` inside text. `value` spans are relative to `source_span.start`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundTextAst {
    pub value: Ast,
    pub source_span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextAst {
    pub value: String,
    pub source_span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NgContentAst {
    pub index: usize,
    pub ng_content_index: usize,
    pub source_span: Span,
}

/// Borrowed view of any template node, including those nested inside
/// elements (attributes, bindings, directives).
#[derive(Debug, Clone, Copy)]
pub enum TemplateAstRef<'a> {
    Element(&'a ElementAst),
    EmbeddedTemplate(&'a EmbeddedTemplateAst),
    Reference(&'a ReferenceAst),
    Variable(&'a VariableAst),
    Event(&'a BoundEventAst),
    ElementProperty(&'a BoundElementPropertyAst),
    Attr(&'a AttrAst),
    Directive(&'a DirectiveAst),
    DirectiveProperty(&'a BoundDirectivePropertyAst),
    BoundText(&'a BoundTextAst),
    Text(&'a TextAst),
    NgContent(&'a NgContentAst),
}

impl<'a> From<&'a TemplateAst> for TemplateAstRef<'a> {
    fn from(ast: &'a TemplateAst) -> Self {
        match ast {
            TemplateAst::Element(a) => TemplateAstRef::Element(a),
            TemplateAst::EmbeddedTemplate(a) => TemplateAstRef::EmbeddedTemplate(a),
            TemplateAst::Reference(a) => TemplateAstRef::Reference(a),
            TemplateAst::Variable(a) => TemplateAstRef::Variable(a),
            TemplateAst::Event(a) => TemplateAstRef::Event(a),
            TemplateAst::ElementProperty(a) => TemplateAstRef::ElementProperty(a),
            TemplateAst::Attr(a) => TemplateAstRef::Attr(a),
            TemplateAst::Directive(a) => TemplateAstRef::Directive(a),
            TemplateAst::DirectiveProperty(a) => TemplateAstRef::DirectiveProperty(a),
            TemplateAst::BoundText(a) => TemplateAstRef::BoundText(a),
            TemplateAst::Text(a) => TemplateAstRef::Text(a),
            TemplateAst::NgContent(a) => TemplateAstRef::NgContent(a),
        }
    }
}

impl<'a> TemplateAstRef<'a> {
    /// Directives attached to this node, if it is a directive host.
    pub fn directives(&self) -> Option<&'a [DirectiveAst]> {
        match *self {
            TemplateAstRef::Element(e) => Some(&e.directives),
            TemplateAstRef::EmbeddedTemplate(t) => Some(&t.directives),
            _ => None,
        }
    }
}

impl Spanned for TemplateAstRef<'_> {
    fn source_span(&self) -> Span {
        match self {
            TemplateAstRef::Element(a) => a.source_span,
            TemplateAstRef::EmbeddedTemplate(a) => a.source_span,
            TemplateAstRef::Reference(a) => a.source_span,
            TemplateAstRef::Variable(a) => a.source_span,
            TemplateAstRef::Event(a) => a.source_span,
            TemplateAstRef::ElementProperty(a) => a.source_span,
            TemplateAstRef::Attr(a) => a.source_span,
            TemplateAstRef::Directive(a) => a.source_span,
            TemplateAstRef::DirectiveProperty(a) => a.source_span,
            TemplateAstRef::BoundText(a) => a.source_span,
            TemplateAstRef::Text(a) => a.source_span,
            TemplateAstRef::NgContent(a) => a.source_span,
        }
    }
}

impl Spanned for TemplateAst {
    fn source_span(&self) -> Span {
        TemplateAstRef::from(self).source_span()
    }
}

pub type TemplateAstPath<'a> = AstPath<TemplateAstRef<'a>>;

impl<'a> TemplateAstPath<'a> {
    /// The nearest enclosing node that directives attach to.
    pub fn first_directive_host(&self) -> Option<&'a [DirectiveAst]> {
        self.first(|node| node.directives())
    }
}

/// Builds the path to the deepest template node containing `position`.
///
/// A node only extends the path if its span is strictly narrower than the
/// current tail, so of two nodes with identical spans the one visited first
/// wins. Within an element, attributes are visited before inputs, outputs,
/// references, directives and children.
pub fn find_template_ast_at(nodes: &[TemplateAst], position: usize) -> TemplateAstPath<'_> {
    let mut finder = PathFinder {
        path: TemplateAstPath::new([], position),
        position,
    };
    finder.visit_all(nodes.iter().map(TemplateAstRef::from));
    finder.path
}

struct PathFinder<'a> {
    path: TemplateAstPath<'a>,
    position: usize,
}

impl<'a> PathFinder<'a> {
    fn visit_all(&mut self, nodes: impl IntoIterator<Item = TemplateAstRef<'a>>) {
        for node in nodes {
            self.visit(node);
        }
    }

    fn visit(&mut self, node: TemplateAstRef<'a>) {
        let span = node.source_span();
        if !in_span(self.position, Some(span)) {
            return;
        }
        let extends = match self.path.tail() {
            None => true,
            Some(tail) => is_narrower(span, tail.source_span()),
        };
        if extends {
            self.path.push(node);
        }

        match node {
            TemplateAstRef::Element(e) => {
                self.visit_all(e.attrs.iter().map(TemplateAstRef::Attr));
                self.visit_all(e.inputs.iter().map(TemplateAstRef::ElementProperty));
                self.visit_all(e.outputs.iter().map(TemplateAstRef::Event));
                self.visit_all(e.references.iter().map(TemplateAstRef::Reference));
                self.visit_all(e.directives.iter().map(TemplateAstRef::Directive));
                self.visit_all(e.children.iter().map(TemplateAstRef::from));
            }
            TemplateAstRef::EmbeddedTemplate(t) => {
                self.visit_all(t.attrs.iter().map(TemplateAstRef::Attr));
                self.visit_all(t.outputs.iter().map(TemplateAstRef::Event));
                self.visit_all(t.references.iter().map(TemplateAstRef::Reference));
                self.visit_all(t.variables.iter().map(TemplateAstRef::Variable));
                self.visit_all(t.directives.iter().map(TemplateAstRef::Directive));
                self.visit_all(t.children.iter().map(TemplateAstRef::from));
            }
            TemplateAstRef::Directive(d) => {
                self.visit_all(d.inputs.iter().map(TemplateAstRef::DirectiveProperty));
            }
            _ => {}
        }
    }
}

/// Every template node of the tree, depth first.
pub fn walk<'a>(nodes: &'a [TemplateAst], visit: &mut dyn FnMut(TemplateAstRef<'a>)) {
    for node in nodes {
        let node = TemplateAstRef::from(node);
        visit(node);
        match node {
            TemplateAstRef::Element(e) => {
                e.references.iter().for_each(|r| visit(TemplateAstRef::Reference(r)));
                walk(&e.children, visit);
            }
            TemplateAstRef::EmbeddedTemplate(t) => {
                t.references.iter().for_each(|r| visit(TemplateAstRef::Reference(r)));
                t.variables.iter().for_each(|v| visit(TemplateAstRef::Variable(v)));
                walk(&t.children, visit);
            }
            _ => {}
        }
    }
}
