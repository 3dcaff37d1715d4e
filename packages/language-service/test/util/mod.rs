//! Hand-built template fixtures and an in-memory type system.

#![allow(dead_code)]

use angular_language_service::expression_ast::{Ast, ImplicitReceiver, MethodCall, PropertyRead};
use angular_language_service::html_ast;
use angular_language_service::symbols::{
    BuiltinType, Definition, DirectiveKind, Location, Signature, StaticSymbol, Symbol, SymbolQuery,
    SymbolRef, SymbolTable,
};
use angular_language_service::template_ast::{CompileDirectiveSummary, CompileTypeMetadata, TemplateAst};
use angular_language_service::{AstResult, Span, TemplateSource};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::rc::Rc;

pub const FILE: &str = "app.component.ts";

/// Routes library logs to the test output; `RUST_LOG=trace` shows lookups.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Where the template starts inside its document.
pub const TEMPLATE_START: usize = 100;

#[derive(Debug)]
pub struct TestSymbol {
    pub name: String,
    pub kind: DirectiveKind,
    pub type_: Option<SymbolRef>,
    pub members: SymbolTable,
    pub callable: bool,
    pub result: Option<SymbolRef>,
}

impl Symbol for TestSymbol {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> DirectiveKind {
        self.kind
    }

    fn language(&self) -> &str {
        "typescript"
    }

    fn type_(&self) -> Option<SymbolRef> {
        self.type_.clone()
    }

    fn container(&self) -> Option<SymbolRef> {
        None
    }

    fn is_public(&self) -> bool {
        true
    }

    fn is_callable(&self) -> bool {
        self.callable
    }

    fn is_nullable(&self) -> bool {
        false
    }

    fn definition(&self) -> Definition {
        Some(vec![Location {
            file_name: FILE.to_string(),
            span: Span::new(0, self.name.len()),
        }])
    }

    fn members(&self) -> SymbolTable {
        self.members.clone()
    }

    fn signatures(&self) -> Vec<Signature> {
        if !self.callable {
            return Vec::new();
        }
        vec![Signature {
            arguments: SymbolTable::new(),
            result: self.result.clone(),
        }]
    }

    fn select_signature(&self, _types: &[SymbolRef]) -> Option<Signature> {
        self.signatures().into_iter().next()
    }

    fn indexed(&self, _argument: &SymbolRef) -> Option<SymbolRef> {
        None
    }

    fn type_arguments(&self) -> Option<Vec<SymbolRef>> {
        None
    }
}

pub fn class(name: &str, members: Vec<SymbolRef>) -> SymbolRef {
    Rc::new(TestSymbol {
        name: name.to_string(),
        kind: DirectiveKind::Type,
        type_: None,
        members: members.into_iter().collect(),
        callable: false,
        result: None,
    })
}

pub fn field(name: &str, type_: Option<SymbolRef>) -> SymbolRef {
    Rc::new(TestSymbol {
        name: name.to_string(),
        kind: DirectiveKind::Property,
        type_,
        members: SymbolTable::new(),
        callable: false,
        result: None,
    })
}

pub fn method(name: &str, result: Option<SymbolRef>) -> SymbolRef {
    Rc::new(TestSymbol {
        name: name.to_string(),
        kind: DirectiveKind::Method,
        type_: None,
        members: SymbolTable::new(),
        callable: true,
        result,
    })
}

pub struct TestQuery {
    types: HashMap<StaticSymbol, SymbolRef>,
    any: SymbolRef,
}

impl TestQuery {
    pub fn new() -> Self {
        TestQuery {
            types: HashMap::new(),
            any: class("any", vec![]),
        }
    }

    pub fn with_type(mut self, reference: StaticSymbol, symbol: SymbolRef) -> Self {
        self.types.insert(reference, symbol);
        self
    }
}

impl SymbolQuery for TestQuery {
    fn get_type_symbol(&self, type_: &StaticSymbol) -> Option<SymbolRef> {
        self.types.get(type_).cloned()
    }

    fn get_builtin_type(&self, _kind: BuiltinType) -> SymbolRef {
        self.any.clone()
    }
}

pub fn static_symbol(name: &str) -> StaticSymbol {
    StaticSymbol::new("app.ts", name)
}

pub fn directive_summary(
    name: &str,
    selector: &str,
    is_component: bool,
    inputs: &[(&str, &str)],
    outputs: &[(&str, &str)],
) -> CompileDirectiveSummary {
    let mapping = |pairs: &[(&str, &str)]| -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(field, public)| (field.to_string(), public.to_string()))
            .collect()
    };
    CompileDirectiveSummary {
        type_: CompileTypeMetadata {
            reference: static_symbol(name),
        },
        is_component,
        selector: Some(selector.to_string()),
        inputs: mapping(inputs),
        outputs: mapping(outputs),
        export_as: None,
    }
}

/// Span of the first occurrence of `needle` at or after `from`.
pub fn find_from(source: &str, needle: &str, from: usize) -> Span {
    let start = source[from..]
        .find(needle)
        .unwrap_or_else(|| panic!("`{}` not found in `{}`", needle, source))
        + from;
    Span::new(start, start + needle.len())
}

pub fn find(source: &str, needle: &str) -> Span {
    find_from(source, needle, 0)
}

/// Span relative to `base`.
pub fn relative(span: Span, base: Span) -> Span {
    Span::new(span.start - base.start, span.end - base.start)
}

/// Document offset of the `n`th character of `needle` inside the template.
pub fn position_in(source: &str, needle: &str, n: usize) -> usize {
    TEMPLATE_START + find(source, needle).start + n
}

pub fn to_document(span: Span) -> Span {
    Span::new(span.start + TEMPLATE_START, span.end + TEMPLATE_START)
}

/// `name` read off the component (implicit receiver), at `span`.
pub fn read(name: &str, span: Span) -> Ast {
    Ast::PropertyRead(PropertyRead {
        span,
        name_span: span,
        receiver: Box::new(implicit(span.start)),
        name: name.to_string(),
    })
}

pub fn member_read(receiver: Ast, name: &str, name_span: Span) -> Ast {
    let span = Span::new(receiver.span().start, name_span.end);
    Ast::PropertyRead(PropertyRead {
        span,
        name_span,
        receiver: Box::new(receiver),
        name: name.to_string(),
    })
}

pub fn call(name: &str, name_span: Span, args: Vec<Ast>, span: Span) -> Ast {
    Ast::MethodCall(MethodCall {
        span,
        name_span,
        receiver: Box::new(implicit(span.start)),
        name: name.to_string(),
        args,
    })
}

pub fn implicit(at: usize) -> Ast {
    Ast::ImplicitReceiver(ImplicitReceiver {
        span: Span::new(at, at),
    })
}

/// An HTML attribute covering `text` (e.g. `title="hi"`) with a quoted value.
pub fn html_attr(source: &str, text: &str, name: &str, value: &str) -> html_ast::Attribute {
    let source_span = find(source, text);
    let key_span = find_from(source, name, source_span.start);
    let value_span = find_from(source, value, key_span.end);
    html_ast::Attribute {
        name: name.to_string(),
        value: value.to_string(),
        source_span,
        key_span: Some(key_span),
        value_span: Some(value_span),
    }
}

pub fn html_element(source: &str, name: &str, attrs: Vec<html_ast::Attribute>) -> html_ast::Node {
    let start_tag_end = source.find('>').map(|i| i + 1).unwrap_or(source.len());
    html_ast::Node::Element(html_ast::Element {
        name: name.to_string(),
        attrs,
        children: vec![],
        source_span: Span::new(0, source.len()),
        start_source_span: Span::new(0, start_tag_end),
        end_source_span: None,
    })
}

pub fn ast_result(
    source: &str,
    html_ast: Vec<html_ast::Node>,
    template_ast: Vec<TemplateAst>,
    members: Vec<SymbolRef>,
    query: TestQuery,
) -> AstResult {
    AstResult {
        html_ast,
        template_ast,
        template: TemplateSource {
            file_name: FILE.to_string(),
            span: Span::new(TEMPLATE_START, TEMPLATE_START + source.len()),
            type_: static_symbol("AppComponent"),
            members: members.into_iter().collect(),
            query: Rc::new(query),
        },
    }
}
