//! Expression scopes
//!
//! Which names an expression at a given template position can see.

use crate::parse_util::{offset_span, Span};
use crate::symbols::{
    BuiltinType, DeclaredSymbol, DirectiveKind, Location, SymbolRef, SymbolTable,
};
use crate::template_ast::{walk, TemplateAstPath, TemplateAstRef};
use crate::types::DiagnosticTemplateInfo;
use std::rc::Rc;

pub trait ExpressionScopeProvider {
    /// Names visible to an expression at the tail of `path`. Event handlers
    /// (`include_event`) additionally see `$event`.
    fn scope(
        &self,
        info: &DiagnosticTemplateInfo<'_>,
        path: &TemplateAstPath<'_>,
        include_event: bool,
    ) -> SymbolTable;
}

/// Component members, then template references, then the variables of the
/// enclosing templates, then `$event`. Later entries shadow earlier ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateScope;

impl ExpressionScopeProvider for TemplateScope {
    fn scope(
        &self,
        info: &DiagnosticTemplateInfo<'_>,
        path: &TemplateAstPath<'_>,
        include_event: bool,
    ) -> SymbolTable {
        let references = get_references(info);
        let variables = get_var_declarations(info, path);
        let events = if include_event {
            get_event_declaration(info)
        } else {
            SymbolTable::new()
        };

        if references.is_empty() && variables.is_empty() && events.is_empty() {
            return info.members.clone();
        }
        info.members.clone().merge([references, variables, events])
    }
}

fn location(info: &DiagnosticTemplateInfo<'_>, span: Span) -> Location {
    Location {
        file_name: info.file_name.to_string(),
        span: offset_span(span, info.offset),
    }
}

fn get_references(info: &DiagnosticTemplateInfo<'_>) -> SymbolTable {
    let mut table = SymbolTable::new();
    walk(info.template_ast, &mut |node| {
        if let TemplateAstRef::Reference(reference) = node {
            let type_ = reference
                .value
                .as_ref()
                .and_then(|value| info.query.get_type_symbol(value));
            let symbol = DeclaredSymbol::new(&reference.name, DirectiveKind::Reference, type_)
                .with_definition(location(info, reference.source_span));
            table.insert(Rc::new(symbol) as SymbolRef);
        }
    });
    table
}

fn get_var_declarations(
    info: &DiagnosticTemplateInfo<'_>,
    path: &TemplateAstPath<'_>,
) -> SymbolTable {
    let any = info.query.get_builtin_type(BuiltinType::Any);
    path.nodes()
        .filter_map(|node| match node {
            TemplateAstRef::EmbeddedTemplate(template) => Some(template),
            _ => None,
        })
        .flat_map(|template| template.variables.iter())
        .map(|variable| {
            let symbol = DeclaredSymbol::new(&variable.name, DirectiveKind::Variable, Some(any.clone()))
                .with_definition(location(info, variable.source_span));
            Rc::new(symbol) as SymbolRef
        })
        .collect()
}

fn get_event_declaration(info: &DiagnosticTemplateInfo<'_>) -> SymbolTable {
    let any = info.query.get_builtin_type(BuiltinType::Any);
    let event = DeclaredSymbol::new("$event", DirectiveKind::Variable, Some(any));
    [Rc::new(event) as SymbolRef].into_iter().collect()
}
