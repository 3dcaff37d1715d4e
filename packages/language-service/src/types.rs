//! Language service data passed between the host and the resolvers.

use crate::html_ast;
use crate::parse_util::Span;
use crate::symbols::{StaticSymbol, SymbolQuery, SymbolRef, SymbolTable};
use crate::template_ast::TemplateAst;
use std::fmt;
use std::rc::Rc;

/// A component template as it appears in its enclosing document.
#[derive(Clone)]
pub struct TemplateSource {
    pub file_name: String,
    /// Document-relative location of the template text.
    pub span: Span,
    /// The component class owning the template.
    pub type_: StaticSymbol,
    /// Members of the component class, visible to every expression.
    pub members: SymbolTable,
    pub query: Rc<dyn SymbolQuery>,
}

impl fmt::Debug for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateSource")
            .field("file_name", &self.file_name)
            .field("span", &self.span)
            .field("type_", &self.type_)
            .finish_non_exhaustive()
    }
}

/// Both parses of one template. Read-only for the language service.
#[derive(Debug, Clone)]
pub struct AstResult {
    pub html_ast: Vec<html_ast::Node>,
    pub template_ast: Vec<TemplateAst>,
    pub template: TemplateSource,
}

/// A symbol found at a position.
#[derive(Debug, Clone)]
pub struct SymbolInfo {
    pub symbol: SymbolRef,
    /// Document-relative span of the text the symbol was found for.
    pub span: Span,
    /// The directive type, when the position was on a directive instance.
    pub static_symbol: Option<StaticSymbol>,
}

/// The parts of an [`AstResult`] that expression scoping needs.
#[derive(Clone, Copy)]
pub struct DiagnosticTemplateInfo<'a> {
    pub file_name: &'a str,
    pub offset: usize,
    pub query: &'a dyn SymbolQuery,
    pub members: &'a SymbolTable,
    pub html_ast: &'a [html_ast::Node],
    pub template_ast: &'a [TemplateAst],
}

impl<'a> From<&'a AstResult> for DiagnosticTemplateInfo<'a> {
    fn from(info: &'a AstResult) -> Self {
        DiagnosticTemplateInfo {
            file_name: &info.template.file_name,
            offset: info.template.span.start,
            query: info.template.query.as_ref(),
            members: &info.template.members,
            html_ast: &info.html_ast,
            template_ast: &info.template_ast,
        }
    }
}
