//! Symbol location
//!
//! Maps a position in a document to the symbol the template text at that
//! position refers to, for hover and go-to-definition.
//!
//! The position is looked up in both trees of an [`AstResult`]: the template
//! AST decides what kind of construct the cursor is on, and the HTML AST
//! supplies the raw attribute value an embedded expression was parsed from.

use crate::config::LanguageServiceConfig;
use crate::directive_matching::{CssSelector, SelectorMatcher};
use crate::expression_ast::Ast;
use crate::expression_scope::{ExpressionScopeProvider, TemplateScope};
use crate::expressions::{AstSymbolResolver, ExpressionSymbolResolver};
use crate::html_ast::{get_path_to_node_at_position, Attribute};
use crate::parse_util::{in_span, offset_span, Span};
use crate::symbols::{DirectiveKind, OverrideKindSymbol, StaticSymbol, SymbolRef};
use crate::template_ast::{
    find_template_ast_at, AttrAst, BoundDirectivePropertyAst, BoundEventAst, BoundTextAst,
    CompileDirectiveSummary, DirectiveAst, ElementAst, ReferenceAst, TemplateAstPath,
    TemplateAstRef,
};
use crate::types::{AstResult, DiagnosticTemplateInfo, SymbolInfo};
use indexmap::IndexMap;
use tracing::{debug, trace, warn};

/// Finds the symbol at `position` (document-relative) using the default
/// expression scope and resolver.
pub fn locate_symbol(info: &AstResult, position: usize) -> Option<SymbolInfo> {
    SymbolLocator::new(&TemplateScope, &AstSymbolResolver).locate(info, position)
}

pub struct SymbolLocator<'a> {
    scopes: &'a dyn ExpressionScopeProvider,
    resolver: &'a dyn ExpressionSymbolResolver,
    config: LanguageServiceConfig,
}

impl<'a> SymbolLocator<'a> {
    pub fn new(
        scopes: &'a dyn ExpressionScopeProvider,
        resolver: &'a dyn ExpressionSymbolResolver,
    ) -> Self {
        SymbolLocator {
            scopes,
            resolver,
            config: LanguageServiceConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LanguageServiceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn locate(&self, info: &AstResult, position: usize) -> Option<SymbolInfo> {
        let template_start = info.template.span.start;
        let Some(template_position) = position.checked_sub(template_start) else {
            trace!(position, template_start, "position precedes template");
            return None;
        };

        let path = find_template_ast_at(&info.template_ast, template_position);
        let tail = path.tail()?;

        let visitor = LocateVisitor {
            locator: self,
            info,
            path: &path,
            template_position,
        };
        let resolution = visitor.visit(tail);
        debug!(
            position,
            template_position,
            resolved = resolution.symbol.is_some(),
            "locate symbol"
        );

        match resolution {
            Resolution {
                symbol: Some(symbol),
                span: Some(span),
                static_symbol,
            } => Some(SymbolInfo {
                symbol,
                span: offset_span(span, template_start),
                static_symbol,
            }),
            _ => None,
        }
    }
}

/// What a node handler found. Only a result with both a symbol and a span
/// is reported.
#[derive(Default)]
struct Resolution {
    symbol: Option<SymbolRef>,
    span: Option<Span>,
    static_symbol: Option<StaticSymbol>,
}

impl Resolution {
    fn new(symbol: Option<SymbolRef>, span: Span) -> Self {
        Resolution {
            symbol,
            span: Some(span),
            static_symbol: None,
        }
    }
}

struct LocateVisitor<'l, 'a> {
    locator: &'l SymbolLocator<'l>,
    info: &'a AstResult,
    path: &'l TemplateAstPath<'a>,
    template_position: usize,
}

impl<'a> LocateVisitor<'_, 'a> {
    fn visit(&self, node: TemplateAstRef<'a>) -> Resolution {
        match node {
            TemplateAstRef::Element(ast) => self.visit_element(ast),
            TemplateAstRef::Reference(ast) => self.visit_reference(ast),
            TemplateAstRef::Event(ast) => self.visit_event(ast),
            TemplateAstRef::ElementProperty(ast) => {
                self.attribute_value_symbol(&ast.value, false).unwrap_or_default()
            }
            TemplateAstRef::Attr(ast) => self.visit_attr(ast),
            TemplateAstRef::BoundText(ast) => self.visit_bound_text(ast),
            TemplateAstRef::Directive(ast) => self.visit_directive(ast),
            TemplateAstRef::DirectiveProperty(ast) => self.visit_directive_property(ast),
            TemplateAstRef::NgContent(_)
            | TemplateAstRef::EmbeddedTemplate(_)
            | TemplateAstRef::Variable(_)
            | TemplateAstRef::Text(_) => Resolution::default(),
        }
    }

    fn type_symbol(&self, directive: &CompileDirectiveSummary) -> Option<SymbolRef> {
        self.info
            .template
            .query
            .get_type_symbol(&directive.type_.reference)
    }

    fn visit_element(&self, ast: &ElementAst) -> Resolution {
        let selector_match = self.locator.config.element_selector_match;
        let chosen = match ast.directives.iter().find(|d| d.directive.is_component) {
            Some(component) => Some((component, DirectiveKind::Component)),
            None => ast
                .directives
                .iter()
                .find(|d| {
                    d.directive
                        .selector
                        .as_deref()
                        .is_some_and(|selector| selector_match.matches(selector, &ast.name))
                })
                .map(|d| (d, DirectiveKind::Directive)),
        };

        match chosen {
            Some((directive, kind)) => {
                let symbol = self
                    .type_symbol(&directive.directive)
                    .map(|s| OverrideKindSymbol::wrap(s, kind));
                Resolution::new(symbol, ast.source_span)
            }
            None => Resolution::default(),
        }
    }

    fn visit_reference(&self, ast: &ReferenceAst) -> Resolution {
        let symbol = ast
            .value
            .as_ref()
            .and_then(|value| self.info.template.query.get_type_symbol(value));
        Resolution::new(symbol, ast.source_span)
    }

    fn visit_event(&self, ast: &BoundEventAst) -> Resolution {
        if let Some(resolution) = self.attribute_value_symbol(&ast.handler, true) {
            return resolution;
        }
        let symbol = self
            .find_output_binding(ast)
            .map(|s| OverrideKindSymbol::wrap(s, DirectiveKind::Event));
        Resolution::new(symbol, ast.source_span)
    }

    fn visit_attr(&self, ast: &AttrAst) -> Resolution {
        // Attributes are only matched against directives of an element host.
        let host = self
            .path
            .first(|node| node.directives().is_some().then_some(node));
        let Some(TemplateAstRef::Element(element)) = host else {
            return Resolution::default();
        };

        let mut matcher = SelectorMatcher::<&DirectiveAst>::new();
        for directive in &element.directives {
            let Some(selector) = directive.directive.selector.as_deref() else {
                continue;
            };
            match CssSelector::parse(selector) {
                Ok(selectors) => matcher.add_selectables(selectors, directive),
                Err(err) => warn!(selector, %err, "skipping directive with invalid selector"),
            }
        }

        let attribute_selector = format!("[{}={}]", ast.name, ast.value);
        let parsed = match CssSelector::parse(&attribute_selector) {
            Ok(parsed) => parsed,
            Err(err) => {
                trace!(attribute = %attribute_selector, %err, "attribute is not a selector");
                return Resolution::default();
            }
        };
        let Some(attribute) = parsed.first() else {
            return Resolution::default();
        };

        let mut resolution = Resolution::default();
        matcher.match_selector(attribute, |_, directive| {
            let symbol = self
                .type_symbol(&directive.directive)
                .map(|s| OverrideKindSymbol::wrap(s, DirectiveKind::Directive));
            resolution = Resolution::new(symbol, ast.source_span);
        });
        resolution
    }

    fn visit_bound_text(&self, ast: &BoundTextAst) -> Resolution {
        let text_start = ast.source_span.start;
        let Some(expression_position) = self.template_position.checked_sub(text_start) else {
            return Resolution::default();
        };
        if !in_span(expression_position, Some(ast.value.span())) {
            return Resolution::default();
        }

        let scope = self.locator.scopes.scope(
            &DiagnosticTemplateInfo::from(self.info),
            self.path,
            false,
        );
        match self.locator.resolver.resolve(
            &scope,
            &ast.value,
            expression_position,
            self.info.template.query.as_ref(),
        ) {
            Some(result) => Resolution::new(Some(result.symbol), offset_span(result.span, text_start)),
            None => Resolution::default(),
        }
    }

    fn visit_directive(&self, ast: &DirectiveAst) -> Resolution {
        let static_symbol = ast.directive.type_.reference.clone();
        Resolution {
            symbol: self.info.template.query.get_type_symbol(&static_symbol),
            span: Some(ast.source_span),
            static_symbol: Some(static_symbol),
        }
    }

    fn visit_directive_property(&self, ast: &BoundDirectivePropertyAst) -> Resolution {
        if let Some(resolution) = self.attribute_value_symbol(&ast.value, false) {
            return resolution;
        }
        Resolution::new(self.find_input_binding(ast), ast.source_span)
    }

    /// Resolves `ast` as the expression written in the value of the HTML
    /// attribute under the cursor.
    ///
    /// `None` means the cursor is not inside an attribute value and the caller
    /// may try another interpretation. `Some` means the attribute value owned
    /// the position, whether or not a symbol was found in it.
    fn attribute_value_symbol(&self, ast: &Ast, in_event: bool) -> Option<Resolution> {
        let attribute = self.find_attribute()?;
        let value_span = attribute.value_span?;
        if !in_span(self.template_position, Some(value_span)) {
            return None;
        }

        let scope = self.locator.scopes.scope(
            &DiagnosticTemplateInfo::from(self.info),
            self.path,
            in_event,
        );
        let expression_offset = value_span.start;
        let result = self.locator.resolver.resolve(
            &scope,
            ast,
            self.template_position - expression_offset,
            self.info.template.query.as_ref(),
        );
        Some(match result {
            Some(result) => Resolution::new(
                Some(result.symbol),
                offset_span(result.span, expression_offset),
            ),
            None => Resolution::default(),
        })
    }

    fn find_attribute(&self) -> Option<&'a Attribute> {
        get_path_to_node_at_position(&self.info.html_ast, self.template_position).first_attribute()
    }

    fn find_input_binding(&self, binding: &BoundDirectivePropertyAst) -> Option<SymbolRef> {
        self.find_binding_field(&binding.template_name, |d| &d.inputs)
    }

    fn find_output_binding(&self, binding: &BoundEventAst) -> Option<SymbolRef> {
        self.find_binding_field(&binding.name, |d| &d.outputs)
    }

    /// Maps a template-facing binding name back to the field of the first
    /// directive on the enclosing host that declares it.
    fn find_binding_field(
        &self,
        binding_name: &str,
        mapping: impl Fn(&CompileDirectiveSummary) -> &IndexMap<String, String>,
    ) -> Option<SymbolRef> {
        let directives = self.path.first_directive_host()?;
        for directive in directives {
            let inverted = invert_map(mapping(&directive.directive));
            let Some(field_name) = inverted.get(binding_name) else {
                continue;
            };
            if let Some(class_symbol) = self.type_symbol(&directive.directive) {
                return class_symbol.members().get(field_name);
            }
        }
        None
    }
}

/// Turns a `field -> public name` mapping into `public name -> field`. When
/// two fields share a public name, the one declared last wins.
pub fn invert_map(map: &IndexMap<String, String>) -> IndexMap<String, String> {
    map.iter()
        .map(|(field, public)| (public.clone(), field.clone()))
        .collect()
}
