//! Angular Language Service - symbol location
//!
//! Answers "what does the template text at this offset refer to" for editor
//! hover and go-to-definition. The host supplies both parses of a template
//! (the HTML AST and the directive-matched template AST) together with a
//! [`symbols::SymbolQuery`] over its type system; [`locate_symbol`] resolves a
//! document offset to a [`types::SymbolInfo`].

pub mod ast_path;
pub mod config;
pub mod directive_matching;
pub mod error;
pub mod expression_ast;
pub mod expression_scope;
pub mod expressions;
pub mod html_ast;
pub mod locate_symbol;
pub mod parse_util;
pub mod symbols;
pub mod template_ast;
pub mod types;

pub use config::{ElementSelectorMatch, LanguageServiceConfig};
pub use error::{LanguageServiceError, SelectorError};
pub use locate_symbol::{invert_map, locate_symbol, SymbolLocator};
pub use parse_util::Span;
pub use symbols::{DirectiveKind, OverrideKindSymbol, Symbol, SymbolQuery, SymbolRef, SymbolTable};
pub use types::{AstResult, SymbolInfo, TemplateSource};
