//! Expression symbols
//!
//! Resolves the name under the cursor inside a binding expression.

use crate::expression_ast::{find_ast_at, Ast, LiteralValue};
use crate::parse_util::Span;
use crate::symbols::{BuiltinType, SymbolQuery, SymbolRef, SymbolTable};
use tracing::trace;

/// A symbol found inside an expression. `span` is in the expression's own
/// coordinates.
#[derive(Debug, Clone)]
pub struct ExpressionSymbol {
    pub symbol: SymbolRef,
    pub span: Span,
}

pub trait ExpressionSymbolResolver {
    fn resolve(
        &self,
        scope: &SymbolTable,
        ast: &Ast,
        position: usize,
        query: &dyn SymbolQuery,
    ) -> Option<ExpressionSymbol>;
}

/// Resolves property reads and method calls by walking receivers back to the
/// scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct AstSymbolResolver;

impl ExpressionSymbolResolver for AstSymbolResolver {
    fn resolve(
        &self,
        scope: &SymbolTable,
        ast: &Ast,
        position: usize,
        query: &dyn SymbolQuery,
    ) -> Option<ExpressionSymbol> {
        get_expression_symbol(scope, ast, position, query)
    }
}

pub fn get_expression_symbol(
    scope: &SymbolTable,
    ast: &Ast,
    position: usize,
    query: &dyn SymbolQuery,
) -> Option<ExpressionSymbol> {
    let path = find_ast_at(ast, position);
    let tail = *path.last()?;
    let typer = AstType { scope, query };

    let (receiver, name, span) = match tail {
        Ast::PropertyRead(read) | Ast::SafePropertyRead(read) => {
            (&*read.receiver, &read.name, read.name_span)
        }
        Ast::MethodCall(call) | Ast::SafeMethodCall(call) => {
            (&*call.receiver, &call.name, call.name_span)
        }
        // Pipes are resolved through the module scope, which is not modelled.
        _ => return None,
    };

    let symbol = typer.receiver_members(receiver)?.get(name);
    trace!(name = %name, found = symbol.is_some(), "expression member lookup");
    Some(ExpressionSymbol {
        symbol: symbol?,
        span,
    })
}

struct AstType<'a> {
    scope: &'a SymbolTable,
    query: &'a dyn SymbolQuery,
}

impl AstType<'_> {
    fn receiver_members(&self, receiver: &Ast) -> Option<SymbolTable> {
        match receiver {
            Ast::ImplicitReceiver(_) => Some(self.scope.clone()),
            other => Some(self.type_of(other)?.members()),
        }
    }

    fn type_of(&self, ast: &Ast) -> Option<SymbolRef> {
        match ast {
            Ast::PropertyRead(read) | Ast::SafePropertyRead(read) => {
                let symbol = self.receiver_members(&read.receiver)?.get(&read.name)?;
                Some(value_type(symbol))
            }
            Ast::MethodCall(call) | Ast::SafeMethodCall(call) => {
                let method = self.receiver_members(&call.receiver)?.get(&call.name)?;
                value_type(method).signatures().into_iter().next()?.result
            }
            Ast::KeyedRead(read) => {
                let receiver = self.type_of(&read.receiver)?;
                let key = self.type_of(&read.key)?;
                receiver.indexed(&key)
            }
            Ast::LiteralPrimitive(literal) => Some(self.query.get_builtin_type(match literal.value {
                LiteralValue::Null => BuiltinType::Null,
                LiteralValue::Boolean(_) => BuiltinType::Boolean,
                LiteralValue::Number(_) => BuiltinType::Number,
                LiteralValue::String(_) => BuiltinType::String,
            })),
            Ast::PrefixNot(_) => Some(self.query.get_builtin_type(BuiltinType::Boolean)),
            _ => None,
        }
    }
}

/// The type a value of `symbol` has; symbols without a separate type (such
/// as classes) stand for themselves.
fn value_type(symbol: SymbolRef) -> SymbolRef {
    symbol.type_().unwrap_or(symbol)
}
