//! Bound-expression AST
//!
//! The parsed form of binding expressions such as `user.name` or
//! `onChange($event)`. Spans are relative to the start of the text the
//! expression was parsed from (an attribute value or an interpolation's text
//! node).

use crate::parse_util::{Span, Spanned};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Ast {
    EmptyExpr(EmptyExpr),
    ImplicitReceiver(ImplicitReceiver),
    PropertyRead(PropertyRead),
    SafePropertyRead(PropertyRead),
    MethodCall(MethodCall),
    SafeMethodCall(MethodCall),
    KeyedRead(KeyedRead),
    LiteralPrimitive(LiteralPrimitive),
    Binary(Binary),
    PrefixNot(PrefixNot),
    Conditional(Conditional),
    Chain(Chain),
    BindingPipe(BindingPipe),
    Interpolation(Interpolation),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmptyExpr {
    pub span: Span,
}

/// The component instance in `name` (as opposed to `obj.name`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplicitReceiver {
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRead {
    pub span: Span,
    pub name_span: Span,
    pub receiver: Box<Ast>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub span: Span,
    pub name_span: Span,
    pub receiver: Box<Ast>,
    pub name: String,
    pub args: Vec<Ast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedRead {
    pub span: Span,
    pub receiver: Box<Ast>,
    pub key: Box<Ast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralPrimitive {
    pub span: Span,
    pub value: LiteralValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binary {
    pub span: Span,
    pub operation: String,
    pub left: Box<Ast>,
    pub right: Box<Ast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixNot {
    pub span: Span,
    pub expression: Box<Ast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditional {
    pub span: Span,
    pub condition: Box<Ast>,
    pub true_exp: Box<Ast>,
    pub false_exp: Box<Ast>,
}

/// `a; b` in event handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    pub span: Span,
    pub expressions: Vec<Ast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingPipe {
    pub span: Span,
    pub name_span: Span,
    pub exp: Box<Ast>,
    pub name: String,
    pub args: Vec<Ast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpolation {
    pub span: Span,
    pub strings: Vec<String>,
    pub expressions: Vec<Ast>,
}

impl Ast {
    pub fn span(&self) -> Span {
        match self {
            Ast::EmptyExpr(e) => e.span,
            Ast::ImplicitReceiver(e) => e.span,
            Ast::PropertyRead(e) | Ast::SafePropertyRead(e) => e.span,
            Ast::MethodCall(e) | Ast::SafeMethodCall(e) => e.span,
            Ast::KeyedRead(e) => e.span,
            Ast::LiteralPrimitive(e) => e.span,
            Ast::Binary(e) => e.span,
            Ast::PrefixNot(e) => e.span,
            Ast::Conditional(e) => e.span,
            Ast::Chain(e) => e.span,
            Ast::BindingPipe(e) => e.span,
            Ast::Interpolation(e) => e.span,
        }
    }

    /// Direct sub-expressions, in source order.
    pub fn children(&self) -> Vec<&Ast> {
        match self {
            Ast::EmptyExpr(_) | Ast::ImplicitReceiver(_) | Ast::LiteralPrimitive(_) => Vec::new(),
            Ast::PropertyRead(e) | Ast::SafePropertyRead(e) => vec![&*e.receiver],
            Ast::MethodCall(e) | Ast::SafeMethodCall(e) => {
                std::iter::once(&*e.receiver).chain(e.args.iter()).collect()
            }
            Ast::KeyedRead(e) => vec![&*e.receiver, &*e.key],
            Ast::Binary(e) => vec![&*e.left, &*e.right],
            Ast::PrefixNot(e) => vec![&*e.expression],
            Ast::Conditional(e) => vec![&*e.condition, &*e.true_exp, &*e.false_exp],
            Ast::Chain(e) => e.expressions.iter().collect(),
            Ast::BindingPipe(e) => std::iter::once(&*e.exp).chain(e.args.iter()).collect(),
            Ast::Interpolation(e) => e.expressions.iter().collect(),
        }
    }

    pub fn is_empty_expr(&self) -> bool {
        matches!(self, Ast::EmptyExpr(_))
    }
}

impl Spanned for Ast {
    fn source_span(&self) -> Span {
        self.span()
    }
}

/// Returns the chain of nodes from `ast` down to the deepest node containing
/// `position`, outermost first. Empty expressions are skipped.
pub fn find_ast_at(ast: &Ast, position: usize) -> Vec<&Ast> {
    let mut path = Vec::new();
    let mut current = ast;
    loop {
        if current.is_empty_expr() || !crate::parse_util::in_span(position, Some(current.span())) {
            break;
        }
        path.push(current);
        // Implicit receivers are zero-width and sit at the start of their
        // parent; they never narrow the match.
        match current
            .children()
            .into_iter()
            .filter(|child| !matches!(child, Ast::ImplicitReceiver(_)))
            .find(|child| crate::parse_util::in_span(position, Some(child.span())))
        {
            Some(child) => current = child,
            None => break,
        }
    }
    path
}
