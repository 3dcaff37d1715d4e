//! Symbols
//!
//! The language service's view of the host type system. A [`Symbol`] is
//! whatever a piece of template text refers to: a component class, one of its
//! fields or methods, a template reference or variable. Symbols are produced by
//! a [`SymbolQuery`] implementation owned by the host and are shared through
//! [`SymbolRef`].

use crate::parse_util::Span;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

pub type SymbolRef = Rc<dyn Symbol>;

/// A reference to a declaration in the host program, e.g. a directive class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaticSymbol {
    pub file_path: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

impl StaticSymbol {
    pub fn new(file_path: impl Into<String>, name: impl Into<String>) -> Self {
        StaticSymbol {
            file_path: file_path.into(),
            name: name.into(),
            members: Vec::new(),
        }
    }
}

impl fmt::Display for StaticSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.file_path, self.name)
    }
}

/// The kind a symbol reports to editor features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectiveKind {
    Attribute,
    Component,
    Directive,
    Event,
    Method,
    Property,
    Reference,
    Type,
    Variable,
}

impl DirectiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveKind::Attribute => "attribute",
            DirectiveKind::Component => "component",
            DirectiveKind::Directive => "directive",
            DirectiveKind::Event => "event",
            DirectiveKind::Method => "method",
            DirectiveKind::Property => "property",
            DirectiveKind::Reference => "reference",
            DirectiveKind::Type => "type",
            DirectiveKind::Variable => "variable",
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a symbol is declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file_name: String,
    pub span: Span,
}

pub type Definition = Option<Vec<Location>>;

/// A callable shape of a symbol.
#[derive(Debug, Clone)]
pub struct Signature {
    pub arguments: SymbolTable,
    pub result: Option<SymbolRef>,
}

/// Capabilities every resolved symbol exposes.
pub trait Symbol: fmt::Debug {
    fn name(&self) -> &str;

    fn kind(&self) -> DirectiveKind;

    /// Source language of the declaration, e.g. `"typescript"` or `"ng-template"`.
    fn language(&self) -> &str;

    fn type_(&self) -> Option<SymbolRef>;

    fn container(&self) -> Option<SymbolRef>;

    fn is_public(&self) -> bool;

    fn is_callable(&self) -> bool;

    fn is_nullable(&self) -> bool;

    fn definition(&self) -> Definition;

    fn members(&self) -> SymbolTable;

    fn signatures(&self) -> Vec<Signature>;

    fn select_signature(&self, types: &[SymbolRef]) -> Option<Signature>;

    fn indexed(&self, argument: &SymbolRef) -> Option<SymbolRef>;

    fn type_arguments(&self) -> Option<Vec<SymbolRef>>;
}

/// Name-indexed symbols, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: IndexMap<String, SymbolRef>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<SymbolRef> {
        self.symbols.get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Inserts `symbol` under its own name, replacing an earlier entry.
    pub fn insert(&mut self, symbol: SymbolRef) {
        self.symbols.insert(symbol.name().to_string(), symbol);
    }

    pub fn values(&self) -> impl Iterator<Item = &SymbolRef> {
        self.symbols.values()
    }

    /// Layers `others` on top of `self`; later tables shadow earlier ones.
    pub fn merge(mut self, others: impl IntoIterator<Item = SymbolTable>) -> SymbolTable {
        for table in others {
            self.symbols.extend(table.symbols);
        }
        self
    }
}

impl FromIterator<SymbolRef> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = SymbolRef>>(iter: I) -> Self {
        let mut table = SymbolTable::new();
        for symbol in iter {
            table.insert(symbol);
        }
        table
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinType {
    Any,
    Boolean,
    Null,
    Number,
    String,
    Undefined,
    Unbound,
}

/// Type-system queries supplied by the host.
pub trait SymbolQuery {
    /// The symbol declared by `type_`, if the host knows it.
    fn get_type_symbol(&self, type_: &StaticSymbol) -> Option<SymbolRef>;

    fn get_builtin_type(&self, kind: BuiltinType) -> SymbolRef;
}

/// A symbol presented under a different kind, e.g. a class shown as the
/// element's component. Everything except [`Symbol::kind`] is forwarded.
#[derive(Debug, Clone)]
pub struct OverrideKindSymbol {
    sym: SymbolRef,
    kind: DirectiveKind,
}

impl OverrideKindSymbol {
    pub fn new(sym: SymbolRef, kind: DirectiveKind) -> Self {
        OverrideKindSymbol { sym, kind }
    }

    pub fn wrap(sym: SymbolRef, kind: DirectiveKind) -> SymbolRef {
        Rc::new(Self::new(sym, kind))
    }

    pub fn inner(&self) -> &SymbolRef {
        &self.sym
    }
}

impl Symbol for OverrideKindSymbol {
    fn name(&self) -> &str {
        self.sym.name()
    }

    fn kind(&self) -> DirectiveKind {
        self.kind
    }

    fn language(&self) -> &str {
        self.sym.language()
    }

    fn type_(&self) -> Option<SymbolRef> {
        self.sym.type_()
    }

    fn container(&self) -> Option<SymbolRef> {
        self.sym.container()
    }

    fn is_public(&self) -> bool {
        self.sym.is_public()
    }

    fn is_callable(&self) -> bool {
        self.sym.is_callable()
    }

    fn is_nullable(&self) -> bool {
        self.sym.is_nullable()
    }

    fn definition(&self) -> Definition {
        self.sym.definition()
    }

    fn members(&self) -> SymbolTable {
        self.sym.members()
    }

    fn signatures(&self) -> Vec<Signature> {
        self.sym.signatures()
    }

    fn select_signature(&self, types: &[SymbolRef]) -> Option<Signature> {
        self.sym.select_signature(types)
    }

    fn indexed(&self, argument: &SymbolRef) -> Option<SymbolRef> {
        self.sym.indexed(argument)
    }

    fn type_arguments(&self) -> Option<Vec<SymbolRef>> {
        self.sym.type_arguments()
    }
}

/// A name declared by the template itself (`#ref`, `let-item`, `$event`).
/// Its type, when known, supplies members and signatures.
#[derive(Debug, Clone)]
pub struct DeclaredSymbol {
    pub name: String,
    pub kind: DirectiveKind,
    pub type_: Option<SymbolRef>,
    pub definition: Definition,
}

impl DeclaredSymbol {
    pub fn new(name: impl Into<String>, kind: DirectiveKind, type_: Option<SymbolRef>) -> Self {
        DeclaredSymbol {
            name: name.into(),
            kind,
            type_,
            definition: None,
        }
    }

    pub fn with_definition(mut self, definition: Location) -> Self {
        self.definition = Some(vec![definition]);
        self
    }
}

impl Symbol for DeclaredSymbol {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> DirectiveKind {
        self.kind
    }

    fn language(&self) -> &str {
        "ng-template"
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
        self.type_.as_ref().is_some_and(|t| t.is_callable())
    }

    fn is_nullable(&self) -> bool {
        false
    }

    fn definition(&self) -> Definition {
        self.definition.clone()
    }

    fn members(&self) -> SymbolTable {
        self.type_.as_ref().map(|t| t.members()).unwrap_or_default()
    }

    fn signatures(&self) -> Vec<Signature> {
        self.type_.as_ref().map(|t| t.signatures()).unwrap_or_default()
    }

    fn select_signature(&self, types: &[SymbolRef]) -> Option<Signature> {
        self.type_.as_ref()?.select_signature(types)
    }

    fn indexed(&self, argument: &SymbolRef) -> Option<SymbolRef> {
        self.type_.as_ref()?.indexed(argument)
    }

    fn type_arguments(&self) -> Option<Vec<SymbolRef>> {
        self.type_.as_ref()?.type_arguments()
    }
}
