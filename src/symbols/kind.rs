use serde::Serialize;
use std::fmt;

use crate::ast::{Decl, DeclKind};

/// What a node in the symbol tree stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Package,
    Module,
    Alias,
    Enum,
    Class,
    Struct,
    Interface,
    Function,
    Template,
    /// Enum member or manifest constant.
    Value,
    Variable,
}

impl SymbolKind {
    /// Packages and modules become directories in the output.
    pub fn is_container(self) -> bool {
        matches!(self, SymbolKind::Package | SymbolKind::Module)
    }

    /// Kinds that may own an output file, depending on the layout.
    pub fn is_aggregate(self) -> bool {
        matches!(
            self,
            SymbolKind::Class
                | SymbolKind::Struct
                | SymbolKind::Interface
                | SymbolKind::Enum
                | SymbolKind::Template
        )
    }

    /// Kinds always documented inside some other symbol's file.
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            SymbolKind::Function | SymbolKind::Variable | SymbolKind::Alias | SymbolKind::Value
        )
    }

    /// Classify a declaration. `None` for declarations that are never symbols.
    pub fn of_decl(decl: &Decl) -> Option<SymbolKind> {
        let kind = match decl.kind {
            DeclKind::Module => SymbolKind::Module,
            DeclKind::Class => SymbolKind::Class,
            DeclKind::Struct | DeclKind::Union => SymbolKind::Struct,
            DeclKind::Interface => SymbolKind::Interface,
            DeclKind::Enum => SymbolKind::Enum,
            DeclKind::EnumMember => SymbolKind::Value,
            DeclKind::Template => SymbolKind::Template,
            DeclKind::Function => SymbolKind::Function,
            DeclKind::Alias => SymbolKind::Alias,
            DeclKind::Variable => {
                if decl.is_type_inferred() && decl.has_storage_class("enum") {
                    SymbolKind::Value
                } else {
                    SymbolKind::Variable
                }
            }
            DeclKind::Import | DeclKind::Other => return None,
        };
        Some(kind)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Package => "package",
            SymbolKind::Module => "module",
            SymbolKind::Alias => "alias",
            SymbolKind::Enum => "enum",
            SymbolKind::Class => "class",
            SymbolKind::Struct => "struct",
            SymbolKind::Interface => "interface",
            SymbolKind::Function => "function",
            SymbolKind::Template => "template",
            SymbolKind::Value => "value",
            SymbolKind::Variable => "variable",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
