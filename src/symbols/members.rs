//! Member tables: the named children listed on a symbol's page.

use crate::ast::{Decl, DeclKind};

use super::kind::SymbolKind;

/// Url of items that only exist as an anchor on their parent's page.
pub const NO_LINK: &str = "#";

/// Formatting data captured when the item is built, so no AST reference
/// needs to outlive the walk that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ItemDetail {
    #[default]
    Plain,
    Function {
        storage: Vec<String>,
        parameters: Vec<String>,
    },
    Variable {
        storage: Vec<String>,
    },
    Aggregate {
        bases: Vec<String>,
    },
}

impl ItemDetail {
    pub fn of_decl(decl: &Decl) -> ItemDetail {
        match decl.kind {
            DeclKind::Function => ItemDetail::Function {
                storage: decl.storage_class.clone(),
                parameters: decl
                    .parameters
                    .iter()
                    .map(|p| {
                        let mut s = match (&p.ty, &p.name) {
                            (Some(ty), Some(name)) => format!("{ty} {name}"),
                            (Some(ty), None) => ty.clone(),
                            (None, Some(name)) => name.clone(),
                            (None, None) => String::new(),
                        };
                        if let Some(default) = &p.default {
                            s.push_str(" = ");
                            s.push_str(default);
                        }
                        s
                    })
                    .collect(),
            },
            DeclKind::Variable => ItemDetail::Variable {
                storage: decl.storage_class.clone(),
            },
            DeclKind::Class | DeclKind::Interface | DeclKind::Enum => ItemDetail::Aggregate {
                bases: decl
                    .base
                    .iter()
                    .chain(decl.interfaces.iter())
                    .cloned()
                    .collect(),
            },
            _ => ItemDetail::Plain,
        }
    }

    /// One-line declaration text, e.g. `static int f(int a, int b = 2)`.
    pub fn signature(&self, name: &str, ty: Option<&str>) -> String {
        match self {
            ItemDetail::Function {
                storage,
                parameters,
            } => {
                let mut out = join_prefix(storage);
                // The front-end reports function types as `ret(params)`.
                let ret = ty.and_then(|t| t.split_once('(').map(|(r, _)| r.trim()));
                if let Some(ret) = ret.filter(|r| !r.is_empty()) {
                    out.push_str(ret);
                    out.push(' ');
                }
                out.push_str(&format!("{name}({})", parameters.join(", ")));
                out
            }
            ItemDetail::Variable { storage } => {
                let mut out = join_prefix(storage);
                if let Some(ty) = ty {
                    out.push_str(ty);
                    out.push(' ');
                }
                out.push_str(name);
                out
            }
            ItemDetail::Aggregate { bases } if !bases.is_empty() => {
                format!("{name} : {}", bases.join(", "))
            }
            _ => name.to_string(),
        }
    }
}

fn join_prefix(words: &[String]) -> String {
    words.iter().map(|w| format!("{w} ")).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Link relative to the page listing the item, or [`NO_LINK`].
    pub url: String,
    pub name: String,
    pub summary: String,
    /// Formatted type, for display only.
    pub ty: Option<String>,
    pub detail: ItemDetail,
}

impl Item {
    pub fn is_linkable(&self) -> bool {
        self.url != NO_LINK
    }
}

/// Children of one symbol, by category, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Members {
    pub aliases: Vec<Item>,
    pub classes: Vec<Item>,
    pub enums: Vec<Item>,
    pub functions: Vec<Item>,
    pub interfaces: Vec<Item>,
    pub structs: Vec<Item>,
    pub templates: Vec<Item>,
    pub values: Vec<Item>,
    pub variables: Vec<Item>,
    pub public_imports: Vec<Item>,
}

impl Members {
    /// File `item` under the category for `kind`. Containers have no category.
    pub fn push(&mut self, kind: SymbolKind, item: Item) {
        let list = match kind {
            SymbolKind::Alias => &mut self.aliases,
            SymbolKind::Class => &mut self.classes,
            SymbolKind::Enum => &mut self.enums,
            SymbolKind::Function => &mut self.functions,
            SymbolKind::Interface => &mut self.interfaces,
            SymbolKind::Struct => &mut self.structs,
            SymbolKind::Template => &mut self.templates,
            SymbolKind::Value => &mut self.values,
            SymbolKind::Variable => &mut self.variables,
            SymbolKind::Package | SymbolKind::Module => return,
        };
        list.push(item);
    }

    /// Non-empty categories with their display titles, in page order.
    pub fn categories(&self) -> Vec<(&'static str, &[Item])> {
        [
            ("Aliases", self.aliases.as_slice()),
            ("Classes", self.classes.as_slice()),
            ("Enums", self.enums.as_slice()),
            ("Functions", self.functions.as_slice()),
            ("Interfaces", self.interfaces.as_slice()),
            ("Structs", self.structs.as_slice()),
            ("Templates", self.templates.as_slice()),
            ("Values", self.values.as_slice()),
            ("Variables", self.variables.as_slice()),
            ("Public imports", self.public_imports.as_slice()),
        ]
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.categories().is_empty()
    }
}
