//! Search index: every gathered symbol with its kind and root-relative url.

use serde::Serialize;

use crate::symbols::{SymbolDatabase, SymbolKind, SymbolNode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchEntry {
    /// Fully qualified dotted name.
    pub name: String,
    pub kind: SymbolKind,
    pub url: String,
}

/// Entries in tree order, parents before children.
pub fn build_index(db: &SymbolDatabase) -> Vec<SearchEntry> {
    let mut entries = Vec::new();
    let mut path = Vec::new();
    collect(db, db.tree().root(), &mut path, &mut entries);
    entries
}

fn collect<'t>(
    db: &SymbolDatabase,
    node: &'t SymbolNode,
    path: &mut Vec<&'t str>,
    entries: &mut Vec<SearchEntry>,
) {
    for (name, child) in node.children() {
        path.push(name);
        if let Some(url) = db.symbol_link(&path[..]) {
            entries.push(SearchEntry {
                name: path.join("."),
                kind: child.kind(),
                url,
            });
        }
        collect(db, child, path, entries);
        path.pop();
    }
}

pub fn to_json(entries: &[SearchEntry]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(entries)
}
