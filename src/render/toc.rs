//! Table of contents: the package/module hierarchy as nested lists.

use crate::symbols::link::relative_link;
use crate::symbols::{SymbolDatabase, SymbolKind, SymbolNode};

use super::{escape, escape_attr};

/// Nested `<ul>` of every package and module, linked relative to `from`.
pub fn render_toc(db: &SymbolDatabase, from: &str) -> String {
    let mut out = String::new();
    let mut path = Vec::new();
    render_level(db, db.tree().root(), &mut path, from, &mut out);
    out
}

fn render_level<'t>(
    db: &SymbolDatabase,
    node: &'t SymbolNode,
    path: &mut Vec<&'t str>,
    from: &str,
    out: &mut String,
) {
    let mut containers: Vec<(&str, &SymbolNode)> = node
        .children()
        .filter(|(_, child)| child.kind().is_container())
        .collect();
    if containers.is_empty() {
        return;
    }
    containers.sort_by(|a, b| a.0.cmp(b.0));

    out.push_str("<ul>\n");
    for (name, child) in containers {
        path.push(name);
        out.push_str("<li>");
        match db.symbol_link(&path[..]) {
            Some(link) => out.push_str(&format!(
                "<a href=\"{}\">{}</a>",
                escape_attr(&relative_link(from, &link)),
                escape(name)
            )),
            None => out.push_str(&escape(name)),
        }
        out.push('\n');
        render_level(db, child, path, from, out);
        out.push_str("</li>\n");
        path.pop();
    }
    out.push_str("</ul>\n");
}

/// Root-relative paths of every package, for package listing pages.
pub fn package_paths(db: &SymbolDatabase) -> Vec<Vec<String>> {
    fn walk(node: &SymbolNode, path: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
        for (name, child) in node.children() {
            if !child.kind().is_container() {
                continue;
            }
            path.push(name.to_string());
            if child.kind() == SymbolKind::Package {
                out.push(path.clone());
            }
            walk(child, path, out);
            path.pop();
        }
    }

    let mut out = Vec::new();
    walk(db.tree().root(), &mut Vec::new(), &mut out);
    out
}
