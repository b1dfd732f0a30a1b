//! Output layouts and the links they give to symbols.
//!
//! Links are relative to the output root, e.g. `std/algorithm/sort.html`.
//! Other tooling reads these paths, so their shape must stay stable for a
//! given layout.

use std::fmt;
use std::str::FromStr;

use super::kind::SymbolKind;
use super::tree::SymbolTree;

/// A fully qualified symbol path with the kind of every component.
pub type Segments<'a> = Vec<(&'a str, SymbolKind)>;

const INDEX_STEM: &str = "index";

/// Which symbols get a file of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// One file per symbol; enum members are anchors in their enum's file.
    Simple,
    /// One file per aggregate; functions, variables, aliases and values are anchors.
    #[default]
    Aggregated,
}

impl Layout {
    /// Root-relative link for a fully qualified path.
    pub fn link_for<S: AsRef<str>>(self, path: &[(S, SymbolKind)]) -> String {
        match self {
            Layout::Simple => simple_link(path),
            Layout::Aggregated => aggregated_link(path),
        }
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Layout::Simple),
            "aggregated" => Ok(Layout::Aggregated),
            _ => Err(format!("unknown layout: {s}. Use simple or aggregated")),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Layout::Simple => "simple",
            Layout::Aggregated => "aggregated",
        })
    }
}

fn simple_link<S: AsRef<str>>(path: &[(S, SymbolKind)]) -> String {
    let mut dirs: Vec<&str> = Vec::new();
    let mut file: Vec<&str> = Vec::new();
    let mut after_container = true;

    for (name, kind) in path {
        let name = name.as_ref();
        if kind.is_container() {
            dirs.push(name);
            file.clear();
            after_container = true;
        } else if *kind == SymbolKind::Value {
            continue;
        } else {
            if after_container {
                file.clear();
            }
            file.push(name);
            after_container = false;
        }
    }

    let stem = if file.is_empty() {
        INDEX_STEM.to_string()
    } else {
        file.join(".")
    };
    join_file(&dirs, &stem, &[])
}

fn aggregated_link<S: AsRef<str>>(path: &[(S, SymbolKind)]) -> String {
    let mut dirs: Vec<&str> = Vec::new();
    let mut file: Vec<&str> = Vec::new();
    let mut anchor: Vec<&str> = Vec::new();

    for (name, kind) in path {
        let name = name.as_ref();
        if kind.is_container() {
            dirs.push(name);
            file.clear();
            anchor.clear();
        } else if kind.is_aggregate() {
            // Leaves between here and the previous file become part of the new file name.
            file.append(&mut anchor);
            file.push(name);
        } else {
            anchor.push(name);
        }
    }

    let stem = if file.is_empty() {
        INDEX_STEM.to_string()
    } else {
        file.join(".")
    };
    join_file(&dirs, &stem, &anchor)
}

fn join_file(dirs: &[&str], stem: &str, anchor: &[&str]) -> String {
    let mut link = String::new();
    for dir in dirs {
        link.push_str(dir);
        link.push('/');
    }
    link.push_str(stem);
    link.push_str(".html");
    if !anchor.is_empty() {
        link.push('#');
        link.push_str(&anchor.join("."));
    }
    link
}

/// Pair every component of `module ++ symbol` with its kind by walking the tree.
///
/// `None` if any component is missing from the tree.
pub fn decode<'t, S: AsRef<str>>(
    tree: &'t SymbolTree,
    module: &[S],
    symbol: &[S],
) -> Option<Segments<'t>> {
    let mut node = tree.root();
    let mut segments = Vec::with_capacity(module.len() + symbol.len());
    for name in module.iter().chain(symbol) {
        let (key, child) = node.child_entry(name.as_ref())?;
        segments.push((key, child.kind()));
        node = child;
    }
    Some(segments)
}

/// The file part of a link.
pub fn page_of(link: &str) -> &str {
    link.split_once('#').map_or(link, |(page, _)| page)
}

/// The in-page anchor of a link, if any.
pub fn anchor_of(link: &str) -> Option<&str> {
    link.split_once('#').map(|(_, anchor)| anchor)
}

/// Rewrite a root-relative `target` so it works from the page `from`.
pub fn relative_link(from: &str, target: &str) -> String {
    let from_page = page_of(from);
    if page_of(target) == from_page {
        if let Some(anchor) = anchor_of(target) {
            return format!("#{anchor}");
        }
    }
    let depth = from_page.matches('/').count();
    format!("{}{}", "../".repeat(depth), target)
}
