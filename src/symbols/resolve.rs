//! Cross-reference resolution: does a word in a doc comment name a symbol?
//!
//! Three strategies are tried in a fixed order and the first hit wins:
//!
//! 1. module qualification (`pkg.mod.Foo`, or `mod.Foo` with leading
//!    packages omitted), only for words with at least two parts;
//! 2. the local scope of the comment, children first and then siblings,
//!    skipped for words written with a leading `.`;
//! 3. the top level of every gathered module.
//!
//! A miss is the common case and is reported as `None`.

use super::tree::SymbolNode;
use super::SymbolDatabase;

/// Read-only view of a frozen database that turns words into links.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'db> {
    db: &'db SymbolDatabase,
}

impl<'db> Resolver<'db> {
    pub fn new(db: &'db SymbolDatabase) -> Self {
        Self { db }
    }

    /// Root-relative link for `word` as written in a comment at `scope`.
    pub fn resolve<S: AsRef<str>>(&self, scope: &[S], word: &str) -> Option<String> {
        let path = self.locate(scope, word)?;
        self.db.symbol_link(&path)
    }

    /// Fully qualified path of the symbol `word` refers to from `scope`.
    pub fn locate<S: AsRef<str>>(&self, scope: &[S], word: &str) -> Option<Vec<String>> {
        let (parts, leading_dot) = split_word(word)?;

        if parts.len() >= 2 {
            if let Some(path) = self.qualified(&parts) {
                return Some(path);
            }
        }
        if !leading_dot {
            if let Some(path) = self.local(scope, &parts) {
                return Some(path);
            }
        }
        self.top_level(&parts)
    }

    fn module_node(&self, module: &[String]) -> Option<&'db SymbolNode> {
        self.db.tree().lookup(module)
    }

    fn qualified(&self, parts: &[&str]) -> Option<Vec<String>> {
        let registry = self.db.registry();

        for module in registry.module_parts() {
            if let Some(rest) = strip_prefix(parts, module) {
                if let Some(path) = self.nested(module, rest) {
                    return Some(path);
                }
            }
        }

        // Retry with leading package names left off the word.
        for module in registry.module_parts() {
            for skip in 1..module.len() {
                if let Some(rest) = strip_prefix(parts, &module[skip..]) {
                    if let Some(path) = self.nested(module, rest) {
                        return Some(path);
                    }
                }
            }
        }
        None
    }

    fn local<S: AsRef<str>>(&self, scope: &[S], parts: &[&str]) -> Option<Vec<String>> {
        let module = self.owning_module(scope)?;
        let module_node = self.module_node(module)?;
        let local = &scope[module.len()..];
        let walk = module_node.iterate(local);

        if walk.node.find_declared(parts).is_some() {
            return Some(qualify(module, &local[..walk.matched], parts));
        }

        if walk.matched > 0 {
            let parent_scope = &local[..walk.matched - 1];
            let parent = module_node.find(parent_scope)?;
            if parent.find_declared(parts).is_some() {
                return Some(qualify(module, parent_scope, parts));
            }
        }
        None
    }

    fn top_level(&self, parts: &[&str]) -> Option<Vec<String>> {
        self.db
            .registry()
            .module_parts()
            .find_map(|module| self.nested(module, parts))
    }

    /// `module ++ rest` if `rest` is declared in the module itself.
    ///
    /// Submodules are reached only through their own registry entry.
    fn nested(&self, module: &[String], rest: &[&str]) -> Option<Vec<String>> {
        self.module_node(module)?.find_declared(rest)?;
        Some(qualify::<&str>(module, &[], rest))
    }

    /// The longest gathered module whose name is a prefix of `scope`.
    fn owning_module<S: AsRef<str>>(&self, scope: &[S]) -> Option<&'db [String]> {
        self.db
            .registry()
            .module_parts()
            .filter(|module| {
                module.len() <= scope.len()
                    && module.iter().zip(scope).all(|(m, s)| m == s.as_ref())
            })
            .max_by_key(|module| module.len())
    }
}

/// Split a candidate word on `.`, rejecting words that cannot name a symbol.
///
/// Returns the parts and whether the word had a leading dot.
fn split_word(word: &str) -> Option<(Vec<&str>, bool)> {
    if word.is_empty() || word.ends_with('.') {
        return None;
    }
    let (body, leading_dot) = match word.strip_prefix('.') {
        Some(body) => (body, true),
        None => (word, false),
    };
    let parts: Vec<&str> = body.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    Some((parts, leading_dot))
}

fn strip_prefix<'w, 'a>(parts: &'a [&'w str], prefix: &[String]) -> Option<&'a [&'w str]> {
    if prefix.len() > parts.len() {
        return None;
    }
    let (head, rest) = parts.split_at(prefix.len());
    head.iter().zip(prefix).all(|(p, m)| *p == m).then_some(rest)
}

fn qualify<S: AsRef<str>>(module: &[String], middle: &[S], rest: &[&str]) -> Vec<String> {
    module
        .iter()
        .cloned()
        .chain(middle.iter().map(|s| s.as_ref().to_string()))
        .chain(rest.iter().map(|s| s.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{DatabaseBuilder, Layout, SymbolKind};
    use std::path::Path;

    /// `pkg.mod` and `other` both declare `Foo`; `m` has class `C` with `f` and `g`.
    fn database(layout: Layout) -> SymbolDatabase {
        let mut b = DatabaseBuilder::new(layout);
        b.add_module("pkg.mod", Path::new("pkg/mod.d"), String::new());
        b.add_module("other", Path::new("other.d"), String::new());
        b.add_module("m", Path::new("m.d"), String::new());
        let tree = b.tree_mut();
        tree.insert(&["pkg", "mod", "Foo"], SymbolKind::Struct);
        tree.insert(&["other", "Foo"], SymbolKind::Struct);
        tree.insert(&["m", "C"], SymbolKind::Class);
        tree.insert(&["m", "C", "f"], SymbolKind::Function);
        tree.insert(&["m", "C", "g"], SymbolKind::Function);
        b.finish()
    }

    #[test]
    fn repeated_calls_agree() {
        let db = database(Layout::Aggregated);
        let r = db.resolver();
        for word in ["Foo", "g", "pkg.mod.Foo", "C.f", "nothing"] {
            assert_eq!(r.resolve(&["m", "C", "f"], word), r.resolve(&["m", "C", "f"], word));
        }
    }

    #[test]
    fn module_qualified_word_wins() {
        let db = database(Layout::Aggregated);
        let r = db.resolver();
        for scope in [&["other"][..], &["m", "C"][..], &[][..]] {
            assert_eq!(
                r.resolve(scope, "pkg.mod.Foo").as_deref(),
                Some("pkg/mod/Foo.html")
            );
        }
    }

    #[test]
    fn partially_qualified_word() {
        let db = database(Layout::Aggregated);
        let r = db.resolver();
        assert_eq!(
            r.locate(&["other"], "mod.Foo"),
            Some(vec!["pkg".to_string(), "mod".to_string(), "Foo".to_string()])
        );
    }

    #[test]
    fn sibling_found_from_inside_method() {
        let db = database(Layout::Aggregated);
        let r = db.resolver();
        assert_eq!(r.resolve(&["m", "C", "f"], "g").as_deref(), Some("m/C.html#g"));

        let simple = database(Layout::Simple);
        assert_eq!(
            simple.resolver().resolve(&["m", "C", "f"], "g").as_deref(),
            Some("m/C.g.html")
        );
    }

    #[test]
    fn child_found_from_aggregate() {
        let db = database(Layout::Aggregated);
        assert_eq!(
            db.resolver().resolve(&["m", "C"], "f").as_deref(),
            Some("m/C.html#f")
        );
    }

    #[test]
    fn leading_dot_skips_local_scope() {
        let db = database(Layout::Aggregated);
        let r = db.resolver();
        assert!(r.resolve(&["m", "C", "f"], "g").is_some());
        assert_eq!(r.resolve(&["m", "C", "f"], ".g"), None);
        assert_eq!(r.resolve(&["m", "C", "f"], ".C").as_deref(), Some("m/C.html"));
    }

    #[test]
    fn top_level_fallback_in_processing_order() {
        let db = database(Layout::Aggregated);
        // `pkg.mod` was gathered before `other`.
        assert_eq!(
            db.resolver().resolve(&["m"], "Foo").as_deref(),
            Some("pkg/mod/Foo.html")
        );
    }

    #[test]
    fn local_scope_beats_top_level() {
        let db = database(Layout::Aggregated);
        assert_eq!(
            db.resolver().resolve(&["other"], "Foo").as_deref(),
            Some("other/Foo.html")
        );
    }

    #[test]
    fn module_name_links_to_index() {
        let db = database(Layout::Simple);
        assert_eq!(
            db.resolver().resolve(&["m"], "pkg.mod").as_deref(),
            Some("pkg/mod/index.html")
        );
    }

    #[test]
    fn single_word_never_matches_module() {
        let db = database(Layout::Aggregated);
        assert_eq!(db.resolver().resolve(&["m"], "other"), None);
    }

    #[test]
    fn single_word_never_matches_submodule() {
        let mut b = DatabaseBuilder::new(Layout::Aggregated);
        b.add_module("std", Path::new("std/package.d"), String::new());
        b.add_module("std.range", Path::new("std/range.d"), String::new());
        b.add_module("app", Path::new("app.d"), String::new());
        b.tree_mut().insert(&["std", "range", "take"], SymbolKind::Function);
        let db = b.finish();
        let r = db.resolver();

        assert_eq!(r.resolve(&["app"], "range"), None);
        assert_eq!(r.resolve(&["std"], "range"), None);
        assert_eq!(r.resolve(&["std", "range"], "range"), None);
        assert_eq!(
            r.resolve(&["app"], "std.range").as_deref(),
            Some("std/range/index.html")
        );
        assert_eq!(
            r.resolve(&["app"], "std.range.take").as_deref(),
            Some("std/range/index.html#take")
        );
        assert_eq!(r.resolve(&["app"], "take").as_deref(), Some("std/range/index.html#take"));
    }

    #[test]
    fn malformed_words_are_rejected() {
        let db = database(Layout::Aggregated);
        let r = db.resolver();
        for word in ["", ".", "Foo.", "pkg..Foo", "..Foo"] {
            assert_eq!(r.resolve(&["m"], word), None, "{word:?}");
        }
    }

    #[test]
    fn unknown_words_miss() {
        let db = database(Layout::Aggregated);
        let r = db.resolver();
        assert_eq!(r.resolve(&["m", "C"], "h"), None);
        assert_eq!(r.resolve(&["m", "C"], "C.h"), None);
        assert_eq!(r.resolve(&["nowhere"], "x.y"), None);
    }
}
