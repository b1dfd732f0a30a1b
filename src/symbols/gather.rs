//! Phase one: walk each module and record every documented symbol.
//!
//! Must finish for every module before any page is written, since a comment
//! in one module may reference a module later in processing order.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::ast::{Decl, DeclKind, ModuleDecl};
use crate::comment;
use crate::error::{DocError, Result};
use crate::frontend::SourceFile;

use super::{DatabaseBuilder, Layout, SymbolDatabase, SymbolKind, SymbolTree};

/// A module that made it through gathering and should be written.
#[derive(Debug, Clone, Copy)]
pub struct Gathered<'s> {
    pub decl: &'s ModuleDecl,
    pub name: &'s str,
}

/// Gather every module of every loaded file, then freeze the database.
///
/// Modules that cannot be gathered are logged and left out of the result.
pub fn gather_all<'s>(
    sources: &'s [SourceFile],
    layout: Layout,
    excludes: &[String],
) -> (SymbolDatabase, Vec<Gathered<'s>>) {
    let mut builder = DatabaseBuilder::new(layout);
    let mut gathered = Vec::new();

    for source in sources {
        for module in &source.modules {
            let file = module
                .file
                .as_deref()
                .map(PathBuf::from)
                .unwrap_or_else(|| source.path.clone());
            match gather_module(&mut builder, module, &file, excludes) {
                Ok(name) => gathered.push(Gathered { decl: module, name }),
                Err(e @ DocError::Excluded { .. }) => debug!("skipping: {e}"),
                Err(e) => warn!("skipping: {e}"),
            }
        }
    }

    debug!(modules = gathered.len(), "gathering complete");
    (builder.finish(), gathered)
}

/// Record one module and all of its documented declarations.
pub fn gather_module<'m>(
    builder: &mut DatabaseBuilder,
    module: &'m ModuleDecl,
    file: &Path,
    excludes: &[String],
) -> Result<&'m str> {
    let (Some(name), Some(scope)) = (module.name.as_deref(), module.name_parts()) else {
        return Err(DocError::NoModuleName {
            file: file.display().to_string(),
        });
    };
    if let Some(pattern) = excluded_by(name, excludes) {
        return Err(DocError::Excluded {
            module: name.to_string(),
            pattern: pattern.to_string(),
        });
    }

    let summary = match comment::parse(module.comment()) {
        Ok(sections) => comment::summary(&sections).to_string(),
        Err(e) => {
            warn!(module = name, "module comment not parsed: {e}");
            String::new()
        }
    };
    builder.add_module(name, file, summary);

    let mut visitor = Gatherer {
        tree: builder.tree_mut(),
        scope,
    };
    visitor.visit_members(&module.members);
    Ok(name)
}

/// The exclusion that matches some dotted prefix of `module`, checked
/// shortest prefix first. Matching is per component, so `pkg.sub` never
/// excludes `pkg.subother`.
pub fn excluded_by<'p>(module: &str, excludes: &'p [String]) -> Option<&'p str> {
    let mut prefix = String::with_capacity(module.len());
    for part in module.split('.') {
        if !prefix.is_empty() {
            prefix.push('.');
        }
        prefix.push_str(part);
        if let Some(hit) = excludes.iter().find(|e| **e == prefix) {
            return Some(hit);
        }
    }
    None
}

struct Gatherer<'t> {
    tree: &'t mut SymbolTree,
    scope: Vec<String>,
}

impl Gatherer<'_> {
    fn visit_members(&mut self, decls: &[Decl]) {
        for decl in decls {
            self.visit(decl);
        }
    }

    fn visit(&mut self, decl: &Decl) {
        if decl.is_anonymous_enum() {
            for member in &decl.members {
                self.insert(member.name(), SymbolKind::Value);
            }
            return;
        }

        let Some(kind) = SymbolKind::of_decl(decl) else {
            return;
        };
        // Enum members are always referenceable; anything else needs a comment.
        if !decl.is_documented() && decl.kind != DeclKind::EnumMember {
            return;
        }
        let name = decl.name();
        if name.is_empty() {
            return;
        }

        self.scope.push(name.to_string());
        self.tree.insert(&self.scope, kind);
        self.visit_members(&decl.members);
        self.scope.pop();
    }

    fn insert(&mut self, name: &str, kind: SymbolKind) {
        if name.is_empty() {
            return;
        }
        self.scope.push(name.to_string());
        self.tree.insert(&self.scope, kind);
        self.scope.pop();
    }
}
